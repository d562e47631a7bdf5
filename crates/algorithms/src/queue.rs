//! Fixed-capacity FIFO queue on a circular buffer
//!
//! Basin delineation sizes its frontier up front: running out of room means
//! the configured capacity is too small for the basin, so `enqueue` on a full
//! queue is an error rather than a reallocation.

use flowrouting_core::{Error, Result};

/// Default number of slots for a basin traversal frontier
pub const DEFAULT_QUEUE_CAPACITY: usize = 10_000;

/// Bounded circular FIFO queue.
///
/// `head` is the next slot to dequeue, `tail` the next slot to fill. Both
/// wrap at `capacity`; `len` is tracked separately so a full queue and an
/// empty one are distinguishable when `head == tail`.
#[derive(Debug)]
pub struct BoundedQueue<T> {
    slots: Vec<Option<T>>,
    head: usize,
    tail: usize,
    len: usize,
}

impl<T> BoundedQueue<T> {
    /// Create an empty queue with room for `capacity` elements
    pub fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            slots,
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Append at the back
    pub fn enqueue(&mut self, item: T) -> Result<()> {
        if self.is_full() {
            return Err(Error::QueueOverflow {
                capacity: self.capacity(),
            });
        }
        self.slots[self.tail] = Some(item);
        self.tail = (self.tail + 1) % self.capacity();
        self.len += 1;
        Ok(())
    }

    /// Remove from the front
    pub fn dequeue(&mut self) -> Result<T> {
        if self.is_empty() {
            return Err(Error::QueueUnderflow);
        }
        let item = self.slots[self.head].take().ok_or(Error::QueueUnderflow)?;
        self.head = (self.head + 1) % self.capacity();
        self.len -= 1;
        Ok(item)
    }

    /// Peek at the front without removing it
    pub fn front(&self) -> Result<&T> {
        if self.is_empty() {
            return Err(Error::QueueUnderflow);
        }
        self.slots[self.head].as_ref().ok_or(Error::QueueUnderflow)
    }

    /// Whether any queued element satisfies `pred`.
    ///
    /// Rotates the whole queue once (dequeue, test, enqueue), so content and
    /// order are unchanged afterward. O(len).
    pub fn contains_by(&mut self, mut pred: impl FnMut(&T) -> bool) -> bool {
        let mut found = false;
        self.rotate(|item| found |= pred(item));
        found
    }

    /// Clone of the first queued element satisfying `pred`, by full rotation
    pub fn find_by(&mut self, mut pred: impl FnMut(&T) -> bool) -> Option<T>
    where
        T: Clone,
    {
        let mut hit = None;
        self.rotate(|item| {
            if hit.is_none() && pred(item) {
                hit = Some(item.clone());
            }
        });
        hit
    }

    /// Visits every element exactly once in FIFO order, moving each from the
    /// front to the back. A full rotation never needs a free slot.
    fn rotate(&mut self, mut visit: impl FnMut(&T)) {
        for _ in 0..self.len {
            if let Some(item) = self.slots[self.head].take() {
                visit(&item);
                self.head = (self.head + 1) % self.capacity();
                self.slots[self.tail] = Some(item);
                self.tail = (self.tail + 1) % self.capacity();
            }
        }
    }

    /// Front-to-back view without rotating
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        (0..self.len).filter_map(move |i| self.slots[(self.head + i) % self.capacity()].as_ref())
    }
}

impl<T> Default for BoundedQueue<T> {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut q = BoundedQueue::new(4);
        for i in 1..=4 {
            q.enqueue(i).unwrap();
        }
        assert!(q.is_full());
        assert_eq!(*q.front().unwrap(), 1);

        let drained: Vec<_> = std::iter::from_fn(|| q.dequeue().ok()).collect();
        assert_eq!(drained, vec![1, 2, 3, 4]);
        assert!(q.is_empty());
    }

    #[test]
    fn test_overflow_on_capacity_plus_one() {
        let mut q = BoundedQueue::new(3);
        for i in 0..3 {
            assert!(q.enqueue(i).is_ok());
        }
        assert!(matches!(
            q.enqueue(3),
            Err(Error::QueueOverflow { capacity: 3 })
        ));
        assert_eq!(q.len(), 3);
    }

    #[test]
    fn test_underflow() {
        let mut q: BoundedQueue<u8> = BoundedQueue::new(2);
        assert!(matches!(q.dequeue(), Err(Error::QueueUnderflow)));
        assert!(matches!(q.front(), Err(Error::QueueUnderflow)));
    }

    #[test]
    fn test_wraps_around() {
        let mut q = BoundedQueue::new(3);
        q.enqueue('a').unwrap();
        q.enqueue('b').unwrap();
        assert_eq!(q.dequeue().unwrap(), 'a');
        q.enqueue('c').unwrap();
        q.enqueue('d').unwrap();
        assert!(q.is_full());
        assert_eq!(q.iter().copied().collect::<String>(), "bcd");
        assert_eq!(q.dequeue().unwrap(), 'b');
        q.enqueue('e').unwrap();
        assert_eq!(q.iter().copied().collect::<String>(), "cde");
    }

    #[test]
    fn test_scan_and_rotate_preserves_order() {
        let mut q = BoundedQueue::new(5);
        q.enqueue(10).unwrap();
        q.dequeue().unwrap();
        for v in [3, 7, 9, 4] {
            q.enqueue(v).unwrap();
        }
        let before: Vec<_> = q.iter().copied().collect();

        assert!(q.contains_by(|&v| v == 9));
        assert!(!q.contains_by(|&v| v == 42));
        assert_eq!(q.find_by(|&v| v > 5), Some(7));
        assert_eq!(q.find_by(|&v| v > 50), None);

        let after: Vec<_> = q.iter().copied().collect();
        assert_eq!(before, after);
        assert_eq!(q.len(), 4);
        assert_eq!(q.dequeue().unwrap(), 3);
    }

    #[test]
    fn test_rotate_full_queue() {
        let mut q = BoundedQueue::new(3);
        for v in [1, 2, 3] {
            q.enqueue(v).unwrap();
        }
        assert!(q.contains_by(|&v| v == 3));
        assert_eq!(q.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    }
}
