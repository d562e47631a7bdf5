//! Parallel iteration when the `parallel` feature is on, plain iteration otherwise.
//!
//! Code that fans out per cell (such as [`delineate_all`](crate::hydrology::delineate_all))
//! writes `into_par_iter()` once and builds either way.

#[cfg(feature = "parallel")]
pub use rayon::prelude::*;

#[cfg(not(feature = "parallel"))]
mod sequential {
    /// `into_par_iter()` that forwards to `into_iter()`, so the rest of the
    /// chain resolves to [`Iterator`] adapters
    pub trait IntoParallelIterator: IntoIterator + Sized {
        fn into_par_iter(self) -> Self::IntoIter {
            self.into_iter()
        }
    }

    impl<I: IntoIterator> IntoParallelIterator for I {}
}

#[cfg(not(feature = "parallel"))]
pub use sequential::IntoParallelIterator;
