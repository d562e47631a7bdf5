//! The two parallel flow processes routed through the landscape

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Flow process a quantity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Surface,
    Subsurface,
}

impl Channel {
    pub const ALL: [Channel; 2] = [Channel::Surface, Channel::Subsurface];

    pub const fn index(self) -> usize {
        match self {
            Channel::Surface => 0,
            Channel::Subsurface => 1,
        }
    }

    /// Short tag used in output file names
    pub const fn suffix(self) -> &'static str {
        match self {
            Channel::Surface => "sf",
            Channel::Subsurface => "ssf",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Channel::Surface => "surface",
            Channel::Subsurface => "subsurface",
        })
    }
}

/// One value per [`Channel`], indexed by channel
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "ChannelPair<T>", into = "ChannelPair<T>")]
#[serde(bound(
    serialize = "T: Clone + Serialize",
    deserialize = "T: Deserialize<'de>"
))]
pub struct PerChannel<T>(pub [T; 2]);

impl<T> PerChannel<T> {
    pub const fn new(surface: T, subsurface: T) -> Self {
        Self([surface, subsurface])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Channel, &T)> {
        Channel::ALL.into_iter().zip(self.0.iter())
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PerChannel<U> {
        PerChannel(self.0.map(f))
    }
}

impl<T: Copy> PerChannel<T> {
    pub const fn splat(value: T) -> Self {
        Self([value, value])
    }
}

impl<T> Index<Channel> for PerChannel<T> {
    type Output = T;

    fn index(&self, channel: Channel) -> &T {
        &self.0[channel.index()]
    }
}

impl<T> IndexMut<Channel> for PerChannel<T> {
    fn index_mut(&mut self, channel: Channel) -> &mut T {
        &mut self.0[channel.index()]
    }
}

/// Named form used in config files: `{"surface": .., "subsurface": ..}`
#[derive(Serialize, Deserialize)]
struct ChannelPair<T> {
    surface: T,
    subsurface: T,
}

impl<T> From<ChannelPair<T>> for PerChannel<T> {
    fn from(pair: ChannelPair<T>) -> Self {
        PerChannel([pair.surface, pair.subsurface])
    }
}

impl<T> From<PerChannel<T>> for ChannelPair<T> {
    fn from(PerChannel([surface, subsurface]): PerChannel<T>) -> Self {
        ChannelPair {
            surface,
            subsurface,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_by_channel() {
        let mut v = PerChannel::new(1.0, 2.0);
        assert_eq!(v[Channel::Surface], 1.0);
        assert_eq!(v[Channel::Subsurface], 2.0);
        v[Channel::Subsurface] = 5.0;
        assert_eq!(v.0, [1.0, 5.0]);
    }

    #[test]
    fn test_map_and_iter() {
        let v = PerChannel::new(2, 3).map(|x| x * 10);
        let pairs: Vec<_> = v.iter().map(|(c, x)| (c, *x)).collect();
        assert_eq!(pairs, vec![(Channel::Surface, 20), (Channel::Subsurface, 30)]);
    }

    #[test]
    fn test_suffixes() {
        assert_eq!(Channel::Surface.suffix(), "sf");
        assert_eq!(Channel::Subsurface.suffix(), "ssf");
    }
}
