//! Ordering stamps.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A globally ordered mutation stamp.
///
/// Stamps are pure ordering tokens — no wall-clock coupling. Every version
/// written to the store carries one, and a block's scrub cursor is one.
/// Strictly increasing per clock; `0` is the pre-history sentinel no version
/// ever carries.
#[derive(Clone, Copy, Default, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stamp(u64);

impl Stamp {
    /// The pre-history sentinel.
    pub const ZERO: Stamp = Stamp(0);

    /// Wrap a raw counter value.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }

    /// The immediately following stamp.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl From<u64> for Stamp {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<Stamp> for u64 {
    fn from(stamp: Stamp) -> u64 {
        stamp.0
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stamp({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_is_strictly_greater() {
        let s = Stamp::new(7);
        assert!(s.next() > s);
        assert_eq!(s.next().get(), 8);
    }

    #[test]
    fn test_zero_is_default() {
        assert_eq!(Stamp::default(), Stamp::ZERO);
    }

    #[test]
    fn test_serde_is_transparent() {
        let s = Stamp::new(41);
        assert_eq!(serde_json::to_string(&s).unwrap(), "41");
    }
}
