//! Dense ordering keys for lines.
//!
//! Lines are ordered by base-62 fractional keys: between any two live
//! neighbors there is always room for another key, so insertion never
//! renumbers existing lines. Keys are compared lexicographically.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Base-62 charset (0-9, A-Z, a-z). Lexicographically ordered:
/// '0' < '9' < 'A' < 'Z' < 'a' < 'z'.
const BASE62: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Index of a character in the charset.
fn digit_index(c: u8) -> usize {
    BASE62.iter().position(|&b| b == c).unwrap_or(0)
}

/// A line's position key within its file.
///
/// Generated keys never end in the zero digit, which guarantees
/// `between` always has room below an existing key.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderKey(String);

impl OrderKey {
    /// A key strictly between two neighbors.
    ///
    /// `None` on the low side means "before everything", on the high side
    /// "after everything". With two keys, `prev` must sort strictly below
    /// `next`.
    pub fn between(prev: Option<&OrderKey>, next: Option<&OrderKey>) -> OrderKey {
        match (prev, next) {
            (None, None) => OrderKey("V".to_string()),
            (Some(p), None) => OrderKey(format!("{}V", p.0)),
            (None, Some(n)) => OrderKey(midpoint("", &n.0)),
            (Some(p), Some(n)) => {
                debug_assert!(p < n, "order keys out of order: {p} >= {n}");
                OrderKey(midpoint(&p.0, &n.0))
            }
        }
    }

    /// The raw key text (for persistence).
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Rehydrate a persisted key.
    pub fn from_raw(raw: impl Into<String>) -> OrderKey {
        OrderKey(raw.into())
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OrderKey({})", self.0)
    }
}

/// Compute a lexicographic midpoint between two base-62 strings.
///
/// The empty string sorts below everything and serves as the virtual low
/// bound. Requires `low < high` and that `high` does not end in the zero
/// digit; the result then satisfies `low < result < high`.
fn midpoint(low: &str, high: &str) -> String {
    let low_bytes = low.as_bytes();
    let high_bytes = high.as_bytes();
    let max_len = low_bytes.len().max(high_bytes.len());

    let mut result = Vec::new();

    for i in 0..=max_len {
        let lo = if i < low_bytes.len() { digit_index(low_bytes[i]) } else { 0 };
        let hi = if i < high_bytes.len() { digit_index(high_bytes[i]) } else { 62 };

        if lo + 1 < hi {
            result.push(BASE62[(lo + hi) / 2]);
            break;
        }

        if lo == hi {
            // Shared digit: keep scanning.
            result.push(BASE62[lo]);
            continue;
        }

        // Adjacent digits: keep `lo`'s digit and extend past `low`,
        // copying any top-of-range digits until there is room upward.
        result.push(BASE62[lo]);
        let mut j = i + 1;
        loop {
            let next = if j < low_bytes.len() { digit_index(low_bytes[j]) } else { 0 };
            let mid = (next + 62) / 2;
            if mid > next {
                result.push(BASE62[mid]);
                break;
            }
            result.push(BASE62[next]);
            j += 1;
        }
        break;
    }

    if result.is_empty() {
        result.push(b'V');
    }
    String::from_utf8(result).unwrap_or_else(|_| "V".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> OrderKey {
        OrderKey::from_raw(s)
    }

    #[test]
    fn test_first_key() {
        assert_eq!(OrderKey::between(None, None).as_str(), "V");
    }

    #[test]
    fn test_after_everything() {
        let k = key("V");
        let after = OrderKey::between(Some(&k), None);
        assert!(after > k);
    }

    #[test]
    fn test_before_everything() {
        let k = key("V");
        let before = OrderKey::between(None, Some(&k));
        assert!(before < k);
    }

    #[test]
    fn test_midpoint_is_strictly_between() {
        let cases = [("A", "B"), ("A", "C"), ("Az", "B"), ("V", "VV"), ("AA", "AB"), ("3", "z")];
        for (a, b) in cases {
            let (a, b) = (key(a), key(b));
            let mid = OrderKey::between(Some(&a), Some(&b));
            assert!(a < mid, "{a:?} < {mid:?} failed");
            assert!(mid < b, "{mid:?} < {b:?} failed");
        }
    }

    #[test]
    fn test_repeated_head_insertion_stays_ordered() {
        let mut lowest = OrderKey::between(None, None);
        for _ in 0..64 {
            let lower = OrderKey::between(None, Some(&lowest));
            assert!(lower < lowest);
            lowest = lower;
        }
    }

    #[test]
    fn test_repeated_middle_insertion_stays_ordered() {
        let low = OrderKey::between(None, None);
        let mut high = OrderKey::between(Some(&low), None);
        for _ in 0..64 {
            let mid = OrderKey::between(Some(&low), Some(&high));
            assert!(low < mid && mid < high);
            high = mid;
        }
    }

    #[test]
    fn test_generated_keys_never_end_in_zero() {
        let low = OrderKey::between(None, None);
        let high = OrderKey::between(Some(&low), None);
        let mut keys = vec![low, high];
        for _ in 0..32 {
            let mid = OrderKey::between(Some(&keys[keys.len() - 2]), Some(&keys[keys.len() - 1]));
            assert!(!mid.as_str().ends_with('0'));
            let end = keys.len() - 1;
            keys.insert(end, mid);
        }
    }
}
