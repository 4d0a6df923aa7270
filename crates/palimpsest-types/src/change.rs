//! The change descriptor the editor surface sends in.

use serde::{Deserialize, Serialize};

/// A multi-line text replacement, as reported by the editor buffer.
///
/// The editor applies the keystroke to its own buffer first and then
/// notifies the core: `line_text` is the resulting full text of the lines
/// the range touches (re-split on the file's eol to get the new per-line
/// contents), while `inserted_text` is the raw replacement snippet, used
/// only to classify the change (leading/trailing eol, push-down/push-up).
///
/// Lines and columns are 1-based; the range end is the exclusive caret
/// position of the replacement, with `start == end` for a pure insertion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiLineChange {
    /// First line of the modified range (1-based, relative to the block's
    /// active lines).
    pub start_line: usize,
    /// Column the replacement starts at (1-based).
    pub start_col: usize,
    /// Last line of the modified range (1-based).
    pub end_line: usize,
    /// Column the replacement ends at (1-based).
    pub end_col: usize,
    /// The raw replacement text.
    pub inserted_text: String,
    /// Full post-edit text of the affected lines, joined with the file eol.
    pub line_text: String,
}

impl MultiLineChange {
    /// Whether the range is a single caret position (nothing replaced).
    pub fn is_insert_only(&self) -> bool {
        self.start_line == self.end_line && self.start_col == self.end_col
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_only() {
        let change = MultiLineChange {
            start_line: 2,
            start_col: 5,
            end_line: 2,
            end_col: 5,
            inserted_text: "x".into(),
            line_text: "hexllo".into(),
        };
        assert!(change.is_insert_only());

        let replace = MultiLineChange { end_col: 6, ..change };
        assert!(!replace.is_insert_only());
    }

    #[test]
    fn test_serde_roundtrip() {
        let change = MultiLineChange {
            start_line: 1,
            start_col: 1,
            end_line: 2,
            end_col: 3,
            inserted_text: "ab\ncd".into(),
            line_text: "ab\ncdef".into(),
        };
        let json = serde_json::to_string(&change).unwrap();
        let parsed: MultiLineChange = serde_json::from_str(&json).unwrap();
        assert_eq!(change, parsed);
    }
}
