//! Classification of editor changes.
//!
//! Bridges the editor-surface change descriptor with the store's per-line
//! version writes: decides whether a replacement modifies lines in place,
//! pushes the start line down (whole lines inserted above it), or pushes it
//! up (whole lines inserted below it).

use palimpsest_types::{Eol, MultiLineChange};

/// Shape flags for one multi-line change.
///
/// `ends_with_eol` uses strict suffix matching — no trailing-whitespace
/// tolerance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ChangeShape {
    /// The replacement begins with the file eol.
    pub starts_with_eol: bool,
    /// The replacement ends with the file eol.
    pub ends_with_eol: bool,
    /// The caret sits at (or inside) the start line's leading whitespace.
    pub at_start_of_start_line: bool,
    /// The caret sits past the start line's last non-whitespace character.
    pub at_end_of_start_line: bool,
    /// Nothing was replaced: the range is a single caret position.
    pub insert_only: bool,
    /// Whole lines inserted above the start line, which floats down
    /// unchanged.
    pub push_start_line_down: bool,
    /// Whole lines inserted below the start line, which floats up
    /// unchanged.
    pub push_start_line_up: bool,
}

impl ChangeShape {
    /// Classify a change against the pre-edit text of its start line.
    pub fn classify(change: &MultiLineChange, start_line_text: &str, eol: Eol) -> Self {
        let marker = eol.as_str();
        let starts_with_eol = change.inserted_text.starts_with(marker);
        let ends_with_eol = change.inserted_text.ends_with(marker);

        let prefix_chars = change.start_col.saturating_sub(1);
        let at_start_of_start_line = start_line_text
            .chars()
            .take(prefix_chars)
            .all(char::is_whitespace);

        let trimmed_len = start_line_text.trim_end().chars().count();
        let at_end_of_start_line = change.start_col > trimmed_len;

        let insert_only = change.is_insert_only();
        let push_start_line_up = insert_only && at_end_of_start_line && starts_with_eol;
        let push_start_line_down =
            insert_only && !push_start_line_up && at_start_of_start_line && ends_with_eol;

        Self {
            starts_with_eol,
            ends_with_eol,
            at_start_of_start_line,
            at_end_of_start_line,
            insert_only,
            push_start_line_down,
            push_start_line_up,
        }
    }
}

/// Split editor text into lines on the file eol. Empty text is one empty
/// line, matching how the editor buffer reads it.
pub(crate) fn split_on_eol(text: &str, eol: Eol) -> Vec<String> {
    text.split(eol.as_str()).map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(
        (start_line, start_col): (usize, usize),
        (end_line, end_col): (usize, usize),
        inserted: &str,
        line_text: &str,
    ) -> MultiLineChange {
        MultiLineChange {
            start_line,
            start_col,
            end_line,
            end_col,
            inserted_text: inserted.into(),
            line_text: line_text.into(),
        }
    }

    #[test]
    fn test_split_on_eol() {
        assert_eq!(split_on_eol("a\nb\nc", Eol::Lf), vec!["a", "b", "c"]);
        assert_eq!(split_on_eol("a\r\nb", Eol::CrLf), vec!["a", "b"]);
        assert_eq!(split_on_eol("", Eol::Lf), vec![""]);
        // a lone \n is not a CrLf separator
        assert_eq!(split_on_eol("a\nb", Eol::CrLf), vec!["a\nb"]);
    }

    #[test]
    fn test_in_place_replacement_has_no_pushes() {
        let c = change((2, 1), (2, 2), "Y", "Y");
        let shape = ChangeShape::classify(&c, "y", Eol::Lf);
        assert!(!shape.insert_only);
        assert!(!shape.push_start_line_down);
        assert!(!shape.push_start_line_up);
    }

    #[test]
    fn test_newline_at_line_end_pushes_up() {
        // caret after "x", user typed "\nnew"
        let c = change((1, 2), (1, 2), "\nnew", "x\nnew");
        let shape = ChangeShape::classify(&c, "x", Eol::Lf);
        assert!(shape.insert_only);
        assert!(shape.at_end_of_start_line);
        assert!(shape.push_start_line_up);
        assert!(!shape.push_start_line_down);
    }

    #[test]
    fn test_full_line_paste_at_line_start_pushes_down() {
        // caret at column 1 of "y", user pasted "new\n"
        let c = change((2, 1), (2, 1), "new\n", "new\ny");
        let shape = ChangeShape::classify(&c, "y", Eol::Lf);
        assert!(shape.insert_only);
        assert!(shape.at_start_of_start_line);
        assert!(shape.push_start_line_down);
        assert!(!shape.push_start_line_up);
    }

    #[test]
    fn test_caret_inside_indentation_counts_as_line_start() {
        let c = change((3, 3), (3, 3), "if x:\n", "  if x:\n  pass");
        let shape = ChangeShape::classify(&c, "    pass", Eol::Lf);
        assert!(shape.at_start_of_start_line);
    }

    #[test]
    fn test_caret_past_trailing_whitespace_counts_as_line_end() {
        let c = change((1, 6), (1, 6), "\n", "ab \n");
        let shape = ChangeShape::classify(&c, "ab   ", Eol::Lf);
        assert!(shape.at_end_of_start_line);
    }

    #[test]
    fn test_ends_with_eol_is_strict() {
        // trailing spaces after the newline do not count
        let c = change((1, 1), (1, 1), "new\n  ", "whatever");
        let shape = ChangeShape::classify(&c, "y", Eol::Lf);
        assert!(!shape.ends_with_eol);
        assert!(!shape.push_start_line_down);
    }

    #[test]
    fn test_blank_line_prefers_push_up() {
        // on an empty line both boundaries hold; push-up wins
        let c = change((2, 1), (2, 1), "\nnew", "\nnew");
        let shape = ChangeShape::classify(&c, "", Eol::Lf);
        assert!(shape.push_start_line_up);
        assert!(!shape.push_start_line_down);
    }
}
