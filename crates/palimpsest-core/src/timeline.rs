//! Per-block scrub timelines.
//!
//! A timeline is the ordered list of user-visible steps for one block:
//! every change and deletion on its claimed lines, each insertion
//! represented by its hidden pre-insertion placeholder, and the whole
//! import collapsed into a single "original" anchor. The snap rules below
//! make the placeholder behave intuitively whether the user arrives from
//! the left, the right, or by direct jump.

use palimpsest_types::{LineId, Stamp, VersionKind};

use crate::error::{HistoryError, Result};

/// One scrub step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimelineEntry {
    /// Line the underlying version belongs to.
    pub line: LineId,
    /// The underlying version's stamp.
    pub stamp: Stamp,
    /// The underlying version's kind.
    pub kind: VersionKind,
    /// Stamp of the next version on the same line, if any. For a
    /// pre-insertion entry this is its paired insertion.
    pub successor: Option<Stamp>,
}

/// A block's ordered scrub steps.
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
}

impl Timeline {
    pub(crate) fn from_entries(mut entries: Vec<TimelineEntry>) -> Self {
        entries.sort_by_key(|e| e.stamp);
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&TimelineEntry> {
        self.entries.get(index)
    }

    /// Rank of `stamp` on this timeline: the last entry at or before it.
    ///
    /// An insertion head ranks at its pre-insertion placeholder, since the
    /// insertion itself is not listed and sits one stamp after it.
    pub fn rank_at_or_before(&self, stamp: Stamp) -> usize {
        self.entries
            .iter()
            .rposition(|e| e.stamp <= stamp)
            .unwrap_or(0)
    }
}

/// Resolve `apply_index(index)` to the stamp actually applied.
///
/// `current` is the block's current rank; `line_hidden` answers whether a
/// line is hidden in the block's present view. The rules:
///
/// 1. Moving right off an engaged pre-insertion reveals the line (applies
///    the paired insertion) before anything else happens.
/// 2. Moving left onto a released pre-insertion hides the line first.
/// 3. Landing directly on the current pre-insertion skips the hidden state
///    and applies the paired insertion.
/// 4. Otherwise the selected entry is applied as-is.
pub(crate) fn resolve_snap(
    timeline: &Timeline,
    index: usize,
    current: usize,
    line_hidden: impl Fn(LineId) -> bool,
) -> Result<Stamp> {
    let len = timeline.len();
    let sel = timeline
        .get(index)
        .ok_or_else(|| HistoryError::index_out_of_range(index, len))?;
    let latest = timeline
        .get(current)
        .ok_or_else(|| HistoryError::invariant(format!("current rank {current} off timeline")))?;

    let prev = index.checked_sub(1).and_then(|i| timeline.get(i));
    let next = timeline.get(index + 1);

    if let Some(p) = prev
        && p.stamp == latest.stamp
        && p.kind == VersionKind::PreInsertion
        && line_hidden(p.line)
    {
        return paired_insertion(p);
    }

    if let Some(n) = next
        && n.stamp == latest.stamp
        && n.kind == VersionKind::PreInsertion
        && !line_hidden(n.line)
    {
        return Ok(n.stamp);
    }

    if sel.kind == VersionKind::PreInsertion
        && (sel.stamp == latest.stamp || next.is_some_and(|n| n.stamp == latest.stamp))
    {
        return paired_insertion(sel);
    }

    Ok(sel.stamp)
}

fn paired_insertion(entry: &TimelineEntry) -> Result<Stamp> {
    entry.successor.ok_or_else(|| {
        HistoryError::invariant(format!(
            "pre-insertion at {} has no paired insertion",
            entry.stamp
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(stamp: u64, kind: VersionKind, successor: Option<u64>) -> TimelineEntry {
        TimelineEntry {
            line: LineId::new(),
            stamp: Stamp::new(stamp),
            kind,
            successor: successor.map(Stamp::new),
        }
    }

    /// Anchor at 1, change at 5, pre-insertion 8 (paired insertion 9),
    /// change at 12.
    fn sample() -> Timeline {
        Timeline::from_entries(vec![
            entry(12, VersionKind::Change, None),
            entry(1, VersionKind::Imported, None),
            entry(8, VersionKind::PreInsertion, Some(9)),
            entry(5, VersionKind::Change, Some(12)),
        ])
    }

    #[test]
    fn test_entries_are_sorted() {
        let tl = sample();
        let stamps: Vec<u64> = tl.entries().iter().map(|e| e.stamp.get()).collect();
        assert_eq!(stamps, vec![1, 5, 8, 12]);
    }

    #[test]
    fn test_rank_at_or_before() {
        let tl = sample();
        assert_eq!(tl.rank_at_or_before(Stamp::new(1)), 0);
        assert_eq!(tl.rank_at_or_before(Stamp::new(4)), 0);
        assert_eq!(tl.rank_at_or_before(Stamp::new(5)), 1);
        // an insertion head (stamp 9) ranks at its placeholder
        assert_eq!(tl.rank_at_or_before(Stamp::new(9)), 2);
        assert_eq!(tl.rank_at_or_before(Stamp::new(50)), 3);
        // before everything clamps to the anchor
        assert_eq!(tl.rank_at_or_before(Stamp::ZERO), 0);
    }

    #[test]
    fn test_snap_plain_jump() {
        let tl = sample();
        // current at the end, jumping to the change at 5
        let stamp = resolve_snap(&tl, 1, 3, |_| false).unwrap();
        assert_eq!(stamp, Stamp::new(5));
    }

    #[test]
    fn test_snap_moving_right_reveals_hidden_line() {
        let tl = sample();
        // current rank 2 (the placeholder), line hidden; user clicks 3
        let stamp = resolve_snap(&tl, 3, 2, |_| true).unwrap();
        assert_eq!(stamp, Stamp::new(9));
    }

    #[test]
    fn test_snap_moving_left_hides_visible_line() {
        let tl = sample();
        // current rank 3; placeholder is at rank 2 with its line visible...
        // moving left to index 2 applies the placeholder itself
        let stamp = resolve_snap(&tl, 2, 2, |_| false).unwrap();
        assert_eq!(stamp, Stamp::new(9)); // rule 3: direct landing on current
        // moving left to index 1 while rank 2 is current and released hides
        let stamp = resolve_snap(&tl, 1, 2, |_| false).unwrap();
        assert_eq!(stamp, Stamp::new(8));
    }

    #[test]
    fn test_snap_direct_landing_skips_hidden_state() {
        let tl = sample();
        // current rank 3 (change at 12); jump straight to the placeholder
        let stamp = resolve_snap(&tl, 2, 3, |_| false).unwrap();
        assert_eq!(stamp, Stamp::new(9));
    }

    #[test]
    fn test_snap_out_of_range() {
        let tl = sample();
        let err = resolve_snap(&tl, 4, 0, |_| false).unwrap_err();
        assert!(matches!(err, HistoryError::IndexOutOfRange { requested: 4, len: 4 }));
    }
}
