//! Version and block classification enums.

use serde::{Deserialize, Serialize};

/// What produced a version.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionKind {
    /// Written at file load; one per imported line.
    Imported,
    /// Hidden placeholder preceding an insertion — makes "before I was
    /// born" observable as "hidden" when scrubbing backward.
    PreInsertion,
    /// First visible content of a line born mid-editing.
    Insertion,
    /// Content replacement on an existing line.
    Change,
    /// Tombstone; the line is hidden at and after this stamp.
    Deletion,
    /// Content replacement written through a clone block; invisible outside
    /// the fork.
    Clone,
}

impl VersionKind {
    /// Whether versions of this kind appear as their own scrub step.
    ///
    /// Imported versions collapse into the single "original" anchor, and an
    /// Insertion is represented by its PreInsertion placeholder.
    pub fn listed_on_timeline(&self) -> bool {
        matches!(
            self,
            VersionKind::PreInsertion | VersionKind::Change | VersionKind::Deletion
        )
    }

    /// Whether this kind starts a line's life.
    pub fn is_birth(&self) -> bool {
        matches!(self, VersionKind::Imported | VersionKind::PreInsertion)
    }
}

/// What a block is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// The whole-file block created at load; claims every line the file
    /// ever has.
    Root,
    /// A user-selected region nested under a parent block.
    Inline,
    /// A fork of another block sharing its lines but carrying its own edits.
    Clone,
}

impl BlockKind {
    /// Whether this is a file root.
    pub fn is_root(&self) -> bool {
        matches!(self, BlockKind::Root)
    }

    /// Whether this is a fork.
    pub fn is_clone(&self) -> bool {
        matches!(self, BlockKind::Clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeline_listing() {
        assert!(VersionKind::Change.listed_on_timeline());
        assert!(VersionKind::Deletion.listed_on_timeline());
        assert!(VersionKind::PreInsertion.listed_on_timeline());
        assert!(!VersionKind::Insertion.listed_on_timeline());
        assert!(!VersionKind::Imported.listed_on_timeline());
        assert!(!VersionKind::Clone.listed_on_timeline());
    }

    #[test]
    fn test_block_kind_predicates() {
        assert!(BlockKind::Root.is_root());
        assert!(!BlockKind::Inline.is_root());
        assert!(BlockKind::Clone.is_clone());
        assert!(!BlockKind::Root.is_clone());
    }
}
