//! Immutable per-line version snapshots.

use serde::{Deserialize, Serialize};

use palimpsest_types::{BlockId, LineId, Stamp, VersionKind};

/// One immutable snapshot of one line: content, activeness, classification.
///
/// Versions are append-only — never mutated, never deleted. A stamp
/// identifies a version globally, since stamps are unique across the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    /// Owning line.
    pub line: LineId,
    /// Globally unique, strictly increasing per line.
    pub stamp: Stamp,
    /// Line content at this version. Empty for hidden placeholders.
    pub content: String,
    /// `false` means the line is hidden at and after this stamp.
    pub active: bool,
    /// What produced this version.
    pub kind: VersionKind,
    /// For clone edits: stamp of the version the edit was based on.
    pub origin: Option<Stamp>,
    /// Block whose edit produced this version. `None` for imports.
    pub source_block: Option<BlockId>,
}

impl Version {
    /// A line's import-time snapshot.
    pub fn imported(line: LineId, stamp: Stamp, content: impl Into<String>) -> Self {
        Self {
            line,
            stamp,
            content: content.into(),
            active: true,
            kind: VersionKind::Imported,
            origin: None,
            source_block: None,
        }
    }

    /// The hidden placeholder preceding an insertion.
    pub fn pre_insertion(line: LineId, stamp: Stamp, source: BlockId) -> Self {
        Self {
            line,
            stamp,
            content: String::new(),
            active: false,
            kind: VersionKind::PreInsertion,
            origin: None,
            source_block: Some(source),
        }
    }

    /// The first visible content of a line born mid-editing.
    pub fn insertion(line: LineId, stamp: Stamp, content: impl Into<String>, source: BlockId) -> Self {
        Self {
            line,
            stamp,
            content: content.into(),
            active: true,
            kind: VersionKind::Insertion,
            origin: None,
            source_block: Some(source),
        }
    }

    /// A content replacement on an existing line.
    pub fn change(line: LineId, stamp: Stamp, content: impl Into<String>, source: BlockId) -> Self {
        Self {
            line,
            stamp,
            content: content.into(),
            active: true,
            kind: VersionKind::Change,
            origin: None,
            source_block: Some(source),
        }
    }

    /// A deletion tombstone.
    pub fn deletion(line: LineId, stamp: Stamp, source: BlockId) -> Self {
        Self {
            line,
            stamp,
            content: String::new(),
            active: false,
            kind: VersionKind::Deletion,
            origin: None,
            source_block: Some(source),
        }
    }

    /// A content replacement written through a clone block, derived from
    /// the version at `origin`.
    pub fn clone_edit(
        line: LineId,
        stamp: Stamp,
        content: impl Into<String>,
        origin: Stamp,
        source: BlockId,
    ) -> Self {
        Self {
            line,
            stamp,
            content: content.into(),
            active: true,
            kind: VersionKind::Clone,
            origin: Some(origin),
            source_block: Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use palimpsest_types::FileId;

    #[test]
    fn test_constructors_set_kind_and_activeness() {
        let line = LineId::new();
        let block = BlockId::new(FileId::new(), 1);

        let v = Version::imported(line, Stamp::new(1), "x");
        assert_eq!(v.kind, VersionKind::Imported);
        assert!(v.active);
        assert_eq!(v.source_block, None);

        let v = Version::pre_insertion(line, Stamp::new(2), block);
        assert_eq!(v.kind, VersionKind::PreInsertion);
        assert!(!v.active);

        let v = Version::insertion(line, Stamp::new(3), "new", block);
        assert_eq!(v.kind, VersionKind::Insertion);
        assert!(v.active);

        let v = Version::deletion(line, Stamp::new(4), block);
        assert_eq!(v.kind, VersionKind::Deletion);
        assert!(!v.active);

        let v = Version::clone_edit(line, Stamp::new(5), "forked", Stamp::new(3), block);
        assert_eq!(v.kind, VersionKind::Clone);
        assert_eq!(v.origin, Some(Stamp::new(3)));
        assert!(v.active);
    }
}
