//! Read-model structs frozen from live store state for the editor surface.

use serde::{Deserialize, Serialize};

use crate::{BlockId, BlockKind, Stamp, TagId};

/// Serializable view of one block, as the editor surface consumes it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    /// The block.
    pub id: BlockId,
    /// Root, inline region, or clone.
    pub kind: BlockKind,
    /// 1-based inclusive range of the block's lines within its parent's
    /// current view. `None` when the block has no parent or none of its
    /// lines are visible there.
    pub range_in_parent: Option<(usize, usize)>,
    /// Scrubber step count shown to the user: every edit is one step, the
    /// whole import is one step.
    pub user_version_count: usize,
    /// Scrubber position: rank of the block's current version on its
    /// timeline.
    pub current_version_index: usize,
    /// Tags captured on this block, oldest first.
    pub tags: Vec<TagInfo>,
}

/// Serializable view of one tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagInfo {
    /// The tag.
    pub id: TagId,
    /// User-chosen name.
    pub name: String,
    /// The captured scrub position.
    pub stamp: Stamp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FileId;

    #[test]
    fn test_serde_roundtrip() {
        let info = BlockInfo {
            id: BlockId::new(FileId::new(), 2),
            kind: BlockKind::Inline,
            range_in_parent: Some((3, 7)),
            user_version_count: 4,
            current_version_index: 3,
            tags: vec![TagInfo {
                id: TagId::new(),
                name: "before-refactor".into(),
                stamp: Stamp::new(19),
            }],
        };
        let json = serde_json::to_string(&info).unwrap();
        let parsed: BlockInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(info, parsed);
    }

    #[test]
    fn test_postcard_roundtrip() {
        let info = BlockInfo {
            id: BlockId::new(FileId::new(), 0),
            kind: BlockKind::Root,
            range_in_parent: None,
            user_version_count: 1,
            current_version_index: 0,
            tags: Vec::new(),
        };
        let bytes = postcard::to_stdvec(&info).unwrap();
        let parsed: BlockInfo = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(info, parsed);
    }
}
