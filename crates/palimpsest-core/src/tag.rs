//! Named bookmarks into a block's history.

use palimpsest_types::{BlockId, Stamp, TagId, TagInfo};

/// A named, recoverable scrub position: a block, the stamp it sat at, and
/// the text it rendered when captured.
///
/// The cached text is display material for pickers; reopening a tag always
/// re-derives content from the line histories.
#[derive(Clone, Debug)]
pub struct Tag {
    id: TagId,
    block: BlockId,
    name: String,
    stamp: Stamp,
    code: String,
}

impl Tag {
    pub(crate) fn new(
        id: TagId,
        block: BlockId,
        name: impl Into<String>,
        stamp: Stamp,
        code: String,
    ) -> Self {
        Self {
            id,
            block,
            name: name.into(),
            stamp,
            code,
        }
    }

    pub fn id(&self) -> TagId {
        self.id
    }

    pub fn block(&self) -> BlockId {
        self.block
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stamp(&self) -> Stamp {
        self.stamp
    }

    /// The text the block rendered when the tag was captured.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Freeze into the surface read model.
    pub fn info(&self) -> TagInfo {
        TagInfo {
            id: self.id,
            name: self.name.clone(),
            stamp: self.stamp,
        }
    }
}
