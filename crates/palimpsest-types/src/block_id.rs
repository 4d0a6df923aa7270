//! Structured block identifier.

use serde::{Deserialize, Serialize};

use crate::FileId;

/// Globally unique block identifier.
///
/// Composed of:
/// - `file`: The file this block belongs to
/// - `seq`: File-local sequence number (monotonically increasing; 0 is the
///   root block)
///
/// The `to_key()` form is the opaque string handed to the editor surface.
/// UUIDs are hex-only, so `to_key()` / `from_key()` need no slash-escaping.
#[derive(Clone, Copy, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct BlockId {
    /// File this block belongs to.
    pub file: FileId,
    /// File-local sequence number.
    pub seq: u64,
}

impl BlockId {
    /// Create a block ID from typed components.
    pub fn new(file: FileId, seq: u64) -> Self {
        Self { file, seq }
    }

    /// The root block of a file (sequence number 0).
    pub fn root_of(file: FileId) -> Self {
        Self { file, seq: 0 }
    }

    /// Whether this is a file's root block.
    pub fn is_root(&self) -> bool {
        self.seq == 0
    }

    /// Convert to a compact string key: `"{file_hex}/{seq}"`.
    pub fn to_key(&self) -> String {
        format!("{}/{}", self.file.to_hex(), self.seq)
    }

    /// Parse from a key string: `"{file_hex}/{seq}"`.
    pub fn from_key(key: &str) -> Option<Self> {
        let (file, seq) = key.split_once('/')?;
        Some(Self {
            file: FileId::parse(file).ok()?,
            seq: seq.parse().ok()?,
        })
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.file.short(), self.seq)
    }
}

impl std::fmt::Debug for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BlockId({}#{})", self.file.short(), self.seq)
    }
}
