//! Error types for the versioning core.

use thiserror::Error;

use palimpsest_types::{BlockId, FileId, LineId, TagId};

/// Errors that can occur against the version store.
///
/// Out-of-range, overlap and not-found errors leave the store unchanged.
/// `Invariant` is a programmer error — callers should treat it as fatal.
#[derive(Debug, Error, PartialEq)]
pub enum HistoryError {
    /// Line number outside the block's current active range.
    #[error("line {requested} is out of range (block has {max} active lines)")]
    LineOutOfRange {
        /// The 1-based line number that was requested.
        requested: usize,
        /// Number of active lines in the block.
        max: usize,
    },

    /// Timeline index outside the block's timeline.
    #[error("index {requested} is out of range (timeline has {len} entries)")]
    IndexOutOfRange {
        /// The index that was requested.
        requested: usize,
        /// Timeline length.
        len: usize,
    },

    /// A new child region would overlap an existing sibling.
    #[error("range {start}..={end} overlaps sibling block {sibling}")]
    RangeOverlap {
        /// Requested range start (1-based, inclusive).
        start: usize,
        /// Requested range end (1-based, inclusive).
        end: usize,
        /// The sibling already claiming part of the range.
        sibling: BlockId,
    },

    /// Unknown file id.
    #[error("file not found: {0:?}")]
    FileNotFound(FileId),

    /// Unknown or deleted block id.
    #[error("block not found: {0:?}")]
    BlockNotFound(BlockId),

    /// Unknown line id.
    #[error("line not found: {0:?}")]
    LineNotFound(LineId),

    /// Unknown tag id.
    #[error("tag not found: {0:?}")]
    TagNotFound(TagId),

    /// An opaque id from the session surface failed to parse.
    #[error("malformed id: {0}")]
    MalformedId(String),

    /// Unrecognized end-of-line marker at file load.
    #[error("unsupported eol marker: {0:?}")]
    UnsupportedEol(String),

    /// Internal consistency violation. Fatal.
    #[error("invariant violated: {0}")]
    Invariant(String),

    /// Surfaced from the snapshot / persistence layer.
    #[error("storage error: {0}")]
    Storage(String),
}

impl HistoryError {
    /// Create a LineOutOfRange error.
    pub fn line_out_of_range(requested: usize, max: usize) -> Self {
        Self::LineOutOfRange { requested, max }
    }

    /// Create an IndexOutOfRange error.
    pub fn index_out_of_range(requested: usize, len: usize) -> Self {
        Self::IndexOutOfRange { requested, len }
    }

    /// Create an Invariant error.
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }

    /// Create a Storage error.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, HistoryError>;
