//! Per-block version scrubbing core.
//!
//! # Architecture
//!
//! Every edit to a loaded file is recorded as an immutable, stamped
//! [`Version`] on a [`Line`]; lines are never removed, only hidden. Named
//! regions ([`Block`]s — the whole-file root, nested inline regions, and
//! clone forks) each carry their own cursor stamp, so any region can be
//! scrubbed to any past state independently of the rest of the file.
//!
//! The [`Store`] is the single mutable state: arena maps keyed by typed
//! ids, a line↔block membership index, and the [`Clock`] that totally
//! orders all writes. [`Session`] wraps it in the string-id surface the
//! editor consumes.
//!
//! # The pre-insertion contract
//!
//! A line born mid-editing writes a hidden placeholder at `t` and its first
//! visible content at `t+1`. Scrubbing backward across the birth hides the
//! line smoothly, and the timeline lists only the placeholder; the snap
//! rules in [`Timeline`]'s module keep it intuitive from either direction.

mod block;
mod clock;
mod edit;
mod error;
mod file;
mod line;
mod order;
mod session;
mod snapshot;
mod store;
mod tag;
mod timeline;
mod version;

pub use block::Block;
pub use clock::Clock;
pub use error::{HistoryError, Result};
pub use file::File;
pub use line::{Line, LineParams};
pub use order::OrderKey;
pub use session::Session;
pub use snapshot::{
    BlockLineRecord, BlockRecord, FileRecord, LineRecord, StoreSnapshot, TagRecord,
};
pub use store::{MAX_BLOCK_TREE, Store};
pub use tag::Tag;
pub use timeline::{Timeline, TimelineEntry};
pub use version::Version;

// Re-export the shared plain-data types alongside the behavior.
pub use palimpsest_types::{
    BlockId, BlockInfo, BlockKind, Eol, FileId, LineId, MultiLineChange, Stamp, TagId, TagInfo,
    VersionKind,
};
