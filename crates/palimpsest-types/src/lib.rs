//! Shared plain-data types for the palimpsest versioning core.
//!
//! Everything here is dumb data: typed identifiers, ordering stamps,
//! end-of-line markers, the version/block kind enums, the change descriptor
//! the editor surface sends in, and the info structs it reads back out.
//! Behavior lives in `palimpsest-core`.

mod block_id;
mod change;
mod eol;
mod ids;
mod info;
mod kinds;
mod stamp;

pub use block_id::BlockId;
pub use change::MultiLineChange;
pub use eol::Eol;
pub use ids::{FileId, LineId, TagId};
pub use info::{BlockInfo, TagInfo};
pub use kinds::{BlockKind, VersionKind};
pub use stamp::Stamp;
