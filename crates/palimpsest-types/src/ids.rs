//! Typed identifiers for files, lines, and tags.
//!
//! All ID types wrap UUIDv7 (time-ordered, globally unique). They're opaque
//! at the session surface and display as standard UUID text for logging. The
//! `short()` form (first 8 hex chars) is for human-facing UI — never used as
//! a lookup key.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A file identifier (UUIDv7).
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(uuid::Uuid);

/// A line identifier (UUIDv7).
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(uuid::Uuid);

/// A tag identifier (UUIDv7).
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagId(uuid::Uuid);

// ── Shared behavior ─────────────────────────────────────────────────────────

macro_rules! impl_typed_id {
    ($T:ident, $name:literal) => {
        impl $T {
            /// Create a new time-ordered ID (UUIDv7).
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7())
            }

            /// First 8 hex characters — for human display only, not lookup.
            pub fn short(&self) -> String {
                self.0.as_simple().to_string()[..8].to_string()
            }

            /// Full 32-character hex string (no hyphens).
            pub fn to_hex(&self) -> String {
                self.0.as_simple().to_string()
            }

            /// The raw 16 bytes.
            pub fn as_bytes(&self) -> &[u8; 16] {
                self.0.as_bytes()
            }

            /// Reconstruct from 16 bytes.
            pub fn from_bytes(b: [u8; 16]) -> Self {
                Self(uuid::Uuid::from_bytes(b))
            }

            /// Parse from a hex string (32 chars, no hyphens) or standard UUID format.
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                uuid::Uuid::parse_str(s).map(Self)
            }

            /// A nil / zero ID — for sentinel values only.
            pub fn nil() -> Self {
                Self(uuid::Uuid::nil())
            }

            /// Check if this is the nil ID.
            pub fn is_nil(&self) -> bool {
                self.0.is_nil()
            }
        }

        impl Default for $T {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<uuid::Uuid> for $T {
            fn from(u: uuid::Uuid) -> Self {
                Self(u)
            }
        }

        impl From<$T> for uuid::Uuid {
            fn from(id: $T) -> uuid::Uuid {
                id.0
            }
        }

        impl fmt::Display for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                // Full UUID with hyphens for log readability
                write!(f, "{}", self.0)
            }
        }

        impl fmt::Debug for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $name, self.short())
            }
        }
    };
}

impl_typed_id!(FileId, "FileId");
impl_typed_id!(LineId, "LineId");
impl_typed_id!(TagId, "TagId");

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_unique() {
        let a = LineId::new();
        let b = LineId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_short_is_8_chars() {
        let id = FileId::new();
        assert_eq!(id.short().len(), 8);
    }

    #[test]
    fn test_hex_is_32_chars() {
        let id = TagId::new();
        assert_eq!(id.to_hex().len(), 32);
    }

    #[test]
    fn test_roundtrip_bytes() {
        let id = LineId::new();
        let bytes = *id.as_bytes();
        let id2 = LineId::from_bytes(bytes);
        assert_eq!(id, id2);
    }

    #[test]
    fn test_parse_hex() {
        let id = FileId::new();
        let parsed = FileId::parse(&id.to_hex()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_parse_uuid_format() {
        let id = FileId::new();
        let parsed = FileId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_nil() {
        let id = LineId::nil();
        assert!(id.is_nil());
        assert!(!LineId::new().is_nil());
    }

    #[test]
    fn test_ordering_is_time_ordered() {
        let ids: Vec<LineId> = (0..10).map(|_| LineId::new()).collect();
        for i in 1..ids.len() {
            assert!(ids[i] >= ids[i - 1]);
        }
    }

    #[test]
    fn test_serde_roundtrip() {
        let id = FileId::new();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: FileId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_postcard_roundtrip() {
        let id = TagId::new();
        let bytes = postcard::to_stdvec(&id).unwrap();
        let parsed: TagId = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_debug_shows_type_and_short() {
        let id = FileId::new();
        let debug = format!("{:?}", id);
        assert!(debug.starts_with("FileId("));
        assert!(debug.ends_with(')'));
    }
}
