//! Line nodes and their version histories.

use palimpsest_types::{FileId, LineId, Stamp, VersionKind};

use crate::error::{HistoryError, Result};
use crate::order::OrderKey;
use crate::version::Version;

/// A node in a file's line list.
///
/// Owns an append-only, stamp-ordered version history. Lines are never
/// physically removed — "deletion" appends an inactive version. Every live
/// line has at least one version.
#[derive(Clone, Debug)]
pub struct Line {
    id: LineId,
    file: FileId,
    order: OrderKey,
    versions: Vec<Version>,
}

impl Line {
    /// A line born at file import.
    pub fn imported(
        id: LineId,
        file: FileId,
        order: OrderKey,
        stamp: Stamp,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            file,
            order,
            versions: vec![Version::imported(id, stamp, content)],
        }
    }

    /// A line born mid-editing: hidden placeholder at `pre`, first visible
    /// content one stamp later.
    pub fn inserted(line: LineParams, pre: Version, insertion: Version) -> Self {
        debug_assert_eq!(pre.kind, VersionKind::PreInsertion);
        debug_assert!(insertion.stamp > pre.stamp);
        Self {
            id: line.id,
            file: line.file,
            order: line.order,
            versions: vec![pre, insertion],
        }
    }

    /// Rehydrate from persisted parts. The history must be non-empty and
    /// stamp-ascending.
    pub(crate) fn restore(
        id: LineId,
        file: FileId,
        order: OrderKey,
        versions: Vec<Version>,
    ) -> Result<Self> {
        if versions.is_empty() {
            return Err(HistoryError::storage(format!("line {id} has no versions")));
        }
        for pair in versions.windows(2) {
            if pair[1].stamp <= pair[0].stamp {
                return Err(HistoryError::storage(format!(
                    "line {id} history out of order at stamp {}",
                    pair[1].stamp
                )));
            }
        }
        Ok(Self { id, file, order, versions })
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn id(&self) -> LineId {
        self.id
    }

    pub fn file(&self) -> FileId {
        self.file
    }

    pub fn order(&self) -> &OrderKey {
        &self.order
    }

    /// Full history, oldest first.
    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    /// The earliest version (import or pre-insertion placeholder).
    pub fn first(&self) -> &Version {
        &self.versions[0]
    }

    /// The most recent version.
    pub fn last(&self) -> &Version {
        self.versions.last().expect("line history is never empty")
    }

    /// Import stamp, when this line came from file load.
    pub fn imported_stamp(&self) -> Option<Stamp> {
        let first = self.first();
        (first.kind == VersionKind::Imported).then_some(first.stamp)
    }

    // ── History ─────────────────────────────────────────────────────────

    /// The head at `at`: the last version with `stamp <= at`. A line not
    /// yet born at `at` answers with its earliest version — the hidden
    /// placeholder — so "before I was inserted" reads as "hidden".
    pub fn head_at(&self, at: Stamp) -> &Version {
        self.versions
            .iter()
            .rev()
            .find(|v| v.stamp <= at)
            .unwrap_or_else(|| self.first())
    }

    /// Like [`head_at`](Self::head_at), but skipping versions rejected by
    /// `visible` (fork isolation — see the store's view rules).
    pub fn head_at_filtered(&self, at: Stamp, visible: impl Fn(&Version) -> bool) -> &Version {
        self.versions
            .iter()
            .rev()
            .find(|&v| v.stamp <= at && visible(v))
            .unwrap_or_else(|| self.first())
    }

    /// The version immediately after `stamp` on this line, if any.
    pub fn successor_of(&self, stamp: Stamp) -> Option<&Version> {
        self.versions.iter().find(|v| v.stamp > stamp)
    }

    /// Append a version. Its stamp must exceed the current last.
    pub fn append(&mut self, version: Version) -> Result<()> {
        if version.stamp <= self.last().stamp {
            return Err(HistoryError::invariant(format!(
                "non-increasing stamp {} appended to line {} (last {})",
                version.stamp,
                self.id,
                self.last().stamp
            )));
        }
        self.versions.push(version);
        Ok(())
    }
}

/// Identity bundle for [`Line::inserted`].
pub struct LineParams {
    pub id: LineId,
    pub file: FileId,
    pub order: OrderKey,
}
