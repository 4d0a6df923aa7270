//! Flat persisted-shape snapshot of the whole store.
//!
//! The store freezes into relational records — one table per entity plus
//! the line↔block membership table and the clock watermark — and restores
//! from them with referential integrity checks. No wire format is mandated;
//! the JSON helpers are one convenient encoding.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use palimpsest_types::{BlockId, BlockKind, Eol, FileId, LineId, Stamp, TagId};

use crate::block::Block;
use crate::clock::Clock;
use crate::error::{HistoryError, Result};
use crate::file::File;
use crate::line::Line;
use crate::order::OrderKey;
use crate::store::Store;
use crate::tag::Tag;
use crate::version::Version;

/// One file row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: FileId,
    pub path: String,
    pub eol: Eol,
    pub next_block_seq: u64,
}

/// One line row. List position is derived from the order key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRecord {
    pub id: LineId,
    pub file: FileId,
    pub order: String,
}

/// One block row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub id: BlockId,
    pub kind: BlockKind,
    pub file: FileId,
    pub parent: Option<BlockId>,
    pub origin: Option<BlockId>,
    pub stamp: Stamp,
    pub children: Vec<BlockId>,
    pub deleted: bool,
}

/// One line↔block membership row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockLineRecord {
    pub block: BlockId,
    pub line: LineId,
}

/// One tag row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRecord {
    pub id: TagId,
    pub block: BlockId,
    pub name: String,
    pub stamp: Stamp,
    pub code: String,
}

/// The whole store as flat tables.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub files: Vec<FileRecord>,
    pub lines: Vec<LineRecord>,
    pub versions: Vec<Version>,
    pub blocks: Vec<BlockRecord>,
    pub block_lines: Vec<BlockLineRecord>,
    pub tags: Vec<TagRecord>,
    /// Clock watermark; must be at or past every version stamp.
    pub clock: Stamp,
}

impl StoreSnapshot {
    /// Encode as JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| HistoryError::storage(e.to_string()))
    }

    /// Decode from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| HistoryError::storage(e.to_string()))
    }
}

impl Store {
    /// Freeze the store into flat tables.
    pub fn snapshot(&self) -> StoreSnapshot {
        let files = self
            .files
            .values()
            .map(|f| FileRecord {
                id: f.id(),
                path: f.path().to_string(),
                eol: f.eol(),
                next_block_seq: f.next_block_seq(),
            })
            .collect();

        let mut lines = Vec::new();
        let mut versions = Vec::new();
        for line in self.lines.values() {
            lines.push(LineRecord {
                id: line.id(),
                file: line.file(),
                order: line.order().as_str().to_string(),
            });
            versions.extend(line.versions().iter().cloned());
        }

        let blocks = self
            .blocks
            .values()
            .map(|b| BlockRecord {
                id: b.id(),
                kind: b.kind(),
                file: b.file(),
                parent: b.parent(),
                origin: b.origin(),
                stamp: b.stamp(),
                children: b.children().to_vec(),
                deleted: b.is_deleted(),
            })
            .collect();

        let mut block_lines = Vec::new();
        for (line, owners) in &self.line_blocks {
            let mut owners: Vec<BlockId> = owners.iter().copied().collect();
            owners.sort();
            for block in owners {
                block_lines.push(BlockLineRecord { block, line: *line });
            }
        }

        let tags = self
            .tags
            .values()
            .map(|t| TagRecord {
                id: t.id(),
                block: t.block(),
                name: t.name().to_string(),
                stamp: t.stamp(),
                code: t.code().to_string(),
            })
            .collect();

        StoreSnapshot {
            files,
            lines,
            versions,
            blocks,
            block_lines,
            tags,
            clock: self.clock.last(),
        }
    }

    /// Rebuild a store from flat tables, checking referential integrity.
    /// Any inconsistency surfaces as a `Storage` error.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Result<Store> {
        let mut files: BTreeMap<FileId, File> = BTreeMap::new();
        for record in &snapshot.files {
            let mut file = File::new(record.id, record.path.clone(), record.eol);
            file.set_next_block_seq(record.next_block_seq);
            files.insert(record.id, file);
        }

        let mut by_line: HashMap<LineId, Vec<Version>> = HashMap::new();
        for version in snapshot.versions {
            if version.stamp > snapshot.clock {
                return Err(HistoryError::storage(format!(
                    "version stamp {} is past the clock watermark {}",
                    version.stamp, snapshot.clock
                )));
            }
            by_line.entry(version.line).or_default().push(version);
        }

        let mut lines: BTreeMap<LineId, Line> = BTreeMap::new();
        for record in &snapshot.lines {
            if !files.contains_key(&record.file) {
                return Err(HistoryError::storage(format!(
                    "line {} references unknown file {}",
                    record.id, record.file
                )));
            }
            let mut versions = by_line.remove(&record.id).unwrap_or_default();
            versions.sort_by_key(|v| v.stamp);
            let line = Line::restore(
                record.id,
                record.file,
                OrderKey::from_raw(record.order.clone()),
                versions,
            )?;
            lines.insert(record.id, line);
        }
        if let Some(orphan) = by_line.keys().next() {
            return Err(HistoryError::storage(format!(
                "versions reference unknown line {orphan}"
            )));
        }

        // Rebuild each file's list from the order keys.
        for file in files.values_mut() {
            let mut ordered: Vec<(&OrderKey, LineId)> = lines
                .values()
                .filter(|l| l.file() == file.id())
                .map(|l| (l.order(), l.id()))
                .collect();
            ordered.sort();
            for (_, id) in ordered {
                file.push_line(id);
            }
        }

        let mut blocks: BTreeMap<BlockId, Block> = BTreeMap::new();
        for record in &snapshot.blocks {
            if !files.contains_key(&record.file) {
                return Err(HistoryError::storage(format!(
                    "block {} references unknown file {}",
                    record.id, record.file
                )));
            }
            blocks.insert(
                record.id,
                Block::restore(
                    record.id,
                    record.kind,
                    record.file,
                    record.parent,
                    record.origin,
                    record.stamp,
                    record.children.clone(),
                    record.deleted,
                ),
            );
        }
        for file in files.values() {
            if !blocks.contains_key(&file.root()) {
                return Err(HistoryError::storage(format!(
                    "file {} has no root block",
                    file.id()
                )));
            }
        }

        let mut line_blocks: HashMap<LineId, HashSet<BlockId>> = HashMap::new();
        for record in &snapshot.block_lines {
            if !lines.contains_key(&record.line) {
                return Err(HistoryError::storage(format!(
                    "membership references unknown line {}",
                    record.line
                )));
            }
            let Some(block) = blocks.get_mut(&record.block) else {
                return Err(HistoryError::storage(format!(
                    "membership references unknown block {}",
                    record.block
                )));
            };
            block.claim(record.line);
            line_blocks.entry(record.line).or_default().insert(record.block);
        }

        let mut tags: BTreeMap<TagId, Tag> = BTreeMap::new();
        for record in snapshot.tags {
            if !blocks.contains_key(&record.block) {
                return Err(HistoryError::storage(format!(
                    "tag {} references unknown block {}",
                    record.id, record.block
                )));
            }
            tags.insert(
                record.id,
                Tag::new(record.id, record.block, record.name, record.stamp, record.code),
            );
        }

        Ok(Store {
            files,
            lines,
            blocks,
            tags,
            line_blocks,
            clock: Clock::resume(snapshot.clock),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use palimpsest_types::MultiLineChange;

    fn populated() -> (Store, BlockId) {
        let mut store = Store::new();
        let file = store.load_file("/demo.rs", Eol::Lf, "x\ny\nz");
        let root = store.root_block(file).unwrap();
        let child = store.create_child(root, 2, 3).unwrap();
        store.update_line(child, 1, "Y").unwrap();
        store.insert_line_at(root, 1, "header").unwrap();
        store.create_tag(root, "mark").unwrap();
        (store, root)
    }

    #[test]
    fn test_snapshot_roundtrip_preserves_reads() {
        let (store, root) = populated();
        let text = store.get_text(root).unwrap();
        let index = store.current_index(root).unwrap();
        let count = store.user_version_count(root).unwrap();

        let restored = Store::from_snapshot(store.snapshot()).unwrap();
        assert_eq!(restored.get_text(root).unwrap(), text);
        assert_eq!(restored.current_index(root).unwrap(), index);
        assert_eq!(restored.user_version_count(root).unwrap(), count);
    }

    #[test]
    fn test_json_roundtrip() {
        let (store, root) = populated();
        let json = store.snapshot().to_json().unwrap();
        let snapshot = StoreSnapshot::from_json(&json).unwrap();
        let restored = Store::from_snapshot(snapshot).unwrap();
        assert_eq!(restored.get_text(root).unwrap(), store.get_text(root).unwrap());
    }

    #[test]
    fn test_restored_store_keeps_editing() {
        let (store, root) = populated();
        let mut restored = Store::from_snapshot(store.snapshot()).unwrap();
        restored
            .change_lines(
                root,
                &MultiLineChange {
                    start_line: 1,
                    start_col: 1,
                    end_line: 1,
                    end_col: 7,
                    inserted_text: "H".into(),
                    line_text: "H".into(),
                },
            )
            .unwrap();
        assert!(restored.get_text(root).unwrap().starts_with("H\n"));
    }

    #[test]
    fn test_restore_rejects_orphan_version() {
        let (store, _) = populated();
        let mut snapshot = store.snapshot();
        let mut stray = snapshot.versions[0].clone();
        stray.line = LineId::new();
        snapshot.versions.push(stray);
        assert!(matches!(
            Store::from_snapshot(snapshot),
            Err(HistoryError::Storage(_))
        ));
    }

    #[test]
    fn test_restore_rejects_stale_clock() {
        let (store, _) = populated();
        let mut snapshot = store.snapshot();
        snapshot.clock = Stamp::new(1);
        assert!(matches!(
            Store::from_snapshot(snapshot),
            Err(HistoryError::Storage(_))
        ));
    }

    #[test]
    fn test_restore_rejects_missing_root() {
        let (store, root) = populated();
        let mut snapshot = store.snapshot();
        snapshot.blocks.retain(|b| b.id != root);
        snapshot.block_lines.retain(|m| m.block != root);
        assert!(matches!(
            Store::from_snapshot(snapshot),
            Err(HistoryError::Storage(_))
        ));
    }

    #[test]
    fn test_restore_rejects_unknown_membership() {
        let (store, _) = populated();
        let mut snapshot = store.snapshot();
        snapshot.block_lines.push(BlockLineRecord {
            block: BlockId::new(FileId::new(), 9),
            line: snapshot.lines[0].id,
        });
        assert!(matches!(
            Store::from_snapshot(snapshot),
            Err(HistoryError::Storage(_))
        ));
    }
}
