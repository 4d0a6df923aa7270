//! The session facade consumed by the editor surface.
//!
//! All ids cross this boundary as opaque strings; ranges are 1-based and
//! inclusive. The facade parses, validates, and delegates to the store —
//! malformed or unknown ids are errors with no state change.

use tracing::debug;

use palimpsest_types::{BlockId, BlockInfo, Eol, FileId, MultiLineChange, Stamp, TagId};

use crate::error::{HistoryError, Result};
use crate::store::Store;

/// One editor's connection to the versioning core.
#[derive(Default)]
pub struct Session {
    store: Store,
}

impl Session {
    pub fn new() -> Self {
        Self { store: Store::new() }
    }

    /// The underlying store, for embedders that want typed access.
    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    // ── Id parsing ──────────────────────────────────────────────────────

    fn parse_file(id: &str) -> Result<FileId> {
        FileId::parse(id).map_err(|_| HistoryError::MalformedId(id.to_string()))
    }

    fn parse_block(id: &str) -> Result<BlockId> {
        BlockId::from_key(id).ok_or_else(|| HistoryError::MalformedId(id.to_string()))
    }

    fn parse_tag(id: &str) -> Result<TagId> {
        TagId::parse(id).map_err(|_| HistoryError::MalformedId(id.to_string()))
    }

    // ── Files ───────────────────────────────────────────────────────────

    /// Import a file; returns its id. `eol` is either the literal marker
    /// (`"\n"` / `"\r\n"`) or its name (`"lf"` / `"crlf"`).
    pub fn load_file(&mut self, path: &str, eol: &str, content: &str) -> Result<String> {
        let eol = Eol::from_str(eol).ok_or_else(|| HistoryError::UnsupportedEol(eol.to_string()))?;
        let file_id = self.store.load_file(path, eol, content);
        debug!(file = %file_id, path, "session loaded file");
        Ok(file_id.to_string())
    }

    pub fn get_root_block(&self, file_id: &str) -> Result<String> {
        let file = Self::parse_file(file_id)?;
        Ok(self.store.root_block(file)?.to_key())
    }

    // ── Reads ───────────────────────────────────────────────────────────

    pub fn get_text(&self, block_id: &str) -> Result<String> {
        self.store.get_text(Self::parse_block(block_id)?)
    }

    /// Text with the listed clones overriding the lines they claim.
    pub fn get_text_with_clones(&self, block_id: &str, clones_to_consider: &[String]) -> Result<String> {
        let block = Self::parse_block(block_id)?;
        let clones = clones_to_consider
            .iter()
            .map(|id| Self::parse_block(id))
            .collect::<Result<Vec<_>>>()?;
        self.store.get_text_with_clones(block, &clones)
    }

    pub fn get_block_info(&self, block_id: &str) -> Result<BlockInfo> {
        self.store.block_info(Self::parse_block(block_id)?)
    }

    pub fn get_children_info(&self, block_id: &str) -> Result<Vec<BlockInfo>> {
        self.store.children_info(Self::parse_block(block_id)?)
    }

    // ── Edits ───────────────────────────────────────────────────────────

    /// Apply a buffer change; returns the ids of every block that needs a
    /// decoration refresh.
    pub fn change_lines(&mut self, block_id: &str, change: &MultiLineChange) -> Result<Vec<String>> {
        let affected = self.store.change_lines(Self::parse_block(block_id)?, change)?;
        Ok(affected.into_iter().map(|id| id.to_key()).collect())
    }

    // ── Blocks ──────────────────────────────────────────────────────────

    /// Carve a child region; `None` when the range overlaps a sibling.
    pub fn create_child(
        &mut self,
        block_id: &str,
        start_line: usize,
        end_line: usize,
    ) -> Result<Option<String>> {
        let block = Self::parse_block(block_id)?;
        match self.store.create_child(block, start_line, end_line) {
            Ok(child) => Ok(Some(child.to_key())),
            Err(HistoryError::RangeOverlap { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub fn delete_block(&mut self, block_id: &str) -> Result<()> {
        self.store.delete_block(Self::parse_block(block_id)?)
    }

    /// Fork a block; returns the clone's id.
    pub fn copy_block(&mut self, block_id: &str) -> Result<String> {
        Ok(self.store.copy_block(Self::parse_block(block_id)?)?.to_key())
    }

    // ── Scrubbing ───────────────────────────────────────────────────────

    pub fn apply_index(&mut self, block_id: &str, index: usize) -> Result<()> {
        self.store.apply_index(Self::parse_block(block_id)?, index)
    }

    pub fn apply_timestamp(&mut self, block_id: &str, stamp: u64) -> Result<()> {
        self.store
            .apply_timestamp(Self::parse_block(block_id)?, Stamp::new(stamp))
    }

    // ── Tags ────────────────────────────────────────────────────────────

    pub fn create_tag(&mut self, block_id: &str, name: &str) -> Result<String> {
        Ok(self
            .store
            .create_tag(Self::parse_block(block_id)?, name)?
            .to_string())
    }

    /// Reopen a tagged state and return its text.
    pub fn load_tag(&mut self, tag_id: &str) -> Result<String> {
        self.store.load_tag(Self::parse_tag(tag_id)?)
    }

    /// Peek at a tagged state without disturbing the block.
    pub fn get_text_for_version(&mut self, tag_id: &str) -> Result<String> {
        self.store.text_for_tag(Self::parse_tag(tag_id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_ids_are_rejected() {
        let mut session = Session::new();
        assert!(matches!(
            session.get_text("not-a-block"),
            Err(HistoryError::MalformedId(_))
        ));
        assert!(matches!(
            session.get_root_block("nope"),
            Err(HistoryError::MalformedId(_))
        ));
        assert!(matches!(
            session.load_tag("nope"),
            Err(HistoryError::MalformedId(_))
        ));
        assert!(matches!(
            session.load_file("/a", "\r", "x"),
            Err(HistoryError::UnsupportedEol(_))
        ));
    }

    #[test]
    fn test_ids_survive_the_string_boundary() {
        let mut session = Session::new();
        let file = session.load_file("/a.rs", "\n", "one\ntwo").unwrap();
        let root = session.get_root_block(&file).unwrap();
        assert_eq!(session.get_text(&root).unwrap(), "one\ntwo");

        let child = session.create_child(&root, 1, 1).unwrap().unwrap();
        assert_eq!(session.get_text(&child).unwrap(), "one");

        let tag = session.create_tag(&child, "first").unwrap();
        assert_eq!(session.load_tag(&tag).unwrap(), "one");
    }

    #[test]
    fn test_create_child_overlap_returns_none() {
        let mut session = Session::new();
        let file = session.load_file("/a.rs", "lf", "a\nb\nc").unwrap();
        let root = session.get_root_block(&file).unwrap();
        assert!(session.create_child(&root, 2, 3).unwrap().is_some());
        assert!(session.create_child(&root, 1, 2).unwrap().is_none());
        // out-of-bounds is still an error, not a silent None
        assert!(session.create_child(&root, 1, 9).is_err());
    }
}
