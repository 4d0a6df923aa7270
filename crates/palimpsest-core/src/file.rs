//! Files: an eol marker plus the ordered line list.

use palimpsest_types::{BlockId, Eol, FileId, LineId};

/// A loaded file: identity, eol convention, and the ordered line list.
///
/// The list holds every line ever born into the file, hidden ones
/// included, sorted by their order keys. Content and activeness live on the
/// lines themselves.
#[derive(Clone, Debug)]
pub struct File {
    id: FileId,
    path: String,
    eol: Eol,
    root: BlockId,
    lines: Vec<LineId>,
    next_block_seq: u64,
}

impl File {
    pub(crate) fn new(id: FileId, path: impl Into<String>, eol: Eol) -> Self {
        Self {
            id,
            path: path.into(),
            eol,
            root: BlockId::root_of(id),
            lines: Vec::new(),
            // 0 is the root block
            next_block_seq: 1,
        }
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn id(&self) -> FileId {
        self.id
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn eol(&self) -> Eol {
        self.eol
    }

    /// The whole-file root block.
    pub fn root(&self) -> BlockId {
        self.root
    }

    /// Every line ever born into this file, in order.
    pub fn line_ids(&self) -> &[LineId] {
        &self.lines
    }

    pub(crate) fn position_of(&self, id: LineId) -> Option<usize> {
        self.lines.iter().position(|&l| l == id)
    }

    // ── Mutation (store-internal) ───────────────────────────────────────

    pub(crate) fn next_block_id(&mut self) -> BlockId {
        let id = BlockId::new(self.id, self.next_block_seq);
        self.next_block_seq += 1;
        id
    }

    pub(crate) fn next_block_seq(&self) -> u64 {
        self.next_block_seq
    }

    pub(crate) fn set_next_block_seq(&mut self, seq: u64) {
        self.next_block_seq = seq;
    }

    pub(crate) fn push_line(&mut self, id: LineId) {
        self.lines.push(id);
    }

    pub(crate) fn insert_line_at_index(&mut self, index: usize, id: LineId) {
        self.lines.insert(index, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_seq_zero() {
        let file = File::new(FileId::new(), "/a.rs", Eol::Lf);
        assert!(file.root().is_root());
        assert_eq!(file.root().file, file.id());
    }

    #[test]
    fn test_block_ids_are_sequential() {
        let mut file = File::new(FileId::new(), "/a.rs", Eol::Lf);
        assert_eq!(file.next_block_id().seq, 1);
        assert_eq!(file.next_block_id().seq, 2);
    }

    #[test]
    fn test_line_positions() {
        let mut file = File::new(FileId::new(), "/a.rs", Eol::Lf);
        let (a, b, c) = (LineId::new(), LineId::new(), LineId::new());
        file.push_line(a);
        file.push_line(c);
        file.insert_line_at_index(1, b);
        assert_eq!(file.line_ids(), &[a, b, c]);
        assert_eq!(file.position_of(b), Some(1));
        assert_eq!(file.position_of(LineId::new()), None);
    }
}
