//! Block records: named regions with their own scrub cursor.

use std::collections::HashSet;

use palimpsest_types::{BlockId, BlockKind, FileId, LineId, Stamp};

/// A named region of a file with its own timestamp cursor.
///
/// One tagged record covers all three variants — whole-file root, nested
/// inline region, and clone fork — with kind-specific behavior branching on
/// [`BlockKind`] in the store. Deleted blocks are tombstoned so references
/// from versions and origins stay resolvable.
#[derive(Clone, Debug)]
pub struct Block {
    id: BlockId,
    kind: BlockKind,
    file: FileId,
    parent: Option<BlockId>,
    origin: Option<BlockId>,
    stamp: Stamp,
    lines: HashSet<LineId>,
    children: Vec<BlockId>,
    deleted: bool,
}

impl Block {
    pub(crate) fn new(id: BlockId, kind: BlockKind, file: FileId, stamp: Stamp) -> Self {
        Self {
            id,
            kind,
            file,
            parent: None,
            origin: None,
            stamp,
            lines: HashSet::new(),
            children: Vec::new(),
            deleted: false,
        }
    }

    pub(crate) fn with_parent(mut self, parent: BlockId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub(crate) fn with_origin(mut self, origin: BlockId) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Rehydrate from persisted parts. Claims are re-attached separately
    /// from the membership table.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore(
        id: BlockId,
        kind: BlockKind,
        file: FileId,
        parent: Option<BlockId>,
        origin: Option<BlockId>,
        stamp: Stamp,
        children: Vec<BlockId>,
        deleted: bool,
    ) -> Self {
        Self {
            id,
            kind,
            file,
            parent,
            origin,
            stamp,
            lines: HashSet::new(),
            children,
            deleted,
        }
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn file(&self) -> FileId {
        self.file
    }

    /// Enclosing block, for inline regions (and clones of nested blocks).
    pub fn parent(&self) -> Option<BlockId> {
        self.parent
    }

    /// The block this one was forked from, for clones.
    pub fn origin(&self) -> Option<BlockId> {
        self.origin
    }

    /// The scrub cursor: reads resolve every claimed line's head at this
    /// stamp.
    pub fn stamp(&self) -> Stamp {
        self.stamp
    }

    /// The claimed line set. Membership never shrinks — lines that become
    /// hidden stay claimed.
    pub fn lines(&self) -> &HashSet<LineId> {
        &self.lines
    }

    pub fn claims(&self, line: LineId) -> bool {
        self.lines.contains(&line)
    }

    /// Live and deleted child blocks, creation order.
    pub fn children(&self) -> &[BlockId] {
        &self.children
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    // ── Mutation (store-internal) ───────────────────────────────────────

    pub(crate) fn set_stamp(&mut self, stamp: Stamp) {
        self.stamp = stamp;
    }

    pub(crate) fn claim(&mut self, line: LineId) {
        self.lines.insert(line);
    }

    pub(crate) fn push_child(&mut self, child: BlockId) {
        self.children.push(child);
    }

    pub(crate) fn remove_child(&mut self, child: BlockId) {
        self.children.retain(|&c| c != child);
    }

    pub(crate) fn mark_deleted(&mut self) {
        self.deleted = true;
    }

    pub(crate) fn set_parent(&mut self, parent: Option<BlockId>) {
        self.parent = parent;
    }
}
