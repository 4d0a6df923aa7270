//! The version store.
//!
//! Arena-based: files, lines, blocks and tags live in id-keyed maps, and
//! line↔block membership is an index table — relationships are ids, never
//! hard references, so the cyclic line/block graph has no ownership cycles.
//! Every mutation allocates its stamps from the store's clock, which makes
//! the order of operations the total order of the history. Reads are pure
//! functions of (claimed lines, block stamp).

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use tracing::{debug, warn};

use palimpsest_types::{
    BlockId, BlockInfo, BlockKind, Eol, FileId, LineId, MultiLineChange, Stamp, TagId, TagInfo,
    VersionKind,
};

use crate::block::Block;
use crate::clock::Clock;
use crate::edit::{ChangeShape, split_on_eol};
use crate::error::{HistoryError, Result};
use crate::file::File;
use crate::line::{Line, LineParams};
use crate::order::OrderKey;
use crate::tag::Tag;
use crate::timeline::{Timeline, TimelineEntry, resolve_snap};
use crate::version::Version;

/// Circuit breaker for block-tree walks, far above any real nesting.
pub const MAX_BLOCK_TREE: usize = 4096;

/// The versioning core's single mutable state.
pub struct Store {
    pub(crate) files: BTreeMap<FileId, File>,
    pub(crate) lines: BTreeMap<LineId, Line>,
    pub(crate) blocks: BTreeMap<BlockId, Block>,
    pub(crate) tags: BTreeMap<TagId, Tag>,
    /// line → blocks claiming it; the reverse of each block's claim set.
    pub(crate) line_blocks: HashMap<LineId, HashSet<BlockId>>,
    pub(crate) clock: Clock,
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            files: BTreeMap::new(),
            lines: BTreeMap::new(),
            blocks: BTreeMap::new(),
            tags: BTreeMap::new(),
            line_blocks: HashMap::new(),
            clock: Clock::new(),
        }
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn file(&self, id: FileId) -> Result<&File> {
        self.files.get(&id).ok_or(HistoryError::FileNotFound(id))
    }

    pub fn line(&self, id: LineId) -> Result<&Line> {
        self.lines.get(&id).ok_or(HistoryError::LineNotFound(id))
    }

    /// A live (non-deleted) block.
    pub fn block(&self, id: BlockId) -> Result<&Block> {
        self.blocks
            .get(&id)
            .filter(|b| !b.is_deleted())
            .ok_or(HistoryError::BlockNotFound(id))
    }

    pub fn tag(&self, id: TagId) -> Result<&Tag> {
        self.tags.get(&id).ok_or(HistoryError::TagNotFound(id))
    }

    /// The most recently allocated stamp.
    pub fn last_stamp(&self) -> Stamp {
        self.clock.last()
    }

    fn file_mut(&mut self, id: FileId) -> Result<&mut File> {
        self.files.get_mut(&id).ok_or(HistoryError::FileNotFound(id))
    }

    fn line_mut(&mut self, id: LineId) -> Result<&mut Line> {
        self.lines.get_mut(&id).ok_or(HistoryError::LineNotFound(id))
    }

    fn block_mut(&mut self, id: BlockId) -> Result<&mut Block> {
        self.blocks.get_mut(&id).ok_or(HistoryError::BlockNotFound(id))
    }

    // =========================================================================
    // View rules
    // =========================================================================

    /// Fork isolation: versions written through a clone block exist only for
    /// that clone (or for readers that pass it in a clones-to-consider set).
    fn version_visible_to(&self, version: &Version, viewer: BlockId) -> bool {
        match version.source_block {
            Some(source) if source != viewer => {
                !self.blocks.get(&source).is_some_and(|b| b.kind().is_clone())
            }
            _ => true,
        }
    }

    /// The head of `line` as `viewer` sees it at its current stamp.
    fn view_head<'a>(&'a self, line: &'a Line, viewer: &Block) -> &'a Version {
        line.head_at_filtered(viewer.stamp(), |v| self.version_visible_to(v, viewer.id()))
    }

    /// The block's claimed lines that are active in its current view, in
    /// file order.
    fn active_line_ids(&self, block: &Block) -> Result<Vec<LineId>> {
        let file = self.file(block.file())?;
        let mut out = Vec::new();
        for &line_id in file.line_ids() {
            if !block.claims(line_id) {
                continue;
            }
            let line = self.line(line_id)?;
            if self.view_head(line, block).active {
                out.push(line_id);
            }
        }
        Ok(out)
    }

    // =========================================================================
    // File import
    // =========================================================================

    /// Import a file: one line per eol-separated segment, each with a single
    /// imported version, all claimed by a fresh root block whose cursor
    /// starts at the last import stamp.
    pub fn load_file(&mut self, path: &str, eol: Eol, content: &str) -> FileId {
        let file_id = FileId::new();
        let mut file = File::new(file_id, path, eol);
        let root_id = file.root();
        let mut root = Block::new(root_id, BlockKind::Root, file_id, Stamp::ZERO);

        let mut prev_key: Option<OrderKey> = None;
        for text in split_on_eol(content, eol) {
            let line_id = LineId::new();
            let key = OrderKey::between(prev_key.as_ref(), None);
            let stamp = self.clock.next();
            self.lines
                .insert(line_id, Line::imported(line_id, file_id, key.clone(), stamp, text));
            file.push_line(line_id);
            root.claim(line_id);
            self.line_blocks.entry(line_id).or_default().insert(root_id);
            prev_key = Some(key);
        }

        root.set_stamp(self.clock.last());
        debug!(file = %file_id, path, lines = file.line_ids().len(), "imported file");
        self.blocks.insert(root_id, root);
        self.files.insert(file_id, file);
        file_id
    }

    /// The whole-file block created at import.
    pub fn root_block(&self, file_id: FileId) -> Result<BlockId> {
        self.file(file_id).map(File::root)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// The block's text at its current stamp: active line contents joined
    /// with the file eol.
    pub fn get_text(&self, block_id: BlockId) -> Result<String> {
        self.get_text_with_clones(block_id, &[])
    }

    /// Like [`get_text`](Self::get_text), but any listed clone forked from
    /// this block overrides the heads of the lines it claims.
    pub fn get_text_with_clones(&self, block_id: BlockId, clones: &[BlockId]) -> Result<String> {
        let block = self.block(block_id)?;
        let overlay = clones
            .iter()
            .filter_map(|id| self.blocks.get(id))
            .find(|c| !c.is_deleted() && c.kind().is_clone() && c.origin() == Some(block_id));

        let file = self.file(block.file())?;
        let mut parts: Vec<&str> = Vec::new();
        for &line_id in file.line_ids() {
            if !block.claims(line_id) {
                continue;
            }
            let line = self.line(line_id)?;
            let viewer = match overlay {
                Some(clone) if clone.claims(line_id) => clone,
                _ => block,
            };
            let head = self.view_head(line, viewer);
            if head.active {
                parts.push(&head.content);
            }
        }
        Ok(parts.join(file.eol().as_str()))
    }

    /// Number of lines visible in the block's current view.
    pub fn get_active_line_count(&self, block_id: BlockId) -> Result<usize> {
        let block = self.block(block_id)?;
        Ok(self.active_line_ids(block)?.len())
    }

    /// The block's visible lines, in order (test and surface helper).
    pub fn active_lines(&self, block_id: BlockId) -> Result<Vec<LineId>> {
        let block = self.block(block_id)?;
        self.active_line_ids(block)
    }

    // =========================================================================
    // Edits
    // =========================================================================

    /// Move the editing block's cursor to `stamp`, and bubble up the parent
    /// chain so enclosing regions keep showing the latest state. Clone edits
    /// move only the clone — the fork never drags the original forward.
    fn advance_cursors(&mut self, block_id: BlockId, stamp: Stamp) -> Result<()> {
        let editing_is_clone = self.block(block_id)?.kind().is_clone();
        let mut current = Some(block_id);
        let mut hops = 0;
        while let Some(id) = current {
            hops += 1;
            if hops > MAX_BLOCK_TREE {
                warn!("advance_cursors hit MAX_BLOCK_TREE ({MAX_BLOCK_TREE}), truncating walk");
                break;
            }
            let block = self.block_mut(id)?;
            block.set_stamp(stamp);
            if editing_is_clone {
                break;
            }
            current = block.parent();
        }
        Ok(())
    }

    /// Insert a new line at 1-based position `n` of the block's view
    /// (`n == count + 1` appends).
    ///
    /// The line is born hidden: a pre-insertion placeholder at `t`, the
    /// visible content at `t+1`. Every block claiming either neighbor claims
    /// the newcomer too; sibling cursors park on the placeholder — the line
    /// stays hidden for them until they scrub one step forward — while the
    /// editing block (and its ancestors) land on the visible insertion.
    pub fn insert_line_at(&mut self, block_id: BlockId, n: usize, content: &str) -> Result<LineId> {
        let block = self.block(block_id)?;
        let editing_is_clone = block.kind().is_clone();
        let file_id = block.file();
        let active = self.active_line_ids(block)?;
        if n == 0 || n > active.len() + 1 {
            return Err(HistoryError::line_out_of_range(n, active.len()));
        }
        let prev = n.checked_sub(2).map(|i| active[i]);
        let next = active.get(n - 1).copied();

        // Place the newcomer immediately after its predecessor when it has
        // one, else immediately before its successor; hidden lines between
        // the two stay after the insertion point.
        let file = self.file(file_id)?;
        let (index, low, high) = match (prev, next) {
            (Some(p), _) => {
                let pos = file
                    .position_of(p)
                    .ok_or_else(|| HistoryError::invariant(format!("line {p} missing from file list")))?;
                let high = file.line_ids().get(pos + 1).copied();
                (pos + 1, Some(p), high)
            }
            (None, Some(nx)) => {
                let pos = file
                    .position_of(nx)
                    .ok_or_else(|| HistoryError::invariant(format!("line {nx} missing from file list")))?;
                let low = pos.checked_sub(1).map(|i| file.line_ids()[i]);
                (pos, low, Some(nx))
            }
            (None, None) => (file.line_ids().len(), file.line_ids().last().copied(), None),
        };
        let order = OrderKey::between(
            low.and_then(|id| self.lines.get(&id)).map(Line::order),
            high.and_then(|id| self.lines.get(&id)).map(Line::order),
        );

        // Claim propagation: whoever claims a neighbor claims the newcomer.
        let root = file.root();
        let mut claimers: HashSet<BlockId> = HashSet::new();
        for neighbor in [prev, next].into_iter().flatten() {
            if let Some(owners) = self.line_blocks.get(&neighbor) {
                claimers.extend(owners.iter().copied());
            }
        }
        claimers.insert(block_id);
        claimers.insert(root);
        claimers.retain(|id| self.blocks.get(id).is_some_and(|b| !b.is_deleted()));

        let pre = self.clock.next();
        let ins = self.clock.next();
        let line_id = LineId::new();
        let line = Line::inserted(
            LineParams { id: line_id, file: file_id, order },
            Version::pre_insertion(line_id, pre, block_id),
            Version::insertion(line_id, ins, content, block_id),
        );
        self.lines.insert(line_id, line);
        self.file_mut(file_id)?.insert_line_at_index(index, line_id);
        for &claimer in &claimers {
            self.block_mut(claimer)?.claim(line_id);
        }
        if !editing_is_clone {
            // Park sibling claimers on the placeholder; a clone's insert
            // stays invisible to them instead.
            for &claimer in &claimers {
                if claimer == block_id {
                    continue;
                }
                let sibling = self.block_mut(claimer)?;
                if !sibling.kind().is_clone() && sibling.stamp() < pre {
                    sibling.set_stamp(pre);
                }
            }
        }
        self.line_blocks.entry(line_id).or_default().extend(claimers);
        self.advance_cursors(block_id, ins)?;

        debug!(block = %block_id, line = %line_id, position = n, "inserted line");
        Ok(line_id)
    }

    /// Replace the content of the line at 1-based position `n` of the
    /// block's view.
    pub fn update_line(&mut self, block_id: BlockId, n: usize, content: &str) -> Result<LineId> {
        let block = self.block(block_id)?;
        let active = self.active_line_ids(block)?;
        if n == 0 || n > active.len() {
            return Err(HistoryError::line_out_of_range(n, active.len()));
        }
        let line_id = active[n - 1];
        let origin = if block.kind().is_clone() {
            Some(self.view_head(self.line(line_id)?, block).stamp)
        } else {
            None
        };

        let stamp = self.clock.next();
        let version = match origin {
            Some(origin) => Version::clone_edit(line_id, stamp, content, origin, block_id),
            None => Version::change(line_id, stamp, content, block_id),
        };
        self.line_mut(line_id)?.append(version)?;
        self.advance_cursors(block_id, stamp)?;
        debug!(block = %block_id, line = %line_id, "updated line");
        Ok(line_id)
    }

    /// Apply a multi-line replacement reported by the editor buffer.
    ///
    /// Classifies the change, then writes deletions for surplus existing
    /// lines, changes for paired lines, and fresh lines for surplus new
    /// content. Returns every live block claiming a touched line, for
    /// decoration refresh.
    pub fn change_lines(
        &mut self,
        block_id: BlockId,
        change: &MultiLineChange,
    ) -> Result<Vec<BlockId>> {
        let block = self.block(block_id)?;
        let eol = self.file(block.file())?.eol();
        let active = self.active_line_ids(block)?;
        if change.start_line == 0 || change.end_line < change.start_line {
            return Err(HistoryError::line_out_of_range(change.start_line, active.len()));
        }

        let start_line_text = change
            .start_line
            .checked_sub(1)
            .and_then(|i| active.get(i))
            .and_then(|id| self.lines.get(id))
            .map(|line| self.view_head(line, block).content.clone())
            .unwrap_or_default();
        let shape = ChangeShape::classify(change, &start_line_text, eol);
        debug!(block = %block_id, ?shape, "classified change");

        let mut modified = split_on_eol(&change.line_text, eol);
        let mut start = change.start_line;
        let mut end = change.end_line;
        if shape.push_start_line_up {
            modified.remove(0);
            start += 1;
        } else if shape.push_start_line_down {
            modified.pop();
            end = end.saturating_sub(1);
        }

        // Existing lines in the adjusted range; empty for pure push inserts.
        let vcs_lines: Vec<LineId> = if start <= end {
            active
                .iter()
                .skip(start - 1)
                .take(end + 1 - start)
                .copied()
                .collect()
        } else {
            Vec::new()
        };

        let is_clone = block.kind().is_clone();
        let origins: Vec<Stamp> = if is_clone {
            vcs_lines
                .iter()
                .filter_map(|id| self.lines.get(id))
                .map(|line| self.view_head(line, block).stamp)
                .collect()
        } else {
            Vec::new()
        };

        let mut touched: Vec<LineId> = vcs_lines.clone();
        let mut wrote = false;

        for &line_id in vcs_lines.iter().skip(modified.len()) {
            let stamp = self.clock.next();
            self.line_mut(line_id)?
                .append(Version::deletion(line_id, stamp, block_id))?;
            wrote = true;
        }

        for (i, &line_id) in vcs_lines.iter().enumerate().take(modified.len()) {
            let stamp = self.clock.next();
            let version = if is_clone {
                Version::clone_edit(line_id, stamp, modified[i].as_str(), origins[i], block_id)
            } else {
                Version::change(line_id, stamp, modified[i].as_str(), block_id)
            };
            self.line_mut(line_id)?.append(version)?;
            wrote = true;
        }

        if wrote {
            let last = self.clock.last();
            self.advance_cursors(block_id, last)?;
        }

        for (j, content) in modified.iter().enumerate().skip(vcs_lines.len()) {
            touched.push(self.insert_line_at(block_id, start + j, content)?);
        }

        let mut affected: BTreeSet<BlockId> = BTreeSet::new();
        for line_id in touched {
            if let Some(owners) = self.line_blocks.get(&line_id) {
                affected.extend(
                    owners
                        .iter()
                        .copied()
                        .filter(|id| self.blocks.get(id).is_some_and(|b| !b.is_deleted())),
                );
            }
        }
        debug!(block = %block_id, affected = affected.len(), "applied multi-line change");
        Ok(affected.into_iter().collect())
    }

    // =========================================================================
    // Block hierarchy
    // =========================================================================

    /// Carve a child region out of 1-based inclusive `start..=end` of the
    /// block's current view. Rejects ranges overlapping a live inline
    /// sibling.
    pub fn create_child(&mut self, block_id: BlockId, start: usize, end: usize) -> Result<BlockId> {
        let block = self.block(block_id)?;
        let active = self.active_line_ids(block)?;
        if start == 0 || end < start || end > active.len() {
            return Err(HistoryError::line_out_of_range(end.max(start), active.len()));
        }
        let claim = active[start - 1..=end - 1].to_vec();

        for &sibling_id in block.children() {
            let Some(sibling) = self.blocks.get(&sibling_id) else { continue };
            if sibling.is_deleted() || sibling.kind() != BlockKind::Inline {
                continue;
            }
            if claim.iter().any(|&l| sibling.claims(l)) {
                return Err(HistoryError::RangeOverlap { start, end, sibling: sibling_id });
            }
        }

        let file_id = block.file();
        let stamp = block.stamp();
        let child_id = self.file_mut(file_id)?.next_block_id();
        let mut child = Block::new(child_id, BlockKind::Inline, file_id, stamp).with_parent(block_id);
        for &line_id in &claim {
            child.claim(line_id);
            self.line_blocks.entry(line_id).or_default().insert(child_id);
        }
        self.blocks.insert(child_id, child);
        self.block_mut(block_id)?.push_child(child_id);
        debug!(parent = %block_id, child = %child_id, start, end, "created child block");
        Ok(child_id)
    }

    /// Fork the block: a clone claiming the same lines, cursor at the
    /// newest head currently in scope, carrying its own edits from here on.
    pub fn copy_block(&mut self, block_id: BlockId) -> Result<BlockId> {
        let block = self.block(block_id)?;
        let file_id = block.file();
        let stamp = block
            .lines()
            .iter()
            .filter_map(|id| self.lines.get(id))
            .map(|line| self.view_head(line, block).stamp)
            .max()
            .unwrap_or_else(|| block.stamp());
        let parent = block.parent();
        let claim: Vec<LineId> = block.lines().iter().copied().collect();

        let clone_id = self.file_mut(file_id)?.next_block_id();
        let mut clone = Block::new(clone_id, BlockKind::Clone, file_id, stamp).with_origin(block_id);
        clone.set_parent(parent);
        for &line_id in &claim {
            clone.claim(line_id);
            self.line_blocks.entry(line_id).or_default().insert(clone_id);
        }
        self.blocks.insert(clone_id, clone);
        debug!(origin = %block_id, clone = %clone_id, "forked block");
        Ok(clone_id)
    }

    /// Delete a block and, recursively, its children. Claimed lines are
    /// untouched; the record stays as a tombstone so references resolve.
    pub fn delete_block(&mut self, block_id: BlockId) -> Result<()> {
        let block = self.block(block_id)?;
        if block.kind().is_root() {
            return Err(HistoryError::invariant("root block cannot be deleted"));
        }
        let parent = block.parent();

        let mut doomed = Vec::new();
        let mut queue = vec![block_id];
        let mut seen: HashSet<BlockId> = HashSet::new();
        while let Some(id) = queue.pop() {
            if !seen.insert(id) {
                continue;
            }
            if seen.len() > MAX_BLOCK_TREE {
                warn!("delete_block hit MAX_BLOCK_TREE ({MAX_BLOCK_TREE}), truncating walk");
                break;
            }
            doomed.push(id);
            if let Some(b) = self.blocks.get(&id) {
                queue.extend(b.children().iter().copied());
            }
        }
        for id in doomed {
            self.block_mut(id)?.mark_deleted();
        }
        if let Some(parent_id) = parent
            && let Ok(parent) = self.block_mut(parent_id)
        {
            parent.remove_child(block_id);
        }
        debug!(block = %block_id, "deleted block");
        Ok(())
    }

    // =========================================================================
    // Timeline
    // =========================================================================

    /// The block's scrub steps: changes, deletions and pre-insertion
    /// placeholders on its claimed lines, plus the newest imported version
    /// as the single "original" anchor. Foreign clone edits are invisible;
    /// a clone's own edits are steps on its own timeline.
    pub fn timeline(&self, block_id: BlockId) -> Result<Timeline> {
        let block = self.block(block_id)?;
        let mut entries: Vec<TimelineEntry> = Vec::new();
        let mut anchor: Option<TimelineEntry> = None;

        for &line_id in block.lines() {
            let line = self.line(line_id)?;
            let versions = line.versions();
            for (i, version) in versions.iter().enumerate() {
                if !self.version_visible_to(version, block_id) {
                    continue;
                }
                let entry = TimelineEntry {
                    line: line_id,
                    stamp: version.stamp,
                    kind: version.kind,
                    successor: versions.get(i + 1).map(|v| v.stamp),
                };
                match version.kind {
                    VersionKind::Imported => {
                        if anchor.as_ref().is_none_or(|a| entry.stamp > a.stamp) {
                            anchor = Some(entry);
                        }
                    }
                    // an insertion is represented by its placeholder
                    VersionKind::Insertion => {}
                    _ => entries.push(entry),
                }
            }
        }
        if let Some(anchor) = anchor {
            entries.push(anchor);
        }
        Ok(Timeline::from_entries(entries))
    }

    /// The scrubber position: rank of the block's cursor on the timeline.
    /// An insertion head ranks at its pre-insertion placeholder, both while
    /// the placeholder is engaged (cursor on it, line hidden) and after the
    /// reveal one stamp later.
    pub fn current_index(&self, block_id: BlockId) -> Result<usize> {
        let block = self.block(block_id)?;
        let timeline = self.timeline(block_id)?;
        if timeline.is_empty() {
            return Err(HistoryError::invariant(format!(
                "block {block_id} has no positionable version"
            )));
        }
        Ok(timeline.rank_at_or_before(block.stamp()))
    }

    /// Scrubber step count shown to the user: every visible version is a
    /// step, with the whole import collapsed into one.
    pub fn user_version_count(&self, block_id: BlockId) -> Result<usize> {
        let block = self.block(block_id)?;
        let mut total = 0usize;
        let mut imported = 0usize;
        for &line_id in block.lines() {
            for version in self.line(line_id)?.versions() {
                if !self.version_visible_to(version, block_id) {
                    continue;
                }
                total += 1;
                if version.kind == VersionKind::Imported {
                    imported += 1;
                }
            }
        }
        Ok(total - imported + usize::from(imported > 0))
    }

    /// Snap the block to timeline step `index` (see the snap rules on
    /// [`Timeline`]) and move its cursor there.
    pub fn apply_index(&mut self, block_id: BlockId, index: usize) -> Result<()> {
        let timeline = self.timeline(block_id)?;
        let block = self.block(block_id)?;
        let current = timeline.rank_at_or_before(block.stamp());
        let target = resolve_snap(&timeline, index, current, |line_id| {
            self.lines
                .get(&line_id)
                .is_some_and(|line| !self.view_head(line, block).active)
        })?;
        self.block_mut(block_id)?.set_stamp(target);
        debug!(block = %block_id, index, stamp = %target, "applied timeline index");
        Ok(())
    }

    /// Move the block's cursor to an arbitrary stamp. Reads re-derive
    /// content from the line histories; nothing is rewritten.
    pub fn apply_timestamp(&mut self, block_id: BlockId, stamp: Stamp) -> Result<()> {
        self.block(block_id)?;
        self.block_mut(block_id)?.set_stamp(stamp);
        Ok(())
    }

    // =========================================================================
    // Info
    // =========================================================================

    /// Freeze the block into its surface read model.
    pub fn block_info(&self, block_id: BlockId) -> Result<BlockInfo> {
        let block = self.block(block_id)?;
        Ok(BlockInfo {
            id: block_id,
            kind: block.kind(),
            range_in_parent: self.range_in_parent(block)?,
            user_version_count: self.user_version_count(block_id)?,
            current_version_index: self.current_index(block_id)?,
            tags: self.tags_for(block_id),
        })
    }

    /// Info for the block's live children, creation order.
    pub fn children_info(&self, block_id: BlockId) -> Result<Vec<BlockInfo>> {
        let block = self.block(block_id)?;
        block
            .children()
            .iter()
            .copied()
            .filter(|id| self.blocks.get(id).is_some_and(|b| !b.is_deleted()))
            .map(|id| self.block_info(id))
            .collect()
    }

    /// 1-based inclusive span of the block's lines within its parent's
    /// current view. The root spans its whole file.
    fn range_in_parent(&self, block: &Block) -> Result<Option<(usize, usize)>> {
        if block.kind().is_root() {
            let count = self.active_line_ids(block)?.len();
            return Ok((count > 0).then_some((1, count)));
        }
        let Some(parent_id) = block.parent() else {
            return Ok(None);
        };
        let Some(parent) = self.blocks.get(&parent_id) else {
            return Ok(None);
        };
        let mut first = None;
        let mut last = None;
        for (i, &line_id) in self.active_line_ids(parent)?.iter().enumerate() {
            if block.claims(line_id) {
                first.get_or_insert(i + 1);
                last = Some(i + 1);
            }
        }
        Ok(first.zip(last))
    }

    fn tags_for(&self, block_id: BlockId) -> Vec<TagInfo> {
        // TagIds are time-ordered, so map order is creation order.
        self.tags
            .values()
            .filter(|t| t.block() == block_id)
            .map(Tag::info)
            .collect()
    }

    // =========================================================================
    // Tags
    // =========================================================================

    /// Capture the block's current position and text under a name.
    pub fn create_tag(&mut self, block_id: BlockId, name: &str) -> Result<TagId> {
        let code = self.get_text(block_id)?;
        let stamp = self.block(block_id)?.stamp();
        let tag_id = TagId::new();
        self.tags.insert(tag_id, Tag::new(tag_id, block_id, name, stamp, code));
        debug!(block = %block_id, tag = %tag_id, name, "created tag");
        Ok(tag_id)
    }

    /// Reopen a tagged state: move the block's cursor to the captured stamp
    /// and return the text there.
    pub fn load_tag(&mut self, tag_id: TagId) -> Result<String> {
        let tag = self.tag(tag_id)?;
        let (block_id, stamp) = (tag.block(), tag.stamp());
        self.block(block_id)?;
        self.block_mut(block_id)?.set_stamp(stamp);
        self.get_text(block_id)
    }

    /// Peek at a tagged state without disturbing the block: capture the
    /// cursor, load the tag, render, restore.
    pub fn text_for_tag(&mut self, tag_id: TagId) -> Result<String> {
        let block_id = self.tag(tag_id)?.block();
        let saved = self.block(block_id)?.stamp();
        let text = self.load_tag(tag_id)?;
        self.block_mut(block_id)?.set_stamp(saved);
        Ok(text)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
