//! The ordered block list being edited.
//!
//! [`Document`] owns the blocks, the current selection and the id source.
//! Every edit is infallible: asking for a block that is not there leaves the
//! document untouched and reports `false` (or `None`).

use crate::block::{Block, BlockBody, BlockId, BlockKind};
use crate::brand::Brand;
use crate::codec::Decoded;
use crate::content::ContentPatch;
use crate::id::{IdSource, SequentialIds, ensure_unique_ids, fresh_id};
use crate::reorder::{KeyboardMove, ReorderTarget, array_move};

/// Ordered blocks plus selection.
///
/// Block ids are unique within a document at all times, and the selection,
/// when set, always names a block that exists.
#[derive(Clone, Debug)]
pub struct Document<I: IdSource = SequentialIds> {
    blocks: Vec<Block>,
    selected: Option<BlockId>,
    ids: I,
    brand: Brand,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Brand::default())
    }
}

impl Document {
    /// Empty document using `block-N` ids.
    pub fn new(brand: Brand) -> Self {
        Self::with_ids(brand, SequentialIds::new())
    }
}

impl<I: IdSource> Document<I> {
    pub fn with_ids(brand: Brand, ids: I) -> Self {
        Self {
            blocks: Vec::new(),
            selected: None,
            ids,
            brand,
        }
    }

    /// Adopt an existing block list. Duplicate ids are renamed.
    pub fn from_blocks(brand: Brand, mut ids: I, mut blocks: Vec<Block>) -> Self {
        let renamed = ensure_unique_ids(&mut blocks, &mut ids);
        if renamed > 0 {
            tracing::debug!(renamed, "renamed duplicate block ids");
        }
        Self {
            blocks,
            selected: None,
            ids,
            brand,
        }
    }

    /// Adopt the result of [`crate::codec::decode_document`].
    ///
    /// `ids` should be the same source the decode ran against.
    pub fn from_decoded(brand: Brand, ids: I, decoded: Decoded) -> Self {
        Self::from_blocks(brand, ids, decoded.blocks)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn brand(&self) -> &Brand {
        &self.brand
    }

    pub fn get(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == *id)
    }

    pub fn index_of(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == *id)
    }

    pub fn contains(&self, id: &BlockId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn selected(&self) -> Option<&BlockId> {
        self.selected.as_ref()
    }

    pub fn selected_block(&self) -> Option<&Block> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    fn next_free_id(&mut self) -> BlockId {
        let blocks = &self.blocks;
        fresh_id(&mut self.ids, |id| blocks.iter().any(|b| b.id == *id))
    }

    /// Append a block of `kind` with its default content and select it.
    pub fn add_block(&mut self, kind: BlockKind) -> BlockId {
        let id = self.next_free_id();
        let body = BlockBody::with_defaults(kind, &self.brand);
        tracing::debug!(%id, %kind, "added block");
        self.blocks.push(Block::new(id.clone(), body));
        self.selected = Some(id.clone());
        id
    }

    /// Remove a block. Clears the selection if it pointed at the removed block.
    pub fn delete_block(&mut self, id: &BlockId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        self.blocks.remove(index);
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        tracing::debug!(%id, "deleted block");
        true
    }

    /// Move a block to `new_index`, clamped to the last position.
    ///
    /// The relative order of every other block is preserved.
    pub fn reorder_block(&mut self, id: &BlockId, new_index: usize) -> bool {
        let Some(from) = self.index_of(id) else {
            return false;
        };
        let moved = array_move(&mut self.blocks, from, new_index);
        if moved {
            tracing::debug!(%id, from, to = new_index.min(self.blocks.len() - 1), "moved block");
        }
        moved
    }

    /// One keyboard step for block `id`.
    pub fn move_block(&mut self, id: &BlockId, direction: KeyboardMove) -> bool {
        let Some(current) = self.index_of(id) else {
            return false;
        };
        let to = direction.target_index(current, self.blocks.len());
        self.reorder_block(id, to)
    }

    pub fn move_block_up(&mut self, id: &BlockId) -> bool {
        self.move_block(id, KeyboardMove::Up)
    }

    pub fn move_block_down(&mut self, id: &BlockId) -> bool {
        self.move_block(id, KeyboardMove::Down)
    }

    /// Shallow-merge `patch` into the block's content.
    ///
    /// Returns whether the content actually changed. Keys the block kind has
    /// no use for are dropped.
    pub fn update_block_content(&mut self, id: &BlockId, patch: ContentPatch) -> bool {
        let Some(block) = self.blocks.iter_mut().find(|b| b.id == *id) else {
            return false;
        };
        let before = block.body.clone();
        let ignored = block.body.apply_patch(patch);
        if !ignored.is_empty() {
            tracing::debug!(%id, kind = block.body.type_name(), ?ignored, "ignored patch keys");
        }
        block.body != before
    }

    /// Change the selection.
    ///
    /// `None` clears it. An id that is not in the document leaves the
    /// selection as it was. Returns whether the selection changed.
    pub fn select_block(&mut self, id: Option<&BlockId>) -> bool {
        match id {
            Some(id) if !self.contains(id) => false,
            _ => {
                let next = id.cloned();
                if self.selected == next {
                    return false;
                }
                self.selected = next;
                true
            }
        }
    }

    /// Copy a block, insert the copy right after it and select the copy.
    pub fn duplicate_block(&mut self, id: &BlockId) -> Option<BlockId> {
        let index = self.index_of(id)?;
        let body = self.blocks[index].body.clone();
        let copy = self.next_free_id();
        self.blocks.insert(index + 1, Block::new(copy.clone(), body));
        self.selected = Some(copy.clone());
        tracing::debug!(source = %id, %copy, "duplicated block");
        Some(copy)
    }

    /// Remove every block and the selection. Returns whether there was
    /// anything to remove.
    pub fn clear(&mut self) -> bool {
        let had_blocks = !self.blocks.is_empty();
        self.blocks.clear();
        self.selected = None;
        had_blocks
    }
}

impl<I: IdSource> ReorderTarget for Document<I> {
    fn on_reorder(&mut self, id: &BlockId, to_index: usize) -> bool {
        self.reorder_block(id, to_index)
    }
}
