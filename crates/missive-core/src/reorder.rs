//! Reordering gestures.
//!
//! Whatever produces the gesture (pointer drag, touch, keyboard) only has to
//! resolve it to a single "move block X to index N" call on a
//! [`ReorderTarget`]. The model never sees the gesture itself.

use crate::block::{Block, BlockId};

/// Something that can move one block to a new index.
pub trait ReorderTarget {
    /// Move `id` to `to_index` (clamped). Returns whether anything moved.
    fn on_reorder(&mut self, id: &BlockId, to_index: usize) -> bool;
}

/// Move the element at `from` to `to`, shifting the ones in between.
///
/// `to` is clamped to the last index. Out-of-range `from` is a no-op.
/// Implemented as a rotation, so the slice is never observed with a missing
/// or duplicated element. Returns whether anything moved.
pub fn array_move<T>(items: &mut [T], from: usize, to: usize) -> bool {
    let Some(last) = items.len().checked_sub(1) else {
        return false;
    };
    if from > last {
        return false;
    }
    let to = to.min(last);
    if from < to {
        items[from..=to].rotate_left(1);
    } else if to < from {
        items[to..=from].rotate_right(1);
    } else {
        return false;
    }
    true
}

/// A finished drag: `active` was dropped onto the slot `over` occupied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DragGesture {
    pub active: BlockId,
    pub over: Option<BlockId>,
}

impl DragGesture {
    pub fn new(active: BlockId, over: Option<BlockId>) -> Self {
        Self { active, over }
    }

    /// The id to move and the index to move it to.
    ///
    /// `None` when the drop landed outside any block, on the dragged block
    /// itself, or either block is gone.
    pub fn resolve(&self, blocks: &[Block]) -> Option<(BlockId, usize)> {
        let over = self.over.as_ref()?;
        if *over == self.active {
            return None;
        }
        blocks.iter().position(|b| b.id == self.active)?;
        let to_index = blocks.iter().position(|b| b.id == *over)?;
        Some((self.active.clone(), to_index))
    }

    /// Resolve and apply. Returns whether anything moved.
    pub fn apply(&self, blocks: &[Block], target: &mut impl ReorderTarget) -> bool {
        match self.resolve(blocks) {
            Some((id, to_index)) => target.on_reorder(&id, to_index),
            None => false,
        }
    }
}

/// Keyboard-driven reorder steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyboardMove {
    Up,
    Down,
    Top,
    Bottom,
}

impl KeyboardMove {
    /// Target index for a block currently at `current` in a list of `len`.
    pub fn target_index(self, current: usize, len: usize) -> usize {
        let last = len.saturating_sub(1);
        match self {
            KeyboardMove::Up => current.saturating_sub(1),
            KeyboardMove::Down => (current + 1).min(last),
            KeyboardMove::Top => 0,
            KeyboardMove::Bottom => last,
        }
    }
}
