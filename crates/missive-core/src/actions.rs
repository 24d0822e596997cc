//! Editor actions as data.
//!
//! Front-ends translate clicks, drags and key presses into [`EditorAction`]
//! values; [`execute_action`] applies them to a [`Document`].

use serde::Serialize;

use crate::block::{BlockId, BlockKind};
use crate::content::ContentPatch;
use crate::document::Document;
use crate::id::IdSource;
use crate::reorder::{DragGesture, KeyboardMove};

/// All editor actions that can be performed on a document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditorAction {
    /// Append a block with default content and select it.
    AddBlock { kind: BlockKind },
    DeleteBlock { id: BlockId },
    /// Move a block to an absolute index.
    ReorderBlock { id: BlockId, to_index: usize },
    /// Keyboard reorder step.
    MoveBlock { id: BlockId, direction: KeyboardMove },
    /// A finished pointer drag.
    Drop(DragGesture),
    UpdateContent { id: BlockId, patch: ContentPatch },
    DuplicateBlock { id: BlockId },
    /// Selection only. Never counts as a document change.
    Select { id: Option<BlockId> },
    Clear,
}

impl EditorAction {
    /// Whether this action can alter the block list (as opposed to only the
    /// selection).
    pub fn edits_blocks(&self) -> bool {
        !matches!(self, EditorAction::Select { .. })
    }
}

/// What a block palette shows: one entry per addable kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PaletteEntry {
    pub kind: BlockKind,
    pub label: &'static str,
}

/// Palette entries in display order.
pub fn palette() -> impl Iterator<Item = PaletteEntry> {
    BlockKind::ALL.into_iter().map(|kind| PaletteEntry {
        kind,
        label: kind.label(),
    })
}

/// Execute an editor action on a document.
///
/// Returns true if the action was handled and changed something, the block
/// list or the selection.
pub fn execute_action<I: IdSource>(doc: &mut Document<I>, action: &EditorAction) -> bool {
    match action {
        EditorAction::AddBlock { kind } => {
            doc.add_block(*kind);
            true
        }
        EditorAction::DeleteBlock { id } => doc.delete_block(id),
        EditorAction::ReorderBlock { id, to_index } => doc.reorder_block(id, *to_index),
        EditorAction::MoveBlock { id, direction } => doc.move_block(id, *direction),
        EditorAction::Drop(gesture) => match gesture.resolve(doc.blocks()) {
            Some((id, to_index)) => doc.reorder_block(&id, to_index),
            None => false,
        },
        EditorAction::UpdateContent { id, patch } => doc.update_block_content(id, patch.clone()),
        EditorAction::DuplicateBlock { id } => doc.duplicate_block(id).is_some(),
        EditorAction::Select { id } => doc.select_block(id.as_ref()),
        EditorAction::Clear => doc.clear(),
    }
}
