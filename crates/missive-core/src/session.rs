//! One editing session.
//!
//! [`EditorSession`] is what a front-end holds while a template is open. It
//! decodes the saved string once, applies edits to its [`Document`], keeps the
//! encoded output current and reports every change to the host through
//! [`EditorCallbacks`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::actions::{EditorAction, execute_action};
use crate::block::{Block, BlockId, BlockKind};
use crate::brand::Brand;
use crate::clock::{Clock, SystemClock};
use crate::codec::{DecodeOutcome, decode_document, encode_document};
use crate::content::ContentPatch;
use crate::document::Document;
use crate::id::{IdSource, SequentialIds};
use crate::render::{RenderContext, render_blocks};
use crate::reorder::{KeyboardMove, ReorderTarget};

/// Template fields stored next to the HTML. Passed through untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateMeta {
    pub name: String,
    pub subject: String,
    pub description: String,
}

type ChangeFn = Box<dyn FnMut(&str)>;
type NotifyFn = Box<dyn FnMut()>;

/// Host hooks. Every hook defaults to doing nothing.
pub struct EditorCallbacks {
    on_change: ChangeFn,
    on_save: NotifyFn,
    on_cancel: NotifyFn,
}

impl Default for EditorCallbacks {
    fn default() -> Self {
        Self {
            on_change: Box::new(|_| {}),
            on_save: Box::new(|| {}),
            on_cancel: Box::new(|| {}),
        }
    }
}

impl EditorCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with the full encoded template after each change.
    pub fn on_change(mut self, f: impl FnMut(&str) + 'static) -> Self {
        self.on_change = Box::new(f);
        self
    }

    pub fn on_save(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_save = Box::new(f);
        self
    }

    pub fn on_cancel(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_cancel = Box::new(f);
        self
    }
}

impl fmt::Debug for EditorCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorCallbacks").finish_non_exhaustive()
    }
}

/// Construction inputs for [`EditorSession`].
#[derive(Clone, Debug)]
pub struct EditorOptions<C = SystemClock, I = SequentialIds> {
    /// Previously saved template, if any.
    pub initial_html: Option<String>,
    pub meta: TemplateMeta,
    pub brand: Brand,
    pub clock: C,
    pub ids: I,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            initial_html: None,
            meta: TemplateMeta::default(),
            brand: Brand::default(),
            clock: SystemClock,
            ids: SequentialIds::new(),
        }
    }
}

impl<C, I> EditorOptions<C, I> {
    pub fn initial_html(mut self, html: impl Into<String>) -> Self {
        self.initial_html = Some(html.into());
        self
    }

    pub fn meta(mut self, meta: TemplateMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn brand(mut self, brand: Brand) -> Self {
        self.brand = brand;
        self
    }

    pub fn clock<C2>(self, clock: C2) -> EditorOptions<C2, I> {
        EditorOptions {
            initial_html: self.initial_html,
            meta: self.meta,
            brand: self.brand,
            clock,
            ids: self.ids,
        }
    }

    pub fn ids<I2>(self, ids: I2) -> EditorOptions<C, I2> {
        EditorOptions {
            initial_html: self.initial_html,
            meta: self.meta,
            brand: self.brand,
            clock: self.clock,
            ids,
        }
    }
}

/// An open template.
#[derive(Debug)]
pub struct EditorSession<C: Clock = SystemClock, I: IdSource = SequentialIds> {
    doc: Document<I>,
    meta: TemplateMeta,
    clock: C,
    callbacks: EditorCallbacks,
    outcome: DecodeOutcome,
    output: String,
    saving: bool,
}

impl<C: Clock, I: IdSource> EditorSession<C, I> {
    /// Open a session. The initial HTML is decoded here and nowhere else.
    ///
    /// `on_change` is not called for the initial state.
    pub fn new(options: EditorOptions<C, I>, callbacks: EditorCallbacks) -> Self {
        let EditorOptions {
            initial_html,
            meta,
            brand,
            clock,
            mut ids,
        } = options;

        let decoded = decode_document(initial_html.as_deref(), &mut ids);
        let outcome = decoded.outcome;
        tracing::debug!(?outcome, blocks = decoded.blocks.len(), "opened template");

        let doc = Document::from_decoded(brand, ids, decoded);
        let output = encode_document(doc.blocks(), &RenderContext::from_clock(doc.brand(), &clock));
        Self {
            doc,
            meta,
            clock,
            callbacks,
            outcome,
            output,
            saving: false,
        }
    }

    /// How the initial HTML was interpreted.
    pub fn load_outcome(&self) -> DecodeOutcome {
        self.outcome
    }

    pub fn document(&self) -> &Document<I> {
        &self.doc
    }

    pub fn blocks(&self) -> &[Block] {
        self.doc.blocks()
    }

    pub fn selected(&self) -> Option<&BlockId> {
        self.doc.selected()
    }

    pub fn meta(&self) -> &TemplateMeta {
        &self.meta
    }

    /// Encoded template as of the last change: visible HTML plus state comment.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Visible HTML only, rendered now.
    pub fn render_html(&self) -> String {
        render_blocks(self.doc.blocks(), &self.context())
    }

    fn context(&self) -> RenderContext<'_> {
        RenderContext::from_clock(self.doc.brand(), &self.clock)
    }

    fn commit(&mut self, changed: bool) -> bool {
        if changed {
            self.output = encode_document(self.doc.blocks(), &self.context());
            (self.callbacks.on_change)(&self.output);
        }
        changed
    }

    pub fn add_block(&mut self, kind: BlockKind) -> BlockId {
        let id = self.doc.add_block(kind);
        self.commit(true);
        id
    }

    pub fn delete_block(&mut self, id: &BlockId) -> bool {
        let changed = self.doc.delete_block(id);
        self.commit(changed)
    }

    pub fn reorder_block(&mut self, id: &BlockId, new_index: usize) -> bool {
        let changed = self.doc.reorder_block(id, new_index);
        self.commit(changed)
    }

    pub fn move_block(&mut self, id: &BlockId, direction: KeyboardMove) -> bool {
        let changed = self.doc.move_block(id, direction);
        self.commit(changed)
    }

    pub fn update_block_content(&mut self, id: &BlockId, patch: ContentPatch) -> bool {
        let changed = self.doc.update_block_content(id, patch);
        self.commit(changed)
    }

    pub fn duplicate_block(&mut self, id: &BlockId) -> Option<BlockId> {
        let copy = self.doc.duplicate_block(id);
        self.commit(copy.is_some());
        copy
    }

    /// Selection never changes the output, so it never notifies.
    pub fn select_block(&mut self, id: Option<&BlockId>) -> bool {
        self.doc.select_block(id)
    }

    pub fn clear(&mut self) -> bool {
        let changed = self.doc.clear();
        self.commit(changed)
    }

    /// Apply an action. Returns whether the block list changed.
    pub fn apply(&mut self, action: &EditorAction) -> bool {
        let handled = execute_action(&mut self.doc, action);
        if action.edits_blocks() {
            self.commit(handled)
        } else {
            false
        }
    }

    /// Set by the host while a save request is in flight.
    pub fn set_saving(&mut self, saving: bool) {
        self.saving = saving;
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Ask the host to persist [`Self::output`]. Ignored while a save is
    /// already running.
    pub fn request_save(&mut self) -> bool {
        if self.saving {
            tracing::debug!("save requested while saving");
            return false;
        }
        (self.callbacks.on_save)();
        true
    }

    pub fn cancel(&mut self) {
        (self.callbacks.on_cancel)();
    }
}

impl<C: Clock, I: IdSource> ReorderTarget for EditorSession<C, I> {
    fn on_reorder(&mut self, id: &BlockId, to_index: usize) -> bool {
        self.reorder_block(id, to_index)
    }
}
