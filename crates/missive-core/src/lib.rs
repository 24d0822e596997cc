//! missive-core: block-based email template model.
//!
//! This crate provides:
//! - `Block` / `BlockBody` - typed content blocks and their wire format
//! - `Document` - the ordered block list with selection and id allocation
//! - `render_blocks` - inline-styled email HTML for a block list
//! - `encode_document` / `decode_document` - the `BUILDER_STATE` round trip
//! - `EditorSession` - one open template with change notification
//!
//! Nothing here performs I/O.

pub mod actions;
pub mod block;
pub mod brand;
pub mod clock;
pub mod codec;
pub mod content;
pub mod document;
pub mod error;
pub mod id;
pub mod render;
pub mod reorder;
pub mod session;

pub use actions::{EditorAction, PaletteEntry, execute_action, palette};
pub use block::{Block, BlockBody, BlockId, BlockKind};
pub use brand::Brand;
pub use clock::{Clock, FixedClock, SystemClock};
pub use codec::{
    DecodeOutcome, Decoded, STATE_MARKER, decode_document, encode_document, encode_state,
    has_state, strip_state, try_extract_state,
};
pub use content::{
    Align, BlockStyle, ButtonContent, ContentPatch, FontSize, ListContent, SocialContent,
    SocialLink, SpacerContent, TextContent,
};
pub use document::Document;
pub use error::{StateError, UnknownBlockKind};
pub use id::{IdSource, SequentialIds};
pub use render::{RenderContext, render_block, render_blocks};
pub use reorder::{DragGesture, KeyboardMove, ReorderTarget, array_move};
pub use session::{EditorCallbacks, EditorOptions, EditorSession, TemplateMeta};
pub use smol_str::SmolStr;
