//! Builder state embedded in the saved HTML.
//!
//! The saved template is a single string: the rendered email body followed
//! by an HTML comment carrying the block list as JSON,
//!
//! ```text
//! <h2 ...>Welcome</h2>
//! ...
//!
//! <!-- BUILDER_STATE: [{"id":"block-1","type":"heading","content":{...}}] -->
//! ```
//!
//! Email clients never show the comment. On load the comment is preferred
//! over the visible HTML. Templates without a usable comment are kept as one
//! editable text block instead of being thrown away.

use std::sync::LazyLock;

use regex::Regex;

use crate::block::{Block, BlockBody, BlockId};
use crate::content::TextContent;
use crate::error::StateError;
use crate::id::{IdSource, ensure_unique_ids, fresh_id};
use crate::render::{RenderContext, render_blocks};

/// Marker that introduces the embedded state inside the comment.
pub const STATE_MARKER: &str = "BUILDER_STATE";

/// Captures the payload of a state comment.
///
/// The payload may not contain `<!`, so an unterminated marker earlier in the
/// visible HTML cannot swallow the real comment that follows it.
static STATE_COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--\s*BUILDER_STATE:\s*((?:[^<]|<[^!])*?)\s*-->")
        .expect("state pattern is valid")
});

/// Matches a whole state comment plus the whitespace in front of it.
static STATE_STRIP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\s*<!--\s*BUILDER_STATE:(?:[^<]|<[^!])*?-->")
        .expect("strip pattern is valid")
});

/// Serialize blocks to the JSON payload of the state comment.
///
/// `<` and `>` inside string values are written as `\u003c` and `\u003e`.
/// That decodes to the same text, but the payload can then neither close the
/// comment early nor open another one.
pub fn encode_state(blocks: &[Block]) -> String {
    let json = serde_json::to_string(blocks).unwrap_or_else(|err| {
        // Every key is a string and every value a plain JSON type.
        tracing::error!(error = %err, "failed to serialize builder state");
        String::from("[]")
    });
    json.replace('<', "\\u003c").replace('>', "\\u003e")
}

/// The state comment for `blocks`.
pub fn state_comment(blocks: &[Block]) -> String {
    format!("<!-- {STATE_MARKER}: {} -->", encode_state(blocks))
}

/// Render `blocks` and append the state comment.
///
/// This is the exact string callers persist and later hand back to
/// [`decode_document`].
pub fn encode_document(blocks: &[Block], ctx: &RenderContext<'_>) -> String {
    format!("{}\n\n{}", render_blocks(blocks, ctx), state_comment(blocks))
}

/// Strictly extract the embedded block list.
///
/// The last state comment wins: the encoder always appends its comment at the
/// very end, while user-authored text earlier in the body could contain
/// something that looks like one.
pub fn try_extract_state(html: &str) -> Result<Vec<Block>, StateError> {
    let captures = STATE_COMMENT_RE
        .captures_iter(html)
        .last()
        .ok_or(StateError::Missing)?;
    let payload = captures.get(1).map_or("", |m| m.as_str());
    Ok(serde_json::from_str(payload)?)
}

/// Remove every state comment, together with the whitespace preceding it.
pub fn strip_state(html: &str) -> String {
    STATE_STRIP_RE.replace_all(html, "").into_owned()
}

/// True if `html` carries at least one state comment, valid or not.
pub fn has_state(html: &str) -> bool {
    STATE_COMMENT_RE.is_match(html)
}

/// How a saved template was turned back into blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// Nothing to load.
    Empty,
    /// Blocks adopted from the state comment.
    Restored,
    /// No state comment; the HTML became a single text block.
    Legacy,
    /// The state comment was unreadable; the remaining HTML became a single
    /// text block.
    Malformed,
}

/// Result of [`decode_document`].
#[derive(Clone, Debug, PartialEq)]
pub struct Decoded {
    pub blocks: Vec<Block>,
    pub outcome: DecodeOutcome,
}

impl Decoded {
    fn empty() -> Self {
        Self {
            blocks: Vec::new(),
            outcome: DecodeOutcome::Empty,
        }
    }
}

/// Rebuild the block list from a previously saved template. Never fails.
///
/// - absent or blank input gives no blocks;
/// - a readable state comment is adopted as is, and the visible HTML is
///   ignored since it will be regenerated;
/// - otherwise the HTML, minus any state comments, becomes the text of one
///   `text` block so hand-written templates stay editable.
///
/// Block ids are made unique and reported to `ids`, so blocks added later
/// never collide with loaded ones.
pub fn decode_document<I: IdSource + ?Sized>(html: Option<&str>, ids: &mut I) -> Decoded {
    let Some(html) = html.filter(|html| !html.trim().is_empty()) else {
        return Decoded::empty();
    };

    match try_extract_state(html) {
        Ok(mut blocks) => {
            let renamed = ensure_unique_ids(&mut blocks, ids);
            if renamed > 0 {
                tracing::warn!(renamed, "saved template contained duplicate block ids");
            }
            Decoded {
                blocks,
                outcome: DecodeOutcome::Restored,
            }
        }
        Err(err) => {
            let outcome = match &err {
                StateError::Missing => DecodeOutcome::Legacy,
                _ => {
                    tracing::warn!(error = %err, "discarding unreadable builder state");
                    DecodeOutcome::Malformed
                }
            };

            let text = match outcome {
                DecodeOutcome::Legacy => html.to_owned(),
                _ => strip_state(html),
            };
            let id: BlockId = fresh_id(ids, |_| false);
            Decoded {
                blocks: vec![Block::new(id, BlockBody::Text(TextContent::new(text)))],
                outcome,
            }
        }
    }
}
