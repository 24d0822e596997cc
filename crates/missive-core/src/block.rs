//! Blocks: the atomic, typed units of an email template.
//!
//! A [`Block`] pairs a stable [`BlockId`] with a [`BlockBody`], a sum type
//! over the closed set of block kinds. On the wire each block is
//! `{"id": ..., "type": ..., "content": {...}}`.

use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use smol_str::SmolStr;

use crate::brand::Brand;
use crate::content::{
    Align, BlockStyle, ButtonContent, ContentPatch, FontSize, ListContent, SocialContent,
    SocialLink, SpacerContent, TextContent,
};
use crate::error::UnknownBlockKind;

/// Identifier of a block, unique within a document.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(SmolStr);

impl BlockId {
    pub fn new(id: impl Into<SmolStr>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(id: &str) -> Self {
        Self(SmolStr::new(id))
    }
}

impl From<SmolStr> for BlockId {
    fn from(id: SmolStr) -> Self {
        Self(id)
    }
}

impl AsRef<str> for BlockId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The closed set of block kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Heading,
    Text,
    Button,
    Social,
    Divider,
    Spacer,
    List,
    Footer,
}

impl BlockKind {
    /// Palette order.
    pub const ALL: [BlockKind; 8] = [
        BlockKind::Heading,
        BlockKind::Text,
        BlockKind::Button,
        BlockKind::Social,
        BlockKind::Divider,
        BlockKind::Spacer,
        BlockKind::List,
        BlockKind::Footer,
    ];

    /// Wire name, as written to the `type` field.
    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Heading => "heading",
            BlockKind::Text => "text",
            BlockKind::Button => "button",
            BlockKind::Social => "social",
            BlockKind::Divider => "divider",
            BlockKind::Spacer => "spacer",
            BlockKind::List => "list",
            BlockKind::Footer => "footer",
        }
    }

    /// Human-readable palette label.
    pub fn label(self) -> &'static str {
        match self {
            BlockKind::Heading => "Heading",
            BlockKind::Text => "Text",
            BlockKind::Button => "Button",
            BlockKind::Social => "Social Links",
            BlockKind::Divider => "Divider",
            BlockKind::Spacer => "Spacer",
            BlockKind::List => "List",
            BlockKind::Footer => "Footer",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockKind {
    type Err = UnknownBlockKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownBlockKind(SmolStr::new(s)))
    }
}

/// Variant-specific content of a block.
#[derive(Clone, Debug, PartialEq)]
pub enum BlockBody {
    Heading(TextContent),
    Text(TextContent),
    Button(ButtonContent),
    Social(SocialContent),
    /// Style is accepted and persisted, but the divider ignores it when rendered.
    Divider(BlockStyle),
    Spacer(SpacerContent),
    List(ListContent),
    Footer,
    /// A block whose type is not recognized, or whose content does not fit
    /// its type. Kept verbatim so it survives a save, never rendered.
    Unknown { kind: SmolStr, content: Value },
}

impl BlockBody {
    /// Content a freshly added block of `kind` starts with.
    pub fn with_defaults(kind: BlockKind, brand: &Brand) -> Self {
        match kind {
            BlockKind::Heading => BlockBody::Heading(TextContent {
                text: "New Heading".into(),
                style: BlockStyle {
                    font_size: Some(FontSize::Xl),
                    color: Some(brand.primary_color.clone()),
                    ..Default::default()
                },
            }),
            BlockKind::Text => BlockBody::Text(TextContent {
                text: "New text block. Add your content here...".into(),
                style: BlockStyle {
                    color: Some(brand.body_color.clone()),
                    ..Default::default()
                },
            }),
            BlockKind::Button => BlockBody::Button(ButtonContent {
                text: "Take Action".into(),
                url: "https://".into(),
                style: BlockStyle {
                    align: Some(Align::Center),
                    color: Some(brand.primary_color.clone()),
                    ..Default::default()
                },
            }),
            BlockKind::Social => BlockBody::Social(SocialContent {
                platforms: vec![
                    SocialLink::new("Facebook", "#"),
                    SocialLink::new("Twitter", "#"),
                    SocialLink::new("Instagram", "#"),
                ],
                style: BlockStyle::default(),
            }),
            BlockKind::Divider => BlockBody::Divider(BlockStyle::default()),
            BlockKind::Spacer => BlockBody::Spacer(SpacerContent {
                height: SpacerContent::DEFAULT_HEIGHT.to_string(),
            }),
            BlockKind::List => BlockBody::List(ListContent {
                items: vec![
                    "First item".into(),
                    "Second item".into(),
                    "Third item".into(),
                ],
                style: BlockStyle::default(),
            }),
            BlockKind::Footer => BlockBody::Footer,
        }
    }

    /// The kind, or `None` for unknown blocks.
    pub fn kind(&self) -> Option<BlockKind> {
        Some(match self {
            BlockBody::Heading(_) => BlockKind::Heading,
            BlockBody::Text(_) => BlockKind::Text,
            BlockBody::Button(_) => BlockKind::Button,
            BlockBody::Social(_) => BlockKind::Social,
            BlockBody::Divider(_) => BlockKind::Divider,
            BlockBody::Spacer(_) => BlockKind::Spacer,
            BlockBody::List(_) => BlockKind::List,
            BlockBody::Footer => BlockKind::Footer,
            BlockBody::Unknown { .. } => return None,
        })
    }

    /// Wire name of the type, including unrecognized ones.
    pub fn type_name(&self) -> &str {
        match self {
            BlockBody::Unknown { kind, .. } => kind.as_str(),
            known => known.kind().map(BlockKind::as_str).unwrap_or_default(),
        }
    }

    pub fn style(&self) -> Option<&BlockStyle> {
        match self {
            BlockBody::Heading(c) | BlockBody::Text(c) => Some(&c.style),
            BlockBody::Button(c) => Some(&c.style),
            BlockBody::Social(c) => Some(&c.style),
            BlockBody::Divider(style) => Some(style),
            BlockBody::List(c) => Some(&c.style),
            BlockBody::Spacer(_) | BlockBody::Footer | BlockBody::Unknown { .. } => None,
        }
    }

    fn style_mut(&mut self) -> Option<&mut BlockStyle> {
        match self {
            BlockBody::Heading(c) | BlockBody::Text(c) => Some(&mut c.style),
            BlockBody::Button(c) => Some(&mut c.style),
            BlockBody::Social(c) => Some(&mut c.style),
            BlockBody::Divider(style) => Some(style),
            BlockBody::List(c) => Some(&mut c.style),
            BlockBody::Spacer(_) | BlockBody::Footer | BlockBody::Unknown { .. } => None,
        }
    }

    /// Shallow-merge `patch` into this content.
    ///
    /// Returns the wire names of keys this variant does not carry; those are
    /// left unapplied.
    pub fn apply_patch(&mut self, patch: ContentPatch) -> Vec<&'static str> {
        if let BlockBody::Unknown { content, .. } = self {
            merge_into_value(content, &patch);
            return Vec::new();
        }

        let ContentPatch {
            text,
            url,
            platforms,
            height,
            items,
            style,
        } = patch;
        let mut ignored = Vec::new();

        match self {
            BlockBody::Heading(c) | BlockBody::Text(c) => {
                assign(&mut c.text, text);
                reject(&url, "url", &mut ignored);
                reject(&platforms, "platforms", &mut ignored);
                reject(&height, "height", &mut ignored);
                reject(&items, "items", &mut ignored);
            }
            BlockBody::Button(c) => {
                assign(&mut c.text, text);
                assign(&mut c.url, url);
                reject(&platforms, "platforms", &mut ignored);
                reject(&height, "height", &mut ignored);
                reject(&items, "items", &mut ignored);
            }
            BlockBody::Social(c) => {
                assign(&mut c.platforms, platforms);
                reject(&text, "text", &mut ignored);
                reject(&url, "url", &mut ignored);
                reject(&height, "height", &mut ignored);
                reject(&items, "items", &mut ignored);
            }
            BlockBody::List(c) => {
                assign(&mut c.items, items);
                reject(&text, "text", &mut ignored);
                reject(&url, "url", &mut ignored);
                reject(&platforms, "platforms", &mut ignored);
                reject(&height, "height", &mut ignored);
            }
            BlockBody::Spacer(c) => {
                assign(&mut c.height, height);
                reject(&text, "text", &mut ignored);
                reject(&url, "url", &mut ignored);
                reject(&platforms, "platforms", &mut ignored);
                reject(&items, "items", &mut ignored);
            }
            BlockBody::Divider(_) | BlockBody::Footer | BlockBody::Unknown { .. } => {
                reject(&text, "text", &mut ignored);
                reject(&url, "url", &mut ignored);
                reject(&platforms, "platforms", &mut ignored);
                reject(&height, "height", &mut ignored);
                reject(&items, "items", &mut ignored);
            }
        }

        match self.style_mut() {
            Some(current) => current.merge(style),
            None => ignored.extend(style.set_keys()),
        }

        ignored
    }

    /// Rebuild a body from its wire parts.
    ///
    /// Never fails: anything that does not fit a known variant is kept as
    /// [`BlockBody::Unknown`].
    pub fn from_parts(kind: SmolStr, content: Value) -> Self {
        let Ok(known) = kind.parse::<BlockKind>() else {
            return BlockBody::Unknown { kind, content };
        };

        let source = if content.is_null() {
            Value::Object(Default::default())
        } else {
            content.clone()
        };

        let parsed = match known {
            BlockKind::Heading => serde_json::from_value(source).map(BlockBody::Heading),
            BlockKind::Text => serde_json::from_value(source).map(BlockBody::Text),
            BlockKind::Button => serde_json::from_value(source).map(BlockBody::Button),
            BlockKind::Social => serde_json::from_value(source).map(BlockBody::Social),
            BlockKind::Divider => serde_json::from_value(source).map(BlockBody::Divider),
            BlockKind::Spacer => serde_json::from_value(source).map(BlockBody::Spacer),
            BlockKind::List => serde_json::from_value(source).map(BlockBody::List),
            BlockKind::Footer => Ok(BlockBody::Footer),
        };

        parsed.unwrap_or_else(|err| {
            tracing::debug!(kind = %kind, error = %err, "block content does not fit its type");
            BlockBody::Unknown { kind, content }
        })
    }
}

fn assign<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn reject<T>(value: &Option<T>, key: &'static str, ignored: &mut Vec<&'static str>) {
    if value.is_some() {
        ignored.push(key);
    }
}

fn merge_into_value(content: &mut Value, patch: &ContentPatch) {
    let Ok(Value::Object(fields)) = serde_json::to_value(patch) else {
        return;
    };
    if !content.is_object() {
        *content = Value::Object(Default::default());
    }
    if let Value::Object(existing) = content {
        existing.extend(fields);
    }
}

/// A block in a document.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "RawBlock")]
pub struct Block {
    pub id: BlockId,
    pub body: BlockBody,
}

impl Block {
    pub fn new(id: BlockId, body: BlockBody) -> Self {
        Self { id, body }
    }

    pub fn kind(&self) -> Option<BlockKind> {
        self.body.kind()
    }
}

#[derive(Deserialize)]
struct RawBlock {
    id: BlockId,
    #[serde(rename = "type")]
    kind: SmolStr,
    #[serde(default)]
    content: Value,
}

impl From<RawBlock> for Block {
    fn from(raw: RawBlock) -> Self {
        Block {
            id: raw.id,
            body: BlockBody::from_parts(raw.kind, raw.content),
        }
    }
}

#[derive(Serialize)]
struct NoContent {}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Block", 3)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("type", self.body.type_name())?;
        match &self.body {
            BlockBody::Heading(c) | BlockBody::Text(c) => state.serialize_field("content", c)?,
            BlockBody::Button(c) => state.serialize_field("content", c)?,
            BlockBody::Social(c) => state.serialize_field("content", c)?,
            BlockBody::Divider(style) => state.serialize_field("content", style)?,
            BlockBody::Spacer(c) => state.serialize_field("content", c)?,
            BlockBody::List(c) => state.serialize_field("content", c)?,
            BlockBody::Footer => state.serialize_field("content", &NoContent {})?,
            BlockBody::Unknown { content, .. } => state.serialize_field("content", content)?,
        }
        state.end()
    }
}
