//! Variant-specific content records and the common style attributes.
//!
//! Every record serializes with camelCase keys and omits unset optional
//! attributes, which keeps the embedded state compact and stable.

use serde::{Deserialize, Deserializer, Serialize};

/// Horizontal text alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    pub fn as_css(self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }
}

/// Font size keyword.
///
/// Body text and headings map the same keyword onto different pixel scales.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Sm,
    #[default]
    Base,
    Lg,
    Xl,
}

impl FontSize {
    /// Pixel size on the body scale.
    pub fn body_px(self) -> u16 {
        match self {
            FontSize::Sm => 14,
            FontSize::Base => 16,
            FontSize::Lg => 18,
            FontSize::Xl => 24,
        }
    }

    /// Pixel size on the heading scale. Only `xl` is larger than the rest.
    pub fn heading_px(self) -> u16 {
        match self {
            FontSize::Xl => 32,
            _ => 24,
        }
    }
}

/// Common optional attributes shared by the text-bearing variants.
///
/// All fields are optional, so the same record doubles as the style half of
/// a [`ContentPatch`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<FontSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl BlockStyle {
    /// True when no attribute is set.
    pub fn is_empty(&self) -> bool {
        self.set_keys().is_empty()
    }

    /// Wire names of the attributes that are set.
    pub fn set_keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        if self.align.is_some() {
            keys.push("align");
        }
        if self.bold.is_some() {
            keys.push("bold");
        }
        if self.italic.is_some() {
            keys.push("italic");
        }
        if self.font_size.is_some() {
            keys.push("fontSize");
        }
        if self.color.is_some() {
            keys.push("color");
        }
        keys
    }

    /// Shallow merge: attributes set in `other` overwrite, the rest are kept.
    pub fn merge(&mut self, other: BlockStyle) {
        let BlockStyle {
            align,
            bold,
            italic,
            font_size,
            color,
        } = other;
        overwrite(&mut self.align, align);
        overwrite(&mut self.bold, bold);
        overwrite(&mut self.italic, italic);
        overwrite(&mut self.font_size, font_size);
        overwrite(&mut self.color, color);
    }
}

fn overwrite<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

/// Content of `heading` and `text` blocks. `text` is rich inline HTML.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    #[serde(default)]
    pub text: String,
    #[serde(flatten)]
    pub style: BlockStyle,
}

impl TextContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: BlockStyle::default(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonContent {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub url: String,
    #[serde(flatten)]
    pub style: BlockStyle,
}

/// One entry of a social links block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SocialLink {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

impl SocialLink {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialContent {
    #[serde(default)]
    pub platforms: Vec<SocialLink>,
    #[serde(flatten)]
    pub style: BlockStyle,
}

/// Spacer height in pixels, string-encoded on the wire.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpacerContent {
    #[serde(default, deserialize_with = "string_or_number")]
    pub height: String,
}

impl SpacerContent {
    pub const DEFAULT_HEIGHT: u32 = 32;

    /// Parsed height, falling back to [`Self::DEFAULT_HEIGHT`].
    pub fn height_px(&self) -> u32 {
        self.height.trim().parse().unwrap_or(Self::DEFAULT_HEIGHT)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListContent {
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(flatten)]
    pub style: BlockStyle,
}

/// A partial attribute bag for [`crate::Document::update_block_content`].
///
/// Only the fields that are `Some` are written to the target block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platforms: Option<Vec<SocialLink>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<String>>,
    #[serde(flatten)]
    pub style: BlockStyle,
}

impl ContentPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn platforms(mut self, platforms: Vec<SocialLink>) -> Self {
        self.platforms = Some(platforms);
        self
    }

    pub fn height(mut self, height: impl Into<String>) -> Self {
        self.height = Some(height.into());
        self
    }

    pub fn items<S: Into<String>>(mut self, items: impl IntoIterator<Item = S>) -> Self {
        self.items = Some(items.into_iter().map(Into::into).collect());
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.style.align = Some(align);
        self
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.style.bold = Some(bold);
        self
    }

    pub fn italic(mut self, italic: bool) -> Self {
        self.style.italic = Some(italic);
        self
    }

    pub fn font_size(mut self, size: FontSize) -> Self {
        self.style.font_size = Some(size);
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.style.color = Some(color.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.url.is_none()
            && self.platforms.is_none()
            && self.height.is_none()
            && self.items.is_none()
            && self.style.is_empty()
    }
}

/// Older saved templates sometimes carry the spacer height as a JSON number.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Height {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Height::deserialize(deserializer)? {
        Height::Text(s) => s,
        Height::Int(n) => n.to_string(),
        Height::Float(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_merge_keeps_unset_keys() {
        let mut style = BlockStyle {
            align: Some(Align::Center),
            color: Some("#111111".into()),
            ..Default::default()
        };
        style.merge(BlockStyle {
            color: Some("#ff0000".into()),
            bold: Some(true),
            ..Default::default()
        });

        assert_eq!(style.align, Some(Align::Center));
        assert_eq!(style.color.as_deref(), Some("#ff0000"));
        assert_eq!(style.bold, Some(true));
        assert_eq!(style.italic, None);
    }

    #[test]
    fn style_serializes_camel_case_and_skips_unset() {
        let style = BlockStyle {
            font_size: Some(FontSize::Xl),
            ..Default::default()
        };
        let json = serde_json::to_string(&style).unwrap();
        assert_eq!(json, r#"{"fontSize":"xl"}"#);
    }

    #[test]
    fn text_content_flattens_style() {
        let content: TextContent =
            serde_json::from_str(r#"{"text":"Hi","align":"right","italic":true}"#).unwrap();
        assert_eq!(content.text, "Hi");
        assert_eq!(content.style.align, Some(Align::Right));
        assert_eq!(content.style.italic, Some(true));
    }

    #[test]
    fn spacer_height_accepts_numbers() {
        let spacer: SpacerContent = serde_json::from_str(r#"{"height":48}"#).unwrap();
        assert_eq!(spacer.height, "48");
        assert_eq!(spacer.height_px(), 48);
    }

    #[test]
    fn spacer_height_falls_back_when_unparseable() {
        let spacer = SpacerContent {
            height: "tall".into(),
        };
        assert_eq!(spacer.height_px(), SpacerContent::DEFAULT_HEIGHT);

        let spacer = SpacerContent {
            height: "-4".into(),
        };
        assert_eq!(spacer.height_px(), SpacerContent::DEFAULT_HEIGHT);
    }

    #[test]
    fn font_scales_differ_for_headings() {
        assert_eq!(FontSize::Sm.body_px(), 14);
        assert_eq!(FontSize::Xl.body_px(), 24);
        assert_eq!(FontSize::Xl.heading_px(), 32);
        assert_eq!(FontSize::Sm.heading_px(), 24);
    }

    #[test]
    fn patch_builder_sets_only_named_keys() {
        let patch = ContentPatch::new().color("#ff0000").text("Hello");
        assert!(!patch.is_empty());
        assert_eq!(patch.style.set_keys(), vec!["color"]);
        assert!(patch.url.is_none());
        assert!(ContentPatch::new().is_empty());
    }
}
