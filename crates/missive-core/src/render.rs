//! HTML generation for email bodies.
//!
//! Everything is written with inline styles because most email clients
//! drop `<style>` sheets. Rendering is a pure function of the blocks and the
//! [`RenderContext`].

use std::fmt::Write;
use std::sync::LazyLock;

use markdown_weaver_escape::{escape_href, escape_html};
use regex::Regex;

use crate::block::{Block, BlockBody};
use crate::brand::Brand;
use crate::clock::Clock;
use crate::content::{
    BlockStyle, ButtonContent, ListContent, SocialContent, SpacerContent, TextContent,
};

/// Matches anything that looks like an HTML tag, e.g. `<p>`, `</strong>`, `<br/>`.
static HTML_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?[a-z][^>]*>").expect("tag pattern is valid"));

/// Label shown above the social links.
pub const SOCIAL_LABEL: &str = "Connect with us";

/// Everything rendering depends on besides the blocks themselves.
#[derive(Clone, Copy, Debug)]
pub struct RenderContext<'a> {
    pub brand: &'a Brand,
    /// Year printed in the footer copyright line.
    pub year: i32,
}

impl<'a> RenderContext<'a> {
    pub fn new(brand: &'a Brand, year: i32) -> Self {
        Self { brand, year }
    }

    /// Sample the clock now. Call this per render, not per session.
    pub fn from_clock(brand: &'a Brand, clock: &impl Clock) -> Self {
        Self {
            brand,
            year: clock.current_year(),
        }
    }
}

/// Render all blocks in order, joined by newlines.
///
/// Blocks that render to nothing (unknown types) are skipped. An empty slice
/// renders to an empty string.
pub fn render_blocks(blocks: &[Block], ctx: &RenderContext<'_>) -> String {
    let rendered: Vec<String> = blocks
        .iter()
        .map(|block| render_block(block, ctx))
        .filter(|html| !html.is_empty())
        .collect();
    tracing::trace!(blocks = blocks.len(), rendered = rendered.len(), "rendered template");
    rendered.join("\n")
}

/// Render a single block. Unknown blocks render to an empty string.
pub fn render_block(block: &Block, ctx: &RenderContext<'_>) -> String {
    let mut html = String::new();

    match &block.body {
        BlockBody::Heading(heading) => render_heading_block(&mut html, heading, ctx.brand),
        BlockBody::Text(text) => render_text_block(&mut html, text, ctx.brand),
        BlockBody::Button(button) => render_button_block(&mut html, button, ctx.brand),
        BlockBody::Social(social) => render_social_block(&mut html, social, ctx.brand),
        BlockBody::Divider(_) => html.push_str("<hr style=\"margin: 32px 0;\" />"),
        BlockBody::Spacer(spacer) => render_spacer_block(&mut html, spacer),
        BlockBody::List(list) => render_list_block(&mut html, list, ctx.brand),
        BlockBody::Footer => render_footer_block(&mut html, ctx),
        BlockBody::Unknown { kind, .. } => {
            tracing::debug!(id = %block.id, kind = %kind, "skipping block of unknown type");
        }
    }

    html
}

/// Which pixel scale a font size keyword maps onto.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Scale {
    Body,
    Heading,
}

/// Inline style shared by all text-bearing blocks.
fn common_style(style: &BlockStyle, scale: Scale, default_color: &str) -> String {
    let size = style.font_size.unwrap_or_default();
    let px = match scale {
        Scale::Body => size.body_px(),
        Scale::Heading => size.heading_px(),
    };
    let color = style
        .color
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(default_color);

    let mut css = format!(
        "font-family: sans-serif; font-size: {px}px; line-height: 1.7; text-align: {}; color: {color}; margin: 0 0 16px 0;",
        style.align.unwrap_or_default().as_css(),
    );
    if style.bold == Some(true) {
        css.push_str(" font-weight: bold;");
    }
    if style.italic == Some(true) {
        css.push_str(" font-style: italic;");
    }
    css
}

fn push_style_attr(html: &mut String, css: &str) {
    html.push_str(" style=\"");
    let _ = escape_html(&mut *html, css);
    html.push('"');
}

fn push_escaped(html: &mut String, text: &str) {
    let _ = escape_html(&mut *html, text);
}

/// True when the text already carries markup and must not be re-wrapped.
pub fn contains_html(text: &str) -> bool {
    HTML_TAG_RE.is_match(text)
}

fn render_heading_block(html: &mut String, heading: &TextContent, brand: &Brand) {
    let style = BlockStyle {
        bold: Some(true),
        ..heading.style.clone()
    };
    let mut css = common_style(&style, Scale::Heading, &brand.primary_color);
    css.push_str(" margin-top: 24px;");

    html.push_str("<h2");
    push_style_attr(html, &css);
    html.push('>');
    html.push_str(&heading.text);
    html.push_str("</h2>");
}

fn render_text_block(html: &mut String, text: &TextContent, brand: &Brand) {
    let css = common_style(&text.style, Scale::Body, &brand.body_color);
    html.push_str("<div");
    push_style_attr(html, &css);
    html.push('>');

    if contains_html(&text.text) {
        html.push_str(&text.text);
    } else {
        let mut wrote_any = false;
        for line in text.text.lines().filter(|line| !line.trim().is_empty()) {
            html.push_str("<p style=\"margin: 0 0 12px 0;\">");
            html.push_str(line);
            html.push_str("</p>");
            wrote_any = true;
        }
        if !wrote_any {
            html.push_str("<p style=\"margin: 0;\">&nbsp;</p>");
        }
    }

    html.push_str("</div>");
}

fn render_button_block(html: &mut String, button: &ButtonContent, brand: &Brand) {
    let background = button
        .style
        .color
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(brand.primary_color.as_str());
    let align = button.style.align.unwrap_or_default().as_css();
    let px = button.style.font_size.unwrap_or_default().body_px();

    html.push_str("<div");
    push_style_attr(html, &format!("text-align: {align}; margin: 24px 0;"));
    html.push_str("><a href=\"");
    let _ = escape_href(&mut *html, &button.url);
    html.push('"');

    let mut css = format!(
        "display: inline-block; background-color: {background}; color: #ffffff; padding: 12px 28px; border-radius: 6px; text-decoration: none; font-family: sans-serif; font-size: {px}px; font-weight: bold; box-shadow: 0 2px 4px rgba(0, 0, 0, 0.15);"
    );
    if button.style.italic == Some(true) {
        css.push_str(" font-style: italic;");
    }
    push_style_attr(html, &css);
    html.push('>');
    push_escaped(html, &button.text);
    html.push_str("</a></div>");
}

fn render_social_block(html: &mut String, social: &SocialContent, brand: &Brand) {
    html.push_str("<div");
    push_style_attr(
        html,
        &format!(
            "border-top: 1px solid {}; margin: 32px 0 16px 0; padding-top: 24px; text-align: center; font-family: sans-serif;",
            brand.border_color
        ),
    );
    html.push_str("><p");
    push_style_attr(
        html,
        &format!("margin: 0 0 12px 0; font-size: 14px; color: {};", brand.muted_color),
    );
    html.push('>');
    html.push_str(SOCIAL_LABEL);
    html.push_str("</p><p style=\"margin: 0;\">");

    let link_css = format!(
        "color: {}; margin: 0 12px; text-decoration: none; font-weight: bold; font-size: 14px;",
        brand.primary_color
    );
    for platform in &social.platforms {
        html.push_str("<a href=\"");
        let _ = escape_href(&mut *html, &platform.url);
        html.push('"');
        push_style_attr(html, &link_css);
        html.push('>');
        push_escaped(html, &platform.name);
        html.push_str("</a>");
    }

    html.push_str("</p></div>");
}

fn render_spacer_block(html: &mut String, spacer: &SpacerContent) {
    let _ = write!(
        html,
        "<div style=\"height: {0}px; line-height: {0}px; font-size: 0;\"></div>",
        spacer.height_px()
    );
}

fn render_list_block(html: &mut String, list: &ListContent, brand: &Brand) {
    let mut css = common_style(&list.style, Scale::Body, &brand.body_color);
    css.push_str(" padding-left: 24px;");

    html.push_str("<ul");
    push_style_attr(html, &css);
    html.push('>');
    for item in list.items.iter().filter(|item| !item.trim().is_empty()) {
        html.push_str("<li style=\"margin: 0 0 8px 0;\">");
        html.push_str(item);
        html.push_str("</li>");
    }
    html.push_str("</ul>");
}

fn render_footer_block(html: &mut String, ctx: &RenderContext<'_>) {
    let brand = ctx.brand;

    html.push_str("<div");
    push_style_attr(
        html,
        &format!(
            "background-color: {}; border-radius: 8px; margin-top: 40px; padding: 24px; text-align: center; font-family: sans-serif; font-size: 13px; line-height: 1.7; color: {};",
            brand.footer_background, brand.muted_color
        ),
    );
    html.push_str("><p");
    push_style_attr(
        html,
        &format!(
            "margin: 0 0 8px 0; font-size: 16px; font-weight: bold; color: {};",
            brand.primary_color
        ),
    );
    html.push('>');
    push_escaped(html, &brand.organization);
    html.push_str("</p><p style=\"margin: 0;\">");
    push_escaped(html, &brand.tagline);
    html.push_str("</p><p style=\"margin: 0 0 12px 0;\">");
    push_escaped(html, &brand.description);
    let _ = write!(html, "</p><p style=\"margin: 0; font-size: 12px;\">&copy; {} ", ctx.year);
    push_escaped(html, &brand.organization);
    html.push_str(". All rights reserved.</p></div>");
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::block::{BlockId, BlockKind};
    use crate::clock::FixedClock;
    use crate::content::{Align, FontSize};

    fn block(kind: BlockKind) -> Block {
        Block::new(
            BlockId::new(kind.as_str()),
            BlockBody::with_defaults(kind, &Brand::default()),
        )
    }

    fn render(body: BlockBody) -> String {
        render_default(&Block::new(BlockId::from("b"), body))
    }

    fn render_default(block: &Block) -> String {
        let brand = Brand::default();
        render_block(block, &RenderContext::new(&brand, 2025))
    }

    #[test]
    fn empty_document_renders_nothing() {
        let brand = Brand::default();
        assert_eq!(render_blocks(&[], &RenderContext::new(&brand, 2025)), "");
    }

    #[test]
    fn divider_ignores_style() {
        let html = render(BlockBody::Divider(BlockStyle {
            color: Some("#ff0000".into()),
            ..Default::default()
        }));
        insta::assert_snapshot!(html, @r#"<hr style="margin: 32px 0;" />"#);
    }

    #[test]
    fn spacer_uses_height_or_default() {
        let html = render(BlockBody::Spacer(SpacerContent {
            height: "48".into(),
        }));
        insta::assert_snapshot!(
            html,
            @r#"<div style="height: 48px; line-height: 48px; font-size: 0;"></div>"#
        );

        let html = render(BlockBody::Spacer(SpacerContent {
            height: "lots".into(),
        }));
        assert!(html.contains("height: 32px;"));
    }

    #[test]
    fn heading_forces_bold_and_uses_heading_scale() {
        let html = render_default(&block(BlockKind::Heading));
        assert!(html.starts_with("<h2 style=\""));
        assert!(html.contains("font-size: 32px;"));
        assert!(html.contains("font-weight: bold;"));
        assert!(html.contains("margin-top: 24px;"));
        assert!(html.contains(">New Heading</h2>"));

        let html = render(BlockBody::Heading(TextContent {
            text: "Small".into(),
            style: BlockStyle {
                font_size: Some(FontSize::Sm),
                ..Default::default()
            },
        }));
        assert!(html.contains("font-size: 24px;"));
        assert_eq!(html.matches("font-weight: bold;").count(), 1);
    }

    #[test]
    fn heading_without_color_uses_brand_primary() {
        let brand = Brand::default();
        let html = render(BlockBody::Heading(TextContent::new("Plain")));
        assert!(html.contains(&format!("color: {};", brand.primary_color)));
    }

    #[test]
    fn text_keeps_existing_markup() {
        let html = render(BlockBody::Text(TextContent::new(
            "<p>Hello <strong>there</strong></p>",
        )));
        assert!(html.contains("<p>Hello <strong>there</strong></p>"));
        assert!(!html.contains("margin: 0 0 12px 0;"));
    }

    #[test]
    fn plain_text_becomes_paragraphs() {
        let html = render(BlockBody::Text(TextContent::new("First\n\n  \nSecond")));
        assert_eq!(html.matches("<p style=\"margin: 0 0 12px 0;\">").count(), 2);
        assert!(html.contains(">First</p>"));
        assert!(html.contains(">Second</p>"));
    }

    #[test]
    fn empty_text_keeps_a_visible_paragraph() {
        let html = render(BlockBody::Text(TextContent::new("   \n")));
        assert!(html.contains("<p style=\"margin: 0;\">&nbsp;</p>"));
    }

    #[test]
    fn common_style_reflects_attributes() {
        let html = render(BlockBody::Text(TextContent {
            text: "styled".into(),
            style: BlockStyle {
                align: Some(Align::Right),
                bold: Some(true),
                italic: Some(true),
                font_size: Some(FontSize::Lg),
                color: Some("#123456".into()),
            },
        }));
        for expected in [
            "font-family: sans-serif;",
            "line-height: 1.7;",
            "text-align: right;",
            "font-size: 18px;",
            "color: #123456;",
            "font-weight: bold;",
            "font-style: italic;",
            "margin: 0 0 16px 0;",
        ] {
            assert!(html.contains(expected), "missing {expected} in {html}");
        }
    }

    #[test]
    fn button_escapes_label_and_url() {
        let html = render(BlockBody::Button(ButtonContent {
            text: "Join <now>".into(),
            url: "https://example.org/?a=1&b=\"2\"".into(),
            style: BlockStyle {
                align: Some(Align::Right),
                color: Some("#0000ff".into()),
                ..Default::default()
            },
        }));
        assert!(html.contains("text-align: right;"));
        assert!(html.contains("background-color: #0000ff;"));
        assert!(html.contains("color: #ffffff;"));
        assert!(html.contains("Join &lt;now&gt;</a>"));
        assert!(html.contains("href=\"https://example.org/?a=1&amp;b="));
        assert!(!html.contains("b=\"2\""));
    }

    #[test]
    fn social_lists_platforms_in_order() {
        let html = render_default(&block(BlockKind::Social));
        assert!(html.contains(SOCIAL_LABEL));
        let facebook = html.find(">Facebook</a>").unwrap();
        let twitter = html.find(">Twitter</a>").unwrap();
        let instagram = html.find(">Instagram</a>").unwrap();
        assert!(facebook < twitter && twitter < instagram);
        assert!(html.contains("border-top: 1px solid"));
    }

    #[test]
    fn list_skips_blank_items() {
        let html = render(BlockBody::List(ListContent {
            items: vec!["one".into(), "  ".into(), "".into(), "two".into()],
            style: BlockStyle::default(),
        }));
        assert_eq!(html.matches("<li ").count(), 2);
        assert!(html.contains("padding-left: 24px;"));
    }

    #[test]
    fn footer_year_comes_from_the_render_context() {
        let brand = Brand::default();
        let footer = block(BlockKind::Footer);

        let earlier = render_block(&footer, &RenderContext::new(&brand, 2024));
        let later = render_block(
            &footer,
            &RenderContext::from_clock(&brand, &FixedClock(2030)),
        );

        assert!(earlier.contains("&copy; 2024 "));
        assert!(later.contains("&copy; 2030 "));
        assert!(later.contains(&brand.organization));
    }

    #[test]
    fn unknown_blocks_are_skipped_without_breaking_the_rest() {
        let brand = Brand::default();
        let blocks = vec![
            block(BlockKind::Divider),
            Block::new(
                BlockId::from("mystery"),
                BlockBody::from_parts("carousel".into(), json!({})),
            ),
            block(BlockKind::Divider),
        ];
        let html = render_blocks(&blocks, &RenderContext::new(&brand, 2025));
        assert_eq!(
            html,
            "<hr style=\"margin: 32px 0;\" />\n<hr style=\"margin: 32px 0;\" />"
        );
    }

    #[test]
    fn rendering_is_idempotent() {
        let brand = Brand::default();
        let ctx = RenderContext::new(&brand, 2025);
        let blocks: Vec<Block> = BlockKind::ALL.into_iter().map(block).collect();
        assert_eq!(render_blocks(&blocks, &ctx), render_blocks(&blocks, &ctx));
    }
}
