use std::cell::RefCell;
use std::rc::Rc;

use missive_core::{
    Align, BlockBody, BlockKind, ContentPatch, DecodeOutcome, DragGesture, EditorAction,
    EditorCallbacks, EditorOptions, EditorSession, FixedClock, FontSize, KeyboardMove,
    ReorderTarget, SequentialIds, SocialLink, TextContent, decode_document, render_blocks,
    try_extract_state,
};
use serde_json::Value;

fn open(initial: Option<&str>) -> EditorSession<FixedClock> {
    let mut options = EditorOptions::default().clock(FixedClock(2025));
    if let Some(html) = initial {
        options = options.initial_html(html);
    }
    EditorSession::new(options, EditorCallbacks::default())
}

fn embedded_state(output: &str) -> Vec<Value> {
    let (_, json) = output.rsplit_once("<!-- BUILDER_STATE: ").unwrap();
    serde_json::from_str(json.trim_end_matches(" -->")).unwrap()
}

#[test]
fn edits_survive_a_save_and_reload() {
    let mut session = open(None);
    let heading = session.add_block(BlockKind::Heading);
    let text = session.add_block(BlockKind::Text);
    let button = session.add_block(BlockKind::Button);
    let social = session.add_block(BlockKind::Social);
    session.add_block(BlockKind::Divider);
    let spacer = session.add_block(BlockKind::Spacer);
    let list = session.add_block(BlockKind::List);
    session.add_block(BlockKind::Footer);

    session.update_block_content(&heading, ContentPatch::new().text("Spring field days"));
    session.update_block_content(
        &text,
        ContentPatch::new()
            .text("Join us <b>this</b> Saturday.\nBring water --> and a hat.")
            .align(Align::Center)
            .italic(true),
    );
    session.update_block_content(
        &button,
        ContentPatch::new()
            .text("Register")
            .url("https://example.org/register?a=1&b=2"),
    );
    session.update_block_content(
        &social,
        ContentPatch::new().platforms(vec![SocialLink::new("Mastodon", "https://example.social")]),
    );
    session.update_block_content(&spacer, ContentPatch::new().height("48"));
    session.update_block_content(
        &list,
        ContentPatch::new()
            .items(["Trails", "", "Birding"])
            .font_size(FontSize::Lg),
    );
    session.reorder_block(&button, 1);
    session.duplicate_block(&text);
    session.move_block(&list, KeyboardMove::Top);

    let saved = session.output().to_owned();
    let reopened = open(Some(&saved));

    assert_eq!(reopened.load_outcome(), DecodeOutcome::Restored);
    assert_eq!(reopened.blocks(), session.blocks());
    assert_eq!(reopened.selected(), None);
    assert_eq!(reopened.output(), saved);
}

#[test]
fn marker_text_in_a_heading_does_not_break_reloading() {
    let mut session = open(None);
    let heading = session.add_block(BlockKind::Heading);
    session.update_block_content(
        &heading,
        ContentPatch::new().text("Note <!-- BUILDER_STATE: draft"),
    );
    session.add_block(BlockKind::Footer);

    let reopened = open(Some(session.output()));

    assert_eq!(reopened.load_outcome(), DecodeOutcome::Restored);
    assert_eq!(reopened.blocks(), session.blocks());
}

#[test]
fn reordered_button_renders_and_saves_first() {
    let mut session = open(None);
    let heading = session.add_block(BlockKind::Heading);
    let button = session.add_block(BlockKind::Button);

    let BlockBody::Heading(TextContent { text, .. }) = &session.blocks()[0].body else {
        panic!("heading expected");
    };
    assert_eq!(text, "New Heading");
    let BlockBody::Button(content) = &session.blocks()[1].body else {
        panic!("button expected");
    };
    assert_eq!(content.text, "Take Action");
    assert_eq!(content.url, "https://");

    assert!(session.reorder_block(&button, 0));

    let html = session.render_html();
    let button_at = html.find("Take Action").unwrap();
    let heading_at = html.find("New Heading").unwrap();
    assert!(button_at < heading_at);

    let state = embedded_state(session.output());
    assert_eq!(state[0]["type"], "button");
    assert_eq!(state[1]["id"], heading.as_str());
}

#[test]
fn heading_color_patch_shows_up_in_the_render() {
    let saved = r#"<!-- BUILDER_STATE: [{"id":"h","type":"heading","content":{"text":"Hello"}}] -->"#;
    let mut session = open(Some(saved));
    let heading = session.blocks()[0].id.clone();
    assert!(!session.render_html().contains("color: #ff0000"));

    assert!(session.update_block_content(&heading, ContentPatch::new().color("#ff0000")));

    assert!(session.render_html().contains("color: #ff0000"));
    let BlockBody::Heading(content) = &session.blocks()[0].body else {
        panic!("heading expected");
    };
    assert_eq!(content.text, "Hello");
}

#[test]
fn legacy_template_becomes_one_text_block() {
    let legacy = "<table><tr><td><h1>Old newsletter</h1></td></tr></table>";
    let session = open(Some(legacy));

    assert_eq!(session.load_outcome(), DecodeOutcome::Legacy);
    assert_eq!(session.blocks().len(), 1);
    assert_eq!(session.blocks()[0].kind(), Some(BlockKind::Text));
    assert_eq!(
        session.blocks()[0].body,
        BlockBody::Text(TextContent::new(legacy))
    );
}

#[test]
fn malformed_state_keeps_the_visible_html() {
    let saved = "<h2>Visible</h2>\n\n<!-- BUILDER_STATE: {not valid -->";
    let session = open(Some(saved));

    assert_eq!(session.load_outcome(), DecodeOutcome::Malformed);
    assert_eq!(session.blocks().len(), 1);
    assert_eq!(
        session.blocks()[0].body,
        BlockBody::Text(TextContent::new("<h2>Visible</h2>"))
    );
}

#[test]
fn added_blocks_start_with_their_defaults() {
    let mut session = open(None);
    let spacer = session.add_block(BlockKind::Spacer);
    let list = session.add_block(BlockKind::List);

    let state = embedded_state(session.output());
    assert_eq!(state[0]["id"], spacer.as_str());
    assert_eq!(state[0]["content"]["height"], "32");
    assert_eq!(state[1]["id"], list.as_str());
    assert_eq!(state[1]["content"]["items"].as_array().unwrap().len(), 3);
}

#[test]
fn nothing_renders_to_nothing() {
    let session = open(None);
    assert_eq!(session.render_html(), "");
    assert_eq!(session.output(), "\n\n<!-- BUILDER_STATE: [] -->");
}

#[test]
fn rendering_is_idempotent_for_a_fixed_year() {
    let mut session = open(None);
    for kind in BlockKind::ALL {
        session.add_block(kind);
    }
    let brand = session.document().brand().clone();
    let ctx = missive_core::RenderContext::new(&brand, 2025);

    let first = render_blocks(session.blocks(), &ctx);
    let second = render_blocks(session.blocks(), &ctx);
    assert_eq!(first, second);
    assert_eq!(first, session.render_html());
}

#[test]
fn on_change_fires_once_per_effective_edit() {
    let seen: Rc<RefCell<Vec<String>>> = Rc::default();
    let sink = seen.clone();
    let mut session = EditorSession::new(
        EditorOptions::default().clock(FixedClock(2025)),
        EditorCallbacks::new().on_change(move |html| sink.borrow_mut().push(html.to_owned())),
    );
    assert!(seen.borrow().is_empty());

    let heading = session.add_block(BlockKind::Heading);
    let footer = session.add_block(BlockKind::Footer);
    session.select_block(Some(&heading));
    session.reorder_block(&footer, 0);
    session.reorder_block(&footer, 0);
    session.delete_block(&"missing".into());
    session.update_block_content(&heading, ContentPatch::new().bold(true));
    session.apply(&EditorAction::Select { id: None });
    session.apply(&EditorAction::DeleteBlock { id: footer });

    let seen = seen.borrow();
    assert_eq!(seen.len(), 5);
    assert_eq!(seen.last().map(String::as_str), Some(session.output()));
}

#[test]
fn drag_and_drop_goes_through_the_reorder_target() {
    let mut session = open(None);
    let a = session.add_block(BlockKind::Heading);
    let b = session.add_block(BlockKind::Text);
    let c = session.add_block(BlockKind::Footer);

    let snapshot = session.blocks().to_vec();
    assert!(DragGesture::new(c.clone(), Some(a.clone())).apply(&snapshot, &mut session));
    let order: Vec<_> = session.blocks().iter().map(|b| b.id.clone()).collect();
    assert_eq!(order, vec![c.clone(), a.clone(), b.clone()]);

    assert!(!session.on_reorder(&"missing".into(), 0));
    assert!(session.apply(&EditorAction::Drop(DragGesture::new(a.clone(), Some(b)))));
    assert_eq!(session.blocks()[2].id, a);
}

#[test]
fn decode_runs_once_per_session() {
    let saved = r#"<!-- BUILDER_STATE: [{"id":"block-9","type":"divider","content":{}}] -->"#;
    let mut session = open(Some(saved));
    let added = session.add_block(BlockKind::Text);

    assert_eq!(added.as_str(), "block-10");
    assert_eq!(session.blocks().len(), 2);
    assert_eq!(try_extract_state(session.output()).unwrap(), session.blocks());
}

#[test]
fn unknown_blocks_are_kept_but_not_rendered() {
    let saved = r#"<!-- BUILDER_STATE: [{"id":"x","type":"video","content":{"src":"a.mp4"}},{"id":"y","type":"divider","content":{}}] -->"#;
    let session = open(Some(saved));

    assert_eq!(session.blocks().len(), 2);
    assert_eq!(session.blocks()[0].kind(), None);
    assert!(session.render_html().starts_with("<hr"));

    let decoded = decode_document(Some(session.output()), &mut SequentialIds::new());
    assert_eq!(decoded.blocks, session.blocks());
    assert_eq!(embedded_state(session.output())[0]["content"]["src"], "a.mp4");
}
