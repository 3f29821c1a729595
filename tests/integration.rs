//! Integration tests for the Planche composition pipeline.
//!
//! These tests exercise the full path from JSON input to exported layout
//! metadata. They verify:
//! - Template normalization feeds the composer correctly
//! - The block solver, section bands, and renderers agree on geometry
//! - The text flow and caret mapping hold up under editing
//! - The text-box tool state machine behaves across a full gesture

use planche::font::FontContext;
use planche::geometry::{Point, Rect};
use planche::model::*;
use planche::page::PageComposer;
use planche::scene::section::SectionName;
use planche::scene::Scene;
use planche::text::{self, FontSpec};
use planche::tool::{Key, TextBoxTool, ToolState};

// ─── Helpers ────────────────────────────────────────────────────

fn make_block(id: &str, order: u32, kind: BlockKind) -> TemplateBlock {
    TemplateBlock {
        id: id.to_string(),
        order,
        kind,
        content: None,
    }
}

fn standard_template() -> Template {
    Template {
        blocks: vec![
            make_block("header", 0, BlockKind::Header { config: HeaderConfig::default() }),
            make_block("program", 1, BlockKind::Program { config: ProgramConfig::default() }),
            make_block("resources", 2, BlockKind::Resources { config: ResourcesConfig::default() }),
            make_block("work", 3, BlockKind::Content { config: ContentConfig { ruled: true } }),
            make_block("footer", 4, BlockKind::Footer { config: FooterConfig::default() }),
        ],
        settings: TemplateSettings::default(),
    }
}

fn fable_lesson() -> LessonPlan {
    LessonPlan {
        competencies: vec![Competency {
            name: "Reading comprehension".to_string(),
            topics: vec![Topic {
                name: "Fables".to_string(),
                objectives: vec![
                    Objective {
                        name: "Retell the plot".to_string(),
                        method: Some("Discussion".to_string()),
                        social_form: Some("Pairs".to_string()),
                        time: Some("15 min".to_string()),
                        tasks: vec![
                            Task { name: "Read aloud".to_string(), ..Default::default() },
                            Task {
                                name: "Identify the moral".to_string(),
                                social_form: Some("Plenary".to_string()),
                                ..Default::default()
                            },
                        ],
                    },
                    Objective {
                        name: "Compare two fables".to_string(),
                        time: Some("20 min".to_string()),
                        ..Default::default()
                    },
                ],
            }],
        }],
        resources: vec![Resource {
            name: "Fable anthology".to_string(),
            quantity: Some("1 per pair".to_string()),
            note: None,
        }],
    }
}

// ─── Full compose path ──────────────────────────────────────────

#[test]
fn test_full_compose_covers_the_content_box() {
    let mut composer = PageComposer::new();
    let info = composer.compose(&standard_template(), &fable_lesson(), 1.0);

    // Blocks tile the content box exactly, top to bottom.
    let content_height: f64 = info.blocks.iter().map(|b| b.rect.height).sum();
    let expected = info.page.height_px - info.margins.vertical();
    assert!((content_height - expected).abs() < 0.001);

    let mut y = 0.0;
    for block in &info.blocks {
        assert!((block.rect.y - y).abs() < 0.001, "gap above {}", block.id);
        y += block.rect.height;
    }
}

#[test]
fn test_compose_json_round_trip() {
    let input = r#"{
        "template": {"blocks": [
            {"id": "h", "order": 0, "type": "header"},
            {"id": "p", "order": 1, "type": "program"},
            {"id": "x", "order": 2, "type": "mystery"}
        ]},
        "lesson": {"competencies": []}
    }"#;
    let out = planche::compose_json(input).unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    let blocks = value["blocks"].as_array().unwrap();
    assert_eq!(blocks.len(), 3);
    // The unknown kind was normalized to a content block.
    assert_eq!(blocks[2]["name"], "content");
    assert!(value["page"]["widthPx"].as_f64().unwrap() > 700.0);
}

#[test]
fn test_duplicate_block_ids_keep_separate_geometry() {
    // Two blocks sharing an id must not collapse onto one solved rectangle.
    let input = r#"{
        "template": {"blocks": [
            {"id": "dup", "order": 0, "type": "header"},
            {"id": "dup", "order": 1, "type": "program"}
        ]},
        "lesson": {"competencies": []}
    }"#;
    let out = planche::compose_json(input).unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    let blocks = value["blocks"].as_array().unwrap();
    assert_eq!(blocks.len(), 2);
    assert_ne!(blocks[0]["id"], blocks[1]["id"]);
    assert_ne!(blocks[0]["rect"], blocks[1]["rect"]);
    // They still stack: the second starts where the first ends.
    let h0 = blocks[0]["rect"]["height"].as_f64().unwrap();
    let y1 = blocks[1]["rect"]["y"].as_f64().unwrap();
    assert!((y1 - h0).abs() < 0.001);
}

#[test]
fn test_resize_recompose_is_stable_and_leak_free() {
    let mut composer = PageComposer::new();
    let template = standard_template();
    let lesson = fable_lesson();

    let first = composer.compose(&template, &lesson, 1.0);
    let nodes_after_first = composer.scene().live_count();

    // A DPR change recomposes everything at the new scale...
    let scaled = composer.compose(&template, &lesson, 2.0);
    assert!((scaled.page.width_px - first.page.width_px * 2.0).abs() < 0.001);

    // ...and composing back reproduces the original geometry without
    // leaking scene nodes.
    let back = composer.compose(&template, &lesson, 1.0);
    assert_eq!(composer.scene().live_count(), nodes_after_first);
    for (a, b) in first.blocks.iter().zip(&back.blocks) {
        assert_eq!(a.rect, b.rect);
    }
}

#[test]
fn test_program_table_lands_in_the_body_band() {
    let mut composer = PageComposer::new();
    let info = composer.compose(&standard_template(), &fable_lesson(), 1.0);
    let body = composer.sections().section(SectionName::Body).bounds;

    let header = &info.blocks[0];
    let program = &info.blocks[1];
    // The program block starts where the header block ends, which is where
    // the body band starts.
    assert!((program.rect.y - header.rect.height).abs() < 0.001);
    assert!((body.y - (info.margins.top + header.rect.height)).abs() < 0.001);
}

// ─── Solver scenario ────────────────────────────────────────────

#[test]
fn test_percent_header_flex_body() {
    // 800x600 container, header 10%, body flex:1.
    let blocks = vec![
        LayoutBlock {
            id: "header".to_string(),
            name: "header".to_string(),
            size: SizeHint::Percent(10.0),
            axis: Axis::Row,
            gap: 0.0,
            padding: 0.0,
            areas: vec![],
        },
        LayoutBlock {
            id: "body".to_string(),
            name: "body".to_string(),
            size: SizeHint::Flex(1.0),
            axis: Axis::Column,
            gap: 0.0,
            padding: 0.0,
            areas: vec![],
        },
    ];
    let solved = planche::layout::solve(800.0, 600.0, &blocks);
    assert!((solved["header"].rect.height - 60.0).abs() < 0.001);
    assert!((solved["body"].rect.height - 540.0).abs() < 0.001);
}

// ─── Text flow under editing ────────────────────────────────────

#[test]
fn test_wrap_survives_incremental_editing() {
    let ctx = FontContext::new();
    let spec = FontSpec::new("Helvetica", 12.0);
    let mut buffer = String::new();
    for ch in "one two three supercalifragilisticexpialidocious four".chars() {
        buffer.push(ch);
        let lines = text::wrap_text(&ctx, &buffer, 70.0, &spec);
        // Partition invariant holds at every keystroke.
        let mut expected_start = 0;
        for line in &lines {
            assert_eq!(line.start, expected_start);
            expected_start = line.end;
        }
        assert_eq!(expected_start, buffer.chars().count());
    }
}

// ─── Text box tool over a composed page ─────────────────────────

#[test]
fn test_text_box_gesture_on_canvas() {
    let mut scene = Scene::new();
    let ctx = FontContext::new();
    let root = scene.root();
    let mut tool = TextBoxTool::new(&mut scene, root);

    // Sub-threshold drag: nothing happens.
    tool.pointer_down(&mut scene, &ctx, Point::new(100.0, 100.0));
    tool.pointer_up(&mut scene, &ctx, Point::new(104.0, 104.0));
    assert_eq!(tool.state(), ToolState::Idle);
    assert!(tool.areas().is_empty());

    // Real drag: creates and activates an area, caret at index 0.
    tool.pointer_down(&mut scene, &ctx, Point::new(100.0, 100.0));
    tool.pointer_move(&mut scene, &ctx, Point::new(260.0, 180.0));
    tool.pointer_up(&mut scene, &ctx, Point::new(260.0, 180.0));
    let area = tool.active_area().expect("area active after commit");
    assert_eq!(area.bounds, Rect::new(100.0, 100.0, 160.0, 80.0));

    // Type, blink, deactivate: the caret disappears with the active state.
    for ch in "Note".chars() {
        tool.key_input(&mut scene, &ctx, Key::Char(ch));
    }
    tool.blink_tick(&mut scene, &ctx);
    assert!(!tool.caret().unwrap().visible);
    tool.key_input(&mut scene, &ctx, Key::Escape);
    assert!(tool.caret().is_none());
    tool.blink_tick(&mut scene, &ctx);
    assert_eq!(tool.state(), ToolState::Idle);
    assert_eq!(tool.areas()[0].buffer, "Note");
}
