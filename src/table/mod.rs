//! # Table/Grid Renderer
//!
//! Draws the program and resources tables into the scene: header row,
//! zebra-striped data rows, divider lines, and wrapped cell text. Row height
//! follows the tallest wrapped cell, never dropping below a base height.
//!
//! Hierarchical grouping (competency → topic → objective → task) is a
//! display merge: a cell renders only on the first row of its group and
//! blank on following siblings. No colspan/rowspan machinery.

use std::collections::{BTreeMap, BTreeSet};

use crate::font::FontContext;
use crate::geometry::{Point, Rect};
use crate::model::{LessonPlan, ProgramConfig, Resource, ResourcesConfig};
use crate::scene::{Color, NodeId, Scene, Stroke};
use crate::text::{self, FontSpec};

/// Floor for a column width; prevents unreadable columns when a template
/// turns on every optional column.
pub const MIN_COLUMN_WIDTH: f64 = 80.0;

/// Minimum row height, pixels.
pub const BASE_ROW_HEIGHT: f64 = 24.0;

/// Horizontal inset of cell text from the column edge.
const CELL_PADDING: f64 = 4.0;

/// Vertical padding added around the tallest wrapped cell.
const VERTICAL_PADDING: f64 = 8.0;

#[derive(Debug, Clone)]
pub struct Column {
    pub key: String,
    pub label: String,
}

impl Column {
    pub fn new(key: &str, label: &str) -> Self {
        Column {
            key: key.to_string(),
            label: label.to_string(),
        }
    }
}

/// One display row: column-key → text, plus the set of grouping columns
/// whose value this row repeats from the previous sibling (rendered blank).
#[derive(Debug, Clone, Default)]
pub struct TableRow {
    cells: BTreeMap<String, String>,
    repeated: BTreeSet<String>,
}

impl TableRow {
    pub fn new() -> Self {
        TableRow::default()
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.cells.insert(key.to_string(), value.to_string());
    }

    /// Mark a grouping column as repeating its parent's label.
    pub fn mark_repeated(&mut self, key: &str) {
        self.repeated.insert(key.to_string());
    }

    /// Text to render for a column: empty for a missing cell (malformed
    /// input degrades to blank, never a crash) and for repeated group cells.
    pub fn display(&self, key: &str) -> &str {
        if self.repeated.contains(key) {
            return "";
        }
        self.cells.get(key).map(String::as_str).unwrap_or("")
    }
}

/// Everything the renderer needs besides the data itself.
pub struct TableStyle {
    pub font: FontSpec,
    pub header_font: FontSpec,
    pub text_color: Color,
    pub stripe_fill: Color,
    pub header_fill: Color,
    pub divider: Stroke,
}

impl TableStyle {
    pub fn standard(family: &str, size: f64) -> Self {
        TableStyle {
            font: FontSpec::new(family, size),
            header_font: FontSpec::bold(family, size),
            text_color: Color::BLACK,
            stripe_fill: Color::hex("#f2f2f2"),
            header_fill: Color::hex("#e4e4e4"),
            divider: Stroke::new(Color::hex("#c8c8c8"), 1.0),
        }
    }
}

/// Render a table under `parent` at local (0,0). Returns the total height in
/// pixels so the caller can stack content below it.
pub fn render(
    scene: &mut Scene,
    parent: NodeId,
    ctx: &FontContext,
    rows: &[TableRow],
    columns: &[Column],
    width: f64,
    style: &TableStyle,
) -> f64 {
    if columns.is_empty() {
        return 0.0;
    }
    if rows.is_empty() {
        return render_placeholder(scene, parent, ctx, style);
    }

    let col_width = (width / columns.len() as f64).max(MIN_COLUMN_WIDTH);
    let table_width = col_width * columns.len() as f64;
    let wrap_width = (col_width - 2.0 * CELL_PADDING).max(1.0);

    let mut y = 0.0;

    // Header row, bold, filled, excluded from striping.
    let header_texts: Vec<&str> = columns.iter().map(|c| c.label.as_str()).collect();
    let header_height = row_height(ctx, &header_texts, wrap_width, &style.header_font);
    scene.add_rect(
        parent,
        Rect::new(0.0, y, table_width, header_height),
        Some(style.header_fill),
        None,
    );
    draw_row_text(
        scene,
        parent,
        ctx,
        &header_texts,
        col_width,
        wrap_width,
        y,
        &style.header_font,
        style.text_color,
    );
    y += header_height;
    scene.add_line(
        parent,
        Point::new(0.0, y),
        Point::new(table_width, y),
        style.divider,
    );

    // Data rows. Index 0 unstriped, odd indices striped.
    for (i, row) in rows.iter().enumerate() {
        let texts: Vec<&str> = columns.iter().map(|c| row.display(&c.key)).collect();
        let height = row_height(ctx, &texts, wrap_width, &style.font);
        if i % 2 == 1 {
            scene.add_rect(
                parent,
                Rect::new(0.0, y, table_width, height),
                Some(style.stripe_fill),
                None,
            );
        }
        draw_row_text(
            scene,
            parent,
            ctx,
            &texts,
            col_width,
            wrap_width,
            y,
            &style.font,
            style.text_color,
        );
        y += height;
        scene.add_line(
            parent,
            Point::new(0.0, y),
            Point::new(table_width, y),
            style.divider,
        );
    }

    // Column separators over the full table height.
    for c in 1..columns.len() {
        let x = c as f64 * col_width;
        scene.add_line(parent, Point::new(x, 0.0), Point::new(x, y), style.divider);
    }

    y
}

/// Row height: base floor, or the tallest wrapped cell plus padding.
fn row_height(ctx: &FontContext, texts: &[&str], wrap_width: f64, font: &FontSpec) -> f64 {
    let tallest = texts
        .iter()
        .map(|t| text::text_bounds(ctx, t, wrap_width, font).height)
        .fold(0.0, f64::max);
    BASE_ROW_HEIGHT.max(tallest + VERTICAL_PADDING)
}

#[allow(clippy::too_many_arguments)]
fn draw_row_text(
    scene: &mut Scene,
    parent: NodeId,
    ctx: &FontContext,
    texts: &[&str],
    col_width: f64,
    wrap_width: f64,
    y: f64,
    font: &FontSpec,
    color: Color,
) {
    for (c, content) in texts.iter().enumerate() {
        if content.is_empty() {
            continue;
        }
        let lines = text::wrap_text(ctx, content, wrap_width, font);
        let size = text::text_bounds(ctx, content, wrap_width, font);
        scene.add_text(
            parent,
            Point::new(c as f64 * col_width + CELL_PADDING, y + VERTICAL_PADDING / 2.0),
            content,
            font.clone(),
            color,
            lines,
            size,
        );
    }
}

/// Zero rows renders a single placeholder line instead of an empty table.
fn render_placeholder(
    scene: &mut Scene,
    parent: NodeId,
    ctx: &FontContext,
    style: &TableStyle,
) -> f64 {
    let content = "No entries";
    let lines = text::wrap_text(ctx, content, f64::INFINITY, &style.font);
    let size = text::text_bounds(ctx, content, f64::INFINITY, &style.font);
    scene.add_text(
        parent,
        Point::new(CELL_PADDING, VERTICAL_PADDING / 2.0),
        content,
        style.font.clone(),
        Color::hex("#888888"),
        lines,
        size,
    );
    BASE_ROW_HEIGHT.max(size.height + VERTICAL_PADDING)
}

// ── Lesson flattening ──────────────────────────────────────────────

/// Flatten the nested lesson plan into program-table columns and rows.
///
/// One row per task; an objective without tasks still yields a row. Group
/// cells repeat-suppress per level so the hierarchy reads visually.
pub fn flatten_program(plan: &LessonPlan, config: &ProgramConfig) -> (Vec<Column>, Vec<TableRow>) {
    let mut columns = vec![
        Column::new("competency", "Competency"),
        Column::new("topic", "Topic"),
        Column::new("objective", "Objective"),
        Column::new("task", "Task"),
    ];
    if config.method {
        columns.push(Column::new("method", "Method"));
    }
    if config.social_form {
        columns.push(Column::new("socialForm", "Social form"));
    }
    if config.time {
        columns.push(Column::new("time", "Time"));
    }

    let mut rows = Vec::new();
    for competency in &plan.competencies {
        let mut first_of_competency = true;
        for topic in &competency.topics {
            let mut first_of_topic = true;
            for objective in &topic.objectives {
                let mut first_of_objective = true;
                let tasks: Vec<(String, Option<&str>, Option<&str>, Option<&str>)> =
                    if objective.tasks.is_empty() {
                        vec![(
                            String::new(),
                            objective.method.as_deref(),
                            objective.social_form.as_deref(),
                            objective.time.as_deref(),
                        )]
                    } else {
                        objective
                            .tasks
                            .iter()
                            .map(|t| {
                                (
                                    t.name.clone(),
                                    t.method.as_deref().or(objective.method.as_deref()),
                                    t.social_form.as_deref().or(objective.social_form.as_deref()),
                                    t.time.as_deref().or(objective.time.as_deref()),
                                )
                            })
                            .collect()
                    };

                for (task, method, social_form, time) in tasks {
                    let mut row = TableRow::new();
                    row.set("competency", &competency.name);
                    row.set("topic", &topic.name);
                    row.set("objective", &objective.name);
                    row.set("task", &task);
                    if let Some(m) = method {
                        row.set("method", m);
                    }
                    if let Some(s) = social_form {
                        row.set("socialForm", s);
                    }
                    if let Some(t) = time {
                        row.set("time", t);
                    }
                    if !first_of_competency {
                        row.mark_repeated("competency");
                    }
                    if !first_of_topic {
                        row.mark_repeated("topic");
                    }
                    if !first_of_objective {
                        row.mark_repeated("objective");
                    }
                    rows.push(row);
                    first_of_competency = false;
                    first_of_topic = false;
                    first_of_objective = false;
                }
            }
        }
    }
    (columns, rows)
}

/// Flatten the materials list into resources-table columns and rows.
pub fn flatten_resources(
    resources: &[Resource],
    config: &ResourcesConfig,
) -> (Vec<Column>, Vec<TableRow>) {
    let mut columns = vec![Column::new("name", "Material")];
    if config.quantity {
        columns.push(Column::new("quantity", "Quantity"));
    }
    if config.note {
        columns.push(Column::new("note", "Note"));
    }

    let rows = resources
        .iter()
        .map(|r| {
            let mut row = TableRow::new();
            row.set("name", &r.name);
            if let Some(q) = &r.quantity {
                row.set("quantity", q);
            }
            if let Some(n) = &r.note {
                row.set("note", n);
            }
            row
        })
        .collect();
    (columns, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Competency, Objective, Task, Topic};

    fn plan_two_topics() -> LessonPlan {
        LessonPlan {
            competencies: vec![Competency {
                name: "A".to_string(),
                topics: vec![
                    Topic {
                        name: "T1".to_string(),
                        objectives: vec![Objective {
                            name: "O1".to_string(),
                            tasks: vec![Task {
                                name: "task 1".to_string(),
                                ..Default::default()
                            }],
                            ..Default::default()
                        }],
                    },
                    Topic {
                        name: "T2".to_string(),
                        objectives: vec![Objective {
                            name: "O2".to_string(),
                            ..Default::default()
                        }],
                    },
                ],
            }],
            resources: vec![],
        }
    }

    #[test]
    fn test_group_repeat_suppression() {
        // Second row shares the competency, so its competency cell renders
        // blank while the topic cell still shows "T2".
        let (_, rows) = flatten_program(&plan_two_topics(), &ProgramConfig::default());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].display("competency"), "A");
        assert_eq!(rows[0].display("topic"), "T1");
        assert_eq!(rows[1].display("competency"), "");
        assert_eq!(rows[1].display("topic"), "T2");
    }

    #[test]
    fn test_objective_without_tasks_still_produces_row() {
        let (_, rows) = flatten_program(&plan_two_topics(), &ProgramConfig::default());
        assert_eq!(rows[1].display("objective"), "O2");
        assert_eq!(rows[1].display("task"), "");
    }

    #[test]
    fn test_optional_columns_follow_config() {
        let config = ProgramConfig {
            method: false,
            social_form: false,
            time: true,
        };
        let (columns, _) = flatten_program(&plan_two_topics(), &config);
        let keys: Vec<&str> = columns.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["competency", "topic", "objective", "task", "time"]);
    }

    #[test]
    fn test_missing_cell_renders_blank() {
        let row = TableRow::new();
        assert_eq!(row.display("whatever"), "");
    }

    #[test]
    fn test_column_width_floor() {
        // 10 columns in 400px would be 40px each; the floor keeps them
        // readable at 80px.
        let ctx = FontContext::new();
        let mut scene = Scene::new();
        let parent = scene.add_group(scene.root(), Point::default());
        let columns: Vec<Column> = (0..10)
            .map(|i| Column::new(&format!("c{i}"), &format!("Col {i}")))
            .collect();
        let mut row = TableRow::new();
        row.set("c0", "x");
        let style = TableStyle::standard("Helvetica", 10.0);
        let height = render(&mut scene, parent, &ctx, &[row], &columns, 400.0, &style);
        assert!(height >= BASE_ROW_HEIGHT);
        // Column separators start at 80px spacing, not 40px.
        let sep_x: Vec<f64> = collect_line_xs(&scene, parent);
        assert!(sep_x.contains(&80.0));
        assert!(!sep_x.contains(&40.0));
    }

    fn collect_line_xs(scene: &Scene, parent: NodeId) -> Vec<f64> {
        let node = scene.get(parent).unwrap();
        node.children()
            .iter()
            .filter_map(|id| scene.get(*id))
            .filter_map(|n| match &n.kind {
                crate::scene::NodeKind::Line { from, to, .. } if from.x == to.x => Some(from.x),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_empty_rows_render_placeholder() {
        let ctx = FontContext::new();
        let mut scene = Scene::new();
        let parent = scene.add_group(scene.root(), Point::default());
        let columns = vec![Column::new("a", "A")];
        let style = TableStyle::standard("Helvetica", 10.0);
        let height = render(&mut scene, parent, &ctx, &[], &columns, 400.0, &style);
        assert!(height > 0.0);
        let texts: Vec<String> = scene
            .get(parent)
            .unwrap()
            .children()
            .iter()
            .filter_map(|id| scene.get(*id))
            .filter_map(|n| match &n.kind {
                crate::scene::NodeKind::Text { content, .. } => Some(content.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["No entries".to_string()]);
    }

    #[test]
    fn test_row_height_tracks_wrapped_text() {
        let ctx = FontContext::new();
        let mut scene = Scene::new();
        let parent = scene.add_group(scene.root(), Point::default());
        let columns = vec![Column::new("a", "A"), Column::new("b", "B")];
        let mut short = TableRow::new();
        short.set("a", "x");
        let mut tall = TableRow::new();
        tall.set(
            "a",
            "a rather long cell value that will wrap onto several lines at eighty pixels",
        );
        let style = TableStyle::standard("Helvetica", 10.0);
        let h_short = render(&mut scene, parent, &ctx, &[short], &columns, 160.0, &style);
        scene.clear_children(parent);
        let h_tall = render(&mut scene, parent, &ctx, &[tall], &columns, 160.0, &style);
        assert!(h_tall > h_short);
    }
}
