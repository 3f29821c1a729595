//! # Text Box Tool
//!
//! Drag-to-create text regions with an editable buffer and a blinking caret.
//!
//! The tool is an explicit state machine — `Idle`, `Creating`, `Active` —
//! so illegal combinations (a blinking caret with no active area, a live
//! drag guide outside a drag) cannot be represented. The caret exists only
//! inside the `Active` variant; deactivating destroys it, which is what
//! makes a late blink tick a structural no-op instead of a use-after-free
//! style bug.
//!
//! All pointer coordinates are local to the tool's container. The host owns
//! the 500 ms blink interval and calls [`TextBoxTool::blink_tick`]; the
//! engine itself has no timers.

use crate::font::FontContext;
use crate::geometry::{Point, Rect};
use crate::scene::{Color, NodeId, Scene, Stroke};
use crate::text::{self, FontSpec, LineInfo};

/// Drag extents below this (either axis) are treated as a cancelled gesture.
pub const MIN_DRAG_SIZE: f64 = 8.0;

/// Committed bounds are clamped up to this; a degenerate text box is
/// preferable to a crash mid-gesture.
pub const MIN_AREA_SIZE: f64 = 10.0;

/// Caret blink interval the host is expected to drive, milliseconds.
pub const BLINK_INTERVAL_MS: u64 = 500;

/// Inset between the area border and its text.
const TEXT_INSET: f64 = 2.0;

/// Uniform style for one text area (single style per box, no rich runs).
#[derive(Debug, Clone)]
pub struct TextAreaSettings {
    pub font: FontSpec,
    pub color: Color,
    pub border_color: Color,
}

impl Default for TextAreaSettings {
    fn default() -> Self {
        TextAreaSettings {
            font: FontSpec::new("Helvetica", 14.0),
            color: Color::BLACK,
            border_color: Color::hex("#9a9a9a"),
        }
    }
}

/// The caret. Owned exclusively by the `Active` tool state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaretState {
    pub char_index: usize,
    pub visible: bool,
}

/// One committed text region.
#[derive(Debug, Clone)]
pub struct TextAreaState {
    pub id: u64,
    /// Container-local bounds.
    pub bounds: Rect,
    pub buffer: String,
    pub settings: TextAreaSettings,
    /// Current wrap of `buffer` at the area's inner width.
    pub lines: Vec<LineInfo>,
    /// Scene subtree owned by this area.
    container: NodeId,
}

impl TextAreaState {
    fn wrap_width(&self) -> f64 {
        (self.bounds.width - 2.0 * TEXT_INSET).max(1.0)
    }

    fn char_count(&self) -> usize {
        self.buffer.chars().count()
    }
}

/// Keyboard input routed to the active area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToolState {
    Idle,
    /// Pointer is down and dragging out a creation rectangle.
    Creating { origin: Point, current: Point },
    /// A committed area receives keyboard input; the caret lives here.
    Active { area_id: u64, caret: CaretState },
}

pub struct TextBoxTool {
    state: ToolState,
    areas: Vec<TextAreaState>,
    next_id: u64,
    /// The tool's own sub-container; the only place it re-enables
    /// interactivity inside otherwise locked sections.
    container: NodeId,
    guide: Option<NodeId>,
}

impl TextBoxTool {
    /// Attach the tool under `parent` (typically a content area's node).
    pub fn new(scene: &mut Scene, parent: NodeId) -> Self {
        let container = scene.add_group(parent, Point::default());
        if let Some(node) = scene.get_mut(container) {
            node.interactive = true;
        }
        TextBoxTool {
            state: ToolState::Idle,
            areas: vec![],
            next_id: 1,
            container,
            guide: None,
        }
    }

    pub fn state(&self) -> ToolState {
        self.state
    }

    pub fn areas(&self) -> &[TextAreaState] {
        &self.areas
    }

    /// The caret, if an area is active.
    pub fn caret(&self) -> Option<CaretState> {
        match self.state {
            ToolState::Active { caret, .. } => Some(caret),
            _ => None,
        }
    }

    pub fn active_area(&self) -> Option<&TextAreaState> {
        match self.state {
            ToolState::Active { area_id, .. } => self.areas.iter().find(|a| a.id == area_id),
            _ => None,
        }
    }

    // ── Pointer events ─────────────────────────────────────────────

    /// Pointer down: place the caret in the hit area, activate another
    /// area, or begin a creation drag on empty canvas. A pointer-down that
    /// arrives while a drag is still tracked (focus was lost mid-gesture)
    /// cancels the stale drag first.
    pub fn pointer_down(&mut self, scene: &mut Scene, ctx: &FontContext, point: Point) {
        if matches!(self.state, ToolState::Creating { .. }) {
            self.cancel_creation(scene);
        }

        // Topmost existing area under the pointer wins.
        if let Some(id) = self
            .areas
            .iter()
            .rev()
            .find(|a| a.bounds.contains(point))
            .map(|a| a.id)
        {
            self.activate(scene, ctx, id, Some(point));
            return;
        }

        // Click outside any area deactivates, then starts a fresh drag.
        if matches!(self.state, ToolState::Active { .. }) {
            self.deactivate(scene, ctx);
        }
        self.state = ToolState::Creating {
            origin: point,
            current: point,
        };
        self.redraw_guide(scene, ctx);
    }

    /// Pointer move: grow the live creation guide. No area exists yet.
    pub fn pointer_move(&mut self, scene: &mut Scene, ctx: &FontContext, point: Point) {
        if let ToolState::Creating { origin, .. } = self.state {
            self.state = ToolState::Creating {
                origin,
                current: point,
            };
            self.redraw_guide(scene, ctx);
        }
    }

    /// Pointer up: commit the drag rectangle if it clears the threshold,
    /// otherwise abort silently back to idle.
    pub fn pointer_up(&mut self, scene: &mut Scene, ctx: &FontContext, point: Point) {
        let ToolState::Creating { origin, .. } = self.state else {
            return;
        };
        self.remove_guide(scene);

        let rect = Rect::from_corners(origin, point);
        if rect.width < MIN_DRAG_SIZE || rect.height < MIN_DRAG_SIZE {
            self.state = ToolState::Idle;
            return;
        }

        let bounds = Rect::new(
            rect.x,
            rect.y,
            rect.width.max(MIN_AREA_SIZE),
            rect.height.max(MIN_AREA_SIZE),
        );
        let container = scene.add_group(self.container, Point::new(bounds.x, bounds.y));
        let id = self.next_id;
        self.next_id += 1;
        let settings = TextAreaSettings::default();
        let lines = text::wrap_text(ctx, "", 1.0, &settings.font);
        self.areas.push(TextAreaState {
            id,
            bounds,
            buffer: String::new(),
            settings,
            lines,
            container,
        });
        self.state = ToolState::Active {
            area_id: id,
            caret: CaretState {
                char_index: 0,
                visible: true,
            },
        };
        self.reflow_active(scene, ctx);
    }

    // ── Keyboard ───────────────────────────────────────────────────

    /// Route a key to the active area. Ignored in any other state.
    pub fn key_input(&mut self, scene: &mut Scene, ctx: &FontContext, key: Key) {
        let ToolState::Active { area_id, caret } = self.state else {
            return;
        };
        if key == Key::Escape {
            self.deactivate(scene, ctx);
            return;
        }
        let Some(area) = self.areas.iter_mut().find(|a| a.id == area_id) else {
            self.state = ToolState::Idle;
            return;
        };

        let mut index = caret.char_index.min(area.char_count());
        match key {
            Key::Char(ch) => {
                let at = byte_index(&area.buffer, index);
                area.buffer.insert(at, ch);
                index += 1;
            }
            Key::Backspace => {
                if index > 0 {
                    let at = byte_index(&area.buffer, index - 1);
                    area.buffer.remove(at);
                    index -= 1;
                }
            }
            Key::Delete => {
                if index < area.char_count() {
                    let at = byte_index(&area.buffer, index);
                    area.buffer.remove(at);
                }
            }
            Key::Left => index = index.saturating_sub(1),
            Key::Right => index = (index + 1).min(area.char_count()),
            Key::Up | Key::Down => {
                index = vertical_move(ctx, area, index, key == Key::Down);
            }
            Key::Escape => unreachable!("handled above"),
        }

        // Any edit or caret move restarts the blink phase visible.
        self.state = ToolState::Active {
            area_id,
            caret: CaretState {
                char_index: index,
                visible: true,
            },
        };
        self.reflow_active(scene, ctx);
    }

    // ── Blink ──────────────────────────────────────────────────────

    /// Toggle caret visibility. The host calls this every
    /// [`BLINK_INTERVAL_MS`]; outside `Active` there is no caret to toggle
    /// and the call does nothing, so deactivation alone "stops the timer".
    pub fn blink_tick(&mut self, scene: &mut Scene, ctx: &FontContext) {
        if let ToolState::Active { area_id, caret } = self.state {
            self.state = ToolState::Active {
                area_id,
                caret: CaretState {
                    char_index: caret.char_index,
                    visible: !caret.visible,
                },
            };
            self.reflow_active(scene, ctx);
        }
    }

    // ── Lifecycle ──────────────────────────────────────────────────

    /// Leave `Active` (tool switch, Escape, click-outside). Hides the
    /// caret and repaints the area with its inactive border.
    pub fn deactivate(&mut self, scene: &mut Scene, ctx: &FontContext) {
        if let ToolState::Active { area_id, .. } = self.state {
            self.state = ToolState::Idle;
            if let Some(area) = self.areas.iter().find(|a| a.id == area_id).cloned() {
                render_area(scene, ctx, &area, None);
            }
        }
        if matches!(self.state, ToolState::Creating { .. }) {
            self.cancel_creation(scene);
        }
    }

    /// Activate an area, deactivating the previous one. `point` places the
    /// caret; `None` puts it at the end of the buffer.
    pub fn activate(&mut self, scene: &mut Scene, ctx: &FontContext, id: u64, point: Option<Point>) {
        if !self.areas.iter().any(|a| a.id == id) {
            return;
        }
        if let ToolState::Active { area_id, .. } = self.state {
            if area_id != id {
                self.deactivate(scene, ctx);
            }
        }
        let Some(area) = self.areas.iter().find(|a| a.id == id) else {
            return;
        };
        let char_index = match point {
            Some(p) => {
                let local = Point::new(
                    p.x - area.bounds.x - TEXT_INSET,
                    p.y - area.bounds.y - TEXT_INSET,
                );
                text::char_index_at(ctx, local, &area.lines, &area.settings.font)
            }
            None => area.char_count(),
        };
        self.state = ToolState::Active {
            area_id: id,
            caret: CaretState {
                char_index,
                visible: true,
            },
        };
        self.reflow_active(scene, ctx);
    }

    /// Resize an existing area. Zero or negative extents clamp to the
    /// minimum instead of being rejected.
    pub fn resize_area(&mut self, scene: &mut Scene, ctx: &FontContext, id: u64, bounds: Rect) {
        let Some(area) = self.areas.iter_mut().find(|a| a.id == id) else {
            return;
        };
        area.bounds = Rect::new(
            bounds.x,
            bounds.y,
            bounds.width.max(MIN_AREA_SIZE),
            bounds.height.max(MIN_AREA_SIZE),
        );
        let area = area.clone();
        let caret = match self.state {
            ToolState::Active { area_id, caret } if area_id == id => Some(caret),
            _ => None,
        };
        self.rewrap(scene, ctx, &area, caret);
    }

    /// Eraser-style deletion: destroy the topmost area under the pointer.
    /// Returns whether anything was removed.
    pub fn erase_at(&mut self, scene: &mut Scene, point: Point) -> bool {
        let Some(idx) = self.areas.iter().rposition(|a| a.bounds.contains(point)) else {
            return false;
        };
        let area = self.areas.remove(idx);
        if matches!(self.state, ToolState::Active { area_id, .. } if area_id == area.id) {
            self.state = ToolState::Idle;
        }
        scene.remove(area.container);
        true
    }

    /// Tear down everything the tool owns.
    pub fn teardown(&mut self, scene: &mut Scene) {
        self.state = ToolState::Idle;
        self.areas.clear();
        self.guide = None;
        scene.clear_children(self.container);
    }

    // ── Internals ──────────────────────────────────────────────────

    fn cancel_creation(&mut self, scene: &mut Scene) {
        self.remove_guide(scene);
        self.state = ToolState::Idle;
    }

    fn remove_guide(&mut self, scene: &mut Scene) {
        if let Some(guide) = self.guide.take() {
            scene.remove(guide);
        }
    }

    /// Clear-then-redraw the dashed creation overlay with its size label.
    fn redraw_guide(&mut self, scene: &mut Scene, ctx: &FontContext) {
        self.remove_guide(scene);
        let ToolState::Creating { origin, current } = self.state else {
            return;
        };
        let rect = Rect::from_corners(origin, current);
        let guide = scene.add_group(self.container, Point::new(rect.x, rect.y));
        scene.add_rect(
            guide,
            Rect::new(0.0, 0.0, rect.width, rect.height),
            None,
            Some(Stroke::new(Color::hex("#4a90d9"), 1.0)),
        );
        let label = format!("{} × {}", rect.width.round(), rect.height.round());
        let spec = FontSpec::new("Helvetica", 10.0);
        let lines = text::wrap_text(ctx, &label, f64::INFINITY, &spec);
        let size = text::text_bounds(ctx, &label, f64::INFINITY, &spec);
        scene.add_text(
            guide,
            Point::new(0.0, rect.height + 2.0),
            &label,
            spec,
            Color::hex("#4a90d9"),
            lines,
            size,
        );
        self.guide = Some(guide);
    }

    /// Re-run the flow engine for the active area and repaint it.
    fn reflow_active(&mut self, scene: &mut Scene, ctx: &FontContext) {
        let ToolState::Active { area_id, caret } = self.state else {
            return;
        };
        let Some(area) = self.areas.iter().find(|a| a.id == area_id).cloned() else {
            return;
        };
        self.rewrap(scene, ctx, &area, Some(caret));
    }

    fn rewrap(&mut self, scene: &mut Scene, ctx: &FontContext, area: &TextAreaState, caret: Option<CaretState>) {
        let lines = text::wrap_text(ctx, &area.buffer, area.wrap_width(), &area.settings.font);
        if let Some(stored) = self.areas.iter_mut().find(|a| a.id == area.id) {
            stored.lines = lines.clone();
        }
        let mut updated = area.clone();
        updated.lines = lines;
        render_area(scene, ctx, &updated, caret);
    }
}

/// Byte offset of the `char_idx`-th character.
fn byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(b, _)| b)
        .unwrap_or(s.len())
}

/// Line-aware up/down caret movement: keep the current x, land on the
/// nearest boundary of the adjacent line.
fn vertical_move(ctx: &FontContext, area: &TextAreaState, index: usize, down: bool) -> usize {
    let lines = &area.lines;
    if lines.is_empty() {
        return index;
    }
    let current_line = text::line_of_char(index, lines);
    if !down && current_line == 0 {
        return 0;
    }
    if down && current_line + 1 >= lines.len() {
        return area.char_count();
    }
    let target_line = if down { current_line + 1 } else { current_line - 1 };
    let pos = text::position_of_char(ctx, index, lines, &area.settings.font);
    let line_height = ctx.line_height(&area.settings.font.family, area.settings.font.size);
    let probe = Point::new(pos.x, (target_line as f64 + 0.5) * line_height);
    text::char_index_at(ctx, probe, lines, &area.settings.font)
}

/// Repaint one area: border, background, text, and (when active and in the
/// visible blink phase) the caret. Clear-then-redraw, never incremental, so
/// the visual state is consistent after any burst of edits.
fn render_area(scene: &mut Scene, ctx: &FontContext, area: &TextAreaState, caret: Option<CaretState>) {
    scene.clear_children(area.container);
    if let Some(node) = scene.get_mut(area.container) {
        node.position = Point::new(area.bounds.x, area.bounds.y);
    }

    let active = caret.is_some();
    let border = if active {
        Stroke::new(Color::hex("#4a90d9"), 2.0)
    } else {
        Stroke::new(area.settings.border_color, 1.0)
    };
    scene.add_rect(
        area.container,
        Rect::new(0.0, 0.0, area.bounds.width, area.bounds.height),
        Some(Color::WHITE),
        Some(border),
    );

    if !area.buffer.is_empty() {
        let size = crate::geometry::Size::new(
            area.lines.iter().map(|l| l.width).fold(0.0, f64::max),
            area.lines.len() as f64
                * ctx.line_height(&area.settings.font.family, area.settings.font.size),
        );
        scene.add_text(
            area.container,
            Point::new(TEXT_INSET, TEXT_INSET),
            &area.buffer,
            area.settings.font.clone(),
            area.settings.color,
            area.lines.clone(),
            size,
        );
    }

    if let Some(caret) = caret {
        if caret.visible {
            let pos = text::position_of_char(ctx, caret.char_index, &area.lines, &area.settings.font);
            let line_height =
                ctx.line_height(&area.settings.font.family, area.settings.font.size);
            scene.add_line(
                area.container,
                Point::new(TEXT_INSET + pos.x, TEXT_INSET + pos.y),
                Point::new(TEXT_INSET + pos.x, TEXT_INSET + pos.y + line_height),
                Stroke::new(Color::BLACK, 1.0),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Scene, FontContext, TextBoxTool) {
        let mut scene = Scene::new();
        let ctx = FontContext::new();
        let root = scene.root();
        let tool = TextBoxTool::new(&mut scene, root);
        (scene, ctx, tool)
    }

    fn create_area(
        scene: &mut Scene,
        ctx: &FontContext,
        tool: &mut TextBoxTool,
        rect: Rect,
    ) -> u64 {
        tool.pointer_down(scene, ctx, Point::new(rect.x, rect.y));
        tool.pointer_move(
            scene,
            ctx,
            Point::new(rect.x + rect.width, rect.y + rect.height),
        );
        tool.pointer_up(
            scene,
            ctx,
            Point::new(rect.x + rect.width, rect.y + rect.height),
        );
        tool.active_area().expect("area should be active").id
    }

    fn type_str(scene: &mut Scene, ctx: &FontContext, tool: &mut TextBoxTool, s: &str) {
        for ch in s.chars() {
            tool.key_input(scene, ctx, Key::Char(ch));
        }
    }

    #[test]
    fn test_drag_below_threshold_creates_nothing() {
        // A 5×5 drag is a cancelled gesture: no area, tool back to idle.
        let (mut scene, ctx, mut tool) = setup();
        tool.pointer_down(&mut scene, &ctx, Point::new(10.0, 10.0));
        tool.pointer_move(&mut scene, &ctx, Point::new(15.0, 15.0));
        tool.pointer_up(&mut scene, &ctx, Point::new(15.0, 15.0));
        assert_eq!(tool.state(), ToolState::Idle);
        assert!(tool.areas().is_empty());
    }

    #[test]
    fn test_commit_activates_with_caret_at_zero() {
        let (mut scene, ctx, mut tool) = setup();
        create_area(&mut scene, &ctx, &mut tool, Rect::new(10.0, 10.0, 120.0, 60.0));
        let caret = tool.caret().unwrap();
        assert_eq!(caret.char_index, 0);
        assert!(caret.visible);
    }

    #[test]
    fn test_typing_inserts_at_caret_and_reflows() {
        let (mut scene, ctx, mut tool) = setup();
        create_area(&mut scene, &ctx, &mut tool, Rect::new(0.0, 0.0, 100.0, 60.0));
        type_str(&mut scene, &ctx, &mut tool, "hello");
        tool.key_input(&mut scene, &ctx, Key::Left);
        tool.key_input(&mut scene, &ctx, Key::Char('!'));
        let area = tool.active_area().unwrap();
        assert_eq!(area.buffer, "hell!o");
        assert!(!area.lines.is_empty());
        assert_eq!(tool.caret().unwrap().char_index, 5);
    }

    #[test]
    fn test_backspace_and_delete() {
        let (mut scene, ctx, mut tool) = setup();
        create_area(&mut scene, &ctx, &mut tool, Rect::new(0.0, 0.0, 100.0, 60.0));
        type_str(&mut scene, &ctx, &mut tool, "abc");
        tool.key_input(&mut scene, &ctx, Key::Backspace);
        assert_eq!(tool.active_area().unwrap().buffer, "ab");
        tool.key_input(&mut scene, &ctx, Key::Left);
        tool.key_input(&mut scene, &ctx, Key::Left);
        tool.key_input(&mut scene, &ctx, Key::Delete);
        assert_eq!(tool.active_area().unwrap().buffer, "b");
        assert_eq!(tool.caret().unwrap().char_index, 0);
    }

    #[test]
    fn test_blink_stops_on_deactivation() {
        // Scenario: deactivate mid-interval; a late tick toggles nothing.
        let (mut scene, ctx, mut tool) = setup();
        create_area(&mut scene, &ctx, &mut tool, Rect::new(0.0, 0.0, 100.0, 60.0));
        tool.blink_tick(&mut scene, &ctx);
        assert!(!tool.caret().unwrap().visible);
        tool.key_input(&mut scene, &ctx, Key::Escape);
        assert_eq!(tool.state(), ToolState::Idle);
        tool.blink_tick(&mut scene, &ctx);
        assert_eq!(tool.state(), ToolState::Idle);
        assert!(tool.caret().is_none());
    }

    #[test]
    fn test_stuck_drag_recovered_by_next_pointer_down() {
        // Pointer-down without a matching up (focus loss) must not wedge
        // the tool: the next down starts cleanly.
        let (mut scene, ctx, mut tool) = setup();
        tool.pointer_down(&mut scene, &ctx, Point::new(0.0, 0.0));
        tool.pointer_move(&mut scene, &ctx, Point::new(50.0, 50.0));
        // No pointer_up. New gesture:
        tool.pointer_down(&mut scene, &ctx, Point::new(200.0, 200.0));
        match tool.state() {
            ToolState::Creating { origin, .. } => {
                assert_eq!(origin, Point::new(200.0, 200.0));
            }
            other => panic!("expected Creating, got {:?}", other),
        }
    }

    #[test]
    fn test_activation_is_exclusive() {
        let (mut scene, ctx, mut tool) = setup();
        let first = create_area(&mut scene, &ctx, &mut tool, Rect::new(0.0, 0.0, 100.0, 50.0));
        let second = create_area(
            &mut scene,
            &ctx,
            &mut tool,
            Rect::new(200.0, 200.0, 100.0, 50.0),
        );
        assert_ne!(first, second);
        assert_eq!(tool.active_area().unwrap().id, second);
        // Click back into the first area.
        tool.pointer_down(&mut scene, &ctx, Point::new(50.0, 25.0));
        assert_eq!(tool.active_area().unwrap().id, first);
    }

    #[test]
    fn test_click_outside_deactivates() {
        let (mut scene, ctx, mut tool) = setup();
        create_area(&mut scene, &ctx, &mut tool, Rect::new(0.0, 0.0, 100.0, 50.0));
        tool.pointer_down(&mut scene, &ctx, Point::new(500.0, 500.0));
        // Now creating a new drag, previous area inactive.
        assert!(tool.active_area().is_none());
        tool.pointer_up(&mut scene, &ctx, Point::new(501.0, 501.0));
        assert_eq!(tool.state(), ToolState::Idle);
        assert_eq!(tool.areas().len(), 1);
    }

    #[test]
    fn test_erase_destroys_area_and_scene_subtree() {
        let (mut scene, ctx, mut tool) = setup();
        create_area(&mut scene, &ctx, &mut tool, Rect::new(0.0, 0.0, 100.0, 50.0));
        type_str(&mut scene, &ctx, &mut tool, "bye");
        let before = scene.live_count();
        assert!(tool.erase_at(&mut scene, Point::new(10.0, 10.0)));
        assert!(tool.areas().is_empty());
        assert_eq!(tool.state(), ToolState::Idle);
        assert!(scene.live_count() < before);
    }

    #[test]
    fn test_vertical_caret_movement_is_line_aware() {
        let (mut scene, ctx, mut tool) = setup();
        create_area(&mut scene, &ctx, &mut tool, Rect::new(0.0, 0.0, 80.0, 120.0));
        type_str(&mut scene, &ctx, &mut tool, "alpha beta gamma delta");
        let area = tool.active_area().unwrap();
        assert!(area.lines.len() > 1, "text should wrap");
        // Caret ends on the last line; Up moves it to an earlier line.
        let before = tool.caret().unwrap().char_index;
        let line_before = text::line_of_char(before, &tool.active_area().unwrap().lines);
        tool.key_input(&mut scene, &ctx, Key::Up);
        let after = tool.caret().unwrap().char_index;
        let line_after = text::line_of_char(after, &tool.active_area().unwrap().lines);
        assert_eq!(line_after + 1, line_before);
        assert!(after < before);
    }

    #[test]
    fn test_degenerate_resize_clamps() {
        let (mut scene, ctx, mut tool) = setup();
        let id = create_area(&mut scene, &ctx, &mut tool, Rect::new(0.0, 0.0, 100.0, 50.0));
        tool.resize_area(&mut scene, &ctx, id, Rect::new(0.0, 0.0, -5.0, 0.0));
        let area = tool.areas().iter().find(|a| a.id == id).unwrap();
        assert_eq!(area.bounds.width, MIN_AREA_SIZE);
        assert_eq!(area.bounds.height, MIN_AREA_SIZE);
    }

    #[test]
    fn test_guide_overlay_tracks_and_disappears() {
        let (mut scene, ctx, mut tool) = setup();
        let baseline = scene.live_count();
        tool.pointer_down(&mut scene, &ctx, Point::new(0.0, 0.0));
        tool.pointer_move(&mut scene, &ctx, Point::new(40.0, 30.0));
        assert!(scene.live_count() > baseline, "guide overlay should exist");
        tool.pointer_up(&mut scene, &ctx, Point::new(2.0, 2.0)); // below threshold
        assert_eq!(scene.live_count(), baseline, "cancelled gesture leaves nothing");
    }
}
