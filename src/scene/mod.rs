//! # Retained Scene Graph
//!
//! A generational-arena scene of groups, rectangles, lines, and wrapped text
//! runs. Renderers populate it, the host paints it, and the text-box tool
//! hit-tests against it.
//!
//! Removal is always recursive: a destroyed container takes its whole
//! subtree's slots with it. Repeated page re-renders that skip this leak
//! GPU-backed resources on the host side, so it is a correctness requirement
//! here, not an optimization. Stale [`NodeId`]s are detected by generation
//! and simply resolve to `None`.

pub mod section;

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect, Size};
use crate::text::{FontSpec, LineInfo};

/// An RGBA color, channels in 0.0–1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    /// Parse `#rgb` or `#rrggbb`; anything else is black.
    pub fn hex(hex: &str) -> Self {
        let hex = hex.trim_start_matches('#');
        let (r, g, b) = match hex.len() {
            3 => {
                let c = |i: usize| u8::from_str_radix(&hex[i..i + 1].repeat(2), 16).unwrap_or(0);
                (c(0), c(1), c(2))
            }
            6 => {
                let c = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
                (c(0), c(2), c(4))
            }
            _ => (0, 0, 0),
        };
        Color {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: 1.0,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// Stroke applied to lines and rectangle borders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

impl Stroke {
    pub fn new(color: Color, width: f64) -> Self {
        Stroke { color, width }
    }
}

/// Handle to a scene node. Stale after the node is destroyed; lookups with a
/// stale id return `None` rather than resurrecting a reused slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

/// What a node draws.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Pure container.
    Group,
    /// Filled and/or stroked rectangle of the node's size.
    Rect {
        size: Size,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    /// Straight line segment in local coordinates.
    Line { from: Point, to: Point, stroke: Stroke },
    /// A wrapped text run; `lines` is the flow-engine output that the host
    /// paints one line-height apart.
    Text {
        content: String,
        spec: FontSpec,
        color: Color,
        lines: Vec<LineInfo>,
        size: Size,
    },
}

/// One scene node: local position, draw kind, interactivity, children.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// Offset relative to the parent.
    pub position: Point,
    pub visible: bool,
    /// Whether hit-testing may enter this node and its subtree.
    pub interactive: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(kind: NodeKind, position: Point) -> Self {
        Node {
            kind,
            position,
            visible: true,
            interactive: true,
            parent: None,
            children: vec![],
        }
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Intrinsic hit-test bounds in local coordinates, if the kind has any.
    fn local_bounds(&self) -> Option<Size> {
        match &self.kind {
            NodeKind::Rect { size, .. } => Some(*size),
            NodeKind::Text { size, .. } => Some(*size),
            NodeKind::Group | NodeKind::Line { .. } => None,
        }
    }
}

struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// The scene arena. Owns every node; the root group always exists.
pub struct Scene {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        let mut scene = Scene {
            slots: vec![],
            free: vec![],
            root: NodeId {
                index: 0,
                generation: 0,
            },
        };
        let root = scene.insert(Node::new(NodeKind::Group, Point::default()));
        scene.root = root;
        scene
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn insert(&mut self, node: Node) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId {
                index: (self.slots.len() - 1) as u32,
                generation: 0,
            }
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    /// Attach a new node under `parent`. A stale or missing parent attaches
    /// under the root instead (the page must never lose content silently).
    pub fn add(&mut self, parent: NodeId, kind: NodeKind, position: Point) -> NodeId {
        let parent = if self.get(parent).is_some() {
            parent
        } else {
            self.root
        };
        let mut node = Node::new(kind, position);
        node.parent = Some(parent);
        let id = self.insert(node);
        if let Some(p) = self.get_mut(parent) {
            p.children.push(id);
        }
        id
    }

    pub fn add_group(&mut self, parent: NodeId, position: Point) -> NodeId {
        self.add(parent, NodeKind::Group, position)
    }

    pub fn add_rect(
        &mut self,
        parent: NodeId,
        rect: Rect,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    ) -> NodeId {
        self.add(
            parent,
            NodeKind::Rect {
                size: Size::new(rect.width, rect.height),
                fill,
                stroke,
            },
            Point::new(rect.x, rect.y),
        )
    }

    pub fn add_line(&mut self, parent: NodeId, from: Point, to: Point, stroke: Stroke) -> NodeId {
        self.add(parent, NodeKind::Line { from, to, stroke }, Point::default())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_text(
        &mut self,
        parent: NodeId,
        position: Point,
        content: &str,
        spec: FontSpec,
        color: Color,
        lines: Vec<LineInfo>,
        size: Size,
    ) -> NodeId {
        self.add(
            parent,
            NodeKind::Text {
                content: content.to_string(),
                spec,
                color,
                lines,
                size,
            },
            position,
        )
    }

    /// Destroy a node and its entire subtree. The root cannot be removed.
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root || self.get(id).is_none() {
            return;
        }
        if let Some(parent) = self.get(id).and_then(|n| n.parent) {
            if let Some(p) = self.get_mut(parent) {
                p.children.retain(|c| *c != id);
            }
        }
        self.free_subtree(id);
    }

    /// Destroy all children of a node, recursively, keeping the node itself.
    pub fn clear_children(&mut self, id: NodeId) {
        let children = match self.get(id) {
            Some(n) => n.children.clone(),
            None => return,
        };
        if let Some(n) = self.get_mut(id) {
            n.children.clear();
        }
        for child in children {
            self.free_subtree(child);
        }
    }

    fn free_subtree(&mut self, id: NodeId) {
        let children = match self.get(id) {
            Some(n) => n.children.clone(),
            None => return,
        };
        for child in children {
            self.free_subtree(child);
        }
        let slot = &mut self.slots[id.index as usize];
        slot.node = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
    }

    /// Number of live nodes, root included. Leak checks in tests rely on it.
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.node.is_some()).count()
    }

    /// Absolute position of a node (sum of local offsets up to the root).
    pub fn absolute_position(&self, id: NodeId) -> Option<Point> {
        let mut current = id;
        let mut x = 0.0;
        let mut y = 0.0;
        loop {
            let node = self.get(current)?;
            x += node.position.x;
            y += node.position.y;
            match node.parent {
                Some(p) => current = p,
                None => return Some(Point::new(x, y)),
            }
        }
    }

    /// Topmost interactive node whose bounds contain `point` (scene
    /// coordinates). Later siblings draw on top, so the search walks
    /// children back-to-front and prefers the deepest hit.
    pub fn hit_test(&self, point: Point) -> Option<NodeId> {
        self.hit_node(self.root, point, Point::default())
    }

    fn hit_node(&self, id: NodeId, point: Point, origin: Point) -> Option<NodeId> {
        let node = self.get(id)?;
        if !node.visible || !node.interactive {
            return None;
        }
        let local_origin = Point::new(origin.x + node.position.x, origin.y + node.position.y);
        for child in node.children.iter().rev() {
            if let Some(hit) = self.hit_node(*child, point, local_origin) {
                return Some(hit);
            }
        }
        if let Some(size) = node.local_bounds() {
            let bounds = Rect::new(local_origin.x, local_origin.y, size.width, size.height);
            if bounds.contains(point) {
                return Some(id);
            }
        }
        None
    }
}
