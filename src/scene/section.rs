//! # Section Manager
//!
//! Owns the three vertical page bands — header, body, footer — as scene
//! containers. Renderers populate a band's `content` group; the manager owns
//! the containers themselves and is the only component that moves or resizes
//! them (single-owner discipline).
//!
//! Sections are locked (non-interactive) by default. A tool that needs
//! pointer input re-enables interactivity on its own sub-container only.

use crate::geometry::{Margins, Point, Rect, Size};
use crate::scene::{Color, NodeId, NodeKind, Scene, Stroke};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionName {
    Header,
    Body,
    Footer,
}

impl SectionName {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionName::Header => "header",
            SectionName::Body => "body",
            SectionName::Footer => "footer",
        }
    }
}

/// One page band: a positioned container with a background layer below a
/// content layer.
#[derive(Debug, Clone, Copy)]
pub struct Section {
    pub name: SectionName,
    pub container: NodeId,
    pub background: NodeId,
    pub content: NodeId,
    /// Current band extent in page coordinates.
    pub bounds: Rect,
}

pub struct SectionManager {
    header: Section,
    body: Section,
    footer: Section,
}

impl SectionManager {
    /// Build the three bands under the scene root. Band extents are zero
    /// until the first [`SectionManager::update_metrics`].
    pub fn new(scene: &mut Scene) -> Self {
        SectionManager {
            header: Self::create_section(scene, SectionName::Header),
            body: Self::create_section(scene, SectionName::Body),
            footer: Self::create_section(scene, SectionName::Footer),
        }
    }

    fn create_section(scene: &mut Scene, name: SectionName) -> Section {
        let container = scene.add_group(scene.root(), Point::default());
        let background = scene.add_group(container, Point::default());
        let content = scene.add_group(container, Point::default());
        // Locked by default; tools opt back in on their own sub-containers.
        if let Some(node) = scene.get_mut(container) {
            node.interactive = false;
        }
        Section {
            name,
            container,
            background,
            content,
            bounds: Rect::default(),
        }
    }

    pub fn section(&self, name: SectionName) -> &Section {
        match name {
            SectionName::Header => &self.header,
            SectionName::Body => &self.body,
            SectionName::Footer => &self.footer,
        }
    }

    pub fn sections(&self) -> [&Section; 3] {
        [&self.header, &self.body, &self.footer]
    }

    /// Recompute band extents for a container size and pixel margins, move
    /// the containers, and redraw each background.
    ///
    /// The header and footer band heights are dictated by the solved block
    /// layout; the body takes whatever is left between them, never negative.
    pub fn update_metrics(
        &mut self,
        scene: &mut Scene,
        container: Rect,
        margins: &Margins,
        header_height: f64,
        footer_height: f64,
    ) {
        let content_box = container.inset(margins);
        let header_height = header_height.clamp(0.0, content_box.height);
        let footer_height = footer_height.clamp(0.0, content_box.height - header_height);
        let body_height = (content_box.height - header_height - footer_height).max(0.0);

        let rects = [
            Rect::new(content_box.x, content_box.y, content_box.width, header_height),
            Rect::new(
                content_box.x,
                content_box.y + header_height,
                content_box.width,
                body_height,
            ),
            Rect::new(
                content_box.x,
                content_box.y + header_height + body_height,
                content_box.width,
                footer_height,
            ),
        ];

        for (section, rect) in [&mut self.header, &mut self.body, &mut self.footer]
            .into_iter()
            .zip(rects)
        {
            section.bounds = rect;
            if let Some(node) = scene.get_mut(section.container) {
                node.position = Point::new(rect.x, rect.y);
            }
            Self::redraw_background(scene, section, rect.width, rect.height);
        }
    }

    /// Clear-then-redraw the band background. Idempotent by construction:
    /// the previous background subtree is destroyed first.
    pub fn redraw_background(scene: &mut Scene, section: &Section, width: f64, height: f64) {
        scene.clear_children(section.background);
        scene.add_rect(
            section.background,
            Rect::new(0.0, 0.0, width.max(0.0), height.max(0.0)),
            Some(Color::WHITE),
            Some(Stroke::new(Color::hex("#d0d0d0"), 1.0)),
        );
    }

    /// Recursively destroy everything a band's content layer holds.
    pub fn clear_content(scene: &mut Scene, section: &Section) {
        scene.clear_children(section.content);
    }

    /// Current content-layer size of a band (band extent; the content group
    /// sits at the band origin).
    pub fn content_size(&self, name: SectionName) -> Size {
        let bounds = self.section(name).bounds;
        Size::new(bounds.width, bounds.height)
    }
}
