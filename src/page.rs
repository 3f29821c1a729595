//! # Page Composition
//!
//! Drives a full page build: resolve dimensions, solve the block layout,
//! size the section bands, then hand each block to its renderer. The
//! composer owns the scene and the section manager for the lifetime of the
//! page; recomposing after a settings change reuses both, clearing section
//! content recursively first so nothing accumulates across rebuilds.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::font::FontContext;
use crate::geometry::{Margins, PageDimensions, Point, Rect};
use crate::layout::{self, SolvedBlock};
use crate::model::{BlockKind, LayoutBlock, LessonPlan, Template, TemplateBlock};
use crate::provider::DimensionResolver;
use crate::scene::section::{SectionManager, SectionName};
use crate::scene::{Color, NodeId, Scene, Stroke};
use crate::table::{self, TableStyle};
use crate::text::{self, FontSpec};

/// Serializable snapshot of a composed page's geometry, for external
/// debugging and authoring tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLayoutInfo {
    pub page: PageDimensions,
    /// Margins in pixels.
    pub margins: Margins,
    pub blocks: Vec<BlockLayoutInfo>,
}

/// One solved block, rectangles in content-box-local pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockLayoutInfo {
    pub id: String,
    pub name: String,
    pub rect: Rect,
    pub areas: Vec<AreaLayoutInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaLayoutInfo {
    pub id: String,
    pub rect: Rect,
}

/// Owns the scene graph and composes template + lesson data into it.
pub struct PageComposer {
    resolver: DimensionResolver,
    ctx: FontContext,
    scene: Scene,
    sections: SectionManager,
}

impl Default for PageComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl PageComposer {
    pub fn new() -> Self {
        let mut scene = Scene::new();
        let sections = SectionManager::new(&mut scene);
        PageComposer {
            resolver: DimensionResolver::new(),
            ctx: FontContext::new(),
            scene,
            sections,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn sections(&self) -> &SectionManager {
        &self.sections
    }

    pub fn font_context(&self) -> &FontContext {
        &self.ctx
    }

    pub fn font_context_mut(&mut self) -> &mut FontContext {
        &mut self.ctx
    }

    pub fn resolver_mut(&mut self) -> &mut DimensionResolver {
        &mut self.resolver
    }

    /// Compose the page: resolve, solve, size the bands, render every block.
    ///
    /// Safe to call repeatedly on the same composer (resize, template edit);
    /// each call clears the previous section content before rendering. Data
    /// problems degrade per renderer, they never fail the compose.
    pub fn compose(
        &mut self,
        template: &Template,
        lesson: &LessonPlan,
        device_pixel_ratio: f64,
    ) -> PageLayoutInfo {
        let dims = self.resolver.resolve_dimensions(device_pixel_ratio);
        let margins = self.resolver.resolve_margins().to_pixels(dims.pixels_per_mm);
        let page_rect = Rect::new(0.0, 0.0, dims.width_px, dims.height_px);
        let content_box = page_rect.inset(&margins);

        let mut ordered: Vec<&TemplateBlock> = template.blocks.iter().collect();
        ordered.sort_by_key(|b| b.order);
        let layout_blocks: Vec<LayoutBlock> =
            ordered.iter().map(|b| LayoutBlock::from_template(b)).collect();

        let solved = layout::solve(content_box.width, content_box.height, &layout_blocks);
        debug!(blocks = solved.len(), width = content_box.width, "solved page layout");

        // Band heights come from the solved header/footer blocks, but only
        // when they sit where bands sit: header leading, footer trailing.
        // A header or footer ordered mid-page renders in the body band so
        // the band chrome always matches where content draws.
        let header_leads = ordered
            .first()
            .map(|b| matches!(b.kind, BlockKind::Header { .. }))
            .unwrap_or(false);
        let footer_trails = ordered
            .last()
            .map(|b| matches!(b.kind, BlockKind::Footer { .. }))
            .unwrap_or(false);
        let solved_height =
            |b: &TemplateBlock| solved.get(&b.id).map(|s| s.rect.height).unwrap_or(0.0);
        let header_height = if header_leads { solved_height(ordered[0]) } else { 0.0 };
        let footer_height = if footer_trails {
            solved_height(ordered[ordered.len() - 1])
        } else {
            0.0
        };
        self.sections
            .update_metrics(&mut self.scene, page_rect, &margins, header_height, footer_height);
        for section in [SectionName::Header, SectionName::Body, SectionName::Footer] {
            let section = *self.sections.section(section);
            SectionManager::clear_content(&mut self.scene, &section);
        }

        let font = FontSpec::new(&template.settings.font_family, template.settings.font_size);
        let mut infos = Vec::with_capacity(ordered.len());
        for (idx, block) in ordered.iter().enumerate() {
            let Some(solution) = solved.get(&block.id) else {
                continue;
            };
            let section = match block.kind {
                BlockKind::Header { .. } if idx == 0 => SectionName::Header,
                BlockKind::Footer { .. } if idx + 1 == ordered.len() => SectionName::Footer,
                _ => SectionName::Body,
            };
            self.render_block(block, solution, section, header_height, lesson, &font);
            infos.push(BlockLayoutInfo {
                id: block.id.clone(),
                name: block.kind.name().to_string(),
                rect: solution.rect,
                areas: solution
                    .areas
                    .iter()
                    .map(|a| AreaLayoutInfo {
                        id: a.id.clone(),
                        rect: a.rect,
                    })
                    .collect(),
            });
        }

        PageLayoutInfo {
            page: dims,
            margins,
            blocks: infos,
        }
    }

    /// Render one block into the given band's content layer.
    ///
    /// Solved rectangles are content-box-local with the first block at y=0;
    /// body blocks are shifted up by the header band height to become
    /// band-local, footer content by the footer band's offset.
    fn render_block(
        &mut self,
        block: &TemplateBlock,
        solution: &SolvedBlock,
        section: SectionName,
        header_height: f64,
        lesson: &LessonPlan,
        font: &FontSpec,
    ) {
        let y_shift = match section {
            SectionName::Header => 0.0,
            SectionName::Footer => {
                let footer = self.sections.section(SectionName::Footer).bounds;
                let content_top = self.sections.section(SectionName::Header).bounds.y;
                footer.y - content_top
            }
            SectionName::Body => header_height,
        };
        let content = self.sections.section(section).content;
        let area = solution.areas.first().map(|a| a.rect).unwrap_or(solution.rect);
        let local = Rect::new(area.x, area.y - y_shift, area.width, area.height);
        let group = self.scene.add_group(content, Point::new(local.x, local.y));

        match &block.kind {
            BlockKind::Header { config } => {
                let mut fields = Vec::new();
                if config.name {
                    fields.push("Name");
                }
                if config.date {
                    fields.push("Date");
                }
                if config.class {
                    fields.push("Class");
                }
                if config.subject {
                    fields.push("Subject");
                }
                self.render_fields(group, &fields, local.width, font);
            }
            BlockKind::Program { config } => {
                let (columns, rows) = table::flatten_program(lesson, config);
                let style = TableStyle::standard(&font.family, font.size);
                table::render(
                    &mut self.scene,
                    group,
                    &self.ctx,
                    &rows,
                    &columns,
                    local.width,
                    &style,
                );
            }
            BlockKind::Resources { config } => {
                let (columns, rows) = table::flatten_resources(&lesson.resources, config);
                let style = TableStyle::standard(&font.family, font.size);
                table::render(
                    &mut self.scene,
                    group,
                    &self.ctx,
                    &rows,
                    &columns,
                    local.width,
                    &style,
                );
            }
            BlockKind::Content { config } => {
                if config.ruled {
                    self.render_ruling(group, local.width, local.height, font);
                }
                if let Some(content) = &block.content {
                    let lines = text::wrap_text(&self.ctx, content, local.width, font);
                    let size = text::text_bounds(&self.ctx, content, local.width, font);
                    self.scene.add_text(
                        group,
                        Point::default(),
                        content,
                        font.clone(),
                        Color::BLACK,
                        lines,
                        size,
                    );
                }
            }
            BlockKind::Footer { config } => {
                let mut fields = Vec::new();
                if config.page_number {
                    fields.push("Page");
                }
                if config.school {
                    fields.push("School");
                }
                self.render_fields(group, &fields, local.width, font);
            }
        }
    }

    /// A row of labeled fill-in fields: label text plus an underline taking
    /// the rest of the field's slot.
    fn render_fields(&mut self, parent: NodeId, fields: &[&str], width: f64, font: &FontSpec) {
        if fields.is_empty() {
            return;
        }
        let slot = width / fields.len() as f64;
        let line_height = self.ctx.line_height(&font.family, font.size);
        for (i, field) in fields.iter().enumerate() {
            let x = i as f64 * slot;
            let label = format!("{field}:");
            let label_width = self
                .ctx
                .measure_string(&label, &font.family, font.bold, font.size);
            let lines = text::wrap_text(&self.ctx, &label, f64::INFINITY, font);
            let size = text::text_bounds(&self.ctx, &label, f64::INFINITY, font);
            self.scene.add_text(
                parent,
                Point::new(x, 0.0),
                &label,
                font.clone(),
                Color::BLACK,
                lines,
                size,
            );
            self.scene.add_line(
                parent,
                Point::new(x + label_width + 4.0, line_height),
                Point::new(x + slot - 8.0, line_height),
                Stroke::new(Color::hex("#9a9a9a"), 1.0),
            );
        }
    }

    /// Horizontal guide lines across a ruled working area.
    fn render_ruling(&mut self, parent: NodeId, width: f64, height: f64, font: &FontSpec) {
        let spacing = self.ctx.line_height(&font.family, font.size) * 1.5;
        if spacing <= 0.0 {
            return;
        }
        let stroke = Stroke::new(Color::hex("#dcdcdc"), 1.0);
        let mut y = spacing;
        while y < height {
            self.scene
                .add_line(parent, Point::new(0.0, y), Point::new(width, y), stroke);
            y += spacing;
        }
    }
}
