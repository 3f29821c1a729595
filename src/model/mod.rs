//! # Input Model
//!
//! The records the engine consumes from its collaborators: a page template
//! (which blocks appear and how they are configured) and a lesson plan (the
//! nested program data rendered by the table renderer). This mirrors what the
//! backing store hands the caller after a fetch — plain resolved data, no
//! async surface.
//!
//! Block configuration is a closed tagged union: every block kind carries its
//! own strongly-typed config, resolved via exhaustive matching. Unknown kinds
//! are normalized to [`BlockKind::Content`] at the boundary (see the
//! `template` module), never probed by string key.

use serde::{Deserialize, Serialize};

// ── Template ───────────────────────────────────────────────────────

/// A page template: an ordered set of blocks plus page-level settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    #[serde(default)]
    pub blocks: Vec<TemplateBlock>,
    #[serde(default)]
    pub settings: TemplateSettings,
}

/// One block instance in a template.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateBlock {
    /// Stable id, unique within the template.
    pub id: String,
    /// Position in top-to-bottom page order.
    #[serde(default)]
    pub order: u32,
    /// Kind plus its typed config.
    #[serde(flatten)]
    pub kind: BlockKind,
    /// Free-form content for content blocks (pre-filled exercise text).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// The closed set of block kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BlockKind {
    /// Page header with teacher/class metadata fields.
    Header {
        #[serde(default)]
        config: HeaderConfig,
    },
    /// The lesson program table (competencies down to tasks).
    Program {
        #[serde(default)]
        config: ProgramConfig,
    },
    /// The resources/materials table.
    Resources {
        #[serde(default)]
        config: ResourcesConfig,
    },
    /// Free working area for drawing, media, and text boxes.
    Content {
        #[serde(default)]
        config: ContentConfig,
    },
    /// Page footer.
    Footer {
        #[serde(default)]
        config: FooterConfig,
    },
}

impl BlockKind {
    /// Short name used for logging and layout export.
    pub fn name(&self) -> &'static str {
        match self {
            BlockKind::Header { .. } => "header",
            BlockKind::Program { .. } => "program",
            BlockKind::Resources { .. } => "resources",
            BlockKind::Content { .. } => "content",
            BlockKind::Footer { .. } => "footer",
        }
    }
}

/// Which metadata fields the header shows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeaderConfig {
    pub name: bool,
    pub date: bool,
    pub class: bool,
    pub subject: bool,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        HeaderConfig {
            name: true,
            date: true,
            class: true,
            subject: true,
        }
    }
}

/// Which optional columns the program table shows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgramConfig {
    pub method: bool,
    pub social_form: bool,
    pub time: bool,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        ProgramConfig {
            method: true,
            social_form: true,
            time: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourcesConfig {
    pub quantity: bool,
    pub note: bool,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        ResourcesConfig {
            quantity: true,
            note: false,
        }
    }
}

/// Content block configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentConfig {
    /// Draw ruled guide lines across the working area.
    pub ruled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FooterConfig {
    pub page_number: bool,
    pub school: bool,
}

impl Default for FooterConfig {
    fn default() -> Self {
        FooterConfig {
            page_number: true,
            school: false,
        }
    }
}

/// Page-level settings carried by the template.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplateSettings {
    pub font_family: String,
    pub font_size: f64,
    pub paper_size: crate::geometry::PaperSize,
    pub orientation: crate::geometry::Orientation,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        TemplateSettings {
            font_family: "Helvetica".to_string(),
            font_size: 12.0,
            paper_size: crate::geometry::PaperSize::A4,
            orientation: crate::geometry::Orientation::Portrait,
        }
    }
}

// ── Lesson plan ────────────────────────────────────────────────────

/// The nested program structure rendered by the table renderer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonPlan {
    #[serde(default)]
    pub competencies: Vec<Competency>,
    /// Materials shown in the resources block.
    #[serde(default)]
    pub resources: Vec<Resource>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competency {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub topics: Vec<Topic>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub objectives: Vec<Objective>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Objective {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_form: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_form: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// ── Layout blocks (instantiated per page) ──────────────────────────

/// How a block's height is resolved by the solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SizeHint {
    /// Percentage of container height.
    Percent(f64),
    /// Share of leftover height, proportional to the grow factor.
    Flex(f64),
}

/// Axis along which a block lays out its child areas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Row,
    #[default]
    Column,
}

/// What a canvas area permits its owner to place inside it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaCapabilities {
    pub drawing: bool,
    pub media: bool,
    pub text: bool,
}

impl AreaCapabilities {
    pub const TEXT_ONLY: AreaCapabilities = AreaCapabilities {
        drawing: false,
        media: false,
        text: true,
    };
    pub const ALL: AreaCapabilities = AreaCapabilities {
        drawing: true,
        media: true,
        text: true,
    };
}

/// A sub-region within a block with its own interaction capabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasArea {
    pub id: String,
    /// Relative share of the block's axis, like a flex factor.
    pub flex: f64,
    pub capabilities: AreaCapabilities,
}

/// A named top-level page region handed to the layout solver.
///
/// Instantiated per page from the template; torn down with the page. Blocks
/// do not own each other — the section manager owns their containers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutBlock {
    pub id: String,
    pub name: String,
    pub size: SizeHint,
    pub axis: Axis,
    /// Gap between child areas, pixels.
    pub gap: f64,
    /// Inset applied on all four edges before areas are placed, pixels.
    pub padding: f64,
    pub areas: Vec<CanvasArea>,
}

impl LayoutBlock {
    /// Instantiate the catalog entry for a template block.
    ///
    /// The catalog is fixed: each kind maps to a default size hint, axis,
    /// and area set. Template config only changes what gets rendered inside,
    /// not the block's geometry contract.
    pub fn from_template(block: &TemplateBlock) -> LayoutBlock {
        let id = block.id.clone();
        let name = block.kind.name().to_string();
        match &block.kind {
            BlockKind::Header { .. } => LayoutBlock {
                id,
                name,
                size: SizeHint::Percent(12.0),
                axis: Axis::Row,
                gap: 8.0,
                padding: 4.0,
                areas: vec![CanvasArea {
                    id: "header-fields".to_string(),
                    flex: 1.0,
                    capabilities: AreaCapabilities::TEXT_ONLY,
                }],
            },
            BlockKind::Program { .. } => LayoutBlock {
                id,
                name,
                size: SizeHint::Flex(2.0),
                axis: Axis::Column,
                gap: 0.0,
                padding: 4.0,
                areas: vec![CanvasArea {
                    id: "program-table".to_string(),
                    flex: 1.0,
                    capabilities: AreaCapabilities::TEXT_ONLY,
                }],
            },
            BlockKind::Resources { .. } => LayoutBlock {
                id,
                name,
                size: SizeHint::Flex(1.0),
                axis: Axis::Column,
                gap: 0.0,
                padding: 4.0,
                areas: vec![CanvasArea {
                    id: "resources-table".to_string(),
                    flex: 1.0,
                    capabilities: AreaCapabilities::TEXT_ONLY,
                }],
            },
            BlockKind::Content { .. } => LayoutBlock {
                id,
                name,
                size: SizeHint::Flex(2.0),
                axis: Axis::Column,
                gap: 0.0,
                padding: 0.0,
                areas: vec![CanvasArea {
                    id: "content-area".to_string(),
                    flex: 1.0,
                    capabilities: AreaCapabilities::ALL,
                }],
            },
            BlockKind::Footer { .. } => LayoutBlock {
                id,
                name,
                size: SizeHint::Percent(8.0),
                axis: Axis::Row,
                gap: 8.0,
                padding: 4.0,
                areas: vec![CanvasArea {
                    id: "footer-fields".to_string(),
                    flex: 1.0,
                    capabilities: AreaCapabilities::TEXT_ONLY,
                }],
            },
        }
    }
}
