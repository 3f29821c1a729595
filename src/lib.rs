//! # Planche
//!
//! A document layout and rendering engine for printable course sheets.
//! Blocks INTO page bands, not onto an infinite canvas.
//!
//! The pipeline runs in four stages:
//!
//! 1. **Resolve** — paper size, orientation, and margins come out of a
//!    provider chain ([`provider`]) and become pixel dimensions
//!    ([`geometry`]).
//! 2. **Solve** — template blocks with percent/flex size hints become
//!    concrete rectangles ([`layout`]).
//! 3. **Structure** — the page's three bands (header/body/footer) are sized
//!    and backed ([`scene::section`]) inside a retained scene graph
//!    ([`scene`]).
//! 4. **Render** — tables ([`table`]), fill-in fields, ruled areas, and
//!    free text ([`text`]) are drawn into the bands ([`page`]).
//!
//! Interactive editing on top of the composed page is the text-box tool
//! ([`tool`]). Everything measures through one [`font::FontContext`].
//!
//! Data problems never panic and rarely error: malformed templates are
//! normalized at the boundary ([`template`]), degenerate geometry clamps,
//! and missing cells render blank.

pub mod error;
pub mod font;
pub mod geometry;
pub mod layout;
pub mod model;
pub mod page;
pub mod provider;
pub mod scene;
pub mod table;
pub mod template;
pub mod text;
pub mod tool;

use serde::Deserialize;

pub use error::PlancheError;
pub use page::{PageComposer, PageLayoutInfo};

/// The JSON document the CLI and embedding hosts hand to [`compose_json`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComposeInput {
    #[serde(default)]
    template: serde_json::Value,
    #[serde(default)]
    lesson: model::LessonPlan,
    #[serde(default = "default_dpr")]
    device_pixel_ratio: f64,
}

fn default_dpr() -> f64 {
    1.0
}

/// Compose a page from a `{template, lesson, devicePixelRatio}` JSON
/// document and return the layout metadata as pretty-printed JSON.
///
/// The template value goes through boundary normalization, so only JSON that
/// fails to parse at all (or fails to re-serialize) errors here.
pub fn compose_json(input: &str) -> Result<String, PlancheError> {
    let input: ComposeInput = serde_json::from_str(input)?;
    let template = template::normalize(input.template);
    let mut composer = PageComposer::new();
    let info = composer.compose(&template, &input.lesson, input.device_pixel_ratio);
    // A serialization failure here is a bug in the export types, not bad
    // input, so it surfaces as a compose error rather than a parse error.
    let json = serde_json::to_string_pretty(&info)
        .map_err(|e| PlancheError::Compose(format!("failed to serialize layout info: {e}")))?;
    Ok(json)
}
