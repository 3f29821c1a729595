//! # Font Management
//!
//! Text measurement for the layout and text-flow paths. Built-in Helvetica
//! metrics cover the default case; schools that upload their own fonts get
//! real metrics via ttf-parser. Unknown families fall back to Helvetica so
//! measurement never fails.

pub mod metrics;

use std::collections::HashMap;

use base64::Engine as _;

use crate::error::PlancheError;
use metrics::{BuiltinMetrics, HELVETICA, HELVETICA_BOLD};

/// Identifies a registered face. Text boxes carry a single uniform style, so
/// the only axis besides family is bold (header/table-header rendering).
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct FontKey {
    pub family: String,
    pub bold: bool,
}

#[derive(Debug, Clone)]
enum FontData {
    Builtin(BuiltinMetrics),
    Custom(CustomFontMetrics),
}

/// Parsed metrics from a TrueType/OpenType face.
#[derive(Debug, Clone)]
pub struct CustomFontMetrics {
    units_per_em: u16,
    advance_widths: HashMap<char, u16>,
    default_advance: u16,
    ascender: i16,
    descender: i16,
}

impl CustomFontMetrics {
    /// Parse metrics from raw font data.
    pub fn from_font_data(data: &[u8]) -> Result<Self, PlancheError> {
        let face = ttf_parser::Face::parse(data, 0)
            .map_err(|e| PlancheError::Font(format!("failed to parse font face: {e}")))?;
        let units_per_em = face.units_per_em();

        // Latin coverage is enough for measurement; anything else falls back
        // to the default advance.
        let mut advance_widths = HashMap::new();
        let mut default_advance = 0u16;
        for code in 0x20u32..=0x24F {
            if let Some(ch) = char::from_u32(code) {
                if let Some(glyph_id) = face.glyph_index(ch) {
                    let advance = face.glyph_hor_advance(glyph_id).unwrap_or(0);
                    advance_widths.insert(ch, advance);
                    if ch == ' ' {
                        default_advance = advance;
                    }
                }
            }
        }
        if default_advance == 0 {
            default_advance = units_per_em / 2;
        }

        Ok(CustomFontMetrics {
            units_per_em,
            advance_widths,
            default_advance,
            ascender: face.ascender(),
            descender: face.descender(),
        })
    }

    fn char_width(&self, ch: char, font_size: f64) -> f64 {
        let units = self
            .advance_widths
            .get(&ch)
            .copied()
            .unwrap_or(self.default_advance);
        units as f64 / self.units_per_em as f64 * font_size
    }

    fn line_height(&self, font_size: f64) -> f64 {
        (self.ascender as f64 - self.descender as f64) / self.units_per_em as f64
            * font_size
            * 1.2
    }
}

/// Registry mapping family + weight to measurable font data.
pub struct FontRegistry {
    fonts: HashMap<FontKey, FontData>,
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FontRegistry {
    pub fn new() -> Self {
        let mut fonts = HashMap::new();
        fonts.insert(
            FontKey {
                family: "Helvetica".to_string(),
                bold: false,
            },
            FontData::Builtin(HELVETICA),
        );
        fonts.insert(
            FontKey {
                family: "Helvetica".to_string(),
                bold: true,
            },
            FontData::Builtin(HELVETICA_BOLD),
        );
        Self { fonts }
    }

    /// Look up a face, falling back to Helvetica when the family is unknown.
    fn resolve(&self, family: &str, bold: bool) -> &FontData {
        const FALLBACK: FontData = FontData::Builtin(HELVETICA);
        let key = FontKey {
            family: family.to_string(),
            bold,
        };
        if let Some(font) = self.fonts.get(&key) {
            return font;
        }
        self.fonts
            .get(&FontKey {
                family: "Helvetica".to_string(),
                bold,
            })
            .unwrap_or(&FALLBACK)
    }

    /// Register a custom font from raw bytes.
    pub fn register(&mut self, family: &str, bold: bool, data: &[u8]) -> Result<(), PlancheError> {
        let metrics = CustomFontMetrics::from_font_data(data)?;
        self.fonts.insert(
            FontKey {
                family: family.to_string(),
                bold,
            },
            FontData::Custom(metrics),
        );
        Ok(())
    }

    /// Register a custom font from a base64 string or `data:` URI, the form
    /// template records carry font payloads in.
    pub fn register_base64(
        &mut self,
        family: &str,
        bold: bool,
        src: &str,
    ) -> Result<(), PlancheError> {
        let payload = src.rsplit("base64,").next().unwrap_or(src);
        let data = base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| PlancheError::Font(format!("invalid base64 font data: {e}")))?;
        self.register(family, bold, &data)
    }
}

/// Shared measurement context threaded through layout, table rendering, and
/// the text flow engine.
pub struct FontContext {
    registry: FontRegistry,
}

impl Default for FontContext {
    fn default() -> Self {
        Self::new()
    }
}

impl FontContext {
    pub fn new() -> Self {
        Self {
            registry: FontRegistry::new(),
        }
    }

    /// Advance width of a single character in pixels.
    pub fn char_width(&self, ch: char, family: &str, bold: bool, font_size: f64) -> f64 {
        match self.registry.resolve(family, bold) {
            FontData::Builtin(m) => m.char_width(ch, font_size),
            FontData::Custom(m) => m.char_width(ch, font_size),
        }
    }

    /// Width of a string in pixels.
    pub fn measure_string(&self, text: &str, family: &str, bold: bool, font_size: f64) -> f64 {
        match self.registry.resolve(family, bold) {
            FontData::Builtin(m) => m.measure_string(text, font_size),
            FontData::Custom(m) => text.chars().map(|c| m.char_width(c, font_size)).sum(),
        }
    }

    /// Line height in pixels, from ascent/descent metrics.
    pub fn line_height(&self, family: &str, font_size: f64) -> f64 {
        match self.registry.resolve(family, false) {
            FontData::Builtin(m) => m.line_height(font_size),
            FontData::Custom(m) => m.line_height(font_size),
        }
    }

    pub fn registry_mut(&mut self) -> &mut FontRegistry {
        &mut self.registry
    }
}
