//! # Geometry & Units
//!
//! Converts physical page sizes and millimeter margins into pixel space.
//! Everything here is a pure function of its inputs; the rest of the engine
//! works exclusively in container-local pixels.

use serde::{Deserialize, Serialize};

/// Reference display density used to derive pixel dimensions (CSS pixels).
pub const BASE_DPI: f64 = 96.0;

const MM_PER_INCH: f64 = 25.4;

/// Standard paper sizes, physical dimensions in millimeters (portrait).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all_fields = "camelCase")]
pub enum PaperSize {
    #[default]
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Custom {
        width_mm: f64,
        height_mm: f64,
    },
}

impl PaperSize {
    /// Returns (width, height) in millimeters, portrait orientation.
    ///
    /// A degenerate custom size (non-finite or non-positive) falls back to
    /// A4 portrait rather than producing a zero-area page.
    pub fn dimensions_mm(&self) -> (f64, f64) {
        match self {
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::A3 => (297.0, 420.0),
            PaperSize::A5 => (148.0, 210.0),
            PaperSize::Letter => (215.9, 279.4),
            PaperSize::Legal => (215.9, 355.6),
            PaperSize::Custom { width_mm, height_mm } => {
                if width_mm.is_finite()
                    && height_mm.is_finite()
                    && *width_mm > 0.0
                    && *height_mm > 0.0
                {
                    (*width_mm, *height_mm)
                } else {
                    PaperSize::A4.dimensions_mm()
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Concrete pixel dimensions for a page, derived once from physical size.
///
/// Immutable after creation; a paper-size or orientation change recomputes
/// the whole record via [`PageDimensions::compute`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDimensions {
    pub width_px: f64,
    pub height_px: f64,
    pub pixels_per_mm: f64,
}

impl PageDimensions {
    /// Derive pixel dimensions from a paper size, orientation, and device
    /// pixel ratio (1.0 when not provided by the host).
    pub fn compute(size: PaperSize, orientation: Orientation, device_pixel_ratio: f64) -> Self {
        let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        let (mut w_mm, mut h_mm) = size.dimensions_mm();
        if orientation == Orientation::Landscape {
            std::mem::swap(&mut w_mm, &mut h_mm);
        }
        let pixels_per_mm = BASE_DPI / MM_PER_INCH * dpr;
        PageDimensions {
            width_px: w_mm * pixels_per_mm,
            height_px: h_mm * pixels_per_mm,
            pixels_per_mm,
        }
    }
}

impl Default for PageDimensions {
    fn default() -> Self {
        PageDimensions::compute(PaperSize::A4, Orientation::Portrait, 1.0)
    }
}

/// Unit for margin values supplied by collaborators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Unit {
    #[default]
    Millimeters,
    Pixels,
}

/// Page margins. Always normalized to pixels before the layout solver sees
/// them; negative or non-finite edges clamp to zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
    #[serde(default)]
    pub unit: Unit,
}

impl Default for Margins {
    fn default() -> Self {
        Margins::uniform(10.0, Unit::Millimeters)
    }
}

impl Margins {
    pub fn uniform(v: f64, unit: Unit) -> Self {
        Margins {
            top: v,
            right: v,
            bottom: v,
            left: v,
            unit,
        }
    }

    /// Convert to pixel margins given a pixels-per-millimeter factor.
    pub fn to_pixels(&self, pixels_per_mm: f64) -> Margins {
        let scale = match self.unit {
            Unit::Millimeters => pixels_per_mm,
            Unit::Pixels => 1.0,
        };
        let clamp = |v: f64| if v.is_finite() { (v * scale).max(0.0) } else { 0.0 };
        Margins {
            top: clamp(self.top),
            right: clamp(self.right),
            bottom: clamp(self.bottom),
            left: clamp(self.left),
            unit: Unit::Pixels,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Size { width, height }
    }
}

/// An axis-aligned rectangle in container-local pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect { x, y, width, height }
    }

    /// Construct from two drag corners in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Rect {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }

    /// Shrink by per-edge insets, collapsing to a zero-size rectangle at the
    /// inset center instead of going negative.
    pub fn inset(&self, m: &Margins) -> Rect {
        let width = (self.width - m.horizontal()).max(0.0);
        let height = (self.height - m.vertical()).max(0.0);
        Rect {
            x: self.x + m.left,
            y: self.y + m.top,
            width,
            height,
        }
    }
}
