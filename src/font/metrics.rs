//! Built-in Helvetica metrics.
//!
//! Advance widths in 1/1000 em for the printable ASCII range, taken from the
//! standard Adobe font metrics. These let the engine measure text without any
//! font file on disk; everything outside ASCII falls back to the average
//! glyph width, which is good enough for layout until a custom font is
//! registered.

/// Metric table for one built-in face.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinMetrics {
    /// Advance widths for chars 32..=126, in 1/1000 em.
    widths: &'static [u16; 95],
    /// Width used for characters outside the table.
    default_width: u16,
    pub ascender: i16,
    pub descender: i16,
}

impl BuiltinMetrics {
    /// Advance width of a character in pixels at the given size.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        let units = match ch as u32 {
            32..=126 => self.widths[(ch as usize) - 32],
            _ => self.default_width,
        };
        units as f64 / 1000.0 * font_size
    }

    /// Width of a whole string in pixels at the given size.
    pub fn measure_string(&self, text: &str, font_size: f64) -> f64 {
        text.chars().map(|c| self.char_width(c, font_size)).sum()
    }

    /// Line height in pixels, derived from ascent and descent rather than
    /// the font size alone so ascenders and descenders never clip.
    pub fn line_height(&self, font_size: f64) -> f64 {
        (self.ascender as f64 - self.descender as f64) / 1000.0 * font_size * LINE_LEADING
    }
}

/// Leading multiplier applied on top of ascent+descent.
const LINE_LEADING: f64 = 1.2;

pub const HELVETICA: BuiltinMetrics = BuiltinMetrics {
    widths: &HELVETICA_WIDTHS,
    default_width: 556,
    ascender: 718,
    descender: -207,
};

pub const HELVETICA_BOLD: BuiltinMetrics = BuiltinMetrics {
    widths: &HELVETICA_BOLD_WIDTHS,
    default_width: 611,
    ascender: 718,
    descender: -207,
};

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    // space ! " # $ % & ' ( ) * + , - . /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // : ; < = > ? @
    278, 278, 584, 584, 584, 556, 1015,
    // A-Z
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [ \ ] ^ _ `
    278, 278, 278, 469, 556, 333,
    // a-z
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // { | } ~
    334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];
