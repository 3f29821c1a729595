//! # Text Flow Engine
//!
//! Line breaking, bounds measurement, and the caret mapping between
//! character indices and pixel positions. Wrapping is recomputed fully on
//! every text change — no incremental diffing, correctness over cleverness.
//!
//! Break opportunities come from UAX#14 via `unicode-linebreak`; placement is
//! a greedy fill. A single word wider than the wrap width is placed alone on
//! its own line, whole — never split, never looped on.

use unicode_linebreak::{linebreaks, BreakOpportunity};

use crate::font::FontContext;
use crate::geometry::{Point, Size};

/// Uniform style applied to a whole text run (text boxes carry exactly one).
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size: f64,
    pub bold: bool,
}

impl FontSpec {
    pub fn new(family: &str, size: f64) -> Self {
        FontSpec {
            family: family.to_string(),
            size,
            bold: false,
        }
    }

    pub fn bold(family: &str, size: f64) -> Self {
        FontSpec {
            family: family.to_string(),
            size,
            bold: true,
        }
    }
}

/// One wrapped line.
///
/// `start..end` is the half-open char-index range of the source string this
/// line covers. Ranges of consecutive lines partition the string exactly; a
/// line ending in a hard break keeps the newline char inside its range but
/// strips it from `text`.
#[derive(Debug, Clone, PartialEq)]
pub struct LineInfo {
    pub text: String,
    pub width: f64,
    pub start: usize,
    pub end: usize,
}

/// An unbreakable run between two UAX#14 break opportunities.
struct Segment {
    /// Char-index range in the source string.
    start: usize,
    end: usize,
    text: String,
    /// Whether a hard line break follows this segment.
    mandatory: bool,
}

fn segments(text: &str) -> Vec<Segment> {
    // Map byte offsets (what linebreaks yields) to char indices.
    let mut byte_to_char = vec![0usize; text.len() + 1];
    for (char_idx, (byte_idx, _)) in text.char_indices().enumerate() {
        byte_to_char[byte_idx] = char_idx;
    }
    byte_to_char[text.len()] = text.chars().count();

    let mut out = Vec::new();
    let mut prev_byte = 0usize;
    for (byte_offset, opp) in linebreaks(text) {
        if byte_offset == prev_byte {
            continue;
        }
        out.push(Segment {
            start: byte_to_char[prev_byte],
            end: byte_to_char[byte_offset],
            text: text[prev_byte..byte_offset].to_string(),
            mandatory: opp == BreakOpportunity::Mandatory && byte_offset < text.len(),
        });
        prev_byte = byte_offset;
    }
    if prev_byte < text.len() {
        out.push(Segment {
            start: byte_to_char[prev_byte],
            end: byte_to_char[text.len()],
            text: text[prev_byte..].to_string(),
            mandatory: false,
        });
    }
    out
}

/// Strip one trailing hard-break sequence from a line's rendered text.
/// The chars stay inside the line's index range.
fn strip_hard_break(s: &str) -> &str {
    s.strip_suffix("\r\n")
        .or_else(|| s.strip_suffix('\n'))
        .or_else(|| s.strip_suffix('\r'))
        .or_else(|| s.strip_suffix('\u{2028}'))
        .or_else(|| s.strip_suffix('\u{2029}'))
        .unwrap_or(s)
}

/// Break `text` into lines no wider than `max_width` pixels.
///
/// Greedy: segments accumulate onto the current line while the line still
/// fits (trailing whitespace of the candidate segment is ignored for the fit
/// test, as usual). Empty input yields a single empty line so the caret has
/// somewhere to live.
pub fn wrap_text(
    ctx: &FontContext,
    text: &str,
    max_width: f64,
    spec: &FontSpec,
) -> Vec<LineInfo> {
    if text.is_empty() {
        return vec![LineInfo {
            text: String::new(),
            width: 0.0,
            start: 0,
            end: 0,
        }];
    }
    let max_width = max_width.max(0.0);

    let mut lines: Vec<LineInfo> = Vec::new();
    let mut line_text = String::new();
    let mut line_start = 0usize;
    let mut line_end = 0usize;
    let mut line_width = 0.0;
    let mut line_open = false;

    let flush = |lines: &mut Vec<LineInfo>,
                 line_text: &mut String,
                 line_start: &mut usize,
                 line_end: &mut usize,
                 line_width: &mut f64,
                 line_open: &mut bool,
                 ctx: &FontContext,
                 spec: &FontSpec| {
        let rendered = strip_hard_break(line_text).to_string();
        let width = ctx.measure_string(&rendered, &spec.family, spec.bold, spec.size);
        lines.push(LineInfo {
            text: rendered,
            width,
            start: *line_start,
            end: *line_end,
        });
        *line_start = *line_end;
        line_text.clear();
        *line_width = 0.0;
        *line_open = false;
    };

    for seg in segments(text) {
        let full = ctx.measure_string(&seg.text, &spec.family, spec.bold, spec.size);
        let trimmed = ctx.measure_string(
            seg.text.trim_end_matches(|c: char| c.is_whitespace()),
            &spec.family,
            spec.bold,
            spec.size,
        );

        if line_open && line_width + trimmed > max_width {
            flush(
                &mut lines,
                &mut line_text,
                &mut line_start,
                &mut line_end,
                &mut line_width,
                &mut line_open,
                ctx,
                spec,
            );
        }

        // A segment wider than the wrap width gets its own line, whole.
        line_text.push_str(&seg.text);
        line_end = seg.end;
        line_width += full;
        line_open = true;

        if seg.mandatory || trimmed > max_width {
            flush(
                &mut lines,
                &mut line_text,
                &mut line_start,
                &mut line_end,
                &mut line_width,
                &mut line_open,
                ctx,
                spec,
            );
        }
    }

    if line_open || lines.is_empty() {
        flush(
            &mut lines,
            &mut line_text,
            &mut line_start,
            &mut line_end,
            &mut line_width,
            &mut line_open,
            ctx,
            spec,
        );
    }

    // A trailing hard break opens a fresh empty line for the caret.
    if text.ends_with(['\n', '\r', '\u{2028}', '\u{2029}']) {
        let n = text.chars().count();
        lines.push(LineInfo {
            text: String::new(),
            width: 0.0,
            start: n,
            end: n,
        });
    }

    lines
}

/// Measure the box a wrapped text occupies: widest line by the line count
/// times the metric line height.
pub fn text_bounds(ctx: &FontContext, text: &str, max_width: f64, spec: &FontSpec) -> Size {
    let lines = wrap_text(ctx, text, max_width, spec);
    let width = lines.iter().map(|l| l.width).fold(0.0, f64::max);
    let height = lines.len() as f64 * ctx.line_height(&spec.family, spec.size);
    Size::new(width, height)
}

/// Index of the line whose range contains `index`. An index equal to the
/// total length maps to the last line (caret after the final char).
pub fn line_of_char(index: usize, lines: &[LineInfo]) -> usize {
    for (i, line) in lines.iter().enumerate() {
        if index < line.end {
            return i;
        }
    }
    lines.len().saturating_sub(1)
}

/// Pixel position of the caret placed before `index`.
pub fn position_of_char(
    ctx: &FontContext,
    index: usize,
    lines: &[LineInfo],
    spec: &FontSpec,
) -> Point {
    let line_idx = line_of_char(index, lines);
    let line = &lines[line_idx];
    let offset = index.saturating_sub(line.start).min(line.text.chars().count());
    let x = line
        .text
        .chars()
        .take(offset)
        .map(|c| ctx.char_width(c, &spec.family, spec.bold, spec.size))
        .sum();
    let y = line_idx as f64 * ctx.line_height(&spec.family, spec.size);
    Point::new(x, y)
}

/// Nearest character boundary to a pixel position.
///
/// The line is chosen by `floor(y / line_height)` clamped to the valid range;
/// within the line the boundary with the closest cumulative width wins, ties
/// breaking toward the earlier boundary.
pub fn char_index_at(
    ctx: &FontContext,
    point: Point,
    lines: &[LineInfo],
    spec: &FontSpec,
) -> usize {
    if lines.is_empty() {
        return 0;
    }
    let line_height = ctx.line_height(&spec.family, spec.size);
    let raw = if line_height > 0.0 {
        (point.y / line_height).floor() as i64
    } else {
        0
    };
    let line_idx = raw.clamp(0, lines.len() as i64 - 1) as usize;
    let line = &lines[line_idx];

    let mut best_boundary = 0usize;
    let mut best_dist = point.x.abs();
    let mut cursor = 0.0;
    for (i, ch) in line.text.chars().enumerate() {
        cursor += ctx.char_width(ch, &spec.family, spec.bold, spec.size);
        let dist = (point.x - cursor).abs();
        if dist < best_dist {
            best_dist = dist;
            best_boundary = i + 1;
        }
    }
    line.start + best_boundary
}
