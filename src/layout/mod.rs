//! # Block Layout Solver
//!
//! Turns a container size plus an ordered list of blocks with relative-size
//! hints into concrete pixel rectangles, top-to-bottom in a single pass.
//!
//! Percentage hints resolve against the container height and are normalized
//! proportionally when they sum past 100%. Flex blocks then share whatever
//! height is left, floored at a minimum so a sparse section never collapses
//! to nothing. The solver is stateless and cache-free: it is called fresh on
//! every resize, and identical inputs produce bit-identical rectangles.

pub mod flex;

use std::collections::BTreeMap;

use crate::geometry::{Margins, Rect, Unit};
use crate::model::{Axis, LayoutBlock, SizeHint};

/// Floor for a flex-resolved block height, pixels.
pub const MIN_BLOCK_HEIGHT: f64 = 50.0;

/// A solved block: its own rectangle and its child area rectangles, both in
/// container-local pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct SolvedBlock {
    pub rect: Rect,
    pub areas: Vec<SolvedArea>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolvedArea {
    pub id: String,
    pub rect: Rect,
}

/// Compute pixel rectangles for every block and nested area.
///
/// Blocks stack vertically in input order, each spanning the full container
/// width. The returned map is ordered by block id so iteration (and any
/// serialization of it) is deterministic.
pub fn solve(
    container_width: f64,
    container_height: f64,
    blocks: &[LayoutBlock],
) -> BTreeMap<String, SolvedBlock> {
    let width = container_width.max(0.0);
    let height = container_height.max(0.0);

    // Resolve percent hints first (normalized as a group), then share the
    // leftover among flex blocks.
    let percents: Vec<f64> = blocks
        .iter()
        .map(|b| match b.size {
            SizeHint::Percent(p) => p,
            SizeHint::Flex(_) => 0.0,
        })
        .collect();
    let percents = flex::normalize_percentages(&percents);

    let mut heights = vec![0.0f64; blocks.len()];
    let mut percent_total = 0.0;
    for (i, block) in blocks.iter().enumerate() {
        if let SizeHint::Percent(_) = block.size {
            heights[i] = height * percents[i] / 100.0;
            percent_total += heights[i];
        }
    }

    let leftover = (height - percent_total).max(0.0);
    let flex_indices: Vec<usize> = blocks
        .iter()
        .enumerate()
        .filter(|(_, b)| matches!(b.size, SizeHint::Flex(_)))
        .map(|(i, _)| i)
        .collect();
    if !flex_indices.is_empty() {
        let mut items: Vec<(f64, f64)> = flex_indices
            .iter()
            .map(|&i| match blocks[i].size {
                SizeHint::Flex(grow) => (0.0, grow.max(0.0)),
                SizeHint::Percent(_) => unreachable!(),
            })
            .collect();
        // All grow factors zero still splits the leftover evenly.
        if items.iter().all(|(_, g)| *g <= 0.0) {
            for item in items.iter_mut() {
                item.1 = 1.0;
            }
        }
        flex::distribute_grow(&mut items, leftover);
        let mut sizes: Vec<f64> = items.iter().map(|(s, _)| *s).collect();
        flex::apply_min_floor(&mut sizes, MIN_BLOCK_HEIGHT, leftover);
        for (&i, size) in flex_indices.iter().zip(sizes) {
            heights[i] = size;
        }
    }

    let mut out = BTreeMap::new();
    let mut y = 0.0;
    for (block, block_height) in blocks.iter().zip(heights) {
        let rect = Rect::new(0.0, y, width, block_height);
        let areas = solve_areas(block, rect);
        out.insert(block.id.clone(), SolvedBlock { rect, areas });
        y += block_height;
    }
    out
}

/// Lay out a block's child areas along its declared axis.
///
/// Padding insets all four edges; the gap is a fixed pixel separation
/// between consecutive areas. Areas share the main axis proportionally to
/// their flex factor and stretch across the cross axis.
fn solve_areas(block: &LayoutBlock, rect: Rect) -> Vec<SolvedArea> {
    if block.areas.is_empty() {
        return vec![];
    }
    let inner = rect.inset(&Margins::uniform(block.padding.max(0.0), Unit::Pixels));
    let gap = block.gap.max(0.0);
    let gap_total = gap * (block.areas.len() - 1) as f64;

    let main_available = match block.axis {
        Axis::Row => (inner.width - gap_total).max(0.0),
        Axis::Column => (inner.height - gap_total).max(0.0),
    };

    let total_flex: f64 = block.areas.iter().map(|a| a.flex.max(0.0)).sum();
    let share = |flex: f64| {
        if total_flex > 0.0 {
            main_available * flex.max(0.0) / total_flex
        } else {
            main_available / block.areas.len() as f64
        }
    };

    let mut out = Vec::with_capacity(block.areas.len());
    let mut cursor = 0.0;
    for area in &block.areas {
        let main = share(area.flex);
        let area_rect = match block.axis {
            Axis::Row => Rect::new(inner.x + cursor, inner.y, main, inner.height),
            Axis::Column => Rect::new(inner.x, inner.y + cursor, inner.width, main),
        };
        out.push(SolvedArea {
            id: area.id.clone(),
            rect: area_rect,
        });
        cursor += main + gap;
    }
    out
}
