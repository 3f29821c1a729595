//! # Flex Distribution Utilities
//!
//! Lower-level distribution math used by the block solver: proportional
//! grow sharing, minimum-floor enforcement, and percentage normalization.

/// Distribute remaining space among items based on flex-grow factors.
pub fn distribute_grow(items: &mut [(f64, f64)], remaining: f64) {
    // items: [(current_size, flex_grow)]
    let total_grow: f64 = items.iter().map(|(_, g)| g).sum();
    if total_grow <= 0.0 || remaining <= 0.0 {
        return;
    }
    for (size, grow) in items.iter_mut() {
        *size += remaining * (*grow / total_grow);
    }
}

/// Scale percentage hints down proportionally when they sum past 100.
///
/// Hints summing to 100 or less are returned untouched; a 140% total is
/// scaled by 100/140 so the solved heights still sum to the container height
/// while preserving relative ratios. Deterministic: same input, same output.
pub fn normalize_percentages(hints: &[f64]) -> Vec<f64> {
    let total: f64 = hints.iter().filter(|p| p.is_finite() && **p > 0.0).sum();
    if total <= 100.0 {
        return hints
            .iter()
            .map(|p| if p.is_finite() && *p > 0.0 { *p } else { 0.0 })
            .collect();
    }
    let scale = 100.0 / total;
    hints
        .iter()
        .map(|p| {
            if p.is_finite() && *p > 0.0 {
                p * scale
            } else {
                0.0
            }
        })
        .collect()
}

/// Apply a minimum floor to flex-resolved sizes, re-shrinking the others
/// proportionally so the total stays fixed.
///
/// Iterates because floor-clamping one item can push another below the
/// floor; the loop terminates since each pass pins at least one item.
pub fn apply_min_floor(sizes: &mut [f64], min: f64, total: f64) {
    if sizes.is_empty() || min <= 0.0 {
        return;
    }
    // Not enough room for every floor — give everyone an equal share.
    if total < min * sizes.len() as f64 {
        let share = (total / sizes.len() as f64).max(0.0);
        for s in sizes.iter_mut() {
            *s = share;
        }
        return;
    }

    let mut pinned = vec![false; sizes.len()];
    loop {
        let mut newly_pinned = false;
        for (i, s) in sizes.iter_mut().enumerate() {
            if !pinned[i] && *s < min {
                *s = min;
                pinned[i] = true;
                newly_pinned = true;
            }
        }
        if !newly_pinned {
            return;
        }
        let pinned_total: f64 = sizes
            .iter()
            .zip(&pinned)
            .filter(|(_, p)| **p)
            .map(|(s, _)| s)
            .sum();
        let free_total: f64 = sizes
            .iter()
            .zip(&pinned)
            .filter(|(_, p)| !**p)
            .map(|(s, _)| s)
            .sum();
        let target = total - pinned_total;
        if free_total > 0.0 {
            let scale = (target / free_total).max(0.0);
            for (s, p) in sizes.iter_mut().zip(&pinned) {
                if !*p {
                    *s *= scale;
                }
            }
        }
    }
}
