//! # Dimension Resolution
//!
//! Where the page gets its size and margins from. Hosts plug providers into
//! an ordered chain (saved template settings first, then user preferences,
//! then whatever else); the resolver takes the first answer that passes
//! validation and otherwise falls back to static A4 defaults. Garbage from a
//! provider is warned about and skipped, never propagated — a page always
//! has valid dimensions.

use tracing::warn;

use crate::geometry::{Margins, Orientation, PageDimensions, PaperSize, Unit};

/// Default margins when no provider answers: 10 mm all around.
pub const DEFAULT_MARGIN_MM: f64 = 10.0;

/// A source of paper size and orientation.
pub trait DimensionProvider {
    /// Stable name used in warnings when this provider's answer is rejected.
    fn name(&self) -> &str;

    /// The paper this provider wants, or `None` to defer down the chain.
    fn paper(&self) -> Option<(PaperSize, Orientation)>;
}

/// A source of page margins.
pub trait MarginProvider {
    fn name(&self) -> &str;

    fn margins(&self) -> Option<Margins>;
}

/// A fixed provider, useful as a chain terminator and in tests.
pub struct StaticProvider {
    pub paper_size: PaperSize,
    pub orientation: Orientation,
    pub margins: Margins,
}

impl Default for StaticProvider {
    fn default() -> Self {
        StaticProvider {
            paper_size: PaperSize::A4,
            orientation: Orientation::Portrait,
            margins: Margins::uniform(DEFAULT_MARGIN_MM, Unit::Millimeters),
        }
    }
}

impl DimensionProvider for StaticProvider {
    fn name(&self) -> &str {
        "static"
    }

    fn paper(&self) -> Option<(PaperSize, Orientation)> {
        Some((self.paper_size, self.orientation))
    }
}

impl MarginProvider for StaticProvider {
    fn name(&self) -> &str {
        "static"
    }

    fn margins(&self) -> Option<Margins> {
        Some(self.margins)
    }
}

/// Walks provider chains and produces validated page dimensions.
///
/// Both chains are ordered: earlier providers win. The resolver itself
/// carries the A4 default, so an empty chain is valid.
#[derive(Default)]
pub struct DimensionResolver {
    dimension_providers: Vec<Box<dyn DimensionProvider>>,
    margin_providers: Vec<Box<dyn MarginProvider>>,
}

impl DimensionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_dimension_provider(&mut self, provider: Box<dyn DimensionProvider>) {
        self.dimension_providers.push(provider);
    }

    pub fn push_margin_provider(&mut self, provider: Box<dyn MarginProvider>) {
        self.margin_providers.push(provider);
    }

    /// Resolve paper size and orientation, then derive pixel dimensions for
    /// the given device pixel ratio.
    pub fn resolve_dimensions(&self, device_pixel_ratio: f64) -> PageDimensions {
        let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            warn!(dpr = device_pixel_ratio, "invalid device pixel ratio, using 1.0");
            1.0
        };

        for provider in &self.dimension_providers {
            let Some((size, orientation)) = provider.paper() else {
                continue;
            };
            if let PaperSize::Custom { width_mm, height_mm } = size {
                if !valid_extent(width_mm) || !valid_extent(height_mm) {
                    warn!(
                        provider = provider.name(),
                        width_mm, height_mm, "rejecting custom paper size"
                    );
                    continue;
                }
            }
            return PageDimensions::compute(size, orientation, dpr);
        }
        PageDimensions::compute(PaperSize::A4, Orientation::Portrait, dpr)
    }

    /// Resolve margins, rejecting non-finite values. Negative components are
    /// clamped later by [`Margins::to_pixels`], so only NaN/inf disqualify a
    /// provider here.
    pub fn resolve_margins(&self) -> Margins {
        for provider in &self.margin_providers {
            let Some(margins) = provider.margins() else {
                continue;
            };
            let values = [margins.top, margins.right, margins.bottom, margins.left];
            if values.iter().any(|v| !v.is_finite()) {
                warn!(provider = provider.name(), "rejecting non-finite margins");
                continue;
            }
            return margins;
        }
        Margins::uniform(DEFAULT_MARGIN_MM, Unit::Millimeters)
    }
}

fn valid_extent(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Silent;

    impl DimensionProvider for Silent {
        fn name(&self) -> &str {
            "silent"
        }
        fn paper(&self) -> Option<(PaperSize, Orientation)> {
            None
        }
    }

    impl MarginProvider for Silent {
        fn name(&self) -> &str {
            "silent"
        }
        fn margins(&self) -> Option<Margins> {
            None
        }
    }

    #[test]
    fn test_empty_chain_yields_a4_portrait() {
        let resolver = DimensionResolver::new();
        let dims = resolver.resolve_dimensions(1.0);
        let a4 = PageDimensions::compute(PaperSize::A4, Orientation::Portrait, 1.0);
        assert_eq!(dims.width_px, a4.width_px);
        assert_eq!(dims.height_px, a4.height_px);
    }

    #[test]
    fn test_first_answering_provider_wins() {
        let mut resolver = DimensionResolver::new();
        resolver.push_dimension_provider(Box::new(Silent));
        resolver.push_dimension_provider(Box::new(StaticProvider {
            paper_size: PaperSize::A5,
            orientation: Orientation::Landscape,
            ..StaticProvider::default()
        }));
        resolver.push_dimension_provider(Box::new(StaticProvider::default()));

        let dims = resolver.resolve_dimensions(1.0);
        let a5 = PageDimensions::compute(PaperSize::A5, Orientation::Landscape, 1.0);
        assert_eq!(dims.width_px, a5.width_px);
    }

    #[test]
    fn test_invalid_custom_size_skips_to_next_provider() {
        let mut resolver = DimensionResolver::new();
        resolver.push_dimension_provider(Box::new(StaticProvider {
            paper_size: PaperSize::Custom {
                width_mm: f64::NAN,
                height_mm: 100.0,
            },
            ..StaticProvider::default()
        }));
        resolver.push_dimension_provider(Box::new(StaticProvider {
            paper_size: PaperSize::Letter,
            ..StaticProvider::default()
        }));

        let dims = resolver.resolve_dimensions(1.0);
        let letter = PageDimensions::compute(PaperSize::Letter, Orientation::Portrait, 1.0);
        assert_eq!(dims.width_px, letter.width_px);
    }

    #[test]
    fn test_non_finite_margins_rejected() {
        let mut resolver = DimensionResolver::new();
        resolver.push_margin_provider(Box::new(StaticProvider {
            margins: Margins::uniform(f64::INFINITY, Unit::Pixels),
            ..StaticProvider::default()
        }));
        let margins = resolver.resolve_margins();
        assert_eq!(margins.top, DEFAULT_MARGIN_MM);
        assert_eq!(margins.unit, Unit::Millimeters);
    }

    #[test]
    fn test_bad_device_pixel_ratio_falls_back_to_one() {
        let resolver = DimensionResolver::new();
        let at_one = resolver.resolve_dimensions(1.0);
        let at_nan = resolver.resolve_dimensions(f64::NAN);
        assert_eq!(at_one.width_px, at_nan.width_px);
    }
}
