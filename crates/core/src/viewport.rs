//! Viewport geometry and responsive font sizing.
//!
//! A [`Viewport`] is recomputed on every resize: CSS size, device pixel ratio,
//! and the device-pixel backing size derived from them. [`FontSizeRule`]
//! turns a viewport into a font size using two width tiers.

use crate::error::DustError;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Largest backing store accepted, in device pixels (8192 × 8192).
pub const MAX_DEVICE_PIXELS: usize = 1 << 26;

/// CSS dimensions plus device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    css_width: f64,
    css_height: f64,
    dpr: f64,
}

impl Viewport {
    /// Creates a viewport. The DPR is floored at 1 (a missing or non-finite
    /// ratio counts as 1); negative sizes collapse to zero.
    ///
    /// Returns `DustError::InvalidDimensions` if a size is not finite or the
    /// device-pixel area exceeds [`MAX_DEVICE_PIXELS`].
    pub fn new(css_width: f64, css_height: f64, dpr: f64) -> Result<Self, DustError> {
        if !css_width.is_finite() || !css_height.is_finite() {
            return Err(DustError::InvalidDimensions);
        }
        let dpr = if dpr.is_finite() { dpr.max(1.0) } else { 1.0 };
        let vp = Self {
            css_width: css_width.max(0.0),
            css_height: css_height.max(0.0),
            dpr,
        };
        let w = vp.css_width * dpr;
        let h = vp.css_height * dpr;
        if w >= usize::MAX as f64 || h >= usize::MAX as f64 {
            return Err(DustError::InvalidDimensions);
        }
        let area = vp
            .device_width()
            .checked_mul(vp.device_height())
            .ok_or(DustError::InvalidDimensions)?;
        if area > MAX_DEVICE_PIXELS {
            return Err(DustError::InvalidDimensions);
        }
        Ok(vp)
    }

    pub fn css_width(&self) -> f64 {
        self.css_width
    }

    pub fn css_height(&self) -> f64 {
        self.css_height
    }

    pub fn dpr(&self) -> f64 {
        self.dpr
    }

    /// Backing-store width: `floor(css_width * dpr)`.
    pub fn device_width(&self) -> usize {
        (self.css_width * self.dpr).floor() as usize
    }

    /// Backing-store height: `floor(css_height * dpr)`.
    pub fn device_height(&self) -> usize {
        (self.css_height * self.dpr).floor() as usize
    }

    /// True when there is nothing to draw into.
    pub fn is_degenerate(&self) -> bool {
        self.device_width() == 0 || self.device_height() == 0
    }

    /// Center in CSS pixels.
    pub fn center(&self) -> DVec2 {
        DVec2::new(self.css_width / 2.0, self.css_height / 2.0)
    }
}

/// One size tier: `max(min, min(w * width_factor, h * height_factor, max))`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeTier {
    pub width_factor: f64,
    pub height_factor: f64,
    pub max: f64,
    pub min: f64,
}

impl SizeTier {
    pub fn size(&self, css_width: f64, css_height: f64) -> f64 {
        (css_width * self.width_factor)
            .min(css_height * self.height_factor)
            .min(self.max)
            .max(self.min)
    }
}

/// Two-tier responsive font size, split at `breakpoint` CSS pixels of width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontSizeRule {
    pub breakpoint: f64,
    pub narrow: SizeTier,
    pub normal: SizeTier,
}

impl FontSizeRule {
    /// Sizing for the particle headline.
    pub const HEADLINE: FontSizeRule = FontSizeRule {
        breakpoint: 450.0,
        narrow: SizeTier {
            width_factor: 0.4,
            height_factor: 0.35,
            max: 300.0,
            min: 0.0,
        },
        normal: SizeTier {
            width_factor: 0.25,
            height_factor: 0.40,
            max: 300.0,
            min: 0.0,
        },
    };

    /// Sizing for the secondary label.
    pub const LABEL: FontSizeRule = FontSizeRule {
        breakpoint: 450.0,
        narrow: SizeTier {
            width_factor: 0.1,
            height_factor: 0.1,
            max: 70.0,
            min: 20.0,
        },
        normal: SizeTier {
            width_factor: 0.06,
            height_factor: 0.08,
            max: 56.0,
            min: 16.0,
        },
    };

    /// Unrounded size in CSS pixels.
    pub fn size_for(&self, viewport: &Viewport) -> f64 {
        let (w, h) = (viewport.css_width(), viewport.css_height());
        let tier = if w < self.breakpoint {
            &self.narrow
        } else {
            &self.normal
        };
        tier.size(w, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vp(w: f64, h: f64, dpr: f64) -> Viewport {
        Viewport::new(w, h, dpr).unwrap()
    }

    #[test]
    fn device_size_is_floored_css_times_dpr() {
        let v = vp(375.0, 667.0, 1.5);
        assert_eq!(v.device_width(), 562);
        assert_eq!(v.device_height(), 1000);
    }

    #[test]
    fn dpr_below_one_or_missing_becomes_one() {
        assert_eq!(vp(10.0, 10.0, 0.5).dpr(), 1.0);
        assert_eq!(vp(10.0, 10.0, f64::NAN).dpr(), 1.0);
        assert_eq!(vp(10.0, 10.0, 0.0).dpr(), 1.0);
    }

    #[test]
    fn zero_area_is_degenerate_not_an_error() {
        assert!(vp(0.0, 600.0, 1.0).is_degenerate());
        assert!(vp(800.0, 0.0, 2.0).is_degenerate());
        assert!(vp(-4.0, 600.0, 1.0).is_degenerate());
        assert!(!vp(1.0, 1.0, 1.0).is_degenerate());
    }

    #[test]
    fn non_finite_size_is_rejected() {
        assert!(Viewport::new(f64::INFINITY, 10.0, 1.0).is_err());
        assert!(Viewport::new(10.0, f64::NAN, 1.0).is_err());
        assert!(Viewport::new(1e300, 1e300, 1.0).is_err());
    }

    #[test]
    fn oversized_area_is_rejected() {
        assert!(matches!(
            Viewport::new(1e6, 1e6, 1.0),
            Err(DustError::InvalidDimensions)
        ));
        assert!(Viewport::new(5000.0, 5000.0, 2.0).is_err());
        assert!(Viewport::new(8192.0, 8192.0, 1.0).is_ok());
        // One long edge is fine as long as the area fits.
        assert!(Viewport::new(100_000.0, 10.0, 1.0).is_ok());
    }

    #[test]
    fn headline_size_for_800x600_is_200() {
        assert_eq!(FontSizeRule::HEADLINE.size_for(&vp(800.0, 600.0, 1.0)), 200.0);
    }

    #[test]
    fn headline_size_is_capped_at_300() {
        assert_eq!(FontSizeRule::HEADLINE.size_for(&vp(2560.0, 1440.0, 1.0)), 300.0);
    }

    #[test]
    fn headline_narrow_tier_limits_by_height_in_landscape_phone() {
        // 420 wide -> narrow tier: min(168, 300 * 0.35 = 105, 300)
        let size = FontSizeRule::HEADLINE.size_for(&vp(420.0, 300.0, 3.0));
        assert!((size - 105.0).abs() < 1e-9, "{size}");
    }

    #[test]
    fn label_size_respects_floor_and_cap() {
        assert_eq!(FontSizeRule::LABEL.size_for(&vp(100.0, 100.0, 1.0)), 20.0);
        assert_eq!(FontSizeRule::LABEL.size_for(&vp(3000.0, 2000.0, 1.0)), 56.0);
        assert_eq!(FontSizeRule::LABEL.size_for(&vp(460.0, 100.0, 1.0)), 16.0);
    }

    #[test]
    fn center_is_half_css_size() {
        assert_eq!(vp(800.0, 600.0, 2.0).center(), DVec2::new(400.0, 300.0));
    }
}
