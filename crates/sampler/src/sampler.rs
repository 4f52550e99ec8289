//! Offscreen rasterization and alpha-threshold point sampling.

use crate::text::{fill_text, TextBlock};
use glam::DVec2;
use glyph_dust_core::params::{param_f64, param_usize};
use glyph_dust_core::{DustError, Rgba, Surface, Viewport};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

/// Default sampling stride in CSS pixels.
pub const DEFAULT_STRIDE: f64 = 7.0;
/// Default alpha threshold; a pixel is ink when its alpha is strictly greater.
pub const DEFAULT_ALPHA_THRESHOLD: u8 = 128;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerParams {
    /// Distance between sampled pixels, in CSS pixels.
    pub stride: f64,
    /// Alpha above which a sampled pixel counts as ink.
    pub alpha_threshold: u8,
}

impl Default for SamplerParams {
    fn default() -> Self {
        Self {
            stride: DEFAULT_STRIDE,
            alpha_threshold: DEFAULT_ALPHA_THRESHOLD,
        }
    }
}

impl SamplerParams {
    /// Overlays `stride` and `alpha_threshold` from a JSON object.
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        Self {
            stride: param_f64(params, "stride", d.stride),
            alpha_threshold: param_usize(params, "alpha_threshold", d.alpha_threshold as usize)
                .min(u8::MAX as usize) as u8,
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "stride": self.stride,
            "alpha_threshold": self.alpha_threshold,
        })
    }
}

/// Turns text blocks into the home positions of the particle field.
#[derive(Debug, Clone, Default)]
pub struct GlyphSampler {
    params: SamplerParams,
}

impl GlyphSampler {
    pub fn new(params: SamplerParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SamplerParams {
        &self.params
    }

    /// Scan step in device pixels: `max(1, floor(stride * dpr))`.
    pub fn device_step(&self, dpr: f64) -> usize {
        let step = (self.params.stride * dpr).floor();
        if step.is_finite() && step >= 1.0 {
            step as usize
        } else {
            1
        }
    }

    /// Renders every block in opaque white onto a fresh viewport-sized surface.
    pub fn rasterize(&self, viewport: &Viewport, blocks: &[TextBlock]) -> Result<Surface, DustError> {
        let mut surface = Surface::for_viewport(viewport)?;
        if surface.is_empty() {
            return Ok(surface);
        }
        for block in blocks {
            fill_text(&mut surface, block, Rgba::WHITE)?;
        }
        Ok(surface)
    }

    /// Scans `surface` on the device stride and returns every ink pixel,
    /// converted back to CSS pixels. Points are ordered row by row.
    pub fn scan(&self, surface: &Surface) -> Vec<DVec2> {
        let step = self.device_step(surface.scale());
        let scale = surface.scale();
        let threshold = self.params.alpha_threshold;
        (0..surface.height())
            .step_by(step)
            .flat_map(|y| {
                (0..surface.width())
                    .step_by(step)
                    .filter(move |&x| surface.alpha(x, y) > threshold)
                    .map(move |x| DVec2::new(x as f64 / scale, y as f64 / scale))
            })
            .collect()
    }

    /// Rasterizes `blocks` for `viewport` and samples the result.
    ///
    /// A degenerate viewport yields an empty point set.
    pub fn sample(&self, viewport: &Viewport, blocks: &[TextBlock]) -> Result<Vec<DVec2>, DustError> {
        let surface = self.rasterize(viewport, blocks)?;
        let points = self.scan(&surface);
        debug!(
            points = points.len(),
            device_width = surface.width(),
            device_height = surface.height(),
            step = self.device_step(viewport.dpr()),
            "sampled glyph ink"
        );
        Ok(points)
    }
}
