//! Scene configuration.
//!
//! A [`SceneConfig`] captures everything needed to reproduce a run apart from
//! the viewport and the input stream: texts, weights, field tuning, sampler
//! stride, pointer radius, debounce window, PRNG seed, and colors. Every
//! field has a default, so `{}` is a valid config file.

use glyph_dust_core::pointer::DEFAULT_POINTER_RADIUS;
use glyph_dust_core::{DustError, Rgba};
use glyph_dust_field::FieldParams;
use glyph_dust_sampler::{Direction, SamplerParams, TextAlign};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Secondary label drawn directly (no particles) below the headline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub text: String,
    pub weight: u16,
    pub align: TextAlign,
    pub direction: Direction,
    pub color: Rgba,
    pub glow_color: Rgba,
    /// Glow blur in CSS pixels; 0 disables the glow.
    pub glow_blur: f64,
    /// Space between the bottom half of the headline's em box and the label.
    pub gap: f64,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            text: "PAGE NOT FOUND".to_string(),
            weight: 300,
            align: TextAlign::Center,
            direction: Direction::Rtl,
            color: Rgba::from_rgba8(255, 255, 255, 0.85),
            glow_color: Rgba::from_rgba8(255, 215, 0, 0.25),
            glow_blur: 18.0,
            gap: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Text sampled into particles.
    pub headline: String,
    pub headline_weight: u16,
    /// `None` (JSON `null`) disables the secondary surface entirely.
    pub label: Option<LabelConfig>,
    pub field: FieldParams,
    pub sampler: SamplerParams,
    /// Pointer interaction radius in CSS pixels.
    pub pointer_radius: f64,
    pub resize_debounce_ms: u64,
    pub seed: u64,
    pub background: Rgba,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            headline: "404".to_string(),
            headline_weight: 900,
            label: Some(LabelConfig::default()),
            field: FieldParams::default(),
            sampler: SamplerParams::default(),
            pointer_radius: DEFAULT_POINTER_RADIUS,
            resize_debounce_ms: 120,
            seed: 42,
            background: Rgba::BLACK,
        }
    }
}

impl SceneConfig {
    /// Parses a JSON config. Missing keys take their defaults. The result is
    /// validated.
    pub fn from_json_str(json: &str) -> Result<Self, DustError> {
        let config: SceneConfig = serde_json::from_str(json)
            .map_err(|e| DustError::InvalidConfig(format!("malformed config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    pub fn validate(&self) -> Result<(), DustError> {
        if self.headline.trim().is_empty() {
            return Err(DustError::InvalidConfig("headline must not be empty".into()));
        }
        if !(self.sampler.stride.is_finite() && self.sampler.stride > 0.0) {
            return Err(DustError::InvalidConfig(format!(
                "sampler stride must be positive, got {}",
                self.sampler.stride
            )));
        }
        if !(self.pointer_radius.is_finite() && self.pointer_radius >= 0.0) {
            return Err(DustError::InvalidConfig(format!(
                "pointer_radius must be a finite non-negative number, got {}",
                self.pointer_radius
            )));
        }
        if let Some(label) = &self.label {
            if !(label.glow_blur.is_finite() && label.glow_blur >= 0.0) {
                return Err(DustError::InvalidConfig(format!(
                    "label glow_blur must be a finite non-negative number, got {}",
                    label.glow_blur
                )));
            }
            if !label.gap.is_finite() {
                return Err(DustError::InvalidConfig("label gap must be finite".into()));
            }
        }
        self.field.validate()
    }
}
