//! Text blocks and their rasterization into coverage masks.
//!
//! Placement follows canvas text conventions: the anchor's y is the vertical
//! middle of the em box, and its x is interpreted by the alignment, with
//! `Start`/`End` resolved against the writing direction. Characters are laid
//! out in logical order.

use crate::font::{measure, Glyph, ADVANCE_EM, CELL};
use glam::DVec2;
use glyph_dust_core::{CoverageMask, DustError, Rgba, Surface};
use serde::{Deserialize, Serialize};

/// Subsamples per device pixel along each axis.
const SUPERSAMPLE: usize = 4;

/// Synthetic bold strength at weight 900, as a fraction of the font size.
const EMBOLDEN_AT_BLACK: f64 = 0.04;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    Left,
    Right,
    #[default]
    Center,
    Start,
    End,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

/// Font weight, size, alignment, and writing direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// CSS-style weight, 100–900. Above 400 the glyphs are emboldened.
    pub weight: u16,
    /// Font size in CSS pixels.
    pub size: f64,
    pub align: TextAlign,
    pub direction: Direction,
}

impl TextStyle {
    /// Dilation in CSS pixels applied to glyph ink for heavy weights.
    pub fn embolden(&self) -> f64 {
        let heavy = (self.weight.min(900) as f64 - 400.0).max(0.0) / 500.0;
        self.size * EMBOLDEN_AT_BLACK * heavy
    }
}

/// A string placed at an anchor point with a style.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub text: String,
    pub style: TextStyle,
    /// Anchor in CSS pixels.
    pub anchor: DVec2,
}

impl TextBlock {
    pub fn new(text: impl Into<String>, style: TextStyle, anchor: DVec2) -> Self {
        Self {
            text: text.into(),
            style,
            anchor,
        }
    }

    /// Advance width in CSS pixels.
    pub fn width(&self) -> f64 {
        measure(&self.text, self.style.size)
    }

    /// X of the first glyph cell's left edge.
    pub fn left(&self) -> f64 {
        let w = self.width();
        let ltr = self.style.direction == Direction::Ltr;
        match self.style.align {
            TextAlign::Left => self.anchor.x,
            TextAlign::Right => self.anchor.x - w,
            TextAlign::Center => self.anchor.x - w / 2.0,
            TextAlign::Start if ltr => self.anchor.x,
            TextAlign::Start => self.anchor.x - w,
            TextAlign::End if ltr => self.anchor.x - w,
            TextAlign::End => self.anchor.x,
        }
    }

    /// Y of the em box's top edge.
    pub fn top(&self) -> f64 {
        self.anchor.y - self.style.size / 2.0
    }

    /// Writes glyph coverage into `mask` (in the mask's device space).
    pub fn rasterize(&self, mask: &mut CoverageMask) {
        let size = self.style.size;
        if !(size.is_finite() && size > 0.0) || self.text.is_empty() || mask.data().is_empty() {
            return;
        }
        let layout = GlyphRun {
            glyphs: self.text.chars().map(Glyph::lookup).collect(),
            left: self.left(),
            top: self.top(),
            advance: ADVANCE_EM * size,
            row_height: size / CELL as f64,
        };
        let bold = self.style.embolden();
        let scale = mask.scale();

        let x0 = (layout.left * scale).floor().max(0.0) as usize;
        let y0 = (layout.top * scale).floor().max(0.0) as usize;
        let x1 = (((layout.left + self.width() + bold) * scale).ceil().max(0.0) as usize)
            .min(mask.width());
        let y1 = (((layout.top + size + bold) * scale).ceil().max(0.0) as usize).min(mask.height());

        let step = 1.0 / SUPERSAMPLE as f64;
        let total = (SUPERSAMPLE * SUPERSAMPLE) as f64;
        for y in y0..y1 {
            for x in x0..x1 {
                let mut hits = 0usize;
                for sy in 0..SUPERSAMPLE {
                    for sx in 0..SUPERSAMPLE {
                        let p = DVec2::new(
                            (x as f64 + (sx as f64 + 0.5) * step) / scale,
                            (y as f64 + (sy as f64 + 0.5) * step) / scale,
                        );
                        if layout.ink_bold(p, bold) {
                            hits += 1;
                        }
                    }
                }
                if hits > 0 {
                    mask.cover(x, y, hits as f64 / total);
                }
            }
        }
    }
}

/// Resolved glyph positions for one block.
struct GlyphRun {
    glyphs: Vec<Option<Glyph>>,
    left: f64,
    top: f64,
    advance: f64,
    row_height: f64,
}

impl GlyphRun {
    fn ink(&self, p: DVec2) -> bool {
        let u = p.x - self.left;
        let v = p.y - self.top;
        if u < 0.0 || v < 0.0 {
            return false;
        }
        let idx = (u / self.advance) as usize;
        let Some(Some(glyph)) = self.glyphs.get(idx) else {
            return false;
        };
        let col = ((u - idx as f64 * self.advance) / (self.advance / CELL as f64)) as usize;
        let row = (v / self.row_height) as usize;
        glyph.ink(col, row)
    }

    /// Shift-and-OR emboldening: ink if the point or its up/left shifts hit.
    fn ink_bold(&self, p: DVec2, bold: f64) -> bool {
        if self.ink(p) {
            return true;
        }
        bold > 0.0
            && (self.ink(p - DVec2::new(bold, 0.0))
                || self.ink(p - DVec2::new(0.0, bold))
                || self.ink(p - DVec2::new(bold, bold)))
    }
}

/// Draws `block` onto `surface` in `color`.
pub fn fill_text(surface: &mut Surface, block: &TextBlock, color: Rgba) -> Result<(), DustError> {
    let mut mask = CoverageMask::matching(surface);
    block.rasterize(&mut mask);
    surface.fill_mask(&mask, color)
}
