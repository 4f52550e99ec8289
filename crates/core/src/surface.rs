//! Device-pixel drawing surfaces.
//!
//! A [`Surface`] is an RGBA8 bitmap sized in device pixels with a CSS→device
//! `scale` (the DPR), so drawing calls take CSS coordinates while storage is
//! in device pixels. A [`CoverageMask`] is a single-channel float bitmap of
//! the same shape, used for text and glow before they are blended in.
//!
//! Zero-sized surfaces are valid; every drawing call on them is a no-op.

use crate::color::Rgba;
use crate::error::DustError;
use crate::viewport::{Viewport, MAX_DEVICE_PIXELS};
use glam::DVec2;

/// Straight-alpha RGBA8 bitmap, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    width: usize,
    height: usize,
    scale: f64,
    data: Vec<u8>,
}

impl Surface {
    /// Creates a transparent surface of `width × height` device pixels.
    ///
    /// Returns `DustError::InvalidDimensions` if the area exceeds
    /// [`MAX_DEVICE_PIXELS`] or `scale` is not a positive finite number.
    pub fn new(width: usize, height: usize, scale: f64) -> Result<Self, DustError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(DustError::InvalidDimensions);
        }
        let area = width
            .checked_mul(height)
            .filter(|&n| n <= MAX_DEVICE_PIXELS)
            .ok_or(DustError::InvalidDimensions)?;
        let len = area * 4;
        Ok(Self {
            width,
            height,
            scale,
            data: vec![0; len],
        })
    }

    /// A surface backing the whole viewport at its DPR.
    pub fn for_viewport(viewport: &Viewport) -> Result<Self, DustError> {
        Self::new(
            viewport.device_width(),
            viewport.device_height(),
            viewport.dpr(),
        )
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// CSS→device scale factor.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw RGBA bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Resets every pixel to transparent black.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// The RGBA value at device pixel `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Alpha at device pixel `(x, y)`; 0 outside the surface.
    pub fn alpha(&self, x: usize, y: usize) -> u8 {
        self.pixel(x, y).map_or(0, |p| p[3])
    }

    /// Composites `color` over pixel `(x, y)` with the given coverage
    /// (source-over). Out-of-range pixels are ignored.
    pub fn blend_pixel(&mut self, x: usize, y: usize, color: Rgba, coverage: f64) {
        if x >= self.width || y >= self.height {
            return;
        }
        let sa = (color.a * coverage).clamp(0.0, 1.0);
        if sa <= 0.0 {
            return;
        }
        let i = (y * self.width + x) * 4;
        let da = self.data[i + 3] as f64 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        let mix = |src: f64, dst: u8| -> u8 {
            let dst = dst as f64 / 255.0;
            let c = (src * sa + dst * da * (1.0 - sa)) / out_a;
            (c.clamp(0.0, 1.0) * 255.0).round() as u8
        };
        self.data[i] = mix(color.r, self.data[i]);
        self.data[i + 1] = mix(color.g, self.data[i + 1]);
        self.data[i + 2] = mix(color.b, self.data[i + 2]);
        self.data[i + 3] = (out_a * 255.0).round() as u8;
    }

    /// Fills a circle given in CSS pixels, with a one-device-pixel
    /// antialiased edge.
    pub fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba) {
        if self.is_empty() || radius.is_nan() || radius <= 0.0 || !center.is_finite() {
            return;
        }
        let c = center * self.scale;
        let r = radius * self.scale;
        let x0 = (c.x - r - 1.0).floor().max(0.0) as usize;
        let y0 = (c.y - r - 1.0).floor().max(0.0) as usize;
        let x1 = ((c.x + r + 1.0).ceil().max(0.0) as usize).min(self.width);
        let y1 = ((c.y + r + 1.0).ceil().max(0.0) as usize).min(self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                let d = DVec2::new(x as f64 + 0.5, y as f64 + 0.5).distance(c);
                let coverage = (r + 0.5 - d).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend_pixel(x, y, color, coverage);
                }
            }
        }
    }

    /// Blends `color` through a same-sized coverage mask.
    ///
    /// Returns `DustError::InvalidDimensions` if the mask shape differs.
    pub fn fill_mask(&mut self, mask: &CoverageMask, color: Rgba) -> Result<(), DustError> {
        if mask.width != self.width || mask.height != self.height {
            return Err(DustError::InvalidDimensions);
        }
        for (idx, &cov) in mask.data.iter().enumerate() {
            if cov > 0.0 {
                self.blend_pixel(idx % self.width, idx / self.width, color, cov);
            }
        }
        Ok(())
    }
}

/// Single-channel coverage bitmap with values in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageMask {
    width: usize,
    height: usize,
    scale: f64,
    data: Vec<f64>,
}

impl CoverageMask {
    /// An empty mask matching `surface` in size and scale.
    pub fn matching(surface: &Surface) -> Self {
        Self {
            width: surface.width,
            height: surface.height,
            scale: surface.scale,
            data: vec![0.0; surface.width * surface.height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn get(&self, x: usize, y: usize) -> f64 {
        if x >= self.width || y >= self.height {
            return 0.0;
        }
        self.data[y * self.width + x]
    }

    /// Raises coverage at `(x, y)` to at least `value`.
    pub fn cover(&mut self, x: usize, y: usize, value: f64) {
        if x >= self.width || y >= self.height {
            return;
        }
        let slot = &mut self.data[y * self.width + x];
        *slot = slot.max(value.clamp(0.0, 1.0));
    }

    /// One horizontal + vertical box-blur pass of the given radius in device
    /// pixels. Three passes approximate a Gaussian with sigma ≈ radius.
    pub fn box_blur(&mut self, radius: usize) {
        if radius == 0 || self.data.is_empty() {
            return;
        }
        let (w, h) = (self.width, self.height);
        let mut line = Vec::with_capacity(w.max(h));
        for y in 0..h {
            line.clear();
            line.extend((0..w).map(|x| self.data[y * w + x]));
            let blurred = blur_line(&line, radius);
            self.data[y * w..(y + 1) * w].copy_from_slice(&blurred);
        }
        for x in 0..w {
            line.clear();
            line.extend((0..h).map(|y| self.data[y * w + x]));
            let blurred = blur_line(&line, radius);
            for (y, v) in blurred.into_iter().enumerate() {
                self.data[y * w + x] = v;
            }
        }
    }
}

/// Sliding-window mean with zero padding outside the line.
fn blur_line(line: &[f64], radius: usize) -> Vec<f64> {
    let n = line.len();
    let window = (2 * radius + 1) as f64;
    let mut prefix = Vec::with_capacity(n + 1);
    prefix.push(0.0);
    for &v in line {
        let last = prefix[prefix.len() - 1];
        prefix.push(last + v);
    }
    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(radius);
            let hi = (i + radius + 1).min(n);
            ((prefix[hi] - prefix[lo]) / window).clamp(0.0, 1.0)
        })
        .collect()
}
