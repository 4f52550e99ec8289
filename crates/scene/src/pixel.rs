//! Flattening scene surfaces into an opaque RGBA8 pixel buffer.
//!
//! This module is always available (no feature gate) so embedders that blit
//! pixels themselves can share the conversion with the `png` snapshot path.

use glyph_dust_core::{DustError, Rgba, Surface};

/// Composites `layers` bottom to top over an opaque `background`.
///
/// The buffer length is `width * height * 4` and every alpha byte is 255.
/// Returns `DustError::InvalidDimensions` if the layers differ in size.
pub fn compose(background: Rgba, layers: &[&Surface]) -> Result<Vec<u8>, DustError> {
    let Some(first) = layers.first() else {
        return Ok(Vec::new());
    };
    let (width, height) = (first.width(), first.height());
    if layers
        .iter()
        .any(|layer| layer.width() != width || layer.height() != height)
    {
        return Err(DustError::InvalidDimensions);
    }

    let mut out = Surface::new(width, height, first.scale())?;
    let backdrop = Rgba { a: 1.0, ..background };
    for y in 0..height {
        for x in 0..width {
            out.blend_pixel(x, y, backdrop, 1.0);
            for layer in layers {
                if let Some([r, g, b, a]) = layer.pixel(x, y) {
                    if a > 0 {
                        out.blend_pixel(x, y, Rgba::from_rgba8(r, g, b, a as f64 / 255.0), 1.0);
                    }
                }
            }
        }
    }
    Ok(out.data().to_vec())
}
