//! Secondary label surface: static text with a soft glow beneath it.

use crate::config::LabelConfig;
use glyph_dust_core::{CoverageMask, DustError, Surface};
use glyph_dust_sampler::TextBlock;

/// Box blur passes; three successive passes approximate a Gaussian.
const GLOW_PASSES: usize = 3;

/// Box radius in device pixels for a glow blur given in CSS pixels.
pub fn glow_radius(blur: f64, scale: f64) -> usize {
    let radius = (blur / 2.0 * scale).round();
    if radius.is_finite() && radius > 0.0 {
        radius as usize
    } else {
        0
    }
}

/// Clears `surface` and draws the label: glow first, then the text over it.
pub fn draw_label(
    surface: &mut Surface,
    block: &TextBlock,
    config: &LabelConfig,
) -> Result<(), DustError> {
    surface.clear();
    if surface.is_empty() {
        return Ok(());
    }

    let mut coverage = CoverageMask::matching(surface);
    block.rasterize(&mut coverage);

    let radius = glow_radius(config.glow_blur, surface.scale());
    if radius > 0 && config.glow_color.a > 0.0 {
        let mut glow = coverage.clone();
        for _ in 0..GLOW_PASSES {
            glow.box_blur(radius);
        }
        surface.fill_mask(&glow, config.glow_color)?;
    }

    surface.fill_mask(&coverage, config.color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;
    use glyph_dust_core::Rgba;
    use glyph_dust_sampler::{Direction, TextAlign, TextStyle};

    fn block() -> TextBlock {
        TextBlock::new(
            "HI",
            TextStyle {
                weight: 300,
                size: 40.0,
                align: TextAlign::Center,
                direction: Direction::Rtl,
            },
            DVec2::new(100.0, 50.0),
        )
    }

    fn lit_pixels(surface: &Surface) -> usize {
        (0..surface.height())
            .flat_map(|y| (0..surface.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| surface.alpha(x, y) > 0)
            .count()
    }

    #[test]
    fn glow_radius_scales_with_dpr() {
        assert_eq!(glow_radius(18.0, 1.0), 9);
        assert_eq!(glow_radius(18.0, 2.0), 18);
        assert_eq!(glow_radius(0.0, 2.0), 0);
        assert_eq!(glow_radius(f64::NAN, 1.0), 0);
    }

    #[test]
    fn glow_spreads_beyond_the_text() {
        let mut plain = Surface::new(200, 100, 1.0).unwrap();
        let no_glow = LabelConfig {
            glow_blur: 0.0,
            ..LabelConfig::default()
        };
        draw_label(&mut plain, &block(), &no_glow).unwrap();

        let mut glowing = Surface::new(200, 100, 1.0).unwrap();
        draw_label(&mut glowing, &block(), &LabelConfig::default()).unwrap();

        assert!(lit_pixels(&plain) > 0);
        assert!(lit_pixels(&glowing) > lit_pixels(&plain));
    }

    #[test]
    fn text_is_drawn_in_label_color() {
        let mut surface = Surface::new(200, 100, 1.0).unwrap();
        let config = LabelConfig {
            color: Rgba::WHITE,
            glow_blur: 0.0,
            ..LabelConfig::default()
        };
        draw_label(&mut surface, &block(), &config).unwrap();
        let solid = (0..100)
            .flat_map(|y| (0..200).map(move |x| (x, y)))
            .filter_map(|(x, y)| surface.pixel(x, y))
            .any(|p| p == [255, 255, 255, 255]);
        assert!(solid);
    }

    #[test]
    fn redraw_clears_previous_content() {
        let mut surface = Surface::new(200, 100, 1.0).unwrap();
        surface.fill_circle(DVec2::new(5.0, 5.0), 3.0, Rgba::WHITE);
        let config = LabelConfig {
            glow_blur: 0.0,
            ..LabelConfig::default()
        };
        draw_label(&mut surface, &block(), &config).unwrap();
        assert_eq!(surface.alpha(5, 5), 0);
    }

    #[test]
    fn empty_surface_is_a_no_op() {
        let mut surface = Surface::new(0, 0, 1.0).unwrap();
        draw_label(&mut surface, &block(), &LabelConfig::default()).unwrap();
        assert!(surface.is_empty());
    }
}
