//! Headline and label placement for one viewport.

use crate::config::SceneConfig;
use glam::DVec2;
use glyph_dust_core::{FontSizeRule, Viewport};
use glyph_dust_sampler::{Direction, TextAlign, TextBlock, TextStyle};

/// Everything positional that depends on the viewport, computed once per
/// rebuild. The label sits below the headline at a distance derived from the
/// headline size held here.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    viewport: Viewport,
    headline_size: f64,
    headline: TextBlock,
    label: Option<TextBlock>,
}

impl Layout {
    pub fn compute(viewport: &Viewport, config: &SceneConfig) -> Self {
        let headline_size = FontSizeRule::HEADLINE.size_for(viewport);
        let center = viewport.center();
        let headline = TextBlock::new(
            config.headline.clone(),
            TextStyle {
                weight: config.headline_weight,
                size: headline_size.floor(),
                align: TextAlign::Center,
                direction: Direction::Ltr,
            },
            center,
        );

        let label = config.label.as_ref().map(|label| {
            let anchor = DVec2::new(center.x, center.y + headline_size * 0.5 + label.gap);
            TextBlock::new(
                label.text.clone(),
                TextStyle {
                    weight: label.weight,
                    size: FontSizeRule::LABEL.size_for(viewport).floor(),
                    align: label.align,
                    direction: label.direction,
                },
                anchor,
            )
        });

        Self {
            viewport: *viewport,
            headline_size,
            headline,
            label,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Unfloored headline font size.
    pub fn headline_size(&self) -> f64 {
        self.headline_size
    }

    pub fn headline(&self) -> &TextBlock {
        &self.headline
    }

    pub fn headline_width(&self) -> f64 {
        self.headline.width()
    }

    pub fn label(&self) -> Option<&TextBlock> {
        self.label.as_ref()
    }
}
