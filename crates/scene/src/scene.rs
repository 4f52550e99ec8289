//! The running error-page scene: surfaces, field, pointer, and resize state.

use crate::config::SceneConfig;
use crate::debounce::Debouncer;
use crate::fonts::{await_fonts, FontReadiness};
use crate::label::draw_label;
use crate::layout::Layout;
use crate::pixel::compose;
use glam::DVec2;
use glyph_dust_core::{DustError, Engine, PointerState, Surface, Viewport, Xorshift64};
use glyph_dust_field::ParticleField;
use glyph_dust_sampler::GlyphSampler;
use std::time::Duration;
use tracing::debug;

/// Input applied to the scene between ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer (mouse or first touch) moved to CSS coordinates.
    PointerMove { x: f64, y: f64 },
    /// Pointer left the page or the touch ended.
    PointerLeave,
    /// The viewport changed. Applied after the debounce window.
    Resize { width: f64, height: f64, dpr: f64 },
}

/// Viewport-dependent state rebuilt wholesale on every (debounced) resize.
struct Frame {
    layout: Layout,
    primary: Surface,
    label: Option<Surface>,
    points: Vec<DVec2>,
}

pub struct Scene {
    config: SceneConfig,
    sampler: GlyphSampler,
    layout: Layout,
    field: ParticleField,
    pointer: PointerState,
    primary: Surface,
    label: Option<Surface>,
    rng: Xorshift64,
    resize: Debouncer,
    pending_viewport: Option<Viewport>,
    frames: u64,
}

impl Scene {
    /// Builds the scene for `viewport`: samples the headline, spawns the
    /// field, and draws the label surface if one is configured.
    pub fn new(config: SceneConfig, viewport: Viewport) -> Result<Self, DustError> {
        config.validate()?;
        let sampler = GlyphSampler::new(config.sampler);
        let mut rng = Xorshift64::new(config.seed);
        let frame = build_frame(&config, &sampler, &viewport)?;
        let field = ParticleField::new(&frame.points, config.field, &mut rng);
        debug!(
            agents = field.len(),
            width = viewport.css_width(),
            height = viewport.css_height(),
            dpr = viewport.dpr(),
            "scene started"
        );
        Ok(Self {
            pointer: PointerState::new(config.pointer_radius),
            resize: Debouncer::new(config.resize_debounce()),
            sampler,
            layout: frame.layout,
            field,
            primary: frame.primary,
            label: frame.label,
            rng,
            pending_viewport: None,
            frames: 0,
            config,
        })
    }

    /// Start-up entry point: waits on `fonts` (ignoring failures), then
    /// builds the scene.
    pub fn start(
        config: SceneConfig,
        viewport: Viewport,
        fonts: Option<&dyn FontReadiness>,
    ) -> Result<Self, DustError> {
        await_fonts(fonts);
        Self::new(config, viewport)
    }

    pub fn handle(&mut self, event: InputEvent, now: Duration) -> Result<(), DustError> {
        match event {
            InputEvent::PointerMove { x, y } => self.pointer_move(x, y),
            InputEvent::PointerLeave => self.pointer_leave(),
            InputEvent::Resize { width, height, dpr } => {
                self.request_resize(Viewport::new(width, height, dpr)?, now)
            }
        }
        Ok(())
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.pointer.move_to(x, y);
    }

    pub fn pointer_leave(&mut self) {
        self.pointer.clear();
    }

    /// Records `viewport` as the next layout target and (re)arms the
    /// debounce window. Only the latest request within a window is built.
    pub fn request_resize(&mut self, viewport: Viewport, now: Duration) {
        self.pending_viewport = Some(viewport);
        self.resize.trigger(now);
    }

    pub fn is_resize_pending(&self) -> bool {
        self.resize.is_pending()
    }

    /// One frame: applies a due resize, then draws and updates every agent.
    ///
    /// Returns whether the field was rebuilt this tick.
    pub fn tick(&mut self, now: Duration) -> Result<bool, DustError> {
        let mut rebuilt = false;
        if self.resize.fire(now) {
            if let Some(viewport) = self.pending_viewport.take() {
                self.rebuild(&viewport)?;
                rebuilt = true;
            }
        }
        self.field.advance_and_render(&self.pointer, &mut self.primary);
        self.frames += 1;
        Ok(rebuilt)
    }

    /// Resamples for `viewport` and replaces every agent. The pointer is
    /// kept; the resize debouncer is not touched.
    pub fn rebuild(&mut self, viewport: &Viewport) -> Result<(), DustError> {
        let frame = build_frame(&self.config, &self.sampler, viewport)?;
        self.field.rebuild(&frame.points, &mut self.rng);
        self.layout = frame.layout;
        self.primary = frame.primary;
        self.label = frame.label;
        debug!(
            agents = self.field.len(),
            generation = self.field.generation(),
            width = viewport.css_width(),
            height = viewport.css_height(),
            dpr = viewport.dpr(),
            "scene rebuilt"
        );
        Ok(())
    }

    /// Flattens the particle and label surfaces over the background.
    pub fn compose(&self) -> Result<Vec<u8>, DustError> {
        let mut layers = vec![&self.primary];
        if let Some(label) = &self.label {
            layers.push(label);
        }
        compose(self.config.background, &layers)
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        self.layout.viewport()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn primary_surface(&self) -> &Surface {
        &self.primary
    }

    pub fn label_surface(&self) -> Option<&Surface> {
        self.label.as_ref()
    }

    /// Ticks run since start-up.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

fn build_frame(
    config: &SceneConfig,
    sampler: &GlyphSampler,
    viewport: &Viewport,
) -> Result<Frame, DustError> {
    let layout = Layout::compute(viewport, config);
    let primary = Surface::for_viewport(viewport)?;

    let label = match (&config.label, layout.label()) {
        (Some(label_config), Some(block)) => {
            let mut surface = Surface::for_viewport(viewport)?;
            draw_label(&mut surface, block, label_config)?;
            Some(surface)
        }
        _ => None,
    };

    let points = sampler.sample(viewport, std::slice::from_ref(layout.headline()))?;
    Ok(Frame {
        layout,
        primary,
        label,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyph_dust_field::VisualState;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn scene(w: f64, h: f64) -> Scene {
        Scene::new(SceneConfig::default(), Viewport::new(w, h, 1.0).unwrap()).unwrap()
    }

    #[test]
    fn start_samples_the_headline() {
        let s = scene(800.0, 600.0);
        assert!(!s.field().is_empty());
        assert_eq!(s.field().generation(), 0);
        assert_eq!(s.primary_surface().width(), 800);
        assert!(s.label_surface().is_some());
        assert!(!s.pointer().is_active());
    }

    #[test]
    fn label_surface_has_ink() {
        let s = scene(800.0, 600.0);
        let label = s.label_surface().unwrap();
        let y = s.layout().label().unwrap().anchor.y as usize;
        assert!((0..800).any(|x| label.alpha(x, y) > 0));
    }

    #[test]
    fn no_label_surface_without_label_config() {
        let config = SceneConfig {
            label: None,
            ..SceneConfig::default()
        };
        let s = Scene::new(config, Viewport::new(800.0, 600.0, 1.0).unwrap()).unwrap();
        assert!(s.label_surface().is_none());
    }

    #[test]
    fn same_seed_same_scene() {
        let a = scene(640.0, 480.0);
        let b = scene(640.0, 480.0);
        assert_eq!(a.field().agents(), b.field().agents());
    }

    #[test]
    fn empty_viewport_is_safe() {
        for (w, h) in [(0.0, 0.0), (0.0, 600.0), (800.0, 0.0)] {
            let mut s = scene(w, h);
            assert!(s.field().is_empty());
            s.pointer_move(10.0, 10.0);
            s.tick(ms(0)).unwrap();
            assert!(s.primary_surface().is_empty());
            assert!(s.compose().unwrap().is_empty());
        }
    }

    #[test]
    fn resize_rebuilds_after_debounce_window() {
        let mut s = scene(800.0, 600.0);
        let before = s.field().len();
        s.handle(
            InputEvent::Resize {
                width: 400.0,
                height: 300.0,
                dpr: 1.0,
            },
            ms(0),
        )
        .unwrap();
        assert!(s.is_resize_pending());

        assert!(!s.tick(ms(100)).unwrap());
        assert_eq!(s.field().generation(), 0);
        assert_eq!(s.viewport().css_width(), 800.0);

        assert!(s.tick(ms(120)).unwrap());
        assert_eq!(s.field().generation(), 1);
        assert_eq!(s.viewport().css_width(), 400.0);
        assert_eq!(s.primary_surface().width(), 400);
        assert!(s.field().len() < before);
        assert!(!s.is_resize_pending());
    }

    #[test]
    fn resize_burst_builds_only_the_last_viewport() {
        let mut s = scene(800.0, 600.0);
        for (i, w) in [700.0, 600.0, 500.0].into_iter().enumerate() {
            s.handle(
                InputEvent::Resize {
                    width: w,
                    height: 400.0,
                    dpr: 1.0,
                },
                ms(i as u64 * 50),
            )
            .unwrap();
            s.tick(ms(i as u64 * 50)).unwrap();
        }
        assert_eq!(s.field().generation(), 0);
        // Last trigger at 100 ms, window ends at 220 ms.
        assert!(!s.tick(ms(219)).unwrap());
        assert!(s.tick(ms(220)).unwrap());
        assert_eq!(s.field().generation(), 1);
        assert_eq!(s.viewport().css_width(), 500.0);
    }

    #[test]
    fn resize_to_zero_empties_the_field() {
        let mut s = scene(800.0, 600.0);
        s.request_resize(Viewport::new(0.0, 0.0, 1.0).unwrap(), ms(0));
        s.tick(ms(200)).unwrap();
        assert!(s.field().is_empty());
        assert_eq!(s.field().generation(), 1);
    }

    #[test]
    fn invalid_resize_is_an_error() {
        let mut s = scene(800.0, 600.0);
        let result = s.handle(
            InputEvent::Resize {
                width: f64::NAN,
                height: 300.0,
                dpr: 1.0,
            },
            ms(0),
        );
        assert!(matches!(result, Err(DustError::InvalidDimensions)));
        assert!(!s.is_resize_pending());
    }

    #[test]
    fn pointer_over_headline_displaces_agents() {
        let mut s = scene(800.0, 600.0);
        let target = s.field().agents()[s.field().len() / 2].base();
        s.handle(InputEvent::PointerMove { x: target.x, y: target.y }, ms(0))
            .unwrap();
        s.tick(ms(16)).unwrap();
        assert!(s.field().displaced_count() > 0);

        s.handle(InputEvent::PointerLeave, ms(32)).unwrap();
        assert!(!s.pointer().is_active());
        s.tick(ms(32)).unwrap();
        assert_eq!(s.field().displaced_count(), 0);
        assert!(s
            .field()
            .agents()
            .iter()
            .all(|a| a.state() == VisualState::Rest));
    }

    #[test]
    fn tick_draws_particles() {
        let mut s = scene(800.0, 600.0);
        s.tick(ms(0)).unwrap();
        assert_eq!(s.frames(), 1);
        let p = s.field().agents()[0].base();
        assert!(s.primary_surface().alpha(p.x as usize, p.y as usize) > 0);
    }

    #[test]
    fn start_tolerates_failed_font_readiness() {
        struct Broken;
        impl FontReadiness for Broken {
            fn wait_until_ready(&self) -> Result<(), DustError> {
                Err(DustError::Io("no fonts".into()))
            }
        }
        let s = Scene::start(
            SceneConfig::default(),
            Viewport::new(800.0, 600.0, 1.0).unwrap(),
            Some(&Broken),
        )
        .unwrap();
        assert!(!s.field().is_empty());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SceneConfig {
            headline: String::new(),
            ..SceneConfig::default()
        };
        assert!(Scene::new(config, Viewport::new(800.0, 600.0, 1.0).unwrap()).is_err());
    }

    #[test]
    fn compose_covers_the_device_surface() {
        let s = Scene::new(SceneConfig::default(), Viewport::new(100.0, 80.0, 2.0).unwrap()).unwrap();
        assert_eq!(s.compose().unwrap().len(), 200 * 160 * 4);
    }
}
