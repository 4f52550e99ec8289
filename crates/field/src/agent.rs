//! A single particle pinned to a home position.

use crate::FieldParams;
use glam::DVec2;
use glyph_dust_core::{PointerState, RandomSource, Rgba, Surface};

/// Stand-in distance when the pointer sits exactly on an agent.
const DISTANCE_EPSILON: f64 = 0.001;

/// Which of the two colors an agent is drawn in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VisualState {
    #[default]
    Rest,
    Displaced,
}

impl VisualState {
    pub fn color(self, params: &FieldParams) -> Rgba {
        match self {
            VisualState::Rest => params.rest_color,
            VisualState::Displaced => params.displaced_color,
        }
    }
}

/// One particle: a live position tethered to an immutable base.
///
/// `density` scales how hard the pointer pushes this agent; `max_offset`
/// bounds how far it may stray from `base`.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    position: DVec2,
    base: DVec2,
    density: f64,
    max_offset: f64,
    size: f64,
    state: VisualState,
}

impl Agent {
    /// An agent at rest on `base`, with density and max offset drawn from
    /// the ranges in `params`.
    pub fn new<R: RandomSource + ?Sized>(base: DVec2, params: &FieldParams, rng: &mut R) -> Self {
        let density = rng.next_range(params.density_min, params.density_max);
        let max_offset = rng.next_range(params.max_offset_min, params.max_offset_max);
        Self::with_traits(base, density, max_offset, params.particle_size)
    }

    /// An agent at rest on `base` with explicit traits.
    pub fn with_traits(base: DVec2, density: f64, max_offset: f64, size: f64) -> Self {
        Self {
            position: base,
            base,
            density,
            max_offset: max_offset.max(0.0),
            size,
            state: VisualState::Rest,
        }
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn base(&self) -> DVec2 {
        self.base
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    pub fn max_offset(&self) -> f64 {
        self.max_offset
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn state(&self) -> VisualState {
        self.state
    }

    pub fn distance_from_base(&self) -> f64 {
        self.position.distance(self.base)
    }

    /// Moves the agent to `position`, clamped to its max offset.
    pub fn displace_to(&mut self, position: DVec2) {
        self.position = position;
        self.clamp_to_base();
    }

    /// One tick: repel from the pointer if it is within range, otherwise
    /// ease back toward base. Either way the offset is clamped afterwards.
    pub fn update(&mut self, pointer: &PointerState, params: &FieldParams) {
        if let Some(target) = pointer.position() {
            let radius = pointer.radius();
            let toward = target - self.position;
            let mut distance = toward.length();
            if distance == 0.0 {
                distance = DISTANCE_EPSILON;
            }
            if distance < radius {
                let force = (radius - distance) / radius;
                let push = toward / distance * force * self.density * params.amplification;
                self.position -= push;
                self.clamp_to_base();
                self.state = VisualState::Displaced;
                return;
            }
        }

        self.position += (self.base - self.position) * params.relax_rate;
        self.clamp_to_base();
        self.state = VisualState::Rest;
    }

    fn clamp_to_base(&mut self) {
        let offset = self.position - self.base;
        let distance = offset.length();
        if distance > self.max_offset {
            self.position = self.base + offset * (self.max_offset / distance);
        }
    }

    pub fn draw(&self, surface: &mut Surface, params: &FieldParams) {
        surface.fill_circle(self.position, self.size, self.state.color(params));
    }
}
