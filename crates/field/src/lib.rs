#![deny(unsafe_code)]
//! Particle field: pointer repulsion with elastic return-to-origin.
//!
//! Every agent is pinned to a base position sampled from glyph ink. Each tick
//! the pointer (if present and within its radius) pushes nearby agents away
//! with a linear falloff; everything else eases back home by a fixed fraction
//! of the remaining distance. An agent never strays further from its base than
//! its own `max_offset`.
//!
//! The field is rebuilt wholesale whenever the sample points change.

pub mod agent;

pub use agent::{Agent, VisualState};

use glam::DVec2;
use glyph_dust_core::params::param_f64;
use glyph_dust_core::{DustError, Engine, PointerState, RandomSource, Rgba, Surface};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, trace};

/// Multiplier applied to every repulsion step.
const DEFAULT_AMPLIFICATION: f64 = 3.0;
/// Fraction of the remaining distance to base closed per tick at rest.
const DEFAULT_RELAX_RATE: f64 = 0.08;
const DEFAULT_DENSITY_MIN: f64 = 5.0;
const DEFAULT_DENSITY_MAX: f64 = 30.0;
const DEFAULT_MAX_OFFSET_MIN: f64 = 6.0;
const DEFAULT_MAX_OFFSET_MAX: f64 = 12.0;
/// Drawn circle radius in CSS pixels.
const DEFAULT_PARTICLE_SIZE: f64 = 2.0;

/// Tuning values for the particle field.
///
/// [`Default`] matches the error-page look: gold particles at rest that flash
/// white while displaced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldParams {
    /// Multiplier applied to every repulsion step.
    pub amplification: f64,
    /// Fraction of the remaining distance to base closed per tick at rest.
    pub relax_rate: f64,
    /// Lower bound of the per-agent push strength.
    pub density_min: f64,
    /// Upper bound of the per-agent push strength.
    pub density_max: f64,
    /// Lower bound of how far an agent may stray from its base, in CSS pixels.
    pub max_offset_min: f64,
    /// Upper bound of how far an agent may stray from its base, in CSS pixels.
    pub max_offset_max: f64,
    /// Drawn circle radius in CSS pixels.
    pub particle_size: f64,
    /// Fill for agents sitting on their base.
    pub rest_color: Rgba,
    /// Fill for agents pushed off their base.
    pub displaced_color: Rgba,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            amplification: DEFAULT_AMPLIFICATION,
            relax_rate: DEFAULT_RELAX_RATE,
            density_min: DEFAULT_DENSITY_MIN,
            density_max: DEFAULT_DENSITY_MAX,
            max_offset_min: DEFAULT_MAX_OFFSET_MIN,
            max_offset_max: DEFAULT_MAX_OFFSET_MAX,
            particle_size: DEFAULT_PARTICLE_SIZE,
            rest_color: Rgba::from_rgba8(255, 215, 0, 0.85),
            displaced_color: Rgba::WHITE,
        }
    }
}

impl FieldParams {
    /// Overlays values from a JSON object onto `self`. Missing keys, wrong
    /// types, and unparseable colors keep the current value.
    pub fn merged_with(&self, params: &Value) -> Self {
        let color = |name: &str, current: Rgba| {
            params
                .get(name)
                .and_then(Value::as_str)
                .and_then(|s| Rgba::parse(s).ok())
                .unwrap_or(current)
        };
        Self {
            amplification: param_f64(params, "amplification", self.amplification),
            relax_rate: param_f64(params, "relax_rate", self.relax_rate),
            density_min: param_f64(params, "density_min", self.density_min),
            density_max: param_f64(params, "density_max", self.density_max),
            max_offset_min: param_f64(params, "max_offset_min", self.max_offset_min),
            max_offset_max: param_f64(params, "max_offset_max", self.max_offset_max),
            particle_size: param_f64(params, "particle_size", self.particle_size),
            rest_color: color("rest_color", self.rest_color),
            displaced_color: color("displaced_color", self.displaced_color),
        }
    }

    /// Defaults overlaid with values from a JSON object.
    pub fn from_json(params: &Value) -> Self {
        Self::default().merged_with(params)
    }

    /// Checks ranges: finite non-negative values, ordered min/max pairs, and a
    /// relax rate in (0, 1].
    pub fn validate(&self) -> Result<(), DustError> {
        let values = [
            ("amplification", self.amplification),
            ("density_min", self.density_min),
            ("density_max", self.density_max),
            ("max_offset_min", self.max_offset_min),
            ("max_offset_max", self.max_offset_max),
            ("particle_size", self.particle_size),
        ];
        if let Some((name, v)) = values.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
            return Err(DustError::InvalidConfig(format!(
                "{name} must be a finite non-negative number, got {v}"
            )));
        }
        if !(self.relax_rate > 0.0 && self.relax_rate <= 1.0) {
            return Err(DustError::InvalidConfig(format!(
                "relax_rate must be in (0, 1], got {}",
                self.relax_rate
            )));
        }
        if self.density_min > self.density_max {
            return Err(DustError::InvalidConfig(
                "density_min must not exceed density_max".into(),
            ));
        }
        if self.max_offset_min > self.max_offset_max {
            return Err(DustError::InvalidConfig(
                "max_offset_min must not exceed max_offset_max".into(),
            ));
        }
        Ok(())
    }
}

/// The agent collection for one sampling generation.
#[derive(Debug, Clone)]
pub struct ParticleField {
    agents: Vec<Agent>,
    params: FieldParams,
    generation: u64,
}

impl ParticleField {
    /// One agent per sample point, traits drawn from `rng`.
    pub fn new<R: RandomSource + ?Sized>(points: &[DVec2], params: FieldParams, rng: &mut R) -> Self {
        let agents = spawn(points, &params, rng);
        Self {
            agents,
            params,
            generation: 0,
        }
    }

    /// Like [`ParticleField::new`] with params read from JSON.
    pub fn from_json<R: RandomSource + ?Sized>(points: &[DVec2], json_params: &Value, rng: &mut R) -> Self {
        Self::new(points, FieldParams::from_json(json_params), rng)
    }

    /// Discards every agent and spawns a fresh batch from `points`.
    pub fn rebuild<R: RandomSource + ?Sized>(&mut self, points: &[DVec2], rng: &mut R) {
        self.agents = spawn(points, &self.params, rng);
        self.generation += 1;
        debug!(
            agents = self.agents.len(),
            generation = self.generation,
            "rebuilt particle field"
        );
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Mutable access for callers that seed positions directly.
    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Number of rebuilds since construction.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn field_params(&self) -> &FieldParams {
        &self.params
    }

    /// Count of agents currently in the displaced state.
    pub fn displaced_count(&self) -> usize {
        self.agents
            .iter()
            .filter(|a| a.state() == VisualState::Displaced)
            .count()
    }
}

fn spawn<R: RandomSource + ?Sized>(points: &[DVec2], params: &FieldParams, rng: &mut R) -> Vec<Agent> {
    points.iter().map(|&p| Agent::new(p, params, rng)).collect()
}

impl Engine for ParticleField {
    fn advance(&mut self, pointer: &PointerState) {
        for agent in &mut self.agents {
            agent.update(pointer, &self.params);
        }
        trace!(agents = self.agents.len(), pointer = pointer.is_active(), "advanced field");
    }

    fn render(&self, surface: &mut Surface) {
        for agent in &self.agents {
            agent.draw(surface, &self.params);
        }
    }

    /// Single pass: each agent is drawn at its current position, then updated.
    fn advance_and_render(&mut self, pointer: &PointerState, surface: &mut Surface) {
        surface.clear();
        for agent in &mut self.agents {
            agent.draw(surface, &self.params);
            agent.update(pointer, &self.params);
        }
        trace!(agents = self.agents.len(), pointer = pointer.is_active(), "field frame");
    }

    fn params(&self) -> Value {
        json!({
            "amplification": self.params.amplification,
            "relax_rate": self.params.relax_rate,
            "density_min": self.params.density_min,
            "density_max": self.params.density_max,
            "max_offset_min": self.params.max_offset_min,
            "max_offset_max": self.params.max_offset_max,
            "particle_size": self.params.particle_size,
            "rest_color": self.params.rest_color.to_css(),
            "displaced_color": self.params.displaced_color.to_css(),
        })
    }

    fn param_schema(&self) -> Value {
        let d = FieldParams::default();
        json!({
            "amplification": {
                "type": "number",
                "default": DEFAULT_AMPLIFICATION,
                "min": 0.0,
                "max": 10.0,
                "description": "Multiplier on every repulsion step"
            },
            "relax_rate": {
                "type": "number",
                "default": DEFAULT_RELAX_RATE,
                "min": 0.0,
                "max": 1.0,
                "description": "Fraction of the distance to base closed per tick at rest"
            },
            "density_min": {
                "type": "number",
                "default": DEFAULT_DENSITY_MIN,
                "min": 0.0,
                "max": 100.0,
                "description": "Lower bound of the per-agent repulsion strength"
            },
            "density_max": {
                "type": "number",
                "default": DEFAULT_DENSITY_MAX,
                "min": 0.0,
                "max": 100.0,
                "description": "Upper bound (exclusive) of the per-agent repulsion strength"
            },
            "max_offset_min": {
                "type": "number",
                "default": DEFAULT_MAX_OFFSET_MIN,
                "min": 0.0,
                "max": 100.0,
                "description": "Lower bound of the per-agent maximum displacement, CSS px"
            },
            "max_offset_max": {
                "type": "number",
                "default": DEFAULT_MAX_OFFSET_MAX,
                "min": 0.0,
                "max": 100.0,
                "description": "Upper bound (exclusive) of the per-agent maximum displacement, CSS px"
            },
            "particle_size": {
                "type": "number",
                "default": DEFAULT_PARTICLE_SIZE,
                "min": 0.0,
                "max": 20.0,
                "description": "Drawn circle radius, CSS px"
            },
            "rest_color": {
                "type": "color",
                "default": d.rest_color.to_css(),
                "description": "Color of agents at rest"
            },
            "displaced_color": {
                "type": "color",
                "default": d.displaced_color.to_css(),
                "description": "Color of agents pushed by the pointer"
            }
        })
    }
}
