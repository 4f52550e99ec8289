#![deny(unsafe_code)]
//! Scene orchestration for glyph-dust.
//!
//! A [`Scene`] ties the sampler and the particle field to a viewport: it lays
//! out the headline and label, samples the headline into agents, keeps the
//! pointer state, and rebuilds everything when a resize settles. Ticks are
//! driven by a [`frame_loop::FrameScheduler`]. Both the CLI and any
//! interactive front end depend on this crate to avoid duplicating that
//! wiring.

pub mod config;
pub mod debounce;
pub mod fonts;
pub mod frame_loop;
pub mod label;
pub mod layout;
pub mod pixel;
pub mod scene;

#[cfg(feature = "png")]
pub mod snapshot;

pub use config::{LabelConfig, SceneConfig};
pub use debounce::Debouncer;
pub use fonts::{BuiltinFont, FontReadiness};
pub use frame_loop::{FixedStep, FrameScheduler, InputSource, Realtime, FRAME_INTERVAL};
pub use layout::Layout;
pub use scene::{InputEvent, Scene};
