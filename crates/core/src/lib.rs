#![deny(unsafe_code)]
//! Core types for the glyph-dust particle text system.
//!
//! Provides the `Engine` trait, the device-pixel `Surface` and `CoverageMask`,
//! `Viewport` with responsive `FontSizeRule`s, `PointerState`, the `Rgba`
//! color type, injectable randomness (`RandomSource`, `Xorshift64`), and JSON
//! parameter helpers.

pub mod color;
pub mod engine;
pub mod error;
pub mod params;
pub mod pointer;
pub mod prng;
pub mod surface;
pub mod viewport;

pub use color::Rgba;
pub use engine::Engine;
pub use error::DustError;
pub use pointer::PointerState;
pub use prng::{RandomSource, SequenceSource, Xorshift64};
pub use surface::{CoverageMask, Surface};
pub use viewport::{FontSizeRule, SizeTier, Viewport};
