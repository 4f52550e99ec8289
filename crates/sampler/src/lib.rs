#![deny(unsafe_code)]
//! Glyph sampler: renders text offscreen and samples its ink into points.
//!
//! Text is drawn with an 8×8 bitmap font scaled to the requested size, into
//! a device-pixel surface sized from the viewport and DPR. The surface is then
//! scanned on a fixed stride, and every pixel whose alpha passes the threshold
//! becomes one sample point in CSS pixel space. The particle field uses these
//! points as home positions.

pub mod font;
pub mod sampler;
pub mod text;

pub use sampler::{GlyphSampler, SamplerParams};
pub use text::{fill_text, Direction, TextAlign, TextBlock, TextStyle};
