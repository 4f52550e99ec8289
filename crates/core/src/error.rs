//! Error types for glyph-dust.

use thiserror::Error;

/// Errors produced by surface, config, and snapshot operations.
///
/// The simulation itself never fails; these cover allocation, parsing, and I/O
/// at the edges.
#[derive(Debug, Error)]
pub enum DustError {
    /// A surface or viewport size overflowed `usize` or was not finite.
    #[error("invalid dimensions: width and height must be finite and fit in memory")]
    InvalidDimensions,

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A scene or field configuration failed validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Writing a snapshot or reading a config file failed.
    #[error("io error: {0}")]
    Io(String),
}
