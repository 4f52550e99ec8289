//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: scene error (bad dimensions, empty viewport on render)
//! - 11: I/O error (config read, PNG write)
//! - 12: input error (bad config, bad JSON params, bad --pointer or --resize value)
//! - 13: serialization error

use glyph_dust_core::DustError;
use std::fmt;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum CliError {
    Scene(DustError),
    Io(String),
    Input(String),
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Scene(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Scene(e) => write!(f, "{e}"),
            CliError::Io(msg) | CliError::Input(msg) | CliError::Serialization(msg) => {
                write!(f, "{msg}")
            }
        }
    }
}

impl From<DustError> for CliError {
    fn from(e: DustError) -> Self {
        match e {
            DustError::Io(msg) => CliError::Io(msg),
            DustError::InvalidConfig(_) | DustError::InvalidColor(_) => {
                CliError::Input(e.to_string())
            }
            other => CliError::Scene(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
