//! Errors raised while loading level configuration.
//!
//! The simulation itself never fails: degenerate geometry is clamped, and a
//! lost rocket is a [`GamePhase`](crate::sim::GamePhase), not an error.

use std::fmt;

/// Error loading or validating a [`LevelConfig`](crate::level::LevelConfig)
#[derive(Debug)]
pub enum LevelError {
    /// The level file could not be read.
    Io(std::io::Error),
    /// The level JSON could not be parsed.
    Parse(serde_json::Error),
    /// A configuration value is out of range.
    Invalid(String),
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "Level read error: {err}"),
            Self::Parse(err) => write!(f, "Level parse error: {err}"),
            Self::Invalid(msg) => write!(f, "Invalid level: {msg}"),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for LevelError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for LevelError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}
