//! Error types for implore-facts
//!
//! Unparsable cells and thin data never surface here; they degrade to
//! "no fact". Errors are reserved for structural problems and for the
//! configuration and I/O around the engine.

use implore_io::IoError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for fact detection
#[derive(Error, Debug)]
pub enum FactError {
    /// Table violates the chart data contract
    #[error("Invalid table: {0}")]
    InvalidTable(String),

    /// Chart data could not be loaded
    #[error("Failed to load chart data: {0}")]
    Io(#[from] IoError),

    /// A file could not be read
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for `FactConfig`
    #[error("Configuration parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration values out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for fact operations
pub type FactResult<T> = Result<T, FactError>;
