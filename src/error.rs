//! Error types for notebook parameterization
//!
//! Only malformed input, I/O and configuration problems surface as errors.
//! Detector misses and name collisions are handled inside the engine.

use crate::config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or saving a notebook document
#[derive(Debug, Error)]
pub enum NotebookError {
    /// Reading or writing the container failed
    #[error("I/O error on {path}: {message}")]
    Io { path: PathBuf, message: String },

    /// The document cannot be parsed into cells and lines
    #[error("Malformed notebook: {0}")]
    Malformed(String),
}

impl NotebookError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    pub fn io(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

/// Top-level error for a parameterization run
#[derive(Debug, Error)]
pub enum ParameterizeError {
    #[error(transparent)]
    Notebook(#[from] NotebookError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A driver snippet could not be rendered
    #[error("Failed to render snippet: {0}")]
    Snippet(String),
}

pub type Result<T> = std::result::Result<T, ParameterizeError>;
