//! Error types for Canopy operations.
//!
//! This module provides the main error type [`CanopyError`] which wraps
//! the error conditions that can occur while generating diagrams.

use std::{fmt, io};

use thiserror::Error;

use canopy_parser::error::ParseError;

/// The main error type for Canopy operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the scene source and path next to the
/// structured [`ParseError`] so callers can render rich, span-based reports.
#[derive(Debug, Error)]
pub enum CanopyError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{path}: {err}")]
    Parse {
        err: ParseError,
        src: String,
        path: String,
    },

    #[error("Export error: {0}")]
    Export(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<fmt::Error> for CanopyError {
    fn from(error: fmt::Error) -> Self {
        Self::Export(error.to_string())
    }
}

impl CanopyError {
    /// Create a new `Parse` error with the associated source code and path.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
            path: path.into(),
        }
    }
}
