//! The [`ParseError`] type returned by [`parse_scene`](crate::parse_scene).

use std::fmt;

use crate::{error::Diagnostic, span::Span};

/// Error type for the scene parsing pipeline.
///
/// Wraps every error-severity diagnostic produced for one scene file,
/// together with any warnings emitted alongside them.
#[derive(Debug, Clone)]
pub struct ParseError {
    diagnostics: Vec<Diagnostic>,
}

impl ParseError {
    /// Create a new parse error from diagnostics.
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    /// Get all diagnostics in this error.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns the primary span of the first diagnostic that has one.
    ///
    /// Callers use it with [`Span::location`] to report a line and column.
    pub fn primary_span(&self) -> Option<Span> {
        self.diagnostics.iter().find_map(|diag| {
            diag.labels()
                .iter()
                .find(|label| label.is_primary())
                .map(|label| label.span())
        })
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(first) = self.diagnostics.first() {
            write!(f, "{}", first)?;
            if self.diagnostics.len() > 1 {
                write!(f, " (+{} more)", self.diagnostics.len() - 1)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
        }
    }
}

impl From<Vec<Diagnostic>> for ParseError {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }
}
