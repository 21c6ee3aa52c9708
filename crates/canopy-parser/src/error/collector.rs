//! Collector for accumulating diagnostics during a processing phase.

use crate::error::{Diagnostic, ParseError};

/// Accumulates diagnostics so a phase can report every problem it finds
/// instead of stopping at the first one.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic, marking the collector as failed for errors.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Finish collection.
    ///
    /// Returns `Err` with every collected diagnostic if any of them is an
    /// error. Warnings alone are logged and dropped.
    pub fn finish(self) -> Result<(), ParseError> {
        if self.has_errors {
            return Err(ParseError::new(self.diagnostics));
        }
        for diagnostic in &self.diagnostics {
            log::warn!(diagnostic:% = diagnostic; "Scene parser warning");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorCode, span::Span};

    #[test]
    fn test_empty_collector_is_ok() {
        assert!(DiagnosticCollector::new().finish().is_ok());
    }

    #[test]
    fn test_warnings_only_is_ok() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(Diagnostic::warning("ignored section"));

        assert!(collector.finish().is_ok());
    }

    #[test]
    fn test_errors_keep_all_diagnostics() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(
            Diagnostic::error("unknown external resource `3`")
                .with_code(ErrorCode::E202)
                .with_label(Span::new(10..25), "not declared"),
        );
        collector.emit(Diagnostic::warning("ignored section"));

        let err = collector.finish().unwrap_err();
        assert_eq!(err.diagnostics().len(), 2);
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E202));
    }
}
