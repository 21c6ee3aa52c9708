//! Error and diagnostic system for the scene parser.
//!
//! Every failure in the lexing, parsing or elaboration phases is reported as
//! one or more [`Diagnostic`]s wrapped in a [`ParseError`]. A diagnostic
//! carries a severity, an optional [`ErrorCode`], a message, labeled source
//! spans and optional help text.
//!
//! # Example
//!
//! ```
//! # use canopy_parser::error::{Diagnostic, ErrorCode};
//! # use canopy_parser::Span;
//!
//! let span = Span::new(40..62);
//! let first = Span::new(0..22);
//!
//! let diag = Diagnostic::error("scene declares more than one root node")
//!     .with_code(ErrorCode::E201)
//!     .with_label(span, "second root node")
//!     .with_secondary_label(first, "first root declared here")
//!     .with_help("give the node a `parent` attribute");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
