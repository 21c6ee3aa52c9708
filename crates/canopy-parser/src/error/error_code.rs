//! Error codes for scene diagnostics.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Lexer errors
//! - `E1xx` - Parser errors
//! - `E2xx` - Elaboration errors

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexer Errors (E0xx)
    // =========================================================================
    /// Unterminated string literal.
    ///
    /// A string was opened with a quote but the file ended before it closed.
    E001,

    /// Unexpected character.
    ///
    /// A character was encountered that cannot start any token.
    E002,

    /// Invalid escape sequence.
    ///
    /// Valid escapes are: `\n`, `\r`, `\t`, `\b`, `\f`, `\\`, `\/`, `\"`,
    /// `\'` and `\uXXXX`.
    E003,

    // =========================================================================
    // Parser Errors (E1xx)
    // =========================================================================
    /// Unexpected token.
    ///
    /// The parser encountered a token it did not expect at this position.
    E100,

    /// Incomplete input.
    ///
    /// The file ended inside a section header, array, dictionary or call.
    E101,

    // =========================================================================
    // Elaboration Errors (E2xx)
    // =========================================================================
    /// Missing root node.
    ///
    /// No `[node]` section without a `parent` attribute was found.
    E200,

    /// Duplicate root node.
    ///
    /// More than one `[node]` section lacks a `parent` attribute.
    E201,

    /// Unknown external resource.
    ///
    /// An `ExtResource(...)` reference names an id that no
    /// `[ext_resource]` section declares.
    E202,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unterminated string literal",
            ErrorCode::E002 => "unexpected character",
            ErrorCode::E003 => "invalid escape sequence",
            ErrorCode::E100 => "unexpected token",
            ErrorCode::E101 => "incomplete input",
            ErrorCode::E200 => "missing root node",
            ErrorCode::E201 => "duplicate root node",
            ErrorCode::E202 => "unknown external resource",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
