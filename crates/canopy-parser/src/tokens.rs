//! Token definitions for scene source.

use std::fmt;

use crate::span::Span;

/// Token types of the scene format.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'src> {
    // Literals
    StringLiteral(String),
    /// Numeric literal, kept as written (`-1.5`, `1e-05`, `inf`).
    Number(&'src str),
    /// Bare word: keys, constructor names, `true`/`false`/`null`.
    Identifier(&'src str),

    // Operators
    Equals,    // =
    Colon,     // :
    Ampersand, // &
    Caret,     // ^

    // Punctuation
    LeftBracket,  // [
    RightBracket, // ]
    LeftBrace,    // {
    RightBrace,   // }
    LeftParen,    // (
    RightParen,   // )
    Comma,        // ,

    // Comments
    LineComment(&'src str), // ; comment

    // Whitespace
    Whitespace,
    Newline,
}

impl Token<'_> {
    /// Returns `true` for tokens the parser skips between meaningful tokens.
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            Token::Whitespace | Token::Newline | Token::LineComment(_)
        )
    }
}

/// A token with its position in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span) -> Self {
        Self { token, span }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::StringLiteral(s) => write!(f, "\"{s}\""),
            Token::Number(n) => write!(f, "{n}"),
            Token::Identifier(name) => write!(f, "{name}"),

            Token::Equals => write!(f, "="),
            Token::Colon => write!(f, ":"),
            Token::Ampersand => write!(f, "&"),
            Token::Caret => write!(f, "^"),

            Token::LeftBracket => write!(f, "["),
            Token::RightBracket => write!(f, "]"),
            Token::LeftBrace => write!(f, "{{"),
            Token::RightBrace => write!(f, "}}"),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::Comma => write!(f, ","),

            Token::LineComment(comment) => write!(f, ";{comment}"),
            Token::Whitespace => write!(f, "whitespace"),
            Token::Newline => write!(f, "newline"),
        }
    }
}
