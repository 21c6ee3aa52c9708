//! Lexical analyzer for scene source text.
//!
//! The lexer converts scene text into a stream of [`Token`]s. The public entry
//! point is [`tokenize`], which recovers from errors and collects every
//! lexical diagnostic in a single pass.

use winnow::{
    Parser as _,
    ascii::float,
    combinator::{alt, cut_err, not, peek, preceded, repeat, terminated},
    error::{ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{none_of, one_of, take_while},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
    tokens::{PositionedToken, Token},
};

/// Diagnostic information attached to winnow errors via `.context()`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexerDiagnostic {
    pub code: ErrorCode,
    pub message: &'static str,
    pub help: Option<&'static str>,
    /// The error span covers from `start` to the error position.
    pub start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError<LexerDiagnostic>>;

/// Characters allowed inside bare words and property keys.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '/' | '.')
}

/// Succeeds when the input does not continue a bare word.
fn word_boundary(input: &mut Input<'_>) -> IResult<()> {
    peek(not(alt((
        one_of(is_word_char).void(),
        (':', one_of(is_word_char)).void(),
    ))))
    .parse_next(input)
}

/// Parse an escape sequence in a string, starting at the backslash.
///
/// Handles `\n`, `\r`, `\t`, `\b`, `\f`, `\\`, `\/`, `\"`, `\'` and
/// `\uXXXX`. Anything else is a committed E003 error.
fn string_escape(input: &mut Input<'_>) -> IResult<char> {
    let escape_start = input.current_token_start();

    '\\'.parse_next(input)?;

    cut_err(alt((
        one_of(['n', 'r', 't', 'b', 'f', '\\', '/', '"', '\'']).map(|c| match c {
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'b' => '\u{08}',
            'f' => '\u{0C}',
            other => other,
        }),
        preceded('u', take_while(4, |c: char| c.is_ascii_hexdigit())).verify_map(
            |hex: &str| u32::from_str_radix(hex, 16).ok().and_then(char::from_u32),
        ),
    )))
    .context(LexerDiagnostic {
        code: ErrorCode::E003,
        message: "invalid escape sequence",
        help: Some("valid escapes: `\\n`, `\\r`, `\\t`, `\\b`, `\\f`, `\\\\`, `\\/`, `\\\"`, `\\'`, `\\uXXXX`"),
        start: escape_start,
    })
    .parse_next(input)
}

/// Parse a double-quoted string literal.
///
/// Scene strings may span several lines, so only end of input terminates an
/// unclosed string.
fn string_literal<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let string_content = repeat(0.., alt((string_escape, none_of(['"', '\\']))))
        .fold(String::new, |mut acc, ch| {
            acc.push(ch);
            acc
        });

    let start_pos = input.current_token_start();

    '"'.parse_next(input)?;

    cut_err(terminated(string_content, '"'))
        .context(LexerDiagnostic {
            code: ErrorCode::E001,
            message: "unterminated string literal",
            help: Some("add closing `\"`"),
            start: start_pos,
        })
        .parse_next(input)
        .map(Token::StringLiteral)
}

/// Parse a numeric literal, keeping its source text.
fn number<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    // The boundary check keeps `inf` in `info` or `1` in `1_abc` from
    // lexing as numbers.
    terminated(float.map(|_: f64| ()).take(), word_boundary)
        .map(Token::Number)
        .parse_next(input)
}

/// Parse a bare word such as `load_steps`, `metadata/_edit_lock_` or `0:0/0`.
fn identifier<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    (
        take_while(1.., is_word_char),
        repeat::<_, _, (), _, _>(0.., (':', take_while(1.., is_word_char))),
    )
        .take()
        .verify(|word: &str| word.starts_with(|c: char| c.is_alphanumeric() || c == '_'))
        .map(Token::Identifier)
        .parse_next(input)
}

/// Parse line comment starting with ';'
fn line_comment<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    preceded(';', take_while(0.., |c| c != '\n'))
        .map(Token::LineComment)
        .parse_next(input)
}

/// Parse single character tokens
fn single_char_token<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        '['.value(Token::LeftBracket),
        ']'.value(Token::RightBracket),
        '{'.value(Token::LeftBrace),
        '}'.value(Token::RightBrace),
        '('.value(Token::LeftParen),
        ')'.value(Token::RightParen),
        '='.value(Token::Equals),
        ':'.value(Token::Colon),
        ','.value(Token::Comma),
        '&'.value(Token::Ampersand),
        '^'.value(Token::Caret),
    ))
    .parse_next(input)
}

/// Parse whitespace other than newlines
fn whitespace<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    take_while(1.., |c: char| c.is_whitespace() && c != '\n')
        .value(Token::Whitespace)
        .parse_next(input)
}

fn newline<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    '\n'.value(Token::Newline).parse_next(input)
}

/// Parse a single token with position tracking
fn positioned_token<'a>(input: &mut Input<'a>) -> IResult<PositionedToken<'a>> {
    let start_pos = input.current_token_start();

    let token = alt((
        line_comment,
        string_literal,
        number,     // Must come before identifier
        identifier, // Must come before single chars
        single_char_token,
        newline, // Must come before whitespace
        whitespace,
    ))
    .parse_next(input)?;

    let end_pos = input.current_token_start();

    Ok(PositionedToken::new(token, Span::new(start_pos..end_pos)))
}

/// Lexer that accumulates tokens and diagnostics during tokenization.
struct Lexer<'a> {
    tokens: Vec<PositionedToken<'a>>,
    diagnostics: DiagnosticCollector,
}

impl<'a> Lexer<'a> {
    fn new() -> Self {
        Self {
            tokens: Vec::new(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    /// Tokenize the input, collecting tokens and errors.
    fn tokenize(&mut self, mut input: Input<'a>) {
        while !input.is_empty() {
            match positioned_token(&mut input) {
                Ok(token) => self.tokens.push(token),
                Err(e) => {
                    let error_pos = input.current_token_start();
                    self.diagnostics.emit(Self::convert_err_mode(e, error_pos));

                    // Skip one character and resume; a bad escape may leave
                    // the closing quote to start a second, unterminated string.
                    if !input.is_empty() {
                        input.next_token();
                    }
                }
            }
        }
    }

    fn finish(self) -> Result<Vec<PositionedToken<'a>>, ParseError> {
        self.diagnostics.finish().map(|()| self.tokens)
    }

    /// Convert an ErrMode and error position to a Diagnostic.
    ///
    /// Uses the innermost `LexerDiagnostic` context when present and falls
    /// back to E002 (unexpected character) otherwise.
    fn convert_err_mode(
        err: ErrMode<ContextError<LexerDiagnostic>>,
        error_pos: usize,
    ) -> Diagnostic {
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => ContextError::new(),
        };

        if let Some(LexerDiagnostic {
            code,
            message,
            help,
            start,
        }) = context_error.context().next()
        {
            let span = Span::new(*start..error_pos.max(*start + 1));

            let mut diag = Diagnostic::error(*message)
                .with_code(*code)
                .with_label(span, code.description());
            if let Some(h) = help {
                diag = diag.with_help(*h);
            }
            return diag;
        }

        let span = Span::new(error_pos..error_pos.saturating_add(1));
        Diagnostic::error("unexpected character")
            .with_code(ErrorCode::E002)
            .with_label(span, ErrorCode::E002.description())
    }
}

/// Split scene source into tokens, collecting every lexical error.
///
/// # Returns
///
/// - `Ok(tokens)` - All tokens, including whitespace and comments
/// - `Err(ParseError)` - One or more lexical errors; contains all diagnostics
pub fn tokenize(input: &str) -> Result<Vec<PositionedToken<'_>>, ParseError> {
    let mut lexer = Lexer::new();
    lexer.tokenize(LocatingSlice::new(input));
    lexer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meaningful(input: &str) -> Vec<Token<'_>> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|positioned| positioned.token)
            .filter(|token| !token.is_trivia())
            .collect()
    }

    fn error_codes(input: &str) -> Vec<ErrorCode> {
        tokenize(input)
            .unwrap_err()
            .diagnostics()
            .iter()
            .filter_map(|diag| diag.code())
            .collect()
    }

    #[test]
    fn test_section_header() {
        assert_eq!(
            meaningful("[gd_scene load_steps=3 format=3 uid=\"uid://b1\"]"),
            vec![
                Token::LeftBracket,
                Token::Identifier("gd_scene"),
                Token::Identifier("load_steps"),
                Token::Equals,
                Token::Number("3"),
                Token::Identifier("format"),
                Token::Equals,
                Token::Number("3"),
                Token::Identifier("uid"),
                Token::Equals,
                Token::StringLiteral("uid://b1".into()),
                Token::RightBracket,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            meaningful("-1.5 1e-05 42 inf nan .5"),
            vec![
                Token::Number("-1.5"),
                Token::Number("1e-05"),
                Token::Number("42"),
                Token::Number("inf"),
                Token::Number("nan"),
                Token::Number(".5"),
            ]
        );
    }

    #[test]
    fn test_words_are_not_numbers() {
        assert_eq!(
            meaningful("info nan_value 2d 1_abc"),
            vec![
                Token::Identifier("info"),
                Token::Identifier("nan_value"),
                Token::Identifier("2d"),
                Token::Identifier("1_abc"),
            ]
        );
    }

    #[test]
    fn test_property_keys_with_separators() {
        assert_eq!(
            meaningful("metadata/_edit_lock_ = true\n0:0/0 = 0"),
            vec![
                Token::Identifier("metadata/_edit_lock_"),
                Token::Equals,
                Token::Identifier("true"),
                Token::Identifier("0:0/0"),
                Token::Equals,
                Token::Number("0"),
            ]
        );
    }

    #[test]
    fn test_colon_before_space_is_separate() {
        assert_eq!(
            meaningful("{ \"a\": 1, b: 2 }"),
            vec![
                Token::LeftBrace,
                Token::StringLiteral("a".into()),
                Token::Colon,
                Token::Number("1"),
                Token::Comma,
                Token::Identifier("b"),
                Token::Colon,
                Token::Number("2"),
                Token::RightBrace,
            ]
        );
    }

    #[test]
    fn test_string_escapes_and_newlines() {
        assert_eq!(
            meaningful("\"say \\\"hi\\\"\\n\\u00e9\"\n\"two\nlines\""),
            vec![
                Token::StringLiteral("say \"hi\"\né".into()),
                Token::StringLiteral("two\nlines".into()),
            ]
        );
    }

    #[test]
    fn test_string_name_and_node_path_prefixes() {
        assert_eq!(
            meaningful("&\"idle\" ^\"../Player\""),
            vec![
                Token::Ampersand,
                Token::StringLiteral("idle".into()),
                Token::Caret,
                Token::StringLiteral("../Player".into()),
            ]
        );
    }

    #[test]
    fn test_comment_runs_to_end_of_line() {
        let tokens = tokenize("; generated [not a section]\n[node]").unwrap();
        assert_eq!(tokens[0].token, Token::LineComment(" generated [not a section]"));
        assert_eq!(tokens[1].token, Token::Newline);
        assert_eq!(tokens[2].token, Token::LeftBracket);
    }

    #[test]
    fn test_span_tracking() {
        let tokens = tokenize("[node name=\"A\"]").unwrap();
        let spans: Vec<_> = tokens
            .iter()
            .filter(|t| !t.token.is_trivia())
            .map(|t| (t.span.start(), t.span.end()))
            .collect();
        assert_eq!(spans, vec![(0, 1), (1, 5), (6, 10), (10, 11), (11, 14), (14, 15)]);
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("[node name=\"Root]\n").unwrap_err();
        let diag = &err.diagnostics()[0];

        assert_eq!(diag.code(), Some(ErrorCode::E001));
        assert_eq!(diag.labels()[0].span().start(), 11);
        assert_eq!(diag.labels()[0].span().end(), 18);
        assert_eq!(err.diagnostics().len(), 1);
    }

    #[test]
    fn test_invalid_escape() {
        assert_eq!(error_codes("\"bad \\q\"").first(), Some(&ErrorCode::E003));
    }

    #[test]
    fn test_short_unicode_escape() {
        assert_eq!(error_codes("\"\\u12\"").first(), Some(&ErrorCode::E003));
    }

    #[test]
    fn test_unexpected_characters_are_all_reported() {
        let err = tokenize("[node name=\"A\"] # $").unwrap_err();
        let positions: Vec<_> = err
            .diagnostics()
            .iter()
            .map(|diag| {
                assert_eq!(diag.code(), Some(ErrorCode::E002));
                diag.labels()[0].span().start()
            })
            .collect();
        assert_eq!(positions, vec![16, 18]);
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn property_key_strategy() -> impl Strategy<Value = String> {
        "[a-z_][a-z0-9_]{0,12}(/[a-z0-9_]{1,8}){0,2}".prop_filter("not a number", |s| {
            !matches!(s.as_str(), "inf" | "nan" | "infinity")
        })
    }

    fn check_property_line(key: &str, value: f64) -> Result<(), TestCaseError> {
        let source = format!("{key} = {value}\n");
        let tokens = tokenize(&source).map_err(|err| TestCaseError::fail(err.to_string()))?;
        let meaningful: Vec<_> = tokens.iter().filter(|t| !t.token.is_trivia()).collect();

        prop_assert_eq!(meaningful.len(), 3);
        prop_assert_eq!(&meaningful[0].token, &Token::Identifier(key));
        prop_assert_eq!(&meaningful[1].token, &Token::Equals);
        prop_assert!(matches!(meaningful[2].token, Token::Number(_)));
        Ok(())
    }

    proptest! {
        #[test]
        fn property_lines_tokenize(key in property_key_strategy(), value in -1.0e6f64..1.0e6) {
            check_property_line(&key, value)?;
        }

        #[test]
        fn tokenize_never_panics(source in "\\PC{0,64}") {
            let _ = tokenize(&source);
        }
    }
}
