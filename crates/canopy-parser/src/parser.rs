//! Parser for scene tokens.
//!
//! This module turns the token stream from the [`lexer`](super::lexer) into
//! the [`Section`](types::Section) list defined in
//! [`parser_types`](super::parser_types). The public entry point is
//! [`build_sections`].
//!
//! Newlines carry no meaning in the scene format, but adjacency does: a
//! bare word directly followed by `(` or `[` starts a constructor call, so
//! trivia tokens stay in the stream and are skipped explicitly.

use winnow::{
    Parser,
    combinator::{alt, opt, repeat},
    error::{ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use crate::{
    error::{Diagnostic, ErrorCode},
    parser_types::{self as types, Value},
    span::{Span, Spanned},
    tokens::{PositionedToken, Token},
};

/// Context type for parser errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// Description of what was expected
    Label(&'static str),
    /// Remaining token count (`eof_offset()`) where the committed construct
    /// started
    StartOffset(usize),
}

type Input<'src> = SceneTokenSlice<'src>;
type IResult<O> = std::result::Result<O, ErrMode<ContextError<Context>>>;
type SceneTokenSlice<'src> = TokenSlice<'src, PositionedToken<'src>>;

/// Run `f`, committing to its result: any failure becomes a Cut error that
/// remembers where the construct started.
fn cut_err<'src, O, F>(input: &mut Input<'src>, start_remaining: usize, f: F) -> IResult<O>
where
    F: FnOnce(&mut Input<'src>) -> IResult<O>,
{
    match f(input) {
        Ok(o) => Ok(o),
        Err(ErrMode::Backtrack(mut e)) | Err(ErrMode::Cut(mut e)) => {
            e.push(Context::StartOffset(start_remaining));
            Err(ErrMode::Cut(e))
        }
        Err(e) => Err(e),
    }
}

/// Match a single punctuation token, returning its span.
fn punct<'src>(
    expected: Token<'src>,
) -> impl Parser<Input<'src>, Span, ErrMode<ContextError<Context>>> {
    any.verify_map(move |token: &'src PositionedToken<'src>| {
        (token.token == expected).then_some(token.span)
    })
}

/// Parse one whitespace, newline or comment token
fn trivia<'src>(input: &mut Input<'src>) -> IResult<()> {
    any.verify(|token: &PositionedToken<'src>| token.token.is_trivia())
        .void()
        .parse_next(input)
}

/// Parse zero or more trivia tokens
fn trivia0<'src>(input: &mut Input<'src>) -> IResult<()> {
    repeat(0.., trivia).parse_next(input)
}

/// Parse a bare word with its span
fn word<'src>(input: &mut Input<'src>) -> IResult<Spanned<&'src str>> {
    any.verify_map(|token: &'src PositionedToken<'src>| match token.token {
        Token::Identifier(name) => Some(Spanned::new(name, token.span)),
        _ => None,
    })
    .parse_next(input)
}

/// Parse string literal
fn string_literal<'src>(input: &mut Input<'src>) -> IResult<Spanned<String>> {
    any.verify_map(|token: &'src PositionedToken<'src>| match &token.token {
        Token::StringLiteral(s) => Some(Spanned::new(s.clone(), token.span)),
        _ => None,
    })
    .context(Context::Label("string"))
    .parse_next(input)
}

fn string_value<'src>(input: &mut Input<'src>) -> IResult<Spanned<Value<'src>>> {
    string_literal.map(|s| s.map(Value::String)).parse_next(input)
}

/// Parse `&"name"` or `^"path"`; the prefix must touch the string.
fn prefixed_string<'src>(input: &mut Input<'src>) -> IResult<Spanned<Value<'src>>> {
    let prefix = any
        .verify_map(|token: &'src PositionedToken<'src>| match token.token {
            Token::Ampersand => Some((true, token.span)),
            Token::Caret => Some((false, token.span)),
            _ => None,
        })
        .parse_next(input)?;
    let (is_string_name, prefix_span) = prefix;
    let start = input.eof_offset() + 1;

    cut_err(input, start, |input| {
        let text = string_literal.parse_next(input)?;
        let span = prefix_span.union(text.span());
        let value = if is_string_name {
            Value::StringName(text.into_inner())
        } else {
            Value::NodePath(text.into_inner())
        };
        Ok(Spanned::new(value, span))
    })
}

fn number_value<'src>(input: &mut Input<'src>) -> IResult<Spanned<Value<'src>>> {
    any.verify_map(|token: &'src PositionedToken<'src>| match token.token {
        Token::Number(n) => Some(Spanned::new(Value::Number(n), token.span)),
        _ => None,
    })
    .parse_next(input)
}

/// Parse comma separated values up to `close`, allowing a trailing comma.
///
/// With `pairs`, an item may also be a `key: value` pair, which
/// `Object(Type, "property": value, ...)` calls use.
///
/// Returns the values and the span of the closing token.
fn value_list<'src>(
    input: &mut Input<'src>,
    close: Token<'static>,
    expected: &'static str,
    pairs: bool,
) -> IResult<(Vec<Spanned<Value<'src>>>, Span)> {
    let mut items = Vec::new();
    trivia0.parse_next(input)?;
    loop {
        if let Some(span) = opt(punct(close.clone())).parse_next(input)? {
            return Ok((items, span));
        }
        let item = value.parse_next(input)?;
        trivia0.parse_next(input)?;
        if pairs && opt(punct(Token::Colon)).parse_next(input)?.is_some() {
            trivia0.parse_next(input)?;
            let entry = value.parse_next(input)?;
            let span = item.span().union(entry.span());
            items.push(Spanned::new(Value::Pair(Box::new((item, entry))), span));
            trivia0.parse_next(input)?;
        } else {
            items.push(item);
        }
        if let Some(span) = opt(punct(close.clone())).parse_next(input)? {
            return Ok((items, span));
        }
        punct(Token::Comma)
            .context(Context::Label(expected))
            .parse_next(input)?;
        trivia0.parse_next(input)?;
    }
}

/// Parse an array: `[1, "two", Vector2(3, 4)]`
fn array_value<'src>(input: &mut Input<'src>) -> IResult<Spanned<Value<'src>>> {
    let start = input.eof_offset();
    let open = punct(Token::LeftBracket).parse_next(input)?;

    cut_err(input, start, |input| {
        let (items, close) = value_list(input, Token::RightBracket, "`,` or `]`", false)?;
        Ok(Spanned::new(Value::Array(items), open.union(close)))
    })
}

/// Parse a dictionary: `{ "key": value, ... }`
fn dict_value<'src>(input: &mut Input<'src>) -> IResult<Spanned<Value<'src>>> {
    let start = input.eof_offset();
    let open = punct(Token::LeftBrace).parse_next(input)?;

    cut_err(input, start, |input| {
        let mut entries = Vec::new();
        trivia0.parse_next(input)?;
        loop {
            if let Some(close) = opt(punct(Token::RightBrace)).parse_next(input)? {
                return Ok(Spanned::new(Value::Dict(entries), open.union(close)));
            }
            let key = value.parse_next(input)?;
            trivia0.parse_next(input)?;
            punct(Token::Colon)
                .context(Context::Label("`:`"))
                .parse_next(input)?;
            trivia0.parse_next(input)?;
            let entry = value.parse_next(input)?;
            entries.push((key, entry));
            trivia0.parse_next(input)?;
            if let Some(close) = opt(punct(Token::RightBrace)).parse_next(input)? {
                return Ok(Spanned::new(Value::Dict(entries), open.union(close)));
            }
            punct(Token::Comma)
                .context(Context::Label("`,` or `}`"))
                .parse_next(input)?;
            trivia0.parse_next(input)?;
        }
    })
}

/// Parse a bare word or a constructor call.
///
/// - `true`, `null` - bare words
/// - `Vector2(0, 1)` - call
/// - `Array[ExtResource("2")]([])` - typed array call
fn word_or_call<'src>(input: &mut Input<'src>) -> IResult<Spanned<Value<'src>>> {
    let start = input.eof_offset();
    let name = word.parse_next(input)?;

    let Some(bracket) = opt(punct(Token::LeftBracket)).parse_next(input)? else {
        return match opt(punct(Token::LeftParen)).parse_next(input)? {
            Some(_) => cut_err(input, start, |input| {
                let (args, close) = value_list(input, Token::RightParen, "`,` or `)`", true)?;
                let span = name.span().union(close);
                Ok(Spanned::new(
                    Value::Call {
                        name: *name.inner(),
                        type_param: None,
                        args,
                    },
                    span,
                ))
            }),
            None => Ok(name.map(Value::Word)),
        };
    };

    cut_err(input, start, |input| {
        trivia0.parse_next(input)?;
        let type_param = value.parse_next(input)?;
        trivia0.parse_next(input)?;
        punct(Token::RightBracket)
            .context(Context::Label("`]`"))
            .parse_next(input)?;
        punct(Token::LeftParen)
            .context(Context::Label("`(`"))
            .parse_next(input)?;
        let (args, close) = value_list(input, Token::RightParen, "`,` or `)`", true)?;
        let span = name.span().union(bracket).union(close);
        Ok(Spanned::new(
            Value::Call {
                name: *name.inner(),
                type_param: Some(Box::new(type_param)),
                args,
            },
            span,
        ))
    })
}

/// Parse any property value
fn value<'src>(input: &mut Input<'src>) -> IResult<Spanned<Value<'src>>> {
    alt((
        string_value,
        prefixed_string,
        number_value,
        array_value,
        dict_value,
        word_or_call,
    ))
    .context(Context::Label("value"))
    .parse_next(input)
}

/// Parse `key = value`, committing once the key is read.
fn property<'src>(input: &mut Input<'src>) -> IResult<types::Property<'src>> {
    let start = input.eof_offset();
    let key = word.parse_next(input)?;

    cut_err(input, start, |input| {
        trivia0.parse_next(input)?;
        punct(Token::Equals)
            .context(Context::Label("`=`"))
            .parse_next(input)?;
        trivia0.parse_next(input)?;
        let value = value.parse_next(input)?;
        Ok(types::Property { key, value })
    })
}

/// Parse a section: `[tag key=value ...]` followed by body properties.
fn section<'src>(input: &mut Input<'src>) -> IResult<types::Section<'src>> {
    let start = input.eof_offset();
    let open = punct(Token::LeftBracket)
        .context(Context::Label("section header"))
        .parse_next(input)?;

    cut_err(input, start, |input| {
        trivia0.parse_next(input)?;
        let tag = word
            .context(Context::Label("section tag"))
            .parse_next(input)?;

        let mut attributes = Vec::new();
        let close = loop {
            trivia0.parse_next(input)?;
            if let Some(close) = opt(punct(Token::RightBracket)).parse_next(input)? {
                break close;
            }
            let attribute = property
                .context(Context::Label("`]` or header attribute"))
                .parse_next(input)?;
            attributes.push(attribute);
        };

        let mut properties = Vec::new();
        loop {
            let checkpoint = input.checkpoint();
            trivia0.parse_next(input)?;
            match property.parse_next(input) {
                Ok(property) => properties.push(property),
                Err(ErrMode::Backtrack(_)) => {
                    input.reset(&checkpoint);
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(types::Section {
            tag,
            attributes,
            properties,
            header_span: open.union(close),
        })
    })
}

/// Parse a whole scene file into its sections.
fn scene_file<'src>(input: &mut Input<'src>) -> IResult<Vec<types::Section<'src>>> {
    let mut sections = Vec::new();
    loop {
        trivia0.parse_next(input)?;
        if input.eof_offset() == 0 {
            return Ok(sections);
        }
        sections.push(section.parse_next(input)?);
    }
}

/// Convert a winnow error into a diagnostic.
///
/// Errors at end of input become E101 (the file ended inside a construct);
/// everything else is E100 quoting the offending token.
fn convert_error(
    error: ErrMode<ContextError<Context>>,
    tokens: &[PositionedToken],
    current_remaining: usize,
) -> Diagnostic {
    let context = match error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e,
        ErrMode::Incomplete(_) => ContextError::new(),
    };

    let start_remaining = context.context().find_map(|ctx| match ctx {
        Context::StartOffset(n) => Some(*n),
        Context::Label(_) => None,
    });
    let expected = context
        .context()
        .find_map(|ctx| match ctx {
            Context::Label(label) => Some(*label),
            Context::StartOffset(_) => None,
        })
        .unwrap_or("section header");

    let end_offset = tokens.len() - current_remaining.min(tokens.len());
    let start_span = start_remaining
        .and_then(|remaining| tokens.get(tokens.len().saturating_sub(remaining)))
        .map(|token| token.span);

    let offending = tokens[end_offset..]
        .iter()
        .find(|token| !token.token.is_trivia());

    match offending {
        Some(token) => {
            let mut diag = Diagnostic::error(format!("unexpected `{}`", token.token))
                .with_code(ErrorCode::E100)
                .with_label(token.span, format!("expected {expected}"));
            if let Some(span) = start_span.filter(|span| *span != token.span) {
                diag = diag.with_secondary_label(span, "while parsing this");
            }
            diag
        }
        None => {
            let last = tokens.last().map(|token| token.span).unwrap_or_default();
            let span = start_span.map_or(last, |span| span.union(last));
            Diagnostic::error("unexpected end of input")
                .with_code(ErrorCode::E101)
                .with_label(span, format!("expected {expected}"))
                .with_help("the file ends before this construct is closed")
        }
    }
}

/// Build the section list from a token stream.
pub fn build_sections<'src>(
    tokens: &'src [PositionedToken<'src>],
) -> Result<Vec<types::Section<'src>>, Diagnostic> {
    let mut token_slice = TokenSlice::new(tokens);

    scene_file
        .parse_next(&mut token_slice)
        .map_err(|e| convert_error(e, tokens, token_slice.eof_offset()))
}
