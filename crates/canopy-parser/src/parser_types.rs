//! Parsed scene types.
//!
//! These are the output of the token parser: a flat list of [`Section`]s,
//! each with header attributes and body properties. Values keep their spans
//! so elaboration can point diagnostics at the offending fragment.

use std::fmt;

use crate::span::{Span, Spanned};

/// A property value as written in the scene source.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    String(String),
    /// `&"name"`
    StringName(String),
    /// `^"path"`
    NodePath(String),
    Number(&'a str),
    /// Bare word such as `true`, `false` or `null`.
    Word(&'a str),
    /// Constructor call: `Vector2(0, 1)`, `ExtResource("1_x")` or the typed
    /// array form `Array[Type]([...])`.
    Call {
        name: &'a str,
        type_param: Option<Box<Spanned<Value<'a>>>>,
        args: Vec<Spanned<Value<'a>>>,
    },
    Array(Vec<Spanned<Value<'a>>>),
    /// `"key": value` argument, as in
    /// `Object(InputEventKey, "keycode": 4194305)`.
    Pair(Box<(Spanned<Value<'a>>, Spanned<Value<'a>>)>),
    Dict(Vec<(Spanned<Value<'a>>, Spanned<Value<'a>>)>),
}

impl<'a> Value<'a> {
    /// Returns the text of string-like values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::StringName(s) | Value::NodePath(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as a lookup key: string contents or a number as
    /// written. Older scenes use numeric resource ids.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Value::Number(n) => Some(n),
            other => other.as_str(),
        }
    }

    /// Returns the id argument of an `ExtResource(id)` call.
    pub fn ext_resource_id(&self) -> Option<&Spanned<Value<'a>>> {
        match self {
            Value::Call {
                name: "ExtResource",
                args,
                ..
            } if args.len() == 1 => args.first(),
            _ => None,
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "\"{s}\""),
            Value::StringName(s) => write!(f, "&\"{s}\""),
            Value::NodePath(s) => write!(f, "^\"{s}\""),
            Value::Number(n) => write!(f, "{n}"),
            Value::Word(w) => write!(f, "{w}"),
            Value::Call {
                name,
                type_param,
                args,
            } => {
                write!(f, "{name}")?;
                if let Some(param) = type_param {
                    write!(f, "[{}]", param.inner())?;
                }
                write!(f, "(")?;
                write_list(f, args.iter().map(|arg| arg.inner()))?;
                write!(f, ")")
            }
            Value::Array(items) => {
                write!(f, "[")?;
                write_list(f, items.iter().map(|item| item.inner()))?;
                write!(f, "]")
            }
            Value::Pair(pair) => write!(f, "{}: {}", pair.0.inner(), pair.1.inner()),
            Value::Dict(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, " {}: {}", key.inner(), value.inner())?;
                }
                write!(f, " }}")
            }
        }
    }
}

fn write_list<'v, 'a: 'v>(
    f: &mut fmt::Formatter<'_>,
    values: impl Iterator<Item = &'v Value<'a>>,
) -> fmt::Result {
    for (i, value) in values.enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{value}")?;
    }
    Ok(())
}

/// A `key=value` pair, either in a section header or a section body.
#[derive(Debug, Clone, PartialEq)]
pub struct Property<'a> {
    pub key: Spanned<&'a str>,
    pub value: Spanned<Value<'a>>,
}

/// One `[tag ...]` section and the properties that follow it.
#[derive(Debug, Clone, PartialEq)]
pub struct Section<'a> {
    pub tag: Spanned<&'a str>,
    pub attributes: Vec<Property<'a>>,
    pub properties: Vec<Property<'a>>,
    /// Span of the bracketed header.
    pub header_span: Span,
}

impl<'a> Section<'a> {
    /// Returns the header attribute `key`.
    pub fn attribute(&self, key: &str) -> Option<&Spanned<Value<'a>>> {
        find(&self.attributes, key)
    }

    /// Returns the body property `key`.
    pub fn property(&self, key: &str) -> Option<&Spanned<Value<'a>>> {
        find(&self.properties, key)
    }
}

fn find<'p, 'a>(properties: &'p [Property<'a>], key: &str) -> Option<&'p Spanned<Value<'a>>> {
    properties
        .iter()
        .find(|property| *property.key.inner() == key)
        .map(|property| &property.value)
}
