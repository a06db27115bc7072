//! Core types for macro argument inlining.
//!
//! Everything here borrows from the text being rewritten and lives for a
//! single inlining call.

/// One formatting macro invocation found in a piece of source text.
///
/// The call is split so that it can be rebuilt around a rewritten format
/// string without touching anything the rewrite does not own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroCall<'a> {
    /// Text before the macro name, kept verbatim.
    pub prefix: &'a str,
    /// One of [`FORMAT_MACROS`](crate::constants::FORMAT_MACROS).
    pub macro_name: &'a str,
    /// Delimiter of the format literal, `"` or `'`.
    pub quote: char,
    /// Literal body without delimiters. Escape sequences are kept as written.
    pub format_string: &'a str,
    /// Text between the comma after the literal and the closing parenthesis.
    pub raw_args: Option<&'a str>,
    /// Text after the closing parenthesis, kept verbatim.
    pub suffix: &'a str,
    /// Whether the call itself spans more than one line.
    pub is_multiline: bool,
}

/// A `{...}` span of a format string, split at its first `:`.
///
/// `{0:>8}` has argument `"0"` and spec `Some(">8")`; `{}` has an empty
/// argument and no spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'a> {
    pub argument: &'a str,
    pub spec: Option<&'a str>,
}

impl<'a> Placeholder<'a> {
    pub fn parse(content: &'a str) -> Self {
        match content.split_once(':') {
            Some((argument, spec)) => Self {
                argument,
                spec: Some(spec),
            },
            None => Self {
                argument: content,
                spec: None,
            },
        }
    }

    /// Explicit positional index, for `{N}` and `{N:spec}`.
    pub fn index(&self) -> Option<usize> {
        if self.argument.is_empty() || !self.argument.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        self.argument.parse().ok()
    }

    /// `{}` or `{:spec}`: takes the next argument in list order.
    pub fn is_implicit(&self) -> bool {
        self.argument.is_empty()
    }
}

/// Token of a format string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatToken<'a> {
    /// Literal text, including `{{` and `}}` escapes exactly as written.
    Text(&'a str),

    /// A placeholder.
    Placeholder(Placeholder<'a>),
}

/// Piece of a format specifier.
///
/// Only positional count references (`1$` in `{:>1$}`) carry meaning for the
/// inliner; everything else is opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecPiece<'a> {
    Literal(&'a str),
    PositionalCount(usize),
}
