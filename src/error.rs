//! Error type shared by the fallible transforms.

use thiserror::Error;

/// Errors reported by the transforms.
///
/// The macro inliner never surfaces these to callers: a rejected format
/// string simply leaves the input unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("format string too long ({len} bytes), maximum allowed is {max} bytes")]
    FormatStringTooLong { len: usize, max: usize },

    #[error("too many tokens in format string, maximum allowed is {max}")]
    TooManyTokens { max: usize },

    #[error("unescaped brace at byte {offset} of format string, use '{{{{' or '}}}}'")]
    UnescapedBrace { offset: usize },

    #[error("no valid expression found")]
    NoExpression,

    #[error("invalid expression `{expression}`: {reason}")]
    InvalidExpression { expression: String, reason: String },

    #[error("unknown function or constant `Math.{0}`")]
    UnknownFunction(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("no HTML element found at cursor position")]
    NoElement,
}

pub type Result<T> = std::result::Result<T, Error>;
