//! In-place calculator for a single line of text.
//!
//! A line is searched for something to compute: a backtick-quoted span, an
//! arithmetic expression over numbers and `Math.*` members, or a boolean
//! literal. The located span is replaced by its value.

mod expr_parser;

use std::fmt;
use std::ops::Range;

use log::debug;

use crate::error::{Error, Result};
use crate::validation::is_word_char;

const BOOLEAN_LITERALS: [&str; 4] = ["true", "false", "True", "False"];

/// Characters stripped, together with whitespace, from the start of a line
/// before searching it.
const COMMENT_MARKERS: [char; 3] = ['*', '/', '-'];

/// The span of a line that [`apply_to_line`] replaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located<'a> {
    /// Byte range within the line, quotes included for backtick spans.
    pub range: Range<usize>,
    /// The text to evaluate.
    pub expression: &'a str,
}

/// Outcome of evaluating a located expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    Number(f64),
    /// The expression with every boolean literal flipped.
    Flipped(String),
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evaluation::Number(value) => f.write_str(&format_number(*value)),
            Evaluation::Flipped(text) => f.write_str(text),
        }
    }
}

/// Find the expression to compute in `line`.
pub fn locate(line: &str) -> Result<Located<'_>> {
    let start = search_start(line);
    let region = &line[start..];

    if let Some((range, expression)) = backtick_span(region) {
        debug!("calc: backtick span {expression:?}");
        return Ok(Located {
            range: start + range.start..start + range.end,
            expression,
        });
    }

    for (offset, _) in region.char_indices() {
        if region[..offset].chars().next_back().is_some_and(is_word_char) {
            continue;
        }
        let rest = &region[offset..];
        let len = boolean_at(rest).or_else(|| expr_parser::parse_prefix(rest).map(|(_, len)| len));
        if let Some(len) = len {
            let range = start + offset..start + offset + len;
            debug!("calc: expression at {range:?}");
            return Ok(Located {
                expression: &line[range.clone()],
                range,
            });
        }
    }

    Err(Error::NoExpression)
}

/// Evaluate an expression found by [`locate`].
pub fn evaluate(expression: &str) -> Result<Evaluation> {
    if contains_boolean(expression) {
        return Ok(Evaluation::Flipped(flip_booleans(expression)));
    }
    expr_parser::parse_complete(expression)?
        .eval()
        .map(Evaluation::Number)
}

/// Locate and evaluate the expression in `line`.
pub fn evaluate_line(line: &str) -> Result<Evaluation> {
    evaluate(locate(line)?.expression)
}

/// Replace the expression in `line` with its value.
///
/// A space separates the value from an alphanumeric character that directly
/// follows the replaced span.
///
/// ```
/// assert_eq!(kmacros::calc::apply_to_line("let n = 6 * 7;").unwrap(), "let n = 42;");
/// assert!(kmacros::calc::apply_to_line("// `2 ** 3`").is_err());
/// assert_eq!(kmacros::calc::apply_to_line("enabled: true,").unwrap(), "enabled: false,");
/// ```
pub fn apply_to_line(line: &str) -> Result<String> {
    let located = locate(line)?;
    let value = evaluate(located.expression)?.to_string();
    let after = &line[located.range.end..];
    let separator = if after.starts_with(|c: char| c.is_ascii_alphanumeric()) {
        " "
    } else {
        ""
    };

    Ok(format!(
        "{}{value}{separator}{after}",
        &line[..located.range.start]
    ))
}

/// Swap `true`/`false` and `True`/`False` wherever they stand as whole words.
pub fn flip_booleans(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 1);
    let mut pos = 0;

    while pos < text.len() {
        let at_boundary = !text[..pos].chars().next_back().is_some_and(is_word_char);
        let literal = at_boundary
            .then(|| boolean_at(&text[pos..]))
            .flatten()
            .map(|len| &text[pos..pos + len]);

        match literal {
            Some(literal) => {
                out.push_str(match literal {
                    "true" => "false",
                    "false" => "true",
                    "True" => "False",
                    _ => "True",
                });
                pos += literal.len();
            }
            None => {
                let Some(c) = text[pos..].chars().next() else {
                    break;
                };
                out.push(c);
                pos += c.len_utf8();
            }
        }
    }

    out
}

/// Render a number the way a JavaScript engine prints it.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        let infinity = if value > 0.0 { "Infinity" } else { "-Infinity" };
        return infinity.to_owned();
    }
    if value == 0.0 {
        return "0".to_owned();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        format!("{value}")
    } else {
        let exponential = format!("{value:e}");
        match exponential.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => exponential,
        }
    }
}

fn search_start(line: &str) -> usize {
    let trimmed = line
        .trim_start()
        .trim_start_matches(COMMENT_MARKERS)
        .trim_start();
    line.len() - trimmed.len()
}

/// First non-empty backtick-quoted span, as its range and its content.
fn backtick_span(region: &str) -> Option<(Range<usize>, &str)> {
    let mut search = 0;
    while let Some(open) = region[search..].find('`').map(|i| search + i) {
        let close = open + 1 + region[open + 1..].find('`')?;
        if close > open + 1 {
            return Some((open..close + 1, &region[open + 1..close]));
        }
        search = close;
    }
    None
}

/// Length of the boolean literal `text` starts with, if it is a whole word.
fn boolean_at(text: &str) -> Option<usize> {
    BOOLEAN_LITERALS
        .iter()
        .find(|literal| {
            text.strip_prefix(**literal)
                .is_some_and(|after| !after.starts_with(is_word_char))
        })
        .map(|literal| literal.len())
}

fn contains_boolean(text: &str) -> bool {
    text.char_indices().any(|(pos, _)| {
        !text[..pos].chars().next_back().is_some_and(is_word_char) && boolean_at(&text[pos..]).is_some()
    })
}
