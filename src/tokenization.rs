//! Format string and format specifier tokenization.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_till, take_till1, take_while},
    character::complete::{char, digit1, satisfy},
    combinator::{map, map_res, recognize},
    multi::many0,
    sequence::{delimited, pair, terminated},
};

use crate::constants::{MAX_FORMAT_STRING_LEN, MAX_TOKENS, TOKENS_INITIAL_CAPACITY};
use crate::error::{Error, Result};
use crate::types::{FormatToken, Placeholder, SpecPiece};
use crate::validation::is_word_char;

/// Tokenize format string into text/placeholders. Keeps `{{`/`}}` escapes as text.
///
/// Enforces `MAX_FORMAT_STRING_LEN` and `MAX_TOKENS`. A lone brace is an error.
pub fn tokenize_format_string(format_str: &str) -> Result<Vec<FormatToken<'_>>> {
    if format_str.len() > MAX_FORMAT_STRING_LEN {
        return Err(Error::FormatStringTooLong {
            len: format_str.len(),
            max: MAX_FORMAT_STRING_LEN,
        });
    }

    let mut tokens = Vec::with_capacity(TOKENS_INITIAL_CAPACITY);
    let mut remaining = format_str;
    while !remaining.is_empty() {
        let Ok((rest, token)) = format_token(remaining) else {
            return Err(Error::UnescapedBrace {
                offset: format_str.len() - remaining.len(),
            });
        };
        if tokens.len() >= MAX_TOKENS {
            return Err(Error::TooManyTokens { max: MAX_TOKENS });
        }
        tokens.push(token);
        remaining = rest;
    }

    Ok(tokens)
}

fn format_token(input: &str) -> IResult<&str, FormatToken<'_>> {
    alt((escaped_brace, placeholder, text)).parse(input)
}

fn escaped_brace(input: &str) -> IResult<&str, FormatToken<'_>> {
    map(alt((tag("{{"), tag("}}"))), FormatToken::Text).parse(input)
}

fn placeholder(input: &str) -> IResult<&str, FormatToken<'_>> {
    map(
        delimited(char('{'), take_till(is_brace), char('}')),
        |content: &str| FormatToken::Placeholder(Placeholder::parse(content)),
    )
    .parse(input)
}

fn text(input: &str) -> IResult<&str, FormatToken<'_>> {
    map(take_till1(is_brace), FormatToken::Text).parse(input)
}

fn is_brace(c: char) -> bool {
    c == '{' || c == '}'
}

/// Split a format specifier into opaque text and positional count references.
///
/// `>1$` yields `[Literal(">"), PositionalCount(1)]`. Named counts such as
/// `width$` and plain numbers such as the `8` in `>8` stay literal.
pub fn tokenize_spec(spec: &str) -> Vec<SpecPiece<'_>> {
    match many0(spec_piece).parse(spec) {
        Ok(("", pieces)) => pieces,
        _ => vec![SpecPiece::Literal(spec)],
    }
}

fn spec_piece(input: &str) -> IResult<&str, SpecPiece<'_>> {
    alt((
        map(identifier, SpecPiece::Literal),
        map_res(terminated(digit1, char('$')), |digits: &str| {
            digits.parse().map(SpecPiece::PositionalCount)
        }),
        map(digit1, SpecPiece::Literal),
        map(take_till1(is_word_char), SpecPiece::Literal),
    ))
    .parse(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_ascii_alphabetic() || c == '_'),
        take_while(is_word_char),
    ))
    .parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholder_of(argument: &'static str, spec: Option<&'static str>) -> FormatToken<'static> {
        FormatToken::Placeholder(Placeholder { argument, spec })
    }

    #[test]
    fn test_tokenization_basic() {
        let tokens = tokenize_format_string("{x} text {0:>8}").unwrap();
        assert_eq!(
            tokens,
            vec![
                placeholder_of("x", None),
                FormatToken::Text(" text "),
                placeholder_of("0", Some(">8")),
            ]
        );
    }

    #[test]
    fn test_escaped_braces() {
        let tokens = tokenize_format_string("{{{}}}").unwrap();
        assert_eq!(
            tokens,
            vec![
                FormatToken::Text("{{"),
                placeholder_of("", None),
                FormatToken::Text("}}"),
            ]
        );
    }

    #[test]
    fn test_spec_keeps_every_colon_after_the_first() {
        let tokens = tokenize_format_string("{a:b:c}").unwrap();
        assert_eq!(tokens, vec![placeholder_of("a", Some("b:c"))]);
    }

    #[test]
    fn test_unescaped_braces_rejected() {
        assert_eq!(
            tokenize_format_string("{} -{> {}"),
            Err(Error::UnescapedBrace { offset: 4 })
        );
        assert_eq!(
            tokenize_format_string("{} -}> {}"),
            Err(Error::UnescapedBrace { offset: 4 })
        );
        assert!(tokenize_format_string("open {").is_err());
    }

    #[test]
    fn test_empty_format_string() {
        assert!(tokenize_format_string("").unwrap().is_empty());
    }

    #[test]
    fn test_max_tokens_at_boundary() {
        // 512 placeholders + 512 separators = exactly MAX_TOKENS
        let format = "{} ".repeat(MAX_TOKENS / 2);
        let tokens = tokenize_format_string(&format).unwrap();
        assert_eq!(tokens.len(), MAX_TOKENS);

        let over = format!("{format}{{}}");
        assert_eq!(
            tokenize_format_string(&over),
            Err(Error::TooManyTokens { max: MAX_TOKENS })
        );
    }

    #[test]
    fn test_format_string_too_long() {
        let format = "a".repeat(MAX_FORMAT_STRING_LEN + 1);
        assert!(matches!(
            tokenize_format_string(&format),
            Err(Error::FormatStringTooLong { .. })
        ));
    }

    #[test]
    fn test_spec_pieces() {
        assert_eq!(
            tokenize_spec(">1$"),
            vec![SpecPiece::Literal(">"), SpecPiece::PositionalCount(1)]
        );
        assert_eq!(
            tokenize_spec("w2$.3"),
            vec![
                SpecPiece::Literal("w2"),
                SpecPiece::Literal("$."),
                SpecPiece::Literal("3"),
            ]
        );
        assert_eq!(
            tokenize_spec("08.2$"),
            vec![
                SpecPiece::Literal("08"),
                SpecPiece::Literal("."),
                SpecPiece::PositionalCount(2),
            ]
        );
        assert!(tokenize_spec("").is_empty());
    }
}
