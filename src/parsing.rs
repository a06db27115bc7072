//! Macro call detection and argument splitting.
//!
//! A hand-written scanner rather than a pattern: the literal is scanned with
//! escape sequences honored and the argument tail runs to the parenthesis
//! that balances the call, so nested calls and escaped quotes are safe.

use crate::constants::ARGUMENTS_INITIAL_CAPACITY;
use crate::types::MacroCall;
use crate::validation::{is_format_macro, is_word_char};

/// Find the first recognized formatting macro call in `text`.
///
/// Returns `None` when no call with a leading string literal is found, or
/// when its argument tail is not closed.
pub fn find_macro_call(text: &str) -> Option<MacroCall<'_>> {
    let mut cursor = 0;
    while let Some((start, end)) = next_word(text, cursor) {
        if is_format_macro(&text[start..end]) {
            if let Some(call) = parse_call_at(text, start, end) {
                return Some(call);
            }
        }
        cursor = end;
    }
    None
}

/// Next maximal run of word characters at or after `from`.
fn next_word(text: &str, from: usize) -> Option<(usize, usize)> {
    let start = from + text[from..].find(is_word_char)?;
    let len = text[start..]
        .find(|c: char| !is_word_char(c))
        .unwrap_or(text.len() - start);
    Some((start, start + len))
}

fn parse_call_at(text: &str, name_start: usize, name_end: usize) -> Option<MacroCall<'_>> {
    let mut pos = expect(text, name_end, '!')?;
    pos = expect(text, skip_whitespace(text, pos), '(')?;
    pos = skip_whitespace(text, pos);

    let quote = text[pos..].chars().next().filter(|&c| c == '"' || c == '\'')?;
    let literal_start = pos + 1;
    let literal_end = string_literal_end(text, literal_start, quote)?;
    pos = skip_whitespace(text, literal_end + 1);

    let (raw_args, close) = match text[pos..].chars().next()? {
        ')' => (None, pos),
        ',' => {
            let close = closing_paren(text, pos + 1)?;
            (Some(&text[pos + 1..close]), close)
        }
        _ => return None,
    };

    Some(MacroCall {
        prefix: &text[..name_start],
        macro_name: &text[name_start..name_end],
        quote,
        format_string: &text[literal_start..literal_end],
        raw_args,
        suffix: &text[close + 1..],
        is_multiline: text[name_start..close].contains('\n'),
    })
}

fn expect(text: &str, pos: usize, expected: char) -> Option<usize> {
    text[pos..]
        .starts_with(expected)
        .then_some(pos + expected.len_utf8())
}

fn skip_whitespace(text: &str, pos: usize) -> usize {
    let rest = &text[pos..];
    pos + (rest.len() - rest.trim_start().len())
}

/// Byte offset of the quote closing a literal whose body starts at `start`.
fn string_literal_end(text: &str, start: usize, quote: char) -> Option<usize> {
    let mut chars = text[start..].char_indices();
    while let Some((offset, c)) = chars.next() {
        if c == '\\' {
            chars.next();
        } else if c == quote {
            return Some(start + offset);
        }
    }
    None
}

/// Byte offset just past a char literal starting at `start`, if one does.
///
/// Lifetimes and labels (`'a`, `'outer:`) are not char literals.
fn char_literal_end(text: &str, start: usize) -> Option<usize> {
    let mut chars = text[start + 1..].char_indices();
    let (_, first) = chars.next()?;
    if first == '\\' {
        return string_literal_end(text, start + 1, '\'').map(|end| end + 1);
    }
    match chars.next()? {
        (offset, '\'') => Some(start + 1 + offset + 1),
        _ => None,
    }
}

/// Offset just past the string or char literal opening at `pos`, if any.
fn literal_end(text: &str, pos: usize, c: char) -> Option<usize> {
    match c {
        '"' => string_literal_end(text, pos + 1, '"').map(|end| end + 1),
        '\'' => char_literal_end(text, pos),
        _ => None,
    }
}

/// Offset of the `)` closing the call, scanning from inside its argument tail.
fn closing_paren(text: &str, from: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut pos = from;
    while let Some(c) = text[pos..].chars().next() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' if depth > 0 => depth -= 1,
            ')' => return Some(pos),
            ']' | '}' => return None,
            '"' | '\'' => {
                if let Some(end) = literal_end(text, pos, c) {
                    pos = end;
                    continue;
                }
                if c == '"' {
                    return None;
                }
            }
            _ => {}
        }
        pos += c.len_utf8();
    }
    None
}

/// Split an argument tail on top-level commas.
///
/// Commas nested in `()`, `[]` or `{}` and commas inside string or char
/// literals do not split. Pieces are trimmed; empty pieces are dropped, so a
/// trailing comma is harmless.
pub fn split_arguments(raw_args: &str) -> Vec<&str> {
    let mut arguments = Vec::with_capacity(ARGUMENTS_INITIAL_CAPACITY);
    let mut depth = 0usize;
    let mut piece_start = 0;
    let mut pos = 0;

    while let Some(c) = raw_args[pos..].chars().next() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            '"' | '\'' => {
                if let Some(end) = literal_end(raw_args, pos, c) {
                    pos = end;
                    continue;
                }
            }
            ',' if depth == 0 => {
                push_piece(&mut arguments, &raw_args[piece_start..pos]);
                piece_start = pos + 1;
            }
            _ => {}
        }
        pos += c.len_utf8();
    }
    push_piece(&mut arguments, &raw_args[piece_start..]);

    arguments
}

fn push_piece<'a>(arguments: &mut Vec<&'a str>, piece: &'a str) {
    let trimmed = piece.trim();
    if !trimmed.is_empty() {
        arguments.push(trimmed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_simple_call() {
        let call = find_macro_call(r#"println!("{} {}", a, b);"#).unwrap();
        assert_eq!(call.prefix, "");
        assert_eq!(call.macro_name, "println");
        assert_eq!(call.quote, '"');
        assert_eq!(call.format_string, "{} {}");
        assert_eq!(call.raw_args, Some(" a, b"));
        assert_eq!(call.suffix, ";");
        assert!(!call.is_multiline);
    }

    #[test]
    fn test_prefix_and_suffix_preserved() {
        let text = r#"    let s = format!("{}", x).len(); // done"#;
        let call = find_macro_call(text).unwrap();
        assert_eq!(call.prefix, "    let s = ");
        assert_eq!(call.suffix, ".len(); // done");
    }

    #[test]
    fn test_name_must_be_a_whole_word() {
        assert!(find_macro_call(r#"myprint!("{}", a)"#).is_none());
        assert!(find_macro_call(r#"log!("{0}", f(a, b), c)"#).is_none());
        let call = find_macro_call(r#"std::eprintln!("{}", a)"#).unwrap();
        assert_eq!(call.prefix, "std::");
        assert_eq!(call.macro_name, "eprintln");
    }

    #[test]
    fn test_skips_calls_without_literal() {
        let call = find_macro_call(r#"write!(f, "{}", x); println!("{}", y)"#).unwrap();
        assert_eq!(call.macro_name, "println");
        assert_eq!(call.raw_args, Some(" y"));
    }

    #[test]
    fn test_whitespace_around_paren() {
        let call = find_macro_call(r#"print! ( "{}" , a )"#).unwrap();
        assert_eq!(call.format_string, "{}");
        assert_eq!(call.raw_args, Some(" a "));
        assert_eq!(call.suffix, "");
    }

    #[test]
    fn test_call_without_arguments() {
        let call = find_macro_call(r#"println!("hello");"#).unwrap();
        assert_eq!(call.raw_args, None);
        assert_eq!(call.suffix, ";");
    }

    #[test]
    fn test_escaped_quote_does_not_end_literal() {
        let call = find_macro_call(r#"println!("say \"{}\"", name)"#).unwrap();
        assert_eq!(call.format_string, r#"say \"{}\""#);
        assert_eq!(call.raw_args, Some(" name"));
    }

    #[test]
    fn test_single_quoted_literal() {
        let call = find_macro_call("print!('{}', a)").unwrap();
        assert_eq!(call.quote, '\'');
        assert_eq!(call.format_string, "{}");
    }

    #[test]
    fn test_nested_parens_in_tail() {
        let call = find_macro_call(r#"println!("{}", f(a, (b)), ")") + 1"#).unwrap();
        assert_eq!(call.raw_args, Some(r#" f(a, (b)), ")""#));
        assert_eq!(call.suffix, " + 1");
    }

    #[test]
    fn test_unclosed_call() {
        assert!(find_macro_call(r#"println!("{}", f(a"#).is_none());
        assert!(find_macro_call(r#"println!("{}"#).is_none());
    }

    #[test]
    fn test_multiline_detection() {
        let text = "println!(\n    \"{}\",\n    a\n);";
        let call = find_macro_call(text).unwrap();
        assert!(call.is_multiline);
        assert_eq!(call.suffix, ";");

        let call = find_macro_call("first line\nprintln!(\"{}\", a);").unwrap();
        assert!(!call.is_multiline);
        assert_eq!(call.prefix, "first line\n");
    }

    #[test]
    fn test_split_top_level_commas() {
        assert_eq!(split_arguments(" a, b ,c"), vec!["a", "b", "c"]);
        assert_eq!(split_arguments("f(a, b), c"), vec!["f(a, b)", "c"]);
        assert_eq!(split_arguments("v[i, j], [1, 2]"), vec!["v[i, j]", "[1, 2]"]);
        assert_eq!(
            split_arguments("|x| { x, y }, z"),
            vec!["|x| { x, y }", "z"]
        );
    }

    #[test]
    fn test_split_ignores_commas_in_literals() {
        assert_eq!(split_arguments(r#"",", ',', x"#), vec![r#"",""#, "','", "x"]);
        assert_eq!(split_arguments(r#""a\",b", c"#), vec![r#""a\",b""#, "c"]);
    }

    #[test]
    fn test_split_drops_empty_pieces() {
        assert_eq!(split_arguments("a,"), vec!["a"]);
        assert!(split_arguments("  ").is_empty());
        assert_eq!(split_arguments("\n    a,\n    b\n"), vec!["a", "b"]);
    }

    #[test]
    fn test_lifetime_is_not_a_char_literal() {
        assert_eq!(split_arguments("x as &'a str, y"), vec!["x as &'a str", "y"]);
    }
}
