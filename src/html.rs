//! Duplicating the HTML element around a cursor.

use std::ops::Range;

use log::debug;

use crate::error::{Error, Result};

/// Byte range of the element whose opening tag holds `cursor`, from its
/// `<` to the end of its closing tag (or of its `/>`).
///
/// The backward scan balances `>`/`<` pairs, so a cursor in element content
/// finds nothing. Returns `None` as well when the element is never closed.
pub fn find_element_range(text: &str, cursor: usize) -> Option<Range<usize>> {
    let bytes = text.as_bytes();
    if bytes.is_empty() {
        return None;
    }

    let start = opening_bracket(bytes, cursor.min(bytes.len() - 1))?;
    let name_len = bytes[start + 1..]
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric())
        .count();
    if name_len == 0 {
        return None;
    }
    let tag = &text[start + 1..start + 1 + name_len];

    let end = element_end(text, start, tag)?;
    debug!("html: <{tag}> spans {start}..{end}");
    Some(start..end)
}

/// Insert a copy of the element at `cursor` on a new line right after it.
///
/// With `increment`, every number in the copy is bumped by one.
///
/// ```
/// let text = "<ul><li id=\"item-1\">One</li></ul>";
/// assert_eq!(
///     kmacros::html::clone_element(text, 9, true).unwrap(),
///     "<ul><li id=\"item-1\">One</li>\n<li id=\"item-2\">One</li></ul>"
/// );
/// ```
pub fn clone_element(text: &str, cursor: usize, increment: bool) -> Result<String> {
    let range = find_element_range(text, cursor).ok_or(Error::NoElement)?;
    let element = &text[range.clone()];
    let copy = if increment {
        increment_numbers(element)
    } else {
        element.to_owned()
    };

    let mut out = String::with_capacity(text.len() + copy.len() + 1);
    out.push_str(&text[..range.end]);
    out.push('\n');
    out.push_str(&copy);
    out.push_str(&text[range.end..]);
    Ok(out)
}

/// Replace every run of ASCII digits with its value plus one.
///
/// Leading zeros are dropped and runs of any length are handled.
pub fn increment_numbers(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 4);
    let mut rest = text;

    while let Some(begin) = rest.find(|c: char| c.is_ascii_digit()) {
        out.push_str(&rest[..begin]);
        let digits = &rest[begin..];
        let len = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());
        out.push_str(&increment_decimal(&digits[..len]));
        rest = &digits[len..];
    }

    out.push_str(rest);
    out
}

fn increment_decimal(digits: &str) -> String {
    let significant = digits.trim_start_matches('0');
    let mut bumped: Vec<u8> = significant.bytes().collect();

    let mut carry = true;
    for digit in bumped.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            carry = false;
            break;
        }
    }
    if carry {
        bumped.insert(0, b'1');
    }

    bumped.into_iter().map(char::from).collect()
}

/// Walk back from `from` to the `<` that opens the enclosing tag.
fn opening_bracket(bytes: &[u8], from: usize) -> Option<usize> {
    let mut depth = 0usize;
    for pos in (0..=from).rev() {
        match bytes[pos] {
            b'>' => depth += 1,
            b'<' if depth == 0 => return Some(pos),
            b'<' => depth -= 1,
            _ => {}
        }
    }
    None
}

fn element_end(text: &str, start: usize, tag: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let opening = format!("<{tag}");
    let mut in_opening_tag = true;
    let mut depth = 1usize;
    let mut pos = start + 1;

    while pos < bytes.len() {
        match bytes[pos] {
            b'/' if bytes.get(pos + 1) == Some(&b'>') && in_opening_tag && depth == 1 => {
                return Some(pos + 2);
            }
            b'>' => in_opening_tag = false,
            b'<' if bytes.get(pos + 1) == Some(&b'/') => {
                let name_start = pos + 2;
                if let Some(close) = text[name_start..].find('>') {
                    if text[name_start..name_start + close].trim() == tag {
                        depth -= 1;
                        if depth == 0 {
                            return Some(name_start + close + 1);
                        }
                    }
                }
            }
            b'<' if text[pos..].starts_with(&opening)
                && !bytes
                    .get(pos + opening.len())
                    .is_some_and(u8::is_ascii_alphanumeric) =>
            {
                if !is_self_closing(&text[pos..]) {
                    depth += 1;
                }
            }
            _ => {}
        }
        pos += 1;
    }

    None
}

fn is_self_closing(tag_onward: &str) -> bool {
    tag_onward
        .find('>')
        .is_some_and(|close| tag_onward[..close].ends_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_simple_element() {
        let text = "<p>Hello</p>";
        assert_eq!(find_element_range(text, 1), Some(0..12));
        assert_eq!(find_element_range(text, 0), Some(0..12));
        assert_eq!(find_element_range(text, 5), None);
    }

    #[test]
    fn test_find_skips_nested_siblings() {
        let text = "<div><span>a</span> b <span>c</span></div>";
        assert_eq!(find_element_range(text, 2), Some(0..text.len()));
        assert_eq!(find_element_range(text, 7), Some(5..19));
    }

    #[test]
    fn test_find_nested_same_tag() {
        let text = "<div><div>inner</div></div>";
        assert_eq!(find_element_range(text, 2), Some(0..text.len()));
        assert_eq!(find_element_range(text, 7), Some(5..21));
    }

    #[test]
    fn test_similar_tag_names_do_not_nest() {
        let text = "<b><br/>x</b>";
        assert_eq!(find_element_range(text, 1), Some(0..text.len()));
    }

    #[test]
    fn test_self_closing() {
        let text = "<div>\n  <img src=\"a.png\" />\n</div>";
        let start = text.find("<img").unwrap();
        let end = text.find("/>").unwrap() + 2;
        assert_eq!(find_element_range(text, start + 4), Some(start..end));
    }

    #[test]
    fn test_nothing_found() {
        assert_eq!(find_element_range("plain text", 3), None);
        assert_eq!(find_element_range("", 0), None);
        assert_eq!(find_element_range("<p>never closed", 1), None);
        assert_eq!(find_element_range("a</p>", 3), None);
    }

    #[test]
    fn test_clone_element() {
        let text = "<li>Item 1</li>";
        assert_eq!(
            clone_element(text, 1, false).unwrap(),
            "<li>Item 1</li>\n<li>Item 1</li>"
        );
        assert_eq!(
            clone_element(text, 2, true).unwrap(),
            "<li>Item 1</li>\n<li>Item 2</li>"
        );
        assert_eq!(clone_element("no tags", 2, true), Err(Error::NoElement));
    }

    #[test]
    fn test_increment_numbers() {
        assert_eq!(increment_numbers("row-9 col-007"), "row-10 col-8");
        assert_eq!(increment_numbers("h1 h2"), "h2 h3");
        assert_eq!(increment_numbers("000"), "1");
        assert_eq!(
            increment_numbers("id=99999999999999999999999"),
            "id=100000000000000000000000"
        );
        assert_eq!(increment_numbers("no digits"), "no digits");
    }
}
