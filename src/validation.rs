//! Character classes and argument checks.

use crate::constants::FORMAT_MACROS;

/// Characters that may never appear in an argument substituted into a
/// placeholder.
const NON_INLINABLE_CHARS: &[char] = &['(', ')', '[', ']', '{', '}', '"', '\'', ':'];

/// Regex `\w`: ASCII alphanumerics and underscore.
#[inline]
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Non-empty run of `\w` characters.
#[inline]
pub fn is_word(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_word_char)
}

/// Check if name is one of the recognized formatting macros.
#[inline]
pub fn is_format_macro(name: &str) -> bool {
    FORMAT_MACROS.contains(&name)
}

/// Check if an argument expression can be written inside a placeholder.
///
/// Call and index expressions, blocks, literals and paths are left as
/// trailing arguments. A leading digit is rejected because `{3}` would read
/// back as a positional index.
#[inline]
pub fn is_inlinable_argument(arg: &str) -> bool {
    let Some(first) = arg.chars().next() else {
        return false;
    };

    !first.is_ascii_digit() && !arg.contains(NON_INLINABLE_CHARS)
}
