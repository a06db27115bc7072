//! Comment and blank-line stripping for text bound for the clipboard.

use crate::config::Settings;

/// Steps applied by [`strip`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StripOptions {
    pub remove_comments: bool,
    pub remove_blank_lines: bool,
}

impl StripOptions {
    /// Steps for a document: both always run on code, each is opt-in for
    /// markdown.
    pub fn for_document(is_markdown: bool, settings: &Settings) -> Self {
        Self {
            remove_comments: !is_markdown || settings.remove_comments_in_markdown,
            remove_blank_lines: !is_markdown || settings.remove_whitespace_in_markdown,
        }
    }
}

/// Result of [`strip`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stripped {
    pub text: String,
    pub comments_removed: bool,
    pub blank_lines_removed: bool,
}

impl Stripped {
    /// Message for the user describing what ran, if anything did.
    pub fn notification(&self) -> Option<&'static str> {
        match (self.comments_removed, self.blank_lines_removed) {
            (true, true) => Some("Comments and empty lines removed from clipboard."),
            (true, false) => Some("Comments removed from clipboard."),
            (false, true) => Some("Whitespace removed from clipboard"),
            (false, false) => None,
        }
    }
}

/// Apply the enabled steps: comments first, then blank lines.
pub fn strip(text: &str, options: StripOptions) -> Stripped {
    let mut stripped = if options.remove_comments {
        strip_comments(text)
    } else {
        text.to_owned()
    };
    if options.remove_blank_lines {
        stripped = strip_blank_lines(&stripped);
    }

    Stripped {
        text: stripped,
        comments_removed: options.remove_comments,
        blank_lines_removed: options.remove_blank_lines,
    }
}

/// Remove `// line` and `/* block */` comments.
///
/// A `//` directly after `:` is kept so URLs survive. An unterminated `/*`
/// is left as is. String literals are not recognized.
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev: Option<char> = None;
    let mut block_end_missing = false;
    let mut pos = 0;

    while let Some(c) = text[pos..].chars().next() {
        let rest = &text[pos..];
        if rest.starts_with("//") && prev != Some(':') {
            pos += rest.find(['\n', '\r']).unwrap_or(rest.len());
            prev = Some('/');
            continue;
        }
        if !block_end_missing && rest.starts_with("/*") {
            match rest[2..].find("*/") {
                Some(close) => {
                    pos += close + 4;
                    prev = Some('/');
                    continue;
                }
                None => block_end_missing = true,
            }
        }

        out.push(c);
        prev = Some(c);
        pos += c.len_utf8();
    }

    out
}

/// Remove every whitespace-only line that ends with a line break.
pub fn strip_blank_lines(text: &str) -> String {
    text.split_inclusive('\n')
        .filter(|line| !(line.ends_with('\n') && line.trim().is_empty()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_comments() {
        assert_eq!(strip_comments("let x = 1; // one\nlet y = 2;"), "let x = 1; \nlet y = 2;");
        assert_eq!(strip_comments("/// docs\nfn f() {}"), "\nfn f() {}");
        assert_eq!(strip_comments("a // b\r\nc"), "a \r\nc");
    }

    #[test]
    fn test_urls_survive() {
        let text = "let url = \"https://example.com/a\";";
        assert_eq!(strip_comments(text), text);
    }

    #[test]
    fn test_block_comments() {
        assert_eq!(strip_comments("a /* b */ c /* d\n e */ f"), "a  c  f");
        assert_eq!(strip_comments("a /* // */ b"), "a  b");
    }

    #[test]
    fn test_unterminated_block_kept() {
        assert_eq!(strip_comments("a /* b"), "a /* b");
        assert_eq!(strip_comments("a /* b // c"), "a /* b ");
    }

    #[test]
    fn test_blank_lines() {
        assert_eq!(strip_blank_lines("a\n\n  \nb\n\t\n"), "a\nb\n");
        assert_eq!(strip_blank_lines("a\r\n \r\n    b"), "a\r\n    b");
        assert_eq!(strip_blank_lines("a\n  "), "a\n  ");
    }

    #[test]
    fn test_strip_combined() {
        let stripped = strip(
            "fn main() {\n    // greet\n    hello();\n}\n",
            StripOptions {
                remove_comments: true,
                remove_blank_lines: true,
            },
        );
        assert_eq!(stripped.text, "fn main() {\n    hello();\n}\n");
        assert_eq!(
            stripped.notification(),
            Some("Comments and empty lines removed from clipboard.")
        );
    }

    #[test]
    fn test_strip_nothing() {
        let stripped = strip("// keep\n\n", StripOptions::default());
        assert_eq!(stripped.text, "// keep\n\n");
        assert_eq!(stripped.notification(), None);
    }
}
