//! User-facing options of the clipboard command.

use crate::comments::StripOptions;

/// Options the host exposes for the comment-stripping command.
///
/// Only that command reads them; every other transform is option-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Strip comments even when the document is markdown.
    pub remove_comments_in_markdown: bool,
    /// Strip blank lines even when the document is markdown.
    pub remove_whitespace_in_markdown: bool,
    /// Report what was removed.
    pub show_notifications: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            remove_comments_in_markdown: false,
            remove_whitespace_in_markdown: false,
            show_notifications: true,
        }
    }
}

impl Settings {
    /// Which stripping steps apply to a document.
    pub fn strip_options(&self, is_markdown: bool) -> StripOptions {
        StripOptions::for_document(is_markdown, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_documents_strip_everything() {
        let options = Settings::default().strip_options(false);
        assert!(options.remove_comments);
        assert!(options.remove_blank_lines);
    }

    #[test]
    fn test_markdown_follows_settings() {
        let settings = Settings {
            remove_comments_in_markdown: true,
            ..Settings::default()
        };
        let options = settings.strip_options(true);
        assert!(options.remove_comments);
        assert!(!options.remove_blank_lines);
        assert_eq!(
            Settings::default().strip_options(true),
            StripOptions {
                remove_comments: false,
                remove_blank_lines: false,
            }
        );
    }
}
