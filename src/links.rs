//! Markdown link lists from file names.

/// Query appended to every link unless overridden.
pub const DEFAULT_LINK_QUERY: &str = "?download=true";

/// How a line becomes a link target: `base_url + line + query`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTemplate {
    pub base_url: String,
    pub query: String,
}

impl LinkTemplate {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            query: DEFAULT_LINK_QUERY.to_owned(),
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    fn link(&self, name: &str) -> String {
        format!("- [{name}]({}{name}{})", self.base_url, self.query)
    }
}

/// One `- [name](url)` item per non-blank line, joined by `\n`.
pub fn markdown_links(text: &str, template: &LinkTemplate) -> String {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| template.link(line))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_from_lines() {
        let template = LinkTemplate::new("https://example.com/files/");
        let text = "  model.safetensors\n\nconfig.json\r\n";
        assert_eq!(
            markdown_links(text, &template),
            "- [model.safetensors](https://example.com/files/model.safetensors?download=true)\n\
             - [config.json](https://example.com/files/config.json?download=true)"
        );
    }

    #[test]
    fn test_custom_query() {
        let template = LinkTemplate::new("/docs/").with_query("");
        assert_eq!(markdown_links("a.md", &template), "- [a.md](/docs/a.md)");
    }

    #[test]
    fn test_blank_selection() {
        let template = LinkTemplate::new("/");
        assert_eq!(markdown_links(" \n\n", &template), "");
    }
}
