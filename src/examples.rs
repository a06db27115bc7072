use crate::calc::apply_to_line;
use crate::comments::strip;
use crate::config::Settings;
use crate::html::clone_element;
use crate::inline_macro_args;
use crate::links::{LinkTemplate, markdown_links};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demonstrate_inlining() {
        // Example 1: Implicit placeholders
        println!("=== Implicit placeholders ===");
        let before = r#"println!("{}: {} years old", name, age);"#;
        let after = inline_macro_args(before);
        println!("{before}\n  -> {after}");
        assert_eq!(after, r#"println!("{name}: {age} years old");"#);

        // Example 2: Indexed placeholders with format specs
        println!("\n=== Indexed placeholders ===");
        let before = r#"format!("{1:>8} {0:?}", left, right)"#;
        let after = inline_macro_args(before);
        println!("{before}\n  -> {after}");
        assert_eq!(after, r#"format!("{right:>8} {left:?}")"#);

        // Example 3: Calls that must stay positional
        println!("\n=== Mixed arguments ===");
        let before = r#"panic!("{} failed: {}", stage, err.to_string())"#;
        let after = inline_macro_args(before);
        println!("{before}\n  -> {after}");
        assert_eq!(after, r#"panic!("{stage} failed: {}", err.to_string())"#);

        // Example 4: Multi-line calls are rewrapped
        println!("\n=== Multi-line call ===");
        let before = "log(); println!(\n    \"{} {}\",\n    a,\n    b\n);";
        let after = inline_macro_args(before);
        println!("{before}\n  -> {after}");
        assert_eq!(after, "log(); println!(\n    \"{a} {b}\"\n);");
    }

    #[test]
    fn demonstrate_editor_commands() {
        println!("=== Calculator ===");
        let line = "const TIMEOUT: u64 = 60 * 60 * 24;";
        let result = apply_to_line(line).unwrap();
        println!("{line}\n  -> {result}");
        assert_eq!(result, "const TIMEOUT: u64 = 86400;");

        println!("\n=== Clipboard stripping ===");
        let source = "/* header */\nlet a = 1; // one\n\nlet b = 2;\n";
        let stripped = strip(source, Settings::default().strip_options(false));
        println!("{:?} ({:?})", stripped.text, stripped.notification());
        assert_eq!(stripped.text, "let a = 1; \nlet b = 2;\n");

        println!("\n=== Markdown links ===");
        let template = LinkTemplate::new("https://example.com/");
        let links = markdown_links("a.bin\nb.bin", &template);
        println!("{links}");
        assert_eq!(links.lines().count(), 2);

        println!("\n=== Element cloning ===");
        let row = "<tr id=\"row-1\"></tr>";
        let cloned = clone_element(row, 1, true).unwrap();
        println!("{cloned}");
        assert_eq!(cloned, "<tr id=\"row-1\"></tr>\n<tr id=\"row-2\"></tr>");
    }
}
