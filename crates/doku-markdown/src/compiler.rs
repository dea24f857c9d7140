//! Markdown document compiler.

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use serde_json::Value;

use crate::frontmatter::{extract_frontmatter, Metadata};
use crate::highlight::highlight_code;

/// Title used when neither frontmatter nor a top-level heading provides one.
pub const FALLBACK_TITLE: &str = "Document";

/// A compiled document.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledDoc {
    /// Rendered HTML body
    pub html: String,

    /// Resolved title (frontmatter, then first H1, then fallback)
    pub title: String,

    /// Frontmatter metadata (empty when absent or malformed)
    pub meta: Metadata,
}

fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// Compile a document with optional frontmatter into HTML.
pub fn compile(source: &str) -> CompiledDoc {
    let (meta, content) = extract_frontmatter(source);

    let mut first_h1: Option<String> = None;
    let mut in_h1 = false;
    let mut heading_text = String::new();

    let mut code_info: Option<String> = None;
    let mut code_text = String::new();

    let mut events: Vec<Event<'_>> = Vec::new();

    for event in Parser::new_ext(content, markdown_options()) {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                code_info = Some(match kind {
                    CodeBlockKind::Fenced(info) => info.to_string(),
                    CodeBlockKind::Indented => String::new(),
                });
                code_text.clear();
            }

            Event::Text(text) if code_info.is_some() => {
                code_text.push_str(&text);
            }

            Event::End(TagEnd::CodeBlock) => {
                let info = code_info.take().unwrap_or_default();
                let block = highlight_code(&code_text, &info);
                events.push(Event::Html(CowStr::from(block)));
            }

            Event::Start(Tag::Heading { level, .. }) => {
                in_h1 = level == HeadingLevel::H1 && first_h1.is_none();
                heading_text.clear();
                events.push(event);
            }

            Event::End(TagEnd::Heading(level)) => {
                if in_h1 && level == HeadingLevel::H1 {
                    let text = heading_text.trim();
                    if !text.is_empty() {
                        first_h1 = Some(text.to_string());
                    }
                    in_h1 = false;
                }
                events.push(event);
            }

            Event::Text(ref text) | Event::Code(ref text) if in_h1 => {
                heading_text.push_str(text);
                events.push(event);
            }

            other => events.push(other),
        }
    }

    let mut html_output = String::with_capacity(content.len() * 3 / 2);
    html::push_html(&mut html_output, events.into_iter());

    let title = title_from_meta(&meta)
        .or(first_h1)
        .unwrap_or_else(|| FALLBACK_TITLE.to_string());

    CompiledDoc {
        html: html_output,
        title,
        meta,
    }
}

/// Read a usable title from frontmatter metadata.
///
/// Empty strings, `false` and `null` are treated as absent.
pub fn title_from_meta(meta: &Metadata) -> Option<String> {
    match meta.get("title")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn frontmatter_title_wins_over_heading() {
        let doc = compile("---\ntitle: X\n---\n# Something Else\n\nBody.\n");

        assert_eq!(doc.title, "X");
        assert!(doc.html.contains("<h1>Something Else</h1>"));
    }

    #[test]
    fn toml_frontmatter_title() {
        let doc = compile("+++\ntitle = \"From TOML\"\n+++\n# Heading\n");
        assert_eq!(doc.title, "From TOML");
        assert_eq!(doc.meta["title"], "From TOML");
    }

    #[test]
    fn first_h1_when_no_frontmatter() {
        let doc = compile("# Heading\n\nText\n\n# Second\n");
        assert_eq!(doc.title, "Heading");
        assert!(doc.meta.is_empty());
    }

    #[test]
    fn h1_with_inline_code() {
        let doc = compile("## Sub\n\n# The `doku` tool\n");
        assert_eq!(doc.title, "The doku tool");
    }

    #[test]
    fn falls_back_to_document() {
        let doc = compile("Just a paragraph.\n\n## Only H2\n");
        assert_eq!(doc.title, FALLBACK_TITLE);
    }

    #[test]
    fn empty_frontmatter_title_is_ignored() {
        let doc = compile("---\ntitle: \"\"\n---\n# Real\n");
        assert_eq!(doc.title, "Real");
    }

    #[test]
    fn malformed_frontmatter_is_rendered_as_content() {
        let doc = compile("---\ntitle: [broken\n---\n# Heading\n");

        assert!(doc.meta.is_empty());
        assert_eq!(doc.title, "Heading");
        assert!(doc.html.contains("<hr />"));
    }

    #[test]
    fn renders_unordered_list() {
        let doc = compile("- one\n- two\n- three\n");
        assert_eq!(
            doc.html,
            "<ul>\n<li>one</li>\n<li>two</li>\n<li>three</li>\n</ul>\n"
        );
    }

    #[test]
    fn escapes_code() {
        let doc = compile("Use `a < b & c`.\n\n```\nx < y && z\n```\n\n```rust\nlet ok = a < b;\n```\n");

        assert!(doc.html.contains("<code>a &lt; b &amp; c</code>"));
        assert!(doc.html.contains("<pre><code>x &lt; y &amp;&amp; z\n</code></pre>"));
        assert!(doc.html.contains("language-rust"));
        assert!(!doc.html.contains("a < b"));
    }

    #[test]
    fn renders_tables_and_tasklists() {
        let doc = compile("| a | b |\n|---|---|\n| 1 | 2 |\n\n- [x] done\n");
        assert!(doc.html.contains("<table>"));
        assert!(doc.html.contains("checkbox"));
    }

    #[test]
    fn numeric_title() {
        let mut meta = Metadata::new();
        meta.insert("title".into(), Value::from(2024));
        assert_eq!(title_from_meta(&meta), Some("2024".to_string()));
    }
}
