//! Frontmatter detection and parsing.
//!
//! A document may open with a YAML block fenced by `---` lines or a TOML block
//! fenced by `+++` lines. Values are kept as loosely typed JSON so that any
//! metadata a page declares can be carried through to the build output.

use serde_json::{Map, Value};

/// Arbitrary key/value metadata declared in a document's frontmatter.
pub type Metadata = Map<String, Value>;

/// Serialization format of a frontmatter block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrontmatterFormat {
    #[default]
    Yaml,
    Toml,
}

impl FrontmatterFormat {
    /// The fence line that opens and closes a block of this format.
    pub fn fence(&self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }
}

/// Errors that can occur when parsing frontmatter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Unclosed frontmatter block - missing closing {0}")]
    Unclosed(&'static str),

    #[error("Invalid YAML in frontmatter: {0}")]
    InvalidYaml(String),

    #[error("Invalid TOML in frontmatter: {0}")]
    InvalidToml(String),

    #[error("Frontmatter must be a mapping of keys to values")]
    NotAMapping,
}

/// Detect which frontmatter format, if any, opens the document.
pub fn detect(source: &str) -> Option<FrontmatterFormat> {
    let first_line = strip_bom(source).lines().next()?;
    match first_line.trim_end() {
        "---" => Some(FrontmatterFormat::Yaml),
        "+++" => Some(FrontmatterFormat::Toml),
        _ => None,
    }
}

/// Parse frontmatter strictly.
///
/// Returns the metadata and the body that follows the closing fence. A
/// document without an opening fence yields empty metadata and the whole
/// source as body.
pub fn parse_frontmatter(source: &str) -> Result<(Metadata, &str), FrontmatterError> {
    let Some(format) = detect(source) else {
        return Ok((Metadata::new(), source));
    };

    let text = strip_bom(source);
    let fence = format.fence();

    // Skip the opening fence line.
    let after_open = match text.find('\n') {
        Some(pos) => &text[pos + 1..],
        None => return Err(FrontmatterError::Unclosed(fence)),
    };

    let (block, body) = split_at_closing_fence(after_open, fence)
        .ok_or(FrontmatterError::Unclosed(fence))?;

    if block.trim().is_empty() {
        return Ok((Metadata::new(), body));
    }

    let value: Value = match format {
        FrontmatterFormat::Yaml => serde_yaml::from_str(block)
            .map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?,
        FrontmatterFormat::Toml => {
            toml::from_str(block).map_err(|e| FrontmatterError::InvalidToml(e.to_string()))?
        }
    };

    match value {
        Value::Object(map) => Ok((map, body)),
        Value::Null => Ok((Metadata::new(), body)),
        _ => Err(FrontmatterError::NotAMapping),
    }
}

/// Parse frontmatter, falling back to plain content on any error.
///
/// Malformed frontmatter is not fatal: the whole document is treated as
/// markdown with no metadata.
pub fn extract_frontmatter(source: &str) -> (Metadata, &str) {
    match parse_frontmatter(source) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("Ignoring frontmatter: {}", e);
            (Metadata::new(), source)
        }
    }
}

fn strip_bom(source: &str) -> &str {
    source.strip_prefix('\u{feff}').unwrap_or(source)
}

/// Split `text` at the first line consisting solely of `fence`.
///
/// Returns the block before the fence and the remainder after the fence line.
fn split_at_closing_fence<'a>(text: &'a str, fence: &str) -> Option<(&'a str, &'a str)> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if line.trim_end() == fence {
            let block = &text[..offset];
            let body = &text[offset + line.len()..];
            return Some((block, body));
        }
        offset += line.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_formats() {
        assert_eq!(detect("---\ntitle: A\n---\n"), Some(FrontmatterFormat::Yaml));
        assert_eq!(detect("+++\ntitle = 'A'\n+++\n"), Some(FrontmatterFormat::Toml));
        assert_eq!(detect("\u{feff}---\r\ntitle: A\r\n---\r\n"), Some(FrontmatterFormat::Yaml));
        assert_eq!(detect("# Heading\n"), None);
        assert_eq!(detect("----\n"), None);
    }

    #[test]
    fn extracts_yaml_frontmatter() {
        let source = r#"---
title: Button
tags:
  - ui
order: 1
---
# Button Component
"#;

        let (meta, body) = parse_frontmatter(source).unwrap();

        assert_eq!(meta["title"], "Button");
        assert_eq!(meta["order"], 1);
        assert_eq!(meta["tags"][0], "ui");
        assert_eq!(body, "# Button Component\n");
    }

    #[test]
    fn extracts_toml_frontmatter() {
        let source = "+++\ntitle = \"Guide\"\ndraft = true\n\n[extra]\nkey = \"v\"\n+++\nBody text\n";

        let (meta, body) = parse_frontmatter(source).unwrap();

        assert_eq!(meta["title"], "Guide");
        assert_eq!(meta["draft"], true);
        assert_eq!(meta["extra"]["key"], "v");
        assert_eq!(body, "Body text\n");
    }

    #[test]
    fn handles_crlf_line_endings() {
        let source = "---\r\ntitle: Windows\r\n---\r\nHello\r\n";

        let (meta, body) = parse_frontmatter(source).unwrap();

        assert_eq!(meta["title"], "Windows");
        assert_eq!(body, "Hello\r\n");
    }

    #[test]
    fn handles_no_frontmatter() {
        let source = "# Just Markdown\n\nNo frontmatter here.";

        let (meta, body) = parse_frontmatter(source).unwrap();

        assert!(meta.is_empty());
        assert_eq!(body, source);
    }

    #[test]
    fn empty_block_yields_empty_metadata() {
        let (meta, body) = parse_frontmatter("---\n---\ncontent").unwrap();
        assert!(meta.is_empty());
        assert_eq!(body, "content");
    }

    #[test]
    fn errors_on_unclosed_frontmatter() {
        let result = parse_frontmatter("---\ntitle: Test\n# No closing");
        assert!(matches!(result, Err(FrontmatterError::Unclosed("---"))));
    }

    #[test]
    fn errors_on_invalid_yaml() {
        let result = parse_frontmatter("---\ntitle: [invalid yaml\n---\n");
        assert!(matches!(result, Err(FrontmatterError::InvalidYaml(_))));
    }

    #[test]
    fn errors_on_scalar_block() {
        let result = parse_frontmatter("---\njust a string\n---\n");
        assert!(matches!(result, Err(FrontmatterError::NotAMapping)));
    }

    #[test]
    fn lenient_extraction_falls_back_to_content() {
        let source = "+++\ntitle = \n+++\n# Kept";

        let (meta, body) = extract_frontmatter(source);

        assert!(meta.is_empty());
        assert_eq!(body, source);
    }
}
