//! Reduced frontmatter and markdown renderer.
//!
//! Mirrors the rules of the bundled browser runtime (`dokujs.js`) so that
//! client-side output can be previewed from the command line. It is
//! deliberately smaller than [`crate::compile`]: headings, bold, italic,
//! links, fenced and inline code, flat `-` lists and paragraphs. Nested lists,
//! tables and blockquotes are not recognised, and code is never highlighted.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde_json::{Map, Value};

use crate::compiler::{title_from_meta, CompiledDoc, FALLBACK_TITLE};
use crate::frontmatter::Metadata;

macro_rules! static_regex {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($pattern).unwrap())
        }
    };
}

static_regex!(yaml_line, r"^\s*([^:#]+):\s*(.*)$");
static_regex!(toml_line, r"^\s*([^=]+)=\s*(.*)$");
static_regex!(number, r"^\d+(?:\.\d+)?$");
static_regex!(fenced_code, r"(?s)```[^\n]*\n(.*?)```");
static_regex!(inline_code, r"`([^`\n]+)`");
static_regex!(bold, r"\*\*([^*]+)\*\*");
static_regex!(italic, r"\*([^*]+)\*");
static_regex!(link, r"\[([^\]]+)\]\(([^)]+)\)");
static_regex!(heading, r"(?m)^(#{1,6})[ \t]+(.+)$");
static_regex!(list_block, r"(?m)^(?:-[ \t]+.+(?:\n|$))+");
static_regex!(list_marker, r"^[-*][ \t]+");
static_regex!(paragraph_break, r"\n{2,}");
static_regex!(block_start, r"^\s*</?(h\d|ul|pre|blockquote|p|table|ol)\b");
static_regex!(first_heading, r"(?m)^#[ \t]+(.+)$");
static_regex!(slot, r"\x00(\d+)\x00");

/// Parse the reduced frontmatter subset.
///
/// Only `key: value` (YAML fence) and `key = value` (TOML fence) lines are
/// read. Dotted keys create nested objects. Documents whose fence is never
/// closed are returned unchanged with empty metadata.
pub fn parse_frontmatter(source: &str) -> (Metadata, &str) {
    let text = source.strip_prefix('\u{feff}').unwrap_or(source);

    for (fence, line_re) in [("---", yaml_line()), ("+++", toml_line())] {
        let open = format!("{}\n", fence);
        if !text.starts_with(&open) {
            continue;
        }
        let close = format!("\n{}", fence);
        let Some(end) = text[open.len() - 1..].find(&close).map(|i| i + open.len() - 1) else {
            return (Metadata::new(), text);
        };

        let block = text.get(open.len()..end).unwrap_or("");
        let rest = &text[end + close.len()..];
        let body = rest.strip_prefix('\n').unwrap_or(rest);

        let mut meta = Metadata::new();
        for line in block.lines() {
            if let Some(caps) = line_re.captures(line) {
                set_deep(&mut meta, caps[1].trim(), parse_scalar(caps[2].trim()));
            }
        }
        return (meta, body);
    }

    (Metadata::new(), text)
}

fn set_deep(meta: &mut Metadata, key: &str, value: Value) {
    let mut parts: Vec<&str> = key.split('.').collect();
    let last = parts.pop().unwrap_or(key);

    let mut current = meta;
    for part in parts {
        let entry = current
            .entry(part.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        let Value::Object(map) = entry else {
            return;
        };
        current = map;
    }
    current.insert(last.to_string(), value);
}

fn parse_scalar(raw: &str) -> Value {
    let quoted = raw.len() >= 2
        && ((raw.starts_with('"') && raw.ends_with('"'))
            || (raw.starts_with('\'') && raw.ends_with('\'')));
    if quoted {
        return Value::String(raw[1..raw.len() - 1].to_string());
    }
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if number().is_match(raw) {
        if let Ok(n) = raw.parse::<i64>() {
            return Value::from(n);
        }
        if let Ok(f) = raw.parse::<f64>() {
            return Value::from(f);
        }
    }
    if raw.starts_with('[') && raw.ends_with(']') {
        let inner = raw[1..raw.len() - 1].trim();
        if inner.is_empty() {
            return Value::Array(Vec::new());
        }
        return Value::Array(inner.split(',').map(|x| parse_scalar(x.trim())).collect());
    }
    Value::String(raw.to_string())
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Render markdown with the reduced rule set.
pub fn render(markdown: &str) -> String {
    let md = markdown.replace("\r\n", "\n");

    // Code is set aside first so later inline rules cannot touch it.
    let mut slots: Vec<String> = Vec::new();
    let md = fenced_code()
        .replace_all(&md, |caps: &Captures| {
            slots.push(format!("<pre><code>{}</code></pre>", escape(&caps[1])));
            format!("\u{0}{}\u{0}", slots.len() - 1)
        })
        .into_owned();
    let md = inline_code()
        .replace_all(&md, |caps: &Captures| {
            slots.push(format!("<code>{}</code>", escape(&caps[1])));
            format!("\u{0}{}\u{0}", slots.len() - 1)
        })
        .into_owned();

    let md = bold().replace_all(&md, "<strong>$1</strong>");
    let md = italic().replace_all(&md, "<em>$1</em>");
    let md = link().replace_all(&md, "<a href=\"$2\">$1</a>");
    let md = heading().replace_all(&md, |caps: &Captures| {
        let level = caps[1].len();
        format!("<h{level}>{}</h{level}>", &caps[2])
    });
    let md = list_block().replace_all(&md, |caps: &Captures| {
        let items: String = caps[0]
            .trim()
            .lines()
            .map(|line| format!("<li>{}</li>", list_marker().replace(line, "")))
            .collect();
        format!("<ul>{}</ul>\n", items)
    });

    let md = slot().replace_all(&md, |caps: &Captures| {
        caps[1]
            .parse::<usize>()
            .ok()
            .and_then(|i| slots.get(i).cloned())
            .unwrap_or_default()
    });

    paragraph_break()
        .split(md.trim_matches('\n'))
        .filter(|chunk| !chunk.trim().is_empty())
        .map(|chunk| {
            if block_start().is_match(chunk) {
                chunk.trim_end_matches('\n').to_string()
            } else {
                format!("<p>{}</p>", chunk.trim_end_matches('\n').replace('\n', "<br>"))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Compile a document with the reduced parser and renderer.
pub fn compile(source: &str) -> CompiledDoc {
    let (meta, content) = parse_frontmatter(source);
    let html = render(content);
    let title = title_from_meta(&meta)
        .or_else(|| {
            first_heading()
                .captures(content)
                .map(|caps| caps[1].trim().to_string())
        })
        .unwrap_or_else(|| FALLBACK_TITLE.to_string());

    CompiledDoc { html, title, meta }
}
