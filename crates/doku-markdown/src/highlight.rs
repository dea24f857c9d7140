//! Code syntax highlighting using syntect.
//!
//! Highlighted code is emitted with CSS classes rather than inline styles so a
//! page can switch between light and dark themes without re-rendering.

use std::sync::OnceLock;

use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

/// Class prefix applied to every highlighted token.
pub const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

/// Theme used for the default (light) appearance.
pub const LIGHT_THEME: &str = "InspiredGitHub";

/// Theme used when the page is switched to dark mode.
pub const DARK_THEME: &str = "base16-ocean.dark";

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();

fn syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme_set() -> &'static ThemeSet {
    THEME_SET.get_or_init(ThemeSet::load_defaults)
}

/// Look up a syntax by the info string of a code fence.
///
/// Only the first word is considered, so `rust ignore` resolves to Rust.
pub fn find_syntax(info: &str) -> Option<&'static SyntaxReference> {
    let token = info.split_whitespace().next()?;
    let ss = syntax_set();
    ss.find_syntax_by_token(token)
        .or_else(|| ss.find_syntax_by_extension(token))
}

/// Render a fenced code block as HTML.
///
/// Recognised languages are highlighted; anything else is emitted as escaped
/// plain text.
pub fn highlight_code(code: &str, info: &str) -> String {
    let lang = info.split_whitespace().next().unwrap_or("");

    let Some(syntax) = find_syntax(info) else {
        return plain_block(code, lang);
    };

    let mut generator =
        ClassedHTMLGenerator::new_with_class_style(syntax, syntax_set(), CLASS_STYLE);
    for line in LinesWithEndings::from(code) {
        if let Err(e) = generator.parse_html_for_line_which_includes_newline(line) {
            tracing::debug!("Highlighting failed for {}: {}", lang, e);
            return plain_block(code, lang);
        }
    }

    format!(
        "<pre class=\"hl-code\"><code class=\"language-{}\">{}</code></pre>\n",
        html_escape(lang),
        generator.finalize()
    )
}

/// Stylesheet for highlighted code.
///
/// The light theme applies everywhere; the dark theme's rules are prefixed
/// with `dark_scope` (for example `html[data-theme='dark']`).
pub fn theme_css(dark_scope: &str) -> String {
    let mut css = String::new();

    if let Some(light) = theme(LIGHT_THEME) {
        match css_for_theme_with_class_style(light, CLASS_STYLE) {
            Ok(rules) => css.push_str(&rules),
            Err(e) => tracing::warn!("Failed to generate {} CSS: {}", LIGHT_THEME, e),
        }
    }

    if let Some(dark) = theme(DARK_THEME) {
        match css_for_theme_with_class_style(dark, CLASS_STYLE) {
            Ok(rules) => css.push_str(&scope_selectors(&rules, dark_scope)),
            Err(e) => tracing::warn!("Failed to generate {} CSS: {}", DARK_THEME, e),
        }
    }

    css
}

fn theme(name: &str) -> Option<&'static Theme> {
    theme_set().themes.get(name)
}

/// Prefix every selector of every rule in `css` with `scope`.
fn scope_selectors(css: &str, scope: &str) -> String {
    let mut out = String::with_capacity(css.len() + css.len() / 4);
    for line in css.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with('.') && trimmed.ends_with('{') {
            let selectors = trimmed.trim_end_matches('{').trim_end();
            let scoped = selectors
                .split(',')
                .map(|s| format!("{} {}", scope, s.trim()))
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&scoped);
            out.push_str(" {");
        } else {
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

fn plain_block(code: &str, lang: &str) -> String {
    if lang.is_empty() {
        format!("<pre><code>{}</code></pre>\n", html_escape(code))
    } else {
        format!(
            "<pre><code class=\"language-{}\">{}</code></pre>\n",
            html_escape(lang),
            html_escape(code)
        )
    }
}

/// Escape text for inclusion in HTML content or attributes.
pub fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
