//! Page assembly: compiling each language's navigation into sections.

use std::fs;
use std::path::Path;

use doku_markdown::{compile, html_escape, Metadata};
use serde::Serialize;

use crate::builder::BuildError;
use crate::config::{Language, ProjectConfig};
use crate::templates::NavLink;

/// One compiled markdown file.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    /// Language code the page belongs to
    pub lang: String,
    /// Source path relative to `src/`
    pub rel: String,
    pub title: String,
    #[serde(skip)]
    pub html: String,
    pub meta: Metadata,
    /// Source text as read from disk
    #[serde(skip)]
    pub raw: String,
}

/// The compiled pages of one language, in navigation order.
#[derive(Debug, Clone)]
pub struct LanguagePages {
    pub language: Language,
    pub pages: Vec<Page>,
}

impl LanguagePages {
    /// Anchor id of the page at `index`.
    pub fn anchor(&self, index: usize) -> String {
        section_anchor(&self.language.code, index)
    }

    /// Table of contents items.
    pub fn toc_html(&self) -> String {
        self.pages
            .iter()
            .enumerate()
            .map(|(i, page)| {
                format!(
                    "<li><a href=\"#{}\">{}</a></li>",
                    self.anchor(i),
                    html_escape(&page.title)
                )
            })
            .collect()
    }

    /// One `<section>` per page.
    pub fn body_html(&self) -> String {
        self.pages
            .iter()
            .enumerate()
            .map(|(i, page)| {
                format!(
                    "<section id=\"{}\" class=\"doku-section\" data-lang=\"{}\">\n<h1>{}</h1>\n{}\n</section>",
                    self.anchor(i),
                    html_escape(&self.language.code),
                    html_escape(&page.title),
                    page.html
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Header navigation links.
    pub fn nav_links(&self) -> Vec<NavLink> {
        self.pages
            .iter()
            .enumerate()
            .map(|(i, page)| NavLink {
                text: page.title.clone(),
                anchor: self.anchor(i),
            })
            .collect()
    }
}

/// Anchor id for a page: `section-<lang>-<index>`.
pub fn section_anchor(lang: &str, index: usize) -> String {
    format!("section-{}-{}", id_token(lang), index)
}

/// A language code reduced to characters that are safe in ids, selectors and
/// file names. Anything else becomes `_`.
pub(crate) fn id_token(code: &str) -> String {
    code.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

/// Compile every language's navigation, reading sources from `src_dir`.
///
/// Entries without a file are skipped; a file that cannot be read fails the
/// build.
pub fn assemble(config: &ProjectConfig, src_dir: &Path) -> Result<Vec<LanguagePages>, BuildError> {
    let mut assembled = Vec::with_capacity(config.languages.len());

    for language in &config.languages {
        let mut pages = Vec::new();

        for entry in config.nav_for(&language.code) {
            let Some(rel) = entry.file.as_deref().map(str::trim).filter(|f| !f.is_empty()) else {
                tracing::debug!("Skipping nav entry without a file in {}", language.code);
                continue;
            };

            let path = src_dir.join(rel);
            let raw = fs::read_to_string(&path)
                .map_err(|e| BuildError::ReadError(format!("{}: {}", path.display(), e)))?;

            let doc = compile(&raw);
            let title = entry
                .text
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .unwrap_or(doc.title);

            pages.push(Page {
                lang: language.code.clone(),
                rel: rel.to_string(),
                title,
                html: doc.html,
                meta: doc.meta,
                raw,
            });
        }

        tracing::debug!("Compiled {} pages for {}", pages.len(), language.code);

        assembled.push(LanguagePages {
            language: language.clone(),
            pages,
        });
    }

    Ok(assembled)
}
