//! Static assets: copying project files, the site stylesheet and the browser
//! runtime.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use walkdir::WalkDir;

use crate::build_id::{random_token, ASSET_TOKEN_LEN};
use crate::builder::BuildError;

/// File name of the manifest written next to the copied assets.
pub const MANIFEST_FILE: &str = "assets-manifest.json";

/// Browser runtime that renders `<doku src>` elements client-side.
pub const RUNTIME_JS: &str = include_str!("../runtime/dokujs.js");

/// File name the browser runtime is written under.
pub const RUNTIME_FILE: &str = "dokujs.js";

/// A copied asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetEntry {
    /// Random identifier assigned at copy time
    pub id: String,
    /// Output path relative to the output directory (`assets/<rel>`)
    pub path: String,
}

/// Copied assets keyed by their `/`-separated path relative to the source
/// directory.
pub type AssetManifest = BTreeMap<String, AssetEntry>;

/// Recursively copy `src` into `out`, returning one manifest entry per file.
///
/// Directories are created as needed and existing files are overwritten. A
/// missing `src` yields an empty manifest.
pub fn copy_assets(src: &Path, out: &Path) -> Result<AssetManifest, BuildError> {
    let mut manifest = AssetManifest::new();

    if !src.is_dir() {
        tracing::debug!("No assets directory at {}", src.display());
        return Ok(manifest);
    }

    fs::create_dir_all(out).map_err(|e| BuildError::WriteError(e.to_string()))?;

    for entry in WalkDir::new(src).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| BuildError::ReadError(e.to_string()))?;
        let path = entry.path();

        let Ok(relative) = path.strip_prefix(src) else {
            continue;
        };
        if relative.as_os_str().is_empty() {
            continue;
        }

        let target = out.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| BuildError::WriteError(e.to_string()))?;
            continue;
        }
        if !entry.file_type().is_file() {
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
        }
        fs::copy(path, &target)
            .map_err(|e| BuildError::WriteError(format!("{}: {}", target.display(), e)))?;

        let rel = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        manifest.insert(
            rel.clone(),
            AssetEntry {
                id: random_token(ASSET_TOKEN_LEN),
                path: format!("assets/{}", rel),
            },
        );
    }

    tracing::debug!("Copied {} assets from {}", manifest.len(), src.display());

    Ok(manifest)
}

/// Write the manifest as pretty-printed JSON.
pub fn write_manifest(manifest: &AssetManifest, path: &Path) -> Result<(), BuildError> {
    let json =
        serde_json::to_string_pretty(manifest).map_err(|e| BuildError::WriteError(e.to_string()))?;
    fs::write(path, json).map_err(|e| BuildError::WriteError(e.to_string()))
}

/// Stylesheet utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Generate the site stylesheet for the given theme colours.
    ///
    /// Includes the syntax highlighting rules for both light and dark modes.
    pub fn generate_css(primary: &str, accent: &str) -> String {
        let mut css = format!(
            ":root {{ --primary: {}; --accent: {}; }}\n",
            primary.trim(),
            accent.trim()
        );
        css.push_str(SITE_CSS);
        css.push_str(&doku_markdown::highlight::theme_css(DARK_SCOPE));
        css
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

/// Selector that scopes dark-mode rules.
pub const DARK_SCOPE: &str = "html[data-theme='dark']";

const SITE_CSS: &str = r#"* { box-sizing: border-box; }

body {
  font-family: Inter, system-ui, -apple-system, "Segoe UI", Roboto, Helvetica, Arial, sans-serif;
  margin: 0;
  color: #111;
  background: #fff;
  line-height: 1.6;
}

a { color: var(--primary); text-decoration: none; }
a:hover { text-decoration: underline; }

header.doku-header {
  position: sticky;
  top: 0;
  z-index: 10;
  backdrop-filter: saturate(180%) blur(8px);
  background: rgba(255, 255, 255, 0.85);
  border-bottom: 1px solid #eee;
}

.doku-container {
  max-width: 1100px;
  margin: 0 auto;
  padding: 12px 20px;
  display: flex;
  align-items: center;
  gap: 18px;
}

.brand { display: flex; align-items: center; gap: 10px; font-weight: 700; color: #111; }
.brand img { height: 24px; width: auto; }
.brand .fa-book { color: var(--primary); }

nav.doku-nav { margin-left: auto; }
nav.doku-nav ul { display: flex; gap: 14px; list-style: none; padding: 0; margin: 0; }
nav.doku-nav a { color: #111; font-weight: 600; }

.doku-socials { display: flex; gap: 10px; margin-left: 16px; }
.doku-socials a { color: #555; }
.doku-socials a:hover { color: #111; }

.author { display: flex; align-items: center; gap: 8px; margin-left: 8px; }
.author img { width: 24px; height: 24px; border-radius: 50%; }

.theme-toggle { margin-left: 8px; cursor: pointer; }

.lang-dropdown .w3-button { display: flex; align-items: center; gap: 8px; }
.lang-dropdown .w3-dropdown-content { min-width: 180px; border-radius: 10px; overflow: hidden; padding: 6px; }
.lang-dropdown .w3-bar-item { display: flex; align-items: center; gap: 10px; border-radius: 8px; padding: 8px 16px; }
.lang-dropdown .w3-bar-item:hover { background-color: #f0f0f0; }
.lang-code { font-size: 11px; padding: 2px 6px; border: 1px solid #ddd; border-radius: 6px; color: #555; }
.flag-emoji { display: inline-block; width: 1.25em; text-align: center; }

main.doku-main {
  max-width: 1100px;
  margin: 0 auto;
  padding: 24px 20px;
  display: grid;
  grid-template-columns: 250px 1fr;
  gap: 28px;
}

.toc { position: sticky; top: 64px; align-self: start; border-right: 1px solid #eee; padding-right: 16px; }
.toc ul { list-style: none; padding: 0; margin: 0; }
.toc li { margin-bottom: 8px; }
.toc a { color: #333; }

.doku-content { min-width: 0; }
.doku-section { margin: 0 0 32px 0; }

h1, h2, h3 { line-height: 1.25; }

pre, code, kbd, samp {
  font-family: "JetBrains Mono", ui-monospace, SFMono-Regular, Menlo, Monaco, Consolas, monospace;
}

pre { padding: 14px; border-radius: 8px; overflow: auto; border: 1px solid #eee; background: #f6f8fa; }

html[data-theme='dark'] body { color: #e5e5e5; background: #111; }
html[data-theme='dark'] header.doku-header { background: rgba(20, 20, 20, 0.8); border-bottom-color: #222; }
html[data-theme='dark'] .toc { border-right-color: #222; }
html[data-theme='dark'] .toc a { color: #ccc; }
html[data-theme='dark'] .doku-socials a { color: #aaa; }
html[data-theme='dark'] nav.doku-nav a { color: #f0f0f0; }
html[data-theme='dark'] .brand { color: #f5f5f5; }
html[data-theme='dark'] pre { background: #0d1117; border-color: #222; }
html[data-theme='dark'] .lang-dropdown .w3-bar-item:hover { background-color: #222; }

@media (max-width: 900px) {
  main.doku-main { grid-template-columns: 1fr; }
  .toc { display: none; }
}
"#;
