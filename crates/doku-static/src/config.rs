//! Project configuration loading.
//!
//! A project is described by up to four optional files: `doku.toml`,
//! `version.yaml`, `config.json` and `src/result.yaml`. They are read
//! concurrently, parsed with their own format and merged into a single
//! [`ProjectConfig`]. For every site-level value the first source that sets it
//! wins.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

/// Default primary theme colour.
pub const DEFAULT_PRIMARY: &str = "#0f62fe";
/// Default accent theme colour.
pub const DEFAULT_ACCENT: &str = "#f1c21b";
/// Site title used when no source provides one.
pub const DEFAULT_TITLE: &str = "Doku Site";
/// Build identifier prefix used when `config.json` does not set one.
pub const DEFAULT_BUILD_ID_PREFIX: &str = "build";

/// Well-known paths inside a project directory.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    /// Project root
    pub root: PathBuf,
    /// Markdown sources (`src/`)
    pub src_dir: PathBuf,
    /// Build output (`res/`)
    pub res_dir: PathBuf,
}

impl ProjectLayout {
    /// Describe the layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            src_dir: root.join("src"),
            res_dir: root.join("res"),
            root,
        }
    }

    pub fn doku_toml(&self) -> PathBuf {
        self.root.join("doku.toml")
    }

    pub fn version_yaml(&self) -> PathBuf {
        self.root.join("version.yaml")
    }

    pub fn config_json(&self) -> PathBuf {
        self.root.join("config.json")
    }

    pub fn result_yaml(&self) -> PathBuf {
        self.src_dir.join("result.yaml")
    }

    /// Static assets to copy (`src/assets`).
    pub fn assets_src(&self) -> PathBuf {
        self.src_dir.join("assets")
    }

    /// Copied assets (`res/assets`).
    pub fn assets_out(&self) -> PathBuf {
        self.res_dir.join("assets")
    }
}

/// Errors that can occur when loading project configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse TOML in {path}: {message}")]
    Toml { path: PathBuf, message: String },

    #[error("Failed to parse YAML in {path}: {message}")]
    Yaml { path: PathBuf, message: String },

    #[error("Failed to parse JSON in {path}: {message}")]
    Json { path: PathBuf, message: String },
}

/// The parsed contents of each configuration file, as loaded.
///
/// Absent files are represented by an empty object.
#[derive(Debug, Clone, Serialize)]
pub struct RawSources {
    pub doku: Value,
    pub version: Value,
    pub config: Value,
    pub site: Value,
}

impl Default for RawSources {
    fn default() -> Self {
        Self {
            doku: empty_object(),
            version: empty_object(),
            config: empty_object(),
            site: empty_object(),
        }
    }
}

/// Author block shown in the page header.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Author {
    pub name: Option<String>,
    pub url: Option<String>,
    pub avatar: Option<String>,
}

/// A social link shown in the page header.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Social {
    pub icon: Option<String>,
    pub url: Option<String>,
    pub title: Option<String>,
}

/// A content language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Language {
    pub code: String,
    pub label: String,
}

impl Language {
    pub fn new(code: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
        }
    }
}

/// One page in a language's navigation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NavEntry {
    /// Display text (falls back to the page title)
    pub text: Option<String>,
    /// Markdown source path relative to `src/`
    pub file: Option<String>,
}

/// Merged project configuration.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub title: String,
    pub repo: Option<String>,
    pub primary: String,
    pub accent: String,
    /// Logo path relative to the output directory (always under `assets/`)
    pub logo: Option<String>,
    pub author: Option<Author>,
    pub socials: Vec<Social>,
    /// Languages in declaration order; never empty
    pub languages: Vec<Language>,
    /// Navigation per language code
    pub nav: BTreeMap<String, Vec<NavEntry>>,
    pub build_id_prefix: String,
    pub minify: bool,
    pub raw: RawSources,
}

impl ProjectConfig {
    /// The first declared language.
    pub fn default_language(&self) -> &Language {
        &self.languages[0]
    }

    /// Navigation entries for a language (empty when none are configured).
    pub fn nav_for(&self, code: &str) -> &[NavEntry] {
        self.nav.get(code).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Load and merge the configuration of the project at `layout`.
pub async fn load(layout: &ProjectLayout) -> Result<ProjectConfig, ConfigError> {
    let doku_path = layout.doku_toml();
    let version_path = layout.version_yaml();
    let config_path = layout.config_json();
    let site_path = layout.result_yaml();

    let (doku, version, config, site) = tokio::join!(
        read_if_exists(&doku_path),
        read_if_exists(&version_path),
        read_if_exists(&config_path),
        read_if_exists(&site_path),
    );

    let raw = RawSources {
        doku: parse_toml(&doku_path, doku?)?,
        version: parse_yaml(&version_path, version?)?,
        config: parse_json(&config_path, config?)?,
        site: parse_yaml(&site_path, site?)?,
    };

    tracing::debug!("Loaded configuration from {}", layout.root.display());

    Ok(merge(raw))
}

/// Merge already-parsed sources into a [`ProjectConfig`].
///
/// Values of an unexpected shape are ignored and the default is used, so only
/// unparseable files fail a build.
pub fn merge(raw: RawSources) -> ProjectConfig {
    let site = &raw.site;

    let title = [field(site, "title"), field(&raw.doku, "title"), field(&raw.config, "title")]
        .into_iter()
        .find_map(text)
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let repo = [field(site, "repo"), field(&raw.config, "repo"), field(&raw.doku, "repo")]
        .into_iter()
        .find_map(text);

    let languages = languages(field(site, "languages"));
    let nav = languages
        .iter()
        .map(|lang| (lang.code.clone(), nav_entries(field(site, "nav"), &lang.code)))
        .collect();

    let theme = field(site, "theme");

    ProjectConfig {
        title,
        repo,
        primary: theme_color(theme.and_then(|t| field(t, "primary")), DEFAULT_PRIMARY),
        accent: theme_color(theme.and_then(|t| field(t, "accent")), DEFAULT_ACCENT),
        logo: text(field(site, "logo")).map(|logo| normalize_logo(&logo)),
        author: field(site, "author").and_then(author),
        socials: items(field(site, "socials")).filter_map(social).collect(),
        languages,
        nav,
        build_id_prefix: text(field(&raw.config, "buildIdPrefix"))
            .unwrap_or_else(|| DEFAULT_BUILD_ID_PREFIX.to_string()),
        minify: field(&raw.doku, "build")
            .and_then(|build| field(build, "minify"))
            .and_then(Value::as_bool)
            .unwrap_or(true),
        raw,
    }
}

/// Declared languages, first occurrence of each code winning. Never empty.
fn languages(value: Option<&Value>) -> Vec<Language> {
    let mut languages: Vec<Language> = Vec::new();

    for item in items(value) {
        let (code, label) = match item {
            Value::Object(_) => (text(field(item, "code")), text(field(item, "label"))),
            other => (text(Some(other)), None),
        };
        let Some(code) = code.map(|c| c.trim().to_string()) else {
            continue;
        };
        if languages.iter().any(|l| l.code == code) {
            tracing::warn!("Ignoring duplicate language '{}'", code);
            continue;
        }
        let label = label.unwrap_or_else(|| code.to_uppercase());
        languages.push(Language { code, label });
    }

    if languages.is_empty() {
        languages.push(Language::new("en", "English"));
    }
    languages
}

/// Navigation is either one list shared by every language or a list per
/// language code. Entries that are not mappings or have no file are dropped.
fn nav_entries(nav: Option<&Value>, code: &str) -> Vec<NavEntry> {
    let list = match nav {
        Some(Value::Object(map)) => map.get(code),
        other => other,
    };

    items(list)
        .filter(|item| item.is_object())
        .filter_map(|item| {
            let file = text(field(item, "file"))?;
            Some(NavEntry {
                text: text(field(item, "text")),
                file: Some(file),
            })
        })
        .collect()
}

fn author(value: &Value) -> Option<Author> {
    value.is_object().then(|| Author {
        name: text(field(value, "name")),
        url: text(field(value, "url")),
        avatar: text(field(value, "avatar")),
    })
}

fn social(value: &Value) -> Option<Social> {
    value.is_object().then(|| Social {
        icon: text(field(value, "icon")),
        url: text(field(value, "url")),
        title: text(field(value, "title")),
    })
}

/// A theme colour, or `default` when unset or not a plain colour token.
fn theme_color(value: Option<&Value>, default: &str) -> String {
    match text(value) {
        Some(color) if is_color_token(color.trim()) => color.trim().to_string(),
        Some(color) => {
            tracing::warn!("Ignoring theme colour {:?}; using {}", color, default);
            default.to_string()
        }
        None => default.to_string(),
    }
}

/// Hex colours, colour names and functional notations such as `rgb(0 0 0 / 50%)`.
fn is_color_token(color: &str) -> bool {
    !color.is_empty()
        && color
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '#' | '(' | ')' | ',' | '.' | '%' | '-' | '/' | ' '))
}

fn field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.as_object()?.get(key)
}

/// Elements of an array; anything else has none.
fn items(value: Option<&Value>) -> impl Iterator<Item = &Value> {
    value.and_then(Value::as_array).into_iter().flatten()
}

/// A non-empty scalar rendered as text.
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// Resolve a configured logo path to a path under `assets/`.
pub fn normalize_logo(logo: &str) -> String {
    let trimmed = logo.strip_prefix('.').unwrap_or(logo);
    let trimmed = trimmed.strip_prefix('/').unwrap_or(trimmed);
    if trimmed.starts_with("assets/") {
        trimmed.to_string()
    } else {
        format!("assets/{}", trimmed)
    }
}

async fn read_if_exists(path: &Path) -> Result<Option<String>, ConfigError> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn parse_toml(path: &Path, text: Option<String>) -> Result<Value, ConfigError> {
    let Some(text) = text else {
        return Ok(empty_object());
    };
    toml::from_str(&text).map_err(|e| ConfigError::Toml {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn parse_yaml(path: &Path, text: Option<String>) -> Result<Value, ConfigError> {
    let Some(text) = text else {
        return Ok(empty_object());
    };
    let value: Value = serde_yaml::from_str(&text).map_err(|e| ConfigError::Yaml {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(if value.is_null() { empty_object() } else { value })
}

fn parse_json(path: &Path, text: Option<String>) -> Result<Value, ConfigError> {
    let Some(text) = text else {
        return Ok(empty_object());
    };
    serde_json::from_str(&text).map_err(|e| ConfigError::Json {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}
