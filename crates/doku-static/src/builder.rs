//! Static site builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::assembler;
use crate::assets::{copy_assets, write_manifest, MANIFEST_FILE};
use crate::build_id::BuildId;
use crate::config::{self, ConfigError, ProjectLayout};
use crate::emitter;
use crate::templates::TemplateEngine;

/// Which artifacts a build produces besides the HTML document and metadata
/// module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pre-rendered HTML only
    #[default]
    Html,
    /// Also emit raw `.doku` pages and a client-rendered entry point
    Doku,
}

/// Options for building a project.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Project root (contains `doku.toml` and `src/`)
    pub project_dir: PathBuf,

    /// Output format
    pub format: OutputFormat,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            format: OutputFormat::Html,
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Identifier shared by every emitted file
    pub build_id: BuildId,

    /// Path of the HTML document
    pub html_path: PathBuf,

    /// Path of the metadata module
    pub js_path: PathBuf,

    /// Path of the client-rendered entry point (doku format only)
    pub doku_index_path: Option<PathBuf>,

    /// Number of pages compiled across all languages
    pub pages: usize,

    /// Number of assets copied
    pub assets: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read source: {0}")]
    ReadError(String),

    #[error(transparent)]
    ConfigError(#[from] ConfigError),

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// Builds a project into its `res/` directory.
pub struct SiteBuilder {
    options: BuildOptions,
    templates: TemplateEngine,
}

impl SiteBuilder {
    /// Create a new site builder.
    pub fn new(options: BuildOptions) -> Self {
        Self {
            options,
            templates: TemplateEngine::new(),
        }
    }

    /// Build the project.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();
        let layout = ProjectLayout::new(&self.options.project_dir);

        let config = config::load(&layout).await?;

        fs::create_dir_all(&layout.res_dir).map_err(|e| {
            BuildError::WriteError(format!("{}: {}", layout.res_dir.display(), e))
        })?;

        let languages = assembler::assemble(&config, &layout.src_dir)?;
        let page_count: usize = languages.iter().map(|l| l.pages.len()).sum();

        let assets_src = layout.assets_src();
        let manifest = copy_assets(&assets_src, &layout.assets_out())?;
        if assets_src.is_dir() {
            write_manifest(&manifest, &layout.res_dir.join(MANIFEST_FILE))?;
        }

        let build_id = BuildId::generate(&config.build_id_prefix);
        tracing::debug!("Build id {}", build_id);

        let css = emitter::stylesheet(&config);
        let html = emitter::render_site(&self.templates, &config, &languages, &build_id, css)?;
        let js = emitter::render_metadata(&config, &languages, &manifest, &build_id)?;

        let html_path = layout.res_dir.join(build_id.html_file());
        let js_path = layout.res_dir.join(build_id.js_file());
        write_file(&html_path, &html)?;
        write_file(&js_path, &js)?;

        let doku_index_path = match self.options.format {
            OutputFormat::Html => None,
            OutputFormat::Doku => {
                emitter::write_doku_pages(&layout.res_dir, &languages)?;
                let index = emitter::render_doku_index(&self.templates, &config, &languages)?;
                let path = layout.res_dir.join(build_id.doku_index_file());
                write_file(&path, &index)?;
                Some(path)
            }
        };

        let duration = start.elapsed();

        tracing::info!(
            "Built {} pages in {} languages in {}ms",
            page_count,
            languages.len(),
            duration.as_millis()
        );

        Ok(BuildResult {
            build_id,
            html_path,
            js_path,
            doku_index_path,
            pages: page_count,
            assets: manifest.len(),
            duration_ms: duration.as_millis() as u64,
        })
    }
}

/// Write `contents` to `path`, creating parent directories.
pub(crate) fn write_file(path: &Path, contents: &str) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
    }
    fs::write(path, contents)
        .map_err(|e| BuildError::WriteError(format!("{}: {}", path.display(), e)))
}
