//! Project build command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use doku_static::{BuildOptions, OutputFormat, SiteBuilder};

use crate::Format;

/// Run the build command.
pub async fn run(dir: PathBuf, format: Format) -> Result<()> {
    tracing::info!("Building {}...", dir.display());

    let options = BuildOptions {
        project_dir: dir.clone(),
        format: match format {
            Format::Html => OutputFormat::Html,
            Format::Doku => OutputFormat::Doku,
        },
    };

    let result = SiteBuilder::new(options)
        .build()
        .await
        .with_context(|| format!("Failed to build {}", dir.display()))?;

    tracing::info!(
        "Built {} pages and copied {} assets in {}ms",
        result.pages,
        result.assets,
        result.duration_ms
    );

    println!("Built {}", result.html_path.display());
    println!("Meta  {}", result.js_path.display());
    if let Some(index) = &result.doku_index_path {
        println!("Doku  {}", index.display());
    }

    Ok(())
}
