//! Single-file compile command.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use doku_static::render_standalone;

use crate::Renderer;

/// Run the compile command.
pub async fn run(input: PathBuf, output: PathBuf, renderer: Renderer) -> Result<()> {
    let source = fs::read_to_string(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let doc = match renderer {
        Renderer::Full => doku_markdown::compile(&source),
        Renderer::Lite => doku_markdown::lite::compile(&source),
    };
    tracing::debug!("Compiled '{}' with {:?} renderer", doc.title, renderer);

    let html = render_standalone(&doc)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(&output, html).with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Compiled to {}", output.display());

    Ok(())
}
