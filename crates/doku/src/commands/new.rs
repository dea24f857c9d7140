//! Create a new project.

use std::path::PathBuf;

use anyhow::{Context, Result};
use doku_static::generate_project;

/// Run the new command.
pub async fn run(dir: PathBuf, name: Option<String>) -> Result<()> {
    tracing::info!("Creating project in {}...", dir.display());

    let written = generate_project(&dir, name.as_deref())
        .with_context(|| format!("Failed to create project in {}", dir.display()))?;

    for path in &written {
        tracing::debug!("Wrote {}", path.display());
    }

    println!("Created Doku project at {}", dir.display());
    println!("Next: doku build {}", dir.display());

    Ok(())
}
