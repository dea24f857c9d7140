//! Static site builder for doku documentation projects.
//!
//! Loads a project's configuration, compiles its markdown per language and
//! emits a single themed HTML document with a companion metadata module.

pub mod assembler;
pub mod assets;
pub mod build_id;
pub mod builder;
pub mod config;
pub mod emitter;
pub mod scaffold;
pub mod templates;

pub use build_id::BuildId;
pub use builder::{BuildError, BuildOptions, BuildResult, OutputFormat, SiteBuilder};
pub use config::{ConfigError, ProjectConfig, ProjectLayout};
pub use emitter::render_standalone;
pub use scaffold::generate_project;
