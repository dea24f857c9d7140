//! Markdown compiler with frontmatter support for doku.
//!
//! This crate turns a document (optional YAML or TOML frontmatter followed by
//! markdown) into HTML plus metadata. [`lite`] holds the reduced renderer that
//! matches the browser runtime.

pub mod compiler;
pub mod frontmatter;
pub mod highlight;
pub mod lite;

pub use compiler::{compile, CompiledDoc, FALLBACK_TITLE};
pub use frontmatter::{FrontmatterError, FrontmatterFormat, Metadata};
pub use highlight::html_escape;
