//! Random identifiers for builds and assets.

use std::fmt;

use uuid::Uuid;

/// Length of the random part of a build identifier.
pub const BUILD_TOKEN_LEN: usize = 8;

/// Length of an asset identifier.
pub const ASSET_TOKEN_LEN: usize = 10;

/// Generate a random lowercase hex token of `len` characters (at most 32).
pub fn random_token(len: usize) -> String {
    let mut token = Uuid::new_v4().simple().to_string();
    token.truncate(len);
    token
}

/// Identifier shared by every file produced by one build.
///
/// Formatted as `<prefix>_<token>`, for example `build_3f9c01ab`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BuildId(String);

impl BuildId {
    /// Generate a fresh identifier with the given prefix.
    pub fn generate(prefix: &str) -> Self {
        Self(format!("{}_{}", prefix, random_token(BUILD_TOKEN_LEN)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the HTML document (`index_<id>.html`).
    pub fn html_file(&self) -> String {
        format!("index_{}.html", self.0)
    }

    /// File name of the metadata module (`index_<id>.js`).
    pub fn js_file(&self) -> String {
        format!("index_{}.js", self.0)
    }

    /// File name of the client-rendered entry point (`index_doku_<id>.html`).
    pub fn doku_index_file(&self) -> String {
        format!("index_doku_{}.html", self.0)
    }
}

impl fmt::Display for BuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
