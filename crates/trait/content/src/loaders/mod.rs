//! Content loaders for reading trait data from files.
//!
//! JSON is the shipped format; files ending in `.ron` are decoded as RON so
//! hand-written content can use comments and trailing commas.

pub mod bundle;
pub mod classes;
pub mod config;
pub mod traits;

pub use bundle::{ContentBundle, load_content_dir};
pub use classes::ClassLoader;
pub use config::ConfigLoader;
pub use traits::TraitLoader;

use std::path::Path;

use serde::de::DeserializeOwned;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Decodes `path` as RON or JSON depending on its extension.
pub(crate) fn decode_file<T: DeserializeOwned>(path: &Path) -> LoadResult<T> {
    let content = read_file(path)?;
    let is_ron = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ron"));

    if is_ron {
        ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse RON at {}: {}", path.display(), e))
    } else {
        serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse JSON at {}: {}", path.display(), e))
    }
}
