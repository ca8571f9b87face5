//! Character class loader.

use std::path::Path;

use trait_core::CharacterClass;

use crate::loaders::{LoadResult, decode_file};

/// Loader for character class lists.
pub struct ClassLoader;

impl ClassLoader {
    /// Load character classes from a JSON or RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<CharacterClass>> {
        let classes: Vec<CharacterClass> = decode_file(path)?;
        tracing::debug!(
            "Decoded {} character classes from {}",
            classes.len(),
            path.display()
        );
        Ok(classes)
    }
}
