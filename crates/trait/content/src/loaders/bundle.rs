//! Loads a whole content directory at once.

use std::path::Path;

use trait_core::{CharacterClass, TraitDefinition};

use crate::loaders::{ClassLoader, LoadResult, TraitLoader};

pub const TRAITS_FILE: &str = "traits.json";
pub const CLASSES_FILE: &str = "characterclasses.json";

/// Everything the config-reload entry point needs.
#[derive(Clone, Debug, Default)]
pub struct ContentBundle {
    pub traits: Vec<TraitDefinition>,
    pub classes: Vec<CharacterClass>,
}

/// Loads trait content from `dir`.
///
/// Expected directory structure:
/// ```text
/// content/
///   ├── traits.json
///   └── characterclasses.json   (optional)
/// ```
pub fn load_content_dir(dir: &Path) -> LoadResult<ContentBundle> {
    let traits = TraitLoader::load(&dir.join(TRAITS_FILE))?;

    let classes_path = dir.join(CLASSES_FILE);
    let classes = if classes_path.exists() {
        ClassLoader::load(&classes_path)?
    } else {
        tracing::debug!("No {} in {}, skipping classes", CLASSES_FILE, dir.display());
        Vec::new()
    };

    Ok(ContentBundle { traits, classes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn shipped_data() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
    }

    #[test]
    fn loads_shipped_content() {
        let bundle = load_content_dir(&shipped_data()).unwrap();

        let chill = bundle
            .traits
            .iter()
            .find(|definition| definition.code == "chill")
            .unwrap();
        assert_eq!(chill.repeat_count, 3);
        assert_eq!(chill.duration_seconds, 60);
        assert!(chill.validate().is_ok());

        assert!(!bundle.classes.is_empty());
        assert!(bundle.traits.iter().all(|definition| definition.validate().is_ok()));
    }

    #[test]
    fn classes_file_is_optional() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(TRAITS_FILE), "[]").unwrap();

        let bundle = load_content_dir(dir.path()).unwrap();
        assert!(bundle.traits.is_empty());
        assert!(bundle.classes.is_empty());
    }

    #[test]
    fn traits_file_is_required() {
        let dir = TempDir::new().unwrap();
        assert!(load_content_dir(dir.path()).is_err());
    }
}
