//! Trait definition loader.

use std::path::Path;

use trait_core::TraitDefinition;

use crate::loaders::{LoadResult, decode_file};

/// Loader for trait definition lists.
pub struct TraitLoader;

impl TraitLoader {
    /// Load trait definitions from a JSON or RON file.
    ///
    /// File format: a list of definitions
    ///
    /// ```json
    /// [
    ///     { "code": "chill", "attributes": { "speed": -0.2 },
    ///       "repeat": 3, "duration": 60, "temp": true, "mul": false }
    /// ]
    /// ```
    ///
    /// Definitions are decoded only; validation happens when they are loaded
    /// into a registry.
    pub fn load(path: &Path) -> LoadResult<Vec<TraitDefinition>> {
        let definitions: Vec<TraitDefinition> = decode_file(path)?;
        tracing::debug!(
            "Decoded {} trait definitions from {}",
            definitions.len(),
            path.display()
        );
        Ok(definitions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;
    use trait_core::CombineMode;

    #[test]
    fn loads_json_definitions() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[
                {{ "code": "chill", "attributes": {{ "speed": -0.2 }}, "repeat": 3, "duration": 60, "temp": true }},
                {{ "code": "strong", "attributes": {{ "strength": 0.1 }}, "mul": true }}
            ]"#
        )
        .unwrap();

        let definitions = TraitLoader::load(file.path()).unwrap();
        assert_eq!(definitions.len(), 2);
        assert!(definitions[0].temporary);
        assert_eq!(definitions[1].combine_mode, CombineMode::Multiplicative);
    }

    #[test]
    fn loads_ron_definitions() {
        let mut file = Builder::new().suffix(".ron").tempfile().unwrap();
        write!(
            file,
            r#"[
                // a comment is fine here
                (code: "chill", attributes: {{ "speed": -0.2 }}, repeat: 3, duration: 60, temp: true),
            ]"#
        )
        .unwrap();

        let definitions = TraitLoader::load(file.path()).unwrap();
        assert_eq!(definitions[0].repeat_count, 3);
        assert_eq!(definitions[0].duration_seconds, 60);
    }

    #[test]
    fn reports_malformed_file() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{{ not json").unwrap();

        let error = TraitLoader::load(file.path()).unwrap_err();
        assert!(error.to_string().contains("Failed to parse JSON"));
    }
}
