use crate::error::SchemaError;
use crate::parser::SourceFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_ROOT_NAME: &str = "Schema";
pub const DEFAULT_PREAMBLE: &str = "import * as z from 'zod'";

/// Orchestration options for [`crate::generate_with`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Root name used when the document has no `title`.
    pub fallback_name: String,
    pub preamble: String,
    /// Treat a definition named like the root as the root itself, emitting the whole
    /// definition graph.
    pub strict: bool,
    /// Declare definitions the document body never reaches.
    pub declare_unreferenced: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            fallback_name: DEFAULT_ROOT_NAME.to_string(),
            preamble: DEFAULT_PREAMBLE.to_string(),
            strict: true,
            declare_unreferenced: true,
        }
    }
}

impl GeneratorConfig {
    /// Loads a config from a `.json`, `.yaml` or `.yml` file. Missing keys keep their
    /// defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|e| SchemaError::Io {
            path: display.clone(),
            message: e.to_string(),
        })?;
        let config_error = |message: String| SchemaError::Config {
            path: display.clone(),
            message,
        };
        match SourceFormat::from_file_name(&display)? {
            SourceFormat::Json => {
                serde_json::from_str(&text).map_err(|e| config_error(e.to_string()))
            }
            SourceFormat::Yaml => {
                serde_yaml::from_str(&text).map_err(|e| config_error(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.fallback_name, "Schema");
        assert_eq!(config.preamble, "import * as z from 'zod'");
        assert!(config.strict);
        assert!(config.declare_unreferenced);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let mut file = Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "fallbackName: Root\nstrict: false").unwrap();
        let config = GeneratorConfig::from_file(file.path()).unwrap();
        assert_eq!(config.fallback_name, "Root");
        assert!(!config.strict);
        assert_eq!(config.preamble, DEFAULT_PREAMBLE);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"fallback": "Root"}}"#).unwrap();
        let err = GeneratorConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, SchemaError::Config { .. }), "{err:?}");
    }

    #[test]
    fn test_missing_file() {
        let err = GeneratorConfig::from_file("/nonexistent/config.json").unwrap_err();
        assert!(matches!(err, SchemaError::Io { .. }));
    }
}
