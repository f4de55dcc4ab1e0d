//! Core configuration (storage locations, file walking)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where per-project index blobs are kept
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum IndexBackend {
    /// One directory per project under `data_dir/indexes`
    #[default]
    Fs,
    /// A dedicated tree inside the catalog database
    Sled,
}

/// Core configuration for file walking and storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Root directory for the catalog database and index blobs
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// File extensions (without the dot) that are ingested
    ///
    /// Matching is case-insensitive.
    #[serde(default = "default_include_extensions")]
    pub include_extensions: Vec<String>,

    /// Directory names that are never descended into
    #[serde(default = "default_ignore_dirs")]
    pub ignore_dirs: Vec<String>,

    #[serde(default)]
    pub index_backend: IndexBackend,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            include_extensions: default_include_extensions(),
            ignore_dirs: default_ignore_dirs(),
            index_backend: IndexBackend::default(),
        }
    }
}

impl CoreConfig {
    pub fn allows_extension(&self, ext: &str) -> bool {
        self.include_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext))
    }

    pub fn is_ignored_dir(&self, name: &str) -> bool {
        self.ignore_dirs.iter().any(|dir| dir == name)
    }
}

impl crate::validation::Validate for CoreConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;

        if self.include_extensions.is_empty() {
            return Err(ConfigError::ValidationError {
                field: "core.include_extensions".to_string(),
                message: "Must have at least one extension".to_string(),
            });
        }

        for ext in &self.include_extensions {
            if ext.is_empty() || ext.starts_with('.') {
                return Err(ConfigError::ValidationError {
                    field: "core.include_extensions".to_string(),
                    message: format!("Extensions must be non-empty and given without a dot, got '{}'", ext),
                });
            }
        }

        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError {
                field: "core.data_dir".to_string(),
                message: "Data directory cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".semdex")
}

fn default_include_extensions() -> Vec<String> {
    [
        "py", "js", "ts", "jsx", "tsx", "java", "kt", "go", "rs", "html", "css", "json", "md",
        "yml", "yaml", "sh", "sql",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_ignore_dirs() -> Vec<String> {
    ["node_modules", ".git", "__pycache__", "venv", "env", ".venv"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_default_config_is_valid() {
        let config = CoreConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_extensions_invalid() {
        let config = CoreConfig {
            include_extensions: vec![],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_dotted_extension_invalid() {
        let config = CoreConfig {
            include_extensions: vec![".rs".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_extension_match_is_case_insensitive() {
        let config = CoreConfig::default();
        assert!(config.allows_extension("RS"));
        assert!(config.allows_extension("py"));
        assert!(!config.allows_extension("png"));
    }

    #[test]
    fn test_serialize_deserialize() {
        let config = CoreConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let deserialized: CoreConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config.include_extensions, deserialized.include_extensions);
        assert_eq!(deserialized.index_backend, IndexBackend::Fs);
    }
}
