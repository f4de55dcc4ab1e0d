//! Configuration loading from various sources

pub mod env;
pub mod file;
pub mod formats;
pub mod merge;

use crate::{Config, Result, Validate};
use std::path::{Path, PathBuf};

/// Format for configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
    /// JSON format (.json)
    Json,
}

/// Configuration source for layered loading
#[derive(Debug, Clone)]
pub enum ConfigSource {
    File(PathBuf),
    Environment,
    /// Explicit config object (for programmatic use)
    Explicit(Config),
}

/// Builder for loading and merging configurations
///
/// Precedence: defaults < file < environment < explicit overrides,
/// in the order the sources were added.
///
/// # Example
///
/// ```no_run
/// use semdex_config::loader::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .with_file(".semdex.toml")
///     .with_env()
///     .build()?;
/// # Ok::<(), semdex_config::ConfigError>(())
/// ```
#[derive(Default)]
pub struct ConfigBuilder {
    sources: Vec<ConfigSource>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.sources
            .push(ConfigSource::File(path.as_ref().to_path_buf()));
        self
    }

    pub fn with_env(mut self) -> Self {
        self.sources.push(ConfigSource::Environment);
        self
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.sources.push(ConfigSource::Explicit(config));
        self
    }

    /// Merge all sources in order and validate the result
    pub fn build(self) -> Result<Config> {
        let mut config = Config::default();

        for source in self.sources {
            match source {
                ConfigSource::File(path) => {
                    let file_config = file::load_from_file(&path)?;
                    config = merge::merge(config, file_config);
                }
                ConfigSource::Environment => {
                    if let Some(env_config) = env::from_env()? {
                        config = merge::merge(config, env_config);
                    }
                }
                ConfigSource::Explicit(explicit_config) => {
                    config = merge::merge(config, explicit_config);
                }
            }
        }

        config.validate()?;
        Ok(config)
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Uses the first of `.semdex.toml`, `.semdex.yml`, `.semdex.yaml`,
    /// `.semdex.json` found in the working directory, falling back to
    /// defaults. Environment variables are always applied on top.
    pub fn load() -> Result<Self> {
        let default_paths = [".semdex.toml", ".semdex.yml", ".semdex.yaml", ".semdex.json"];

        let mut builder = ConfigBuilder::new();
        if let Some(path) = default_paths.iter().find(|p| Path::new(p).exists()) {
            builder = builder.with_file(path);
        }

        builder.with_env().build()
    }

    /// Load configuration from a specific file, with the environment overlay.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(crate::ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        ConfigBuilder::new().with_file(path).with_env().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builder_default() {
        let config = ConfigBuilder::new().build().unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.chunking.max_lines, 80);
    }

    #[test]
    fn test_builder_file_then_explicit() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[search]\ntop_k = 7\n\n[chunking]\nmax_lines = 40").unwrap();

        let mut explicit = Config::default();
        explicit.search.top_k = 12;

        let config = ConfigBuilder::new()
            .with_file(file.path())
            .with_config(explicit)
            .build()
            .unwrap();
        assert_eq!(config.search.top_k, 12);
        assert_eq!(config.chunking.max_lines, 40);
    }

    #[test]
    fn test_invalid_merged_config_is_rejected() {
        let mut explicit = Config::default();
        explicit.chunking.overlap_lines = 200;
        assert!(ConfigBuilder::new().with_config(explicit).build().is_err());
    }

    #[test]
    fn test_from_missing_file() {
        let err = Config::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, crate::ConfigError::FileNotFound { .. }));
    }
}
