//! Environment variable configuration overlay
//!
//! Variables have the form `SEMDEX_<section>_<field>=value`, e.g.
//! `SEMDEX_CHUNKING_MAX_LINES=120` or `SEMDEX_EMBEDDING_BACKEND=ollama`.

use crate::{error::ConfigError, types::*, Config, Result};
use std::env;
use std::path::PathBuf;

const PREFIX: &str = "SEMDEX_";

/// Parse configuration from environment variables
///
/// Returns `None` when no `SEMDEX_` variable is set. Unknown sections or
/// fields are errors so typos do not silently fall back to defaults.
pub fn from_env() -> Result<Option<Config>> {
    let env_vars: Vec<(String, String)> = env::vars()
        .filter(|(k, _)| k.starts_with(PREFIX))
        .collect();

    if env_vars.is_empty() {
        return Ok(None);
    }

    let mut config = Config::default();
    for (key, value) in env_vars {
        apply_env_var(&mut config, &key, &value)?;
    }
    Ok(Some(config))
}

fn apply_env_var(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let stripped = key.strip_prefix(PREFIX).unwrap_or(key);

    let Some((section, field)) = stripped.split_once('_') else {
        return Err(ConfigError::EnvVarError {
            var: key.to_string(),
            message: "Expected format: SEMDEX_<section>_<field>".to_string(),
        });
    };

    let section = section.to_lowercase();
    let field = field.to_lowercase();

    match section.as_str() {
        "core" => apply_core_var(&mut config.core, &field, value),
        "chunking" => apply_chunking_var(&mut config.chunking, &field, value),
        "embedding" => apply_embedding_var(&mut config.embedding, &field, value),
        "search" => apply_search_var(&mut config.search, &field, value),
        _ => Err(ConfigError::EnvVarError {
            var: key.to_string(),
            message: format!("Unknown section: {}", section),
        }),
    }
}

fn parse_usize(var: &str, value: &str) -> Result<usize> {
    value.parse().map_err(|_| ConfigError::EnvVarError {
        var: var.to_string(),
        message: format!("Invalid integer: {}", value),
    })
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn unknown_field(section: &str, field: &str) -> ConfigError {
    ConfigError::EnvVarError {
        var: format!("{}{}_{}", PREFIX, section, field.to_uppercase()),
        message: format!("Unknown field: {}", field),
    }
}

fn apply_core_var(config: &mut CoreConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "data_dir" => config.data_dir = PathBuf::from(value),
        "include_extensions" => config.include_extensions = parse_list(value),
        "ignore_dirs" => config.ignore_dirs = parse_list(value),
        "index_backend" => {
            config.index_backend = match value.to_lowercase().as_str() {
                "fs" => IndexBackend::Fs,
                "sled" => IndexBackend::Sled,
                _ => {
                    return Err(ConfigError::invalid_enum(
                        "core.index_backend",
                        value,
                        &["fs", "sled"],
                    ))
                }
            };
        }
        _ => return Err(unknown_field("CORE", field)),
    }
    Ok(())
}

fn apply_chunking_var(config: &mut ChunkingConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "max_lines" => config.max_lines = parse_usize("SEMDEX_CHUNKING_MAX_LINES", value)?,
        "overlap_lines" => {
            config.overlap_lines = parse_usize("SEMDEX_CHUNKING_OVERLAP_LINES", value)?
        }
        _ => return Err(unknown_field("CHUNKING", field)),
    }
    Ok(())
}

fn apply_embedding_var(config: &mut EmbeddingConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "backend" => {
            config.backend = match value.to_lowercase().as_str() {
                "hash" => EmbeddingBackend::Hash,
                "ollama" => EmbeddingBackend::Ollama,
                "openai" | "external" => EmbeddingBackend::Openai,
                _ => {
                    return Err(ConfigError::invalid_enum(
                        "embedding.backend",
                        value,
                        &["hash", "ollama", "openai"],
                    ))
                }
            };
        }
        "model_name" => config.model_name = value.to_string(),
        "dimension" => config.dimension = parse_usize("SEMDEX_EMBEDDING_DIMENSION", value)?,
        "api_base" => config.api_base = Some(value.to_string()),
        _ => return Err(unknown_field("EMBEDDING", field)),
    }
    Ok(())
}

fn apply_search_var(config: &mut SearchConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "top_k" => config.top_k = parse_usize("SEMDEX_SEARCH_TOP_K", value)?,
        _ => return Err(unknown_field("SEARCH", field)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Env vars are process-global; serialize the tests that touch them.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn cleanup_semdex_env_vars() {
        let keys: Vec<String> = env::vars()
            .filter(|(k, _)| k.starts_with(PREFIX))
            .map(|(k, _)| k)
            .collect();
        for key in keys {
            env::remove_var(&key);
        }
    }

    #[test]
    fn test_chunking_env() {
        let _lock = ENV_LOCK.lock().unwrap();
        cleanup_semdex_env_vars();
        env::set_var("SEMDEX_CHUNKING_MAX_LINES", "120");
        let config = from_env().unwrap().unwrap();
        assert_eq!(config.chunking.max_lines, 120);
        cleanup_semdex_env_vars();
    }

    #[test]
    fn test_core_list_env() {
        let _lock = ENV_LOCK.lock().unwrap();
        cleanup_semdex_env_vars();
        env::set_var("SEMDEX_CORE_IGNORE_DIRS", "target, dist");
        let config = from_env().unwrap().unwrap();
        assert_eq!(config.core.ignore_dirs, vec!["target", "dist"]);
        cleanup_semdex_env_vars();
    }

    #[test]
    fn test_unknown_section_is_error() {
        let mut config = Config::default();
        assert!(apply_env_var(&mut config, "SEMDEX_BOGUS_FIELD", "1").is_err());
    }

    #[test]
    fn test_bad_backend_is_error() {
        let mut config = Config::default();
        let err = apply_env_var(&mut config, "SEMDEX_EMBEDDING_BACKEND", "fastembed").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnum { .. }));
    }

    #[test]
    fn test_no_env_vars() {
        let _lock = ENV_LOCK.lock().unwrap();
        cleanup_semdex_env_vars();
        assert!(from_env().unwrap().is_none());
    }
}
