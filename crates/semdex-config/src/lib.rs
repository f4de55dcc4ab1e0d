//! Configuration management for semdex
//!
//! This crate provides a validated configuration system with support for:
//! - Multiple formats (YAML, TOML, JSON)
//! - Config validation with helpful error messages
//! - Config merging (file + environment + explicit overrides)
//!
//! # Example
//!
//! ```no_run
//! use semdex_config::Config;
//!
//! // Load from default location (.semdex.{toml,yml,json})
//! let config = Config::load()?;
//!
//! let max_lines = config.chunking.max_lines;
//! # Ok::<(), semdex_config::ConfigError>(())
//! ```

pub mod error;
pub mod loader;
pub mod types;
pub mod validation;

pub use error::{ConfigError, Result};
pub use loader::ConfigBuilder;
pub use types::*;

pub use validation::Validate;
