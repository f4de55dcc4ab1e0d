//! Line-window chunking configuration

use serde::{Deserialize, Serialize};

/// Configuration for splitting file text into overlapping line windows
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkingConfig {
    /// Maximum number of lines per chunk
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,

    /// Lines shared between consecutive chunks
    ///
    /// Must be strictly less than `max_lines`.
    #[serde(default = "default_overlap_lines")]
    pub overlap_lines: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_lines: default_max_lines(),
            overlap_lines: default_overlap_lines(),
        }
    }
}

impl crate::validation::Validate for ChunkingConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;
        use crate::validation::validate_positive;

        validate_positive("chunking.max_lines", self.max_lines, 0)?;

        if self.overlap_lines >= self.max_lines {
            return Err(ConfigError::ValidationError {
                field: "chunking.overlap_lines".to_string(),
                message: format!(
                    "overlap_lines ({}) must be < max_lines ({})",
                    self.overlap_lines, self.max_lines
                ),
            });
        }

        Ok(())
    }
}

fn default_max_lines() -> usize {
    80
}

fn default_overlap_lines() -> usize {
    10
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_default_is_valid() {
        let config = ChunkingConfig::default();
        assert_eq!(config.max_lines, 80);
        assert_eq!(config.overlap_lines, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overlap_too_large() {
        let config = ChunkingConfig {
            max_lines: 10,
            overlap_lines: 10,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_max_lines() {
        let config = ChunkingConfig {
            max_lines: 0,
            overlap_lines: 0,
        };
        assert!(config.validate().is_err());
    }
}
