//! Error types for configuration loading and validation

use std::path::PathBuf;
use thiserror::Error;

/// Result type for config operations
pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {path} does not exist")]
    FileNotFound { path: PathBuf },

    #[error("cannot tell the format of {path} (expected .toml, .yml, .yaml or .json)")]
    UnknownFormat { path: PathBuf },

    /// A YAML, TOML or JSON document that failed to deserialize.
    #[error("invalid {format} config{location}: {message}\n{context}")]
    Parse {
        format: &'static str,
        location: String,
        message: String,
        context: String,
    },

    #[error("cannot read config file {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{value}' is not a valid {field} (one of: {options}). {hint}")]
    InvalidEnum {
        field: String,
        value: String,
        options: String,
        hint: String,
    },

    #[error("{field} must be greater than {min}, got {value}")]
    InvalidInteger {
        field: String,
        value: usize,
        min: usize,
    },

    #[error("environment variable {var}: {message}")]
    EnvVarError { var: String, message: String },

    #[error("{field}: {message}")]
    ValidationError { field: String, message: String },
}

impl ConfigError {
    /// Unknown enum value, with a typo hint when one option is close.
    pub fn invalid_enum(
        field: impl Into<String>,
        value: impl Into<String>,
        options: &[&str],
    ) -> Self {
        let value = value.into();
        let hint = Self::suggest_option(&value, options);
        Self::InvalidEnum {
            field: field.into(),
            value,
            options: options.join(", "),
            hint,
        }
    }

    pub fn from_yaml_error(err: serde_yaml::Error, content: &str, path: Option<&str>) -> Self {
        let line = err.location().map_or(0, |loc| loc.line());
        Self::parse("YAML", path, err.to_string(), line_context(content, line, None))
    }

    pub fn from_toml_error(err: toml::de::Error, content: &str, path: Option<&str>) -> Self {
        let line = err
            .span()
            .map(|span| content[..span.start].matches('\n').count() + 1)
            .unwrap_or(0);
        Self::parse("TOML", path, err.message().to_string(), line_context(content, line, None))
    }

    pub fn from_json_error(err: serde_json::Error, content: &str, path: Option<&str>) -> Self {
        let context = line_context(content, err.line(), Some(err.column()));
        Self::parse("JSON", path, err.to_string(), context)
    }

    fn parse(format: &'static str, path: Option<&str>, message: String, context: String) -> Self {
        Self::Parse {
            format,
            location: path.map(|p| format!(" {}", p)).unwrap_or_default(),
            message,
            context,
        }
    }

    /// Closest option by edit distance, if it is close enough to be a typo
    fn suggest_option(input: &str, options: &[&str]) -> String {
        let input_lower = input.to_lowercase();
        let closest = options
            .iter()
            .min_by_key(|opt| Self::distance(&input_lower, &opt.to_lowercase()));

        match closest {
            Some(opt) if Self::distance(&input_lower, &opt.to_lowercase()) <= 3 => {
                format!("Did you mean '{}'?", opt)
            }
            _ => "See the documented values for this field.".to_string(),
        }
    }

    fn distance(a: &str, b: &str) -> usize {
        let a_chars: Vec<char> = a.chars().collect();
        let b_chars: Vec<char> = b.chars().collect();
        let mut prev_row: Vec<usize> = (0..=b_chars.len()).collect();

        for (i, a_char) in a_chars.iter().enumerate() {
            let mut curr_row = vec![i + 1];
            for (j, b_char) in b_chars.iter().enumerate() {
                let cost = usize::from(a_char != b_char);
                let best = (curr_row[j] + 1)
                    .min(prev_row[j + 1] + 1)
                    .min(prev_row[j] + cost);
                curr_row.push(best);
            }
            prev_row = curr_row;
        }

        *prev_row.last().unwrap_or(&0)
    }
}

/// Render the lines around `line_num` (1-indexed) with a marker on the failing line.
fn line_context(content: &str, line_num: usize, column: Option<usize>) -> String {
    let lines: Vec<&str> = content.lines().collect();
    if line_num == 0 || line_num > lines.len() {
        return String::new();
    }

    let start = line_num.saturating_sub(2);
    let end = (line_num + 1).min(lines.len());

    lines[start..end]
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let num = start + i + 1;
            if num != line_num {
                return format!("  {:3} | {}", num, line);
            }
            let mut marked = format!("→ {:3} | {}", num, line);
            if let Some(col) = column.filter(|c| *c > 0) {
                marked.push_str(&format!("\n      {}^", " ".repeat(col - 1)));
            }
            marked
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_enum_suggests_close_option() {
        let err = ConfigError::invalid_enum("embedding.backend", "olama", &["hash", "ollama", "openai"]);
        let msg = err.to_string();
        assert!(msg.contains("Did you mean 'ollama'?"), "{msg}");
    }

    #[test]
    fn test_toml_error_names_format_and_line() {
        let content = "[chunking]\nmax_lines = \"many\"\n";
        let err = toml::from_str::<crate::Config>(content).unwrap_err();
        let msg = ConfigError::from_toml_error(err, content, Some("semdex.toml")).to_string();
        assert!(msg.starts_with("invalid TOML config semdex.toml:"), "{msg}");
    }

    #[test]
    fn test_invalid_enum_without_close_option() {
        let err = ConfigError::invalid_enum("core.index_backend", "postgres", &["fs", "sled"]);
        assert!(err.to_string().contains("documented values"));
    }

    #[test]
    fn test_line_context_marks_failing_line() {
        let content = "a\nb\nc\nd";
        let ctx = line_context(content, 3, None);
        assert!(ctx.contains("→   3 | c"));
        assert!(ctx.contains("    2 | b"));
    }
}
