//! Environment override loading
//!
//! Turns an optional file path into an ordered list of environment
//! variables. Two formats are supported, dispatched once by extension:
//! `.json` files are parsed as a flat key/value object, `.env` and
//! extension-less files as line-oriented `KEY=VALUE` text. Any other
//! extension is a configuration error, raised before any network call.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::task_definition::EnvVar;

/// Where the environment override comes from, decided once at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvSource {
    /// No file supplied: the existing container environment is kept
    None,
    /// Flat JSON object
    Structured(PathBuf),
    /// Line-oriented `KEY=VALUE` text with `#` comments
    LineOriented(PathBuf),
}

impl EnvSource {
    /// Classifies an optional path into an [`EnvSource`].
    pub fn from_path(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::None);
        };

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Structured(path.to_path_buf())),
            Some("env") | None => Ok(Self::LineOriented(path.to_path_buf())),
            Some(_) => Err(ConfigError::UnsupportedEnvFile {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Loads the override as ordered {name, value} pairs.
    ///
    /// An empty result means "no override"; callers distinguish by length,
    /// not by option-ness.
    pub fn load(&self) -> Result<Vec<EnvVar>, ConfigError> {
        match self {
            Self::None => Ok(Vec::new()),
            Self::Structured(path) => {
                let text = read(path)?;
                parse_structured(&text).map_err(|source| ConfigError::MalformedEnvFile {
                    path: path.clone(),
                    source,
                })
            }
            Self::LineOriented(path) => {
                let text = read(path)?;
                Ok(parse_line_oriented(&text))
            }
        }
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::UnreadableEnvFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses a flat JSON object; every top-level key becomes one variable.
/// String values are used verbatim, everything else is coerced to its JSON
/// string form.
fn parse_structured(text: &str) -> Result<Vec<EnvVar>, serde_json::Error> {
    let document: serde_json::Map<String, Value> = serde_json::from_str(text)?;

    Ok(document
        .into_iter()
        .map(|(name, value)| {
            let value = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            EnvVar { name, value }
        })
        .collect())
}

/// Parses line-oriented `KEY=VALUE` text.
///
/// Lines are trimmed; blank lines and `#` comments are skipped. The rest is
/// split on the first `=`: the left side is the name, the right side (or
/// the empty string when there is no `=`) is the value.
fn parse_line_oriented(text: &str) -> Vec<EnvVar> {
    text.lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            let (name, value) = line.split_once('=').unwrap_or((line, ""));
            Some(EnvVar::new(name, value))
        })
        .collect()
}
