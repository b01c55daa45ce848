//! Effective configuration with provenance
//!
//! Captures the merged configuration plus the sources it was built from.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tracing::debug;

use super::defaults::{InflaterConfig, RhythmConfig};
use super::merge::merge_layers;

/// Origin of a configuration source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    File,
    Cli,
}

/// A contributing config source with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSource {
    pub origin: ConfigOrigin,

    /// File path (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

impl ConfigSource {
    fn unbacked(origin: ConfigOrigin) -> Self {
        Self {
            origin,
            path: None,
            digest: None,
        }
    }
}

/// Merged configuration and where it came from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub config: RhythmConfig,

    /// Contributing sources in precedence order
    pub sources: Vec<ConfigSource>,
}

impl EffectiveConfig {
    /// Build the effective config: built-in defaults, then the TOML file at
    /// `config_path` (skipped when it doesn't exist), then CLI overrides.
    pub fn build(
        config_path: Option<&Path>,
        cli_overrides: Option<toml::Table>,
    ) -> Result<Self, ConfigError> {
        let mut layers = vec![RhythmConfig::default().to_table()];
        let mut sources = vec![ConfigSource::unbacked(ConfigOrigin::Builtin)];

        if let Some(path) = config_path {
            if path.exists() {
                let (table, digest) = Self::load_toml_file(path)?;
                debug!(path = %path.display(), digest = %digest, "loaded config file");
                layers.push(table);
                sources.push(ConfigSource {
                    origin: ConfigOrigin::File,
                    path: Some(path.to_string_lossy().to_string()),
                    digest: Some(digest),
                });
            } else {
                debug!(path = %path.display(), "config file not found, skipping");
            }
        }

        if let Some(cli) = cli_overrides {
            if !cli.is_empty() {
                layers.push(cli);
                sources.push(ConfigSource::unbacked(ConfigOrigin::Cli));
            }
        }

        let merged = merge_layers(layers);
        let config: RhythmConfig = toml::Value::Table(merged)
            .try_into()
            .map_err(|e| ConfigError::ParseError(format!("invalid configuration: {}", e)))?;

        Self::validate_grammar(&config.grammar)?;

        Ok(Self { config, sources })
    }

    /// Load and parse a TOML file, returning the table and digest
    fn load_toml_file(path: &Path) -> Result<(toml::Table, String), ConfigError> {
        let bytes = fs::read(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hex::encode(hasher.finalize());

        let contents = String::from_utf8(bytes)
            .map_err(|e| ConfigError::ParseError(format!("Invalid UTF-8: {}", e)))?;
        let table: toml::Table = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;

        Ok((table, digest))
    }

    /// Markers must be non-empty, free of whitespace, and distinct from each other.
    fn validate_grammar(grammar: &InflaterConfig) -> Result<(), ConfigError> {
        let markers = [
            ("variable_marker", grammar.variable_marker.as_str()),
            ("title_marker", grammar.title_marker.as_str()),
            ("comment_marker", grammar.comment_marker.as_str()),
        ];

        for (name, marker) in markers {
            if marker.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "grammar.{} must not be empty",
                    name
                )));
            }
            if marker.chars().any(char::is_whitespace) {
                return Err(ConfigError::ValidationError(format!(
                    "grammar.{} must not contain whitespace",
                    name
                )));
            }
        }

        for (i, (name, marker)) in markers.iter().enumerate() {
            for (other_name, other) in &markers[i + 1..] {
                if marker == other {
                    return Err(ConfigError::ValidationError(format!(
                        "grammar.{} and grammar.{} must differ (both '{}')",
                        name, other_name, marker
                    )));
                }
            }
        }

        Ok(())
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
