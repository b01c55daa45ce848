//! Built-in defaults (layer 1)
//!
//! Typed configuration with its hardcoded default values.

use serde::{Deserialize, Serialize};

/// How repeated keys within one layer block are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep every pair; lookups see the last one.
    #[default]
    LastWins,
    /// Fail with MALFORMED_LAYER_DECLARATION.
    Reject,
}

impl DuplicatePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicatePolicy::LastWins => "last_wins",
            DuplicatePolicy::Reject => "reject",
        }
    }
}

/// Grammar settings used by the inflater.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InflaterConfig {
    /// Prefix of variable declarations and references (default: "@")
    pub variable_marker: String,

    /// Prefix of overlay title lines (default: "#")
    pub title_marker: String,

    /// Prefix of comment lines (default: "//")
    pub comment_marker: String,

    /// Duplicate argument handling (default: last_wins)
    pub duplicate_arguments: DuplicatePolicy,
}

impl Default for InflaterConfig {
    fn default() -> Self {
        Self {
            variable_marker: "@".to_string(),
            title_marker: "#".to_string(),
            comment_marker: "//".to_string(),
            duplicate_arguments: DuplicatePolicy::LastWins,
        }
    }
}

/// CLI output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Human,
}

/// Output settings for the `rhythm` binary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

/// Full configuration, as stored in `rhythm.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RhythmConfig {
    pub grammar: InflaterConfig,
    pub output: OutputConfig,
}

impl RhythmConfig {
    /// Convert to a TOML table for merging
    pub fn to_table(&self) -> toml::Table {
        let mut grammar = toml::Table::new();
        grammar.insert(
            "variable_marker".into(),
            self.grammar.variable_marker.clone().into(),
        );
        grammar.insert("title_marker".into(), self.grammar.title_marker.clone().into());
        grammar.insert(
            "comment_marker".into(),
            self.grammar.comment_marker.clone().into(),
        );
        grammar.insert(
            "duplicate_arguments".into(),
            self.grammar.duplicate_arguments.as_str().into(),
        );

        let mut output = toml::Table::new();
        let format = match self.output.format {
            OutputFormat::Json => "json",
            OutputFormat::Human => "human",
        };
        output.insert("format".into(), format.into());

        let mut table = toml::Table::new();
        table.insert("grammar".into(), toml::Value::Table(grammar));
        table.insert("output".into(), toml::Value::Table(output));
        table
    }
}
