//! Configuration system
//!
//! Settings are merged in three layers, last wins:
//! 1. Built-in defaults
//! 2. Config file (`rhythm.toml`, or the path given with `--config`)
//! 3. CLI flags

mod defaults;
mod effective;
mod merge;

pub use defaults::{DuplicatePolicy, InflaterConfig, OutputConfig, OutputFormat, RhythmConfig};
pub use effective::{ConfigError, ConfigOrigin, ConfigSource, EffectiveConfig};
pub use merge::{merge_layers, merge_tables};
