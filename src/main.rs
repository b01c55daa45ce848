//! Rhythm CLI
//!
//! Entry point for the `rhythm` command-line tool.

use clap::{Parser, Subcommand};
use rhythm_inflater::config::{EffectiveConfig, OutputFormat};
use rhythm_inflater::{builtin_registry, InflationError, Overlay, OverlayInflater, SpecLayer};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Config file used when `--config` is not given.
const DEFAULT_CONFIG_PATH: &str = "rhythm.toml";

#[derive(Parser)]
#[command(name = "rhythm")]
#[command(about = "Inflate declarative overlay configs into typed layers", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Override the variable marker (default: "@")
    #[arg(long, global = true)]
    variable_marker: Option<String>,

    /// Override the title marker (default: "#")
    #[arg(long, global = true)]
    title_marker: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Inflate a config and print its overlays
    Inflate {
        /// Config to inflate, or "-" for stdin
        file: PathBuf,

        /// Path to settings file (default: rhythm.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Output in human-readable format instead of JSON
        #[arg(long)]
        human: bool,
    },

    /// Check that a config inflates, without printing it
    Check {
        /// Config to check, or "-" for stdin
        file: PathBuf,

        /// Path to settings file (default: rhythm.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },

    /// List the registered layer types
    Types,

    /// Print the effective settings
    Config {
        /// Path to settings file (default: rhythm.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let overrides = cli_overrides(&cli);

    match cli.command {
        Commands::Inflate {
            file,
            config,
            human,
        } => {
            run_inflate(&file, config, overrides, human);
        }
        Commands::Check { file, config } => {
            run_check(&file, config, overrides);
        }
        Commands::Types => {
            run_types();
        }
        Commands::Config { config } => {
            run_config(config, overrides);
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .init();
}

/// Marker flags as a `[grammar]` override table.
fn cli_overrides(cli: &Cli) -> toml::Table {
    let mut grammar = toml::Table::new();
    if let Some(ref marker) = cli.variable_marker {
        grammar.insert("variable_marker".into(), marker.clone().into());
    }
    if let Some(ref marker) = cli.title_marker {
        grammar.insert("title_marker".into(), marker.clone().into());
    }

    let mut overrides = toml::Table::new();
    if !grammar.is_empty() {
        overrides.insert("grammar".into(), toml::Value::Table(grammar));
    }
    overrides
}

fn load_config(config_path: Option<PathBuf>, overrides: toml::Table) -> EffectiveConfig {
    let path = config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    match EffectiveConfig::build(Some(&path), Some(overrides)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            process::exit(1);
        }
    }
}

fn inflate_file(
    file: &Path,
    effective: &EffectiveConfig,
) -> Result<Vec<Overlay<SpecLayer>>, InflationError> {
    let inflater = OverlayInflater::new(Arc::new(builtin_registry()))
        .with_config(effective.config.grammar.clone());

    if file == Path::new("-") {
        return inflater.inflate_reader(io::stdin().lock());
    }

    match File::open(file) {
        Ok(f) => inflater.inflate_reader(BufReader::new(f)),
        Err(e) => {
            eprintln!("Error reading {}: {}", file.display(), e);
            process::exit(1);
        }
    }
}

fn run_inflate(file: &Path, config_path: Option<PathBuf>, overrides: toml::Table, human: bool) {
    let effective = load_config(config_path, overrides);
    let human = human || effective.config.output.format == OutputFormat::Human;

    match inflate_file(file, &effective) {
        Ok(overlays) => {
            if human {
                println!("{}", overlays_to_human(&overlays));
            } else {
                match serde_json::to_string_pretty(&overlays) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error serializing output: {}", e);
                        process::exit(1);
                    }
                }
            }
        }
        Err(err) => {
            if human {
                eprintln!("Inflation failed: {}", err);
            } else {
                match serde_json::to_string_pretty(&err.to_report()) {
                    Ok(json) => println!("{}", json),
                    Err(e) => eprintln!("Error serializing output: {}", e),
                }
            }
            process::exit(1);
        }
    }
}

fn run_check(file: &Path, config_path: Option<PathBuf>, overrides: toml::Table) {
    let effective = load_config(config_path, overrides);

    match inflate_file(file, &effective) {
        Ok(overlays) => {
            let layers: usize = overlays.iter().map(Overlay::len).sum();
            println!(
                "OK: {} overlay(s), {} layer(s) in {}",
                overlays.len(),
                layers,
                file.display()
            );
        }
        Err(err) => {
            eprintln!("{}: {}", file.display(), err);
            process::exit(1);
        }
    }
}

fn run_types() {
    for layer_type in builtin_registry().known_types() {
        println!("{}", layer_type);
    }
}

fn run_config(config_path: Option<PathBuf>, overrides: toml::Table) {
    let effective = load_config(config_path, overrides);

    match effective.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing config: {}", e);
            process::exit(1);
        }
    }
}

fn overlays_to_human(overlays: &[Overlay<SpecLayer>]) -> String {
    if overlays.is_empty() {
        return "No overlays.".to_string();
    }

    let mut lines = Vec::new();
    for (index, overlay) in overlays.iter().enumerate() {
        let title = overlay.title().unwrap_or("(untitled)");
        lines.push(format!(
            "Overlay {}: {} ({} layers)",
            index + 1,
            title,
            overlay.len()
        ));

        for layer in overlay.layers() {
            let fields = match serde_json::to_value(layer) {
                Ok(serde_json::Value::Object(map)) => map
                    .iter()
                    .filter(|(key, _)| key.as_str() != "type")
                    .map(|(key, value)| format!("{}={}", key, value))
                    .collect::<Vec<_>>()
                    .join(" "),
                _ => String::new(),
            };
            lines.push(format!("  {} {}", layer.type_name(), fields));
        }
    }
    lines.join("\n")
}
