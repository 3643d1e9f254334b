// Configuration loading and parsing (league.toml, strategy.toml).

use clap::ValueEnum;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use startsit_core::lineup::assign::SlotRequirements;
use startsit_core::model::{Position, ScoringRules};
use startsit_core::tables::{ScoringTables, TierCutoffs};
use startsit_core::ScoringError;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

impl From<ScoringError> for ConfigError {
    fn from(err: ScoringError) -> Self {
        match err {
            ScoringError::InvalidRule { field, value } => ConfigError::ValidationError {
                field: format!("scoring.{field}"),
                message: format!("must be finite, got {value}"),
            },
            ScoringError::InvalidTable { table, message } => ConfigError::ValidationError {
                field: format!("tables.{table}"),
                message,
            },
            ScoringError::UnknownSlot { label } => ConfigError::ValidationError {
                field: format!("lineup.{label}"),
                message: "unknown slot label".into(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub scoring: ScoringRules,
    pub lineup: SlotRequirements,
    pub strategy: StrategyConfig,
    pub data_paths: DataPaths,
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
    scoring: ScoringRules,
    lineup: HashMap<String, usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
    /// Fantasy team name shown in reports. Overridden by the snapshot's team.
    #[serde(default)]
    pub team: Option<String>,
}

// ---------------------------------------------------------------------------
// strategy.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModeSetting {
    /// Greedily fill the league's slot requirements by composite score.
    Optimal,
    /// Keep the roster's current starters.
    Actual,
}

impl ModeSetting {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeSetting::Optimal => "optimal",
            ModeSetting::Actual => "actual",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Csv,
}

#[derive(Debug, Clone)]
pub struct StrategyConfig {
    pub mode: ModeSetting,
    pub format: OutputFormat,
    pub tables: ScoringTables,
}

#[derive(Debug, Clone, Deserialize)]
struct StrategyFile {
    pipeline: PipelineSection,
    output: OutputSection,
    #[serde(default)]
    tables: TablesSection,
    data_paths: DataPaths,
}

#[derive(Debug, Clone, Deserialize)]
struct PipelineSection {
    mode: ModeSetting,
}

#[derive(Debug, Clone, Deserialize)]
struct OutputSection {
    format: OutputFormat,
}

/// Partial override of the stock scoring tables. Position keys use the same
/// labels as the snapshot (`QB`, `RB`, `DST`, ...).
#[derive(Debug, Clone, Default, Deserialize)]
struct TablesSection {
    #[serde(default)]
    baselines: HashMap<String, f64>,
    default_baseline: Option<f64>,
    #[serde(default)]
    ceiling_weights: HashMap<String, f64>,
    tier_cutoffs: Option<TierCutoffs>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub snapshot: String,
    #[serde(default)]
    pub props_csv: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` and
/// `config/strategy.toml` relative to the given `base_dir`.
///
/// Missing files are an error here; [`load_config`] creates them first.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- league.toml (required) ---
    let league_path = config_dir.join("league.toml");
    let league_text = read_file(&league_path)?;
    let league_file: LeagueFile =
        toml::from_str(&league_text).map_err(|e| ConfigError::ParseError {
            path: league_path.clone(),
            source: e,
        })?;

    // --- strategy.toml (required) ---
    let strategy_path = config_dir.join("strategy.toml");
    let strategy_text = read_file(&strategy_path)?;
    let strategy_file: StrategyFile =
        toml::from_str(&strategy_text).map_err(|e| ConfigError::ParseError {
            path: strategy_path.clone(),
            source: e,
        })?;

    let lineup = SlotRequirements::from_labels(&league_file.lineup)?;
    let tables = build_tables(strategy_file.tables)?;

    let config = Config {
        league: league_file.league,
        scoring: league_file.scoring,
        lineup,
        strategy: StrategyConfig {
            mode: strategy_file.pipeline.mode,
            format: strategy_file.output.format,
            tables,
        },
        data_paths: strategy_file.data_paths,
    };

    validate(&config)?;

    Ok(config)
}

/// Config files every run needs, with the stock contents built into the
/// binary for first runs outside a checkout.
const CONFIG_FILES: [(&str, &str); 2] = [
    ("league.toml", include_str!("../defaults/league.toml")),
    ("strategy.toml", include_str!("../defaults/strategy.toml")),
];

/// Create any missing `config/league.toml` or `config/strategy.toml` under
/// `base_dir`. Each file is copied from `defaults/` when present there, or
/// written from the built-in stock copy otherwise. Existing files are never
/// touched. Returns the files that were created.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create {}: {e}", config_dir.display()),
    })?;

    let mut created = Vec::new();
    for (name, builtin) in CONFIG_FILES {
        let target = config_dir.join(name);
        let mut dest = match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(dest) => dest,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        };

        let source = defaults_dir.join(name);
        let content = if source.is_file() {
            std::fs::read(&source).map_err(|e| ConfigError::DefaultsCopyError {
                message: format!("failed to read {}: {e}", source.display()),
            })?
        } else {
            builtin.as_bytes().to_vec()
        };
        std::io::Write::write_all(&mut dest, &content).map_err(|e| {
            ConfigError::DefaultsCopyError {
                message: format!("failed to write {}: {e}", target.display()),
            }
        })?;
        created.push(target);
    }

    Ok(created)
}

/// Pick the directory that holds `config/` and `defaults/`: the working
/// directory when it has either, otherwise the platform config directory.
pub fn resolve_base_dir() -> Result<PathBuf, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    if cwd.join("config").exists() || cwd.join("defaults").exists() {
        return Ok(cwd);
    }
    match directories::ProjectDirs::from("", "", "startsit") {
        Some(dirs) => Ok(dirs.config_dir().to_path_buf()),
        None => Ok(cwd),
    }
}

/// A loaded config plus where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    /// Directory relative data paths resolve against.
    pub base_dir: PathBuf,
    /// Config files created on this run.
    pub created: Vec<PathBuf>,
}

/// Resolve the base directory (unless given), create missing config files and
/// load the config.
pub fn load_config(base_dir: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    let base_dir = match base_dir {
        Some(dir) => dir.to_path_buf(),
        None => resolve_base_dir()?,
    };
    let created = ensure_config_files(&base_dir)?;
    let config = load_config_from(&base_dir)?;
    Ok(LoadedConfig {
        config,
        base_dir,
        created,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

/// Apply a `[tables]` override on top of the stock tables.
fn build_tables(section: TablesSection) -> Result<ScoringTables, ConfigError> {
    let mut tables = ScoringTables::default();

    for (label, value) in section.baselines {
        let pos = parse_position("tables.baselines", &label)?;
        tables.baselines.insert(pos, value);
    }
    for (label, value) in section.ceiling_weights {
        let pos = parse_position("tables.ceiling_weights", &label)?;
        tables.ceiling_weights.insert(pos, value);
    }
    if let Some(v) = section.default_baseline {
        tables.default_baseline = v;
    }
    if let Some(cutoffs) = section.tier_cutoffs {
        tables.tier_cutoffs = cutoffs;
    }

    Ok(tables)
}

fn parse_position(table: &str, label: &str) -> Result<Position, ConfigError> {
    Position::from_str_pos(label).ok_or_else(|| ConfigError::ValidationError {
        field: format!("{table}.{label}"),
        message: "unknown position".into(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.league.name.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "league.name".into(),
            message: "must not be empty".into(),
        });
    }

    config.scoring.validate()?;
    config.strategy.tables.validate()?;

    if config.data_paths.snapshot.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data_paths.snapshot".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
