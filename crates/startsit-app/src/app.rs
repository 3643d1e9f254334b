// One pipeline run: load the week, score it, build the report.

use anyhow::Context;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::info;

use startsit_core::{LineupMode, ScoringEngine};

use crate::config::{Config, ModeSetting, OutputFormat};
use crate::output::RecommendationReport;
use crate::snapshot;

/// Effective settings for a run after CLI overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub snapshot: PathBuf,
    pub props_csv: Option<PathBuf>,
    pub mode: ModeSetting,
    pub format: OutputFormat,
}

impl RunOptions {
    /// Defaults from the config. Relative data paths resolve against `base_dir`.
    pub fn from_config(config: &Config, base_dir: &Path) -> Self {
        RunOptions {
            snapshot: base_dir.join(&config.data_paths.snapshot),
            props_csv: config.data_paths.props_csv.as_ref().map(|p| base_dir.join(p)),
            mode: config.strategy.mode,
            format: config.strategy.format,
        }
    }
}

/// Load the snapshot named in `options`, run the scoring pipeline and build
/// the report.
pub fn run(config: &Config, options: &RunOptions) -> anyhow::Result<RecommendationReport> {
    let engine = ScoringEngine::new(config.scoring, config.strategy.tables.clone())
        .context("invalid scoring configuration")?;

    let week = snapshot::load_week(&options.snapshot, options.props_csv.as_deref())
        .with_context(|| format!("failed to load week snapshot {}", options.snapshot.display()))?;

    let mode = match options.mode {
        ModeSetting::Optimal => LineupMode::Optimal(config.lineup.clone()),
        ModeSetting::Actual => LineupMode::Actual,
    };
    let recommendation = engine.recommend(&week.inputs(), &mode);

    info!(
        "{} mode: {} starters, {} bench, {} flex swaps suggested",
        options.mode.as_str(),
        recommendation.lineup.starters.len(),
        recommendation.lineup.bench.len(),
        recommendation.flex_swaps.len()
    );

    let team = week.team.clone().or_else(|| config.league.team.clone());
    Ok(RecommendationReport::new(
        &recommendation,
        team,
        week.week,
        options.mode,
        Utc::now(),
    ))
}
