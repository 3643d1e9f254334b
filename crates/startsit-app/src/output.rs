// Final report: the core's lineup records stamped with run metadata, rendered
// as pretty JSON or as the flat CSV export.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

use startsit_core::report::LineupReport;
use startsit_core::Recommendation;

use crate::config::{ModeSetting, OutputFormat};

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("failed to serialize JSON report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write CSV report: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// The document written by the `startsit` binary.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationReport {
    pub generated_at: DateTime<Utc>,
    pub team: Option<String>,
    pub week: Option<u32>,
    pub mode: &'static str,
    #[serde(flatten)]
    pub lineup: LineupReport,
}

impl RecommendationReport {
    pub fn new(
        recommendation: &Recommendation,
        team: Option<String>,
        week: Option<u32>,
        mode: ModeSetting,
        generated_at: DateTime<Utc>,
    ) -> Self {
        RecommendationReport {
            generated_at,
            team,
            week,
            mode: mode.as_str(),
            lineup: LineupReport::from(recommendation),
        }
    }

    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<(), OutputError> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        Ok(())
    }

    /// CSV carries only the player rows; metadata and swaps are JSON-only.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), OutputError> {
        self.lineup.write_csv(writer)?;
        Ok(())
    }

    pub fn write<W: Write>(&self, format: OutputFormat, writer: W) -> Result<(), OutputError> {
        match format {
            OutputFormat::Json => self.write_json(writer),
            OutputFormat::Csv => self.write_csv(writer),
        }
    }
}
