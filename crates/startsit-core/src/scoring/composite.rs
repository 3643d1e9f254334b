// Composite score: EFP z-score within the position cohort plus weighted
// game-script, implied-total and injury modifiers.

use std::collections::HashMap;

use crate::model::{InjuryStatus, Position, TeamOutlook};
use crate::scoring::{NEUTRAL_IMPLIED_TOTAL, SCRIPT_SPREAD_THRESHOLD};

// ---------------------------------------------------------------------------
// Pool statistics
// ---------------------------------------------------------------------------

/// Mean and standard deviation of EFP across one position cohort.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolStats {
    pub mean: f64,
    pub stdev: f64,
}

/// Threshold below which standard deviation is treated as zero.
const STDEV_EPSILON: f64 = 1e-9;

/// Compute mean and standard deviation for a slice of values.
///
/// Returns `PoolStats { mean: 0.0, stdev: 0.0 }` for an empty slice.
/// Uses the population standard deviation (N denominator): the cohort is every
/// playable rostered player at the position, not a sample.
pub fn compute_pool_stats(values: &[f64]) -> PoolStats {
    if values.is_empty() {
        return PoolStats {
            mean: 0.0,
            stdev: 0.0,
        };
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    PoolStats {
        mean,
        stdev: variance.sqrt(),
    }
}

/// Compute a z-score given a value and pool stats.
///
/// Returns 0.0 if the standard deviation is approximately zero (all cohort
/// members equal, or a single member).
pub fn compute_zscore(value: f64, stats: &PoolStats) -> f64 {
    if stats.stdev < STDEV_EPSILON {
        return 0.0;
    }
    (value - stats.mean) / stats.stdev
}

/// Per-position pool stats for one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct CohortStats {
    by_position: HashMap<Position, PoolStats>,
}

impl CohortStats {
    /// Group `(position, efp)` pairs by position and compute stats per group.
    ///
    /// Callers pass only playable (non-bye) players.
    pub fn from_members<I>(members: I) -> Self
    where
        I: IntoIterator<Item = (Position, f64)>,
    {
        let mut grouped: HashMap<Position, Vec<f64>> = HashMap::new();
        for (pos, efp) in members {
            grouped.entry(pos).or_default().push(efp);
        }
        let by_position = grouped
            .into_iter()
            .map(|(pos, values)| (pos, compute_pool_stats(&values)))
            .collect();
        CohortStats { by_position }
    }

    pub fn get(&self, position: Position) -> Option<&PoolStats> {
        self.by_position.get(&position)
    }

    /// z-score of `efp` against the position's cohort; 0.0 if the cohort is empty.
    pub fn zscore(&self, position: Position, efp: f64) -> f64 {
        self.get(position)
            .map(|stats| compute_zscore(efp, stats))
            .unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

pub const SCRIPT_WEIGHT: f64 = 0.35;
pub const IMPLIED_TOTAL_WEIGHT: f64 = 0.25;
pub const INJURY_WEIGHT: f64 = 0.20;

/// Penalty large enough to sink a ruled-out player below every cutoff.
pub const RULED_OUT_PENALTY: f64 = -999.0;

/// Game-script lean: RB +0.6 when favored by 4.5+, WR/TE +0.6 when an
/// underdog by 4.5+, QB +0.4 when favored at all.
pub fn script_bonus(position: Position, outlook: &TeamOutlook) -> f64 {
    match position {
        Position::RunningBack if outlook.favored_by(SCRIPT_SPREAD_THRESHOLD) => 0.6,
        Position::WideReceiver | Position::TightEnd
            if outlook.underdog_by(SCRIPT_SPREAD_THRESHOLD) =>
        {
            0.6
        }
        Position::Quarterback if outlook.is_favored() => 0.4,
        _ => 0.0,
    }
}

/// `(implied_total - 21) / 7`; negative for low-scoring environments.
pub fn implied_total_bonus(outlook: &TeamOutlook) -> f64 {
    (outlook.implied_total - NEUTRAL_IMPLIED_TOTAL) / 7.0
}

pub fn injury_penalty(status: InjuryStatus) -> f64 {
    match status {
        InjuryStatus::Questionable => -0.3,
        InjuryStatus::Doubtful => -0.8,
        s if s.is_ruled_out() => RULED_OUT_PENALTY,
        _ => 0.0,
    }
}

// ---------------------------------------------------------------------------
// Composite score
// ---------------------------------------------------------------------------

/// The terms that make up a composite score, kept for explanations and tests.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreBreakdown {
    pub z: f64,
    pub script_bonus: f64,
    pub implied_total_bonus: f64,
    pub injury_penalty: f64,
    pub total: f64,
}

/// Score one player against its position cohort.
///
/// A player without a game (bye week) scores exactly 0 with every term 0.
pub fn composite_score(
    efp: f64,
    position: Position,
    status: InjuryStatus,
    outlook: Option<&TeamOutlook>,
    cohort: &CohortStats,
) -> ScoreBreakdown {
    let Some(outlook) = outlook else {
        return ScoreBreakdown::default();
    };

    let z = cohort.zscore(position, efp);
    let script = script_bonus(position, outlook);
    let it = implied_total_bonus(outlook);
    let injury = injury_penalty(status);

    let total = z + SCRIPT_WEIGHT * script + IMPLIED_TOTAL_WEIGHT * it + INJURY_WEIGHT * injury;

    ScoreBreakdown {
        z,
        script_bonus: script,
        implied_total_bonus: it,
        injury_penalty: injury,
        total,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
