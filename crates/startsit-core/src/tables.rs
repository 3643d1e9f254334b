// Lookup tables owned by the scoring engine: fallback baselines, ceiling
// weights and tier cutoffs.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::ScoringError;
use crate::model::Position;

/// Composite-score cutoffs, evaluated top-down. Anything below `c` is tier D.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TierCutoffs {
    pub s: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Default for TierCutoffs {
    fn default() -> Self {
        TierCutoffs {
            s: 1.2,
            a: 0.6,
            b: -0.2,
            c: -0.8,
        }
    }
}

/// Immutable tables consulted by the estimator, ceiling calculator and tier
/// classifier. `Default` carries the stock values.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringTables {
    /// Fallback EFP per position when a player has no props.
    pub baselines: HashMap<Position, f64>,
    /// Baseline for positions missing from `baselines`.
    pub default_baseline: f64,
    /// Multiplier applied to the two-plus-TD upside. Missing positions get 0.
    pub ceiling_weights: HashMap<Position, f64>,
    pub tier_cutoffs: TierCutoffs,
}

impl Default for ScoringTables {
    fn default() -> Self {
        let baselines = HashMap::from([
            (Position::Quarterback, 15.0),
            (Position::RunningBack, 10.0),
            (Position::WideReceiver, 8.0),
            (Position::TightEnd, 6.0),
            (Position::Kicker, 8.0),
            (Position::Defense, 8.0),
        ]);
        let ceiling_weights = HashMap::from([
            (Position::RunningBack, 0.8),
            (Position::TightEnd, 0.6),
            (Position::WideReceiver, 0.35),
        ]);
        ScoringTables {
            baselines,
            default_baseline: 5.0,
            ceiling_weights,
            tier_cutoffs: TierCutoffs::default(),
        }
    }
}

impl ScoringTables {
    pub fn baseline(&self, position: Position) -> f64 {
        self.baselines
            .get(&position)
            .copied()
            .unwrap_or(self.default_baseline)
    }

    pub fn ceiling_weight(&self, position: Position) -> f64 {
        self.ceiling_weights.get(&position).copied().unwrap_or(0.0)
    }

    /// Check that every value is finite, ceiling weights are non-negative and
    /// tier cutoffs strictly descend S > A > B > C.
    pub fn validate(&self) -> Result<(), ScoringError> {
        let bad_baseline = self
            .baselines
            .iter()
            .map(|(pos, v)| (pos.display_str(), *v))
            .chain(std::iter::once(("default", self.default_baseline)))
            .find(|(_, v)| !v.is_finite());
        if let Some((pos, v)) = bad_baseline {
            return Err(ScoringError::InvalidTable {
                table: "baselines",
                message: format!("{pos} must be finite, got {v}"),
            });
        }

        for (pos, w) in &self.ceiling_weights {
            if !w.is_finite() || *w < 0.0 {
                return Err(ScoringError::InvalidTable {
                    table: "ceiling_weights",
                    message: format!("{pos} must be finite and >= 0, got {w}"),
                });
            }
        }

        let t = &self.tier_cutoffs;
        let cutoffs = [t.s, t.a, t.b, t.c];
        if cutoffs.iter().any(|v| !v.is_finite()) || !cutoffs.windows(2).all(|w| w[0] > w[1]) {
            return Err(ScoringError::InvalidTable {
                table: "tier_cutoffs",
                message: format!(
                    "must be finite and strictly descending, got s={} a={} b={} c={}",
                    t.s, t.a, t.b, t.c
                ),
            });
        }

        Ok(())
    }
}
