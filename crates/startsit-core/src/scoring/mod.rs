// Scoring stages: EFP estimation, ceiling bonus, composite score, tiers and
// explanations.

pub mod ceiling;
pub mod composite;
pub mod estimator;
pub mod reasons;
pub mod tiers;

/// Spread (in points) at which a game is expected to tilt run- or pass-heavy.
pub const SCRIPT_SPREAD_THRESHOLD: f64 = 4.5;

/// League-average team score used to center implied-total adjustments.
pub const NEUTRAL_IMPLIED_TOTAL: f64 = 21.0;
