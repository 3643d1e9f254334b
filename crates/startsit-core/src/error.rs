// Error types for the scoring pipeline.
//
// Only malformed configuration is an error here. Missing props, missing game
// context and zero-variance cohorts are modeled outcomes, not failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("scoring rule `{field}` must be finite, got {value}")]
    InvalidRule { field: &'static str, value: f64 },

    #[error("invalid {table} table: {message}")]
    InvalidTable { table: &'static str, message: String },

    #[error("unknown lineup slot label `{label}`")]
    UnknownSlot { label: String },
}
