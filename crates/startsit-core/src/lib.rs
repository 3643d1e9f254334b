// Library root: the pure start/sit scoring and lineup pipeline.
//
// Nothing here performs I/O. Callers assemble a roster snapshot, league
// rules and game contexts, then call `pipeline::ScoringEngine`.

pub mod error;
pub mod lineup;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod scoring;
pub mod tables;

pub use error::ScoringError;
pub use pipeline::{LineupMode, Recommendation, ScoredPlayer, ScoringEngine, WeekInputs};
