// Lineup construction: starter/bench partitioning and flex-swap advice.

pub mod assign;
pub mod flex;

use crate::model::Slot;
use crate::pipeline::ScoredPlayer;

/// A scored player together with the slot it fills in a lineup.
#[derive(Debug, Clone)]
pub struct LineupSlot {
    pub slot: Slot,
    pub player: ScoredPlayer,
}

/// The scored cohort split into starters and bench.
#[derive(Debug, Clone, Default)]
pub struct Lineup {
    pub starters: Vec<LineupSlot>,
    pub bench: Vec<LineupSlot>,
}

impl Lineup {
    pub fn len(&self) -> usize {
        self.starters.len() + self.bench.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starters.is_empty() && self.bench.is_empty()
    }
}
