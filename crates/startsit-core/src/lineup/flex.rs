// Flex-swap advice: bench RB/WR/TE who would clearly outscore the current
// FLEX starter.

use serde::Serialize;

use crate::lineup::{Lineup, LineupSlot};
use crate::model::Slot;

/// Minimum composite-score gain before a swap is worth suggesting.
pub const MIN_SWAP_GAIN: f64 = 1.0;

pub const MAX_SWAP_SUGGESTIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlexSwap {
    /// Starter to move to the bench.
    pub out: String,
    /// Bench player to start in the FLEX slot.
    #[serde(rename = "in")]
    pub into: String,
    pub improvement: f64,
}

/// Scan worst FLEX starter first against best eligible bench player first
/// and suggest swaps that gain more than [`MIN_SWAP_GAIN`].
///
/// Suggestions are mutually exclusive: a starter or bench player appears in
/// at most one suggestion. At most [`MAX_SWAP_SUGGESTIONS`] are returned.
pub fn suggest_flex_swaps(lineup: &Lineup) -> Vec<FlexSwap> {
    let mut flex_starters: Vec<&LineupSlot> = lineup
        .starters
        .iter()
        .filter(|s| s.slot == Slot::Flex && s.player.player.position.is_flex_eligible())
        .collect();
    flex_starters.sort_by(|a, b| {
        a.player
            .score
            .partial_cmp(&b.player.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut candidates: Vec<&LineupSlot> = lineup
        .bench
        .iter()
        .filter(|s| s.player.player.position.is_flex_eligible())
        .collect();
    candidates.sort_by(|a, b| {
        b.player
            .score
            .partial_cmp(&a.player.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut taken = vec![false; candidates.len()];
    let mut swaps = Vec::new();

    'starters: for starter in flex_starters {
        for (i, candidate) in candidates.iter().enumerate() {
            if taken[i] {
                continue;
            }
            let gain = candidate.player.score - starter.player.score;
            if gain > MIN_SWAP_GAIN {
                taken[i] = true;
                swaps.push(FlexSwap {
                    out: starter.player.player.name.clone(),
                    into: candidate.player.player.name.clone(),
                    improvement: gain,
                });
                if swaps.len() == MAX_SWAP_SUGGESTIONS {
                    break 'starters;
                }
                continue 'starters;
            }
        }
    }

    swaps
}
