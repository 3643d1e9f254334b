// Starter/bench partitioning: either mirror the roster's current slots or
// greedily fill slot requirements by composite score.

use std::collections::HashMap;

use tracing::debug;

use crate::error::ScoringError;
use crate::lineup::{Lineup, LineupSlot};
use crate::model::Slot;
use crate::pipeline::ScoredPlayer;

// ---------------------------------------------------------------------------
// Slot requirements
// ---------------------------------------------------------------------------

/// Starting slot counts, e.g. QB:1, RB:2, WR:2, TE:1, FLEX:1, K:1, DEF:1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotRequirements {
    counts: HashMap<Slot, usize>,
}

impl SlotRequirements {
    /// Build requirements from a label -> count map.
    ///
    /// Bench and injured-reserve labels are accepted (league configs often
    /// list them) but ignored, since they never hold starters. Unknown labels
    /// are rejected.
    pub fn from_labels(labels: &HashMap<String, usize>) -> Result<Self, ScoringError> {
        let mut counts: HashMap<Slot, usize> = HashMap::new();
        for (label, &count) in labels {
            let slot = Slot::from_str_slot(label).ok_or_else(|| ScoringError::UnknownSlot {
                label: label.clone(),
            })?;
            if !slot.is_starting() {
                debug!("ignoring non-starting slot `{}` in lineup requirements", label);
                continue;
            }
            *counts.entry(slot).or_insert(0) += count;
        }
        Ok(SlotRequirements { counts })
    }

    pub fn with_slot(mut self, slot: Slot, count: usize) -> Self {
        self.counts.insert(slot, count);
        self
    }

    pub fn count(&self, slot: Slot) -> usize {
        self.counts.get(&slot).copied().unwrap_or(0)
    }

    /// Total number of starters these requirements call for.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

// ---------------------------------------------------------------------------
// Actual-lineup mode
// ---------------------------------------------------------------------------

/// Partition by the roster's own slots: bench and IR go to the bench,
/// everything else starts. No reassignment happens.
pub fn actual_lineup(players: &[ScoredPlayer]) -> Lineup {
    let (starters, bench): (Vec<LineupSlot>, Vec<LineupSlot>) = players
        .iter()
        .map(|p| LineupSlot {
            slot: p.player.slot,
            player: p.clone(),
        })
        .partition(|s| s.slot.is_starting());
    Lineup { starters, bench }
}

// ---------------------------------------------------------------------------
// Optimal-fill mode
// ---------------------------------------------------------------------------

/// Greedy fill: walk players by composite score descending and place each in
/// the first open slot it qualifies for.
///
/// Slot priority per player:
/// 1. Dedicated position slot
/// 2. FLEX slot (RB/WR/TE only)
/// 3. Bench (players already on IR keep the IR label)
///
/// Ties keep input order (stable sort).
pub fn optimal_lineup(players: &[ScoredPlayer], requirements: &SlotRequirements) -> Lineup {
    let mut ranked: Vec<&ScoredPlayer> = players.iter().collect();
    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut remaining: HashMap<Slot, usize> = HashMap::new();
    let mut open = |slot: Slot| -> bool {
        let left = remaining
            .entry(slot)
            .or_insert_with(|| requirements.count(slot));
        if *left > 0 {
            *left -= 1;
            true
        } else {
            false
        }
    };

    let mut starters = Vec::new();
    let mut bench = Vec::new();

    for p in ranked {
        let position = p.player.position;
        let slot = if open(Slot::Position(position)) {
            Some(Slot::Position(position))
        } else if position.is_flex_eligible() && open(Slot::Flex) {
            Some(Slot::Flex)
        } else {
            None
        };

        match slot {
            Some(slot) => starters.push(LineupSlot {
                slot,
                player: p.clone(),
            }),
            None => {
                let slot = if p.player.slot == Slot::InjuredReserve {
                    Slot::InjuredReserve
                } else {
                    Slot::Bench
                };
                bench.push(LineupSlot {
                    slot,
                    player: p.clone(),
                });
            }
        }
    }

    debug!(
        "optimal fill: {} starters of {} required, {} bench",
        starters.len(),
        requirements.total(),
        bench.len()
    );

    Lineup { starters, bench }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lineup::test_support::scored;
    use crate::model::Position;

    fn names(slots: &[LineupSlot]) -> Vec<&str> {
        slots.iter().map(|s| s.player.player.name.as_str()).collect()
    }

    fn standard_requirements() -> SlotRequirements {
        let labels: HashMap<String, usize> = [
            ("QB", 1),
            ("RB", 2),
            ("WR", 2),
            ("TE", 1),
            ("FLEX", 1),
            ("K", 1),
            ("DEF", 1),
            ("BN", 6),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        SlotRequirements::from_labels(&labels).unwrap()
    }

    fn slot_counts(lineup: &Lineup) -> HashMap<Slot, usize> {
        let mut counts = HashMap::new();
        for s in &lineup.starters {
            *counts.entry(s.slot).or_insert(0) += 1;
        }
        counts
    }

    // ---- Requirements ----

    #[test]
    fn requirements_ignore_bench_labels() {
        let req = standard_requirements();
        assert_eq!(req.count(Slot::Bench), 0);
        assert_eq!(req.count(Slot::Flex), 1);
        assert_eq!(req.count(Slot::Position(Position::RunningBack)), 2);
        assert_eq!(req.total(), 9);
    }

    #[test]
    fn requirements_reject_unknown_label() {
        let labels: HashMap<String, usize> = [("SUPERFLEX".to_string(), 1)].into_iter().collect();
        match SlotRequirements::from_labels(&labels) {
            Err(ScoringError::UnknownSlot { label }) => assert_eq!(label, "SUPERFLEX"),
            other => panic!("expected UnknownSlot, got {other:?}"),
        }
    }

    // ---- Actual mode ----

    #[test]
    fn actual_mode_follows_roster_slots() {
        let players = vec![
            scored("QB1", Position::Quarterback, Slot::Position(Position::Quarterback), 0.5),
            scored("RB1", Position::RunningBack, Slot::Bench, 2.0),
            scored("WR1", Position::WideReceiver, Slot::Flex, -0.4),
            scored("TE1", Position::TightEnd, Slot::InjuredReserve, 0.0),
        ];
        let lineup = actual_lineup(&players);
        let starters = names(&lineup.starters);
        let bench = names(&lineup.bench);
        // Higher-scoring RB1 stays on the bench: no recomputation
        assert_eq!(starters, vec!["QB1", "WR1"]);
        assert_eq!(bench, vec!["RB1", "TE1"]);
        assert_eq!(lineup.bench[1].slot, Slot::InjuredReserve);
    }

    // ---- Optimal mode ----

    #[test]
    fn optimal_fill_takes_best_at_each_position() {
        let players = vec![
            scored("RB low", Position::RunningBack, Slot::Bench, -1.0),
            scored("RB high", Position::RunningBack, Slot::Bench, 1.5),
            scored("RB mid", Position::RunningBack, Slot::Bench, 0.3),
            scored("QB a", Position::Quarterback, Slot::Bench, 0.9),
            scored("QB b", Position::Quarterback, Slot::Bench, 1.1),
        ];
        let req = SlotRequirements::default()
            .with_slot(Slot::Position(Position::RunningBack), 2)
            .with_slot(Slot::Position(Position::Quarterback), 1);
        let lineup = optimal_lineup(&players, &req);

        let starters = names(&lineup.starters);
        assert_eq!(starters, vec!["RB high", "QB b", "RB mid"]);
        let bench = names(&lineup.bench);
        assert_eq!(bench, vec!["QB a", "RB low"]);
    }

    #[test]
    fn overflow_rb_wr_te_fill_flex() {
        let players = vec![
            scored("WR1", Position::WideReceiver, Slot::Bench, 1.0),
            scored("WR2", Position::WideReceiver, Slot::Bench, 0.8),
            scored("WR3", Position::WideReceiver, Slot::Bench, 0.6),
            scored("QB2", Position::Quarterback, Slot::Bench, 0.7),
            scored("QB1", Position::Quarterback, Slot::Bench, 1.2),
        ];
        let req = SlotRequirements::default()
            .with_slot(Slot::Position(Position::WideReceiver), 2)
            .with_slot(Slot::Position(Position::Quarterback), 1)
            .with_slot(Slot::Flex, 1);
        let lineup = optimal_lineup(&players, &req);

        let flex: Vec<&str> = lineup
            .starters
            .iter()
            .filter(|s| s.slot == Slot::Flex)
            .map(|s| s.player.player.name.as_str())
            .collect();
        // QB2 is not flex eligible even though it outscores WR3
        assert_eq!(flex, vec!["WR3"]);
        assert_eq!(lineup.bench.len(), 1);
        assert_eq!(lineup.bench[0].player.player.name, "QB2");
    }

    #[test]
    fn ties_keep_input_order() {
        let players = vec![
            scored("first", Position::TightEnd, Slot::Bench, 0.5),
            scored("second", Position::TightEnd, Slot::Bench, 0.5),
        ];
        let req = SlotRequirements::default().with_slot(Slot::Position(Position::TightEnd), 1);
        let lineup = optimal_lineup(&players, &req);
        assert_eq!(lineup.starters[0].player.player.name, "first");
        assert_eq!(lineup.bench[0].player.player.name, "second");
    }

    #[test]
    fn injured_reserve_players_keep_ir_label_on_bench() {
        let players = vec![scored("hurt", Position::RunningBack, Slot::InjuredReserve, -200.0)];
        let lineup = optimal_lineup(&players, &SlotRequirements::default());
        assert_eq!(lineup.bench[0].slot, Slot::InjuredReserve);
    }

    #[test]
    fn never_exceeds_requirements_and_keeps_everyone() {
        let positions = [
            Position::Quarterback,
            Position::RunningBack,
            Position::WideReceiver,
            Position::TightEnd,
            Position::Kicker,
            Position::Defense,
        ];
        let players: Vec<ScoredPlayer> = (0..17)
            .map(|i| {
                let pos = positions[i % positions.len()];
                let score = ((i * 7) % 11) as f64 / 4.0 - 1.0;
                scored(&format!("P{i}"), pos, Slot::Bench, score)
            })
            .collect();
        let req = standard_requirements();
        let lineup = optimal_lineup(&players, &req);

        for (slot, n) in slot_counts(&lineup) {
            assert!(n <= req.count(slot), "{slot} has {n} starters");
        }
        assert_eq!(lineup.starters.len() + lineup.bench.len(), players.len());
    }
}
