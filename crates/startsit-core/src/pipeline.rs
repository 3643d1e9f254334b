// Start/sit pipeline: estimate, score, classify, explain, then build a lineup
// and flex-swap advice for one roster snapshot.

use std::collections::HashMap;

use tracing::debug;

use crate::error::ScoringError;
use crate::lineup::assign::{actual_lineup, optimal_lineup, SlotRequirements};
use crate::lineup::flex::{suggest_flex_swaps, FlexSwap};
use crate::lineup::Lineup;
use crate::model::{find_game, GameContext, Player, PlayerProps, ScoringRules, TeamOutlook};
use crate::scoring::ceiling::ceiling_bonus;
use crate::scoring::composite::{composite_score, CohortStats, ScoreBreakdown};
use crate::scoring::estimator::estimate_efp;
use crate::scoring::reasons::{generate_reasons, ReasonInputs};
use crate::scoring::tiers::Tier;
use crate::tables::ScoringTables;

// ---------------------------------------------------------------------------
// Scored player (main output struct)
// ---------------------------------------------------------------------------

/// A player carried through the full scoring pipeline.
#[derive(Debug, Clone)]
pub struct ScoredPlayer {
    pub player: Player,
    pub props: PlayerProps,
    /// The player's game this week; `None` on a bye.
    pub game: Option<GameContext>,
    pub outlook: Option<TeamOutlook>,
    /// Base estimate plus ceiling bonus.
    pub efp: f64,
    pub ceiling_bonus: f64,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
    pub tier: Tier,
    pub reasons: Vec<String>,
    pub is_bye_week: bool,
}

impl ScoredPlayer {
    pub fn opponent(&self) -> Option<&str> {
        self.outlook.as_ref().map(|o| o.opponent.as_str())
    }
}

/// One week's inputs for a single team.
#[derive(Debug, Clone, Copy)]
pub struct WeekInputs<'a> {
    pub roster: &'a [Player],
    pub games: &'a [GameContext],
    /// Keyed by exact player display name.
    pub props: &'a HashMap<String, PlayerProps>,
}

/// How starters are chosen.
#[derive(Debug, Clone, PartialEq)]
pub enum LineupMode {
    /// Respect the roster's current slots.
    Actual,
    /// Greedily fill these requirements by composite score.
    Optimal(SlotRequirements),
}

/// Final output of one pipeline run.
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub lineup: Lineup,
    pub flex_swaps: Vec<FlexSwap>,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Scoring engine for one league: scoring rules plus lookup tables.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    rules: ScoringRules,
    tables: ScoringTables,
}

/// Stage 1-2 output, before the cohort is known.
struct Estimate {
    player: Player,
    props: PlayerProps,
    game: Option<GameContext>,
    outlook: Option<TeamOutlook>,
    efp: f64,
    ceiling_bonus: f64,
}

impl ScoringEngine {
    /// Validate the rules and tables and build an engine.
    pub fn new(rules: ScoringRules, tables: ScoringTables) -> Result<Self, ScoringError> {
        rules.validate()?;
        tables.validate()?;
        Ok(ScoringEngine { rules, tables })
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    pub fn tables(&self) -> &ScoringTables {
        &self.tables
    }

    /// Score every rostered player, preserving roster order.
    ///
    /// Steps:
    /// 1. EFP from props (or the fallback) plus the ceiling bonus, for the
    ///    whole roster. Bye-week players are pinned to 0.
    /// 2. Per-position EFP cohorts over non-bye players.
    /// 3. Composite score, tier and reasons for each player.
    pub fn score_roster(&self, inputs: &WeekInputs<'_>) -> Vec<ScoredPlayer> {
        // ---- 1. Estimates for the full roster ----
        let estimates: Vec<Estimate> = inputs
            .roster
            .iter()
            .map(|player| self.estimate(player, inputs))
            .collect();

        // ---- 2. Position cohorts ----
        let cohort = CohortStats::from_members(
            estimates
                .iter()
                .filter(|e| e.game.is_some())
                .map(|e| (e.player.position, e.efp)),
        );

        // ---- 3. Composite score, tier, reasons ----
        let scored: Vec<ScoredPlayer> = estimates
            .into_iter()
            .map(|e| self.finish(e, &cohort))
            .collect();

        debug!(
            "scored {} players ({} on bye)",
            scored.len(),
            scored.iter().filter(|p| p.is_bye_week).count()
        );

        scored
    }

    /// Run the whole pipeline and build the lineup and flex-swap advice.
    pub fn recommend(&self, inputs: &WeekInputs<'_>, mode: &LineupMode) -> Recommendation {
        let scored = self.score_roster(inputs);
        let lineup = match mode {
            LineupMode::Actual => actual_lineup(&scored),
            LineupMode::Optimal(requirements) => optimal_lineup(&scored, requirements),
        };
        let flex_swaps = suggest_flex_swaps(&lineup);
        Recommendation { lineup, flex_swaps }
    }

    fn estimate(&self, player: &Player, inputs: &WeekInputs<'_>) -> Estimate {
        let props = inputs.props.get(&player.name).cloned().unwrap_or_default();
        let game = find_game(inputs.games, &player.team).cloned();
        let outlook = game.as_ref().and_then(|g| g.outlook_for(&player.team));

        let (efp, bonus) = if outlook.is_some() {
            let base = estimate_efp(
                &props,
                &self.rules,
                player.position,
                outlook.as_ref(),
                &self.tables,
            );
            let bonus = ceiling_bonus(&props, &self.rules, player.position, &self.tables);
            (base + bonus, bonus)
        } else {
            (0.0, 0.0)
        };

        Estimate {
            player: player.clone(),
            props,
            game,
            outlook,
            efp,
            ceiling_bonus: bonus,
        }
    }

    fn finish(&self, e: Estimate, cohort: &CohortStats) -> ScoredPlayer {
        let is_bye_week = e.game.is_none();
        let breakdown = composite_score(
            e.efp,
            e.player.position,
            e.player.status,
            e.outlook.as_ref(),
            cohort,
        );
        let tier = Tier::classify(breakdown.total, is_bye_week, &self.tables.tier_cutoffs);
        let reasons = generate_reasons(&ReasonInputs {
            position: e.player.position,
            status: e.player.status,
            props: &e.props,
            outlook: e.outlook.as_ref(),
        });

        ScoredPlayer {
            player: e.player,
            props: e.props,
            game: e.game,
            outlook: e.outlook,
            efp: e.efp,
            ceiling_bonus: e.ceiling_bonus,
            score: breakdown.total,
            breakdown,
            tier,
            reasons,
            is_bye_week,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
