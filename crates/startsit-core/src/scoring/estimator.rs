// Expected fantasy points from prop lines, with a heuristic fallback when a
// player has no props.

use crate::model::{PlayerProps, Position, ScoringRules, TeamOutlook};
use crate::scoring::{NEUTRAL_IMPLIED_TOTAL, SCRIPT_SPREAD_THRESHOLD};
use crate::tables::ScoringTables;

/// Estimate EFP for one player.
///
/// With props, each stat line is multiplied by its league point value and the
/// anytime-TD probability by the position's touchdown value. Absent fields
/// contribute nothing. With no props at all, see [`fallback_efp`].
pub fn estimate_efp(
    props: &PlayerProps,
    rules: &ScoringRules,
    position: Position,
    outlook: Option<&TeamOutlook>,
    tables: &ScoringTables,
) -> f64 {
    if props.is_empty() {
        return fallback_efp(position, outlook, tables);
    }

    let mut efp = 0.0;
    efp += props.pass_yds.unwrap_or(0.0) * rules.pass_yards;
    efp += props.pass_tds.unwrap_or(0.0) * rules.pass_td;
    efp += props.interceptions.unwrap_or(0.0) * rules.pass_int;
    efp += props.rush_yds.unwrap_or(0.0) * rules.rush_yards;
    efp += props.rec_yds.unwrap_or(0.0) * rules.rec_yards;
    efp += props.receptions.unwrap_or(0.0) * rules.reception;
    efp += props.anytime_td.unwrap_or(0.0) * rules.td_value(position);
    efp
}

/// Baseline EFP for a player without props, nudged by the game environment:
/// `baseline + max(0, (implied_total - 21) / 3) + script bonus`.
///
/// Without a game the bare baseline is returned.
pub fn fallback_efp(
    position: Position,
    outlook: Option<&TeamOutlook>,
    tables: &ScoringTables,
) -> f64 {
    let baseline = tables.baseline(position);
    let Some(outlook) = outlook else {
        return baseline;
    };

    let implied_total_bonus = ((outlook.implied_total - NEUTRAL_IMPLIED_TOTAL) / 3.0).max(0.0);
    baseline + implied_total_bonus + fallback_script_bonus(position, outlook)
}

fn fallback_script_bonus(position: Position, outlook: &TeamOutlook) -> f64 {
    match position {
        Position::Quarterback if outlook.is_favored() => 1.0,
        Position::RunningBack if outlook.favored_by(SCRIPT_SPREAD_THRESHOLD) => 1.5,
        Position::WideReceiver | Position::TightEnd
            if outlook.underdog_by(SCRIPT_SPREAD_THRESHOLD) =>
        {
            1.0
        }
        _ => 0.0,
    }
}
