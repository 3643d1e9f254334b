// Ceiling bonus: position-weighted credit for multi-touchdown upside.

use crate::model::{PlayerProps, Position, ScoringRules};
use crate::tables::ScoringTables;

/// `two_plus_td * td_value * position_weight`.
///
/// Zero when the two-plus-TD probability is absent or the position carries
/// no ceiling weight (QB, K and DEF by default).
pub fn ceiling_bonus(
    props: &PlayerProps,
    rules: &ScoringRules,
    position: Position,
    tables: &ScoringTables,
) -> f64 {
    let weight = tables.ceiling_weight(position);
    match props.two_plus_td {
        Some(prob) if weight != 0.0 => prob * rules.td_value(position) * weight,
        _ => 0.0,
    }
}
