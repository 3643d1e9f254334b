// Short human-readable justifications for a player's score.
//
// Reasons are generated in a fixed priority order and capped; they explain
// the inputs already used for scoring and never feed back into the score.

use crate::model::{InjuryStatus, PlayerProps, Position, TeamOutlook};
use crate::scoring::SCRIPT_SPREAD_THRESHOLD;

pub const MAX_REASONS: usize = 4;

const HIGH_IMPLIED_TOTAL: f64 = 24.0;
const LOW_IMPLIED_TOTAL: f64 = 18.0;
const CEILING_NOTE_THRESHOLD: f64 = 0.15;

/// Inputs the reason generator reads for one player.
#[derive(Debug, Clone, Copy)]
pub struct ReasonInputs<'a> {
    pub position: Position,
    pub status: InjuryStatus,
    pub props: &'a PlayerProps,
    pub outlook: Option<&'a TeamOutlook>,
}

/// Build up to [`MAX_REASONS`] reasons in priority order:
/// props summary, implied total, game script, ceiling, injury, bye, no props.
pub fn generate_reasons(inputs: &ReasonInputs<'_>) -> Vec<String> {
    let mut reasons: Vec<String> = Vec::with_capacity(MAX_REASONS);

    if let Some(summary) = props_summary(inputs.props) {
        reasons.push(summary);
    }

    if let Some(outlook) = inputs.outlook {
        if outlook.implied_total >= HIGH_IMPLIED_TOTAL {
            reasons.push(format!("High implied total ({:.1})", outlook.implied_total));
        } else if outlook.implied_total <= LOW_IMPLIED_TOTAL {
            reasons.push(format!("Low implied total ({:.1})", outlook.implied_total));
        }

        if let Some(note) = script_note(inputs.position, outlook) {
            reasons.push(note);
        }
    }

    if let Some(prob) = inputs.props.two_plus_td {
        if prob > CEILING_NOTE_THRESHOLD {
            reasons.push(format!("Ceiling: {:.0}% chance of 2+ TDs", prob * 100.0));
        }
    }

    if let Some(note) = injury_note(inputs.status) {
        reasons.push(note.to_string());
    }

    if inputs.outlook.is_none() {
        reasons.push("On bye this week".to_string());
    }

    if inputs.props.is_empty() {
        reasons.push("No props available; using positional baseline".to_string());
    }

    reasons.truncate(MAX_REASONS);
    reasons
}

/// "Props: 275.5 pass yds, 1.8 pass TD, 45% anytime TD"; `None` if no field is set.
fn props_summary(props: &PlayerProps) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    let lines: [(Option<f64>, &str); 6] = [
        (props.pass_yds, "pass yds"),
        (props.pass_tds, "pass TD"),
        (props.interceptions, "INT"),
        (props.rush_yds, "rush yds"),
        (props.rec_yds, "rec yds"),
        (props.receptions, "rec"),
    ];
    for (value, label) in lines {
        if let Some(v) = value {
            parts.push(format!("{v:.1} {label}"));
        }
    }
    if let Some(p) = props.anytime_td {
        parts.push(format!("{:.0}% anytime TD", p * 100.0));
    }
    if let Some(p) = props.two_plus_td {
        parts.push(format!("{:.0}% 2+ TD", p * 100.0));
    }

    if parts.is_empty() {
        None
    } else {
        Some(format!("Props: {}", parts.join(", ")))
    }
}

fn script_note(position: Position, outlook: &TeamOutlook) -> Option<String> {
    let margin = outlook.spread.abs();
    match position {
        Position::Quarterback | Position::WideReceiver | Position::TightEnd
            if outlook.underdog_by(SCRIPT_SPREAD_THRESHOLD) =>
        {
            Some(format!("Underdog by {margin:.1}: pass-heavy script"))
        }
        Position::RunningBack if outlook.favored_by(SCRIPT_SPREAD_THRESHOLD) => {
            Some(format!("Favored by {margin:.1}: run-heavy script"))
        }
        _ => None,
    }
}

fn injury_note(status: InjuryStatus) -> Option<&'static str> {
    match status {
        InjuryStatus::Questionable => Some("Questionable: monitor game-time status"),
        InjuryStatus::Doubtful => Some("Doubtful: unlikely to play"),
        InjuryStatus::Out => Some("Out: will not play"),
        InjuryStatus::InjuredReserve => Some("On injured reserve: will not play"),
        InjuryStatus::PhysicallyUnableToPerform => Some("PUP list: will not play"),
        InjuryStatus::Suspended => Some("Suspended: will not play"),
        InjuryStatus::Healthy => None,
    }
}
