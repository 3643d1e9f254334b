// Input records for one roster snapshot: players, league scoring rules,
// betting-market game context and per-player prop signals.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ScoringError;

// ---------------------------------------------------------------------------
// Positions
// ---------------------------------------------------------------------------

/// Fantasy football positions scored by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "QB")]
    Quarterback,
    #[serde(rename = "RB")]
    RunningBack,
    #[serde(rename = "WR")]
    WideReceiver,
    #[serde(rename = "TE")]
    TightEnd,
    #[serde(rename = "K")]
    Kicker,
    #[serde(rename = "DEF")]
    Defense,
}

impl Position {
    pub const ALL: [Position; 6] = [
        Position::Quarterback,
        Position::RunningBack,
        Position::WideReceiver,
        Position::TightEnd,
        Position::Kicker,
        Position::Defense,
    ];

    /// Parse a position string into a Position enum.
    ///
    /// Handles the common platform spellings:
    /// - "DEF", "DST", "D/ST" -> Defense
    /// - "K", "PK" -> Kicker
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "QB" => Some(Position::Quarterback),
            "RB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            "K" | "PK" => Some(Position::Kicker),
            "DEF" | "DST" | "D/ST" => Some(Position::Defense),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::Kicker => "K",
            Position::Defense => "DEF",
        }
    }

    /// Whether a player at this position may fill a FLEX slot.
    pub fn is_flex_eligible(&self) -> bool {
        matches!(
            self,
            Position::RunningBack | Position::WideReceiver | Position::TightEnd
        )
    }

    /// Pass catchers score touchdowns as receiving TDs.
    pub fn is_pass_catcher(&self) -> bool {
        matches!(self, Position::WideReceiver | Position::TightEnd)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

// ---------------------------------------------------------------------------
// Roster slots
// ---------------------------------------------------------------------------

/// A roster slot label: a dedicated position slot, FLEX, bench or injured reserve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    Position(Position),
    Flex,
    Bench,
    InjuredReserve,
}

impl Slot {
    /// Parse a slot label.
    ///
    /// Accepts any position string plus:
    /// - "FLEX", "W/R/T", "W/R", "RB/WR/TE" -> Flex
    /// - "BN", "BE", "BENCH" -> Bench
    /// - "IR", "IL" -> InjuredReserve
    pub fn from_str_slot(s: &str) -> Option<Self> {
        if let Some(pos) = Position::from_str_pos(s) {
            return Some(Slot::Position(pos));
        }
        match s.trim().to_uppercase().as_str() {
            "FLEX" | "W/R/T" | "W/R" | "RB/WR/TE" => Some(Slot::Flex),
            "BN" | "BE" | "BENCH" => Some(Slot::Bench),
            "IR" | "IL" => Some(Slot::InjuredReserve),
            _ => None,
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            Slot::Position(pos) => pos.display_str(),
            Slot::Flex => "FLEX",
            Slot::Bench => "BN",
            Slot::InjuredReserve => "IR",
        }
    }

    /// Whether a player in this slot counts as a starter.
    pub fn is_starting(&self) -> bool {
        !matches!(self, Slot::Bench | Slot::InjuredReserve)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

// ---------------------------------------------------------------------------
// Injury status
// ---------------------------------------------------------------------------

/// Injury designation reported by the roster source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InjuryStatus {
    #[default]
    Healthy,
    Questionable,
    Doubtful,
    Out,
    InjuredReserve,
    PhysicallyUnableToPerform,
    Suspended,
}

impl InjuryStatus {
    /// Parse an injury designation. Empty strings and "active" designations
    /// map to `Healthy`; unrecognized designations return `None`.
    pub fn from_str_status(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "" | "NA" | "ACTIVE" | "HEALTHY" => Some(InjuryStatus::Healthy),
            "Q" | "QUESTIONABLE" => Some(InjuryStatus::Questionable),
            "D" | "DOUBTFUL" => Some(InjuryStatus::Doubtful),
            "O" | "OUT" => Some(InjuryStatus::Out),
            "IR" | "INJURED RESERVE" => Some(InjuryStatus::InjuredReserve),
            "PUP" | "PUP-R" | "PUP-P" => Some(InjuryStatus::PhysicallyUnableToPerform),
            "SUSP" | "SUSPENDED" => Some(InjuryStatus::Suspended),
            _ => None,
        }
    }

    /// Short label used in reports. `None` for healthy players.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            InjuryStatus::Healthy => None,
            InjuryStatus::Questionable => Some("Questionable"),
            InjuryStatus::Doubtful => Some("Doubtful"),
            InjuryStatus::Out => Some("Out"),
            InjuryStatus::InjuredReserve => Some("IR"),
            InjuryStatus::PhysicallyUnableToPerform => Some("PUP"),
            InjuryStatus::Suspended => Some("Suspended"),
        }
    }

    /// Whether the player is certain not to play this week.
    pub fn is_ruled_out(&self) -> bool {
        matches!(
            self,
            InjuryStatus::Out
                | InjuryStatus::InjuredReserve
                | InjuryStatus::PhysicallyUnableToPerform
                | InjuryStatus::Suspended
        )
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// A rostered player as supplied by the roster collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub position: Position,
    /// NFL team abbreviation, used to find the player's game.
    pub team: String,
    pub status: InjuryStatus,
    pub bye_week: Option<u8>,
    /// The slot the player currently occupies on the fantasy roster.
    pub slot: Slot,
}

// ---------------------------------------------------------------------------
// Scoring rules
// ---------------------------------------------------------------------------

/// Per-unit point values for one league. Every field is required.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringRules {
    pub pass_yards: f64,
    pub pass_td: f64,
    pub pass_int: f64,
    pub rush_yards: f64,
    pub rush_td: f64,
    pub rec_yards: f64,
    /// Points per reception (PPR value).
    pub reception: f64,
    pub rec_td: f64,
    pub fumble: f64,
    pub two_point: f64,
}

impl ScoringRules {
    /// Reject non-finite rule values. A NaN here would poison every score.
    pub fn validate(&self) -> Result<(), ScoringError> {
        let fields: [(&'static str, f64); 10] = [
            ("pass_yards", self.pass_yards),
            ("pass_td", self.pass_td),
            ("pass_int", self.pass_int),
            ("rush_yards", self.rush_yards),
            ("rush_td", self.rush_td),
            ("rec_yards", self.rec_yards),
            ("reception", self.reception),
            ("rec_td", self.rec_td),
            ("fumble", self.fumble),
            ("two_point", self.two_point),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(ScoringError::InvalidRule { field, value });
            }
        }
        Ok(())
    }

    /// Points for a touchdown scored by a player at `position`: receiving TD
    /// for WR/TE, rushing TD for everyone else.
    pub fn td_value(&self, position: Position) -> f64 {
        if position.is_pass_catcher() {
            self.rec_td
        } else {
            self.rush_td
        }
    }
}

// ---------------------------------------------------------------------------
// Game context
// ---------------------------------------------------------------------------

/// Betting-market context for one matchup. `spread` is signed relative to
/// the home team (negative = home favored).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameContext {
    pub home: String,
    pub away: String,
    pub spread: f64,
    pub total: f64,
}

/// A player's game as the scoring rules see it. `opponent` and `is_home` are
/// from the player's side; `spread` and `implied_total` are always the home
/// team's figures, whichever side the player is on.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamOutlook {
    pub opponent: String,
    pub is_home: bool,
    /// Home-relative spread (negative = home favored).
    pub spread: f64,
    /// Home team implied total.
    pub implied_total: f64,
}

impl GameContext {
    /// `total/2 - spread/2`
    pub fn home_implied_total(&self) -> f64 {
        self.total / 2.0 - self.spread / 2.0
    }

    /// `total/2 + spread/2`
    pub fn away_implied_total(&self) -> f64 {
        self.total / 2.0 + self.spread / 2.0
    }

    pub fn involves(&self, team: &str) -> bool {
        self.home.eq_ignore_ascii_case(team) || self.away.eq_ignore_ascii_case(team)
    }

    /// The outlook for a player on `team`, or `None` if `team` is not playing
    /// in this game. Only the opponent depends on the side.
    pub fn outlook_for(&self, team: &str) -> Option<TeamOutlook> {
        let (opponent, is_home) = if self.home.eq_ignore_ascii_case(team) {
            (&self.away, true)
        } else if self.away.eq_ignore_ascii_case(team) {
            (&self.home, false)
        } else {
            return None;
        };
        Some(TeamOutlook {
            opponent: opponent.clone(),
            is_home,
            spread: self.spread,
            implied_total: self.home_implied_total(),
        })
    }
}

impl TeamOutlook {
    pub fn is_favored(&self) -> bool {
        self.spread < 0.0
    }

    /// Home favored by at least `points`.
    pub fn favored_by(&self, points: f64) -> bool {
        self.spread <= -points
    }

    /// Home an underdog by at least `points`.
    pub fn underdog_by(&self, points: f64) -> bool {
        self.spread >= points
    }
}

/// Find the game `team` plays in this week. `None` means a bye.
pub fn find_game<'a>(games: &'a [GameContext], team: &str) -> Option<&'a GameContext> {
    games.iter().find(|g| g.involves(team))
}

// ---------------------------------------------------------------------------
// Player props
// ---------------------------------------------------------------------------

/// Prop markets understood by the estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropMarket {
    PassYards,
    PassTds,
    Interceptions,
    RushYards,
    RecYards,
    Receptions,
    AnytimeTd,
    TwoPlusTd,
}

impl PropMarket {
    pub const ALL: [PropMarket; 8] = [
        PropMarket::PassYards,
        PropMarket::PassTds,
        PropMarket::Interceptions,
        PropMarket::RushYards,
        PropMarket::RecYards,
        PropMarket::Receptions,
        PropMarket::AnytimeTd,
        PropMarket::TwoPlusTd,
    ];

    pub fn from_str_market(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pass_yds" | "passing_yards" | "player_pass_yds" => Some(PropMarket::PassYards),
            "pass_tds" | "passing_tds" | "player_pass_tds" => Some(PropMarket::PassTds),
            "interceptions" | "pass_interceptions" | "player_pass_interceptions" => {
                Some(PropMarket::Interceptions)
            }
            "rush_yds" | "rushing_yards" | "player_rush_yds" => Some(PropMarket::RushYards),
            "rec_yds" | "receiving_yards" | "player_reception_yds" => Some(PropMarket::RecYards),
            "receptions" | "player_receptions" => Some(PropMarket::Receptions),
            "anytime_td" | "player_anytime_td" => Some(PropMarket::AnytimeTd),
            "two_plus_td" | "player_2_plus_tds" => Some(PropMarket::TwoPlusTd),
            _ => None,
        }
    }

    /// Probability markets carry an implied probability; the rest carry a line.
    pub fn is_probability(&self) -> bool {
        matches!(self, PropMarket::AnytimeTd | PropMarket::TwoPlusTd)
    }
}

/// Sparse prop signals for one player. Every field is optional; an absent
/// field contributes nothing to the estimate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerProps {
    pub pass_yds: Option<f64>,
    pub pass_tds: Option<f64>,
    pub interceptions: Option<f64>,
    pub rush_yds: Option<f64>,
    pub rec_yds: Option<f64>,
    pub receptions: Option<f64>,
    /// Implied probability of scoring at least one touchdown.
    pub anytime_td: Option<f64>,
    /// Estimated probability of scoring two or more touchdowns.
    pub two_plus_td: Option<f64>,
}

impl PlayerProps {
    pub fn is_empty(&self) -> bool {
        self.pass_yds.is_none()
            && self.pass_tds.is_none()
            && self.interceptions.is_none()
            && self.rush_yds.is_none()
            && self.rec_yds.is_none()
            && self.receptions.is_none()
            && self.anytime_td.is_none()
            && self.two_plus_td.is_none()
    }

    pub fn get(&self, market: PropMarket) -> Option<f64> {
        match market {
            PropMarket::PassYards => self.pass_yds,
            PropMarket::PassTds => self.pass_tds,
            PropMarket::Interceptions => self.interceptions,
            PropMarket::RushYards => self.rush_yds,
            PropMarket::RecYards => self.rec_yds,
            PropMarket::Receptions => self.receptions,
            PropMarket::AnytimeTd => self.anytime_td,
            PropMarket::TwoPlusTd => self.two_plus_td,
        }
    }

    pub fn set(&mut self, market: PropMarket, value: f64) {
        let field = match market {
            PropMarket::PassYards => &mut self.pass_yds,
            PropMarket::PassTds => &mut self.pass_tds,
            PropMarket::Interceptions => &mut self.interceptions,
            PropMarket::RushYards => &mut self.rush_yds,
            PropMarket::RecYards => &mut self.rec_yds,
            PropMarket::Receptions => &mut self.receptions,
            PropMarket::AnytimeTd => &mut self.anytime_td,
            PropMarket::TwoPlusTd => &mut self.two_plus_td,
        };
        *field = Some(value);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
