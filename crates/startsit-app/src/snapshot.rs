// Week snapshot loading: roster, game lines and player props from a JSON
// snapshot, with an optional long-format props CSV layered on top.

use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

use startsit_core::model::{
    GameContext, InjuryStatus, Player, PlayerProps, PropMarket, Position, Slot,
};
use startsit_core::WeekInputs;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Everything the pipeline needs for one team's week.
#[derive(Debug, Clone, Default)]
pub struct WeekSnapshot {
    pub team: Option<String>,
    pub week: Option<u32>,
    pub roster: Vec<Player>,
    pub games: Vec<GameContext>,
    /// Keyed by exact player display name.
    pub props: HashMap<String, PlayerProps>,
}

impl WeekSnapshot {
    pub fn inputs(&self) -> WeekInputs<'_> {
        WeekInputs {
            roster: &self.roster,
            games: &self.games,
            props: &self.props,
        }
    }

    /// Names that carry props but match no rostered player, sorted.
    pub fn unmatched_props(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .props
            .keys()
            .filter(|name| !self.roster.iter().any(|p| &p.name == *name))
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw serde structs (private)
// ---------------------------------------------------------------------------

/// Rows stay as raw JSON so one bad entry can be skipped without failing
/// the whole document.
#[derive(Debug, Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    team: Option<String>,
    #[serde(default)]
    week: Option<u32>,
    roster: Vec<serde_json::Value>,
    #[serde(default)]
    games: Vec<serde_json::Value>,
    #[serde(default)]
    props: HashMap<String, PlayerProps>,
}

#[derive(Debug, Deserialize)]
struct RawRosterEntry {
    name: String,
    position: String,
    team: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    bye_week: Option<u8>,
    slot: String,
}

/// Long-format props row: one market per line.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawPropRow {
    Name: String,
    Market: String,
    #[serde(default)]
    Line: Option<f64>,
    #[serde(default)]
    Probability: Option<f64>,
}

// ---------------------------------------------------------------------------
// Row conversion
// ---------------------------------------------------------------------------

fn convert_roster_entry(raw: RawRosterEntry) -> Option<Player> {
    let name = raw.name.trim().to_string();
    let Some(position) = Position::from_str_pos(&raw.position) else {
        warn!("skipping roster entry '{}': unknown position '{}'", name, raw.position);
        return None;
    };
    let Some(slot) = Slot::from_str_slot(&raw.slot) else {
        warn!("skipping roster entry '{}': unknown slot '{}'", name, raw.slot);
        return None;
    };
    let status = match raw.status.as_deref() {
        None => InjuryStatus::Healthy,
        Some(s) => InjuryStatus::from_str_status(s).unwrap_or_else(|| {
            warn!("unknown injury status '{}' for '{}', treating as healthy", s, name);
            InjuryStatus::Healthy
        }),
    };
    Some(Player {
        name,
        position,
        team: raw.team.trim().to_uppercase(),
        status,
        bye_week: raw.bye_week,
        slot,
    })
}

/// A prop value fit for scoring: finite, and within [0, 1] for probability
/// markets. Anything else is logged and dropped.
fn checked_prop_value(name: &str, market: PropMarket, value: Option<f64>) -> Option<f64> {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        warn!("skipping {:?} prop for '{}': missing or non-finite value", market, name);
        return None;
    };
    if market.is_probability() && !(0.0..=1.0).contains(&value) {
        warn!("skipping {:?} prop for '{}': probability {} out of range", market, name, value);
        return None;
    }
    Some(value)
}

/// Run every market in a snapshot's props through [`checked_prop_value`].
fn convert_props(name: &str, raw: &PlayerProps) -> PlayerProps {
    let mut props = PlayerProps::default();
    for market in PropMarket::ALL {
        let Some(value) = raw.get(market) else {
            continue;
        };
        if let Some(v) = checked_prop_value(name, market, Some(value)) {
            props.set(market, v);
        }
    }
    props
}

fn convert_game(raw: serde_json::Value) -> Option<GameContext> {
    match serde_json::from_value::<GameContext>(raw) {
        Ok(game) if game.spread.is_finite() && game.total.is_finite() => Some(GameContext {
            home: game.home.trim().to_uppercase(),
            away: game.away.trim().to_uppercase(),
            ..game
        }),
        Ok(game) => {
            warn!("skipping game {} @ {}: non-finite line", game.away, game.home);
            None
        }
        Err(e) => {
            warn!("skipping malformed game entry: {}", e);
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Reader-based loaders (private, enable testing without temp files)
// ---------------------------------------------------------------------------

fn load_snapshot_from_reader<R: Read>(rdr: R) -> Result<WeekSnapshot, serde_json::Error> {
    let raw: RawSnapshot = serde_json::from_reader(rdr)?;

    let mut roster = Vec::with_capacity(raw.roster.len());
    for value in raw.roster {
        match serde_json::from_value::<RawRosterEntry>(value) {
            Ok(entry) => roster.extend(convert_roster_entry(entry)),
            Err(e) => warn!("skipping malformed roster entry: {}", e),
        }
    }

    let games = raw.games.into_iter().filter_map(convert_game).collect();

    let props = raw
        .props
        .iter()
        .map(|(name, p)| {
            let name = name.trim();
            (name.to_string(), convert_props(name, p))
        })
        .collect();

    Ok(WeekSnapshot {
        team: raw.team,
        week: raw.week,
        roster,
        games,
        props,
    })
}

fn load_props_from_reader<R: Read>(rdr: R) -> Result<HashMap<String, PlayerProps>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut map: HashMap<String, PlayerProps> = HashMap::new();
    for result in reader.deserialize::<RawPropRow>() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping malformed props row: {}", e);
                continue;
            }
        };
        let name = raw.Name.trim().to_string();
        let Some(market) = PropMarket::from_str_market(&raw.Market) else {
            warn!("skipping prop for '{}': unknown market '{}'", name, raw.Market);
            continue;
        };
        let value = if market.is_probability() {
            raw.Probability
        } else {
            raw.Line
        };
        let Some(value) = checked_prop_value(&name, market, value) else {
            continue;
        };
        map.entry(name).or_default().set(market, value);
    }
    Ok(map)
}

/// Layer `overlay` onto `base`: every market present in the overlay wins.
pub fn merge_props(
    base: &mut HashMap<String, PlayerProps>,
    overlay: HashMap<String, PlayerProps>,
) {
    for (name, props) in overlay {
        let entry = base.entry(name).or_default();
        for market in PropMarket::ALL {
            if let Some(v) = props.get(market) {
                entry.set(market, v);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

/// Load a JSON week snapshot. Fails if no roster entry survives parsing.
pub fn load_snapshot(path: &Path) -> Result<WeekSnapshot, SnapshotError> {
    let file = std::fs::File::open(path).map_err(|e| SnapshotError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let snapshot = load_snapshot_from_reader(file).map_err(|e| SnapshotError::Json {
        path: path.display().to_string(),
        source: e,
    })?;
    if snapshot.roster.is_empty() {
        return Err(SnapshotError::Validation(format!(
            "snapshot {} produced zero valid roster entries",
            path.display()
        )));
    }
    Ok(snapshot)
}

/// Load a long-format props CSV (`Name,Market,Line,Probability`).
pub fn load_props_csv(path: &Path) -> Result<HashMap<String, PlayerProps>, SnapshotError> {
    let file = std::fs::File::open(path).map_err(|e| SnapshotError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_props_from_reader(file).map_err(|e| SnapshotError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load the snapshot, merge the optional props CSV over it and report props
/// that match no rostered player.
pub fn load_week(
    snapshot_path: &Path,
    props_csv: Option<&Path>,
) -> Result<WeekSnapshot, SnapshotError> {
    let mut snapshot = load_snapshot(snapshot_path)?;

    if let Some(csv_path) = props_csv {
        let overlay = load_props_csv(csv_path)?;
        info!("loaded props for {} players from {}", overlay.len(), csv_path.display());
        merge_props(&mut snapshot.props, overlay);
    }

    for name in snapshot.unmatched_props() {
        warn!("props for '{}' match no rostered player", name);
    }

    info!(
        "loaded snapshot: {} players, {} games, {} players with props",
        snapshot.roster.len(),
        snapshot.games.len(),
        snapshot.props.len()
    );

    Ok(snapshot)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
