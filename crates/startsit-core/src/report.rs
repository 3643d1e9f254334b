// Output records for rendering collaborators, plus the tabular CSV export.

use std::io::Write;

use serde::Serialize;

use crate::lineup::flex::FlexSwap;
use crate::lineup::LineupSlot;
use crate::pipeline::Recommendation;
use crate::scoring::tiers::Tier;

pub const CSV_HEADER: [&str; 10] = [
    "Name", "Position", "Team", "Slot", "Opponent", "EFP", "Score", "Tier", "Status", "Bye",
];

/// Round to one decimal place, folding negative zero into zero.
pub fn round1(value: f64) -> f64 {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// One player as shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRecord {
    pub name: String,
    pub position: String,
    pub team: String,
    pub slot: String,
    pub opponent: Option<String>,
    pub efp: f64,
    pub score: f64,
    pub tier: Tier,
    pub status: Option<String>,
    pub bye_week: Option<u8>,
    pub reasons: Vec<String>,
}

impl From<&LineupSlot> for PlayerRecord {
    fn from(entry: &LineupSlot) -> Self {
        let p = &entry.player;
        PlayerRecord {
            name: p.player.name.clone(),
            position: p.player.position.display_str().to_string(),
            team: p.player.team.clone(),
            slot: entry.slot.display_str().to_string(),
            opponent: p.opponent().map(str::to_string),
            efp: round1(p.efp),
            score: round1(p.score),
            tier: p.tier,
            status: p.player.status.label().map(str::to_string),
            bye_week: p.player.bye_week,
            reasons: p.reasons.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwapRecord {
    pub out: String,
    #[serde(rename = "in")]
    pub into: String,
    pub improvement: f64,
}

impl From<&FlexSwap> for SwapRecord {
    fn from(swap: &FlexSwap) -> Self {
        SwapRecord {
            out: swap.out.clone(),
            into: swap.into.clone(),
            improvement: round1(swap.improvement),
        }
    }
}

/// Starters, bench and swap advice, ready to serialize.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineupReport {
    pub starters: Vec<PlayerRecord>,
    pub bench: Vec<PlayerRecord>,
    pub flex_swaps: Vec<SwapRecord>,
}

impl From<&Recommendation> for LineupReport {
    fn from(rec: &Recommendation) -> Self {
        LineupReport {
            starters: rec.lineup.starters.iter().map(PlayerRecord::from).collect(),
            bench: rec.lineup.bench.iter().map(PlayerRecord::from).collect(),
            flex_swaps: rec.flex_swaps.iter().map(SwapRecord::from).collect(),
        }
    }
}

impl LineupReport {
    /// Write starters then bench as CSV with the fixed header row.
    /// Absent opponent, status and bye values are written as empty fields.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(CSV_HEADER)?;
        for r in self.starters.iter().chain(self.bench.iter()) {
            wtr.write_record([
                r.name.clone(),
                r.position.clone(),
                r.team.clone(),
                r.slot.clone(),
                r.opponent.clone().unwrap_or_default(),
                format!("{:.1}", r.efp),
                format!("{:.1}", r.score),
                r.tier.label().to_string(),
                r.status.clone().unwrap_or_default(),
                r.bye_week.map(|b| b.to_string()).unwrap_or_default(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lineup::test_support::scored;
    use crate::lineup::Lineup;
    use crate::model::{InjuryStatus, Position, Slot, TeamOutlook};

    fn sample_report() -> LineupReport {
        let mut starter = scored("Ja'Marr Chase", Position::WideReceiver, Slot::Flex, 1.2345);
        starter.efp = 17.26;
        starter.player.bye_week = Some(10);
        starter.outlook = Some(TeamOutlook {
            opponent: "BAL".into(),
            is_home: true,
            spread: 2.5,
            implied_total: 23.0,
        });
        starter.reasons = vec!["Props: 85.5 rec yds".into()];

        let mut benched = scored("Smith, Jr.", Position::TightEnd, Slot::Bench, -0.04);
        benched.player.status = InjuryStatus::Questionable;

        let rec = Recommendation {
            lineup: Lineup {
                starters: vec![LineupSlot { slot: Slot::Flex, player: starter }],
                bench: vec![LineupSlot { slot: Slot::Bench, player: benched }],
            },
            flex_swaps: vec![FlexSwap {
                out: "Ja'Marr Chase".into(),
                into: "Smith, Jr.".into(),
                improvement: 1.26,
            }],
        };
        LineupReport::from(&rec)
    }

    #[test]
    fn round1_behaviour() {
        assert_eq!(round1(17.26), 17.3);
        assert_eq!(round1(-0.04), 0.0);
        assert!(round1(-0.04).is_sign_positive());
        assert_eq!(round1(-1.25), -1.3);
    }

    #[test]
    fn records_are_rounded_and_labelled() {
        let report = sample_report();
        let s = &report.starters[0];
        assert_eq!(s.slot, "FLEX");
        assert_eq!(s.position, "WR");
        assert_eq!(s.opponent.as_deref(), Some("BAL"));
        assert_eq!(s.efp, 17.3);
        assert_eq!(s.score, 1.2);
        assert_eq!(s.tier, Tier::S);
        assert_eq!(s.status, None);

        let b = &report.bench[0];
        assert_eq!(b.slot, "BN");
        assert_eq!(b.status.as_deref(), Some("Questionable"));
        assert_eq!(b.opponent, None);
        assert_eq!(report.flex_swaps[0].improvement, 1.3);
    }

    #[test]
    fn json_shape() {
        let json = serde_json::to_value(sample_report()).unwrap();
        assert_eq!(json["starters"][0]["tier"], "S");
        assert_eq!(json["flex_swaps"][0]["in"], "Smith, Jr.");
        assert!(json["bench"][0]["opponent"].is_null());
    }

    #[test]
    fn csv_export() {
        let mut buf = Vec::new();
        sample_report().write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Name,Position,Team,Slot,Opponent,EFP,Score,Tier,Status,Bye");
        assert_eq!(lines[1], "Ja'Marr Chase,WR,TST,FLEX,BAL,17.3,1.2,S,,10");
        // Commas inside a value are quoted
        assert_eq!(lines[2], "\"Smith, Jr.\",TE,TST,BN,,10.0,0.0,B,Questionable,");
        assert_eq!(lines.len(), 3);
    }
}
