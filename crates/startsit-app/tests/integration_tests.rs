// Integration tests for the start/sit pipeline.
//
// These tests exercise the full system end-to-end using the library crates'
// public API: config loading, week snapshot + props CSV loading, the scoring
// engine in both lineup modes, and report rendering.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use startsit::app::{self, RunOptions};
use startsit::config::*;
use startsit::output::RecommendationReport;
use startsit::snapshot::{self, WeekSnapshot};

use startsit_core::lineup::assign::SlotRequirements;
use startsit_core::model::{InjuryStatus, Position, ScoringRules, Slot};
use startsit_core::scoring::tiers::Tier;
use startsit_core::tables::ScoringTables;
use startsit_core::{LineupMode, Recommendation, ScoredPlayer, ScoringEngine};

// ===========================================================================
// Test helpers
// ===========================================================================

/// Fixture directory path (relative to the crate root, which is the cwd for
/// `cargo test`).
const FIXTURES: &str = "tests/fixtures";

fn fixture(name: &str) -> PathBuf {
    Path::new(FIXTURES).join(name)
}

fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

fn lineup_labels() -> HashMap<String, usize> {
    [
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
    .collect()
}

fn ppr_rules() -> ScoringRules {
    ScoringRules {
        pass_yards: 0.04,
        pass_td: 4.0,
        pass_int: -2.0,
        rush_yards: 0.1,
        rush_td: 6.0,
        rec_yards: 0.1,
        reception: 1.0,
        rec_td: 6.0,
        fumble: -2.0,
        two_point: 2.0,
    }
}

/// Build a test-ready Config with inline settings (no files).
fn inline_config(mode: ModeSetting) -> Config {
    Config {
        league: LeagueConfig {
            name: "Test Integration League".into(),
            team: Some("Config Team".into()),
        },
        scoring: ppr_rules(),
        lineup: SlotRequirements::from_labels(&lineup_labels()).unwrap(),
        strategy: StrategyConfig {
            mode,
            format: OutputFormat::Json,
            tables: ScoringTables::default(),
        },
        data_paths: DataPaths {
            snapshot: fixture("week_snapshot.json").display().to_string(),
            props_csv: None,
        },
    }
}

fn fixture_options(mode: ModeSetting) -> RunOptions {
    RunOptions {
        snapshot: fixture("week_snapshot.json"),
        props_csv: None,
        mode,
        format: OutputFormat::Json,
    }
}

fn load_fixture_week() -> WeekSnapshot {
    snapshot::load_week(&fixture("week_snapshot.json"), None).expect("fixture snapshot loads")
}

fn engine() -> ScoringEngine {
    ScoringEngine::new(ppr_rules(), ScoringTables::default()).unwrap()
}

fn recommend(week: &WeekSnapshot, mode: &LineupMode) -> Recommendation {
    engine().recommend(&week.inputs(), mode)
}

fn optimal_mode() -> LineupMode {
    LineupMode::Optimal(SlotRequirements::from_labels(&lineup_labels()).unwrap())
}

fn find<'a>(players: &'a [ScoredPlayer], name: &str) -> &'a ScoredPlayer {
    players
        .iter()
        .find(|p| p.player.name == name)
        .unwrap_or_else(|| panic!("{name} not scored"))
}

fn starter_names(rec: &Recommendation) -> Vec<&str> {
    rec.lineup
        .starters
        .iter()
        .map(|s| s.player.player.name.as_str())
        .collect()
}

fn bench_names(rec: &Recommendation) -> Vec<&str> {
    rec.lineup
        .bench
        .iter()
        .map(|s| s.player.player.name.as_str())
        .collect()
}

// ===========================================================================
// Snapshot loading
// ===========================================================================

#[test]
fn fixture_snapshot_loads_valid_rows() {
    let week = load_fixture_week();
    assert_eq!(week.team.as_deref(), Some("Gridiron Gang"));
    assert_eq!(week.week, Some(7));
    // The LB row is skipped
    assert_eq!(week.roster.len(), 14);
    assert!(week.roster.iter().all(|p| p.name != "Fred Warner"));
    assert_eq!(week.games.len(), 5);
    assert_eq!(week.unmatched_props(), vec!["Ghost Player"]);

    let chubb = week.roster.iter().find(|p| p.name == "Nick Chubb").unwrap();
    assert_eq!(chubb.status, InjuryStatus::InjuredReserve);
    assert_eq!(chubb.slot, Slot::InjuredReserve);
}

#[test]
fn props_csv_overrides_snapshot_props() {
    let week = snapshot::load_week(
        &fixture("week_snapshot.json"),
        Some(fixture("props.csv").as_path()),
    )
    .unwrap();

    let waddle = &week.props["Jaylen Waddle"];
    assert_eq!(waddle.rec_yds, Some(68.5));
    assert_eq!(waddle.receptions, Some(5.5));
    assert_eq!(waddle.anytime_td, Some(0.33));

    // CSV line wins, JSON-only markets survive
    let hill = &week.props["Tyreek Hill"];
    assert_eq!(hill.rec_yds, Some(90.5));
    assert_eq!(hill.receptions, Some(5.5));
    assert_eq!(hill.anytime_td, Some(0.38));

    // Unknown market row adds nothing
    assert_eq!(week.props["Travis Kelce"].rec_yds, Some(55.5));
}

// ===========================================================================
// Scoring properties
// ===========================================================================

#[test]
fn prop_based_efp_uses_league_rules() {
    let week = load_fixture_week();
    let scored = engine().score_roster(&week.inputs());

    // 280.5*0.04 + 2.1*4 - 0.6*2 + 18.5*0.1
    let mahomes = find(&scored, "Patrick Mahomes");
    assert!(approx_eq(mahomes.efp, 20.27, 1e-9), "got {}", mahomes.efp);
    assert_eq!(mahomes.ceiling_bonus, 0.0);

    // Base 19.9 plus ceiling 0.22 * 6 * 0.8
    let cmc = find(&scored, "Christian McCaffrey");
    assert!(approx_eq(cmc.ceiling_bonus, 1.056, 1e-9));
    assert!(approx_eq(cmc.efp, 19.9 + 1.056, 1e-9));
}

#[test]
fn player_without_props_uses_fallback() {
    let week = load_fixture_week();
    let scored = engine().score_roster(&week.inputs());

    // MIA implied total 18.75 adds nothing; a 2.5-point dog gets no script bonus
    let waddle = find(&scored, "Jaylen Waddle");
    assert!(approx_eq(waddle.efp, 8.0, 1e-9));
    assert_eq!(
        waddle.reasons,
        vec!["No props available; using positional baseline"]
    );
}

#[test]
fn bye_players_score_zero_with_bye_tier() {
    let week = load_fixture_week();
    let scored = engine().score_roster(&week.inputs());

    for name in ["Justin Tucker", "Nick Chubb"] {
        let p = find(&scored, name);
        assert!(p.is_bye_week);
        assert_eq!(p.efp, 0.0);
        assert_eq!(p.score, 0.0);
        assert_eq!(p.tier, Tier::Bye);
        assert_eq!(p.opponent(), None);
        assert!(p.reasons.iter().any(|r| r == "On bye this week"));
    }
}

#[test]
fn zscores_center_on_zero_per_position() {
    let week = load_fixture_week();
    let scored = engine().score_roster(&week.inputs());

    for pos in Position::ALL {
        let zs: Vec<f64> = scored
            .iter()
            .filter(|p| p.player.position == pos && !p.is_bye_week)
            .map(|p| p.breakdown.z)
            .collect();
        if zs.is_empty() {
            continue;
        }
        let mean = zs.iter().sum::<f64>() / zs.len() as f64;
        assert!(approx_eq(mean, 0.0, 1e-9), "{pos} z mean {mean}");
    }
}

#[test]
fn ruled_out_player_lands_in_tier_d() {
    let mut week = load_fixture_week();
    for p in week.roster.iter_mut().filter(|p| p.name == "Breece Hall") {
        p.status = InjuryStatus::Out;
    }
    let scored = engine().score_roster(&week.inputs());
    let hall = find(&scored, "Breece Hall");
    assert!(hall.score < -100.0);
    assert_eq!(hall.tier, Tier::D);
    assert!(hall.reasons.iter().any(|r| r == "Out: will not play"));
}

#[test]
fn tiers_follow_scores_and_reasons_are_capped() {
    let week = load_fixture_week();
    let scored = engine().score_roster(&week.inputs());
    let cutoffs = engine().tables().tier_cutoffs;

    for p in &scored {
        assert!(p.reasons.len() <= 4, "{} has {} reasons", p.player.name, p.reasons.len());
        if !p.is_bye_week {
            assert_eq!(p.tier, Tier::from_score(p.score, &cutoffs), "{}", p.player.name);
        }
    }
}

// ===========================================================================
// Lineup modes
// ===========================================================================

#[test]
fn actual_mode_keeps_roster_slots() {
    let week = load_fixture_week();
    let rec = recommend(&week, &LineupMode::Actual);

    assert_eq!(
        starter_names(&rec),
        vec![
            "Patrick Mahomes",
            "Christian McCaffrey",
            "Jahmyr Gibbs",
            "CeeDee Lamb",
            "Tyreek Hill",
            "Amon-Ra St. Brown",
            "Travis Kelce",
            "Justin Tucker",
            "49ers D/ST",
        ]
    );
    assert_eq!(
        bench_names(&rec),
        vec![
            "Josh Allen",
            "Breece Hall",
            "Jaylen Waddle",
            "Harrison Butker",
            "Nick Chubb",
        ]
    );
    // The FLEX starter outscores every eligible bench player
    assert!(rec.flex_swaps.is_empty());
}

#[test]
fn actual_mode_suggests_flex_upgrade() {
    let mut week = load_fixture_week();
    for p in week.roster.iter_mut() {
        match p.name.as_str() {
            "Amon-Ra St. Brown" => p.slot = Slot::Bench,
            "Jaylen Waddle" => p.slot = Slot::Flex,
            _ => {}
        }
    }
    let rec = recommend(&week, &LineupMode::Actual);

    assert_eq!(rec.flex_swaps.len(), 1);
    let swap = &rec.flex_swaps[0];
    assert_eq!(swap.out, "Jaylen Waddle");
    assert_eq!(swap.into, "Amon-Ra St. Brown");
    assert!(swap.improvement > 1.0);
}

#[test]
fn optimal_mode_fills_requirements() {
    let week = load_fixture_week();
    let rec = recommend(&week, &optimal_mode());
    let requirements = SlotRequirements::from_labels(&lineup_labels()).unwrap();

    assert_eq!(rec.lineup.starters.len(), 9);
    assert_eq!(rec.lineup.len(), week.roster.len());

    let mut counts: HashMap<Slot, usize> = HashMap::new();
    for s in &rec.lineup.starters {
        *counts.entry(s.slot).or_insert(0) += 1;
    }
    for (slot, n) in counts {
        assert!(n <= requirements.count(slot), "{slot} overfilled");
    }

    let in_slot = |slot: Slot| -> Vec<&str> {
        rec.lineup
            .starters
            .iter()
            .filter(|s| s.slot == slot)
            .map(|s| s.player.player.name.as_str())
            .collect()
    };
    // Allen's props outproject Mahomes
    assert_eq!(in_slot(Slot::Position(Position::Quarterback)), vec!["Josh Allen"]);
    assert_eq!(
        in_slot(Slot::Position(Position::RunningBack)),
        vec!["Christian McCaffrey", "Jahmyr Gibbs"]
    );
    assert_eq!(
        in_slot(Slot::Position(Position::WideReceiver)),
        vec!["Amon-Ra St. Brown", "CeeDee Lamb"]
    );
    assert_eq!(in_slot(Slot::Position(Position::TightEnd)), vec!["Travis Kelce"]);
    // The kicker on bye loses out to the one playing
    assert_eq!(in_slot(Slot::Position(Position::Kicker)), vec!["Harrison Butker"]);
    assert_eq!(in_slot(Slot::Flex).len(), 1);

    let waddle = rec
        .lineup
        .bench
        .iter()
        .find(|s| s.player.player.name == "Jaylen Waddle")
        .unwrap();
    assert_eq!(waddle.slot, Slot::Bench);
}

// ===========================================================================
// App runs and rendering
// ===========================================================================

#[test]
fn run_builds_report_from_inline_config() {
    let config = inline_config(ModeSetting::Optimal);
    let report = app::run(&config, &fixture_options(ModeSetting::Optimal)).unwrap();

    // Snapshot team wins over the configured team
    assert_eq!(report.team.as_deref(), Some("Gridiron Gang"));
    assert_eq!(report.week, Some(7));
    assert_eq!(report.mode, "optimal");
    assert_eq!(report.lineup.starters.len(), 9);
    assert_eq!(report.lineup.starters.len() + report.lineup.bench.len(), 14);

    let mahomes = report
        .lineup
        .bench
        .iter()
        .find(|r| r.name == "Patrick Mahomes")
        .unwrap();
    assert_eq!(mahomes.efp, 20.3);
    assert_eq!(mahomes.opponent.as_deref(), Some("BUF"));
}

#[test]
fn run_applies_props_csv() {
    let config = inline_config(ModeSetting::Actual);
    let mut options = fixture_options(ModeSetting::Actual);
    options.props_csv = Some(fixture("props.csv"));
    let report = app::run(&config, &options).unwrap();

    let waddle = report.lineup.bench.iter().find(|r| r.name == "Jaylen Waddle").unwrap();
    // 68.5*0.1 + 5.5 + 0.33*6
    assert_eq!(waddle.efp, 14.3);
    assert!(waddle.reasons[0].starts_with("Props: "));

    let hill = report.lineup.starters.iter().find(|r| r.name == "Tyreek Hill").unwrap();
    assert_eq!(hill.efp, 16.8);
}

#[test]
fn run_fails_for_missing_snapshot() {
    let config = inline_config(ModeSetting::Optimal);
    let mut options = fixture_options(ModeSetting::Optimal);
    options.snapshot = fixture("does_not_exist.json");
    let err = app::run(&config, &options).unwrap_err();
    assert!(format!("{err:#}").contains("does_not_exist.json"));
}

#[test]
fn json_report_shape() {
    let config = inline_config(ModeSetting::Actual);
    let report: RecommendationReport =
        app::run(&config, &fixture_options(ModeSetting::Actual)).unwrap();

    let mut buf = Vec::new();
    report.write(OutputFormat::Json, &mut buf).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();

    assert!(json["generated_at"].as_str().unwrap().ends_with('Z'));
    assert_eq!(json["mode"], "actual");
    assert_eq!(json["starters"].as_array().unwrap().len(), 9);
    assert_eq!(json["bench"].as_array().unwrap().len(), 5);
    assert!(json["flex_swaps"].as_array().unwrap().is_empty());

    let tucker = json["starters"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["name"] == "Justin Tucker")
        .unwrap();
    assert_eq!(tucker["tier"], "BYE");
    assert_eq!(tucker["slot"], "K");
    assert!(tucker["opponent"].is_null());
    assert_eq!(tucker["bye_week"], 7);
    assert_eq!(tucker["score"], 0.0);
}

#[test]
fn csv_report_rows() {
    let config = inline_config(ModeSetting::Actual);
    let report = app::run(&config, &fixture_options(ModeSetting::Actual)).unwrap();

    let mut buf = Vec::new();
    report.write(OutputFormat::Csv, &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "Name,Position,Team,Slot,Opponent,EFP,Score,Tier,Status,Bye");
    assert_eq!(lines.len(), 15);
    assert!(lines.contains(&"Justin Tucker,K,BAL,K,,0.0,0.0,BYE,,7"));
    assert!(lines
        .iter()
        .any(|l| l.starts_with("Nick Chubb,RB,CLE,IR,,0.0,0.0,BYE,IR,")));
    assert!(lines.iter().any(|l| l.starts_with("Patrick Mahomes,QB,KC,QB,BUF,20.3,")));
}

// ===========================================================================
// Config files
// ===========================================================================

#[test]
fn default_config_files_drive_a_run() {
    let tmp = std::env::temp_dir().join("startsit_integration_defaults");
    let _ = std::fs::remove_dir_all(&tmp);
    std::fs::create_dir_all(tmp.join("defaults")).unwrap();
    for f in ["league.toml", "strategy.toml"] {
        std::fs::copy(Path::new("defaults").join(f), tmp.join("defaults").join(f)).unwrap();
    }

    let loaded = load_config(Some(tmp.as_path())).unwrap();
    assert_eq!(loaded.created.len(), 2);
    let config = loaded.config;

    let mut options = RunOptions::from_config(&config, &loaded.base_dir);
    assert_eq!(options.snapshot, tmp.join("data/week.json"));
    assert_eq!(options.mode, ModeSetting::Optimal);
    options.snapshot = fixture("week_snapshot.json");

    let report = app::run(&config, &options).unwrap();
    assert_eq!(report.lineup.starters.len(), 9);

    let _ = std::fs::remove_dir_all(&tmp);
}
