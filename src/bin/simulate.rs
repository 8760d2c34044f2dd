use chrono::Utc;
use clap::Parser;
use rand::Rng;
use red_maze_engine::config::{load_options, ContactRule, EngineOptions};
use red_maze_engine::constants::{release_tick, TICK_RATE};
use red_maze_engine::engine::GameEngine;
use red_maze_engine::hunter::Hunter;
use red_maze_engine::types::{HunterMode, Position, RuntimeEvent, SessionStatus, Snapshot};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

const DEFAULT_MAX_TICKS: u64 = TICK_RATE as u64 * 60 * 10;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    level: Option<u32>,
    #[arg(long)]
    through_final: bool,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    max_ticks: Option<u64>,
    #[arg(long)]
    contact_rule: Option<String>,
    #[arg(long)]
    match_id: Option<String>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
}

#[derive(Clone, Debug, Serialize)]
struct Scenario {
    name: String,
    #[serde(rename = "startLevel")]
    start_level: u32,
    #[serde(rename = "throughFinal")]
    through_final: bool,
    seed: u32,
    #[serde(rename = "maxTicks")]
    max_ticks: u64,
}

#[derive(Clone, Debug, Serialize)]
struct ScenarioResultLine {
    scenario: String,
    seed: u32,
    #[serde(rename = "startLevel")]
    start_level: u32,
    #[serde(rename = "reachedLevel")]
    reached_level: u32,
    outcome: String,
    ticks: u64,
    score: u32,
    #[serde(rename = "livesLeft")]
    lives_left: u32,
    #[serde(rename = "collectiblesTaken")]
    collectibles_taken: u32,
    #[serde(rename = "powerTaken")]
    power_taken: u32,
    #[serde(rename = "huntersCaptured")]
    hunters_captured: u32,
    #[serde(rename = "huntersStunned")]
    hunters_stunned: u32,
    #[serde(rename = "livesLost")]
    lives_lost: u32,
    #[serde(rename = "levelsWon")]
    levels_won: u32,
    anomalies: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
struct AnomalyRecord {
    tick: u64,
    message: String,
}

#[derive(Clone, Debug)]
struct ScenarioRunResult {
    result: ScenarioResultLine,
    anomaly_records: Vec<AnomalyRecord>,
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    #[serde(rename = "matchId")]
    match_id: String,
    #[serde(rename = "startedAtMs")]
    started_at_ms: u64,
    #[serde(rename = "finishedAtMs")]
    finished_at_ms: u64,
    #[serde(rename = "contactRule")]
    contact_rule: String,
    #[serde(rename = "scenarioCount")]
    scenario_count: usize,
    #[serde(rename = "anomalyCount")]
    anomaly_count: usize,
    #[serde(rename = "averageTicks")]
    average_ticks: u64,
    #[serde(rename = "outcomeCounts")]
    outcome_counts: BTreeMap<String, usize>,
    scenarios: Vec<ScenarioResultLine>,
}

#[derive(Clone, Debug, Serialize)]
struct StructuredLogLine {
    #[serde(rename = "timestampMs")]
    timestamp_ms: u64,
    level: String,
    event: String,
    #[serde(rename = "matchId")]
    match_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    scenario: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tick: Option<u64>,
    details: Value,
}

fn main() {
    let cli = Cli::parse();
    let run_started_at_ms = now_ms();
    let scenarios = resolve_scenarios(&cli);
    let seed_hint = scenarios.first().map(|scenario| scenario.seed).unwrap_or(0);
    let match_id = cli
        .match_id
        .clone()
        .unwrap_or_else(|| default_match_id(seed_hint, run_started_at_ms));

    let options = match resolve_options(&cli) {
        Ok(options) => options,
        Err(message) => {
            emit_log(
                "error",
                "config_invalid",
                &match_id,
                None,
                None,
                None,
                json!({ "error": message }),
            );
            std::process::exit(2);
        }
    };

    let mut has_anomaly = false;
    let mut scenario_results = Vec::new();
    let mut outcome_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut total_ticks = 0u64;
    let mut total_anomalies = 0usize;

    for scenario in scenarios {
        emit_log(
            "info",
            "scenario_started",
            &match_id,
            Some(&scenario.name),
            Some(scenario.seed),
            None,
            json!({
                "startLevel": scenario.start_level,
                "throughFinal": scenario.through_final,
                "maxTicks": scenario.max_ticks,
                "contactRule": options.contact_rule.as_str(),
            }),
        );
        let scenario_run = match run_scenario(&scenario, &options) {
            Ok(run) => run,
            Err(message) => {
                emit_log(
                    "error",
                    "scenario_failed",
                    &match_id,
                    Some(&scenario.name),
                    Some(scenario.seed),
                    None,
                    json!({ "error": message }),
                );
                std::process::exit(2);
            }
        };

        for anomaly in &scenario_run.anomaly_records {
            emit_log(
                "warn",
                "anomaly_detected",
                &match_id,
                Some(&scenario.name),
                Some(scenario.seed),
                Some(anomaly.tick),
                json!({ "message": anomaly.message }),
            );
        }

        if !scenario_run.result.anomalies.is_empty() {
            has_anomaly = true;
        }
        total_anomalies += scenario_run.anomaly_records.len();
        total_ticks += scenario_run.result.ticks;
        *outcome_counts
            .entry(scenario_run.result.outcome.clone())
            .or_insert(0) += 1;

        emit_log(
            "info",
            "scenario_finished",
            &match_id,
            Some(&scenario.name),
            Some(scenario.seed),
            Some(scenario_run.result.ticks),
            json!({
                "outcome": scenario_run.result.outcome,
                "score": scenario_run.result.score,
                "reachedLevel": scenario_run.result.reached_level,
                "anomalyCount": scenario_run.anomaly_records.len(),
            }),
        );

        match serde_json::to_string(&scenario_run.result) {
            Ok(line) => println!("{line}"),
            Err(error) => emit_log(
                "error",
                "result_serialize_failed",
                &match_id,
                Some(&scenario.name),
                Some(scenario.seed),
                None,
                json!({ "error": error.to_string() }),
            ),
        }
        scenario_results.push(scenario_run.result);
    }

    let summary = build_run_summary(
        match_id.clone(),
        run_started_at_ms,
        now_ms(),
        options.contact_rule,
        scenario_results,
        outcome_counts,
        total_anomalies,
        total_ticks,
    );

    let mut summary_out_written: Option<String> = None;
    if let Some(path) = cli.summary_out.as_ref() {
        if let Err(error) = write_summary(path, &summary) {
            emit_log(
                "error",
                "summary_write_failed",
                &match_id,
                None,
                None,
                None,
                json!({
                    "path": path.to_string_lossy(),
                    "error": error.to_string(),
                }),
            );
            std::process::exit(2);
        }
        summary_out_written = Some(path.to_string_lossy().to_string());
    }

    emit_log(
        "info",
        "run_finished",
        &match_id,
        None,
        None,
        None,
        json!({
            "scenarioCount": summary.scenario_count,
            "anomalyCount": summary.anomaly_count,
            "averageTicks": summary.average_ticks,
            "outcomeCounts": summary.outcome_counts,
            "summaryOut": summary_out_written,
        }),
    );

    if has_anomaly {
        std::process::exit(1);
    }
}

fn resolve_options(cli: &Cli) -> Result<EngineOptions, String> {
    let mut options = match cli.config.as_ref() {
        Some(path) => load_options(path).map_err(|error| error.to_string())?,
        None => EngineOptions::default(),
    };
    if let Some(rule) = cli.contact_rule.as_deref() {
        options.contact_rule = ContactRule::parse(rule)
            .ok_or_else(|| format!("unknown contact rule {rule:?}, expected lose_life or stun"))?;
    }
    Ok(options)
}

fn run_scenario(scenario: &Scenario, options: &EngineOptions) -> Result<ScenarioRunResult, String> {
    let mut engine = GameEngine::with_seed(options.clone(), scenario.seed)
        .map_err(|error| error.to_string())?;
    engine.start_session(true, scenario.start_level, 0, options.starting_lives);

    let mut collectibles_taken = 0;
    let mut power_taken = 0;
    let mut hunters_captured = 0;
    let mut hunters_stunned = 0;
    let mut lives_lost = 0;
    let mut levels_won = 0;
    let mut anomalies = Vec::new();
    let mut anomaly_records = Vec::new();
    let mut anomaly_seen = HashSet::new();
    let mut ticks = 0u64;
    let mut previous = engine.build_snapshot(true);

    loop {
        if engine.status() == SessionStatus::Won && scenario.through_final {
            engine.advance_to_next_level();
            previous = engine.build_snapshot(false);
        }
        if !engine.status().is_running() || ticks >= scenario.max_ticks {
            break;
        }

        engine.step();
        ticks += 1;
        let snapshot = engine.build_snapshot(true);

        for event in &snapshot.events {
            match event {
                RuntimeEvent::CollectibleTaken { .. } => collectibles_taken += 1,
                RuntimeEvent::PowerTaken { .. } => {
                    collectibles_taken += 1;
                    power_taken += 1;
                }
                RuntimeEvent::HunterCaptured { .. } => hunters_captured += 1,
                RuntimeEvent::HunterStunned { .. } => hunters_stunned += 1,
                RuntimeEvent::LifeLost { .. } => lives_lost += 1,
                RuntimeEvent::LevelWon { .. } => levels_won += 1,
                _ => {}
            }
        }

        for message in collect_tick_anomalies(&previous, &snapshot, engine.hunters()) {
            push_anomaly(
                &mut anomalies,
                &mut anomaly_records,
                &mut anomaly_seen,
                snapshot.tick,
                message,
            );
        }
        previous = snapshot;
    }

    let final_snapshot = engine.build_snapshot(false);
    let outcome = if final_snapshot.status.is_running() {
        "timeout".to_string()
    } else {
        status_key(final_snapshot.status)
    };

    Ok(ScenarioRunResult {
        result: ScenarioResultLine {
            scenario: scenario.name.clone(),
            seed: scenario.seed,
            start_level: scenario.start_level,
            reached_level: final_snapshot.level,
            outcome,
            ticks,
            score: final_snapshot.score,
            lives_left: final_snapshot.lives,
            collectibles_taken,
            power_taken,
            hunters_captured,
            hunters_stunned,
            lives_lost,
            levels_won,
            anomalies,
        },
        anomaly_records,
    })
}

fn collect_tick_anomalies(
    previous: &Snapshot,
    snapshot: &Snapshot,
    hunters: &[Hunter],
) -> Vec<String> {
    let mut anomalies = Vec::new();
    let same_level = previous.level == snapshot.level;

    if snapshot.score < previous.score {
        anomalies.push(format!(
            "score decreased: {} -> {}",
            previous.score, snapshot.score
        ));
    }
    if same_level && snapshot.collectibles_remaining > previous.collectibles_remaining {
        anomalies.push(format!(
            "collectibles increased: {} -> {}",
            previous.collectibles_remaining, snapshot.collectibles_remaining
        ));
    }
    if snapshot.status == SessionStatus::Won && snapshot.collectibles_remaining != 0 {
        anomalies.push(format!(
            "level won with {} collectibles left",
            snapshot.collectibles_remaining
        ));
    }
    if snapshot.lives == 0 && snapshot.status != SessionStatus::Lost {
        anomalies.push("no lives left but session not lost".to_string());
    }
    if snapshot.status.is_running() && snapshot.collectibles_remaining == 0 {
        anomalies.push("maze cleared but level not won".to_string());
    }

    for hunter in hunters {
        if hunter.vulnerable && hunter.mode.is_in_house() {
            anomalies.push(format!("vulnerable hunter inside the house: {}", hunter.id));
        }
        if hunter.mode == HunterMode::Confined && hunter.pos != Position::from_cell(hunter.home) {
            anomalies.push(format!("confined hunter left its home: {}", hunter.id));
        }
        if hunter.mode != HunterMode::Confined
            && snapshot.play_ticks < release_tick(snapshot.level, hunter.exit_order)
        {
            anomalies.push(format!("hunter left before its release time: {}", hunter.id));
        }
    }
    anomalies
}

fn resolve_scenarios(cli: &Cli) -> Vec<Scenario> {
    let seed = normalize_seed(cli.seed.unwrap_or_else(|| rand::rng().random::<u32>() as u64));
    let max_ticks = cli.max_ticks.unwrap_or(DEFAULT_MAX_TICKS).max(1);

    if cli.level.is_some() || cli.through_final {
        let start_level = cli.level.unwrap_or(1).max(1);
        let name = if cli.through_final {
            format!("run-from-level{start_level}")
        } else {
            format!("custom-level{start_level}")
        };
        return vec![Scenario {
            name,
            start_level,
            through_final: cli.through_final,
            seed,
            max_ticks,
        }];
    }

    vec![
        Scenario {
            name: "quick-check-level1".to_string(),
            start_level: 1,
            through_final: false,
            seed,
            max_ticks,
        },
        Scenario {
            name: "endgame-check-level4".to_string(),
            start_level: 4,
            through_final: false,
            seed: normalize_seed(seed as u64 + 1),
            max_ticks,
        },
    ]
}

fn normalize_seed(seed: u64) -> u32 {
    seed as u32
}

fn push_anomaly(
    anomalies: &mut Vec<String>,
    anomaly_records: &mut Vec<AnomalyRecord>,
    anomaly_seen: &mut HashSet<String>,
    tick: u64,
    message: String,
) {
    anomaly_records.push(AnomalyRecord {
        tick,
        message: message.clone(),
    });
    if anomaly_seen.insert(message.clone()) {
        anomalies.push(message);
    }
}

fn default_match_id(seed: u32, timestamp_ms: u64) -> String {
    format!("sim-{seed}-{timestamp_ms}")
}

#[allow(clippy::too_many_arguments)]
fn build_run_summary(
    match_id: String,
    started_at_ms: u64,
    finished_at_ms: u64,
    contact_rule: ContactRule,
    scenarios: Vec<ScenarioResultLine>,
    outcome_counts: BTreeMap<String, usize>,
    anomaly_count: usize,
    total_ticks: u64,
) -> RunSummary {
    let scenario_count = scenarios.len();
    let average_ticks = if scenario_count == 0 {
        0
    } else {
        total_ticks / scenario_count as u64
    };
    RunSummary {
        match_id,
        started_at_ms,
        finished_at_ms,
        contact_rule: contact_rule.as_str().to_string(),
        scenario_count,
        anomaly_count,
        average_ticks,
        outcome_counts,
        scenarios,
    }
}

fn emit_log(
    level: &str,
    event: &str,
    match_id: &str,
    scenario: Option<&str>,
    seed: Option<u32>,
    tick: Option<u64>,
    details: Value,
) {
    let log_line = StructuredLogLine {
        timestamp_ms: now_ms(),
        level: level.to_string(),
        event: event.to_string(),
        match_id: match_id.to_string(),
        scenario: scenario.map(|value| value.to_string()),
        seed,
        tick,
        details,
    };
    if let Ok(text) = serde_json::to_string(&log_line) {
        eprintln!("{text}");
    }
}

fn status_key(status: SessionStatus) -> String {
    match status {
        SessionStatus::Idle => "idle",
        SessionStatus::Active => "active",
        SessionStatus::PowerActive => "power_active",
        SessionStatus::Won => "won",
        SessionStatus::Lost => "lost",
        SessionStatus::Complete => "complete",
    }
    .to_string()
}

fn now_ms() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    let summary_text = serde_json::to_string_pretty(summary).map_err(io::Error::other)?;
    std::fs::write(path, summary_text)
}
