use clap::Parser;
use maze_chase::engine::GameEngine;
use maze_chase::maze::Maze;
use maze_chase::types::Snapshot;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Number of games to run back to back.
    #[arg(long, default_value_t = 3)]
    games: usize,
    /// Tick limit per game.
    #[arg(long, default_value_t = 20_000)]
    ticks: u64,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    run_id: Option<String>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum Outcome {
    Won,
    Lost,
    TickLimit,
}

#[derive(Clone, Debug, Serialize)]
struct GameResultLine {
    game: String,
    seed: u32,
    outcome: Outcome,
    ticks: u64,
    score: i32,
    lives: i32,
    #[serde(rename = "pelletsLeft")]
    pellets_left: usize,
    anomalies: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
struct AnomalyRecord {
    tick: u64,
    message: String,
}

#[derive(Clone, Debug, Serialize)]
struct GameRunResult {
    #[serde(flatten)]
    result: GameResultLine,
    #[serde(rename = "anomalyRecords")]
    anomaly_records: Vec<AnomalyRecord>,
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    #[serde(rename = "runId")]
    run_id: String,
    #[serde(rename = "startedAtMs")]
    started_at_ms: u64,
    #[serde(rename = "finishedAtMs")]
    finished_at_ms: u64,
    #[serde(rename = "gameCount")]
    game_count: usize,
    #[serde(rename = "anomalyCount")]
    anomaly_count: usize,
    #[serde(rename = "averageTicks")]
    average_ticks: u64,
    #[serde(rename = "outcomeCounts")]
    outcome_counts: BTreeMap<String, usize>,
    games: Vec<GameResultLine>,
}

#[derive(Clone, Debug, Serialize)]
struct StructuredLogLine {
    #[serde(rename = "timestampMs")]
    timestamp_ms: u64,
    level: String,
    event: String,
    #[serde(rename = "runId")]
    run_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    game: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tick: Option<u64>,
    details: Value,
}

fn main() {
    let cli = Cli::parse();
    let run_started_at_ms = now_ms();
    let base_seed = normalize_seed(cli.seed.unwrap_or(run_started_at_ms));
    let run_id = cli
        .run_id
        .clone()
        .unwrap_or_else(|| default_run_id(base_seed, run_started_at_ms));
    let mut has_anomaly = false;
    let mut game_results = Vec::new();
    let mut outcome_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut total_ticks = 0u64;
    let mut total_anomalies = 0usize;

    for index in 0..cli.games.max(1) {
        let game = format!("game-{}", index + 1);
        let seed = base_seed.wrapping_add(index as u32);
        emit_log(
            "info",
            "game_started",
            &run_id,
            Some(&game),
            Some(seed),
            None,
            json!({ "tickLimit": cli.ticks }),
        );

        let game_run = run_game(&game, seed, cli.ticks);

        for anomaly in &game_run.anomaly_records {
            emit_log(
                "warn",
                "anomaly_detected",
                &run_id,
                Some(&game),
                Some(seed),
                Some(anomaly.tick),
                json!({ "message": anomaly.message }),
            );
        }

        if !game_run.result.anomalies.is_empty() {
            has_anomaly = true;
        }
        total_anomalies += game_run.anomaly_records.len();
        total_ticks += game_run.result.ticks;
        *outcome_counts
            .entry(outcome_key(game_run.result.outcome))
            .or_insert(0) += 1;

        emit_log(
            "info",
            "game_finished",
            &run_id,
            Some(&game),
            Some(seed),
            Some(game_run.result.ticks),
            json!({
                "outcome": game_run.result.outcome,
                "score": game_run.result.score,
                "pelletsLeft": game_run.result.pellets_left,
                "anomalyCount": game_run.anomaly_records.len(),
            }),
        );

        println!(
            "{}",
            serde_json::to_string(&game_run.result).expect("game result should serialize")
        );
        game_results.push(game_run.result);
    }

    let run_finished_at_ms = now_ms();
    let summary = build_run_summary(
        run_id.clone(),
        run_started_at_ms,
        run_finished_at_ms,
        game_results,
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
                &run_id,
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
        &run_id,
        None,
        None,
        None,
        json!({
            "gameCount": summary.game_count,
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

fn run_game(game: &str, seed: u32, tick_limit: u64) -> GameRunResult {
    let mut engine = match GameEngine::new(seed) {
        Ok(engine) => engine,
        Err(error) => {
            // only reachable if the static template is broken
            return GameRunResult {
                result: GameResultLine {
                    game: game.to_string(),
                    seed,
                    outcome: Outcome::TickLimit,
                    ticks: 0,
                    score: 0,
                    lives: 0,
                    pellets_left: 0,
                    anomalies: vec![format!("engine construction failed: {error}")],
                },
                anomaly_records: vec![AnomalyRecord {
                    tick: 0,
                    message: format!("engine construction failed: {error}"),
                }],
            };
        }
    };

    let mut policy = StdRng::seed_from_u64(seed as u64);
    let mut anomalies = Vec::new();
    let mut anomaly_records = Vec::new();
    let mut anomaly_seen = HashSet::new();
    let mut last_score = 0i32;
    let mut last_pellets = usize::MAX;
    let mut last_tick = 0u64;

    while !engine.is_game_over() && last_tick < tick_limit {
        let (dx, dy) = next_intent(&mut policy);
        engine.apply_player_intent(dx, dy);
        engine.step();

        let snapshot = engine.snapshot();
        last_tick = snapshot.tick;
        for message in collect_snapshot_anomalies(&snapshot, engine.maze(), last_score, last_pellets)
        {
            push_anomaly(
                &mut anomalies,
                &mut anomaly_records,
                &mut anomaly_seen,
                snapshot.tick,
                message,
            );
        }
        last_score = snapshot.score;
        last_pellets = snapshot.pellets_left;
    }

    let outcome = if engine.is_game_won() {
        Outcome::Won
    } else if engine.is_game_over() {
        Outcome::Lost
    } else {
        Outcome::TickLimit
    };

    GameRunResult {
        result: GameResultLine {
            game: game.to_string(),
            seed,
            outcome,
            ticks: last_tick,
            score: engine.score(),
            lives: engine.lives(),
            pellets_left: engine.maze().pellets_remaining(),
            anomalies,
        },
        anomaly_records,
    }
}

/// Random-walk player policy: mostly keeps the current heading, sometimes
/// turns. Good enough to sweep the maze and provoke ghost contact.
fn next_intent(policy: &mut StdRng) -> (i32, i32) {
    const HEADINGS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];
    HEADINGS[policy.random_range(0..HEADINGS.len())]
}

fn collect_snapshot_anomalies(
    snapshot: &Snapshot,
    maze: &Maze,
    last_score: i32,
    last_pellets: usize,
) -> Vec<String> {
    let mut anomalies = Vec::new();
    let in_bounds =
        |x: i32, y: i32| x >= 0 && x < maze.width() && y >= 0 && y < maze.height();

    if !in_bounds(snapshot.player.x, snapshot.player.y) {
        anomalies.push(format!(
            "player out of bounds: ({},{})",
            snapshot.player.x, snapshot.player.y
        ));
    } else if maze.is_wall(snapshot.player.x, snapshot.player.y) {
        anomalies.push(format!(
            "player inside a wall: ({},{})",
            snapshot.player.x, snapshot.player.y
        ));
    }

    for ghost in &snapshot.ghosts {
        if !in_bounds(ghost.x, ghost.y) {
            anomalies.push(format!(
                "ghost {} out of bounds: ({},{})",
                ghost.personality, ghost.x, ghost.y
            ));
        } else if maze.is_wall(ghost.x, ghost.y) {
            anomalies.push(format!(
                "ghost {} inside a wall: ({},{})",
                ghost.personality, ghost.x, ghost.y
            ));
        }
    }

    if snapshot.score < last_score {
        anomalies.push(format!(
            "score decreased: {} -> {}",
            last_score, snapshot.score
        ));
    }
    if snapshot.pellets_left > last_pellets {
        anomalies.push(format!(
            "pellet count increased: {} -> {}",
            last_pellets, snapshot.pellets_left
        ));
    }
    if snapshot.lives < 0 {
        anomalies.push(format!("negative lives: {}", snapshot.lives));
    }
    if !snapshot.player.power_mode && snapshot.player.power_timer_ticks > 0 {
        anomalies.push(format!(
            "power timer running without power mode: {}",
            snapshot.player.power_timer_ticks
        ));
    }
    if snapshot.game_won && !snapshot.game_over {
        anomalies.push("game won without game over".to_string());
    }
    if snapshot.game_won && snapshot.pellets_left > 0 {
        anomalies.push(format!(
            "game won with {} pellets remaining",
            snapshot.pellets_left
        ));
    }
    anomalies
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

fn default_run_id(seed: u32, timestamp_ms: u64) -> String {
    format!("sim-{seed}-{timestamp_ms}")
}

fn build_run_summary(
    run_id: String,
    started_at_ms: u64,
    finished_at_ms: u64,
    games: Vec<GameResultLine>,
    outcome_counts: BTreeMap<String, usize>,
    anomaly_count: usize,
    total_ticks: u64,
) -> RunSummary {
    let game_count = games.len();
    let average_ticks = if game_count == 0 {
        0
    } else {
        total_ticks / game_count as u64
    };
    RunSummary {
        run_id,
        started_at_ms,
        finished_at_ms,
        game_count,
        anomaly_count,
        average_ticks,
        outcome_counts,
        games,
    }
}

fn emit_log(
    level: &str,
    event: &str,
    run_id: &str,
    game: Option<&str>,
    seed: Option<u32>,
    tick: Option<u64>,
    details: Value,
) {
    let log_line = StructuredLogLine {
        timestamp_ms: now_ms(),
        level: level.to_string(),
        event: event.to_string(),
        run_id: run_id.to_string(),
        game: game.map(|value| value.to_string()),
        seed,
        tick,
        details,
    };
    eprintln!(
        "{}",
        serde_json::to_string(&log_line).expect("structured log should serialize")
    );
}

fn outcome_key(outcome: Outcome) -> String {
    match outcome {
        Outcome::Won => "won",
        Outcome::Lost => "lost",
        Outcome::TickLimit => "tick_limit",
    }
    .to_string()
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    let summary_text = serde_json::to_string_pretty(summary).expect("run summary should serialize");
    std::fs::write(path, summary_text)
}
