//! Tile Siege headless runner
//!
//! Loads a map and tuning, lets the autopilot play, and reports the result.
//! Useful for soak-testing balance changes without a renderer.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clap::Parser;

use tile_siege::audio::{AudioManager, LogBackend};
use tile_siege::consts::{SIM_DT, TICK_RATE};
use tile_siege::platform::FrameTimer;
use tile_siege::sim::{GamePhase, TileGrid};
use tile_siege::view::FrameView;
use tile_siege::{Game, Tuning};

const BUNDLED_MAP: &str = include_str!("../assets/maps/world01.txt");

#[derive(Parser, Debug)]
#[command(name = "tile-siege")]
#[command(about = "Run a Tile Siege session under the autopilot")]
struct Args {
    /// Map file (whitespace-separated tile codes); defaults to the bundled map
    #[arg(long)]
    map: Option<PathBuf>,
    /// JSON tuning overrides
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// RNG seed; defaults to the clock
    #[arg(long)]
    seed: Option<u64>,
    /// Simulated seconds to run
    #[arg(long, default_value_t = 120.0)]
    seconds: f64,
    /// Pace frames against the wall clock
    #[arg(long)]
    realtime: bool,
    /// Print the final frame as JSON
    #[arg(long)]
    snapshot: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let tuning = match &args.tuning {
        Some(path) => match Tuning::load(path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => Tuning::default(),
    };

    let grid = match &args.map {
        Some(path) => TileGrid::load(
            path,
            tuning.world_rows,
            tuning.world_cols,
            tuning.tile_size,
            tuning.palette.clone(),
        ),
        None => TileGrid::parse(
            BUNDLED_MAP,
            tuning.world_rows,
            tuning.world_cols,
            tuning.tile_size,
            tuning.palette.clone(),
        ),
    };
    let grid = match grid {
        Ok(grid) => Arc::new(grid),
        Err(e) => {
            log::error!("Map rejected: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let seed = args.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });

    log::info!("Tile Siege (headless) starting...");
    let audio = AudioManager::new(Some(Box::new(LogBackend)));
    let mut game = Game::new(grid, tuning, seed, audio);
    game.idle_mode = true;

    let total_ticks = (args.seconds.max(0.0) * TICK_RATE as f64).round() as u64;
    let mut ran = 0u64;
    let mut timer = FrameTimer::new();
    while ran < total_ticks {
        if args.realtime {
            std::thread::sleep(Duration::from_secs_f64(SIM_DT));
            // Measured, so sleep overshoot turns into catch-up ticks
            let dt = timer.lap();
            ran += game.frame(dt, |_| {}) as u64;
        } else {
            game.run_ticks(1);
            ran += 1;
        }
        if game.runs().iter().any(|run| run.outcome == GamePhase::Win) {
            break;
        }
    }

    for (i, run) in game.runs().iter().enumerate() {
        println!(
            "run {} | {:?} | score {} | {} ticks",
            i + 1,
            run.outcome,
            run.score,
            run.ticks
        );
    }

    let state = game.state();
    println!(
        "seed {} | {:?} | score {} | {} play ticks | boss {}",
        state.seed,
        state.phase,
        state.score,
        state.time_ticks,
        if state.boss_defeated {
            "defeated"
        } else if state.boss_active() {
            "active"
        } else {
            "not spawned"
        }
    );

    if args.snapshot {
        match serde_json::to_string_pretty(&FrameView::capture(state)) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                log::error!("Snapshot failed: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
