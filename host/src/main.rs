mod audio;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use catdash_core::*;
use clap::Parser;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::audio::SyntheticAudio;

#[derive(Parser, Debug)]
#[command(name = "catdash", about = "Run party rounds headless against the arena stand-in")]
struct Args {
    /// JSON game config; missing fields take their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulated seconds to run
    #[arg(long, default_value_t = 60.0)]
    seconds: f64,

    #[arg(long, default_value_t = TICK_RATE)]
    tick_rate: u32,

    /// Overrides the seed from the config file
    #[arg(long)]
    seed: Option<u32>,

    /// Drive every player from the randomized orbit controller
    #[arg(long)]
    simulate: bool,

    /// Press the switch button every N seconds (0 = never)
    #[arg(long, default_value_t = 0.0)]
    switch_every: f64,

    /// Log filter, e.g. "info" or "catdash_core=debug"
    #[arg(long, default_value = "info")]
    log: String,
}

#[derive(Serialize)]
struct Summary {
    ticks: Tick,
    seconds: f64,
    rounds_started: u32,
    wins: BTreeMap<PlayerIndex, u32>,
    wipe_outs: u32,
    final_statuses: Vec<Status>,
    device: Option<String>,
    ground_height: f32,
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&args.log))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if args.tick_rate == 0 {
        bail!("tick rate must be positive");
    }

    let mut config = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.round.seed = seed;
    }
    config.round.simulate_players |= args.simulate;
    config.validate().context("invalid game config")?;

    let dt = 1.0 / args.tick_rate as f32;
    let ticks = (args.seconds * args.tick_rate as f64).ceil() as Tick;
    let switch_ticks = (args.switch_every * args.tick_rate as f64).round() as Tick;
    let players = config.round.player_count;

    let mut audio = SyntheticAudio::demo();
    let mut physics = ArenaPhysics::new(players, ArenaParams::default());
    let mut game = Game::new(&config, &mut audio)?;
    let idle = FrameInput::idle(players);

    info!(
        players,
        seed = config.round.seed,
        ticks,
        simulate = config.round.simulate_players,
        "starting run"
    );

    let mut wins: BTreeMap<PlayerIndex, u32> = BTreeMap::new();
    let mut wipe_outs = 0;
    let start = Instant::now();

    for tick in 1..=ticks {
        let mut input = idle.clone();
        input.switch = switch_ticks > 0 && tick % switch_ticks == 0;

        audio.advance(dt as f64);
        let contacts = physics.step(dt);
        let report = game.step(dt, &input, &contacts, &mut physics, &mut audio);
        debug!(tick, commands = report.commands.len(), level = report.level, "tick");

        match report.outcome {
            Some(RoundOutcome::Winner { player, color }) => {
                *wins.entry(player).or_default() += 1;
                info!(tick, player, ?color, "winner");
            }
            Some(RoundOutcome::WipeOut) => {
                wipe_outs += 1;
                info!(tick, "wipe out");
            }
            None => {}
        }
    }

    info!(elapsed_ms = start.elapsed().as_millis() as u64, "run finished");

    let summary = Summary {
        ticks: game.tick(),
        seconds: game.time(),
        rounds_started: game.round().round_number(),
        wins,
        wipe_outs,
        final_statuses: game.round().statuses(),
        device: game.microphone().device().map(str::to_string),
        ground_height: game.environment().ground_height(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
