//! Runs a scripted round headless and prints the outcomes as JSON.
//!
//! Usage:
//!   cargo run -p catdash-core --example wipeout-round -- [wipeout|lastman|sim] > outcomes.json

use catdash_core::*;
use glam::Vec3;
use serde::Serialize;

struct Silence;

impl AudioBackend for Silence {
    fn devices(&self) -> Vec<String> {
        Vec::new()
    }
    fn frequency_caps(&self, _device: &str) -> (u32, u32) {
        (0, 0)
    }
    fn start_capture(&mut self, _device: &str, _length: u32, _frequency: u32) -> bool {
        false
    }
    fn capture_position(&self, _device: &str) -> usize {
        0
    }
    fn stop_capture(&mut self, _device: &str) {}
    fn read_output(&self, out: &mut [f32]) {
        out.iter_mut().for_each(|s| *s = 0.0);
    }
}

#[derive(Serialize)]
struct Decided {
    tick: Tick,
    time: f64,
    outcome: RoundOutcome,
}

fn main() {
    let mode = std::env::args().nth(1).unwrap_or_else(|| "wipeout".to_string());

    let mut config = default_config(42);
    let ticks: u64 = match mode.as_str() {
        // Everyone shoved off the disc once they have landed
        "wipeout" => 600,
        // Players 0..2 shoved off one after another, player 3 stays
        "lastman" => 900,
        // Randomized orbit controllers for a minute
        "sim" => {
            config.round.simulate_players = true;
            3600
        }
        _ => {
            eprintln!("Unknown mode: {}. Use 'wipeout', 'lastman', or 'sim'", mode);
            std::process::exit(1);
        }
    };

    let dt = 1.0 / TICK_RATE as f32;
    let mut audio = Silence;
    let mut physics = ArenaPhysics::new(config.round.player_count, ArenaParams::default());
    let mut game = match Game::new(&config, &mut audio) {
        Ok(game) => game,
        Err(e) => {
            eprintln!("bad config: {}", e);
            std::process::exit(1);
        }
    };
    let input = FrameInput::idle(config.round.player_count);

    let mut decided = Vec::new();
    for tick in 0..ticks {
        // Scripted shoves, two seconds apart, after a settling period
        let shove = |i: usize| Vec3::new(40.0 + 3.0 * i as f32, 0.5, 0.0);
        match mode.as_str() {
            "wipeout" if tick == 180 => {
                for i in 0..config.round.player_count {
                    physics.place(i, shove(i));
                }
            }
            "lastman" if tick >= 180 && tick % 120 == 0 && tick < 180 + 3 * 120 => {
                physics.place(((tick - 180) / 120) as usize, shove(0));
            }
            _ => {}
        }

        let contacts = physics.step(dt);
        let report = game.step(dt, &input, &contacts, &mut physics, &mut audio);
        if let Some(outcome) = report.outcome {
            decided.push(Decided {
                tick: report.tick,
                time: game.time(),
                outcome,
            });
        }
    }

    eprintln!("=== Round result ({} mode) ===", mode);
    eprintln!("Final tick: {}", game.tick());
    eprintln!("Rounds started: {}", game.round().round_number());
    eprintln!("Decisions: {}", decided.len());
    eprintln!("Statuses: {:?}", game.round().statuses());

    println!("{}", serde_json::to_string(&decided).unwrap());
}
