use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;
use crate::types::{Rgb, Seed};

// ── Sections ────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    pub seed: Seed,
    pub player_count: usize,
    /// One color per player index; must hold at least `player_count` entries.
    pub palette: Vec<Rgb>,
    pub victory_delay: f32,
    pub spawn_radius: f32,
    pub spawn_height: f32,
    pub spawn_jitter: f32,
    pub death_y: f32,
    /// Drive every player from the randomized orbit controller instead of input.
    pub simulate_players: bool,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            player_count: PLAYER_COUNT,
            palette: PALETTE.to_vec(),
            victory_delay: VICTORY_DELAY,
            spawn_radius: SPAWN_RADIUS,
            spawn_height: SPAWN_HEIGHT,
            spawn_jitter: SPAWN_JITTER,
            death_y: DEATH_Y,
            simulate_players: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub motion_force_factor: f32,
    pub angle_damping: f32,
    pub turn_feedback_rate: f32,
    pub deadzone: f32,
    pub dash_impulse: f32,
    pub dash_window: f32,
    pub dash_push_force: f32,
    pub dash_push_radius: f32,
    pub max_particle_rate: f32,
    pub dash_particle_rate: f32,
    pub ground_normal_min: f32,
    pub sim_dash_chance: f32,
    pub sim_dwell_min: f32,
    pub sim_dwell_max: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            motion_force_factor: MOTION_FORCE_FACTOR,
            angle_damping: ANGLE_DAMPING,
            turn_feedback_rate: TURN_FEEDBACK_RATE,
            deadzone: STICK_DEADZONE,
            dash_impulse: DASH_IMPULSE,
            dash_window: DASH_WINDOW,
            dash_push_force: DASH_PUSH_FORCE,
            dash_push_radius: DASH_PUSH_RADIUS,
            max_particle_rate: MAX_PARTICLE_RATE,
            dash_particle_rate: DASH_PARTICLE_RATE,
            ground_normal_min: GROUND_NORMAL_MIN,
            sim_dash_chance: SIM_DASH_CHANCE,
            sim_dwell_min: SIM_DWELL_MIN,
            sim_dwell_max: SIM_DWELL_MIN + SIM_DWELL_SPAN,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistConfig {
    /// Half-angle of the targeting cone, radians.
    pub half_angle: f32,
    pub max_distance: f32,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            half_angle: ASSIST_HALF_ANGLE,
            max_distance: ASSIST_DISTANCE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub level_gain: f32,
    pub ground_rate: f32,
    pub camera_rate: f32,
    pub hue_frequency: f32,
    pub hue_offset: f32,
    pub saturation: f32,
    pub value: f32,
    pub alpha: f32,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            level_gain: LEVEL_GAIN,
            ground_rate: GROUND_RATE,
            camera_rate: CAMERA_RATE,
            hue_frequency: HUE_FREQUENCY,
            hue_offset: HUE_OFFSET,
            saturation: GROUND_SATURATION,
            value: GROUND_VALUE,
            alpha: GROUND_ALPHA,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub sample_count: usize,
    pub default_sample_rate: u32,
    /// Length of the looping capture clip, seconds.
    pub capture_length: u32,
    /// Seconds of playback before the clip is dropped and capture restarts.
    pub capture_refresh: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_count: SAMPLE_COUNT,
            default_sample_rate: DEFAULT_SAMPLE_RATE,
            capture_length: CAPTURE_LENGTH,
            capture_refresh: CAPTURE_REFRESH,
        }
    }
}

// ── Top level ───────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub round: RoundConfig,
    pub player: PlayerConfig,
    pub assist: AssistConfig,
    pub environment: EnvironmentConfig,
    pub audio: AudioConfig,
}

/// Stock configuration: four players, default palette and tunables.
pub fn default_config(seed: Seed) -> GameConfig {
    GameConfig {
        round: RoundConfig {
            seed,
            ..RoundConfig::default()
        },
        ..GameConfig::default()
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { field, value })
    }
}

impl GameConfig {
    /// Reject configurations the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let round = &self.round;
        if round.player_count == 0 {
            return Err(ConfigError::NoPlayers);
        }
        if round.palette.len() < round.player_count {
            return Err(ConfigError::PaletteTooShort {
                colors: round.palette.len(),
                players: round.player_count,
            });
        }
        non_negative("round.victory_delay", round.victory_delay)?;
        non_negative("round.spawn_radius", round.spawn_radius)?;
        non_negative("round.spawn_jitter", round.spawn_jitter)?;

        let p = &self.player;
        non_negative("player.motion_force_factor", p.motion_force_factor)?;
        non_negative("player.angle_damping", p.angle_damping)?;
        non_negative("player.turn_feedback_rate", p.turn_feedback_rate)?;
        non_negative("player.deadzone", p.deadzone)?;
        non_negative("player.dash_impulse", p.dash_impulse)?;
        non_negative("player.dash_window", p.dash_window)?;
        non_negative("player.dash_push_force", p.dash_push_force)?;
        non_negative("player.dash_push_radius", p.dash_push_radius)?;
        non_negative("player.sim_dash_chance", p.sim_dash_chance)?;
        non_negative("player.sim_dwell_min", p.sim_dwell_min)?;
        if !(p.sim_dwell_max > p.sim_dwell_min) {
            return Err(ConfigError::InvalidDwell {
                min: p.sim_dwell_min,
                max: p.sim_dwell_max,
            });
        }

        non_negative("assist.half_angle", self.assist.half_angle)?;
        non_negative("assist.max_distance", self.assist.max_distance)?;

        let env = &self.environment;
        non_negative("environment.ground_rate", env.ground_rate)?;
        non_negative("environment.camera_rate", env.camera_rate)?;
        non_negative("environment.saturation", env.saturation)?;
        non_negative("environment.value", env.value)?;

        if self.audio.sample_count == 0 {
            return Err(ConfigError::EmptySampleBuffer);
        }
        non_negative("audio.capture_refresh", self.audio.capture_refresh)?;
        Ok(())
    }
}
