pub mod assist;
pub mod audio;
pub mod config;
pub mod constants;
pub mod environment;
pub mod error;
pub mod game;
pub mod math;
pub mod physics;
pub mod player;
pub mod prng;
pub mod round;
pub mod schedule;
pub mod types;

pub use assist::{help_direction, AssistTarget};
pub use audio::{rms_level, AudioBackend, ClipState, Microphone};
pub use config::*;
pub use constants::*;
pub use environment::{hsv_to_rgb, EnvironmentController};
pub use error::ConfigError;
pub use game::{Game, StepReport};
pub use physics::{forward, ArenaParams, ArenaPhysics, Physics};
pub use player::{Player, PlayerEvent, PlayerFrame};
pub use prng::*;
pub use round::{Round, RoundFrame};
pub use types::*;
