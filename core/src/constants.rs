use crate::types::Rgb;

// All durations are in seconds unless noted.

// Round
pub const PLAYER_COUNT: usize = 4;
pub const VICTORY_DELAY: f32 = 2.0;
pub const SPAWN_RADIUS: f32 = 20.0;
pub const SPAWN_HEIGHT: f32 = 5.0;
pub const SPAWN_JITTER: f32 = 2.0;
pub const DEATH_Y: f32 = -5.0;

pub const PALETTE: [Rgb; PLAYER_COUNT] = [
    Rgb::new(1.0, 0.25, 0.25),
    Rgb::new(0.25, 1.0, 0.25),
    Rgb::new(0.25, 0.5, 1.0),
    Rgb::new(1.0, 0.9, 0.2),
];

// Player motion
pub const MOTION_FORCE_FACTOR: f32 = 20.0;
pub const ANGLE_DAMPING: f32 = 1.0;
pub const TURN_FEEDBACK_GAIN: f32 = 10.0;
pub const TURN_FEEDBACK_RATE: f32 = 5.0;
pub const STICK_DEADZONE: f32 = 0.1;

// Dash
pub const DASH_IMPULSE: f32 = 20.0;
pub const DASH_WINDOW: f32 = 1.0;
pub const DASH_PUSH_FORCE: f32 = 500.0;
pub const DASH_PUSH_RADIUS: f32 = 10.0;
pub const MAX_PARTICLE_RATE: f32 = 10.0;
pub const DASH_PARTICLE_RATE: f32 = 100.0;

// Grounding: minimum upward component of a ground contact normal
pub const GROUND_NORMAL_MIN: f32 = 0.8;

// Simulated players
pub const SIM_DASH_CHANCE: f32 = 0.02;
pub const SIM_DWELL_MIN: f32 = 0.2;
pub const SIM_DWELL_SPAN: f32 = 0.5;
pub const SIM_HEADING_JITTER: f32 = 1.0;

// Assist targeting
pub const ASSIST_HALF_ANGLE: f32 = 0.5;
pub const ASSIST_DISTANCE: f32 = 10.0;

// Environment
pub const LEVEL_GAIN: f32 = 10.0;
pub const GROUND_RATE: f32 = 10.0;
pub const CAMERA_RATE: f32 = 1.0;
pub const HUE_FREQUENCY: f32 = 1.0;
pub const HUE_OFFSET: f32 = 0.0;
pub const GROUND_SATURATION: f32 = 1.0;
pub const GROUND_VALUE: f32 = 1.0;
pub const GROUND_ALPHA: f32 = 0.5;

// Audio capture
pub const SAMPLE_COUNT: usize = 2048;
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;
pub const CAPTURE_LENGTH: u32 = 10;
pub const CAPTURE_REFRESH: f32 = 5.0;

// Tick rate for the host loop
pub const TICK_RATE: u32 = 60;
