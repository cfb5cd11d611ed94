use glam::Vec3;
use serde::{Deserialize, Serialize};

// ── Primitives ──────────────────────────────────────────────

pub type PlayerIndex = usize;
pub type Tick = u64;
pub type Seed = u32;

/// Linear RGB color, channels in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn with_alpha(self, a: f32) -> Rgba {
        Rgba {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

// ── Input ───────────────────────────────────────────────────

/// One player's input channel for the current frame.
/// `x`/`y` are the analog axes in [-1, 1]; `dash` is the button-down edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlInput {
    pub x: f32,
    pub y: f32,
    pub dash: bool,
}

pub const NULL_INPUT: ControlInput = ControlInput {
    x: 0.0,
    y: 0.0,
    dash: false,
};

impl ControlInput {
    /// Stick heading (radians) and magnitude, with the deadzone applied.
    pub fn heading_and_magnitude(&self, deadzone: f32) -> (f32, f32) {
        let d = (self.x * self.x + self.y * self.y).sqrt();
        let a = self.y.atan2(self.x);
        if d < deadzone {
            (a, 0.0)
        } else {
            (a, d.min(1.0))
        }
    }
}

/// Everything sampled from the input collaborator for one frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    /// Indexed by player index. Missing entries read as `NULL_INPUT`.
    pub players: Vec<ControlInput>,
    pub switch: bool,
    pub restart: bool,
}

impl FrameInput {
    pub fn idle(player_count: usize) -> Self {
        Self {
            players: vec![NULL_INPUT; player_count],
            switch: false,
            restart: false,
        }
    }

    pub fn player(&self, index: PlayerIndex) -> ControlInput {
        self.players.get(index).copied().unwrap_or(NULL_INPUT)
    }
}

// ── Player ──────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Airborne or not yet settled this tick.
    Unknown,
    /// Resting on the ground; a round-winning candidate.
    Grounded,
    /// Fell out of bounds. Terminal until the next restart.
    Dead,
}

/// Physics state of one body as reported by the physics collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodyState {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Yaw, measured as `atan2(forward.z, forward.x)`.
    pub heading: f32,
}

// ── Contacts ────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactTarget {
    Ground,
    Player(PlayerIndex),
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContactPoint {
    pub point: Vec3,
    /// Unit normal pointing away from `other`, towards `body`.
    pub normal: Vec3,
}

/// A contact reported for `body` touching `other` during the last physics step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContactEvent {
    pub body: PlayerIndex,
    pub other: ContactTarget,
    pub points: Vec<ContactPoint>,
}

// ── Presentation ────────────────────────────────────────────

/// One-way commands for the rendering, particle, animation and UI layers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PresentationCommand {
    PlayerColor { player: PlayerIndex, color: Rgb },
    DashEmission { player: PlayerIndex, rate: f32 },
    TurnFeedback { player: PlayerIndex, intensity: f32 },
    DashTrigger { player: PlayerIndex },
    ShowVictory { color: Rgb },
    HideVictory,
    GroundColor(Rgba),
    Background { hue: f32, saturation: f32, value: f32 },
    CameraHeight(f32),
    GroundHeight(f32),
}

// ── Round results ───────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum RoundOutcome {
    Winner { player: PlayerIndex, color: Rgb },
    WipeOut,
}
