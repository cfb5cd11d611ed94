use crate::audio::{AudioBackend, Microphone};
use crate::config::GameConfig;
use crate::environment::EnvironmentController;
use crate::error::ConfigError;
use crate::physics::Physics;
use crate::round::{Round, RoundFrame};
use crate::types::*;

/// What one tick produced for the outside world.
#[derive(Clone, Debug, PartialEq)]
pub struct StepReport {
    pub tick: Tick,
    pub commands: Vec<PresentationCommand>,
    pub outcome: Option<RoundOutcome>,
    /// RMS level captured this tick.
    pub level: f32,
}

/// Top-level simulation: round coordinator plus the audio-reactive environment.
#[derive(Debug)]
pub struct Game {
    round: Round,
    microphone: Microphone,
    environment: EnvironmentController,
    tick: Tick,
    time: f64,
    outbox: Vec<PresentationCommand>,
}

impl Game {
    pub fn new(config: &GameConfig, audio: &mut dyn AudioBackend) -> Result<Self, ConfigError> {
        let mut outbox = Vec::new();
        let round = Round::new(config, &mut outbox)?;
        Ok(Self {
            round,
            microphone: Microphone::new(&config.audio, audio),
            environment: EnvironmentController::new(&config.environment),
            tick: 0,
            time: 0.0,
            outbox,
        })
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn microphone(&self) -> &Microphone {
        &self.microphone
    }

    pub fn environment(&self) -> &EnvironmentController {
        &self.environment
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Advance one tick.
    ///
    /// Order: round (deferred restarts, status refresh, `contacts`, players,
    /// restart button, judgement), then audio capture and the switch button,
    /// then the environment. `contacts` are the events from the physics step
    /// that just ran.
    pub fn step(
        &mut self,
        dt: f32,
        input: &FrameInput,
        contacts: &[ContactEvent],
        physics: &mut dyn Physics,
        audio: &mut dyn AudioBackend,
    ) -> StepReport {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        self.tick += 1;
        self.time += dt as f64;
        let mut out = std::mem::take(&mut self.outbox);

        let frame = RoundFrame {
            tick: self.tick,
            now: self.time,
            dt,
            input,
            contacts,
            ground_y: self.environment.ground_height(),
        };
        let outcome = self.round.step(&frame, physics, &mut out);

        let level = self.microphone.update(self.tick, self.time, audio);
        if input.switch {
            self.microphone.next_device(audio);
        }

        self.environment.update(dt, self.time, level, &mut out);
        physics.set_ground_height(self.environment.ground_height());

        StepReport {
            tick: self.tick,
            commands: out,
            outcome,
            level,
        }
    }
}
