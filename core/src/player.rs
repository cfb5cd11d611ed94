use glam::Vec3;
use tracing::debug;

use crate::assist::help_direction;
use crate::config::{AssistConfig, PlayerConfig, RoundConfig};
use crate::constants::{SIM_HEADING_JITTER, TURN_FEEDBACK_GAIN};
use crate::math::{approach, smoothing_factor, wrap_angle};
use crate::physics::Physics;
use crate::prng::Prng;
use crate::schedule::{DeferredQueue, FireAt};
use crate::types::*;

/// Status changes the round coordinator must react to synchronously.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerEvent {
    Died,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DashAction {
    CloseWindow,
}

/// Randomized "orbit the center with jitter" controller.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimulatedControl {
    pub timeout: f32,
    pub heading: f32,
    pub intensity: f32,
}

/// Read-only context for one player's update.
pub struct PlayerFrame<'a> {
    pub dt: f32,
    pub tick: Tick,
    pub now: f64,
    pub input: ControlInput,
    pub simulate: bool,
    pub death_y: f32,
    /// Positions of every player this tick, by index.
    pub positions: &'a [Vec3],
    pub assist: &'a AssistConfig,
}

#[derive(Clone, Debug)]
pub struct Player {
    index: PlayerIndex,
    color: Rgb,
    status: Status,
    config: PlayerConfig,
    dash_active: bool,
    dash_windows: DeferredQueue<DashAction>,
    turn_feedback: f32,
    sim: SimulatedControl,
    rng: Prng,
}

impl Player {
    pub fn new(index: PlayerIndex, color: Rgb, config: &PlayerConfig, seed: Seed) -> Self {
        Self {
            index,
            color,
            status: Status::Unknown,
            config: config.clone(),
            dash_active: false,
            dash_windows: DeferredQueue::new(),
            turn_feedback: 0.0,
            sim: SimulatedControl::default(),
            rng: Prng::new(seed),
        }
    }

    pub fn index(&self) -> PlayerIndex {
        self.index
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn dash_active(&self) -> bool {
        self.dash_active
    }

    pub fn turn_feedback(&self) -> f32 {
        self.turn_feedback
    }

    pub fn simulated_control(&self) -> SimulatedControl {
        self.sim
    }

    /// Respawn at a random point above the ground disc, at rest, status unknown.
    pub fn restart(&mut self, ground_y: f32, round: &RoundConfig, physics: &mut dyn Physics) {
        let r = self.rng.inside_unit_sphere();
        let position = Vec3::new(
            r.x * round.spawn_radius,
            ground_y + round.spawn_height + r.y * round.spawn_jitter,
            r.z * round.spawn_radius,
        );
        physics.place(self.index, position);
        self.status = Status::Unknown;
    }

    /// Forget last tick's grounding; Dead is sticky.
    pub fn check_status(&mut self) {
        if self.status != Status::Dead {
            self.status = Status::Unknown;
        }
    }

    /// Close dash windows that are due. Run before contacts are dispatched
    /// so a contact on the closing tick no longer pushes.
    pub fn expire_dash(&mut self, tick: Tick, now: f64) {
        for action in self.dash_windows.drain_due(tick, now) {
            match action {
                DashAction::CloseWindow => self.dash_active = false,
            }
        }
    }

    /// React to one contact reported by the physics collaborator.
    pub fn on_contact(&mut self, contact: &ContactEvent, physics: &mut dyn Physics) {
        match contact.other {
            ContactTarget::Player(other) => {
                if self.dash_active {
                    if let Some(first) = contact.points.first() {
                        let (force, radius) = (self.config.dash_push_force, self.config.dash_push_radius);
                        physics.add_explosion_force(self.index, force, first.point, radius);
                        physics.add_explosion_force(other, force, first.point, radius);
                    }
                }
            }
            ContactTarget::Ground => {
                if self.status == Status::Unknown
                    && contact
                        .points
                        .iter()
                        .any(|c| c.normal.dot(Vec3::Y) > self.config.ground_normal_min)
                {
                    self.status = Status::Grounded;
                }
            }
        }
    }

    fn simulated_heading(&mut self, dt: f32, position: Vec3) -> (f32, f32) {
        self.sim.timeout -= dt;
        if self.sim.timeout < 0.0 {
            self.sim.timeout = self.rng.range(self.config.sim_dwell_min, self.config.sim_dwell_max);
            self.sim.heading =
                position.z.atan2(position.x) + (self.rng.value() - 0.5) * SIM_HEADING_JITTER;
            self.sim.intensity = self.rng.value();
        }
        (self.sim.heading, self.sim.intensity)
    }

    /// Steering, motion, dash and the fall check for one tick.
    pub fn update(
        &mut self,
        frame: &PlayerFrame<'_>,
        physics: &mut dyn Physics,
        out: &mut Vec<PresentationCommand>,
    ) -> Option<PlayerEvent> {
        let i = self.index;
        self.expire_dash(frame.tick, frame.now);

        let (a, d) = if frame.simulate {
            self.simulated_heading(frame.dt, physics.body(i).position)
        } else {
            frame.input.heading_and_magnitude(self.config.deadzone)
        };
        let c = &self.config;

        // Exponential turn toward the stick heading, gated by stick magnitude
        let heading = physics.body(i).heading;
        let step = wrap_angle(heading - a) * smoothing_factor(c.angle_damping, frame.dt);
        physics.rotate_yaw(i, -d * step);

        self.turn_feedback = approach(
            self.turn_feedback,
            d * step * TURN_FEEDBACK_GAIN,
            c.turn_feedback_rate,
            frame.dt,
        );
        out.push(PresentationCommand::TurnFeedback {
            player: i,
            intensity: self.turn_feedback,
        });

        physics.add_forward_force(i, d * c.motion_force_factor);

        let rate = if self.dash_active {
            c.dash_particle_rate
        } else {
            d * c.max_particle_rate
        };
        out.push(PresentationCommand::DashEmission { player: i, rate });

        let dash = frame.input.dash || (frame.simulate && self.rng.value() < self.config.sim_dash_chance);
        if dash {
            self.dash(frame, physics, out);
        }

        if self.status != Status::Dead && physics.body(i).position.y < frame.death_y {
            self.status = Status::Dead;
            debug!(player = i, "fell out of bounds");
            return Some(PlayerEvent::Died);
        }
        None
    }

    fn dash(&mut self, frame: &PlayerFrame<'_>, physics: &mut dyn Physics, out: &mut Vec<PresentationCommand>) {
        let i = self.index;
        let heading = physics.body(i).heading;
        if let Some(target) = help_direction(i, heading, frame.positions, frame.assist) {
            debug!(player = i, target = target.player, "dash assist");
            physics.set_heading(i, target.angle);
        }
        physics.add_forward_impulse(i, self.config.dash_impulse);

        self.dash_active = true;
        self.dash_windows.schedule(
            DashAction::CloseWindow,
            FireAt::Time(frame.now + self.config.dash_window as f64),
        );
        out.push(PresentationCommand::DashTrigger { player: i });
    }
}
