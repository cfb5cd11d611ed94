use glam::Vec3;
use tracing::{debug, info};

use crate::config::{AssistConfig, GameConfig, RoundConfig};
use crate::error::ConfigError;
use crate::physics::Physics;
use crate::player::{Player, PlayerEvent, PlayerFrame};
use crate::prng::player_seed;
use crate::schedule::{DeferredQueue, FireAt};
use crate::types::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RoundAction {
    Restart,
}

/// Everything the coordinator reads for one tick.
pub struct RoundFrame<'a> {
    pub tick: Tick,
    pub now: f64,
    pub dt: f32,
    pub input: &'a FrameInput,
    pub contacts: &'a [ContactEvent],
    /// Current ground surface height, used when respawning.
    pub ground_y: f32,
}

/// Owns the player roster and decides when a round is won or lost.
#[derive(Clone, Debug)]
pub struct Round {
    config: RoundConfig,
    assist: AssistConfig,
    players: Vec<Player>,
    ended: bool,
    round_number: u32,
    deferred: DeferredQueue<RoundAction>,
}

impl Round {
    /// Create the roster and defer the first restart to the next tick.
    pub fn new(config: &GameConfig, out: &mut Vec<PresentationCommand>) -> Result<Self, ConfigError> {
        config.validate()?;
        let round = &config.round;

        let players: Vec<Player> = (0..round.player_count)
            .map(|i| Player::new(i, round.palette[i], &config.player, player_seed(round.seed, i)))
            .collect();
        for p in &players {
            out.push(PresentationCommand::PlayerColor {
                player: p.index(),
                color: p.color(),
            });
        }

        let mut deferred = DeferredQueue::new();
        deferred.schedule(RoundAction::Restart, FireAt::Tick(1));

        Ok(Self {
            config: round.clone(),
            assist: config.assist.clone(),
            players,
            ended: false,
            round_number: 0,
            deferred,
        })
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn ended(&self) -> bool {
        self.ended
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    /// Number of restarts still waiting to fire.
    pub fn pending_restarts(&self) -> usize {
        self.deferred.len()
    }

    pub fn statuses(&self) -> Vec<Status> {
        self.players.iter().map(Player::status).collect()
    }

    /// Respawn everyone and reopen the round. Safe to call at any point of a tick.
    pub fn restart(&mut self, ground_y: f32, physics: &mut dyn Physics, out: &mut Vec<PresentationCommand>) {
        self.ended = false;
        self.round_number += 1;
        out.push(PresentationCommand::HideVictory);
        for p in &mut self.players {
            p.restart(ground_y, &self.config, physics);
        }
        info!(round = self.round_number, ground_y, "round started");
    }

    /// Demote every non-Dead status to Unknown.
    pub fn check_statuses(&mut self) {
        for p in &mut self.players {
            p.check_status();
        }
    }

    /// Decide the round from the current statuses. No-op once ended.
    pub fn evaluate_round_end(
        &mut self,
        now: f64,
        ground_y: f32,
        physics: &mut dyn Physics,
        out: &mut Vec<PresentationCommand>,
    ) -> Option<RoundOutcome> {
        if self.ended {
            return None;
        }

        let mut groundeds = 0;
        let mut deads = 0;
        let mut winner = 0;
        for (i, p) in self.players.iter().enumerate() {
            match p.status() {
                // Contacts have not settled; judge again next tick
                Status::Unknown => return None,
                Status::Grounded => {
                    groundeds += 1;
                    winner = i;
                }
                Status::Dead => deads += 1,
            }
        }

        if groundeds == 1 {
            self.ended = true;
            let color = self.players[winner].color();
            out.push(PresentationCommand::ShowVictory { color });
            self.deferred.schedule(
                RoundAction::Restart,
                FireAt::Time(now + self.config.victory_delay as f64),
            );
            info!(round = self.round_number, winner, "round won");
            Some(RoundOutcome::Winner {
                player: winner,
                color,
            })
        } else if deads == self.players.len() {
            self.ended = true;
            info!(round = self.round_number, "everyone fell, restarting");
            self.restart(ground_y, physics, out);
            Some(RoundOutcome::WipeOut)
        } else {
            None
        }
    }

    /// One coordinator tick: deferred restarts, status refresh and dash
    /// expiry, contacts, players in index order, the global restart button,
    /// then judgement.
    /// Contacts are dropped on a tick where a deferred restart fired.
    pub fn step(
        &mut self,
        frame: &RoundFrame<'_>,
        physics: &mut dyn Physics,
        out: &mut Vec<PresentationCommand>,
    ) -> Option<RoundOutcome> {
        let mut restarted = false;
        for action in self.deferred.drain_due(frame.tick, frame.now) {
            match action {
                RoundAction::Restart => {
                    self.restart(frame.ground_y, physics, out);
                    restarted = true;
                }
            }
        }

        self.check_statuses();
        for p in &mut self.players {
            p.expire_dash(frame.tick, frame.now);
        }

        // Contacts were generated before the respawn teleported everyone
        let contacts = if restarted { &[][..] } else { frame.contacts };
        for contact in contacts {
            match self.players.get_mut(contact.body) {
                Some(p) => p.on_contact(contact, physics),
                None => debug!(body = contact.body, "contact for unknown body ignored"),
            }
        }

        let positions: Vec<Vec3> = (0..self.players.len())
            .map(|i| physics.body(i).position)
            .collect();
        for i in 0..self.players.len() {
            let player_frame = PlayerFrame {
                dt: frame.dt,
                tick: frame.tick,
                now: frame.now,
                input: frame.input.player(i),
                simulate: self.config.simulate_players,
                death_y: self.config.death_y,
                positions: &positions,
                assist: &self.assist,
            };
            let event = self.players[i].update(&player_frame, physics, out);
            if event == Some(PlayerEvent::Died) {
                self.check_statuses();
            }
        }

        if frame.input.restart {
            self.restart(frame.ground_y, physics, out);
        }

        self.evaluate_round_end(frame.now, frame.ground_y, physics, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_config;
    use crate::physics::{ArenaParams, ArenaPhysics};

    fn setup() -> (Round, ArenaPhysics, Vec<PresentationCommand>) {
        let mut out = Vec::new();
        let round = Round::new(&default_config(42), &mut out).unwrap();
        (round, ArenaPhysics::new(4, ArenaParams::default()), out)
    }

    fn ground(body: usize) -> ContactEvent {
        ContactEvent {
            body,
            other: ContactTarget::Ground,
            points: vec![ContactPoint {
                point: Vec3::ZERO,
                normal: Vec3::Y,
            }],
        }
    }

    fn set_statuses(round: &mut Round, physics: &mut ArenaPhysics, statuses: [Status; 4]) {
        for (i, s) in statuses.iter().enumerate() {
            match s {
                Status::Grounded => round.players[i].on_contact(&ground(i), physics),
                Status::Dead => {
                    physics.place(i, Vec3::new(0.0, -10.0, 0.0));
                    let positions = [Vec3::ZERO; 4];
                    let assist = AssistConfig::default();
                    let frame = PlayerFrame {
                        dt: 0.016,
                        tick: 0,
                        now: 0.0,
                        input: NULL_INPUT,
                        simulate: false,
                        death_y: -5.0,
                        positions: &positions,
                        assist: &assist,
                    };
                    round.players[i].update(&frame, physics, &mut Vec::new());
                }
                Status::Unknown => {}
            }
        }
    }

    #[test]
    fn creation_announces_colors_and_defers_restart() {
        let (round, _, out) = setup();
        assert_eq!(round.player_count(), 4);
        assert_eq!(out.len(), 4);
        assert!(matches!(out[2], PresentationCommand::PlayerColor { player: 2, .. }));
        assert_eq!(round.pending_restarts(), 1);
        assert_eq!(round.round_number(), 0);
    }

    #[test]
    fn short_palette_is_rejected() {
        let mut config = default_config(1);
        config.round.palette.truncate(2);
        assert!(matches!(
            Round::new(&config, &mut Vec::new()),
            Err(ConfigError::PaletteTooShort { .. })
        ));
    }

    #[test]
    fn single_grounded_wins() {
        let (mut round, mut physics, _) = setup();
        set_statuses(&mut round, &mut physics, [Status::Dead, Status::Grounded, Status::Dead, Status::Dead]);
        let mut out = Vec::new();
        let outcome = round.evaluate_round_end(3.0, 0.0, &mut physics, &mut out);
        let color = default_config(42).round.palette[1];
        assert_eq!(outcome, Some(RoundOutcome::Winner { player: 1, color }));
        assert!(round.ended());
        assert!(out.contains(&PresentationCommand::ShowVictory { color }));
        // initial restart + victory restart
        assert_eq!(round.pending_restarts(), 2);
        // Ended rounds are not re-judged
        assert_eq!(round.evaluate_round_end(3.1, 0.0, &mut physics, &mut out), None);
    }

    #[test]
    fn all_dead_restarts_immediately() {
        let (mut round, mut physics, _) = setup();
        set_statuses(&mut round, &mut physics, [Status::Dead; 4]);
        let mut out = Vec::new();
        let outcome = round.evaluate_round_end(1.0, 0.0, &mut physics, &mut out);
        assert_eq!(outcome, Some(RoundOutcome::WipeOut));
        assert!(!round.ended());
        assert_eq!(round.statuses(), vec![Status::Unknown; 4]);
        assert!(out.contains(&PresentationCommand::HideVictory));
    }

    #[test]
    fn any_unknown_defers_judgement() {
        let (mut round, mut physics, _) = setup();
        set_statuses(&mut round, &mut physics, [Status::Dead, Status::Grounded, Status::Unknown, Status::Dead]);
        assert_eq!(round.evaluate_round_end(1.0, 0.0, &mut physics, &mut Vec::new()), None);
        assert!(!round.ended());
    }

    #[test]
    fn several_grounded_is_no_decision() {
        let (mut round, mut physics, _) = setup();
        set_statuses(&mut round, &mut physics, [Status::Grounded, Status::Grounded, Status::Dead, Status::Dead]);
        assert_eq!(round.evaluate_round_end(1.0, 0.0, &mut physics, &mut Vec::new()), None);
        set_statuses(&mut round, &mut physics, [Status::Grounded; 4]);
        assert_eq!(round.evaluate_round_end(1.0, 0.0, &mut physics, &mut Vec::new()), None);
    }

    #[test]
    fn first_step_performs_deferred_restart() {
        let (mut round, mut physics, _) = setup();
        let input = FrameInput::idle(4);
        let mut out = Vec::new();
        let frame = RoundFrame {
            tick: 1,
            now: 1.0 / 60.0,
            dt: 1.0 / 60.0,
            input: &input,
            contacts: &[],
            ground_y: 0.0,
        };
        round.step(&frame, &mut physics, &mut out);
        assert_eq!(round.round_number(), 1);
        assert_eq!(round.pending_restarts(), 0);
        for i in 0..4 {
            assert!(physics.body(i).position.y >= 3.0);
        }
    }

    #[test]
    fn contacts_are_reaffirmed_every_tick() {
        let (mut round, mut physics, _) = setup();
        let input = FrameInput::idle(4);
        let mut out = Vec::new();
        let contacts = vec![ground(0)];
        let mut frame = RoundFrame {
            tick: 1,
            now: 1.0 / 60.0,
            dt: 1.0 / 60.0,
            input: &input,
            contacts: &[],
            ground_y: 0.0,
        };
        // Initial restart fires here
        round.step(&frame, &mut physics, &mut out);
        assert_eq!(round.pending_restarts(), 0);

        frame.tick = 2;
        frame.now = 2.0 / 60.0;
        frame.contacts = &contacts;
        round.step(&frame, &mut physics, &mut out);
        assert_eq!(round.players()[0].status(), Status::Grounded);

        frame.contacts = &[];
        round.step(&frame, &mut physics, &mut out);
        assert_eq!(round.players()[0].status(), Status::Unknown);
    }

    #[test]
    fn stale_contacts_ignored_on_restart_tick() {
        let (mut round, mut physics, _) = setup();
        let input = FrameInput::idle(4);
        let contacts = vec![ground(3)];
        let frame = RoundFrame {
            tick: 1,
            now: 1.0 / 60.0,
            dt: 1.0 / 60.0,
            input: &input,
            contacts: &contacts,
            ground_y: 0.0,
        };
        round.step(&frame, &mut physics, &mut Vec::new());
        assert_eq!(round.round_number(), 1);
        assert_eq!(round.statuses(), vec![Status::Unknown; 4]);
    }

    /// Counts explosion pushes on top of the arena stand-in.
    struct CountingPushes {
        inner: ArenaPhysics,
        pushes: usize,
    }

    impl Physics for CountingPushes {
        fn body(&self, index: PlayerIndex) -> BodyState {
            self.inner.body(index)
        }
        fn add_forward_force(&mut self, index: PlayerIndex, magnitude: f32) {
            self.inner.add_forward_force(index, magnitude)
        }
        fn add_forward_impulse(&mut self, index: PlayerIndex, magnitude: f32) {
            self.inner.add_forward_impulse(index, magnitude)
        }
        fn rotate_yaw(&mut self, index: PlayerIndex, radians: f32) {
            self.inner.rotate_yaw(index, radians)
        }
        fn set_heading(&mut self, index: PlayerIndex, radians: f32) {
            self.inner.set_heading(index, radians)
        }
        fn add_explosion_force(&mut self, index: PlayerIndex, force: f32, center: Vec3, radius: f32) {
            self.pushes += 1;
            self.inner.add_explosion_force(index, force, center, radius)
        }
        fn place(&mut self, index: PlayerIndex, position: Vec3) {
            self.inner.place(index, position)
        }
        fn set_ground_height(&mut self, height: f32) {
            self.inner.set_ground_height(height)
        }
    }

    fn step_at(
        round: &mut Round,
        physics: &mut dyn Physics,
        tick: Tick,
        now: f64,
        input: &FrameInput,
        contacts: &[ContactEvent],
    ) {
        let frame = RoundFrame {
            tick,
            now,
            dt: 1.0 / 60.0,
            input,
            contacts,
            ground_y: 0.0,
        };
        round.step(&frame, physics, &mut Vec::new());
    }

    #[test]
    fn dash_window_closes_before_contacts() {
        let (mut round, physics, _) = setup();
        let mut physics = CountingPushes { inner: physics, pushes: 0 };
        let idle = FrameInput::idle(4);
        let mut dashing = FrameInput::idle(4);
        dashing.players[0].dash = true;
        let bump = vec![ContactEvent {
            body: 0,
            other: ContactTarget::Player(1),
            points: vec![ContactPoint {
                point: Vec3::ZERO,
                normal: Vec3::X,
            }],
        }];

        step_at(&mut round, &mut physics, 1, 0.0, &idle, &[]);
        step_at(&mut round, &mut physics, 2, 0.1, &dashing, &[]);
        assert!(round.players()[0].dash_active());

        step_at(&mut round, &mut physics, 3, 0.5, &idle, &bump);
        assert_eq!(physics.pushes, 2);

        // Window closed at 1.1; the first contact after that must not push
        step_at(&mut round, &mut physics, 4, 1.2, &idle, &bump);
        assert_eq!(physics.pushes, 2);
        assert!(!round.players()[0].dash_active());
    }

    #[test]
    fn restart_button_does_not_cancel_pending_victory_restart() {
        let (mut round, mut physics, _) = setup();
        set_statuses(&mut round, &mut physics, [Status::Grounded, Status::Dead, Status::Dead, Status::Dead]);
        let mut out = Vec::new();
        round.evaluate_round_end(0.0, 0.0, &mut physics, &mut out);
        let mut input = FrameInput::idle(4);
        input.restart = true;
        let frame = RoundFrame {
            tick: 0,
            now: 0.5,
            dt: 1.0 / 60.0,
            input: &input,
            contacts: &[],
            ground_y: 0.0,
        };
        round.step(&frame, &mut physics, &mut out);
        assert!(!round.ended());
        assert_eq!(round.pending_restarts(), 2);
    }
}
