use catdash_core::*;
use glam::Vec3;

const DT: f32 = 1.0 / TICK_RATE as f32;

/// No capture devices: the environment stays flat.
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

struct Harness {
    game: Game,
    physics: ArenaPhysics,
    audio: Silence,
    idle: FrameInput,
}

impl Harness {
    fn new(seed: u32) -> Self {
        let mut audio = Silence;
        let game = Game::new(&default_config(seed), &mut audio).unwrap();
        Self {
            game,
            physics: ArenaPhysics::new(4, ArenaParams::default()),
            audio,
            idle: FrameInput::idle(4),
        }
    }

    fn tick(&mut self) -> StepReport {
        let contacts = self.physics.step(DT);
        self.game
            .step(DT, &self.idle, &contacts, &mut self.physics, &mut self.audio)
    }

    /// Run until `done` holds, asserting no round decision happens on the way.
    fn run_undecided(&mut self, max_ticks: usize, done: impl Fn(&Game) -> bool) {
        for _ in 0..max_ticks {
            let report = self.tick();
            assert_eq!(report.outcome, None, "decided early at tick {}", report.tick);
            if done(&self.game) {
                return;
            }
        }
        panic!("condition not reached within {} ticks", max_ticks);
    }

    fn push_off(&mut self, player: usize) {
        self.physics
            .place(player, Vec3::new(40.0 + 3.0 * player as f32, 0.5, 0.0));
    }
}

#[test]
fn last_player_standing_wins_then_everyone_respawns() {
    let mut h = Harness::new(7);

    // Spawn and settle: everybody grounded, nobody has won
    h.run_undecided(240, |g| g.round().statuses() == vec![Status::Grounded; 4]);
    assert_eq!(h.game.round().round_number(), 1);

    for victim in 0..2 {
        h.push_off(victim);
        h.run_undecided(240, |g| g.round().players()[victim].status() == Status::Dead);
    }

    h.push_off(2);
    let mut won = None;
    for _ in 0..240 {
        let report = h.tick();
        if let Some(outcome) = report.outcome {
            won = Some((outcome, report.commands, h.game.time()));
            break;
        }
    }
    let (outcome, commands, won_at) = won.expect("round never decided");
    let color = default_config(7).round.palette[3];
    assert_eq!(outcome, RoundOutcome::Winner { player: 3, color });
    assert!(commands.contains(&PresentationCommand::ShowVictory { color }));
    assert!(h.game.round().ended());
    assert_eq!(
        h.game.round().statuses(),
        vec![Status::Dead, Status::Dead, Status::Dead, Status::Grounded]
    );

    // Victory is held for the delay, then the deferred restart fires
    let mut restarted_at = None;
    for _ in 0..200 {
        let report = h.tick();
        assert_eq!(report.outcome, None);
        if h.game.round().round_number() == 2 {
            assert!(report.commands.contains(&PresentationCommand::HideVictory));
            restarted_at = Some(h.game.time());
            break;
        }
    }
    let restarted_at = restarted_at.expect("no restart after victory");
    let waited = restarted_at - won_at;
    assert!(waited >= 2.0 - 1e-6, "restarted after {}", waited);
    assert!(waited < 2.0 + 2.0 * DT as f64, "restarted after {}", waited);

    assert!(!h.game.round().ended());
    assert_eq!(h.game.round().statuses(), vec![Status::Unknown; 4]);
    for i in 0..4 {
        let body = h.physics.body(i);
        assert_eq!(body.velocity, Vec3::ZERO);
        assert!(body.position.y >= 3.0 && body.position.y <= 7.0);
        assert!(Vec3::new(body.position.x, 0.0, body.position.z).length() <= 20.0);
    }
}

#[test]
fn everyone_falling_restarts_without_a_winner() {
    let mut h = Harness::new(11);
    h.run_undecided(240, |g| g.round().statuses() == vec![Status::Grounded; 4]);

    for i in 0..4 {
        h.push_off(i);
    }
    let mut outcome = None;
    for _ in 0..240 {
        let report = h.tick();
        if report.outcome.is_some() {
            assert!(!report
                .commands
                .iter()
                .any(|c| matches!(c, PresentationCommand::ShowVictory { .. })));
            outcome = report.outcome;
            break;
        }
    }
    assert_eq!(outcome, Some(RoundOutcome::WipeOut));
    assert_eq!(h.game.round().round_number(), 2);
    assert!(!h.game.round().ended());
    assert_eq!(h.game.round().statuses(), vec![Status::Unknown; 4]);
}

#[test]
fn same_seed_same_spawns() {
    let mut a = Harness::new(99);
    let mut b = Harness::new(99);
    a.tick();
    b.tick();
    for i in 0..4 {
        assert_eq!(a.physics.body(i).position, b.physics.body(i).position);
    }
}
