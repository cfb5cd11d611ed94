use glam::{Vec2, Vec3};

use crate::types::*;

/// Heading (yaw) to a unit forward vector on the horizontal plane.
pub fn forward(heading: f32) -> Vec3 {
    Vec3::new(heading.cos(), 0.0, heading.sin())
}

/// The physics collaborator as seen by the simulation core.
///
/// The core never integrates bodies itself: it reads body state and
/// issues force, impulse and placement commands. Contact generation
/// happens on the implementor's side and is fed back as `ContactEvent`s.
pub trait Physics {
    fn body(&self, index: PlayerIndex) -> BodyState;
    /// Continuous force along the body's forward axis for the next step.
    fn add_forward_force(&mut self, index: PlayerIndex, magnitude: f32);
    /// Instantaneous velocity change along the body's forward axis (unit mass).
    fn add_forward_impulse(&mut self, index: PlayerIndex, magnitude: f32);
    fn rotate_yaw(&mut self, index: PlayerIndex, radians: f32);
    fn set_heading(&mut self, index: PlayerIndex, radians: f32);
    /// Radial push from `center` with linear falloff to zero at `radius`.
    fn add_explosion_force(&mut self, index: PlayerIndex, force: f32, center: Vec3, radius: f32);
    /// Teleport and zero the velocity.
    fn place(&mut self, index: PlayerIndex, position: Vec3);
    fn set_ground_height(&mut self, height: f32);
}

// ── Headless stand-in ───────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct ArenaParams {
    pub gravity: f32,
    pub ground_radius: f32,
    pub ground_thickness: f32,
    pub body_radius: f32,
    pub linear_damping: f32,
    /// Slack for treating a body as arriving from above the ground top.
    pub landing_tolerance: f32,
}

impl Default for ArenaParams {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            ground_radius: 24.0,
            ground_thickness: 2.0,
            body_radius: 0.5,
            linear_damping: 0.5,
            landing_tolerance: 0.25,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct ArenaBody {
    position: Vec3,
    velocity: Vec3,
    heading: f32,
    force: Vec3,
}

/// Point-mass bodies on a disc-shaped platform.
///
/// Good enough to drive the round life-cycle headless (landing, falling off
/// the rim, bumping into each other); not a rigid-body solver.
#[derive(Clone, Debug)]
pub struct ArenaPhysics {
    pub params: ArenaParams,
    bodies: Vec<ArenaBody>,
    ground_height: f32,
    stepped_ground_height: f32,
}

impl ArenaPhysics {
    pub fn new(body_count: usize, params: ArenaParams) -> Self {
        let bodies = (0..body_count)
            .map(|_| ArenaBody {
                position: Vec3::ZERO,
                velocity: Vec3::ZERO,
                heading: 0.0,
                force: Vec3::ZERO,
            })
            .collect();
        Self {
            params,
            bodies,
            ground_height: 0.0,
            stepped_ground_height: 0.0,
        }
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn ground_height(&self) -> f32 {
        self.ground_height
    }

    /// Integrate one step and report the contacts that resulted.
    pub fn step(&mut self, dt: f32) -> Vec<ContactEvent> {
        let p = self.params.clone();
        let top = self.ground_height;
        let rise = (self.ground_height - self.stepped_ground_height).max(0.0);
        self.stepped_ground_height = self.ground_height;
        let mut contacts = Vec::new();

        for (i, body) in self.bodies.iter_mut().enumerate() {
            let accel = body.force + Vec3::new(0.0, -p.gravity, 0.0);
            body.velocity += accel * dt;
            body.velocity *= (1.0 - p.linear_damping * dt).max(0.0);
            body.force = Vec3::ZERO;

            let prev = body.position;
            body.position += body.velocity * dt;

            let horizontal = Vec2::new(body.position.x, body.position.z);
            let bottom = body.position.y - p.body_radius;
            let over_disc = horizontal.length() <= p.ground_radius;
            let overlapping = bottom < top && body.position.y + p.body_radius > top - p.ground_thickness;
            if !(over_disc && overlapping) {
                continue;
            }

            if prev.y - p.body_radius >= top - p.landing_tolerance - rise {
                // Landed on (or resting on) the top surface
                body.position.y = top + p.body_radius;
                if body.velocity.y < 0.0 {
                    body.velocity.y = 0.0;
                }
                contacts.push(ContactEvent {
                    body: i,
                    other: ContactTarget::Ground,
                    points: vec![ContactPoint {
                        point: Vec3::new(body.position.x, top, body.position.z),
                        normal: Vec3::Y,
                    }],
                });
            } else {
                // Hit the rim from the side: push back out radially
                let dir = horizontal.try_normalize().unwrap_or(Vec2::X);
                let rim = dir * (p.ground_radius + p.body_radius);
                body.position.x = rim.x;
                body.position.z = rim.y;
                let outward = Vec3::new(dir.x, 0.0, dir.y);
                let inward_speed = body.velocity.dot(outward);
                if inward_speed < 0.0 {
                    body.velocity -= outward * inward_speed;
                }
                contacts.push(ContactEvent {
                    body: i,
                    other: ContactTarget::Ground,
                    points: vec![ContactPoint {
                        point: Vec3::new(dir.x * p.ground_radius, body.position.y, dir.y * p.ground_radius),
                        normal: outward,
                    }],
                });
            }
        }

        // Body-body contacts, equal masses
        let min_dist = 2.0 * p.body_radius;
        for i in 0..self.bodies.len() {
            for j in (i + 1)..self.bodies.len() {
                let delta = self.bodies[j].position - self.bodies[i].position;
                let dist = delta.length();
                if dist >= min_dist || dist < 1e-6 {
                    continue;
                }
                let n = delta / dist;
                let push = n * ((min_dist - dist) * 0.5);
                self.bodies[i].position -= push;
                self.bodies[j].position += push;

                let vi = self.bodies[i].velocity.dot(n);
                let vj = self.bodies[j].velocity.dot(n);
                if vi > vj {
                    self.bodies[i].velocity += n * (vj - vi);
                    self.bodies[j].velocity += n * (vi - vj);
                }

                let point = self.bodies[i].position + n * p.body_radius;
                contacts.push(ContactEvent {
                    body: i,
                    other: ContactTarget::Player(j),
                    points: vec![ContactPoint { point, normal: -n }],
                });
                contacts.push(ContactEvent {
                    body: j,
                    other: ContactTarget::Player(i),
                    points: vec![ContactPoint { point, normal: n }],
                });
            }
        }

        contacts
    }
}

impl Physics for ArenaPhysics {
    fn body(&self, index: PlayerIndex) -> BodyState {
        let b = &self.bodies[index];
        BodyState {
            position: b.position,
            velocity: b.velocity,
            heading: b.heading,
        }
    }

    fn add_forward_force(&mut self, index: PlayerIndex, magnitude: f32) {
        let b = &mut self.bodies[index];
        b.force += forward(b.heading) * magnitude;
    }

    fn add_forward_impulse(&mut self, index: PlayerIndex, magnitude: f32) {
        let b = &mut self.bodies[index];
        b.velocity += forward(b.heading) * magnitude;
    }

    fn rotate_yaw(&mut self, index: PlayerIndex, radians: f32) {
        let b = &mut self.bodies[index];
        b.heading = crate::math::wrap_angle(b.heading + radians);
    }

    fn set_heading(&mut self, index: PlayerIndex, radians: f32) {
        self.bodies[index].heading = crate::math::wrap_angle(radians);
    }

    fn add_explosion_force(&mut self, index: PlayerIndex, force: f32, center: Vec3, radius: f32) {
        let b = &mut self.bodies[index];
        let offset = b.position - center;
        let dist = offset.length();
        if radius <= 0.0 || dist > radius {
            return;
        }
        let dir = offset.try_normalize().unwrap_or(Vec3::Y);
        b.force += dir * (force * (1.0 - dist / radius));
    }

    fn place(&mut self, index: PlayerIndex, position: Vec3) {
        let b = &mut self.bodies[index];
        b.position = position;
        b.velocity = Vec3::ZERO;
        b.force = Vec3::ZERO;
    }

    fn set_ground_height(&mut self, height: f32) {
        self.ground_height = height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena(n: usize) -> ArenaPhysics {
        ArenaPhysics::new(n, ArenaParams::default())
    }

    #[test]
    fn body_settles_on_ground_with_upward_contact() {
        let mut w = arena(1);
        w.place(0, Vec3::new(0.0, 3.0, 0.0));
        let mut last = Vec::new();
        for _ in 0..240 {
            last = w.step(1.0 / 60.0);
        }
        assert!((w.body(0).position.y - 0.5).abs() < 1e-4);
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].other, ContactTarget::Ground);
        assert!(last[0].points[0].normal.y > 0.99);
    }

    #[test]
    fn body_off_the_disc_falls_forever() {
        let mut w = arena(1);
        w.place(0, Vec3::new(40.0, 3.0, 0.0));
        for _ in 0..120 {
            assert!(w.step(1.0 / 60.0).is_empty());
        }
        assert!(w.body(0).position.y < -5.0);
    }

    #[test]
    fn rim_contact_is_horizontal() {
        let mut w = arena(1);
        // Just inside the rim, below the top surface
        w.place(0, Vec3::new(23.9, -1.0, 0.0));
        let contacts = w.step(1.0 / 60.0);
        assert_eq!(contacts.len(), 1);
        let n = contacts[0].points[0].normal;
        assert!(n.y.abs() < 1e-6);
        assert!(n.x > 0.99);
    }

    #[test]
    fn overlapping_bodies_report_each_other() {
        let mut w = arena(2);
        w.place(0, Vec3::new(0.0, 0.5, 0.0));
        w.place(1, Vec3::new(0.6, 0.5, 0.0));
        let contacts = w.step(1.0 / 60.0);
        let pairs: Vec<_> = contacts
            .iter()
            .filter_map(|c| match c.other {
                ContactTarget::Player(o) => Some((c.body, o)),
                ContactTarget::Ground => None,
            })
            .collect();
        assert_eq!(pairs, vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn forward_force_follows_heading() {
        let mut w = arena(1);
        w.place(0, Vec3::new(0.0, 0.5, 0.0));
        w.set_heading(0, std::f32::consts::FRAC_PI_2);
        w.add_forward_impulse(0, 5.0);
        let v = w.body(0).velocity;
        assert!(v.x.abs() < 1e-5);
        assert!((v.z - 5.0).abs() < 1e-5);
    }

    #[test]
    fn explosion_falls_off_linearly() {
        let mut w = arena(2);
        w.place(0, Vec3::new(2.0, 0.0, 0.0));
        w.place(1, Vec3::new(20.0, 0.0, 0.0));
        w.add_explosion_force(0, 500.0, Vec3::ZERO, 10.0);
        w.add_explosion_force(1, 500.0, Vec3::ZERO, 10.0);
        assert!((w.bodies[0].force.x - 400.0).abs() < 1e-3);
        assert_eq!(w.bodies[1].force, Vec3::ZERO);
    }
}
