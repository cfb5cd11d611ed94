use glam::Vec3;

/// Mulberry32 step. Pure function: returns (value_in_0_1, next_state).
pub fn prng_next(state: u32) -> (f64, u32) {
    let mut t = state.wrapping_add(0x6d2b79f5);
    let next_state = t;
    t = (t ^ (t >> 15)).wrapping_mul(t | 1);
    t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
    let value = (t ^ (t >> 14)) as f64 / 4294967296.0;
    (value, next_state)
}

/// Seed for player `index`'s private stream, derived from the round seed.
pub fn player_seed(seed: u32, index: usize) -> u32 {
    seed ^ (index as u32).wrapping_add(1).wrapping_mul(0x9e37_79b9)
}

/// A single-owner random stream.
#[derive(Clone, Debug, PartialEq)]
pub struct Prng {
    state: u32,
}

impl Prng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    /// Uniform in [0, 1).
    pub fn value(&mut self) -> f32 {
        let (v, next) = prng_next(self.state);
        self.state = next;
        // f64 -> f32 can round up to exactly 1.0
        (v as f32).min(1.0 - f32::EPSILON)
    }

    /// Uniform in [min, max).
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.value() * (max - min)
    }

    /// Uniform point inside the unit sphere (rejection sampled).
    pub fn inside_unit_sphere(&mut self) -> Vec3 {
        loop {
            let p = Vec3::new(
                self.range(-1.0, 1.0),
                self.range(-1.0, 1.0),
                self.range(-1.0, 1.0),
            );
            if p.length_squared() <= 1.0 {
                return p;
            }
        }
    }
}
