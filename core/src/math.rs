use std::f32::consts::{PI, TAU};

/// Wrap an angle into (-PI, PI].
pub fn wrap_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let mut a = angle.rem_euclid(TAU);
    if a > PI {
        a -= TAU;
    }
    // rem_euclid can land on TAU itself for tiny negative inputs
    if a <= -PI {
        a += TAU;
    }
    a
}

/// Fraction of the remaining distance a first-order low-pass filter covers in `dt`.
pub fn smoothing_factor(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate * dt).exp()
}

/// Move `current` toward `target` by one frame-rate independent filter step.
pub fn approach(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    current + (target - current) * smoothing_factor(rate, dt)
}

/// `value` modulo `length`, always in [0, length).
pub fn repeat(value: f32, length: f32) -> f32 {
    let r = value.rem_euclid(length);
    if r >= length {
        0.0
    } else {
        r
    }
}
