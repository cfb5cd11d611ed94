use glam::Vec3;

use crate::config::AssistConfig;
use crate::math::wrap_angle;
use crate::types::PlayerIndex;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AssistTarget {
    pub player: PlayerIndex,
    /// Absolute heading from the acting player to the target, radians.
    pub angle: f32,
    pub distance: f32,
}

/// Nearest other player inside the assist cone.
///
/// A candidate qualifies when its distance is strictly below both the
/// configured maximum and the best distance found so far, and the wrapped
/// offset between `heading` and the bearing to it is strictly inside the
/// half-angle. Equidistant candidates resolve to the lowest index.
pub fn help_direction(
    acting: PlayerIndex,
    heading: f32,
    positions: &[Vec3],
    config: &AssistConfig,
) -> Option<AssistTarget> {
    let origin = *positions.get(acting)?;
    let mut best: Option<AssistTarget> = None;
    let mut best_distance = config.max_distance;

    for (i, &position) in positions.iter().enumerate() {
        if i == acting {
            continue;
        }
        let diff = position - origin;
        let d = diff.length();
        if d < best_distance.min(config.max_distance) {
            let bearing = diff.z.atan2(diff.x);
            let offset = wrap_angle(bearing - heading);
            if offset.abs() < config.half_angle {
                best_distance = d;
                best = Some(AssistTarget {
                    player: i,
                    angle: bearing,
                    distance: d,
                });
            }
        }
    }

    best
}
