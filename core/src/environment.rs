use crate::config::EnvironmentConfig;
use crate::math::{approach, repeat};
use crate::types::{PresentationCommand, Rgb};

/// Six-sector HSV to RGB. Hue wraps; channels are clamped to [0, 1].
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Rgb {
    let hv = repeat(h, 1.0) * 6.0;
    let sector = hv.floor();
    let f = hv - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match sector as i32 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        5 => (v, p, q),
        // hv can round up to 6.0
        _ => (v, t, p),
    };
    Rgb::new(r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0))
}

/// Audio-reactive world parameters: ground height, camera height, hue.
#[derive(Clone, Debug, PartialEq)]
pub struct EnvironmentController {
    config: EnvironmentConfig,
    ground_height: f32,
    camera_height: f32,
}

impl EnvironmentController {
    pub fn new(config: &EnvironmentConfig) -> Self {
        Self {
            config: config.clone(),
            ground_height: 0.0,
            camera_height: 0.0,
        }
    }

    pub fn ground_height(&self) -> f32 {
        self.ground_height
    }

    pub fn camera_height(&self) -> f32 {
        self.camera_height
    }

    pub fn hue(&self, time: f64) -> f32 {
        repeat((time * self.config.hue_frequency as f64) as f32, 1.0)
    }

    /// Smooth both heights toward the scaled level and emit the coloring commands.
    pub fn update(&mut self, dt: f32, time: f64, level: f32, out: &mut Vec<PresentationCommand>) {
        let c = &self.config;
        let target = level * c.level_gain;
        self.ground_height = approach(self.ground_height, target, c.ground_rate, dt);
        self.camera_height = approach(self.camera_height, target, c.camera_rate, dt);

        let hue = self.hue(time);
        let ground = hsv_to_rgb(hue, c.saturation, c.value).with_alpha(c.alpha);

        out.push(PresentationCommand::GroundHeight(self.ground_height));
        out.push(PresentationCommand::CameraHeight(self.camera_height));
        out.push(PresentationCommand::GroundColor(ground));
        out.push(PresentationCommand::Background {
            hue: hue + c.hue_offset,
            saturation: c.saturation,
            value: c.value,
        });
    }
}
