use std::f32::consts::TAU;

use catdash_core::AudioBackend;

/// A capture device that hums a sine tone whose loudness swells slowly.
#[derive(Clone, Debug)]
pub struct ToneDevice {
    pub name: String,
    /// Reported (min, max) sample rate.
    pub caps: (u32, u32),
    pub pitch_hz: f32,
    pub amplitude: f32,
    /// Loudness swell frequency.
    pub swell_hz: f32,
}

#[derive(Debug)]
struct Capture {
    device: usize,
    frequency: u32,
    length_samples: usize,
    written: usize,
}

/// Headless stand-in for the microphone subsystem.
///
/// Time only moves when the host calls [`SyntheticAudio::advance`].
#[derive(Debug)]
pub struct SyntheticAudio {
    devices: Vec<ToneDevice>,
    capture: Option<Capture>,
    time: f64,
}

impl SyntheticAudio {
    pub fn new(devices: Vec<ToneDevice>) -> Self {
        Self {
            devices,
            capture: None,
            time: 0.0,
        }
    }

    /// A loud USB mic plus a quiet virtual device that reports no rate caps.
    pub fn demo() -> Self {
        Self::new(vec![
            ToneDevice {
                name: "usb-mic".to_string(),
                caps: (8_000, 48_000),
                pitch_hz: 220.0,
                amplitude: 0.3,
                swell_hz: 0.1,
            },
            ToneDevice {
                name: "virtual-loopback".to_string(),
                caps: (0, 0),
                pitch_hz: 440.0,
                amplitude: 0.05,
                swell_hz: 0.5,
            },
        ])
    }

    pub fn advance(&mut self, dt: f64) {
        self.time += dt;
        if let Some(c) = &mut self.capture {
            // Looping clip: the write head wraps at the clip length
            let samples = (dt * c.frequency as f64) as usize;
            c.written = (c.written + samples) % c.length_samples.max(1);
            if c.written == 0 {
                c.written = 1;
            }
        }
    }

    fn index_of(&self, device: &str) -> Option<usize> {
        self.devices.iter().position(|d| d.name == device)
    }
}

impl AudioBackend for SyntheticAudio {
    fn devices(&self) -> Vec<String> {
        self.devices.iter().map(|d| d.name.clone()).collect()
    }

    fn frequency_caps(&self, device: &str) -> (u32, u32) {
        self.index_of(device)
            .map(|i| self.devices[i].caps)
            .unwrap_or((0, 0))
    }

    fn start_capture(&mut self, device: &str, length_seconds: u32, frequency: u32) -> bool {
        match self.index_of(device) {
            Some(device) => {
                self.capture = Some(Capture {
                    device,
                    frequency,
                    length_samples: length_seconds as usize * frequency as usize,
                    written: 0,
                });
                true
            }
            None => false,
        }
    }

    fn capture_position(&self, device: &str) -> usize {
        match (&self.capture, self.index_of(device)) {
            (Some(c), Some(i)) if c.device == i => c.written,
            _ => 0,
        }
    }

    fn stop_capture(&mut self, device: &str) {
        if self.capture.as_ref().map(|c| c.device) == self.index_of(device) {
            self.capture = None;
        }
    }

    fn read_output(&self, out: &mut [f32]) {
        let Some(c) = &self.capture else {
            out.iter_mut().for_each(|s| *s = 0.0);
            return;
        };
        let d = &self.devices[c.device];
        let t0 = self.time as f32;
        let swell = 0.5 + 0.5 * (TAU * d.swell_hz * t0).sin();
        let step = 1.0 / c.frequency.max(1) as f32;
        for (n, s) in out.iter_mut().enumerate() {
            *s = d.amplitude * swell * (TAU * d.pitch_hz * (t0 + n as f32 * step)).sin();
        }
    }
}
