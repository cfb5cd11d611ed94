//! Ambient loudness from the capture device.
//!
//! The device itself is an external collaborator behind [`AudioBackend`];
//! this module owns the capture life-cycle (start, begin playback once
//! samples flow, periodic refresh, device cycling) and reduces each tick's
//! waveform to a single RMS level.

use tracing::{info, warn};

use crate::config::AudioConfig;
use crate::schedule::{DeferredQueue, FireAt};
use crate::types::Tick;

/// Root-mean-square of a sample buffer. Empty buffers are silent.
pub fn rms_level(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}

/// Pull-based capture device access.
pub trait AudioBackend {
    fn devices(&self) -> Vec<String>;
    /// Supported (min, max) sample rate; a zero max means "unknown".
    fn frequency_caps(&self, device: &str) -> (u32, u32);
    /// Start a looping capture clip. Returns false if the device refused.
    fn start_capture(&mut self, device: &str, length_seconds: u32, frequency: u32) -> bool;
    /// Write head of the running capture, in samples.
    fn capture_position(&self, device: &str) -> usize;
    fn stop_capture(&mut self, device: &str);
    /// Copy the most recent output samples into `out`.
    fn read_output(&self, out: &mut [f32]);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClipState {
    None,
    Recording,
    Playing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CaptureAction {
    DropClip,
}

#[derive(Debug)]
pub struct Microphone {
    config: AudioConfig,
    device_index: usize,
    device: Option<String>,
    frequency: u32,
    clip: ClipState,
    refresh: DeferredQueue<CaptureAction>,
    samples: Vec<f32>,
    level: f32,
}

impl Microphone {
    pub fn new(config: &AudioConfig, backend: &mut dyn AudioBackend) -> Self {
        let mut mic = Self {
            config: config.clone(),
            device_index: 0,
            device: None,
            frequency: config.default_sample_rate,
            clip: ClipState::None,
            refresh: DeferredQueue::new(),
            samples: vec![0.0; config.sample_count],
            level: 0.0,
        };
        mic.select_device(backend);
        mic
    }

    pub fn device(&self) -> Option<&str> {
        self.device.as_deref()
    }

    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    pub fn clip(&self) -> ClipState {
        self.clip
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    /// Cycle to the next capture device, wrapping around.
    pub fn next_device(&mut self, backend: &mut dyn AudioBackend) {
        self.device_index += 1;
        self.select_device(backend);
    }

    /// Stops any running clip and forgets its pending refresh before the
    /// next device is picked.
    fn select_device(&mut self, backend: &mut dyn AudioBackend) {
        self.refresh.clear();
        if self.clip != ClipState::None {
            if let Some(name) = &self.device {
                backend.stop_capture(name);
            }
            self.clip = ClipState::None;
        }

        let devices = backend.devices();
        if devices.is_empty() {
            if self.device.is_some() {
                warn!("no capture devices left, ambient level falls silent");
            }
            self.device = None;
            self.device_index = 0;
            self.frequency = self.config.default_sample_rate;
            return;
        }
        if self.device_index >= devices.len() {
            self.device_index = 0;
        }

        let name = devices[self.device_index].clone();
        let (min, max) = backend.frequency_caps(&name);
        self.frequency = if max == 0 {
            warn!(device = %name, min, "device reports no usable max rate, using {} Hz", self.config.default_sample_rate);
            self.config.default_sample_rate
        } else {
            max
        };
        info!(device = %name, frequency = self.frequency, "capture device selected");
        self.device = Some(name);
    }

    /// Advance the capture life-cycle and return this tick's RMS level.
    pub fn update(&mut self, tick: Tick, now: f64, backend: &mut dyn AudioBackend) -> f32 {
        for action in self.refresh.drain_due(tick, now) {
            match action {
                CaptureAction::DropClip => self.clip = ClipState::None,
            }
        }

        if let Some(name) = &self.device {
            match self.clip {
                ClipState::None => {
                    if backend.start_capture(name, self.config.capture_length, self.frequency) {
                        self.clip = ClipState::Recording;
                    }
                }
                ClipState::Recording => {
                    if backend.capture_position(name) > 0 {
                        self.clip = ClipState::Playing;
                        self.refresh.schedule(
                            CaptureAction::DropClip,
                            FireAt::Time(now + self.config.capture_refresh as f64),
                        );
                    }
                }
                ClipState::Playing => {}
            }
        }

        if self.clip == ClipState::Playing {
            backend.read_output(&mut self.samples);
        } else {
            self.samples.iter_mut().for_each(|s| *s = 0.0);
        }
        self.level = rms_level(&self.samples);
        self.level
    }
}
