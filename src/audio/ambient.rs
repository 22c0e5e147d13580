//! Ambient soundscape: a looping wind bed and a sub-bass drone.
//!
//! rodio has no live parameter-automation graph, so the gusting effect is
//! baked in: the wind loop spans exactly two LFO periods and the drone loop
//! a whole number of cycles, which makes both tile seamlessly under
//! `repeat_infinite`.

use std::f32::consts::TAU;

use rand::Rng;
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStreamHandle, Sink, Source};

use super::synth::{LowPass, SAMPLE_RATE};

const WIND_AMPLITUDE: f32 = 0.15;
const WIND_BASE_CUTOFF_HZ: f32 = 100.0;
const WIND_LFO_HZ: f32 = 0.2;
const WIND_LFO_DEPTH_HZ: f32 = 80.0;
/// Two full LFO periods, so the cutoff sweep is continuous across the seam.
const WIND_LOOP_SECS: f32 = 2.0 / WIND_LFO_HZ;

const DRONE_HZ: f32 = 55.0;
const DRONE_CUTOFF_HZ: f32 = 120.0;
const DRONE_GAIN: f32 = 0.05;
/// One second holds 55 whole drone cycles.
const DRONE_LOOP_SECS: f32 = 1.0;

/// Render the wind loop: noise through a lowpass whose cutoff gusts
/// around the base frequency at the LFO rate.
pub fn render_wind_loop(rng: &mut impl Rng) -> Vec<f32> {
    let n = (SAMPLE_RATE as f32 * WIND_LOOP_SECS) as usize;
    let dt = 1.0 / SAMPLE_RATE as f32;
    let mut filter = LowPass::new();

    (0..n)
        .map(|i| {
            let t = i as f32 * dt;
            let cutoff = WIND_BASE_CUTOFF_HZ + WIND_LFO_DEPTH_HZ * (TAU * WIND_LFO_HZ * t).sin();
            let noise = rng.gen_range(-1.0..1.0) * WIND_AMPLITUDE;
            filter.process(noise, cutoff.max(1.0))
        })
        .collect()
}

/// Render the drone loop: a 55 Hz sine softened by a lowpass.
pub fn render_drone_loop() -> Vec<f32> {
    let n = (SAMPLE_RATE as f32 * DRONE_LOOP_SECS) as usize;
    let dt = 1.0 / SAMPLE_RATE as f32;
    let mut filter = LowPass::new();

    (0..n)
        .map(|i| {
            let t = i as f32 * dt;
            let tone = (TAU * DRONE_HZ * t).sin();
            filter.process(tone, DRONE_CUTOFF_HZ) * DRONE_GAIN
        })
        .collect()
}

struct AmbientVoice {
    wind: Sink,
    drone: Sink,
}

/// The singleton ambient voice. Started at most once at a time; stopping
/// discards both sources so a later start builds a fresh pair.
#[derive(Default)]
pub struct AmbientBed {
    voice: Option<AmbientVoice>,
}

impl AmbientBed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.voice.is_some()
    }

    /// Start the bed. No-op while a voice is already active.
    pub fn start(&mut self, handle: &OutputStreamHandle, volume: f32, rng: &mut impl Rng) {
        if self.voice.is_some() {
            return;
        }

        let (wind, drone) = match (Sink::try_new(handle), Sink::try_new(handle)) {
            (Ok(w), Ok(d)) => (w, d),
            _ => {
                tracing::warn!("Could not open ambient sinks; staying silent");
                return;
            }
        };

        let wind_buffer = SamplesBuffer::new(1, SAMPLE_RATE, render_wind_loop(rng));
        wind.append(wind_buffer.repeat_infinite());
        wind.set_volume(volume);

        let drone_buffer = SamplesBuffer::new(1, SAMPLE_RATE, render_drone_loop());
        drone.append(drone_buffer.repeat_infinite());
        drone.set_volume(volume);

        tracing::debug!("Ambient bed started");
        self.voice = Some(AmbientVoice { wind, drone });
    }

    /// Halt and discard both sources. Safe to call when nothing is active.
    pub fn stop(&mut self) {
        if let Some(voice) = self.voice.take() {
            voice.wind.stop();
            voice.drone.stop();
            tracing::debug!("Ambient bed stopped");
        }
    }
}
