//! Signal primitives for the procedural audio engine.
//!
//! Everything audible in the game is rendered here: a `SoundRecipe`
//! describes a signal source, an optional lowpass sweep, and a gain
//! envelope as breakpoint automation; `render` turns it into mono f32
//! samples at [`SAMPLE_RATE`]. Rendering is pure given an RNG, so recipes
//! are tested by asserting on samples instead of by ear.

use rand::Rng;
use std::f32::consts::TAU;

/// Engine-wide render rate for synthesized sound.
pub const SAMPLE_RATE: u32 = 44_100;

/// Oscillator waveform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
}

impl Waveform {
    /// Evaluate the waveform at a normalized phase in [0, 1).
    fn eval(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (TAU * phase).sin(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => 4.0 * (phase - 0.5).abs() - 1.0,
        }
    }
}

/// Interpolation used to reach a breakpoint from the previous value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Curve {
    /// Hold the previous value, jump at the breakpoint time.
    Step,
    Linear,
    /// Multiplicative ramp; endpoints must share sign and be non-zero.
    Exponential,
}

#[derive(Debug, Clone, Copy)]
pub struct Breakpoint {
    pub at: f32,
    pub value: f32,
    pub curve: Curve,
}

/// A value automated over time as an initial level plus ordered breakpoints.
#[derive(Debug, Clone)]
pub struct Automation {
    initial: f32,
    points: Vec<Breakpoint>,
}

impl Automation {
    pub fn constant(value: f32) -> Self {
        Self {
            initial: value,
            points: Vec::new(),
        }
    }

    pub fn start(initial: f32) -> Self {
        Self::constant(initial)
    }

    /// Append a breakpoint. Breakpoints must be added in time order.
    pub fn then(mut self, at: f32, value: f32, curve: Curve) -> Self {
        debug_assert!(self.points.last().map_or(true, |p| at >= p.at));
        self.points.push(Breakpoint { at, value, curve });
        self
    }

    pub fn value_at(&self, t: f32) -> f32 {
        let mut prev_t = 0.0_f32;
        let mut prev_v = self.initial;
        for p in &self.points {
            if t < p.at {
                let span = p.at - prev_t;
                if span <= f32::EPSILON {
                    return p.value;
                }
                let frac = (t - prev_t) / span;
                return match p.curve {
                    Curve::Step => prev_v,
                    Curve::Linear => prev_v + (p.value - prev_v) * frac,
                    Curve::Exponential => prev_v * (p.value / prev_v).powf(frac),
                };
            }
            prev_t = p.at;
            prev_v = p.value;
        }
        prev_v
    }
}

/// Single-pole lowpass, cutoff adjustable per sample.
#[derive(Debug, Default)]
pub struct LowPass {
    state: f32,
}

impl LowPass {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process(&mut self, input: f32, cutoff_hz: f32) -> f32 {
        let alpha = 1.0 - (-TAU * cutoff_hz / SAMPLE_RATE as f32).exp();
        self.state += alpha * (input - self.state);
        self.state
    }
}

/// Signal source of a recipe.
#[derive(Debug, Clone)]
pub enum Signal {
    Tone {
        waveform: Waveform,
        freq: Automation,
    },
    /// Two oscillators a few Hz apart, summed, for a beating effect.
    TonePair {
        waveform: Waveform,
        freq: Automation,
        detune_hz: f32,
    },
    /// White noise from the supplied RNG.
    Noise,
}

/// A complete, finite sound: source, optional lowpass sweep, gain envelope.
#[derive(Debug, Clone)]
pub struct SoundRecipe {
    pub source: Signal,
    /// Lowpass cutoff automation applied after the source, if any.
    pub filter: Option<Automation>,
    pub gain: Automation,
    pub duration: f32,
}

/// Render a recipe to mono samples at [`SAMPLE_RATE`].
pub fn render(recipe: &SoundRecipe, rng: &mut impl Rng) -> Vec<f32> {
    let n = (SAMPLE_RATE as f32 * recipe.duration) as usize;
    let dt = 1.0 / SAMPLE_RATE as f32;
    let mut filter = LowPass::new();
    let mut phase_a = 0.0_f32;
    let mut phase_b = 0.0_f32;

    let mut samples = Vec::with_capacity(n);
    for i in 0..n {
        let t = i as f32 * dt;
        let raw = match &recipe.source {
            Signal::Tone { waveform, freq } => {
                phase_a = (phase_a + freq.value_at(t) * dt).fract();
                waveform.eval(phase_a)
            }
            Signal::TonePair {
                waveform,
                freq,
                detune_hz,
            } => {
                let f = freq.value_at(t);
                phase_a = (phase_a + f * dt).fract();
                phase_b = (phase_b + (f + detune_hz) * dt).fract();
                waveform.eval(phase_a) + waveform.eval(phase_b)
            }
            Signal::Noise => rng.gen_range(-1.0..1.0),
        };

        let filtered = match &recipe.filter {
            Some(cutoff) => filter.process(raw, cutoff.value_at(t)),
            None => raw,
        };

        samples.push((filtered * recipe.gain.value_at(t)).clamp(-1.0, 1.0));
    }
    samples
}

/// Peak absolute amplitude of a buffer.
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0_f32, |acc, s| acc.max(s.abs()))
}
