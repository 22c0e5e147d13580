//! One-shot sound effects.
//!
//! Every effect the game can trigger lives in [`SfxKind`]; each kind maps
//! to exactly one synthesis recipe, so there is a single source of truth
//! for the parameters and each effect can be unit-tested by rendering it.

use std::fmt;

use rand::Rng;

use super::synth::{Automation, Curve, Signal, SoundRecipe, Waveform};

/// Near-silence floor for exponential gain decays.
const SILENCE: f32 = 0.0001;

/// The fixed enumeration of one-shot effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SfxKind {
    /// UI click; base pitch is jittered per trigger.
    Click,
    /// Journal open/close.
    PageTurn,
    /// Descending creak when moving between rooms.
    Door,
    /// Inventory item granted.
    ItemPickup,
    /// Three-note rise on a correct choice.
    Success,
    /// Low square-wave fall on a wrong or blocked choice.
    Failure,
    /// Soft low fade used as an ambience stinger during narration.
    Rain,
    /// Filtered noise burst.
    Thunder,
    /// Sub-bass sting played once when the story begins.
    HauntedStart,
    /// Detuned beating sines, the signature spectral sting.
    GhostAppear,
}

impl SfxKind {
    pub const ALL: [SfxKind; 10] = [
        SfxKind::Click,
        SfxKind::PageTurn,
        SfxKind::Door,
        SfxKind::ItemPickup,
        SfxKind::Success,
        SfxKind::Failure,
        SfxKind::Rain,
        SfxKind::Thunder,
        SfxKind::HauntedStart,
        SfxKind::GhostAppear,
    ];

    /// Resolve a symbolic effect name. Unknown names yield `None`, which
    /// callers treat as a no-op, keeping the presentation layer decoupled
    /// from exhaustive matching.
    pub fn from_name(name: &str) -> Option<SfxKind> {
        match name {
            "click" => Some(SfxKind::Click),
            "page_turn" => Some(SfxKind::PageTurn),
            "door" => Some(SfxKind::Door),
            "item_pickup" => Some(SfxKind::ItemPickup),
            "success" => Some(SfxKind::Success),
            "failure" => Some(SfxKind::Failure),
            "rain" => Some(SfxKind::Rain),
            "thunder" => Some(SfxKind::Thunder),
            "haunted_start" => Some(SfxKind::HauntedStart),
            "ghost_appear" => Some(SfxKind::GhostAppear),
            _ => None,
        }
    }

    /// Build the synthesis recipe for this effect.
    ///
    /// The RNG feeds per-trigger variation (click pitch) and noise-based
    /// sources; passing a seeded RNG makes the output reproducible.
    pub fn recipe(self, rng: &mut impl Rng) -> SoundRecipe {
        match self {
            SfxKind::Click => {
                let base = rng.gen_range(300.0..800.0);
                SoundRecipe {
                    source: Signal::Tone {
                        waveform: Waveform::Sine,
                        freq: Automation::start(base).then(0.1, base * 0.5, Curve::Exponential),
                    },
                    filter: None,
                    gain: Automation::start(0.08).then(0.1, SILENCE, Curve::Exponential),
                    duration: 0.1,
                }
            }
            SfxKind::PageTurn => SoundRecipe {
                source: Signal::Tone {
                    waveform: Waveform::Sine,
                    freq: Automation::constant(400.0),
                },
                filter: None,
                gain: Automation::start(0.1).then(0.3, SILENCE, Curve::Exponential),
                duration: 0.3,
            },
            SfxKind::Door => SoundRecipe {
                source: Signal::Tone {
                    waveform: Waveform::Sine,
                    freq: Automation::start(100.0).then(1.5, 40.0, Curve::Linear),
                },
                filter: None,
                gain: Automation::start(0.1).then(1.5, SILENCE, Curve::Exponential),
                duration: 1.5,
            },
            SfxKind::ItemPickup => SoundRecipe {
                source: Signal::Tone {
                    waveform: Waveform::Sine,
                    freq: Automation::constant(880.0),
                },
                filter: None,
                gain: Automation::start(0.2).then(0.2, SILENCE, Curve::Exponential),
                duration: 0.2,
            },
            SfxKind::Success => SoundRecipe {
                source: Signal::Tone {
                    waveform: Waveform::Sine,
                    freq: Automation::start(440.0)
                        .then(0.1, 554.0, Curve::Step)
                        .then(0.2, 659.0, Curve::Step),
                },
                filter: None,
                gain: Automation::start(0.2).then(0.6, SILENCE, Curve::Exponential),
                duration: 0.6,
            },
            SfxKind::Failure => SoundRecipe {
                source: Signal::Tone {
                    waveform: Waveform::Square,
                    freq: Automation::start(50.0).then(0.8, 20.0, Curve::Linear),
                },
                filter: None,
                gain: Automation::start(0.3).then(0.8, SILENCE, Curve::Exponential),
                duration: 0.8,
            },
            SfxKind::Rain => SoundRecipe {
                source: Signal::Tone {
                    waveform: Waveform::Triangle,
                    freq: Automation::constant(50.0),
                },
                filter: None,
                gain: Automation::start(0.1).then(1.0, 0.0, Curve::Linear),
                duration: 1.0,
            },
            SfxKind::Thunder => SoundRecipe {
                source: Signal::Noise,
                filter: Some(Automation::start(100.0).then(1.5, 40.0, Curve::Exponential)),
                gain: Automation::start(0.5).then(2.0, SILENCE, Curve::Exponential),
                duration: 2.0,
            },
            SfxKind::HauntedStart => SoundRecipe {
                source: Signal::Tone {
                    waveform: Waveform::Sine,
                    freq: Automation::start(60.0).then(4.0, 30.0, Curve::Exponential),
                },
                filter: Some(Automation::constant(200.0)),
                gain: Automation::start(SILENCE)
                    .then(0.5, 0.4, Curve::Linear)
                    .then(4.0, SILENCE, Curve::Exponential),
                duration: 4.0,
            },
            SfxKind::GhostAppear => SoundRecipe {
                source: Signal::TonePair {
                    waveform: Waveform::Sine,
                    freq: Automation::start(220.0).then(3.0, 440.0, Curve::Exponential),
                    detune_hz: 4.0,
                },
                filter: None,
                gain: Automation::start(SILENCE)
                    .then(1.0, 0.1, Curve::Linear)
                    .then(3.0, SILENCE, Curve::Exponential),
                duration: 3.0,
            },
        }
    }
}

impl fmt::Display for SfxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SfxKind::Click => "click",
            SfxKind::PageTurn => "page_turn",
            SfxKind::Door => "door",
            SfxKind::ItemPickup => "item_pickup",
            SfxKind::Success => "success",
            SfxKind::Failure => "failure",
            SfxKind::Rain => "rain",
            SfxKind::Thunder => "thunder",
            SfxKind::HauntedStart => "haunted_start",
            SfxKind::GhostAppear => "ghost_appear",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::synth::{peak, render, SAMPLE_RATE};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x0DD)
    }

    #[test]
    fn test_name_round_trip() {
        for kind in SfxKind::ALL {
            assert_eq!(SfxKind::from_name(&kind.to_string()), Some(kind));
        }
    }

    #[test]
    fn test_unknown_name_is_none() {
        assert_eq!(SfxKind::from_name("laser_blast"), None);
        assert_eq!(SfxKind::from_name(""), None);
        assert_eq!(SfxKind::from_name("CLICK"), None);
    }

    #[test]
    fn test_every_recipe_renders_finite_bounded_audio() {
        let mut r = rng();
        for kind in SfxKind::ALL {
            let recipe = kind.recipe(&mut r);
            assert!(recipe.duration > 0.0, "{} must be finite", kind);
            assert!(recipe.duration <= 4.0, "{} overlong", kind);

            let samples = render(&recipe, &mut r);
            assert_eq!(
                samples.len(),
                (SAMPLE_RATE as f32 * recipe.duration) as usize
            );
            assert!(samples.iter().all(|s| s.is_finite()));
            assert!(peak(&samples) > 0.001, "{} rendered silence", kind);
        }
    }

    #[test]
    fn test_recipes_end_near_silence() {
        let mut r = rng();
        for kind in SfxKind::ALL {
            let recipe = kind.recipe(&mut r);
            let samples = render(&recipe, &mut r);
            let tail = &samples[samples.len().saturating_sub(64)..];
            assert!(
                peak(tail) < 0.02,
                "{} does not decay to silence (tail peak {})",
                kind,
                peak(tail)
            );
        }
    }

    #[test]
    fn test_click_pitch_jitter_stays_in_range() {
        let mut r = rng();
        for _ in 0..32 {
            let recipe = SfxKind::Click.recipe(&mut r);
            match recipe.source {
                Signal::Tone { ref freq, .. } => {
                    let base = freq.value_at(0.0);
                    assert!((300.0..800.0).contains(&base));
                }
                _ => panic!("click must be a single tone"),
            }
        }
    }

    #[test]
    fn test_success_steps_upward() {
        let mut r = rng();
        let recipe = SfxKind::Success.recipe(&mut r);
        match recipe.source {
            Signal::Tone { ref freq, .. } => {
                assert_eq!(freq.value_at(0.05), 440.0);
                assert_eq!(freq.value_at(0.15), 554.0);
                assert_eq!(freq.value_at(0.25), 659.0);
            }
            _ => panic!("success must be a single tone"),
        }
    }

    #[test]
    fn test_thunder_is_filtered_noise() {
        let mut r = rng();
        let recipe = SfxKind::Thunder.recipe(&mut r);
        assert!(matches!(recipe.source, Signal::Noise));
        let cutoff = recipe.filter.expect("thunder runs through a lowpass");
        assert_eq!(cutoff.value_at(0.0), 100.0);
        assert!((cutoff.value_at(1.5) - 40.0).abs() < 0.5);
    }

    #[test]
    fn test_ghost_appear_is_detuned_pair() {
        let mut r = rng();
        let recipe = SfxKind::GhostAppear.recipe(&mut r);
        match recipe.source {
            Signal::TonePair { detune_hz, .. } => assert_eq!(detune_hz, 4.0),
            _ => panic!("ghost sting must beat"),
        }
    }
}
