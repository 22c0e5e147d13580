pub mod ambient;
pub mod dialogue;
pub mod director;
pub mod sfx;
/// Procedural audio engine
///
/// Every sound in the game is synthesized at runtime; there are no
/// recorded assets. The engine owns the single output stream and three
/// voices on top of it:
///
/// ```text
/// AudioEngine
///   ├── SFX        one-shot recipes, fire-and-forget   ─┐
///   ├── AmbientBed looping wind + drone singleton      ─┤ master volume
///   └── Dialogue   one clip at a time, generation-guarded ── full level
/// ```
///
/// The output stream is opened lazily on the first sound-producing call.
/// If the host has no audio device the engine degrades permanently to a
/// silent no-op; the game stays fully playable muted.
pub mod synth;

use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};

pub use dialogue::{DialogueClip, DialoguePlayer, SpeakingState};
pub use sfx::SfxKind;

use ambient::AmbientBed;
use synth::SAMPLE_RATE;

/// Default scaling applied to SFX and ambient paths.
pub const DEFAULT_MASTER_VOLUME: f32 = 0.25;

enum OutputState {
    Uninitialized,
    Ready {
        _stream: OutputStream,
        handle: OutputStreamHandle,
    },
    Unavailable,
}

/// Central controller for all game audio. Constructed once at startup and
/// handed by reference to every caller.
pub struct AudioEngine {
    output: OutputState,
    master_volume: f32,
    ambient: AmbientBed,
    dialogue: DialoguePlayer,
}

impl AudioEngine {
    pub fn new(master_volume: f32) -> Self {
        Self {
            output: OutputState::Uninitialized,
            master_volume: master_volume.clamp(0.0, 1.0),
            ambient: AmbientBed::new(),
            dialogue: DialoguePlayer::new(),
        }
    }

    /// Idempotent ensure-initialized: opens the output stream on first
    /// call, reports whether sound can be produced. Safe to call before
    /// every sound-producing operation.
    pub fn ensure_ready(&mut self) -> bool {
        self.ensure_output().is_some()
    }

    fn ensure_output(&mut self) -> Option<OutputStreamHandle> {
        if matches!(self.output, OutputState::Uninitialized) {
            self.output = match OutputStream::try_default() {
                Ok((stream, handle)) => {
                    tracing::info!("Audio output initialized");
                    OutputState::Ready {
                        _stream: stream,
                        handle,
                    }
                }
                Err(e) => {
                    tracing::warn!("No audio output, running muted: {}", e);
                    OutputState::Unavailable
                }
            };
        }
        match &self.output {
            OutputState::Ready { handle, .. } => Some(handle.clone()),
            _ => None,
        }
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    /// Synthesize and schedule a one-shot effect. Fire-and-forget: the
    /// sink is detached and frees itself when the buffer runs out.
    pub fn play_sfx(&mut self, kind: SfxKind) {
        let Some(handle) = self.ensure_output() else {
            return;
        };

        let mut rng = rand::thread_rng();
        let recipe = kind.recipe(&mut rng);
        let samples = synth::render(&recipe, &mut rng);

        match Sink::try_new(&handle) {
            Ok(sink) => {
                sink.set_volume(self.master_volume);
                sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples));
                sink.detach();
                tracing::trace!(effect = %kind, "sfx scheduled");
            }
            Err(e) => tracing::warn!("Could not open sfx sink: {}", e),
        }
    }

    /// Trigger an effect by symbolic name; unknown names are ignored.
    pub fn play_sfx_named(&mut self, name: &str) {
        match SfxKind::from_name(name) {
            Some(kind) => self.play_sfx(kind),
            None => tracing::debug!(effect = name, "unknown sfx name ignored"),
        }
    }

    /// Start the ambient bed. No-op while it is already running.
    pub fn start_ambient(&mut self) {
        let Some(handle) = self.ensure_output() else {
            return;
        };
        self.ambient
            .start(&handle, self.master_volume, &mut rand::thread_rng());
    }

    /// Stop the ambient bed; safe when nothing is running.
    pub fn stop_ambient(&mut self) {
        self.ambient.stop();
    }

    pub fn ambient_active(&self) -> bool {
        self.ambient.is_active()
    }

    /// Open a dialogue turn: stop any current clip, raise the speaking
    /// flag, and hand back a session the caller completes once the speech
    /// payload arrives (possibly from another thread). Returns `None` when
    /// no sound can be produced.
    pub fn start_dialogue(&mut self) -> Option<DialogueSession> {
        let Some(handle) = self.ensure_output() else {
            self.dialogue.stop();
            return None;
        };
        let generation = self.dialogue.begin();
        Some(DialogueSession {
            player: self.dialogue.clone(),
            handle,
            generation,
        })
    }

    /// Halt the current dialogue clip, tolerating one that already ended.
    pub fn stop_dialogue(&mut self) {
        self.dialogue.stop();
    }

    pub fn is_speaking(&self) -> bool {
        self.dialogue.is_speaking()
    }

    /// Observable speaking flag, shareable with the presentation layer.
    pub fn speaking_state(&self) -> SpeakingState {
        self.dialogue.state()
    }
}

/// One in-flight dialogue turn. Created by [`AudioEngine::start_dialogue`];
/// completed with whatever the speech service returned.
pub struct DialogueSession {
    player: DialoguePlayer,
    handle: OutputStreamHandle,
    generation: u64,
}

impl DialogueSession {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Decode and schedule the service payload. `None` (service failure,
    /// missing key, network error) clears the speaking flag and exits
    /// silently; dialogue is optional polish, never blocking gameplay.
    pub fn deliver_payload(self, payload: Option<String>) {
        let Some(payload) = payload else {
            self.player.state().finish(self.generation);
            return;
        };

        let clip = match DialogueClip::from_base64_pcm(&payload) {
            Ok(clip) if !clip.is_empty() => clip,
            Ok(_) => {
                tracing::debug!("Empty dialogue clip discarded");
                self.player.state().finish(self.generation);
                return;
            }
            Err(e) => {
                tracing::warn!("Dialogue payload rejected: {}", e);
                self.player.state().finish(self.generation);
                return;
            }
        };

        if let Err(e) = self
            .player
            .deliver(&self.handle, self.generation, clip, 1.0)
        {
            tracing::warn!("Dialogue playback failed: {}", e);
            self.player.state().finish(self.generation);
        }
    }
}
