//! Spoken dialogue playback.
//!
//! The speech service delivers base64-encoded 16-bit little-endian PCM at
//! a fixed 24 kHz. At most one dialogue clip is audible at a time; starting
//! a new one always stops the previous one first. Completion callbacks are
//! guarded by a monotonically increasing generation counter so a stale
//! watcher can never clear the speaking flag for a newer clip.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use parking_lot::Mutex;
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStreamHandle, Sink};

use crate::error::AudioError;

/// Sample rate the speech service renders at.
pub const DIALOGUE_SAMPLE_RATE: u32 = 24_000;

/// A decoded spoken line, ready to schedule.
#[derive(Debug, Clone)]
pub struct DialogueClip {
    samples: Vec<f32>,
}

impl DialogueClip {
    /// Decode a service payload (base64 over 16-bit LE PCM) into samples.
    pub fn from_base64_pcm(payload: &str) -> Result<Self, AudioError> {
        let bytes = BASE64
            .decode(payload.trim())
            .map_err(|e| AudioError::DecodeFailed(e.to_string()))?;
        if bytes.len() % 2 != 0 {
            return Err(AudioError::DecodeFailed(format!(
                "odd payload length {}",
                bytes.len()
            )));
        }
        let samples = bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32768.0)
            .collect();
        Ok(Self { samples })
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.samples.len() as f64 / DIALOGUE_SAMPLE_RATE as f64)
    }

    fn into_buffer(self) -> SamplesBuffer<f32> {
        SamplesBuffer::new(1, DIALOGUE_SAMPLE_RATE, self.samples)
    }
}

#[derive(Default)]
struct SpeakingInner {
    generation: AtomicU64,
    speaking: AtomicBool,
}

/// Shared speaking flag with generation guard.
///
/// Each playback start advances the generation; a completion only clears
/// the flag if its captured generation is still the current one.
#[derive(Clone, Default)]
pub struct SpeakingState {
    inner: Arc<SpeakingInner>,
}

impl SpeakingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new utterance: advance the generation and raise the flag.
    pub fn begin(&self) -> u64 {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.speaking.store(true, Ordering::SeqCst);
        generation
    }

    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::SeqCst)
    }

    pub fn is_speaking(&self) -> bool {
        self.inner.speaking.load(Ordering::SeqCst)
    }

    /// Clear the flag on behalf of `generation`. Returns false (and leaves
    /// the flag alone) if a newer utterance has superseded it.
    pub fn finish(&self, generation: u64) -> bool {
        if self.inner.generation.load(Ordering::SeqCst) == generation {
            self.inner.speaking.store(false, Ordering::SeqCst);
            true
        } else {
            false
        }
    }

    /// Explicit stop: invalidate any pending completion and lower the flag.
    pub fn halt(&self) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        self.inner.speaking.store(false, Ordering::SeqCst);
    }
}

struct ActiveClip {
    generation: u64,
    sink: Sink,
}

/// Owns the single dialogue voice.
#[derive(Clone, Default)]
pub struct DialoguePlayer {
    state: SpeakingState,
    current: Arc<Mutex<Option<ActiveClip>>>,
}

impl DialoguePlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SpeakingState {
        self.state.clone()
    }

    pub fn is_speaking(&self) -> bool {
        self.state.is_speaking()
    }

    /// Stop whatever is playing and open a new generation. The returned
    /// generation must accompany the decoded clip to [`deliver`].
    ///
    /// [`deliver`]: DialoguePlayer::deliver
    pub fn begin(&self) -> u64 {
        let mut current = self.current.lock();
        if let Some(active) = current.take() {
            active.sink.stop();
        }
        self.state.begin()
    }

    /// Schedule a decoded clip for the given generation. A clip whose
    /// generation is no longer current is dropped silently (it was
    /// superseded while its payload was in flight).
    pub fn deliver(
        &self,
        handle: &OutputStreamHandle,
        generation: u64,
        clip: DialogueClip,
        volume: f32,
    ) -> Result<(), AudioError> {
        let mut current = self.current.lock();
        if self.state.generation() != generation {
            return Ok(());
        }

        let sink = Sink::try_new(handle).map_err(|e| AudioError::SinkFailed(Box::new(e)))?;
        sink.set_volume(volume);
        let duration = clip.duration();
        sink.append(clip.into_buffer());
        *current = Some(ActiveClip { generation, sink });
        drop(current);

        let state = self.state.clone();
        let slot = Arc::clone(&self.current);
        thread::spawn(move || {
            thread::sleep(duration);
            if state.finish(generation) {
                let mut current = slot.lock();
                if current
                    .as_ref()
                    .map_or(false, |c| c.generation == generation)
                {
                    *current = None;
                }
            }
        });
        Ok(())
    }

    /// Halt the current clip, tolerating one that already finished.
    pub fn stop(&self) {
        let mut current = self.current.lock();
        self.state.halt();
        if let Some(active) = current.take() {
            active.sink.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_pcm(samples: &[i16]) -> String {
        let mut bytes = Vec::with_capacity(samples.len() * 2);
        for s in samples {
            bytes.extend_from_slice(&s.to_le_bytes());
        }
        BASE64.encode(bytes)
    }

    #[test]
    fn test_clip_decode() {
        let payload = encode_pcm(&[0, 16384, -16384, 32767]);
        let clip = DialogueClip::from_base64_pcm(&payload).unwrap();
        assert_eq!(clip.samples.len(), 4);
        assert!((clip.samples[0] - 0.0).abs() < 1e-6);
        assert!((clip.samples[1] - 0.5).abs() < 1e-6);
        assert!((clip.samples[2] + 0.5).abs() < 1e-6);
        assert!(clip.samples[3] < 1.0);
    }

    #[test]
    fn test_clip_duration() {
        let payload = encode_pcm(&vec![0i16; DIALOGUE_SAMPLE_RATE as usize]);
        let clip = DialogueClip::from_base64_pcm(&payload).unwrap();
        assert_eq!(clip.duration(), Duration::from_secs(1));
    }

    #[test]
    fn test_clip_decode_rejects_garbage() {
        assert!(DialogueClip::from_base64_pcm("not base64!!!").is_err());
        // Valid base64 but an odd byte count is not 16-bit PCM.
        let odd = BASE64.encode([1u8, 2, 3]);
        assert!(DialogueClip::from_base64_pcm(&odd).is_err());
    }

    #[test]
    fn test_speaking_begin_and_finish() {
        let state = SpeakingState::new();
        assert!(!state.is_speaking());

        let generation = state.begin();
        assert!(state.is_speaking());
        assert!(state.finish(generation));
        assert!(!state.is_speaking());
    }

    #[test]
    fn test_stale_completion_does_not_clear_newer_clip() {
        let state = SpeakingState::new();
        let first = state.begin();
        let second = state.begin();
        assert_ne!(first, second);

        // The first clip's watcher fires late: it must not touch state.
        assert!(!state.finish(first));
        assert!(state.is_speaking());

        // Only the current generation may clear the flag.
        assert!(state.finish(second));
        assert!(!state.is_speaking());
    }

    #[test]
    fn test_halt_invalidates_pending_completion() {
        let state = SpeakingState::new();
        let generation = state.begin();

        state.halt();
        assert!(!state.is_speaking());

        // A later begin must not be clobbered by the halted clip's watcher.
        let _next = state.begin();
        assert!(!state.finish(generation));
        assert!(state.is_speaking());
    }

    #[test]
    fn test_player_begin_supersedes_previous_generation() {
        let player = DialoguePlayer::new();
        let first = player.begin();
        assert!(player.is_speaking());

        let second = player.begin();
        assert!(player.is_speaking());
        assert!(second > first);

        // First clip's completion is stale now.
        assert!(!player.state().finish(first));
        assert!(player.is_speaking());
    }

    #[test]
    fn test_player_stop_is_idempotent() {
        let player = DialoguePlayer::new();
        player.begin();
        player.stop();
        assert!(!player.is_speaking());
        player.stop();
        assert!(!player.is_speaking());
    }
}
