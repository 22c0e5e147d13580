//! Event-to-sound mapping.
//!
//! The director is the only audio-triggering path in the game: it owns the
//! engine, subscribes to the event bus, and turns each domain event into
//! stings, ambience changes, and dialogue. Dialogue payloads are fetched
//! on a background thread so the game loop never waits on the network.

use std::sync::Arc;
use std::thread;

use super::{AudioEngine, SfxKind};
use crate::levels::INTRO_STORY;
use crate::messaging::Event;
use crate::services::SpeechService;

pub struct AudioDirector {
    engine: AudioEngine,
    speech: Arc<SpeechService>,
}

impl AudioDirector {
    pub fn new(engine: AudioEngine, speech: Arc<SpeechService>) -> Self {
        Self { engine, speech }
    }

    pub fn engine(&self) -> &AudioEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut AudioEngine {
        &mut self.engine
    }

    /// React to one game event.
    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::IntroStarted => {
                self.engine.ensure_ready();
                self.engine.play_sfx(SfxKind::Click);
                self.engine.play_sfx(SfxKind::HauntedStart);
                self.engine.start_ambient();
                if let Some(beat) = INTRO_STORY.first() {
                    self.engine.play_sfx(beat.sting);
                }
            }
            Event::IntroAdvanced { beat } => {
                self.engine.play_sfx(SfxKind::Click);
                if let Some(beat) = INTRO_STORY.get(*beat) {
                    self.engine.play_sfx(beat.sting);
                }
            }
            Event::LevelEntered { .. } => {
                self.engine.play_sfx(SfxKind::Click);
            }
            Event::GhostAppeared { level, ghost } => {
                self.engine.play_sfx(SfxKind::GhostAppear);
                self.speak(ghost.dialogue.clone(), *level, ghost.is_friendly());
            }
            Event::ChoiceSucceeded { .. } => {
                self.engine.play_sfx(SfxKind::Success);
            }
            Event::ChoiceFailed { .. } | Event::ChoiceBlocked { .. } => {
                self.engine.play_sfx(SfxKind::Failure);
            }
            Event::ItemFound { .. } => {
                self.engine.play_sfx(SfxKind::ItemPickup);
            }
            Event::DoorOpened { .. } => {
                self.engine.stop_dialogue();
                self.engine.play_sfx(SfxKind::Door);
            }
            Event::DialogueSilenced => {
                self.engine.play_sfx(SfxKind::Click);
                self.engine.stop_dialogue();
            }
            Event::JournalToggled => {
                self.engine.play_sfx(SfxKind::PageTurn);
            }
            Event::ButtonPressed => {
                self.engine.play_sfx(SfxKind::Click);
            }
            Event::GameEnded => {
                self.engine.stop_ambient();
                self.engine.stop_dialogue();
            }
        }
    }

    /// Kick off one spoken line: the speaking flag is raised now, the
    /// payload is fetched off-thread, and the session resolves itself.
    fn speak(&mut self, text: String, level: u32, is_friendly: bool) {
        let Some(session) = self.engine.start_dialogue() else {
            return;
        };
        let speech = Arc::clone(&self.speech);
        thread::spawn(move || {
            let payload = speech.synthesize(&text, level, is_friendly);
            session.deliver_payload(payload);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::DEFAULT_MASTER_VOLUME;
    use crate::services::{narrative::fallback_ghost, ServiceClient};

    fn director() -> AudioDirector {
        AudioDirector::new(
            AudioEngine::new(DEFAULT_MASTER_VOLUME),
            Arc::new(SpeechService::new(ServiceClient::new(None))),
        )
    }

    #[test]
    fn test_every_event_is_handled_without_panic() {
        let mut d = director();
        let events = [
            Event::IntroStarted,
            Event::IntroAdvanced { beat: 1 },
            Event::IntroAdvanced { beat: 99 },
            Event::LevelEntered { level: 1 },
            Event::GhostAppeared {
                level: 1,
                ghost: fallback_ghost(),
            },
            Event::ChoiceSucceeded { level: 1 },
            Event::ChoiceFailed {
                level: 1,
                lives_left: 2,
            },
            Event::ChoiceBlocked {
                item_required: "Rusted Key".to_string(),
            },
            Event::ItemFound {
                item: "Rusted Key".to_string(),
            },
            Event::DoorOpened { to_level: 2 },
            Event::DialogueSilenced,
            Event::JournalToggled,
            Event::ButtonPressed,
            Event::GameEnded,
        ];
        for event in &events {
            d.handle_event(event);
        }
    }

    #[test]
    fn test_game_end_silences_everything() {
        let mut d = director();
        d.handle_event(&Event::IntroStarted);
        d.handle_event(&Event::GameEnded);
        assert!(!d.engine().ambient_active());
        assert!(!d.engine().is_speaking());
    }
}
