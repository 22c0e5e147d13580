//! Spoken-line synthesis.
//!
//! Voice and tone are chosen from the level and the ghost's disposition
//! before the audio stage; the reply is a base64 16-bit PCM payload the
//! dialogue player decodes. Any failure yields `None`; dialogue is
//! optional polish.

use serde_json::json;

use super::client::ServiceClient;
use crate::error::ServiceError;

const SPEECH_MODEL: &str = "gemini-2.5-flash-preview-tts";

/// Prebuilt voices, rotated by level so each room sounds distinct.
const VOICES: [&str; 5] = ["Puck", "Charon", "Kore", "Fenrir", "Zephyr"];

pub struct SpeechService {
    client: ServiceClient,
}

impl SpeechService {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }

    /// Synthesize a spoken line. Returns the transport-encoded PCM payload,
    /// or `None` on any failure.
    pub fn synthesize(&self, text: &str, level: u32, is_friendly: bool) -> Option<String> {
        match self.try_synthesize(text, level, is_friendly) {
            Ok(payload) => Some(payload),
            Err(ServiceError::MissingKey) => None,
            Err(e) => {
                tracing::warn!("Speech synthesis failed: {}", e);
                None
            }
        }
    }

    fn try_synthesize(
        &self,
        text: &str,
        level: u32,
        is_friendly: bool,
    ) -> Result<String, ServiceError> {
        let spoken = format!("{}{}", tone_prefix(level, is_friendly), text);
        let body = json!({
            "contents": [{ "parts": [{ "text": spoken }] }],
            "generationConfig": {
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": {
                        "prebuiltVoiceConfig": { "voiceName": voice_for_level(level) }
                    }
                }
            }
        });

        let reply = self.client.generate(SPEECH_MODEL, body)?;
        ServiceClient::first_inline_data(&reply).map(str::to_string)
    }
}

/// Deep-manor ghosts speak softly regardless of disposition.
fn tone_prefix(level: u32, is_friendly: bool) -> &'static str {
    if level > 7 {
        "Softly: "
    } else if is_friendly {
        "Kindly: "
    } else {
        "Ghostly: "
    }
}

fn voice_for_level(level: u32) -> &'static str {
    VOICES[(level.saturating_sub(1) as usize) % VOICES.len()]
}
