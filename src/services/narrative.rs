//! Ghost encounters, journal entries, and room art.
//!
//! Three independent remote operations, each with a fixed fallback so a
//! dead backend never blocks progression.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::client::ServiceClient;
use crate::error::ServiceError;

const NARRATIVE_MODEL: &str = "gemini-3-flash-preview";
const IMAGE_MODEL: &str = "gemini-2.5-flash-image";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GhostKind {
    Friendly,
    Malevolent,
}

/// A conjured ghost encounter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ghost {
    pub name: String,
    pub kind: GhostKind,
    pub appearance: String,
    pub dialogue: String,
    pub hint: String,
}

impl Ghost {
    pub fn is_friendly(&self) -> bool {
        self.kind == GhostKind::Friendly
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mood {
    Brave,
    Scared,
    Curious,
}

/// One page of Ace's journal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub level: u32,
    pub content: String,
    pub mood: Mood,
    pub clues_found: Vec<String>,
}

/// Wire shape of a generated ghost; `kind` arrives as free text and is
/// validated into [`GhostKind`] with a malevolent default.
#[derive(Debug, Deserialize)]
struct GhostReply {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    appearance: String,
    dialogue: String,
    hint: String,
}

#[derive(Debug, Deserialize)]
struct JournalReply {
    content: String,
    mood: String,
}

/// The ghost the Manor falls back on when the service is unreachable.
pub fn fallback_ghost() -> Ghost {
    Ghost {
        name: "The Whispering Fog".to_string(),
        kind: GhostKind::Malevolent,
        appearance: "A cloud of swirling grey mist.".to_string(),
        dialogue: "You walk a lonely path, child. Be careful what you seek.".to_string(),
        hint: "The shadows grow longer as the clock ticks.".to_string(),
    }
}

pub fn fallback_journal_entry(level: u32, inventory: &[String]) -> JournalEntry {
    JournalEntry {
        level,
        content: "The shadows here are strange. I can feel eyes on the back of my neck. \
                  I must keep moving."
            .to_string(),
        mood: Mood::Scared,
        clues_found: inventory.to_vec(),
    }
}

/// Narrative generation operations.
pub struct NarrativeService {
    client: ServiceClient,
}

impl NarrativeService {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }

    /// Conjure the room's ghost. Falls back to the Whispering Fog on any
    /// failure.
    pub fn spectral_encounter(
        &self,
        level: u32,
        room_title: &str,
        ghost_vibe: &str,
        inventory: &[String],
    ) -> Ghost {
        match self.try_encounter(level, room_title, ghost_vibe, inventory) {
            Ok(ghost) => ghost,
            Err(e) => {
                tracing::warn!("Encounter generation failed, using fallback: {}", e);
                fallback_ghost()
            }
        }
    }

    fn try_encounter(
        &self,
        level: u32,
        room_title: &str,
        ghost_vibe: &str,
        inventory: &[String],
    ) -> Result<Ghost, ServiceError> {
        let carried = if inventory.is_empty() {
            "nothing but his courage".to_string()
        } else {
            inventory.join(", ")
        };
        let relationship = relationship_context(level);

        let prompt = format!(
            "The character 'Ace' is in Level {}: '{}'.\n\
             Ghost Vibe for this level: {}\n\
             Ace currently carries: {}.\n\
             Relationship Stage: {}\n\n\
             Generate a ghost encounter as JSON with fields name, type \
             ('FRIENDLY' or 'MALEVOLENT'), appearance, dialogue, hint. \
             Use a spooky but kid-appropriate appearance.",
            level, room_title, ghost_vibe, carried, relationship
        );

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "responseMimeType": "application/json" }
        });

        let reply = self.client.generate(NARRATIVE_MODEL, body)?;
        let text = ServiceClient::first_text(&reply)?;
        let ghost: GhostReply = serde_json::from_str(text)
            .map_err(|e| ServiceError::MalformedReply(e.to_string()))?;

        Ok(Ghost {
            name: ghost.name,
            kind: match ghost.kind.as_str() {
                "FRIENDLY" => GhostKind::Friendly,
                _ => GhostKind::Malevolent,
            },
            appearance: ghost.appearance,
            dialogue: ghost.dialogue,
            hint: ghost.hint,
        })
    }

    /// Write Ace's journal entry for a resolved choice. Falls back to a
    /// fixed scared entry.
    pub fn journal_entry(
        &self,
        level: u32,
        room_title: &str,
        choice_made: &str,
        was_correct: bool,
        inventory: &[String],
    ) -> JournalEntry {
        match self.try_journal_entry(level, room_title, choice_made, was_correct) {
            Ok((content, mood)) => JournalEntry {
                level,
                content,
                mood,
                clues_found: inventory.to_vec(),
            },
            Err(e) => {
                tracing::warn!("Journal generation failed, using fallback: {}", e);
                fallback_journal_entry(level, inventory)
            }
        }
    }

    fn try_journal_entry(
        &self,
        level: u32,
        room_title: &str,
        choice_made: &str,
        was_correct: bool,
    ) -> Result<(String, Mood), ServiceError> {
        let outcome = if was_correct { "succeeded" } else { "failed" };
        let prompt = format!(
            "Write a short first-person journal entry for 'Ace' who just {} \
             an encounter in level {} '{}'. He chose: {}. Tone: immersive, eerie. \
             Reply as JSON with fields content and mood \
             ('BRAVE', 'SCARED' or 'CURIOUS').",
            outcome, level, room_title, choice_made
        );

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "responseMimeType": "application/json" }
        });

        let reply = self.client.generate(NARRATIVE_MODEL, body)?;
        let text = ServiceClient::first_text(&reply)?;
        let entry: JournalReply = serde_json::from_str(text)
            .map_err(|e| ServiceError::MalformedReply(e.to_string()))?;

        let mood = match entry.mood.as_str() {
            "BRAVE" => Mood::Brave,
            "CURIOUS" => Mood::Curious,
            _ => Mood::Scared,
        };
        Ok((entry.content, mood))
    }

    /// Generate gothic art for the current room. `None` on any failure;
    /// the presentation keeps its static look.
    pub fn room_image(&self, room_title: &str, description: &str) -> Option<Vec<u8>> {
        match self.try_room_image(room_title, description) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::debug!("Room image unavailable: {}", e);
                None
            }
        }
    }

    fn try_room_image(&self, room_title: &str, description: &str) -> Result<Vec<u8>, ServiceError> {
        let prompt = format!(
            "Cinematic, ultra-detailed gothic horror art of a haunted room called '{}'. \
             Story context: {}. Eerie moonlight, no humans or ghosts. 16:9 aspect ratio.",
            room_title, description
        );

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let reply = self.client.generate(IMAGE_MODEL, body)?;
        let data = ServiceClient::first_inline_data(&reply)?;
        BASE64
            .decode(data)
            .map_err(|e| ServiceError::MalformedReply(e.to_string()))
    }
}

fn relationship_context(level: u32) -> &'static str {
    if level <= 3 {
        "The ghosts are distant, cold, and suspicious."
    } else if level <= 7 {
        "The ghosts are beginning to show their humanity and a strange warmth toward Ace."
    } else {
        "The ghosts feel a deep bond with Ace, welcoming him as the final soul needed \
         for the collection."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_service() -> NarrativeService {
        NarrativeService::new(ServiceClient::new(None))
    }

    #[test]
    fn test_encounter_falls_back_without_key() {
        let ghost = offline_service().spectral_encounter(1, "The Iron Gates", "weary", &[]);
        assert_eq!(ghost.name, "The Whispering Fog");
        assert_eq!(ghost.kind, GhostKind::Malevolent);
        assert!(!ghost.is_friendly());
    }

    #[test]
    fn test_journal_falls_back_without_key() {
        let inventory = vec!["Rusted Key".to_string()];
        let entry =
            offline_service().journal_entry(2, "The Dust-Choked Library", "a choice", true, &inventory);
        assert_eq!(entry.level, 2);
        assert_eq!(entry.mood, Mood::Scared);
        assert_eq!(entry.clues_found, inventory);
    }

    #[test]
    fn test_room_image_degrades_to_none() {
        assert!(offline_service().room_image("The Iron Gates", "storm").is_none());
    }

    #[test]
    fn test_relationship_context_stages() {
        assert!(relationship_context(1).contains("distant"));
        assert!(relationship_context(5).contains("warmth"));
        assert!(relationship_context(9).contains("final soul"));
    }

    #[test]
    fn test_ghost_kind_serde_round_trip() {
        let json = serde_json::to_string(&GhostKind::Friendly).unwrap();
        assert_eq!(json, "\"FRIENDLY\"");
        let back: GhostKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, GhostKind::Friendly);
    }

    #[test]
    fn test_journal_entry_serde_round_trip() {
        let entry = fallback_journal_entry(4, &["Old Map".to_string()]);
        let json = serde_json::to_string(&entry).unwrap();
        let back: JournalEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.level, 4);
        assert_eq!(back.mood, Mood::Scared);
        assert_eq!(back.clues_found, entry.clues_found);
    }
}
