/// Session persistence
///
/// One serialized record written on every state change and read on
/// startup. When the stored date is not today, lives, inventory, and
/// journal reset while level progress survives.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::state::GameState;
use crate::error::SaveError;
use crate::services::JournalEntry;

/// Persisted session data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedSession {
    /// Version of the save format (for future migrations)
    pub version: u32,

    pub level: u32,
    pub lives: u32,
    pub inventory: Vec<String>,
    pub journal: Vec<JournalEntry>,
    pub last_daily_reset: NaiveDate,
}

impl SavedSession {
    /// Current save format version
    const VERSION: u32 = 1;

    /// Capture the persistable fields of a running state.
    pub fn from_state(state: &GameState) -> Self {
        Self {
            version: Self::VERSION,
            level: state.level(),
            lives: state.lives(),
            inventory: state.inventory().to_vec(),
            journal: state.journal().to_vec(),
            last_daily_reset: state.last_daily_reset(),
        }
    }

    /// Rebuild a game state, applying the daily reset against `today`.
    pub fn into_state(self, today: NaiveDate) -> GameState {
        let mut state = GameState::restored(
            self.level,
            self.lives,
            self.inventory,
            self.journal,
            self.last_daily_reset,
        );
        if state.apply_daily_reset(today) {
            tracing::info!("Daily reset applied; level progress kept");
        }
        state
    }

    /// Get the session file path
    pub fn save_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("GhostlyChronicles").join("session.json"))
    }

    /// Save the session to disk
    pub fn save(state: &GameState) -> Result<(), SaveError> {
        let session = Self::from_state(state);

        let path = Self::save_file_path().ok_or(SaveError::NoSaveDirectory)?;

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SaveError::SaveFailed {
                path: path.display().to_string(),
                source: Box::new(e),
            })?;
        }

        let json = serde_json::to_string_pretty(&session).map_err(|e| SaveError::SaveFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;
        std::fs::write(&path, json).map_err(|e| SaveError::SaveFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;

        tracing::debug!("Saved session to: {}", path.display());
        Ok(())
    }

    /// Load the session from disk; a missing file starts fresh.
    pub fn load(today: NaiveDate) -> Result<GameState, SaveError> {
        let path = Self::save_file_path().ok_or(SaveError::NoSaveDirectory)?;

        if !path.exists() {
            tracing::debug!("No saved session found, starting fresh");
            return Ok(GameState::new(today));
        }

        let json = std::fs::read_to_string(&path).map_err(|e| SaveError::LoadFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;
        let session: SavedSession =
            serde_json::from_str(&json).map_err(|e| SaveError::LoadFailed {
                path: path.display().to_string(),
                source: Box::new(e),
            })?;

        tracing::debug!("Loaded session from: {}", path.display());

        // Check version for future migrations
        if session.version != Self::VERSION {
            tracing::warn!(
                "Save format version mismatch: expected {}, found {}",
                Self::VERSION,
                session.version
            );
        }

        Ok(session.into_state(today))
    }

    /// Delete the session file (the Rebirth option).
    pub fn delete() -> Result<(), SaveError> {
        if let Some(path) = Self::save_file_path() {
            if path.exists() {
                std::fs::remove_file(&path).map_err(|e| SaveError::SaveFailed {
                    path: path.display().to_string(),
                    source: Box::new(e),
                })?;
                tracing::debug!("Deleted session file: {}", path.display());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::MAX_LIVES;
    use crate::services::narrative::fallback_journal_entry;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, n).unwrap()
    }

    #[test]
    fn test_from_state_captures_fields() {
        let mut state = GameState::new(day(1));
        state.enter_level(4);
        state.grant_item("Brass Flashlight");
        state.lose_life();

        let session = SavedSession::from_state(&state);
        assert_eq!(session.version, SavedSession::VERSION);
        assert_eq!(session.level, 4);
        assert_eq!(session.lives, MAX_LIVES - 1);
        assert_eq!(session.inventory, vec!["Brass Flashlight".to_string()]);
        assert_eq!(session.last_daily_reset, day(1));
    }

    #[test]
    fn test_round_trip_same_day() {
        let mut state = GameState::new(day(1));
        state.enter_level(3);
        state.grant_item("Old Map");
        state.add_journal_entry(fallback_journal_entry(2, state.inventory()));

        let session = SavedSession::from_state(&state);
        let restored = session.into_state(day(1));

        assert_eq!(restored.level(), 3);
        assert!(restored.has_item("Old Map"));
        assert_eq!(restored.journal().len(), 1);
    }

    #[test]
    fn test_round_trip_next_day_resets() {
        let mut state = GameState::new(day(1));
        state.enter_level(7);
        state.grant_item("Mirror Shard");
        state.lose_life();
        state.lose_life();

        let session = SavedSession::from_state(&state);
        let restored = session.into_state(day(2));

        assert_eq!(restored.level(), 7);
        assert_eq!(restored.lives(), MAX_LIVES);
        assert!(restored.inventory().is_empty());
        assert!(restored.journal().is_empty());
        assert_eq!(restored.last_daily_reset(), day(2));
    }

    #[test]
    fn test_serialization_round_trip() {
        let state = GameState::new(day(5));
        let session = SavedSession::from_state(&state);

        let json = serde_json::to_string(&session).unwrap();
        let back: SavedSession = serde_json::from_str(&json).unwrap();

        assert_eq!(back.version, session.version);
        assert_eq!(back.level, session.level);
        assert_eq!(back.last_daily_reset, session.last_daily_reset);
    }

    #[test]
    fn test_save_file_path() {
        let path = SavedSession::save_file_path();
        assert!(path.is_some());

        if let Some(path) = path {
            assert!(path.to_string_lossy().contains("GhostlyChronicles"));
            assert!(path.to_string_lossy().ends_with("session.json"));
        }
    }
}
