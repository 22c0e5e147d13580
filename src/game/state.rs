/// Game state management
///
/// Tracks where Ace is in the Manor and what he carries.
use chrono::NaiveDate;

use crate::levels::MAX_LIVES;
use crate::services::{Ghost, JournalEntry};

/// Current screen of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// Title screen.
    Menu,
    /// Opening story, one beat at a time (0-based).
    Intro { beat: usize },
    /// Threshold screen before a room is entered.
    LevelStart,
    /// A ghost encounter with choices on the table.
    Playing,
    /// A correct choice resolved; waiting to advance.
    Interaction,
    /// A wrong choice resolved; retry or surrender.
    LevelFailed,
    /// The Manor has its payment.
    Ending,
}

/// Game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Current level, 1-based.
    level: u32,
    lives: u32,
    status: GameStatus,
    inventory: Vec<String>,
    journal: Vec<JournalEntry>,
    current_ghost: Option<Ghost>,
    last_daily_reset: NaiveDate,
}

impl GameState {
    /// Create a fresh state at the gates of the Manor.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            level: 1,
            lives: MAX_LIVES,
            status: GameStatus::Menu,
            inventory: Vec::new(),
            journal: Vec::new(),
            current_ghost: None,
            last_daily_reset: today,
        }
    }

    /// Rebuild a state from persisted fields (status always restarts at
    /// the menu).
    pub fn restored(
        level: u32,
        lives: u32,
        inventory: Vec<String>,
        journal: Vec<JournalEntry>,
        last_daily_reset: NaiveDate,
    ) -> Self {
        Self {
            level: level.max(1),
            lives,
            status: GameStatus::Menu,
            inventory,
            journal,
            current_ghost: None,
            last_daily_reset,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn set_status(&mut self, status: GameStatus) {
        self.status = status;
    }

    pub fn inventory(&self) -> &[String] {
        &self.inventory
    }

    pub fn journal(&self) -> &[JournalEntry] {
        &self.journal
    }

    pub fn current_ghost(&self) -> Option<&Ghost> {
        self.current_ghost.as_ref()
    }

    pub fn set_current_ghost(&mut self, ghost: Option<Ghost>) {
        self.current_ghost = ghost;
    }

    pub fn last_daily_reset(&self) -> NaiveDate {
        self.last_daily_reset
    }

    pub fn has_item(&self, item: &str) -> bool {
        self.inventory.iter().any(|held| held == item)
    }

    /// Add an item to the inventory; duplicates are ignored.
    pub fn grant_item(&mut self, item: &str) {
        if !self.has_item(item) {
            self.inventory.push(item.to_string());
        }
    }

    /// Lose a life, saturating at zero. Returns the remaining count.
    pub fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    pub fn add_journal_entry(&mut self, entry: JournalEntry) {
        self.journal.push(entry);
    }

    /// Move to the given level and clear the room-scoped ghost.
    pub fn enter_level(&mut self, level: u32) {
        self.level = level;
        self.current_ghost = None;
    }

    /// Apply the daily reset if the stored date is not `today`: lives,
    /// inventory, and journal start over while level progress is kept.
    /// Returns true when a reset happened.
    pub fn apply_daily_reset(&mut self, today: NaiveDate) -> bool {
        if self.last_daily_reset == today {
            return false;
        }
        self.lives = MAX_LIVES;
        self.inventory.clear();
        self.journal.clear();
        self.last_daily_reset = today;
        true
    }
}
