/// Event types for the game
///
/// Events represent things that have happened (past tense).
/// They are broadcast to all subscribers.
use crate::services::Ghost;

/// Game events
#[derive(Debug, Clone)]
pub enum Event {
    /// The player stepped into the dark from the menu
    IntroStarted,

    /// The intro advanced to a story beat (0-based)
    IntroAdvanced { beat: usize },

    /// A level was entered and its threshold shown
    LevelEntered { level: u32 },

    /// The room's ghost materialized
    GhostAppeared { level: u32, ghost: Ghost },

    /// A choice was made and resolved correct
    ChoiceSucceeded { level: u32 },

    /// A choice was made and resolved wrong
    ChoiceFailed { level: u32, lives_left: u32 },

    /// A choice was refused for lack of a required item
    ChoiceBlocked { item_required: String },

    /// An inventory item was granted
    ItemFound { item: String },

    /// The player moved on to the next room
    DoorOpened { to_level: u32 },

    /// The player silenced the ghost's echo
    DialogueSilenced,

    /// The journal sidebar was opened or closed
    JournalToggled,

    /// A menu/choice button was pressed
    ButtonPressed,

    /// The final room accepted its payment
    GameEnded,
}

impl Event {
    /// Get a human-readable description of the event
    pub fn description(&self) -> String {
        match self {
            Event::IntroStarted => "Intro started".to_string(),
            Event::IntroAdvanced { beat } => format!("Intro beat {}", beat + 1),
            Event::LevelEntered { level } => format!("Entered level {}", level),
            Event::GhostAppeared { ghost, .. } => format!("Ghost appeared: {}", ghost.name),
            Event::ChoiceSucceeded { level } => format!("Level {} cleared", level),
            Event::ChoiceFailed { lives_left, .. } => {
                format!("Wrong choice, {} lives left", lives_left)
            }
            Event::ChoiceBlocked { item_required } => {
                format!("Blocked: requires {}", item_required)
            }
            Event::ItemFound { item } => format!("Found item: {}", item),
            Event::DoorOpened { to_level } => format!("Door opened to level {}", to_level),
            Event::DialogueSilenced => "Echo silenced".to_string(),
            Event::JournalToggled => "Journal toggled".to_string(),
            Event::ButtonPressed => "Button pressed".to_string(),
            Event::GameEnded => "The Manor claimed its guest".to_string(),
        }
    }
}
