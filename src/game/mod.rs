/// Game module
///
/// The narrative state machine: current room, lives, inventory, journal,
/// and the transitions between screens. Choice resolution is pure
/// (`flow`), state is a plain struct (`state`), and the session survives
/// restarts through `persistence` with a daily reset of lives, inventory,
/// and journal that preserves level progress.
pub mod flow;
pub mod persistence;
pub mod state;

// Re-export commonly used types
pub use flow::{resolve_choice, ChoiceOutcome};
pub use persistence::SavedSession;
pub use state::{GameState, GameStatus};
