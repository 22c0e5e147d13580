/// Messaging module for the game's event architecture
///
/// Events are notifications of things that happened (past tense) and are
/// broadcast to all subscribers. The game flow publishes them as it
/// resolves player actions; handlers react without the flow knowing who
/// is listening.
///
/// ## Architecture
///
/// ```text
/// ┌───────────┐      Event       ┌─────────────┐
/// │ Game flow │ ───────────────> │  Event Bus  │
/// └───────────┘                  └─────────────┘
///                                       │ Publishes
///                                       ▼
///                                ┌──────────────┐
///                                │   Handlers   │
///                                │ (AudioDirector)
///                                └──────────────┘
/// ```
pub mod bus;
pub mod events;

// Re-export commonly used types
pub use bus::{EventBus, SubscriberId};
pub use events::Event;
