/// Generative narrative service module
///
/// Everything the Manor says, looks like, or writes down comes from a
/// remote generative service; this module owns those calls. Each operation
/// classifies its failures (missing key, remote unavailable, malformed
/// reply) and degrades to a declared fallback value, so the game is fully
/// playable with zero network connectivity.
pub mod client;
pub mod narrative;
pub mod speech;

// Re-export commonly used types
pub use client::ServiceClient;
pub use narrative::{Ghost, GhostKind, JournalEntry, Mood, NarrativeService};
pub use speech::SpeechService;
