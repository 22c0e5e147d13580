//! Ghostly Chronicles: a ten-level haunted-manor narrative game.
//!
//! A child character enters the Manor, meets procedurally-described
//! ghosts, makes inventory-gated dialogue choices, and keeps a journal.
//! All narrative content comes from a generative service with static
//! fallbacks; every sound is synthesized at runtime by the procedural
//! audio engine in [`audio`].

pub mod audio;
pub mod config;
pub mod error;
pub mod game;
pub mod levels;
pub mod messaging;
pub mod services;
