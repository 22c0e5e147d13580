use thiserror::Error;

/// Application-level errors using thiserror for structured error handling.
///
/// These errors represent domain-specific failures that can occur during
/// application operation. They provide context and can be chained with anyhow.
///
/// Propagation policy: nothing here ever reaches the player as an error
/// state. Audio failures degrade to silence, service failures degrade to a
/// declared fallback value; the enums exist so tests can force each failure
/// mode deterministically.

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("No audio output device available")]
    PlatformUnavailable,

    #[error("Failed to open audio sink")]
    SinkFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Failed to decode dialogue payload: {0}")]
    DecodeFailed(String),
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("No API key configured")]
    MissingKey,

    #[error("Narrative service unreachable")]
    RemoteUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Narrative service returned status {0}")]
    BadStatus(u16),

    #[error("Malformed service reply: {0}")]
    MalformedReply(String),
}

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("Failed to load session from {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to save session to {path}")]
    SaveFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Could not determine save directory")]
    NoSaveDirectory,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to save configuration to {path}")]
    SaveFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Could not determine config directory")]
    NoConfigDirectory,
}

/// Type alias for application Results using anyhow for context chaining
pub type AppResult<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_display() {
        let err = AudioError::PlatformUnavailable;
        assert_eq!(err.to_string(), "No audio output device available");

        let err = ServiceError::MissingKey;
        assert_eq!(err.to_string(), "No API key configured");

        let err = ServiceError::BadStatus(503);
        assert_eq!(err.to_string(), "Narrative service returned status 503");
    }

    #[test]
    fn test_error_source_chain() {
        use std::io;

        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let save_err = SaveError::LoadFailed {
            path: "/test/session.json".to_string(),
            source: Box::new(io_err),
        };

        assert!(save_err.source().is_some());
        assert_eq!(
            save_err.to_string(),
            "Failed to load session from /test/session.json"
        );
    }
}
