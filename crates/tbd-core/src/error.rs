//! Error types for the passage engine.

use thiserror::Error;

use crate::output::LocalId;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while running, rendering or persisting a story.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A persisted or imported blob could not be parsed as a session.
    #[error("cannot read saved session: {0}")]
    Deserialization(String),

    /// A session could not be turned into its text form.
    #[error("cannot serialize session: {0}")]
    Serialization(String),

    /// An element targets a local id that was never emitted before it in the
    /// same passage.
    #[error("element targets local id {local_id}, which was not emitted earlier in the passage")]
    MissingLocalReference {
        /// The dangling local id.
        local_id: LocalId,
    },

    /// The persistent storage backend cannot be reached.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// No passage is registered under this name.
    #[error("unknown passage: {0}")]
    UnknownPassage(String),

    /// Arguments do not match the declared parameters of a passage.
    #[error("invalid arguments for passage '{passage}': {reason}")]
    InvalidArguments {
        /// Passage name.
        passage: String,
        /// What is wrong with the arguments.
        reason: String,
    },

    /// A text input value could not be converted for its argument.
    #[error("cannot convert '{value}' for argument '{argument}' (expected {expected})")]
    Conversion {
        /// Argument the value was meant for.
        argument: String,
        /// Raw value read from the input.
        value: String,
        /// Expected kind of value.
        expected: String,
    },

    /// A transition was requested while another one is still running.
    #[error("a passage is already running")]
    Busy,
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Self::StorageUnavailable(err.to_string())
        } else {
            Self::Deserialization(err.to_string())
        }
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        Self::StorageUnavailable(err.to_string())
    }
}
