//! Saving, loading, exporting and importing game sessions.

pub mod storage;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::output::PassageLog;
use crate::render::check_targets;

pub use storage::{FileStorage, MemoryStorage, Storage};

/// The unit of persistence: application state plus passage history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameSession<S> {
    /// User-defined state.
    pub state: S,
    /// Retained passages, oldest first.
    pub log: PassageLog,
}

impl<S> GameSession<S> {
    /// A session with an empty history.
    pub fn new(state: S) -> Self {
        Self {
            state,
            log: PassageLog::new(),
        }
    }
}

/// Serialize a session to its exported text form.
pub fn encode_session<S: Serialize>(session: &GameSession<S>) -> EngineResult<String> {
    serde_json::to_string_pretty(session).map_err(|e| EngineError::Serialization(e.to_string()))
}

/// Parse a session and check that every passage can be replayed.
pub fn decode_session<S: DeserializeOwned>(blob: &str) -> EngineResult<GameSession<S>> {
    let session: GameSession<S> =
        serde_json::from_str(blob).map_err(|e| EngineError::Deserialization(e.to_string()))?;
    for (index, passage) in session.log.passages().iter().enumerate() {
        check_targets(passage).map_err(|e| {
            EngineError::Deserialization(format!("passage {index} cannot be replayed: {e}"))
        })?;
    }
    Ok(session)
}

/// Whether a session is stored under `key`.
pub fn session_exists(storage: &dyn Storage, key: &str) -> EngineResult<bool> {
    storage.has(key)
}

/// Store a session and return its serialized form.
pub fn save_session<S: Serialize>(
    storage: &mut dyn Storage,
    key: &str,
    session: &GameSession<S>,
) -> EngineResult<String> {
    let blob = encode_session(session)?;
    storage.set(key, &blob)?;
    debug!(key, bytes = blob.len(), passages = session.log.len(), "saved session");
    Ok(blob)
}

/// Load the session stored under `key`, if any.
pub fn load_session<S: DeserializeOwned>(
    storage: &dyn Storage,
    key: &str,
) -> EngineResult<Option<GameSession<S>>> {
    match storage.get(key)? {
        Some(blob) => decode_session(&blob).map(Some),
        None => Ok(None),
    }
}

/// Delete the session stored under `key`.
pub fn erase_session(storage: &mut dyn Storage, key: &str) -> EngineResult<()> {
    storage.remove(key)
}

/// Validate an exported blob and store it as the current session.
pub fn import_session<S: Serialize + DeserializeOwned>(
    storage: &mut dyn Storage,
    key: &str,
    blob: &str,
) -> EngineResult<GameSession<S>> {
    let session = decode_session::<S>(blob)?;
    save_session(storage, key, &session)?;
    Ok(session)
}
