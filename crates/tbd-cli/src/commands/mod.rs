pub mod export;
pub mod history;
pub mod import;
pub mod play;
pub mod reset;
pub mod show;

use std::path::Path;

use tbd_core::save::load_session;
use tbd_core::{EngineConfig, FileStorage, GameSession};

use crate::demo::DemoState;

/// Storage for sessions saved under `dir`.
fn storage(dir: &Path) -> FileStorage {
    FileStorage::new(dir)
}

/// Load the saved demo session, if there is one.
fn load_saved(dir: &Path) -> Result<Option<GameSession<DemoState>>, String> {
    let config = EngineConfig::default();
    load_session(&storage(dir), &config.storage_key)
        .map_err(|e| format!("failed to load {}: {e}", dir.display()))
}
