use std::fs;
use std::path::Path;

use colored::Colorize;
use tbd_core::EngineConfig;
use tbd_core::save::import_session;
use tracing::info;

use crate::demo::DemoState;

pub fn run(dir: &Path, file: &Path) -> Result<(), String> {
    let blob = fs::read_to_string(file)
        .map_err(|e| format!("failed to read {}: {e}", file.display()))?;

    let config = EngineConfig::default();
    let mut storage = super::storage(dir);
    let session = import_session::<DemoState>(&mut storage, &config.storage_key, &blob)
        .map_err(|e| format!("cannot import {}: {e}", file.display()))?;
    info!(file = %file.display(), "imported session");

    println!(
        "  {} {} passages from {}",
        "Imported".green().bold(),
        session.log.len(),
        file.display()
    );

    Ok(())
}
