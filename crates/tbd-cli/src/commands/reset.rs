use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;
use tbd_core::EngineConfig;
use tbd_core::save::{erase_session, session_exists};

pub fn run(dir: &Path, yes: bool) -> Result<(), String> {
    let config = EngineConfig::default();
    let mut storage = super::storage(dir);

    if !session_exists(&storage, &config.storage_key).map_err(|e| e.to_string())? {
        println!("  No saved game in {}.", dir.display());
        return Ok(());
    }

    if !yes {
        print!("  This will erase all game data. Continue? [y/N] ");
        io::stdout().flush().map_err(|e| e.to_string())?;
        let mut answer = String::new();
        io::stdin()
            .lock()
            .read_line(&mut answer)
            .map_err(|e| e.to_string())?;
        if !matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    erase_session(&mut storage, &config.storage_key).map_err(|e| e.to_string())?;
    println!("  {} saved game erased", "Reset:".bold());

    Ok(())
}
