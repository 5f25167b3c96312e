use std::fs;
use std::path::Path;

use colored::Colorize;
use tbd_core::save::encode_session;

pub fn run(dir: &Path, output: Option<&Path>) -> Result<(), String> {
    let session = super::load_saved(dir)?
        .ok_or_else(|| format!("no saved game in {}", dir.display()))?;
    let blob = encode_session(&session).map_err(|e| e.to_string())?;

    if let Some(path) = output {
        fs::write(path, &blob).map_err(|e| format!("failed to write {}: {e}", path.display()))?;
        println!(
            "  {} {} passages to {}",
            "Exported".green().bold(),
            session.log.len(),
            path.display()
        );
    } else {
        println!("{blob}");
    }

    Ok(())
}
