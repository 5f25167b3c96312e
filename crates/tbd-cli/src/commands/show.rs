use std::path::Path;

use colored::Colorize;
use tbd_core::continuation::Bindings;
use tbd_core::render::{RenderCx, render_log};
use tbd_core::{EngineConfig, IdProvider, MemorySurface};

pub fn run(dir: &Path) -> Result<(), String> {
    let Some(session) = super::load_saved(dir)? else {
        println!("  No saved game in {}.", dir.display());
        return Ok(());
    };

    let config = EngineConfig::default();
    let output = config.regions.output;
    let mut ids = IdProvider::new(config.namespace);
    let mut surface = MemorySurface::new();
    let mut bindings = Bindings::new();
    let mut cx = RenderCx::new(&mut ids, &mut surface, &mut bindings);
    render_log(&mut cx, &session.log, &output).map_err(|e| format!("cannot replay: {e}"))?;

    for line in surface.text(&output).lines() {
        println!("  {line}");
    }
    println!();

    let state = serde_json::to_string(&session.state).map_err(|e| e.to_string())?;
    println!("  {} {state}", "state:".dimmed());
    println!("  {} passages", session.log.len());

    Ok(())
}
