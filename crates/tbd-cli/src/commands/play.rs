use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;
use tbd_core::{ElementAddress, EngineConfig, FileStorage, Game, MemorySurface, Outcome, Status};
use tracing::debug;

use crate::demo::{self, DemoState};
use crate::view::{Choice, choices, fresh_lines};

type DemoGame = Game<DemoState, MemorySurface, FileStorage>;

/// How a play session ended.
enum Exit {
    Quit,
    Reload,
}

pub fn run(dir: &Path, max_history: usize) -> Result<(), String> {
    let config = EngineConfig::default().with_max_history(max_history);
    let mut storage = super::storage(dir);

    println!("  {} Troubadour demo", "Starting".bold());
    println!("  Pick a choice by number, 'reset' to start over, 'quit' to exit.\n");

    let stdin = io::stdin();
    let mut reader = stdin.lock();

    loop {
        let mut game: DemoGame =
            Game::launch(demo::registry(), config.clone(), MemorySurface::new(), storage)
                .map_err(|e| format!("failed to start story: {e}"))?;

        match play(&mut game, &mut reader)? {
            Exit::Quit => return Ok(()),
            Exit::Reload => {
                println!("  {}\n", "Reloading...".dimmed());
                let (_, saved) = game.into_parts();
                storage = saved;
            }
        }
    }
}

fn play(game: &mut DemoGame, reader: &mut impl BufRead) -> Result<Exit, String> {
    if game.status() == Status::Recovery {
        println!(
            "  {}",
            "The saved game is unreadable. Type 'reset' to start over.".yellow()
        );
    }

    let mut shown: Vec<String> = Vec::new();
    loop {
        let text = game.surface().text(game.active_root());
        for line in fresh_lines(&shown, &text) {
            println!("  {line}");
        }
        shown = text.lines().map(str::to_string).collect();
        game.surface_mut().take_ops();

        let options = choices(game.surface(), game.active_root());
        println!();
        for (index, choice) in options.iter().enumerate() {
            println!("  {} {}", format!("[{}]", index + 1).cyan(), choice.label);
        }

        let Some(input) = prompt("> ", reader)? else {
            return Ok(Exit::Quit);
        };
        let target = match input.as_str() {
            "" => continue,
            "q" | "quit" => return Ok(Exit::Quit),
            "r" | "reset" => game.config().regions.reset.clone(),
            _ => match pick(&options, &input) {
                Some(choice) => {
                    if let Some(field) = &choice.input {
                        let value = prompt(&format!("  {}: ", choice.label), reader)?
                            .unwrap_or_default();
                        game.surface_mut().set_value(field, value);
                    }
                    choice.button.clone()
                }
                None => {
                    println!("  {}", format!("no choice '{input}'").yellow());
                    continue;
                }
            },
        };

        if activate(game, &target) {
            return Ok(Exit::Reload);
        }
    }
}

/// Deliver a choice. Returns whether the host must reload.
fn activate(game: &mut DemoGame, target: &ElementAddress) -> bool {
    debug!(address = %target, "activating");
    match game.activate(target) {
        Ok(Outcome::ReloadRequested) => return true,
        Ok(Outcome::Ignored) => println!("  {}", "That choice is no longer available.".yellow()),
        Ok(_) => {}
        Err(e) => println!("  {}", e.to_string().yellow()),
    }
    println!();
    false
}

fn pick<'a>(options: &'a [Choice], input: &str) -> Option<&'a Choice> {
    input
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| options.get(index))
}

/// Print `label` and read one trimmed line; `None` at end of input.
fn prompt(label: &str, reader: &mut impl BufRead) -> Result<Option<String>, String> {
    print!("{label}");
    io::stdout().flush().map_err(|e| e.to_string())?;

    let mut line = String::new();
    match reader.read_line(&mut line) {
        Ok(0) => Ok(None),
        Ok(_) => Ok(Some(line.trim().to_string())),
        Err(e) => Err(e.to_string()),
    }
}
