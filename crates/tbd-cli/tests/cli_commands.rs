#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn tbd() -> Command {
    Command::cargo_bin("tbd").unwrap()
}

fn save_file(dir: &Path) -> PathBuf {
    dir.join("troubadour_state.json")
}

/// Play the demo with scripted input.
fn play(dir: &Path, input: &str) -> assert_cmd::assert::Assert {
    tbd()
        .args(["play", "--save-dir"])
        .arg(dir)
        .write_stdin(input)
        .assert()
}

/// A save directory holding a session two passages long.
fn played() -> TempDir {
    let dir = TempDir::new().unwrap();
    play(dir.path(), "1\nq\n").success();
    dir
}

// ---------------------------------------------------------------------------
// play
// ---------------------------------------------------------------------------

#[test]
fn play_starts_story_and_saves() {
    let dir = TempDir::new().unwrap();
    play(dir.path(), "1\nq\n")
        .success()
        .stdout(predicate::str::contains("Hello worlds: 0"))
        .stdout(predicate::str::contains("This is a message: Youpi"));

    let saved = fs::read_to_string(save_file(dir.path())).unwrap();
    assert!(saved.contains("\"hello\": 0"));
}

#[test]
fn play_resumes_saved_session() {
    let dir = played();
    play(dir.path(), "q\n")
        .success()
        .stdout(predicate::str::contains("This is a message: Youpi"));
}

#[test]
fn play_ends_at_end_of_input() {
    let dir = TempDir::new().unwrap();
    play(dir.path(), "").success();
    assert!(save_file(dir.path()).exists());
}

#[test]
fn play_text_button_reads_typed_value() {
    let dir = TempDir::new().unwrap();
    play(dir.path(), "1\n2\nsee you at dawn\nq\n")
        .success()
        .stdout(predicate::str::contains("reads your reply aloud: see you at dawn"));
}

#[test]
fn play_rejects_unknown_choice() {
    let dir = TempDir::new().unwrap();
    play(dir.path(), "9\nq\n")
        .success()
        .stdout(predicate::str::contains("no choice '9'"));
}

#[test]
fn play_reset_starts_over() {
    let dir = played();
    play(dir.path(), "r\n1\nq\n")
        .success()
        .stdout(predicate::str::contains("Game reset"))
        .stdout(predicate::str::contains("Reloading"));

    tbd()
        .args(["history", "--save-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1 passages"));
}

#[test]
fn play_reset_cancel_keeps_session() {
    let dir = played();
    play(dir.path(), "r\n2\nq\n").success();

    tbd()
        .args(["history", "--save-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 passages"));
}

#[test]
fn play_trims_history() {
    let dir = TempDir::new().unwrap();
    tbd()
        .args(["play", "--max-history", "2", "--save-dir"])
        .arg(dir.path())
        .write_stdin("1\n1\n1\nq\n")
        .assert()
        .success();

    tbd()
        .args(["history", "--save-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 passages"));
}

#[test]
fn play_recovers_from_unreadable_save() {
    let dir = TempDir::new().unwrap();
    fs::write(save_file(dir.path()), "{broken").unwrap();

    play(dir.path(), "r\n1\nq\n")
        .success()
        .stdout(predicate::str::contains("could not be loaded"))
        .stdout(predicate::str::contains("Hello worlds: 0"));

    let saved = fs::read_to_string(save_file(dir.path())).unwrap();
    assert!(saved.contains("\"state\""));
}

#[test]
fn play_verbose_logs_to_stderr() {
    let dir = TempDir::new().unwrap();
    tbd()
        .args(["--verbose", "play", "--save-dir"])
        .arg(dir.path())
        .write_stdin("q\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("starting new session"));
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

#[test]
fn show_replays_saved_log() {
    let dir = played();
    tbd()
        .args(["show", "--save-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello worlds: 0"))
        .stdout(predicate::str::contains("This is a message: Youpi"))
        .stdout(predicate::str::contains("{\"hello\":0}"))
        .stdout(predicate::str::contains("2 passages"));
}

#[test]
fn show_without_save() {
    let dir = TempDir::new().unwrap();
    tbd()
        .args(["show", "--save-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved game"));
}

// ---------------------------------------------------------------------------
// history
// ---------------------------------------------------------------------------

#[test]
fn history_lists_passages() {
    let dir = played();
    tbd()
        .args(["history", "--save-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Opening"))
        .stdout(predicate::str::contains("Click"))
        .stdout(predicate::str::contains("Display"))
        .stdout(predicate::str::contains("2 passages"));
}

// ---------------------------------------------------------------------------
// export / import
// ---------------------------------------------------------------------------

#[test]
fn export_to_stdout() {
    let dir = played();
    tbd()
        .args(["export", "--save-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"state\""))
        .stdout(predicate::str::contains("\"continuation_slot\""));
}

#[test]
fn export_without_save_fails() {
    let dir = TempDir::new().unwrap();
    tbd()
        .args(["export", "--save-dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: no saved game"));
}

#[test]
fn export_then_import_elsewhere() {
    let source = played();
    let file = source.path().join("troubadour.json");
    tbd()
        .args(["export", "--save-dir"])
        .arg(source.path())
        .arg("--output")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported"));

    let target = TempDir::new().unwrap();
    tbd()
        .args(["import"])
        .arg(&file)
        .arg("--save-dir")
        .arg(target.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 passages"));

    tbd()
        .args(["show", "--save-dir"])
        .arg(target.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("This is a message: Youpi"));
}

#[test]
fn import_rejects_invalid_file() {
    let dir = played();
    let bad = dir.path().join("bad.json");
    fs::write(&bad, "{\"state\": {\"hello\": \"many\"}}").unwrap();

    tbd()
        .args(["import"])
        .arg(&bad)
        .arg("--save-dir")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: cannot import"));

    let saved = fs::read_to_string(save_file(dir.path())).unwrap();
    assert!(saved.contains("\"hello\": 0"));
}

// ---------------------------------------------------------------------------
// reset
// ---------------------------------------------------------------------------

#[test]
fn reset_with_yes_erases_save() {
    let dir = played();
    tbd()
        .args(["reset", "--yes", "--save-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("saved game erased"));
    assert!(!save_file(dir.path()).exists());
}

#[test]
fn reset_can_be_declined() {
    let dir = played();
    tbd()
        .args(["reset", "--save-dir"])
        .arg(dir.path())
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled"));
    assert!(save_file(dir.path()).exists());
}

#[test]
fn reset_without_save() {
    let dir = TempDir::new().unwrap();
    tbd()
        .args(["reset", "--yes", "--save-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved game"));
}
