//! Terminal host for Troubadour stories.

mod commands;
mod demo;
mod view;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Default directory holding the saved session.
const DEFAULT_SAVE_DIR: &str = ".troubadour";

#[derive(Parser)]
#[command(
    name = "tbd",
    about = "Troubadour: play passage-based interactive stories in the terminal",
    version,
    propagate_version = true
)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the demo story, resuming the saved session if there is one
    Play {
        /// Directory holding the saved session
        #[arg(short, long, default_value = DEFAULT_SAVE_DIR)]
        save_dir: PathBuf,

        /// Number of passages kept in the scrollback
        #[arg(short, long, default_value = "15")]
        max_history: usize,
    },

    /// Print the saved scrollback without playing
    Show {
        /// Directory holding the saved session
        #[arg(short, long, default_value = DEFAULT_SAVE_DIR)]
        save_dir: PathBuf,
    },

    /// List the passages in the saved scrollback
    History {
        /// Directory holding the saved session
        #[arg(short, long, default_value = DEFAULT_SAVE_DIR)]
        save_dir: PathBuf,
    },

    /// Write the saved session to a file (default: stdout)
    Export {
        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory holding the saved session
        #[arg(short, long, default_value = DEFAULT_SAVE_DIR)]
        save_dir: PathBuf,
    },

    /// Replace the saved session with an exported file
    Import {
        /// Exported session file
        file: PathBuf,

        /// Directory holding the saved session
        #[arg(short, long, default_value = DEFAULT_SAVE_DIR)]
        save_dir: PathBuf,
    },

    /// Erase the saved session
    Reset {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,

        /// Directory holding the saved session
        #[arg(short, long, default_value = DEFAULT_SAVE_DIR)]
        save_dir: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Play {
            save_dir,
            max_history,
        } => commands::play::run(&save_dir, max_history),
        Commands::Show { save_dir } => commands::show::run(&save_dir),
        Commands::History { save_dir } => commands::history::run(&save_dir),
        Commands::Export { output, save_dir } => {
            commands::export::run(&save_dir, output.as_deref())
        }
        Commands::Import { file, save_dir } => commands::import::run(&save_dir, &file),
        Commands::Reset { yes, save_dir } => commands::reset::run(&save_dir, yes),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
