//! `rsvp` - read a text one chunk at a time and pick up where you left off.

use clap::{Args, Parser, Subcommand};
use rsvp::interface::{self, ReaderState};
use rsvp::utilities::load_text;
use rsvp::{word_index_to_percentage, FileStorage, ReaderSettings, SessionStore};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Displays text one chunk at a time in the terminal
#[derive(Parser)]
#[command(name = "rsvp", version, about, long_about = None)]
struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory holding the saved session (default: ~/.rsvp)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start reading a file, replacing any saved session
    Read(ReadArgs),
    /// Continue the saved session
    Resume(SpeedArgs),
    /// Show the saved position without loading the text
    Status,
    /// Delete the saved session
    Clear,
}

#[derive(Args)]
struct ReadArgs {
    /// The input file containing words
    file: PathBuf,

    /// Start at this percentage of the text
    #[arg(long, value_name = "PERCENT")]
    at: Option<f64>,

    #[command(flatten)]
    speed: SpeedArgs,
}

#[derive(Args)]
struct SpeedArgs {
    /// Speed in words per minute (overrides saved preference)
    #[arg(short, long)]
    speed: Option<u64>,

    /// Number of words per chunk (overrides saved preference)
    #[arg(short, long)]
    chunk_size: Option<usize>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let storage = match cli.data_dir {
        Some(dir) => FileStorage::new(dir),
        None => match FileStorage::default_path() {
            Ok(storage) => storage,
            Err(e) => {
                tracing::error!("{e}");
                return ExitCode::FAILURE;
            }
        },
    };
    let store = SessionStore::new(storage);

    match run(cli.command, &store) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so they stay out of the reader screen.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("rsvp={level}")))
        .with_target(verbosity >= 2)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Commands, store: &SessionStore<FileStorage>) -> std::io::Result<ExitCode> {
    match command {
        Commands::Read(args) => {
            let text = load_text(&args.file)?;
            let stored = store.load().map(|record| record.settings);
            let settings =
                ReaderSettings::resolve(args.speed.speed, args.speed.chunk_size, stored.as_ref());

            let mut state = ReaderState::new(text, args.file.display().to_string(), settings);
            if let Some(percent) = args.at {
                state.jump_to_percentage(percent);
            }
            interface::run(&mut state, store)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Resume(args) => {
            let Some(record) = store.load() else {
                println!("No saved session. Start one with `rsvp read <FILE>`.");
                return Ok(ExitCode::FAILURE);
            };
            let settings =
                ReaderSettings::resolve(args.speed, args.chunk_size, Some(&record.settings));
            let mut state = ReaderState::resume(record, settings);
            interface::run(&mut state, store)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Status => {
            match store.session_summary() {
                Some(summary) => {
                    let saved = summary
                        .saved_at_utc()
                        .map_or_else(|| "unknown".to_string(), |ts| ts.to_rfc3339());
                    println!(
                        "Word {} of {} ({}%)",
                        summary.current_word_index,
                        summary.total_words,
                        word_index_to_percentage(
                            summary.word_index().unwrap_or(0),
                            summary.word_count().unwrap_or(0)
                        )
                    );
                    println!("Saved at: {saved}");
                    if !summary.has_text {
                        println!("The saved session has no text.");
                    }
                }
                None if store.has_session() => {
                    println!("A saved session exists but cannot be read.");
                }
                None => println!("No saved session."),
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Clear => {
            if store.clear_session() {
                println!("Saved session cleared.");
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
