//! interview - guided real estate agent interview checklist
//!
//! Reads a conversation transcript between a buyer and the interview
//! assistant, derives the categorized question checklist from it, and
//! appends the buyer's replies.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Logs: $XDG_STATE_HOME/interview/interview.log (~/.local/state/interview/interview.log)
//! - Config: $XDG_CONFIG_HOME/interview/config.toml (~/.config/interview/config.toml)

mod render;
mod watch;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use interview_core::format::{checklist_json, checklist_text};
use interview_core::transcript::{self, LoadedTranscript};
use interview_core::{Config, InterviewProjection, InterviewSession};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "interview")]
#[command(about = "Build a real estate agent interview checklist from a conversation")]
#[command(version)]
struct Args {
    /// Print transcript loading warnings
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the checklist, progress and quick replies for a transcript
    Show {
        /// Transcript file (JSONL or JSON array)
        file: PathBuf,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Export the checklist
    Export {
        /// Transcript file (JSONL or JSON array)
        file: PathBuf,

        /// Write to a file instead of stdout (default name: from config)
        #[arg(short, long, num_args = 0..=1)]
        output: Option<Option<PathBuf>>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Start the interview, writing the welcome message to an empty transcript
    Start {
        /// Transcript file (created if missing)
        file: PathBuf,
    },

    /// Append the buyer's reply to the transcript
    Answer {
        /// Transcript file
        file: PathBuf,

        /// Free-text reply
        #[arg(required_unless_present = "suggestion", conflicts_with = "suggestion")]
        text: Option<String>,

        /// Reply with a numbered quick reply instead (1-based)
        #[arg(short, long)]
        suggestion: Option<usize>,
    },

    /// Re-derive the checklist every time the transcript changes
    Watch {
        /// Transcript file
        file: PathBuf,

        /// Poll interval in milliseconds (default: from config)
        #[arg(long)]
        poll: Option<u64>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// JSON document printed by `show --format json`
#[derive(Serialize)]
struct ShowReport<'a> {
    file: String,
    turns: usize,
    warnings: &'a [String],
    #[serde(flatten)]
    projection: &'a InterviewProjection,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Ensure XDG environment variables are set before using core library
    Config::ensure_xdg_env();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging
    let _log_guard =
        interview_core::logging::init(&config.logging).context("failed to initialize logging")?;

    tracing::info!("interview starting");

    if args.verbose {
        eprintln!(
            "Log file: {}",
            interview_core::logging::log_file_path().display()
        );
    }

    match args.command {
        Command::Show { file, format } => {
            let loaded = load(&file, args.verbose)?;
            let session = InterviewSession::resume(loaded.turns.clone(), config.interview);
            let projection = session.projection();

            match format {
                OutputFormat::Text => print!(
                    "{}",
                    render::projection(&projection, &file.display().to_string(), loaded.turns.len())
                ),
                OutputFormat::Json => {
                    let report = ShowReport {
                        file: file.display().to_string(),
                        turns: loaded.turns.len(),
                        warnings: &loaded.warnings,
                        projection: &projection,
                    };
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&report).context("failed to encode report")?
                    );
                }
            }
        }

        Command::Export {
            file,
            output,
            format,
        } => {
            let loaded = load(&file, args.verbose)?;
            let session = InterviewSession::resume(loaded.turns, config.interview.clone());
            let projection = session.projection();

            let content = match format {
                OutputFormat::Text => checklist_text(&projection),
                OutputFormat::Json => {
                    checklist_json(&projection).context("failed to encode checklist")?
                }
            };

            match output {
                None => println!("{}", content),
                Some(path) => {
                    let path =
                        path.unwrap_or_else(|| PathBuf::from(&config.interview.export_file_name));
                    std::fs::write(&path, format!("{}\n", content))
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!(
                        "Exported {} questions to {}",
                        projection.items().count(),
                        path.display()
                    );
                    tracing::info!(path = %path.display(), "Checklist exported");
                }
            }
        }

        Command::Start { file } => {
            let loaded = load_or_empty(&file, args.verbose)?;
            let mut session = InterviewSession::resume(loaded.turns, config.interview);

            match session.start().cloned() {
                Some(welcome) => {
                    transcript::append(&file, std::slice::from_ref(&welcome))
                        .with_context(|| format!("failed to write {}", file.display()))?;
                    println!("{}", welcome.text());
                }
                None => {
                    println!(
                        "Interview already in progress ({} turns).",
                        session.turns().len()
                    );
                }
            }

            let suggestions = session.suggestions();
            if !suggestions.is_empty() {
                print!("\n{}", render::suggestions(&suggestions));
            }
        }

        Command::Answer {
            file,
            text,
            suggestion,
        } => {
            let loaded = load_or_empty(&file, args.verbose)?;
            let mut session = InterviewSession::resume(loaded.turns, config.interview);
            if !session.is_active() {
                bail!(
                    "interview not started; run `interview start {}` first",
                    file.display()
                );
            }

            let turn = match (suggestion, text) {
                (Some(0), _) => bail!("suggestions are numbered from 1"),
                (Some(n), _) => session.select_suggestion(n - 1)?.clone(),
                (None, Some(text)) if !text.trim().is_empty() => session.answer(text).clone(),
                (None, _) => bail!("reply text is empty"),
            };

            transcript::append(&file, std::slice::from_ref(&turn))
                .with_context(|| format!("failed to write {}", file.display()))?;
            tracing::info!(turn_id = %turn.id, "Reply recorded");

            println!("Recorded: {}", turn.text());
            println!("Progress: {}", render::progress(&session.projection()));
        }

        Command::Watch { file, poll } => {
            let poll_ms = poll.unwrap_or(config.watch.poll_ms);
            watch::run(&file, poll_ms, config.interview)?;
        }
    }

    Ok(())
}

fn load(path: &Path, verbose: bool) -> Result<LoadedTranscript> {
    let loaded = transcript::load(path)
        .with_context(|| format!("failed to load transcript {}", path.display()))?;
    report_warnings(&loaded, verbose);
    Ok(loaded)
}

fn load_or_empty(path: &Path, verbose: bool) -> Result<LoadedTranscript> {
    let loaded = transcript::load_or_empty(path)
        .with_context(|| format!("failed to load transcript {}", path.display()))?;
    report_warnings(&loaded, verbose);
    Ok(loaded)
}

fn report_warnings(loaded: &LoadedTranscript, verbose: bool) {
    if loaded.warnings.is_empty() {
        return;
    }
    if verbose {
        for warning in &loaded.warnings {
            eprintln!("Warning: {}", warning);
        }
    } else {
        eprintln!(
            "Warning: skipped {} unreadable record(s) (use -v for details)",
            loaded.warnings.len()
        );
    }
}
