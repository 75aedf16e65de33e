//! Watch mode: re-derive whenever the transcript file changes.

use crate::render;
use anyhow::{Context, Result};
use interview_core::config::InterviewConfig;
use interview_core::transcript;
use interview_core::{Category, InterviewSession};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Poll `path` until Ctrl+C, printing each new projection.
pub fn run(path: &Path, poll_ms: u64, config: InterviewConfig) -> Result<()> {
    // Set up signal handler for graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        eprintln!("\nShutting down...");
        r.store(false, Ordering::SeqCst);
    })
    .context("failed to set Ctrl+C handler")?;

    let poll_duration = Duration::from_millis(poll_ms);

    println!(
        "Watching {} (poll every {}ms). Press Ctrl+C to stop.",
        path.display(),
        poll_ms
    );
    println!();

    let mut session = InterviewSession::new(config);
    let mut updates = session.subscribe();
    let mut last_hash: Option<String> = None;
    let mut completed: Vec<Category> = Vec::new();
    let mut iteration = 0u64;

    while running.load(Ordering::SeqCst) {
        iteration += 1;

        // A transcript mid-write may fail to parse as a JSON array; retry next poll
        let loaded = match transcript::load_or_empty(path) {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::warn!(error = %e, iteration, "Transcript unreadable, will retry");
                thread::sleep(poll_duration);
                continue;
            }
        };

        if last_hash.as_deref() != Some(loaded.content_hash.as_str()) {
            last_hash = Some(loaded.content_hash);
            session.replace_transcript(loaded.turns);
        }

        if updates.has_changed().unwrap_or(false) {
            let projection = updates.borrow_and_update().clone();
            let timestamp = chrono::Local::now().format("%H:%M:%S");
            println!(
                "[{}] {} turns, {}",
                timestamp,
                session.turns().len(),
                render::status_line(&projection)
            );

            for category in projection.completed_categories() {
                if !completed.contains(category) {
                    println!("  Completed: {}", category.display_name());
                }
            }
            completed = projection.completed_categories().to_vec();

            if !projection.suggestions.is_empty() {
                print!("{}", render::suggestions(&projection.suggestions));
            }
            if projection.is_complete() {
                println!("  All categories covered. Checklist is ready to export.");
            }

            tracing::info!(
                iteration,
                turns = session.turns().len(),
                completed = projection.completed_categories().len(),
                "watch iteration"
            );
        }

        // Sleep until next poll
        thread::sleep(poll_duration);
    }

    println!("Watch mode stopped.");
    tracing::info!("interview watch mode stopped");

    Ok(())
}
