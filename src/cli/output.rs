//! CLI output formatting

use crate::core::RunStatus;
use crate::execution::RunnerEvent;
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "!");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Create a progress bar over the steps of a run
pub fn create_progress_bar(total: usize) -> ProgressBar {
    let progress = ProgressBar::new(total as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

/// Format a run status for display
pub fn format_status(status: RunStatus) -> String {
    match status {
        RunStatus::Pending => style("PENDING").dim().to_string(),
        RunStatus::Running => style("RUNNING").yellow().to_string(),
        RunStatus::Completed => style("COMPLETED").green().to_string(),
        RunStatus::Failed => style("FAILED").red().to_string(),
        RunStatus::Cancelled => style("CANCELLED").yellow().to_string(),
    }
}

/// Format a runner event as a console line
pub fn format_runner_event(event: &RunnerEvent) -> String {
    match event {
        RunnerEvent::StepAdded { index, kind } => {
            format!("{} Added step {} ({})", INFO, index + 1, kind)
        }
        RunnerEvent::SequenceStarted { total_steps, .. } => {
            format!("{} Sequence started ({} steps)", ROCKET, total_steps)
        }
        RunnerEvent::StepStarted { index, kind } => {
            format!("{} Step {} started ({})", SPINNER, index + 1, kind)
        }
        RunnerEvent::StepSkipped { index, reason } => {
            format!("{} Step {} skipped: {}", WARN, index + 1, style(reason).dim())
        }
        RunnerEvent::StepFailed { index, error } => {
            format!("{} Step {} failed: {}", CROSS, index + 1, style(error).red())
        }
        RunnerEvent::StepCompleted { index } => {
            format!("{} Step {} completed", CHECK, index + 1)
        }
        RunnerEvent::SequenceCompleted { .. } => {
            format!("{} Sequence completed", CHECK)
        }
        RunnerEvent::SequenceCancelled { .. } => {
            format!("{} Sequence cancelled", WARN)
        }
        RunnerEvent::SequenceError { message, .. } => {
            format!("{} Sequence error: {}", CROSS, style(message).red())
        }
        RunnerEvent::SchedulerStarted => format!("{} Scheduler started", ROCKET),
        RunnerEvent::SchedulerStopped => format!("{} Scheduler stopped", INFO),
    }
}
