//! CLI output formatting

use crate::core::{FailureDescriptor, Group, Posting};
use crate::execution::{ExecutionEvent, ExecutionStatus};
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

/// Create a spinner for a running pipeline
pub fn create_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Spinner message for an execution event, if it warrants one
pub fn format_execution_event(event: &ExecutionEvent) -> Option<String> {
    match event {
        ExecutionEvent::PipelineStarted {
            execution_id,
            pipeline_name,
        } => Some(format!(
            "Starting {} ({})",
            style(pipeline_name).bold(),
            style(&execution_id.to_string()[..8]).dim()
        )),
        ExecutionEvent::StepStarted { step } => Some(format!("{}{}", SPINNER, style(step).cyan())),
        ExecutionEvent::StepFailed { step, failure } => Some(format!(
            "{}{}: {}",
            CROSS,
            style(step).cyan(),
            style(failure.message()).red()
        )),
        ExecutionEvent::StepFaulted { step, error } => Some(format!(
            "{}{}: {}",
            WARN,
            style(step).cyan(),
            style(error).red()
        )),
        ExecutionEvent::PipelineCompleted { status, .. } => Some(format_status(*status)),
        ExecutionEvent::StepCompleted { .. } => None,
    }
}

/// Format a run status for display
pub fn format_status(status: ExecutionStatus) -> String {
    match status {
        ExecutionStatus::Completed => style("COMPLETED").green().to_string(),
        ExecutionStatus::Failed => style("FAILED").red().to_string(),
        ExecutionStatus::Faulted => style("FAULTED").red().bold().to_string(),
    }
}

/// Format a pipeline failure the way an HTTP layer would report it
pub fn format_failure(failure: &FailureDescriptor) -> String {
    format!(
        "{}{} {} - {}",
        CROSS,
        style(failure.status_code()).red().bold(),
        style(failure.classification()).dim(),
        failure.message()
    )
}

/// Format a stored group for display
pub fn format_group(group: &Group, posting_count: usize) -> String {
    format!(
        "{} {} ({} postings) - {}",
        style(&group.fb_id).cyan(),
        style(&group.name).bold(),
        style(posting_count).cyan(),
        style(&group.fb_url).dim()
    )
}

/// Header for a posting listing, noting when `--limit` cut it short
pub fn format_posting_header(group: &Group, shown: usize, total: usize) -> String {
    let count = if shown < total {
        format!("{} of {} postings", style(shown).cyan(), style(total).cyan())
    } else {
        format!("{} postings", style(total).cyan())
    };
    format!("{} - {}", style(&group.name).bold(), count)
}

/// Format a stored posting for display
pub fn format_posting(posting: &Posting) -> String {
    let when = posting
        .created_time
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    let text = posting
        .message
        .as_deref()
        .or(posting.name.as_deref())
        .or(posting.attachment_title.as_deref())
        .unwrap_or("");

    let mut line = format!(
        "{} {} {}",
        style(when).dim(),
        style(&posting.fb_id).cyan(),
        truncate(text, 80)
    );
    if let Some(url) = &posting.attachment_url {
        line.push_str(&format!(" {}", style(url).underlined()));
    }
    line
}

fn truncate(text: &str, max_chars: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() <= max_chars {
        single_line
    } else {
        let cut: String = single_line.chars().take(max_chars).collect();
        format!("{}…", cut)
    }
}
