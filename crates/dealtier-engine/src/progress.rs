//! Progress reporting.
//!
//! The pipeline is handed a reporter and fires an update after each completed
//! unit of work (one dimension-scoring pass, one classifier batch). Reporting
//! is fire-and-forget: the trait is infallible and implementations must not
//! panic, so a broken observer can never abort a run. The reporter is an
//! injected per-run object, not process-global state.

use serde::Serialize;
use tracing::info;

/// Fractional completion of one ranking run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressUpdate {
    pub completed: usize,
    pub total: usize,
    /// Percent complete, rounded to two decimals.
    pub percent: f64,
}

impl ProgressUpdate {
    pub fn new(completed: usize, total: usize) -> Self {
        let percent = if total == 0 {
            100.0
        } else {
            (completed as f64 / total as f64 * 10_000.0).round() / 100.0
        };
        Self {
            completed,
            total,
            percent,
        }
    }
}

/// Observer for pipeline progress.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, update: ProgressUpdate);
}

/// Discards all updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn report(&self, _update: ProgressUpdate) {}
}

/// Logs each update through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ProgressReporter for LogReporter {
    fn report(&self, update: ProgressUpdate) {
        info!(
            completed = update.completed,
            total = update.total,
            percent = update.percent,
            "ranking progress"
        );
    }
}
