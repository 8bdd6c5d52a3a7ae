//! Ranking pipeline for Dealtier: scores records against the tiering
//! configuration, consults the category classifier in bounded-concurrency
//! batches, and materialises the presentation and diagnostic output sets.

pub mod output;
pub mod pipeline;
pub mod progress;

pub use output::{DiagnosticRow, PresentationRow};
pub use pipeline::{RankOptions, RankOutcome, run_pipeline};
pub use progress::{LogReporter, NullReporter, ProgressReporter, ProgressUpdate};
