//! Progress-callback trait for per-file conversion events.
//!
//! Inject an [`Arc<dyn RunProgressCallback>`] via
//! [`crate::config::RunConfigBuilder::progress_callback`] to receive events
//! as the runner works through the inventory.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a terminal progress bar, a log aggregator, or a database
//! record without the library knowing anything about how the host application
//! communicates. The trait is `Send + Sync` so one callback can be shared
//! between a run and whatever thread renders its progress.

use crate::format::SourceFormat;
use crate::report::{Outcome, RunTally};
use std::path::Path;
use std::sync::Arc;

/// Called by the pipeline runner as it processes the inventory.
///
/// The runner is single-threaded, so events for one run arrive strictly in
/// order: `on_run_start`, then per format `on_format_start` followed by one
/// `on_job_outcome` per job and `on_format_complete`, then
/// `on_run_complete`. All methods have default no-op implementations so
/// callers only override what they care about.
pub trait RunProgressCallback: Send + Sync {
    /// Called once before any job is attempted.
    ///
    /// # Arguments
    /// * `total_files` — number of inventory entries across all formats
    fn on_run_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called before the first job of a format.
    fn on_format_start(&self, format: SourceFormat, total_files: usize) {
        let _ = (format, total_files);
    }

    /// Called when a format's entire job list is skipped because an external
    /// tool it needs was unavailable at run start.
    fn on_format_unavailable(&self, format: SourceFormat, total_files: usize) {
        let _ = (format, total_files);
    }

    /// Called once per job with its terminal outcome.
    fn on_job_outcome(&self, format: SourceFormat, source: &Path, outcome: &Outcome) {
        let _ = (format, source, outcome);
    }

    /// Called after all of a format's jobs have been attempted.
    fn on_format_complete(&self, format: SourceFormat, tally: &RunTally) {
        let _ = (format, tally);
    }

    /// Called once after every format has been processed.
    fn on_run_complete(&self, totals: &RunTally) {
        let _ = totals;
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl RunProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::RunConfig`].
pub type ProgressCallback = Arc<dyn RunProgressCallback>;
