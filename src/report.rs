//! Per-file outcomes and per-format tallies.
//!
//! Every job ends in exactly one [`Outcome`], terminal for the run: the
//! pipeline never retries a file, and re-running the whole batch is the only
//! retry mechanism (previously converted files are skipped via the
//! destination-existence check, so a re-run performs only the remaining
//! work). Outcomes are folded into a [`RunTally`] per format and collected
//! into the [`RunReport`] the runner returns — counters are plain values
//! threaded through the runner, never process-global state.

use crate::format::SourceFormat;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The terminal classification of a single file's conversion attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Outcome {
    /// The destination was produced by this run.
    Converted,
    /// The destination already existed; the file was not touched.
    /// This is the resumption mechanism for interrupted batch runs.
    SkippedExisting,
    /// The source is a sub-document meant for inclusion in a parent and is
    /// not independently convertible. No tool was invoked.
    SkippedFragment,
    /// The source document is malformed or incomplete. Expected at scale in
    /// legacy corpora; carries a condensed representative message.
    ContentError(String),
    /// The external tool itself misbehaved (crash, unsupported option,
    /// disappeared mid-run). Worth operator attention.
    ToolError(String),
    /// A file or path problem (missing source, unreadable directory).
    /// Distinguished from content errors during classification, counted in
    /// the tool-error bucket at the summary level.
    FileError(String),
}

impl Outcome {
    /// Whether this outcome represents a produced destination file.
    pub fn is_converted(&self) -> bool {
        matches!(self, Outcome::Converted)
    }

    /// Whether this outcome is a classified failure.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Outcome::ContentError(_) | Outcome::ToolError(_) | Outcome::FileError(_)
        )
    }

    /// The condensed diagnostic message, for error outcomes.
    pub fn message(&self) -> Option<&str> {
        match self {
            Outcome::ContentError(m) | Outcome::ToolError(m) | Outcome::FileError(m) => Some(m),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Converted => write!(f, "converted"),
            Outcome::SkippedExisting => write!(f, "skipped (already converted)"),
            Outcome::SkippedFragment => write!(f, "skipped (fragment)"),
            Outcome::ContentError(m) => write!(f, "content error: {m}"),
            Outcome::ToolError(m) => write!(f, "tool error: {m}"),
            Outcome::FileError(m) => write!(f, "file error: {m}"),
        }
    }
}

/// Per-format counters, accumulated across the format's full job list.
///
/// `skipped` covers both existing destinations and fragments; `FileError`
/// counts toward `tool_errors` so the summary keeps the operator-facing
/// three-way split (converted / content / tool) of the narrative output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTally {
    pub converted: usize,
    pub skipped: usize,
    pub content_errors: usize,
    pub tool_errors: usize,
}

impl RunTally {
    /// Fold one outcome into the counters.
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Converted => self.converted += 1,
            Outcome::SkippedExisting | Outcome::SkippedFragment => self.skipped += 1,
            Outcome::ContentError(_) => self.content_errors += 1,
            Outcome::ToolError(_) | Outcome::FileError(_) => self.tool_errors += 1,
        }
    }

    /// Add another tally's counters into this one.
    pub fn merge(&mut self, other: &RunTally) {
        self.converted += other.converted;
        self.skipped += other.skipped;
        self.content_errors += other.content_errors;
        self.tool_errors += other.tool_errors;
    }

    /// Total jobs this tally accounts for.
    pub fn total(&self) -> usize {
        self.converted + self.skipped + self.content_errors + self.tool_errors
    }

    /// Total classified failures.
    pub fn errors(&self) -> usize {
        self.content_errors + self.tool_errors
    }

    /// The terse one-line narrative: "12 converted, 3 content errors, …".
    /// Zero-valued error counters are omitted, matching the summary the
    /// operator reads after each format.
    pub fn summary_line(&self) -> String {
        let mut parts = vec![format!("{} converted", self.converted)];
        if self.skipped > 0 {
            parts.push(format!("{} skipped", self.skipped));
        }
        if self.content_errors > 0 {
            parts.push(format!("{} content errors", self.content_errors));
        }
        if self.tool_errors > 0 {
            parts.push(format!("{} tool errors", self.tool_errors));
        }
        parts.join(", ")
    }
}

/// One format's results: its tally, plus whether the whole format was skipped
/// because a tool it needs was unavailable at run start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatReport {
    pub format: SourceFormat,
    pub tally: RunTally,
    /// True when the format's job list was skipped in full (single
    /// diagnostic, zero attempts) because an external tool was missing.
    pub tool_missing: bool,
}

/// The aggregated result of a full pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub formats: Vec<FormatReport>,
}

impl RunReport {
    /// Look up one format's report, if that format appeared in the run.
    pub fn for_format(&self, format: SourceFormat) -> Option<&FormatReport> {
        self.formats.iter().find(|r| r.format == format)
    }

    /// Sum all per-format tallies.
    pub fn totals(&self) -> RunTally {
        let mut total = RunTally::default();
        for report in &self.formats {
            total.merge(&report.tally);
        }
        total
    }
}
