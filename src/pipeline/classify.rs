//! Failure classification: turn a failed invocation into an actionable
//! [`Outcome`] kind.
//!
//! ## Why substring matching?
//!
//! External converters do not share a structured error format, and matching
//! their output precisely is explicitly out of scope. The classification is
//! a prioritised rule list over the captured text — file-error patterns
//! first, then the header-requiring-format default, then tool error — and
//! substring matching is the documented, intentional tradeoff. The three
//! kinds let the operator triage at scale: file errors point at the corpus
//! layout, content errors are expected noise from legacy documents, tool
//! errors mean the installation itself needs attention.

use crate::pipeline::invoke::InvokeError;
use crate::report::Outcome;
use once_cell::sync::Lazy;
use regex::Regex;

/// Filesystem-failure substrings, matched case-insensitively against the
/// captured text. Checked before anything else: a path problem must never be
/// mistaken for a malformed document, even for formats where content errors
/// are the default.
const FILE_ERROR_PATTERNS: [&str; 6] = [
    "file not found",
    "cannot find",
    "no such file",
    "parent directory not found",
    "cannot open",
    "access denied",
];

/// Longest raw-text prefix used when no usable line exists.
const RAW_PREFIX_LIMIT: usize = 200;

static RE_DIAGNOSTIC_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:error|warning):").expect("static regex"));

/// Whether the captured text indicates a file/path failure.
pub fn has_file_error(text: &str) -> bool {
    let lowered = text.to_lowercase();
    FILE_ERROR_PATTERNS
        .iter()
        .any(|pattern| lowered.contains(pattern))
}

/// Extract a single representative line to keep user-facing diagnostics
/// terse: prefer a line containing `error:` or `warning:`, fall back to the
/// first non-blank line, then to a bounded prefix of the raw text.
pub fn representative_line(text: &str) -> String {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if let Some(line) = lines.iter().find(|line| RE_DIAGNOSTIC_LINE.is_match(line)) {
        return (*line).to_string();
    }
    if let Some(first) = lines.first() {
        return (*first).to_string();
    }
    text.chars().take(RAW_PREFIX_LIMIT).collect()
}

/// Classify a failed invocation.
///
/// `requires_doc_header` marks the format family most prone to structural
/// incompleteness (Quickbook's doc_info block): for that family, anything
/// that is not a file error is presumed to be a malformed document rather
/// than an infrastructure failure.
///
/// A spawn-level failure (executable vanished mid-run, permission problem)
/// is always a tool error — there is no captured output to interrogate.
pub fn classify(requires_doc_header: bool, err: &InvokeError) -> Outcome {
    match err {
        InvokeError::NotFound { .. } | InvokeError::Spawn { .. } => {
            Outcome::ToolError(err.to_string())
        }
        InvokeError::Failed { .. } => {
            let text = err.captured_text();
            if has_file_error(&text) {
                Outcome::FileError(representative_line(&text))
            } else if requires_doc_header {
                Outcome::ContentError(representative_line(&text))
            } else {
                Outcome::ToolError(representative_line(&text))
            }
        }
    }
}
