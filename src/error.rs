//! Error types for the corpus2adoc library.
//!
//! Two distinct failure levels reflect two distinct policies:
//!
//! * [`Corpus2AdocError`] — **Fatal**: the run cannot proceed at all (the
//!   inventory is missing or unparsable, a required tool is absent, the
//!   output root cannot be created). Returned as `Err` from
//!   [`crate::runner::run`].
//!
//! * [`crate::report::Outcome`] — **Non-fatal**: a single file's conversion
//!   failed or was skipped. Recorded in the per-format tally; the run always
//!   continues to the next file.
//!
//! The separation is the backbone of the resumable batch model: over a
//! multi-thousand-file corpus, malformed legacy documents are expected and
//! must never abort the run, while a missing pandoc means nothing useful can
//! happen and should fail loudly before any work starts.

use crate::format::Tool;
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the corpus2adoc library.
///
/// Per-file failures use [`crate::report::Outcome`] and are tallied rather
/// than propagated here.
#[derive(Debug, Error)]
pub enum Corpus2AdocError {
    /// The inventory file produced by the corpus collector was not found.
    #[error(
        "inventory file not found: '{path}'\nRun the corpus collector first to generate it."
    )]
    InventoryNotFound { path: PathBuf },

    /// The inventory file exists but could not be read.
    #[error("failed to read inventory '{path}': {source}")]
    InventoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The inventory file is not the expected JSON mapping.
    #[error(
        "failed to parse inventory '{path}': {source}\nExpected a JSON object mapping format tags to lists of relative paths."
    )]
    InventoryParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A tool listed in `RunConfig::required_tools` could not be located.
    ///
    /// Absence of an *optional* tool degrades the affected formats to a
    /// single skip diagnostic instead; see the runner.
    #[error(
        "required tool '{tool}' not found\nInstall it and ensure it is on your PATH, or pass an explicit path via the configuration."
    )]
    RequiredToolMissing { tool: Tool },

    /// The output root directory could not be created.
    #[error("failed to create output root '{path}': {source}")]
    OutputRootFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_tool_missing_names_the_tool() {
        let e = Corpus2AdocError::RequiredToolMissing { tool: Tool::Pandoc };
        assert!(e.to_string().contains("pandoc"), "got: {e}");
    }

    #[test]
    fn inventory_not_found_names_the_path() {
        let e = Corpus2AdocError::InventoryNotFound {
            path: PathBuf::from("doc_files_to_convert.json"),
        };
        assert!(e.to_string().contains("doc_files_to_convert.json"));
    }
}
