//! # corpus2adoc
//!
//! Convert a heterogeneous documentation corpus to AsciiDoc using external
//! conversion tools.
//!
//! ## Why this crate?
//!
//! Large documentation trees accrete markup dialects over decades — Quickbook
//! next to reStructuredText next to DocBook next to Markdown, each maintained
//! by a different library. Unifying them by hand is hopeless; unifying them
//! with a one-shot script fails halfway through file 4 000 and loses all
//! progress. This crate is the orchestration layer around external
//! converters (pandoc, quickbook): it dispatches each file to the right
//! procedure, classifies failures into kinds an operator can act on, skips
//! sub-documents that were never standalone, and makes the whole batch
//! idempotent so an interrupted run can simply be restarted.
//!
//! ## Pipeline Overview
//!
//! ```text
//! inventory (format → paths, from the corpus collector)
//!  │
//!  ├─ 1. Tools     resolve pandoc/quickbook once into a snapshot
//!  ├─ 2. Fragment  exclude non-standalone sub-documents (qbk only)
//!  ├─ 3. Resume    skip destinations that already exist
//!  ├─ 4. Strategy  copy / pandoc pass-through / two-stage / local wrap
//!  ├─ 5. Classify  failure → FileError | ContentError | ToolError
//!  └─ 6. Tally     per-format counters + one-line summaries
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use corpus2adoc::{run, Inventory, RunConfig};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let inventory = Inventory::from_json_file(Path::new("doc_files_to_convert.json"))?;
//!     let config = RunConfig::builder()
//!         .corpus_root("boost_1_89_0/libs")
//!         .output_root("converted_docs/adoc")
//!         .build()?;
//!     let report = run(&inventory, &config)?;
//!     println!("{}", report.totals().summary_line());
//!     Ok(())
//! }
//! ```
//!
//! ## Failure model
//!
//! | Condition | Effect |
//! |-----------|--------|
//! | Required tool absent at start | run aborts before any job |
//! | Optional tool absent | that format skipped with one diagnostic |
//! | Source is a fragment | `SkippedFragment`, no tool invoked |
//! | Destination exists | `SkippedExisting`, bytes untouched |
//! | Malformed document | `ContentError`, run continues |
//! | Tool crash / bad path | `ToolError` / `FileError`, run continues |
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `corpus2adoc` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! corpus2adoc = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod format;
pub mod inventory;
pub mod pipeline;
pub mod progress;
pub mod report;
pub mod runner;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{RunConfig, RunConfigBuilder};
pub use error::Corpus2AdocError;
pub use format::{SourceFormat, Tool, TARGET_EXTENSION};
pub use inventory::Inventory;
pub use pipeline::tools::ToolAvailability;
pub use progress::{NoopProgressCallback, ProgressCallback, RunProgressCallback};
pub use report::{FormatReport, Outcome, RunReport, RunTally};
pub use runner::{convert_single, run};
