//! The pipeline runner: orchestrates a full conversion run over the
//! inventory.
//!
//! ## Execution model
//!
//! Single-threaded and sequential by design: one job is fully resolved
//! (fragment check → existence check → strategy → outcome) before the next
//! begins. The corpus is processed offline, external tools block until they
//! exit, and the only shared mutable state is the per-format tally owned
//! here — so there is nothing to lock and nothing to race.
//!
//! ## Resumability
//!
//! Idempotence substitutes for checkpoint bookkeeping: a destination file
//! already on disk is the complete record of a previous success, and the run
//! skips it. An interrupted batch can simply be restarted and will perform
//! only the remaining work. A single file's failure never aborts the run;
//! only a missing required tool or a missing inventory does.

use crate::config::RunConfig;
use crate::error::Corpus2AdocError;
use crate::format::SourceFormat;
use crate::inventory::Inventory;
use crate::pipeline::classify::classify;
use crate::pipeline::fragment::is_fragment;
use crate::pipeline::strategy::{strategy_for, StrategyError};
use crate::pipeline::tools::ToolAvailability;
use crate::report::{FormatReport, Outcome, RunReport, RunTally};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Convert every inventory entry, returning the per-format report.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// Returns `Err(Corpus2AdocError)` only for fatal conditions:
/// - a tool in `config.required_tools` cannot be located
/// - the output root cannot be created
///
/// Everything else — missing sources, malformed documents, crashing tools —
/// is recorded as a per-file [`Outcome`] and tallied.
pub fn run(inventory: &Inventory, config: &RunConfig) -> Result<RunReport, Corpus2AdocError> {
    let tools = ToolAvailability::probe(config);
    for tool in &config.required_tools {
        if !tools.is_available(*tool) {
            return Err(Corpus2AdocError::RequiredToolMissing { tool: *tool });
        }
    }

    fs::create_dir_all(&config.output_root).map_err(|source| {
        Corpus2AdocError::OutputRootFailed {
            path: config.output_root.clone(),
            source,
        }
    })?;

    info!(
        "starting conversion of {} files into {}",
        inventory.total_files(),
        config.output_root.display()
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_run_start(inventory.total_files());
    }

    let mut report = RunReport::default();
    for format in SourceFormat::ALL {
        report.formats.push(process_format(format, inventory, config, &tools));
    }

    let totals = report.totals();
    info!("run complete: {}", totals.summary_line());
    if let Some(ref cb) = config.progress_callback {
        cb.on_run_complete(&totals);
    }
    Ok(report)
}

/// Process one format's entire job list in isolation.
fn process_format(
    format: SourceFormat,
    inventory: &Inventory,
    config: &RunConfig,
    tools: &ToolAvailability,
) -> FormatReport {
    let paths = inventory.paths_for(format);

    // A format whose tool is entirely unavailable degrades to one
    // diagnostic and zero attempts — not a per-file error avalanche.
    if let Some(missing) = format
        .required_tools()
        .iter()
        .find(|tool| !tools.is_available(**tool))
    {
        if !paths.is_empty() {
            warn!(
                "skipping all {} {} files ('{}' not available)",
                paths.len(),
                format,
                missing
            );
            if let Some(ref cb) = config.progress_callback {
                cb.on_format_unavailable(format, paths.len());
            }
        }
        return FormatReport {
            format,
            tally: RunTally::default(),
            tool_missing: true,
        };
    }

    if paths.is_empty() {
        return FormatReport {
            format,
            tally: RunTally::default(),
            tool_missing: false,
        };
    }

    info!("processing {} {} files", paths.len(), format);
    if let Some(ref cb) = config.progress_callback {
        cb.on_format_start(format, paths.len());
    }

    let mut tally = RunTally::default();
    let mut content_seen = 0usize;
    let mut tool_seen = 0usize;

    for relative in paths {
        let source = config.corpus_root.join(relative);
        let dest = format.destination_for(&config.output_root, relative);
        let outcome = convert_single(format, &source, &dest, tools, config);

        log_outcome(format, &source, &outcome, config, &mut content_seen, &mut tool_seen);
        if outcome.is_converted() && (tally.converted + 1) % 100 == 0 {
            info!("converted {} {} files...", tally.converted + 1, format);
        }

        if let Some(ref cb) = config.progress_callback {
            cb.on_job_outcome(format, &source, &outcome);
        }
        tally.record(&outcome);
    }

    info!("completed {}: {}", format, tally.summary_line());
    if let Some(ref cb) = config.progress_callback {
        cb.on_format_complete(format, &tally);
    }
    FormatReport {
        format,
        tally,
        tool_missing: false,
    }
}

/// Resolve one job to its terminal outcome.
///
/// Order matters: the fragment check runs before anything touches the
/// destination (fragments must not be miscounted as content failures), and
/// the existence check runs before the strategy (an existing destination is
/// never redone, let alone overwritten).
pub fn convert_single(
    format: SourceFormat,
    source: &Path,
    dest: &Path,
    tools: &ToolAvailability,
    config: &RunConfig,
) -> Outcome {
    if format.is_fragment_aware() && is_fragment(source, config.fragment_window) {
        return Outcome::SkippedFragment;
    }
    if dest.exists() {
        return Outcome::SkippedExisting;
    }
    match strategy_for(format).convert(source, dest, tools) {
        Ok(()) => Outcome::Converted,
        Err(StrategyError::MissingTool(tool)) => {
            // The availability gate normally prevents this; reaching it means
            // the snapshot was built by hand without the tool.
            Outcome::ToolError(format!("'{tool}' not available"))
        }
        Err(StrategyError::Invoke(err)) => classify(format.requires_doc_header(), &err),
        Err(StrategyError::Io { path, source }) => {
            Outcome::FileError(format!("{}: {source}", path.display()))
        }
    }
}

/// Capped per-file diagnostics: detailed lines for the first N failures of
/// each kind per format, then a single suppression notice. Content errors
/// get the higher cap (expected at scale); tool and file errors share the
/// lower one (infrastructure problems worth attention sooner).
fn log_outcome(
    format: SourceFormat,
    source: &Path,
    outcome: &Outcome,
    config: &RunConfig,
    content_seen: &mut usize,
    tool_seen: &mut usize,
) {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.display().to_string());

    match outcome {
        Outcome::ContentError(msg) => {
            *content_seen += 1;
            if *content_seen <= config.content_error_cap {
                warn!("content error ({name}): {msg}");
            } else if *content_seen == config.content_error_cap + 1 {
                warn!("suppressing further content errors for {format}");
            }
        }
        Outcome::ToolError(msg) | Outcome::FileError(msg) => {
            *tool_seen += 1;
            if *tool_seen <= config.tool_error_cap {
                warn!("tool error ({name}): {msg}");
            } else if *tool_seen == config.tool_error_cap + 1 {
                warn!("suppressing further tool errors for {format}");
            }
        }
        Outcome::SkippedFragment => debug!("skipped fragment: {name}"),
        Outcome::SkippedExisting => debug!("skipped (already converted): {name}"),
        Outcome::Converted => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Tool;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn test_config(dir: &TempDir) -> RunConfig {
        RunConfig::builder()
            .corpus_root(dir.path().join("corpus"))
            .output_root(dir.path().join("out"))
            .required_tools(vec![])
            .build()
            .unwrap()
    }

    #[test]
    fn required_tool_missing_aborts_before_any_work() {
        let dir = TempDir::new().unwrap();
        let config = RunConfig::builder()
            .corpus_root(dir.path().join("corpus"))
            .output_root(dir.path().join("out"))
            .pandoc_path("/definitely/not/a/real/pandoc")
            .required_tools(vec![Tool::Pandoc])
            .build()
            .unwrap();

        let mut inventory = Inventory::default();
        inventory.insert(SourceFormat::Markdown, "doc.md");

        let err = run(&inventory, &config).unwrap_err();
        assert!(matches!(err, Corpus2AdocError::RequiredToolMissing { tool: Tool::Pandoc }));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn empty_inventory_is_a_valid_no_op() {
        let dir = TempDir::new().unwrap();
        let report = run(&Inventory::default(), &test_config(&dir)).unwrap();
        assert_eq!(report.totals(), RunTally::default());
        assert_eq!(report.formats.len(), SourceFormat::ALL.len());
    }

    #[test]
    fn convert_single_skips_existing_destination_without_strategy() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let source = dir.path().join("corpus/doc.md");
        let dest = dir.path().join("out/md/doc.adoc");
        std::fs::create_dir_all(source.parent().unwrap()).unwrap();
        std::fs::create_dir_all(dest.parent().unwrap()).unwrap();
        std::fs::write(&source, "# hi\n").unwrap();
        std::fs::write(&dest, "previous output").unwrap();

        // Markdown needs pandoc; with an empty snapshot the strategy would
        // fail, so SkippedExisting proves the strategy never ran.
        let outcome = convert_single(
            SourceFormat::Markdown,
            &source,
            &dest,
            &ToolAvailability::default(),
            &config,
        );
        assert_eq!(outcome, Outcome::SkippedExisting);
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "previous output");
    }

    #[test]
    fn convert_single_classifies_missing_source_as_file_error() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let outcome = convert_single(
            SourceFormat::AsciiDoc,
            &dir.path().join("corpus/absent.adoc"),
            &dir.path().join("out/adoc/absent.adoc"),
            &ToolAvailability::default(),
            &config,
        );
        assert!(matches!(outcome, Outcome::FileError(_)), "got: {outcome:?}");
    }

    #[test]
    fn hand_built_snapshot_without_tool_yields_tool_error() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let source = dir.path().join("corpus/doc.md");
        std::fs::create_dir_all(source.parent().unwrap()).unwrap();
        std::fs::write(&source, "# hi\n").unwrap();

        let outcome = convert_single(
            SourceFormat::Markdown,
            &source,
            &dir.path().join("out/md/doc.adoc"),
            &ToolAvailability::default(),
            &config,
        );
        match outcome {
            Outcome::ToolError(msg) => assert!(msg.contains("pandoc")),
            other => panic!("expected ToolError, got {other:?}"),
        }
    }

    /// Collects formatted log output for assertions.
    #[derive(Clone, Default)]
    struct CaptureWriter(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CaptureWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CaptureWriter {
        type Writer = CaptureWriter;
        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn diagnostics_are_capped_then_suppressed_per_format() {
        let capture = CaptureWriter::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(capture.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();

        let config = RunConfig::builder()
            .corpus_root("corpus")
            .output_root("out")
            .content_error_cap(2)
            .tool_error_cap(1)
            .required_tools(vec![])
            .build()
            .unwrap();

        let mut content_seen = 0usize;
        let mut tool_seen = 0usize;
        tracing::subscriber::with_default(subscriber, || {
            for i in 0..4 {
                let name = format!("doc{i}.qbk");
                log_outcome(
                    SourceFormat::Quickbook,
                    Path::new(&name),
                    &Outcome::ContentError("no doc_info block".into()),
                    &config,
                    &mut content_seen,
                    &mut tool_seen,
                );
            }
            for i in 0..3 {
                let name = format!("doc{i}.qbk");
                log_outcome(
                    SourceFormat::Quickbook,
                    Path::new(&name),
                    &Outcome::ToolError("quickbook crashed".into()),
                    &config,
                    &mut content_seen,
                    &mut tool_seen,
                );
            }
        });

        let text = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
        assert_eq!(text.matches("content error (").count(), 2, "{text}");
        assert_eq!(
            text.matches("suppressing further content errors").count(),
            1,
            "{text}"
        );
        assert_eq!(text.matches("tool error (").count(), 1, "{text}");
        assert_eq!(
            text.matches("suppressing further tool errors").count(),
            1,
            "{text}"
        );
    }

    #[test]
    fn destination_paths_stay_inside_the_format_subtree() {
        let dest = SourceFormat::Rst
            .destination_for(&PathBuf::from("out"), &PathBuf::from("algo/doc/intro.rst"));
        assert_eq!(dest, PathBuf::from("out/rst/algo/doc/intro.adoc"));
    }
}
