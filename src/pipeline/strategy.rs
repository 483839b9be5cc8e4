//! The converter strategy set: one conversion procedure per source format.
//!
//! Each strategy exposes a single operation — produce the destination from
//! the source — behind the [`ConvertStrategy`] trait. The format set is
//! closed, so [`strategy_for`] resolves dispatch through a fixed table of
//! static instances; there is no runtime registration.
//!
//! ## Atomic destinations
//!
//! Every strategy writes the destination via a staging file
//! (`dest.with_extension("adoc.tmp")`) renamed into place on success. The
//! runner's idempotence check treats an existing destination as "already
//! converted", so a conversion interrupted mid-write must never leave a
//! truncated file at the final path — the rename closes that gap.
//!
//! Existence checking is deliberately *not* done here: deciding whether a
//! destination should be skipped is the runner's policy, and keeping it out
//! of the strategies means a strategy invoked directly always converts.

use crate::format::{SourceFormat, Tool};
use crate::pipeline::invoke::{run_tool, InvokeError};
use crate::pipeline::tools::ToolAvailability;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// A failed strategy execution, before classification into an outcome.
#[derive(Debug, Error)]
pub enum StrategyError {
    /// The strategy's external tool was absent from the availability
    /// snapshot; no invocation was attempted.
    #[error("'{0}' not available")]
    MissingTool(Tool),

    /// An external invocation failed; carries the captured output for the
    /// classifier.
    #[error(transparent)]
    Invoke(#[from] InvokeError),

    /// A local filesystem operation failed.
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn io_at(path: &Path) -> impl FnOnce(io::Error) -> StrategyError + '_ {
    move |source| StrategyError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// The per-format conversion procedure.
pub trait ConvertStrategy: Send + Sync {
    /// Produce `dest` from `source`, creating missing parent directories.
    /// Must not be called for a `dest` the caller wants preserved.
    fn convert(
        &self,
        source: &Path,
        dest: &Path,
        tools: &ToolAvailability,
    ) -> Result<(), StrategyError>;
}

/// Resolve the fixed strategy for a format.
pub fn strategy_for(format: SourceFormat) -> &'static dyn ConvertStrategy {
    match format {
        SourceFormat::AsciiDoc => &COPY,
        SourceFormat::Markdown => &MARKDOWN,
        SourceFormat::Rst => &RST,
        SourceFormat::DocBook => &DOCBOOK,
        SourceFormat::Html | SourceFormat::Htm => &HTML,
        SourceFormat::Doxygen => &DOXYGEN,
        SourceFormat::Quickbook => &QUICKBOOK,
        SourceFormat::MathMl => &MATHML,
    }
}

static COPY: CopyStrategy = CopyStrategy;
static MARKDOWN: PandocStrategy = PandocStrategy::for_format(SourceFormat::Markdown);
static RST: PandocStrategy = PandocStrategy::for_format(SourceFormat::Rst);
static DOCBOOK: PandocStrategy = PandocStrategy::for_format(SourceFormat::DocBook);
static HTML: PandocStrategy = PandocStrategy::for_format(SourceFormat::Html);
static DOXYGEN: PandocStrategy = PandocStrategy::for_format(SourceFormat::Doxygen);
static QUICKBOOK: QuickbookStrategy = QuickbookStrategy;
static MATHML: MathMlStrategy = MathMlStrategy;

// ── Staging helpers ──────────────────────────────────────────────────────

fn staging_path(dest: &Path) -> PathBuf {
    dest.with_extension("adoc.tmp")
}

/// Produce `dest` by letting `write` fill a staging file that is renamed
/// into place on success. The staging file is removed on any failure.
fn write_via_staging<F>(dest: &Path, write: F) -> Result<(), StrategyError>
where
    F: FnOnce(&Path) -> Result<(), StrategyError>,
{
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(io_at(parent))?;
    }
    let staged = staging_path(dest);
    let result = write(&staged)
        .and_then(|()| fs::rename(&staged, dest).map_err(io_at(dest)));
    if result.is_err() {
        let _ = fs::remove_file(&staged);
    }
    result
}

// ── Direct-copy strategy (AsciiDoc sources) ──────────────────────────────

/// Sources already in the target format are copied byte-for-byte.
struct CopyStrategy;

impl ConvertStrategy for CopyStrategy {
    fn convert(
        &self,
        source: &Path,
        dest: &Path,
        _tools: &ToolAvailability,
    ) -> Result<(), StrategyError> {
        debug!("copying {} -> {}", source.display(), dest.display());
        write_via_staging(dest, |staged| {
            fs::copy(source, staged).map_err(io_at(source))?;
            Ok(())
        })
    }
}

// ── Tool-pass-through strategy (pandoc readers) ──────────────────────────

/// One pandoc invocation: read as `reader`, write as AsciiDoc.
struct PandocStrategy {
    reader: &'static str,
}

impl PandocStrategy {
    /// Build the strategy from the format's own reader attribute, so the
    /// reader name lives in exactly one place. Evaluated in the static
    /// initialisers above; a format without a reader fails the build.
    const fn for_format(format: SourceFormat) -> Self {
        match format.pandoc_reader() {
            Some(reader) => PandocStrategy { reader },
            None => panic!("format has no pandoc reader"),
        }
    }

    /// Run pandoc into the staging file. Split out so the two-stage
    /// Quickbook strategy can reuse the DocBook leg.
    fn pandoc_to(
        &self,
        source: &Path,
        dest: &Path,
        tools: &ToolAvailability,
    ) -> Result<(), StrategyError> {
        let pandoc = tools
            .path_for(Tool::Pandoc)
            .ok_or(StrategyError::MissingTool(Tool::Pandoc))?;

        debug!(
            "pandoc -f {} {} -> {}",
            self.reader,
            source.display(),
            dest.display()
        );
        write_via_staging(dest, |staged| {
            let args: Vec<OsString> = vec![
                OsString::from("-f"),
                OsString::from(self.reader),
                OsString::from("-t"),
                OsString::from("asciidoc"),
                OsString::from("-o"),
                staged.as_os_str().to_os_string(),
                source.as_os_str().to_os_string(),
            ];
            run_tool(pandoc, args, None)?;
            Ok(())
        })
    }
}

impl ConvertStrategy for PandocStrategy {
    fn convert(
        &self,
        source: &Path,
        dest: &Path,
        tools: &ToolAvailability,
    ) -> Result<(), StrategyError> {
        self.pandoc_to(source, dest, tools)
    }
}

// ── Two-stage strategy (Quickbook via a DocBook intermediate) ────────────

/// quickbook emits DocBook, which pandoc then turns into AsciiDoc. The
/// intermediate artifact lives in a named temp file colocated with the
/// source (quickbook resolves includes relative to its output), and is
/// deleted when the `NamedTempFile` guard drops — on success, failure, and
/// panic alike.
struct QuickbookStrategy;

impl ConvertStrategy for QuickbookStrategy {
    fn convert(
        &self,
        source: &Path,
        dest: &Path,
        tools: &ToolAvailability,
    ) -> Result<(), StrategyError> {
        let quickbook = tools
            .path_for(Tool::Quickbook)
            .ok_or(StrategyError::MissingTool(Tool::Quickbook))?;

        let source_abs = source.canonicalize().map_err(io_at(source))?;
        let source_dir = source_abs.parent().unwrap_or_else(|| Path::new("."));
        let stem = source_abs
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("doc");

        let intermediate = tempfile::Builder::new()
            .prefix(&format!("{stem}."))
            .suffix(".docbook.xml")
            .tempfile_in(source_dir)
            .map_err(io_at(source_dir))?;

        debug!(
            "quickbook {} -> {}",
            source_abs.display(),
            intermediate.path().display()
        );
        let mut output_arg = OsString::from("--output-file=");
        output_arg.push(intermediate.path());
        run_tool(
            quickbook,
            [output_arg, source_abs.as_os_str().to_os_string()],
            None,
        )?;

        DOCBOOK.pandoc_to(intermediate.path(), dest, tools)
        // `intermediate` drops here, deleting the artifact on every path.
    }
}

// ── Local-wrap strategy (MathML) ─────────────────────────────────────────

/// MathML has no AsciiDoc equivalent; the raw markup is preserved verbatim
/// inside a fenced source block tagged with its original syntax. No
/// external tool is involved.
struct MathMlStrategy;

impl ConvertStrategy for MathMlStrategy {
    fn convert(
        &self,
        source: &Path,
        dest: &Path,
        _tools: &ToolAvailability,
    ) -> Result<(), StrategyError> {
        let bytes = fs::read(source).map_err(io_at(source))?;
        let content = String::from_utf8_lossy(&bytes);
        let wrapped = format!("[source,xml]\n----\n{content}\n----\n");
        write_via_staging(dest, |staged| {
            fs::write(staged, wrapped.as_bytes()).map_err(io_at(staged))
        })
    }
}
