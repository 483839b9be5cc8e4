//! CLI binary for corpus2adoc.
//!
//! A thin shim over the library crate that maps CLI flags to `RunConfig`,
//! renders progress, and prints the final report.

use anyhow::{Context, Result};
use clap::Parser;
use corpus2adoc::{
    run, Inventory, Outcome, ProgressCallback, RunConfig, RunProgressCallback, RunTally,
    SourceFormat, Tool,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Detailed `✗ file: message` lines shown per format before falling back to
/// the summary counters. The library's own capped warnings are filtered out
/// while the bar is active, so the bar surfaces the first failures itself.
const ERROR_LINES_PER_FORMAT: usize = 3;

/// Terminal progress callback: renders a live file-count bar plus per-format
/// summary lines using [indicatif]. The runner is sequential, so events
/// arrive strictly in order.
struct CliProgressCallback {
    bar: ProgressBar,
    errors_shown: AtomicUsize,
}

impl CliProgressCallback {
    /// Create a callback whose bar length is set by `on_run_start`.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_run_start

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            errors_shown: AtomicUsize::new(0),
        })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>5}/{len} files  \
             ⏱ {elapsed_precise}  ETA {eta_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Converting");
        self.bar.reset_eta();
    }
}

impl RunProgressCallback for CliProgressCallback {
    fn on_run_start(&self, total_files: usize) {
        self.activate_bar(total_files);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Starting conversion of {total_files} files…"))
        ));
    }

    fn on_format_start(&self, format: SourceFormat, total_files: usize) {
        self.errors_shown.store(0, Ordering::SeqCst);
        self.bar.set_message(format!("{format} ({total_files})"));
    }

    fn on_format_unavailable(&self, format: SourceFormat, total_files: usize) {
        self.bar.println(format!(
            "  {} {:<4}  {}",
            yellow("⚠"),
            format.to_string(),
            dim(&format!("{total_files} files skipped, tool not available")),
        ));
    }

    fn on_job_outcome(&self, _format: SourceFormat, source: &Path, outcome: &Outcome) {
        if let Some(msg) = outcome.message() {
            let shown = self.errors_shown.fetch_add(1, Ordering::SeqCst);
            if shown < ERROR_LINES_PER_FORMAT {
                let name = source
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| source.display().to_string());
                self.bar
                    .println(format!("    {} {}: {}", red("✗"), name, dim(msg)));
            }
        }
        self.bar.inc(1);
    }

    fn on_format_complete(&self, format: SourceFormat, tally: &RunTally) {
        if tally.total() == 0 {
            return;
        }
        let mark = if tally.errors() == 0 {
            green("✓")
        } else {
            yellow("⚠")
        };
        self.bar.println(format!(
            "  {mark} {:<4}  {}",
            format.to_string(),
            dim(&tally.summary_line())
        ));
    }

    fn on_run_complete(&self, totals: &RunTally) {
        self.bar.finish_and_clear();
        let failed = totals.errors();
        if failed == 0 {
            eprintln!(
                "{} {} files converted, {} skipped",
                green("✔"),
                bold(&totals.converted.to_string()),
                totals.skipped,
            );
        } else {
            eprintln!(
                "{} {} converted, {} skipped  ({} errors)",
                if totals.converted == 0 {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&totals.converted.to_string()),
                totals.skipped,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert a corpus using the collector's inventory
  corpus2adoc doc_files_to_convert.json --corpus-root boost_1_89_0/libs -o converted_docs/adoc

  # Resume an interrupted run (already-converted files are skipped)
  corpus2adoc doc_files_to_convert.json --corpus-root boost_1_89_0/libs -o converted_docs/adoc

  # Machine-readable per-format report
  corpus2adoc inventory.json --json > report.json

  # Pin a specific pandoc build
  corpus2adoc inventory.json --pandoc /opt/pandoc-3.2/bin/pandoc

  # Proceed even without pandoc (tool-less formats only: adoc copy, mml wrap)
  corpus2adoc inventory.json --lenient-tools

EXTERNAL TOOLS:
  pandoc       required by default — converts md, rst, xml, html, htm, dox
               (and the DocBook leg of qbk). https://pandoc.org/installing.html
  quickbook    optional — converts .qbk sources via a DocBook intermediate.
               When absent, qbk files are skipped with a single diagnostic.

ERROR KINDS (per-file, never abort the run):
  content      malformed or incomplete source document — expected at scale
               in legacy corpora; detailed for the first N files per format
  tool         the external program itself misbehaved — worth attention
  file         path problems (missing source, unreadable directory);
               counted in the tool bucket at the summary level

ENVIRONMENT VARIABLES:
  CORPUS2ADOC_ROOT       Corpus root (same as --corpus-root)
  CORPUS2ADOC_OUTPUT     Output root (same as --output-root)
  CORPUS2ADOC_PANDOC     Explicit pandoc path (same as --pandoc)
  CORPUS2ADOC_QUICKBOOK  Explicit quickbook path (same as --quickbook)
"#;

/// Convert a documentation corpus to AsciiDoc using external tools.
#[derive(Parser, Debug)]
#[command(
    name = "corpus2adoc",
    version,
    about = "Convert a documentation corpus to AsciiDoc using external tools",
    long_about = "Convert a heterogeneous documentation corpus (Quickbook, reStructuredText, \
Markdown, DocBook, HTML, MathML, Doxygen, AsciiDoc) into a unified AsciiDoc tree, driving \
pandoc and quickbook. Runs are idempotent: restart an interrupted batch and only the \
remaining files are converted.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Inventory JSON produced by the corpus collector (format tag → paths).
    inventory: PathBuf,

    /// Directory all inventory paths are relative to.
    #[arg(short = 'c', long, env = "CORPUS2ADOC_ROOT", default_value = ".")]
    corpus_root: PathBuf,

    /// Root directory for converted output, nested by format tag.
    #[arg(short, long, env = "CORPUS2ADOC_OUTPUT", default_value = "converted/adoc")]
    output_root: PathBuf,

    /// Explicit pandoc executable path (bypasses PATH lookup).
    #[arg(long, env = "CORPUS2ADOC_PANDOC")]
    pandoc: Option<PathBuf>,

    /// Explicit quickbook executable path (bypasses PATH lookup).
    #[arg(long, env = "CORPUS2ADOC_QUICKBOOK")]
    quickbook: Option<PathBuf>,

    /// Detailed diagnostics for the first N content errors per format.
    #[arg(long, default_value_t = 10)]
    content_error_cap: usize,

    /// Detailed diagnostics for the first N tool errors per format.
    #[arg(long, default_value_t = 3)]
    tool_error_cap: usize,

    /// Bytes of opening content inspected by the fragment detector.
    #[arg(long, default_value_t = 200)]
    fragment_window: usize,

    /// Treat quickbook as required: abort the run when it is missing
    /// instead of skipping qbk files with a diagnostic.
    #[arg(long)]
    require_quickbook: bool,

    /// Treat no tool as required: missing tools degrade their formats to a
    /// skip diagnostic instead of aborting the run.
    #[arg(long, conflicts_with = "require_quickbook")]
    lenient_tools: bool,

    /// Output the structured per-format report as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Disable the progress bar.
    #[arg(long)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO/WARN-level library logs when the progress bar is
    // active; the bar and its per-format lines carry the same information.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn RunProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Load inventory and run ───────────────────────────────────────────
    let inventory = Inventory::from_json_file(&cli.inventory)
        .with_context(|| format!("failed to load inventory '{}'", cli.inventory.display()))?;

    let report = run(&inventory, &config).context("conversion run failed")?;

    // ── Output ───────────────────────────────────────────────────────────
    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("failed to serialise report")?;
        println!("{json}");
    } else if !cli.quiet && !show_progress {
        // Without the progress callback, print the summary the callback
        // would otherwise have rendered.
        for format_report in &report.formats {
            if format_report.tool_missing || format_report.tally.total() > 0 {
                eprintln!(
                    "  {}: {}",
                    format_report.format,
                    if format_report.tool_missing {
                        "skipped (tool not available)".to_string()
                    } else {
                        format_report.tally.summary_line()
                    }
                );
            }
        }
        eprintln!("{}", report.totals().summary_line());
    }

    Ok(())
}

/// Map CLI args to `RunConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<RunConfig> {
    let required_tools = if cli.lenient_tools {
        vec![]
    } else if cli.require_quickbook {
        vec![Tool::Pandoc, Tool::Quickbook]
    } else {
        vec![Tool::Pandoc]
    };

    let mut builder = RunConfig::builder()
        .corpus_root(cli.corpus_root.clone())
        .output_root(cli.output_root.clone())
        .content_error_cap(cli.content_error_cap)
        .tool_error_cap(cli.tool_error_cap)
        .fragment_window(cli.fragment_window)
        .required_tools(required_tools);

    if let Some(ref path) = cli.pandoc {
        builder = builder.pandoc_path(path.clone());
    }
    if let Some(ref path) = cli.quickbook {
        builder = builder.quickbook_path(path.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("invalid configuration")
}
