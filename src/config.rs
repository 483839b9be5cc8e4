//! Configuration for a pipeline run.
//!
//! All run behaviour is controlled through [`RunConfig`], built via its
//! [`RunConfigBuilder`]. Keeping every knob in one struct makes it trivial to
//! share a config between the CLI and library callers and to diff two runs to
//! understand why their tallies differ.
//!
//! # Design choice: builder over constructor
//! A ten-field constructor is unreadable and breaks on every new field. The
//! builder lets callers set only what they care about and rely on documented
//! defaults for the rest.

use crate::error::Corpus2AdocError;
use crate::format::Tool;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;

/// Configuration for a corpus conversion run.
///
/// Built via [`RunConfig::builder()`] or [`RunConfig::default()`].
///
/// # Example
/// ```rust
/// use corpus2adoc::RunConfig;
///
/// let config = RunConfig::builder()
///     .corpus_root("boost_1_89_0/libs")
///     .output_root("converted_docs/adoc")
///     .content_error_cap(10)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct RunConfig {
    /// Directory all inventory paths are relative to. Default: `.`.
    pub corpus_root: PathBuf,

    /// Root under which converted files are written, nested by format tag
    /// and then by the source's corpus-relative path. Default:
    /// `converted/adoc`.
    pub output_root: PathBuf,

    /// Detailed diagnostics are logged for the first N content errors per
    /// format, then a single suppression notice. Default: 10.
    ///
    /// Content errors are expected at scale — legacy corpora are full of
    /// incomplete documents — so the cap is generous but finite.
    pub content_error_cap: usize,

    /// Detailed diagnostics for the first N tool errors per format, then a
    /// suppression notice. Default: 3.
    ///
    /// Lower than the content cap: tool errors indicate infrastructure
    /// problems the operator should notice immediately, and three concrete
    /// examples are enough to diagnose a broken installation.
    pub tool_error_cap: usize,

    /// How many bytes past the first line the fragment detector inspects
    /// when looking for a top-level document marker. Default: 200.
    pub fragment_window: usize,

    /// Tools whose absence at run start aborts the whole run. Default:
    /// `[Pandoc]` — eight of the nine formats need pandoc, so running
    /// without it would convert almost nothing and silently look "done" on
    /// the next resume. Tools not listed here (quickbook by default) degrade
    /// their formats to a single skip diagnostic instead.
    pub required_tools: Vec<Tool>,

    /// Explicit pandoc executable path, bypassing the standard lookup.
    /// If the path does not point at a file, pandoc is treated as absent.
    pub pandoc_path: Option<PathBuf>,

    /// Explicit quickbook executable path, bypassing the standard lookup.
    pub quickbook_path: Option<PathBuf>,

    /// Optional per-job progress callback (used by the CLI progress bar).
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            corpus_root: PathBuf::from("."),
            output_root: PathBuf::from("converted/adoc"),
            content_error_cap: 10,
            tool_error_cap: 3,
            fragment_window: 200,
            required_tools: vec![Tool::Pandoc],
            pandoc_path: None,
            quickbook_path: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("corpus_root", &self.corpus_root)
            .field("output_root", &self.output_root)
            .field("content_error_cap", &self.content_error_cap)
            .field("tool_error_cap", &self.tool_error_cap)
            .field("fragment_window", &self.fragment_window)
            .field("required_tools", &self.required_tools)
            .field("pandoc_path", &self.pandoc_path)
            .field("quickbook_path", &self.quickbook_path)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn RunProgressCallback>"),
            )
            .finish()
    }
}

impl RunConfig {
    /// Create a new builder for `RunConfig`.
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`RunConfig`].
#[derive(Debug)]
pub struct RunConfigBuilder {
    config: RunConfig,
}

impl RunConfigBuilder {
    pub fn corpus_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.corpus_root = root.into();
        self
    }

    pub fn output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.output_root = root.into();
        self
    }

    pub fn content_error_cap(mut self, n: usize) -> Self {
        self.config.content_error_cap = n;
        self
    }

    pub fn tool_error_cap(mut self, n: usize) -> Self {
        self.config.tool_error_cap = n;
        self
    }

    pub fn fragment_window(mut self, bytes: usize) -> Self {
        // Below ~16 bytes no doc-info marker would ever fit in the window.
        self.config.fragment_window = bytes.max(16);
        self
    }

    /// Replace the required-tool set wholesale. An empty set means no tool
    /// absence is fatal; formats degrade to skip diagnostics individually.
    pub fn required_tools(mut self, tools: Vec<Tool>) -> Self {
        self.config.required_tools = tools;
        self
    }

    pub fn pandoc_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pandoc_path = Some(path.into());
        self
    }

    pub fn quickbook_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.quickbook_path = Some(path.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RunConfig, Corpus2AdocError> {
        let c = &self.config;
        if c.output_root == c.corpus_root {
            return Err(Corpus2AdocError::InvalidConfig(
                "output root must differ from the corpus root".into(),
            ));
        }
        Ok(self.config)
    }
}
