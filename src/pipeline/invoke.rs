//! External tool invocation: run a command, capture its output, and raise a
//! uniform failure signal.
//!
//! The invoker deliberately does not interpret exit codes or captured text —
//! deciding whether a failure is a file problem, a malformed document, or a
//! broken tool is the classifier's job. Keeping this layer dumb means every
//! strategy fails the same way and the classification rules live in exactly
//! one place. No retries here either: a job's outcome is terminal within a
//! run, and re-running the batch is the retry mechanism.

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::debug;

/// A failed external invocation.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// The executable could not be found when spawning.
    #[error("command '{program}' not found\nInstall it and ensure it is on your PATH.")]
    NotFound { program: PathBuf },

    /// The process could not be started for a reason other than absence
    /// (permissions, not an executable, resource limits).
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The process ran and exited non-zero. Carries both captured streams
    /// for the classifier.
    #[error("command '{program}' failed with exit code {code:?}")]
    Failed {
        program: PathBuf,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
}

impl InvokeError {
    /// The combined error text the classifier inspects: stderr first (tools
    /// put diagnostics there), then stdout (quickbook reports some errors on
    /// stdout). Never empty.
    pub fn captured_text(&self) -> String {
        match self {
            InvokeError::Failed { stdout, stderr, .. } => {
                let combined = format!("{stderr}{stdout}");
                if combined.trim().is_empty() {
                    "unknown error".to_string()
                } else {
                    combined
                }
            }
            other => other.to_string(),
        }
    }
}

/// Run `program` with `args`, capturing stdout and stderr.
///
/// Blocks until the process exits — the pipeline is sequential by design and
/// the corpus is processed offline, so a hung tool hangs the run rather than
/// racing a timeout.
///
/// # Errors
/// * [`InvokeError::NotFound`] when the OS reports no such executable
/// * [`InvokeError::Spawn`] for any other spawn failure
/// * [`InvokeError::Failed`] on non-zero exit
pub fn run_tool<I, S>(program: &Path, args: I, cwd: Option<&Path>) -> Result<(), InvokeError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    debug!("invoking {:?}", cmd);

    let output = cmd.output().map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            InvokeError::NotFound {
                program: program.to_path_buf(),
            }
        } else {
            InvokeError::Spawn {
                program: program.to_path_buf(),
                source: e,
            }
        }
    })?;

    if output.status.success() {
        return Ok(());
    }

    Err(InvokeError::Failed {
        program: program.to_path_buf(),
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
