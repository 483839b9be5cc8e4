//! External tool location: the once-per-run [`ToolAvailability`] snapshot.
//!
//! ## Why a snapshot instead of checking per job?
//!
//! A corpus run touches thousands of files; probing the PATH for pandoc on
//! every job would be pure overhead, and a tool that appears halfway through
//! a run would make two otherwise-identical runs diverge. The snapshot is
//! computed once at run start and threaded explicitly through the runner to
//! the strategies — there is no process-global tool state. A tool that
//! *disappears* mid-run simply surfaces as a tool error on its next
//! invocation, not as a special state.

use crate::config::RunConfig;
use crate::format::Tool;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Resolved absolute paths (or absence) for every external tool, probed once
/// at run start.
#[derive(Debug, Clone, Default)]
pub struct ToolAvailability {
    pandoc: Option<PathBuf>,
    quickbook: Option<PathBuf>,
}

impl ToolAvailability {
    /// Probe every tool, honouring explicit path overrides from the config.
    ///
    /// An override that does not point at a file is treated as absence (with
    /// a warning) rather than falling back to the PATH: an operator who
    /// pinned a path wants to know it is wrong, not to silently run some
    /// other installation.
    pub fn probe(config: &RunConfig) -> Self {
        Self {
            pandoc: resolve(Tool::Pandoc, config.pandoc_path.as_deref()),
            quickbook: resolve(Tool::Quickbook, config.quickbook_path.as_deref()),
        }
    }

    /// Construct a snapshot directly. Intended for library callers that
    /// manage tool discovery themselves.
    pub fn with_paths(pandoc: Option<PathBuf>, quickbook: Option<PathBuf>) -> Self {
        Self { pandoc, quickbook }
    }

    /// The resolved executable path for `tool`, if it was found.
    pub fn path_for(&self, tool: Tool) -> Option<&Path> {
        match tool {
            Tool::Pandoc => self.pandoc.as_deref(),
            Tool::Quickbook => self.quickbook.as_deref(),
        }
    }

    pub fn is_available(&self, tool: Tool) -> bool {
        self.path_for(tool).is_some()
    }
}

fn resolve(tool: Tool, override_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = override_path {
        if path.is_file() {
            debug!("using configured {} at {}", tool, path.display());
            return Some(path.to_path_buf());
        }
        warn!(
            "configured {} path '{}' does not exist; treating {} as unavailable",
            tool,
            path.display(),
            tool
        );
        return None;
    }
    match find_tool(tool.command_name()) {
        Some(path) => {
            debug!("found {} at {}", tool, path.display());
            Some(path)
        }
        None => None,
    }
}

/// Locate a command: standard PATH lookup first, then the well-known
/// fallback installation directories, then the bare name as a last resort if
/// it happens to resolve.
pub fn find_tool(name: &str) -> Option<PathBuf> {
    if let Ok(path) = which::which(name) {
        return Some(path);
    }
    fallback_install_path(name)
}

/// Well-known per-user and system install directories that are frequently
/// missing from PATH on Windows (the installer does not always update the
/// environment of an already-open shell).
#[cfg(windows)]
fn fallback_install_path(name: &str) -> Option<PathBuf> {
    if name != "pandoc" {
        return None;
    }
    let exe = "pandoc.exe";
    ["LOCALAPPDATA", "ProgramFiles", "ProgramFiles(x86)"]
        .iter()
        .filter_map(|var| std::env::var_os(var))
        .map(|base| PathBuf::from(base).join("Pandoc").join(exe))
        .find(|candidate| candidate.is_file())
}

#[cfg(not(windows))]
fn fallback_install_path(_name: &str) -> Option<PathBuf> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunConfig;

    #[test]
    fn missing_override_counts_as_absent() {
        let config = RunConfig::builder()
            .pandoc_path("/definitely/not/a/real/pandoc")
            .build()
            .unwrap();
        let tools = ToolAvailability::probe(&config);
        assert!(!tools.is_available(Tool::Pandoc));
    }

    #[test]
    fn override_pointing_at_a_file_is_used_verbatim() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = RunConfig::builder()
            .quickbook_path(file.path())
            .build()
            .unwrap();
        let tools = ToolAvailability::probe(&config);
        assert_eq!(tools.path_for(Tool::Quickbook), Some(file.path()));
    }

    #[test]
    fn with_paths_round_trips() {
        let tools =
            ToolAvailability::with_paths(Some(PathBuf::from("/usr/bin/pandoc")), None);
        assert!(tools.is_available(Tool::Pandoc));
        assert!(!tools.is_available(Tool::Quickbook));
    }
}
