//! The closed set of source formats and their per-format attributes.
//!
//! Every markup dialect found in the corpus maps to exactly one variant here
//! and, through [`crate::pipeline::strategy::strategy_for`], to exactly one
//! conversion strategy. The set is fixed and small, so dispatch is a match
//! statement rather than a runtime registry: adding a dialect is a compile-time
//! change, and an inventory entry with an unknown tag can never smuggle an
//! unhandled format into the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// The file extension used for every converted destination file.
pub const TARGET_EXTENSION: &str = "adoc";

/// An external converter program the pipeline may need to invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Pandoc handles every reader-based conversion (md, rst, xml, html, dox).
    Pandoc,
    /// Boost.Quickbook normalises `.qbk` sources into DocBook.
    Quickbook,
}

impl Tool {
    /// The command name used for executable lookup.
    pub fn command_name(self) -> &'static str {
        match self {
            Tool::Pandoc => "pandoc",
            Tool::Quickbook => "quickbook",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command_name())
    }
}

/// A source markup dialect found in the corpus.
///
/// The serialised form of each variant is its [`tag`](Self::tag), which is
/// also the source file extension and the inventory key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SourceFormat {
    /// Boost.Quickbook (`.qbk`) — converted via a DocBook intermediate.
    #[serde(rename = "qbk")]
    Quickbook,
    /// reStructuredText (`.rst`).
    #[serde(rename = "rst")]
    Rst,
    /// GitHub-flavoured Markdown (`.md`).
    #[serde(rename = "md")]
    Markdown,
    /// AsciiDoc (`.adoc`) — already the target format, copied verbatim.
    #[serde(rename = "adoc")]
    AsciiDoc,
    /// DocBook XML (`.xml`).
    #[serde(rename = "xml")]
    DocBook,
    /// HTML (`.html`).
    #[serde(rename = "html")]
    Html,
    /// HTML with the legacy `.htm` extension.
    #[serde(rename = "htm")]
    Htm,
    /// MathML (`.mml`) — no AsciiDoc equivalent; wrapped in a source block.
    #[serde(rename = "mml")]
    MathMl,
    /// Doxygen markup (`.dox`), close enough to Markdown for pandoc.
    #[serde(rename = "dox")]
    Doxygen,
}

impl SourceFormat {
    /// All formats, in the fixed order the pipeline processes them.
    pub const ALL: [SourceFormat; 9] = [
        SourceFormat::Quickbook,
        SourceFormat::Rst,
        SourceFormat::Markdown,
        SourceFormat::AsciiDoc,
        SourceFormat::DocBook,
        SourceFormat::Html,
        SourceFormat::Htm,
        SourceFormat::MathMl,
        SourceFormat::Doxygen,
    ];

    /// Stable lowercase label: the source extension, the inventory key, and
    /// the per-format subdirectory name under the output root.
    pub fn tag(self) -> &'static str {
        match self {
            SourceFormat::Quickbook => "qbk",
            SourceFormat::Rst => "rst",
            SourceFormat::Markdown => "md",
            SourceFormat::AsciiDoc => "adoc",
            SourceFormat::DocBook => "xml",
            SourceFormat::Html => "html",
            SourceFormat::Htm => "htm",
            SourceFormat::MathMl => "mml",
            SourceFormat::Doxygen => "dox",
        }
    }

    /// Reverse of [`tag`](Self::tag). Unknown tags (stale inventory entries,
    /// collector experiments) return `None` and are ignored upstream.
    pub fn from_tag(tag: &str) -> Option<Self> {
        SourceFormat::ALL.iter().copied().find(|f| f.tag() == tag)
    }

    /// The pandoc "read as" parameter, for formats pandoc converts directly.
    ///
    /// `const` so the strategy table can be built from this attribute at
    /// compile time; it is the only place a reader name is spelled out.
    pub const fn pandoc_reader(self) -> Option<&'static str> {
        match self {
            SourceFormat::Markdown => Some("gfm"),
            SourceFormat::Rst => Some("rst"),
            SourceFormat::DocBook => Some("docbook"),
            SourceFormat::Html | SourceFormat::Htm => Some("html"),
            SourceFormat::Doxygen => Some("markdown"),
            SourceFormat::Quickbook | SourceFormat::AsciiDoc | SourceFormat::MathMl => None,
        }
    }

    /// Every external tool this format's strategy invokes.
    ///
    /// Quickbook needs both tools: quickbook for the first stage and pandoc
    /// for the DocBook intermediate. If any listed tool is unavailable at run
    /// start the whole format is skipped with a single diagnostic.
    pub fn required_tools(self) -> &'static [Tool] {
        match self {
            SourceFormat::Quickbook => &[Tool::Quickbook, Tool::Pandoc],
            SourceFormat::Rst
            | SourceFormat::Markdown
            | SourceFormat::DocBook
            | SourceFormat::Html
            | SourceFormat::Htm
            | SourceFormat::Doxygen => &[Tool::Pandoc],
            SourceFormat::AsciiDoc | SourceFormat::MathMl => &[],
        }
    }

    /// Whether sources in this format may be non-standalone fragments that a
    /// parent document pulls in via inclusion. Only Quickbook supports that.
    pub fn is_fragment_aware(self) -> bool {
        matches!(self, SourceFormat::Quickbook)
    }

    /// Whether this format requires a document-metadata header (Quickbook's
    /// doc_info block). Failures from this family default to content errors
    /// rather than tool errors during classification.
    pub fn requires_doc_header(self) -> bool {
        matches!(self, SourceFormat::Quickbook)
    }

    /// Derive the destination path for a source at `relative` under the
    /// corpus root: `output_root/<tag>/<relative with .adoc>`.
    ///
    /// This is a pure function of the source path and format; nothing else in
    /// the pipeline may influence where a conversion lands.
    pub fn destination_for(self, output_root: &Path, relative: &Path) -> PathBuf {
        output_root
            .join(self.tag())
            .join(relative)
            .with_extension(TARGET_EXTENSION)
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_round_trips_for_every_format() {
        for format in SourceFormat::ALL {
            assert_eq!(SourceFormat::from_tag(format.tag()), Some(format));
        }
        assert_eq!(SourceFormat::from_tag("pdf"), None);
        assert_eq!(SourceFormat::from_tag(""), None);
    }

    #[test]
    fn destination_mirrors_relative_path() {
        let dest = SourceFormat::Markdown
            .destination_for(Path::new("out"), Path::new("lib1/doc/readme.md"));
        assert_eq!(dest, PathBuf::from("out/md/lib1/doc/readme.adoc"));
    }

    #[test]
    fn destination_replaces_only_the_last_extension() {
        let dest = SourceFormat::Quickbook
            .destination_for(Path::new("out"), Path::new("math/doc/sf.main.qbk"));
        assert_eq!(dest, PathBuf::from("out/qbk/math/doc/sf.main.adoc"));
    }

    #[test]
    fn reader_formats_require_pandoc() {
        for format in SourceFormat::ALL {
            if format.pandoc_reader().is_some() {
                assert!(format.required_tools().contains(&Tool::Pandoc), "{format}");
            }
        }
    }

    #[test]
    fn quickbook_is_the_only_fragment_aware_format() {
        let aware: Vec<_> = SourceFormat::ALL
            .iter()
            .filter(|f| f.is_fragment_aware())
            .collect();
        assert_eq!(aware, vec![&SourceFormat::Quickbook]);
    }
}
