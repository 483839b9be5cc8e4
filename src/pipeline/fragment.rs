//! Fragment detection for inclusion-capable formats.
//!
//! ## Why a heuristic, and why before any tool runs?
//!
//! Quickbook documents may be assembled from sub-files pulled in with
//! include directives. Such fragments open with a section or comment marker
//! instead of a doc_info block (`[library …]`, `[article …]`, …) and cannot
//! be converted standalone — quickbook rejects them. Detecting them up front
//! avoids wasting a tool invocation per fragment and, more importantly,
//! keeps them out of the content-error tally, where thousands of expected
//! "no doc_info" failures would bury the real malformed documents.
//!
//! On any read failure the detector fails open: attempting a conversion that
//! may error is better than silently dropping a file from the corpus.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Markers that open a top-level Quickbook document. A file whose opening
/// window contains any of these is standalone, whatever its first line says.
const DOC_INFO_MARKERS: [&str; 6] = [
    "[library",
    "[article",
    "[book",
    "[chapter",
    "[preface",
    "[reference",
];

/// First-line openers that indicate a sub-document rather than a top-level
/// one: a section opening, or a pure comment (fragments conventionally start
/// with an explanatory comment).
const FRAGMENT_OPENERS: [&str; 2] = ["[section", "[/"];

/// Decide whether `path` is a non-standalone fragment.
///
/// Reads the first line; if it opens a sub-section or comment, scans up to
/// `window` further bytes for a doc-info marker. No marker means the file is
/// meant for inclusion in a parent document.
pub fn is_fragment(path: &Path, window: usize) -> bool {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return false,
    };
    let mut reader = BufReader::new(file);

    let mut first_line = String::new();
    if reader.read_line(&mut first_line).is_err() {
        return false;
    }
    let first = first_line.trim();
    if !FRAGMENT_OPENERS.iter().any(|opener| first.starts_with(opener)) {
        return false;
    }

    let mut head = Vec::new();
    if reader
        .take(window as u64)
        .read_to_end(&mut head)
        .is_err()
    {
        return false;
    }
    let head = String::from_utf8_lossy(&head);
    !DOC_INFO_MARKERS.iter().any(|marker| head.contains(marker))
}
