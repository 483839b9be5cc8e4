//! The precomputed inventory: format → ordered relative source paths.
//!
//! Corpus discovery (walking the tree, filtering by location and extension)
//! belongs to the external collector; this module only consumes its output,
//! a JSON object mapping format tags to lists of paths relative to the
//! corpus root. The pipeline treats the inventory as read-only input — a
//! missing or unparsable inventory is one of the two fatal conditions of a
//! run, since without it there is no job list at all.

use crate::error::Corpus2AdocError;
use crate::format::SourceFormat;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// An ordered job list per source format.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    entries: BTreeMap<SourceFormat, Vec<PathBuf>>,
}

impl Inventory {
    /// Load an inventory from the collector's JSON file.
    ///
    /// Keys with an unknown format tag are ignored with a warning rather
    /// than failing the run: the collector is free to record file types the
    /// converter does not handle.
    ///
    /// # Errors
    /// * [`Corpus2AdocError::InventoryNotFound`] when the file is absent
    /// * [`Corpus2AdocError::InventoryRead`] when it cannot be read
    /// * [`Corpus2AdocError::InventoryParse`] when it is not the expected
    ///   JSON mapping
    pub fn from_json_file(path: &Path) -> Result<Self, Corpus2AdocError> {
        if !path.exists() {
            return Err(Corpus2AdocError::InventoryNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = fs::read_to_string(path).map_err(|source| Corpus2AdocError::InventoryRead {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: BTreeMap<String, Vec<PathBuf>> =
            serde_json::from_str(&text).map_err(|source| Corpus2AdocError::InventoryParse {
                path: path.to_path_buf(),
                source,
            })?;

        let mut inventory = Inventory::default();
        for (tag, paths) in raw {
            match SourceFormat::from_tag(&tag) {
                Some(format) => inventory.entries.entry(format).or_default().extend(paths),
                None => warn!("ignoring unknown format tag '{tag}' in inventory"),
            }
        }
        Ok(inventory)
    }

    /// Append one relative path to a format's job list. Primarily for
    /// library callers and tests that build inventories programmatically.
    pub fn insert(&mut self, format: SourceFormat, relative: impl Into<PathBuf>) {
        self.entries.entry(format).or_default().push(relative.into());
    }

    /// The ordered job list for a format. An absent format yields an empty
    /// slice — a valid, no-op job list.
    pub fn paths_for(&self, format: SourceFormat) -> &[PathBuf] {
        self.entries
            .get(&format)
            .map(|paths| paths.as_slice())
            .unwrap_or(&[])
    }

    /// Total files across all formats.
    pub fn total_files(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_files() == 0
    }
}
