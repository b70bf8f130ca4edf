//! Media inventory.
//!
//! Walks the folder declared by an album's `:folder` line and collects every
//! file whose extension maps to a [`MediaKind`]. Everything else is ignored.
//!
//! ## Scan order
//!
//! Entries keep the order of the walk: depth first, directory entries sorted
//! by file name. Nothing else sorts them; the template generator orders by
//! modification time on its own.
//!
//! ## Lookup
//!
//! Album lines refer to media by base filename, so the inventory exposes a
//! [`MediaLookup`] keyed by name. Two files with the same name in different
//! subdirectories collide: the one later in scan order wins.
//!
//! ## Errors
//!
//! Only a root that cannot be read is fatal. Anything failing below the root
//! is reported as a [`Warning::Traversal`] and the walk carries on.

use crate::types::{MediaEntry, Warning};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("cannot read media folder {path}: {source}")]
    Root {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("media folder is not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// All media files found under a root folder, in scan order.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    entries: Vec<MediaEntry>,
    warnings: Vec<Warning>,
}

impl Inventory {
    pub fn scan(root: &Path) -> Result<Self, ScanError> {
        let meta = fs::metadata(root).map_err(|source| ScanError::Root {
            path: root.to_path_buf(),
            source,
        })?;
        if !meta.is_dir() {
            return Err(ScanError::NotADirectory(root.to_path_buf()));
        }

        let mut entries = Vec::new();
        let mut warnings = Vec::new();

        for item in WalkDir::new(root).follow_links(true).sort_by_file_name() {
            let entry = match item {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    return Err(ScanError::Root {
                        path: root.to_path_buf(),
                        source: err.into(),
                    });
                }
                Err(err) => {
                    let warning = Warning::Traversal {
                        path: err
                            .path()
                            .map(Path::to_path_buf)
                            .unwrap_or_else(|| root.to_path_buf()),
                        message: err.to_string(),
                    };
                    warn!("{warning}");
                    warnings.push(warning);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }
            let modified = entry
                .metadata()
                .ok()
                .and_then(|m| m.modified().ok())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            if let Some(media) = MediaEntry::new(entry.into_path(), modified) {
                entries.push(media);
            }
        }

        debug!(root = %root.display(), media = entries.len(), "scanned media folder");
        Ok(Self { entries, warnings })
    }

    /// Build an inventory from already-known entries.
    pub fn from_entries(entries: Vec<MediaEntry>) -> Self {
        Self {
            entries,
            warnings: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[MediaEntry] {
        &self.entries
    }

    /// Problems met while walking; each one is a file that may be missing.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Base filename → entry. Later entries win on collision.
    pub fn lookup(&self) -> MediaLookup<'_> {
        let mut by_name = HashMap::with_capacity(self.entries.len());
        for entry in &self.entries {
            by_name.insert(entry.name.as_str(), entry);
        }
        MediaLookup { by_name }
    }

    /// Attach encoded fragments by base filename.
    ///
    /// A name goes to the same entry [`lookup`](Self::lookup) would return.
    /// Fragments are write-once: an entry that already has one keeps it.
    pub fn with_fragments<I>(mut self, fragments: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut index: HashMap<String, usize> = HashMap::with_capacity(self.entries.len());
        for (i, entry) in self.entries.iter().enumerate() {
            index.insert(entry.name.clone(), i);
        }
        for (name, fragment) in fragments {
            if let Some(&i) = index.get(&name) {
                let entry = &mut self.entries[i];
                if entry.fragment.is_none() {
                    entry.fragment = Some(fragment);
                }
            }
        }
        self
    }
}

/// Borrowed view of an [`Inventory`] keyed by base filename.
#[derive(Debug, Clone, Default)]
pub struct MediaLookup<'a> {
    by_name: HashMap<&'a str, &'a MediaEntry>,
}

impl<'a> MediaLookup<'a> {
    pub fn get(&self, name: &str) -> Option<&'a MediaEntry> {
        self.by_name.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
