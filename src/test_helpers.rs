//! Shared test utilities for the albummer test suite.
//!
//! Provides in-memory inventories, a recording [`MediaReader`] and a helper
//! that lays out an album file next to a media folder on disk.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let inventory = inventory_of(&["a.png", "clip.mp4"]);
//! let lookup = inventory.lookup();
//! let reader = RecordingReader::failing(&["clip.mp4"]);
//! ```

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::SystemTime;
use tempfile::TempDir;

use crate::encode::MediaReader;
use crate::scan::Inventory;
use crate::types::MediaEntry;

// =========================================================================
// Inventories
// =========================================================================

/// An inventory of entries under `pics/`, one per name, no files on disk.
pub fn inventory_of(names: &[&str]) -> Inventory {
    let entries = names
        .iter()
        .map(|name| {
            MediaEntry::new(Path::new("pics").join(name), SystemTime::UNIX_EPOCH)
                .unwrap_or_else(|| panic!("'{name}' is not a media filename"))
        })
        .collect();
    Inventory::from_entries(entries)
}

// =========================================================================
// Readers
// =========================================================================

/// Reader that records every name it is asked for and returns the name's
/// bytes. Names listed as failing return `NotFound`.
///
/// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
#[derive(Default)]
pub struct RecordingReader {
    reads: Mutex<Vec<String>>,
    failing: HashSet<String>,
}

impl RecordingReader {
    pub fn failing(names: &[&str]) -> Self {
        Self {
            reads: Mutex::new(Vec::new()),
            failing: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    /// Names read so far, in completion order.
    pub fn reads(&self) -> Vec<String> {
        self.reads.lock().unwrap().clone()
    }
}

impl MediaReader for RecordingReader {
    fn read(&self, entry: &MediaEntry) -> io::Result<Vec<u8>> {
        self.reads.lock().unwrap().push(entry.name.clone());
        if self.failing.contains(&entry.name) {
            Err(io::Error::new(io::ErrorKind::NotFound, "no such file"))
        } else {
            Ok(entry.name.as_bytes().to_vec())
        }
    }
}

// =========================================================================
// On-disk fixtures
// =========================================================================

/// A temp directory holding `album.alb` and a `pics/` folder with `media`.
///
/// Each media file's content is its own name.
pub fn album_on_disk(album: &str, media: &[&str]) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let pics = tmp.path().join("pics");
    std::fs::create_dir_all(&pics).unwrap();
    for name in media {
        std::fs::write(pics.join(name), name.as_bytes()).unwrap();
    }
    let album_path = tmp.path().join("album.alb");
    std::fs::write(&album_path, album).unwrap();
    (tmp, album_path)
}
