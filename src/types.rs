//! Shared types used across all compiler stages.
//!
//! [`MediaEntry`] is produced by the scan stage, filled in by the encode stage
//! and read by the generate stage. [`Warning`] and [`Progress`] are the two
//! side channels every stage reports through.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4"];
const AUDIO_EXTENSIONS: &[&str] = &["wav"];

/// The kind of a media file, decided once from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
    Audio,
}

impl MediaKind {
    /// Classify a path by its lower-cased extension.
    ///
    /// Returns `None` for anything that is not embeddable media.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Image)
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Video)
        } else if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Audio)
        } else {
            None
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
        }
    }
}

/// One media file discovered on disk.
#[derive(Debug, Clone)]
pub struct MediaEntry {
    /// Path as discovered by the scan (root-joined).
    pub path: PathBuf,
    /// Base filename, the key album lines refer to.
    pub name: String,
    pub kind: MediaKind,
    pub modified: SystemTime,
    /// Embeddable markup. Absent until the encode stage has run.
    pub fragment: Option<String>,
}

impl MediaEntry {
    /// Build an entry for `path`, or `None` if the extension is not media.
    pub fn new(path: PathBuf, modified: SystemTime) -> Option<Self> {
        let kind = MediaKind::from_path(&path)?;
        let name = path.file_name()?.to_string_lossy().into_owned();
        Some(Self {
            path,
            name,
            kind,
            modified,
            fragment: None,
        })
    }
}

/// A degraded condition that was absorbed instead of aborting the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A path below the media root could not be traversed.
    Traversal { path: PathBuf, message: String },
    /// A referenced media file could not be read; it renders blank.
    UnreadableMedia { name: String, message: String },
    /// The stylesheet named by `:use` could not be read.
    UnreadableStyle { path: PathBuf, message: String },
    /// A control line with a directive this compiler does not know.
    UnknownDirective { line: usize, directive: String },
    /// A token on a media line that matches no media file.
    UnresolvedToken { line: usize, token: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Traversal { path, message } => {
                write!(f, "skipped {}: {}", path.display(), message)
            }
            Self::UnreadableMedia { name, message } => {
                write!(f, "could not read {name}, it will render blank: {message}")
            }
            Self::UnreadableStyle { path, message } => {
                write!(f, "could not read stylesheet {}: {}", path.display(), message)
            }
            Self::UnknownDirective { line, directive } => {
                write!(f, "line {line}: unknown directive {directive} ignored")
            }
            Self::UnresolvedToken { line, token } => {
                write!(f, "line {line}: {token} is not in the media folder")
            }
        }
    }
}

/// Stage progress, sent over an optional channel as work completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Encoded { done: usize, total: usize },
    Assembled { done: usize, total: usize },
    Written { done: usize, total: usize },
}
