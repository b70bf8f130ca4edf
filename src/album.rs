//! Album description parsing.
//!
//! An album description is plain text, read line by line:
//!
//! ```text
//! :folder ./pics                 # control line: where the media lives
//! :use default.css               # control line: stylesheet to inline
//! :show_filenames                # control line: caption every cell
//!
//! # Summer                       # prose: rendered as markdown
//!
//! beach.jpg dunes.jpg sea.png    # media line: one row, three cells
//! clip.mp4                       # media line: one row, one cell
//! ```
//!
//! ## Classification
//!
//! [`classify`] is the only place that decides what a line is, and every pass
//! over an album goes through it:
//!
//! - empty or whitespace-only → blank
//! - first character `:` → control line
//! - first token names a file in the media lookup → media line
//! - anything else → prose
//!
//! A prose sentence that happens to start with a media filename is a media
//! line. The lookup wins; write such a sentence with a leading word.
//!
//! ## Prose blocks
//!
//! A prose line opens a block that swallows the following lines, blank lines
//! and `:`-lines included, until a media line or the end of input. The media
//! line that ends a block is not consumed.

use crate::scan::MediaLookup;
use crate::types::MediaEntry;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// First character of every control line.
pub const CONTROL_MARKER: char = ':';

#[derive(Error, Debug)]
pub enum AlbumError {
    #[error("cannot read album {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no folder declared: add a `:folder <path>` line to the album")]
    NoFolder,
}

/// A parsed control line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive<'a> {
    /// `:folder <path>`
    Folder(&'a str),
    /// `:use <path>`
    Style(&'a str),
    /// `:show_filenames`
    ShowFilenames,
    /// Anything else, including `:folder`/`:use` without a path.
    Unknown(&'a str),
}

impl<'a> Directive<'a> {
    /// Parse a line that starts with [`CONTROL_MARKER`].
    ///
    /// The argument is the rest of the line, trimmed, so paths may hold spaces.
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim_end();
        let (name, arg) = match line.find(char::is_whitespace) {
            Some(pos) => (&line[..pos], Some(line[pos..].trim()).filter(|a| !a.is_empty())),
            None => (line, None),
        };
        match (name, arg) {
            (":folder", Some(path)) => Self::Folder(path),
            (":use", Some(path)) => Self::Style(path),
            (":show_filenames", _) => Self::ShowFilenames,
            _ => Self::Unknown(name),
        }
    }
}

/// What a single line is, on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    Control(Directive<'a>),
    /// Every whitespace-separated token, resolvable or not.
    Media(Vec<&'a str>),
    Prose,
}

/// Classify one line against the media lookup.
pub fn classify<'a>(line: &'a str, lookup: &MediaLookup<'_>) -> LineKind<'a> {
    let mut tokens = line.split_whitespace().peekable();
    let Some(first) = tokens.peek().copied() else {
        return LineKind::Blank;
    };
    if line.starts_with(CONTROL_MARKER) {
        LineKind::Control(Directive::parse(line))
    } else if lookup.contains(first) {
        LineKind::Media(tokens.collect())
    } else {
        LineKind::Prose
    }
}

/// One unit of output-relevant album content, with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block<'a> {
    Control { line: usize, directive: Directive<'a> },
    Media { line: usize, tokens: Vec<&'a str> },
    /// Lines of a prose block joined with `\n`. `line` is where it starts.
    Prose { line: usize, text: String },
}

/// A loaded album description.
#[derive(Debug, Clone)]
pub struct Album {
    lines: Vec<String>,
    folder: PathBuf,
    base_dir: PathBuf,
    name: String,
}

impl Album {
    /// Read and parse an album file.
    ///
    /// Relative paths in the album resolve against the file's directory.
    pub fn load(path: &Path) -> Result<Self, AlbumError> {
        let text = fs::read_to_string(path).map_err(|source| AlbumError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let mut album = Self::parse(&text, &base_dir)?;
        if let Some(stem) = path.file_stem() {
            album.name = stem.to_string_lossy().into_owned();
        }
        Ok(album)
    }

    /// Parse album text. Fails only when no folder is declared.
    pub fn parse(text: &str, base_dir: &Path) -> Result<Self, AlbumError> {
        let lines: Vec<String> = text.lines().map(String::from).collect();
        let folder = parse_folder(&lines)?;
        Ok(Self {
            folder: base_dir.join(folder),
            base_dir: base_dir.to_path_buf(),
            name: "album".to_string(),
            lines,
        })
    }

    /// The media folder, resolved.
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Resolve a path written in the album (e.g. a `:use` stylesheet).
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.base_dir.join(path)
    }

    /// Page title: the first `# heading` line, else the album file's stem.
    pub fn title(&self) -> String {
        self.lines
            .iter()
            .find(|line| line.starts_with("# "))
            .map(|line| line.trim_start_matches("# ").trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| self.name.clone())
    }

    /// Walk the album in order, grouping prose runs with one-line lookahead.
    ///
    /// Blank lines outside prose produce nothing.
    pub fn blocks(&self, lookup: &MediaLookup<'_>) -> Vec<Block<'_>> {
        let mut blocks = Vec::new();
        let mut next = 0;

        while next < self.lines.len() {
            let line = &self.lines[next];
            let number = next + 1;
            next += 1;

            match classify(line, lookup) {
                LineKind::Blank => {}
                LineKind::Control(directive) => blocks.push(Block::Control {
                    line: number,
                    directive,
                }),
                LineKind::Media(tokens) => blocks.push(Block::Media {
                    line: number,
                    tokens,
                }),
                LineKind::Prose => {
                    let mut text = line.clone();
                    while let Some(following) = self.lines.get(next) {
                        if matches!(classify(following, lookup), LineKind::Media(_)) {
                            break;
                        }
                        text.push('\n');
                        text.push_str(following);
                        next += 1;
                    }
                    blocks.push(Block::Prose { line: number, text });
                }
            }
        }

        blocks
    }

    /// Distinct media entries named on any media line, first use first.
    ///
    /// Tokens that resolve to nothing are left out.
    pub fn referenced_media<'l>(&self, lookup: &MediaLookup<'l>) -> Vec<&'l MediaEntry> {
        let mut seen = HashSet::new();
        let mut referenced = Vec::new();
        for line in &self.lines {
            if let LineKind::Media(tokens) = classify(line, lookup) {
                for entry in tokens.into_iter().filter_map(|t| lookup.get(t)) {
                    if seen.insert(entry.name.as_str()) {
                        referenced.push(entry);
                    }
                }
            }
        }
        referenced
    }
}

/// The path of the first `:folder` line that has one.
pub fn parse_folder(lines: &[String]) -> Result<&str, AlbumError> {
    lines
        .iter()
        .filter(|line| line.starts_with(CONTROL_MARKER))
        .find_map(|line| match Directive::parse(line) {
            Directive::Folder(path) => Some(path),
            _ => None,
        })
        .ok_or(AlbumError::NoFolder)
}
