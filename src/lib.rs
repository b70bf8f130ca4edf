//! # Albummer
//!
//! Compiles a plain-text album description and a folder of media into one
//! self-contained HTML page. Every image, video and audio clip the album uses
//! is embedded as a base64 data URI, so the page can be mailed, archived or
//! opened offline without its folder.
//!
//! # The Album Format
//!
//! ```text
//! :folder pics                 directive: where the media lives (required)
//! :use default.css             directive: stylesheet to inline
//! :show_filenames              directive: caption every media cell
//!
//! # Summer                     prose: markdown, up to the next media line
//!
//! beach.jpg   dunes.jpg        media line: one row, one cell per file
//! surf.mp4
//! ```
//!
//! A line is a directive when it starts with `:`. It is a media line when its
//! first whitespace-separated token names a file in the media folder.
//! Everything else is prose.
//!
//! # Pipeline
//!
//! ```text
//! 1. Album     album file    →  lines + media folder
//! 2. Scan      media folder  →  inventory of image / video / audio files
//! 3. Encode    referenced    →  inline fragments, in parallel
//! 4. Generate  blocks        →  one HTML page beside the album
//! ```
//!
//! Encoding is the only parallel stage. Everything after it reads the
//! finished fragments in album order, so the page never depends on which file
//! finished encoding first.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`album`] | Album loading, line classification, block grouping |
//! | [`scan`] | Media folder walk and name lookup |
//! | [`encode`] | Parallel base64 encoding of referenced media |
//! | [`render`] | Markdown rendering and HTML sanitizing for prose |
//! | [`generate`] | Page assembly and atomic output |
//! | [`template`] | Starter album generation from a media folder |
//! | [`config`] | Optional `albummer.toml` loading and validation |
//! | [`types`] | Media entries, warnings and progress events |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Degrade, Don't Fail
//!
//! A run stops on an album file that cannot be read, an album without
//! `:folder`, a media folder that cannot be listed, or a page that cannot be
//! written. Everything else (an unreadable file, an unknown directive, a token
//! that names nothing) leaves a gap in the page and comes back as a
//! [`types::Warning`].
//!
//! ## Media Wins Over Prose
//!
//! A line whose first word happens to be a media filename is a media line,
//! even inside a paragraph. Classification never looks past the current line.

pub mod album;
pub mod config;
pub mod encode;
pub mod generate;
pub mod output;
pub mod render;
pub mod scan;
pub mod template;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
