//! Starter album generation.
//!
//! Lists a media folder and writes an album description that uses all of it,
//! ready for editing:
//!
//! ```text
//! :folder pics
//! :show_filenames
//! :use default.css
//!
//! # pics
//!
//! a.jpg   b.jpg   c.jpg
//! d.jpg
//!
//! clip.mp4
//!
//! e.jpg
//! ```
//!
//! Media is ordered by modification time. Images are packed `columns` to a
//! line; every video and audio file gets a line of its own, set off by blank
//! lines.

use crate::config::{DEFAULT_STYLESHEET, SortOrder, TemplateConfig};
use crate::scan::{Inventory, ScanError};
use crate::types::{MediaEntry, MediaKind};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

const DEFAULT_CSS: &str = include_str!("../static/default.css");

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What [`write_template`] produced.
#[derive(Debug, Clone)]
pub struct WrittenTemplate {
    pub output: PathBuf,
    pub media: usize,
    /// Set when the default stylesheet was written beside the template.
    pub stylesheet: Option<PathBuf>,
}

/// Album text for every entry of `inventory`.
///
/// `folder` is written verbatim into the `:folder` line.
pub fn make_template(
    inventory: &Inventory,
    folder: &str,
    title: &str,
    options: &TemplateConfig,
) -> String {
    let columns = options.columns.max(1);
    let mut media: Vec<&MediaEntry> = inventory.entries().iter().collect();
    match options.order {
        SortOrder::Asc => media.sort_by(|a, b| a.modified.cmp(&b.modified)),
        SortOrder::Desc => media.sort_by(|a, b| b.modified.cmp(&a.modified)),
    }

    let mut body = String::new();
    let mut in_row = 0;
    for entry in media {
        match entry.kind {
            MediaKind::Video | MediaKind::Audio => {
                if in_row > 0 {
                    body.push('\n');
                }
                body.push('\n');
                body.push_str(&entry.name);
                body.push_str("\n\n");
                in_row = 0;
            }
            MediaKind::Image => {
                if in_row > 0 {
                    body.push_str("   ");
                }
                body.push_str(&entry.name);
                in_row += 1;
                if in_row == columns {
                    body.push('\n');
                    in_row = 0;
                }
            }
        }
    }

    format!(
        ":folder {folder}\n:show_filenames\n:use {css}\n\n# {title}\n\n{body}\n",
        css = options.stylesheet
    )
}

/// Scan `folder` and write a starter album to `output`.
///
/// The `:folder` line is relative to the album's directory when the folder
/// lives below it, absolute otherwise.
pub fn write_template(
    folder: &Path,
    output: &Path,
    options: &TemplateConfig,
) -> Result<WrittenTemplate, TemplateError> {
    let inventory = Inventory::scan(folder)?;

    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| TemplateError::Io { path, source }
    };
    let folder_abs = std::path::absolute(folder).map_err(io_err(folder))?;
    let out_dir = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let out_dir_abs = std::path::absolute(out_dir).map_err(io_err(out_dir))?;

    let declared = match folder_abs.strip_prefix(&out_dir_abs) {
        Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Ok(rel) => rel.display().to_string(),
        Err(_) => folder_abs.display().to_string(),
    };
    let title = folder_abs
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| declared.clone());

    let stylesheet = if options.stylesheet == DEFAULT_STYLESHEET {
        let path = out_dir.join(DEFAULT_STYLESHEET);
        if path.exists() {
            None
        } else {
            fs::write(&path, DEFAULT_CSS).map_err(io_err(&path))?;
            Some(path)
        }
    } else {
        None
    };

    let text = make_template(&inventory, &declared, &title, options);
    fs::write(output, text).map_err(io_err(output))?;
    debug!(output = %output.display(), media = inventory.len(), "wrote template");

    Ok(WrittenTemplate {
        output: output.to_path_buf(),
        media: inventory.len(),
        stylesheet,
    })
}
