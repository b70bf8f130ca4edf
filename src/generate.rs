//! Document assembly and output.
//!
//! The last stage. With every referenced media file encoded, walk the album a
//! second time, in line order, and turn each block into one fragment:
//!
//! - **media line** → a centered one-row table, one cell per token that
//!   resolves, each cell `floor(100 / tokens)` percent wide (tokens that do not
//!   resolve still count towards the width)
//! - **prose block** → the block's markdown, rendered and sanitized
//! - **control line** → nothing; `:use` inlines a stylesheet into `<head>`,
//!   `:show_filenames` captions every cell
//!
//! ## Output
//!
//! ```text
//! <!DOCTYPE html><html lang="en"><head>…<style>…</style></head>
//! <body>FRAGMENT FRAGMENT …</body>
//! </html>
//! ```
//!
//! The page is written once, fragment by fragment, into a temp file in the
//! destination directory that replaces the target only when complete. A run
//! that fails leaves no page behind.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for the row and head markup. Encoded
//! media and sanitized prose are already markup and are embedded pre-escaped.

use crate::album::{Album, AlbumError, Block, Directive};
use crate::config::Config;
use crate::encode::{self, FsReader, MediaReader};
use crate::render::{MarkdownRenderer, ProseRenderer};
use crate::scan::{Inventory, MediaLookup, ScanError};
use crate::types::{Progress, Warning};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Album(#[from] AlbumError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("output {0} would overwrite the album itself")]
    OutputIsInput(PathBuf),
}

/// The assembled page: head data plus one fragment per media line or prose
/// block, in album order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    /// Stylesheet text for an inline `<style>` element.
    pub style: Option<String>,
    pub fragments: Vec<String>,
}

impl Document {
    /// Write the whole page, reporting each fragment as it goes out.
    pub fn write_to<W: Write>(
        &self,
        out: &mut W,
        progress: Option<&Sender<Progress>>,
    ) -> io::Result<()> {
        let doctype = html! { (DOCTYPE) };
        let head = document_head(&self.title, self.style.as_deref());
        write!(
            out,
            "{}<html lang=\"en\">{}\n<body>",
            doctype.into_string(),
            head.into_string()
        )?;

        let total = self.fragments.len();
        for (i, fragment) in self.fragments.iter().enumerate() {
            out.write_all(fragment.as_bytes())?;
            if let Some(tx) = progress {
                tx.send(Progress::Written { done: i + 1, total }).ok();
            }
        }

        out.write_all(b"</body>\n</html>\n")
    }

    pub fn to_html(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        self.write_to(&mut buf, None).ok();
        String::from_utf8_lossy(&buf).into_owned()
    }
}

/// A compiled album, ready to write.
#[derive(Debug, Clone, Default)]
pub struct Compiled {
    pub document: Document,
    /// Everything that degraded along the way, in stage order.
    pub warnings: Vec<Warning>,
}

/// Result of [`generate`].
#[derive(Debug, Clone)]
pub struct Generated {
    pub output: PathBuf,
    pub fragments: usize,
    pub warnings: Vec<Warning>,
}

/// Compile `album_path` into a page beside it and write it.
///
/// The page takes the album's path with its extension replaced by
/// `config.output.extension`.
pub fn generate(
    album_path: &Path,
    config: &Config,
    progress: Option<Sender<Progress>>,
) -> Result<Generated, GenerateError> {
    let output = output_path(album_path, &config.output.extension);
    if output == album_path {
        return Err(GenerateError::OutputIsInput(output));
    }

    let album = Album::load(album_path)?;
    let compiled = compile(&album, &FsReader, &MarkdownRenderer, progress.clone())?;
    write_document(&compiled.document, &output, progress.as_ref())?;

    Ok(Generated {
        output,
        fragments: compiled.document.fragments.len(),
        warnings: compiled.warnings,
    })
}

pub fn output_path(album_path: &Path, extension: &str) -> PathBuf {
    album_path.with_extension(extension)
}

/// Scan the album's folder, encode what it uses, and assemble the page.
pub fn compile(
    album: &Album,
    reader: &impl MediaReader,
    renderer: &impl ProseRenderer,
    progress: Option<Sender<Progress>>,
) -> Result<Compiled, GenerateError> {
    let inventory = Inventory::scan(album.folder())?;
    let mut warnings = inventory.warnings().to_vec();

    let encoded = encode::encode_referenced(album, &inventory.lookup(), reader, progress.clone());
    warnings.extend(encoded.warnings);
    let inventory = inventory.with_fragments(encoded.fragments);

    let assembled = assemble(album, &inventory.lookup(), renderer, progress.as_ref());
    warnings.extend(assembled.warnings);

    Ok(Compiled {
        document: assembled.document,
        warnings,
    })
}

/// Walk the album in order and build one fragment per media line or prose
/// block.
///
/// Reads fragments from `lookup`, so encoding must be finished. Stylesheet
/// and caption settings apply to the whole page; with several readable
/// `:use` lines the last one wins.
pub fn assemble(
    album: &Album,
    lookup: &MediaLookup<'_>,
    renderer: &impl ProseRenderer,
    progress: Option<&Sender<Progress>>,
) -> Compiled {
    let blocks = album.blocks(lookup);
    let mut warnings = Vec::new();
    let mut style = None;
    let mut captions = false;

    for block in &blocks {
        let Block::Control { line, directive } = block else {
            continue;
        };
        match directive {
            Directive::Folder(_) => {}
            Directive::Style(path) => match read_style(&album.resolve(path)) {
                Ok(css) => style = Some(css),
                Err(warning) => note(&mut warnings, warning),
            },
            Directive::ShowFilenames => captions = true,
            Directive::Unknown(name) => note(
                &mut warnings,
                Warning::UnknownDirective {
                    line: *line,
                    directive: name.to_string(),
                },
            ),
        }
    }

    let total = blocks
        .iter()
        .filter(|b| !matches!(b, Block::Control { .. }))
        .count();
    let mut fragments = Vec::with_capacity(total);

    for block in &blocks {
        let fragment = match block {
            Block::Control { .. } => continue,
            Block::Media { line, tokens } => {
                for token in tokens.iter().filter(|t| !lookup.contains(t)) {
                    note(
                        &mut warnings,
                        Warning::UnresolvedToken {
                            line: *line,
                            token: token.to_string(),
                        },
                    );
                }
                media_row(tokens, lookup, captions).into_string()
            }
            Block::Prose { text, .. } => renderer.render(text),
        };
        fragments.push(fragment);
        if let Some(tx) = progress {
            tx.send(Progress::Assembled {
                done: fragments.len(),
                total,
            })
            .ok();
        }
    }

    debug!(fragments = fragments.len(), "assembled document");
    Compiled {
        document: Document {
            title: album.title(),
            style,
            fragments,
        },
        warnings,
    }
}

/// Write `document` to `path` through a temp file in the same directory.
pub fn write_document(
    document: &Document,
    path: &Path,
    progress: Option<&Sender<Progress>>,
) -> Result<(), GenerateError> {
    let write_err = |source: io::Error| GenerateError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let mut tmp = tempfile::Builder::new()
        .prefix(".albummer-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(write_err)?;
    {
        let mut out = BufWriter::new(tmp.as_file_mut());
        document.write_to(&mut out, progress).map_err(write_err)?;
        out.flush().map_err(write_err)?;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))
            .map_err(write_err)?;
    }
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

fn note(warnings: &mut Vec<Warning>, warning: Warning) {
    warn!("{warning}");
    warnings.push(warning);
}

fn read_style(path: &Path) -> Result<String, Warning> {
    fs::read_to_string(path).map_err(|err| Warning::UnreadableStyle {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

// ============================================================================
// HTML Components
// ============================================================================

fn document_head(title: &str, style: Option<&str>) -> Markup {
    html! {
        head {
            meta charset="UTF-8";
            meta name="viewport" content="width=device-width, initial-scale=1.0";
            title { (title) }
            @if let Some(css) = style {
                style { (PreEscaped(css)) }
            }
        }
    }
}

/// One media line as a row. `tokens` is every token on the line.
fn media_row(tokens: &[&str], lookup: &MediaLookup<'_>, captions: bool) -> Markup {
    let cell_style = format!("width:{}%;", 100 / tokens.len().max(1));
    html! {
        div align="center" {
            table {
                tr {
                    @for entry in tokens.iter().filter_map(|t| lookup.get(t)) {
                        td style=(cell_style) {
                            (PreEscaped(entry.fragment.as_deref().unwrap_or_default()))
                            @if captions {
                                div class="caption" { (entry.name) }
                            }
                        }
                        td width="10px" {}
                    }
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
