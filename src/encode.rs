//! Media encoding.
//!
//! Turns every media file an album actually uses into an inline HTML fragment
//! with the file's bytes base64-encoded into a data URI. Files in the folder
//! that no media line names are never read.
//!
//! ## Parallelism
//!
//! One task per referenced file on the [rayon](https://docs.rs/rayon) pool.
//! Each task returns `(name, fragment)`; nothing is shared between tasks but a
//! completion counter. The caller blocks until every task has finished, then
//! merges the pairs into the inventory with
//! [`Inventory::with_fragments`](crate::scan::Inventory::with_fragments).
//! Completion order is irrelevant: the generate stage reads fragments by name
//! after the join.
//!
//! Every referenced file is held in memory, raw and encoded, while its task
//! runs. Large albums need memory in proportion.
//!
//! ## Failures
//!
//! A file that cannot be read encodes to an empty fragment, so its cell shows
//! blank space. The failure is returned as a [`Warning`] and logged.

use crate::album::Album;
use crate::scan::MediaLookup;
use crate::types::{MediaEntry, MediaKind, Progress, Warning};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use maud::{Markup, html};
use rayon::prelude::*;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::Sender;
use tracing::{debug, warn};

/// Source of media bytes.
pub trait MediaReader: Sync {
    fn read(&self, entry: &MediaEntry) -> io::Result<Vec<u8>>;
}

/// Reads each entry from the path it was discovered at.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl MediaReader for FsReader {
    fn read(&self, entry: &MediaEntry) -> io::Result<Vec<u8>> {
        std::fs::read(&entry.path)
    }
}

/// Output of [`encode_referenced`].
#[derive(Debug, Default)]
pub struct Encoded {
    /// One pair per referenced entry, unreadable ones with an empty fragment.
    pub fragments: Vec<(String, String)>,
    pub warnings: Vec<Warning>,
}

/// Encode every entry referenced by `album`, blocking until all are done.
pub fn encode_referenced(
    album: &Album,
    lookup: &MediaLookup<'_>,
    reader: &impl MediaReader,
    progress: Option<Sender<Progress>>,
) -> Encoded {
    let referenced = album.referenced_media(lookup);
    let total = referenced.len();
    let done = AtomicUsize::new(0);
    debug!(total, unused = lookup.len() - total, "encoding referenced media");

    let outcomes: Vec<(String, io::Result<String>)> = referenced
        .par_iter()
        .map_with(progress, |progress, entry| {
            let outcome = reader
                .read(entry)
                .map(|bytes| fragment_for(entry, &bytes).into_string());
            let done = done.fetch_add(1, Ordering::SeqCst) + 1;
            debug!(name = %entry.name, kind = entry.kind.label(), done, total, "encoded");
            if let Some(tx) = progress {
                tx.send(Progress::Encoded { done, total }).ok();
            }
            (entry.name.clone(), outcome)
        })
        .collect();

    let mut encoded = Encoded::default();
    for (name, outcome) in outcomes {
        let fragment = match outcome {
            Ok(fragment) => fragment,
            Err(err) => {
                let warning = Warning::UnreadableMedia {
                    name: name.clone(),
                    message: err.to_string(),
                };
                warn!("{warning}");
                encoded.warnings.push(warning);
                String::new()
            }
        };
        encoded.fragments.push((name, fragment));
    }
    encoded
}

/// Inline markup for one media file's bytes.
pub fn fragment_for(entry: &MediaEntry, bytes: &[u8]) -> Markup {
    let data = STANDARD.encode(bytes);
    match entry.kind {
        MediaKind::Image => {
            let uri = format!("data:image/{};base64,{data}", image_subtype(&entry.name));
            html! {
                div class="imgdiv" {
                    img class="center-fit" src=(uri);
                }
            }
        }
        MediaKind::Video => {
            let uri = format!("data:video/mp4;base64,{data}");
            html! {
                div class="viddiv" {
                    video class="center-fit" controls src=(uri) {}
                }
            }
        }
        MediaKind::Audio => {
            let uri = format!("data:audio/x-wav;base64,{data}");
            html! {
                div align="center" {
                    audio controls src=(uri) {}
                }
            }
        }
    }
}

/// `png` for `.png` files, `jpeg` for every other image.
fn image_subtype(name: &str) -> &'static str {
    if name.to_lowercase().ends_with(".png") {
        "png"
    } else {
        "jpeg"
    }
}
