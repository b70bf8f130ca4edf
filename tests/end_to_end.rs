//! Whole-pipeline tests against real files, through the public API only.

use albummer::album::Album;
use albummer::config::Config;
use albummer::encode::MediaReader;
use albummer::generate::{self, GenerateError};
use albummer::render::MarkdownRenderer;
use albummer::types::{MediaEntry, MediaKind, Warning};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

/// `album.alb` plus a `pics/` folder whose files contain their own names.
fn setup(album: &str, media: &[&str]) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let pics = tmp.path().join("pics");
    fs::create_dir_all(&pics).unwrap();
    for name in media {
        fs::write(pics.join(name), name.as_bytes()).unwrap();
    }
    let album_path = tmp.path().join("album.alb");
    fs::write(&album_path, album).unwrap();
    (tmp, album_path)
}

fn page_body(html: &str) -> &str {
    let start = html.find("<body>").unwrap() + "<body>".len();
    let end = html.find("</body>").unwrap();
    &html[start..end]
}

/// Reads from disk after a delay that makes images finish last.
struct SlowImages;

impl MediaReader for SlowImages {
    fn read(&self, entry: &MediaEntry) -> io::Result<Vec<u8>> {
        let delay = match entry.kind {
            MediaKind::Image => 60,
            MediaKind::Video => 20,
            MediaKind::Audio => 0,
        };
        std::thread::sleep(Duration::from_millis(delay));
        fs::read(&entry.path)
    }
}

/// Reads from disk, except for one name.
struct FailsOn(&'static str);

impl MediaReader for FailsOn {
    fn read(&self, entry: &MediaEntry) -> io::Result<Vec<u8>> {
        if entry.name == self.0 {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        }
        fs::read(&entry.path)
    }
}

#[test]
fn two_images_and_a_paragraph() {
    let (tmp, album_path) = setup(
        ":folder ./pics\na.png b.png\nHello **world**\n",
        &["a.png", "b.png"],
    );

    let generated = generate::generate(&album_path, &Config::default(), None).unwrap();

    assert_eq!(generated.output, tmp.path().join("album.html"));
    assert!(generated.warnings.is_empty());
    let html = fs::read_to_string(&generated.output).unwrap();
    let body = page_body(&html);
    assert!(body.starts_with(r#"<div align="center"><table><tr>"#));
    assert_eq!(body.matches(r#"<td style="width:50%;">"#).count(), 2);
    assert!(body.contains("data:image/png;base64,YS5wbmc="));
    assert!(body.contains("data:image/png;base64,Yi5wbmc="));
    assert!(body.ends_with("<p>Hello <strong>world</strong></p>\n"));
    assert!(body.find("YS5wbmc=").unwrap() < body.find("Yi5wbmc=").unwrap());
    assert!(!html.contains("<style>"));
}

#[test]
fn regenerating_is_byte_identical() {
    let (_tmp, album_path) = setup(
        ":folder pics\n:show_filenames\n# Trip\n\na.jpg clip.mp4\nsong.wav\nThe end.\n",
        &["a.jpg", "clip.mp4", "song.wav"],
    );

    let first = generate::generate(&album_path, &Config::default(), None).unwrap();
    let first_html = fs::read(&first.output).unwrap();
    let second = generate::generate(&album_path, &Config::default(), None).unwrap();
    let second_html = fs::read(&second.output).unwrap();

    assert_eq!(first_html, second_html);
}

#[test]
fn page_order_ignores_encoding_order() {
    let (_tmp, album_path) = setup(
        ":folder pics\na.png\nclip.mp4\nsong.wav\nb.jpg clip.mp4\n",
        &["a.png", "b.jpg", "clip.mp4", "song.wav"],
    );
    let album = Album::load(&album_path).unwrap();

    let compiled = generate::compile(&album, &SlowImages, &MarkdownRenderer, None).unwrap();
    let html = compiled.document.to_html();

    let positions: Vec<usize> = ["YS5wbmc=", "Y2xpcC5tcDQ=", "c29uZy53YXY=", "Yi5qcGc="]
        .iter()
        .map(|data| html.find(data).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(compiled.document.fragments.len(), 4);
    assert_eq!(html.matches("Y2xpcC5tcDQ=").count(), 2);
}

#[test]
fn unreadable_media_leaves_an_empty_cell() {
    let (_tmp, album_path) = setup(":folder pics\na.png gone.png\n", &["a.png", "gone.png"]);
    let album = Album::load(&album_path).unwrap();

    let compiled = generate::compile(&album, &FailsOn("gone.png"), &MarkdownRenderer, None).unwrap();
    let html = compiled.document.to_html();

    assert_eq!(html.matches(r#"<td style="width:50%;">"#).count(), 2);
    assert!(html.contains(r#"<td style="width:50%;"></td>"#));
    assert!(html.contains("YS5wbmc="));
    assert!(matches!(
        compiled.warnings.as_slice(),
        [Warning::UnreadableMedia { name, .. }] if name == "gone.png"
    ));
}

#[test]
fn unknown_token_still_narrows_the_row() {
    let (_tmp, album_path) = setup(":folder pics\na.png nowhere.png\n", &["a.png"]);

    let generated = generate::generate(&album_path, &Config::default(), None).unwrap();

    let html = fs::read_to_string(&generated.output).unwrap();
    assert!(html.contains(r#"<td style="width:50%;">"#));
    assert_eq!(
        generated.warnings,
        vec![Warning::UnresolvedToken {
            line: 2,
            token: "nowhere.png".into()
        }]
    );
}

#[test]
fn scripts_in_prose_are_stripped() {
    let (_tmp, album_path) = setup(
        ":folder pics\nNice <script>alert(1)</script> day\n",
        &[],
    );

    let generated = generate::generate(&album_path, &Config::default(), None).unwrap();

    let html = fs::read_to_string(&generated.output).unwrap();
    assert!(!html.contains("<script>"));
    assert!(html.contains("Nice"));
}

#[test]
fn stylesheet_resolves_next_to_album() {
    let (tmp, album_path) = setup(":folder pics\n:use look.css\nHi\n", &[]);
    fs::write(tmp.path().join("look.css"), "h1 { color: teal; }").unwrap();

    let generated = generate::generate(&album_path, &Config::default(), None).unwrap();

    let html = fs::read_to_string(&generated.output).unwrap();
    assert!(html.contains("<style>h1 { color: teal; }</style>"));
}

#[test]
fn missing_folder_writes_no_page() {
    let (tmp, album_path) = setup(":folder nope\nHello\n", &[]);

    let result = generate::generate(&album_path, &Config::default(), None);

    assert!(matches!(result, Err(GenerateError::Scan(_))));
    assert!(!tmp.path().join("album.html").exists());
}

#[test]
fn missing_album_is_an_error() {
    let result = generate::generate(
        Path::new("/definitely/not/here.alb"),
        &Config::default(),
        None,
    );
    assert!(matches!(result, Err(GenerateError::Album(_))));
}
