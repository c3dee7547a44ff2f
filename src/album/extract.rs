//! Pure link extraction over parsed album and song pages.
//!
//! None of these functions perform I/O; they operate on a [`scraper::Html`]
//! tree produced by [`Page::document`](crate::download::Page::document).

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::SongReference;

/// Path fragment that marks a direct-download link on a song page.
pub const DOWNLOAD_LINK_MARKER: &str = "/soundtracks/";

/// Format labels recognized in the song table header.
const KNOWN_FORMATS: &[&str] = &["MP3", "FLAC", "OGG", "M4A", "AAC", "WAV", "OPUS", "ALAC"];

static SONG_ROW: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector("table#songlist tr"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("a"));
static DOWNLOAD_LINK: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector(&format!("a[href*='{DOWNLOAD_LINK_MARKER}']")));
static ALBUM_TITLE: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector("#pageContent h2"));
static FORMAT_HEADER: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector("table#songlist tr#songlist_header th"));

/// Compiles a selector that is known to be valid at build time.
///
/// # Panics
///
/// Panics if `selector` is invalid. Only call this with literals.
fn compile_static_selector(selector: &str) -> Selector {
    Selector::parse(selector).unwrap_or_else(|e| panic!("invalid static selector '{selector}': {e}"))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Returns one reference per song-table row that holds a linked anchor.
///
/// The first anchor of each row supplies both the link target and the
/// display name. Rows without an anchor, or whose first anchor has no
/// `href`, are skipped. Duplicate links are kept.
#[must_use]
pub fn extract_song_references(album: &Html) -> Vec<SongReference> {
    album
        .select(&SONG_ROW)
        .filter_map(|row| row.select(&ANCHOR).next())
        .filter_map(|anchor| {
            anchor
                .value()
                .attr("href")
                .map(|href| (href.to_string(), element_text(anchor)))
        })
        .enumerate()
        .map(|(index, (href, name))| SongReference { href, name, index })
        .collect()
}

/// Returns the `href` of the first direct-download link on a song page.
///
/// `None` means the page has no such link; the caller decides how to report it.
#[must_use]
pub fn extract_download_url(song: &Html) -> Option<String> {
    song.select(&DOWNLOAD_LINK)
        .next()
        .and_then(|anchor| anchor.value().attr("href"))
        .map(str::to_string)
}

/// Album title from the first heading of the page content.
#[must_use]
pub fn extract_album_name(album: &Html) -> Option<String> {
    album
        .select(&ALBUM_TITLE)
        .next()
        .map(element_text)
        .filter(|name| !name.is_empty())
}

/// Format labels (`MP3`, `FLAC`, ...) advertised as columns of the song table.
#[must_use]
pub fn extract_formats(album: &Html) -> Vec<String> {
    let mut formats: Vec<String> = Vec::new();
    for cell in album.select(&FORMAT_HEADER) {
        let label = element_text(cell).to_ascii_uppercase();
        if KNOWN_FORMATS.contains(&label.as_str()) && !formats.contains(&label) {
            formats.push(label);
        }
    }
    formats
}
