//! Album data model and concurrent album discovery.
//!
//! Discovery fetches the album page, extracts one [`SongReference`] per song
//! row, then resolves every song page into a [`Song`] carrying its direct
//! download URL. A song that cannot be resolved is logged and left out.
//!
//! # Example
//!
//! ```no_run
//! use soundtrack_core::album::{AlbumDiscoverer, DiscoveryOptions};
//! use soundtrack_core::download::HttpClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let discoverer = AlbumDiscoverer::new(HttpClient::new(), DiscoveryOptions::default())?;
//! let album = discoverer.discover("https://example.com/game-soundtracks/album/ost").await?;
//! println!("{} songs resolved", album.songs.len());
//! # Ok(())
//! # }
//! ```

mod discover;
mod error;
pub mod extract;
mod resolver;

pub use discover::{AlbumDiscoverer, DiscoveryOptions, SongOrder};
pub use error::{DiscoveryError, ResolveError, SongResolutionError};
pub use resolver::SongResolver;

use crate::download::target_filename;

/// A soundtrack album, identified by the URL of its page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    /// Album page URL.
    pub url: String,
    /// Album title from the page heading, when present.
    pub name: Option<String>,
    /// Successfully resolved songs.
    pub songs: Vec<Song>,
    /// Download formats advertised by the song table header (e.g. `MP3`, `FLAC`).
    pub formats: Vec<String>,
}

impl Album {
    /// Creates an empty album for the given page URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: None,
            songs: Vec::new(),
            formats: Vec::new(),
        }
    }
}

/// A song row found on the album page, before its own page is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongReference {
    /// Link target as written in the page; may be relative.
    pub href: String,
    /// Display name (anchor text, trimmed).
    pub name: String,
    /// Zero-based position among the album page's song rows.
    pub index: usize,
}

/// A resolved song.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    /// Song page URL.
    pub url: String,
    /// Direct download URL found on the song page.
    pub download_url: String,
    /// Display name from the album page.
    pub name: String,
    /// Position of the song row on the album page.
    pub track_index: usize,
    /// Additional per-format files. Not populated yet; the download stage
    /// uses [`Song::file`].
    pub files: Vec<File>,
}

impl Song {
    /// The file the download stage writes for this song.
    #[must_use]
    pub fn file(&self, extension: &str) -> File {
        File {
            url: self.download_url.clone(),
            filename: target_filename(&self.name, extension),
        }
    }
}

/// A downloadable file and the sanitized name it is saved under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub url: String,
    pub filename: String,
}
