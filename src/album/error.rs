//! Error types for song resolution and album discovery.

use thiserror::Error;

use crate::download::DownloadError;

/// Why a single song page could not be turned into a download URL.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The song page could not be fetched or parsed.
    #[error("failed to fetch song page: {0}")]
    Fetch(#[from] DownloadError),

    /// The song page has no download link.
    #[error("no download link found on {url}")]
    LinkNotFound {
        /// Song page URL.
        url: String,
    },

    /// A link could not be resolved to an absolute URL.
    #[error("invalid link '{href}' relative to {base}")]
    InvalidLink {
        /// Link target as written in the page.
        href: String,
        /// URL it was resolved against.
        base: String,
    },
}

impl ResolveError {
    /// Creates a link-not-found error.
    pub fn link_not_found(url: impl Into<String>) -> Self {
        Self::LinkNotFound { url: url.into() }
    }

    /// Creates an invalid-link error.
    pub fn invalid_link(href: impl Into<String>, base: impl Into<String>) -> Self {
        Self::InvalidLink {
            href: href.into(),
            base: base.into(),
        }
    }
}

/// A failed song, tagged with its display name.
#[derive(Debug, Error)]
#[error("failed to resolve song '{song_name}': {cause}")]
pub struct SongResolutionError {
    /// Display name from the album page.
    pub song_name: String,
    /// What went wrong.
    #[source]
    pub cause: ResolveError,
}

impl SongResolutionError {
    /// Tags a resolve failure with the song it belongs to.
    pub fn new(song_name: impl Into<String>, cause: ResolveError) -> Self {
        Self {
            song_name: song_name.into(),
            cause,
        }
    }
}

/// Errors that abort album discovery.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The album URL could not be parsed.
    #[error("invalid album URL: {url}")]
    InvalidAlbumUrl {
        /// The URL as given.
        url: String,
    },

    /// The album page could not be fetched or parsed.
    #[error("failed to fetch album page: {0}")]
    AlbumPage(#[from] DownloadError),

    /// Invalid discovery concurrency.
    #[error("invalid discovery concurrency {value}: must be at least 1")]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },
}
