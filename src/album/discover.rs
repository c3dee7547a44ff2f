//! Concurrent album discovery.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use url::Url;

use super::error::DiscoveryError;
use super::extract::{extract_album_name, extract_formats, extract_song_references};
use super::{Album, SongResolver};
use crate::download::HttpClient;
use crate::pool::WorkerPool;

/// Order of songs in the discovered album.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SongOrder {
    /// Order of the rows on the album page.
    #[default]
    PageOrder,
    /// Order in which song pages finished resolving.
    Completion,
}

/// Tuning for album discovery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryOptions {
    /// Maximum concurrent song page fetches. `None` starts one task per song.
    pub concurrency: Option<usize>,
    /// How resolved songs are ordered in the album.
    pub order: SongOrder,
}

/// Fetches an album page and resolves all of its songs concurrently.
#[derive(Debug, Clone)]
pub struct AlbumDiscoverer {
    client: HttpClient,
    options: DiscoveryOptions,
}

impl AlbumDiscoverer {
    /// Creates a discoverer.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::InvalidConcurrency`] for `Some(0)`.
    pub fn new(client: HttpClient, options: DiscoveryOptions) -> Result<Self, DiscoveryError> {
        if let Some(0) = options.concurrency {
            return Err(DiscoveryError::InvalidConcurrency { value: 0 });
        }
        Ok(Self { client, options })
    }

    /// Discovers every resolvable song on the album page.
    ///
    /// Songs whose page cannot be fetched or has no download link are logged
    /// with their name and the cause, then dropped. The returned album may
    /// therefore hold fewer songs than the page lists, possibly none.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::InvalidAlbumUrl`] if `album_url` does not
    /// parse, and [`DiscoveryError::AlbumPage`] if the album page itself
    /// cannot be fetched or parsed.
    #[instrument(skip(self))]
    pub async fn discover(&self, album_url: &str) -> Result<Album, DiscoveryError> {
        let base = Url::parse(album_url).map_err(|_| DiscoveryError::InvalidAlbumUrl {
            url: album_url.to_string(),
        })?;

        let page = self.client.fetch_page(album_url).await?;

        let mut album = Album::new(album_url);
        let references = {
            let document = page.document();
            album.name = extract_album_name(&document);
            album.formats = extract_formats(&document);
            extract_song_references(&document)
        };

        let total = references.len();
        info!(
            songs = total,
            name = album.name.as_deref().unwrap_or(""),
            formats = ?album.formats,
            "found song references"
        );

        let workers = self.options.concurrency.unwrap_or(total);
        debug!(workers, "resolving song pages");

        let resolver = Arc::new(SongResolver::new(self.client.clone(), base));
        let mut run = WorkerPool::new(workers).spawn(references, move |reference| {
            let resolver = Arc::clone(&resolver);
            async move { resolver.resolve(reference).await }
        });

        let mut failed = 0usize;
        while let Some(outcome) = run.next().await {
            match outcome {
                Ok(song) => album.songs.push(song),
                Err(e) => {
                    failed += 1;
                    warn!(song = %e.song_name, error = %e.cause, "failed to resolve song");
                }
            }
        }
        run.join().await;

        if self.options.order == SongOrder::PageOrder {
            album.songs.sort_by_key(|song| song.track_index);
        }

        info!(
            resolved = album.songs.len(),
            failed,
            total,
            "album discovery complete"
        );

        Ok(album)
    }
}
