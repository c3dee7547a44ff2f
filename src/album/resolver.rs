//! Resolution of a single song page into a downloadable [`Song`].

use tracing::{debug, instrument};
use url::Url;

use super::error::{ResolveError, SongResolutionError};
use super::extract::extract_download_url;
use super::{Song, SongReference};
use crate::download::HttpClient;

/// Turns song references into resolved songs, one page fetch each.
///
/// Relative song links are joined against the album page URL, so a
/// root-relative `/album/x/01.mp3` lands on the album's origin.
#[derive(Debug, Clone)]
pub struct SongResolver {
    client: HttpClient,
    base: Url,
}

impl SongResolver {
    /// Creates a resolver that joins relative links against `base`.
    #[must_use]
    pub fn new(client: HttpClient, base: Url) -> Self {
        Self { client, base }
    }

    /// Fetches the song page and extracts its direct download URL.
    ///
    /// Performs exactly one page fetch and no disk I/O.
    ///
    /// # Errors
    ///
    /// Returns [`SongResolutionError`] naming the song when the link is
    /// malformed, the page cannot be fetched, or it has no download link.
    #[instrument(skip(self, reference), fields(song = %reference.name, index = reference.index))]
    pub async fn resolve(&self, reference: SongReference) -> Result<Song, SongResolutionError> {
        match self.resolve_reference(&reference).await {
            Ok((page_url, download_url)) => {
                debug!(%download_url, "resolved song");
                Ok(Song {
                    url: page_url,
                    download_url,
                    name: reference.name,
                    track_index: reference.index,
                    files: Vec::new(),
                })
            }
            Err(cause) => Err(SongResolutionError::new(reference.name, cause)),
        }
    }

    /// Returns `(song page URL, download URL)`.
    ///
    /// The download href is joined against the URL the song page was
    /// finally served from, so redirects are honored.
    async fn resolve_reference(
        &self,
        reference: &SongReference,
    ) -> Result<(String, String), ResolveError> {
        let page_url = self
            .base
            .join(&reference.href)
            .map_err(|_| ResolveError::invalid_link(&reference.href, self.base.as_str()))?;

        let page = self.client.fetch_page(page_url.as_str()).await?;

        let href = extract_download_url(&page.document())
            .ok_or_else(|| ResolveError::link_not_found(page_url.as_str()))?;
        let download_url = page
            .url()
            .join(&href)
            .map_err(|_| ResolveError::invalid_link(&href, page.url().as_str()))?;

        Ok((page_url.into(), download_url.into()))
    }
}
