//! HTTP client wrapper for fetching pages and downloading files.
//!
//! This module provides the `HttpClient` struct used by both pipeline stages:
//! discovery fetches HTML pages through [`HttpClient::fetch_page`], the
//! download stage streams raw bytes to disk through
//! [`HttpClient::download_to_path`].

use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use scraper::Html;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument, trace};
use url::Url;

use super::constants::HTML_ACCEPT;
use super::error::DownloadError;
use crate::user_agent;

/// HTTP client for page fetches and streaming downloads.
///
/// This client is designed to be created once and cloned into every task,
/// taking advantage of connection pooling.
///
/// # Example
///
/// ```no_run
/// use soundtrack_core::download::HttpClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new();
/// let page = client.fetch_page("https://example.com/album/ost").await?;
/// println!("Fetched {} bytes of HTML", page.body().len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

/// A fetched HTML page: final URL plus the response body.
#[derive(Debug, Clone)]
pub struct Page {
    url: Url,
    body: String,
}

impl Page {
    /// Creates a page from an already available body.
    #[must_use]
    pub fn new(url: Url, body: impl Into<String>) -> Self {
        Self {
            url,
            body: body.into(),
        }
    }

    /// URL the response was served from, after any redirects.
    ///
    /// Relative links on the page resolve against it.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Raw response body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Parses the body into a navigable document tree.
    ///
    /// The tree is built on demand so it never has to cross an await point.
    #[must_use]
    pub fn document(&self) -> Html {
        Html::parse_document(&self.body)
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client with no deadline on any request.
    ///
    /// A hung server stalls the calling task until the OS gives up on the
    /// socket; use [`with_timeouts`](Self::with_timeouts) to bound requests.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::with_timeouts(None, None)
    }

    /// Creates a new HTTP client with optional connect and whole-request timeouts.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// timeout configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_timeouts(
        connect_timeout: Option<Duration>,
        request_timeout: Option<Duration>,
    ) -> Self {
        let mut builder = Client::builder()
            .gzip(true)
            .user_agent(user_agent::default_user_agent());
        if let Some(timeout) = connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Fetches an HTML page.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The URL is invalid
    /// - The request fails (network error, timeout)
    /// - The server answers with anything other than `200 OK`
    /// - The body cannot be decoded as text, or is binary data
    ///
    /// The `Content-Type` header is not consulted.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_page(&self, url: &str) -> Result<Page, DownloadError> {
        Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        let response = self.get_ok(url, Some(HTML_ACCEPT)).await?;
        let final_url = response.url().clone();
        if final_url.as_str() != url {
            debug!(final_url = %final_url, "followed redirect");
        }

        let body = response.text().await.map_err(|e| {
            if e.is_decode() {
                DownloadError::parse(url, format!("body could not be decoded: {e}"))
            } else {
                DownloadError::network(url, e)
            }
        })?;

        if is_binary_body(&body) {
            return Err(DownloadError::parse(url, "body is binary data, not a document"));
        }

        debug!(bytes = body.len(), "page fetched");
        Ok(Page::new(final_url, body))
    }

    /// Streams the body at `url` into `path`, returning the bytes written.
    ///
    /// An existing file at `path` is truncated and overwritten. If the
    /// transfer fails after the file was created, the partial file is removed.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The URL is invalid
    /// - The request fails (network error, timeout)
    /// - The server answers with anything other than `200 OK`
    /// - Creating or writing the file fails
    #[instrument(skip(self), fields(url = %url, path = %path.display()))]
    pub async fn download_to_path(&self, url: &str, path: &Path) -> Result<u64, DownloadError> {
        Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        let response = self.get_ok(url, None).await?;

        let mut file = File::create(path)
            .await
            .map_err(|e| DownloadError::io(path, e))?;

        let stream_result = stream_to_file(&mut file, response, url, path).await;
        if stream_result.is_err() {
            debug!(path = %path.display(), "cleaning up partial file after error");
            drop(file);
            let _ = tokio::fs::remove_file(path).await;
        }
        let bytes_written = stream_result?;

        debug!(bytes = bytes_written, "download complete");
        Ok(bytes_written)
    }

    /// Sends a GET and rejects every status other than `200 OK`.
    async fn get_ok(
        &self,
        url: &str,
        accept: Option<&str>,
    ) -> Result<reqwest::Response, DownloadError> {
        let mut request = self.client.get(url);
        if let Some(accept) = accept {
            request = request.header(ACCEPT, accept);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DownloadError::network(url, e))?;

        let status = response.status();
        trace!(status = status.as_u16(), "response received");
        if status != StatusCode::OK {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        Ok(response)
    }
}

/// Streams response body to file, returning bytes written.
///
/// Split out so the caller can clean up on error.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::network(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(file_path, e))?;

        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(file_path, e))?;

    Ok(bytes_written)
}

/// Markup never carries NUL characters; archives and audio almost always do.
fn is_binary_body(body: &str) -> bool {
    body.contains('\0')
}
