//! Bounded download stage.
//!
//! The [`DownloadEngine`] takes the resolved song list, ensures the
//! destination directory exists, and drains the songs through a
//! [`WorkerPool`] of fixed size. Each worker pauses after every attempt so the
//! origin server sees a gentle request rate.
//!
//! # Example
//!
//! ```no_run
//! use soundtrack_core::download::{DownloadEngine, DownloadOptions, HttpClient};
//! use std::path::Path;
//!
//! # async fn example(songs: Vec<soundtrack_core::Song>) -> Result<(), Box<dyn std::error::Error>> {
//! let engine = DownloadEngine::new(DownloadOptions::default())?;
//! let client = HttpClient::new();
//! let stats = engine.download_all(&songs, &client, Path::new("./downloads")).await?;
//! println!("Completed: {}, Failed: {}", stats.completed(), stats.failed());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use super::HttpClient;
use super::constants::{DEFAULT_FILE_EXTENSION, DEFAULT_PAUSE_BETWEEN_DOWNLOADS};
use crate::album::{File, Song};
use crate::pool::WorkerPool;

/// Default number of concurrent download workers.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Error type for download engine operations.
///
/// Only setup problems surface here. Individual song failures are logged
/// and counted in [`DownloadStats`].
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Invalid concurrency value provided.
    #[error("invalid concurrency value {value}: must be at least 1")]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },

    /// The destination directory could not be created.
    #[error("failed to create destination directory {path}: {source}")]
    CreateDir {
        /// Directory that was requested.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Tuning for the download stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    /// Number of download workers.
    pub concurrency: usize,
    /// Pause each worker takes after every attempt.
    pub pause_between_downloads: Duration,
    /// Appended to the song name before sanitizing, e.g. `.mp3`.
    pub file_extension: String,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            pause_between_downloads: DEFAULT_PAUSE_BETWEEN_DOWNLOADS,
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
        }
    }
}

/// Statistics from a download run.
///
/// Uses atomic counters so concurrent workers can record outcomes.
#[derive(Debug, Default)]
pub struct DownloadStats {
    completed: AtomicUsize,
    failed: AtomicUsize,
}

impl DownloadStats {
    /// Creates a new stats tracker with zero counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of files written.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Returns the number of failed downloads.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    /// Returns the total number of songs attempted (completed + failed).
    #[must_use]
    pub fn total(&self) -> usize {
        self.completed() + self.failed()
    }

    fn increment_completed(&self) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }

    fn increment_failed(&self) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Downloads resolved songs with a fixed number of workers.
#[derive(Debug, Clone)]
pub struct DownloadEngine {
    options: DownloadOptions,
}

impl DownloadEngine {
    /// Creates a download engine.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConcurrency`] if `options.concurrency` is zero.
    #[instrument(level = "debug")]
    pub fn new(options: DownloadOptions) -> Result<Self, EngineError> {
        if options.concurrency == 0 {
            return Err(EngineError::InvalidConcurrency {
                value: options.concurrency,
            });
        }

        debug!(
            concurrency = options.concurrency,
            pause_ms = options.pause_between_downloads.as_millis(),
            extension = %options.file_extension,
            "creating download engine"
        );

        Ok(Self { options })
    }

    /// Returns the configured concurrency limit.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.options.concurrency
    }

    /// Downloads every song into `destination`.
    ///
    /// The directory (and any missing parents) is created before any worker
    /// starts. Each song is saved as `sanitize(name + extension)`; an existing
    /// file with that name is overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::CreateDir`] if the destination cannot be created.
    ///
    /// Individual download failures do NOT cause this method to error. They
    /// are logged with the song name and counted in the returned stats.
    #[instrument(skip(self, songs, client), fields(destination = %destination.display(), songs = songs.len()))]
    pub async fn download_all(
        &self,
        songs: &[Song],
        client: &HttpClient,
        destination: &Path,
    ) -> Result<DownloadStats, EngineError> {
        tokio::fs::create_dir_all(destination)
            .await
            .map_err(|source| EngineError::CreateDir {
                path: destination.to_path_buf(),
                source,
            })?;

        let stats = Arc::new(DownloadStats::new());
        let jobs: Vec<(String, File)> = songs
            .iter()
            .map(|song| (song.name.clone(), song.file(&self.options.file_extension)))
            .collect();

        info!(count = jobs.len(), "starting downloads");

        let pool = WorkerPool::new(self.options.concurrency)
            .with_pause(self.options.pause_between_downloads);
        let worker_stats = Arc::clone(&stats);
        let client = client.clone();
        let destination = destination.to_path_buf();

        pool.run(jobs, move |(song_name, file)| {
            let stats = Arc::clone(&worker_stats);
            let client = client.clone();
            let path = destination.join(&file.filename);
            async move {
                debug!(song = %song_name, url = %file.url, "downloading");
                match client.download_to_path(&file.url, &path).await {
                    Ok(bytes) => {
                        info!(song = %song_name, path = %path.display(), bytes, "download completed");
                        stats.increment_completed();
                    }
                    Err(e) => {
                        warn!(song = %song_name, error = %e, "failed to download song");
                        stats.increment_failed();
                    }
                }
            }
        })
        .await;

        let completed = stats.completed();
        let failed = stats.failed();
        info!(
            completed,
            failed,
            total = completed + failed,
            "downloads finished"
        );

        // Every worker has exited, so this is normally the only reference.
        match Arc::try_unwrap(stats) {
            Ok(stats) => Ok(stats),
            Err(shared) => {
                let snapshot = DownloadStats::new();
                snapshot.completed.store(shared.completed(), Ordering::SeqCst);
                snapshot.failed.store(shared.failed(), Ordering::SeqCst);
                Ok(snapshot)
            }
        }
    }
}
