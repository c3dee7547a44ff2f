//! Soundtrack Downloader Core Library
//!
//! This library discovers every track linked from a soundtrack album page and
//! downloads the resolved audio files concurrently to a local directory.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`album`] - Album/song data model, link extraction, song resolution and
//!   concurrent album discovery
//! - [`download`] - HTTP client, filename sanitization and the bounded
//!   download engine
//! - [`pool`] - Shared bounded worker pool used by both pipeline stages
//!
//! Per-item failures (one unresolvable song page, one failing file) are
//! logged and skipped; only the album page fetch and destination directory
//! creation abort a run.

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod album;
pub mod download;
pub mod pool;
#[cfg(test)]
pub mod test_support;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use album::{
    Album, AlbumDiscoverer, DiscoveryError, DiscoveryOptions, File, ResolveError, Song,
    SongOrder, SongReference, SongResolutionError, SongResolver,
};
pub use download::{
    DEFAULT_CONCURRENCY, DEFAULT_FILE_EXTENSION, DEFAULT_PAUSE_BETWEEN_DOWNLOADS, DownloadEngine,
    DownloadError, DownloadOptions, DownloadStats, EngineError, HttpClient, sanitize_filename,
};
pub use pool::WorkerPool;
