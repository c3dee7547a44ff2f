//! HTTP fetching and the bounded download stage.
//!
//! This module provides the page/file fetching client shared by discovery and
//! download, the filename sanitizer, and the [`DownloadEngine`] that drains a
//! resolved song list through a fixed number of workers.
//!
//! # Features
//!
//! - Streaming downloads (memory-efficient for large files)
//! - Strict `200 OK` status validation on every request
//! - Optional connect/request timeouts (no deadline unless configured)
//! - Structured error types with full context
//! - Partial file cleanup when a transfer fails midway
//!
//! # Example
//!
//! ```no_run
//! use soundtrack_core::download::HttpClient;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new();
//! let bytes = client
//!     .download_to_path("https://example.com/01.mp3", Path::new("./downloads/01.mp3"))
//!     .await?;
//! println!("Downloaded {bytes} bytes");
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod engine;
mod error;
mod filename;

pub use client::{HttpClient, Page};
pub use constants::{DEFAULT_FILE_EXTENSION, DEFAULT_PAUSE_BETWEEN_DOWNLOADS};
pub use engine::{DEFAULT_CONCURRENCY, DownloadEngine, DownloadOptions, DownloadStats, EngineError};
pub use error::DownloadError;
pub use filename::{sanitize_filename, target_filename};

// Note: we do NOT define module-local Result aliases.
// Use `Result<T, DownloadError>` explicitly in function signatures.
