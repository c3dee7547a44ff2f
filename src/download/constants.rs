//! Constants for the download module (politeness pause, file naming).

use std::time::Duration;

/// Pause each download worker takes after every attempt (100 milliseconds).
pub const DEFAULT_PAUSE_BETWEEN_DOWNLOADS: Duration = Duration::from_millis(100);

/// Extension appended to every song name to form its file name.
pub const DEFAULT_FILE_EXTENSION: &str = ".mp3";

/// Accept header sent when fetching HTML listing pages.
pub(crate) const HTML_ACCEPT: &str = "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8";
