//! CLI entry point for the soundtrack downloader.

use anyhow::{Context, Result};
use soundtrack_core::{AlbumDiscoverer, DownloadEngine, HttpClient};
use tracing::{debug, info};

mod app_config;
mod cli;
mod config_runtime;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let (args, cli_sources) = cli::parse_with_sources();

    let loaded = app_config::load_file_config(args.config.as_deref())?;
    let args = config_runtime::apply_config_defaults(args, &cli_sources, loaded.config.as_ref());

    // Priority: RUST_LOG env var > CLI flags > config verbosity > default (info)
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config_runtime::default_log_level(&args)));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");
    if let Some(path) = &loaded.path {
        debug!(path = %path.display(), loaded = loaded.config.is_some(), "config file");
    }
    info!(album = %args.album_url, "soundtrack-dl starting");

    let (connect_timeout, request_timeout) = config_runtime::http_timeouts(&args);
    let client = HttpClient::with_timeouts(connect_timeout, request_timeout);

    let discoverer = AlbumDiscoverer::new(client.clone(), config_runtime::discovery_options(&args))?;
    let album = discoverer
        .discover(&args.album_url)
        .await
        .with_context(|| format!("Failed to parse album '{}'", args.album_url))?;

    info!(
        album = album.name.as_deref().unwrap_or(&album.url),
        songs = album.songs.len(),
        "album parsed"
    );

    let engine = DownloadEngine::new(config_runtime::download_options(&args))?;
    let stats = engine
        .download_all(&album.songs, &client, &args.output_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to prepare destination '{}'",
                args.output_dir.display()
            )
        })?;

    info!(
        completed = stats.completed(),
        failed = stats.failed(),
        total = stats.total(),
        "Download finished"
    );
    println!("Download complete.");

    Ok(())
}
