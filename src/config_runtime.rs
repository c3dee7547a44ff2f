//! Merging of config-file defaults into parsed CLI arguments.

use std::time::Duration;

use soundtrack_core::{DiscoveryOptions, DownloadOptions, SongOrder};

use crate::app_config::{FileConfig, VerbositySetting};
use crate::cli::{Args, CliValueSources};

/// Applies file values to every option not given on the command line.
pub fn apply_config_defaults(
    mut args: Args,
    cli_sources: &CliValueSources,
    file_config: Option<&FileConfig>,
) -> Args {
    let Some(file_config) = file_config else {
        return args;
    };

    if !cli_sources.output_dir
        && let Some(output_dir) = &file_config.output_dir
    {
        args.output_dir.clone_from(output_dir);
    }

    if !cli_sources.concurrency
        && let Some(concurrency) = file_config.concurrency
    {
        args.concurrency = concurrency;
    }

    if !cli_sources.discovery_concurrency
        && let Some(discovery_concurrency) = file_config.discovery_concurrency
    {
        args.discovery_concurrency = discovery_concurrency;
    }

    if !cli_sources.pause_ms
        && let Some(pause_ms) = file_config.pause_ms
    {
        args.pause_ms = pause_ms;
    }

    if !cli_sources.extension
        && let Some(extension) = &file_config.extension
    {
        args.extension.clone_from(extension);
    }

    if !cli_sources.timeout
        && let Some(timeout_secs) = file_config.timeout_secs
    {
        args.timeout = timeout_secs;
    }

    if !cli_sources.connect_timeout
        && let Some(connect_timeout_secs) = file_config.connect_timeout_secs
    {
        args.connect_timeout = connect_timeout_secs;
    }

    if !cli_sources.completion_order
        && let Some(completion_order) = file_config.completion_order
    {
        args.completion_order = completion_order;
    }

    if !cli_sources.verbose
        && !cli_sources.quiet
        && let Some(verbosity) = file_config.verbosity
    {
        apply_config_verbosity(&mut args, verbosity);
    }

    args
}

fn apply_config_verbosity(args: &mut Args, verbosity: VerbositySetting) {
    let (verbose, quiet) = match verbosity {
        VerbositySetting::Default => (0, false),
        VerbositySetting::Verbose => (1, false),
        VerbositySetting::Debug => (2, false),
        VerbositySetting::Quiet => (0, true),
    };
    args.verbose = verbose;
    args.quiet = quiet;
}

/// Log level used when `RUST_LOG` is not set.
#[must_use]
pub fn default_log_level(args: &Args) -> &'static str {
    if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

fn secs(value: u64) -> Option<Duration> {
    (value > 0).then(|| Duration::from_secs(value))
}

/// `(connect, request)` timeouts; zero means none.
#[must_use]
pub fn http_timeouts(args: &Args) -> (Option<Duration>, Option<Duration>) {
    (secs(args.connect_timeout), secs(args.timeout))
}

#[must_use]
pub fn discovery_options(args: &Args) -> DiscoveryOptions {
    DiscoveryOptions {
        concurrency: (args.discovery_concurrency > 0).then(|| usize::from(args.discovery_concurrency)),
        order: if args.completion_order {
            SongOrder::Completion
        } else {
            SongOrder::PageOrder
        },
    }
}

#[must_use]
pub fn download_options(args: &Args) -> DownloadOptions {
    DownloadOptions {
        concurrency: usize::from(args.concurrency),
        pause_between_downloads: Duration::from_millis(args.pause_ms),
        file_extension: args.extension.clone(),
    }
}
