//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::parser::ValueSource;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};

use soundtrack_core::{DEFAULT_CONCURRENCY, DEFAULT_FILE_EXTENSION};

/// Download every track of a soundtrack album.
///
/// Fetches the album page, resolves each song page to its direct download
/// link, then downloads the files into a local directory with a bounded
/// number of workers. Songs that fail are logged and skipped.
#[derive(Parser, Debug)]
#[command(name = "soundtrack-dl")]
#[command(author, version, about)]
pub struct Args {
    /// Album page URL
    #[arg(value_name = "ALBUM_URL")]
    pub album_url: String,

    /// Directory the files are written to (created if missing)
    #[arg(short = 'o', long, default_value = "./downloads")]
    pub output_dir: PathBuf,

    /// Maximum concurrent downloads (1-100)
    #[arg(short = 'c', long, default_value_t = DEFAULT_CONCURRENCY as u8, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub concurrency: u8,

    /// Maximum concurrent song page fetches during discovery (0 = one per song)
    #[arg(long, default_value_t = 0)]
    pub discovery_concurrency: u16,

    /// Pause each download worker takes between files, in milliseconds (max 60000)
    #[arg(short = 'p', long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(0..=60000))]
    pub pause_ms: u64,

    /// Extension appended to each song name
    #[arg(long, default_value = DEFAULT_FILE_EXTENSION)]
    pub extension: String,

    /// Per-request timeout in seconds (0 = no timeout, max 3600)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u64).range(0..=3600))]
    pub timeout: u64,

    /// Connect timeout in seconds (0 = no timeout, max 3600)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u64).range(0..=3600))]
    pub connect_timeout: u64,

    /// Keep songs in the order their pages resolved instead of page order
    #[arg(long)]
    pub completion_order: bool,

    /// Config file path (defaults to $XDG_CONFIG_HOME/soundtrack-dl/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

/// Which options were given explicitly on the command line.
///
/// Explicit values always win over config-file values.
#[derive(Debug, Clone, Copy, Default)]
pub struct CliValueSources {
    pub output_dir: bool,
    pub concurrency: bool,
    pub discovery_concurrency: bool,
    pub pause_ms: bool,
    pub extension: bool,
    pub timeout: bool,
    pub connect_timeout: bool,
    pub completion_order: bool,
    pub verbose: bool,
    pub quiet: bool,
}

impl CliValueSources {
    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            output_dir: is_commandline_value(matches, "output_dir"),
            concurrency: is_commandline_value(matches, "concurrency"),
            discovery_concurrency: is_commandline_value(matches, "discovery_concurrency"),
            pause_ms: is_commandline_value(matches, "pause_ms"),
            extension: is_commandline_value(matches, "extension"),
            timeout: is_commandline_value(matches, "timeout"),
            connect_timeout: is_commandline_value(matches, "connect_timeout"),
            completion_order: is_commandline_value(matches, "completion_order"),
            verbose: is_commandline_value(matches, "verbose"),
            quiet: is_commandline_value(matches, "quiet"),
        }
    }
}

fn is_commandline_value(matches: &ArgMatches, id: &str) -> bool {
    matches.value_source(id) == Some(ValueSource::CommandLine)
}

/// Parses process arguments and records which ones were explicit.
///
/// Exits the process on `--help`, `--version` or invalid arguments.
pub fn parse_with_sources() -> (Args, CliValueSources) {
    let matches = Args::command().get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|err| err.exit());
    (args, CliValueSources::from_matches(&matches))
}
