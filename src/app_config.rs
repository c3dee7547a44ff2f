//! Application configuration loading for CLI defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

/// TOML-backed file configuration for CLI defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    /// Default output directory for downloads.
    pub output_dir: Option<PathBuf>,
    /// Default download concurrency (same range as CLI).
    pub concurrency: Option<u8>,
    /// Default discovery concurrency; 0 means one task per song.
    pub discovery_concurrency: Option<u16>,
    /// Pause between downloads per worker, in milliseconds.
    pub pause_ms: Option<u64>,
    /// Extension appended to song names.
    pub extension: Option<String>,
    /// Request timeout in seconds; 0 disables it.
    pub timeout_secs: Option<u64>,
    /// Connect timeout in seconds; 0 disables it.
    pub connect_timeout_secs: Option<u64>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
    /// Keep discovery completion order instead of page order.
    pub completion_order: Option<bool>,
}

impl FileConfig {
    /// Validates config values against runtime and CLI constraints.
    pub fn validate(&self) -> Result<()> {
        if let Some(concurrency) = self.concurrency
            && !(1..=100).contains(&concurrency)
        {
            bail!("Invalid config value for `concurrency`: {concurrency}. Expected range: 1..=100");
        }

        if let Some(pause_ms) = self.pause_ms
            && pause_ms > 60_000
        {
            bail!("Invalid config value for `pause_ms`: {pause_ms}. Expected range: 0..=60000");
        }

        if let Some(extension) = &self.extension
            && extension.trim().is_empty()
        {
            bail!("Invalid config value for `extension`: must not be empty");
        }

        validate_timeout_secs("timeout_secs", self.timeout_secs)?;
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;

        Ok(())
    }
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if value > 3600 {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 0..=3600");
    }
    Ok(())
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Config path that was consulted, if any could be resolved.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/soundtrack-dl/config.toml`
/// 2. `$HOME/.config/soundtrack-dl/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("soundtrack-dl")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("soundtrack-dl")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads the config file.
///
/// An explicit path must exist. Without one, the default path is used
/// when the file is present and silently skipped otherwise.
pub fn load_file_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        let config = read_config_file(path)?;
        return Ok(LoadedConfig {
            path: Some(path.to_path_buf()),
            config: Some(config),
        });
    }

    let path = resolve_default_config_path();
    let config = match path.as_deref() {
        Some(path_ref) if path_ref.exists() => Some(read_config_file(path_ref)?),
        _ => None,
    };
    Ok(LoadedConfig { path, config })
}

fn read_config_file(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!(
                "Invalid config syntax on line {}: expected key = value",
                line_index + 1
            );
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let invalid = || format!("Invalid `{key}` value on line {}", line_index + 1);

        match key {
            "output_dir" => {
                let parsed = parse_string_literal(value).with_context(invalid)?;
                cfg.output_dir = Some(PathBuf::from(parsed));
            }
            "concurrency" => {
                let parsed = parse_integer_u64(value).with_context(invalid)?;
                let n = u8::try_from(parsed)
                    .map_err(|_| anyhow::anyhow!("Integer value out of range for u8"))
                    .with_context(invalid)?;
                cfg.concurrency = Some(n);
            }
            "discovery_concurrency" => {
                let parsed = parse_integer_u64(value).with_context(invalid)?;
                let n = u16::try_from(parsed)
                    .map_err(|_| anyhow::anyhow!("Integer value out of range for u16"))
                    .with_context(invalid)?;
                cfg.discovery_concurrency = Some(n);
            }
            "pause_ms" => {
                cfg.pause_ms = Some(parse_integer_u64(value).with_context(invalid)?);
            }
            "extension" => {
                cfg.extension = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "timeout_secs" => {
                cfg.timeout_secs = Some(parse_integer_u64(value).with_context(invalid)?);
            }
            "connect_timeout_secs" => {
                cfg.connect_timeout_secs = Some(parse_integer_u64(value).with_context(invalid)?);
            }
            "verbosity" => {
                let parsed = parse_string_literal(value).with_context(invalid)?;
                cfg.verbosity = Some(parse_verbosity(&parsed).with_context(|| {
                    format!(
                        "Invalid `verbosity` value '{}' on line {}",
                        parsed,
                        line_index + 1
                    )
                })?);
            }
            "completion_order" => {
                cfg.completion_order = Some(parse_boolean(value).with_context(invalid)?);
            }
            unknown => {
                bail!(
                    "Unknown configuration key: '{}' on line {}",
                    unknown,
                    line_index + 1
                );
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}

fn parse_verbosity(value: &str) -> Result<VerbositySetting> {
    match value {
        "default" => Ok(VerbositySetting::Default),
        "verbose" => Ok(VerbositySetting::Verbose),
        "quiet" => Ok(VerbositySetting::Quiet),
        "debug" => Ok(VerbositySetting::Debug),
        _ => bail!("Expected one of: default, verbose, quiet, debug"),
    }
}

fn parse_boolean(raw_value: &str) -> Result<bool> {
    match raw_value.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => bail!("Expected 'true' or 'false'"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_full() {
        let cfg = parse_config_str(
            r#"
# soundtrack-dl defaults
output_dir = "/srv/music/ost"
concurrency = 8
discovery_concurrency = 16
pause_ms = 250
extension = ".flac"
timeout_secs = 60
connect_timeout_secs = 10
verbosity = "verbose"
completion_order = true
"#,
        )
        .expect("full config should parse");
        assert_eq!(cfg.output_dir, Some(PathBuf::from("/srv/music/ost")));
        assert_eq!(cfg.concurrency, Some(8));
        assert_eq!(cfg.discovery_concurrency, Some(16));
        assert_eq!(cfg.pause_ms, Some(250));
        assert_eq!(cfg.extension.as_deref(), Some(".flac"));
        assert_eq!(cfg.timeout_secs, Some(60));
        assert_eq!(cfg.connect_timeout_secs, Some(10));
        assert_eq!(cfg.verbosity, Some(VerbositySetting::Verbose));
        assert_eq!(cfg.completion_order, Some(true));
    }

    #[test]
    fn test_parse_config_partial_fields() {
        let cfg = parse_config_str("concurrency = 3").expect("partial config should parse");
        assert_eq!(cfg.concurrency, Some(3));
        assert!(cfg.output_dir.is_none());
        assert!(cfg.verbosity.is_none());
    }

    #[test]
    fn test_parse_config_empty_is_default() {
        let cfg = parse_config_str("\n# only a comment\n").expect("empty config should parse");
        assert_eq!(cfg, FileConfig::default());
    }

    #[test]
    fn test_parse_config_rejects_invalid_concurrency() {
        for raw in ["concurrency = 0", "concurrency = 101", "concurrency = 300"] {
            let err = parse_config_str(raw).expect_err("invalid concurrency expected");
            assert!(
                format!("{err:#}").contains("concurrency"),
                "expected concurrency error for {raw}: {err:#}"
            );
        }
    }

    #[test]
    fn test_parse_config_rejects_invalid_pause() {
        let err = parse_config_str("pause_ms = 60001").expect_err("invalid pause expected");
        assert!(err.to_string().contains("pause_ms"));
    }

    #[test]
    fn test_parse_config_rejects_invalid_timeout_value() {
        let err = parse_config_str("timeout_secs = 3601").expect_err("invalid timeout expected");
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_parse_config_rejects_empty_extension() {
        let err = parse_config_str(r#"extension = """#).expect_err("empty extension expected");
        assert!(err.to_string().contains("extension"));
    }

    #[test]
    fn test_parse_config_rejects_unquoted_string() {
        let err = parse_config_str("output_dir = /tmp").expect_err("unquoted string expected");
        assert!(err.to_string().contains("output_dir"));
    }

    #[test]
    fn test_parse_config_rejects_numeric_values_with_trailing_tokens() {
        let err = parse_config_str("concurrency = 4 trailing")
            .expect_err("expected trailing token error");
        assert!(err.to_string().contains("concurrency"));
    }

    #[test]
    fn test_parse_config_rejects_negative_values() {
        let err = parse_config_str("pause_ms = -5").expect_err("negative value expected");
        assert!(err.to_string().contains("pause_ms"));
    }

    #[test]
    fn test_parse_config_supports_inline_comments() {
        let cfg = parse_config_str(
            r##"
concurrency = 4 # workers
output_dir = "/tmp/#ost" # hash inside quotes is kept
"##,
        )
        .expect("config with comments should parse");
        assert_eq!(cfg.concurrency, Some(4));
        assert_eq!(cfg.output_dir, Some(PathBuf::from("/tmp/#ost")));
    }

    #[test]
    fn test_parse_config_rejects_invalid_boolean() {
        let err = parse_config_str("completion_order = yes").expect_err("invalid boolean expected");
        assert!(err.to_string().contains("completion_order"));
    }

    #[test]
    fn test_parse_config_rejects_missing_equals() {
        let err = parse_config_str("concurrency 4").expect_err("syntax error expected");
        assert!(err.to_string().contains("expected key = value"));
    }

    #[test]
    fn test_parse_config_rejects_unknown_keys() {
        let err = parse_config_str("unknown_key = 123").expect_err("unknown key error expected");
        assert!(err.to_string().contains("Unknown configuration key"));
        assert!(err.to_string().contains("unknown_key"));
    }

    #[test]
    fn test_load_file_config_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "concurrency = 2\n").unwrap();

        let loaded = load_file_config(Some(&path)).unwrap();
        assert_eq!(loaded.path.as_deref(), Some(path.as_path()));
        assert_eq!(loaded.config.unwrap().concurrency, Some(2));
    }

    #[test]
    fn test_load_file_config_explicit_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let err = load_file_config(Some(&path)).expect_err("missing explicit config must fail");
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_load_file_config_reports_parse_location() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "bogus = 1\n").unwrap();

        let err = load_file_config(Some(&path)).expect_err("bad config must fail");
        let chain = format!("{err:#}");
        assert!(chain.contains("Failed to parse config file"), "{chain}");
        assert!(chain.contains("bogus"), "{chain}");
    }
}
