//! Config file loading and CLI merge for the binary.
//!
//! Precedence: CLI flags, then the config file, then built-in defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use antweb_core::ScraperConfig;

use crate::cli::Args;

/// `key = value` file configuration. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub images_path: Option<String>,
    pub picture_path: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub connect_timeout_secs: Option<u64>,
    pub read_timeout_secs: Option<u64>,
    pub download_read_timeout_secs: Option<u64>,
    pub sidecar: Option<bool>,
}

impl FileConfig {
    /// Validates config values against runtime constraints.
    pub fn validate(&self) -> Result<()> {
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;
        validate_timeout_secs(
            "download_read_timeout_secs",
            self.download_read_timeout_secs,
        )?;
        Ok(())
    }
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600");
    }
    Ok(())
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/antweb-scraper/config.toml`
/// 2. `$HOME/.config/antweb-scraper/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("antweb-scraper")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("antweb-scraper")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Builds the runtime configuration from CLI args and an optional file.
///
/// An explicit `--config` path must exist; the default path is optional.
pub fn resolve_config(args: &Args) -> Result<ScraperConfig> {
    let file_config = match &args.config {
        Some(path) => Some(load_file_config(path)?),
        None => match resolve_default_config_path() {
            Some(path) if path.exists() => Some(load_file_config(&path)?),
            _ => None,
        },
    };

    let config = merge(args, file_config.unwrap_or_default());
    if !config.has_valid_base_url() {
        bail!(
            "Invalid base URL '{}': expected an absolute http(s) URL",
            config.base_url
        );
    }
    Ok(config)
}

fn merge(args: &Args, file: FileConfig) -> ScraperConfig {
    let defaults = ScraperConfig::default();
    ScraperConfig {
        base_url: args
            .base_url
            .clone()
            .or(file.base_url)
            .unwrap_or(defaults.base_url),
        images_path: file.images_path.unwrap_or(defaults.images_path),
        picture_path: file.picture_path.unwrap_or(defaults.picture_path),
        output_dir: args
            .output_dir
            .clone()
            .or(file.output_dir)
            .unwrap_or(defaults.output_dir),
        connect_timeout_secs: file
            .connect_timeout_secs
            .unwrap_or(defaults.connect_timeout_secs),
        read_timeout_secs: file
            .read_timeout_secs
            .unwrap_or(defaults.read_timeout_secs),
        download_read_timeout_secs: file
            .download_read_timeout_secs
            .unwrap_or(defaults.download_read_timeout_secs),
        sidecar: args.sidecar || file.sidecar.unwrap_or(defaults.sidecar),
    }
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    let config = parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
    config.validate()?;
    Ok(config)
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
        let line_no = line_index + 1;

        match key {
            "base_url" => {
                cfg.base_url = Some(string_value(key, value, line_no)?);
            }
            "images_path" => {
                cfg.images_path = Some(string_value(key, value, line_no)?);
            }
            "picture_path" => {
                cfg.picture_path = Some(string_value(key, value, line_no)?);
            }
            "output_dir" => {
                cfg.output_dir = Some(PathBuf::from(string_value(key, value, line_no)?));
            }
            "connect_timeout_secs" => {
                cfg.connect_timeout_secs = Some(integer_value(key, value, line_no)?);
            }
            "read_timeout_secs" => {
                cfg.read_timeout_secs = Some(integer_value(key, value, line_no)?);
            }
            "download_read_timeout_secs" => {
                cfg.download_read_timeout_secs = Some(integer_value(key, value, line_no)?);
            }
            "sidecar" => {
                let parsed = parse_boolean(value)
                    .with_context(|| format!("Invalid `sidecar` value on line {line_no}"))?;
                cfg.sidecar = Some(parsed);
            }
            other => bail!("Unknown config key `{other}` on line {line_no}"),
        }
    }
    Ok(cfg)
}

fn string_value(key: &str, value: &str, line_no: usize) -> Result<String> {
    parse_string_literal(value).with_context(|| format!("Invalid `{key}` value on line {line_no}"))
}

fn integer_value(key: &str, value: &str, line_no: usize) -> Result<u64> {
    value
        .parse::<u64>()
        .with_context(|| format!("Invalid `{key}` value on line {line_no}: expected an integer"))
}

/// Drops a `#` comment that is not inside a double-quoted string.
fn strip_inline_comment(line: &str) -> &str {
    let mut in_quotes = false;
    for (idx, ch) in line.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            '#' if !in_quotes => return &line[..idx],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(value: &str) -> Result<String> {
    let Some(inner) = value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        bail!("expected a double-quoted string, got `{value}`");
    };
    Ok(inner.to_string())
}

fn parse_boolean(value: &str) -> Result<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => bail!("expected `true` or `false`, got `{other}`"),
    }
}
