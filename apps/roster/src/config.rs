use std::{
    fs, io,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use anyhow::Context;
use client_core::RetryPolicy;
use serde::Deserialize;
use shared::error::TABLE_MISSING_SIGNATURE;
use tracing::{debug, warn};

pub const DEFAULT_CONFIG_FILE: &str = "roster.toml";
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080/";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    /// `None` disables the per-request deadline.
    pub request_timeout: Option<Duration>,
    pub retry: RetryPolicy,
    pub terminal_signatures: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.into(),
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
            retry: RetryPolicy::default(),
            terminal_signatures: vec![TABLE_MISSING_SIGNATURE.into()],
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    server_url: Option<String>,
    request_timeout_secs: Option<u64>,
    retry_max_attempts: Option<u32>,
    retry_initial_delay_ms: Option<u64>,
    retry_max_delay_ms: Option<u64>,
    terminal_signatures: Option<Vec<String>>,
}

/// Defaults, then `roster.toml` (or the explicit `--config` file), then `ROSTER_*` env vars.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let (path, required) = match config_path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    match fs::read_to_string(&path) {
        Ok(raw) => {
            apply_file(&mut settings, &raw)
                .with_context(|| format!("invalid config file '{}'", path.display()))?;
            debug!(path = %path.display(), "config: loaded settings file");
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()));
        }
    }

    apply_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

pub fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file: FileSettings = toml::from_str(raw)?;

    if let Some(v) = file.server_url {
        settings.server_url = v;
    }
    if let Some(v) = file.request_timeout_secs {
        settings.request_timeout = request_timeout(v);
    }
    if let Some(v) = file.retry_max_attempts {
        settings.retry.max_attempts = max_attempts(v);
    }
    if let Some(v) = file.retry_initial_delay_ms {
        settings.retry.initial_delay = Duration::from_millis(v);
    }
    if let Some(v) = file.retry_max_delay_ms {
        settings.retry.max_delay = Duration::from_millis(v);
    }
    if let Some(v) = file.terminal_signatures {
        settings.terminal_signatures = v;
    }
    Ok(())
}

/// `lookup` is `std::env::var` in production; tests pass a map.
pub fn apply_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("ROSTER_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = parsed::<u64>(&lookup, "ROSTER_REQUEST_TIMEOUT_SECS") {
        settings.request_timeout = request_timeout(v);
    }
    if let Some(v) = parsed::<u32>(&lookup, "ROSTER_RETRY_MAX_ATTEMPTS") {
        settings.retry.max_attempts = max_attempts(v);
    }
    if let Some(v) = parsed::<u64>(&lookup, "ROSTER_RETRY_INITIAL_DELAY_MS") {
        settings.retry.initial_delay = Duration::from_millis(v);
    }
    if let Some(v) = parsed::<u64>(&lookup, "ROSTER_RETRY_MAX_DELAY_MS") {
        settings.retry.max_delay = Duration::from_millis(v);
    }
}

// 0 means no deadline.
fn request_timeout(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

// 0 means retry forever.
fn max_attempts(value: u32) -> Option<u32> {
    (value > 0).then_some(value)
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "config: ignoring malformed override");
            None
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
