//! Runtime configuration, read from the environment (and `.env` when present).

use std::env;
use std::time::Duration;
use url::Url;
use validator::Validate;

use crate::error::AppError;

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TYPING_DELAY_MS: u64 = 1500;

const ENV_BACKEND_URL: &str = "VERITAS_BACKEND_URL";
const ENV_TYPING_DELAY_MS: &str = "VERITAS_TYPING_DELAY_MS";
const ENV_LOG_FORMAT: &str = "VERITAS_LOG_FORMAT";
const ENV_OFFLINE: &str = "VERITAS_OFFLINE";

/// How log lines are formatted on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(AppError::Config(format!("Unknown log format '{}'", other))),
        }
    }
}

/// Unvalidated settings as they come from the environment.
#[derive(Debug, Clone, Validate)]
struct RawConfig {
    #[validate(url)]
    backend_url: String,
    #[validate(range(max = 10_000))]
    typing_delay_ms: u64,
}

/// Validated configuration for a chat session.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Base URL every endpoint is joined onto. Always ends with `/`.
    pub backend_url: Url,
    /// Fixed delay before a reply is shown, while the typing indicator is up.
    pub typing_delay: Duration,
    pub log_format: LogFormat,
    /// Start with the backend latch already tripped.
    pub offline: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            backend_url: normalize_base(DEFAULT_BACKEND_URL).expect("default backend url parses"),
            typing_delay: Duration::from_millis(DEFAULT_TYPING_DELAY_MS),
            log_format: LogFormat::default(),
            offline: false,
        }
    }
}

impl ChatConfig {
    /// Reads `VERITAS_*` variables, falling back to defaults for unset ones.
    pub fn from_env() -> Result<Self, AppError> {
        let backend_url =
            env::var(ENV_BACKEND_URL).unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());
        let typing_delay_ms = match env::var(ENV_TYPING_DELAY_MS) {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|e| {
                AppError::Config(format!("{} must be an integer: {}", ENV_TYPING_DELAY_MS, e))
            })?,
            Err(_) => DEFAULT_TYPING_DELAY_MS,
        };
        let log_format = match env::var(ENV_LOG_FORMAT) {
            Ok(raw) => raw.parse()?,
            Err(_) => LogFormat::default(),
        };
        let offline = match env::var(ENV_OFFLINE) {
            Ok(raw) => parse_flag(&raw)?,
            Err(_) => false,
        };

        let raw = RawConfig {
            backend_url,
            typing_delay_ms,
        };
        raw.validate()?;

        Ok(Self {
            backend_url: normalize_base(&raw.backend_url)?,
            typing_delay: Duration::from_millis(raw.typing_delay_ms),
            log_format,
            offline,
        })
    }

    /// A config pointing at `base`, with no artificial delay.
    #[cfg(test)]
    pub fn for_backend(base: &str) -> Result<Self, AppError> {
        Ok(Self {
            backend_url: normalize_base(base)?,
            typing_delay: Duration::ZERO,
            ..Self::default()
        })
    }
}

fn normalize_base(raw: &str) -> Result<Url, AppError> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn parse_flag(raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(AppError::Config(format!(
            "{} must be a boolean, got '{}'",
            ENV_OFFLINE, other
        ))),
    }
}
