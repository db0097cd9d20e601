use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::ui::DEFAULT_DATE_FORMAT;

#[derive(Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub ui: UiConfig,
    pub compose: ComposeConfig,
    pub log: LogConfig,
}

#[derive(Debug)]
pub struct ServerConfig {
    pub base_url: String,
}

#[derive(Debug)]
pub struct UiConfig {
    pub poll_interval: Option<Duration>,
    pub mouse: bool,
    pub date_format: String,
}

#[derive(Debug)]
pub struct ComposeConfig {
    pub from: Option<String>,
}

#[derive(Debug)]
pub struct LogConfig {
    pub level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "failed to parse config file: {}", e),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    server: RawServerConfig,
    #[serde(default)]
    ui: RawUiConfig,
    #[serde(default)]
    compose: RawComposeConfig,
    #[serde(default)]
    log: RawLogConfig,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawServerConfig {
    #[serde(default = "default_base_url")]
    base_url: String,
}

impl Default for RawServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawUiConfig {
    #[serde(default = "default_poll_interval_secs")]
    poll_interval_secs: u64,
    #[serde(default = "default_mouse")]
    mouse: bool,
    #[serde(default = "default_date_format")]
    date_format: String,
}

impl Default for RawUiConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            mouse: default_mouse(),
            date_format: default_date_format(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawComposeConfig {
    #[serde(default)]
    from: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLogConfig {
    #[serde(default = "default_log_level")]
    level: String,
}

impl Default for RawLogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// One day.
const MAX_POLL_INTERVAL_SECS: u64 = 86_400;

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_poll_interval_secs() -> u64 {
    6
}

fn default_mouse() -> bool {
    true
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                base_url: default_base_url(),
            },
            ui: UiConfig {
                poll_interval: Some(Duration::from_secs(default_poll_interval_secs())),
                mouse: default_mouse(),
                date_format: default_date_format(),
            },
            compose: ComposeConfig { from: None },
            log: LogConfig {
                level: default_log_level(),
            },
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::parse(&contents)
    }

    fn parse(contents: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let base_url = raw.server.base_url.trim().to_string();
        validate_base_url(&base_url)?;

        if StrftimeItems::new(&raw.ui.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::Parse(format!(
                "invalid date_format '{}'",
                raw.ui.date_format
            )));
        }

        if raw.ui.poll_interval_secs > MAX_POLL_INTERVAL_SECS {
            return Err(ConfigError::Parse(format!(
                "poll_interval_secs {} exceeds the maximum of {}",
                raw.ui.poll_interval_secs, MAX_POLL_INTERVAL_SECS
            )));
        }

        let from = raw
            .compose
            .from
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty());

        Ok(Config {
            server: ServerConfig { base_url },
            ui: UiConfig {
                poll_interval: if raw.ui.poll_interval_secs == 0 {
                    None
                } else {
                    Some(Duration::from_secs(raw.ui.poll_interval_secs))
                },
                mouse: raw.ui.mouse,
                date_format: raw.ui.date_format,
            },
            compose: ComposeConfig { from },
            log: LogConfig {
                level: raw.log.level,
            },
        })
    }
}

pub fn validate_base_url(url: &str) -> Result<(), ConfigError> {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .ok_or_else(|| {
            ConfigError::Parse(format!(
                "base_url '{}' must start with http:// or https://",
                url
            ))
        })?;
    if rest.trim_end_matches('/').is_empty() {
        return Err(ConfigError::Parse(format!(
            "base_url '{}' has no host",
            url
        )));
    }
    Ok(())
}
