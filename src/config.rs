use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Default config file path.
pub const CONFIG_PATH: &str = "config.toml";

/// Top-level application config deserialized from `config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub settings: SettingsConfig,
    #[serde(default)]
    pub page: PageConfig,
}

/// Bot credentials. Either may be left out; delivery is then skipped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
}

impl TelegramConfig {
    /// `(bot_token, chat_id)` when both are present and non-blank.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let token = non_blank(self.bot_token.as_deref())?;
        let chat = non_blank(self.chat_id.as_deref())?;
        Some((token, chat))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Polling and alerting settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsConfig {
    /// Seconds to sleep between cycles.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Drought length (in spins) that triggers an alert.
    #[serde(default = "default_alert_threshold")]
    pub alert_threshold: u32,
    /// History rows scanned per cycle for multiplier records.
    #[serde(default = "default_history_rows")]
    pub history_rows: usize,
    #[serde(default = "default_true")]
    pub show_probabilities: bool,
}

fn default_poll_interval() -> u64 {
    900
}

fn default_alert_threshold() -> u32 {
    200
}

fn default_history_rows() -> usize {
    10
}

fn default_true() -> bool {
    true
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            alert_threshold: default_alert_threshold(),
            history_rows: default_history_rows(),
            show_probabilities: default_true(),
        }
    }
}

impl SettingsConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

/// Dashboard location and WebDriver session options.
#[derive(Debug, Clone, Deserialize)]
pub struct PageConfig {
    #[serde(default = "default_page_url")]
    pub url: String,
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,
    #[serde(default = "default_true")]
    pub headless: bool,
    #[serde(default = "default_load_timeout")]
    pub load_timeout_secs: u64,
    /// Pause after navigation so client-side charts can render.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

fn default_page_url() -> String {
    crate::DASHBOARD_URL.to_string()
}

fn default_webdriver_url() -> String {
    "http://localhost:9515".to_string()
}

fn default_load_timeout() -> u64 {
    60
}

fn default_settle_ms() -> u64 {
    5000
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            url: default_page_url(),
            webdriver_url: default_webdriver_url(),
            headless: default_true(),
            load_timeout_secs: default_load_timeout(),
            settle_ms: default_settle_ms(),
        }
    }
}

impl AppConfig {
    /// Load config from the given TOML file path.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Like [`AppConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply `BOT_TOKEN`, `CHAT_ID`, `ALERT_THRESHOLD` and `POLL_INTERVAL_SECS`
    /// from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(token) = lookup("BOT_TOKEN") {
            self.telegram.bot_token = Some(token);
        }
        if let Some(chat) = lookup("CHAT_ID") {
            self.telegram.chat_id = Some(chat);
        }
        if let Some(raw) = lookup("ALERT_THRESHOLD") {
            self.settings.alert_threshold = parse_override("ALERT_THRESHOLD", &raw)?;
        }
        if let Some(raw) = lookup("POLL_INTERVAL_SECS") {
            self.settings.poll_interval_secs = parse_override("POLL_INTERVAL_SECS", &raw)?;
        }
        Ok(())
    }
}

fn parse_override<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse()
        .with_context(|| format!("invalid {key}={raw:?}"))
}
