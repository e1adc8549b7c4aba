use serde::{Deserialize, Serialize};

use crate::theme::ThemeConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub tui: TuiConfig,

    #[serde(default)]
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the tasks service; `/tasks` is appended.
    #[serde(default = "default_api_base_url")]
    pub base_url: String,

    /// Overall request timeout. Unset means the HTTP client's default.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

fn default_api_base_url() -> String {
    "http://localhost:8080".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            timeout_ms: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr (suppressed while the interactive console owns
    /// the terminal).
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default = "default_logging_file")]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "task_console_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Optional directory for log files. If empty or unset, uses
    /// `~/.task-console/logs`.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_file() -> bool {
    true
}

fn default_logging_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: default_logging_file(),
            level: default_logging_level(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuiConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default = "default_notification_ttl_ms")]
    pub notification_ttl_ms: u64,

    #[serde(default = "default_max_notifications")]
    pub max_notifications: usize,

    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    #[serde(default = "default_min_width")]
    pub min_width: u16,

    #[serde(default = "default_min_height")]
    pub min_height: u16,
}

fn default_page_size() -> usize {
    8
}

fn default_notification_ttl_ms() -> u64 {
    3_000
}

fn default_max_notifications() -> usize {
    3
}

fn default_tick_ms() -> u64 {
    100
}

fn default_min_width() -> u16 {
    80
}

fn default_min_height() -> u16 {
    24
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            notification_ttl_ms: default_notification_ttl_ms(),
            max_notifications: default_max_notifications(),
            tick_ms: default_tick_ms(),
            min_width: default_min_width(),
            min_height: default_min_height(),
        }
    }
}
