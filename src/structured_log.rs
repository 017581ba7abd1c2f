//! Structured logging for suggest_core
//!
//! One JSON object per line on stderr (and optionally a file), so refresh
//! and telemetry events can be parsed by tests and log shippers.
//!
//! Usage:
//!   slog_debug!("ENGINE", "corpus_published", json!({"kind": "predictions", "templates": 12}));
//!
//! Output:
//!   {"timestamp":"2024-01-10T12:34:56Z","level":"debug","component":"ENGINE","event":"corpus_published","data":{"kind":"predictions","templates":12}}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;

lazy_static::lazy_static! {
    static ref LOG_FILE: Mutex<Option<File>> = Mutex::new(None);
    static ref LOG_CONFIG: Mutex<LogConfig> = Mutex::new(LogConfig::default());
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub component: String,
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub json_output: bool,
    pub file_path: Option<PathBuf>,
    pub min_level: LogLevel,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            json_output: true,
            file_path: None,
            min_level: LogLevel::Warn,
        }
    }
}

/// Install a logger configuration; opens the log file if one is set
pub fn init_logger(config: LogConfig) {
    let file = config.file_path.as_ref().and_then(|path| {
        OpenOptions::new().create(true).append(true).open(path).ok()
    });
    if let Ok(mut log_file) = LOG_FILE.lock() {
        *log_file = file;
    }

    if let Ok(mut cfg) = LOG_CONFIG.lock() {
        *cfg = config;
    }
}

pub fn enabled(level: LogLevel) -> bool {
    match LOG_CONFIG.lock() {
        Ok(cfg) => level >= cfg.min_level,
        Err(_) => level >= LogConfig::default().min_level,
    }
}

/// Log an event with structured data
pub fn log_event(level: LogLevel, component: &str, event: &str, data: serde_json::Value) {
    log_entry(level, component, event, None, Some(data));
}

/// Log a message with optional data
pub fn log_message(
    level: LogLevel,
    component: &str,
    event: &str,
    message: &str,
    data: Option<serde_json::Value>,
) {
    log_entry(level, component, event, Some(message.to_string()), data);
}

fn log_entry(
    level: LogLevel,
    component: &str,
    event: &str,
    message: Option<String>,
    data: Option<serde_json::Value>,
) {
    let json_output = match LOG_CONFIG.lock() {
        Ok(cfg) if level < cfg.min_level => return,
        Ok(cfg) => cfg.json_output,
        Err(_) => true,
    };

    let entry = LogEntry {
        timestamp: Utc::now(),
        level,
        component: component.to_string(),
        event: event.to_string(),
        message,
        data,
    };
    let output = render(&entry, json_output);

    eprintln!("{}", output);

    if let Ok(mut log_file) = LOG_FILE.lock() {
        if let Some(ref mut file) = *log_file {
            let _ = writeln!(file, "{}", output);
        }
    }
}

/// Format an entry as a JSON line or as `[COMPONENT] event: message data`
pub fn render(entry: &LogEntry, json_output: bool) -> String {
    if json_output {
        return serde_json::to_string(entry).unwrap_or_else(|_| format!("{:?}", entry));
    }

    let msg = entry.message.as_deref().unwrap_or("");
    let data = entry
        .data
        .as_ref()
        .map(|d| format!(" {}", d))
        .unwrap_or_default();
    format!("[{}] {}: {}{}", entry.component, entry.event, msg, data)
}

#[macro_export]
macro_rules! slog_debug {
    ($component:expr, $event:expr, $data:expr) => {
        $crate::structured_log::log_event(
            $crate::structured_log::LogLevel::Debug,
            $component,
            $event,
            $data,
        )
    };
}

#[macro_export]
macro_rules! slog_info {
    ($component:expr, $event:expr, $data:expr) => {
        $crate::structured_log::log_event(
            $crate::structured_log::LogLevel::Info,
            $component,
            $event,
            $data,
        )
    };
}

#[macro_export]
macro_rules! slog_warn {
    ($component:expr, $event:expr, $data:expr) => {
        $crate::structured_log::log_event(
            $crate::structured_log::LogLevel::Warn,
            $component,
            $event,
            $data,
        )
    };
}

#[macro_export]
macro_rules! slog_error {
    ($component:expr, $event:expr, $msg:expr, $data:expr) => {
        $crate::structured_log::log_message(
            $crate::structured_log::LogLevel::Error,
            $component,
            $event,
            $msg,
            Some($data),
        )
    };
}
