//! Logging infrastructure for the coin selection core
//!
//! This module configures the `log` facade for library consumers that do not
//! bring their own logger. Log lines never carry full transaction ids;
//! selection code truncates them with [`sanitize_for_logging`] first.
//! Structured events are a separate channel: they go to in-process
//! subscribers only and carry full outpoints.
//!
//! # Usage
//!
//! ```
//! use coinselect::logging::{self, LogConfig};
//!
//! let _ = logging::init(&LogConfig::default());
//! ```

use chrono::Local;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fs::OpenOptions;
use std::io::Write as IoWrite;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    /// Error conditions
    Error,
    /// Warning conditions
    Warn,
    /// Informational messages
    Info,
    /// Debug-level messages
    Debug,
    /// Trace level (very verbose)
    Trace,
}

/// Configuration for the logging system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default log level
    pub level: LogLevel,
    /// Path to log file (None for console-only)
    pub log_file: Option<String>,
    /// Whether to include timestamps in log messages
    pub include_timestamps: bool,
    /// Whether to include source location in log messages
    pub include_source_location: bool,
    /// Whether to log to console
    pub console_logging: bool,
    /// Whether to use JSON format for logs (machine-readable)
    pub json_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            log_file: None,
            include_timestamps: true,
            include_source_location: false,
            console_logging: true,
            json_format: false,
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Initialize the logging system with the given configuration
pub fn init(config: &LogConfig) -> Result<(), String> {
    let include_timestamps = config.include_timestamps;
    let include_source_location = config.include_source_location;
    let json_format = config.json_format;

    let mut builder = env_logger::Builder::new();
    builder.filter_level(config.level.into());

    builder.format(move |buf, record| {
        if json_format {
            let json = json!({
                "timestamp": Local::now().to_rfc3339(),
                "level": record.level().to_string(),
                "target": record.target().to_string(),
                "message": record.args().to_string(),
            });
            writeln!(buf, "{}", json)
        } else {
            if include_timestamps {
                let _ = write!(buf, "[{}] ", Local::now().format("%Y-%m-%d %H:%M:%S"));
            }
            let _ = write!(buf, "{:<5} ", record.level());
            if include_source_location {
                if let (Some(file), Some(line)) = (record.file(), record.line()) {
                    let _ = write!(buf, "[{}:{}] ", file, line);
                }
            }
            writeln!(buf, "{}", record.args())
        }
    });

    if config.console_logging {
        builder.target(env_logger::Target::Stdout);
    }

    if let Some(log_file) = &config.log_file {
        match OpenOptions::new().create(true).append(true).open(log_file) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => return Err(format!("Failed to open log file {}: {}", log_file, e)),
        }
    }

    builder.try_init().map_err(|e| e.to_string())
}

/// Update the log level dynamically
pub fn set_log_level(level: LogLevel) {
    log::set_max_level(level.into());
}

/// Sanitize a potentially identifying string for logging
///
/// Keeps only the first and last few characters of transaction ids or
/// addresses so log lines cannot be joined back to full wallet state.
pub fn sanitize_for_logging(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let len = input.len();
    if len <= 8 {
        return "*****".to_string();
    }

    let first = &input[0..4];
    let last = &input[len - 4..len];
    format!("{}...{}", first, last)
}
