//! Data models for exectime: the run configuration and per-operation records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExecError;

/// Unit used when rendering any duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum TimeFormat {
    #[default]
    Milliseconds,
    Seconds,
    Nanoseconds,
}

impl TimeFormat {
    /// Suffix appended to a rendered duration (`ms`, `s`, `ns`).
    pub fn suffix(self) -> &'static str {
        match self {
            TimeFormat::Milliseconds => "ms",
            TimeFormat::Seconds => "s",
            TimeFormat::Nanoseconds => "ns",
        }
    }

    /// Convert a millisecond count into this unit.
    ///
    /// Seconds are floored; nanoseconds saturate at `u64::MAX`.
    pub fn convert(self, millis: u64) -> u64 {
        match self {
            TimeFormat::Milliseconds => millis,
            TimeFormat::Seconds => millis / 1_000,
            TimeFormat::Nanoseconds => millis.saturating_mul(1_000_000),
        }
    }
}

impl fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeFormat::Milliseconds => write!(f, "milliseconds"),
            TimeFormat::Seconds => write!(f, "seconds"),
            TimeFormat::Nanoseconds => write!(f, "nanoseconds"),
        }
    }
}

impl FromStr for TimeFormat {
    type Err = ExecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ms" | "milliseconds" => Ok(TimeFormat::Milliseconds),
            "s" | "seconds" => Ok(TimeFormat::Seconds),
            "ns" | "nanoseconds" => Ok(TimeFormat::Nanoseconds),
            _ => Err(ExecError::UnsupportedTimeFormat(s.to_string())),
        }
    }
}

impl TryFrom<String> for TimeFormat {
    type Error = ExecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Verbosity of a success line.
///
/// `Min` renders only the duration; `Max` also renders the absolute start
/// and end timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum LogLevel {
    #[default]
    Min,
    Max,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Min => write!(f, "min"),
            LogLevel::Max => write!(f, "max"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = ExecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "min" => Ok(LogLevel::Min),
            "max" => Ok(LogLevel::Max),
            _ => Err(ExecError::UnsupportedLogLevel(s.to_string())),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = ExecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Toggles controlling what the executor measures and prints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Append `[Return: ...]` for value-producing operations
    pub log_return: bool,
    /// Emit a line for every successful operation
    pub log_time: bool,
    /// Emit `[Total execution time: ...]` at the end of each batch
    pub log_total_time: bool,
    /// Unit for every rendered duration
    pub time_format: TimeFormat,
    /// Verbosity of success lines
    pub log_level: LogLevel,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            log_return: false,
            log_time: true,
            log_total_time: false,
            time_format: TimeFormat::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl ExecutionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log_return(mut self, log_return: bool) -> Self {
        self.log_return = log_return;
        self
    }

    pub fn with_log_time(mut self, log_time: bool) -> Self {
        self.log_time = log_time;
        self
    }

    pub fn with_log_total_time(mut self, log_total_time: bool) -> Self {
        self.log_total_time = log_total_time;
        self
    }

    pub fn with_time_format(mut self, time_format: TimeFormat) -> Self {
        self.time_format = time_format;
        self
    }

    pub fn with_log_level(mut self, log_level: LogLevel) -> Self {
        self.log_level = log_level;
        self
    }
}

/// Outcome of one operation, kept only long enough to format its line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRecord {
    /// Start timestamp, epoch milliseconds
    pub start_ms: u64,
    /// End timestamp, epoch milliseconds
    pub end_ms: u64,
    /// Text form of the produced value (`None` for effect-only operations)
    pub value: Option<String>,
    /// Failure message; when set, every other field is ignored by the formatter
    pub error: Option<String>,
}

impl ExecutionRecord {
    pub fn success(start_ms: u64, end_ms: u64, value: Option<String>) -> Self {
        Self {
            start_ms,
            end_ms,
            value,
            error: None,
        }
    }

    pub fn failure(start_ms: u64, end_ms: u64, message: impl Into<String>) -> Self {
        Self {
            start_ms,
            end_ms,
            value: None,
            error: Some(message.into()),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}
