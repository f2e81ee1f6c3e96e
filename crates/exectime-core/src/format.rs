//! Line formatting.
//!
//! Pure functions turning an [`ExecutionRecord`] into the text handed to a
//! sink. Output shapes:
//!
//! ```text
//! [Execution time: 12ms]
//! [Execution time: 12ms] [Start time: 1690000000000] [End time: 1690000000012]
//! [Execution time: 12ms] [Return: ok]
//! [Error message: divide by zero]
//! [Total execution time: 45ms]
//! ```

use crate::models::{ExecutionConfig, ExecutionRecord, LogLevel, TimeFormat};

/// Render a millisecond count in the given unit, e.g. `1s`, `12ms`, `1000000ns`.
pub fn format_time(millis: u64, unit: TimeFormat) -> String {
    format!("{}{}", unit.convert(millis), unit.suffix())
}

pub fn format_error(message: &str) -> String {
    format!("[Error message: {message}]")
}

pub fn format_total(millis: u64, unit: TimeFormat) -> String {
    format!("[Total execution time: {}]", format_time(millis, unit))
}

/// Format one operation's line.
///
/// An error short-circuits everything else. Otherwise segments are joined
/// by a single space in the order: time, start/end (`Max` only), return
/// value (only when `log_return` is set and the operation produced one).
pub fn format_record(record: &ExecutionRecord, config: &ExecutionConfig) -> String {
    if let Some(message) = &record.error {
        return format_error(message);
    }

    let mut line = format!(
        "[Execution time: {}]",
        format_time(record.elapsed_ms(), config.time_format)
    );

    match config.log_level {
        LogLevel::Min => {}
        LogLevel::Max => {
            line.push_str(&format!(
                " [Start time: {}] [End time: {}]",
                record.start_ms, record.end_ms
            ));
        }
    }

    if config.log_return {
        if let Some(value) = &record.value {
            line.push_str(&format!(" [Return: {value}]"));
        }
    }

    line
}
