//! Error types for exectime-core.
//!
//! Only configuration and I/O faults are errors. A failing operation is an
//! outcome that the executor logs, never an `ExecError`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported log level: {0}")]
    UnsupportedLogLevel(String),

    #[error("Unsupported time format: {0}")]
    UnsupportedTimeFormat(String),

    #[error("Unsupported config file format: {0}")]
    UnsupportedConfigFormat(String),
}

pub type Result<T> = std::result::Result<T, ExecError>;
