//! Storage layer: YAML/JSON configuration files.

use std::fs;
use std::path::Path;

use crate::error::{ExecError, Result};
use crate::models::ExecutionConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Yaml,
    Json,
}

fn config_format(path: &Path) -> Result<ConfigFormat> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
        Some("json") => Ok(ConfigFormat::Json),
        _ => Err(ExecError::UnsupportedConfigFormat(path.display().to_string())),
    }
}

// ─── YAML I/O ────────────────────────────────────────────────────────────────

pub fn save_yaml<T: serde::Serialize>(path: &Path, data: &T) -> Result<()> {
    let content = serde_yaml::to_string(data)?;
    fs::write(path, content)?;
    Ok(())
}

pub fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T>
where
    T: Default,
{
    if !path.exists() {
        return Ok(T::default());
    }
    let content = fs::read_to_string(path)?;
    let val = serde_yaml::from_str(&content)?;
    Ok(val)
}

// ─── JSON I/O ────────────────────────────────────────────────────────────────

pub fn save_json<T: serde::Serialize>(path: &Path, data: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(data)?;
    fs::write(path, content)?;
    Ok(())
}

pub fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T>
where
    T: Default,
{
    if !path.exists() {
        return Ok(T::default());
    }
    let content = fs::read_to_string(path)?;
    let val = serde_json::from_str(&content)?;
    Ok(val)
}

// ─── Execution config ────────────────────────────────────────────────────────

/// Load a configuration from `.yaml`, `.yml` or `.json`.
///
/// A missing file yields the default configuration. Fields absent from the
/// file keep their defaults; an unknown log level or time format is an error.
pub fn load_config(path: &Path) -> Result<ExecutionConfig> {
    match config_format(path)? {
        ConfigFormat::Yaml => load_yaml(path),
        ConfigFormat::Json => load_json(path),
    }
}

pub fn save_config(path: &Path, config: &ExecutionConfig) -> Result<()> {
    match config_format(path)? {
        ConfigFormat::Yaml => save_yaml(path, config),
        ConfigFormat::Json => save_json(path, config),
    }
}
