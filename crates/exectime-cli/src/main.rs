//! exectime CLI: run shell commands as one timed batch.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use exectime_core::storage;
use exectime_core::{ExecutionConfig, Executor, LogLevel, Operation, TimeFormat};

#[derive(Parser)]
#[command(
    name = "exectime",
    about = "⏱  exectime: time shell commands and log the results",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run shell commands in order, printing one timing line per command
    Run {
        #[command(flatten)]
        settings: Settings,
        /// Shell commands to run; an empty string counts as an absent operation
        #[arg(required = true)]
        commands: Vec<String>,
    },
    /// Inspect or create configuration files
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show {
        #[command(flatten)]
        settings: Settings,
        /// Output format
        #[arg(long, short, default_value = "table", value_parser = ["table", "yaml", "json"])]
        format: String,
    },
    /// Write a configuration file with default values
    Init {
        /// Destination (.yaml, .yml or .json)
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Configuration file plus command-line overrides.
#[derive(Args)]
struct Settings {
    /// Configuration file (.yaml, .yml or .json)
    #[arg(long, short)]
    config: Option<PathBuf>,
    /// Print each command's trimmed stdout as `[Return: ...]`
    #[arg(long)]
    log_return: bool,
    /// Do not print lines for successful commands
    #[arg(long)]
    no_log_time: bool,
    /// Print the summed duration of successful commands at the end
    #[arg(long)]
    total: bool,
    /// Duration unit: ms, s or ns
    #[arg(long)]
    time_format: Option<TimeFormat>,
    /// Verbosity: min, or max to include start/end timestamps
    #[arg(long)]
    level: Option<LogLevel>,
}

impl Settings {
    /// Load the configuration file (if any), then apply flags on top.
    fn resolve(&self) -> Result<ExecutionConfig> {
        let mut config = match &self.config {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                storage::load_config(path)?
            }
            None => ExecutionConfig::default(),
        };

        if self.log_return {
            config.log_return = true;
        }
        if self.no_log_time {
            config.log_time = false;
        }
        if self.total {
            config.log_total_time = true;
        }
        if let Some(time_format) = self.time_format {
            config.time_format = time_format;
        }
        if let Some(level) = self.level {
            config.log_level = level;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    // Timing lines own stdout; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { settings, commands } => {
            cmd_run(&settings, &commands)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { settings, format } => {
                cmd_config_show(&settings, &format)?;
            }
            ConfigAction::Init { path, force } => {
                cmd_config_init(&path, force)?;
            }
        },
    }

    Ok(())
}

// ─── Command implementations ──────────────────────────────────────────────────

fn cmd_run(settings: &Settings, commands: &[String]) -> Result<()> {
    let config = settings.resolve()?;
    debug!(?config, commands = commands.len(), "Running batch");

    let mut executor = Executor::new(config);
    executor.run_all(commands.iter().map(|c| shell_operation(c)));
    Ok(())
}

fn cmd_config_show(settings: &Settings, format: &str) -> Result<()> {
    let config = settings.resolve()?;

    match format {
        "yaml" => print!("{}", serde_yaml::to_string(&config)?),
        "json" => println!("{}", serde_json::to_string_pretty(&config)?),
        "table" => {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(["Setting", "Value"]);
            table.add_row(["log_return", &config.log_return.to_string()]);
            table.add_row(["log_time", &config.log_time.to_string()]);
            table.add_row(["log_total_time", &config.log_total_time.to_string()]);
            table.add_row(["time_format", &config.time_format.to_string()]);
            table.add_row(["log_level", &config.log_level.to_string()]);
            println!("{}", table);
        }
        _ => anyhow::bail!("Unknown format: {}", format),
    }

    Ok(())
}

fn cmd_config_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    storage::save_config(path, &ExecutionConfig::default())?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

// ─── Shell operations ─────────────────────────────────────────────────────────

/// Blank commands become absent operations.
fn shell_operation(command: &str) -> Option<Operation<'_>> {
    if command.trim().is_empty() {
        return None;
    }
    Some(Operation::try_value(move || run_shell(command)))
}

/// Run through the platform shell; trimmed stdout on success, trimmed
/// stderr (or the exit status) on failure.
fn run_shell(command: &str) -> std::result::Result<String, String> {
    let output = shell()
        .arg(command)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| format!("failed to spawn shell: {e}"))?;

    if output.status.success() {
        return Ok(String::from_utf8_lossy(&output.stdout).trim().to_string());
    }

    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if stderr.is_empty() {
        Err(output.status.to_string())
    } else {
        Err(stderr)
    }
}

#[cfg(windows)]
fn shell() -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C");
    cmd
}

#[cfg(not(windows))]
fn shell() -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c");
    cmd
}
