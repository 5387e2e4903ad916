use std::error::Error;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive (e.g. `shanai=debug`).
pub const LOG_FILTER_ENV: &str = "SHANAI_LOG";

/// Where diagnostic output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// No subscriber is installed.
    Disabled,
    /// Warnings and above to stderr; used by non-interactive commands.
    Stderr,
    /// Append to a file; the terminal UI uses this when `--log` is given.
    File(PathBuf),
}

impl LogTarget {
    /// `--log` wins; otherwise interactive sessions stay silent so the UI
    /// owns the terminal.
    pub fn choose(log_file: Option<PathBuf>, interactive: bool) -> Self {
        match log_file {
            Some(path) => LogTarget::File(path),
            None if interactive => LogTarget::Disabled,
            None => LogTarget::Stderr,
        }
    }
}

fn filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive))
}

pub fn init_tracing(target: &LogTarget) -> Result<(), Box<dyn Error>> {
    let result = match target {
        LogTarget::Disabled => return Ok(()),
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter("warn"))
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init(),
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| format!("Failed to open log file {}: {e}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter("info"))
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
        }
    };
    result.map_err(|err| -> Box<dyn Error> { err })
}
