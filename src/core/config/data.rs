use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Credential sent as the `key` query parameter
    pub api_key: Option<String>,
    /// Model name inserted into the endpoint path (e.g., "gemini-2.0-flash")
    pub model: Option<String>,
    /// Base URL up to and including the `models` collection
    pub base_url: Option<String>,
    /// Directory holding saved conversations; defaults to the platform data dir
    pub data_dir: Option<PathBuf>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
///
/// # Examples
/// - Unix: `/home/user/.local/share/shanai` → `~/.local/share/shanai`
/// - Windows: paths are returned unchanged
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

/// Show only the last four characters of a credential.
pub fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), tail)
}

/// Keys accepted by `shanai set` / `shanai unset`.
pub const SETTABLE_KEYS: &[&str] = &["api-key", "model", "base-url", "data-dir"];

impl Config {
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), String> {
        let value = value.trim();
        if value.is_empty() {
            return Err(format!("A value is required for {key}"));
        }
        match key {
            "api-key" => self.api_key = Some(value.to_string()),
            "model" => self.model = Some(value.to_string()),
            "base-url" => self.base_url = Some(value.to_string()),
            "data-dir" => self.data_dir = Some(PathBuf::from(value)),
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }

    pub fn unset_value(&mut self, key: &str) -> Result<(), String> {
        match key {
            "api-key" => self.api_key = None,
            "model" => self.model = None,
            "base-url" => self.base_url = None,
            "data-dir" => self.data_dir = None,
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> String {
    format!(
        "Unknown config key: {key} (expected one of: {})",
        SETTABLE_KEYS.join(", ")
    )
}
