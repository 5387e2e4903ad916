use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;

use crate::core::config::data::Config;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const BASE_URL_ENV: &str = "GEMINI_BASE_URL";

/// Settings with defaults and environment fallbacks applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    MissingApiKey,
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::MissingApiKey => write!(
                f,
                "No API key configured.\n\n\
                 Set one with:\n  shanai set api-key <KEY>\n\n\
                 or export it:\n  export {API_KEY_ENV}=\"your-api-key-here\""
            ),
        }
    }
}

impl StdError for SettingsError {}

impl Config {
    pub fn model_or_default(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    /// Resolve against the process environment.
    pub fn resolve(&self) -> Result<ResolvedSettings, SettingsError> {
        self.resolve_with_env(|name| std::env::var(name).ok())
    }

    /// Resolve using `lookup` for environment variables.
    ///
    /// A configured API key wins over the environment. `GEMINI_BASE_URL`
    /// wins over the configured base URL.
    pub fn resolve_with_env<F>(&self, lookup: F) -> Result<ResolvedSettings, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let api_key = non_empty(self.api_key.clone())
            .or_else(|| non_empty(lookup(API_KEY_ENV)))
            .ok_or(SettingsError::MissingApiKey)?;

        let base_url = non_empty(lookup(BASE_URL_ENV))
            .or_else(|| non_empty(self.base_url.clone()))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(ResolvedSettings {
            api_key,
            model: self.model_or_default().to_string(),
            base_url,
            data_dir: self.data_dir.clone(),
        })
    }
}
