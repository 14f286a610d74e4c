use std::env;
use std::time::Duration;

use crate::error::AppError;

pub const RATING_URL_VAR: &str = "MATCHPLAY_RATING_URL";
pub const RATING_KEY_VAR: &str = "MATCHPLAY_RATING_KEY";
pub const RATING_TIMEOUT_VAR: &str = "MATCHPLAY_RATING_TIMEOUT_MS";

const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Connection settings for the remote rating backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingApiConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl RatingApiConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build from `MATCHPLAY_RATING_*` environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`Self::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let base_url = must_var(&lookup, RATING_URL_VAR)?;
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(AppError::config(format!(
                "{RATING_URL_VAR} must be an http(s) URL, but got: '{base_url}'"
            )));
        }
        let api_key = must_var(&lookup, RATING_KEY_VAR)?;
        let timeout_ms = match lookup(RATING_TIMEOUT_VAR) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                AppError::config(format!(
                    "{RATING_TIMEOUT_VAR} must be a whole number of milliseconds, but got: '{raw}'"
                ))
            })?,
            None => DEFAULT_TIMEOUT_MS,
        };

        Ok(Self::new(base_url, api_key).with_timeout(Duration::from_millis(timeout_ms)))
    }
}

/// Get required variable or return error
fn must_var(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String, AppError> {
    lookup(name)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::config(format!("Required environment variable '{name}' is not set")))
}
