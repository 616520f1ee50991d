//! # Configuration
//!
//! [`TrackerConfig`] is read from environment variables:
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `ORDER_TRACKER_BASE_URL` | base URL of the order service | `http://localhost:8000` |
//! | `ORDER_TRACKER_POLL_INTERVAL_MS` | polling period in milliseconds | `3000` |
//! | `ORDER_TRACKER_TERMINAL_STATUSES` | comma-separated statuses that stop polling | none |
//! | `ORDER_TRACKER_CATALOG` | JSON catalog file replacing the built-in one | unset |
//! | `ORDER_TRACKER_BUFFER` | session request channel capacity | `32` |
//!
//! Empty values count as unset.

use crate::session_actor::PollSettings;
use reqwest::Url;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 3_000;
pub const DEFAULT_BUFFER: usize = 32;

const BASE_URL: &str = "ORDER_TRACKER_BASE_URL";
const POLL_INTERVAL_MS: &str = "ORDER_TRACKER_POLL_INTERVAL_MS";
const TERMINAL_STATUSES: &str = "ORDER_TRACKER_TERMINAL_STATUSES";
const CATALOG: &str = "ORDER_TRACKER_CATALOG";
const BUFFER: &str = "ORDER_TRACKER_BUFFER";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} is not a valid URL: {value}")]
    InvalidUrl { key: &'static str, value: String },

    #[error("{key} must be a positive integer, got {value:?}")]
    NotPositive { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    pub base_url: String,
    pub poll_interval: Duration,
    pub terminal_statuses: Vec<String>,
    pub catalog_path: Option<PathBuf>,
    pub buffer_size: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            terminal_statuses: Vec::new(),
            catalog_path: None,
            buffer_size: DEFAULT_BUFFER,
        }
    }
}

impl TrackerConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(value) = get(BASE_URL) {
            if Url::parse(&value).is_err() {
                return Err(ConfigError::InvalidUrl {
                    key: BASE_URL,
                    value,
                });
            }
            config.base_url = value;
        }
        if let Some(value) = get(POLL_INTERVAL_MS) {
            config.poll_interval = Duration::from_millis(positive(POLL_INTERVAL_MS, value)?);
        }
        if let Some(value) = get(TERMINAL_STATUSES) {
            config.terminal_statuses = value
                .split(',')
                .map(str::trim)
                .filter(|status| !status.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(value) = get(CATALOG) {
            config.catalog_path = Some(PathBuf::from(value));
        }
        if let Some(value) = get(BUFFER) {
            config.buffer_size = positive(BUFFER, value)? as usize;
        }
        Ok(config)
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            interval: self.poll_interval,
            terminal_statuses: self.terminal_statuses.clone(),
        }
    }
}

fn positive(key: &'static str, value: String) -> Result<u64, ConfigError> {
    match value.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::NotPositive { key, value }),
    }
}
