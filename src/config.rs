//! Dashboard configuration parsed from environment variables.
//!
//! The binary passes `clap` flags to [`DashboardConfig::from_env_with`];
//! library users can also build the struct directly.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use crate::state::projection::SuitKeyMatch;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_API_ROOT: &str = "/api";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5_000;
pub const DEFAULT_NOTICE_TTL_MS: u64 = 5_000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("invalid {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Scheme and authority of the backend, e.g. `http://127.0.0.1:8080`.
    pub base_url: String,
    /// Fixed prefix every API path is appended to.
    pub api_root: String,
    /// Delay between sync cycle issuances while a game is selected.
    pub poll_interval: Duration,
    /// How long an action error stays visible.
    pub notice_ttl: Duration,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// How `remaining-by-suit` keys are matched against the four suits.
    pub suit_match: SuitKeyMatch,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_root: DEFAULT_API_ROOT.to_owned(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            notice_ttl: Duration::from_millis(DEFAULT_NOTICE_TTL_MS),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            suit_match: SuitKeyMatch::default(),
        }
    }
}

/// Values given on the command line; each one replaces its env variable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub api_root: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub suit_match: Option<SuitKeyMatch>,
}

impl DashboardConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `SHOEBOARD_BASE_URL`: default `http://127.0.0.1:8080`
    /// - `SHOEBOARD_API_ROOT`: default `/api`
    /// - `SHOEBOARD_POLL_INTERVAL_MS`: default 5000
    /// - `SHOEBOARD_NOTICE_TTL_MS`: default 5000
    /// - `SHOEBOARD_REQUEST_TIMEOUT_SECS`: default 30
    /// - `SHOEBOARD_CONNECT_TIMEOUT_SECS`: default 10
    /// - `SHOEBOARD_SUIT_MATCH`: `normalized` (default), `glyph` or `name`
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an unusable base URL or suit-match mode.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(&ConfigOverrides::default())
    }

    /// Like [`DashboardConfig::from_env`], but every value present in
    /// `overrides` wins over its env variable. Validation runs once, after
    /// the overrides are applied, so a flag can correct a bad env value.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the merged configuration is unusable.
    pub fn from_env_with(overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let suit_match = match overrides.suit_match {
            Some(mode) => mode,
            None => suit_match_from_env()?,
        };
        let poll_interval_ms = overrides
            .poll_interval_ms
            .unwrap_or_else(|| env_parse("SHOEBOARD_POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS));

        Self {
            base_url: overrides
                .base_url
                .clone()
                .unwrap_or_else(|| env_or("SHOEBOARD_BASE_URL", DEFAULT_BASE_URL)),
            api_root: overrides
                .api_root
                .clone()
                .unwrap_or_else(|| env_or("SHOEBOARD_API_ROOT", DEFAULT_API_ROOT)),
            poll_interval: Duration::from_millis(poll_interval_ms),
            notice_ttl: Duration::from_millis(env_parse("SHOEBOARD_NOTICE_TTL_MS", DEFAULT_NOTICE_TTL_MS)),
            request_timeout_secs: env_parse("SHOEBOARD_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout_secs: env_parse("SHOEBOARD_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
            suit_match,
        }
        .validated()
    }

    /// Normalize the URL parts and reject values the transport cannot use.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] unless the base URL is http(s),
    /// and [`ConfigError::InvalidValue`] for a zero poll interval.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        let base = self.base_url.trim().trim_end_matches('/').to_owned();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.base_url));
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::InvalidValue { var: "SHOEBOARD_POLL_INTERVAL_MS", value: "0".to_owned() });
        }
        self.base_url = base;
        self.api_root = normalize_api_root(&self.api_root);
        Ok(self)
    }

    /// Base URL joined with the API root; paths are appended verbatim.
    #[must_use]
    pub fn api_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), normalize_api_root(&self.api_root))
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn suit_match_from_env() -> Result<SuitKeyMatch, ConfigError> {
    match std::env::var("SHOEBOARD_SUIT_MATCH") {
        Ok(raw) => raw
            .parse::<SuitKeyMatch>()
            .map_err(|_| ConfigError::InvalidValue { var: "SHOEBOARD_SUIT_MATCH", value: raw }),
        Err(_) => Ok(SuitKeyMatch::default()),
    }
}

fn normalize_api_root(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() { String::new() } else { format!("/{trimmed}") }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
