//! Environment-driven client configuration.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use empower_infra::{DEFAULT_FEED_URL, StoreError, default_database_url};
use empower_observability::LogFormat;

use crate::sync::DEFAULT_BULK_PAUSE;

pub const ENV_FEED_URL: &str = "EMPOWER_FEED_URL";
pub const ENV_DATABASE_URL: &str = "EMPOWER_DATABASE_URL";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "EMPOWER_HTTP_TIMEOUT_SECS";
pub const ENV_BULK_PAUSE_MS: &str = "EMPOWER_BULK_PAUSE_MS";
pub const ENV_LOG_FORMAT: &str = "EMPOWER_LOG_FORMAT";

pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub feed_url: String,
    /// `None` selects the per-user data directory.
    pub database_url: Option<String>,
    pub http_timeout: Duration,
    pub bulk_pause: Duration,
    pub log_format: LogFormat,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            database_url: None,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            bulk_pause: DEFAULT_BULK_PAUSE,
            log_format: LogFormat::default(),
        }
    }
}

/// An environment value that could not be parsed and was replaced by the
/// default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedSetting {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

impl ClientConfig {
    /// Read the process environment. Logging is usually not set up yet at
    /// this point, so rejected values are returned rather than logged.
    pub fn from_env() -> (Self, Vec<RejectedSetting>) {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. Unset or blank keys keep their
    /// defaults; unparseable values keep them too and are reported back.
    pub fn from_lookup<F>(lookup: F) -> (Self, Vec<RejectedSetting>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();
        let mut rejected = Vec::new();

        if let Some(url) = get(ENV_FEED_URL) {
            config.feed_url = url;
        }
        config.database_url = get(ENV_DATABASE_URL);

        let timeout = get(ENV_HTTP_TIMEOUT_SECS);
        if let Some(secs) = parse_setting::<u64>(ENV_HTTP_TIMEOUT_SECS, timeout, &mut rejected) {
            config.http_timeout = Duration::from_secs(secs);
        }
        let pause = get(ENV_BULK_PAUSE_MS);
        if let Some(ms) = parse_setting::<u64>(ENV_BULK_PAUSE_MS, pause, &mut rejected) {
            config.bulk_pause = Duration::from_millis(ms);
        }
        let format = get(ENV_LOG_FORMAT);
        if let Some(format) = parse_setting::<LogFormat>(ENV_LOG_FORMAT, format, &mut rejected) {
            config.log_format = format;
        }

        (config, rejected)
    }

    /// The configured database URL, or the default on-disk location.
    pub fn database_url(&self) -> Result<String, StoreError> {
        match &self.database_url {
            Some(url) => Ok(url.clone()),
            None => default_database_url(),
        }
    }
}

impl RejectedSetting {
    /// Emit the rejection as a warning. Call once a subscriber is installed.
    pub fn log(&self) {
        tracing::warn!(
            key = self.key,
            value = %self.value,
            reason = %self.reason,
            "ignoring invalid setting; using default"
        );
    }
}

fn parse_setting<T>(
    key: &'static str,
    raw: Option<String>,
    rejected: &mut Vec<RejectedSetting>,
) -> Option<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = raw?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(err) => {
            rejected.push(RejectedSetting {
                key,
                reason: err.to_string(),
                value: raw,
            });
            None
        }
    }
}
