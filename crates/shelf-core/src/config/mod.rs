//! Client configuration.
//!
//! One store client parameterized by its base URL; deployments differ only in
//! that value and in the retry policy.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::retry::{RetryPolicy, DEFAULT_RETRIES, DEFAULT_WAIT_MS};
use crate::util::{normalize_base_url, normalize_text_option};

pub const DEFAULT_BASE_URL: &str = "http://localhost:9001";

pub const BASE_URL_ENV: &str = "SHELF_API_BASE_URL";
pub const RETRIES_ENV: &str = "SHELF_RETRIES";
pub const RETRY_WAIT_ENV: &str = "SHELF_RETRY_WAIT_MS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Config for an explicit base URL with the default retry policy
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let base_url = normalize_base_url(base_url.as_ref()).map_err(Error::Config)?;
        Ok(Self {
            base_url,
            retry: RetryPolicy::default(),
        })
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Read `SHELF_API_BASE_URL`, `SHELF_RETRIES` and `SHELF_RETRY_WAIT_MS`,
    /// falling back to the defaults for unset or blank variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = normalize_text_option(lookup(BASE_URL_ENV))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let retries = parse_number(lookup(RETRIES_ENV), RETRIES_ENV)?.unwrap_or(DEFAULT_RETRIES);
        let wait_ms =
            parse_number(lookup(RETRY_WAIT_ENV), RETRY_WAIT_ENV)?.unwrap_or(DEFAULT_WAIT_MS);

        Ok(Self::new(base_url)?.with_retry(RetryPolicy::from_millis(retries, wait_ms)))
    }
}

fn parse_number<T: std::str::FromStr>(raw: Option<String>, key: &str) -> Result<Option<T>> {
    normalize_text_option(raw)
        .map(|value| {
            value.parse::<T>().map_err(|_| {
                Error::Config(format!(
                    "{key} must be a non-negative integer, got '{value}'"
                ))
            })
        })
        .transpose()
}
