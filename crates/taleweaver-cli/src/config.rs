//! Front-end configuration read from the environment.

use std::time::Duration;

use taleweaver_client::ClientConfig;
use taleweaver_core::schedule::DEFAULT_POLL_INTERVAL;
use taleweaver_story::application::catalog::DEFAULT_PAGE_SIZE;

use crate::error::AppError;

/// Settings for one run of the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Story service connection.
    pub client: ClientConfig,
    /// Delay between job status checks.
    pub poll_interval: Duration,
    /// Stories per catalog page.
    pub page_size: u64,
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` or `AppError::Client` if a variable is
    /// set to an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`AppConfig::from_env`], reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` or `AppError::Client` if a variable is
    /// set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let client = ClientConfig::from_lookup(&lookup)?;

        let poll_interval = match positive(&lookup, "TALEWEAVER_POLL_INTERVAL_MS")? {
            Some(ms) => Duration::from_millis(ms),
            None => DEFAULT_POLL_INTERVAL,
        };
        let page_size = positive(&lookup, "TALEWEAVER_PAGE_SIZE")?.unwrap_or(DEFAULT_PAGE_SIZE);

        Ok(Self {
            client,
            poll_interval,
            page_size,
        })
    }
}

fn positive(lookup: impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<u64>, AppError> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => Ok(Some(value)),
        _ => Err(AppError::Config(format!(
            "{key} must be a positive whole number, got {raw:?}"
        ))),
    }
}
