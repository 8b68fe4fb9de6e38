//! Client configuration read from the environment.

use std::time::Duration;

use reqwest::Url;

use crate::error::ClientError;

/// Base URL used when `TALEWEAVER_API_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Request timeout used when `TALEWEAVER_HTTP_TIMEOUT_SECS` is unset.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the story service lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Configuration for `base_url` with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` if `base_url` is not an absolute
    /// http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Reads `TALEWEAVER_API_URL` and `TALEWEAVER_HTTP_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` if a variable is set to an invalid
    /// value.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`ClientConfig::from_env`], reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` if a variable is set to an invalid
    /// value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let base_url = lookup("TALEWEAVER_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        let timeout = match lookup("TALEWEAVER_HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().ok().filter(|secs| *secs > 0);
                let Some(secs) = secs else {
                    return Err(ClientError::Config(format!(
                        "TALEWEAVER_HTTP_TIMEOUT_SECS must be a positive whole number of seconds, \
                         got {raw:?}"
                    )));
                };
                Duration::from_secs(secs)
            }
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            base_url: parse_base_url(&base_url)?,
            timeout,
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let url = Url::parse(raw)
        .map_err(|e| ClientError::Config(format!("invalid story service URL {raw:?}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ClientError::Config(format!(
            "story service URL must be an http(s) URL, got {raw:?}"
        )));
    }
    Ok(url)
}
