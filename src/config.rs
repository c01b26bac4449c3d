//! Graph account and verification configuration

use crate::error::{Error, Result};
use std::env;
use std::time::Duration;

/// Default Graph API root.
pub const DEFAULT_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// Connection configuration for one Graph account.
///
/// Token acquisition is not handled here: the caller supplies an
/// already-issued bearer token.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Label used in logs and diagnostics, usually the mailbox address.
    pub account: String,
    pub base_url: String,
    pub access_token: String,
    /// Requested `$top` per page.
    pub page_size: usize,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl GraphConfig {
    /// Configuration with default paging and timeout.
    #[must_use]
    pub fn new(
        account: impl Into<String>,
        base_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            account: account.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            page_size: 50,
            timeout: Duration::from_secs(30),
        }
    }

    /// Load configuration for one account from environment variables
    ///
    /// Reads from `.env` file if present. With `prefix = "SOURCE"`:
    /// - `SOURCE_GRAPH_TOKEN` (required)
    ///
    /// Optional (with defaults):
    /// - `SOURCE_GRAPH_BASE_URL` (default: `https://graph.microsoft.com/v1.0`)
    /// - `SOURCE_GRAPH_ACCOUNT` (default: the prefix)
    /// - `SOURCE_GRAPH_PAGE_SIZE` (default: `50`)
    /// - `SOURCE_GRAPH_TIMEOUT_SECS` (default: `30`)
    pub fn from_env(prefix: &str) -> Result<Self> {
        dotenvy::dotenv().ok();

        let var = |name: &str| env::var(format!("{prefix}_GRAPH_{name}"));

        let page_size: usize = var("PAGE_SIZE")
            .unwrap_or_else(|_| "50".to_string())
            .parse()
            .map_err(|e| Error::Config(format!("Invalid {prefix}_GRAPH_PAGE_SIZE: {e}")))?;
        if page_size == 0 {
            return Err(Error::Config(format!(
                "{prefix}_GRAPH_PAGE_SIZE must be positive"
            )));
        }

        let timeout_secs: u64 = var("TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|e| Error::Config(format!("Invalid {prefix}_GRAPH_TIMEOUT_SECS: {e}")))?;

        Ok(Self {
            account: var("ACCOUNT").unwrap_or_else(|_| prefix.to_string()),
            base_url: var("BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            access_token: var("TOKEN")
                .map_err(|_| Error::Config(format!("{prefix}_GRAPH_TOKEN not set")))?,
            page_size,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Settings for the migration verification scenarios.
#[derive(Debug, Clone)]
pub struct VerifySettings {
    /// Delay between migration status polls.
    pub poll_interval: Duration,
    /// Give up waiting for a terminal status after this long.
    pub deadline: Duration,
}

impl Default for VerifySettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            deadline: Duration::from_secs(60 * 60),
        }
    }
}
