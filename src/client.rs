//! Microsoft Graph client for one mailbox

use crate::config::GraphConfig;
use crate::error::{Error, Result};
use crate::kind::ItemKind;
use crate::service::{MailService, Page, PageRequest};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::{debug, info};

/// Longest response body kept in error messages.
const ERROR_BODY_MAX_LEN: usize = 200;

/// Graph REST client bound to the `/me` endpoints of one account
pub struct GraphClient {
    config: GraphConfig,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct MailFolder {
    #[serde(default, rename = "displayName")]
    display_name: Option<String>,
}

impl GraphClient {
    /// Build a client with the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: GraphConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Http(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    #[must_use]
    pub const fn config(&self) -> &GraphConfig {
        &self.config
    }

    fn first_page_url(&self, kind: ItemKind) -> String {
        format!(
            "{}/me/{}?$top={}",
            self.config.base_url,
            kind.collection(),
            self.config.page_size
        )
    }

    async fn get(&self, url: &str) -> Result<Response> {
        debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.config.access_token)
            .header("accept", "application/json")
            .send()
            .await?;
        check_status(url, response).await
    }
}

/// Turn a non-success response into [`Error::Status`].
async fn check_status(url: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(Error::Status {
        url: url.to_string(),
        status: status.as_u16(),
        body: truncate(&body, ERROR_BODY_MAX_LEN),
    })
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}

#[async_trait]
impl MailService for GraphClient {
    fn account(&self) -> &str {
        &self.config.account
    }

    async fn fetch_page(&self, request: &PageRequest) -> Result<Page> {
        let url = match request {
            PageRequest::First(kind) => self.first_page_url(*kind),
            PageRequest::Next(link) => link.clone(),
        };

        let body = self.get(&url).await?.text().await?;
        let page: Page = serde_json::from_str(&body)
            .map_err(|e| Error::Decode(format!("Malformed page from {url}: {e}")))?;

        info!(
            "Fetched {} record(s) for {}{}",
            page.records.len(),
            self.config.account,
            if page.continuation().is_some() {
                ", more pages follow"
            } else {
                ""
            }
        );
        Ok(page)
    }

    async fn folder_display_name(&self, folder_id: &str) -> Result<String> {
        let url = format!("{}/me/mailFolders/{folder_id}", self.config.base_url);
        let folder: MailFolder = self.get(&url).await?.json().await?;
        Ok(folder.display_name.unwrap_or_default())
    }

    async fn delete_item(&self, kind: ItemKind, id: &str) -> Result<()> {
        let url = format!("{}/me/{}/{id}", self.config.base_url, kind.collection());
        debug!("DELETE {}", url);
        let response = self
            .http
            .delete(&url)
            .bearer_auth(&self.config.access_token)
            .send()
            .await?;
        check_status(&url, response).await?;
        Ok(())
    }
}
