//! Remote item service seam
//!
//! The snapshot, paging and erase logic only needs three remote
//! capabilities: fetch a page of a collection, resolve a mail folder
//! name, and delete an item. [`MailService`] captures exactly those so
//! the core can run against [`crate::GraphClient`] or a scripted stub.

use crate::error::{Error, Result};
use crate::kind::ItemKind;
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Discriminator Graph puts on invitation artifacts delivered as mail.
pub const EVENT_MESSAGE_REQUEST: &str = "#microsoft.graph.eventMessageRequest";

/// Which page to fetch next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    /// The first page of a kind's collection.
    First(ItemKind),
    /// A continuation handle returned by the previous page.
    Next(String),
}

/// One page of a remote collection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Page {
    #[serde(default, rename = "value")]
    pub records: Vec<RawRecord>,
    #[serde(default, rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

impl Page {
    /// Only a non-blank continuation handle counts.
    #[must_use]
    pub fn continuation(&self) -> Option<&str> {
        self.next_link
            .as_deref()
            .map(str::trim)
            .filter(|link| !link.is_empty())
    }
}

/// One remote item as returned by the service, left undecoded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Value);

impl RawRecord {
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self(value)
    }

    /// The service-assigned identifier, if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    /// The `@odata.type` discriminator, if present.
    #[must_use]
    pub fn odata_type(&self) -> Option<&str> {
        self.0.get("@odata.type").and_then(Value::as_str)
    }

    /// Whether this mail record is a calendar invitation artifact.
    #[must_use]
    pub fn is_invitation(&self) -> bool {
        self.odata_type() == Some(EVENT_MESSAGE_REQUEST)
    }

    /// Decode into a typed view of the record.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        T::deserialize(&self.0).map_err(|e| {
            Error::Decode(format!(
                "record {}: {e}",
                self.id().unwrap_or("<missing-id>")
            ))
        })
    }

    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }
}

/// Remote mail, calendar and contact service for one account.
///
/// Every method is one remote call and one suspension point.
#[async_trait]
pub trait MailService: Send + Sync {
    /// Label of the account this service is bound to.
    fn account(&self) -> &str;

    /// Fetch one page of a collection.
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page>;

    /// Resolve a mail folder id to its display name.
    async fn folder_display_name(&self, folder_id: &str) -> Result<String>;

    /// Delete one item by id.
    async fn delete_item(&self, kind: ItemKind, id: &str) -> Result<()>;
}
