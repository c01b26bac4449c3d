//! Per-account snapshots of mail, events and contacts
//!
//! A [`Snapshot`] is built fresh for every comparison and never cached.
//! Building is best-effort: a record that cannot be mapped is dropped
//! and counted, and a failed enumeration yields an empty or partial
//! snapshot flagged [`Completeness::Incomplete`] instead of an error.

use crate::error::{Error, Result};
use crate::kind::ItemKind;
use crate::model::{ContactModel, EventModel, GraphContact, GraphEvent, GraphMessage, MailModel};
use crate::pager::Paginator;
use crate::service::{MailService, RawRecord};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Whether the enumeration behind a snapshot ran to the end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Completeness {
    Complete,
    /// Enumeration stopped early; items hold what was fetched before.
    Incomplete { reason: String },
}

/// All items of one kind in one account at one instant.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<T> {
    pub account: String,
    pub kind: ItemKind,
    pub captured_at: DateTime<Utc>,
    pub items: Vec<T>,
    /// Records skipped because they failed to map or repeated an id.
    pub dropped: usize,
    pub completeness: Completeness,
}

impl<T> Snapshot<T> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self.completeness, Completeness::Complete)
    }

    /// Refuse a snapshot whose enumeration stopped early.
    ///
    /// An empty snapshot is ambiguous on its own: the account may be
    /// empty or the fetch may have failed. Verification steps call
    /// this before trusting one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompleteSnapshot`] when enumeration failed.
    pub fn require_complete(&self) -> Result<&Self> {
        match &self.completeness {
            Completeness::Complete => Ok(self),
            Completeness::Incomplete { reason } => Err(Error::IncompleteSnapshot {
                kind: self.kind,
                account: self.account.clone(),
                reason: reason.clone(),
            }),
        }
    }
}

/// Builds snapshots for the account behind one [`MailService`].
pub struct SnapshotBuilder<'a> {
    service: &'a dyn MailService,
}

/// Outcome of mapping one raw record.
type Mapped<T> = Option<T>;

impl<'a> SnapshotBuilder<'a> {
    #[must_use]
    pub const fn new(service: &'a dyn MailService) -> Self {
        Self { service }
    }

    /// Snapshot of all mail, excluding calendar invitation artifacts.
    ///
    /// Each mail's parent folder name is resolved with one remote
    /// lookup; a failed lookup drops the mail.
    pub async fn mails(&self) -> Snapshot<MailModel> {
        self.build(ItemKind::Mail, |record| self.map_mail(record))
            .await
    }

    /// Snapshot of all calendar events.
    pub async fn events(&self) -> Snapshot<EventModel> {
        self.build(ItemKind::Event, |record| async move {
            decode::<GraphEvent>(record).map(EventModel::from)
        })
        .await
    }

    /// Snapshot of all contacts.
    pub async fn contacts(&self) -> Snapshot<ContactModel> {
        self.build(ItemKind::Contact, |record| async move {
            decode::<GraphContact>(record).map(ContactModel::from)
        })
        .await
    }

    async fn map_mail(&self, record: RawRecord) -> Mapped<MailModel> {
        if record.is_invitation() {
            debug!(
                "Skipping invitation artifact {}",
                record.id().unwrap_or("<missing-id>")
            );
            return None;
        }

        let message = decode::<GraphMessage>(record.clone())?;
        let folder_name = match message.parent_folder_id.as_deref() {
            Some(folder_id) if !folder_id.is_empty() => {
                match self.service.folder_display_name(folder_id).await {
                    Ok(name) => name,
                    Err(e) => {
                        warn!(
                            "Dropping mail {}: folder lookup for {} failed: {}",
                            record.id().unwrap_or("<missing-id>"),
                            folder_id,
                            e
                        );
                        return None;
                    }
                }
            }
            _ => String::new(),
        };

        Some(message.into_model(folder_name))
    }

    async fn build<T, F, Fut>(&self, kind: ItemKind, mut map: F) -> Snapshot<T>
    where
        F: FnMut(RawRecord) -> Fut,
        Fut: Future<Output = Mapped<T>>,
    {
        let account = self.service.account().to_string();
        let captured_at = Utc::now();
        let enumeration = Paginator::new(self.service, kind).collect_all().await;

        let completeness = match &enumeration.error {
            None => Completeness::Complete,
            Some(e) => Completeness::Incomplete {
                reason: e.to_string(),
            },
        };
        let fetched = enumeration.records.len();

        let mut seen_ids = HashSet::new();
        let mut items = Vec::with_capacity(fetched);
        let mut dropped = 0usize;
        let mut filtered = 0usize;

        for record in enumeration.records {
            if let Some(id) = record.id()
                && !seen_ids.insert(id.to_string())
            {
                debug!("Dropping repeated {} id {}", kind, id);
                dropped += 1;
                continue;
            }

            let invitation = kind == ItemKind::Mail && record.is_invitation();
            match map(record).await {
                Some(item) => items.push(item),
                None if invitation => filtered += 1,
                None => dropped += 1,
            }
        }

        if enumeration.error.is_some() {
            warn!(
                "{} snapshot of {} is incomplete ({} record(s) fetched)",
                kind, account, fetched
            );
        }
        info!(
            "Captured {} {} for {} ({} dropped, {} invitation(s) filtered)",
            items.len(),
            kind,
            account,
            dropped,
            filtered
        );

        Snapshot {
            account,
            kind,
            captured_at,
            items,
            dropped,
            completeness,
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(record: RawRecord) -> Mapped<T> {
    match record.decode::<T>() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Dropping malformed record: {}", e);
            None
        }
    }
}
