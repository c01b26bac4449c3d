//! Best-effort bulk deletion of mailbox items
//!
//! Used to reset a test account before a run and to tear it down
//! afterwards. Every id is deleted with its own remote call; a failed
//! delete is logged and recorded, never retried, and never stops the
//! remaining deletes. Whatever survives shows up in the next snapshot.

use crate::kind::ItemKind;
use crate::pager::Paginator;
use crate::service::MailService;
use futures::StreamExt;
use serde::Serialize;
use tracing::{info, warn};

/// A delete that did not go through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EraseFailure {
    pub id: String,
    pub error: String,
}

/// What one erase pass did for one item kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EraseReport {
    pub kind: ItemKind,
    pub attempted: usize,
    pub deleted: usize,
    pub failures: Vec<EraseFailure>,
    /// Set when enumerating the ids stopped early.
    pub enumeration_error: Option<String>,
}

impl EraseReport {
    const fn new(kind: ItemKind) -> Self {
        Self {
            kind,
            attempted: 0,
            deleted: 0,
            failures: Vec::new(),
            enumeration_error: None,
        }
    }

    /// Every enumerated item was deleted and enumeration finished.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.enumeration_error.is_none()
    }
}

/// Deletes every item of a kind from the account behind a service.
pub struct BulkEraser<'a> {
    service: &'a dyn MailService,
}

impl<'a> BulkEraser<'a> {
    #[must_use]
    pub const fn new(service: &'a dyn MailService) -> Self {
        Self { service }
    }

    /// Delete every item of `kind`.
    ///
    /// All ids are enumerated before the first delete so deletions do
    /// not shift the pages still to be read.
    pub async fn erase(&self, kind: ItemKind) -> EraseReport {
        let mut report = EraseReport::new(kind);
        let mut ids = Vec::new();

        let mut records = Box::pin(Paginator::new(self.service, kind).into_stream());
        while let Some(item) = records.next().await {
            match item {
                Ok(record) => match record.id() {
                    Some(id) => ids.push(id.to_string()),
                    None => warn!("Skipping {} record without id", kind),
                },
                Err(e) => {
                    warn!(
                        "Enumerating {} of {} for erase failed: {}",
                        kind,
                        self.service.account(),
                        e
                    );
                    report.enumeration_error = Some(e.to_string());
                }
            }
        }
        drop(records);

        for id in ids {
            report.attempted += 1;
            match self.service.delete_item(kind, &id).await {
                Ok(()) => report.deleted += 1,
                Err(e) => {
                    warn!("Failed to delete {} {}: {}", kind, id, e);
                    report.failures.push(EraseFailure {
                        id,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Erased {}/{} {} from {}",
            report.deleted,
            report.attempted,
            kind,
            self.service.account()
        );
        report
    }

    /// Erase mail, then events, then contacts.
    pub async fn erase_all(&self) -> Vec<EraseReport> {
        let mut reports = Vec::with_capacity(ItemKind::ALL.len());
        for kind in ItemKind::ALL {
            reports.push(self.erase(kind).await);
        }
        reports
    }
}
