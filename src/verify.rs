//! End-to-end migration verification scenarios
//!
//! [`MigrationVerifier`] strings the snapshot, erase and reconcile
//! pieces together around one run of the migration engine. Anything
//! below the snapshot boundary degrades and keeps going; anything the
//! scenario asserts is returned as a hard [`Error`].

use crate::config::VerifySettings;
use crate::eraser::{BulkEraser, EraseReport};
use crate::error::{Error, Result};
use crate::fixture::ExpectedMailbox;
use crate::kind::ItemKind;
use crate::migration::{
    ErrorSeverity, JobId, MigrationEngine, MigrationRequest, MigrationStatus, ProjectItemError,
};
use crate::model::{ContactModel, EventModel, MailModel};
use crate::reconcile::{compare, contains_all};
use crate::service::MailService;
use crate::snapshot::{Snapshot, SnapshotBuilder};
use tokio::time::{Instant, sleep};
use tracing::{info, warn};

/// Mail, event and contact snapshots of one account.
#[derive(Debug, Clone)]
pub struct AccountSnapshots {
    pub mails: Snapshot<MailModel>,
    pub events: Snapshot<EventModel>,
    pub contacts: Snapshot<ContactModel>,
}

impl AccountSnapshots {
    /// Capture all three kinds, one after the other.
    pub async fn capture(service: &dyn MailService) -> Self {
        let builder = SnapshotBuilder::new(service);
        Self {
            mails: builder.mails().await,
            events: builder.events().await,
            contacts: builder.contacts().await,
        }
    }

    /// Fail if any enumeration stopped early.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompleteSnapshot`] for the first incomplete kind.
    pub fn require_complete(&self) -> Result<()> {
        self.mails.require_complete()?;
        self.events.require_complete()?;
        self.contacts.require_complete()?;
        Ok(())
    }

    /// Fail if any kind still holds items.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotEmpty`] for the first non-empty kind.
    pub fn require_empty(&self) -> Result<()> {
        for (kind, account, count) in [
            (ItemKind::Mail, &self.mails.account, self.mails.len()),
            (ItemKind::Event, &self.events.account, self.events.len()),
            (ItemKind::Contact, &self.contacts.account, self.contacts.len()),
        ] {
            if count > 0 {
                return Err(Error::NotEmpty {
                    kind,
                    account: account.clone(),
                    count,
                });
            }
        }
        Ok(())
    }

    /// Check that every item of `expected` is present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Containment`] for the first kind with missing items.
    pub fn require_contains(&self, expected: &ExpectedMailbox) -> Result<()> {
        contains_all(ItemKind::Mail, &expected.mails, &self.mails.items)
            .into_result(&self.mails.account)?;
        contains_all(ItemKind::Event, &expected.events, &self.events.items)
            .into_result(&self.events.account)?;
        contains_all(ItemKind::Contact, &expected.contacts, &self.contacts.items)
            .into_result(&self.contacts.account)?;
        Ok(())
    }

    /// Equivalence failures of `destination` against `self`, every kind.
    #[must_use]
    pub fn equivalence_failures(&self, destination: &Self) -> Vec<String> {
        let source_account = &self.mails.account;
        let destination_account = &destination.mails.account;

        let mut failures = compare(ItemKind::Mail, &self.mails.items, &destination.mails.items)
            .failures(source_account, destination_account);
        failures.extend(
            compare(ItemKind::Event, &self.events.items, &destination.events.items)
                .failures(source_account, destination_account),
        );
        failures.extend(
            compare(
                ItemKind::Contact,
                &self.contacts.items,
                &destination.contacts.items,
            )
            .failures(source_account, destination_account),
        );
        failures
    }
}

/// Outcome of a successful end-to-end verification.
#[derive(Debug)]
pub struct VerificationReport {
    pub job_id: JobId,
    pub cleanup: Vec<EraseReport>,
    pub source: AccountSnapshots,
    pub destination: AccountSnapshots,
    /// Non-blocking engine messages (information and warnings).
    pub engine_notes: Vec<ProjectItemError>,
}

/// Runs verification scenarios for one source/destination pair.
pub struct MigrationVerifier<'a> {
    source: &'a dyn MailService,
    destination: &'a dyn MailService,
    engine: &'a dyn MigrationEngine,
    settings: VerifySettings,
}

impl<'a> MigrationVerifier<'a> {
    #[must_use]
    pub const fn new(
        source: &'a dyn MailService,
        destination: &'a dyn MailService,
        engine: &'a dyn MigrationEngine,
        settings: VerifySettings,
    ) -> Self {
        Self {
            source,
            destination,
            engine,
            settings,
        }
    }

    /// Migrate the source into a freshly emptied destination and check
    /// the destination ends up equivalent to the source.
    ///
    /// Steps: capture the source, erase the destination and confirm it
    /// is empty, check the source against `expected`, run the
    /// migration, require `Completed` with no error-severity messages,
    /// then compare counts and contents for every kind.
    ///
    /// # Errors
    ///
    /// Returns the first failed step; the final comparison reports
    /// every failing kind at once in [`Error::NotEquivalent`].
    pub async fn run_full_migration(
        &self,
        expected: &ExpectedMailbox,
        request: &MigrationRequest,
    ) -> Result<VerificationReport> {
        let source = AccountSnapshots::capture(self.source).await;
        source.require_complete()?;

        let cleanup = BulkEraser::new(self.destination).erase_all().await;
        let emptied = AccountSnapshots::capture(self.destination).await;
        emptied.require_complete()?;
        emptied.require_empty()?;

        source.require_contains(expected)?;

        let job_id = self.engine.submit_migration(request).await?;
        info!(
            "Submitted migration {} from {} to {}",
            job_id, request.source_account, request.destination_account
        );

        let status = self.wait_for_terminal(&job_id).await?;
        if status != MigrationStatus::Completed {
            return Err(Error::MigrationStatus {
                job_id: job_id.to_string(),
                status: status.to_string(),
                expected: MigrationStatus::Completed.to_string(),
            });
        }

        let (blocking, engine_notes): (Vec<_>, Vec<_>) = self
            .engine
            .errors(&job_id)
            .await?
            .into_iter()
            .partition(|e| e.severity == ErrorSeverity::Error);
        if !blocking.is_empty() {
            return Err(Error::MigrationErrors {
                job_id: job_id.to_string(),
                messages: blocking.into_iter().map(|e| e.message).collect(),
            });
        }

        let destination = AccountSnapshots::capture(self.destination).await;
        destination.require_complete()?;

        let failures = source.equivalence_failures(&destination);
        if !failures.is_empty() {
            return Err(Error::NotEquivalent {
                job_id: job_id.to_string(),
                failures,
            });
        }

        info!("Migration {} verified", job_id);
        Ok(VerificationReport {
            job_id,
            cleanup,
            source,
            destination,
            engine_notes,
        })
    }

    /// Run a verification-only job that is expected to fail with
    /// exactly one error carrying `expected_message`.
    ///
    /// # Errors
    ///
    /// Returns an error if the job does not end `Failed` or reports
    /// anything other than that single message.
    pub async fn run_credentials_check(
        &self,
        request: &MigrationRequest,
        expected_message: &str,
    ) -> Result<JobId> {
        let job_id = self.engine.submit_migration(request).await?;
        let status = self.wait_for_terminal(&job_id).await?;
        if status != MigrationStatus::Failed {
            return Err(Error::MigrationStatus {
                job_id: job_id.to_string(),
                status: status.to_string(),
                expected: MigrationStatus::Failed.to_string(),
            });
        }

        let errors = self.engine.errors(&job_id).await?;
        match errors.as_slice() {
            [only] if only.message == expected_message => Ok(job_id),
            _ => Err(Error::UnexpectedErrors {
                job_id: job_id.to_string(),
                expected: expected_message.to_string(),
                actual: errors.into_iter().map(|e| e.message).collect(),
            }),
        }
    }

    /// Clean up engine-side entities, then erase the destination.
    ///
    /// The destination is erased even when the engine cleanup fails.
    ///
    /// # Errors
    ///
    /// Returns the engine cleanup error, after erasing.
    pub async fn teardown(&self) -> Result<Vec<EraseReport>> {
        let engine_result = self.engine.cleanup().await;
        if let Err(e) = &engine_result {
            warn!("Migration engine cleanup failed: {}", e);
        }
        let reports = BulkEraser::new(self.destination).erase_all().await;
        engine_result?;
        Ok(reports)
    }

    async fn wait_for_terminal(&self, job_id: &JobId) -> Result<MigrationStatus> {
        let deadline = Instant::now() + self.settings.deadline;
        loop {
            let status = self.engine.status(job_id).await?;
            if status.is_terminal() {
                return Ok(status);
            }
            if Instant::now() + self.settings.poll_interval > deadline {
                return Err(Error::MigrationStatus {
                    job_id: job_id.to_string(),
                    status: status.to_string(),
                    expected: "a terminal status before the deadline".to_string(),
                });
            }
            info!("Migration {} is {}, polling again", job_id, status);
            sleep(self.settings.poll_interval).await;
        }
    }
}
