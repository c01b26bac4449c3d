//! Migration orchestration engine interface
//!
//! The engine that actually moves data is an external service. The
//! verification scenarios only need to submit a job, read its status
//! and errors, and clean up the engine-side entities afterwards, so
//! that is all [`MigrationEngine`] exposes.

use crate::error::Result;
use crate::kind::ItemKind;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a submitted migration job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Credentials for the migration engine itself.
#[derive(Clone, Serialize, Deserialize)]
pub struct EngineCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for EngineCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// How the engine authenticates against one mail endpoint.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub use_administrative_credentials: bool,
    pub administrative_username: String,
    pub administrative_password: String,
}

impl fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointConfig")
            .field(
                "use_administrative_credentials",
                &self.use_administrative_credentials,
            )
            .field("administrative_username", &self.administrative_username)
            .field("administrative_password", &"<redacted>")
            .finish()
    }
}

/// Connector the engine uses for one side of the migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectorType {
    ExchangeOnline2,
    ExchangeServer,
    Gmail,
    Imap,
}

/// How much of the mailbox the engine processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueueType {
    /// Credential check only, no data moved.
    Verification,
    /// Full migration of the selected item types.
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectType {
    Mailbox,
}

/// Status of a migration job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MigrationStatus {
    NotStarted,
    Submitted,
    Processing,
    Stopping,
    Stopped,
    Completed,
    Failed,
}

impl MigrationStatus {
    /// The job will not change status any more.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Stopped)
    }
}

impl fmt::Display for MigrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Information,
    Warning,
    Error,
}

/// One error the engine recorded against a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectItemError {
    pub message: String,
    pub severity: ErrorSeverity,
}

/// Everything the engine needs to run one end-to-end migration.
#[derive(Debug, Clone)]
pub struct MigrationRequest {
    pub credentials: EngineCredentials,
    pub source: EndpointConfig,
    pub destination: EndpointConfig,
    pub source_connector: ConnectorType,
    pub destination_connector: ConnectorType,
    pub source_account: String,
    pub destination_account: String,
    pub queue_type: QueueType,
    /// Item kinds to migrate; `None` lets the engine decide.
    pub item_types: Option<Vec<ItemKind>>,
    pub project_type: ProjectType,
}

impl MigrationRequest {
    /// A full mailbox migration of mail, calendar and contacts between
    /// two Exchange Online accounts.
    #[must_use]
    pub fn full_exchange_online(
        credentials: EngineCredentials,
        source: EndpointConfig,
        destination: EndpointConfig,
        source_account: impl Into<String>,
        destination_account: impl Into<String>,
    ) -> Self {
        Self {
            credentials,
            source,
            destination,
            source_connector: ConnectorType::ExchangeOnline2,
            destination_connector: ConnectorType::ExchangeOnline2,
            source_account: source_account.into(),
            destination_account: destination_account.into(),
            queue_type: QueueType::Full,
            item_types: Some(ItemKind::ALL.to_vec()),
            project_type: ProjectType::Mailbox,
        }
    }

    /// The same request as a credential verification pass.
    #[must_use]
    pub fn into_verification(mut self) -> Self {
        self.queue_type = QueueType::Verification;
        self.item_types = None;
        self
    }
}

/// External migration orchestration engine.
#[async_trait]
pub trait MigrationEngine: Send + Sync {
    /// Submit an end-to-end migration and return its job id.
    async fn submit_migration(&self, request: &MigrationRequest) -> Result<JobId>;

    /// Current status of a job.
    async fn status(&self, job: &JobId) -> Result<MigrationStatus>;

    /// Errors recorded against a job.
    async fn errors(&self, job: &JobId) -> Result<Vec<ProjectItemError>>;

    /// Remove engine-side entities created by earlier submissions.
    async fn cleanup(&self) -> Result<()>;
}
