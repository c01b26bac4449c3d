//! Mailbox migration verification toolkit
//!
//! Captures snapshots of a mailbox's mail, calendar events and
//! contacts through the Microsoft Graph API, normalizes them into
//! comparable models, and reconciles a source account against a
//! destination account after an external engine migrated it. Also
//! provides best-effort bulk cleanup for resetting test accounts.
//!
//! The remote service and the migration engine sit behind the
//! [`MailService`] and [`MigrationEngine`] traits; [`GraphClient`] is
//! the Graph implementation of the former.

mod address;
mod client;
mod config;
mod eraser;
mod error;
mod fixture;
mod kind;
mod migration;
mod model;
mod pager;
mod reconcile;
mod service;
mod snapshot;
mod verify;

pub use address::{EmailAddress, nicknames, valid_distinct};
pub use client::GraphClient;
pub use config::{DEFAULT_BASE_URL, GraphConfig, VerifySettings};
pub use eraser::{BulkEraser, EraseFailure, EraseReport};
pub use error::{Error, Result};
pub use fixture::{ExpectedMailbox, fixture_path};
pub use kind::ItemKind;
pub use migration::{
    ConnectorType, EndpointConfig, EngineCredentials, ErrorSeverity, JobId, MigrationEngine,
    MigrationRequest, MigrationStatus, ProjectItemError, ProjectType, QueueType,
};
pub use model::{ContactModel, EventModel, MailModel};
pub use pager::{Enumeration, Paginator};
pub use reconcile::{ContainmentReport, EquivalenceReport, compare, contains_all};
pub use service::{EVENT_MESSAGE_REQUEST, MailService, Page, PageRequest, RawRecord};
pub use snapshot::{Completeness, Snapshot, SnapshotBuilder};
pub use verify::{AccountSnapshots, MigrationVerifier, VerificationReport};
