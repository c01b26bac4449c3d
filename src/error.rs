//! Error types for mailbox-verify

use crate::kind::ItemKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Graph request to {url} failed with status {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Fixture error: {0}")]
    Fixture(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(
        "{kind} for {account} do not contain the expected data: {} item(s) missing: {}",
        missing.len(),
        missing.join(", ")
    )]
    Containment {
        kind: ItemKind,
        account: String,
        missing: Vec<String>,
    },

    #[error("{kind} snapshot of {account} is not empty: {count} item(s) left")]
    NotEmpty {
        kind: ItemKind,
        account: String,
        count: usize,
    },

    #[error("{kind} snapshot of {account} is incomplete: {reason}")]
    IncompleteSnapshot {
        kind: ItemKind,
        account: String,
        reason: String,
    },

    #[error("Migration job {job_id} is not equivalent:\n{}", failures.join("\n"))]
    NotEquivalent {
        job_id: String,
        failures: Vec<String>,
    },

    #[error("Migration job {job_id} ended with status {status}, expected {expected}")]
    MigrationStatus {
        job_id: String,
        status: String,
        expected: String,
    },

    #[error("Migration job {job_id} reported errors: {}", messages.join("; "))]
    MigrationErrors {
        job_id: String,
        messages: Vec<String>,
    },

    #[error(
        "Migration job {job_id} reported [{}], expected exactly [{expected}]",
        actual.join("; ")
    )]
    UnexpectedErrors {
        job_id: String,
        expected: String,
        actual: Vec<String>,
    },

    #[error("Migration engine error: {0}")]
    Engine(String),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
