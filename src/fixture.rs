//! Expected mailbox fixtures
//!
//! A fixture declares the mail, events and contacts a source account
//! is seeded with. It is checked against a fresh source snapshot
//! before migrating.

use crate::error::{Error, Result};
use crate::model::{ContactModel, EventModel, MailModel};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Expected contents of a source mailbox.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ExpectedMailbox {
    pub mails: Vec<MailModel>,
    pub events: Vec<EventModel>,
    pub contacts: Vec<ContactModel>,
}

impl ExpectedMailbox {
    /// Load a fixture from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid
    /// fixture document.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading fixture {}", path.display());
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
            .map_err(|e| Error::Fixture(format!("{}: {e}", path.display())))
    }

    /// Parse a fixture document.
    ///
    /// # Errors
    ///
    /// Returns an error if `raw` is not a valid fixture document.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| Error::Fixture(e.to_string()))
    }
}

/// Resolve `file_name` next to the running binary.
///
/// # Errors
///
/// Returns an error if the current executable path is unavailable.
pub fn fixture_path(file_name: &str) -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let dir = exe
        .parent()
        .ok_or_else(|| Error::Fixture(format!("{} has no parent directory", exe.display())))?;
    Ok(dir.join(file_name))
}
