//! Canonical, structurally comparable mailbox items
//!
//! Remote records are loose bags of optional fields. They are decoded
//! through the all-optional `Graph*` views below and resolved into the
//! canonical models with empty-string fallbacks, so comparison logic
//! never sees a "missing" state.
//!
//! Canonical models serialize with the PascalCase keys used by the
//! expected-mailbox fixtures.

use crate::address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A mail item as compared across accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct MailModel {
    pub subject: String,
    pub body: String,
    pub sender_email: String,
    #[serde(rename = "ToRecipients")]
    pub recipient_nicknames: Vec<String>,
    pub parent_folder_name: String,
}

/// A calendar event as compared across accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct EventModel {
    pub subject: String,
    pub body: String,
    #[serde(rename = "Organizer")]
    pub organizer_email: String,
    #[serde(rename = "Attendees")]
    pub attendee_nicknames: Vec<String>,
}

/// A contact as compared across accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ContactModel {
    pub display_name: String,
}

impl fmt::Display for MailModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Mail subject={:?} sender={:?} to={:?} folder={:?}]",
            self.subject, self.sender_email, self.recipient_nicknames, self.parent_folder_name
        )
    }
}

impl fmt::Display for EventModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Event subject={:?} organizer={:?} attendees={:?}]",
            self.subject, self.organizer_email, self.attendee_nicknames
        )
    }
}

impl fmt::Display for ContactModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Contact {:?}]", self.display_name)
    }
}

// -- raw record views --

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GraphMessage {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body: Option<GraphBody>,
    #[serde(default)]
    pub sender: Option<GraphRecipient>,
    #[serde(default, rename = "toRecipients")]
    pub to_recipients: Option<Vec<GraphRecipient>>,
    #[serde(default, rename = "parentFolderId")]
    pub parent_folder_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GraphEvent {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body: Option<GraphBody>,
    #[serde(default)]
    pub organizer: Option<GraphRecipient>,
    #[serde(default)]
    pub attendees: Option<Vec<GraphRecipient>>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GraphContact {
    #[serde(default, rename = "displayName")]
    pub display_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GraphBody {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GraphRecipient {
    #[serde(default, rename = "emailAddress")]
    pub email_address: Option<GraphEmailAddress>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GraphEmailAddress {
    #[serde(default)]
    pub address: Option<String>,
}

impl GraphRecipient {
    fn address(&self) -> Option<&str> {
        self.email_address
            .as_ref()
            .and_then(|email| email.address.as_deref())
    }
}

fn address_of(recipient: Option<&GraphRecipient>) -> String {
    recipient
        .and_then(GraphRecipient::address)
        .unwrap_or_default()
        .to_string()
}

fn nicknames_of(recipients: Option<&[GraphRecipient]>) -> Vec<String> {
    address::nicknames(
        recipients
            .unwrap_or_default()
            .iter()
            .filter_map(GraphRecipient::address),
    )
}

fn content_of(body: Option<&GraphBody>) -> String {
    body.and_then(|b| b.content.clone()).unwrap_or_default()
}

impl GraphMessage {
    /// Resolve into the canonical model given the folder's display name.
    pub(crate) fn into_model(self, parent_folder_name: String) -> MailModel {
        MailModel {
            subject: self.subject.unwrap_or_default(),
            body: content_of(self.body.as_ref()),
            sender_email: address_of(self.sender.as_ref()),
            recipient_nicknames: nicknames_of(self.to_recipients.as_deref()),
            parent_folder_name,
        }
    }
}

impl From<GraphEvent> for EventModel {
    fn from(event: GraphEvent) -> Self {
        Self {
            subject: event.subject.unwrap_or_default(),
            body: content_of(event.body.as_ref()),
            organizer_email: address_of(event.organizer.as_ref()),
            attendee_nicknames: nicknames_of(event.attendees.as_deref()),
        }
    }
}

impl From<GraphContact> for ContactModel {
    fn from(contact: GraphContact) -> Self {
        Self {
            display_name: contact.display_name.unwrap_or_default(),
        }
    }
}
