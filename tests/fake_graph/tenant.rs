//! Test data model for the fake Graph server
//!
//! Provides a builder-style API for constructing one account's state:
//!
//! ```ignore
//! let tenant = TenantBuilder::new("token")
//!     .page_size(2)
//!     .folder("inbox-id", "Inbox")
//!     .mail("Hello", "al@src.test", &["bo@src.test"], "inbox-id")
//!     .invitation("Sync meeting", "inbox-id")
//!     .event("Standup", "al@src.test", &["bo@src.test"])
//!     .contact("Ann Example")
//!     .build();
//! ```
//!
//! Records are stored as the JSON objects Graph would return so the
//! server can page them out verbatim.

use serde_json::{Value, json};
use std::collections::HashSet;

/// One account on the fake Graph service.
#[derive(Debug, Clone)]
pub struct Tenant {
    /// Bearer token the server accepts.
    pub token: String,
    /// Records per page, regardless of the `$top` the client asks for.
    pub page_size: usize,
    /// `(id, displayName)` pairs served by `/me/mailFolders/{id}`.
    pub folders: Vec<(String, String)>,
    pub messages: Vec<Value>,
    pub events: Vec<Value>,
    pub contacts: Vec<Value>,
    /// Ids whose DELETE answers 500 and leaves the record in place.
    pub failing_deletes: HashSet<String>,
    /// `(collection, skip)` pages that answer 500.
    pub failing_pages: HashSet<(String, usize)>,
    /// Every request line the server handled, in order.
    pub requests: Vec<String>,
    next_id: usize,
}

impl Tenant {
    /// The record list behind a collection segment.
    pub fn collection(&self, name: &str) -> Option<&Vec<Value>> {
        match name {
            "messages" => Some(&self.messages),
            "events" => Some(&self.events),
            "contacts" => Some(&self.contacts),
            _ => None,
        }
    }

    pub fn collection_mut(&mut self, name: &str) -> Option<&mut Vec<Value>> {
        match name {
            "messages" => Some(&mut self.messages),
            "events" => Some(&mut self.events),
            "contacts" => Some(&mut self.contacts),
            _ => None,
        }
    }

    pub fn folder_name(&self, id: &str) -> Option<&str> {
        self.folders
            .iter()
            .find(|(folder_id, _)| folder_id == id)
            .map(|(_, name)| name.as_str())
    }

    /// Allocate a fresh record id with the given prefix.
    pub fn allocate_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    pub fn push_message(&mut self, mut record: Value) {
        record["id"] = json!(self.allocate_id("msg"));
        self.messages.push(record);
    }

    pub fn push_event(&mut self, mut record: Value) {
        record["id"] = json!(self.allocate_id("evt"));
        self.events.push(record);
    }

    pub fn push_contact(&mut self, mut record: Value) {
        record["id"] = json!(self.allocate_id("ctc"));
        self.contacts.push(record);
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.events.is_empty() && self.contacts.is_empty()
    }
}

fn recipient(address: &str) -> Value {
    json!({"emailAddress": {"name": address, "address": address}})
}

/// Graph JSON for a plain mail message.
pub fn mail_record(subject: &str, sender: &str, to: &[&str], folder_id: &str) -> Value {
    json!({
        "@odata.type": "#microsoft.graph.message",
        "subject": subject,
        "body": {"contentType": "html", "content": format!("<p>{subject}</p>")},
        "sender": recipient(sender),
        "toRecipients": to.iter().map(|a| recipient(a)).collect::<Vec<_>>(),
        "parentFolderId": folder_id,
    })
}

/// Graph JSON for a calendar event.
pub fn event_record(subject: &str, organizer: &str, attendees: &[&str]) -> Value {
    json!({
        "subject": subject,
        "body": {"contentType": "text", "content": format!("{subject} agenda")},
        "organizer": recipient(organizer),
        "attendees": attendees
            .iter()
            .map(|a| json!({"type": "required", "emailAddress": {"address": a}}))
            .collect::<Vec<_>>(),
    })
}

/// Builder for constructing a `Tenant` step by step.
pub struct TenantBuilder {
    tenant: Tenant,
}

impl TenantBuilder {
    pub fn new(token: &str) -> Self {
        Self {
            tenant: Tenant {
                token: token.to_string(),
                page_size: 10,
                folders: Vec::new(),
                messages: Vec::new(),
                events: Vec::new(),
                contacts: Vec::new(),
                failing_deletes: HashSet::new(),
                failing_pages: HashSet::new(),
                requests: Vec::new(),
                next_id: 0,
            },
        }
    }

    pub const fn page_size(mut self, size: usize) -> Self {
        self.tenant.page_size = size;
        self
    }

    pub fn folder(mut self, id: &str, name: &str) -> Self {
        self.tenant.folders.push((id.to_string(), name.to_string()));
        self
    }

    pub fn mail(mut self, subject: &str, sender: &str, to: &[&str], folder_id: &str) -> Self {
        self.tenant
            .push_message(mail_record(subject, sender, to, folder_id));
        self
    }

    /// A calendar invitation delivered into the mailbox.
    pub fn invitation(mut self, subject: &str, folder_id: &str) -> Self {
        let mut record = mail_record(subject, "organizer@src.test", &[], folder_id);
        record["@odata.type"] = json!("#microsoft.graph.eventMessageRequest");
        self.tenant.push_message(record);
        self
    }

    /// An arbitrary message record, for malformed-data cases.
    pub fn raw_message(mut self, record: Value) -> Self {
        self.tenant.push_message(record);
        self
    }

    pub fn event(mut self, subject: &str, organizer: &str, attendees: &[&str]) -> Self {
        self.tenant
            .push_event(event_record(subject, organizer, attendees));
        self
    }

    pub fn contact(mut self, display_name: &str) -> Self {
        self.tenant
            .push_contact(json!({"displayName": display_name}));
        self
    }

    pub fn failing_delete(mut self, id: &str) -> Self {
        self.tenant.failing_deletes.insert(id.to_string());
        self
    }

    pub fn failing_page(mut self, collection: &str, skip: usize) -> Self {
        self.tenant
            .failing_pages
            .insert((collection.to_string(), skip));
        self
    }

    pub fn build(self) -> Tenant {
        self.tenant
    }
}
