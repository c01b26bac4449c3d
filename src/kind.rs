//! Mailbox item kinds
//!
//! Provides a strongly-typed enum for the three item collections a
//! mailbox migration carries instead of raw collection strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A kind of mailbox item backed by one remote collection.
///
/// # Examples
///
/// ```
/// use mailbox_verify::ItemKind;
///
/// assert_eq!(ItemKind::Mail.collection(), "messages");
/// assert_eq!(ItemKind::Event.to_string(), "events");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// Mail messages, including invitation artifacts.
    Mail,
    /// Calendar events.
    Event,
    /// Personal contacts.
    Contact,
}

impl ItemKind {
    /// Every kind, in cleanup order.
    pub const ALL: [Self; 3] = [Self::Mail, Self::Event, Self::Contact];

    /// The remote collection segment under `/me`.
    #[must_use]
    pub const fn collection(self) -> &'static str {
        match self {
            Self::Mail => "messages",
            Self::Event => "events",
            Self::Contact => "contacts",
        }
    }

    /// Plural label used in logs and diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Mail => "mails",
            Self::Event => "events",
            Self::Contact => "contacts",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mail" | "mails" | "messages" => Ok(Self::Mail),
            "event" | "events" | "calendar" => Ok(Self::Event),
            "contact" | "contacts" => Ok(Self::Contact),
            other => Err(format!("unknown item kind '{other}'")),
        }
    }
}
