//! Email address normalization
//!
//! Recipient and attendee lists coming back from the remote service
//! may hold malformed entries, placeholders injected by the migration
//! engine, or the same mailbox several times with different casing or
//! display wrapping. This module keeps only valid addresses, folds
//! duplicates, and reduces each address to its nickname (local part)
//! so lists from two tenants can be compared.

use std::collections::HashSet;
use std::fmt;

/// A syntactically valid, lower-cased email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parse a raw address, unwrapping `Name <addr>` display forms.
    ///
    /// Returns `None` for anything that is not a plausible address.
    ///
    /// # Examples
    ///
    /// ```
    /// use mailbox_verify::EmailAddress;
    ///
    /// let addr = EmailAddress::parse("Alice <Alice@Example.com>").unwrap();
    /// assert_eq!(addr.as_str(), "alice@example.com");
    /// assert_eq!(addr.nickname(), "alice");
    ///
    /// assert!(EmailAddress::parse("not-an-email").is_none());
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let mut candidate = raw.trim();
        if let Some(start) = candidate.rfind('<') {
            candidate = candidate[start + 1..].strip_suffix('>')?.trim();
        }

        let (local, domain) = candidate.split_once('@')?;
        if !is_valid_local(local) || !is_valid_domain(domain) {
            return None;
        }

        Some(Self(candidate.to_lowercase()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The local part, used as the comparison key across tenants.
    #[must_use]
    pub fn nickname(&self) -> &str {
        self.0.split_once('@').map_or(self.0.as_str(), |(local, _)| local)
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_valid_local(local: &str) -> bool {
    !local.is_empty()
        && !local.starts_with('.')
        && !local.ends_with('.')
        && !local.contains("..")
        && local
            .chars()
            .all(|c| !c.is_whitespace() && !c.is_control() && !"<>()[]\\,;:\"@".contains(c))
}

fn is_valid_domain(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_alphanumeric() || c == '-')
        })
}

/// Keep valid addresses, dropping duplicates case-insensitively.
///
/// First-seen order is preserved. Invalid entries are skipped, never
/// reported as errors.
pub fn valid_distinct<I, S>(raw: I) -> Vec<EmailAddress>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    raw.into_iter()
        .filter_map(|entry| EmailAddress::parse(entry.as_ref()))
        .filter(|addr| seen.insert(addr.clone()))
        .collect()
}

/// Nicknames of the valid, distinct addresses in `raw`.
pub fn nicknames<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    valid_distinct(raw)
        .iter()
        .map(|addr| addr.nickname().to_string())
        .collect()
}
