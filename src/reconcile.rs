//! Containment and equivalence checks between snapshots
//!
//! Both checks compare canonical models structurally and ignore order.
//! They produce reports rather than booleans so a failure can name the
//! exact items involved.

use crate::error::{Error, Result};
use crate::kind::ItemKind;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

/// Result of checking that every expected item is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainmentReport<T> {
    pub kind: ItemKind,
    pub expected_count: usize,
    pub actual_count: usize,
    /// Expected items with no structurally equal actual item.
    pub missing: Vec<T>,
}

impl<T: fmt::Display> ContainmentReport<T> {
    #[must_use]
    pub fn holds(&self) -> bool {
        self.missing.is_empty()
    }

    /// Turn a failed check into [`Error::Containment`].
    ///
    /// # Errors
    ///
    /// Returns an error naming every missing item.
    pub fn into_result(self, account: &str) -> Result<()> {
        if self.holds() {
            return Ok(());
        }
        Err(Error::Containment {
            kind: self.kind,
            account: account.to_string(),
            missing: self.missing.iter().map(ToString::to_string).collect(),
        })
    }
}

/// Check `expected ⊆ actual`.
pub fn contains_all<T>(kind: ItemKind, expected: &[T], actual: &[T]) -> ContainmentReport<T>
where
    T: Eq + Hash + Clone,
{
    let present: HashSet<&T> = actual.iter().collect();
    ContainmentReport {
        kind,
        expected_count: expected.len(),
        actual_count: actual.len(),
        missing: expected
            .iter()
            .filter(|item| !present.contains(item))
            .cloned()
            .collect(),
    }
}

/// Result of comparing a source snapshot with a destination snapshot.
///
/// The count check and the difference check are independent. A
/// destination holding every source item plus an identical duplicate
/// passes the difference check and only fails the count check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquivalenceReport<T> {
    pub kind: ItemKind,
    pub source_count: usize,
    pub destination_count: usize,
    /// Distinct source items absent from the destination.
    pub unmatched: Vec<T>,
}

impl<T: fmt::Display> EquivalenceReport<T> {
    #[must_use]
    pub const fn counts_match(&self) -> bool {
        self.source_count == self.destination_count
    }

    #[must_use]
    pub fn difference_is_empty(&self) -> bool {
        self.unmatched.is_empty()
    }

    #[must_use]
    pub fn holds(&self) -> bool {
        self.counts_match() && self.difference_is_empty()
    }

    /// One diagnostic line per failed sub-check.
    #[must_use]
    pub fn failures(&self, source: &str, destination: &str) -> Vec<String> {
        let mut failures = Vec::new();
        if !self.counts_match() {
            failures.push(format!(
                "The number of {kind} at the source account {source} ({}) is not equal to \
                 the number of {kind} at the destination account {destination} ({})",
                self.source_count,
                self.destination_count,
                kind = self.kind,
            ));
        }
        if !self.difference_is_empty() {
            failures.push(format!(
                "Unmigrated {kind} found. Source: {source} Destination: {destination}. \
                 List of unmatched {kind}: {}",
                self.unmatched
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
                kind = self.kind,
            ));
        }
        failures
    }
}

/// Compare `source` against `destination`: both counts plus the
/// distinct set difference `source − destination`.
pub fn compare<T>(kind: ItemKind, source: &[T], destination: &[T]) -> EquivalenceReport<T>
where
    T: Eq + Hash + Clone,
{
    let present: HashSet<&T> = destination.iter().collect();
    let mut reported = HashSet::new();
    let unmatched = source
        .iter()
        .filter(|item| !present.contains(item) && reported.insert(*item))
        .cloned()
        .collect();

    EquivalenceReport {
        kind,
        source_count: source.len(),
        destination_count: destination.len(),
        unmatched,
    }
}
