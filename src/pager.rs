//! Continuation-token pagination
//!
//! [`Paginator`] walks one remote collection page by page. Each call to
//! [`Paginator::next_page`] issues at most one remote fetch; the
//! sequence ends when a page carries no continuation handle or a fetch
//! fails. A finished paginator never fetches again.

use crate::error::{Error, Result};
use crate::kind::ItemKind;
use crate::service::{MailService, PageRequest, RawRecord};
use futures::Stream;
use futures::stream;
use tracing::{debug, warn};

#[derive(Debug)]
enum Cursor {
    Start(ItemKind),
    Next(String),
    Done,
}

/// Lazy, finite, non-restartable enumerator over a paged collection.
pub struct Paginator<'a, S: MailService + ?Sized> {
    service: &'a S,
    kind: ItemKind,
    cursor: Cursor,
    pages: usize,
}

/// Everything a paginator produced before it stopped.
#[derive(Debug, Default)]
pub struct Enumeration {
    pub records: Vec<RawRecord>,
    pub pages: usize,
    /// Set when a fetch failed and the records are partial.
    pub error: Option<Error>,
}

impl Enumeration {
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

impl<'a, S: MailService + ?Sized> Paginator<'a, S> {
    #[must_use]
    pub const fn new(service: &'a S, kind: ItemKind) -> Self {
        Self {
            service,
            kind,
            cursor: Cursor::Start(kind),
            pages: 0,
        }
    }

    /// Pages fetched so far.
    #[must_use]
    pub const fn pages(&self) -> usize {
        self.pages
    }

    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self.cursor, Cursor::Done)
    }

    /// Fetch the next batch of records.
    ///
    /// Returns `Ok(None)` once the collection is exhausted. A fetch
    /// error ends the sequence; later calls return `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns the remote error of the failed fetch.
    pub async fn next_page(&mut self) -> Result<Option<Vec<RawRecord>>> {
        let request = match std::mem::replace(&mut self.cursor, Cursor::Done) {
            Cursor::Start(kind) => PageRequest::First(kind),
            Cursor::Next(link) => PageRequest::Next(link),
            Cursor::Done => return Ok(None),
        };

        let page = self.service.fetch_page(&request).await?;
        self.pages += 1;

        if let Some(link) = page.continuation() {
            self.cursor = Cursor::Next(link.to_string());
        }

        debug!(
            "{} page {} of {}: {} record(s)",
            self.kind,
            self.pages,
            self.service.account(),
            page.records.len()
        );
        Ok(Some(page.records))
    }

    /// Drive the paginator to the end, keeping whatever was fetched
    /// before a failure.
    pub async fn collect_all(mut self) -> Enumeration {
        let mut enumeration = Enumeration::default();

        loop {
            match self.next_page().await {
                Ok(Some(batch)) => enumeration.records.extend(batch),
                Ok(None) => break,
                Err(e) => {
                    warn!(
                        "Enumerating {} of {} stopped after {} page(s): {}",
                        self.kind,
                        self.service.account(),
                        self.pages,
                        e
                    );
                    enumeration.error = Some(e);
                    break;
                }
            }
        }

        enumeration.pages = self.pages;
        enumeration
    }

    /// Flatten the pages into a stream of records.
    ///
    /// A fetch failure is yielded once as an `Err` and ends the stream.
    pub fn into_stream(self) -> impl Stream<Item = Result<RawRecord>> + 'a {
        stream::unfold(
            (self, Vec::<RawRecord>::new().into_iter()),
            |(mut pager, mut batch)| async move {
                loop {
                    if let Some(record) = batch.next() {
                        return Some((Ok(record), (pager, batch)));
                    }
                    match pager.next_page().await {
                        Ok(Some(next)) => batch = next.into_iter(),
                        Ok(None) => return None,
                        Err(e) => return Some((Err(e), (pager, batch))),
                    }
                }
            },
        )
    }
}
