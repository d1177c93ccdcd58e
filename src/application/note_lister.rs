// src/application/note_lister.rs
use crate::application::{EntryStatus, NoteGateway, QueryCache};
use crate::domain::{DomainError, NotesPage, QueryKey};
use std::sync::Arc;
use tracing::{debug, instrument};

/// A list request that has been registered with the cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    key: QueryKey,
    seq: u64,
}

impl FetchTicket {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }
}

#[derive(Debug)]
pub struct FetchOutcome {
    ticket: FetchTicket,
    result: Result<NotesPage, DomainError>,
}

impl FetchOutcome {
    pub fn key(&self) -> &QueryKey {
        &self.ticket.key
    }
}

/// What the list view should show right now
#[derive(Debug, Clone, PartialEq)]
pub enum ListState {
    /// Nothing fetched yet for any key
    Loading,
    /// The last fetch failed and there is nothing to show
    Error { message: String },
    /// `placeholder` means the page belongs to a previous key while the
    /// current one loads. `error` is set when the latest refresh failed.
    Ready {
        page: NotesPage,
        placeholder: bool,
        fetching: bool,
        error: Option<String>,
    },
}

/// Owns page and settled search term, and keeps the displayed page in sync
/// with the query key derived from them.
pub struct NoteLister<G: NoteGateway> {
    gateway: Arc<G>,
    cache: QueryCache,
    page: u32,
    search: String,
    displayed: Option<NotesPage>,
}

impl<G: NoteGateway> NoteLister<G> {
    pub fn new(gateway: Arc<G>, cache: QueryCache) -> Self {
        Self {
            gateway,
            cache,
            page: 1,
            search: String::new(),
            displayed: None,
        }
    }

    pub fn gateway(&self) -> Arc<G> {
        Arc::clone(&self.gateway)
    }

    pub fn current_page(&self) -> u32 {
        self.page
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn query_key(&self) -> QueryKey {
        QueryKey::new(self.page, &self.search)
    }

    /// Total pages of the most recently displayed result, if any
    pub fn total_pages(&self) -> Option<u32> {
        self.displayed.as_ref().map(|p| p.total_pages)
    }

    /// Apply a settled search value. A changed term starts over at page 1.
    pub fn set_search(&mut self, settled: &str) -> bool {
        let settled = settled.trim();
        if settled == self.search {
            return false;
        }
        debug!(search = settled, "Search changed, resetting to first page");
        self.search = settled.to_string();
        self.page = 1;
        true
    }

    pub fn set_page(&mut self, page: u32) -> bool {
        let page = page.max(1);
        if page == self.page {
            return false;
        }
        self.page = page;
        true
    }

    pub fn next_page(&mut self) -> bool {
        match self.total_pages() {
            Some(total) if self.page >= total => false,
            _ => self.set_page(self.page + 1),
        }
    }

    pub fn previous_page(&mut self) -> bool {
        self.set_page(self.page.saturating_sub(1))
    }

    /// Register a request for the current key, unless the cache can serve it
    /// or one is already in flight.
    #[instrument(level = "debug", skip(self))]
    pub fn issue(&mut self) -> Option<FetchTicket> {
        let key = self.query_key();
        if let Some(page) = self.cache.get(&key).and_then(|c| c.page) {
            self.displayed = Some(page);
        }
        let seq = self.cache.begin(&key)?;
        debug!(?key, seq, "Issuing list request");
        Some(FetchTicket { key, seq })
    }

    /// Run a ticket against the gateway. Does not touch lister state, so it
    /// can be spawned while the lister keeps handling input.
    pub async fn fetch(gateway: Arc<G>, ticket: FetchTicket) -> FetchOutcome {
        let result = gateway.list_notes(&ticket.key).await;
        FetchOutcome { ticket, result }
    }

    /// Fold a finished request back in.
    ///
    /// Returns `true` when the displayed state changed. Superseded responses
    /// and responses for keys the user has moved away from leave it alone.
    pub fn apply(&mut self, outcome: FetchOutcome) -> bool {
        let FetchOutcome { ticket, result } = outcome;
        if !self.cache.complete(&ticket.key, ticket.seq, &result) {
            return false;
        }
        if ticket.key != self.query_key() {
            debug!(key = ?ticket.key, "Response for a previous key cached, not displayed");
            return false;
        }
        match result {
            Ok(page) => {
                self.displayed = Some(page);
                true
            }
            Err(e) => {
                debug!(error = %e, "List request failed");
                true
            }
        }
    }

    /// Issue, fetch and apply in one go
    pub async fn refresh(&mut self) -> ListState {
        if let Some(ticket) = self.issue() {
            let outcome = Self::fetch(self.gateway(), ticket).await;
            self.apply(outcome);
        }
        self.state()
    }

    pub fn state(&self) -> ListState {
        let cached = self.cache.get(&self.query_key());
        let fetching = cached
            .as_ref()
            .is_some_and(|c| c.status == EntryStatus::Loading);
        let error = cached.as_ref().and_then(|c| c.error.clone());

        if let Some(page) = cached.and_then(|c| c.page) {
            return ListState::Ready {
                page,
                placeholder: false,
                fetching,
                error,
            };
        }
        match (&self.displayed, error) {
            (Some(page), error) => ListState::Ready {
                page: page.clone(),
                placeholder: true,
                fetching,
                error,
            },
            (None, Some(message)) => ListState::Error { message },
            (None, None) => ListState::Loading,
        }
    }
}
