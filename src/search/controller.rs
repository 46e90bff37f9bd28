use tracing::{debug, warn};

use crate::query::codec::QueryCodec;
use crate::query::state::QueryState;
use crate::schemas::{ResultPage, SearchParams};
use crate::search::client::RemoteSearchClient;
use crate::search::error::SearchError;

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;

/// What the view gets to see. Always exactly one of these; a failure never
/// escapes the controller as anything else.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchStatus {
    /// No query submitted yet - text empty and no filters.
    Idle,
    Loading,
    Ready(ResultPage),
    Failed(String),
}

/// Captures the query a fetch was issued for. A completion is applied only
/// while its ticket's query still equals the controller's current one, so
/// out-of-order network replies can never overwrite newer results.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    query: QueryState,
}

impl FetchTicket {
    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn params(&self) -> SearchParams {
        SearchParams::from(&self.query)
    }
}

/// Owns the current [`QueryState`], decides when a fetch is due, and folds
/// completions back into a [`SearchStatus`].
///
/// The controller is a plain state machine: the host performs the actual
/// network call for each returned [`FetchTicket`] and reports back through
/// [`complete`](Self::complete). Cancellation is soft - changing the query
/// only cancels interest in outstanding fetches, stale completions are
/// dropped by the ticket check rather than by aborting transport.
pub struct SearchController {
    query: QueryState,
    status: SearchStatus,
    share: Vec<(String, String)>,
}

impl Default for SearchController {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchController {
    pub fn new() -> Self {
        Self::with_query(QueryState::new()).0
    }

    /// Mounts the controller from a decoded shareable representation. A
    /// query with criteria starts loading immediately; the default query
    /// starts idle with nothing to fetch.
    pub fn with_query(query: QueryState) -> (Self, Option<FetchTicket>) {
        let share = QueryCodec::encode(&query);
        let mut controller = Self {
            query,
            status: SearchStatus::Idle,
            share,
        };
        let ticket = controller.begin_fetch();
        (controller, ticket)
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn status(&self) -> &SearchStatus {
        &self.status
    }

    /// The flat key/value encoding of the current query. Re-derived on
    /// every change, before any fetch resolves, so the host can keep its
    /// URL (or wherever it binds this) in step with the query whose
    /// results are in flight.
    pub fn share_params(&self) -> &[(String, String)] {
        &self.share
    }

    /// Replace the current query. Returns the ticket for the fetch the
    /// host must now issue, or `None` when nothing changed or the new
    /// query has no criteria (back to idle).
    pub fn set_query(&mut self, next: QueryState) -> Option<FetchTicket> {
        if next == self.query {
            return None;
        }
        self.query = next;
        self.share = QueryCodec::encode(&self.query);
        self.begin_fetch()
    }

    /// Re-issue the fetch for the current query after a failure, without
    /// changing the query.
    pub fn retry(&mut self) -> Option<FetchTicket> {
        match self.status {
            SearchStatus::Failed(_) => self.begin_fetch(),
            _ => None,
        }
    }

    fn begin_fetch(&mut self) -> Option<FetchTicket> {
        if !self.query.has_criteria() {
            self.status = SearchStatus::Idle;
            return None;
        }
        self.status = SearchStatus::Loading;
        Some(FetchTicket {
            query: self.query.clone(),
        })
    }

    /// Fold a completed fetch back in. Results for a superseded query are
    /// dropped unconditionally - last request wins, whatever order the
    /// replies arrive in.
    pub fn complete(&mut self, ticket: &FetchTicket, outcome: Result<ResultPage, SearchError>) {
        if ticket.query != self.query {
            debug!("discarding stale search result for superseded query");
            return;
        }
        match outcome {
            Ok(page) => {
                self.status = SearchStatus::Ready(page);
            }
            Err(error) => {
                warn!(error = %error, "search request failed");
                self.status = SearchStatus::Failed(error.user_message());
            }
        }
    }

    /// Drive a single fetch to completion. Convenience for hosts without
    /// their own event loop; an interactive host would rather issue the
    /// request itself and call [`complete`](Self::complete).
    pub async fn run<C>(&mut self, client: &C, ticket: FetchTicket)
    where
        C: RemoteSearchClient + ?Sized,
    {
        let outcome = client.search(&ticket.params()).await;
        self.complete(&ticket, outcome);
    }
}
