// SPDX-License-Identifier: MIT

//! Accumulating catalog browse sessions.
//!
//! Each signed-in user gets one session tracking the current filter
//! (genre or search term), the append-only accumulated result list, and
//! the page index. The infinite-scroll trigger only advances when no
//! fetch is in flight and more pages remain; the discrete pager clears
//! the accumulation and restarts at the selected page; switching filter
//! resets everything to page 1.
//!
//! Fetches are tagged with a generation counter so that a response
//! arriving after the session moved on (filter switched, pager used) is
//! discarded instead of appending stale results.

use crate::services::catalog::{GamePage, GameSummary, PAGE_SIZE};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Current filter for a browse session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseFilter {
    Genre(u64),
    Search(String),
}

/// Handle for an in-flight fetch. Returned by the `begin_*` methods and
/// passed back to [`BrowseSession::complete`] or [`BrowseSession::abort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    pub page: u32,
}

/// Per-user browse state.
#[derive(Debug, Default)]
pub struct BrowseSession {
    filter: Option<BrowseFilter>,
    games: Vec<GameSummary>,
    current_page: u32,
    total_pages: u32,
    generation: u64,
    in_flight: bool,
}

/// Serializable view of a session for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct BrowseSnapshot {
    pub games: Vec<GameSummary>,
    pub page: u32,
    pub total_pages: u32,
    pub loading: bool,
}

impl BrowseSession {
    /// Switch to a new filter: accumulation and page index reset to 1.
    pub fn begin_filter(&mut self, filter: BrowseFilter) -> FetchTicket {
        self.filter = Some(filter);
        self.games.clear();
        self.current_page = 0;
        self.total_pages = 0;
        self.start_fetch(1)
    }

    /// Infinite-scroll trigger: the next page, unless a fetch is already
    /// in flight or the last page has been reached.
    pub fn begin_more(&mut self) -> Option<FetchTicket> {
        if self.in_flight || self.filter.is_none() {
            return None;
        }
        if self.current_page >= self.total_pages {
            return None;
        }
        Some(self.start_fetch(self.current_page + 1))
    }

    /// Discrete pager: clears the accumulation and restarts from `page`.
    pub fn begin_page(&mut self, page: u32) -> Option<FetchTicket> {
        if self.filter.is_none() || page < 1 {
            return None;
        }
        self.games.clear();
        Some(self.start_fetch(page))
    }

    fn start_fetch(&mut self, page: u32) -> FetchTicket {
        self.generation += 1;
        self.in_flight = true;
        FetchTicket {
            generation: self.generation,
            page,
        }
    }

    /// Append a fetched page. Returns false (and changes nothing) when
    /// the session has moved on since the fetch began.
    pub fn complete(&mut self, ticket: FetchTicket, fetched: GamePage) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.total_pages = (fetched.count as u32).div_ceil(PAGE_SIZE);
        self.current_page = ticket.page;
        self.games.extend(fetched.results);
        self.in_flight = false;
        true
    }

    /// A fetch failed; the accumulation is left unchanged.
    pub fn abort(&mut self, ticket: FetchTicket) {
        if ticket.generation == self.generation {
            self.in_flight = false;
        }
    }

    pub fn filter(&self) -> Option<&BrowseFilter> {
        self.filter.as_ref()
    }

    pub fn snapshot(&self) -> BrowseSnapshot {
        BrowseSnapshot {
            games: self.games.clone(),
            page: self.current_page,
            total_pages: self.total_pages,
            loading: self.in_flight,
        }
    }
}

/// Browse sessions for all users of this instance.
#[derive(Clone, Default)]
pub struct BrowseSessions {
    inner: Arc<DashMap<String, Arc<Mutex<BrowseSession>>>>,
}

impl BrowseSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the session for a user.
    pub fn session(&self, email: &str) -> Arc<Mutex<BrowseSession>> {
        self.inner
            .entry(email.to_string())
            .or_default()
            .clone()
    }
}
