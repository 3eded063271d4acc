//! The recruiter's working set: the single in-memory result set and the view state used
//! to present it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::candidate::{Candidate, RankingResponse};
use crate::ranking::filters::FilterQuery;
use crate::ranking::paginator::{paginate, Page, PageSpec, PAGE_SIZE_OPTIONS};
use crate::ranking::sorter::{sort_candidates, SortSpec};

/// The result of one ranking search. Replaced wholesale by the next search, never merged.
#[derive(Debug, Clone)]
pub struct ResultSet {
    pub search_id: Uuid,
    pub query: FilterQuery,
    /// Total reported by the ranking service.
    pub count: usize,
    pub candidates: Vec<Candidate>,
    pub received_at: DateTime<Utc>,
}

impl ResultSet {
    pub fn is_empty(&self) -> bool {
        self.count == 0 || self.candidates.is_empty()
    }
}

/// Sort and pagination state of the results list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResultsView {
    pub sort: SortSpec,
    pub page: PageSpec,
}

impl ResultsView {
    pub fn new(page_size: usize) -> Self {
        Self {
            sort: SortSpec::default(),
            page: PageSpec {
                page_number: 1,
                page_size,
            },
        }
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.sort = sort;
    }

    /// A new page size always returns to page 1. Sizes outside the offered options are
    /// rejected.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), String> {
        if !PAGE_SIZE_OPTIONS.contains(&page_size) {
            return Err(format!(
                "page_size must be one of {PAGE_SIZE_OPTIONS:?}, got {page_size}"
            ));
        }
        if page_size != self.page.page_size {
            self.page = PageSpec {
                page_number: 1,
                page_size,
            };
        }
        Ok(())
    }

    /// Stores the requested page clamped against the current result size.
    pub fn set_page(&mut self, page_number: usize, total_items: usize) {
        self.page = PageSpec {
            page_number,
            page_size: self.page.page_size,
        }
        .clamped(total_items);
    }
}

#[derive(Debug)]
struct WorkspaceState {
    results: Option<ResultSet>,
    /// Ticket of the search whose response is currently stored.
    stored_ticket: u64,
    view: ResultsView,
}

/// A ticket handed out when a search is issued. Responses are accepted in issue order:
/// once a later search has been stored, earlier responses are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket(u64);

/// Shared handle to the recruiter's results and view state.
#[derive(Clone)]
pub struct RankingWorkspace {
    state: Arc<RwLock<WorkspaceState>>,
    next_ticket: Arc<AtomicU64>,
}

/// The sorted result set together with the view it was rendered for.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub results: ResultSet,
    pub view: ResultsView,
    pub sorted: Vec<Candidate>,
}

impl Snapshot {
    pub fn page(&self) -> Page<Candidate> {
        paginate(&self.sorted, self.view.page)
    }
}

impl RankingWorkspace {
    pub fn new(default_page_size: usize) -> Self {
        Self {
            state: Arc::new(RwLock::new(WorkspaceState {
                results: None,
                stored_ticket: 0,
                view: ResultsView::new(default_page_size),
            })),
            next_ticket: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn issue_ticket(&self) -> SearchTicket {
        SearchTicket(self.next_ticket.fetch_add(1, Ordering::SeqCst))
    }

    /// Replaces the result set with `response` unless a later-issued search already
    /// landed. Returns the stored set, or `None` when the response was superseded.
    pub async fn store(
        &self,
        ticket: SearchTicket,
        query: FilterQuery,
        response: RankingResponse,
    ) -> Option<ResultSet> {
        let mut state = self.state.write().await;
        if ticket.0 < state.stored_ticket {
            debug!(
                "Dropping ranking response for ticket {} (ticket {} already stored)",
                ticket.0, state.stored_ticket
            );
            return None;
        }

        let results = ResultSet {
            search_id: Uuid::new_v4(),
            query,
            count: response.count,
            candidates: response.candidates,
            received_at: Utc::now(),
        };
        info!(
            "Stored ranking {} with {} candidates (reported count {})",
            results.search_id,
            results.candidates.len(),
            results.count
        );

        state.stored_ticket = ticket.0;
        state.results = Some(results.clone());
        state.view.page.page_number = 1;
        Some(results)
    }

    /// Applies view changes, then returns the sorted set for the updated view.
    /// `None` until the first search has been stored.
    pub async fn update_view<F>(&self, change: F) -> Result<Option<Snapshot>, String>
    where
        F: FnOnce(&mut ResultsView, usize) -> Result<(), String>,
    {
        let mut state = self.state.write().await;
        let total = state.results.as_ref().map_or(0, |r| r.candidates.len());
        let mut view = state.view;
        change(&mut view, total)?;
        state.view = view;
        Ok(Self::snapshot_of(&state))
    }

    pub async fn snapshot(&self) -> Option<Snapshot> {
        let state = self.state.read().await;
        Self::snapshot_of(&state)
    }

    fn snapshot_of(state: &WorkspaceState) -> Option<Snapshot> {
        let results = state.results.clone()?;
        let sorted = sort_candidates(&results.candidates, state.view.sort);
        Some(Snapshot {
            results,
            view: state.view,
            sorted,
        })
    }
}
