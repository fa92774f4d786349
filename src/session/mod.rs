//! # Session Module
//!
//! The search and detail interaction state machine. A [`Session`] owns the
//! state of one user's view and the coordinators that mutate it:
//!
//! ```text
//! Input Controller   submit()        validates the phrase, resets the detail panel
//!        ↓
//! Search Coordinator run_search()    POST /search, classifies into SearchOutcome
//!        ↓
//! Result Renderer    crate::render   projects SearchState into entries
//!        ↓ (user selection)
//! Detail Coordinator select() /      GET /song/{id}, classifies into DetailOutcome
//!                    fetch_detail()
//! ```
//!
//! ## Concurrency
//!
//! Coordinators take `&self` and only lock the state cells for synchronous
//! updates, never across an `.await`. Two searches may therefore be in flight
//! at once, and a search may run while a detail fetch is pending. Which
//! response ends up on screen when requests overlap is decided by the
//! session's [`StaleResponsePolicy`].
//!
//! Loading flags are reset by a drop guard, so `is_searching` and
//! `is_loading` return to `false` on every exit path, including a caller
//! dropping the coordinator future half way.

use std::sync::{
    Mutex, MutexGuard, PoisonError,
    atomic::{AtomicU64, Ordering},
};

use crate::backend::LyricsBackend;

mod detail;
mod input;
mod search;
mod state;

pub use detail::{DetailOutcome, Selection};
pub use input::Submission;
pub use search::SearchOutcome;
pub use state::{DetailState, SearchState};

pub const EMPTY_PHRASE_ERROR: &str = "Please type a lyric phrase to search.";
pub const TOO_MANY_FALLBACK: &str = "Too many matches. Please add more words.";
pub const SEARCH_FAILED: &str = "Search failed";
pub const SEARCH_NETWORK_ERROR: &str = "Network error. Please try again.";
pub const DETAIL_FAILED: &str = "Failed to fetch details";
pub const DETAIL_NETWORK_ERROR: &str = "Network error while fetching details";

/// What to do with a response whose request is no longer the newest one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StaleResponsePolicy {
    /// Every response updates the state when it arrives, so a slow older
    /// request can overwrite a newer one.
    #[default]
    LastArrivalWins,
    /// Only the most recently started request may update the state; older
    /// responses are dropped.
    LatestRequestWins,
}

impl StaleResponsePolicy {
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "last-arrival" | "last_arrival" => Some(Self::LastArrivalWins),
            "latest-request" | "latest_request" => Some(Self::LatestRequestWins),
            _ => None,
        }
    }

    fn accepts(self, ticket: u64, latest: u64) -> bool {
        match self {
            Self::LastArrivalWins => true,
            Self::LatestRequestWins => ticket == latest,
        }
    }
}

/// One user's search view: its state plus the backend the coordinators use.
pub struct Session<B> {
    backend: B,
    policy: StaleResponsePolicy,
    search: Mutex<SearchState>,
    detail: Mutex<DetailState>,
    search_generation: AtomicU64,
    detail_generation: AtomicU64,
}

impl<B: LyricsBackend> Session<B> {
    pub fn new(backend: B, policy: StaleResponsePolicy) -> Self {
        Self {
            backend,
            policy,
            search: Mutex::new(SearchState::default()),
            detail: Mutex::new(DetailState::default()),
            search_generation: AtomicU64::new(0),
            detail_generation: AtomicU64::new(0),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Snapshot of the search state.
    pub fn search_state(&self) -> SearchState {
        lock(&self.search).clone()
    }

    /// Snapshot of the detail state.
    pub fn detail_state(&self) -> DetailState {
        lock(&self.detail).clone()
    }

    /// Drops the detail panel's content.
    ///
    /// Under [`StaleResponsePolicy::LatestRequestWins`] this also retires any
    /// pending detail fetch, so nothing it returns can reappear.
    pub fn clear_detail(&self) {
        let mut detail = lock(&self.detail);
        detail.clear();
        if self.policy == StaleResponsePolicy::LatestRequestWins {
            self.detail_generation.fetch_add(1, Ordering::SeqCst);
            detail.is_loading = false;
        }
    }
}

fn lock<S>(cell: &Mutex<S>) -> MutexGuard<'_, S> {
    cell.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Resets a loading flag when the coordinator that raised it finishes.
///
/// The flag is only touched if the guarded request is still accepted by the
/// policy; a retired request must not clear the flag of its successor.
struct LoadingGuard<'a, S> {
    cell: &'a Mutex<S>,
    generation: &'a AtomicU64,
    ticket: u64,
    policy: StaleResponsePolicy,
    reset: fn(&mut S),
}

impl<'a, S> LoadingGuard<'a, S> {
    /// Starts a new request generation, applies `begin` and arms the guard.
    fn start(
        cell: &'a Mutex<S>,
        generation: &'a AtomicU64,
        policy: StaleResponsePolicy,
        begin: fn(&mut S),
        reset: fn(&mut S),
    ) -> Self {
        let mut state = lock(cell);
        let ticket = generation.fetch_add(1, Ordering::SeqCst) + 1;
        begin(&mut *state);
        drop(state);

        Self {
            cell,
            generation,
            ticket,
            policy,
            reset,
        }
    }

    fn is_current(&self) -> bool {
        self.policy
            .accepts(self.ticket, self.generation.load(Ordering::SeqCst))
    }

    /// Runs `update` on the state if this request may still write to it.
    fn apply(&self, update: impl FnOnce(&mut S)) -> bool {
        let mut state = lock(self.cell);
        if !self.is_current() {
            return false;
        }
        update(&mut *state);
        true
    }
}

impl<S> Drop for LoadingGuard<'_, S> {
    fn drop(&mut self) {
        let mut state = lock(self.cell);
        if self.is_current() {
            (self.reset)(&mut *state);
        }
    }
}
