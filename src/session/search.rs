use super::{
    LoadingGuard, SEARCH_FAILED, SEARCH_NETWORK_ERROR, Session, TOO_MANY_FALLBACK,
    state::SearchState,
};
use crate::{
    backend::{BackendError, LyricsBackend, Reply},
    types::{MatchSummary, SearchBody, non_empty},
};

/// How a search ended. Exactly one of these is reflected in the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The phrase matched too many songs to be useful.
    Refusal { message: String },
    MatchList {
        matches: Vec<MatchSummary>,
        corrected: Option<String>,
        note: Option<String>,
    },
    /// `cause` keeps the transport error text for diagnostics; it is never
    /// put into the state.
    Failed {
        error: String,
        cause: Option<String>,
    },
}

impl SearchOutcome {
    /// Decides which outcome a backend answer represents.
    ///
    /// The `too_many` flag is checked first: a refusal shares the success
    /// status with the match list, and wins even over a populated list.
    pub fn classify(reply: Reply<SearchBody>) -> Self {
        let success = reply.is_success();
        let body = reply.body;

        if body.too_many.unwrap_or(false) {
            return SearchOutcome::Refusal {
                message: non_empty(body.message).unwrap_or_else(|| TOO_MANY_FALLBACK.to_string()),
            };
        }

        if success {
            return SearchOutcome::MatchList {
                matches: body.matches.unwrap_or_default(),
                corrected: non_empty(body.corrected),
                note: non_empty(body.note),
            };
        }

        SearchOutcome::Failed {
            error: non_empty(body.error).unwrap_or_else(|| SEARCH_FAILED.to_string()),
            cause: None,
        }
    }

    pub fn from_result(result: Result<Reply<SearchBody>, BackendError>) -> Self {
        match result {
            Ok(reply) => Self::classify(reply),
            Err(e) => SearchOutcome::Failed {
                error: SEARCH_NETWORK_ERROR.to_string(),
                cause: Some(e.to_string()),
            },
        }
    }

    pub(crate) fn apply_to(&self, state: &mut SearchState) {
        state.clear_outcome();
        state.error_text = None;

        match self {
            SearchOutcome::Refusal { message } => {
                state.is_too_many = true;
                state.status_message = Some(message.clone());
            }
            SearchOutcome::MatchList {
                matches,
                corrected,
                note,
            } => {
                state.matches = matches.clone();
                state.status_message = corrected
                    .as_ref()
                    .map(|c| format!("Using corrected phrase: \"{}\"", c));
                state.note = note.clone();
            }
            SearchOutcome::Failed { error, .. } => state.set_error(error.clone()),
        }
    }
}

impl<B: LyricsBackend> Session<B> {
    /// Search Coordinator: runs one search round trip for `phrase`.
    ///
    /// Resets the previous outcome and raises `is_searching` before the
    /// request is sent. The returned outcome is what the backend answered; it
    /// has only been written to the state if the session's policy accepted
    /// it, see [`Session::search_state`].
    pub async fn run_search(&self, phrase: &str) -> SearchOutcome {
        self.search_round_trip(phrase).await.0
    }

    /// Like [`Session::run_search`], also reporting whether the outcome was
    /// written to the state.
    pub(super) async fn search_round_trip(&self, phrase: &str) -> (SearchOutcome, bool) {
        let guard = LoadingGuard::start(
            &self.search,
            &self.search_generation,
            self.policy,
            SearchState::begin_search,
            |s: &mut SearchState| s.is_searching = false,
        );

        let outcome = SearchOutcome::from_result(self.backend.search(phrase).await);
        let applied = guard.apply(|state| outcome.apply_to(state));
        (outcome, applied)
    }
}
