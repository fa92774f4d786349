use super::{
    DETAIL_FAILED, DETAIL_NETWORK_ERROR, LoadingGuard, Session, lock, state::DetailState,
};
use crate::{
    backend::{BackendError, LyricsBackend, Reply},
    types::{DetailRecord, SongBody, non_empty},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailOutcome {
    Found(DetailRecord),
    /// `cause` keeps the transport error text for diagnostics only.
    Failed {
        error: String,
        cause: Option<String>,
    },
}

impl DetailOutcome {
    pub fn classify(reply: Reply<SongBody>) -> Self {
        if reply.is_success() {
            return DetailOutcome::Found(DetailRecord::from(reply.body));
        }

        DetailOutcome::Failed {
            error: non_empty(reply.body.error).unwrap_or_else(|| DETAIL_FAILED.to_string()),
            cause: None,
        }
    }

    pub fn from_result(result: Result<Reply<SongBody>, BackendError>) -> Self {
        match result {
            Ok(reply) => Self::classify(reply),
            Err(e) => DetailOutcome::Failed {
                error: DETAIL_NETWORK_ERROR.to_string(),
                cause: Some(e.to_string()),
            },
        }
    }

    fn apply_to(&self, state: &mut DetailState) {
        state.clear();
        match self {
            DetailOutcome::Found(record) => state.record = Some(record.clone()),
            DetailOutcome::Failed { error, .. } => state.error_text = Some(error.clone()),
        }
    }
}

/// Result of picking an entry from the match list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// No entry at that position.
    OutOfRange,
    /// The entry has no Spotify id; no request was made.
    NoSpotifyMatch,
    Opened(DetailOutcome),
    /// The fetch finished after the panel moved on; its answer was dropped.
    Superseded(DetailOutcome),
}

impl<B: LyricsBackend> Session<B> {
    /// Opens the detail panel for the match at `index` (zero based).
    ///
    /// Entries without a Spotify id cannot be opened and never reach the
    /// backend.
    pub async fn select(&self, index: usize) -> Selection {
        let id = {
            let search = lock(&self.search);
            let Some(entry) = search.matches.get(index) else {
                return Selection::OutOfRange;
            };
            if !entry.has_spotify_match() {
                return Selection::NoSpotifyMatch;
            }
            entry.spotify_id.clone().unwrap_or_default()
        };

        match self.detail_round_trip(&id).await {
            (outcome, true) => Selection::Opened(outcome),
            (outcome, false) => Selection::Superseded(outcome),
        }
    }

    /// Detail Coordinator: fetches the detail record for a Spotify id.
    ///
    /// The previous record and error are discarded and `is_loading` raised
    /// before the request is sent. Independent of any search in flight.
    pub async fn fetch_detail(&self, id: &str) -> DetailOutcome {
        self.detail_round_trip(id).await.0
    }

    async fn detail_round_trip(&self, id: &str) -> (DetailOutcome, bool) {
        let guard = LoadingGuard::start(
            &self.detail,
            &self.detail_generation,
            self.policy,
            DetailState::begin_fetch,
            |s: &mut DetailState| s.is_loading = false,
        );

        let outcome = DetailOutcome::from_result(self.backend.song(id).await);
        let applied = guard.apply(|state| outcome.apply_to(state));
        (outcome, applied)
    }
}
