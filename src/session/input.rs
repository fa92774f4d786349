use super::{EMPTY_PHRASE_ERROR, SearchOutcome, Session, lock};
use crate::backend::LyricsBackend;

/// What happened to a submitted phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The phrase was empty after trimming; nothing was sent.
    Rejected,
    /// A search ran; carries what the backend answered.
    Searched(SearchOutcome),
    /// A search ran but a newer one had started meanwhile, so its answer was
    /// dropped and the state shows the newer search.
    Superseded(SearchOutcome),
}

impl<B: LyricsBackend> Session<B> {
    /// Input Controller: validates `raw_phrase` and starts a search for it.
    ///
    /// An empty or whitespace-only phrase is rejected locally with
    /// [`EMPTY_PHRASE_ERROR`]; the detail panel is left as it is. Otherwise
    /// the detail panel is cleared before the trimmed phrase goes to
    /// [`Session::run_search`].
    pub async fn submit(&self, raw_phrase: &str) -> Submission {
        let phrase = raw_phrase.trim();

        {
            let mut search = lock(&self.search);
            search.phrase_text = raw_phrase.to_string();
            if phrase.is_empty() {
                search.set_error(EMPTY_PHRASE_ERROR.to_string());
                return Submission::Rejected;
            }
            search.error_text = None;
        }

        self.clear_detail();
        match self.search_round_trip(phrase).await {
            (outcome, true) => Submission::Searched(outcome),
            (outcome, false) => Submission::Superseded(outcome),
        }
    }
}
