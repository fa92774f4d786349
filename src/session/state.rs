use crate::types::{DetailRecord, MatchSummary};

/// Everything the search half of the view shows.
///
/// `is_too_many` and a non-empty `matches` never hold at the same time, and
/// when `error_text` is set both are cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub phrase_text: String,
    pub is_searching: bool,
    pub matches: Vec<MatchSummary>,
    pub status_message: Option<String>,
    pub note: Option<String>,
    pub is_too_many: bool,
    pub error_text: Option<String>,
}

impl SearchState {
    pub(crate) fn begin_search(&mut self) {
        self.clear_outcome();
        self.error_text = None;
        self.is_searching = true;
    }

    pub(crate) fn clear_outcome(&mut self) {
        self.matches.clear();
        self.is_too_many = false;
        self.status_message = None;
        self.note = None;
    }

    pub(crate) fn set_error(&mut self, error: String) {
        self.clear_outcome();
        self.error_text = Some(error);
    }
}

/// Everything the detail panel shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailState {
    pub is_loading: bool,
    pub record: Option<DetailRecord>,
    pub error_text: Option<String>,
}

impl DetailState {
    pub(crate) fn begin_fetch(&mut self) {
        self.clear();
        self.is_loading = true;
    }

    pub(crate) fn clear(&mut self) {
        self.record = None;
        self.error_text = None;
    }
}
