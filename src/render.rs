//! Pure projections of session state into what the user sees.
//!
//! Nothing here performs I/O; the CLI turns these views into terminal output
//! and tests assert on them directly.

use reqwest::Url;

use crate::{
    session::{DetailState, SearchState, TOO_MANY_FALLBACK},
    types::{DetailRecord, MatchSummary, MatchTableRow},
};

pub const YEAR_PLACEHOLDER: &str = "—";
pub const OPEN_DETAILS: &str = "Open details";
pub const NO_SPOTIFY_MATCH: &str = "No Spotify match";
pub const EMPTY_RESULTS: &str = "No results yet — try a different lyric.";
pub const NO_SPOTIFY_SELECTION: &str = "No Spotify match available for this item.";
pub const NOT_AVAILABLE: &str = "N/A";

/// One selectable line of the match list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryView {
    /// Titles repeat, so entries are told apart by title and position.
    pub key: String,
    pub index: usize,
    pub title: String,
    pub artist: String,
    pub year: String,
    pub label: &'static str,
    pub selectable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsView {
    Entries(Vec<EntryView>),
    Loading,
    Empty(&'static str),
}

/// Projects the match list, in the order the backend sent it.
pub fn results(matches: &[MatchSummary], is_searching: bool) -> ResultsView {
    if matches.is_empty() {
        return if is_searching {
            ResultsView::Loading
        } else {
            ResultsView::Empty(EMPTY_RESULTS)
        };
    }

    let entries = matches
        .iter()
        .enumerate()
        .map(|(index, m)| {
            let selectable = m.has_spotify_match();
            EntryView {
                key: format!("{}-{}", printable(&m.title), index),
                index,
                title: printable(&m.title),
                artist: printable(&m.artist),
                year: m
                    .year()
                    .map(|y| y.to_string())
                    .unwrap_or_else(|| YEAR_PLACEHOLDER.to_string()),
                label: if selectable {
                    OPEN_DETAILS
                } else {
                    NO_SPOTIFY_MATCH
                },
                selectable,
            }
        })
        .collect();

    ResultsView::Entries(entries)
}

/// Table rows for the entries, numbered from 1 for display.
pub fn table_rows(entries: &[EntryView]) -> Vec<MatchTableRow> {
    entries
        .iter()
        .map(|e| MatchTableRow {
            ordinal: e.index + 1,
            title: e.title.clone(),
            artist: e.artist.clone(),
            year: e.year.clone(),
            spotify: e.label.to_string(),
        })
        .collect()
}

/// A message line above the results, by affordance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Info(String),
    /// The phrase needs more words; not an error.
    Warning(String),
    Error(String),
}

pub fn banners(state: &SearchState) -> Vec<Banner> {
    let mut banners = Vec::new();

    if state.is_too_many {
        banners.push(Banner::Warning(
            state
                .status_message
                .as_deref()
                .map(printable)
                .unwrap_or_else(|| TOO_MANY_FALLBACK.to_string()),
        ));
    } else if let Some(message) = &state.status_message {
        banners.push(Banner::Info(printable(message)));
    }

    if let Some(note) = &state.note {
        banners.push(Banner::Info(printable(note)));
    }

    if let Some(error) = &state.error_text {
        banners.push(Banner::Error(printable(error)));
    }

    banners
}

/// A link that leaves the application.
///
/// Opening it hands the URL to the system browser, which runs as its own
/// process with no handle on this one and no referrer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundLink {
    pub url: Url,
}

impl OutboundLink {
    pub const LABEL: &'static str = "Open in Spotify";

    /// OSC 8 hyperlink escape so terminals that support it make the label
    /// clickable; others print the label followed by the URL.
    pub fn terminal_hyperlink(&self) -> String {
        format!(
            "\x1b]8;;{url}\x1b\\{label}\x1b]8;;\x1b\\ ({url})",
            url = self.url,
            label = Self::LABEL
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub title: String,
    pub artists: String,
    pub album: String,
    pub release_date: String,
    pub producers: String,
    pub link: Option<OutboundLink>,
}

impl From<&DetailRecord> for DetailView {
    fn from(record: &DetailRecord) -> Self {
        Self {
            title: printable(&record.track_name),
            artists: format!("Artists: {}", printable(&record.artists.join(", "))),
            album: format!("Album: {}", or_not_available(&record.album)),
            release_date: or_not_available(&record.release_date),
            producers: format!("Producers: {}", or_not_available(&record.producers)),
            link: record
                .spotify_url
                .clone()
                .map(|url| OutboundLink { url }),
        }
    }
}

fn or_not_available(value: &Option<String>) -> String {
    value
        .as_deref()
        .map(printable)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Backend text as it may be written to a terminal.
///
/// Control characters (C0, DEL and C1) would let the text move the cursor,
/// clear the screen or forge hyperlinks. Whitespace controls become a space,
/// every other control character becomes U+FFFD. Printable text is kept.
pub fn printable(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\t' | '\n' | '\r' => ' ',
            c if c.is_control() => char::REPLACEMENT_CHARACTER,
            c => c,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailPanel {
    Hidden,
    Loading,
    Failed(String),
    Record(DetailView),
}

pub fn detail(state: &DetailState) -> DetailPanel {
    if state.is_loading {
        return DetailPanel::Loading;
    }
    if let Some(error) = &state.error_text {
        return DetailPanel::Failed(printable(error));
    }
    match &state.record {
        Some(record) => DetailPanel::Record(DetailView::from(record)),
        None => DetailPanel::Hidden,
    }
}
