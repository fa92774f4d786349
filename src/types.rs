use chrono::{Datelike, NaiveDate};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// A candidate song returned by the backend for a phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub spotify_id: Option<String>,
}

impl MatchSummary {
    /// Year of release, taken from the leading `YYYY` of the release date.
    ///
    /// Spotify reports release dates with day, month or year precision
    /// (`1979-11-30`, `1979-11`, `1979`), so only the year is reliable.
    pub fn year(&self) -> Option<i32> {
        let date = self.release_date.as_deref()?.trim();
        if let Ok(d) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            return Some(d.year());
        }

        let digits = date.get(..4)?;
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if date.len() > 4 && !date[4..].starts_with('-') {
            return None;
        }
        digits.parse().ok()
    }

    pub fn has_spotify_match(&self) -> bool {
        self.spotify_id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

/// Body of every `POST /search` response.
///
/// The backend answers with one of three shapes (a match list, a too-many
/// refusal, or an error) that all share this structure; which one applies is
/// decided by [`crate::session::SearchOutcome::classify`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchBody {
    #[serde(default)]
    pub too_many: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub matches: Option<Vec<MatchSummary>>,
    #[serde(default)]
    pub corrected: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of every `GET /song/{id}` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SongBody {
    #[serde(default)]
    pub track_name: Option<String>,
    #[serde(default)]
    pub artists: Option<Vec<String>>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub producers: Option<String>,
    #[serde(default)]
    pub spotify_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Expanded metadata for one song.
///
/// Missing album, producers and release date stay `None` here; the "N/A"
/// placeholder only exists in [`crate::render::DetailView`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRecord {
    pub track_name: String,
    pub artists: Vec<String>,
    pub album: Option<String>,
    pub release_date: Option<String>,
    pub producers: Option<String>,
    pub spotify_url: Option<Url>,
}

impl From<SongBody> for DetailRecord {
    fn from(body: SongBody) -> Self {
        Self {
            track_name: body.track_name.unwrap_or_default(),
            artists: body.artists.unwrap_or_default(),
            album: non_empty(body.album),
            release_date: non_empty(body.release_date),
            producers: non_empty(body.producers),
            spotify_url: non_empty(body.spotify_url)
                .and_then(|u| Url::parse(&u).ok())
                .filter(|u| matches!(u.scheme(), "http" | "https")),
        }
    }
}

/// Treats empty and whitespace-only strings like a missing value.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Tabled)]
pub struct MatchTableRow {
    #[tabled(rename = "#")]
    pub ordinal: usize,
    pub title: String,
    pub artist: String,
    pub year: String,
    pub spotify: String,
}
