use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

use super::{BackendError, LyricsBackend, Reply};
use crate::types::{SearchBody, SongBody};

/// `reqwest` implementation of [`LyricsBackend`].
///
/// One `Client` is built up front and reused for every call so connections
/// to the backend are kept alive between a search and the detail fetches
/// that follow it.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// Creates a client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error string if `base_url` is not an absolute http(s) URL or
    /// the underlying HTTP client cannot be built.
    ///
    /// # Example
    ///
    /// ```
    /// let backend = HttpBackend::new("http://127.0.0.1:5000", Duration::from_secs(15))?;
    /// ```
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| e.to_string())?;

        Self::with_client(base_url, client)
    }

    /// Uses a preconfigured `Client`, e.g. one with custom proxy settings.
    pub fn with_client(base_url: &str, client: Client) -> Result<Self, String> {
        let base_url = Url::parse(base_url).map_err(|e| format!("{}: {}", base_url, e))?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(format!("{}: not an http(s) base URL", base_url));
        }

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // checked for cannot-be-a-base in new()
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

impl LyricsBackend for HttpBackend {
    async fn search(&self, phrase: &str) -> Result<Reply<SearchBody>, BackendError> {
        let response = self
            .client
            .post(self.endpoint(&["search"]))
            .form(&[("phrase", phrase)])
            .send()
            .await?;

        decode(response).await
    }

    async fn song(&self, id: &str) -> Result<Reply<SongBody>, BackendError> {
        let response = self
            .client
            .get(self.endpoint(&["song", id]))
            .send()
            .await?;

        decode(response).await
    }
}

/// Reads the body as JSON regardless of status; error statuses carry an
/// `{ "error": ... }` body that the coordinators want to show.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<Reply<T>, BackendError> {
    let status = response.status();
    let text = response.text().await?;
    let body = serde_json::from_str(&text)?;
    Ok(Reply::new(status, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_appends_to_base_path() {
        let backend = HttpBackend::new("http://localhost:5000/lyrics/", Duration::from_secs(1))
            .expect("valid url");
        assert_eq!(
            backend.endpoint(&["search"]).as_str(),
            "http://localhost:5000/lyrics/search"
        );
    }

    #[test]
    fn song_id_is_encoded_as_one_segment() {
        let backend =
            HttpBackend::new("http://localhost:5000", Duration::from_secs(1)).expect("valid url");
        assert_eq!(
            backend.endpoint(&["song", "a/b c"]).as_str(),
            "http://localhost:5000/song/a%2Fb%20c"
        );
    }

    #[test]
    fn rejects_non_http_base() {
        assert!(HttpBackend::new("ftp://example.com", Duration::from_secs(1)).is_err());
        assert!(HttpBackend::new("not a url", Duration::from_secs(1)).is_err());
    }
}
