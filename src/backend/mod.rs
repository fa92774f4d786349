//! # Backend Module
//!
//! This module defines the contract between the client and the lyrics finder
//! backend, and provides the HTTP implementation of that contract.
//!
//! ## Endpoints
//!
//! - `POST /search` - form field `phrase`; answers with a match list, a
//!   too-many refusal or an error body (see [`crate::types::SearchBody`])
//! - `GET /song/{id}` - detail record for a Spotify track id, or an error body
//!   (see [`crate::types::SongBody`])
//!
//! ## Error Model
//!
//! A backend call only fails with [`BackendError`] when no usable answer came
//! back at all: the request could not be sent, timed out, or the body was not
//! JSON. Any status code with a JSON body is a [`Reply`]; interpreting the
//! status is left to the session coordinators.

use std::{fmt, future::Future};

use reqwest::StatusCode;

use crate::types::{SearchBody, SongBody};

mod http;

pub use http::HttpBackend;

/// A decoded backend answer together with its HTTP status.
#[derive(Debug, Clone)]
pub struct Reply<T> {
    pub status: StatusCode,
    pub body: T,
}

impl<T> Reply<T> {
    pub fn new(status: StatusCode, body: T) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

#[derive(Debug)]
pub enum BackendError {
    /// The request never produced a response (connection refused, timeout, ...).
    Transport(String),
    /// A response arrived but its body was not the expected JSON.
    Decode(serde_json::Error),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Transport(e) => write!(f, "transport error: {}", e),
            BackendError::Decode(e) => write!(f, "malformed response body: {}", e),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Decode(err)
    }
}

/// The two calls the session makes against a lyrics finder backend.
pub trait LyricsBackend {
    /// `POST /search` with the already trimmed phrase.
    fn search(
        &self,
        phrase: &str,
    ) -> impl Future<Output = Result<Reply<SearchBody>, BackendError>>;

    /// `GET /song/{id}` for a Spotify track id taken from a match.
    fn song(&self, id: &str) -> impl Future<Output = Result<Reply<SongBody>, BackendError>>;
}
