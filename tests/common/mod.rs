#![allow(dead_code)]

use std::{collections::HashMap, sync::Mutex};

use lyricscli::{
    backend::{BackendError, LyricsBackend, Reply},
    types::{SearchBody, SongBody},
};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::oneshot;

/// What the fake answers for one phrase or song id.
#[derive(Debug, Clone)]
pub enum Scripted {
    Json(StatusCode, Value),
    Unreachable,
    Malformed,
}

pub fn ok(body: Value) -> Scripted {
    Scripted::Json(StatusCode::OK, body)
}

pub fn status(code: u16, body: Value) -> Scripted {
    Scripted::Json(StatusCode::from_u16(code).expect("valid status"), body)
}

/// In-memory backend that records every call.
///
/// A gated call waits until the sender returned by [`FakeBackend::gate`]
/// fires (or is dropped), which lets tests decide in which order
/// overlapping responses arrive.
#[derive(Default)]
pub struct FakeBackend {
    searches: HashMap<String, Scripted>,
    songs: HashMap<String, Scripted>,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_search(mut self, phrase: &str, answer: Scripted) -> Self {
        self.searches.insert(phrase.to_string(), answer);
        self
    }

    pub fn on_song(mut self, id: &str, answer: Scripted) -> Self {
        self.songs.insert(id.to_string(), answer);
        self
    }

    /// Holds back the answer to `key` (`search:<phrase>` or `song:<id>`).
    pub fn gate(&self, key: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(key.to_string(), rx);
        tx
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn call(&self, key: String) {
        self.calls.lock().unwrap().push(key.clone());
        let gate = self.gates.lock().unwrap().remove(&key);
        if let Some(rx) = gate {
            let _ = rx.await;
        }
    }
}

fn answer<T: DeserializeOwned>(scripted: Option<&Scripted>) -> Result<Reply<T>, BackendError> {
    match scripted {
        Some(Scripted::Json(status, body)) => Ok(Reply::new(
            *status,
            serde_json::from_value(body.clone()).expect("scripted body matches wire format"),
        )),
        Some(Scripted::Malformed) => {
            Err(BackendError::from(serde_json::from_str::<Value>("<html>502</html>").unwrap_err()))
        }
        Some(Scripted::Unreachable) | None => Err(BackendError::Transport(
            "error sending request: connection refused".to_string(),
        )),
    }
}

impl LyricsBackend for FakeBackend {
    async fn search(&self, phrase: &str) -> Result<Reply<SearchBody>, BackendError> {
        self.call(format!("search:{}", phrase)).await;
        answer(self.searches.get(phrase))
    }

    async fn song(&self, id: &str) -> Result<Reply<SongBody>, BackendError> {
        self.call(format!("song:{}", id)).await;
        answer(self.songs.get(id))
    }
}
