//! # CLI Module
//!
//! This module provides the command-line interface layer for Lyricscli. It
//! wires the terminal to a [`Session`] backed by [`HttpBackend`] and turns the
//! views from [`crate::render`] into coloured output.
//!
//! ## Commands
//!
//! - [`search`] - One-shot search, optionally opening the details of one match
//! - [`song`] - Detail record for a known Spotify track id
//! - [`interactive`] - Prompt loop: search, pick a match, open it in Spotify;
//!   requests run while the prompt keeps reading ([`prompt`])
//!
//! ## Output Conventions
//!
//! - Banners use the logging macros: info for status messages, warning for
//!   the too-many refusal, `failed!` for errors the user can fix by retrying
//! - Matches are printed as a `tabled` table numbered from 1
//! - A spinner is shown while the view would display a loading indicator
//! - Transport error details are only printed with `--verbose`
//!
//! ## Usage Patterns
//!
//! ```bash
//! lyricscli search we dont need no education
//! lyricscli search "hello darkness my old friend" --select 1 --open
//! lyricscli song 5HNCy40Ni5BZJFw1TKzRsC
//! lyricscli --latest-request-wins interactive
//! ```

use std::time::Duration;

use crate::{
    backend::HttpBackend,
    config, error,
    session::{Session, StaleResponsePolicy},
};

mod interactive;
mod output;
mod search;
mod song;

pub use interactive::{interactive, prompt};
pub use search::search;
pub use song::song;

/// Connection settings shared by all commands.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub backend_url: String,
    pub timeout: Duration,
    pub policy: StaleResponsePolicy,
    pub verbose: bool,
}

impl ClientOptions {
    /// Merges command-line overrides over the environment configuration.
    pub fn resolve(
        backend_url: Option<String>,
        timeout_secs: Option<u64>,
        latest_request_wins: bool,
        verbose: bool,
    ) -> Self {
        Self {
            backend_url: backend_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(config::backend_url),
            timeout: timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or_else(config::request_timeout),
            policy: if latest_request_wins {
                StaleResponsePolicy::LatestRequestWins
            } else {
                config::stale_response_policy()
            },
            verbose,
        }
    }

    fn session(&self) -> Session<HttpBackend> {
        let backend = match HttpBackend::new(&self.backend_url, self.timeout) {
            Ok(backend) => backend,
            Err(e) => error!("Invalid backend URL {}", e),
        };
        Session::new(backend, self.policy)
    }
}
