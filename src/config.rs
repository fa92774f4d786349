//! Configuration management for the Lyrics Finder CLI.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. Every value has a default, so the client works
//! against a locally running backend without any configuration at all.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Command-line flags (applied by the caller)
//! 2. Environment variables
//! 3. `.env` file in the local data directory
//! 4. Application defaults

use std::{env, path::PathBuf, time::Duration};

use crate::session::StaleResponsePolicy;

/// Address the backend development server listens on by default.
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the `lyricscli` directory if it doesn't exist and loads
/// `lyricscli/.env` from the platform-specific local data directory:
/// - Linux: `~/.local/share/lyricscli/.env`
/// - macOS: `~/Library/Application Support/lyricscli/.env`
/// - Windows: `%LOCALAPPDATA%/lyricscli/.env`
///
/// A missing `.env` file is not an error since all values have defaults.
///
/// # Errors
///
/// Returns an error string if the directory cannot be created or an existing
/// `.env` file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path)
        .map(|_| ())
        .map_err(|e| format!("Failed to load {}: {}", path.display(), e))
}

fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("lyricscli/.env");
    path
}

/// Returns the base URL of the lyrics finder backend.
///
/// Reads `LYRICS_BACKEND_URL`, falling back to [`DEFAULT_BACKEND_URL`].
/// A trailing slash is stripped so endpoint paths can be appended directly.
///
/// # Example
///
/// ```
/// let url = backend_url(); // e.g., "http://127.0.0.1:5000"
/// ```
pub fn backend_url() -> String {
    let url = env::var("LYRICS_BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());
    url.trim_end_matches('/').to_string()
}

/// Returns how long a single backend request may take.
///
/// Reads `LYRICS_REQUEST_TIMEOUT_SECS`. Unset, unparsable or zero values fall
/// back to [`DEFAULT_REQUEST_TIMEOUT_SECS`].
pub fn request_timeout() -> Duration {
    let secs = env::var("LYRICS_REQUEST_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

/// Returns the policy for search responses that arrive out of order.
///
/// Reads `LYRICS_STALE_RESPONSES` (`last-arrival` or `latest-request`).
/// Anything else yields the default, [`StaleResponsePolicy::LastArrivalWins`].
pub fn stale_response_policy() -> StaleResponsePolicy {
    env::var("LYRICS_STALE_RESPONSES")
        .ok()
        .and_then(|v| StaleResponsePolicy::from_key(&v))
        .unwrap_or_default()
}
