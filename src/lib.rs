//! Lyrics Finder CLI Library
//!
//! This library provides a terminal client for a lyrics finder backend: submit a
//! fragment of a song's lyrics, get back the candidate songs, and open the
//! detail record of one of them. The interaction state machine lives in
//! [`session`] and is independent of the terminal, so it can be driven by the
//! CLI, by tests, or by any other front end.
//!
//! # Modules
//!
//! - `backend` - HTTP contract of the lyrics finder backend and its `reqwest` client
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `render` - Pure projections of session state into displayable views
//! - `session` - Search and detail coordinators and their shared state
//! - `types` - Data structures and wire formats
//!
//! # Example
//!
//! ```
//! use lyricscli::{backend::HttpBackend, config, session::Session};
//!
//! #[tokio::main]
//! async fn main() -> lyricscli::Res<()> {
//!     config::load_env().await?;
//!     let backend = HttpBackend::new(&config::backend_url(), config::request_timeout())?;
//!     let session = Session::new(backend, config::stale_response_policy());
//!     session.submit("we don't need no education").await;
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod cli;
pub mod config;
pub mod render;
pub mod session;
pub mod types;

/// A convenient Result type alias for operations that may fail.
///
/// Uses a boxed dynamic error trait object with Send + Sync bounds so it can
/// travel across async boundaries.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Searching for \"{}\"", phrase);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only for fatal errors where recovery is not possible. Errors the user can
/// react to (a failed search, a missing song) go through [`failed!`] instead.
///
/// # Example
///
/// ```
/// error!("Invalid backend URL: {}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a recoverable error message with a red cross.
///
/// Same output channel as [`error!`] but the program keeps running, so the
/// user can correct the input and try again.
#[macro_export]
macro_rules! failed {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "x".red().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("Too many matches. Please add more words.");
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
