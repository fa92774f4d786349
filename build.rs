//! Build script for the Lyrics Finder CLI.
//!
//! Copies the `.env.example` configuration template to the user's local data
//! directory, next to where the application looks for its `.env` file.

use std::{env, fs, path::PathBuf};

/// Copies `.env.example` from the crate root to the local data directory:
/// - Linux: `~/.local/share/lyricscli/.env.example`
/// - macOS: `~/Library/Application Support/lyricscli/.env.example`
/// - Windows: `%LOCALAPPDATA%/lyricscli/.env.example`
///
/// Nothing here is needed to compile the crate, so a missing template or an
/// unwritable data directory only produces a cargo warning.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    if !env_example_path.is_file() {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
        return Ok(());
    }

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("lyricscli");

    let copied = fs::create_dir_all(&out_dir)
        .and_then(|_| fs::copy(&env_example_path, out_dir.join(".env.example")));
    if let Err(e) = copied {
        println!(
            "cargo:warning=could not copy .env.example to {}: {}",
            out_dir.display(),
            e
        );
    }

    Ok(())
}
