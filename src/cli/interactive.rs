use std::io::Write;

use futures::{
    FutureExt,
    future::LocalBoxFuture,
    stream::{FuturesUnordered, StreamExt},
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::{
    Res,
    backend::LyricsBackend,
    cli::{
        ClientOptions, output,
        search::{report_selection, report_submission},
    },
    failed, info, render,
    session::Session,
    warning,
};

/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PromptInput {
    Quit,
    Open,
    Help,
    /// `#N`, a match number as printed.
    Select(usize),
    Phrase(String),
}

impl PromptInput {
    fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        match trimmed {
            ":q" | ":quit" => return PromptInput::Quit,
            ":o" | ":open" => return PromptInput::Open,
            ":h" | ":help" => return PromptInput::Help,
            _ => {}
        }

        if let Some(number) = trimmed
            .strip_prefix('#')
            .and_then(|n| n.trim().parse::<usize>().ok())
        {
            return PromptInput::Select(number);
        }

        // untrimmed; the session validates and trims the phrase itself
        PromptInput::Phrase(line.to_string())
    }
}

fn print_help() {
    info!("Type a lyric phrase and press enter to search.");
    info!("#N      show the details of match N");
    info!(":open   open the current song in Spotify");
    info!(":help   show this help");
    info!(":quit   leave");
}

fn show_prompt() -> Res<()> {
    print!("> ");
    std::io::stdout().flush()?;
    Ok(())
}

/// Runs the search prompt on stdin until `:quit` or end of input.
///
/// Every phrase runs a fresh search; the match list stays available for
/// `#N` selections until the next search.
pub async fn interactive(client: &ClientOptions) -> Res<()> {
    let session = client.session();

    info!("Lyrics finder at {}", session.backend().base_url());
    print_help();

    prompt(&session, BufReader::new(tokio::io::stdin()), client.verbose).await
}

/// Reads commands from `input` and drives `session` with them.
///
/// Searches and detail fetches run alongside the reader, so a new phrase or
/// `#N` is handled while earlier requests are still pending. Each view is
/// printed when its request finishes. At end of input the pending requests
/// are awaited; `:quit` drops them.
pub async fn prompt<B, R>(session: &Session<B>, input: R, verbose: bool) -> Res<()>
where
    B: LyricsBackend,
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut pending: FuturesUnordered<LocalBoxFuture<'_, ()>> = FuturesUnordered::new();
    let mut reading = true;

    loop {
        if reading {
            show_prompt()?;
        }

        tokio::select! {
            line = lines.next_line(), if reading => {
                let Some(line) = line? else {
                    println!();
                    reading = false;
                    if pending.is_empty() {
                        break;
                    }
                    continue;
                };

                match PromptInput::parse(&line) {
                    PromptInput::Quit => break,
                    PromptInput::Help => print_help(),
                    PromptInput::Open => open_current(session),
                    PromptInput::Select(0) => failed!("Matches are numbered from 1."),
                    PromptInput::Select(number) => {
                        info!("Loading details for #{}...", number);
                        pending.push(
                            async move {
                                let selection = session.select(number - 1).await;
                                report_selection(session, number, &selection, false, verbose);
                            }
                            .boxed_local(),
                        );
                    }
                    PromptInput::Phrase(phrase) => {
                        if !phrase.trim().is_empty() {
                            info!("Searching for \"{}\"...", phrase.trim());
                        }
                        pending.push(
                            async move {
                                let submission = session.submit(&phrase).await;
                                report_submission(session, &submission, verbose);
                            }
                            .boxed_local(),
                        );
                    }
                }
            }
            Some(()) = pending.next(), if !pending.is_empty() => {
                if !reading && pending.is_empty() {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn open_current<B: LyricsBackend>(session: &Session<B>) {
    let link = session
        .detail_state()
        .record
        .and_then(|record| record.spotify_url)
        .map(|url| render::OutboundLink { url });

    match link {
        Some(link) => output::open_link(&link),
        None => warning!("Open a song with #N first."),
    }
}
