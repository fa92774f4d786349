use std::{future::Future, time::Duration};

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    failed, info,
    render::{self, Banner, DetailPanel, OutboundLink, ResultsView},
    session::SearchState,
    success, warning,
};

/// Drives `fut` to completion and shows a spinner whenever `is_loading`
/// reports that the view is in its loading state.
pub async fn while_loading<F: Future>(
    fut: F,
    is_loading: impl Fn() -> bool,
    message: &str,
) -> F::Output {
    tokio::pin!(fut);
    let mut poll = tokio::time::interval(Duration::from_millis(80));
    let mut spinner: Option<ProgressBar> = None;

    loop {
        tokio::select! {
            out = &mut fut => {
                if let Some(pb) = spinner {
                    pb.finish_and_clear();
                }
                return out;
            }
            _ = poll.tick() => {
                if spinner.is_none() && is_loading() {
                    spinner = Some(new_spinner(message));
                }
            }
        }
    }
}

fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

pub fn print_banners(state: &SearchState) {
    for banner in render::banners(state) {
        match banner {
            Banner::Info(message) => info!("{}", message),
            Banner::Warning(message) => warning!("{}", message),
            Banner::Error(message) => failed!("{}", message),
        }
    }
}

pub fn print_results(state: &SearchState) {
    match render::results(&state.matches, state.is_searching) {
        ResultsView::Entries(entries) => {
            let table = Table::new(render::table_rows(&entries));
            println!("{}", table);
            if entries.iter().any(|e| e.selectable) {
                info!("Pick a match by its # to see the song details.");
            }
        }
        ResultsView::Loading => info!("Searching..."),
        // a refusal or an error already explains the empty list
        ResultsView::Empty(message) => {
            if !state.is_too_many && state.error_text.is_none() {
                println!("{}", message.dimmed());
            }
        }
    }
}

pub fn print_detail(panel: &DetailPanel) {
    match panel {
        DetailPanel::Hidden => {}
        DetailPanel::Loading => info!("Loading details..."),
        DetailPanel::Failed(error) => failed!("{}", error),
        DetailPanel::Record(view) => {
            println!();
            println!("{}  {}", view.title.bold(), view.release_date.dimmed());
            println!("{}", view.artists);
            println!("{}", view.album);
            println!("{}", view.producers);
            if let Some(link) = &view.link {
                println!("{}", link.terminal_hyperlink());
            }
            println!();
        }
    }
}

/// Prints the transport error behind a generic network message.
pub fn print_cause(cause: Option<&str>, verbose: bool) {
    if let (true, Some(cause)) = (verbose, cause) {
        println!("    {}", cause.dimmed());
    }
}

/// Opens the link in the system browser, which runs as its own process and
/// keeps no reference to this one.
pub fn open_link(link: &OutboundLink) {
    match webbrowser::open(link.url.as_str()) {
        Ok(()) => success!("Opened {}", link.url),
        Err(_) => warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            link.url
        ),
    }
}
