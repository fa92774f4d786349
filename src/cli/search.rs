use crate::{
    backend::LyricsBackend,
    cli::{ClientOptions, output},
    failed,
    render::{self, DetailPanel, NO_SPOTIFY_SELECTION},
    session::{DetailOutcome, SearchOutcome, Selection, Session, Submission},
    warning,
};

/// Searches for a lyric phrase and prints the matches.
///
/// The words of `phrase` are joined with single spaces, so quoting the phrase
/// on the command line is optional.
///
/// # Arguments
///
/// * `client` - Backend connection settings
/// * `phrase` - Words of the lyric fragment
/// * `select` - Optional match number (as printed, starting at 1) whose
///   details are fetched right after the search
/// * `open` - Open the selected song in the browser when it has a Spotify link
///
/// # Example Usage
///
/// ```bash
/// lyricscli search we dont need no education --select 1
/// ```
pub async fn search(client: &ClientOptions, phrase: Vec<String>, select: Option<usize>, open: bool) {
    let session = client.session();
    let phrase = phrase.join(" ");

    let submitted = submit(&session, &phrase, client.verbose).await;

    if let (true, Some(number)) = (submitted, select) {
        select_match(&session, number, open, client.verbose).await;
    }
}

/// Submits `raw_phrase` and prints the resulting view. Returns whether a
/// search was actually sent.
async fn submit<B: LyricsBackend>(
    session: &Session<B>,
    raw_phrase: &str,
    verbose: bool,
) -> bool {
    let submission = output::while_loading(
        session.submit(raw_phrase),
        || session.search_state().is_searching,
        &format!("Searching for \"{}\"...", raw_phrase.trim()),
    )
    .await;

    report_submission(session, &submission, verbose)
}

/// Prints the search view once a submission has finished. A superseded
/// search prints nothing since the state belongs to its successor.
pub(crate) fn report_submission<B: LyricsBackend>(
    session: &Session<B>,
    submission: &Submission,
    verbose: bool,
) -> bool {
    let state = session.search_state();

    match submission {
        Submission::Rejected => {
            output::print_banners(&state);
            false
        }
        Submission::Searched(outcome) => {
            output::print_banners(&state);
            if let SearchOutcome::Failed { cause, .. } = outcome {
                output::print_cause(cause.as_deref(), verbose);
            }
            output::print_results(&state);
            true
        }
        Submission::Superseded(_) => true,
    }
}

/// Opens the details of match `number` (1-based, as printed).
async fn select_match<B: LyricsBackend>(
    session: &Session<B>,
    number: usize,
    open: bool,
    verbose: bool,
) {
    let Some(index) = number.checked_sub(1) else {
        failed!("Matches are numbered from 1.");
        return;
    };

    let selection = output::while_loading(
        session.select(index),
        || session.detail_state().is_loading,
        "Loading details...",
    )
    .await;

    report_selection(session, number, &selection, open, verbose);
}

pub(crate) fn report_selection<B: LyricsBackend>(
    session: &Session<B>,
    number: usize,
    selection: &Selection,
    open: bool,
    verbose: bool,
) {
    match selection {
        Selection::OutOfRange => failed!("There is no match #{}.", number),
        Selection::NoSpotifyMatch => warning!("{}", NO_SPOTIFY_SELECTION),
        Selection::Opened(outcome) => show_detail(session, outcome, open, verbose),
        Selection::Superseded(_) => {}
    }
}

pub(crate) fn show_detail<B: LyricsBackend>(
    session: &Session<B>,
    outcome: &DetailOutcome,
    open: bool,
    verbose: bool,
) {
    let panel = render::detail(&session.detail_state());
    output::print_detail(&panel);

    if let DetailOutcome::Failed { cause, .. } = outcome {
        output::print_cause(cause.as_deref(), verbose);
    }

    if let (true, DetailPanel::Record(view)) = (open, &panel) {
        match &view.link {
            Some(link) => output::open_link(link),
            None => warning!("This song has no Spotify link."),
        }
    }
}
