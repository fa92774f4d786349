use crate::cli::{ClientOptions, output, search::show_detail};

/// Prints the detail record of a Spotify track id.
///
/// Useful to re-open a song found earlier without repeating the search.
///
/// # Example Usage
///
/// ```bash
/// lyricscli song 5HNCy40Ni5BZJFw1TKzRsC --open
/// ```
pub async fn song(client: &ClientOptions, id: String, open: bool) {
    let session = client.session();

    let outcome = output::while_loading(
        session.fetch_detail(id.trim()),
        || session.detail_state().is_loading,
        "Loading details...",
    )
    .await;

    show_detail(&session, &outcome, open, client.verbose);
}
