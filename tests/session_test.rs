mod common;

use std::time::Duration;

use common::{FakeBackend, Scripted, ok, status};
use lyricscli::{
    render::{self, DetailPanel, OPEN_DETAILS, ResultsView},
    session::{
        DETAIL_FAILED, DETAIL_NETWORK_ERROR, DetailOutcome, DetailState, EMPTY_PHRASE_ERROR,
        SEARCH_FAILED, SEARCH_NETWORK_ERROR, SearchOutcome, Selection, Session,
        StaleResponsePolicy, Submission, TOO_MANY_FALLBACK,
    },
    types::MatchSummary,
};
use serde_json::json;

const PINK_FLOYD: &str = "we don't need no education";

// Helper function to create a session with the default policy
fn session(backend: FakeBackend) -> Session<FakeBackend> {
    Session::new(backend, StaleResponsePolicy::default())
}

fn the_wall() -> serde_json::Value {
    json!({
        "matches": [{
            "title": "Another Brick in the Wall",
            "artist": "Pink Floyd",
            "release_date": "1979-11-30",
            "spotify_id": "abc123"
        }]
    })
}

fn the_wall_detail() -> Scripted {
    ok(json!({
        "track_name": "Another Brick in the Wall",
        "artists": ["Pink Floyd"],
        "release_date": "1979",
        "spotify_url": "https://open.spotify.com/track/abc123"
    }))
}

fn titles(matches: &[MatchSummary]) -> Vec<&str> {
    matches.iter().map(|m| m.title.as_str()).collect()
}

#[tokio::test]
async fn test_blank_phrases_never_reach_the_backend() {
    let session = session(FakeBackend::new());

    for raw in ["", " ", "\t", "  \n  "] {
        assert_eq!(session.submit(raw).await, Submission::Rejected);

        let state = session.search_state();
        assert_eq!(state.error_text.as_deref(), Some(EMPTY_PHRASE_ERROR));
        assert!(!state.is_searching);
        assert_eq!(state.phrase_text, raw);
    }

    assert!(session.backend().calls().is_empty());
}

#[tokio::test]
async fn test_blank_phrase_keeps_detail_panel() {
    let backend = FakeBackend::new()
        .on_search(PINK_FLOYD, ok(the_wall()))
        .on_song("abc123", the_wall_detail());
    let session = session(backend);

    session.submit(PINK_FLOYD).await;
    session.select(0).await;
    session.submit("   ").await;

    assert!(session.detail_state().record.is_some());
    assert!(session.search_state().matches.is_empty());
}

#[tokio::test]
async fn test_phrase_is_trimmed_before_sending() {
    let backend = FakeBackend::new().on_search(PINK_FLOYD, ok(the_wall()));
    let session = session(backend);

    session.submit(&format!("  {}\n", PINK_FLOYD)).await;

    assert_eq!(
        session.backend().calls(),
        vec![format!("search:{}", PINK_FLOYD)]
    );
}

#[tokio::test]
async fn test_single_match_scenario() {
    let session = session(FakeBackend::new().on_search(PINK_FLOYD, ok(the_wall())));

    session.submit(PINK_FLOYD).await;
    let state = session.search_state();

    assert!(!state.is_searching);
    assert!(!state.is_too_many);
    assert_eq!(state.error_text, None);

    let ResultsView::Entries(entries) = render::results(&state.matches, state.is_searching) else {
        panic!("expected one rendered entry");
    };
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].title, "Another Brick in the Wall");
    assert_eq!(entries[0].artist, "Pink Floyd");
    assert_eq!(entries[0].year, "1979");
    assert_eq!(entries[0].label, OPEN_DETAILS);
}

#[tokio::test]
async fn test_matches_keep_server_order() {
    let body = json!({
        "matches": [
            { "title": "Zebra", "artist": "Beach House", "release_date": "2010-01-26" },
            { "title": "Africa", "artist": "Toto", "release_date": "1982-04-08" },
            { "title": "Zebra", "artist": "Someone Else" }
        ]
    });
    let session = session(FakeBackend::new().on_search("stripes", ok(body)));

    session.submit("stripes").await;

    assert_eq!(
        titles(&session.search_state().matches),
        vec!["Zebra", "Africa", "Zebra"]
    );
}

#[tokio::test]
async fn test_too_many_scenario() {
    let backend = FakeBackend::new().on_search(
        "love",
        ok(json!({ "too_many": true, "message": "Too many matches. Please add more words." })),
    );
    let session = session(backend);

    session.submit("love").await;
    let state = session.search_state();

    assert!(state.is_too_many);
    assert!(state.matches.is_empty());
    assert_eq!(state.error_text, None);
    assert_eq!(
        render::banners(&state),
        vec![render::Banner::Warning(TOO_MANY_FALLBACK.to_string())]
    );
    assert!(matches!(
        render::results(&state.matches, state.is_searching),
        ResultsView::Empty(_)
    ));
}

#[tokio::test]
async fn test_too_many_beats_populated_list_and_status() {
    let body = json!({
        "too_many": true,
        "matches": [{ "title": "Love Me Do", "artist": "The Beatles", "spotify_id": "x" }]
    });
    let backend = FakeBackend::new()
        .on_search("love", ok(body.clone()))
        .on_search("love you", status(500, body));
    let session = session(backend);

    for phrase in ["love", "love you"] {
        session.submit(phrase).await;
        let state = session.search_state();
        assert!(state.is_too_many, "phrase {:?}", phrase);
        assert!(state.matches.is_empty(), "phrase {:?}", phrase);
        assert_eq!(state.status_message.as_deref(), Some(TOO_MANY_FALLBACK));
    }
}

#[tokio::test]
async fn test_missing_matches_is_an_empty_list() {
    let session = session(FakeBackend::new().on_search("hum", ok(json!({}))));

    session.submit("hum").await;
    let state = session.search_state();

    assert!(state.matches.is_empty());
    assert_eq!(state.error_text, None);
    assert!(!state.is_too_many);
}

#[tokio::test]
async fn test_corrected_phrase_and_note() {
    let body = json!({
        "matches": [],
        "corrected": "hello darkness my old friend",
        "note": "SPOTIFY_CLIENT_ID/SECRET not set; install them to enable sorting and metadata."
    });
    let session = session(FakeBackend::new().on_search("helo darknes", ok(body)));

    session.submit("helo darknes").await;
    let state = session.search_state();

    assert_eq!(
        state.status_message.as_deref(),
        Some("Using corrected phrase: \"hello darkness my old friend\"")
    );
    assert!(state.note.is_some());
}

#[tokio::test]
async fn test_error_status_sets_error_text() {
    let backend = FakeBackend::new()
        .on_search("with text", status(400, json!({ "error": "Please enter a phrase." })))
        .on_search("without text", status(503, json!({})));
    let session = session(backend);

    session.submit("with text").await;
    let state = session.search_state();
    assert_eq!(state.error_text.as_deref(), Some("Please enter a phrase."));
    assert!(state.matches.is_empty());

    session.submit("without text").await;
    let state = session.search_state();
    assert_eq!(state.error_text.as_deref(), Some(SEARCH_FAILED));
    assert!(state.matches.is_empty());
    assert!(!state.is_too_many);
}

#[tokio::test]
async fn test_transport_failure_scenario() {
    let backend = FakeBackend::new()
        .on_search("offline", Scripted::Unreachable)
        .on_search("garbled", Scripted::Malformed);
    let session = session(backend);

    for phrase in ["offline", "garbled"] {
        let submission = session.submit(phrase).await;
        let state = session.search_state();

        assert_eq!(state.error_text.as_deref(), Some(SEARCH_NETWORK_ERROR));
        assert!(!state.is_searching);
        assert!(state.matches.is_empty());

        // the raw cause is kept out of the state
        let Submission::Searched(SearchOutcome::Failed { cause, .. }) = submission else {
            panic!("expected a failed search");
        };
        assert!(cause.is_some());
    }
}

#[tokio::test]
async fn test_repeated_phrase_is_not_cached() {
    let session = session(FakeBackend::new().on_search(PINK_FLOYD, ok(the_wall())));

    session.submit(PINK_FLOYD).await;
    session.submit(PINK_FLOYD).await;

    assert_eq!(session.backend().calls().len(), 2);
}

#[tokio::test]
async fn test_new_search_resets_previous_outcome() {
    let backend = FakeBackend::new()
        .on_search("love", ok(json!({ "too_many": true })))
        .on_search("broken", status(500, json!({ "error": "boom" })))
        .on_search(PINK_FLOYD, ok(the_wall()));
    let session = session(backend);

    session.submit("love").await;
    session.submit("broken").await;
    let state = session.search_state();
    assert!(!state.is_too_many);
    assert_eq!(state.status_message, None);

    session.submit(PINK_FLOYD).await;
    let state = session.search_state();
    assert_eq!(state.error_text, None);
    assert_eq!(state.matches.len(), 1);
}

#[tokio::test]
async fn test_detail_scenario() {
    let backend = FakeBackend::new()
        .on_search(PINK_FLOYD, ok(the_wall()))
        .on_song("abc123", the_wall_detail());
    let session = session(backend);

    session.submit(PINK_FLOYD).await;
    let selection = session.select(0).await;

    assert!(matches!(selection, Selection::Opened(DetailOutcome::Found(_))));
    let detail = session.detail_state();
    assert!(!detail.is_loading);
    assert_eq!(detail.error_text, None);

    let DetailPanel::Record(view) = render::detail(&detail) else {
        panic!("expected a detail record");
    };
    assert_eq!(view.title, "Another Brick in the Wall");
    assert_eq!(view.artists, "Artists: Pink Floyd");
    assert_eq!(view.release_date, "1979");
    assert_eq!(view.album, "Album: N/A");

    let link = view.link.expect("outbound link");
    assert_eq!(link.url.as_str(), "https://open.spotify.com/track/abc123");
    let hyperlink = link.terminal_hyperlink();
    assert!(hyperlink.starts_with("\x1b]8;;https://open.spotify.com/track/abc123\x1b\\"));
    assert!(hyperlink.contains(render::OutboundLink::LABEL));
}

#[tokio::test]
async fn test_detail_not_found_scenario() {
    let session = session(
        FakeBackend::new().on_song("missing", status(404, json!({ "error": "Not found" }))),
    );

    session.fetch_detail("missing").await;
    let detail = session.detail_state();

    assert_eq!(detail.error_text.as_deref(), Some("Not found"));
    assert_eq!(detail.record, None);
    assert!(!detail.is_loading);
}

#[tokio::test]
async fn test_detail_failures_use_their_own_messages() {
    let backend = FakeBackend::new()
        .on_song("bare", status(500, json!({})))
        .on_song("offline", Scripted::Unreachable);
    let session = session(backend);

    session.fetch_detail("bare").await;
    assert_eq!(
        session.detail_state().error_text.as_deref(),
        Some(DETAIL_FAILED)
    );

    session.fetch_detail("offline").await;
    let detail = session.detail_state();
    assert_eq!(detail.error_text.as_deref(), Some(DETAIL_NETWORK_ERROR));
    assert!(!detail.is_loading);

    // search state is untouched by detail errors
    assert_eq!(session.search_state().error_text, None);
}

#[tokio::test]
async fn test_entry_without_spotify_id_never_fetches() {
    let body = json!({
        "matches": [
            { "title": "Bootleg", "artist": "Unknown", "spotify_id": null },
            { "title": "Blank", "artist": "Unknown", "spotify_id": "" }
        ]
    });
    let session = session(FakeBackend::new().on_search("rare", ok(body)));

    session.submit("rare").await;

    assert_eq!(session.select(0).await, Selection::NoSpotifyMatch);
    assert_eq!(session.select(1).await, Selection::NoSpotifyMatch);
    assert_eq!(session.select(2).await, Selection::OutOfRange);
    assert_eq!(session.backend().calls(), vec!["search:rare".to_string()]);
    assert_eq!(session.detail_state(), DetailState::default());
}

#[tokio::test]
async fn test_new_search_clears_detail() {
    let backend = FakeBackend::new()
        .on_search(PINK_FLOYD, ok(the_wall()))
        .on_song("abc123", the_wall_detail());
    let session = session(backend);

    session.submit(PINK_FLOYD).await;
    session.select(0).await;
    assert!(session.detail_state().record.is_some());

    session.submit(PINK_FLOYD).await;

    assert_eq!(session.detail_state().record, None);
    assert_eq!(render::detail(&session.detail_state()), DetailPanel::Hidden);
}

#[tokio::test]
async fn test_flags_are_raised_while_in_flight() {
    let backend = FakeBackend::new()
        .on_search(PINK_FLOYD, ok(the_wall()))
        .on_song("abc123", the_wall_detail());
    let search_gate = backend.gate(&format!("search:{}", PINK_FLOYD));
    let session = session(backend);

    let ((), ()) = tokio::join!(
        async {
            session.submit(PINK_FLOYD).await;
        },
        async {
            tokio::task::yield_now().await;
            let state = session.search_state();
            assert!(state.is_searching);
            assert_eq!(
                render::results(&state.matches, state.is_searching),
                ResultsView::Loading
            );
            search_gate.send(()).ok();
        }
    );
    assert!(!session.search_state().is_searching);

    let detail_gate = session.backend().gate("song:abc123");
    let ((), ()) = tokio::join!(
        async {
            session.select(0).await;
        },
        async {
            tokio::task::yield_now().await;
            assert!(session.detail_state().is_loading);
            assert!(!session.search_state().is_searching);
            assert_eq!(render::detail(&session.detail_state()), DetailPanel::Loading);
            detail_gate.send(()).ok();
        }
    );
    assert!(!session.detail_state().is_loading);
}

#[tokio::test]
async fn test_cancelled_search_clears_loading_flag() {
    let backend = FakeBackend::new().on_search("stuck", ok(json!({ "matches": [] })));
    let _held = backend.gate("search:stuck");
    let session = session(backend);

    let result = tokio::time::timeout(Duration::from_millis(20), session.submit("stuck")).await;

    assert!(result.is_err());
    assert!(!session.search_state().is_searching);
}

fn racing_backend() -> (FakeBackend, tokio::sync::oneshot::Sender<()>) {
    let backend = FakeBackend::new()
        .on_search(
            "slow",
            ok(json!({ "matches": [{ "title": "Old Answer", "artist": "A" }] })),
        )
        .on_search(
            "fast",
            ok(json!({ "matches": [{ "title": "New Answer", "artist": "B" }] })),
        );
    let release = backend.gate("search:slow");
    (backend, release)
}

// Starts "slow", then "fast"; "fast" answers first, "slow" answers last.
async fn race(session: &Session<FakeBackend>, release: tokio::sync::oneshot::Sender<()>) {
    tokio::join!(session.submit("slow"), async {
        tokio::task::yield_now().await;
        session.submit("fast").await;
        release.send(()).ok();
    });
}

#[tokio::test]
async fn test_last_arrival_wins_by_default() {
    let (backend, release) = racing_backend();
    let session = Session::new(backend, StaleResponsePolicy::LastArrivalWins);

    race(&session, release).await;
    let state = session.search_state();

    assert_eq!(titles(&state.matches), vec!["Old Answer"]);
    assert!(!state.is_searching);
}

#[tokio::test]
async fn test_latest_request_wins_discards_stale_answer() {
    let (backend, release) = racing_backend();
    let session = Session::new(backend, StaleResponsePolicy::LatestRequestWins);

    race(&session, release).await;
    let state = session.search_state();

    assert_eq!(titles(&state.matches), vec!["New Answer"]);
    assert!(!state.is_searching);
}

#[tokio::test]
async fn test_stale_submission_reports_superseded() {
    let (backend, release) = racing_backend();
    let session = Session::new(backend, StaleResponsePolicy::LatestRequestWins);

    let (slow, fast) = tokio::join!(session.submit("slow"), async {
        tokio::task::yield_now().await;
        let fast = session.submit("fast").await;
        release.send(()).ok();
        fast
    });

    assert!(matches!(slow, Submission::Superseded(SearchOutcome::MatchList { .. })));
    assert!(matches!(fast, Submission::Searched(SearchOutcome::MatchList { .. })));
}

#[tokio::test]
async fn test_detail_cleared_by_new_search_reports_superseded() {
    let backend = FakeBackend::new()
        .on_search(PINK_FLOYD, ok(the_wall()))
        .on_search("love", ok(json!({ "too_many": true })))
        .on_song("abc123", the_wall_detail());
    let release = backend.gate("song:abc123");
    let session = Session::new(backend, StaleResponsePolicy::LatestRequestWins);
    session.submit(PINK_FLOYD).await;

    let (selection, ()) = tokio::join!(session.select(0), async {
        tokio::task::yield_now().await;
        session.submit("love").await;
        release.send(()).ok();
    });

    assert!(matches!(selection, Selection::Superseded(DetailOutcome::Found(_))));
    assert_eq!(session.detail_state().record, None);
}

#[tokio::test]
async fn test_stale_search_keeps_newer_loading_flag() {
    let (backend, release) = racing_backend();
    let fast_gate = backend.gate("search:fast");
    let session = Session::new(backend, StaleResponsePolicy::LatestRequestWins);

    tokio::join!(session.submit("slow"), session.submit("fast"), async {
        tokio::task::yield_now().await;
        release.send(()).ok();
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        // "slow" has answered and was dropped; "fast" is still pending
        assert!(session.search_state().is_searching);
        fast_gate.send(()).ok();
    });

    assert!(!session.search_state().is_searching);
    assert_eq!(titles(&session.search_state().matches), vec!["New Answer"]);
}

async fn detail_during_search(policy: StaleResponsePolicy) -> Session<FakeBackend> {
    let backend = FakeBackend::new()
        .on_search(PINK_FLOYD, ok(the_wall()))
        .on_search("love", ok(json!({ "too_many": true })))
        .on_song("abc123", the_wall_detail());
    let session = Session::new(backend, policy);
    session.submit(PINK_FLOYD).await;

    let release = session.backend().gate("song:abc123");
    tokio::join!(session.select(0), async {
        tokio::task::yield_now().await;
        // the search is not blocked by the pending detail fetch
        session.submit("love").await;
        assert!(session.search_state().is_too_many);
        release.send(()).ok();
    });

    session
}

#[tokio::test]
async fn test_detail_landing_after_new_search() {
    let session = detail_during_search(StaleResponsePolicy::LastArrivalWins).await;
    let detail = session.detail_state();

    assert!(detail.record.is_some());
    assert!(!detail.is_loading);
}

#[tokio::test]
async fn test_detail_retired_by_new_search() {
    let session = detail_during_search(StaleResponsePolicy::LatestRequestWins).await;
    let detail = session.detail_state();

    assert_eq!(detail.record, None);
    assert!(!detail.is_loading);
}
