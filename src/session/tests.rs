use super::*;
use tempfile::tempdir;

fn session(token: &str) -> Session {
    Session {
        token: token.to_string(),
        user_id: Some(99),
    }
}

#[test]
fn route_without_stored_session_goes_to_login() {
    let dir = tempdir().unwrap();
    let store = SessionStore::at(dir.path().join("session.toml"));

    assert_eq!(route(&store), Route::Login);
}

#[test]
fn route_with_stored_session_goes_to_library() {
    let dir = tempdir().unwrap();
    let store = SessionStore::at(dir.path().join("session.toml"));
    store.save(&session("abc123")).unwrap();

    match route(&store) {
        Route::Library(s) => {
            assert_eq!(s.token, "abc123");
            assert_eq!(s.user_id, Some(99));
        }
        Route::Login => panic!("expected library route"),
    }
}

#[test]
fn blank_token_counts_as_logged_out() {
    let dir = tempdir().unwrap();
    let store = SessionStore::at(dir.path().join("session.toml"));
    store.save(&session("   ")).unwrap();

    assert_eq!(route(&store), Route::Login);
}

#[test]
fn malformed_session_file_counts_as_logged_out() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session.toml");
    std::fs::write(&path, "not = [valid").unwrap();
    let store = SessionStore::at(path);

    assert_eq!(route(&store), Route::Login);
}

#[test]
fn clear_removes_session_and_is_idempotent() {
    let dir = tempdir().unwrap();
    let store = SessionStore::at(dir.path().join("session.toml"));
    store.save(&session("abc")).unwrap();
    assert!(store.load().is_some());

    store.clear().unwrap();
    assert!(store.load().is_none());
    // Clearing again must not fail.
    store.clear().unwrap();
}

#[test]
fn save_creates_parent_directories() {
    let dir = tempdir().unwrap();
    let store = SessionStore::at(dir.path().join("nested").join("session.toml"));
    store.save(&session("tok")).unwrap();

    assert_eq!(store.load().unwrap().token, "tok");
}

#[test]
fn tracker_delivers_events_in_order() {
    let tracker = TokenTracker::new();
    let notifier = tracker.notifier();

    assert_eq!(tracker.try_recv(), None);

    notifier.report_confirmed();
    notifier.report_invalidated();

    assert_eq!(tracker.try_recv(), Some(TokenEvent::Confirmed));
    assert_eq!(tracker.try_recv(), Some(TokenEvent::Invalidated));
    assert_eq!(tracker.try_recv(), None);
}
