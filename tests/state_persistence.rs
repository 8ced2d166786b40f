// tests/state_persistence.rs
use std::fs;

use news_relay::error::RelayError;
use news_relay::state::State;

#[test]
fn missing_file_loads_as_empty_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let state = State::load(&path, 500).unwrap();
    assert!(state.feed("http://example.test/rss").is_none());
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let mut state = State::load(&path, 500).unwrap();
    let seen = state.feed_mut("http://example.test/rss");
    seen.record("id-1");
    seen.record("id-2");
    state.save(&path).unwrap();

    let reloaded = State::load(&path, 500).unwrap();
    let seen = reloaded.feed("http://example.test/rss").unwrap();
    assert_eq!(seen.ids().collect::<Vec<_>>(), vec!["id-1", "id-2"]);
}

#[test]
fn serialized_form_is_sorted_and_indented() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let mut state = State::load(&path, 500).unwrap();
    state.feed_mut("http://b.test/rss").record("b1");
    state.feed_mut("http://a.test/rss").record("a1");
    state.save(&path).unwrap();

    let body = fs::read_to_string(&path).unwrap();
    let expected = r#"{
  "seen": {
    "http://a.test/rss": [
      "a1"
    ],
    "http://b.test/rss": [
      "b1"
    ]
  }
}
"#;
    assert_eq!(body, expected);
}

#[test]
fn untouched_feeds_leave_no_trace_in_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let mut state = State::load(&path, 500).unwrap();
    state.feed_mut("http://quiet.test/rss"); // created but never recorded into
    state.feed_mut("http://busy.test/rss").record("x");
    state.save(&path).unwrap();

    let body = fs::read_to_string(&path).unwrap();
    assert!(!body.contains("quiet.test"));
    assert!(body.contains("busy.test"));
}

#[test]
fn save_leaves_no_temp_file_behind() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let mut state = State::load(&path, 500).unwrap();
    state.feed_mut("http://example.test/rss").record("x");
    state.save(&path).unwrap();

    let names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["state.json".to_string()]);
}

#[test]
fn corrupt_file_is_a_fatal_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    fs::write(&path, "{\"seen\": [not json").unwrap();

    let err = State::load(&path, 500).unwrap_err();
    assert!(matches!(err, RelayError::PersistedStateCorrupt { .. }));
}

#[test]
fn legacy_python_state_file_loads() {
    // shape written by the predecessor script: {"seen": {url: [ids]}}
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    fs::write(
        &path,
        r#"{
  "seen": {
    "http://example.test/rss": [
      "da39a3ee5e6b4b0d3255bfef95601890afd80709"
    ]
  }
}"#,
    )
    .unwrap();

    let state = State::load(&path, 500).unwrap();
    let seen = state.feed("http://example.test/rss").unwrap();
    assert!(seen.contains("da39a3ee5e6b4b0d3255bfef95601890afd80709"));
}

#[test]
fn load_reapplies_a_smaller_cap() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let mut state = State::load(&path, 500).unwrap();
    for i in 0..10 {
        state.feed_mut("http://example.test/rss").record(&format!("id-{i}"));
    }
    state.save(&path).unwrap();

    let reloaded = State::load(&path, 3).unwrap();
    let seen = reloaded.feed("http://example.test/rss").unwrap();
    assert_eq!(seen.ids().collect::<Vec<_>>(), vec!["id-7", "id-8", "id-9"]);
}
