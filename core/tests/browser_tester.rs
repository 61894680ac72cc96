use chrono::{TimeZone, Utc};
use forenscope::{discover_sources, Artifact, ArtifactKind, ArtifactType, Extractor};
use rusqlite::Connection;
use std::path::Path;

fn create_store(path: &Path, sql: &str) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(sql).unwrap();
}

fn chromium_profile(profile: &Path) {
    std::fs::create_dir_all(profile.join("Network")).unwrap();
    create_store(
        &profile.join("History"),
        "CREATE TABLE urls (id INTEGER PRIMARY KEY, url LONGVARCHAR, title LONGVARCHAR, visit_count INTEGER DEFAULT 0 NOT NULL, typed_count INTEGER DEFAULT 0 NOT NULL, last_visit_time INTEGER NOT NULL, hidden INTEGER DEFAULT 0 NOT NULL);
         INSERT INTO urls (url, title, visit_count, last_visit_time) VALUES ('https://www.rust-lang.org/', 'Rust Programming Language', 12, 13253932800000000);
         INSERT INTO urls (url, title, visit_count, last_visit_time) VALUES ('https://docs.rs/', NULL, 2, 13253932860000000);
         INSERT INTO urls (url, title, visit_count, last_visit_time) VALUES ('https://never.visited/', 'Never', 0, 0);",
    );
    create_store(
        &profile.join("Network").join("Cookies"),
        "CREATE TABLE cookies (creation_utc INTEGER NOT NULL, host_key TEXT NOT NULL, name TEXT NOT NULL, value TEXT NOT NULL, path TEXT NOT NULL, encrypted_value BLOB DEFAULT '');
         INSERT INTO cookies VALUES (13253932800000000, '.google.com', 'SID', '', '/', x'763130aabbccdd');
         INSERT INTO cookies VALUES (13253932800000000, 'github.com', 'theme', 'dark', '/', x'');",
    );
}

fn firefox_profile(profile: &Path) {
    std::fs::create_dir_all(profile).unwrap();
    create_store(
        &profile.join("places.sqlite"),
        "CREATE TABLE moz_places (id INTEGER PRIMARY KEY, url LONGVARCHAR, title LONGVARCHAR, visit_count INTEGER DEFAULT 0, last_visit_date INTEGER);
         INSERT INTO moz_places (url, title, visit_count, last_visit_date) VALUES ('https://www.mozilla.org/', 'Mozilla', 4, 1672531200000000);
         INSERT INTO moz_places (url, title, visit_count, last_visit_date) VALUES ('https://bookmark.only/', 'Bookmark', 0, NULL);",
    );
    create_store(
        &profile.join("cookies.sqlite"),
        "CREATE TABLE moz_cookies (id INTEGER PRIMARY KEY, name TEXT, value TEXT, host TEXT, path TEXT, creationTime INTEGER);
         INSERT INTO moz_cookies (name, value, host, path, creationTime) VALUES ('session', 'abc123', '.mozilla.org', '/', 1672531200000000);",
    );
}

#[test]
fn test_chromium_history() {
    let dir = tempfile::tempdir().unwrap();
    chromium_profile(dir.path());
    let path = dir.path().join("History").display().to_string();

    let results = Extractor::new(ArtifactKind::ChromiumHistory, &path, None).extract();
    assert_eq!(results.len(), 2);

    let rust = results
        .iter()
        .find(|entry| entry.data().as_history().unwrap().url == "https://www.rust-lang.org/")
        .unwrap();
    assert_eq!(rust.artifact_type(), ArtifactType::ChromiumHistory);
    assert_eq!(rust.data().as_history().unwrap().visit_count, 12);
    assert_eq!(
        rust.timestamp(),
        Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap()
    );

    let docs = results
        .iter()
        .find(|entry| entry.data().as_history().unwrap().url == "https://docs.rs/")
        .unwrap();
    assert_eq!(docs.data().as_history().unwrap().title, "");
}

#[test]
fn test_chromium_cookies() {
    let dir = tempfile::tempdir().unwrap();
    chromium_profile(dir.path());
    let path = dir.path().join("Network").join("Cookies").display().to_string();

    let results = Extractor::new(ArtifactKind::ChromiumCookies, &path, None).extract();
    assert_eq!(results.len(), 2);

    let sid = results
        .iter()
        .find(|entry| entry.data().as_cookie().unwrap().name == "SID")
        .unwrap();
    assert_eq!(sid.artifact_type(), ArtifactType::ChromiumCookie);
    assert_eq!(sid.data().as_cookie().unwrap().value, "[Encrypted]");

    let theme = results
        .iter()
        .find(|entry| entry.data().as_cookie().unwrap().name == "theme")
        .unwrap();
    assert_eq!(theme.data().as_cookie().unwrap().value, "dark");
}

#[test]
fn test_firefox_stores() {
    let dir = tempfile::tempdir().unwrap();
    firefox_profile(dir.path());

    let places = dir.path().join("places.sqlite").display().to_string();
    let results = Extractor::new(ArtifactKind::FirefoxHistory, &places, None).extract();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].artifact_type(), ArtifactType::FirefoxHistory);
    assert_eq!(
        results[0].timestamp(),
        Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()
    );

    let cookies = dir.path().join("cookies.sqlite").display().to_string();
    let results = Extractor::new(ArtifactKind::FirefoxCookies, &cookies, None).extract();
    assert_eq!(results.len(), 1);
    let record = results[0].data().as_cookie().unwrap();
    assert_eq!(record.host, ".mozilla.org");
    assert_eq!(record.value, "abc123");
}

#[test]
fn test_discover_browser_sources() {
    let dir = tempfile::tempdir().unwrap();
    chromium_profile(&dir.path().join("Chrome"));
    firefox_profile(&dir.path().join("Firefox"));

    let sources = discover_sources(&dir.path().display().to_string());
    assert_eq!(sources.len(), 4);

    let mut total = 0;
    for (kind, path) in sources {
        total += Extractor::new(kind, &path, None).extract().len();
    }
    assert_eq!(total, 6);
}

#[test]
fn test_source_untouched() {
    let dir = tempfile::tempdir().unwrap();
    chromium_profile(dir.path());
    let history = dir.path().join("History");
    let before = std::fs::read(&history).unwrap();

    let _ = Extractor::new(ArtifactKind::ChromiumHistory, &history.display().to_string(), None)
        .extract();
    assert_eq!(std::fs::read(&history).unwrap(), before);
}
