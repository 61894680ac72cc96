use super::{chromium, error::BrowserError, firefox};
use crate::{
    artifacts::error::{contain, ExtractionError},
    filesystem::acquire::acquire_snapshot,
};
use common::evidence::Evidence;
use log::error;
use rusqlite::{Connection, OpenFlags};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Browser {
    Chromium,
    Firefox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    History,
    Cookies,
}

/// A single browser SQLite database (Chromium `History`/`Cookies`, Firefox `places.sqlite`/`cookies.sqlite`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserStore {
    path: String,
    browser: Browser,
    store: StoreKind,
}

impl BrowserStore {
    pub fn new(path: &str, browser: Browser, store: StoreKind) -> BrowserStore {
        BrowserStore {
            path: path.to_string(),
            browser,
            store,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn browser(&self) -> Browser {
        self.browser
    }

    pub fn store(&self) -> StoreKind {
        self.store
    }

    pub(crate) fn name(&self) -> &'static str {
        match (self.browser, self.store) {
            (Browser::Chromium, StoreKind::History) => "chromium-history",
            (Browser::Chromium, StoreKind::Cookies) => "chromium-cookies",
            (Browser::Firefox, StoreKind::History) => "firefox-history",
            (Browser::Firefox, StoreKind::Cookies) => "firefox-cookies",
        }
    }

    pub(crate) fn description(&self) -> &'static str {
        match (self.browser, self.store) {
            (Browser::Chromium, StoreKind::History) => "Chromium browsing history (urls table)",
            (Browser::Chromium, StoreKind::Cookies) => "Chromium cookies (cookies table)",
            (Browser::Firefox, StoreKind::History) => "Firefox browsing history (moz_places table)",
            (Browser::Firefox, StoreKind::Cookies) => "Firefox cookies (moz_cookies table)",
        }
    }

    /// Snapshot the database and query it. Any failure results in no Evidence
    pub(crate) fn extract(&self) -> Vec<Evidence> {
        contain(self.name(), &self.path, self.query_snapshot())
    }

    fn query_snapshot(&self) -> Result<Vec<Evidence>, ExtractionError> {
        let snapshot = acquire_snapshot(&self.path)?;
        let conn = match open_snapshot(snapshot.path()) {
            Ok(result) => result,
            Err(_) => return Err(ExtractionError::ParseFailed),
        };

        let result = match (self.browser, self.store) {
            (Browser::Chromium, StoreKind::History) => {
                chromium::history::history_query(&conn, &self.path)
            }
            (Browser::Chromium, StoreKind::Cookies) => {
                chromium::cookies::cookies_query(&conn, &self.path)
            }
            (Browser::Firefox, StoreKind::History) => {
                firefox::history::history_query(&conn, &self.path)
            }
            (Browser::Firefox, StoreKind::Cookies) => {
                firefox::cookies::cookies_query(&conn, &self.path)
            }
        };

        match result {
            Ok(evidence) => Ok(evidence),
            Err(err) => {
                error!("[{}] Failed to query {}: {err}", self.name(), self.path);
                Err(ExtractionError::ParseFailed)
            }
        }
    }
}

/// Open the copied database. The copy may be written to so any WAL pages can be replayed
fn open_snapshot(path: &Path) -> Result<Connection, BrowserError> {
    let connection = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    );
    match connection {
        Ok(result) => Ok(result),
        Err(err) => {
            error!("[browser] Failed to open SQLITE snapshot {}: {err:?}", path.display());
            Err(BrowserError::SqliteOpen)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Browser, BrowserStore, StoreKind};
    use common::evidence::ArtifactType;
    use rusqlite::Connection;
    use std::fs::write;

    #[test]
    fn test_extract_chromium_history() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("History");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE urls(id INTEGER PRIMARY KEY, url LONGVARCHAR, title LONGVARCHAR, visit_count INTEGER DEFAULT 0 NOT NULL, last_visit_time INTEGER NOT NULL);
            INSERT INTO urls(url, title, visit_count, last_visit_time) VALUES ('http://test.com', 'Test Title', 5, 13253932800000000);",
        )
        .unwrap();
        drop(conn);

        let path = path.display().to_string();
        let store = BrowserStore::new(&path, Browser::Chromium, StoreKind::History);
        assert_eq!(store.name(), "chromium-history");

        let result = store.extract();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].source_path(), path);
        assert_eq!(result[0].artifact_type(), ArtifactType::ChromiumHistory);
    }

    #[test]
    fn test_extract_missing_source() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("History").display().to_string();
        let store = BrowserStore::new(&path, Browser::Chromium, StoreKind::History);
        assert!(store.extract().is_empty());
    }

    #[test]
    fn test_extract_not_sqlite() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("places.sqlite");
        write(&path, b"this is not a database file, just some text").unwrap();

        let store = BrowserStore::new(
            &path.display().to_string(),
            Browser::Firefox,
            StoreKind::History,
        );
        assert!(store.extract().is_empty());
    }

    #[test]
    fn test_extract_wrong_schema() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("cookies.sqlite");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("CREATE TABLE other(id INTEGER);").unwrap();
        drop(conn);

        let store = BrowserStore::new(
            &path.display().to_string(),
            Browser::Firefox,
            StoreKind::Cookies,
        );
        assert!(store.extract().is_empty());
    }
}
