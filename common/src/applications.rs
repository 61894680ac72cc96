use serde::Serialize;

/// A single visited URL from a browser history store (Chromium `urls` or Firefox `moz_places`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRecord {
    pub url: String,   // Can be null
    pub title: String, // Can be null
    pub visit_count: i64,
}

/// A single cookie from a browser cookie store. `value` is `[Encrypted]` when only ciphertext is stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CookieRecord {
    pub host: String,
    pub name: String,
    pub path: String,
    pub value: String,
}
