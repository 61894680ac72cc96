use std::fmt;

#[derive(Debug, PartialEq)]
pub(crate) enum BrowserError {
    SqliteOpen,
    BadSql,
    Query,
}

impl std::error::Error for BrowserError {}

impl fmt::Display for BrowserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowserError::SqliteOpen => write!(f, "Failed to open SQLITE database"),
            BrowserError::BadSql => write!(f, "Could not compose sqlite query"),
            BrowserError::Query => write!(f, "Failed to query SQLITE database"),
        }
    }
}
