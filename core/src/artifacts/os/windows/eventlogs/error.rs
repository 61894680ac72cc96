use std::fmt;

#[derive(Debug, PartialEq)]
pub(crate) enum EventLogsError {
    Xml,
    NoEventId,
}

impl std::error::Error for EventLogsError {}

impl fmt::Display for EventLogsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventLogsError::Xml => write!(f, "Failed to read eventlog record XML"),
            EventLogsError::NoEventId => write!(f, "EventLog record has no EventID"),
        }
    }
}
