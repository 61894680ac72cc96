/**
 * Every decoder follows the same failure policy. A problem with one source, table, key, or record
 * never stops the others. Failures are logged at the level that matches how surprising they are
 * and the affected scope yields no Evidence
 */
use crate::filesystem::error::AcquireError;
use common::evidence::Evidence;
use log::{debug, error, warn};
use std::fmt;

#[derive(Debug, PartialEq)]
pub enum ExtractionError {
    /**Source path does not exist. Logged at warning */
    SourceNotFound,
    /**Source exists but could not be snapshotted. Logged at error */
    AcquisitionFailed,
    /**Data could not be decoded. Logged at error for whole sources, debug for single records */
    ParseFailed,
    /**An optional key or table is absent. Expected, logged at debug */
    TargetNotPresent,
}

impl std::error::Error for ExtractionError {}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionError::SourceNotFound => write!(f, "Source not found"),
            ExtractionError::AcquisitionFailed => write!(f, "Failed to acquire source"),
            ExtractionError::ParseFailed => write!(f, "Failed to parse source"),
            ExtractionError::TargetNotPresent => write!(f, "Target not present in source"),
        }
    }
}

impl From<AcquireError> for ExtractionError {
    fn from(err: AcquireError) -> Self {
        match err {
            AcquireError::SourceNotFound => ExtractionError::SourceNotFound,
            AcquireError::AcquisitionFailed => ExtractionError::AcquisitionFailed,
        }
    }
}

/// Fold an extraction result into the Evidence list. Failures are logged and produce nothing
pub(crate) fn contain(
    name: &str,
    source: &str,
    result: Result<Vec<Evidence>, ExtractionError>,
) -> Vec<Evidence> {
    let err = match result {
        Ok(evidence) => return evidence,
        Err(err) => err,
    };

    match err {
        ExtractionError::SourceNotFound => {
            warn!("[{name}] Source {source} not found, skipping");
        }
        ExtractionError::AcquisitionFailed => {
            error!("[{name}] Could not acquire {source}");
        }
        ExtractionError::ParseFailed => error!("[{name}] Could not parse {source}"),
        ExtractionError::TargetNotPresent => {
            debug!("[{name}] Nothing to extract from {source}");
        }
    }
    Vec::new()
}
