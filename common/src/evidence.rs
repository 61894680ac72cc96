/**
 * `Evidence` is the single record type every decoder produces.
 * Each record points back to the source it was read from, carries a stable `ArtifactType` tag,
 * a fixed per-family payload, and one normalized UTC timestamp.
 *
 * Records are immutable once built. The only way to change one is through the consuming
 * builders (`with_hash`, `estimated`) which return a new record.
 */
use crate::{
    applications::{CookieRecord, HistoryRecord},
    windows::{EventLogRecord, RegistryValueRecord},
};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactType {
    ChromiumHistory,
    FirefoxHistory,
    ChromiumCookie,
    FirefoxCookie,
    RegistryRunKey,
    RegistryMountPoint,
    RegistryUserAssist,
    /// Windows Event Log record with the provided Event ID
    EventLog(u32),
}

impl ArtifactType {
    /// Check if the payload variant is the one this artifact type produces
    pub fn accepts(&self, data: &EvidenceData) -> bool {
        matches!(
            (self, data),
            (
                ArtifactType::ChromiumHistory | ArtifactType::FirefoxHistory,
                EvidenceData::History(_)
            ) | (
                ArtifactType::ChromiumCookie | ArtifactType::FirefoxCookie,
                EvidenceData::Cookie(_)
            ) | (
                ArtifactType::RegistryRunKey
                    | ArtifactType::RegistryMountPoint
                    | ArtifactType::RegistryUserAssist,
                EvidenceData::Registry(_)
            )
        ) || matches!((self, data), (ArtifactType::EventLog(id), EvidenceData::EventLog(record)) if *id == record.event_id)
    }
}

impl fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactType::ChromiumHistory => write!(f, "Browser History"),
            ArtifactType::FirefoxHistory => write!(f, "Firefox History"),
            ArtifactType::ChromiumCookie => write!(f, "Browser Cookie"),
            ArtifactType::FirefoxCookie => write!(f, "Firefox Cookie"),
            ArtifactType::RegistryRunKey => write!(f, "Registry Run Key"),
            ArtifactType::RegistryMountPoint => write!(f, "Registry Mount Point"),
            ArtifactType::RegistryUserAssist => write!(f, "Registry UserAssist"),
            ArtifactType::EventLog(id) => write!(f, "Event Log {id}"),
        }
    }
}

impl Serialize for ArtifactType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Payload of an `Evidence` record. Serialized without a tag so `data` reads as a plain map
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EvidenceData {
    History(HistoryRecord),
    Cookie(CookieRecord),
    Registry(RegistryValueRecord),
    EventLog(EventLogRecord),
}

impl EvidenceData {
    pub fn as_history(&self) -> Option<&HistoryRecord> {
        match self {
            EvidenceData::History(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_cookie(&self) -> Option<&CookieRecord> {
        match self {
            EvidenceData::Cookie(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_registry(&self) -> Option<&RegistryValueRecord> {
        match self {
            EvidenceData::Registry(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_eventlog(&self) -> Option<&EventLogRecord> {
        match self {
            EvidenceData::EventLog(record) => Some(record),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evidence {
    source_path: String,
    artifact_type: ArtifactType,
    data: EvidenceData,
    timestamp: DateTime<Utc>,
    /// True when the source time could not be read and extraction time was used instead
    timestamp_estimated: bool,
    hash_checksum: Option<String>,
}

impl Evidence {
    /// Create a new `Evidence` record. Use `DateTime::<Utc>::MIN_UTC` when the source has no usable time
    pub fn new(
        source_path: &str,
        artifact_type: ArtifactType,
        data: EvidenceData,
        timestamp: DateTime<Utc>,
    ) -> Result<Evidence, EvidenceError> {
        if source_path.is_empty() {
            return Err(EvidenceError::EmptySourcePath);
        }
        if !artifact_type.accepts(&data) {
            return Err(EvidenceError::MismatchedData);
        }

        Ok(Evidence {
            source_path: source_path.to_string(),
            artifact_type,
            data,
            timestamp,
            timestamp_estimated: false,
            hash_checksum: None,
        })
    }

    /// Flag the timestamp as a best-effort substitute rather than a value read from the source
    pub fn estimated(mut self) -> Evidence {
        self.timestamp_estimated = true;
        self
    }

    /// Attach an integrity hash of the source artifact
    pub fn with_hash(mut self, hash: &str) -> Evidence {
        self.hash_checksum = Some(hash.to_string());
        self
    }

    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    pub fn artifact_type(&self) -> ArtifactType {
        self.artifact_type
    }

    pub fn data(&self) -> &EvidenceData {
        &self.data
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn timestamp_estimated(&self) -> bool {
        self.timestamp_estimated
    }

    pub fn hash_checksum(&self) -> Option<&str> {
        self.hash_checksum.as_deref()
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum EvidenceError {
    EmptySourcePath,
    MismatchedData,
}

impl std::error::Error for EvidenceError {}

impl fmt::Display for EvidenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvidenceError::EmptySourcePath => write!(f, "Evidence requires a source path"),
            EvidenceError::MismatchedData => {
                write!(f, "Evidence data does not match the artifact type")
            }
        }
    }
}
