/**
 * Windows `EventLog` (evtx) files are copied to a temporary snapshot and every record is rendered to XML.
 * Only records with an Event ID in the configured set become Evidence. Records are checked against
 * the set before any timestamp work happens so large logs are cheap to filter
 *
 * A record that cannot be decoded is skipped (logged at debug). The rest of the log is still read
 */
use super::record::parse_event_xml;
use crate::{
    artifacts::error::{contain, ExtractionError},
    filesystem::acquire::acquire_snapshot,
    utils::time::iso8601_or_now,
};
use common::{
    evidence::{ArtifactType, Evidence, EvidenceData},
    windows::EventLogRecord,
};
use evtx::EvtxParser;
use log::{debug, error};
use std::{collections::BTreeSet, fmt::Debug};

/// Successful (4624) and failed (4625) logons
const DEFAULT_EVENT_IDS: [u32; 2] = [4624, 4625];
/// Max characters of record XML kept in the Evidence
const MAX_XML_CHARS: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLogFile {
    path: String,
    event_ids: BTreeSet<u32>,
}

impl EventLogFile {
    /// Extract logon events from the provided evtx file
    pub fn new(path: &str) -> EventLogFile {
        EventLogFile::with_event_ids(path, &DEFAULT_EVENT_IDS)
    }

    /// Extract only the provided Event IDs. An empty list matches nothing
    pub fn with_event_ids(path: &str, event_ids: &[u32]) -> EventLogFile {
        EventLogFile {
            path: path.to_string(),
            event_ids: event_ids.iter().copied().collect(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn event_ids(&self) -> &BTreeSet<u32> {
        &self.event_ids
    }

    pub(crate) fn extract(&self) -> Vec<Evidence> {
        contain("eventlogs", &self.path, self.read_snapshot())
    }

    fn read_snapshot(&self) -> Result<Vec<Evidence>, ExtractionError> {
        let snapshot = acquire_snapshot(&self.path)?;

        let mut parser = match EvtxParser::from_path(snapshot.path()) {
            Ok(result) => result,
            Err(err) => {
                error!("[eventlogs] Failed to parse event log {}, error: {err:?}", self.path);
                return Err(ExtractionError::ParseFailed);
            }
        };

        let records = parser.records().map(|record| record.map(|data| data.data));
        Ok(collect_records(&self.path, records, &self.event_ids))
    }
}

/// Convert every rendered record XML into Evidence. Records that failed to decode are skipped
fn collect_records<E: Debug>(
    source: &str,
    records: impl Iterator<Item = Result<String, E>>,
    event_ids: &BTreeSet<u32>,
) -> Vec<Evidence> {
    let mut evidence = Vec::new();
    for record in records {
        let xml = match record {
            Ok(result) => result,
            Err(err) => {
                debug!("[eventlogs] Issue parsing record from {source}, error: {err:?}");
                continue;
            }
        };

        if let Some(entry) = record_evidence(source, &xml, event_ids) {
            evidence.push(entry);
        }
    }
    evidence
}

/// Convert one record's XML into Evidence if its Event ID is wanted
pub(crate) fn record_evidence(
    source: &str,
    xml: &str,
    event_ids: &BTreeSet<u32>,
) -> Option<Evidence> {
    let summary = match parse_event_xml(xml) {
        Ok(result) => result,
        Err(err) => {
            debug!("[eventlogs] Skipping record in {source}: {err}");
            return None;
        }
    };

    if !event_ids.contains(&summary.event_id) {
        return None;
    }

    let (timestamp, estimated) = iso8601_or_now(summary.system_time.as_deref().unwrap_or_default());
    let record = EventLogRecord {
        event_id: summary.event_id,
        raw_xml: xml.chars().take(MAX_XML_CHARS).collect(),
    };

    let entry = match Evidence::new(
        source,
        ArtifactType::EventLog(summary.event_id),
        EvidenceData::EventLog(record),
        timestamp,
    ) {
        Ok(result) => result,
        Err(err) => {
            debug!("[eventlogs] Could not build Evidence for {source}: {err}");
            return None;
        }
    };

    if estimated {
        return Some(entry.estimated());
    }
    Some(entry)
}
