/**
 * The contract every decoder follows plus the helpers used to pick one
 *
 * Decoders are selected by the caller (`Extractor::new`) or by file name convention (`route_path`).
 * Each decoder owns exactly one source path and every `extract()` call is a pure read of that source
 */
use super::{
    applications::store::{Browser, BrowserStore, StoreKind},
    os::windows::{eventlogs::parser::EventLogFile, registry::extractor::RegistryHive},
};
use common::evidence::Evidence;
use log::{debug, warn};
use serde::Deserialize;
use std::path::Path;
use walkdir::WalkDir;

pub trait Artifact {
    /// Short stable name used in logs
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    /// Read the source and return every Evidence record found. Failures produce no records
    fn extract(&self) -> Vec<Evidence>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    ChromiumHistory,
    ChromiumCookies,
    FirefoxHistory,
    FirefoxCookies,
    Registry,
    Eventlogs,
}

/// One decoder per artifact family
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extractor {
    Browser(BrowserStore),
    Registry(RegistryHive),
    EventLog(EventLogFile),
}

impl Extractor {
    /// Build the decoder for `kind`. `event_ids` is only used by event logs, the default logon IDs apply when `None`
    pub fn new(kind: ArtifactKind, path: &str, event_ids: Option<&[u32]>) -> Extractor {
        match kind {
            ArtifactKind::ChromiumHistory => Extractor::Browser(BrowserStore::new(
                path,
                Browser::Chromium,
                StoreKind::History,
            )),
            ArtifactKind::ChromiumCookies => Extractor::Browser(BrowserStore::new(
                path,
                Browser::Chromium,
                StoreKind::Cookies,
            )),
            ArtifactKind::FirefoxHistory => Extractor::Browser(BrowserStore::new(
                path,
                Browser::Firefox,
                StoreKind::History,
            )),
            ArtifactKind::FirefoxCookies => Extractor::Browser(BrowserStore::new(
                path,
                Browser::Firefox,
                StoreKind::Cookies,
            )),
            ArtifactKind::Registry => Extractor::Registry(RegistryHive::new(path)),
            ArtifactKind::Eventlogs => match event_ids {
                Some(ids) => Extractor::EventLog(EventLogFile::with_event_ids(path, ids)),
                None => Extractor::EventLog(EventLogFile::new(path)),
            },
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Extractor::Browser(store) => store.path(),
            Extractor::Registry(hive) => hive.path(),
            Extractor::EventLog(log) => log.path(),
        }
    }
}

impl Artifact for Extractor {
    fn name(&self) -> &str {
        match self {
            Extractor::Browser(store) => store.name(),
            Extractor::Registry(_) => "registry",
            Extractor::EventLog(_) => "eventlogs",
        }
    }

    fn description(&self) -> &str {
        match self {
            Extractor::Browser(store) => store.description(),
            Extractor::Registry(_) => "Run keys, MountPoints2, and UserAssist from a Registry hive",
            Extractor::EventLog(_) => "Selected Event IDs from a Windows EventLog file",
        }
    }

    fn extract(&self) -> Vec<Evidence> {
        let evidence = match self {
            Extractor::Browser(store) => store.extract(),
            Extractor::Registry(hive) => hive.extract(),
            Extractor::EventLog(log) => log.extract(),
        };
        debug!(
            "[{}] Extracted {} records from {}",
            self.name(),
            evidence.len(),
            self.path()
        );
        evidence
    }
}

/// Pick a decoder from the file name. Unknown files return `None`
pub fn route_path(path: &str) -> Option<ArtifactKind> {
    let name = Path::new(path).file_name()?.to_str()?;

    match name {
        "History" => return Some(ArtifactKind::ChromiumHistory),
        "Cookies" => return Some(ArtifactKind::ChromiumCookies),
        "places.sqlite" => return Some(ArtifactKind::FirefoxHistory),
        "cookies.sqlite" => return Some(ArtifactKind::FirefoxCookies),
        _ => {}
    }

    let lower = name.to_lowercase();
    if ["ntuser.dat", "software", "system", "usrclass.dat"].contains(&lower.as_str()) {
        return Some(ArtifactKind::Registry);
    }
    if lower.ends_with(".evtx") {
        return Some(ArtifactKind::Eventlogs);
    }
    None
}

/// Walk a directory and route every file that matches a known artifact
pub fn discover_sources(directory: &str) -> Vec<(ArtifactKind, String)> {
    let mut sources = Vec::new();
    for entries in WalkDir::new(directory) {
        let entry = match entries {
            Ok(result) => result,
            Err(err) => {
                warn!("[artifact] Failed to read directory entry: {err:?}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path().display().to_string();
        if let Some(kind) = route_path(&path) {
            sources.push((kind, path));
        }
    }
    sources.sort_by(|first, second| first.1.cmp(&second.1));
    sources
}
