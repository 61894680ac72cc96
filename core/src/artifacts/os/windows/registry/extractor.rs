/**
 * Pulls persistence and user activity values out of a Registry hive:
 *   Run/RunOnce keys (SOFTWARE and NTUSER.DAT)
 *   MountPoints2 (NTUSER.DAT)
 *   UserAssist (NTUSER.DAT)
 *
 * Each target is looked up independently. A missing key is expected (not every hive has every target)
 * and only logged at debug
 */
use super::{
    hive::{Hive, RegValue},
    keys::nk::NameKey,
    userassist::{parse_userassist_entry, rot13},
};
use crate::{
    artifacts::error::{contain, ExtractionError},
    filesystem::{acquire::acquire_snapshot, files::read_file},
    utils::time::filetime_to_datetime,
};
use chrono::{DateTime, Utc};
use common::{
    evidence::{ArtifactType, Evidence, EvidenceData},
    windows::RegistryValueRecord,
};
use log::{debug, error};
use serde::Deserialize;

/// Run key locations relative to the hive root. NTUSER.DAT keeps them under `Software`
const RUN_KEYS: [&str; 8] = [
    "Microsoft\\Windows\\CurrentVersion\\Run",
    "Microsoft\\Windows\\CurrentVersion\\RunOnce",
    "Wow6432Node\\Microsoft\\Windows\\CurrentVersion\\Run",
    "Wow6432Node\\Microsoft\\Windows\\CurrentVersion\\RunOnce",
    "Software\\Microsoft\\Windows\\CurrentVersion\\Run",
    "Software\\Microsoft\\Windows\\CurrentVersion\\RunOnce",
    "Software\\Wow6432Node\\Microsoft\\Windows\\CurrentVersion\\Run",
    "Software\\Wow6432Node\\Microsoft\\Windows\\CurrentVersion\\RunOnce",
];
const MOUNT_POINTS: &str = "Software\\Microsoft\\Windows\\CurrentVersion\\Explorer\\MountPoints2";
const USER_ASSIST: &str = "Software\\Microsoft\\Windows\\CurrentVersion\\Explorer\\UserAssist";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegistryTarget {
    RunKeys,
    MountPoints,
    UserAssist,
}

impl RegistryTarget {
    pub fn all() -> Vec<RegistryTarget> {
        vec![
            RegistryTarget::RunKeys,
            RegistryTarget::MountPoints,
            RegistryTarget::UserAssist,
        ]
    }
}

/// A single Registry hive file (NTUSER.DAT, SOFTWARE, SYSTEM, UsrClass.dat)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryHive {
    path: String,
    targets: Vec<RegistryTarget>,
}

impl RegistryHive {
    /// Extract every supported target from the hive
    pub fn new(path: &str) -> RegistryHive {
        RegistryHive::with_targets(path, &RegistryTarget::all())
    }

    pub fn with_targets(path: &str, targets: &[RegistryTarget]) -> RegistryHive {
        let mut unique: Vec<RegistryTarget> = Vec::new();
        for target in targets {
            if !unique.contains(target) {
                unique.push(*target);
            }
        }
        RegistryHive {
            path: path.to_string(),
            targets: unique,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn targets(&self) -> &[RegistryTarget] {
        &self.targets
    }

    /// Snapshot and parse the hive. Any failure results in no Evidence
    pub(crate) fn extract(&self) -> Vec<Evidence> {
        let hive = match self.open_snapshot() {
            Ok(result) => result,
            Err(err) => return contain("registry", &self.path, Err(err)),
        };

        let mut evidence = Vec::new();
        for target in &self.targets {
            let result = match target {
                RegistryTarget::RunKeys => run_keys(&hive, &self.path),
                RegistryTarget::MountPoints => mount_points(&hive, &self.path),
                RegistryTarget::UserAssist => user_assist(&hive, &self.path),
            };
            evidence.append(&mut contain("registry", &self.path, result));
        }
        evidence
    }

    /// Read the copied hive into memory. The snapshot is removed once the bytes are read
    fn open_snapshot(&self) -> Result<Hive, ExtractionError> {
        let snapshot = acquire_snapshot(&self.path)?;
        let data = match read_file(&snapshot.path_string()) {
            Ok(result) => result,
            Err(err) => {
                error!("[registry] Could not read snapshot of {}: {err}", self.path);
                return Err(ExtractionError::AcquisitionFailed);
            }
        };

        match Hive::parse(data) {
            Ok(result) => Ok(result),
            Err(err) => {
                error!("[registry] Could not parse hive {}: {err}", self.path);
                Err(ExtractionError::ParseFailed)
            }
        }
    }
}

/// Open a key and map a missing key to `TargetNotPresent`
fn open_target(hive: &Hive, path: &str) -> Result<NameKey, ExtractionError> {
    match hive.open_key(path) {
        Ok(Some(result)) => Ok(result),
        Ok(None) => {
            debug!("[registry] Key {path} not present");
            Err(ExtractionError::TargetNotPresent)
        }
        Err(err) => {
            error!("[registry] Failed to open key {path}: {err}");
            Err(ExtractionError::ParseFailed)
        }
    }
}

/// Get the values of a key. Failures are logged and produce no values
fn key_values(hive: &Hive, key: &NameKey, key_path: &str) -> Vec<RegValue> {
    match hive.values(key) {
        Ok(result) => result,
        Err(err) => {
            error!("[registry] Failed to read values of {key_path}: {err}");
            Vec::new()
        }
    }
}

/// Get the Run and RunOnce values. Each Run key that exists contributes its values
/// A path that fails to parse is skipped so the other Run keys are still read
fn run_keys(hive: &Hive, source: &str) -> Result<Vec<Evidence>, ExtractionError> {
    let mut evidence = Vec::new();
    let mut found = false;
    let mut failed = false;
    for key_path in RUN_KEYS {
        let key = match open_target(hive, key_path) {
            Ok(result) => result,
            Err(ExtractionError::TargetNotPresent) => continue,
            Err(_) => {
                failed = true;
                continue;
            }
        };
        found = true;

        let timestamp = filetime_to_datetime(key.last_modified);
        for value in key_values(hive, &key, key_path) {
            push_value(
                &mut evidence,
                source,
                ArtifactType::RegistryRunKey,
                key_path,
                &value,
                &value.name,
                timestamp,
            );
        }
    }

    if !found && failed {
        return Err(ExtractionError::ParseFailed);
    }
    if !found {
        return Err(ExtractionError::TargetNotPresent);
    }
    Ok(evidence)
}

/// Get the MountPoints2 values. The key and each volume/share subkey are checked
fn mount_points(hive: &Hive, source: &str) -> Result<Vec<Evidence>, ExtractionError> {
    let key = open_target(hive, MOUNT_POINTS)?;
    let mut evidence = Vec::new();

    let timestamp = filetime_to_datetime(key.last_modified);
    for value in key_values(hive, &key, MOUNT_POINTS) {
        push_value(
            &mut evidence,
            source,
            ArtifactType::RegistryMountPoint,
            MOUNT_POINTS,
            &value,
            &value.name,
            timestamp,
        );
    }

    let subkeys = match hive.subkeys(&key) {
        Ok(result) => result,
        Err(err) => {
            error!("[registry] Failed to get MountPoints2 subkeys: {err}");
            return Ok(evidence);
        }
    };
    for subkey in subkeys {
        let key_path = format!("{MOUNT_POINTS}\\{}", subkey.key_name);
        let timestamp = filetime_to_datetime(subkey.last_modified);
        for value in key_values(hive, &subkey, &key_path) {
            push_value(
                &mut evidence,
                source,
                ArtifactType::RegistryMountPoint,
                &key_path,
                &value,
                &value.name,
                timestamp,
            );
        }
    }
    Ok(evidence)
}

/// Get the UserAssist `Count` values under every GUID subkey. Value names are ROT13 decoded
fn user_assist(hive: &Hive, source: &str) -> Result<Vec<Evidence>, ExtractionError> {
    let key = open_target(hive, USER_ASSIST)?;
    let guids = match hive.subkeys(&key) {
        Ok(result) => result,
        Err(err) => {
            error!("[registry] Failed to get UserAssist subkeys: {err}");
            return Err(ExtractionError::ParseFailed);
        }
    };

    let mut evidence = Vec::new();
    for guid in guids {
        let count_key = match hive.find_subkey(&guid, "Count") {
            Ok(Some(result)) => result,
            Ok(None) => {
                debug!("[registry] UserAssist {} has no Count key", guid.key_name);
                continue;
            }
            Err(err) => {
                error!("[registry] Failed to open UserAssist {}: {err}", guid.key_name);
                continue;
            }
        };

        let key_path = format!("{USER_ASSIST}\\{}\\{}", guid.key_name, count_key.key_name);
        let key_time = filetime_to_datetime(count_key.last_modified);
        for value in key_values(hive, &count_key, &key_path) {
            let timestamp = match parse_userassist_entry(&value.data) {
                Ok((_, Some(entry))) if entry.last_execution != 0 => {
                    debug!(
                        "[registry] UserAssist entry {} executed {} times",
                        value.name, entry.count
                    );
                    filetime_to_datetime(entry.last_execution)
                }
                _ => key_time,
            };
            push_value(
                &mut evidence,
                source,
                ArtifactType::RegistryUserAssist,
                &key_path,
                &value,
                &userassist_name(&value),
                timestamp,
            );
        }
    }
    Ok(evidence)
}

/// UserAssist value names are ROT13 encoded. The unnamed value keeps its placeholder name
fn userassist_name(value: &RegValue) -> String {
    if !value.named {
        return value.name.clone();
    }
    rot13(&value.name)
}

/// Build the Evidence record for one value
fn push_value(
    evidence: &mut Vec<Evidence>,
    source: &str,
    artifact_type: ArtifactType,
    key_path: &str,
    value: &RegValue,
    value_name: &str,
    timestamp: DateTime<Utc>,
) {
    let record = RegistryValueRecord {
        key_path: key_path.to_string(),
        value_name: value_name.to_string(),
        value_data: value.value_data(),
        value_type: value.value_type(),
    };
    match Evidence::new(
        source,
        artifact_type,
        EvidenceData::Registry(record),
        timestamp,
    ) {
        Ok(result) => evidence.push(result),
        Err(err) => error!("[registry] Could not create Evidence for {key_path}: {err}"),
    }
}
