/**
 * Live browser databases and Registry hives are usually locked by the OS or the owning application.
 * Decoders never read the original source. Instead the source is copied into a fresh temporary
 * directory and the copy is parsed
 *
 * The temporary directory is owned by `Snapshot` and is removed when the `Snapshot` is dropped
 */
use super::{error::AcquireError, files::get_filename};
use log::{error, warn};
use std::{
    fs::copy,
    path::{Path, PathBuf},
};
use tempfile::{Builder, TempDir};

/// SQLite files that may hold uncommitted pages for a database
const SQLITE_SIDECARS: [&str; 2] = ["-wal", "-journal"];

#[derive(Debug)]
pub struct Snapshot {
    /**Removes the copy on drop */
    _directory: TempDir,
    path: PathBuf,
}

impl Snapshot {
    /// Path to the copied source file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn path_string(&self) -> String {
        self.path.display().to_string()
    }
}

/// Copy a source file into a new directory under the system temp directory
pub fn acquire_snapshot(source: &str) -> Result<Snapshot, AcquireError> {
    acquire_snapshot_in(&std::env::temp_dir(), source)
}

/// Copy a source file into a new directory under the provided base directory
pub fn acquire_snapshot_in(base: &Path, source: &str) -> Result<Snapshot, AcquireError> {
    let source_path = Path::new(source);
    if !source_path.exists() {
        return Err(AcquireError::SourceNotFound);
    }
    if !source_path.is_file() {
        error!("[acquire] Source {source} is not a regular file");
        return Err(AcquireError::AcquisitionFailed);
    }

    let directory = match Builder::new().prefix("forenscope").tempdir_in(base) {
        Ok(result) => result,
        Err(err) => {
            error!("[acquire] Could not create temp directory for {source}: {err:?}");
            return Err(AcquireError::AcquisitionFailed);
        }
    };

    let mut filename = get_filename(source);
    if filename.is_empty() {
        filename = String::from("source");
    }
    let path = directory.path().join(&filename);
    if let Err(err) = copy(source_path, &path) {
        error!("[acquire] Could not copy {source} to snapshot: {err:?}");
        return Err(AcquireError::AcquisitionFailed);
    }

    for sidecar in SQLITE_SIDECARS {
        let sidecar_source = format!("{source}{sidecar}");
        if !Path::new(&sidecar_source).is_file() {
            continue;
        }
        let sidecar_path = directory.path().join(format!("{filename}{sidecar}"));
        if let Err(err) = copy(&sidecar_source, &sidecar_path) {
            warn!("[acquire] Could not copy sidecar {sidecar_source}: {err:?}");
        }
    }

    Ok(Snapshot {
        _directory: directory,
        path,
    })
}
