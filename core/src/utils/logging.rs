use crate::{error::TomlError, structs::toml::Collection};
use log::{error, LevelFilter};
use std::fs::{create_dir_all, File};
use uuid::Uuid;

/// Create log output file and logging level based on TOML `Collection` configuration
/// Returns `None` when no log directory is configured
pub(crate) fn create_log_file(
    collection: &Collection,
) -> Result<Option<(File, LevelFilter)>, TomlError> {
    let directory = match &collection.log_directory {
        Some(result) => result,
        None => return Ok(None),
    };

    let path = format!("{directory}/{}", collection.name);
    if let Err(err) = create_dir_all(&path) {
        error!("[forenscope] Failed to create logging output directory for {path}. Error: {err:?}");
        return Err(TomlError::CreateDirectory);
    }

    let log_file = match File::create(format!("{path}/{}.log", Uuid::new_v4().hyphenated())) {
        Ok(result) => result,
        Err(err) => {
            error!("[forenscope] Failed to create log file at {path}. Error: {err:?}");
            return Err(TomlError::LogFile);
        }
    };

    Ok(Some((log_file, log_level(&collection.logging))))
}

/// Map the configured level name to a `LevelFilter`. Defaults to `Warn`
fn log_level(logging: &Option<String>) -> LevelFilter {
    let log_level = match logging {
        Some(result) => result,
        None => return LevelFilter::Warn,
    };

    match log_level.to_lowercase().as_str() {
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        _ => LevelFilter::Warn,
    }
}
