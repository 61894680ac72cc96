use crate::{
    artifacts::{
        artifact::{route_path, Artifact, ArtifactKind, Extractor},
        os::windows::registry::extractor::RegistryHive,
    },
    error::TomlError,
    filesystem::files::{hash_file, read_file},
    structs::toml::{ExtractionToml, SourceEntry},
    utils::logging::create_log_file,
};
use common::{evidence::Evidence, files::Hashes};
use log::{error, info, warn};
use simplelog::{Config, WriteLogger};

/// Parse a TOML file at provided path and extract Evidence from every configured source
pub fn parse_toml_file(path: &str) -> Result<Vec<Evidence>, TomlError> {
    let buffer_results = read_file(path);
    let buffer = match buffer_results {
        Ok(results) => results,
        Err(err) => {
            error!("[forenscope] Could not read TOML file {path}: {err}");
            return Err(TomlError::NoFile);
        }
    };

    parse_toml_data(&buffer)
}

/// Parse an already read TOML file
pub fn parse_toml_data(data: &[u8]) -> Result<Vec<Evidence>, TomlError> {
    let extraction = ExtractionToml::parse_extraction_toml(data)?;
    extraction_collection(&extraction)
}

/// Run every configured source and aggregate the results
pub(crate) fn extraction_collection(
    extraction: &ExtractionToml,
) -> Result<Vec<Evidence>, TomlError> {
    if let Some((log_file, level)) = create_log_file(&extraction.collection)? {
        let _ = WriteLogger::init(level, Config::default(), log_file);
    }

    let mut evidence = Vec::new();
    for source in &extraction.sources {
        let extractor = match source_extractor(source) {
            Some(result) => result,
            None => continue,
        };

        let mut results = extractor.extract();
        if results.is_empty() {
            continue;
        }

        if let Some(hash) = source_hash(&extraction.collection.hashes, &source.path) {
            results = results
                .into_iter()
                .map(|entry| entry.with_hash(&hash))
                .collect();
        }
        evidence.append(&mut results);
    }

    info!(
        "[forenscope] Collection {} extracted {} records from {} sources",
        extraction.collection.name,
        evidence.len(),
        extraction.sources.len()
    );
    Ok(evidence)
}

/// Build the decoder for a configured source. Sources that match no artifact are skipped
fn source_extractor(source: &SourceEntry) -> Option<Extractor> {
    let kind = match source.artifact.or_else(|| route_path(&source.path)) {
        Some(result) => result,
        None => {
            warn!("[forenscope] No artifact matches {}, skipping", source.path);
            return None;
        }
    };

    if kind == ArtifactKind::Registry {
        if let Some(targets) = &source.targets {
            return Some(Extractor::Registry(RegistryHive::with_targets(
                &source.path,
                targets,
            )));
        }
    }
    Some(Extractor::new(kind, &source.path, source.event_ids.as_deref()))
}

/// Hash the source file and return the strongest enabled digest
fn source_hash(hashes: &Hashes, path: &str) -> Option<String> {
    if !hashes.md5 && !hashes.sha1 && !hashes.sha256 {
        return None;
    }

    let (md5, sha1, sha256) = match hash_file(hashes, path) {
        Ok(result) => result,
        Err(err) => {
            warn!("[forenscope] Could not hash {path}: {err}");
            return None;
        }
    };
    [sha256, sha1, md5]
        .into_iter()
        .find(|hash| !hash.is_empty())
}
