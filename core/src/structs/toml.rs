use crate::artifacts::{artifact::ArtifactKind, os::windows::registry::extractor::RegistryTarget};
use common::files::Hashes;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ExtractionToml {
    pub collection: Collection,
    #[serde(default)]
    pub sources: Vec<SourceEntry>,
}

#[derive(Debug, Deserialize)]
pub struct Collection {
    pub name: String,
    /**Directory for the `<uuid>.log` file. No log file is created when missing */
    pub log_directory: Option<String>,
    pub logging: Option<String>,
    #[serde(default)]
    pub hashes: Hashes,
}

#[derive(Debug, Deserialize)]
pub struct SourceEntry {
    pub path: String,
    /**Routed by file name when not provided */
    pub artifact: Option<ArtifactKind>,
    /**Only used by `eventlogs` */
    pub event_ids: Option<Vec<u32>>,
    /**Only used by `registry` */
    pub targets: Option<Vec<RegistryTarget>>,
}
