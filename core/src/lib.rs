pub mod artifacts;
pub mod core;
pub mod error;
pub mod filesystem;
mod structs;
pub mod utils;

pub use artifacts::artifact::{discover_sources, route_path, Artifact, ArtifactKind, Extractor};
pub use common::evidence::{ArtifactType, Evidence, EvidenceData, EvidenceError};
