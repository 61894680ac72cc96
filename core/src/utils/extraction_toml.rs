use crate::{error::TomlError, structs::toml::ExtractionToml};
use log::error;
use std::str::from_utf8;

impl ExtractionToml {
    // Parse the extraction TOML file
    pub(crate) fn parse_extraction_toml(toml_data: &[u8]) -> Result<ExtractionToml, TomlError> {
        let toml_results = toml::from_str(from_utf8(toml_data).unwrap_or_default());
        let extraction: ExtractionToml = match toml_results {
            Ok(results) => results,
            Err(err) => {
                error!("[forenscope] Failed to parse TOML data. Error: {err:?}");
                return Err(TomlError::BadToml);
            }
        };

        if extraction.collection.name.is_empty() {
            error!("[forenscope] Collection name cannot be empty");
            return Err(TomlError::BadToml);
        }
        Ok(extraction)
    }
}
