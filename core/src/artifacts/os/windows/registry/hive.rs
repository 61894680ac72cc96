/**
 * A parsed Registry hive held in memory. Lookups walk from the root key by name instead of
 * iterating the whole file, so only the keys of interest are decoded
 *
 * References:
 *   https://github.com/libyal/libregf/blob/main/documentation/Windows%20NT%20Registry%20File%20(REGF)%20format.asciidoc
 *   https://github.com/msuhanov/regf/blob/master/Windows%20registry%20file%20format%20specification.md
 */
use super::{
    cell::read_cell,
    error::RegistryError,
    hbin::HiveBin,
    header::{RegHeader, HEADER_SIZE},
    keys::{
        data::{read_value_data, render_value_data, value_type_name},
        nk::NameKey,
        vk::ValueKey,
    },
    lists::walk_list,
};
use crate::utils::nom_helper::nom_unsigned_four_bytes;
use log::{debug, error, warn};
use std::collections::HashSet;

#[derive(Debug)]
pub(crate) struct Hive {
    data: Vec<u8>,
    root_offset: u32,
    minor_version: u32,
}

/// A decoded value with its raw bytes
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RegValue {
    pub(crate) name: String,
    /// False for the unnamed (default) value
    pub(crate) named: bool,
    pub(crate) data_type: u32,
    pub(crate) data: Vec<u8>,
}

impl RegValue {
    pub(crate) fn value_type(&self) -> String {
        value_type_name(self.data_type)
    }

    pub(crate) fn value_data(&self) -> String {
        render_value_data(self.data_type, &self.data)
    }
}

impl Hive {
    /// Validate the header and first hbin of a Registry file
    pub(crate) fn parse(data: Vec<u8>) -> Result<Hive, RegistryError> {
        let header = match RegHeader::parse_header(&data) {
            Ok((_, result)) => result,
            Err(err) => {
                error!("[registry] Failed to parse Registry header: {err:?}");
                return Err(RegistryError::NotRegistry);
            }
        };

        let hbin_data = data.get(HEADER_SIZE..).unwrap_or_default();
        let hbin = match HiveBin::parse_hive_bin_header(hbin_data) {
            Ok((_, result)) => result,
            Err(err) => {
                error!("[registry] Failed to parse first hbin: {err:?}");
                return Err(RegistryError::Parser);
            }
        };

        if header.hive_bins_size as usize > hbin_data.len() {
            warn!(
                "[registry] Hive is truncated. Header expects {} bytes of hbins, got {}",
                header.hive_bins_size,
                hbin_data.len()
            );
        }
        debug!(
            "[registry] Hive version {}.{} modified {}. First hbin at {} size {} timestamp {}. Checksum valid: {}",
            header.major_version,
            header.minor_version,
            header.modified,
            hbin.offset,
            hbin.size,
            hbin.timestamp,
            header.valid_checksum
        );

        Ok(Hive {
            data,
            root_offset: header.root_offset,
            minor_version: header.minor_version,
        })
    }

    /// Cell data. All cell offsets are relative to the start of the first hbin
    fn hbin_data(&self) -> &[u8] {
        self.data.get(HEADER_SIZE..).unwrap_or_default()
    }

    pub(crate) fn root(&self) -> Result<NameKey, RegistryError> {
        let root = self.key_at(self.root_offset)?;
        if !root.is_root() {
            debug!("[registry] Root cell {} is not flagged as root", root.key_name);
        }
        Ok(root)
    }

    /// Parse the name key at the provided offset
    fn key_at(&self, offset: u32) -> Result<NameKey, RegistryError> {
        let cell_result = read_cell(self.hbin_data(), offset);
        let cell_data = match cell_result {
            Ok((_, result)) => result,
            Err(err) => {
                error!("[registry] Failed to read key cell at {offset}: {err:?}");
                return Err(RegistryError::Parser);
            }
        };

        match NameKey::parse_name_key(cell_data) {
            Ok((_, result)) => Ok(result),
            Err(err) => {
                error!("[registry] Failed to parse key at {offset}: {err:?}");
                Err(RegistryError::Parser)
            }
        }
    }

    /// Get the immediate subkeys of a key. Subkeys that fail to parse are skipped
    pub(crate) fn subkeys(&self, key: &NameKey) -> Result<Vec<NameKey>, RegistryError> {
        if !key.has_subkeys() {
            return Ok(Vec::new());
        }

        let mut offset_tracker = HashSet::new();
        let list_result = walk_list(self.hbin_data(), key.subkeys_list_offset, &mut offset_tracker);
        let offsets = match list_result {
            Ok((_, result)) => result,
            Err(err) => {
                error!(
                    "[registry] Failed to iterate through sublist of {}: {err:?}",
                    key.key_name
                );
                return Err(RegistryError::Parser);
            }
        };

        let mut subkeys = Vec::new();
        for offset in offsets {
            match self.key_at(offset) {
                Ok(result) => subkeys.push(result),
                Err(err) => warn!(
                    "[registry] Skipping subkey of {} at {offset}: {err}",
                    key.key_name
                ),
            }
        }
        Ok(subkeys)
    }

    /// Find a subkey by name. Registry key names are case insensitive
    pub(crate) fn find_subkey(
        &self,
        key: &NameKey,
        name: &str,
    ) -> Result<Option<NameKey>, RegistryError> {
        let lower_name = name.to_lowercase();
        let subkeys = self.subkeys(key)?;
        Ok(subkeys
            .into_iter()
            .find(|subkey| subkey.key_name.to_lowercase() == lower_name))
    }

    /// Open a key by its path relative to the root key. Ex: `Microsoft\Windows\CurrentVersion\Run`
    /// Returns `None` if any part of the path does not exist
    pub(crate) fn open_key(&self, path: &str) -> Result<Option<NameKey>, RegistryError> {
        let mut key = self.root()?;
        for name in path.split('\\').filter(|name| !name.is_empty()) {
            key = match self.find_subkey(&key, name)? {
                Some(result) => result,
                None => return Ok(None),
            };
        }
        Ok(Some(key))
    }

    /// Get all values of a key. Values that fail to parse are skipped
    pub(crate) fn values(&self, key: &NameKey) -> Result<Vec<RegValue>, RegistryError> {
        if !key.has_values() {
            return Ok(Vec::new());
        }

        let list_result = read_cell(self.hbin_data(), key.key_values_offset);
        let mut list_data = match list_result {
            Ok((_, result)) => result,
            Err(err) => {
                error!(
                    "[registry] Failed to read value list of {}: {err:?}",
                    key.key_name
                );
                return Err(RegistryError::Parser);
            }
        };

        let mut values = Vec::new();
        for _ in 0..key.number_key_values {
            let (remaining, offset) = match nom_unsigned_four_bytes(list_data) {
                Ok(result) => result,
                Err(_) => {
                    warn!("[registry] Value list of {} is shorter than expected", key.key_name);
                    break;
                }
            };
            list_data = remaining;

            match self.value_at(offset) {
                Ok(result) => values.push(result),
                Err(err) => warn!(
                    "[registry] Skipping value of {} at {offset}: {err}",
                    key.key_name
                ),
            }
        }
        Ok(values)
    }

    /// Parse the value key at the provided offset along with its data
    fn value_at(&self, offset: u32) -> Result<RegValue, RegistryError> {
        let value_key = match read_cell(self.hbin_data(), offset)
            .and_then(|(_, cell_data)| ValueKey::parse_value_key(cell_data))
        {
            Ok((_, result)) => result,
            Err(err) => {
                debug!("[registry] Failed to parse value key at {offset}: {err:?}");
                return Err(RegistryError::Parser);
            }
        };

        let data = match read_value_data(self.hbin_data(), &value_key, self.minor_version) {
            Ok((_, result)) => result,
            Err(err) => {
                debug!(
                    "[registry] Failed to read data for {}: {err:?}",
                    value_key.value_name
                );
                return Err(RegistryError::Parser);
            }
        };

        Ok(RegValue {
            name: value_key.value_name,
            named: value_key.named,
            data_type: value_key.data_type,
            data,
        })
    }
}
