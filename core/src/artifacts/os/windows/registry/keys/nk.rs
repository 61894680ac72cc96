use crate::utils::{
    nom_helper::{nom_unsigned_eight_bytes, nom_unsigned_four_bytes, nom_unsigned_two_bytes},
    strings::{extract_ascii_string, extract_utf16_string},
};
use log::error;
use nom::{bytes::complete::take, error::ErrorKind};

/// Offset value used when a key has no subkey or value list
pub(crate) const NO_LIST: u32 = 0xffffffff;

#[derive(Debug, Clone)]
pub(crate) struct NameKey {
    pub(crate) flags: u16,
    pub(crate) last_modified: u64, // FILETIME
    pub(crate) num_subkeys: u32,
    pub(crate) subkeys_list_offset: u32,
    pub(crate) number_key_values: u32,
    pub(crate) key_values_offset: u32,
    pub(crate) key_name: String,
}

impl NameKey {
    /// Parse a Registry name key (nk) cell
    pub(crate) fn parse_name_key(name_key: &[u8]) -> nom::IResult<&[u8], NameKey> {
        let (input, sig) = nom_unsigned_two_bytes(name_key)?;
        let nk_sig = 0x6b6e;
        if sig != nk_sig {
            error!("[registry] Expected name key, got signature: {sig}");
            return Err(nom::Err::Failure(nom::error::Error::new(
                input,
                ErrorKind::Tag,
            )));
        }
        let (input, flags) = nom_unsigned_two_bytes(input)?;
        let (input, last_modified) = nom_unsigned_eight_bytes(input)?;
        let (input, _accessed_bits) = nom_unsigned_four_bytes(input)?; // If Windows 8+, otherwise its Spare
        let (input, _parent) = nom_unsigned_four_bytes(input)?;
        let (input, num_subkeys) = nom_unsigned_four_bytes(input)?;

        let (input, _num_volatile_subkeys) = nom_unsigned_four_bytes(input)?;
        let (input, subkeys_list_offset) = nom_unsigned_four_bytes(input)?;
        let (input, _volatile_subkeys_list_offset) = nom_unsigned_four_bytes(input)?;
        let (input, number_key_values) = nom_unsigned_four_bytes(input)?;
        let (input, key_values_offset) = nom_unsigned_four_bytes(input)?;
        let (input, _key_security_offset) = nom_unsigned_four_bytes(input)?;
        let (input, _class_name_offset) = nom_unsigned_four_bytes(input)?;

        // Largest subkey name, class name, value name, value data, and workvar
        let skip_size: usize = 20;
        let (input, _) = take(skip_size)(input)?;
        let (input, key_name_length) = nom_unsigned_two_bytes(input)?;
        let (input, _class_name_length) = nom_unsigned_two_bytes(input)?;
        let (input, key_name_data) = take(key_name_length)(input)?;

        // The string can either be ASCII or UTF16
        let ascii_name = 0x20;
        let key_name = if flags & ascii_name == ascii_name {
            extract_ascii_string(key_name_data)
        } else {
            extract_utf16_string(key_name_data)
        };

        let name_key = NameKey {
            flags,
            last_modified,
            num_subkeys,
            subkeys_list_offset,
            number_key_values,
            key_values_offset,
            key_name,
        };

        Ok((input, name_key))
    }

    pub(crate) fn has_subkeys(&self) -> bool {
        self.num_subkeys != 0 && self.subkeys_list_offset != NO_LIST
    }

    pub(crate) fn has_values(&self) -> bool {
        self.number_key_values != 0 && self.key_values_offset != NO_LIST
    }

    pub(crate) fn is_root(&self) -> bool {
        let root_key = 0x4;
        self.flags & root_key == root_key
    }
}
