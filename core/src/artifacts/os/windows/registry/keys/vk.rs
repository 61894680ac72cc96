use crate::utils::{
    nom_helper::{nom_unsigned_four_bytes, nom_unsigned_two_bytes},
    strings::{extract_ascii_string, extract_utf16_string},
};
use log::error;
use nom::{bytes::complete::take, error::ErrorKind};

#[derive(Debug)]
pub(crate) struct ValueKey {
    pub(crate) data_size: u32, // High bit set means the data is stored in the data offset field
    pub(crate) data_offset: u32,
    pub(crate) data_type: u32,
    pub(crate) value_name: String, // ASCII or UTF16. "(default)" when unnamed
    pub(crate) named: bool,
}

impl ValueKey {
    /// Parse a Registry value key (vk) cell. The data itself is read separately
    pub(crate) fn parse_value_key(value_key: &[u8]) -> nom::IResult<&[u8], ValueKey> {
        let (input, sig) = nom_unsigned_two_bytes(value_key)?;
        let vk_sig = 0x6b76;
        if sig != vk_sig {
            error!("[registry] Expected value key, got signature: {sig}");
            return Err(nom::Err::Failure(nom::error::Error::new(
                input,
                ErrorKind::Tag,
            )));
        }
        let (input, name_size) = nom_unsigned_two_bytes(input)?;
        let (input, data_size) = nom_unsigned_four_bytes(input)?;
        let (input, data_offset) = nom_unsigned_four_bytes(input)?;
        let (input, data_type) = nom_unsigned_four_bytes(input)?;
        let (input, flags) = nom_unsigned_two_bytes(input)?;
        let (input, _padding) = nom_unsigned_two_bytes(input)?;

        let default_name = 0;
        let (input, value_name) = if name_size == default_name {
            (input, String::from("(default)"))
        } else {
            let (input, value_name_bytes) = take(name_size)(input)?;
            let ascii_name = 0x1;
            let name = if flags & ascii_name == ascii_name {
                extract_ascii_string(value_name_bytes)
            } else {
                extract_utf16_string(value_name_bytes)
            };
            (input, name)
        };

        let value_key = ValueKey {
            data_size,
            data_offset,
            data_type,
            value_name,
            named: name_size != default_name,
        };

        Ok((input, value_key))
    }

    /// Check if the data is small enough to fit in the offset field
    pub(crate) fn is_resident(&self) -> bool {
        let resident_check = 0x80000000;
        (self.data_size & resident_check) == resident_check
    }

    /// Size of the value data without the resident flag
    pub(crate) fn size(&self) -> u32 {
        self.data_size & 0x7fffffff
    }
}
