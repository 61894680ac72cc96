use crate::utils::nom_helper::{nom_unsigned_eight_bytes, nom_unsigned_four_bytes};
use log::error;
use nom::{bytes::complete::take, error::ErrorKind};

#[derive(Debug)]
pub(crate) struct HiveBin {
    pub(crate) offset: u32, // Offset relative to the first hbin
    pub(crate) size: u32,
    pub(crate) timestamp: u64, // Only set for the first hbin
}

impl HiveBin {
    /// Parse the hbin header. Cell data starts right after the 32 byte header
    pub(crate) fn parse_hive_bin_header(data: &[u8]) -> nom::IResult<&[u8], HiveBin> {
        let (input, signature) = nom_unsigned_four_bytes(data)?;
        let sig = 0x6e696268;
        if signature != sig {
            error!("[registry] Not a hbin, got signature: {signature}");
            return Err(nom::Err::Failure(nom::error::Error::new(
                input,
                ErrorKind::Fail,
            )));
        }

        let (input, offset) = nom_unsigned_four_bytes(input)?;
        let (input, size) = nom_unsigned_four_bytes(input)?;
        let reserved_size: usize = 8;
        let (input, _reserved) = take(reserved_size)(input)?;
        let (input, timestamp) = nom_unsigned_eight_bytes(input)?;
        let (input, _spare) = nom_unsigned_four_bytes(input)?;

        let hbin = HiveBin {
            offset,
            size,
            timestamp,
        };
        Ok((input, hbin))
    }
}
