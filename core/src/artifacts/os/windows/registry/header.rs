use crate::utils::nom_helper::{nom_unsigned_eight_bytes, nom_unsigned_four_bytes};
use log::{error, warn};
use nom::{bytes::complete::take, error::ErrorKind};

/// Size of the base block. Hive bins start right after it
pub(crate) const HEADER_SIZE: usize = 4096;

#[derive(Debug)]
pub(crate) struct RegHeader {
    pub(crate) primary_sequence_num: u32,
    pub(crate) secondary_sequence_num: u32,
    pub(crate) modified: u64,
    pub(crate) major_version: u32,
    pub(crate) minor_version: u32,
    pub(crate) root_offset: u32,
    pub(crate) hive_bins_size: u32, // Total size of all hbin cells
    pub(crate) valid_checksum: bool,
}

impl RegHeader {
    /// Parse the header structure of a Registry file
    pub(crate) fn parse_header(data: &[u8]) -> nom::IResult<&[u8], RegHeader> {
        let (input, signature) = nom_unsigned_four_bytes(data)?;
        let sig = 0x66676572;

        if signature != sig {
            error!("[registry] Not a registry file, got signature: {signature}");
            return Err(nom::Err::Failure(nom::error::Error::new(
                input,
                ErrorKind::Fail,
            )));
        }
        let (input, primary_sequence_num) = nom_unsigned_four_bytes(input)?;
        let (input, secondary_sequence_num) = nom_unsigned_four_bytes(input)?;
        let (input, modified) = nom_unsigned_eight_bytes(input)?;

        let (input, major_version) = nom_unsigned_four_bytes(input)?;
        let (input, minor_version) = nom_unsigned_four_bytes(input)?;
        let (input, _file_type) = nom_unsigned_four_bytes(input)?;
        let (input, _file_format) = nom_unsigned_four_bytes(input)?;

        let (input, root_offset) = nom_unsigned_four_bytes(input)?;
        let (input, hive_bins_size) = nom_unsigned_four_bytes(input)?;
        let (input, _cluster_factor) = nom_unsigned_four_bytes(input)?;

        // Filename (64 bytes) and reserved data (396 bytes)
        let skip_size: usize = 460;
        let (input, _) = take(skip_size)(input)?;
        let (input, checksum) = nom_unsigned_four_bytes(input)?;

        let checksum_source_size: usize = 508;
        let (_, checksum_source) = take(checksum_source_size)(data)?;
        let (_, verify_checksum) = RegHeader::verify_checksum(checksum_source)?;

        let valid_checksum = verify_checksum == checksum;
        if !valid_checksum {
            warn!("[registry] Header checksum mismatch. Expected {checksum} got {verify_checksum}");
        }
        if primary_sequence_num != secondary_sequence_num {
            warn!("[registry] Hive is dirty, recent changes may only exist in the transaction logs");
        }

        let reg_header = RegHeader {
            primary_sequence_num,
            secondary_sequence_num,
            modified,
            major_version,
            minor_version,
            root_offset,
            hive_bins_size,
            valid_checksum,
        };

        Ok((input, reg_header))
    }

    /// Validate the Registry checksum value
    pub(crate) fn verify_checksum(data: &[u8]) -> nom::IResult<&[u8], u32> {
        let mut checksum = 0;
        let mut input = data;
        while !input.is_empty() {
            let (remaining_data, xor) = nom_unsigned_four_bytes(input)?;

            checksum ^= xor;
            input = remaining_data;
        }
        Ok((input, checksum))
    }
}
