use super::vk::ValueKey;
use crate::{
    artifacts::os::windows::registry::cell::{get_cell_type, read_cell, CellType},
    utils::{
        encoding::base64_encode_standard,
        nom_helper::{nom_unsigned_four_bytes, nom_unsigned_two_bytes},
        strings::{extract_multiline_utf16_string, extract_utf16_string},
    },
};
use log::warn;
use nom::bytes::complete::take;

/// Largest amount of data a single cell holds before the data is split into a big data (db) list
const BIG_DATA_SEGMENT: u32 = 16344;

/// Get the raw bytes of a value. Handles resident data, regular data cells, and big data (db) lists
pub(crate) fn read_value_data<'a>(
    hbin_data: &'a [u8],
    value: &ValueKey,
    minor_version: u32,
) -> nom::IResult<&'a [u8], Vec<u8>> {
    let size = value.size();
    let null_size = 0;
    if size == null_size {
        return Ok((hbin_data, Vec::new()));
    }

    if value.is_resident() {
        // Resident data is never larger than the offset field
        let max_resident = 4;
        let resident = value.data_offset.to_le_bytes();
        let end = size.min(max_resident) as usize;
        return Ok((hbin_data, resident[..end].to_vec()));
    }

    let (_, cell_data) = read_cell(hbin_data, value.data_offset)?;

    // Big data cells only exist in Registry versions higher than 1.3
    let min_version = 3;
    if size > BIG_DATA_SEGMENT && minor_version > min_version {
        let (_, cell_type) = get_cell_type(cell_data)?;
        if cell_type == CellType::Db {
            return parse_big_data(hbin_data, cell_data, size);
        }
    }

    // The size in the Value key is the actual size of the data
    // Any remaining data is slack space
    let (_, data) = take(size)(cell_data)?;
    Ok((hbin_data, data.to_vec()))
}

/// Combine the segments referenced by a big data (db) cell
fn parse_big_data<'a>(
    hbin_data: &'a [u8],
    db_data: &'a [u8],
    size: u32,
) -> nom::IResult<&'a [u8], Vec<u8>> {
    let (input, _sig) = nom_unsigned_two_bytes(db_data)?;
    let (input, number_segments) = nom_unsigned_two_bytes(input)?;
    let (_, segments_offset) = nom_unsigned_four_bytes(input)?;

    let (_, mut segment_list) = read_cell(hbin_data, segments_offset)?;
    let mut data: Vec<u8> = Vec::new();
    for _ in 0..number_segments {
        let (remaining, segment_offset) = nom_unsigned_four_bytes(segment_list)?;
        segment_list = remaining;

        let (_, segment) = read_cell(hbin_data, segment_offset)?;
        let remaining_size = (size as usize).saturating_sub(data.len());
        let segment_size = remaining_size.min(BIG_DATA_SEGMENT as usize).min(segment.len());
        data.extend_from_slice(&segment[..segment_size]);
    }

    if data.len() != size as usize {
        warn!(
            "[registry] Big data size mismatch. Expected {size} got {}",
            data.len()
        );
    }
    Ok((hbin_data, data))
}

/// Get the Registry data type name (Ex: `REG_SZ`)
pub(crate) fn value_type_name(data_type: u32) -> String {
    let name = match data_type {
        0x0 => "REG_NONE",
        0x1 => "REG_SZ",
        0x2 => "REG_EXPAND_SZ",
        0x3 => "REG_BINARY",
        0x4 => "REG_DWORD",
        0x5 => "REG_DWORD_BIG_ENDIAN",
        0x6 => "REG_LINK",
        0x7 => "REG_MULTI_SZ",
        0x8 => "REG_RESOURCE_LIST",
        0x9 => "REG_FULL_RESOURCE_DESCRIPTOR",
        0xa => "REG_RESOURCE_REQUIREMENTS_LIST",
        0xb => "REG_QWORD",
        _ => "REG_UNKNOWN",
    };
    name.to_string()
}

/// Convert value data to a string based on the data type. Binary data is base64 encoded
pub(crate) fn render_value_data(data_type: u32, data: &[u8]) -> String {
    if data.is_empty() {
        // Data value is "(NULL)" if data size is zero (0)
        return String::from("(NULL)");
    }

    match data_type {
        0x1 | 0x2 | 0x6 => extract_utf16_string(data),
        0x7 => extract_multiline_utf16_string(data),
        0x4 if data.len() >= 4 => {
            format!("{}", u32::from_le_bytes([data[0], data[1], data[2], data[3]]))
        }
        0x5 if data.len() >= 4 => {
            format!("{}", u32::from_be_bytes([data[0], data[1], data[2], data[3]]))
        }
        0xb if data.len() >= 8 => {
            let mut qword = [0u8; 8];
            qword.copy_from_slice(&data[..8]);
            format!("{}", u64::from_le_bytes(qword))
        }
        _ => base64_encode_standard(data),
    }
}
