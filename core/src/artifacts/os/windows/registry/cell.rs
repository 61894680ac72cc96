use crate::utils::nom_helper::nom_signed_four_bytes;
use log::warn;
use nom::{bytes::complete::take, error::ErrorKind, number::complete::le_u16};
use std::mem::size_of;

#[derive(Debug, PartialEq)]
pub(crate) enum CellType {
    Nk,
    Vk,
    Sk,
    Lf,
    Lh,
    Li,
    Ri,
    Db,
    Unknown,
}

/// Check for a cell type from provided bytes. The input is not consumed
pub(crate) fn get_cell_type(data: &[u8]) -> nom::IResult<&[u8], CellType> {
    let (_, cell_type_data) = take(size_of::<u16>())(data)?;
    let (_, cell_type) = le_u16(cell_type_data)?;

    let cell = match cell_type {
        0x6b6e => CellType::Nk,
        0x686c => CellType::Lh,
        0x6b73 => CellType::Sk,
        0x6b76 => CellType::Vk,
        0x6972 => CellType::Ri,
        0x666c => CellType::Lf,
        0x6264 => CellType::Db,
        0x696c => CellType::Li,
        _ => CellType::Unknown,
    };

    Ok((data, cell))
}

/// Get the size of the cell and check if its allocated (negative numbers = allocated, positive number = unallocated)
pub(crate) fn is_allocated(data: &[u8]) -> nom::IResult<&[u8], (bool, u32)> {
    let (input, size) = nom_signed_four_bytes(data)?;
    let allocated = size < 0;

    Ok((input, (allocated, size.unsigned_abs())))
}

/// Get the payload of the allocated cell at the provided offset. Offsets are relative to the start of the hive bins
pub(crate) fn read_cell(hbin_data: &[u8], offset: u32) -> nom::IResult<&[u8], &[u8]> {
    let (cell_data, _) = take(offset as usize)(hbin_data)?;
    let (cell_data, (allocated, size)) = is_allocated(cell_data)?;
    if !allocated {
        warn!("[registry] Cell at offset {offset} is not allocated");
        return Err(nom::Err::Failure(nom::error::Error::new(
            cell_data,
            ErrorKind::Verify,
        )));
    }

    // Size includes the size itself. We nommed that away
    let adjust_cell_size = 4;
    if size < adjust_cell_size {
        return Err(nom::Err::Failure(nom::error::Error::new(
            cell_data,
            ErrorKind::LengthValue,
        )));
    }
    take((size - adjust_cell_size) as usize)(cell_data)
}
