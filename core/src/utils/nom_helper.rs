/**
 * When parsing binary formats often we parse X bytes and convert bytes to a number
 * With nom we can do that in two steps, ex:  
 *   `take X bytes`  
 *   `le_uX` to number
 *
 * Registry hives are always little endian, so these helpers only support that byte order
 */
use nom::{
    bytes::complete::take,
    number::complete::{le_i32, le_u16, le_u32, le_u64},
};
use std::mem::size_of;

/// Nom four (4) bytes to u32
pub(crate) fn nom_unsigned_four_bytes(data: &[u8]) -> nom::IResult<&[u8], u32> {
    let (input, value_data) = take(size_of::<u32>())(data)?;
    let (_, value) = le_u32(value_data)?;

    Ok((input, value))
}

/// Nom eight (8) bytes to u64
pub(crate) fn nom_unsigned_eight_bytes(data: &[u8]) -> nom::IResult<&[u8], u64> {
    let (input, value_data) = take(size_of::<u64>())(data)?;
    let (_, value) = le_u64(value_data)?;

    Ok((input, value))
}

/// Nom two (2) bytes to u16
pub(crate) fn nom_unsigned_two_bytes(data: &[u8]) -> nom::IResult<&[u8], u16> {
    let (input, value_data) = take(size_of::<u16>())(data)?;
    let (_, value) = le_u16(value_data)?;

    Ok((input, value))
}

/// Nom four (4) bytes to i32
pub(crate) fn nom_signed_four_bytes(data: &[u8]) -> nom::IResult<&[u8], i32> {
    let (input, value_data) = take(size_of::<i32>())(data)?;
    let (_, value) = le_i32(value_data)?;

    Ok((input, value))
}
