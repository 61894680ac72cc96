use crate::utils::nom_helper::{nom_unsigned_eight_bytes, nom_unsigned_four_bytes};
use nom::bytes::complete::take;

/// Execution details stored in a Windows 7+ `UserAssist` value
#[derive(Debug, PartialEq)]
pub(crate) struct UserAssistEntry {
    pub(crate) count: u32,
    pub(crate) last_execution: u64, // FILETIME, zero if never recorded
}

/// Parse out the `UserAssist` data: Execution count and last execution time
/// Returns `None` if the data is not the 72 byte Windows 7+ format
pub(crate) fn parse_userassist_entry(
    data: &[u8],
) -> nom::IResult<&[u8], Option<UserAssistEntry>> {
    let entry_size = 72;
    if data.len() != entry_size {
        return Ok((data, None));
    }
    let (input, _session) = nom_unsigned_four_bytes(data)?;
    let (input, count) = nom_unsigned_four_bytes(input)?;
    let unknown_data_size: u8 = 52;
    let (input, _unknown) = take(unknown_data_size)(input)?;
    let (input, last_execution) = nom_unsigned_eight_bytes(input)?;

    Ok((
        input,
        Some(UserAssistEntry {
            count,
            last_execution,
        }),
    ))
}

/// The `UserAssist` value names are ROT13 encoded. Only ASCII letters are rotated
pub fn rot13(rot: &str) -> String {
    let rot_shift = 13;
    rot.chars()
        .map(|c| match c {
            'a'..='m' | 'A'..='M' => ((c as u8) + rot_shift) as char,
            'n'..='z' | 'N'..='Z' => ((c as u8) - rot_shift) as char,
            _ => c,
        })
        .collect()
}
