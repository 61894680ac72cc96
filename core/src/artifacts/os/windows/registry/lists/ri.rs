use crate::utils::nom_helper::{nom_unsigned_four_bytes, nom_unsigned_two_bytes};

#[derive(Debug)]
pub(crate) struct RefItem {
    _sig: u16,
    number_entries: u16,
}

impl RefItem {
    /// Parse the Reference Item (ri) list. Each entry points to another subkey list (lf, lh, or li)
    pub(crate) fn parse_ref_item(ri_data: &[u8]) -> nom::IResult<&[u8], Vec<u32>> {
        let (input, sig) = nom_unsigned_two_bytes(ri_data)?;
        let (mut input, number_entries) = nom_unsigned_two_bytes(input)?;

        let ri_list = RefItem {
            _sig: sig,
            number_entries,
        };

        let mut list_offsets = Vec::new();
        let mut entry_count = 0;
        while entry_count < ri_list.number_entries {
            let (ri_input, offset) = nom_unsigned_four_bytes(input)?;
            entry_count += 1;
            input = ri_input;

            let empty_offset = 0;
            if offset == empty_offset {
                continue;
            }
            list_offsets.push(offset);
        }
        Ok((input, list_offsets))
    }
}
