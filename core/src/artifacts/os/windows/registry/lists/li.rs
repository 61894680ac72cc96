use crate::utils::nom_helper::{nom_unsigned_four_bytes, nom_unsigned_two_bytes};

#[derive(Debug)]
pub(crate) struct LeafItem {
    _sig: u16,
    number_entries: u16,
}

impl LeafItem {
    /// Parse the Leaf Item (li) list which points to a list of subkey offsets
    pub(crate) fn parse_leaf_item(li_data: &[u8]) -> nom::IResult<&[u8], Vec<u32>> {
        let (input, sig) = nom_unsigned_two_bytes(li_data)?;
        let (mut input, number_entries) = nom_unsigned_two_bytes(input)?;

        let li_list = LeafItem {
            _sig: sig,
            number_entries,
        };

        let mut offsets = Vec::new();
        let mut entry_count = 0;
        while entry_count < li_list.number_entries {
            let (li_input, offset) = nom_unsigned_four_bytes(input)?;
            entry_count += 1;
            input = li_input;

            let empty_offset = 0;
            if offset == empty_offset {
                continue;
            }
            offsets.push(offset);
        }
        Ok((input, offsets))
    }
}
