use crate::utils::nom_helper::{nom_unsigned_four_bytes, nom_unsigned_two_bytes};

#[derive(Debug)]
pub(crate) struct HashLeaf {
    _sig: u16,
    number_entries: u16,
}

impl HashLeaf {
    /// Parse the Hash Leaf (lh) or Fast Leaf (lf) list. Both are pairs of subkey offset and name hint/hash
    pub(crate) fn parse_hash_leaf(lh_data: &[u8]) -> nom::IResult<&[u8], Vec<u32>> {
        let (input, sig) = nom_unsigned_two_bytes(lh_data)?;
        let (mut input, number_entries) = nom_unsigned_two_bytes(input)?;

        let lh_list = HashLeaf {
            _sig: sig,
            number_entries,
        };

        let mut offsets = Vec::new();
        let mut entry_count = 0;
        while entry_count < lh_list.number_entries {
            let (lh_input, offset) = nom_unsigned_four_bytes(input)?;
            let (lh_input, _hash) = nom_unsigned_four_bytes(lh_input)?;
            entry_count += 1;
            input = lh_input;

            let empty_offset = 0;
            if offset == empty_offset {
                continue;
            }
            offsets.push(offset);
        }
        Ok((input, offsets))
    }
}
