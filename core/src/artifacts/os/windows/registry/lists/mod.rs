pub(crate) mod lh;
pub(crate) mod li;
pub(crate) mod ri;

use super::cell::{get_cell_type, read_cell, CellType};
use lh::HashLeaf;
use li::LeafItem;
use log::error;
use nom::error::ErrorKind;
use ri::RefItem;
use std::collections::HashSet;

/// Get the offsets of every subkey (nk) referenced by the list at the provided offset
/// `offset_tracker` protects against lists that reference each other
pub(crate) fn walk_list<'a>(
    hbin_data: &'a [u8],
    offset: u32,
    offset_tracker: &mut HashSet<u32>,
) -> nom::IResult<&'a [u8], Vec<u32>> {
    if !offset_tracker.insert(offset) {
        error!("[registry] Detected duplicate Registry list offset: {offset}. Stopping to avoid an infinite loop");
        return Err(nom::Err::Failure(nom::error::Error::new(
            hbin_data,
            ErrorKind::Fail,
        )));
    }

    let (_, list_data) = read_cell(hbin_data, offset)?;
    let (_, cell_type) = get_cell_type(list_data)?;

    let offsets = match cell_type {
        CellType::Lf | CellType::Lh => HashLeaf::parse_hash_leaf(list_data)?.1,
        CellType::Li => LeafItem::parse_leaf_item(list_data)?.1,
        CellType::Ri => {
            let (_, list_offsets) = RefItem::parse_ref_item(list_data)?;
            let mut offsets = Vec::new();
            for list_offset in list_offsets {
                let (_, mut sub_offsets) = walk_list(hbin_data, list_offset, offset_tracker)?;
                offsets.append(&mut sub_offsets);
            }
            offsets
        }
        _ => {
            error!("[registry] Expected a subkey list at offset {offset}, got {cell_type:?}");
            return Err(nom::Err::Failure(nom::error::Error::new(
                list_data,
                ErrorKind::Tag,
            )));
        }
    };

    Ok((hbin_data, offsets))
}

#[cfg(test)]
mod tests {
    use super::walk_list;
    use std::collections::HashSet;

    fn cell(data: &mut Vec<u8>, payload: &[u8]) -> u32 {
        let offset = data.len() as u32;
        let size = (payload.len() + 4).div_ceil(8) * 8;
        data.extend_from_slice(&(-(size as i32)).to_le_bytes());
        data.extend_from_slice(payload);
        data.resize(offset as usize + size, 0);
        offset
    }

    #[test]
    fn test_walk_list_ri() {
        let mut data = vec![0u8; 32];
        let li = cell(&mut data, &[108, 105, 2, 0, 80, 0, 0, 0, 96, 0, 0, 0]);
        let lh = cell(&mut data, &[108, 104, 1, 0, 112, 0, 0, 0, 1, 2, 3, 4]);

        let mut ri = vec![114, 105, 2, 0];
        ri.extend_from_slice(&li.to_le_bytes());
        ri.extend_from_slice(&lh.to_le_bytes());
        let ri_offset = cell(&mut data, &ri);

        let mut tracker = HashSet::new();
        let (_, result) = walk_list(&data, ri_offset, &mut tracker).unwrap();
        assert_eq!(result, vec![80, 96, 112]);
    }

    #[test]
    fn test_walk_list_loop() {
        let mut data = vec![0u8; 32];
        // ri list that references itself at offset 32
        let ri_offset = cell(&mut data, &[114, 105, 1, 0, 32, 0, 0, 0]);
        assert_eq!(ri_offset, 32);

        let mut tracker = HashSet::new();
        assert!(walk_list(&data, ri_offset, &mut tracker).is_err());
    }

    #[test]
    fn test_walk_list_not_list() {
        let mut data = vec![0u8; 32];
        let offset = cell(&mut data, &[110, 107, 0, 0]);
        let mut tracker = HashSet::new();
        assert!(walk_list(&data, offset, &mut tracker).is_err());
    }
}
