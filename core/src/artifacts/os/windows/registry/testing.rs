//! Builds small Registry hives in memory for tests

pub(crate) const REG_SZ: u32 = 1;
pub(crate) const REG_BINARY: u32 = 3;
pub(crate) const REG_DWORD: u32 = 4;
pub(crate) const REG_MULTI_SZ: u32 = 7;

const FILETIME: u64 = 132192932460000000;
const SEGMENT_SIZE: usize = 16344;

/// Encode a string as UTF16 with a NULL terminator
pub(crate) fn utf16(value: &str) -> Vec<u8> {
    let mut data: Vec<u8> = value.encode_utf16().flat_map(|c| c.to_le_bytes()).collect();
    data.extend_from_slice(&[0, 0]);
    data
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum ListKind {
    Lh,
    Li,
    Ri,
}

pub(crate) struct TestValue {
    name: String,
    data_type: u32,
    data: Vec<u8>,
}

pub(crate) struct TestKey {
    name: String,
    last_modified: u64,
    values: Vec<TestValue>,
    subkeys: Vec<TestKey>,
}

impl TestKey {
    pub(crate) fn new(name: &str) -> TestKey {
        TestKey {
            name: name.to_string(),
            last_modified: FILETIME,
            values: Vec::new(),
            subkeys: Vec::new(),
        }
    }

    pub(crate) fn modified(mut self, filetime: u64) -> TestKey {
        self.last_modified = filetime;
        self
    }

    pub(crate) fn value(mut self, name: &str, data_type: u32, data: &[u8]) -> TestKey {
        self.values.push(TestValue {
            name: name.to_string(),
            data_type,
            data: data.to_vec(),
        });
        self
    }

    pub(crate) fn subkey(mut self, key: TestKey) -> TestKey {
        self.subkeys.push(key);
        self
    }

    /// Add a key below the provided path, creating or reusing the keys along the way
    pub(crate) fn insert(mut self, path: &str, key: TestKey) -> TestKey {
        let mut names = path.split('\\').filter(|name| !name.is_empty());
        let first = match names.next() {
            Some(result) => result,
            None => return self.subkey(key),
        };
        let rest: Vec<&str> = names.collect();

        let child = match self
            .subkeys
            .iter()
            .position(|subkey| subkey.name.eq_ignore_ascii_case(first))
        {
            Some(index) => self.subkeys.remove(index),
            None => TestKey::new(first),
        };
        self.subkeys.push(child.insert(&rest.join("\\"), key));
        self
    }
}

pub(crate) struct HiveBuilder {
    root: TestKey,
    list: ListKind,
}

impl HiveBuilder {
    pub(crate) fn new() -> HiveBuilder {
        HiveBuilder {
            root: TestKey::new("ROOT"),
            list: ListKind::Lh,
        }
    }

    pub(crate) fn root(mut self, root: TestKey) -> HiveBuilder {
        self.root = root;
        self
    }

    pub(crate) fn list(mut self, list: ListKind) -> HiveBuilder {
        self.list = list;
        self
    }

    /// Layout: 4096 byte base block, then hbins. Children are written before their parents
    pub(crate) fn build(&self) -> Vec<u8> {
        let hbin_header_size = 32;
        let mut writer = Writer {
            bin: vec![0; hbin_header_size],
            list: self.list,
        };
        let root_offset = writer.write_key(&self.root, true);

        let page = 4096;
        let used = writer.bin.len();
        let padded = used.div_ceil(page) * page;
        writer.bin.resize(padded, 0);
        // Remaining space is one free cell
        if padded > used + 4 {
            let free = (padded - used) as i32;
            writer.bin[used..used + 4].copy_from_slice(&free.to_le_bytes());
        }

        let mut bin = writer.bin;
        bin[0..4].copy_from_slice(b"hbin");
        bin[8..12].copy_from_slice(&(padded as u32).to_le_bytes());
        bin[20..28].copy_from_slice(&FILETIME.to_le_bytes());

        let mut header = vec![0u8; 4096];
        header[0..4].copy_from_slice(b"regf");
        header[4..8].copy_from_slice(&1u32.to_le_bytes());
        header[8..12].copy_from_slice(&1u32.to_le_bytes());
        header[12..20].copy_from_slice(&FILETIME.to_le_bytes());
        header[20..24].copy_from_slice(&1u32.to_le_bytes());
        header[24..28].copy_from_slice(&5u32.to_le_bytes());
        header[32..36].copy_from_slice(&1u32.to_le_bytes());
        header[36..40].copy_from_slice(&root_offset.to_le_bytes());
        header[40..44].copy_from_slice(&(padded as u32).to_le_bytes());
        header[44..48].copy_from_slice(&1u32.to_le_bytes());

        let mut checksum = 0u32;
        for dword in header[..508].chunks_exact(4) {
            checksum ^= u32::from_le_bytes([dword[0], dword[1], dword[2], dword[3]]);
        }
        header[508..512].copy_from_slice(&checksum.to_le_bytes());

        header.extend_from_slice(&bin);
        header
    }
}

struct Writer {
    bin: Vec<u8>,
    list: ListKind,
}

impl Writer {
    /// Allocate a cell and return its offset relative to the first hbin
    fn alloc(&mut self, payload: &[u8]) -> u32 {
        let offset = self.bin.len();
        let size = (payload.len() + 4).div_ceil(8) * 8;
        self.bin.extend_from_slice(&(-(size as i32)).to_le_bytes());
        self.bin.extend_from_slice(payload);
        self.bin.resize(offset + size, 0);
        offset as u32
    }

    fn write_key(&mut self, key: &TestKey, is_root: bool) -> u32 {
        let child_offsets: Vec<u32> = key
            .subkeys
            .iter()
            .map(|subkey| self.write_key(subkey, false))
            .collect();

        let no_list = 0xffffffffu32;
        let subkeys_offset = if child_offsets.is_empty() {
            no_list
        } else {
            self.write_list(&child_offsets)
        };

        let value_offsets: Vec<u32> = key.values.iter().map(|value| self.write_value(value)).collect();
        let values_offset = if value_offsets.is_empty() {
            no_list
        } else {
            let list: Vec<u8> = value_offsets.iter().flat_map(|offset| offset.to_le_bytes()).collect();
            self.alloc(&list)
        };

        let (name, mut flags) = if key.name.is_ascii() {
            (key.name.as_bytes().to_vec(), 0x20u16)
        } else {
            let mut name = utf16(&key.name);
            name.truncate(name.len() - 2);
            (name, 0u16)
        };
        if is_root {
            flags |= 0x4;
        }

        let mut nk = Vec::new();
        nk.extend_from_slice(b"nk");
        nk.extend_from_slice(&flags.to_le_bytes());
        nk.extend_from_slice(&key.last_modified.to_le_bytes());
        nk.extend_from_slice(&0u32.to_le_bytes()); // access bits
        nk.extend_from_slice(&0u32.to_le_bytes()); // parent
        nk.extend_from_slice(&(child_offsets.len() as u32).to_le_bytes());
        nk.extend_from_slice(&0u32.to_le_bytes());
        nk.extend_from_slice(&subkeys_offset.to_le_bytes());
        nk.extend_from_slice(&no_list.to_le_bytes());
        nk.extend_from_slice(&(value_offsets.len() as u32).to_le_bytes());
        nk.extend_from_slice(&values_offset.to_le_bytes());
        nk.extend_from_slice(&no_list.to_le_bytes()); // security
        nk.extend_from_slice(&no_list.to_le_bytes()); // class name
        nk.extend_from_slice(&[0; 20]);
        nk.extend_from_slice(&(name.len() as u16).to_le_bytes());
        nk.extend_from_slice(&0u16.to_le_bytes());
        nk.extend_from_slice(&name);
        self.alloc(&nk)
    }

    fn write_list(&mut self, offsets: &[u32]) -> u32 {
        match self.list {
            ListKind::Lh => {
                let mut lh = Vec::new();
                lh.extend_from_slice(b"lh");
                lh.extend_from_slice(&(offsets.len() as u16).to_le_bytes());
                for offset in offsets {
                    lh.extend_from_slice(&offset.to_le_bytes());
                    lh.extend_from_slice(&0u32.to_le_bytes());
                }
                self.alloc(&lh)
            }
            ListKind::Li => self.write_li(offsets),
            ListKind::Ri => {
                let li_offsets: Vec<u32> = offsets
                    .iter()
                    .map(|offset| self.write_li(&[*offset]))
                    .collect();
                let mut ri = Vec::new();
                ri.extend_from_slice(b"ri");
                ri.extend_from_slice(&(li_offsets.len() as u16).to_le_bytes());
                for offset in li_offsets {
                    ri.extend_from_slice(&offset.to_le_bytes());
                }
                self.alloc(&ri)
            }
        }
    }

    fn write_li(&mut self, offsets: &[u32]) -> u32 {
        let mut li = Vec::new();
        li.extend_from_slice(b"li");
        li.extend_from_slice(&(offsets.len() as u16).to_le_bytes());
        for offset in offsets {
            li.extend_from_slice(&offset.to_le_bytes());
        }
        self.alloc(&li)
    }

    fn write_value(&mut self, value: &TestValue) -> u32 {
        let resident_size = 4;
        let (data_size, data_offset) = if value.data.len() <= resident_size {
            let mut resident = [0u8; 4];
            resident[..value.data.len()].copy_from_slice(&value.data);
            (
                value.data.len() as u32 | 0x80000000,
                u32::from_le_bytes(resident),
            )
        } else if value.data.len() > SEGMENT_SIZE {
            let segments: Vec<u32> = value
                .data
                .chunks(SEGMENT_SIZE)
                .map(|segment| self.alloc(segment))
                .collect();
            let list: Vec<u8> = segments.iter().flat_map(|offset| offset.to_le_bytes()).collect();
            let list_offset = self.alloc(&list);

            let mut db = Vec::new();
            db.extend_from_slice(b"db");
            db.extend_from_slice(&(segments.len() as u16).to_le_bytes());
            db.extend_from_slice(&list_offset.to_le_bytes());
            (value.data.len() as u32, self.alloc(&db))
        } else {
            (value.data.len() as u32, self.alloc(&value.data))
        };

        let mut vk = Vec::new();
        vk.extend_from_slice(b"vk");
        vk.extend_from_slice(&(value.name.len() as u16).to_le_bytes());
        vk.extend_from_slice(&data_size.to_le_bytes());
        vk.extend_from_slice(&data_offset.to_le_bytes());
        vk.extend_from_slice(&value.data_type.to_le_bytes());
        vk.extend_from_slice(&1u16.to_le_bytes()); // ASCII name
        vk.extend_from_slice(&0u16.to_le_bytes());
        vk.extend_from_slice(value.name.as_bytes());
        self.alloc(&vk)
    }
}
