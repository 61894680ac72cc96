use log::warn;

/// Get a UTF16 (little endian) string from provided bytes data. Stops at the first NULL character
pub(crate) fn extract_utf16_string(data: &[u8]) -> String {
    let utf16_data = to_wide_chars(data);
    let end = utf16_data
        .iter()
        .position(|wide_char| *wide_char == 0)
        .unwrap_or(utf16_data.len());

    match String::from_utf16(&utf16_data[..end]) {
        Ok(result) => result,
        Err(err) => {
            warn!("[strings] Failed to get UTF16 string: {err:?}");
            String::from_utf16_lossy(&utf16_data[..end])
        }
    }
}

/// Get UTF16 strings that are separated by NULL characters (`REG_MULTI_SZ`). Each string is placed on its own line
pub(crate) fn extract_multiline_utf16_string(data: &[u8]) -> String {
    let utf16_data = to_wide_chars(data);

    let mut lines: Vec<String> = Vec::new();
    for line in utf16_data.split(|wide_char| *wide_char == 0) {
        if line.is_empty() {
            continue;
        }
        lines.push(String::from_utf16_lossy(line));
    }
    lines.join("\n")
}

/// Get an ASCII (Windows-1252/Latin1 compatible) string from provided bytes data. Stops at the first NULL character
pub(crate) fn extract_ascii_string(data: &[u8]) -> String {
    data.iter()
        .take_while(|byte| **byte != 0)
        .map(|byte| *byte as char)
        .collect()
}

/// Convert bytes to little endian wide characters. A trailing odd byte is dropped
fn to_wide_chars(data: &[u8]) -> Vec<u16> {
    let min_byte_size = 2;
    data.chunks_exact(min_byte_size)
        .map(|wide_char| u16::from_le_bytes([wide_char[0], wide_char[1]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{extract_ascii_string, extract_multiline_utf16_string, extract_utf16_string};

    #[test]
    fn test_extract_utf16_string() {
        let test_data = [
            67, 0, 58, 0, 92, 0, 116, 0, 101, 0, 115, 0, 116, 0, 46, 0, 101, 0, 120, 0, 101, 0, 0,
            0, 65, 0,
        ];
        assert_eq!(extract_utf16_string(&test_data), "C:\\test.exe");
    }

    #[test]
    fn test_extract_utf16_string_odd() {
        let test_data = [104, 0, 105, 0, 33];
        assert_eq!(extract_utf16_string(&test_data), "hi");
    }

    #[test]
    fn test_extract_multiline_utf16_string() {
        let test_data = [97, 0, 98, 0, 0, 0, 99, 0, 0, 0, 0, 0];
        assert_eq!(extract_multiline_utf16_string(&test_data), "ab\nc");
    }

    #[test]
    fn test_extract_ascii_string() {
        let test_data = [82, 117, 110, 0, 0];
        assert_eq!(extract_ascii_string(&test_data), "Run");
    }
}
