use base64::{engine::general_purpose, Engine};

/// Base64 encode data using the STANDARD engine (alphabet along with "+" and "/")
pub(crate) fn base64_encode_standard(data: &[u8]) -> String {
    general_purpose::STANDARD.encode(data)
}

#[cfg(test)]
mod tests {
    use super::base64_encode_standard;

    #[test]
    fn test_base64_encode_standard() {
        let test = b"Forensics are fun";
        assert_eq!(base64_encode_standard(test), "Rm9yZW5zaWNzIGFyZSBmdW4=");
    }

    #[test]
    fn test_base64_encode_empty() {
        assert_eq!(base64_encode_standard(&[]), "");
    }
}
