//! Base16/32/64 codecs over the encoding crates, with the crate's error
//! taxonomy.

use crate::error::{CryptError, CryptResult};
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;

/// Hex-encode; `uppercase` selects the alphabet.
pub fn base16_encode(data: &[u8], uppercase: bool) -> String {
    if uppercase {
        hex::encode_upper(data)
    } else {
        hex::encode(data)
    }
}

/// Hex-decode (either case).
pub fn base16_decode(text: &str) -> CryptResult<Vec<u8>> {
    hex::decode(text).map_err(|_| CryptError::InvalidPacket)
}

/// RFC 4648 base32 encode (no padding).
pub fn base32_encode(data: &[u8]) -> String {
    base32::encode(base32::Alphabet::RFC4648 { padding: false }, data)
}

/// RFC 4648 base32 decode.
pub fn base32_decode(text: &str) -> CryptResult<Vec<u8>> {
    base32::decode(base32::Alphabet::RFC4648 { padding: false }, text)
        .ok_or(CryptError::InvalidPacket)
}

/// Standard base64 encode.
pub fn base64_encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Standard base64 decode.
pub fn base64_decode(text: &str) -> CryptResult<Vec<u8>> {
    STANDARD
        .decode(text.as_bytes())
        .map_err(|_| CryptError::InvalidPacket)
}

/// URL-safe base64 encode (no padding).
pub fn base64url_encode(data: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// URL-safe base64 decode.
pub fn base64url_decode(text: &str) -> CryptResult<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(text.as_bytes())
        .map_err(|_| CryptError::InvalidPacket)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base16_vectors() {
        let data = [0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF];
        assert_eq!(base16_encode(&data, false), "0123456789abcdef");
        assert_eq!(base16_encode(&data, true), "0123456789ABCDEF");
        assert_eq!(base16_decode("0123456789abcdef").unwrap(), data);
        assert_eq!(base16_decode("0123456789ABCDEF").unwrap(), data);
        assert!(base16_decode("test").is_err());
    }

    #[test]
    fn test_base32_roundtrip() {
        for len in 0..40usize {
            let data: Vec<u8> = (0..len as u8).collect();
            let enc = base32_encode(&data);
            assert_eq!(base32_decode(&enc).unwrap(), data, "len {len}");
        }
    }

    #[test]
    fn test_base64_rfc4648_vectors() {
        assert_eq!(base64_encode(b"foobar"), "Zm9vYmFy");
        assert_eq!(base64_encode(b"foob"), "Zm9vYg==");
        assert_eq!(base64_decode("Zm9vYmFy").unwrap(), b"foobar");
        assert!(base64_decode("####").is_err());
    }

    #[test]
    fn test_base64url_no_padding() {
        let data = [0xFB, 0xEF, 0xFF];
        let enc = base64url_encode(&data);
        assert!(!enc.contains('='));
        assert!(!enc.contains('+'));
        assert_eq!(base64url_decode(&enc).unwrap(), data);
    }
}
