//! Block padding schemes for the block-oriented modes.

use crate::error::{CryptError, CryptResult};

/// Supported padding schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingMode {
    /// PKCS#7: n bytes of value n.
    Pkcs7,
    /// ANSI X9.23: zeros then a length byte.
    X923,
    /// ISO/IEC 7816-4: 0x80 then zeros.
    Iso7816,
    /// Zero padding (not removable when the data may end in zeros).
    Zero,
}

/// Pad `data` up to a multiple of `block_len` (1..=255). A full extra
/// block is added when the input is already aligned (except zero padding).
pub fn pad(data: &[u8], block_len: usize, mode: PaddingMode) -> CryptResult<Vec<u8>> {
    if block_len == 0 || block_len > 255 {
        return Err(CryptError::InvalidArg);
    }
    let rem = data.len() % block_len;
    let padlen = if rem == 0 && mode == PaddingMode::Zero {
        0
    } else {
        block_len - rem
    };
    let mut out = data.to_vec();
    match mode {
        PaddingMode::Pkcs7 => out.extend(std::iter::repeat(padlen as u8).take(padlen)),
        PaddingMode::X923 => {
            out.extend(std::iter::repeat(0u8).take(padlen - 1));
            out.push(padlen as u8);
        }
        PaddingMode::Iso7816 => {
            out.push(0x80);
            out.extend(std::iter::repeat(0u8).take(padlen - 1));
        }
        PaddingMode::Zero => out.extend(std::iter::repeat(0u8).take(padlen)),
    }
    Ok(out)
}

/// Remove padding; the input length must be a non-zero multiple of
/// `block_len`.
pub fn unpad(data: &[u8], block_len: usize, mode: PaddingMode) -> CryptResult<Vec<u8>> {
    if block_len == 0 || block_len > 255 || data.is_empty() || data.len() % block_len != 0 {
        return Err(CryptError::InvalidArg);
    }
    let cut = match mode {
        PaddingMode::Pkcs7 => {
            let padlen = *data.last().expect("non-empty") as usize;
            if padlen == 0 || padlen > block_len || padlen > data.len() {
                return Err(CryptError::InvalidPacket);
            }
            if data[data.len() - padlen..].iter().any(|&b| b as usize != padlen) {
                return Err(CryptError::InvalidPacket);
            }
            data.len() - padlen
        }
        PaddingMode::X923 => {
            let padlen = *data.last().expect("non-empty") as usize;
            if padlen == 0 || padlen > block_len || padlen > data.len() {
                return Err(CryptError::InvalidPacket);
            }
            if data[data.len() - padlen..data.len() - 1].iter().any(|&b| b != 0) {
                return Err(CryptError::InvalidPacket);
            }
            data.len() - padlen
        }
        PaddingMode::Iso7816 => {
            let marker = data
                .iter()
                .rposition(|&b| b != 0)
                .ok_or(CryptError::InvalidPacket)?;
            if data[marker] != 0x80 || data.len() - marker > block_len {
                return Err(CryptError::InvalidPacket);
            }
            marker
        }
        PaddingMode::Zero => {
            let end = data.iter().rposition(|&b| b != 0).map_or(0, |p| p + 1);
            end
        }
    };
    Ok(data[..cut].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pkcs7_roundtrip() {
        for len in 0..33usize {
            let data: Vec<u8> = (0..len as u8).map(|b| b | 1).collect();
            let padded = pad(&data, 16, PaddingMode::Pkcs7).unwrap();
            assert_eq!(padded.len() % 16, 0);
            assert_eq!(unpad(&padded, 16, PaddingMode::Pkcs7).unwrap(), data);
        }
    }

    #[test]
    fn test_pkcs7_aligned_adds_full_block() {
        let padded = pad(&[1u8; 16], 16, PaddingMode::Pkcs7).unwrap();
        assert_eq!(padded.len(), 32);
        assert_eq!(padded[31], 16);
    }

    #[test]
    fn test_x923_and_iso7816_roundtrip() {
        let data = b"irregular length".to_vec();
        for mode in [PaddingMode::X923, PaddingMode::Iso7816] {
            let padded = pad(&data, 8, mode).unwrap();
            assert_eq!(unpad(&padded, 8, mode).unwrap(), data);
        }
    }

    #[test]
    fn test_bad_pkcs7_rejected() {
        let mut padded = pad(b"abc", 8, PaddingMode::Pkcs7).unwrap();
        let last = padded.len() - 1;
        padded[last] = 9;
        assert!(unpad(&padded, 8, PaddingMode::Pkcs7).is_err());
    }

    #[test]
    fn test_zero_padding_trims_trailing_zeros() {
        let padded = pad(b"abc", 8, PaddingMode::Zero).unwrap();
        assert_eq!(unpad(&padded, 8, PaddingMode::Zero).unwrap(), b"abc");
    }
}
