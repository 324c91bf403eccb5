//! HKDF (RFC 5869) over any registered hash.

use crate::error::{CryptError, CryptResult};
use crate::mac::hmac::HmacState;
use crate::registry;

/// HKDF-Extract: `PRK = HMAC(salt, ikm)`. An empty salt behaves as a
/// digest-size block of zeros.
pub fn hkdf_extract(hash: usize, salt: &[u8], ikm: &[u8]) -> CryptResult<Vec<u8>> {
    let desc = registry::hash_descriptor(hash)?;
    let zeros = vec![0u8; desc.digest_size];
    let salt = if salt.is_empty() { &zeros } else { salt };
    let mut mac = HmacState::init(hash, salt)?;
    mac.process(ikm)?;
    mac.done()
}

/// HKDF-Expand: iterate `T(i) = HMAC(PRK, T(i-1) ∥ info ∥ i)`.
pub fn hkdf_expand(hash: usize, prk: &[u8], info: &[u8], length: usize) -> CryptResult<Vec<u8>> {
    let desc = registry::hash_descriptor(hash)?;
    if length > 255 * desc.digest_size {
        return Err(CryptError::InvalidArg);
    }
    let mut okm = Vec::with_capacity(length + desc.digest_size);
    let mut t: Vec<u8> = Vec::new();
    let mut counter = 1u8;
    while okm.len() < length {
        let mut mac = HmacState::init(hash, prk)?;
        mac.process(&t)?;
        mac.process(info)?;
        mac.process(&[counter])?;
        t = mac.done()?;
        okm.extend_from_slice(&t);
        counter = counter.checked_add(1).ok_or(CryptError::Overflow)?;
    }
    okm.truncate(length);
    Ok(okm)
}

/// Extract-then-expand convenience.
pub fn hkdf(
    hash: usize,
    salt: &[u8],
    info: &[u8],
    ikm: &[u8],
    length: usize,
) -> CryptResult<Vec<u8>> {
    let prk = hkdf_extract(hash, salt, ikm)?;
    hkdf_expand(hash, &prk, info, length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{find_hash, register_all_hashes};

    fn sha256() -> usize {
        register_all_hashes().unwrap();
        find_hash("sha256").unwrap()
    }

    #[test]
    fn test_rfc5869_case_1() {
        let ikm = [0x0Bu8; 22];
        let salt = hex::decode("000102030405060708090a0b0c").unwrap();
        let info = hex::decode("f0f1f2f3f4f5f6f7f8f9").unwrap();
        let okm = hkdf(sha256(), &salt, &info, &ikm, 42).unwrap();
        assert_eq!(
            hex::encode(&okm),
            "3cb25f25faacd57a90434f64d0362f2a2d2d0a90cf1a5a4c5db02d56ecc4c5bf\
             34007208d5b887185865"
        );
    }

    #[test]
    fn test_rfc5869_case_3_empty_salt_info() {
        let ikm = [0x0Bu8; 22];
        let okm = hkdf(sha256(), b"", b"", &ikm, 42).unwrap();
        assert_eq!(
            hex::encode(&okm),
            "8da4e775a563c18f715f802a063c5a31b8a11f5c5ee1879ec3454e5f3c738d2d\
             9d201395faa4b61a96c8"
        );
    }

    #[test]
    fn test_expand_limit() {
        let prk = [0u8; 32];
        assert!(hkdf_expand(sha256(), &prk, b"", 255 * 32 + 1).is_err());
    }
}
