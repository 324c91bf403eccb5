//! PKCS#5: PBKDF1 (v1, legacy) and PBKDF2 (v2) over registered hashes.

use crate::error::{CryptError, CryptResult};
use crate::mac::hmac::HmacState;
use crate::registry;
use zeroize::Zeroize;

/// PBKDF1: iterated hash of `password ∥ salt(8)`. Output is capped at one
/// digest. Legacy interchange only.
pub fn pkcs5_v1(
    hash: usize,
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    length: usize,
) -> CryptResult<Vec<u8>> {
    let desc = registry::hash_descriptor(hash)?;
    if salt.len() != 8 || iterations == 0 || length > desc.digest_size {
        return Err(CryptError::InvalidArg);
    }
    let mut st = desc.ops.init()?;
    st.process(password)?;
    st.process(salt)?;
    let mut t = st.done()?;
    for _ in 1..iterations {
        let next = desc.hash_memory(&t)?;
        t.zeroize();
        t = next;
    }
    t.truncate(length);
    Ok(t)
}

/// PBKDF2 (RFC 8018) with HMAC over the registered hash.
pub fn pkcs5_v2(
    hash: usize,
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    length: usize,
) -> CryptResult<Vec<u8>> {
    let desc = registry::hash_descriptor(hash)?;
    if iterations == 0 || length == 0 {
        return Err(CryptError::InvalidArg);
    }
    let hlen = desc.digest_size;
    let mut out = Vec::with_capacity(length + hlen);
    let mut block: u32 = 1;
    while out.len() < length {
        let mut mac = HmacState::init(hash, password)?;
        mac.process(salt)?;
        mac.process(&block.to_be_bytes())?;
        let mut u = mac.done()?;
        let mut t = u.clone();
        for _ in 1..iterations {
            let mut mac = HmacState::init(hash, password)?;
            mac.process(&u)?;
            let next = mac.done()?;
            u.zeroize();
            u = next;
            for (a, b) in t.iter_mut().zip(u.iter()) {
                *a ^= b;
            }
        }
        out.extend_from_slice(&t);
        u.zeroize();
        t.zeroize();
        block = block.checked_add(1).ok_or(CryptError::Overflow)?;
    }
    out.truncate(length);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{find_hash, register_all_hashes};

    fn sha1() -> usize {
        register_all_hashes().unwrap();
        find_hash("sha1").unwrap()
    }

    fn sha256() -> usize {
        register_all_hashes().unwrap();
        find_hash("sha256").unwrap()
    }

    #[test]
    fn test_pbkdf2_rfc6070_case_1() {
        let dk = pkcs5_v2(sha1(), b"password", b"salt", 1, 20).unwrap();
        assert_eq!(hex::encode(&dk), "0c60c80f961f0e71f3a9b524af6012062fe037a6");
    }

    #[test]
    fn test_pbkdf2_rfc6070_case_2() {
        let dk = pkcs5_v2(sha1(), b"password", b"salt", 2, 20).unwrap();
        assert_eq!(hex::encode(&dk), "ea6c014dc72d6f8ccd1ed92ace1d41f0d8de8957");
    }

    #[test]
    fn test_pbkdf2_rfc6070_case_4096(){
        let dk = pkcs5_v2(sha1(), b"password", b"salt", 4096, 20).unwrap();
        assert_eq!(hex::encode(&dk), "4b007901b765489abead49d926f721d065a429c1");
    }

    #[test]
    fn test_pbkdf2_sha256_known() {
        // RFC 7914 §11 test vector
        let dk = pkcs5_v2(sha256(), b"passwd", b"salt", 1, 64).unwrap();
        assert_eq!(
            hex::encode(&dk),
            "55ac046e56e3089fec1691c22544b605f94185216dde0465e68b9d57c20dacbc\
             49ca9cccf179b645991664b39d77ef317c71b845b1e30bd509112041d3a19783"
        );
    }

    #[test]
    fn test_pbkdf1_deterministic() {
        let a = pkcs5_v1(sha1(), b"pw", b"saltsalt", 1000, 16).unwrap();
        let b = pkcs5_v1(sha1(), b"pw", b"saltsalt", 1000, 16).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
        assert!(pkcs5_v1(sha1(), b"pw", b"short", 1000, 16).is_err());
        assert!(pkcs5_v1(sha1(), b"pw", b"saltsalt", 1000, 21).is_err());
    }
}
