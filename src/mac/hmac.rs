//! HMAC over any registered hash.

use crate::error::{CryptError, CryptResult};
use crate::registry::{self, HashDescriptor, HashState};
use zeroize::Zeroizing;

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5C;

/// HMAC streaming state.
pub struct HmacState {
    hash: &'static HashDescriptor,
    inner: Box<dyn HashState>,
    /// Key padded to the hash block size (kept for the outer pass).
    key: Zeroizing<Vec<u8>>,
}

impl HmacState {
    /// Key an HMAC computation over the hash at `hash_slot`. Keys longer
    /// than the hash block size are hashed first.
    pub fn init(hash_slot: usize, key: &[u8]) -> CryptResult<Self> {
        let hash = registry::hash_descriptor(hash_slot)?;
        let mut padded = Zeroizing::new(vec![0u8; hash.block_size]);
        if key.len() > hash.block_size {
            let digest = hash.hash_memory(key)?;
            padded[..digest.len()].copy_from_slice(&digest);
        } else {
            padded[..key.len()].copy_from_slice(key);
        }
        let mut inner = hash.ops.init()?;
        let ipad: Vec<u8> = padded.iter().map(|b| b ^ IPAD).collect();
        inner.process(&ipad)?;
        Ok(Self {
            hash,
            inner,
            key: padded,
        })
    }

    /// Absorb message bytes.
    pub fn process(&mut self, data: &[u8]) -> CryptResult<()> {
        self.inner.process(data)
    }

    /// Finish; returns the full-length tag.
    pub fn done(self) -> CryptResult<Vec<u8>> {
        let inner_digest = self.inner.done()?;
        let mut outer = self.hash.ops.init()?;
        let opad: Vec<u8> = self.key.iter().map(|b| b ^ OPAD).collect();
        outer.process(&opad)?;
        outer.process(&inner_digest)?;
        outer.done()
    }

    /// Finish, writing the leading bytes of the tag into `out`.
    pub fn done_into(self, out: &mut [u8]) -> CryptResult<usize> {
        let tag = self.done()?;
        Ok(super::clamp_tag(&tag, out))
    }
}

/// One-shot HMAC of `data`.
pub fn hmac_memory(hash_slot: usize, key: &[u8], data: &[u8]) -> CryptResult<Vec<u8>> {
    let mut st = HmacState::init(hash_slot, key)?;
    st.process(data)?;
    st.done()
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{sha1_slot, sha256_slot};
    use super::*;

    #[test]
    fn test_hmac_sha1_rfc2202_tc1() {
        let key = [0x0Bu8; 20];
        let tag = hmac_memory(sha1_slot(), &key, b"Hi There").unwrap();
        assert_eq!(
            hex::encode(&tag),
            "b617318655057264e28bc0b6fb378c8ef146be00"
        );
    }

    #[test]
    fn test_hmac_sha256_rfc4231_tc2() {
        let tag = hmac_memory(
            sha256_slot(),
            b"Jefe",
            b"what do ya want for nothing?",
        )
        .unwrap();
        assert_eq!(
            hex::encode(&tag),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_hmac_long_key_is_hashed() {
        // RFC 2202 TC6: 80-byte key
        let key = [0xAAu8; 80];
        let tag = hmac_memory(
            sha1_slot(),
            &key,
            b"Test Using Larger Than Block-Size Key - Hash Key First",
        )
        .unwrap();
        assert_eq!(
            hex::encode(&tag),
            "aa4ae5e15272d00e95705637ce8a3b55ed402112"
        );
    }

    #[test]
    fn test_hmac_streaming_matches_memory() {
        let key = b"streaming key";
        let data = b"the quick brown fox jumps over the lazy dog";
        let oneshot = hmac_memory(sha256_slot(), key, data).unwrap();
        let mut st = HmacState::init(sha256_slot(), key).unwrap();
        for chunk in data.chunks(5) {
            st.process(chunk).unwrap();
        }
        assert_eq!(st.done().unwrap(), oneshot);
    }

    #[test]
    fn test_hmac_done_into_clamps() {
        let mut out = [0u8; 12];
        let st = HmacState::init(sha256_slot(), b"k").unwrap();
        let n = st.done_into(&mut out).unwrap();
        assert_eq!(n, 12);
    }
}
