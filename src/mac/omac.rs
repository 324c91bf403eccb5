//! OMAC1 (CMAC) over any registered 64- or 128-bit block cipher.

use crate::error::{CryptError, CryptResult};
use crate::registry::{self, ScheduledKey};
use crate::util::{gf_double, xor_into, MAX_BLOCK_LEN};
use zeroize::Zeroize;

/// OMAC/CMAC streaming state.
pub struct OmacState {
    key: Box<dyn ScheduledKey>,
    k1: [u8; MAX_BLOCK_LEN],
    k2: [u8; MAX_BLOCK_LEN],
    /// Running CBC value.
    prev: [u8; MAX_BLOCK_LEN],
    buf: [u8; MAX_BLOCK_LEN],
    buflen: usize,
    blocklen: usize,
}

impl Drop for OmacState {
    fn drop(&mut self) {
        self.k1.zeroize();
        self.k2.zeroize();
        self.prev.zeroize();
        self.buf.zeroize();
    }
}

impl OmacState {
    /// Key an OMAC computation over the cipher at `cipher`.
    pub fn init(cipher: usize, key: &[u8]) -> CryptResult<Self> {
        let desc = registry::cipher_descriptor(cipher)?;
        if desc.block_length != 8 && desc.block_length != 16 {
            return Err(CryptError::InvalidArg);
        }
        let sk = desc.setup(key, 0)?;
        let bl = desc.block_length;

        // subkeys from L = E(0)
        let zero = [0u8; MAX_BLOCK_LEN];
        let mut l = [0u8; MAX_BLOCK_LEN];
        sk.encrypt_block(&zero[..bl], &mut l[..bl])?;
        let mut k1 = [0u8; MAX_BLOCK_LEN];
        let mut k2 = [0u8; MAX_BLOCK_LEN];
        k1[..bl].copy_from_slice(&gf_double(&l[..bl]));
        k2[..bl].copy_from_slice(&gf_double(&k1[..bl]));
        l.zeroize();

        Ok(Self {
            key: sk,
            k1,
            k2,
            prev: [0u8; MAX_BLOCK_LEN],
            buf: [0u8; MAX_BLOCK_LEN],
            buflen: 0,
            blocklen: bl,
        })
    }

    fn flush(&mut self) -> CryptResult<()> {
        let bl = self.blocklen;
        let mut x = [0u8; MAX_BLOCK_LEN];
        x[..bl].copy_from_slice(&self.prev[..bl]);
        xor_into(&mut x[..bl], &self.buf[..bl]);
        self.key.encrypt_block(&x[..bl], &mut self.prev[..bl])?;
        self.buflen = 0;
        x.zeroize();
        Ok(())
    }

    /// Absorb message bytes.
    pub fn process(&mut self, mut data: &[u8]) -> CryptResult<()> {
        while !data.is_empty() {
            // the final block is held back for subkey treatment
            if self.buflen == self.blocklen {
                self.flush()?;
            }
            let take = (self.blocklen - self.buflen).min(data.len());
            self.buf[self.buflen..self.buflen + take].copy_from_slice(&data[..take]);
            self.buflen += take;
            data = &data[take..];
        }
        Ok(())
    }

    /// Finish; returns the full-length tag.
    pub fn done(mut self) -> CryptResult<Vec<u8>> {
        let bl = self.blocklen;
        let mut last = [0u8; MAX_BLOCK_LEN];
        if self.buflen == bl {
            last[..bl].copy_from_slice(&self.buf[..bl]);
            xor_into(&mut last[..bl], &self.k1[..bl]);
        } else {
            last[..self.buflen].copy_from_slice(&self.buf[..self.buflen]);
            last[self.buflen] = 0x80;
            xor_into(&mut last[..bl], &self.k2[..bl]);
        }
        xor_into(&mut last[..bl], &self.prev[..bl]);
        let mut tag = vec![0u8; bl];
        self.key.encrypt_block(&last[..bl], &mut tag)?;
        last.zeroize();
        Ok(tag)
    }

    /// Finish, writing the leading bytes of the tag into `out`.
    pub fn done_into(self, out: &mut [u8]) -> CryptResult<usize> {
        let tag = self.done()?;
        Ok(super::clamp_tag(&tag, out))
    }
}

/// One-shot OMAC of `data`.
pub fn omac_memory(cipher: usize, key: &[u8], data: &[u8]) -> CryptResult<Vec<u8>> {
    let mut st = OmacState::init(cipher, key)?;
    st.process(data)?;
    st.done()
}

#[cfg(test)]
mod tests {
    use super::super::testutil::aes_slot;
    use super::*;

    fn rfc4493_key() -> Vec<u8> {
        hex::decode("2b7e151628aed2a6abf7158809cf4f3c").unwrap()
    }

    #[test]
    fn test_cmac_rfc4493_empty() {
        let tag = omac_memory(aes_slot(), &rfc4493_key(), b"").unwrap();
        assert_eq!(hex::encode(&tag), "bb1d6929e95937287fa37d129b756746");
    }

    #[test]
    fn test_cmac_rfc4493_one_block() {
        let msg = hex::decode("6bc1bee22e409f96e93d7e117393172a").unwrap();
        let tag = omac_memory(aes_slot(), &rfc4493_key(), &msg).unwrap();
        assert_eq!(hex::encode(&tag), "070a16b46b4d4144f79bdd9dd04a287c");
    }

    #[test]
    fn test_cmac_rfc4493_40_bytes() {
        let msg = hex::decode(
            "6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e5130c81c46a35ce411",
        )
        .unwrap();
        let tag = omac_memory(aes_slot(), &rfc4493_key(), &msg).unwrap();
        assert_eq!(hex::encode(&tag), "dfa66747de9ae63030ca32611497c827");
    }

    #[test]
    fn test_cmac_streaming_matches_memory() {
        let key = rfc4493_key();
        let data: Vec<u8> = (0u8..100).collect();
        let oneshot = omac_memory(aes_slot(), &key, &data).unwrap();
        let mut st = OmacState::init(aes_slot(), &key).unwrap();
        for chunk in data.chunks(13) {
            st.process(chunk).unwrap();
        }
        assert_eq!(st.done().unwrap(), oneshot);
    }
}
