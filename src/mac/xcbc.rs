//! XCBC-MAC (RFC 3566) over any registered 64- or 128-bit block cipher.

use crate::error::{CryptError, CryptResult};
use crate::registry::{self, ScheduledKey};
use crate::util::{xor_into, MAX_BLOCK_LEN};
use zeroize::Zeroize;

/// XCBC streaming state.
pub struct XcbcState {
    k1: Box<dyn ScheduledKey>,
    k2: [u8; MAX_BLOCK_LEN],
    k3: [u8; MAX_BLOCK_LEN],
    prev: [u8; MAX_BLOCK_LEN],
    buf: [u8; MAX_BLOCK_LEN],
    buflen: usize,
    blocklen: usize,
}

impl Drop for XcbcState {
    fn drop(&mut self) {
        self.k2.zeroize();
        self.k3.zeroize();
        self.prev.zeroize();
        self.buf.zeroize();
    }
}

impl XcbcState {
    /// Key an XCBC computation: K1/K2/K3 are derived by enciphering the
    /// constant blocks 0x01…, 0x02…, 0x03… under `key`.
    pub fn init(cipher: usize, key: &[u8]) -> CryptResult<Self> {
        let desc = registry::cipher_descriptor(cipher)?;
        if desc.block_length != 8 && desc.block_length != 16 {
            return Err(CryptError::InvalidArg);
        }
        let bl = desc.block_length;
        let master = desc.setup(key, 0)?;

        let mut k1_raw = [0u8; MAX_BLOCK_LEN];
        let mut k2 = [0u8; MAX_BLOCK_LEN];
        let mut k3 = [0u8; MAX_BLOCK_LEN];
        master.encrypt_block(&[0x01; MAX_BLOCK_LEN][..bl], &mut k1_raw[..bl])?;
        master.encrypt_block(&[0x02; MAX_BLOCK_LEN][..bl], &mut k2[..bl])?;
        master.encrypt_block(&[0x03; MAX_BLOCK_LEN][..bl], &mut k3[..bl])?;
        drop(master);

        // K1 must itself be a valid key for the cipher
        if !desc.key_sizes.accepts(bl) {
            return Err(CryptError::InvalidKeysize);
        }
        let k1 = desc.setup(&k1_raw[..bl], 0)?;
        k1_raw.zeroize();

        Ok(Self {
            k1,
            k2,
            k3,
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
        self.k1.encrypt_block(&x[..bl], &mut self.prev[..bl])?;
        self.buflen = 0;
        x.zeroize();
        Ok(())
    }

    /// Absorb message bytes.
    pub fn process(&mut self, mut data: &[u8]) -> CryptResult<()> {
        while !data.is_empty() {
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
            xor_into(&mut last[..bl], &self.k2[..bl]);
        } else {
            last[..self.buflen].copy_from_slice(&self.buf[..self.buflen]);
            last[self.buflen] = 0x80;
            xor_into(&mut last[..bl], &self.k3[..bl]);
        }
        xor_into(&mut last[..bl], &self.prev[..bl]);
        let mut tag = vec![0u8; bl];
        self.k1.encrypt_block(&last[..bl], &mut tag)?;
        last.zeroize();
        Ok(tag)
    }

    /// Finish, writing the leading bytes of the tag into `out`.
    pub fn done_into(self, out: &mut [u8]) -> CryptResult<usize> {
        let tag = self.done()?;
        Ok(super::clamp_tag(&tag, out))
    }
}

/// One-shot XCBC of `data`.
pub fn xcbc_memory(cipher: usize, key: &[u8], data: &[u8]) -> CryptResult<Vec<u8>> {
    let mut st = XcbcState::init(cipher, key)?;
    st.process(data)?;
    st.done()
}

#[cfg(test)]
mod tests {
    use super::super::testutil::aes_slot;
    use super::*;

    fn rfc3566_key() -> Vec<u8> {
        hex::decode("000102030405060708090a0b0c0d0e0f").unwrap()
    }

    #[test]
    fn test_xcbc_rfc3566_tc1_empty() {
        let tag = xcbc_memory(aes_slot(), &rfc3566_key(), b"").unwrap();
        assert_eq!(hex::encode(&tag), "75f0251d528ac01c4573dfd584d79f29");
    }

    #[test]
    fn test_xcbc_rfc3566_tc3_one_block() {
        let msg = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let tag = xcbc_memory(aes_slot(), &rfc3566_key(), &msg).unwrap();
        assert_eq!(hex::encode(&tag), "d2a246fa349b68a79998a4394ff7a263");
    }

    #[test]
    fn test_xcbc_streaming_matches_memory() {
        let key = rfc3566_key();
        let data: Vec<u8> = (0u8..90).collect();
        let oneshot = xcbc_memory(aes_slot(), &key, &data).unwrap();
        let mut st = XcbcState::init(aes_slot(), &key).unwrap();
        for chunk in data.chunks(11) {
            st.process(chunk).unwrap();
        }
        assert_eq!(st.done().unwrap(), oneshot);
    }
}
