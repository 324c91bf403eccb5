//! F9 MAC (3GPP): a CBC-MAC chain whose intermediate values are all folded
//! into the accumulator, finalized under the 0xAA-masked key.

use crate::error::{CryptError, CryptResult};
use crate::registry::{self, ScheduledKey};
use crate::util::{xor_into, MAX_BLOCK_LEN};
use zeroize::Zeroize;

/// F9 streaming state.
pub struct F9State {
    key: Box<dyn ScheduledKey>,
    /// Finalization key: schedule of `key ⊕ 0xAA…`.
    fin_key: Box<dyn ScheduledKey>,
    a: [u8; MAX_BLOCK_LEN],
    acc: [u8; MAX_BLOCK_LEN],
    buf: [u8; MAX_BLOCK_LEN],
    buflen: usize,
    blocklen: usize,
}

impl Drop for F9State {
    fn drop(&mut self) {
        self.a.zeroize();
        self.acc.zeroize();
        self.buf.zeroize();
    }
}

impl F9State {
    /// Key an F9 computation over the cipher at `cipher`.
    pub fn init(cipher: usize, key: &[u8]) -> CryptResult<Self> {
        let desc = registry::cipher_descriptor(cipher)?;
        if desc.block_length != 8 && desc.block_length != 16 {
            return Err(CryptError::InvalidArg);
        }
        let sk = desc.setup(key, 0)?;
        let masked: Vec<u8> = key.iter().map(|b| b ^ 0xAA).collect();
        let fin_key = desc.setup(&masked, 0)?;
        Ok(Self {
            key: sk,
            fin_key,
            a: [0u8; MAX_BLOCK_LEN],
            acc: [0u8; MAX_BLOCK_LEN],
            buf: [0u8; MAX_BLOCK_LEN],
            buflen: 0,
            blocklen: desc.block_length,
        })
    }

    fn absorb(&mut self) -> CryptResult<()> {
        let bl = self.blocklen;
        let mut x = [0u8; MAX_BLOCK_LEN];
        x[..bl].copy_from_slice(&self.a[..bl]);
        xor_into(&mut x[..bl], &self.buf[..bl]);
        self.key.encrypt_block(&x[..bl], &mut self.a[..bl])?;
        let a = self.a;
        xor_into(&mut self.acc[..bl], &a[..bl]);
        self.buflen = 0;
        x.zeroize();
        Ok(())
    }

    /// Absorb message bytes.
    pub fn process(&mut self, mut data: &[u8]) -> CryptResult<()> {
        while !data.is_empty() {
            let take = (self.blocklen - self.buflen).min(data.len());
            self.buf[self.buflen..self.buflen + take].copy_from_slice(&data[..take]);
            self.buflen += take;
            data = &data[take..];
            if self.buflen == self.blocklen {
                self.absorb()?;
            }
        }
        Ok(())
    }

    /// Finish; returns the full-length tag.
    pub fn done(mut self) -> CryptResult<Vec<u8>> {
        let bl = self.blocklen;
        if self.buflen > 0 {
            for b in &mut self.buf[self.buflen..bl] {
                *b = 0;
            }
            self.absorb()?;
        }
        let acc = self.acc;
        let mut tag = vec![0u8; bl];
        self.fin_key.encrypt_block(&acc[..bl], &mut tag)?;
        Ok(tag)
    }

    /// Finish, writing the leading bytes of the tag into `out`.
    pub fn done_into(self, out: &mut [u8]) -> CryptResult<usize> {
        let tag = self.done()?;
        Ok(super::clamp_tag(&tag, out))
    }
}

/// One-shot F9 of `data`.
pub fn f9_memory(cipher: usize, key: &[u8], data: &[u8]) -> CryptResult<Vec<u8>> {
    let mut st = F9State::init(cipher, key)?;
    st.process(data)?;
    st.done()
}

#[cfg(test)]
mod tests {
    use super::super::testutil::aes_slot;
    use super::*;

    #[test]
    fn test_f9_streaming_matches_memory() {
        let key = [0x99u8; 16];
        let data: Vec<u8> = (0u8..70).collect();
        let oneshot = f9_memory(aes_slot(), &key, &data).unwrap();
        let mut st = F9State::init(aes_slot(), &key).unwrap();
        for chunk in data.chunks(9) {
            st.process(chunk).unwrap();
        }
        assert_eq!(st.done().unwrap(), oneshot);
    }

    #[test]
    fn test_f9_accumulates_all_blocks() {
        // prefix-extension must change the tag
        let key = [0x21u8; 16];
        let a = f9_memory(aes_slot(), &key, &[0u8; 16]).unwrap();
        let b = f9_memory(aes_slot(), &key, &[0u8; 32]).unwrap();
        assert_ne!(a, b);
    }
}
