//! CBC mode.

use super::schedule;
use crate::error::{CryptError, CryptResult};
use crate::registry::ScheduledKey;
use crate::util::{xor_into, MAX_BLOCK_LEN};
use zeroize::Zeroize;

/// CBC mode state.
pub struct CbcState {
    key: Box<dyn ScheduledKey>,
    iv: [u8; MAX_BLOCK_LEN],
    blocklen: usize,
}

impl Drop for CbcState {
    fn drop(&mut self) {
        self.iv.zeroize();
    }
}

impl CbcState {
    /// Schedule `key` and set the initial chaining value.
    pub fn start(cipher: usize, iv: &[u8], key: &[u8], num_rounds: u32) -> CryptResult<Self> {
        let (key, blocklen) = schedule(cipher, key, num_rounds)?;
        if iv.len() != blocklen {
            return Err(CryptError::InvalidArg);
        }
        let mut st = Self {
            key,
            iv: [0u8; MAX_BLOCK_LEN],
            blocklen,
        };
        st.iv[..blocklen].copy_from_slice(iv);
        Ok(st)
    }

    /// Encrypt; length must be a multiple of the block length.
    pub fn encrypt(&mut self, pt: &[u8], ct: &mut [u8]) -> CryptResult<()> {
        if pt.len() % self.blocklen != 0 || ct.len() < pt.len() {
            return Err(CryptError::InvalidArg);
        }
        let bl = self.blocklen;
        for (p, c) in pt.chunks_exact(bl).zip(ct.chunks_exact_mut(bl)) {
            let mut tmp = [0u8; MAX_BLOCK_LEN];
            tmp[..bl].copy_from_slice(p);
            xor_into(&mut tmp[..bl], &self.iv[..bl]);
            self.key.encrypt_block(&tmp[..bl], c)?;
            self.iv[..bl].copy_from_slice(c);
            tmp.zeroize();
        }
        Ok(())
    }

    /// Decrypt; length must be a multiple of the block length.
    pub fn decrypt(&mut self, ct: &[u8], pt: &mut [u8]) -> CryptResult<()> {
        if ct.len() % self.blocklen != 0 || pt.len() < ct.len() {
            return Err(CryptError::InvalidArg);
        }
        let bl = self.blocklen;
        for (c, p) in ct.chunks_exact(bl).zip(pt.chunks_exact_mut(bl)) {
            self.key.decrypt_block(c, p)?;
            xor_into(&mut p[..bl], &self.iv[..bl]);
            self.iv[..bl].copy_from_slice(c);
        }
        Ok(())
    }

    /// Read back the current chaining value.
    pub fn getiv(&self) -> &[u8] {
        &self.iv[..self.blocklen]
    }

    /// Replace the chaining value.
    pub fn setiv(&mut self, iv: &[u8]) -> CryptResult<()> {
        if iv.len() != self.blocklen {
            return Err(CryptError::InvalidArg);
        }
        self.iv[..self.blocklen].copy_from_slice(iv);
        Ok(())
    }

    /// Release the state.
    pub fn done(self) {}
}
