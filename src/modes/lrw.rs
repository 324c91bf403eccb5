//! LRW mode: tweakable encryption with a GF(2^128) product tweak.

use super::schedule;
use crate::error::{CryptError, CryptResult};
use crate::registry::ScheduledKey;
use crate::util::{ctr_increment_be, gf_mult, xor_into};
use zeroize::Zeroize;

const BLOCK: usize = 16;

/// LRW mode state. Requires a 128-bit block cipher.
pub struct LrwState {
    key: Box<dyn ScheduledKey>,
    tweak_key: [u8; BLOCK],
    /// Block index, treated as a big-endian 128-bit integer.
    iv: [u8; BLOCK],
    /// Current tweak product `tweak_key ⊗ iv`.
    t: [u8; BLOCK],
}

impl Drop for LrwState {
    fn drop(&mut self) {
        self.tweak_key.zeroize();
        self.iv.zeroize();
        self.t.zeroize();
    }
}

impl LrwState {
    /// Schedule `key`; `iv` is the initial 16-byte block index and `tweak`
    /// the 16-byte tweak key.
    pub fn start(
        cipher: usize,
        iv: &[u8],
        key: &[u8],
        tweak: &[u8],
        num_rounds: u32,
    ) -> CryptResult<Self> {
        let (key, blocklen) = schedule(cipher, key, num_rounds)?;
        if blocklen != BLOCK {
            return Err(CryptError::InvalidArg);
        }
        if iv.len() != BLOCK || tweak.len() != BLOCK {
            return Err(CryptError::InvalidArg);
        }
        let mut st = Self {
            key,
            tweak_key: [0u8; BLOCK],
            iv: [0u8; BLOCK],
            t: [0u8; BLOCK],
        };
        st.tweak_key.copy_from_slice(tweak);
        st.iv.copy_from_slice(iv);
        st.t = gf_mult(&st.tweak_key, &st.iv);
        Ok(st)
    }

    fn advance(&mut self) {
        ctr_increment_be(&mut self.iv, BLOCK);
        self.t = gf_mult(&self.tweak_key, &self.iv);
    }

    /// Encrypt; length must be a multiple of 16.
    pub fn encrypt(&mut self, pt: &[u8], ct: &mut [u8]) -> CryptResult<()> {
        if pt.len() % BLOCK != 0 || ct.len() < pt.len() {
            return Err(CryptError::InvalidArg);
        }
        for (p, c) in pt.chunks_exact(BLOCK).zip(ct.chunks_exact_mut(BLOCK)) {
            let mut tmp = [0u8; BLOCK];
            tmp.copy_from_slice(p);
            xor_into(&mut tmp, &self.t);
            self.key.encrypt_block(&tmp, c)?;
            xor_into(c, &self.t);
            self.advance();
            tmp.zeroize();
        }
        Ok(())
    }

    /// Decrypt; length must be a multiple of 16.
    pub fn decrypt(&mut self, ct: &[u8], pt: &mut [u8]) -> CryptResult<()> {
        if ct.len() % BLOCK != 0 || pt.len() < ct.len() {
            return Err(CryptError::InvalidArg);
        }
        for (c, p) in ct.chunks_exact(BLOCK).zip(pt.chunks_exact_mut(BLOCK)) {
            let mut tmp = [0u8; BLOCK];
            tmp.copy_from_slice(c);
            xor_into(&mut tmp, &self.t);
            self.key.decrypt_block(&tmp, p)?;
            xor_into(&mut p[..BLOCK], &self.t);
            self.advance();
            tmp.zeroize();
        }
        Ok(())
    }

    /// Read back the current block index.
    pub fn getiv(&self) -> &[u8] {
        &self.iv
    }

    /// Reposition the block index.
    pub fn setiv(&mut self, iv: &[u8]) -> CryptResult<()> {
        if iv.len() != BLOCK {
            return Err(CryptError::InvalidArg);
        }
        self.iv.copy_from_slice(iv);
        self.t = gf_mult(&self.tweak_key, &self.iv);
        Ok(())
    }

    /// Release the state.
    pub fn done(self) {}
}
