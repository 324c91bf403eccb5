//! ECB mode: a validated pass-through of the block primitive.

use super::schedule;
use crate::error::{CryptError, CryptResult};
use crate::registry::ScheduledKey;

/// ECB mode state.
pub struct EcbState {
    key: Box<dyn ScheduledKey>,
    blocklen: usize,
}

impl EcbState {
    /// Schedule `key` under the cipher at `cipher`.
    pub fn start(cipher: usize, key: &[u8], num_rounds: u32) -> CryptResult<Self> {
        let (key, blocklen) = schedule(cipher, key, num_rounds)?;
        Ok(Self { key, blocklen })
    }

    /// Block length of the underlying cipher.
    pub fn block_len(&self) -> usize {
        self.blocklen
    }

    /// Encrypt `pt` into `ct`; the length must be a multiple of the block
    /// length.
    pub fn encrypt(&mut self, pt: &[u8], ct: &mut [u8]) -> CryptResult<()> {
        if pt.len() % self.blocklen != 0 || ct.len() < pt.len() {
            return Err(CryptError::InvalidArg);
        }
        for (p, c) in pt
            .chunks_exact(self.blocklen)
            .zip(ct.chunks_exact_mut(self.blocklen))
        {
            self.key.encrypt_block(p, c)?;
        }
        Ok(())
    }

    /// Decrypt `ct` into `pt`; the length must be a multiple of the block
    /// length.
    pub fn decrypt(&mut self, ct: &[u8], pt: &mut [u8]) -> CryptResult<()> {
        if ct.len() % self.blocklen != 0 || pt.len() < ct.len() {
            return Err(CryptError::InvalidArg);
        }
        for (c, p) in ct
            .chunks_exact(self.blocklen)
            .zip(pt.chunks_exact_mut(self.blocklen))
        {
            self.key.decrypt_block(c, p)?;
        }
        Ok(())
    }

    /// Release the state.
    pub fn done(self) {}
}
