//! F8 mode (3GPP): the IV is enciphered under a salt-masked key and each
//! keystream block folds in a block counter and the previous keystream.

use super::schedule;
use crate::error::{CryptError, CryptResult};
use crate::registry::{self, ScheduledKey};
use crate::util::{store32_be, xor_into, MAX_BLOCK_LEN};
use zeroize::{Zeroize, Zeroizing};

/// F8 mode state. Byte-oriented keystream.
pub struct F8State {
    key: Box<dyn ScheduledKey>,
    miv: [u8; MAX_BLOCK_LEN],
    lastks: [u8; MAX_BLOCK_LEN],
    pad: [u8; MAX_BLOCK_LEN],
    padlen: usize,
    blockcnt: u32,
    blocklen: usize,
}

impl Drop for F8State {
    fn drop(&mut self) {
        self.miv.zeroize();
        self.lastks.zeroize();
        self.pad.zeroize();
    }
}

impl F8State {
    /// Schedule `key`; `salt` masks the key (padded with 0x55) for the IV
    /// encryption.
    pub fn start(
        cipher: usize,
        iv: &[u8],
        key: &[u8],
        salt: &[u8],
        num_rounds: u32,
    ) -> CryptResult<Self> {
        let desc = registry::cipher_descriptor(cipher)?;
        if iv.len() != desc.block_length || salt.len() > key.len() {
            return Err(CryptError::InvalidArg);
        }

        // IV' = E_{K ⊕ (salt ∥ 0x55…)}(IV)
        let mut masked = Zeroizing::new(key.to_vec());
        for (x, byte) in masked.iter_mut().enumerate() {
            let s = if x < salt.len() { salt[x] } else { 0x55 };
            *byte ^= s;
        }
        let masked_key = desc.setup(&masked, num_rounds)?;
        let mut miv = [0u8; MAX_BLOCK_LEN];
        masked_key.encrypt_block(iv, &mut miv[..desc.block_length])?;
        drop(masked_key);

        let (key, blocklen) = schedule(cipher, key, num_rounds)?;
        Ok(Self {
            key,
            miv,
            lastks: [0u8; MAX_BLOCK_LEN],
            pad: [0u8; MAX_BLOCK_LEN],
            padlen: blocklen,
            blockcnt: 0,
            blocklen,
        })
    }

    fn refill(&mut self) -> CryptResult<()> {
        let bl = self.blocklen;
        let mut buf = [0u8; MAX_BLOCK_LEN];
        buf[..bl].copy_from_slice(&self.miv[..bl]);
        let mut cnt = [0u8; 4];
        store32_be(self.blockcnt, &mut cnt);
        xor_into(&mut buf[bl - 4..bl], &cnt);
        xor_into(&mut buf[..bl], &self.lastks[..bl]);
        self.key.encrypt_block(&buf[..bl], &mut self.pad[..bl])?;
        self.lastks[..bl].copy_from_slice(&self.pad[..bl]);
        self.blockcnt = self.blockcnt.wrapping_add(1);
        self.padlen = 0;
        buf.zeroize();
        Ok(())
    }

    /// XOR keystream over `input` into `output`; any length.
    pub fn crypt(&mut self, input: &[u8], output: &mut [u8]) -> CryptResult<()> {
        if output.len() < input.len() {
            return Err(CryptError::BufferOverflow);
        }
        for (x, byte) in input.iter().enumerate() {
            if self.padlen == self.blocklen {
                self.refill()?;
            }
            output[x] = byte ^ self.pad[self.padlen];
            self.padlen += 1;
        }
        Ok(())
    }

    /// Encrypt (keystream XOR).
    pub fn encrypt(&mut self, pt: &[u8], ct: &mut [u8]) -> CryptResult<()> {
        self.crypt(pt, ct)
    }

    /// Decrypt (keystream XOR).
    pub fn decrypt(&mut self, ct: &[u8], pt: &mut [u8]) -> CryptResult<()> {
        self.crypt(ct, pt)
    }

    /// Release the state.
    pub fn done(self) {}
}
