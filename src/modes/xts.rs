//! XTS mode (IEEE P1619) with ciphertext stealing for non-aligned tails.

use super::schedule;
use crate::error::{CryptError, CryptResult};
use crate::registry::ScheduledKey;
use crate::util::{gf_double_le, xor_into};

const BLOCK: usize = 16;

/// XTS mode state: two independently scheduled keys of equal length over a
/// 128-bit block cipher.
pub struct XtsState {
    key1: Box<dyn ScheduledKey>,
    key2: Box<dyn ScheduledKey>,
}

impl XtsState {
    /// Schedule the data key `key1` and tweak key `key2` (equal lengths).
    pub fn start(cipher: usize, key1: &[u8], key2: &[u8], num_rounds: u32) -> CryptResult<Self> {
        if key1.len() != key2.len() {
            return Err(CryptError::InvalidArg);
        }
        let (key1, blocklen) = schedule(cipher, key1, num_rounds)?;
        if blocklen != BLOCK {
            return Err(CryptError::InvalidArg);
        }
        let (key2, _) = schedule(cipher, key2, num_rounds)?;
        Ok(Self { key1, key2 })
    }

    fn initial_tweak(&self, tweak: &[u8; BLOCK]) -> CryptResult<[u8; BLOCK]> {
        let mut t = [0u8; BLOCK];
        self.key2.encrypt_block(tweak, &mut t)?;
        Ok(t)
    }

    fn enc_block(&self, src: &[u8], t: &[u8; BLOCK], dst: &mut [u8]) -> CryptResult<()> {
        let mut tmp = [0u8; BLOCK];
        tmp.copy_from_slice(src);
        xor_into(&mut tmp, t);
        self.key1.encrypt_block(&tmp, dst)?;
        xor_into(dst, t);
        Ok(())
    }

    fn dec_block(&self, src: &[u8], t: &[u8; BLOCK], dst: &mut [u8]) -> CryptResult<()> {
        let mut tmp = [0u8; BLOCK];
        tmp.copy_from_slice(src);
        xor_into(&mut tmp, t);
        self.key1.decrypt_block(&tmp, dst)?;
        xor_into(dst, t);
        Ok(())
    }

    /// Encrypt one data unit under the 16-byte `tweak` (sector number).
    /// `pt.len()` must be at least 16; a non-multiple tail is handled with
    /// ciphertext stealing.
    pub fn encrypt(&mut self, pt: &[u8], ct: &mut [u8], tweak: &[u8; BLOCK]) -> CryptResult<()> {
        if pt.len() < BLOCK || ct.len() < pt.len() {
            return Err(CryptError::InvalidArg);
        }
        let rem = pt.len() % BLOCK;
        let full = pt.len() / BLOCK;
        let mut t = self.initial_tweak(tweak)?;

        let whole = if rem == 0 { full } else { full - 1 };
        for x in 0..whole {
            self.enc_block(&pt[x * BLOCK..(x + 1) * BLOCK], &t, &mut ct[x * BLOCK..(x + 1) * BLOCK])?;
            gf_double_le(&mut t);
        }

        if rem != 0 {
            // steal: C_{m-1} comes from the padded final short block
            let m = whole;
            let mut cc = [0u8; BLOCK];
            self.enc_block(&pt[m * BLOCK..(m + 1) * BLOCK], &t, &mut cc)?;
            let mut t2 = t;
            gf_double_le(&mut t2);

            let tail_start = (m + 1) * BLOCK;
            let mut pp = [0u8; BLOCK];
            pp[..rem].copy_from_slice(&pt[tail_start..]);
            pp[rem..].copy_from_slice(&cc[rem..]);

            let mut cm1 = [0u8; BLOCK];
            self.enc_block(&pp, &t2, &mut cm1)?;
            ct[m * BLOCK..(m + 1) * BLOCK].copy_from_slice(&cm1);
            ct[tail_start..tail_start + rem].copy_from_slice(&cc[..rem]);
        }
        Ok(())
    }

    /// Decrypt one data unit; mirror image of [`Self::encrypt`].
    pub fn decrypt(&mut self, ct: &[u8], pt: &mut [u8], tweak: &[u8; BLOCK]) -> CryptResult<()> {
        if ct.len() < BLOCK || pt.len() < ct.len() {
            return Err(CryptError::InvalidArg);
        }
        let rem = ct.len() % BLOCK;
        let full = ct.len() / BLOCK;
        let mut t = self.initial_tweak(tweak)?;

        let whole = if rem == 0 { full } else { full - 1 };
        for x in 0..whole {
            self.dec_block(&ct[x * BLOCK..(x + 1) * BLOCK], &t, &mut pt[x * BLOCK..(x + 1) * BLOCK])?;
            gf_double_le(&mut t);
        }

        if rem != 0 {
            let m = whole;
            let mut t2 = t;
            gf_double_le(&mut t2);

            // the stored full block was produced with the later tweak
            let mut pp = [0u8; BLOCK];
            self.dec_block(&ct[m * BLOCK..(m + 1) * BLOCK], &t2, &mut pp)?;

            let tail_start = (m + 1) * BLOCK;
            let mut cc = [0u8; BLOCK];
            cc[..rem].copy_from_slice(&ct[tail_start..]);
            cc[rem..].copy_from_slice(&pp[rem..]);

            let mut pm1 = [0u8; BLOCK];
            self.dec_block(&cc, &t, &mut pm1)?;
            pt[m * BLOCK..(m + 1) * BLOCK].copy_from_slice(&pm1);
            pt[tail_start..tail_start + rem].copy_from_slice(&pp[..rem]);
        }
        Ok(())
    }

    /// Release the state.
    pub fn done(self) {}
}
