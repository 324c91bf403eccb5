//! CFB mode at widths of 1, 8 or the full block.

use super::schedule;
use crate::error::{CryptError, CryptResult};
use crate::registry::{self, ScheduledKey};
use crate::util::MAX_BLOCK_LEN;
use zeroize::Zeroize;

/// Feedback width of a CFB stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CfbWidth {
    /// One bit per step (shift register).
    Bit1,
    /// One byte per step (shift register).
    Bit8,
    /// Full block width, byte-buffered.
    Full,
}

/// CFB mode state.
pub struct CfbState {
    key: Box<dyn ScheduledKey>,
    reg: [u8; MAX_BLOCK_LEN],
    pad: [u8; MAX_BLOCK_LEN],
    padlen: usize,
    blocklen: usize,
    width: CfbWidth,
}

impl Drop for CfbState {
    fn drop(&mut self) {
        self.reg.zeroize();
        self.pad.zeroize();
    }
}

impl CfbState {
    /// Schedule `key` with an explicit feedback width. Widths 1 and 8
    /// require 8- or 16-byte blocks.
    pub fn start_ex(
        cipher: usize,
        iv: &[u8],
        key: &[u8],
        num_rounds: u32,
        width: CfbWidth,
    ) -> CryptResult<Self> {
        let desc = registry::cipher_descriptor(cipher)?;
        if matches!(width, CfbWidth::Bit1 | CfbWidth::Bit8)
            && desc.block_length != 8
            && desc.block_length != 16
        {
            return Err(CryptError::InvalidArg);
        }
        let (key, blocklen) = schedule(cipher, key, num_rounds)?;
        if iv.len() != blocklen {
            return Err(CryptError::InvalidArg);
        }
        let mut st = Self {
            key,
            reg: [0u8; MAX_BLOCK_LEN],
            pad: [0u8; MAX_BLOCK_LEN],
            padlen: 0,
            blocklen,
            width,
        };
        st.reg[..blocklen].copy_from_slice(iv);
        st.refill()?;
        Ok(st)
    }

    /// Schedule `key` at the default (full block) width.
    pub fn start(cipher: usize, iv: &[u8], key: &[u8], num_rounds: u32) -> CryptResult<Self> {
        Self::start_ex(cipher, iv, key, num_rounds, CfbWidth::Full)
    }

    fn refill(&mut self) -> CryptResult<()> {
        let reg = self.reg;
        self.key
            .encrypt_block(&reg[..self.blocklen], &mut self.pad[..self.blocklen])?;
        self.padlen = 0;
        Ok(())
    }

    fn shift_in_byte(&mut self, byte: u8) {
        let bl = self.blocklen;
        for x in 0..bl - 1 {
            self.reg[x] = self.reg[x + 1];
        }
        self.reg[bl - 1] = byte;
    }

    fn shift_in_bit(&mut self, bit: u8) {
        let bl = self.blocklen;
        for x in 0..bl - 1 {
            self.reg[x] = (self.reg[x] << 1) | (self.reg[x + 1] >> 7);
        }
        self.reg[bl - 1] = (self.reg[bl - 1] << 1) | (bit & 1);
    }

    /// Encrypt any number of bytes.
    pub fn encrypt(&mut self, pt: &[u8], ct: &mut [u8]) -> CryptResult<()> {
        if ct.len() < pt.len() {
            return Err(CryptError::BufferOverflow);
        }
        match self.width {
            CfbWidth::Full => {
                for (x, byte) in pt.iter().enumerate() {
                    if self.padlen == self.blocklen {
                        // the register already holds the previous ciphertext
                        self.refill()?;
                    }
                    let c = byte ^ self.pad[self.padlen];
                    // ciphertext feeds back into the register
                    self.reg[self.padlen] = c;
                    self.padlen += 1;
                    ct[x] = c;
                }
            }
            CfbWidth::Bit8 => {
                for (x, byte) in pt.iter().enumerate() {
                    self.refill()?;
                    let c = byte ^ self.pad[0];
                    self.shift_in_byte(c);
                    ct[x] = c;
                }
            }
            CfbWidth::Bit1 => {
                for (x, byte) in pt.iter().enumerate() {
                    let mut c = 0u8;
                    for bit in (0..8).rev() {
                        self.refill()?;
                        let cb = ((byte >> bit) & 1) ^ (self.pad[0] >> 7);
                        self.shift_in_bit(cb);
                        c = (c << 1) | cb;
                    }
                    ct[x] = c;
                }
            }
        }
        Ok(())
    }

    /// Decrypt any number of bytes.
    pub fn decrypt(&mut self, ct: &[u8], pt: &mut [u8]) -> CryptResult<()> {
        if pt.len() < ct.len() {
            return Err(CryptError::BufferOverflow);
        }
        match self.width {
            CfbWidth::Full => {
                for (x, byte) in ct.iter().enumerate() {
                    if self.padlen == self.blocklen {
                        self.refill()?;
                    }
                    let p = byte ^ self.pad[self.padlen];
                    self.reg[self.padlen] = *byte;
                    self.padlen += 1;
                    pt[x] = p;
                }
            }
            CfbWidth::Bit8 => {
                for (x, byte) in ct.iter().enumerate() {
                    self.refill()?;
                    let p = byte ^ self.pad[0];
                    self.shift_in_byte(*byte);
                    pt[x] = p;
                }
            }
            CfbWidth::Bit1 => {
                for (x, byte) in ct.iter().enumerate() {
                    let mut p = 0u8;
                    for bit in (0..8).rev() {
                        self.refill()?;
                        let cb = (byte >> bit) & 1;
                        let pb = cb ^ (self.pad[0] >> 7);
                        self.shift_in_bit(cb);
                        p = (p << 1) | pb;
                    }
                    pt[x] = p;
                }
            }
        }
        Ok(())
    }

    /// Restart the register at a new IV.
    pub fn setiv(&mut self, iv: &[u8]) -> CryptResult<()> {
        if iv.len() != self.blocklen {
            return Err(CryptError::InvalidArg);
        }
        self.reg[..self.blocklen].copy_from_slice(iv);
        self.refill()
    }

    /// Release the state.
    pub fn done(self) {}
}
