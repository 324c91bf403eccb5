//! OFB mode: the pad is refreshed by re-enciphering the previous pad.

use super::schedule;
use crate::error::{CryptError, CryptResult};
use crate::registry::ScheduledKey;
use crate::util::MAX_BLOCK_LEN;
use zeroize::Zeroize;

/// OFB mode state. Byte-oriented.
pub struct OfbState {
    key: Box<dyn ScheduledKey>,
    pad: [u8; MAX_BLOCK_LEN],
    padlen: usize,
    blocklen: usize,
}

impl Drop for OfbState {
    fn drop(&mut self) {
        self.pad.zeroize();
    }
}

impl OfbState {
    /// Schedule `key` and set the initial feedback value.
    pub fn start(cipher: usize, iv: &[u8], key: &[u8], num_rounds: u32) -> CryptResult<Self> {
        let (key, blocklen) = schedule(cipher, key, num_rounds)?;
        if iv.len() != blocklen {
            return Err(CryptError::InvalidArg);
        }
        let mut st = Self {
            key,
            pad: [0u8; MAX_BLOCK_LEN],
            padlen: blocklen,
            blocklen,
        };
        st.pad[..blocklen].copy_from_slice(iv);
        Ok(st)
    }

    /// XOR keystream over `input` into `output`; any length.
    pub fn crypt(&mut self, input: &[u8], output: &mut [u8]) -> CryptResult<()> {
        if output.len() < input.len() {
            return Err(CryptError::BufferOverflow);
        }
        for (x, byte) in input.iter().enumerate() {
            if self.padlen == self.blocklen {
                let prev = self.pad;
                self.key
                    .encrypt_block(&prev[..self.blocklen], &mut self.pad[..self.blocklen])?;
                self.padlen = 0;
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

    /// Restart the feedback register at a new IV.
    pub fn setiv(&mut self, iv: &[u8]) -> CryptResult<()> {
        if iv.len() != self.blocklen {
            return Err(CryptError::InvalidArg);
        }
        self.pad[..self.blocklen].copy_from_slice(iv);
        self.padlen = self.blocklen;
        Ok(())
    }

    /// Release the state.
    pub fn done(self) {}
}

#[cfg(test)]
mod tests {
    use super::super::testutil::aes_slot;
    use super::*;

    #[test]
    fn test_ofb_sp800_38a_f41() {
        let key = hex::decode("2b7e151628aed2a6abf7158809cf4f3c").unwrap();
        let iv = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let pt = hex::decode("6bc1bee22e409f96e93d7e117393172a").unwrap();
        let mut st = OfbState::start(aes_slot(), &iv, &key, 0).unwrap();
        let mut ct = vec![0u8; 16];
        st.encrypt(&pt, &mut ct).unwrap();
        assert_eq!(hex::encode(&ct), "3b3fd92eb72dad20333449f8e83cfb4a");
    }

    #[test]
    fn test_ofb_chunked_equals_one_shot() {
        let key = [9u8; 16];
        let iv = [4u8; 16];
        let data: Vec<u8> = (0u8..70).collect();

        let mut a = OfbState::start(aes_slot(), &iv, &key, 0).unwrap();
        let mut oneshot = vec![0u8; data.len()];
        a.encrypt(&data, &mut oneshot).unwrap();

        let mut b = OfbState::start(aes_slot(), &iv, &key, 0).unwrap();
        let mut chunked = vec![0u8; data.len()];
        let mut off = 0;
        for chunk in data.chunks(9) {
            b.encrypt(chunk, &mut chunked[off..off + chunk.len()]).unwrap();
            off += chunk.len();
        }
        assert_eq!(oneshot, chunked);

        let mut c = OfbState::start(aes_slot(), &iv, &key, 0).unwrap();
        let mut back = vec![0u8; oneshot.len()];
        c.decrypt(&oneshot, &mut back).unwrap();
        assert_eq!(back, data);
    }
}
