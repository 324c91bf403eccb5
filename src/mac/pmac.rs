//! PMAC over any registered 64- or 128-bit block cipher: the parallelizable
//! XOR-offset authenticator.

use crate::error::{CryptError, CryptResult};
use crate::registry::{self, ScheduledKey};
use crate::util::{gf_double, xor_into, MAX_BLOCK_LEN};
use zeroize::Zeroize;

const L_COUNT: usize = 32;

/// PMAC streaming state.
pub struct PmacState {
    key: Box<dyn ScheduledKey>,
    /// L_i = double^i(E(0)); indexed by ntz of the block counter.
    ls: [[u8; MAX_BLOCK_LEN]; L_COUNT],
    /// L · x⁻¹, folded into a final complete block.
    lr: [u8; MAX_BLOCK_LEN],
    offset: [u8; MAX_BLOCK_LEN],
    checksum: [u8; MAX_BLOCK_LEN],
    buf: [u8; MAX_BLOCK_LEN],
    buflen: usize,
    block_index: u32,
    blocklen: usize,
}

impl Drop for PmacState {
    fn drop(&mut self) {
        for l in &mut self.ls {
            l.zeroize();
        }
        self.lr.zeroize();
        self.offset.zeroize();
        self.checksum.zeroize();
        self.buf.zeroize();
    }
}

/// Multiply an MSB-first block by x⁻¹ in GF(2^n).
fn gf_half(block: &[u8]) -> Vec<u8> {
    let n = block.len();
    let lsb = block[n - 1] & 1;
    let mut out = vec![0u8; n];
    for x in (1..n).rev() {
        out[x] = (block[x] >> 1) | ((block[x - 1] & 1) << 7);
    }
    out[0] = block[0] >> 1;
    if lsb == 1 {
        out[0] ^= 0x80;
        out[n - 1] ^= if n == 16 { 0x43 } else { 0x0D };
    }
    out
}

impl PmacState {
    /// Key a PMAC computation over the cipher at `cipher`.
    pub fn init(cipher: usize, key: &[u8]) -> CryptResult<Self> {
        let desc = registry::cipher_descriptor(cipher)?;
        if desc.block_length != 8 && desc.block_length != 16 {
            return Err(CryptError::InvalidArg);
        }
        let sk = desc.setup(key, 0)?;
        let bl = desc.block_length;

        let zero = [0u8; MAX_BLOCK_LEN];
        let mut l = [0u8; MAX_BLOCK_LEN];
        sk.encrypt_block(&zero[..bl], &mut l[..bl])?;

        let mut ls = [[0u8; MAX_BLOCK_LEN]; L_COUNT];
        ls[0][..bl].copy_from_slice(&l[..bl]);
        for x in 1..L_COUNT {
            let doubled = gf_double(&ls[x - 1][..bl]);
            ls[x][..bl].copy_from_slice(&doubled);
        }
        let mut lr = [0u8; MAX_BLOCK_LEN];
        lr[..bl].copy_from_slice(&gf_half(&l[..bl]));
        l.zeroize();

        Ok(Self {
            key: sk,
            ls,
            lr,
            offset: [0u8; MAX_BLOCK_LEN],
            checksum: [0u8; MAX_BLOCK_LEN],
            buf: [0u8; MAX_BLOCK_LEN],
            buflen: 0,
            block_index: 1,
            blocklen: bl,
        })
    }

    fn absorb_block(&mut self) -> CryptResult<()> {
        let bl = self.blocklen;
        let ntz = self.block_index.trailing_zeros() as usize;
        let ls = self.ls[ntz];
        xor_into(&mut self.offset[..bl], &ls[..bl]);
        self.block_index = self.block_index.checked_add(1).ok_or(CryptError::Overflow)?;

        let mut x = [0u8; MAX_BLOCK_LEN];
        x[..bl].copy_from_slice(&self.buf[..bl]);
        xor_into(&mut x[..bl], &self.offset[..bl]);
        let mut enc = [0u8; MAX_BLOCK_LEN];
        self.key.encrypt_block(&x[..bl], &mut enc[..bl])?;
        xor_into(&mut self.checksum[..bl], &enc[..bl]);
        self.buflen = 0;
        x.zeroize();
        enc.zeroize();
        Ok(())
    }

    /// Absorb message bytes.
    pub fn process(&mut self, mut data: &[u8]) -> CryptResult<()> {
        while !data.is_empty() {
            if self.buflen == self.blocklen {
                self.absorb_block()?;
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
        if self.buflen == bl {
            let buf = self.buf;
            xor_into(&mut self.checksum[..bl], &buf[..bl]);
            let lr = self.lr;
            xor_into(&mut self.checksum[..bl], &lr[..bl]);
        } else {
            let mut padded = [0u8; MAX_BLOCK_LEN];
            padded[..self.buflen].copy_from_slice(&self.buf[..self.buflen]);
            padded[self.buflen] = 0x80;
            xor_into(&mut self.checksum[..bl], &padded[..bl]);
            padded.zeroize();
        }
        let checksum = self.checksum;
        let mut tag = vec![0u8; bl];
        self.key.encrypt_block(&checksum[..bl], &mut tag)?;
        Ok(tag)
    }

    /// Finish, writing the leading bytes of the tag into `out`.
    pub fn done_into(self, out: &mut [u8]) -> CryptResult<usize> {
        let tag = self.done()?;
        Ok(super::clamp_tag(&tag, out))
    }
}

/// One-shot PMAC of `data`.
pub fn pmac_memory(cipher: usize, key: &[u8], data: &[u8]) -> CryptResult<Vec<u8>> {
    let mut st = PmacState::init(cipher, key)?;
    st.process(data)?;
    st.done()
}

#[cfg(test)]
mod tests {
    use super::super::testutil::aes_slot;
    use super::*;

    #[test]
    fn test_pmac_streaming_matches_memory() {
        let key = [0x42u8; 16];
        let data: Vec<u8> = (0u8..77).collect();
        let oneshot = pmac_memory(aes_slot(), &key, &data).unwrap();
        let mut st = PmacState::init(aes_slot(), &key).unwrap();
        for chunk in data.chunks(6) {
            st.process(chunk).unwrap();
        }
        assert_eq!(st.done().unwrap(), oneshot);
    }

    #[test]
    fn test_pmac_deterministic_and_input_sensitive() {
        let key = [0x42u8; 16];
        let a = pmac_memory(aes_slot(), &key, b"message a").unwrap();
        let a2 = pmac_memory(aes_slot(), &key, b"message a").unwrap();
        let b = pmac_memory(aes_slot(), &key, b"message b").unwrap();
        assert_eq!(a, a2);
        assert_ne!(a, b);
    }

    #[test]
    fn test_pmac_full_vs_padded_block_differ() {
        // a 16-byte message and its 15-byte prefix must not collide
        let key = [0x42u8; 16];
        let full = pmac_memory(aes_slot(), &key, &[0u8; 16]).unwrap();
        let short = pmac_memory(aes_slot(), &key, &[0u8; 15]).unwrap();
        assert_ne!(full, short);
    }

    #[test]
    fn test_gf_half_inverts_double() {
        let block: Vec<u8> = (0u8..16).collect();
        let doubled = gf_double(&block);
        assert_eq!(gf_half(&doubled), block);
    }
}
