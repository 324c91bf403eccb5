//! OCB3 mode (RFC 7253): one-pass authenticated encryption with XOR
//! offsets derived from a doubling L-table.
//!
//! Text is processed in whole blocks through `encrypt`/`decrypt`; the final
//! (possibly empty, possibly partial) chunk goes through `encrypt_last`/
//! `decrypt_last`, after which only `done`/`done_verify` is valid.

use super::verify_tag;
use crate::error::{CryptError, CryptResult};
use crate::registry::{self, ScheduledKey};
use crate::util::{gf_double, xor_into, MAX_BLOCK_LEN};
use zeroize::Zeroize;

const L_COUNT: usize = 32;

/// OCB3 streaming state.
pub struct Ocb3State {
    key: Box<dyn ScheduledKey>,
    blocklen: usize,
    taglen: usize,
    l_star: [u8; MAX_BLOCK_LEN],
    l_dollar: [u8; MAX_BLOCK_LEN],
    l: [[u8; MAX_BLOCK_LEN]; L_COUNT],
    // text path
    offset: [u8; MAX_BLOCK_LEN],
    checksum: [u8; MAX_BLOCK_LEN],
    block_index: u32,
    finished: bool,
    // AAD path
    a_offset: [u8; MAX_BLOCK_LEN],
    a_sum: [u8; MAX_BLOCK_LEN],
    a_block_index: u32,
    a_buf: [u8; MAX_BLOCK_LEN],
    a_buflen: usize,
}

impl Drop for Ocb3State {
    fn drop(&mut self) {
        self.l_star.zeroize();
        self.l_dollar.zeroize();
        for l in &mut self.l {
            l.zeroize();
        }
        self.offset.zeroize();
        self.checksum.zeroize();
        self.a_offset.zeroize();
        self.a_sum.zeroize();
        self.a_buf.zeroize();
    }
}

impl Ocb3State {
    /// Key the mode. The nonce must leave room for the length marker (at
    /// most `block_length - 1` bytes, i.e. 120 bits for AES); `taglen` is
    /// clamped to the block length.
    pub fn init(cipher: usize, key: &[u8], nonce: &[u8], taglen: usize) -> CryptResult<Self> {
        let desc = registry::cipher_descriptor(cipher)?;
        let bl = desc.block_length;
        if bl != 8 && bl != 16 {
            return Err(CryptError::InvalidArg);
        }
        if nonce.len() >= bl {
            return Err(CryptError::InvalidArg);
        }
        let taglen = taglen.min(bl);
        if taglen == 0 {
            return Err(CryptError::InvalidArg);
        }
        let sk = desc.setup(key, 0)?;

        // L_* = E(0), L_$ = double(L_*), L_i = double(L_{i-1})
        let mut l_star = [0u8; MAX_BLOCK_LEN];
        sk.encrypt_block(&[0u8; MAX_BLOCK_LEN][..bl], &mut l_star[..bl])?;
        let mut l_dollar = [0u8; MAX_BLOCK_LEN];
        l_dollar[..bl].copy_from_slice(&gf_double(&l_star[..bl]));
        let mut l = [[0u8; MAX_BLOCK_LEN]; L_COUNT];
        l[0][..bl].copy_from_slice(&gf_double(&l_dollar[..bl]));
        for x in 1..L_COUNT {
            let doubled = gf_double(&l[x - 1][..bl]);
            l[x][..bl].copy_from_slice(&doubled);
        }

        let mut st = Self {
            key: sk,
            blocklen: bl,
            taglen,
            l_star,
            l_dollar,
            l,
            offset: [0u8; MAX_BLOCK_LEN],
            checksum: [0u8; MAX_BLOCK_LEN],
            block_index: 1,
            finished: false,
            a_offset: [0u8; MAX_BLOCK_LEN],
            a_sum: [0u8; MAX_BLOCK_LEN],
            a_block_index: 1,
            a_buf: [0u8; MAX_BLOCK_LEN],
            a_buflen: 0,
        };
        st.calc_offset_zero(nonce)?;
        Ok(st)
    }

    /// Offset_0 from the nonce via the RFC 7253 Stretch construction.
    fn calc_offset_zero(&mut self, nonce: &[u8]) -> CryptResult<()> {
        let bl = self.blocklen;
        let mut inonce = [0u8; MAX_BLOCK_LEN];
        // Nonce = zeros ∥ 1 ∥ N
        let mut x = bl - 1;
        for y in 0..nonce.len() {
            inonce[x] = nonce[nonce.len() - y - 1];
            x -= 1;
        }
        inonce[x] = 0x01;

        // bottom = last 6 bits; Ktop enciphers the nonce with them cleared
        let bottom = (inonce[bl - 1] & 0x3F) as usize;
        inonce[bl - 1] &= 0xC0;
        let mut ktop = [0u8; MAX_BLOCK_LEN];
        self.key.encrypt_block(&inonce[..bl], &mut ktop[..bl])?;

        // Stretch = Ktop ∥ (Ktop[0..8] ⊕ Ktop[1..9])
        let mut stretch = [0u8; MAX_BLOCK_LEN + 8];
        stretch[..bl].copy_from_slice(&ktop[..bl]);
        for y in 0..8 {
            stretch[bl + y] = ktop[y] ^ ktop[y + 1];
        }

        // Offset_0 = Stretch[bottom .. bottom+blockbits]
        let idx = bottom / 8;
        let shift = bottom % 8;
        for y in 0..bl {
            self.offset[y] = stretch[idx + y] << shift;
            if shift > 0 {
                self.offset[y] |= stretch[idx + y + 1] >> (8 - shift);
            }
        }
        inonce.zeroize();
        ktop.zeroize();
        stretch.zeroize();
        Ok(())
    }

    // ---- AAD path -------------------------------------------------------

    fn aad_block(&mut self, block: &[u8]) -> CryptResult<()> {
        let bl = self.blocklen;
        let ntz = self.a_block_index.trailing_zeros() as usize;
        let l = self.l[ntz];
        xor_into(&mut self.a_offset[..bl], &l[..bl]);
        self.a_block_index = self
            .a_block_index
            .checked_add(1)
            .ok_or(CryptError::Overflow)?;

        let mut x = [0u8; MAX_BLOCK_LEN];
        x[..bl].copy_from_slice(block);
        xor_into(&mut x[..bl], &self.a_offset[..bl]);
        let mut enc = [0u8; MAX_BLOCK_LEN];
        self.key.encrypt_block(&x[..bl], &mut enc[..bl])?;
        xor_into(&mut self.a_sum[..bl], &enc[..bl]);
        x.zeroize();
        enc.zeroize();
        Ok(())
    }

    /// Absorb associated data; buffered, any length, any time before the
    /// tag is produced.
    pub fn add_aad(&mut self, mut aad: &[u8]) -> CryptResult<()> {
        let bl = self.blocklen;
        while !aad.is_empty() {
            if self.a_buflen == bl {
                let block = self.a_buf;
                self.aad_block(&block[..bl])?;
                self.a_buflen = 0;
            }
            let take = (bl - self.a_buflen).min(aad.len());
            self.a_buf[self.a_buflen..self.a_buflen + take].copy_from_slice(&aad[..take]);
            self.a_buflen += take;
            aad = &aad[take..];
        }
        Ok(())
    }

    fn finish_aad(&mut self) -> CryptResult<()> {
        let bl = self.blocklen;
        if self.a_buflen == bl {
            let block = self.a_buf;
            self.aad_block(&block[..bl])?;
            self.a_buflen = 0;
        } else if self.a_buflen > 0 {
            // final short AAD block: offset gains L_*, block is 10*-padded
            let l_star = self.l_star;
            xor_into(&mut self.a_offset[..bl], &l_star[..bl]);
            let mut x = [0u8; MAX_BLOCK_LEN];
            x[..self.a_buflen].copy_from_slice(&self.a_buf[..self.a_buflen]);
            x[self.a_buflen] = 0x80;
            xor_into(&mut x[..bl], &self.a_offset[..bl]);
            let mut enc = [0u8; MAX_BLOCK_LEN];
            self.key.encrypt_block(&x[..bl], &mut enc[..bl])?;
            xor_into(&mut self.a_sum[..bl], &enc[..bl]);
            self.a_buflen = 0;
            x.zeroize();
            enc.zeroize();
        }
        Ok(())
    }

    // ---- text path ------------------------------------------------------

    fn crypt_blocks(&mut self, encrypting: bool, input: &[u8], output: &mut [u8]) -> CryptResult<()> {
        let bl = self.blocklen;
        if self.finished {
            return Err(CryptError::InvalidArg);
        }
        if input.len() % bl != 0 || output.len() < input.len() {
            return Err(CryptError::InvalidArg);
        }
        for (p, c) in input.chunks_exact(bl).zip(output.chunks_exact_mut(bl)) {
            let ntz = self.block_index.trailing_zeros() as usize;
            let l = self.l[ntz];
            xor_into(&mut self.offset[..bl], &l[..bl]);
            self.block_index = self.block_index.checked_add(1).ok_or(CryptError::Overflow)?;

            let mut x = [0u8; MAX_BLOCK_LEN];
            x[..bl].copy_from_slice(p);
            xor_into(&mut x[..bl], &self.offset[..bl]);
            let mut y = [0u8; MAX_BLOCK_LEN];
            if encrypting {
                self.key.encrypt_block(&x[..bl], &mut y[..bl])?;
            } else {
                self.key.decrypt_block(&x[..bl], &mut y[..bl])?;
            }
            xor_into(&mut y[..bl], &self.offset[..bl]);
            // the checksum always accumulates plaintext
            if encrypting {
                xor_into(&mut self.checksum[..bl], p);
            } else {
                let yy = y;
                xor_into(&mut self.checksum[..bl], &yy[..bl]);
            }
            c.copy_from_slice(&y[..bl]);
            x.zeroize();
            y.zeroize();
        }
        Ok(())
    }

    fn crypt_last(&mut self, encrypting: bool, input: &[u8], output: &mut [u8]) -> CryptResult<()> {
        let bl = self.blocklen;
        if self.finished {
            return Err(CryptError::InvalidArg);
        }
        if input.len() >= bl || output.len() < input.len() {
            return Err(CryptError::InvalidArg);
        }
        if !input.is_empty() {
            // Pad = E(Offset ⊕ L_*); short block is XOR-padded
            let l_star = self.l_star;
            xor_into(&mut self.offset[..bl], &l_star[..bl]);
            let offset = self.offset;
            let mut pad = [0u8; MAX_BLOCK_LEN];
            self.key.encrypt_block(&offset[..bl], &mut pad[..bl])?;
            for (x, byte) in input.iter().enumerate() {
                output[x] = byte ^ pad[x];
            }
            let pt: &[u8] = if encrypting { input } else { &output[..input.len()] };
            let mut padded = [0u8; MAX_BLOCK_LEN];
            padded[..pt.len()].copy_from_slice(pt);
            padded[pt.len()] = 0x80;
            xor_into(&mut self.checksum[..bl], &padded[..bl]);
            pad.zeroize();
            padded.zeroize();
        }
        self.finished = true;
        Ok(())
    }

    /// Encrypt whole blocks (length a multiple of the block length).
    pub fn encrypt(&mut self, pt: &[u8], ct: &mut [u8]) -> CryptResult<()> {
        self.crypt_blocks(true, pt, ct)
    }

    /// Decrypt whole blocks.
    pub fn decrypt(&mut self, ct: &[u8], pt: &mut [u8]) -> CryptResult<()> {
        self.crypt_blocks(false, ct, pt)
    }

    /// Encrypt the final short chunk (may be empty).
    pub fn encrypt_last(&mut self, pt: &[u8], ct: &mut [u8]) -> CryptResult<()> {
        self.crypt_last(true, pt, ct)
    }

    /// Decrypt the final short chunk (may be empty).
    pub fn decrypt_last(&mut self, ct: &[u8], pt: &mut [u8]) -> CryptResult<()> {
        self.crypt_last(false, ct, pt)
    }

    /// Finish and produce the tag of the length chosen at init.
    pub fn done(mut self) -> CryptResult<Vec<u8>> {
        if !self.finished {
            // aligned message with no explicit last call
            self.finished = true;
        }
        self.finish_aad()?;
        // Tag = E(Checksum ⊕ Offset ⊕ L_$) ⊕ HASH(A)
        let bl = self.blocklen;
        let mut x = [0u8; MAX_BLOCK_LEN];
        x[..bl].copy_from_slice(&self.checksum[..bl]);
        xor_into(&mut x[..bl], &self.offset[..bl]);
        let l_dollar = self.l_dollar;
        xor_into(&mut x[..bl], &l_dollar[..bl]);
        let mut tag = vec![0u8; bl];
        self.key.encrypt_block(&x[..bl], &mut tag)?;
        xor_into(&mut tag, &self.a_sum[..bl]);
        tag.truncate(self.taglen);
        x.zeroize();
        Ok(tag)
    }

    /// Finish a decryption and verify `tag` in constant time.
    pub fn done_verify(self, tag: &[u8]) -> CryptResult<()> {
        verify_tag(self.done()?, tag)
    }
}

/// One-shot OCB3 encryption; returns `(ciphertext, tag)`.
pub fn ocb3_memory_encrypt(
    cipher: usize,
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    pt: &[u8],
    taglen: usize,
) -> CryptResult<(Vec<u8>, Vec<u8>)> {
    let mut st = Ocb3State::init(cipher, key, nonce, taglen)?;
    st.add_aad(aad)?;
    let bl = st.blocklen;
    let split = pt.len() - (pt.len() % bl);
    let mut ct = vec![0u8; pt.len()];
    st.encrypt(&pt[..split], &mut ct[..split])?;
    st.encrypt_last(&pt[split..], &mut ct[split..])?;
    let tag = st.done()?;
    Ok((ct, tag))
}

/// One-shot OCB3 decryption with tag verification.
pub fn ocb3_memory_decrypt(
    cipher: usize,
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    ct: &[u8],
    tag: &[u8],
) -> CryptResult<Vec<u8>> {
    let mut st = Ocb3State::init(cipher, key, nonce, tag.len())?;
    st.add_aad(aad)?;
    let bl = st.blocklen;
    let split = ct.len() - (ct.len() % bl);
    let mut pt = vec![0u8; ct.len()];
    st.decrypt(&ct[..split], &mut pt[..split])?;
    st.decrypt_last(&ct[split..], &mut pt[split..])?;
    st.done_verify(tag)?;
    Ok(pt)
}
