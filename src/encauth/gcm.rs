//! GCM mode: CTR-32 encryption authenticated by GHASH over GF(2^128).

use super::verify_tag;
use crate::error::{CryptError, CryptResult};
use crate::registry::{self, ScheduledKey};
use crate::util::{ctr_increment_be, store64_be, xor_into};
use ghash::GHash;
use universal_hash::{KeyInit, UniversalHash};
use zeroize::Zeroize;

const BLOCK: usize = 16;

#[derive(PartialEq, Eq)]
enum Phase {
    Aad,
    Text,
}

/// GCM streaming state. AAD must be absorbed before any text.
pub struct GcmState {
    key: Box<dyn ScheduledKey>,
    ghash: GHash,
    buf: [u8; BLOCK],
    buflen: usize,
    ctr: [u8; BLOCK],
    pad: [u8; BLOCK],
    padlen: usize,
    ej0: [u8; BLOCK],
    aadlen: u64,
    textlen: u64,
    phase: Phase,
}

impl Drop for GcmState {
    fn drop(&mut self) {
        self.buf.zeroize();
        self.ctr.zeroize();
        self.pad.zeroize();
        self.ej0.zeroize();
    }
}

impl GcmState {
    /// Key the mode with an IV of any non-zero length; a 12-byte IV takes
    /// the fast path `J0 = IV ∥ 0x00000001`.
    pub fn init(cipher: usize, key: &[u8], iv: &[u8]) -> CryptResult<Self> {
        let desc = registry::cipher_descriptor(cipher)?;
        if desc.block_length != BLOCK {
            return Err(CryptError::InvalidArg);
        }
        if iv.is_empty() {
            return Err(CryptError::InvalidArg);
        }
        let sk = desc.setup(key, 0)?;

        let mut h = [0u8; BLOCK];
        sk.encrypt_block(&[0u8; BLOCK], &mut h)?;
        let ghash_key = ghash::Key::from(h);
        let ghash = GHash::new(&ghash_key);
        h.zeroize();

        let mut j0 = [0u8; BLOCK];
        if iv.len() == 12 {
            j0[..12].copy_from_slice(iv);
            j0[15] = 1;
        } else {
            let mut g = ghash.clone();
            for chunk in iv.chunks(BLOCK) {
                let mut block = [0u8; BLOCK];
                block[..chunk.len()].copy_from_slice(chunk);
                g.update(&[ghash::Block::from(block)]);
            }
            let mut lens = [0u8; BLOCK];
            store64_be((iv.len() as u64) << 3, &mut lens[8..]);
            g.update(&[ghash::Block::from(lens)]);
            j0.copy_from_slice(&g.finalize());
        }

        let mut ej0 = [0u8; BLOCK];
        sk.encrypt_block(&j0, &mut ej0)?;

        Ok(Self {
            key: sk,
            ghash,
            buf: [0u8; BLOCK],
            buflen: 0,
            ctr: j0,
            pad: [0u8; BLOCK],
            padlen: BLOCK,
            ej0,
            aadlen: 0,
            textlen: 0,
            phase: Phase::Aad,
        })
    }

    fn ghash_bytes(&mut self, mut data: &[u8]) {
        while !data.is_empty() {
            if self.buflen == 0 && data.len() >= BLOCK {
                let (block, rest) = data.split_at(BLOCK);
                let mut b = [0u8; BLOCK];
                b.copy_from_slice(block);
                self.ghash.update(&[ghash::Block::from(b)]);
                data = rest;
            } else {
                let take = (BLOCK - self.buflen).min(data.len());
                self.buf[self.buflen..self.buflen + take].copy_from_slice(&data[..take]);
                self.buflen += take;
                data = &data[take..];
                if self.buflen == BLOCK {
                    let b = self.buf;
                    self.ghash.update(&[ghash::Block::from(b)]);
                    self.buflen = 0;
                }
            }
        }
    }

    fn flush_ghash_partial(&mut self) {
        if self.buflen > 0 {
            let mut b = [0u8; BLOCK];
            b[..self.buflen].copy_from_slice(&self.buf[..self.buflen]);
            self.ghash.update(&[ghash::Block::from(b)]);
            self.buflen = 0;
        }
    }

    /// Absorb associated data; only valid before any text.
    pub fn add_aad(&mut self, aad: &[u8]) -> CryptResult<()> {
        if self.phase != Phase::Aad {
            return Err(CryptError::InvalidArg);
        }
        self.aadlen = self
            .aadlen
            .checked_add(aad.len() as u64)
            .ok_or(CryptError::Overflow)?;
        self.ghash_bytes(aad);
        Ok(())
    }

    fn begin_text(&mut self) {
        if self.phase == Phase::Aad {
            self.flush_ghash_partial();
            self.phase = Phase::Text;
        }
    }

    fn keystream_byte(&mut self) -> CryptResult<u8> {
        if self.padlen == BLOCK {
            ctr_increment_be(&mut self.ctr, 4);
            let ctr = self.ctr;
            self.key.encrypt_block(&ctr, &mut self.pad)?;
            self.padlen = 0;
        }
        let b = self.pad[self.padlen];
        self.padlen += 1;
        Ok(b)
    }

    /// Encrypt plaintext bytes; any length.
    pub fn encrypt(&mut self, pt: &[u8], ct: &mut [u8]) -> CryptResult<()> {
        if ct.len() < pt.len() {
            return Err(CryptError::BufferOverflow);
        }
        self.begin_text();
        self.textlen = self
            .textlen
            .checked_add(pt.len() as u64)
            .ok_or(CryptError::Overflow)?;
        for (x, byte) in pt.iter().enumerate() {
            ct[x] = byte ^ self.keystream_byte()?;
        }
        let produced = &ct[..pt.len()];
        let mut tmp = produced.to_vec();
        self.ghash_bytes(&tmp);
        tmp.zeroize();
        Ok(())
    }

    /// Decrypt ciphertext bytes; any length.
    pub fn decrypt(&mut self, ct: &[u8], pt: &mut [u8]) -> CryptResult<()> {
        if pt.len() < ct.len() {
            return Err(CryptError::BufferOverflow);
        }
        self.begin_text();
        self.textlen = self
            .textlen
            .checked_add(ct.len() as u64)
            .ok_or(CryptError::Overflow)?;
        let tmp = ct.to_vec();
        self.ghash_bytes(&tmp);
        for (x, byte) in tmp.iter().enumerate() {
            pt[x] = byte ^ self.keystream_byte()?;
        }
        Ok(())
    }

    /// Finish and produce the 16-byte tag.
    pub fn done(mut self) -> CryptResult<Vec<u8>> {
        self.begin_text();
        self.flush_ghash_partial();
        let mut lens = [0u8; BLOCK];
        store64_be(self.aadlen << 3, &mut lens[..8]);
        store64_be(self.textlen << 3, &mut lens[8..]);
        self.ghash.update(&[ghash::Block::from(lens)]);
        let mut tag = self.ghash.clone().finalize().to_vec();
        xor_into(&mut tag, &self.ej0);
        Ok(tag)
    }

    /// Finish a decryption and verify `tag` in constant time.
    pub fn done_verify(self, tag: &[u8]) -> CryptResult<()> {
        verify_tag(self.done()?, tag)
    }
}

/// One-shot GCM encryption; returns `(ciphertext, tag)`.
pub fn gcm_memory_encrypt(
    cipher: usize,
    key: &[u8],
    iv: &[u8],
    aad: &[u8],
    pt: &[u8],
) -> CryptResult<(Vec<u8>, Vec<u8>)> {
    let mut st = GcmState::init(cipher, key, iv)?;
    st.add_aad(aad)?;
    let mut ct = vec![0u8; pt.len()];
    st.encrypt(pt, &mut ct)?;
    let tag = st.done()?;
    Ok((ct, tag))
}

/// One-shot GCM decryption with tag verification.
pub fn gcm_memory_decrypt(
    cipher: usize,
    key: &[u8],
    iv: &[u8],
    aad: &[u8],
    ct: &[u8],
    tag: &[u8],
) -> CryptResult<Vec<u8>> {
    let mut st = GcmState::init(cipher, key, iv)?;
    st.add_aad(aad)?;
    let mut pt = vec![0u8; ct.len()];
    st.decrypt(ct, &mut pt)?;
    st.done_verify(tag)?;
    Ok(pt)
}

#[cfg(test)]
mod tests {
    use super::super::testutil::aes_slot;
    use super::*;

    #[test]
    fn test_gcm_nist_case_1() {
        let key = [0u8; 16];
        let iv = [0u8; 12];
        let (ct, tag) = gcm_memory_encrypt(aes_slot(), &key, &iv, b"", b"").unwrap();
        assert!(ct.is_empty());
        assert_eq!(hex::encode(&tag), "58e2fccefa7e3061367f1d57a4e7455a");
    }

    #[test]
    fn test_gcm_nist_case_2() {
        let key = [0u8; 16];
        let iv = [0u8; 12];
        let pt = [0u8; 16];
        let (ct, tag) = gcm_memory_encrypt(aes_slot(), &key, &iv, b"", &pt).unwrap();
        assert_eq!(hex::encode(&ct), "0388dace60b6a392f328c2b971b2fe78");
        assert_eq!(hex::encode(&tag), "ab6e47d42cec13bdf53a67b21257bddf");
    }

    #[test]
    fn test_gcm_roundtrip_with_aad_and_long_iv() {
        let key = [7u8; 16];
        let iv = [9u8; 16]; // non-96-bit IV takes the GHASH path
        let aad = b"associated data";
        let pt: Vec<u8> = (0u8..61).collect();
        let (ct, tag) = gcm_memory_encrypt(aes_slot(), &key, &iv, aad, &pt).unwrap();
        let back = gcm_memory_decrypt(aes_slot(), &key, &iv, aad, &ct, &tag).unwrap();
        assert_eq!(back, pt);
    }

    #[test]
    fn test_gcm_streaming_matches_one_shot() {
        let key = [3u8; 16];
        let iv = [1u8; 12];
        let aad = b"header bytes";
        let pt: Vec<u8> = (0u8..100).collect();
        let (oneshot_ct, oneshot_tag) =
            gcm_memory_encrypt(aes_slot(), &key, &iv, aad, &pt).unwrap();

        let mut st = GcmState::init(aes_slot(), &key, &iv).unwrap();
        st.add_aad(&aad[..5]).unwrap();
        st.add_aad(&aad[5..]).unwrap();
        let mut ct = vec![0u8; pt.len()];
        let mut off = 0;
        for chunk in pt.chunks(7) {
            st.encrypt(chunk, &mut ct[off..off + chunk.len()]).unwrap();
            off += chunk.len();
        }
        let tag = st.done().unwrap();
        assert_eq!(ct, oneshot_ct);
        assert_eq!(tag, oneshot_tag);
    }

    #[test]
    fn test_gcm_single_bit_flip_fails() {
        let key = [5u8; 16];
        let iv = [6u8; 12];
        let (ct, mut tag) = gcm_memory_encrypt(aes_slot(), &key, &iv, b"a", b"body").unwrap();
        tag[15] ^= 1;
        assert!(gcm_memory_decrypt(aes_slot(), &key, &iv, b"a", &ct, &tag).is_err());
    }

    #[test]
    fn test_gcm_aad_after_text_rejected() {
        let key = [0u8; 16];
        let mut st = GcmState::init(aes_slot(), &key, &[0u8; 12]).unwrap();
        let mut ct = [0u8; 4];
        st.encrypt(b"data", &mut ct).unwrap();
        assert_eq!(st.add_aad(b"late"), Err(CryptError::InvalidArg));
    }
}
