//! ChaCha20-Poly1305 AEAD (RFC 8439): the one-time Poly1305 key is the
//! first keystream block, text starts at block 1, and the tag covers
//! `A ∥ pad ∥ C ∥ pad ∥ len(A) ∥ len(C)`.

use super::verify_tag;
use crate::error::{CryptError, CryptResult};
use crate::mac::Poly1305State;
use crate::stream::ChaChaState;
use zeroize::Zeroize;

#[derive(PartialEq, Eq)]
enum Phase {
    Aad,
    Text,
}

/// ChaCha20-Poly1305 streaming state. AAD must be absorbed before any text.
pub struct ChaCha20Poly1305State {
    stream: ChaChaState,
    poly: Poly1305State,
    aadlen: u64,
    ctlen: u64,
    phase: Phase,
}

impl ChaCha20Poly1305State {
    /// Key the mode with a 32-byte key and a 12-byte (RFC 8439) or 8-byte
    /// (original construction) nonce.
    pub fn init(key: &[u8], nonce: &[u8]) -> CryptResult<Self> {
        let mut stream = ChaChaState::setup(key, 20)?;
        match nonce.len() {
            12 => stream.ivctr32(nonce, 0)?,
            8 => stream.ivctr64(nonce, 0)?,
            _ => return Err(CryptError::InvalidArg),
        }
        // one-time Poly1305 key = first 32 bytes of block 0
        let mut block0 = [0u8; 64];
        stream.keystream(&mut block0)?;
        let poly = Poly1305State::init(&block0[..32])?;
        block0.zeroize();
        Ok(Self {
            stream,
            poly,
            aadlen: 0,
            ctlen: 0,
            phase: Phase::Aad,
        })
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
        self.poly.process(aad)
    }

    fn pad16(&mut self, len: u64) -> CryptResult<()> {
        let rem = (len % 16) as usize;
        if rem != 0 {
            self.poly.process(&[0u8; 16][..16 - rem])?;
        }
        Ok(())
    }

    fn begin_text(&mut self) -> CryptResult<()> {
        if self.phase == Phase::Aad {
            let aadlen = self.aadlen;
            self.pad16(aadlen)?;
            self.phase = Phase::Text;
        }
        Ok(())
    }

    /// Encrypt plaintext bytes; any length.
    pub fn encrypt(&mut self, pt: &[u8], ct: &mut [u8]) -> CryptResult<()> {
        self.begin_text()?;
        self.stream.crypt(pt, ct)?;
        self.ctlen = self
            .ctlen
            .checked_add(pt.len() as u64)
            .ok_or(CryptError::Overflow)?;
        self.poly.process(&ct[..pt.len()])
    }

    /// Decrypt ciphertext bytes; any length.
    pub fn decrypt(&mut self, ct: &[u8], pt: &mut [u8]) -> CryptResult<()> {
        self.begin_text()?;
        self.poly.process(ct)?;
        self.ctlen = self
            .ctlen
            .checked_add(ct.len() as u64)
            .ok_or(CryptError::Overflow)?;
        self.stream.crypt(ct, pt)
    }

    /// Finish and produce the 16-byte tag.
    pub fn done(mut self) -> CryptResult<Vec<u8>> {
        self.begin_text()?;
        let ctlen = self.ctlen;
        self.pad16(ctlen)?;
        let mut lens = [0u8; 16];
        lens[..8].copy_from_slice(&self.aadlen.to_le_bytes());
        lens[8..].copy_from_slice(&self.ctlen.to_le_bytes());
        self.poly.process(&lens)?;
        self.poly.done()
    }

    /// Finish a decryption and verify `tag` in constant time.
    pub fn done_verify(self, tag: &[u8]) -> CryptResult<()> {
        verify_tag(self.done()?, tag)
    }
}

/// One-shot encryption; returns `(ciphertext, tag)`.
pub fn chacha20poly1305_memory_encrypt(
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    pt: &[u8],
) -> CryptResult<(Vec<u8>, Vec<u8>)> {
    let mut st = ChaCha20Poly1305State::init(key, nonce)?;
    st.add_aad(aad)?;
    let mut ct = vec![0u8; pt.len()];
    st.encrypt(pt, &mut ct)?;
    let tag = st.done()?;
    Ok((ct, tag))
}

/// One-shot decryption with tag verification.
pub fn chacha20poly1305_memory_decrypt(
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    ct: &[u8],
    tag: &[u8],
) -> CryptResult<Vec<u8>> {
    let mut st = ChaCha20Poly1305State::init(key, nonce)?;
    st.add_aad(aad)?;
    let mut pt = vec![0u8; ct.len()];
    st.decrypt(ct, &mut pt)?;
    st.done_verify(tag)?;
    Ok(pt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc8439_sunscreen_vector() {
        let key =
            hex::decode("808182838485868788898a8b8c8d8e8f909192939495969798999a9b9c9d9e9f")
                .unwrap();
        let nonce = hex::decode("070000004041424344454647").unwrap();
        let aad = hex::decode("50515253c0c1c2c3c4c5c6c7").unwrap();
        let pt = b"Ladies and Gentlemen of the class of '99: If I could offer you \
only one tip for the future, sunscreen would be it.";
        let (ct, tag) = chacha20poly1305_memory_encrypt(&key, &nonce, &aad, pt).unwrap();
        assert_eq!(
            hex::encode(&ct[..16]),
            "d31a8d34648e60db7b86afbc53ef7ec2"
        );
        assert_eq!(hex::encode(&tag), "1ae10b594f09e26a7e902ecbd0600691");

        let back = chacha20poly1305_memory_decrypt(&key, &nonce, &aad, &ct, &tag).unwrap();
        assert_eq!(back, pt.to_vec());
    }

    #[test]
    fn test_streaming_matches_one_shot() {
        let key = [0x42u8; 32];
        let nonce = [7u8; 12];
        let aad = b"some header";
        let pt: Vec<u8> = (0u8..130).collect();
        let (oneshot_ct, oneshot_tag) =
            chacha20poly1305_memory_encrypt(&key, &nonce, aad, &pt).unwrap();

        let mut st = ChaCha20Poly1305State::init(&key, &nonce).unwrap();
        st.add_aad(&aad[..4]).unwrap();
        st.add_aad(&aad[4..]).unwrap();
        let mut ct = vec![0u8; pt.len()];
        let mut off = 0;
        for chunk in pt.chunks(23) {
            st.encrypt(chunk, &mut ct[off..off + chunk.len()]).unwrap();
            off += chunk.len();
        }
        assert_eq!(ct, oneshot_ct);
        assert_eq!(st.done().unwrap(), oneshot_tag);
    }

    #[test]
    fn test_aad_flip_fails() {
        let key = [1u8; 32];
        let nonce = [2u8; 12];
        let (ct, tag) =
            chacha20poly1305_memory_encrypt(&key, &nonce, b"aad", b"message").unwrap();
        assert!(chacha20poly1305_memory_decrypt(&key, &nonce, b"aae", &ct, &tag).is_err());
    }

    #[test]
    fn test_eight_byte_nonce_accepted() {
        let key = [9u8; 32];
        let nonce = [3u8; 8];
        let (ct, tag) = chacha20poly1305_memory_encrypt(&key, &nonce, b"", b"legacy").unwrap();
        let back = chacha20poly1305_memory_decrypt(&key, &nonce, b"", &ct, &tag).unwrap();
        assert_eq!(back, b"legacy");
    }
}
