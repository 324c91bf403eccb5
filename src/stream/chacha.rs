//! ChaCha stream cipher with the RFC 8439 (96-bit nonce / 32-bit counter)
//! and original djb (64-bit nonce / 64-bit counter) layouts.

use crate::error::{CryptError, CryptResult};
use chacha20::{ChaCha12, ChaCha20, ChaCha20Legacy, ChaCha8};
use cipher::{KeyIvInit, StreamCipher, StreamCipherSeek};
use zeroize::Zeroize;

enum Inner {
    R8(ChaCha8),
    R12(ChaCha12),
    R20(ChaCha20),
    Legacy(ChaCha20Legacy),
}

/// A keyed ChaCha stream state.
pub struct ChaChaState {
    key: [u8; 32],
    rounds: u32,
    inner: Option<Inner>,
}

impl Drop for ChaChaState {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

impl ChaChaState {
    /// Key the state. `rounds` of 0 selects 20; 8, 12 and 20 are accepted.
    pub fn setup(key: &[u8], rounds: u32) -> CryptResult<Self> {
        if key.len() != 32 {
            return Err(CryptError::InvalidKeysize);
        }
        let rounds = if rounds == 0 { 20 } else { rounds };
        if !matches!(rounds, 8 | 12 | 20) {
            return Err(CryptError::InvalidRounds);
        }
        let mut k = [0u8; 32];
        k.copy_from_slice(key);
        Ok(Self {
            key: k,
            rounds,
            inner: None,
        })
    }

    /// Start the stream at a 12-byte nonce and 32-bit block counter
    /// (RFC 8439 layout).
    pub fn ivctr32(&mut self, iv: &[u8], counter: u32) -> CryptResult<()> {
        if iv.len() != 12 {
            return Err(CryptError::InvalidArg);
        }
        let key = self.key.into();
        let nonce = chacha20::Nonce::from_slice(iv);
        let mut inner = match self.rounds {
            8 => Inner::R8(ChaCha8::new(&key, nonce)),
            12 => Inner::R12(ChaCha12::new(&key, nonce)),
            _ => Inner::R20(ChaCha20::new(&key, nonce)),
        };
        let pos = (counter as u64) * 64;
        match &mut inner {
            Inner::R8(c) => c.try_seek(pos),
            Inner::R12(c) => c.try_seek(pos),
            Inner::R20(c) => c.try_seek(pos),
            Inner::Legacy(c) => c.try_seek(pos),
        }
        .map_err(|_| CryptError::InvalidArg)?;
        self.inner = Some(inner);
        Ok(())
    }

    /// Start the stream at an 8-byte nonce and 64-bit block counter
    /// (original djb layout; 20 rounds only).
    pub fn ivctr64(&mut self, iv: &[u8], counter: u64) -> CryptResult<()> {
        if iv.len() != 8 {
            return Err(CryptError::InvalidArg);
        }
        if self.rounds != 20 {
            return Err(CryptError::InvalidRounds);
        }
        let key = self.key.into();
        let nonce = chacha20::LegacyNonce::from_slice(iv);
        let mut cipher = ChaCha20Legacy::new(&key, nonce);
        let pos = counter.checked_mul(64).ok_or(CryptError::Overflow)?;
        cipher.try_seek(pos).map_err(|_| CryptError::InvalidArg)?;
        self.inner = Some(Inner::Legacy(cipher));
        Ok(())
    }

    /// XOR keystream over `input` into `output`.
    pub fn crypt(&mut self, input: &[u8], output: &mut [u8]) -> CryptResult<()> {
        if output.len() < input.len() {
            return Err(CryptError::BufferOverflow);
        }
        let inner = self.inner.as_mut().ok_or(CryptError::InvalidArg)?;
        let out = &mut output[..input.len()];
        let res = match inner {
            Inner::R8(c) => c.apply_keystream_b2b(input, out),
            Inner::R12(c) => c.apply_keystream_b2b(input, out),
            Inner::R20(c) => c.apply_keystream_b2b(input, out),
            Inner::Legacy(c) => c.apply_keystream_b2b(input, out),
        };
        res.map_err(|_| CryptError::Overflow)
    }

    /// Produce raw keystream: zero `out`, then crypt it in place.
    pub fn keystream(&mut self, out: &mut [u8]) -> CryptResult<()> {
        if out.is_empty() {
            return Ok(());
        }
        out.fill(0);
        let inner = self.inner.as_mut().ok_or(CryptError::InvalidArg)?;
        match inner {
            Inner::R8(c) => c.try_apply_keystream(out),
            Inner::R12(c) => c.try_apply_keystream(out),
            Inner::R20(c) => c.try_apply_keystream(out),
            Inner::Legacy(c) => c.try_apply_keystream(out),
        }
        .map_err(|_| CryptError::Overflow)
    }

    /// Wipe the state.
    pub fn done(mut self) {
        self.key.zeroize();
        self.inner = None;
    }
}

/// One-shot helper; the IV length selects the layout (8 → djb 64-bit
/// counter, 12 → RFC 8439 32-bit counter).
pub fn chacha_memory(
    key: &[u8],
    rounds: u32,
    iv: &[u8],
    counter: u64,
    input: &[u8],
) -> CryptResult<Vec<u8>> {
    let mut st = ChaChaState::setup(key, rounds)?;
    match iv.len() {
        8 => st.ivctr64(iv, counter)?,
        12 => st.ivctr32(iv, u32::try_from(counter).map_err(|_| CryptError::InvalidArg)?)?,
        _ => return Err(CryptError::InvalidArg),
    }
    let mut out = vec![0u8; input.len()];
    st.crypt(input, &mut out)?;
    st.done();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc8439_keystream_block() {
        // RFC 8439 §2.3.2 block function test vector, counter 1
        let key: Vec<u8> =
            hex::decode("000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f")
                .unwrap();
        let iv = hex::decode("000000090000004a00000000").unwrap();
        let mut st = ChaChaState::setup(&key, 20).unwrap();
        st.ivctr32(&iv, 1).unwrap();
        let mut ks = [0u8; 64];
        st.keystream(&mut ks).unwrap();
        let expect = hex::decode(
            "10f1e7e4d13b5915500fdd1fa32071c4c7d1f4c733c068030422aa9ac3d46c4e\
             d2826446079faa0914c2d705d98b02a2b5129cd1de164eb9cbd083e8a2503c4e",
        )
        .unwrap();
        assert_eq!(&ks[..], &expect[..]);
    }

    #[test]
    fn test_chunked_equals_one_shot() {
        let key = [3u8; 32];
        let iv = [5u8; 8];
        let data: Vec<u8> = (0u8..130).collect();
        let oneshot = chacha_memory(&key, 20, &iv, 0, &data).unwrap();

        let mut st = ChaChaState::setup(&key, 20).unwrap();
        st.ivctr64(&iv, 0).unwrap();
        let mut out = vec![0u8; data.len()];
        let mut off = 0;
        for chunk in data.chunks(13) {
            st.crypt(chunk, &mut out[off..off + chunk.len()]).unwrap();
            off += chunk.len();
        }
        assert_eq!(out, oneshot);
    }

    #[test]
    fn test_legacy_requires_20_rounds() {
        let mut st = ChaChaState::setup(&[0u8; 32], 12).unwrap();
        assert_eq!(st.ivctr64(&[0u8; 8], 0), Err(CryptError::InvalidRounds));
    }
}
