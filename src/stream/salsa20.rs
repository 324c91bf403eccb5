//! Salsa20 stream cipher (8-, 12- or 20-round) with a 64-bit nonce/counter
//! layout.

use crate::error::{CryptError, CryptResult};
use cipher::{KeyIvInit, StreamCipher, StreamCipherSeek};
use salsa20::{Salsa12, Salsa20, Salsa8};
use zeroize::Zeroize;

enum Inner {
    R8(Salsa8),
    R12(Salsa12),
    R20(Salsa20),
}

/// A keyed Salsa20 stream state.
///
/// `setup` stores the key and round count; `ivctr64` (re)starts the stream
/// at a nonce and block counter; `crypt` XORs the keystream over any number
/// of bytes, buffering partial blocks across calls.
pub struct Salsa20State {
    key: [u8; 32],
    rounds: u32,
    inner: Option<Inner>,
}

impl Drop for Salsa20State {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

impl Salsa20State {
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

    /// Start the stream at an 8-byte nonce and 64-bit block counter.
    pub fn ivctr64(&mut self, iv: &[u8], counter: u64) -> CryptResult<()> {
        if iv.len() != 8 {
            return Err(CryptError::InvalidArg);
        }
        let key = self.key.into();
        let nonce = salsa20::Nonce::from_slice(iv);
        let mut inner = match self.rounds {
            8 => Inner::R8(Salsa8::new(&key, nonce)),
            12 => Inner::R12(Salsa12::new(&key, nonce)),
            _ => Inner::R20(Salsa20::new(&key, nonce)),
        };
        let pos = counter.checked_mul(64).ok_or(CryptError::Overflow)?;
        match &mut inner {
            Inner::R8(c) => c.try_seek(pos),
            Inner::R12(c) => c.try_seek(pos),
            Inner::R20(c) => c.try_seek(pos),
        }
        .map_err(|_| CryptError::InvalidArg)?;
        self.inner = Some(inner);
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
        }
        .map_err(|_| CryptError::Overflow)
    }

    /// Wipe the state.
    pub fn done(mut self) {
        self.key.zeroize();
        self.inner = None;
    }
}

/// One-shot helper: key, start at `(iv, counter)` and crypt `input`.
pub fn salsa20_memory(
    key: &[u8],
    rounds: u32,
    iv: &[u8],
    counter: u64,
    input: &[u8],
) -> CryptResult<Vec<u8>> {
    let mut st = Salsa20State::setup(key, rounds)?;
    st.ivctr64(iv, counter)?;
    let mut out = vec![0u8; input.len()];
    st.crypt(input, &mut out)?;
    st.done();
    Ok(out)
}

/// Embedded known-answer test: the 12- and 20-round "Kilroy" vectors,
/// processed both chunked and in one call.
pub fn salsa20_test() -> CryptResult<()> {
    let key = hex::decode("000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f")
        .map_err(|_| CryptError::Error)?;
    let nonce = hex::decode("000000000000004a").map_err(|_| CryptError::Error)?;
    let pt = b"Kilroy was here, and there. ...and everywhere!";
    let ct12 = hex::decode(
        "37372e60b8ae881ff8df00266c30342da1d779606772e0672622ad009ed5594451d9e6aac9599e60ff8790c1c91e",
    )
    .map_err(|_| CryptError::Error)?;
    let ct20 = hex::decode(
        "ec0632b3835cae9101827a71d97d45d7a65ba0899dd26caabb2f5f308954ff3e83c33410b6e1abe7f5ababeda4ff",
    )
    .map_err(|_| CryptError::Error)?;

    // 12 rounds, chunked 5/25/10/rest
    let mut st = Salsa20State::setup(&key, 12)?;
    st.ivctr64(&nonce, 0)?;
    let mut out = vec![0u8; pt.len()];
    st.crypt(&pt[..5], &mut out[..5])?;
    st.crypt(&pt[5..30], &mut out[5..30])?;
    st.crypt(&pt[30..40], &mut out[30..40])?;
    st.crypt(&pt[40..], &mut out[40..])?;
    if out != ct12 {
        return Err(CryptError::FailTestvector);
    }

    // 20 rounds, one go
    let out = salsa20_memory(&key, 20, &nonce, 0, pt)?;
    if out != ct20 {
        return Err(CryptError::FailTestvector);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salsa20_kilroy_vectors() {
        salsa20_test().unwrap();
    }

    #[test]
    fn test_keystream_equals_zero_encryption() {
        let key = [7u8; 32];
        let iv = [9u8; 8];
        let mut a = Salsa20State::setup(&key, 20).unwrap();
        a.ivctr64(&iv, 0).unwrap();
        let mut ks = [0u8; 100];
        a.keystream(&mut ks).unwrap();

        let mut b = Salsa20State::setup(&key, 20).unwrap();
        b.ivctr64(&iv, 0).unwrap();
        let zeros = [0u8; 100];
        let mut enc = [0u8; 100];
        b.crypt(&zeros, &mut enc).unwrap();
        assert_eq!(ks, enc);
    }

    #[test]
    fn test_crypt_before_iv_rejected() {
        let mut st = Salsa20State::setup(&[0u8; 32], 0).unwrap();
        let mut out = [0u8; 4];
        assert_eq!(st.crypt(b"abcd", &mut out), Err(CryptError::InvalidArg));
    }

    #[test]
    fn test_counter_offsets_stream() {
        let key = [1u8; 32];
        let iv = [2u8; 8];
        let mut a = Salsa20State::setup(&key, 20).unwrap();
        a.ivctr64(&iv, 0).unwrap();
        let mut ks = [0u8; 128];
        a.keystream(&mut ks).unwrap();

        let mut b = Salsa20State::setup(&key, 20).unwrap();
        b.ivctr64(&iv, 1).unwrap();
        let mut ks2 = [0u8; 64];
        b.keystream(&mut ks2).unwrap();
        assert_eq!(&ks[64..], &ks2[..]);
    }
}
