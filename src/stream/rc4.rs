//! RC4 stream cipher, implemented natively.
//!
//! The permutation lives in the state struct so the PRNG adapter can export
//! and re-import it byte-for-byte. Legacy interchange only.

use crate::error::{CryptError, CryptResult};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A keyed RC4 state.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Rc4State {
    s: [u8; 256],
    i: u8,
    j: u8,
}

impl Rc4State {
    /// Key the permutation. Keys of 5..=256 bytes are accepted.
    pub fn setup(key: &[u8]) -> CryptResult<Self> {
        if key.is_empty() || key.len() > 256 || key.len() < 5 {
            return Err(CryptError::InvalidKeysize);
        }
        let mut s = [0u8; 256];
        for (x, v) in s.iter_mut().enumerate() {
            *v = x as u8;
        }
        let mut j = 0u8;
        for x in 0..256 {
            j = j
                .wrapping_add(s[x])
                .wrapping_add(key[x % key.len()]);
            s.swap(x, j as usize);
        }
        Ok(Self { s, i: 0, j: 0 })
    }

    /// XOR keystream over `input` into `output`.
    pub fn crypt(&mut self, input: &[u8], output: &mut [u8]) -> CryptResult<()> {
        if output.len() < input.len() {
            return Err(CryptError::BufferOverflow);
        }
        for (x, byte) in input.iter().enumerate() {
            output[x] = byte ^ self.next_byte();
        }
        Ok(())
    }

    /// Produce raw keystream: zero `out`, then crypt it in place.
    pub fn keystream(&mut self, out: &mut [u8]) -> CryptResult<()> {
        for b in out.iter_mut() {
            *b = self.next_byte();
        }
        Ok(())
    }

    /// Consume the state, wiping the permutation.
    pub fn done(self) {}

    pub(crate) fn next_byte(&mut self) -> u8 {
        self.i = self.i.wrapping_add(1);
        self.j = self.j.wrapping_add(self.s[self.i as usize]);
        self.s.swap(self.i as usize, self.j as usize);
        let t = self.s[self.i as usize].wrapping_add(self.s[self.j as usize]);
        self.s[t as usize]
    }

    pub(crate) fn export_raw(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(258);
        out.extend_from_slice(&self.s);
        out.push(self.i);
        out.push(self.j);
        out
    }

    pub(crate) fn import_raw(raw: &[u8]) -> CryptResult<Self> {
        if raw.len() != 258 {
            return Err(CryptError::InvalidArg);
        }
        let mut s = [0u8; 256];
        s.copy_from_slice(&raw[..256]);
        Ok(Self {
            s,
            i: raw[256],
            j: raw[257],
        })
    }
}

/// Embedded known-answer test (RFC 6229, 40-bit key).
pub fn rc4_test() -> CryptResult<()> {
    let key = hex::decode("0102030405").map_err(|_| CryptError::Error)?;
    let mut st = Rc4State::setup(&key)?;
    let mut ks = [0u8; 8];
    st.keystream(&mut ks)?;
    let expect = hex::decode("b2396305f03dc027").map_err(|_| CryptError::Error)?;
    if ks != expect[..] {
        return Err(CryptError::FailTestvector);
    }
    Ok(())
}
