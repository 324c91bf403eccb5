//! Poly1305 one-time authenticator (RFC 8439).

use crate::error::{CryptError, CryptResult};
use poly1305::Poly1305;
use universal_hash::{KeyInit, UniversalHash};
use zeroize::Zeroize;

const BLOCK: usize = 16;

/// Poly1305 streaming state. The 32-byte key must be used for one message
/// only.
pub struct Poly1305State {
    inner: Poly1305,
    buf: [u8; BLOCK],
    buflen: usize,
}

impl Poly1305State {
    /// Key the authenticator with a 32-byte one-time key.
    pub fn init(key: &[u8]) -> CryptResult<Self> {
        if key.len() != 32 {
            return Err(CryptError::InvalidKeysize);
        }
        let inner = Poly1305::new_from_slice(key).map_err(|_| CryptError::InvalidKeysize)?;
        Ok(Self {
            inner,
            buf: [0u8; BLOCK],
            buflen: 0,
        })
    }

    /// Absorb message bytes.
    pub fn process(&mut self, mut data: &[u8]) -> CryptResult<()> {
        while !data.is_empty() {
            if self.buflen == 0 && data.len() >= BLOCK {
                let blocks = data.len() / BLOCK;
                let (head, rest) = data.split_at(blocks * BLOCK);
                for block in head.chunks_exact(BLOCK) {
                    self.inner
                        .update(&[*poly1305::Block::from_slice(block)]);
                }
                data = rest;
            } else {
                let take = (BLOCK - self.buflen).min(data.len());
                self.buf[self.buflen..self.buflen + take].copy_from_slice(&data[..take]);
                self.buflen += take;
                data = &data[take..];
                if self.buflen == BLOCK {
                    let buf = self.buf;
                    self.inner.update(&[*poly1305::Block::from_slice(&buf)]);
                    self.buflen = 0;
                }
            }
        }
        Ok(())
    }

    /// Finish; returns the 16-byte tag.
    pub fn done(mut self) -> CryptResult<Vec<u8>> {
        let tag = if self.buflen == 0 {
            self.inner.finalize()
        } else {
            let buflen = self.buflen;
            let buf = self.buf;
            self.buf.zeroize();
            self.inner.compute_unpadded(&buf[..buflen])
        };
        Ok(tag.to_vec())
    }

    /// Finish, writing the leading bytes of the tag into `out`.
    pub fn done_into(self, out: &mut [u8]) -> CryptResult<usize> {
        let tag = self.done()?;
        Ok(super::clamp_tag(&tag, out))
    }
}

/// One-shot Poly1305 of `data`.
pub fn poly1305_memory(key: &[u8], data: &[u8]) -> CryptResult<Vec<u8>> {
    let mut st = Poly1305State::init(key)?;
    st.process(data)?;
    st.done()
}
