//! CHC — the cipher-hash construction.
//!
//! Builds a Matyas–Meyer–Oseas compression function over a registered
//! 128-bit block cipher that accepts 16-byte keys: the running state keys
//! the cipher, each message block is enciphered and folded back in, and the
//! final block carries MD-strengthening (0x80 pad plus the 64-bit message
//! bit length).
//!
//! The construction must be bound to a cipher with [`chc_register`] before
//! the descriptor is usable.

use crate::error::{CryptError, CryptResult};
use crate::registry::{self, CipherDescriptor, HashDescriptor, HashOps, HashState};
use crate::util::store64_be;
use std::sync::atomic::{AtomicUsize, Ordering};
use zeroize::Zeroize;

const BLOCK: usize = 16;
const UNBOUND: usize = usize::MAX;

static CHC_CIPHER: AtomicUsize = AtomicUsize::new(UNBOUND);

struct ChcOps;

static CHC_OPS: ChcOps = ChcOps;

/// CHC descriptor record. Register it only after [`chc_register`].
pub static CHC_DESC: HashDescriptor = HashDescriptor {
    name: "chc_hash",
    id: 12,
    oid: "",
    digest_size: BLOCK,
    block_size: BLOCK,
    ops: &CHC_OPS,
};

/// Bind the construction to a cipher slot. The cipher must have 16-byte
/// blocks and accept a 16-byte key.
pub fn chc_register(cipher: usize) -> CryptResult<()> {
    let desc = registry::cipher_descriptor(cipher)?;
    if desc.block_length != BLOCK || !desc.key_sizes.accepts(BLOCK) {
        return Err(CryptError::InvalidCipher);
    }
    CHC_CIPHER.store(cipher, Ordering::SeqCst);
    Ok(())
}

fn bound_cipher() -> CryptResult<&'static CipherDescriptor> {
    let slot = CHC_CIPHER.load(Ordering::SeqCst);
    if slot == UNBOUND {
        return Err(CryptError::InvalidCipher);
    }
    registry::cipher_descriptor(slot)
}

struct ChcState {
    desc: &'static CipherDescriptor,
    state: [u8; BLOCK],
    buf: [u8; BLOCK],
    buflen: usize,
    length: u64,
}

impl ChcState {
    fn compress(&mut self, block: &[u8]) -> CryptResult<()> {
        let sk = self.desc.setup(&self.state, 0)?;
        let mut out = [0u8; BLOCK];
        sk.encrypt_block(block, &mut out)?;
        for (s, (o, m)) in self.state.iter_mut().zip(out.iter().zip(block.iter())) {
            *s = *o ^ *m;
        }
        Ok(())
    }
}

impl HashState for ChcState {
    fn process(&mut self, mut data: &[u8]) -> CryptResult<()> {
        self.length = self
            .length
            .checked_add((data.len() as u64) << 3)
            .ok_or(CryptError::Overflow)?;
        while !data.is_empty() {
            if self.buflen == 0 && data.len() >= BLOCK {
                let (block, rest) = data.split_at(BLOCK);
                let mut tmp = [0u8; BLOCK];
                tmp.copy_from_slice(block);
                self.compress(&tmp)?;
                data = rest;
            } else {
                let take = (BLOCK - self.buflen).min(data.len());
                self.buf[self.buflen..self.buflen + take].copy_from_slice(&data[..take]);
                self.buflen += take;
                data = &data[take..];
                if self.buflen == BLOCK {
                    let tmp = self.buf;
                    self.compress(&tmp)?;
                    self.buflen = 0;
                }
            }
        }
        Ok(())
    }

    fn done(mut self: Box<Self>) -> CryptResult<Vec<u8>> {
        self.buf[self.buflen] = 0x80;
        for b in &mut self.buf[self.buflen + 1..] {
            *b = 0;
        }
        if self.buflen + 1 > BLOCK - 8 {
            let tmp = self.buf;
            self.compress(&tmp)?;
            self.buf = [0u8; BLOCK];
        }
        let length = self.length;
        store64_be(length, &mut self.buf[BLOCK - 8..]);
        let tmp = self.buf;
        self.compress(&tmp)?;
        let digest = self.state.to_vec();
        self.state.zeroize();
        self.buf.zeroize();
        Ok(digest)
    }

    fn clone_state(&self) -> Box<dyn HashState> {
        Box::new(ChcState {
            desc: self.desc,
            state: self.state,
            buf: self.buf,
            buflen: self.buflen,
            length: self.length,
        })
    }
}

impl HashOps for ChcOps {
    fn init(&self) -> CryptResult<Box<dyn HashState>> {
        let desc = bound_cipher()?;
        Ok(Box::new(ChcState {
            desc,
            state: [0u8; BLOCK],
            buf: [0u8; BLOCK],
            buflen: 0,
            length: 0,
        }))
    }

    fn self_test(&self) -> CryptResult<()> {
        if CHC_CIPHER.load(Ordering::SeqCst) == UNBOUND {
            return Err(CryptError::Nop);
        }
        // streaming must agree with one-shot and the output must depend on
        // every input block
        let data: Vec<u8> = (0u8..100).collect();
        let oneshot = CHC_DESC.hash_memory(&data)?;
        let mut st = self.init()?;
        for chunk in data.chunks(7) {
            st.process(chunk)?;
        }
        if st.done()? != oneshot {
            return Err(CryptError::FailTestvector);
        }
        let mut flipped = data.clone();
        flipped[0] ^= 1;
        if CHC_DESC.hash_memory(&flipped)? == oneshot {
            return Err(CryptError::FailTestvector);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{find_cipher, register_all_ciphers};

    #[test]
    fn test_chc_requires_registration() {
        register_all_ciphers().unwrap();
        chc_register(find_cipher("aes").unwrap()).unwrap();
        CHC_OPS.self_test().unwrap();
    }

    #[test]
    fn test_chc_rejects_small_block_cipher() {
        register_all_ciphers().unwrap();
        let des = find_cipher("des").unwrap();
        assert_eq!(chc_register(des), Err(CryptError::InvalidCipher));
    }

    #[test]
    fn test_chc_digest_is_block_sized() {
        register_all_ciphers().unwrap();
        chc_register(find_cipher("aes").unwrap()).unwrap();
        let digest = CHC_DESC.hash_memory(b"hello world").unwrap();
        assert_eq!(digest.len(), 16);
    }
}
