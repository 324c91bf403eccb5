//! Yarrow-style generator: a SHA-256 entropy pool keying an AES counter
//! generator.

use crate::ciphers::aes::AES_DESC;
use crate::error::{CryptError, CryptResult};
use crate::hashes::sha::SHA256_DESC;
use crate::registry::{PrngDescriptor, PrngOps, PrngState, ScheduledKey};
use crate::util::ctr_increment_be;
use zeroize::Zeroize;

const POOL_LEN: usize = 32;
const BLOCK: usize = 16;
// pool(32) || ctr(16) || pad(16) || padlen(1) || ready(1)
const EXPORT_LEN: usize = POOL_LEN + BLOCK + BLOCK + 2;

struct YarrowOps;

static YARROW_OPS: YarrowOps = YarrowOps;

/// Yarrow descriptor record.
pub static YARROW_DESC: PrngDescriptor = PrngDescriptor {
    name: "yarrow",
    export_size: EXPORT_LEN,
    ops: &YARROW_OPS,
};

struct YarrowPrng {
    pool: [u8; POOL_LEN],
    key: Option<Box<dyn ScheduledKey>>,
    ctr: [u8; BLOCK],
    pad: [u8; BLOCK],
    padlen: usize,
}

impl Drop for YarrowPrng {
    fn drop(&mut self) {
        self.pool.zeroize();
        self.ctr.zeroize();
        self.pad.zeroize();
    }
}

impl YarrowPrng {
    fn refill(&mut self) -> CryptResult<()> {
        let key = self.key.as_ref().ok_or(CryptError::ErrorReadprng)?;
        ctr_increment_be(&mut self.ctr, BLOCK);
        let ctr = self.ctr;
        key.encrypt_block(&ctr, &mut self.pad)?;
        self.padlen = 0;
        Ok(())
    }
}

impl PrngState for YarrowPrng {
    fn add_entropy(&mut self, input: &[u8]) -> CryptResult<()> {
        // pool = H(pool || input); reseeding invalidates the generator key
        let mut st = SHA256_DESC.ops.init()?;
        st.process(&self.pool)?;
        st.process(input)?;
        let digest = st.done()?;
        self.pool.copy_from_slice(&digest);
        self.key = None;
        Ok(())
    }

    fn ready(&mut self) -> CryptResult<()> {
        let pool = self.pool;
        self.key = Some(AES_DESC.setup(&pool, 0)?);
        self.ctr = [0u8; BLOCK];
        self.padlen = BLOCK;
        Ok(())
    }

    fn read(&mut self, out: &mut [u8]) -> CryptResult<usize> {
        if self.key.is_none() {
            return Err(CryptError::ErrorReadprng);
        }
        for byte in out.iter_mut() {
            if self.padlen == BLOCK {
                self.refill()?;
            }
            *byte = self.pad[self.padlen];
            self.padlen += 1;
        }
        Ok(out.len())
    }

    fn export(&self) -> CryptResult<Vec<u8>> {
        let mut out = Vec::with_capacity(EXPORT_LEN);
        out.extend_from_slice(&self.pool);
        out.extend_from_slice(&self.ctr);
        out.extend_from_slice(&self.pad);
        out.push(self.padlen as u8);
        out.push(u8::from(self.key.is_some()));
        Ok(out)
    }

    fn import(&mut self, state: &[u8]) -> CryptResult<()> {
        if state.len() != EXPORT_LEN {
            return Err(CryptError::InvalidArg);
        }
        self.pool.copy_from_slice(&state[..POOL_LEN]);
        self.ctr.copy_from_slice(&state[POOL_LEN..POOL_LEN + BLOCK]);
        self.pad
            .copy_from_slice(&state[POOL_LEN + BLOCK..POOL_LEN + 2 * BLOCK]);
        self.padlen = state[EXPORT_LEN - 2] as usize;
        if self.padlen > BLOCK {
            return Err(CryptError::InvalidArg);
        }
        self.key = if state[EXPORT_LEN - 1] != 0 {
            let pool = self.pool;
            Some(AES_DESC.setup(&pool, 0)?)
        } else {
            None
        };
        Ok(())
    }
}

impl PrngOps for YarrowOps {
    fn start(&self) -> CryptResult<Box<dyn PrngState>> {
        Ok(Box::new(YarrowPrng {
            pool: [0u8; POOL_LEN],
            key: None,
            ctr: [0u8; BLOCK],
            pad: [0u8; BLOCK],
            padlen: BLOCK,
        }))
    }

    fn self_test(&self) -> CryptResult<()> {
        super::deterministic_prng_test(&YARROW_DESC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yarrow_deterministic_and_resumable() {
        YARROW_OPS.self_test().unwrap();
    }

    #[test]
    fn test_reseed_changes_stream() {
        let mut a = YARROW_OPS.start().unwrap();
        a.add_entropy(b"seed one").unwrap();
        a.ready().unwrap();
        let mut x = [0u8; 32];
        a.read(&mut x).unwrap();

        let mut b = YARROW_OPS.start().unwrap();
        b.add_entropy(b"seed one").unwrap();
        b.add_entropy(b"more entropy").unwrap();
        b.ready().unwrap();
        let mut y = [0u8; 32];
        b.read(&mut y).unwrap();
        assert_ne!(x, y);
    }

    #[test]
    fn test_add_entropy_resets_ready() {
        let mut a = YARROW_OPS.start().unwrap();
        a.add_entropy(b"seed").unwrap();
        a.ready().unwrap();
        a.add_entropy(b"late entropy").unwrap();
        let mut buf = [0u8; 8];
        assert_eq!(a.read(&mut buf), Err(CryptError::ErrorReadprng));
    }
}
