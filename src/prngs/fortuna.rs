//! Fortuna generator: 32 SHA-256 entropy pools feeding an AES-256 counter
//! generator that rekeys itself after every read.

use crate::ciphers::aes::AES_DESC;
use crate::error::{CryptError, CryptResult};
use crate::hashes::sha::SHA256_DESC;
use crate::registry::{HashState, PrngDescriptor, PrngOps, PrngState, ScheduledKey};
use crate::util::ctr_increment_le;
use zeroize::Zeroize;

const NUM_POOLS: usize = 32;
const KEY_LEN: usize = 32;
const BLOCK: usize = 16;
// key(32) || ctr(16) || per-pool digests (32 * 32)
const EXPORT_LEN: usize = KEY_LEN + BLOCK + NUM_POOLS * KEY_LEN;

struct FortunaOps;

static FORTUNA_OPS: FortunaOps = FortunaOps;

/// Fortuna descriptor record.
pub static FORTUNA_DESC: PrngDescriptor = PrngDescriptor {
    name: "fortuna",
    export_size: EXPORT_LEN,
    ops: &FORTUNA_OPS,
};

struct FortunaPrng {
    pools: Vec<Box<dyn HashState>>,
    pool_idx: usize,
    pool0_len: usize,
    key: [u8; KEY_LEN],
    ctr: [u8; BLOCK],
    skey: Option<Box<dyn ScheduledKey>>,
    reset_cnt: u64,
}

impl Drop for FortunaPrng {
    fn drop(&mut self) {
        self.key.zeroize();
        self.ctr.zeroize();
    }
}

impl FortunaPrng {
    fn fresh_pools() -> CryptResult<Vec<Box<dyn HashState>>> {
        let mut pools = Vec::with_capacity(NUM_POOLS);
        for _ in 0..NUM_POOLS {
            pools.push(SHA256_DESC.ops.init()?);
        }
        Ok(pools)
    }

    fn reseed(&mut self) -> CryptResult<()> {
        self.reset_cnt += 1;
        let mut st = SHA256_DESC.ops.init()?;
        st.process(&self.key)?;
        for (x, pool) in self.pools.iter_mut().enumerate() {
            // pool x participates every 2^x-th reseed
            if x == 0 || self.reset_cnt % (1u64 << x.min(63)) == 0 {
                let drained = std::mem::replace(pool, SHA256_DESC.ops.init()?);
                st.process(&drained.done()?)?;
            }
        }
        let digest = st.done()?;
        self.key.copy_from_slice(&digest);
        let key = self.key;
        self.skey = Some(AES_DESC.setup(&key, 0)?);
        ctr_increment_le(&mut self.ctr, BLOCK);
        self.pool0_len = 0;
        Ok(())
    }

    fn generate(&mut self, out: &mut [u8]) -> CryptResult<()> {
        let skey = self.skey.as_ref().ok_or(CryptError::ErrorReadprng)?;
        let mut pad = [0u8; BLOCK];
        for chunk in out.chunks_mut(BLOCK) {
            let ctr = self.ctr;
            skey.encrypt_block(&ctr, &mut pad)?;
            ctr_increment_le(&mut self.ctr, BLOCK);
            chunk.copy_from_slice(&pad[..chunk.len()]);
        }
        pad.zeroize();
        Ok(())
    }

    fn rekey(&mut self) -> CryptResult<()> {
        let mut newkey = [0u8; KEY_LEN];
        self.generate(&mut newkey)?;
        self.key = newkey;
        let key = self.key;
        self.skey = Some(AES_DESC.setup(&key, 0)?);
        newkey.zeroize();
        Ok(())
    }
}

impl PrngState for FortunaPrng {
    fn add_entropy(&mut self, input: &[u8]) -> CryptResult<()> {
        self.pools[self.pool_idx].process(input)?;
        if self.pool_idx == 0 {
            self.pool0_len += input.len();
        }
        self.pool_idx = (self.pool_idx + 1) % NUM_POOLS;
        Ok(())
    }

    fn ready(&mut self) -> CryptResult<()> {
        // the first seeding needs at least some entropy in pool 0
        if self.skey.is_none() && self.pool0_len == 0 {
            return Err(CryptError::ErrorReadprng);
        }
        self.reseed()
    }

    fn read(&mut self, out: &mut [u8]) -> CryptResult<usize> {
        if self.skey.is_none() {
            return Err(CryptError::ErrorReadprng);
        }
        self.generate(out)?;
        // forward secrecy: replace the generator key after every request
        self.rekey()?;
        Ok(out.len())
    }

    fn export(&self) -> CryptResult<Vec<u8>> {
        if self.skey.is_none() {
            return Err(CryptError::ErrorReadprng);
        }
        let mut out = Vec::with_capacity(EXPORT_LEN);
        out.extend_from_slice(&self.key);
        out.extend_from_slice(&self.ctr);
        for pool in &self.pools {
            out.extend_from_slice(&pool.clone_state().done()?);
        }
        Ok(out)
    }

    fn import(&mut self, state: &[u8]) -> CryptResult<()> {
        if state.len() != EXPORT_LEN {
            return Err(CryptError::InvalidArg);
        }
        self.key.copy_from_slice(&state[..KEY_LEN]);
        self.ctr.copy_from_slice(&state[KEY_LEN..KEY_LEN + BLOCK]);
        self.pools = Self::fresh_pools()?;
        self.pool_idx = 0;
        self.pool0_len = 0;
        for (x, pool) in self.pools.iter_mut().enumerate() {
            let off = KEY_LEN + BLOCK + x * KEY_LEN;
            pool.process(&state[off..off + KEY_LEN])?;
        }
        let key = self.key;
        self.skey = Some(AES_DESC.setup(&key, 0)?);
        Ok(())
    }
}

impl PrngOps for FortunaOps {
    fn start(&self) -> CryptResult<Box<dyn PrngState>> {
        Ok(Box::new(FortunaPrng {
            pools: FortunaPrng::fresh_pools()?,
            pool_idx: 0,
            pool0_len: 0,
            key: [0u8; KEY_LEN],
            ctr: [0u8; BLOCK],
            skey: None,
            reset_cnt: 0,
        }))
    }

    fn self_test(&self) -> CryptResult<()> {
        super::deterministic_prng_test(&FORTUNA_DESC)
    }
}
