//! ChaCha20-based generator: entropy folds into a 40-byte key/nonce block,
//! output is raw keystream.

use crate::error::{CryptError, CryptResult};
use crate::registry::{PrngDescriptor, PrngOps, PrngState};
use crate::stream::ChaChaState;
use zeroize::Zeroize;

const SEED_LEN: usize = 40; // key(32) || nonce(8)
const EXPORT_LEN: usize = SEED_LEN + 8; // plus byte position

struct ChaChaPrngOps;

static CHACHA20_PRNG_OPS: ChaChaPrngOps = ChaChaPrngOps;

/// ChaCha20 PRNG descriptor record.
pub static CHACHA20_PRNG_DESC: PrngDescriptor = PrngDescriptor {
    name: "chacha20",
    export_size: EXPORT_LEN,
    ops: &CHACHA20_PRNG_OPS,
};

struct ChaChaPrng {
    seed: [u8; SEED_LEN],
    ent_idx: usize,
    stream: Option<ChaChaState>,
    pos: u64,
}

impl Drop for ChaChaPrng {
    fn drop(&mut self) {
        self.seed.zeroize();
    }
}

impl ChaChaPrng {
    fn restart(&mut self, pos: u64) -> CryptResult<()> {
        let mut st = ChaChaState::setup(&self.seed[..32], 20)?;
        st.ivctr64(&self.seed[32..], 0)?;
        // burn to the requested byte position
        let mut skip = pos;
        let mut sink = [0u8; 64];
        while skip > 0 {
            let take = skip.min(64) as usize;
            st.keystream(&mut sink[..take])?;
            skip -= take as u64;
        }
        sink.zeroize();
        self.stream = Some(st);
        self.pos = pos;
        Ok(())
    }
}

impl PrngState for ChaChaPrng {
    fn add_entropy(&mut self, input: &[u8]) -> CryptResult<()> {
        for byte in input {
            self.seed[self.ent_idx] ^= *byte;
            self.ent_idx = (self.ent_idx + 1) % SEED_LEN;
        }
        self.stream = None;
        Ok(())
    }

    fn ready(&mut self) -> CryptResult<()> {
        self.restart(0)
    }

    fn read(&mut self, out: &mut [u8]) -> CryptResult<usize> {
        let stream = self.stream.as_mut().ok_or(CryptError::ErrorReadprng)?;
        stream.keystream(out)?;
        self.pos = self
            .pos
            .checked_add(out.len() as u64)
            .ok_or(CryptError::Overflow)?;
        Ok(out.len())
    }

    fn export(&self) -> CryptResult<Vec<u8>> {
        if self.stream.is_none() {
            return Err(CryptError::ErrorReadprng);
        }
        let mut out = Vec::with_capacity(EXPORT_LEN);
        out.extend_from_slice(&self.seed);
        out.extend_from_slice(&self.pos.to_be_bytes());
        Ok(out)
    }

    fn import(&mut self, state: &[u8]) -> CryptResult<()> {
        if state.len() != EXPORT_LEN {
            return Err(CryptError::InvalidArg);
        }
        self.seed.copy_from_slice(&state[..SEED_LEN]);
        self.ent_idx = 0;
        let mut pos_bytes = [0u8; 8];
        pos_bytes.copy_from_slice(&state[SEED_LEN..]);
        self.restart(u64::from_be_bytes(pos_bytes))
    }
}

impl PrngOps for ChaChaPrngOps {
    fn start(&self) -> CryptResult<Box<dyn PrngState>> {
        Ok(Box::new(ChaChaPrng {
            seed: [0u8; SEED_LEN],
            ent_idx: 0,
            stream: None,
            pos: 0,
        }))
    }

    fn self_test(&self) -> CryptResult<()> {
        super::deterministic_prng_test(&CHACHA20_PRNG_DESC)
    }
}
