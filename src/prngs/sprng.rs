//! System passthrough generator. Entropy acquisition itself is the host's
//! business; this descriptor just forwards reads to the OS provider.

use crate::error::{CryptError, CryptResult};
use crate::registry::{PrngDescriptor, PrngOps, PrngState};
use rand::RngCore;

struct SprngOps;

static SPRNG_OPS: SprngOps = SprngOps;

/// System PRNG descriptor record. `export` is meaningless here and yields
/// an empty state.
pub static SPRNG_DESC: PrngDescriptor = PrngDescriptor {
    name: "sprng",
    export_size: 0,
    ops: &SPRNG_OPS,
};

struct Sprng;

impl PrngState for Sprng {
    fn add_entropy(&mut self, _input: &[u8]) -> CryptResult<()> {
        Ok(())
    }

    fn ready(&mut self) -> CryptResult<()> {
        Ok(())
    }

    fn read(&mut self, out: &mut [u8]) -> CryptResult<usize> {
        rand::rngs::OsRng
            .try_fill_bytes(out)
            .map_err(|_| CryptError::ErrorReadprng)?;
        Ok(out.len())
    }

    fn export(&self) -> CryptResult<Vec<u8>> {
        Ok(Vec::new())
    }

    fn import(&mut self, state: &[u8]) -> CryptResult<()> {
        if !state.is_empty() {
            return Err(CryptError::InvalidArg);
        }
        Ok(())
    }
}

impl PrngOps for SprngOps {
    fn start(&self) -> CryptResult<Box<dyn PrngState>> {
        Ok(Box::new(Sprng))
    }

    fn self_test(&self) -> CryptResult<()> {
        // nothing deterministic to verify against
        Err(CryptError::Nop)
    }
}
