//! RC4-based generator. Export captures the raw permutation, so an import
//! resumes the exact stream. Legacy only.

use crate::error::{CryptError, CryptResult};
use crate::registry::{PrngDescriptor, PrngOps, PrngState};
use crate::stream::Rc4State;
use zeroize::Zeroize;

const EXPORT_LEN: usize = 258;

struct Rc4PrngOps;

static RC4_PRNG_OPS: Rc4PrngOps = Rc4PrngOps;

/// RC4 PRNG descriptor record.
pub static RC4_PRNG_DESC: PrngDescriptor = PrngDescriptor {
    name: "rc4",
    export_size: EXPORT_LEN,
    ops: &RC4_PRNG_OPS,
};

struct Rc4Prng {
    ent: Vec<u8>,
    stream: Option<Rc4State>,
}

impl Drop for Rc4Prng {
    fn drop(&mut self) {
        self.ent.zeroize();
    }
}

impl PrngState for Rc4Prng {
    fn add_entropy(&mut self, input: &[u8]) -> CryptResult<()> {
        if self.ent.len() + input.len() > 256 {
            return Err(CryptError::InvalidArg);
        }
        self.ent.extend_from_slice(input);
        self.stream = None;
        Ok(())
    }

    fn ready(&mut self) -> CryptResult<()> {
        self.stream = Some(Rc4State::setup(&self.ent)?);
        Ok(())
    }

    fn read(&mut self, out: &mut [u8]) -> CryptResult<usize> {
        let stream = self.stream.as_mut().ok_or(CryptError::ErrorReadprng)?;
        stream.keystream(out)?;
        Ok(out.len())
    }

    fn export(&self) -> CryptResult<Vec<u8>> {
        let stream = self.stream.as_ref().ok_or(CryptError::ErrorReadprng)?;
        Ok(stream.export_raw())
    }

    fn import(&mut self, state: &[u8]) -> CryptResult<()> {
        self.stream = Some(Rc4State::import_raw(state)?);
        Ok(())
    }
}

impl PrngOps for Rc4PrngOps {
    fn start(&self) -> CryptResult<Box<dyn PrngState>> {
        Ok(Box::new(Rc4Prng {
            ent: Vec::new(),
            stream: None,
        }))
    }

    fn self_test(&self) -> CryptResult<()> {
        crate::stream::rc4::rc4_test()?;
        super::deterministic_prng_test(&RC4_PRNG_DESC)
    }
}
