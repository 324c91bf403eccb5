//! # Pseudo-Random Generators
//!
//! PRNG descriptors with the `start → add_entropy → ready → read` lifecycle.
//! `read` before `ready` is refused with `ErrorReadprng`. Every generator
//! except the system passthrough supports `export`/`import` such that the
//! imported instance reproduces the exporter's subsequent output stream.

pub mod chacha20;
pub mod fortuna;
pub mod rc4;
pub mod sprng;
pub mod yarrow;

use crate::error::{CryptError, CryptResult};
use crate::registry::{self, PrngDescriptor, PrngState};
use rand::RngCore as _;

/// Every compiled-in PRNG descriptor, in registration order.
pub static ALL_PRNGS: &[&PrngDescriptor] = &[
    &yarrow::YARROW_DESC,
    &fortuna::FORTUNA_DESC,
    &chacha20::CHACHA20_PRNG_DESC,
    &rc4::RC4_PRNG_DESC,
    &sprng::SPRNG_DESC,
];

/// Start the PRNG registered at `slot`, feed it `bits` of system entropy
/// and ready it.
///
/// `bits` is clamped to 64..=1024 as in the original.
pub fn rng_make_prng(bits: usize, slot: usize) -> CryptResult<Box<dyn PrngState>> {
    if !(64..=1024).contains(&bits) {
        return Err(CryptError::InvalidArg);
    }
    let desc = registry::prng_descriptor(slot)?;
    let mut prng = desc.ops.start()?;
    let mut seed = vec![0u8; (bits + 7) / 8];
    rand::rngs::OsRng.fill_bytes(&mut seed);
    prng.add_entropy(&seed)?;
    prng.ready()?;
    zeroize::Zeroize::zeroize(&mut seed);
    Ok(prng)
}

/// Adapter presenting a [`PrngState`] as a `rand_core` RNG.
///
/// `fill_bytes` cannot report refusals, so a failed read zero-fills and
/// latches [`RngAdapter::failed`]; callers check it after use and surface
/// `ErrorReadprng`.
pub struct RngAdapter<'a> {
    inner: &'a mut dyn PrngState,
    /// Set when the underlying generator refused a read.
    pub failed: bool,
}

impl<'a> RngAdapter<'a> {
    /// Wrap a readied PRNG state.
    pub fn new(inner: &'a mut dyn PrngState) -> Self {
        Self {
            inner,
            failed: false,
        }
    }

    /// Surface any latched refusal.
    pub fn status(&self) -> CryptResult<()> {
        if self.failed {
            Err(CryptError::ErrorReadprng)
        } else {
            Ok(())
        }
    }
}

impl rand_core::RngCore for RngAdapter<'_> {
    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.fill_bytes(&mut buf);
        u32::from_le_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.fill_bytes(&mut buf);
        u64::from_le_bytes(buf)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        match self.inner.read(dest) {
            Ok(n) if n == dest.len() => {}
            _ => {
                dest.fill(0);
                self.failed = true;
            }
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        match self.inner.read(dest) {
            Ok(n) if n == dest.len() => Ok(()),
            _ => {
                self.failed = true;
                Err(rand_core::Error::new("prng refused read"))
            }
        }
    }
}

impl rand_core::CryptoRng for RngAdapter<'_> {}

/// Structural self-test shared by the deterministic generators: identical
/// seeding yields identical output, and export/import resumes the stream.
pub(crate) fn deterministic_prng_test(desc: &PrngDescriptor) -> CryptResult<()> {
    let seed = b"self-test seed material, 32 byte";

    let mut a = desc.ops.start()?;
    a.add_entropy(seed)?;
    a.ready()?;
    let mut out_a = [0u8; 64];
    if a.read(&mut out_a)? != 64 {
        return Err(CryptError::FailTestvector);
    }

    let mut b = desc.ops.start()?;
    b.add_entropy(seed)?;
    b.ready()?;
    let mut out_b = [0u8; 64];
    b.read(&mut out_b)?;
    if out_a != out_b {
        return Err(CryptError::FailTestvector);
    }

    // export/import must resume the exporter's stream
    let exported = a.export()?;
    let mut next_a = [0u8; 64];
    a.read(&mut next_a)?;
    let mut c = desc.ops.start()?;
    c.import(&exported)?;
    let mut next_c = [0u8; 64];
    c.read(&mut next_c)?;
    if next_a != next_c {
        return Err(CryptError::FailTestvector);
    }
    Ok(())
}
