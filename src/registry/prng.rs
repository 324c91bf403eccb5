//! PRNG descriptor records and the seeded-generator state trait.

use crate::error::CryptResult;

/// A live pseudo-random generator.
///
/// The lifecycle is `start` (via [`PrngOps::start`]) → `add_entropy`* →
/// `ready` → `read`*. `read` before a successful `ready` fails with
/// `ErrorReadprng`. `export` captures enough state that `import` on a fresh
/// instance reproduces the subsequent output stream (up to
/// primitive-specific caveats; the system passthrough cannot honor this).
pub trait PrngState: Send {
    /// Mix caller-supplied entropy into the generator.
    fn add_entropy(&mut self, input: &[u8]) -> CryptResult<()>;

    /// Finalize seeding; after this `read` may be called.
    fn ready(&mut self) -> CryptResult<()>;

    /// Fill `out` with generator output; returns the number of bytes
    /// produced (always `out.len()` except for refusals).
    fn read(&mut self, out: &mut [u8]) -> CryptResult<usize>;

    /// Serialize the generator state.
    fn export(&self) -> CryptResult<Vec<u8>>;

    /// Replace this generator's state with a previously exported one.
    fn import(&mut self, state: &[u8]) -> CryptResult<()>;
}

/// The operations half of a PRNG descriptor.
pub trait PrngOps: Send + Sync {
    /// Construct an unseeded generator.
    fn start(&self) -> CryptResult<Box<dyn PrngState>>;

    /// Run the embedded self-test.
    fn self_test(&self) -> CryptResult<()>;
}

/// An immutable PRNG descriptor record.
pub struct PrngDescriptor {
    /// Short ASCII name used for lookup ("yarrow", "fortuna", ...).
    pub name: &'static str,
    /// Size in bytes of an exported state, 0 when export is unsupported.
    pub export_size: usize,
    /// Dispatch table.
    pub ops: &'static dyn PrngOps,
}

impl std::fmt::Debug for PrngDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrngDescriptor")
            .field("name", &self.name)
            .field("export_size", &self.export_size)
            .finish()
    }
}
