//! Hash descriptor records and the streaming hash-state trait.

use crate::error::CryptResult;

/// A live hash computation.
///
/// `process` is associative over concatenation: splitting the input across
/// calls never changes the digest.
pub trait HashState: Send {
    /// Absorb `data`.
    fn process(&mut self, data: &[u8]) -> CryptResult<()>;

    /// Finish and return the digest.
    fn done(self: Box<Self>) -> CryptResult<Vec<u8>>;

    /// Snapshot the running state (used by constructions that fork a
    /// computation, e.g. PRNG pools exporting without disturbing the pool).
    fn clone_state(&self) -> Box<dyn HashState>;
}

/// The operations half of a hash descriptor.
pub trait HashOps: Send + Sync {
    /// Begin a fresh computation. Fails only for constructions with unmet
    /// bindings (CHC before `chc_register`).
    fn init(&self) -> CryptResult<Box<dyn HashState>>;

    /// Run the embedded known-answer tests.
    fn self_test(&self) -> CryptResult<()>;
}

/// An immutable hash descriptor record.
pub struct HashDescriptor {
    /// Short ASCII name used for lookup ("sha256", "blake2b-512", ...).
    pub name: &'static str,
    /// Small numeric id, unique per descriptor.
    pub id: u8,
    /// Dotted OID string for DER DigestInfo; empty when unassigned.
    pub oid: &'static str,
    /// Digest length in bytes.
    pub digest_size: usize,
    /// Compression block length in bytes (HMAC pad width).
    pub block_size: usize,
    /// Dispatch table.
    pub ops: &'static dyn HashOps,
}

impl HashDescriptor {
    /// One-shot convenience: digest of `data`.
    pub fn hash_memory(&self, data: &[u8]) -> CryptResult<Vec<u8>> {
        let mut state = self.ops.init()?;
        state.process(data)?;
        state.done()
    }
}

impl std::fmt::Debug for HashDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashDescriptor")
            .field("name", &self.name)
            .field("digest_size", &self.digest_size)
            .field("block_size", &self.block_size)
            .finish()
    }
}
