//! CAST5 (CAST-128) descriptor (5..16-byte keys, 8-byte blocks).

use super::{kat_one, BlockKey};
use crate::error::{CryptError, CryptResult};
use crate::registry::{CipherDescriptor, CipherOps, KeySizes, ScheduledKey};
use cast5::Cast5;
use cipher::KeyInit;

struct Cast5Ops;

static CAST5_OPS: Cast5Ops = Cast5Ops;

/// CAST5 descriptor record.
pub static CAST5_DESC: CipherDescriptor = CipherDescriptor {
    name: "cast5",
    id: 15,
    key_sizes: KeySizes::Range { min: 5, max: 16 },
    block_length: 8,
    default_rounds: 16,
    ops: &CAST5_OPS,
};

impl CipherOps for Cast5Ops {
    fn setup(&self, key: &[u8], _num_rounds: u32) -> CryptResult<Box<dyn ScheduledKey>> {
        let cipher = Cast5::new_from_slice(key).map_err(|_| CryptError::InvalidKeysize)?;
        Ok(BlockKey::boxed(cipher))
    }

    fn self_test(&self) -> CryptResult<()> {
        // RFC 2144 appendix B, 128-bit key
        kat_one(
            &CAST5_DESC,
            "0123456712345678234567893456789a",
            "0123456789abcdef",
            "238b4fe5847e44b2",
        )
    }
}
