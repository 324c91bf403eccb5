//! Serpent descriptor (16..32-byte keys, 16-byte blocks).

use super::{roundtrip_test, BlockKey};
use crate::error::{CryptError, CryptResult};
use crate::registry::{CipherDescriptor, CipherOps, KeySizes, ScheduledKey};
use cipher::KeyInit;
use serpent::Serpent;

struct SerpentOps;

static SERPENT_OPS: SerpentOps = SerpentOps;

/// Serpent descriptor record.
pub static SERPENT_DESC: CipherDescriptor = CipherDescriptor {
    name: "serpent",
    id: 24,
    key_sizes: KeySizes::Exact(&[16, 24, 32]),
    block_length: 16,
    default_rounds: 32,
    ops: &SERPENT_OPS,
};

impl CipherOps for SerpentOps {
    fn setup(&self, key: &[u8], _num_rounds: u32) -> CryptResult<Box<dyn ScheduledKey>> {
        let cipher = Serpent::new_from_slice(key).map_err(|_| CryptError::InvalidKeysize)?;
        Ok(BlockKey::boxed(cipher))
    }

    fn self_test(&self) -> CryptResult<()> {
        roundtrip_test(&SERPENT_DESC, 16)?;
        roundtrip_test(&SERPENT_DESC, 32)
    }
}
