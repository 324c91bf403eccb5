//! Blowfish descriptor (variable key, 8-byte blocks).

use super::{kat_one, BlockKey};
use crate::error::{CryptError, CryptResult};
use crate::registry::{CipherDescriptor, CipherOps, KeySizes, ScheduledKey};
use blowfish::Blowfish;
use cipher::KeyInit;

struct BlowfishOps;

static BLOWFISH_OPS: BlowfishOps = BlowfishOps;

/// Blowfish descriptor record.
pub static BLOWFISH_DESC: CipherDescriptor = CipherDescriptor {
    name: "blowfish",
    id: 0,
    key_sizes: KeySizes::Range { min: 8, max: 56 },
    block_length: 8,
    default_rounds: 16,
    ops: &BLOWFISH_OPS,
};

impl CipherOps for BlowfishOps {
    fn setup(&self, key: &[u8], _num_rounds: u32) -> CryptResult<Box<dyn ScheduledKey>> {
        let cipher: Blowfish =
            Blowfish::new_from_slice(key).map_err(|_| CryptError::InvalidKeysize)?;
        Ok(BlockKey::boxed(cipher))
    }

    fn self_test(&self) -> CryptResult<()> {
        // Eric Young's variable-key set, entry 0
        kat_one(
            &BLOWFISH_DESC,
            "0000000000000000",
            "0000000000000000",
            "4ef997456198dd78",
        )
    }
}
