//! Twofish descriptor (128/192/256-bit keys, 16-byte blocks).

use super::{kat_one, BlockKey};
use crate::error::{CryptError, CryptResult};
use crate::registry::{CipherDescriptor, CipherOps, KeySizes, ScheduledKey};
use cipher::KeyInit;
use twofish::Twofish;

struct TwofishOps;

static TWOFISH_OPS: TwofishOps = TwofishOps;

/// Twofish descriptor record.
pub static TWOFISH_DESC: CipherDescriptor = CipherDescriptor {
    name: "twofish",
    id: 7,
    key_sizes: KeySizes::Exact(&[16, 24, 32]),
    block_length: 16,
    default_rounds: 16,
    ops: &TWOFISH_OPS,
};

impl CipherOps for TwofishOps {
    fn setup(&self, key: &[u8], _num_rounds: u32) -> CryptResult<Box<dyn ScheduledKey>> {
        let cipher = Twofish::new_from_slice(key).map_err(|_| CryptError::InvalidKeysize)?;
        Ok(BlockKey::boxed(cipher))
    }

    fn self_test(&self) -> CryptResult<()> {
        // Twofish team's ECB known-answer test, 128-bit all-zero key
        kat_one(
            &TWOFISH_DESC,
            "00000000000000000000000000000000",
            "00000000000000000000000000000000",
            "9f589f5cf6122c32b6bfec2f2ae8c35a",
        )
    }
}
