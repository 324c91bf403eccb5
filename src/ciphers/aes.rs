//! AES (Rijndael) descriptor. Key sizes 128/192/256 select the schedule.

use super::{kat_one, BlockKey};
use crate::error::CryptResult;
use crate::registry::{CipherDescriptor, CipherOps, KeySizes, ScheduledKey};
use aes::{Aes128, Aes192, Aes256};
use cipher::KeyInit;

struct AesOps;

static AES_OPS: AesOps = AesOps;

/// AES descriptor record.
pub static AES_DESC: CipherDescriptor = CipherDescriptor {
    name: "aes",
    id: 6,
    key_sizes: KeySizes::Exact(&[16, 24, 32]),
    block_length: 16,
    default_rounds: 0,
    ops: &AES_OPS,
};

impl CipherOps for AesOps {
    fn setup(&self, key: &[u8], _num_rounds: u32) -> CryptResult<Box<dyn ScheduledKey>> {
        Ok(match key.len() {
            16 => BlockKey::boxed(Aes128::new_from_slice(key).expect("length checked")),
            24 => BlockKey::boxed(Aes192::new_from_slice(key).expect("length checked")),
            _ => BlockKey::boxed(Aes256::new_from_slice(key).expect("length checked")),
        })
    }

    fn self_test(&self) -> CryptResult<()> {
        // FIPS-197 appendix C
        kat_one(
            &AES_DESC,
            "000102030405060708090a0b0c0d0e0f",
            "00112233445566778899aabbccddeeff",
            "69c4e0d86a7b0430d8cdb78070b4c55a",
        )?;
        kat_one(
            &AES_DESC,
            "000102030405060708090a0b0c0d0e0f1011121314151617",
            "00112233445566778899aabbccddeeff",
            "dda97ca4864cdfe06eaf70a0ec0d7191",
        )?;
        kat_one(
            &AES_DESC,
            "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f",
            "00112233445566778899aabbccddeeff",
            "8ea2b7ca516745bfeafc49904b496089",
        )
    }
}
