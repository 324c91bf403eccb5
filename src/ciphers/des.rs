//! DES and Triple-DES descriptors. 3DES accepts 16-byte (two-key EDE) and
//! 24-byte (three-key EDE) keys.

use super::{kat_one, BlockKey};
use crate::error::CryptResult;
use crate::registry::{CipherDescriptor, CipherOps, KeySizes, ScheduledKey};
use cipher::KeyInit;
use des::{Des, TdesEde2, TdesEde3};

struct DesOps;
struct Des3Ops;

static DES_OPS: DesOps = DesOps;
static DES3_OPS: Des3Ops = Des3Ops;

/// Single DES descriptor record (legacy interchange only).
pub static DES_DESC: CipherDescriptor = CipherDescriptor {
    name: "des",
    id: 13,
    key_sizes: KeySizes::Exact(&[8]),
    block_length: 8,
    default_rounds: 16,
    ops: &DES_OPS,
};

/// Triple-DES descriptor record.
pub static DES3_DESC: CipherDescriptor = CipherDescriptor {
    name: "3des",
    id: 14,
    key_sizes: KeySizes::Exact(&[16, 24]),
    block_length: 8,
    default_rounds: 16,
    ops: &DES3_OPS,
};

impl CipherOps for DesOps {
    fn setup(&self, key: &[u8], _num_rounds: u32) -> CryptResult<Box<dyn ScheduledKey>> {
        Ok(BlockKey::boxed(
            Des::new_from_slice(key).expect("length checked"),
        ))
    }

    fn self_test(&self) -> CryptResult<()> {
        // classic "Now is t" vector
        kat_one(
            &DES_DESC,
            "0123456789abcdef",
            "4e6f772069732074",
            "3fa40e8a984d4815",
        )
    }
}

impl CipherOps for Des3Ops {
    fn setup(&self, key: &[u8], _num_rounds: u32) -> CryptResult<Box<dyn ScheduledKey>> {
        Ok(match key.len() {
            16 => BlockKey::boxed(TdesEde2::new_from_slice(key).expect("length checked")),
            _ => BlockKey::boxed(TdesEde3::new_from_slice(key).expect("length checked")),
        })
    }

    fn self_test(&self) -> CryptResult<()> {
        // K1=K2=K3 degenerates to single DES
        kat_one(
            &DES3_DESC,
            "0123456789abcdef0123456789abcdef0123456789abcdef",
            "4e6f772069732074",
            "3fa40e8a984d4815",
        )
    }
}
