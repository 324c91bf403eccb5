//! Camellia descriptor (128/192/256-bit keys, 16-byte blocks).

use super::{kat_one, BlockKey};
use crate::error::CryptResult;
use crate::registry::{CipherDescriptor, CipherOps, KeySizes, ScheduledKey};
use camellia::{Camellia128, Camellia192, Camellia256};
use cipher::KeyInit;

struct CamelliaOps;

static CAMELLIA_OPS: CamelliaOps = CamelliaOps;

/// Camellia descriptor record.
pub static CAMELLIA_DESC: CipherDescriptor = CipherDescriptor {
    name: "camellia",
    id: 23,
    key_sizes: KeySizes::Exact(&[16, 24, 32]),
    block_length: 16,
    default_rounds: 0,
    ops: &CAMELLIA_OPS,
};

impl CipherOps for CamelliaOps {
    fn setup(&self, key: &[u8], _num_rounds: u32) -> CryptResult<Box<dyn ScheduledKey>> {
        Ok(match key.len() {
            16 => BlockKey::boxed(Camellia128::new_from_slice(key).expect("length checked")),
            24 => BlockKey::boxed(Camellia192::new_from_slice(key).expect("length checked")),
            _ => BlockKey::boxed(Camellia256::new_from_slice(key).expect("length checked")),
        })
    }

    fn self_test(&self) -> CryptResult<()> {
        // RFC 3713 test data
        kat_one(
            &CAMELLIA_DESC,
            "0123456789abcdeffedcba9876543210",
            "0123456789abcdeffedcba9876543210",
            "67673138549669730857065648eabe43",
        )
    }
}
