//! IDEA descriptor (16-byte key, 8-byte blocks).

use super::{kat_one, BlockKey};
use crate::error::CryptResult;
use crate::registry::{CipherDescriptor, CipherOps, KeySizes, ScheduledKey};
use cipher::KeyInit;
use idea::Idea;

struct IdeaOps;

static IDEA_OPS: IdeaOps = IdeaOps;

/// IDEA descriptor record.
pub static IDEA_DESC: CipherDescriptor = CipherDescriptor {
    name: "idea",
    id: 26,
    key_sizes: KeySizes::Exact(&[16]),
    block_length: 8,
    default_rounds: 8,
    ops: &IDEA_OPS,
};

impl CipherOps for IdeaOps {
    fn setup(&self, key: &[u8], _num_rounds: u32) -> CryptResult<Box<dyn ScheduledKey>> {
        Ok(BlockKey::boxed(
            Idea::new_from_slice(key).expect("length checked"),
        ))
    }

    fn self_test(&self) -> CryptResult<()> {
        kat_one(
            &IDEA_DESC,
            "00010002000300040005000600070008",
            "0000000100020003",
            "11fbed2b01986de5",
        )
    }
}
