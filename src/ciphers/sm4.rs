//! SM4 descriptor (16-byte key, 16-byte blocks).

use super::{kat_one, BlockKey};
use crate::error::{CryptError, CryptResult};
use crate::registry::{CipherDescriptor, CipherOps, KeySizes, ScheduledKey};
use cipher::KeyInit;
use sm4::Sm4;

struct Sm4Ops;

static SM4_OPS: Sm4Ops = Sm4Ops;

/// SM4 descriptor record.
pub static SM4_DESC: CipherDescriptor = CipherDescriptor {
    name: "sm4",
    id: 28,
    key_sizes: KeySizes::Exact(&[16]),
    block_length: 16,
    default_rounds: 32,
    ops: &SM4_OPS,
};

impl CipherOps for Sm4Ops {
    fn setup(&self, key: &[u8], _num_rounds: u32) -> CryptResult<Box<dyn ScheduledKey>> {
        Ok(BlockKey::boxed(
            Sm4::new_from_slice(key).expect("length checked"),
        ))
    }

    fn self_test(&self) -> CryptResult<()> {
        // GB/T 32907-2016 example 1
        kat_one(
            &SM4_DESC,
            "0123456789abcdeffedcba9876543210",
            "0123456789abcdeffedcba9876543210",
            "681edf34d206965e86b3e94f536e4246",
        )?;

        // example 2: 1,000,000 iterations in the standard; the original
        // carries the 1000-round encrypt-then-decrypt identity instead
        let key = hex::decode("0123456789abcdeffedcba9876543210").map_err(|_| CryptError::Error)?;
        let sk = SM4_DESC.setup(&key, 0)?;
        let mut block = [0u8; 16];
        let mut tmp = [0u8; 16];
        for _ in 0..1000 {
            sk.encrypt_block(&{ block }, &mut tmp)?;
            block = tmp;
        }
        for _ in 0..1000 {
            sk.decrypt_block(&{ block }, &mut tmp)?;
            block = tmp;
        }
        if block != [0u8; 16] {
            return Err(CryptError::FailTestvector);
        }
        Ok(())
    }
}
