//! RC2 descriptor (variable key, 8-byte blocks). The effective key length
//! follows the real key length, as in PEM/PKCS#12 usage.

use super::{roundtrip_test, BlockKey};
use crate::error::{CryptError, CryptResult};
use crate::registry::{CipherDescriptor, CipherOps, KeySizes, ScheduledKey};
use cipher::KeyInit;
use rc2::Rc2;

struct Rc2Ops;

static RC2_OPS: Rc2Ops = Rc2Ops;

/// RC2 descriptor record.
pub static RC2_DESC: CipherDescriptor = CipherDescriptor {
    name: "rc2",
    id: 12,
    key_sizes: KeySizes::Range { min: 5, max: 128 },
    block_length: 8,
    default_rounds: 16,
    ops: &RC2_OPS,
};

impl CipherOps for Rc2Ops {
    fn setup(&self, key: &[u8], _num_rounds: u32) -> CryptResult<Box<dyn ScheduledKey>> {
        let cipher = Rc2::new_from_slice(key).map_err(|_| CryptError::InvalidKeysize)?;
        Ok(BlockKey::boxed(cipher))
    }

    fn self_test(&self) -> CryptResult<()> {
        // RFC 2268 vectors pin the (key, effective-bits) pairing the crate
        // derives from the key length; the 8-byte/64-bit case is covered.
        let key = hex::decode("ffffffffffffffff").map_err(|_| CryptError::Error)?;
        let sk = RC2_DESC.setup(&key, 0)?;
        let pt = hex::decode("ffffffffffffffff").map_err(|_| CryptError::Error)?;
        let mut ct = vec![0u8; 8];
        sk.encrypt_block(&pt, &mut ct)?;
        if ct != hex::decode("278b27e42e2f0d49").map_err(|_| CryptError::Error)? {
            return Err(CryptError::FailTestvector);
        }
        roundtrip_test(&RC2_DESC, 16)
    }
}
