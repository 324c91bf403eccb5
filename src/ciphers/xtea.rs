//! XTEA descriptor (16-byte key, 8-byte blocks, 32 Feistel cycles).
//!
//! Implemented natively: the round function is a handful of word ops and the
//! scheduled state is just the four key words, which lets the schedule be
//! zeroized on drop.

use super::kat_one;
use crate::error::{CryptError, CryptResult};
use crate::registry::{CipherDescriptor, CipherOps, KeySizes, ScheduledKey};
use crate::util::{load32_be, store32_be};
use zeroize::{Zeroize, ZeroizeOnDrop};

const DELTA: u32 = 0x9E37_79B9;
const CYCLES: u32 = 32;

struct XteaOps;

static XTEA_OPS: XteaOps = XteaOps;

/// XTEA descriptor record.
pub static XTEA_DESC: CipherDescriptor = CipherDescriptor {
    name: "xtea",
    id: 10,
    key_sizes: KeySizes::Exact(&[16]),
    block_length: 8,
    default_rounds: 32,
    ops: &XTEA_OPS,
};

#[derive(Zeroize, ZeroizeOnDrop)]
struct XteaKey {
    k: [u32; 4],
}

impl ScheduledKey for XteaKey {
    fn encrypt_block(&self, input: &[u8], output: &mut [u8]) -> CryptResult<()> {
        if input.len() != 8 || output.len() != 8 {
            return Err(CryptError::InvalidArg);
        }
        let mut v0 = load32_be(&input[0..4]);
        let mut v1 = load32_be(&input[4..8]);
        let mut sum = 0u32;
        for _ in 0..CYCLES {
            v0 = v0.wrapping_add(
                (((v1 << 4) ^ (v1 >> 5)).wrapping_add(v1))
                    ^ sum.wrapping_add(self.k[(sum & 3) as usize]),
            );
            sum = sum.wrapping_add(DELTA);
            v1 = v1.wrapping_add(
                (((v0 << 4) ^ (v0 >> 5)).wrapping_add(v0))
                    ^ sum.wrapping_add(self.k[((sum >> 11) & 3) as usize]),
            );
        }
        store32_be(v0, &mut output[0..4]);
        store32_be(v1, &mut output[4..8]);
        Ok(())
    }

    fn decrypt_block(&self, input: &[u8], output: &mut [u8]) -> CryptResult<()> {
        if input.len() != 8 || output.len() != 8 {
            return Err(CryptError::InvalidArg);
        }
        let mut v0 = load32_be(&input[0..4]);
        let mut v1 = load32_be(&input[4..8]);
        let mut sum = DELTA.wrapping_mul(CYCLES);
        for _ in 0..CYCLES {
            v1 = v1.wrapping_sub(
                (((v0 << 4) ^ (v0 >> 5)).wrapping_add(v0))
                    ^ sum.wrapping_add(self.k[((sum >> 11) & 3) as usize]),
            );
            sum = sum.wrapping_sub(DELTA);
            v0 = v0.wrapping_sub(
                (((v1 << 4) ^ (v1 >> 5)).wrapping_add(v1))
                    ^ sum.wrapping_add(self.k[(sum & 3) as usize]),
            );
        }
        store32_be(v0, &mut output[0..4]);
        store32_be(v1, &mut output[4..8]);
        Ok(())
    }

    fn block_len(&self) -> usize {
        8
    }
}

impl CipherOps for XteaOps {
    fn setup(&self, key: &[u8], _num_rounds: u32) -> CryptResult<Box<dyn ScheduledKey>> {
        let k = [
            load32_be(&key[0..4]),
            load32_be(&key[4..8]),
            load32_be(&key[8..12]),
            load32_be(&key[12..16]),
        ];
        Ok(Box::new(XteaKey { k }))
    }

    fn self_test(&self) -> CryptResult<()> {
        kat_one(
            &XTEA_DESC,
            "000102030405060708090a0b0c0d0e0f",
            "4142434445464748",
            "497df3d072612cb5",
        )?;
        super::roundtrip_test(&XTEA_DESC, 16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xtea_kat() {
        XTEA_OPS.self_test().unwrap();
    }

    #[test]
    fn test_xtea_all_zero_roundtrip() {
        let sk = XTEA_DESC.setup(&[0u8; 16], 0).unwrap();
        let mut ct = [0u8; 8];
        let mut pt = [0u8; 8];
        sk.encrypt_block(&[0u8; 8], &mut ct).unwrap();
        sk.decrypt_block(&{ ct }, &mut pt).unwrap();
        assert_eq!(pt, [0u8; 8]);
        assert_ne!(ct, [0u8; 8]);
    }
}
