//! Block-cipher descriptor records and the scheduled-key dispatch trait.

use crate::error::{CryptError, CryptResult};

/// Admissible key lengths of a cipher, in bytes.
#[derive(Debug, Clone, Copy)]
pub enum KeySizes {
    /// Only the listed sizes are accepted (ascending order).
    Exact(&'static [usize]),
    /// Every size in `min..=max` is accepted.
    Range {
        /// Smallest accepted key length.
        min: usize,
        /// Largest accepted key length.
        max: usize,
    },
}

impl KeySizes {
    /// Smallest accepted key length.
    pub fn min(&self) -> usize {
        match self {
            KeySizes::Exact(sizes) => sizes[0],
            KeySizes::Range { min, .. } => *min,
        }
    }

    /// Largest accepted key length.
    pub fn max(&self) -> usize {
        match self {
            KeySizes::Exact(sizes) => sizes[sizes.len() - 1],
            KeySizes::Range { max, .. } => *max,
        }
    }

    /// Whether `len` is an accepted key length.
    pub fn accepts(&self, len: usize) -> bool {
        match self {
            KeySizes::Exact(sizes) => sizes.contains(&len),
            KeySizes::Range { min, max } => (*min..=*max).contains(&len),
        }
    }

    /// Largest accepted key length not exceeding `requested`.
    pub fn recommended(&self, requested: usize) -> CryptResult<usize> {
        let best = match self {
            KeySizes::Exact(sizes) => {
                sizes.iter().rev().copied().find(|&s| s <= requested)
            }
            KeySizes::Range { min, max } => {
                if requested >= *min {
                    Some(requested.min(*max))
                } else {
                    None
                }
            }
        };
        best.ok_or(CryptError::InvalidKeysize)
    }
}

/// A scheduled (expanded) cipher key, produced by [`CipherOps::setup`].
///
/// Implementations zeroize their round keys on drop.
pub trait ScheduledKey: Send + Sync {
    /// Encrypt one block. `input` and `output` must both be exactly
    /// [`Self::block_len`] bytes.
    fn encrypt_block(&self, input: &[u8], output: &mut [u8]) -> CryptResult<()>;

    /// Decrypt one block.
    fn decrypt_block(&self, input: &[u8], output: &mut [u8]) -> CryptResult<()>;

    /// Block length of the underlying cipher, in bytes.
    fn block_len(&self) -> usize;
}

/// The operations half of a cipher descriptor.
pub trait CipherOps: Send + Sync {
    /// Expand `key` into a scheduled key. `num_rounds` of 0 selects the
    /// cipher's default; a cipher that cannot honor a non-default count
    /// returns `InvalidRounds`.
    fn setup(&self, key: &[u8], num_rounds: u32) -> CryptResult<Box<dyn ScheduledKey>>;

    /// Run the embedded known-answer tests.
    fn self_test(&self) -> CryptResult<()>;
}

/// An immutable cipher descriptor record.
pub struct CipherDescriptor {
    /// Short ASCII name used for lookup ("aes", "3des", ...).
    pub name: &'static str,
    /// Small numeric id, unique per descriptor.
    pub id: u8,
    /// Accepted key lengths.
    pub key_sizes: KeySizes,
    /// Block length in bytes.
    pub block_length: usize,
    /// Default round count (0 when the backend fixes it internally).
    pub default_rounds: u32,
    /// Dispatch table.
    pub ops: &'static dyn CipherOps,
}

impl CipherDescriptor {
    /// Smallest accepted key length in bytes.
    pub fn min_key_length(&self) -> usize {
        self.key_sizes.min()
    }

    /// Largest accepted key length in bytes.
    pub fn max_key_length(&self) -> usize {
        self.key_sizes.max()
    }

    /// Validate `key` against the descriptor bounds and schedule it.
    pub fn setup(&self, key: &[u8], num_rounds: u32) -> CryptResult<Box<dyn ScheduledKey>> {
        if !self.key_sizes.accepts(key.len()) {
            return Err(CryptError::InvalidKeysize);
        }
        if num_rounds != 0 && num_rounds != self.default_rounds {
            return Err(CryptError::InvalidRounds);
        }
        self.ops.setup(key, num_rounds)
    }

    /// Largest accepted key length not exceeding `keysize`.
    pub fn recommended_keysize(&self, keysize: usize) -> CryptResult<usize> {
        self.key_sizes.recommended(keysize)
    }
}

impl std::fmt::Debug for CipherDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherDescriptor")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("block_length", &self.block_length)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keysizes_exact() {
        let ks = KeySizes::Exact(&[16, 24, 32]);
        assert!(ks.accepts(24));
        assert!(!ks.accepts(20));
        assert_eq!(ks.min(), 16);
        assert_eq!(ks.max(), 32);
        assert_eq!(ks.recommended(31).unwrap(), 24);
        assert_eq!(ks.recommended(64).unwrap(), 32);
        assert_eq!(ks.recommended(8), Err(CryptError::InvalidKeysize));
    }

    #[test]
    fn test_keysizes_range() {
        let ks = KeySizes::Range { min: 5, max: 56 };
        assert!(ks.accepts(5));
        assert!(ks.accepts(56));
        assert!(!ks.accepts(57));
        assert_eq!(ks.recommended(100).unwrap(), 56);
        assert_eq!(ks.recommended(4), Err(CryptError::InvalidKeysize));
    }
}
