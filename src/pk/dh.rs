//! Diffie–Hellman over the named RFC MODP groups.

use super::KeyType;
use crate::error::{CryptError, CryptResult};
use crate::math::{Int, Mpi};
use rand_core::RngCore;

/// A named MODP group (RFC 2409 / RFC 3526), prime in radix-16.
pub struct DhGroup {
    /// Lookup name (decimal bit size).
    pub name: &'static str,
    /// Prime byte size.
    pub size: usize,
    /// Prime modulus, radix-16.
    pub prime: &'static str,
    /// Generator, radix-16.
    pub base: &'static str,
}

/// The compiled-in MODP groups, ascending.
pub static DH_GROUPS: &[DhGroup] = &[
    DhGroup {
        name: "1024",
        size: 128,
        prime: "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD129024E088A67CC74\
                020BBEA63B139B22514A08798E3404DDEF9519B3CD3A431B302B0A6DF25F1437\
                4FE1356D6D51C245E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED\
                EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE65381FFFFFFFFFFFFFFFF",
        base: "2",
    },
    DhGroup {
        name: "1536",
        size: 192,
        prime: "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD129024E088A67CC74\
                020BBEA63B139B22514A08798E3404DDEF9519B3CD3A431B302B0A6DF25F1437\
                4FE1356D6D51C245E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED\
                EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE45B3DC2007CB8A163BF05\
                98DA48361C55D39A69163FA8FD24CF5F83655D23DCA3AD961C62F356208552BB\
                9ED529077096966D670C354E4ABC9804F1746C08CA237327FFFFFFFFFFFFFFFF",
        base: "2",
    },
    DhGroup {
        name: "2048",
        size: 256,
        prime: "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD129024E088A67CC74\
                020BBEA63B139B22514A08798E3404DDEF9519B3CD3A431B302B0A6DF25F1437\
                4FE1356D6D51C245E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED\
                EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE45B3DC2007CB8A163BF05\
                98DA48361C55D39A69163FA8FD24CF5F83655D23DCA3AD961C62F356208552BB\
                9ED529077096966D670C354E4ABC9804F1746C08CA18217C32905E462E36CE3B\
                E39E772C180E86039B2783A2EC07A28FB5C55DF06F4C52C9DE2BCBF695581718\
                3995497CEA956AE515D2261898FA051015728E5A8AACAA68FFFFFFFFFFFFFFFF",
        base: "2",
    },
];

/// A DH key pair over one of the named groups.
pub struct DhKey {
    /// Which halves are populated.
    pub key_type: KeyType,
    /// Prime modulus.
    pub prime: Int,
    /// Generator.
    pub base: Int,
    /// Public value `g^x mod p`.
    pub y: Int,
    /// Private exponent (zero for public keys).
    pub x: Int,
}

impl Drop for DhKey {
    fn drop(&mut self) {
        self.x.wipe();
    }
}

/// Find a compiled-in group whose prime is at least `size` bytes.
pub fn dh_group_by_size(size: usize) -> CryptResult<&'static DhGroup> {
    DH_GROUPS
        .iter()
        .find(|g| g.size >= size)
        .ok_or(CryptError::InvalidKeysize)
}

/// Find a compiled-in group by name.
pub fn dh_group_by_name(name: &str) -> CryptResult<&'static DhGroup> {
    DH_GROUPS
        .iter()
        .find(|g| g.name == name)
        .ok_or(CryptError::InvalidArg)
}

impl DhKey {
    /// Generate a key on the smallest group of at least `size` bytes.
    pub fn generate<R: RngCore>(rng: &mut R, size: usize) -> CryptResult<Self> {
        Self::generate_on(rng, dh_group_by_size(size)?)
    }

    /// Generate a key on a specific group.
    pub fn generate_on<R: RngCore>(rng: &mut R, group: &DhGroup) -> CryptResult<Self> {
        let prime = Int::from_radix(group.prime, 16)?;
        let base = Int::from_radix(group.base, 16)?;
        // x ∈ (2, p)
        let x = loop {
            let x = Int::rand_below(rng, &prime);
            if x.cmp_u32(2) == std::cmp::Ordering::Greater {
                break x;
            }
        };
        let y = base.exptmod(&x, &prime)?;
        let key = Self {
            key_type: KeyType::Private,
            prime,
            base,
            y,
            x,
        };
        key.check_pubkey()?;
        Ok(key)
    }

    /// Validate the public value: `1 < y < p-1` and membership in the
    /// prime-order subgroup of the safe prime.
    pub fn check_pubkey(&self) -> CryptResult<()> {
        let one = Int::from_u32(1);
        let p1 = self.prime.sub(&one)?;
        if self.y.cmp_u32(1) != std::cmp::Ordering::Greater || self.y >= p1 {
            return Err(CryptError::InvalidArg);
        }
        // for safe primes the subgroup test is y^((p-1)/2) ≡ 1
        let q = p1.div_rem(&Int::from_u32(2))?.0;
        if self.y.exptmod(&q, &self.prime)? != one {
            return Err(CryptError::InvalidArg);
        }
        Ok(())
    }

    /// Import a raw big-endian public value onto a named group.
    pub fn import_raw(group: &DhGroup, y: &[u8]) -> CryptResult<Self> {
        let prime = Int::from_radix(group.prime, 16)?;
        let base = Int::from_radix(group.base, 16)?;
        let key = Self {
            key_type: KeyType::Public,
            prime,
            base,
            y: Int::from_bytes_be(y),
            x: Int::zero(),
        };
        key.check_pubkey()?;
        Ok(key)
    }

    /// Export the public (or private) value as raw big-endian bytes,
    /// left-padded to the prime size.
    pub fn export_raw(&self, which: KeyType) -> CryptResult<Vec<u8>> {
        let size = (self.prime.bit_length() + 7) / 8;
        match which {
            KeyType::Public => self.y.to_bytes_be_padded(size),
            KeyType::Private => {
                if self.key_type != KeyType::Private {
                    return Err(CryptError::PkTypeMismatch);
                }
                self.x.to_bytes_be_padded(size)
            }
        }
    }

    /// Derive the shared secret with a peer's public key: raw big-endian
    /// bytes of `y_peer^x mod p`, left-padded to the prime size.
    pub fn shared_secret(&self, peer: &DhKey) -> CryptResult<Vec<u8>> {
        if self.key_type != KeyType::Private {
            return Err(CryptError::PkNotPrivate);
        }
        if self.prime != peer.prime || self.base != peer.base {
            return Err(CryptError::PkTypeMismatch);
        }
        peer.check_pubkey()?;
        let secret = peer.y.exptmod(&self.x, &self.prime)?;
        let size = (self.prime.bit_length() + 7) / 8;
        secret.to_bytes_be_padded(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn test_groups_parse_and_are_sized() {
        for group in DH_GROUPS {
            let p = Int::from_radix(group.prime, 16).unwrap();
            assert_eq!(p.bit_length(), group.size * 8, "group {}", group.name);
            assert!(p.is_odd());
        }
    }

    #[test]
    fn test_shared_secret_symmetry() {
        // both directions agree on the 2048-bit group
        let alice = DhKey::generate(&mut OsRng, 256).unwrap();
        let bob = DhKey::generate(&mut OsRng, 256).unwrap();
        let s1 = alice.shared_secret(&bob).unwrap();
        let s2 = bob.shared_secret(&alice).unwrap();
        assert_eq!(s1, s2);
        assert_eq!(s1.len(), 256);

        // export/import of the peer's public key must not change the secret
        let bob_pub = bob.export_raw(KeyType::Public).unwrap();
        let bob_imported =
            DhKey::import_raw(dh_group_by_name("2048").unwrap(), &bob_pub).unwrap();
        let s3 = alice.shared_secret(&bob_imported).unwrap();
        assert_eq!(s1, s3);
    }

    #[test]
    fn test_check_pubkey_rejects_degenerate() {
        let group = dh_group_by_name("1024").unwrap();
        assert!(DhKey::import_raw(group, &[1]).is_err());
        assert!(DhKey::import_raw(group, &[0]).is_err());
        let p1 = Int::from_radix(group.prime, 16)
            .unwrap()
            .sub(&Int::from_u32(1))
            .unwrap();
        assert!(DhKey::import_raw(group, &p1.to_bytes_be()).is_err());
    }

    #[test]
    fn test_size_selection() {
        assert_eq!(dh_group_by_size(100).unwrap().name, "1024");
        assert_eq!(dh_group_by_size(200).unwrap().name, "2048");
        assert!(dh_group_by_size(1000).is_err());
    }
}
