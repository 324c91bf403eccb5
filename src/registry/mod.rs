//! # Primitive Registry
//!
//! Process-wide slot tables for cipher, hash and PRNG descriptors. Every
//! mode, MAC, AEAD and public-key scheme in the crate dispatches through a
//! slot into these tables rather than naming a primitive type directly, so
//! each construction is written exactly once.
//!
//! ## Contract
//!
//! - Tables have a fixed capacity of [`TAB_SIZE`] entries; registration
//!   takes the first free slot and returns it.
//! - Re-registering the same descriptor is idempotent and returns the
//!   existing slot.
//! - Slots are stable for the lifetime of a registration; consumers store
//!   slots, never references.
//! - Unregistration matches by descriptor identity (address), not by name.
//!
//! Registration is serialized internally; descriptor dispatch afterwards is
//! read-only and safe to share across threads.

pub mod cipher;
pub mod hash;
pub mod prng;

pub use cipher::{CipherDescriptor, CipherOps, KeySizes, ScheduledKey};
pub use hash::{HashDescriptor, HashOps, HashState};
pub use prng::{PrngDescriptor, PrngOps, PrngState};

use crate::error::{CryptError, CryptResult};
use once_cell::sync::Lazy;
use parking_lot::RwLock;

/// Capacity of each descriptor table.
pub const TAB_SIZE: usize = 32;

type Table<T> = Lazy<RwLock<[Option<&'static T>; TAB_SIZE]>>;

static CIPHER_TABLE: Table<CipherDescriptor> = Lazy::new(|| RwLock::new([None; TAB_SIZE]));
static HASH_TABLE: Table<HashDescriptor> = Lazy::new(|| RwLock::new([None; TAB_SIZE]));
static PRNG_TABLE: Table<PrngDescriptor> = Lazy::new(|| RwLock::new([None; TAB_SIZE]));

fn register_in<T>(table: &Table<T>, desc: &'static T, name: &str) -> CryptResult<usize> {
    let mut tab = table.write();
    // idempotent: same descriptor address keeps its slot
    for (slot, entry) in tab.iter().enumerate() {
        if let Some(d) = entry {
            if std::ptr::eq(*d as *const T, desc as *const T) {
                return Ok(slot);
            }
        }
    }
    for (slot, entry) in tab.iter_mut().enumerate() {
        if entry.is_none() {
            *entry = Some(desc);
            tracing::debug!(name, slot, "registered descriptor");
            return Ok(slot);
        }
    }
    Err(CryptError::Mem)
}

fn unregister_in<T>(table: &Table<T>, desc: &'static T) -> CryptResult<()> {
    let mut tab = table.write();
    for entry in tab.iter_mut() {
        if let Some(d) = entry {
            if std::ptr::eq(*d as *const T, desc as *const T) {
                *entry = None;
                return Ok(());
            }
        }
    }
    Err(CryptError::Error)
}

// ---------------------------------------------------------------------------
// Ciphers
// ---------------------------------------------------------------------------

/// Register a cipher descriptor; returns its slot.
pub fn register_cipher(desc: &'static CipherDescriptor) -> CryptResult<usize> {
    register_in(&CIPHER_TABLE, desc, desc.name)
}

/// Remove a cipher descriptor (matched by identity).
pub fn unregister_cipher(desc: &'static CipherDescriptor) -> CryptResult<()> {
    unregister_in(&CIPHER_TABLE, desc)
}

/// Look a cipher up by name; `None` when not registered.
pub fn find_cipher(name: &str) -> Option<usize> {
    let tab = CIPHER_TABLE.read();
    tab.iter()
        .position(|e| matches!(e, Some(d) if d.name == name))
}

/// Check that `slot` holds a live cipher registration.
pub fn cipher_is_valid(slot: usize) -> CryptResult<()> {
    cipher_descriptor(slot).map(|_| ())
}

/// Fetch the descriptor registered at `slot`.
pub fn cipher_descriptor(slot: usize) -> CryptResult<&'static CipherDescriptor> {
    CIPHER_TABLE
        .read()
        .get(slot)
        .and_then(|e| *e)
        .ok_or(CryptError::InvalidCipher)
}

// ---------------------------------------------------------------------------
// Hashes
// ---------------------------------------------------------------------------

/// Register a hash descriptor; returns its slot.
pub fn register_hash(desc: &'static HashDescriptor) -> CryptResult<usize> {
    register_in(&HASH_TABLE, desc, desc.name)
}

/// Remove a hash descriptor (matched by identity).
pub fn unregister_hash(desc: &'static HashDescriptor) -> CryptResult<()> {
    unregister_in(&HASH_TABLE, desc)
}

/// Look a hash up by name.
pub fn find_hash(name: &str) -> Option<usize> {
    let tab = HASH_TABLE.read();
    tab.iter()
        .position(|e| matches!(e, Some(d) if d.name == name))
}

/// Look a hash up by its dotted OID string.
pub fn find_hash_oid(oid: &str) -> Option<usize> {
    let tab = HASH_TABLE.read();
    tab.iter()
        .position(|e| matches!(e, Some(d) if !d.oid.is_empty() && d.oid == oid))
}

/// Check that `slot` holds a live hash registration.
pub fn hash_is_valid(slot: usize) -> CryptResult<()> {
    hash_descriptor(slot).map(|_| ())
}

/// Fetch the descriptor registered at `slot`.
pub fn hash_descriptor(slot: usize) -> CryptResult<&'static HashDescriptor> {
    HASH_TABLE
        .read()
        .get(slot)
        .and_then(|e| *e)
        .ok_or(CryptError::InvalidHash)
}

// ---------------------------------------------------------------------------
// PRNGs
// ---------------------------------------------------------------------------

/// Register a PRNG descriptor; returns its slot.
pub fn register_prng(desc: &'static PrngDescriptor) -> CryptResult<usize> {
    register_in(&PRNG_TABLE, desc, desc.name)
}

/// Remove a PRNG descriptor (matched by identity).
pub fn unregister_prng(desc: &'static PrngDescriptor) -> CryptResult<()> {
    unregister_in(&PRNG_TABLE, desc)
}

/// Look a PRNG up by name.
pub fn find_prng(name: &str) -> Option<usize> {
    let tab = PRNG_TABLE.read();
    tab.iter()
        .position(|e| matches!(e, Some(d) if d.name == name))
}

/// Check that `slot` holds a live PRNG registration.
pub fn prng_is_valid(slot: usize) -> CryptResult<()> {
    prng_descriptor(slot).map(|_| ())
}

/// Fetch the descriptor registered at `slot`.
pub fn prng_descriptor(slot: usize) -> CryptResult<&'static PrngDescriptor> {
    PRNG_TABLE
        .read()
        .get(slot)
        .and_then(|e| *e)
        .ok_or(CryptError::InvalidPrng)
}

// ---------------------------------------------------------------------------
// Bulk registration and self-test dispatch
// ---------------------------------------------------------------------------

/// Register every compiled-in cipher descriptor. Idempotent.
pub fn register_all_ciphers() -> CryptResult<()> {
    for desc in crate::ciphers::ALL_CIPHERS {
        register_cipher(desc)?;
    }
    Ok(())
}

/// Register every compiled-in hash descriptor. Idempotent.
pub fn register_all_hashes() -> CryptResult<()> {
    for desc in crate::hashes::ALL_HASHES {
        register_hash(desc)?;
    }
    Ok(())
}

/// Register every compiled-in PRNG descriptor. Idempotent.
pub fn register_all_prngs() -> CryptResult<()> {
    for desc in crate::prngs::ALL_PRNGS {
        register_prng(desc)?;
    }
    Ok(())
}

/// Outcome of one primitive's self-test inside [`cipher_hash_test`].
#[derive(Debug, Clone)]
pub struct SelfTestReport {
    /// Primitive name.
    pub name: &'static str,
    /// `Ok(())`, `Err(Nop)` for skipped, `Err(FailTestvector)` on mismatch.
    pub result: CryptResult<()>,
}

/// Run the self-test of every registered cipher and hash, plus the SHA-3
/// SHAKE XOFs (tested explicitly because their output is variable-length).
///
/// Returns one report per primitive; the call itself fails with the first
/// `FailTestvector` encountered after the full sweep.
pub fn cipher_hash_test() -> CryptResult<Vec<SelfTestReport>> {
    let mut reports = Vec::new();

    let ciphers: Vec<&'static CipherDescriptor> =
        CIPHER_TABLE.read().iter().flatten().copied().collect();
    for desc in ciphers {
        let result = desc.ops.self_test();
        tracing::trace!(name = desc.name, ok = result.is_ok(), "cipher self-test");
        reports.push(SelfTestReport { name: desc.name, result });
    }

    let hashes: Vec<&'static HashDescriptor> =
        HASH_TABLE.read().iter().flatten().copied().collect();
    for desc in hashes {
        let result = desc.ops.self_test();
        tracing::trace!(name = desc.name, ok = result.is_ok(), "hash self-test");
        reports.push(SelfTestReport { name: desc.name, result });
    }

    reports.push(SelfTestReport {
        name: "shake128",
        result: crate::hashes::shake::shake_test(),
    });

    for report in &reports {
        if let Err(e) = report.result {
            if e != CryptError::Nop {
                return Err(e);
            }
        }
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::cipher::KeySizes;

    struct DummyOps;

    impl CipherOps for DummyOps {
        fn setup(&self, _key: &[u8], _num_rounds: u32) -> CryptResult<Box<dyn ScheduledKey>> {
            Err(CryptError::Nop)
        }

        fn self_test(&self) -> CryptResult<()> {
            Err(CryptError::Nop)
        }
    }

    static DUMMY_OPS: DummyOps = DummyOps;

    static DUMMY_DESC: CipherDescriptor = CipherDescriptor {
        name: "dummy-test-cipher",
        id: 250,
        key_sizes: KeySizes::Exact(&[16]),
        block_length: 16,
        default_rounds: 0,
        ops: &DUMMY_OPS,
    };

    #[test]
    fn test_unregister_frees_name_and_slot_stability() {
        register_all_ciphers().unwrap();
        let aes_slot = find_cipher("aes").unwrap();

        let slot = register_cipher(&DUMMY_DESC).unwrap();
        assert_eq!(find_cipher("dummy-test-cipher"), Some(slot));
        // other slots are unaffected by the new registration
        assert_eq!(find_cipher("aes"), Some(aes_slot));

        unregister_cipher(&DUMMY_DESC).unwrap();
        assert_eq!(find_cipher("dummy-test-cipher"), None);
        assert_eq!(find_cipher("aes"), Some(aes_slot));
        // unregistering twice reports the failure
        assert_eq!(unregister_cipher(&DUMMY_DESC), Err(CryptError::Error));
    }

    #[test]
    fn test_register_is_idempotent() {
        register_all_ciphers().unwrap();
        let a = find_cipher("aes").unwrap();
        let desc = cipher_descriptor(a).unwrap();
        let b = register_cipher(desc).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_find_unknown_is_none() {
        register_all_ciphers().unwrap();
        assert_eq!(find_cipher("no-such-cipher"), None);
    }

    #[test]
    fn test_invalid_slot_rejected() {
        assert_eq!(cipher_is_valid(TAB_SIZE + 1), Err(CryptError::InvalidCipher));
        assert_eq!(hash_is_valid(TAB_SIZE + 1), Err(CryptError::InvalidHash));
        assert_eq!(prng_is_valid(TAB_SIZE + 1), Err(CryptError::InvalidPrng));
    }

    #[test]
    fn test_cipher_hash_test_passes() {
        register_all_ciphers().unwrap();
        register_all_hashes().unwrap();
        let reports = cipher_hash_test().unwrap();
        assert!(reports.iter().any(|r| r.name == "aes"));
        assert!(reports.iter().any(|r| r.name == "sha256"));
        assert!(reports.iter().any(|r| r.name == "shake128"));
    }
}
