//! Ed25519 and X25519 key objects (RFC 8032 / RFC 7748 via the dalek
//! crates) with raw, PKCS#8 (RFC 8410), SPKI and OpenSSH interchange.

use super::KeyType;
use crate::asn1::openssh::{decode_openssh_private, parse_private_entries};
use crate::asn1::pkcs8::{decode_pkcs8, encode_pkcs8};
use crate::asn1::spki::{decode_spki, encode_spki, Spki};
use crate::asn1::ssh::{SshReader, SshWriter};
use crate::asn1::value::{der_decode_exact, der_encode, DerValue};
use crate::error::{CryptError, CryptResult};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand_core::{CryptoRng, RngCore};
use x25519_dalek::{PublicKey as XPublicKey, StaticSecret};
use zeroize::Zeroizing;

/// id-Ed25519.
pub const OID_ED25519: &[u32] = &[1, 3, 101, 112];
/// id-X25519.
pub const OID_X25519: &[u32] = &[1, 3, 101, 110];

// ---------------------------------------------------------------------------
// Ed25519
// ---------------------------------------------------------------------------

/// An Ed25519 key (public, or seed + public).
pub struct Ed25519Key {
    /// Which halves are populated.
    pub key_type: KeyType,
    signing: Option<SigningKey>,
    verifying: VerifyingKey,
}

impl Ed25519Key {
    /// Generate a fresh key pair.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let signing = SigningKey::generate(rng);
        let verifying = signing.verifying_key();
        Self {
            key_type: KeyType::Private,
            signing: Some(signing),
            verifying,
        }
    }

    /// Import a 32-byte private seed.
    pub fn import_raw_private(seed: &[u8]) -> CryptResult<Self> {
        let seed: [u8; 32] = seed.try_into().map_err(|_| CryptError::InvalidKeysize)?;
        let signing = SigningKey::from_bytes(&seed);
        let verifying = signing.verifying_key();
        Ok(Self {
            key_type: KeyType::Private,
            signing: Some(signing),
            verifying,
        })
    }

    /// Import a 32-byte public key.
    pub fn import_raw_public(public: &[u8]) -> CryptResult<Self> {
        let public: [u8; 32] = public.try_into().map_err(|_| CryptError::InvalidKeysize)?;
        let verifying =
            VerifyingKey::from_bytes(&public).map_err(|_| CryptError::InvalidPacket)?;
        Ok(Self {
            key_type: KeyType::Public,
            signing: None,
            verifying,
        })
    }

    /// The 32-byte public key.
    pub fn public_bytes(&self) -> [u8; 32] {
        self.verifying.to_bytes()
    }

    /// The 32-byte private seed.
    pub fn private_bytes(&self) -> CryptResult<[u8; 32]> {
        self.signing
            .as_ref()
            .map(|s| s.to_bytes())
            .ok_or(CryptError::PkNotPrivate)
    }

    /// Deterministic RFC 8032 signature (64 bytes).
    pub fn sign(&self, msg: &[u8]) -> CryptResult<Vec<u8>> {
        let signing = self.signing.as_ref().ok_or(CryptError::PkNotPrivate)?;
        Ok(signing.sign(msg).to_bytes().to_vec())
    }

    /// Verify a 64-byte signature.
    pub fn verify(&self, msg: &[u8], sig: &[u8]) -> CryptResult<()> {
        let sig: [u8; 64] = sig.try_into().map_err(|_| CryptError::InvalidPacket)?;
        self.verifying
            .verify(msg, &Signature::from_bytes(&sig))
            .map_err(|_| CryptError::InvalidPacket)
    }

    /// Export the public key as SPKI DER (RFC 8410: no parameters).
    pub fn export_spki(&self) -> CryptResult<Vec<u8>> {
        encode_spki(&Spki {
            algorithm: OID_ED25519.to_vec(),
            parameters: None,
            public_key: self.public_bytes().to_vec(),
        })
    }

    /// Export the private key as PKCS#8 DER: the inner key is
    /// `OCTET STRING` wrapping the raw seed.
    pub fn export_pkcs8(&self) -> CryptResult<Vec<u8>> {
        let seed = Zeroizing::new(self.private_bytes()?);
        let inner = der_encode(&DerValue::OctetString(seed.to_vec()))?;
        encode_pkcs8(OID_ED25519, None, &inner)
    }

    /// Import SPKI or PKCS#8 DER (auto-detected).
    pub fn import(der: &[u8]) -> CryptResult<Self> {
        if let Ok(spki) = decode_spki(der) {
            if spki.algorithm == OID_ED25519 {
                return Self::import_raw_public(&spki.public_key);
            }
        }
        let p8 = decode_pkcs8(der)?;
        if p8.algorithm != OID_ED25519 {
            return Err(CryptError::PkInvalidType);
        }
        let inner = der_decode_exact(&p8.private_key)?;
        Self::import_raw_private(inner.as_octets()?)
    }

    /// Export the public key as an SSH blob (`string "ssh-ed25519" ∥
    /// string pubkey`).
    pub fn export_ssh_public(&self) -> Vec<u8> {
        let mut w = SshWriter::new();
        w.put_string(b"ssh-ed25519");
        w.put_string(&self.public_bytes());
        w.finish()
    }

    /// Import the first Ed25519 key from an OpenSSH private-key PEM.
    pub fn import_openssh(text: &str, passphrase: Option<&[u8]>) -> CryptResult<Self> {
        let container = decode_openssh_private(text, passphrase)?;
        let entries = parse_private_entries(&container)?;
        let entry = entries
            .iter()
            .find(|e| e.key_type == "ssh-ed25519")
            .ok_or(CryptError::PkInvalidType)?;
        let mut r = SshReader::new(&entry.body);
        let _public = r.get_string()?;
        let scalar = r.get_string()?;
        // the private field is seed ∥ public (64 bytes)
        if scalar.len() != 64 {
            return Err(CryptError::InvalidPacket);
        }
        Self::import_raw_private(&scalar[..32])
    }
}

// ---------------------------------------------------------------------------
// X25519
// ---------------------------------------------------------------------------

/// An X25519 key (public, or scalar + public).
pub struct X25519Key {
    /// Which halves are populated.
    pub key_type: KeyType,
    secret: Option<StaticSecret>,
    public: XPublicKey,
}

impl X25519Key {
    /// Generate a fresh key pair.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let secret = StaticSecret::random_from_rng(rng);
        let public = XPublicKey::from(&secret);
        Self {
            key_type: KeyType::Private,
            secret: Some(secret),
            public,
        }
    }

    /// Import a 32-byte private scalar.
    pub fn import_raw_private(scalar: &[u8]) -> CryptResult<Self> {
        let scalar: [u8; 32] = scalar.try_into().map_err(|_| CryptError::InvalidKeysize)?;
        let secret = StaticSecret::from(scalar);
        let public = XPublicKey::from(&secret);
        Ok(Self {
            key_type: KeyType::Private,
            secret: Some(secret),
            public,
        })
    }

    /// Import a 32-byte public key.
    pub fn import_raw_public(public: &[u8]) -> CryptResult<Self> {
        let public: [u8; 32] = public.try_into().map_err(|_| CryptError::InvalidKeysize)?;
        Ok(Self {
            key_type: KeyType::Public,
            secret: None,
            public: XPublicKey::from(public),
        })
    }

    /// The 32-byte public key.
    pub fn public_bytes(&self) -> [u8; 32] {
        self.public.to_bytes()
    }

    /// RFC 7748 scalar multiplication with the peer's public key.
    pub fn shared_secret(&self, peer: &X25519Key) -> CryptResult<Vec<u8>> {
        let secret = self.secret.as_ref().ok_or(CryptError::PkNotPrivate)?;
        let shared = secret.diffie_hellman(&peer.public);
        // an all-zero output marks a low-order peer point
        if shared.as_bytes().iter().all(|&b| b == 0) {
            return Err(CryptError::InvalidArg);
        }
        Ok(shared.as_bytes().to_vec())
    }

    /// Export the public key as SPKI DER.
    pub fn export_spki(&self) -> CryptResult<Vec<u8>> {
        encode_spki(&Spki {
            algorithm: OID_X25519.to_vec(),
            parameters: None,
            public_key: self.public_bytes().to_vec(),
        })
    }

    /// Export the private key as PKCS#8 DER.
    pub fn export_pkcs8(&self) -> CryptResult<Vec<u8>> {
        let secret = self.secret.as_ref().ok_or(CryptError::PkNotPrivate)?;
        let inner = der_encode(&DerValue::OctetString(secret.to_bytes().to_vec()))?;
        encode_pkcs8(OID_X25519, None, &inner)
    }

    /// Import SPKI or PKCS#8 DER (auto-detected).
    pub fn import(der: &[u8]) -> CryptResult<Self> {
        if let Ok(spki) = decode_spki(der) {
            if spki.algorithm == OID_X25519 {
                return Self::import_raw_public(&spki.public_key);
            }
        }
        let p8 = decode_pkcs8(der)?;
        if p8.algorithm != OID_X25519 {
            return Err(CryptError::PkInvalidType);
        }
        let inner = der_decode_exact(&p8.private_key)?;
        Self::import_raw_private(inner.as_octets()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn test_ed25519_rfc8032_test_1() {
        let seed =
            hex::decode("9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60")
                .unwrap();
        let key = Ed25519Key::import_raw_private(&seed).unwrap();
        assert_eq!(
            hex::encode(key.public_bytes()),
            "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a"
        );
        let sig = key.sign(b"").unwrap();
        assert_eq!(
            hex::encode(&sig),
            "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e06522490155\
             5fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b"
        );
        key.verify(b"", &sig).unwrap();
    }

    #[test]
    fn test_ed25519_tamper_detected() {
        let key = Ed25519Key::generate(&mut OsRng);
        let mut sig = key.sign(b"message").unwrap();
        sig[0] ^= 1;
        assert!(key.verify(b"message", &sig).is_err());
    }

    #[test]
    fn test_ed25519_der_roundtrips() {
        let key = Ed25519Key::generate(&mut OsRng);
        let spki = key.export_spki().unwrap();
        let public = Ed25519Key::import(&spki).unwrap();
        assert_eq!(public.public_bytes(), key.public_bytes());
        assert_eq!(public.key_type, KeyType::Public);

        let p8 = key.export_pkcs8().unwrap();
        let private = Ed25519Key::import(&p8).unwrap();
        assert_eq!(private.public_bytes(), key.public_bytes());
        assert_eq!(private.key_type, KeyType::Private);
    }

    #[test]
    fn test_x25519_rfc7748_dh_vector() {
        let alice_priv =
            hex::decode("77076d0a7318a57d3c16c17251b26645df4c2f87ebc0992ab177fba51db92c2a")
                .unwrap();
        let bob_priv =
            hex::decode("5dab087e624a8a4b79e17f8b83800ee66f3bb1292618b6fd1c2f8b27ff88e0eb")
                .unwrap();
        let alice = X25519Key::import_raw_private(&alice_priv).unwrap();
        let bob = X25519Key::import_raw_private(&bob_priv).unwrap();
        assert_eq!(
            hex::encode(alice.public_bytes()),
            "8520f0098930a754748b7ddcb43ef75a0dbf3a0d26381af4eba4a98eaa9b4e6a"
        );
        let s1 = alice.shared_secret(&bob).unwrap();
        let s2 = bob.shared_secret(&alice).unwrap();
        assert_eq!(s1, s2);
        assert_eq!(
            hex::encode(&s1),
            "4a5d9d5ba4ce2de1728e3bf480350f25e07e21c947d19e3376f09b3c1e161742"
        );
    }

    #[test]
    fn test_x25519_der_roundtrips() {
        let key = X25519Key::generate(&mut OsRng);
        let p8 = key.export_pkcs8().unwrap();
        let back = X25519Key::import(&p8).unwrap();
        assert_eq!(back.public_bytes(), key.public_bytes());
    }

    #[test]
    fn test_openssh_ed25519_import() {
        use crate::asn1::pem::pem_encode;
        use crate::asn1::ssh::SshWriter;

        // build an unencrypted container around a known seed
        let seed = [7u8; 32];
        let key = Ed25519Key::import_raw_private(&seed).unwrap();

        let mut private = SshWriter::new();
        private.put_u32(42);
        private.put_u32(42);
        private.put_string(b"ssh-ed25519");
        private.put_string(&key.public_bytes());
        let mut scalar = seed.to_vec();
        scalar.extend_from_slice(&key.public_bytes());
        private.put_string(&scalar);
        private.put_string(b"test@cryptkit");
        let mut section = private.finish();
        let mut pad = 1u8;
        while section.len() % 8 != 0 {
            section.push(pad);
            pad += 1;
        }

        let mut w = SshWriter::new();
        w.put_string(b"none");
        w.put_string(b"none");
        w.put_string(b"");
        w.put_u32(1);
        w.put_string(&key.export_ssh_public());
        w.put_string(&section);
        let mut blob = b"openssh-key-v1\0".to_vec();
        blob.extend_from_slice(&w.finish());

        let pem = pem_encode("OPENSSH PRIVATE KEY", &blob);
        let imported = Ed25519Key::import_openssh(&pem, None).unwrap();
        assert_eq!(imported.public_bytes(), key.public_bytes());
    }
}
