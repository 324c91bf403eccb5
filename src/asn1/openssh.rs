//! The OpenSSH `openssh-key-v1` private-key container: its own magic,
//! KDF name/options, cipher name, public-key blobs and an encrypted
//! private block list.

use super::pem::pem_decode;
use super::ssh::SshReader;
use crate::error::{CryptError, CryptResult};
use crate::modes::{CbcState, CounterEndian, CtrState};
use crate::registry;
use zeroize::Zeroize;

const MAGIC: &[u8] = b"openssh-key-v1\0";

/// Cipher-name table: name → (registry cipher, key length, IV length,
/// CTR?). `chacha20-poly1305@openssh.com` is recognized by the parser but
/// its two-key construction is not implemented here.
const SSH_CIPHERS: &[(&str, &str, usize, usize, bool)] = &[
    ("aes128-cbc", "aes", 16, 16, false),
    ("aes192-cbc", "aes", 24, 16, false),
    ("aes256-cbc", "aes", 32, 16, false),
    ("aes128-ctr", "aes", 16, 16, true),
    ("aes192-ctr", "aes", 24, 16, true),
    ("aes256-ctr", "aes", 32, 16, true),
    ("3des-cbc", "3des", 24, 8, false),
];

/// A decoded (and, when necessary, decrypted) container.
#[derive(Debug)]
pub struct OpenSshKey {
    /// Cipher name from the container.
    pub cipher: String,
    /// KDF name (`none` or `bcrypt`).
    pub kdf: String,
    /// Public-key blobs, one per key, still in SSH wire format.
    pub public_keys: Vec<Vec<u8>>,
    /// The decrypted private section (checkints verified, padding
    /// verified).
    pub private_section: Vec<u8>,
}

/// One private key parsed out of the private section.
#[derive(Debug)]
pub struct OpenSshPrivateEntry {
    /// Key type name ("ssh-ed25519", ...).
    pub key_type: String,
    /// Type-specific wire fields, starting after the type name.
    pub body: Vec<u8>,
    /// Trailing comment.
    pub comment: String,
}

/// Decode an OpenSSH private-key PEM. Encrypted containers need the
/// passphrase.
pub fn decode_openssh_private(text: &str, passphrase: Option<&[u8]>) -> CryptResult<OpenSshKey> {
    let pem = pem_decode(text, None)?;
    if pem.label != "OPENSSH PRIVATE KEY" {
        return Err(CryptError::InvalidPacket);
    }
    decode_openssh_blob(&pem.body, passphrase)
}

/// Decode the binary container (the base64 interior of the PEM).
pub fn decode_openssh_blob(blob: &[u8], passphrase: Option<&[u8]>) -> CryptResult<OpenSshKey> {
    if blob.len() < MAGIC.len() || &blob[..MAGIC.len()] != MAGIC {
        return Err(CryptError::InvalidPacket);
    }
    let mut r = SshReader::new(&blob[MAGIC.len()..]);
    let cipher = String::from_utf8_lossy(r.get_string()?).into_owned();
    let kdf = String::from_utf8_lossy(r.get_string()?).into_owned();
    let kdf_options = r.get_string()?.to_vec();
    let nkeys = r.get_u32()? as usize;
    if nkeys == 0 || nkeys > 16 {
        return Err(CryptError::InvalidPacket);
    }
    let mut public_keys = Vec::with_capacity(nkeys);
    for _ in 0..nkeys {
        public_keys.push(r.get_string()?.to_vec());
    }
    let mut private = r.get_string()?.to_vec();
    if !r.is_empty() {
        return Err(CryptError::InputTooLong);
    }

    match (cipher.as_str(), kdf.as_str()) {
        ("none", "none") => {}
        (_, "bcrypt") => {
            let pass = passphrase.ok_or(CryptError::InvalidArg)?;
            let mut opts = SshReader::new(&kdf_options);
            let salt = opts.get_string()?;
            let rounds = opts.get_u32()?;
            private = decrypt_private(&cipher, pass, salt, rounds, &private)?;
        }
        _ => return Err(CryptError::InvalidPacket),
    }

    // checkint pair must match after decryption
    let mut check = SshReader::new(&private);
    let c1 = check.get_u32()?;
    let c2 = check.get_u32()?;
    if c1 != c2 {
        return Err(CryptError::InvalidPacket);
    }

    Ok(OpenSshKey {
        cipher,
        kdf,
        public_keys,
        private_section: private,
    })
}

fn decrypt_private(
    cipher: &str,
    pass: &[u8],
    salt: &[u8],
    rounds: u32,
    data: &[u8],
) -> CryptResult<Vec<u8>> {
    if cipher == "chacha20-poly1305@openssh.com" {
        return Err(CryptError::InvalidArg);
    }
    let &(_, reg_name, keylen, ivlen, is_ctr) = SSH_CIPHERS
        .iter()
        .find(|(n, ..)| *n == cipher)
        .ok_or(CryptError::InvalidArg)?;
    if rounds == 0 || rounds > 1 << 20 {
        return Err(CryptError::InvalidPacket);
    }
    let mut material = vec![0u8; keylen + ivlen];
    bcrypt_pbkdf::bcrypt_pbkdf(pass, salt, rounds, &mut material)
        .map_err(|_| CryptError::Error)?;
    let (key, iv) = material.split_at(keylen);

    let slot = registry::find_cipher(reg_name).ok_or(CryptError::InvalidCipher)?;
    let mut out = vec![0u8; data.len()];
    if is_ctr {
        let mut st = CtrState::start(slot, iv, key, 0, CounterEndian::Big, 0, false)?;
        st.decrypt(data, &mut out)?;
    } else {
        if data.len() % registry::cipher_descriptor(slot)?.block_length != 0 {
            return Err(CryptError::InvalidPacket);
        }
        let mut st = CbcState::start(slot, iv, key, 0)?;
        st.decrypt(data, &mut out)?;
    }
    material.zeroize();
    Ok(out)
}

/// Parse the private entries out of a decoded container.
pub fn parse_private_entries(key: &OpenSshKey) -> CryptResult<Vec<OpenSshPrivateEntry>> {
    let mut r = SshReader::new(&key.private_section);
    let _ = r.get_u32()?;
    let _ = r.get_u32()?;
    let mut out = Vec::with_capacity(key.public_keys.len());
    for _ in 0..key.public_keys.len() {
        let key_type = String::from_utf8_lossy(r.get_string()?).into_owned();
        // the remainder of this entry depends on the type; capture the
        // fields up to the comment by type-specific sizes
        let body_start = key.private_section.len() - r.remaining().len();
        let field_count = match key_type.as_str() {
            "ssh-ed25519" => 2,  // pubkey, scalar||pubkey
            "ssh-rsa" => 6,      // n, e, d, iqmp, p, q
            "ssh-dss" => 5,      // p, q, g, y, x
            t if t.starts_with("ecdsa-sha2-") => 3, // curve, point, scalar
            _ => return Err(CryptError::InvalidPacket),
        };
        for _ in 0..field_count {
            r.get_string()?;
        }
        let body_end = key.private_section.len() - r.remaining().len();
        let comment = String::from_utf8_lossy(r.get_string()?).into_owned();
        out.push(OpenSshPrivateEntry {
            key_type,
            body: key.private_section[body_start..body_end].to_vec(),
            comment,
        });
    }
    // padding must be the sequence 1, 2, 3, ...
    for (x, &b) in r.remaining().iter().enumerate() {
        if b != (x + 1) as u8 {
            return Err(CryptError::InvalidPacket);
        }
    }
    Ok(out)
}
