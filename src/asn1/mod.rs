//! # ASN.1 DER Codec and Key Containers
//!
//! DER primitive encoders/decoders built around a [`DerValue`] tree (which
//! doubles as the flexi-decoder: any well-formed stream parses into a tree
//! of values a consumer can walk and type-check), plus the higher-level
//! containers every public-key scheme shares: SubjectPublicKeyInfo, PKCS#8,
//! X.509 SPKI extraction, PEM framing, the OpenSSH `openssh-key-v1`
//! container and the RFC 4251 SSH wire codec.
//!
//! The encoder always emits minimal (definite, shortest-form) lengths; the
//! decoder rejects non-minimal long forms, the reserved 0xFF length octet
//! and indefinite lengths.

pub mod oid;
pub mod openssh;
pub mod pem;
pub mod pkcs8;
pub mod spki;
pub mod ssh;
pub mod time;
pub mod value;
pub mod x509;

pub use oid::{oid_num_to_str, oid_str_to_num};
pub use time::{GeneralizedTime, UtcTime};
pub use value::{der_decode, der_decode_exact, der_encode, DerInteger, DerKind, DerValue};

use crate::error::{CryptError, CryptResult};

/// Encode a definite length in minimal form.
pub(crate) fn encode_length(len: usize, out: &mut Vec<u8>) {
    if len < 128 {
        out.push(len as u8);
        return;
    }
    let bytes = len.to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count();
    out.push(0x80 | (bytes.len() - skip) as u8);
    out.extend_from_slice(&bytes[skip..]);
}

/// Decode a definite length; returns `(length, bytes_consumed)`.
pub(crate) fn decode_length(input: &[u8]) -> CryptResult<(usize, usize)> {
    let first = *input.first().ok_or(CryptError::InvalidPacket)?;
    if first < 0x80 {
        return Ok((first as usize, 1));
    }
    if first == 0x80 || first == 0xFF {
        // indefinite and reserved forms are not DER
        return Err(CryptError::InvalidPacket);
    }
    let count = (first & 0x7F) as usize;
    if count > std::mem::size_of::<usize>() || input.len() < 1 + count {
        return Err(CryptError::InvalidPacket);
    }
    let mut len = 0usize;
    for &b in &input[1..1 + count] {
        len = (len << 8) | b as usize;
    }
    // minimal form: no leading zero octet, and the short form must not fit
    if input[1] == 0 || len < 128 {
        return Err(CryptError::InvalidPacket);
    }
    Ok((len, 1 + count))
}
