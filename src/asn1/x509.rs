//! X.509 public-key extraction: walk a certificate's decoded tree and pull
//! out the SubjectPublicKeyInfo subtree.

use super::spki::{spki_from_value, Spki};
use super::value::{der_decode_exact, DerValue};
use crate::error::{CryptError, CryptResult};

/// Whether this node has the SPKI shape: a two-member SEQUENCE whose first
/// child is a SEQUENCE led by an OID and whose second child is a BIT
/// STRING.
fn looks_like_spki(node: &DerValue) -> bool {
    let children = match node {
        DerValue::Sequence(c) if c.len() == 2 => c,
        _ => return false,
    };
    let alg_ok = matches!(&children[0], DerValue::Sequence(a)
        if matches!(a.first(), Some(DerValue::Oid(_))));
    alg_ok && matches!(&children[1], DerValue::BitString { .. })
}

fn walk(node: &DerValue) -> Option<&DerValue> {
    if looks_like_spki(node) {
        return Some(node);
    }
    for child in node.children() {
        if let Some(found) = walk(child) {
            return Some(found);
        }
    }
    None
}

/// Extract the SubjectPublicKeyInfo from a DER certificate.
pub fn x509_decode_spki(certificate: &[u8]) -> CryptResult<Spki> {
    let tree = der_decode_exact(certificate)?;
    let node = walk(&tree).ok_or(CryptError::InvalidPacket)?;
    spki_from_value(node)
}

#[cfg(test)]
mod tests {
    use super::super::spki::encode_spki;
    use super::*;
    use crate::asn1::value::{der_decode_exact, der_encode, DerInteger};

    /// A miniature certificate-shaped document: the SPKI is nested two
    /// SEQUENCE levels deep among other fields, as in a TBSCertificate.
    fn fake_certificate(spki: &Spki) -> Vec<u8> {
        let spki_der = encode_spki(spki).unwrap();
        let spki_value = der_decode_exact(&spki_der).unwrap();
        let tbs = DerValue::Sequence(vec![
            DerValue::Integer(DerInteger::from_i64(2)),
            DerValue::Sequence(vec![DerValue::Oid(vec![1, 2, 840, 113549, 1, 1, 11]),
                                    DerValue::Null]),
            DerValue::Sequence(vec![DerValue::PrintableString("issuer".into())]),
            spki_value,
        ]);
        der_encode(&DerValue::Sequence(vec![
            tbs,
            DerValue::BitString {
                data: vec![0u8; 4],
                bits: 32,
            },
        ]))
        .unwrap()
    }

    #[test]
    fn test_extracts_nested_spki() {
        let spki = Spki {
            algorithm: vec![1, 3, 101, 112],
            parameters: None,
            public_key: vec![0x42; 32],
        };
        let cert = fake_certificate(&spki);
        assert_eq!(x509_decode_spki(&cert).unwrap(), spki);
    }

    #[test]
    fn test_missing_spki_rejected() {
        let doc = der_encode(&DerValue::Sequence(vec![DerValue::Null])).unwrap();
        assert!(x509_decode_spki(&doc).is_err());
    }
}
