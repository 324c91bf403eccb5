// Integration tests for the DER codec, PEM framing and the containers

use cryptkit::asn1::value::{der_decode_exact, der_encode, DerInteger, DerValue};
use cryptkit::asn1::{oid_num_to_str, oid_str_to_num, GeneralizedTime, UtcTime};
use cryptkit::math::{Int, Mpi};
use proptest::prelude::*;

#[test]
fn test_der_known_vectors() {
    // INTEGER vectors from the interchange contract
    assert_eq!(
        der_encode(&DerValue::Integer(DerInteger::from_i64(-1))).unwrap(),
        vec![0x02, 0x01, 0xFF]
    );
    assert_eq!(
        der_encode(&DerValue::Integer(DerInteger::from_i64(128))).unwrap(),
        vec![0x02, 0x02, 0x00, 0x80]
    );
    assert_eq!(
        der_encode(&DerValue::Integer(DerInteger::from_i64(0))).unwrap(),
        vec![0x02, 0x01, 0x00]
    );
    // OID vector
    assert_eq!(
        der_encode(&DerValue::Oid(vec![1, 2, 840, 113549, 1, 1, 1])).unwrap(),
        vec![0x06, 0x09, 0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x01]
    );
}

#[test]
fn test_oid_textual_roundtrip() {
    for oid in [
        "1.2.840.113549.1.1.1",
        "1.3.101.112",
        "2.16.840.1.101.3.4.2.1",
        "0.9.2342.19200300.100.1.25",
    ] {
        let num = oid_str_to_num(oid).unwrap();
        assert_eq!(oid_num_to_str(&num).unwrap(), oid);
    }
}

#[test]
fn test_nested_structure_roundtrip() {
    let doc = DerValue::Sequence(vec![
        DerValue::Integer(DerInteger::positive(
            Int::from_radix("deadbeefcafebabe0123456789", 16).unwrap(),
        )),
        DerValue::Set(vec![
            DerValue::PrintableString("printable".into()),
            DerValue::Boolean(true),
        ]),
        DerValue::Sequence(vec![
            DerValue::UtcTime(UtcTime::decode("450722123456Z").unwrap()),
            DerValue::GeneralizedTime(GeneralizedTime::decode("20250722123456.5Z").unwrap()),
        ]),
        DerValue::BitString {
            data: vec![0xDE, 0xAD, 0xC0],
            bits: 18,
        },
        DerValue::Raw {
            tag: 0xA3,
            content: vec![0x02, 0x01, 0x00],
        },
    ]);
    let enc = der_encode(&doc).unwrap();
    let dec = der_decode_exact(&enc).unwrap();
    // canonical: decode(encode(x)) == x and encode(decode(b)) == b
    assert_eq!(der_encode(&dec).unwrap(), enc);
}

proptest! {
    #[test]
    fn prop_octet_string_roundtrip(data in proptest::collection::vec(any::<u8>(), 0..300)) {
        let v = DerValue::OctetString(data.clone());
        let enc = der_encode(&v).unwrap();
        let dec = der_decode_exact(&enc).unwrap();
        prop_assert_eq!(dec, v);
    }

    #[test]
    fn prop_integer_roundtrip(v in any::<i64>()) {
        let value = DerValue::Integer(DerInteger::from_i64(v));
        let enc = der_encode(&value).unwrap();
        let dec = der_decode_exact(&enc).unwrap();
        prop_assert_eq!(dec, value);
    }

    #[test]
    fn prop_uint_roundtrip(bytes in proptest::collection::vec(any::<u8>(), 1..64)) {
        let n = Int::from_bytes_be(&bytes);
        let value = DerValue::uint(&n);
        let enc = der_encode(&value).unwrap();
        let dec = der_decode_exact(&enc).unwrap();
        prop_assert_eq!(dec.as_uint().unwrap(), &n);
    }

    #[test]
    fn prop_garbage_never_panics(data in proptest::collection::vec(any::<u8>(), 0..200)) {
        let _ = cryptkit::asn1::der_decode(&data);
    }
}

#[test]
fn test_pem_roundtrip_and_headers() {
    use cryptkit::asn1::pem::{pem_decode, pem_encode};
    let der: Vec<u8> = (0u8..130).collect();
    let text = pem_encode("EC PRIVATE KEY", &der);
    let parsed = pem_decode(&text, None).unwrap();
    assert_eq!(parsed.label, "EC PRIVATE KEY");
    assert_eq!(parsed.body, der);
    // 64-character lines
    for line in text.lines().skip(1) {
        if !line.starts_with("-----") {
            assert!(line.len() <= 64);
        }
    }
}

#[test]
fn test_x509_spki_extraction_from_real_certificate_shape() {
    use cryptkit::asn1::spki::{encode_spki, Spki};
    use cryptkit::asn1::x509::x509_decode_spki;

    let spki = Spki {
        algorithm: vec![1, 2, 840, 10045, 2, 1],
        parameters: Some(DerValue::Oid(vec![1, 2, 840, 10045, 3, 1, 7])),
        public_key: vec![0x04; 65],
    };
    let spki_der = encode_spki(&spki).unwrap();
    let spki_val = der_decode_exact(&spki_der).unwrap();

    // TBSCertificate-shaped wrapper with fields before and after
    let tbs = DerValue::Sequence(vec![
        DerValue::Raw { tag: 0xA0, content: vec![0x02, 0x01, 0x02] },
        DerValue::Integer(DerInteger::from_i64(0x1122)),
        DerValue::Sequence(vec![
            DerValue::Oid(vec![1, 2, 840, 10045, 4, 3, 2]),
        ]),
        DerValue::Sequence(vec![DerValue::Utf8String("CN=test".into())]),
        spki_val,
        DerValue::Raw { tag: 0xA3, content: vec![] },
    ]);
    let cert = der_encode(&DerValue::Sequence(vec![
        tbs,
        DerValue::Sequence(vec![DerValue::Oid(vec![1, 2, 840, 10045, 4, 3, 2])]),
        DerValue::BitString { data: vec![0u8; 8], bits: 64 },
    ]))
    .unwrap();

    let extracted = x509_decode_spki(&cert).unwrap();
    assert_eq!(extracted, spki);
}
