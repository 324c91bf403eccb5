// End-to-end public-key tests, cross-validated against the rsa and p256
// crates

use cryptkit::pk::curve25519::{Ed25519Key, X25519Key};
use cryptkit::pk::dh::{dh_group_by_name, DhKey};
use cryptkit::pk::ecc::{EccDomain, EccKey};
use cryptkit::math::Mpi;
use cryptkit::pk::rsa::RsaKey;
use cryptkit::pk::KeyType;
use p256::ecdsa::signature::hazmat::PrehashVerifier;
use rand::rngs::OsRng;

fn sha256() -> usize {
    cryptkit::register_all().unwrap();
    cryptkit::find_hash("sha256").unwrap()
}

#[test]
fn test_rsa_v15_signature_verifies_with_rsa_crate() {
    let hash = sha256();
    let key = RsaKey::generate(&mut OsRng, 1024, 65537).unwrap();
    let msghash = [0x5Au8; 32];
    let sig = key.sign_v15(&mut OsRng, hash, &msghash).unwrap();

    let n = rsa::BigUint::from_bytes_be(&key.n.to_bytes_be());
    let e = rsa::BigUint::from_bytes_be(&key.e.to_bytes_be());
    let public = rsa::RsaPublicKey::new(n, e).unwrap();
    public
        .verify(
            rsa::Pkcs1v15Sign::new::<sha2::Sha256>(),
            &msghash,
            &sig,
        )
        .expect("rsa crate rejected our PKCS1v15 signature");
}

#[test]
fn test_rsa_oaep_interop_with_rsa_crate() {
    let hash = sha256();
    let key = RsaKey::generate(&mut OsRng, 1024, 65537).unwrap();

    let n = rsa::BigUint::from_bytes_be(&key.n.to_bytes_be());
    let e = rsa::BigUint::from_bytes_be(&key.e.to_bytes_be());
    let public = rsa::RsaPublicKey::new(n, e).unwrap();
    let msg = b"interop secret";
    let ct = public
        .encrypt(&mut OsRng, rsa::Oaep::new::<sha2::Sha256>(), msg)
        .unwrap();

    let pt = key.decrypt_oaep(&mut OsRng, hash, b"", &ct).unwrap();
    assert_eq!(pt, msg);
}

#[test]
fn test_ecdsa_p256_signature_verifies_with_p256_crate() {
    cryptkit::register_all().unwrap();
    let key = EccKey::generate(&mut OsRng, EccDomain::by_name("secp256r1").unwrap()).unwrap();
    let msghash = [0x77u8; 32];
    let der_sig = key.sign_hash(&mut OsRng, &msghash).unwrap();

    let verifying =
        p256::ecdsa::VerifyingKey::from_sec1_bytes(&key.export_raw_public().unwrap()).unwrap();
    let sig = p256::ecdsa::Signature::from_der(&der_sig).unwrap();
    verifying
        .verify_prehash(&msghash, &sig)
        .expect("p256 crate rejected our ECDSA signature");
}

#[test]
fn test_ecdsa_all_curves_roundtrip() {
    cryptkit::register_all().unwrap();
    for name in [
        "secp192r1",
        "secp224r1",
        "secp256r1",
        "secp256k1",
        "secp384r1",
        "secp521r1",
    ] {
        let key = EccKey::generate(&mut OsRng, EccDomain::by_name(name).unwrap()).unwrap();
        let hash = [0x11u8; 32];
        let sig = key.sign_hash(&mut OsRng, &hash).unwrap();
        key.verify_hash(&hash, &sig)
            .unwrap_or_else(|e| panic!("{name}: {e}"));
        let sig = key.sign_hash_rfc7518(&mut OsRng, &hash).unwrap();
        key.verify_hash_rfc7518(&hash, &sig)
            .unwrap_or_else(|e| panic!("{name} rfc7518: {e}"));
    }
}

#[test]
fn test_ecdh_spki_interchange() {
    cryptkit::register_all().unwrap();
    let alice = EccKey::generate(&mut OsRng, EccDomain::by_name("secp256r1").unwrap()).unwrap();
    let bob = EccKey::generate(&mut OsRng, EccDomain::by_name("secp256r1").unwrap()).unwrap();

    // Bob only ever sees Alice's SPKI export
    let alice_pub = EccKey::import(&alice.export_spki().unwrap()).unwrap();
    let s1 = bob.shared_secret(&alice_pub).unwrap();
    let s2 = alice.shared_secret(&bob).unwrap();
    assert_eq!(s1, s2);
}

#[test]
fn test_dh_shared_secret_2048() {
    // two key pairs on the 2048-bit MODP group
    let group = dh_group_by_name("2048").unwrap();
    let alice = DhKey::generate_on(&mut OsRng, group).unwrap();
    let bob = DhKey::generate_on(&mut OsRng, group).unwrap();

    let s1 = alice.shared_secret(&bob).unwrap();
    let s2 = bob.shared_secret(&alice).unwrap();
    assert_eq!(s1, s2);
    assert_eq!(s1.len(), 256);

    let bob_pub = bob.export_raw(KeyType::Public).unwrap();
    let imported = DhKey::import_raw(group, &bob_pub).unwrap();
    assert_eq!(alice.shared_secret(&imported).unwrap(), s1);
}

#[test]
fn test_dsa_end_to_end() {
    let key = cryptkit::pk::dsa::DsaKey::generate(&mut OsRng, 20, 96).unwrap();
    let hash = [0xABu8; 20];
    let sig = key.sign_hash_der(&mut OsRng, &hash).unwrap();

    let public = cryptkit::pk::dsa::DsaKey::import(&key.export(KeyType::Public).unwrap()).unwrap();
    public.verify_hash_der(&hash, &sig).unwrap();
}

#[test]
fn test_ed25519_x25519_pkcs8_pem() {
    use cryptkit::asn1::pem::{pem_decode, pem_encode};

    let ed = Ed25519Key::generate(&mut OsRng);
    let pem = pem_encode("PRIVATE KEY", &ed.export_pkcs8().unwrap());
    let body = pem_decode(&pem, None).unwrap().body;
    let back = Ed25519Key::import(&body).unwrap();
    let sig = back.sign(b"pem roundtrip").unwrap();
    ed.verify(b"pem roundtrip", &sig).unwrap();

    let x = X25519Key::generate(&mut OsRng);
    let back = X25519Key::import(&x.export_pkcs8().unwrap()).unwrap();
    assert_eq!(back.public_bytes(), x.public_bytes());
}

#[test]
fn test_rsa_key_pem_with_encryption_headers() {
    // encrypted-PEM interchange of an RSA private key
    use cryptkit::asn1::pem::pem_decode;
    let key = RsaKey::generate(&mut OsRng, 1024, 65537).unwrap();
    let plain_pem = key.export_pem(KeyType::Private).unwrap();
    let body = pem_decode(&plain_pem, None).unwrap().body;
    let back = RsaKey::import(&body).unwrap();
    assert_eq!(back.n, key.n);
}
