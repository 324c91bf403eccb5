// Integration tests for the AEAD modes: authenticity, bit-flip rejection
// and cross-validation against independent implementations

use aes_gcm::aead::{Aead, KeyInit, Payload};
use cryptkit::encauth::chacha20poly1305::{
    chacha20poly1305_memory_decrypt, chacha20poly1305_memory_encrypt,
};
use cryptkit::encauth::eax::{eax_memory_decrypt, eax_memory_encrypt};
use cryptkit::encauth::gcm::{gcm_memory_decrypt, gcm_memory_encrypt};
use cryptkit::encauth::ocb3::{ocb3_memory_decrypt, ocb3_memory_encrypt};
use cryptkit::encauth::{ccm_memory_decrypt, ccm_memory_encrypt};

fn aes() -> usize {
    cryptkit::register_all().unwrap();
    cryptkit::find_cipher("aes").unwrap()
}

#[test]
fn test_every_aead_roundtrip_and_bit_flip() {
    let slot = aes();
    let key = [0x42u8; 16];
    let aad = b"associated".to_vec();
    let pt: Vec<u8> = (0u8..100).collect();

    // (name, ciphertext, tag, decrypt closure)
    type Decrypt = Box<dyn Fn(&[u8], &[u8], &[u8]) -> bool>;
    let cases: Vec<(&str, Vec<u8>, Vec<u8>, Decrypt)> = vec![
        {
            let (ct, tag) = gcm_memory_encrypt(slot, &key, &[1u8; 12], &aad, &pt).unwrap();
            let k = key;
            (
                "gcm",
                ct,
                tag,
                Box::new(move |c, t, a| gcm_memory_decrypt(slot, &k, &[1u8; 12], a, c, t).is_ok()),
            )
        },
        {
            let (ct, tag) = eax_memory_encrypt(slot, &key, b"nonce", &aad, &pt, 16).unwrap();
            let k = key;
            (
                "eax",
                ct,
                tag,
                Box::new(move |c, t, a| eax_memory_decrypt(slot, &k, b"nonce", a, c, t).is_ok()),
            )
        },
        {
            let (ct, tag) = ccm_memory_encrypt(slot, &key, &[2u8; 13], &aad, &pt, 16).unwrap();
            let k = key;
            (
                "ccm",
                ct,
                tag,
                Box::new(move |c, t, a| ccm_memory_decrypt(slot, &k, &[2u8; 13], a, c, t).is_ok()),
            )
        },
        {
            let (ct, tag) = ocb3_memory_encrypt(slot, &key, &[3u8; 12], &aad, &pt, 16).unwrap();
            let k = key;
            (
                "ocb3",
                ct,
                tag,
                Box::new(move |c, t, a| ocb3_memory_decrypt(slot, &k, &[3u8; 12], a, c, t).is_ok()),
            )
        },
    ];

    for (name, ct, tag, decrypt) in cases {
        assert!(decrypt(&ct, &tag, &aad), "{name}: honest decrypt failed");

        let mut bad_ct = ct.clone();
        bad_ct[0] ^= 1;
        assert!(!decrypt(&bad_ct, &tag, &aad), "{name}: ct flip accepted");

        let mut bad_tag = tag.clone();
        bad_tag[0] ^= 1;
        assert!(!decrypt(&ct, &bad_tag, &aad), "{name}: tag flip accepted");

        let mut bad_aad = aad.clone();
        bad_aad[0] ^= 1;
        assert!(!decrypt(&ct, &tag, &bad_aad), "{name}: aad flip accepted");
    }
}

#[test]
fn test_gcm_matches_aes_gcm_crate() {
    let slot = aes();
    let key = [0x10u8; 16];
    let nonce = [0x20u8; 12];
    let aad = b"cross-check aad";
    let pt: Vec<u8> = (0u8..61).collect();

    let (our_ct, our_tag) = gcm_memory_encrypt(slot, &key, &nonce, aad, &pt).unwrap();

    let cipher = aes_gcm::Aes128Gcm::new_from_slice(&key).unwrap();
    let theirs = cipher
        .encrypt(
            aes_gcm::Nonce::from_slice(&nonce),
            Payload { msg: &pt, aad },
        )
        .unwrap();
    // the crate appends the tag to the ciphertext
    assert_eq!(&theirs[..pt.len()], &our_ct[..]);
    assert_eq!(&theirs[pt.len()..], &our_tag[..]);
}

#[test]
fn test_gcm_256_matches_aes_gcm_crate() {
    let slot = aes();
    let key = [0x77u8; 32];
    let nonce = [0x01u8; 12];
    let pt = b"thirty-two byte key cross check".to_vec();

    let (our_ct, our_tag) = gcm_memory_encrypt(slot, &key, &nonce, b"", &pt).unwrap();

    let cipher = aes_gcm::Aes256Gcm::new_from_slice(&key).unwrap();
    let theirs = cipher
        .encrypt(aes_gcm::Nonce::from_slice(&nonce), pt.as_slice())
        .unwrap();
    assert_eq!(&theirs[..pt.len()], &our_ct[..]);
    assert_eq!(&theirs[pt.len()..], &our_tag[..]);
}

#[test]
fn test_chacha20poly1305_matches_crate() {
    let key = [0x55u8; 32];
    let nonce = [0x66u8; 12];
    let aad = b"header";
    let pt: Vec<u8> = (0u8..77).collect();

    let (our_ct, our_tag) = chacha20poly1305_memory_encrypt(&key, &nonce, aad, &pt).unwrap();

    let cipher = chacha20poly1305::ChaCha20Poly1305::new_from_slice(&key).unwrap();
    let theirs = cipher
        .encrypt(
            chacha20poly1305::Nonce::from_slice(&nonce),
            Payload { msg: &pt, aad },
        )
        .unwrap();
    assert_eq!(&theirs[..pt.len()], &our_ct[..]);
    assert_eq!(&theirs[pt.len()..], &our_tag[..]);

    let back = chacha20poly1305_memory_decrypt(&key, &nonce, aad, &our_ct, &our_tag).unwrap();
    assert_eq!(back, pt);
}

#[test]
fn test_nonce_flip_rejected() {
    let slot = aes();
    let key = [9u8; 16];
    let (ct, tag) = gcm_memory_encrypt(slot, &key, &[0u8; 12], b"", b"payload").unwrap();
    let mut flipped = [0u8; 12];
    flipped[11] = 1;
    assert!(gcm_memory_decrypt(slot, &key, &flipped, b"", &ct, &tag).is_err());
}

#[test]
fn test_aead_over_non_aes_128_bit_ciphers() {
    cryptkit::register_all().unwrap();
    // the modes are generic over the registry: run GCM/EAX/OCB3 over other
    // 128-bit block ciphers too
    for name in ["twofish", "serpent", "camellia", "sm4"] {
        let slot = cryptkit::find_cipher(name).unwrap();
        let key = [0x31u8; 16];
        let pt = b"generic aead over the registry".to_vec();
        let (ct, tag) = gcm_memory_encrypt(slot, &key, &[7u8; 12], b"a", &pt).unwrap();
        let back = gcm_memory_decrypt(slot, &key, &[7u8; 12], b"a", &ct, &tag).unwrap();
        assert_eq!(back, pt, "{name} GCM roundtrip failed");

        let (ct, tag) = ocb3_memory_encrypt(slot, &key, &[8u8; 12], b"a", &pt, 16).unwrap();
        let back = ocb3_memory_decrypt(slot, &key, &[8u8; 12], b"a", &ct, &tag).unwrap();
        assert_eq!(back, pt, "{name} OCB3 roundtrip failed");
    }
}

#[test]
fn test_ocb3_over_64_bit_block_cipher() {
    cryptkit::register_all().unwrap();
    let slot = cryptkit::find_cipher("3des").unwrap();
    let key = [0x13u8; 24];
    let pt = b"eight byte blocks".to_vec();
    let (ct, tag) = ocb3_memory_encrypt(slot, &key, &[5u8; 7], b"", &pt, 8).unwrap();
    assert_eq!(tag.len(), 8);
    let back = ocb3_memory_decrypt(slot, &key, &[5u8; 7], b"", &ct, &tag).unwrap();
    assert_eq!(back, pt);
}
