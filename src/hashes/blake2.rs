//! BLAKE2b/BLAKE2s fixed-output descriptors. The keyed MAC mode lives in
//! `mac::blake2mac`.

use super::digest_descriptor;
use blake2::digest::consts::U32;

type Blake2b256 = blake2::Blake2b<U32>;

digest_descriptor!(
    BLAKE2B_256_OPS, BLAKE2B_256_DESC, Blake2b256,
    "blake2b-256", 21, "1.3.6.1.4.1.1722.12.2.1.8", 32, 128,
    b"abc", "bddd813c634239723171ef3fee98579b94964e3bb1cb3e427262c8c068d52319"
);

digest_descriptor!(
    BLAKE2B_512_OPS, BLAKE2B_512_DESC, blake2::Blake2b512,
    "blake2b-512", 22, "1.3.6.1.4.1.1722.12.2.1.16", 64, 128,
    b"abc",
    "ba80a53f981c4d0d6a2797b69f12f6e94c212f14685ac4b74b12bb6fdbffa2d17d87c5392aab792dc252d5de4533cc9518d38aa8dbf1925ab92386edd4009923"
);

digest_descriptor!(
    BLAKE2S_256_OPS, BLAKE2S_256_DESC, blake2::Blake2s256,
    "blake2s-256", 20, "1.3.6.1.4.1.1722.12.2.2.8", 32, 64,
    b"abc", "508c5e8c327c14e2e1a72ba34eeb452f37458b209ed63a294d999b4c86675982"
);
