//! SHA-1 and SHA-2 descriptors.

use super::digest_descriptor;

digest_descriptor!(
    SHA1_OPS, SHA1_DESC, sha1::Sha1,
    "sha1", 2, "1.3.14.3.2.26", 20, 64,
    b"abc", "a9993e364706816aba3e25717850c26c9cd0d89d"
);

digest_descriptor!(
    SHA224_OPS, SHA224_DESC, sha2::Sha224,
    "sha224", 10, "2.16.840.1.101.3.4.2.4", 28, 64,
    b"abc", "23097d223405d8228642a477bda255b32aadbce4bda0b3f7e36c9da7"
);

digest_descriptor!(
    SHA256_OPS, SHA256_DESC, sha2::Sha256,
    "sha256", 0, "2.16.840.1.101.3.4.2.1", 32, 64,
    b"abc", "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
);

digest_descriptor!(
    SHA384_OPS, SHA384_DESC, sha2::Sha384,
    "sha384", 4, "2.16.840.1.101.3.4.2.2", 48, 128,
    b"abc",
    "cb00753f45a35e8bb5a03d699ac65007272c32ab0eded1631a8b605a43ff5bed8086072ba1e7cc2358baeca134c825a7"
);

digest_descriptor!(
    SHA512_OPS, SHA512_DESC, sha2::Sha512,
    "sha512", 5, "2.16.840.1.101.3.4.2.3", 64, 128,
    b"abc",
    "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
);
