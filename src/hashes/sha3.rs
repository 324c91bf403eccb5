//! SHA-3 (Keccak) fixed-output descriptors. The SHAKE XOFs live in
//! [`super::shake`] because their output is variable-length.

use super::digest_descriptor;

digest_descriptor!(
    SHA3_224_OPS, SHA3_224_DESC, sha3::Sha3_224,
    "sha3-224", 16, "2.16.840.1.101.3.4.2.7", 28, 144,
    b"abc", "e642824c3f8cf24ad09234ee7d3c766fc9a3a5168d0c94ad73b46fdf"
);

digest_descriptor!(
    SHA3_256_OPS, SHA3_256_DESC, sha3::Sha3_256,
    "sha3-256", 17, "2.16.840.1.101.3.4.2.8", 32, 136,
    b"abc", "3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532"
);

digest_descriptor!(
    SHA3_384_OPS, SHA3_384_DESC, sha3::Sha3_384,
    "sha3-384", 18, "2.16.840.1.101.3.4.2.9", 48, 104,
    b"abc",
    "ec01498288516fc926459f58e2c6ad8df9b473cb0fc08c2596da7cf0e49be4b298d88cea927ac7f539f1edf228376d25"
);

digest_descriptor!(
    SHA3_512_OPS, SHA3_512_DESC, sha3::Sha3_512,
    "sha3-512", 19, "2.16.840.1.101.3.4.2.10", 64, 72,
    b"abc",
    "b751850b1a57168a5693cd924b6b096e08f621827444f70d884f5d0240d2712e10e116e9192af3c91a7ec57647e3934057340b4cf408d5a56592f8274eec53f0"
);
