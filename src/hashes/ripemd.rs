//! RIPEMD family descriptors.

use super::digest_descriptor;

digest_descriptor!(
    RMD128_OPS, RMD128_DESC, ripemd::Ripemd128,
    "rmd128", 8, "1.3.36.3.2.2", 16, 64,
    b"abc", "c14a12199c66e4ba84636b0f69144c77"
);

digest_descriptor!(
    RMD160_OPS, RMD160_DESC, ripemd::Ripemd160,
    "rmd160", 9, "1.3.36.3.2.1", 20, 64,
    b"abc", "8eb208f7e05d987a9b044a8e98c6b087f15a0bfc"
);

digest_descriptor!(
    RMD256_OPS, RMD256_DESC, ripemd::Ripemd256,
    "rmd256", 13, "1.3.36.3.2.3", 32, 64,
    b"abc", "afbd6e228b9d8cbbcef5ca2d03e6dba10ac0bc7dcbe4680e1e42d2e975459b65"
);

digest_descriptor!(
    RMD320_OPS, RMD320_DESC, ripemd::Ripemd320,
    "rmd320", 14, "", 40, 64,
    b"abc",
    "de4c01b3054f8930a79d09ae738e92301e5a17085beffdc1b8d116713e74f82fa942d64cdbc4682d"
);
