//! MD2/MD4/MD5 descriptors, kept for DER DigestInfo interchange with legacy
//! material. Do not use for new signatures.

use super::digest_descriptor;

digest_descriptor!(
    MD2_OPS, MD2_DESC, md2::Md2,
    "md2", 7, "1.2.840.113549.2.2", 16, 16,
    b"abc", "da853b0d3f88d99b30283a69e6ded6bb"
);

digest_descriptor!(
    MD4_OPS, MD4_DESC, md4::Md4,
    "md4", 6, "1.2.840.113549.2.4", 16, 64,
    b"abc", "a448017aaf21d8525fc10ae87aa6729d"
);

digest_descriptor!(
    MD5_OPS, MD5_DESC, md5::Md5,
    "md5", 3, "1.2.840.113549.2.5", 16, 64,
    b"abc", "900150983cd24fb0d6963f7d28e17f72"
);
