//! Tiger-192 descriptor.

use super::digest_descriptor;

digest_descriptor!(
    TIGER_OPS, TIGER_DESC, tiger::Tiger,
    "tiger", 1, "1.3.6.1.4.1.11591.12.2", 24, 64,
    b"abc", "2aab1484e8c158f2bfb8c5ff41b57a525129131c957b5f93"
);
