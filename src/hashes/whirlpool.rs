//! Whirlpool descriptor.

use super::digest_descriptor;

digest_descriptor!(
    WHIRLPOOL_OPS, WHIRLPOOL_DESC, whirlpool::Whirlpool,
    "whirlpool", 11, "1.0.10118.3.0.55", 64, 64,
    b"abc",
    "4e2448a4c6f486bb16b6562c73b4020bf3043e3a731bce721ae1b303d97e6d4c7181eebdb6c57e277d0e34957114cbd6c797fc9d95d8b582d225292076d4eef5"
);
