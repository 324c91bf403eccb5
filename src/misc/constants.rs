//! Compile-time constants exposed for binding discovery.
//!
//! Language bindings historically probed these by name instead of parsing
//! headers; the module keeps the `name,value` list format (one pair per
//! line) for that purpose while the constants themselves are ordinary
//! Rust items.

use crate::util::{MAX_BLOCK_LEN, MAX_DIGEST_LEN, MAX_HASH_BLOCK};

/// Marker value: public key operations.
pub const PK_PUBLIC: i64 = 0;
/// Marker value: private key operations.
pub const PK_PRIVATE: i64 = 1;
/// Smallest RSA modulus, bits.
pub const MIN_RSA_SIZE: i64 = crate::pk::rsa::MIN_RSA_SIZE as i64;
/// Largest RSA modulus, bits.
pub const MAX_RSA_SIZE: i64 = crate::pk::rsa::MAX_RSA_SIZE as i64;
/// CTR flag: little-endian counter.
pub const CTR_COUNTER_LITTLE_ENDIAN: i64 = 0;
/// CTR flag: big-endian counter.
pub const CTR_COUNTER_BIG_ENDIAN: i64 = 0x1000;
/// CTR flag: RFC 3686 pre-increment.
pub const CTR_RFC3686: i64 = 0x2000;

const CONSTANTS: &[(&str, i64)] = &[
    ("PK_PUBLIC", PK_PUBLIC),
    ("PK_PRIVATE", PK_PRIVATE),
    ("MIN_RSA_SIZE", MIN_RSA_SIZE),
    ("MAX_RSA_SIZE", MAX_RSA_SIZE),
    ("CTR_COUNTER_LITTLE_ENDIAN", CTR_COUNTER_LITTLE_ENDIAN),
    ("CTR_COUNTER_BIG_ENDIAN", CTR_COUNTER_BIG_ENDIAN),
    ("LTC_CTR_RFC3686", CTR_RFC3686),
];

const SIZES: &[(&str, i64)] = &[
    ("MAX_BLOCK_LEN", MAX_BLOCK_LEN as i64),
    ("MAX_HASH_BLOCK", MAX_HASH_BLOCK as i64),
    ("MAX_DIGEST_LEN", MAX_DIGEST_LEN as i64),
    ("TAB_SIZE", crate::registry::TAB_SIZE as i64),
];

fn find(table: &[(&str, i64)], name: &str) -> Option<i64> {
    table.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
}

fn render(table: &[(&str, i64)]) -> String {
    let mut out = String::new();
    for (name, value) in table {
        out.push_str(name);
        out.push(',');
        out.push_str(&value.to_string());
        out.push('\n');
    }
    out
}

/// Look a named constant up; `None` when unknown.
pub fn get_constant(name: &str) -> Option<i64> {
    find(CONSTANTS, name)
}

/// Look a named size up; `None` when unknown.
pub fn get_size(name: &str) -> Option<i64> {
    find(SIZES, name)
}

/// All constants as `name,value` lines.
pub fn list_all_constants() -> String {
    render(CONSTANTS)
}

/// All sizes as `name,value` lines.
pub fn list_all_sizes() -> String {
    render(SIZES)
}
