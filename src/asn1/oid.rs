//! Textual OID conversions (`1.2.840.113549.1.1.1` ↔ component lists).

use crate::error::{CryptError, CryptResult};

/// Parse a dotted OID string into numeric components.
pub fn oid_str_to_num(oid: &str) -> CryptResult<Vec<u32>> {
    if oid.is_empty() {
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    let mut current: u32 = 0;
    let mut seen_digit = false;
    for c in oid.chars() {
        match c {
            '.' => {
                if !seen_digit {
                    return Err(CryptError::Error);
                }
                out.push(current);
                current = 0;
                seen_digit = false;
            }
            '0'..='9' => {
                current = current
                    .checked_mul(10)
                    .and_then(|v| v.checked_add(c as u32 - '0' as u32))
                    .ok_or(CryptError::Overflow)?;
                seen_digit = true;
            }
            _ => return Err(CryptError::Error),
        }
    }
    if !seen_digit || out.is_empty() {
        // a single component is not an OID
        return Err(CryptError::Error);
    }
    out.push(current);
    Ok(out)
}

/// Render numeric components as a dotted OID string.
pub fn oid_num_to_str(oid: &[u32]) -> CryptResult<String> {
    if oid.is_empty() {
        return Err(CryptError::InvalidArg);
    }
    let parts: Vec<String> = oid.iter().map(|c| c.to_string()).collect();
    Ok(parts.join("."))
}
