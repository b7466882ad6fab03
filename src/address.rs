//! EVM address validation
//!
//! The validator judges the exact string it is given. Callers that accept
//! free-form input are expected to trim it first (see [`crate::session`]).

use alloy_primitives::Address;

use crate::error::CheckError;

/// Check that `input` is a `0x`-prefixed, 40 hex digit EVM address
///
/// No checksum is enforced and whitespace is not stripped, so `" 0x..."`
/// is rejected. Never fails, only returns `false`.
pub fn validate_address(input: &str) -> bool {
    let bytes = input.as_bytes();

    // Should start with 0x and be 42 characters total (0x + 40 hex chars)
    if bytes.len() != 42 {
        return false;
    }

    if bytes[0] != b'0' || !matches!(bytes[1], b'x' | b'X') {
        return false;
    }

    bytes[2..].iter().all(|b| b.is_ascii_hexdigit())
}

/// Validate and convert into a 20-byte address
pub fn parse_address(input: &str) -> Result<Address, CheckError> {
    if !validate_address(input) {
        return Err(CheckError::Validation);
    }

    let mut raw = [0u8; 20];
    hex::decode_to_slice(&input[2..], &mut raw).map_err(|_| CheckError::Validation)?;

    Ok(Address::from(raw))
}
