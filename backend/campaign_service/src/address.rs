//! Ethereum address and transaction-hash handling.

use crate::errors::{Result, ServiceError};

/// Validate a `0x`-prefixed 20-byte hex address and return it lowercased.
pub fn normalize_address(raw: &str) -> Result<String> {
    let bytes = decode_prefixed(raw.trim(), 20)
        .ok_or_else(|| ServiceError::InvalidInput(format!("invalid address: {raw:?}")))?;
    Ok(format!("0x{}", hex::encode(bytes)))
}

/// Validate a `0x`-prefixed 32-byte transaction hash and return it lowercased.
pub fn normalize_tx_hash(raw: &str) -> Result<String> {
    let bytes = decode_prefixed(raw.trim(), 32)
        .ok_or_else(|| ServiceError::InvalidInput(format!("invalid transaction hash: {raw:?}")))?;
    Ok(format!("0x{}", hex::encode(bytes)))
}

/// `0x1234...abcd`: the prefix plus `chars` leading and trailing digits.
pub fn short_address(address: &str, chars: usize) -> String {
    let digits = address.strip_prefix("0x").unwrap_or(address);
    if digits.len() <= chars * 2 {
        return address.to_string();
    }
    format!(
        "0x{}...{}",
        &digits[..chars],
        &digits[digits.len() - chars..]
    )
}

fn decode_prefixed(raw: &str, len: usize) -> Option<Vec<u8>> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))?;
    let bytes = hex::decode(digits).ok()?;
    (bytes.len() == len).then_some(bytes)
}
