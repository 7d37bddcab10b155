//! Conversion utilities for common data transformations.

use super::formatting::without_0x_prefix;
use crate::{Address, H256};
use alloy_primitives::{hex, keccak256};

/// Parse a hex string address to the binding Address type.
///
/// Accepts the string with or without "0x" prefix.
///
/// # Returns
/// * `Ok(Address)` if the string is a valid 20-byte address
/// * `Err(String)` with error description if parsing fails
pub fn parse_address(hex_str: &str) -> Result<Address, String> {
	let bytes = hex::decode(without_0x_prefix(hex_str)).map_err(|e| format!("Invalid hex: {}", e))?;
	let array: [u8; 20] = bytes.as_slice().try_into().map_err(|_| {
		format!(
			"Invalid address length: expected 20 bytes, got {}",
			bytes.len()
		)
	})?;
	Ok(Address(array))
}

/// Parse a hex string into a 32-byte hash.
pub fn parse_h256(hex_str: &str) -> Result<H256, String> {
	let bytes = hex::decode(without_0x_prefix(hex_str)).map_err(|e| format!("Invalid hex: {}", e))?;
	let array: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
		format!(
			"Invalid hash length: expected 32 bytes, got {}",
			bytes.len()
		)
	})?;
	Ok(H256(array))
}

/// Computes the log topic of a canonical event signature such as
/// `Transfer(address,address,uint256)`.
pub fn keccak_topic(signature: &str) -> H256 {
	H256(keccak256(signature.as_bytes()).0)
}
