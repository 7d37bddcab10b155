//! String formatting utilities.
//!
//! Provides functions for formatting strings for display, including
//! hex string prefix management and truncation for readability.

/// Utility function to truncate a hex string for display purposes.
///
/// Shows only the first 10 characters followed by ".." for longer strings,
/// which keeps the `0x` prefix plus four bytes visible in log lines.
pub fn truncate_id(id: &str) -> String {
	if id.len() <= 10 {
		id.to_string()
	} else {
		format!("{}..", &id[..10])
	}
}

/// Prefixes `hex_str` with "0x" unless it already carries either case of it.
pub fn with_0x_prefix(hex_str: &str) -> String {
	if hex_str.to_lowercase().starts_with("0x") {
		hex_str.to_string()
	} else {
		format!("0x{}", hex_str)
	}
}

/// Strips a leading "0x" or "0X".
pub fn without_0x_prefix(hex_str: &str) -> &str {
	hex_str
		.strip_prefix("0x")
		.or_else(|| hex_str.strip_prefix("0X"))
		.unwrap_or(hex_str)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_truncate_id() {
		assert_eq!(truncate_id("0x12345678"), "0x12345678");
		assert_eq!(truncate_id("0x1234567890abcdef"), "0x12345678..");
	}

	#[test]
	fn test_with_0x_prefix() {
		assert_eq!(
			with_0x_prefix("5fbdb2315678afecb367f032d93f642f64180aa3"),
			"0x5fbdb2315678afecb367f032d93f642f64180aa3"
		);
		assert_eq!(
			with_0x_prefix("0x5fbdb2315678afecb367f032d93f642f64180aa3"),
			"0x5fbdb2315678afecb367f032d93f642f64180aa3"
		);
		assert_eq!(with_0x_prefix("0XABCDEF"), "0XABCDEF");
	}

	#[test]
	fn test_without_0x_prefix() {
		assert_eq!(
			without_0x_prefix("0x5fbdb2315678afecb367f032d93f642f64180aa3"),
			"5fbdb2315678afecb367f032d93f642f64180aa3"
		);
		assert_eq!(without_0x_prefix("5fbdb231"), "5fbdb231");
		assert_eq!(without_0x_prefix("0X5fbdb231"), "5fbdb231");
	}
}
