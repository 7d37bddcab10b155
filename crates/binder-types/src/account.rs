//! Account-related types for the binding runtime.
//!
//! Contract instances are bound to exactly one address, so the address type
//! is a fixed 20-byte value rather than a variable length byte string.

use crate::utils::conversion::parse_address;
use alloy_primitives::{hex, Address as AlloyAddress};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Ledger account or contract address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
	/// Returns the raw address bytes.
	pub fn as_slice(&self) -> &[u8] {
		&self.0
	}
}

/// Custom serialization for Address - serializes as hex string
impl Serialize for Address {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&self.to_string())
	}
}

/// Custom deserialization for Address - accepts hex strings with or without prefix
impl<'de> Deserialize<'de> for Address {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let s = String::deserialize(deserializer)?;
		parse_address(&s).map_err(serde::de::Error::custom)
	}
}

impl fmt::Display for Address {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "0x{}", hex::encode(self.0))
	}
}

impl FromStr for Address {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		parse_address(s)
	}
}

impl From<AlloyAddress> for Address {
	fn from(addr: AlloyAddress) -> Self {
		let mut bytes = [0u8; 20];
		bytes.copy_from_slice(addr.as_slice());
		Address(bytes)
	}
}

impl From<Address> for AlloyAddress {
	fn from(addr: Address) -> Self {
		AlloyAddress::from(addr.0)
	}
}
