//! Per-call execution parameters.
//!
//! Execution parameters are the optional trailing options of a contract call
//! (sender, value, gas settings). They merge over the class-level defaults of
//! a contract handle, call-level values taking precedence.

use crate::{Address, Transaction};
use alloy_primitives::{hex, U256};
use serde::{Deserialize, Deserializer, Serialize};

/// Optional execution settings for one call or transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExecutionParams {
	/// Sender of the call or transaction.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub from: Option<Address>,
	/// Value sent along with the call.
	#[serde(
		default,
		skip_serializing_if = "Option::is_none",
		deserialize_with = "quantity::deserialize_u256"
	)]
	pub value: Option<U256>,
	/// Gas limit.
	#[serde(
		default,
		alias = "gasLimit",
		alias = "gas_limit",
		skip_serializing_if = "Option::is_none",
		deserialize_with = "quantity::deserialize_u64"
	)]
	pub gas: Option<u64>,
	/// Legacy gas price in wei.
	#[serde(
		default,
		alias = "gas_price",
		skip_serializing_if = "Option::is_none",
		deserialize_with = "quantity::deserialize_u128"
	)]
	pub gas_price: Option<u128>,
	/// EIP-1559 fee cap in wei.
	#[serde(
		default,
		alias = "max_fee_per_gas",
		skip_serializing_if = "Option::is_none",
		deserialize_with = "quantity::deserialize_u128"
	)]
	pub max_fee_per_gas: Option<u128>,
	/// EIP-1559 priority fee in wei.
	#[serde(
		default,
		alias = "max_priority_fee_per_gas",
		skip_serializing_if = "Option::is_none",
		deserialize_with = "quantity::deserialize_u128"
	)]
	pub max_priority_fee_per_gas: Option<u128>,
	/// Explicit nonce.
	#[serde(
		default,
		skip_serializing_if = "Option::is_none",
		deserialize_with = "quantity::deserialize_u64"
	)]
	pub nonce: Option<u64>,
	/// Explicit payload; overrides generated call data when set.
	#[serde(
		default,
		skip_serializing_if = "Option::is_none",
		deserialize_with = "deserialize_data"
	)]
	pub data: Option<Vec<u8>>,
}

impl ExecutionParams {
	/// Merges `self` over `defaults`; every field set on `self` wins.
	pub fn merged_over(&self, defaults: &ExecutionParams) -> ExecutionParams {
		ExecutionParams {
			from: self.from.or(defaults.from),
			value: self.value.or(defaults.value),
			gas: self.gas.or(defaults.gas),
			gas_price: self.gas_price.or(defaults.gas_price),
			max_fee_per_gas: self.max_fee_per_gas.or(defaults.max_fee_per_gas),
			max_priority_fee_per_gas: self
				.max_priority_fee_per_gas
				.or(defaults.max_priority_fee_per_gas),
			nonce: self.nonce.or(defaults.nonce),
			data: self.data.clone().or_else(|| defaults.data.clone()),
		}
	}

	/// Builds a transaction request targeting `to` with `data` as payload,
	/// unless an explicit payload was supplied.
	pub fn to_transaction(&self, to: Option<Address>, data: Vec<u8>) -> Transaction {
		Transaction {
			from: self.from,
			to,
			data: self.data.clone().unwrap_or(data),
			value: self.value.unwrap_or(U256::ZERO),
			nonce: self.nonce,
			gas_limit: self.gas,
			gas_price: self.gas_price,
			max_fee_per_gas: self.max_fee_per_gas,
			max_priority_fee_per_gas: self.max_priority_fee_per_gas,
		}
	}
}

fn deserialize_data<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
where
	D: Deserializer<'de>,
{
	Option::<String>::deserialize(deserializer)?
		.map(|s| hex::decode(crate::without_0x_prefix(&s)).map_err(serde::de::Error::custom))
		.transpose()
}

/// Numeric quantities arrive as JSON numbers, decimal strings or hex strings.
mod quantity {
	use alloy_primitives::U256;
	use serde::{Deserialize, Deserializer};

	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Quantity {
		Number(u64),
		Text(String),
	}

	fn parse(quantity: Quantity) -> Result<u128, String> {
		match quantity {
			Quantity::Number(n) => Ok(n as u128),
			Quantity::Text(s) => match s.strip_prefix("0x") {
				Some(hex) => u128::from_str_radix(hex, 16),
				None => s.parse::<u128>(),
			}
			.map_err(|e| format!("Invalid quantity '{}': {}", s, e)),
		}
	}

	pub(super) fn deserialize_u256<'de, D>(deserializer: D) -> Result<Option<U256>, D::Error>
	where
		D: Deserializer<'de>,
	{
		let parsed = match Option::<Quantity>::deserialize(deserializer)? {
			None => return Ok(None),
			Some(Quantity::Number(n)) => Ok(U256::from(n)),
			Some(Quantity::Text(s)) => match s.strip_prefix("0x") {
				Some(hex) => U256::from_str_radix(hex, 16),
				None => U256::from_str_radix(&s, 10),
			}
			.map_err(|e| format!("Invalid quantity '{}': {}", s, e)),
		};
		parsed.map(Some).map_err(serde::de::Error::custom)
	}

	pub(super) fn deserialize_u128<'de, D>(deserializer: D) -> Result<Option<u128>, D::Error>
	where
		D: Deserializer<'de>,
	{
		Option::<Quantity>::deserialize(deserializer)?
			.map(parse)
			.transpose()
			.map_err(serde::de::Error::custom)
	}

	pub(super) fn deserialize_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
	where
		D: Deserializer<'de>,
	{
		deserialize_u128(deserializer)?
			.map(u64::try_from)
			.transpose()
			.map_err(serde::de::Error::custom)
	}
}
