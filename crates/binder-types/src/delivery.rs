//! Transaction delivery types for the binding runtime.
//!
//! This module defines the types exchanged with the transport when a call is
//! simulated, a transaction is submitted, or a receipt is polled: requests,
//! hashes, receipts and event logs.

use crate::utils::conversion::parse_h256;
use crate::Address;
use alloy_primitives::{hex, Bytes, TxKind, U256};
use alloy_rpc_types::{TransactionInput, TransactionRequest};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

macro_rules! hex_bytes32 {
	($name:ident) => {
		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "0x{}", hex::encode(self.0))
			}
		}

		impl Serialize for $name {
			fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
			where
				S: Serializer,
			{
				serializer.serialize_str(&self.to_string())
			}
		}

		impl<'de> Deserialize<'de> for $name {
			fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
			where
				D: Deserializer<'de>,
			{
				let s = String::deserialize(deserializer)?;
				parse_h256(&s)
					.map(|h| $name(h.0))
					.map_err(serde::de::Error::custom)
			}
		}
	};
}

/// Ledger transaction hash, the identifier returned on submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionHash(pub [u8; 32]);

/// Fixed-size hash type for log topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct H256(pub [u8; 32]);

hex_bytes32!(TransactionHash);
hex_bytes32!(H256);

/// Event log emitted by smart contracts.
///
/// Contains event data and indexed parameters (topics).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
	/// Contract address that emitted the log.
	pub address: Address,
	/// Indexed event parameters.
	/// Topic[0] is the event signature hash for non-anonymous events.
	pub topics: Vec<H256>,
	/// Non-indexed event data.
	pub data: Vec<u8>,
	/// Block the log was included in, when known.
	#[serde(default)]
	pub block_number: Option<u64>,
	/// Transaction that emitted the log, when known.
	#[serde(default)]
	pub transaction_hash: Option<TransactionHash>,
}

/// Transaction receipt containing execution details.
///
/// Provides information about a transaction after it has been included in a block,
/// including its success status, logs and any created contract address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
	/// The hash of the transaction.
	pub hash: TransactionHash,
	/// The block number where the transaction was included.
	pub block_number: u64,
	/// Whether the transaction executed successfully.
	pub success: bool,
	/// Gas consumed by the transaction.
	pub gas_used: u64,
	/// Address of the contract created by this transaction, if any.
	pub contract_address: Option<Address>,
	/// Event logs emitted during transaction execution.
	pub logs: Vec<Log>,
}

/// Ledger transaction request.
///
/// Used both for read-only simulation and for submission; `to == None`
/// denotes a contract creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
	/// Sender; left to the node when absent.
	pub from: Option<Address>,
	/// Recipient address (None for contract creation).
	pub to: Option<Address>,
	/// Transaction data/calldata.
	pub data: Vec<u8>,
	/// Value to transfer in native currency.
	pub value: U256,
	/// Transaction nonce (optional, can be filled by provider).
	pub nonce: Option<u64>,
	/// Gas limit for transaction execution.
	pub gas_limit: Option<u64>,
	/// Legacy gas price (for non-EIP-1559 transactions).
	pub gas_price: Option<u128>,
	/// Maximum fee per gas (EIP-1559).
	pub max_fee_per_gas: Option<u128>,
	/// Maximum priority fee per gas (EIP-1559).
	pub max_priority_fee_per_gas: Option<u128>,
}

/// Conversion from our Transaction type to Alloy's TransactionRequest.
impl From<Transaction> for TransactionRequest {
	fn from(tx: Transaction) -> Self {
		let to = match tx.to {
			Some(to) => TxKind::Call(to.into()),
			None => TxKind::Create,
		};

		TransactionRequest {
			from: tx.from.map(Into::into),
			to: Some(to),
			value: Some(tx.value),
			nonce: tx.nonce,
			gas: tx.gas_limit,
			gas_price: tx.gas_price,
			max_fee_per_gas: tx.max_fee_per_gas,
			max_priority_fee_per_gas: tx.max_priority_fee_per_gas,
			input: TransactionInput {
				input: Some(Bytes::from(tx.data)),
				data: None,
			},
			..Default::default()
		}
	}
}

/// Filter for querying past logs of one contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFilter {
	/// Emitting contract.
	pub address: Address,
	/// Accepted values for topic 0; empty accepts any.
	pub topics: Vec<H256>,
	/// First block to scan, inclusive; `None` means earliest.
	pub from_block: Option<u64>,
	/// Last block to scan, inclusive; `None` means latest.
	pub to_block: Option<u64>,
}

impl LogFilter {
	/// Creates a filter over every log emitted by `address`.
	pub fn new(address: Address) -> Self {
		Self {
			address,
			topics: Vec::new(),
			from_block: None,
			to_block: None,
		}
	}

	/// Restricts the filter to the given topic-0 values.
	pub fn with_topics(mut self, topics: Vec<H256>) -> Self {
		self.topics = topics;
		self
	}

	/// Restricts the filter to a block range.
	pub fn with_blocks(mut self, from_block: Option<u64>, to_block: Option<u64>) -> Self {
		self.from_block = from_block;
		self.to_block = to_block;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::parse_address;

	#[test]
	fn test_transaction_hash_display() {
		let hash = TransactionHash([0xab; 32]);
		assert_eq!(hash.to_string(), format!("0x{}", "ab".repeat(32)));
	}

	#[test]
	fn test_h256_serde_round_trip() {
		let json = format!("\"0x{}\"", "cd".repeat(32));
		let topic: H256 = serde_json::from_str(&json).unwrap();
		assert_eq!(topic, H256([0xcd; 32]));
		assert_eq!(serde_json::to_string(&topic).unwrap(), json);
	}

	#[test]
	fn test_call_transaction_into_request() {
		let to = parse_address("0x5fbdb2315678afecb367f032d93f642f64180aa3").unwrap();
		let tx = Transaction {
			to: Some(to),
			data: vec![0xde, 0xad],
			value: U256::from(7u64),
			gas_limit: Some(21_000),
			..Default::default()
		};

		let request: TransactionRequest = tx.into();
		assert_eq!(request.to, Some(TxKind::Call(to.into())));
		assert_eq!(request.value, Some(U256::from(7u64)));
		assert_eq!(request.gas, Some(21_000));
		assert_eq!(
			request.input.input().map(|d| d.to_vec()),
			Some(vec![0xde, 0xad])
		);
	}

	#[test]
	fn test_creation_transaction_into_request() {
		let request: TransactionRequest = Transaction::default().into();
		assert_eq!(request.to, Some(TxKind::Create));
		assert!(request.from.is_none());
	}
}
