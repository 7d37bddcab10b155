//! Builders for receipts and logs.

use crate::{Address, Log, TransactionHash, TransactionReceipt, H256};

/// Builder for creating `TransactionReceipt` instances with a fluent API.
#[derive(Debug, Clone)]
pub struct TransactionReceiptBuilder {
	hash: TransactionHash,
	block_number: u64,
	success: bool,
	gas_used: u64,
	contract_address: Option<Address>,
	logs: Vec<Log>,
}

impl Default for TransactionReceiptBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl TransactionReceiptBuilder {
	/// Creates a successful receipt in block 1 without logs.
	pub fn new() -> Self {
		Self {
			hash: TransactionHash([0xab; 32]),
			block_number: 1,
			success: true,
			gas_used: 21_000,
			contract_address: None,
			logs: Vec::new(),
		}
	}

	pub fn with_hash(mut self, hash: TransactionHash) -> Self {
		self.hash = hash;
		self
	}

	pub fn with_block_number(mut self, block_number: u64) -> Self {
		self.block_number = block_number;
		self
	}

	pub fn with_success(mut self, success: bool) -> Self {
		self.success = success;
		self
	}

	pub fn with_contract_address(mut self, address: Address) -> Self {
		self.contract_address = Some(address);
		self
	}

	pub fn with_log(mut self, log: Log) -> Self {
		self.logs.push(log);
		self
	}

	pub fn build(self) -> TransactionReceipt {
		TransactionReceipt {
			hash: self.hash,
			block_number: self.block_number,
			success: self.success,
			gas_used: self.gas_used,
			contract_address: self.contract_address,
			logs: self.logs,
		}
	}
}

/// Builder for creating `Log` instances.
#[derive(Debug, Clone)]
pub struct LogBuilder {
	address: Address,
	topics: Vec<H256>,
	data: Vec<u8>,
}

impl Default for LogBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl LogBuilder {
	/// Creates an empty log emitted by `0x11..11`.
	pub fn new() -> Self {
		Self {
			address: Address([0x11; 20]),
			topics: Vec::new(),
			data: Vec::new(),
		}
	}

	pub fn with_address(mut self, address: Address) -> Self {
		self.address = address;
		self
	}

	pub fn with_topic(mut self, topic: H256) -> Self {
		self.topics.push(topic);
		self
	}

	pub fn with_data(mut self, data: Vec<u8>) -> Self {
		self.data = data;
		self
	}

	pub fn build(self) -> Log {
		Log {
			address: self.address,
			topics: self.topics,
			data: self.data,
			block_number: Some(1),
			transaction_hash: None,
		}
	}
}
