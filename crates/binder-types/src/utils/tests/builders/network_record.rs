//! Builder for per-network deployment records.

use crate::{Address, NetworkRecord, OperationDescriptor};
use std::collections::BTreeMap;

/// Builder for creating `NetworkRecord` instances with a fluent API.
#[derive(Debug, Clone, Default)]
pub struct NetworkRecordBuilder {
	abi: Vec<OperationDescriptor>,
	unlinked_binary: String,
	address: Option<Address>,
	links: BTreeMap<String, String>,
}

impl NetworkRecordBuilder {
	/// Creates a record with an empty interface and a trivial bytecode.
	pub fn new() -> Self {
		Self {
			unlinked_binary: "0x6060".to_string(),
			..Default::default()
		}
	}

	/// Parses the interface from JSON entries.
	pub fn with_abi_json(mut self, abi: serde_json::Value) -> Self {
		self.abi = serde_json::from_value(abi).expect("Invalid test ABI");
		self
	}

	pub fn with_binary(mut self, binary: &str) -> Self {
		self.unlinked_binary = binary.to_string();
		self
	}

	pub fn with_address(mut self, address: Address) -> Self {
		self.address = Some(address);
		self
	}

	pub fn with_link(mut self, name: &str, address: &str) -> Self {
		self.links.insert(name.to_string(), address.to_string());
		self
	}

	/// Builds the record, deriving its topic index from the interface.
	pub fn build(self) -> NetworkRecord {
		let mut record = NetworkRecord {
			abi: self.abi,
			unlinked_binary: self.unlinked_binary,
			address: self.address,
			events: Default::default(),
			updated_at: None,
			links: self.links,
		};
		record.ensure_topic_index();
		record
	}
}
