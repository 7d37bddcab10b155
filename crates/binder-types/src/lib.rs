//! Common types module for the contract binding runtime.
//!
//! This module defines the data types shared by the transport, configuration
//! and binding crates: addresses, hashes, receipts, interface descriptors,
//! artifact records and per-call execution parameters.

/// Address type and its hex (de)serialization.
pub mod account;
/// Interface descriptors (operations and events) parsed from artifact ABIs.
pub mod abi;
/// Artifact documents and their per-network deployment records.
pub mod artifact;
/// Transaction, receipt and log types exchanged with the transport.
pub mod delivery;
/// Per-call execution parameters and their merge rules.
pub mod params;
/// Utility functions for common type conversions.
pub mod utils;

pub use abi::{OperationDescriptor, OperationKind, Param};
pub use account::Address;
pub use artifact::{Artifact, ArtifactError, EventTopicIndex, NetworkRecord};
pub use delivery::{Log, LogFilter, Transaction, TransactionHash, TransactionReceipt, H256};
pub use params::ExecutionParams;
pub use utils::{
	keccak_topic, parse_address, parse_h256, truncate_id, with_0x_prefix, without_0x_prefix,
};
