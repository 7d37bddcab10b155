//! Transport module for the contract binding runtime.
//!
//! This module defines the narrow interface the binding layer needs from a
//! ledger node: network identity, read-only calls, transaction submission,
//! gas estimation, receipt lookup and log queries. Connection management and
//! retries belong to the implementations, never to the callers.

use async_trait::async_trait;
use binder_types::{Log, LogFilter, Transaction, TransactionHash, TransactionReceipt};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod evm {
		pub mod alloy;
	}
}

/// Errors that can occur while talking to a ledger node.
#[derive(Debug, Error)]
pub enum TransportError {
	/// Error that occurs during network communication.
	#[error("Network error: {0}")]
	Network(String),
	/// The node answered the request with an error (revert, invalid params, ...).
	#[error("Request rejected: {0}")]
	Rejected(String),
	/// The transport could not be configured.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the interface for ledger transports.
///
/// One transport is shared by every contract handle and bound instance
/// created from it; implementations must therefore be cheap to call
/// concurrently.
#[async_trait]
#[cfg_attr(feature = "testing", mockall::automock)]
pub trait TransportInterface: Send + Sync {
	/// Returns the identifier of the network the node is connected to.
	async fn network_id(&self) -> Result<String, TransportError>;

	/// Executes a call against the current state without submitting anything.
	///
	/// Returns the raw return data.
	async fn call(&self, tx: Transaction) -> Result<Vec<u8>, TransportError>;

	/// Submits a state-mutating transaction.
	///
	/// Returns as soon as the node accepted the transaction; confirmation is
	/// tracked separately through [`TransportInterface::get_receipt`].
	async fn send_transaction(&self, tx: Transaction) -> Result<TransactionHash, TransportError>;

	/// Estimates gas units for a transaction without submitting it.
	async fn estimate_gas(&self, tx: Transaction) -> Result<u64, TransportError>;

	/// Looks up the receipt of a transaction.
	///
	/// Returns `Ok(None)` while the transaction is still pending.
	async fn get_receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<Option<TransactionReceipt>, TransportError>;

	/// Returns the number of the latest block.
	async fn block_number(&self) -> Result<u64, TransportError>;

	/// Returns past logs matching the filter.
	async fn get_logs(&self, filter: &LogFilter) -> Result<Vec<Log>, TransportError>;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_transport_error_display() {
		let err = TransportError::Network("connection refused".to_string());
		assert_eq!(err.to_string(), "Network error: connection refused");

		let err = TransportError::Rejected("execution reverted".to_string());
		assert_eq!(err.to_string(), "Request rejected: execution reverted");

		let err = TransportError::Configuration("bad url".to_string());
		assert_eq!(err.to_string(), "Configuration error: bad url");
	}
}
