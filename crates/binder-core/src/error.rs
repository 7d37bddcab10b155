//! Error type shared by every binding operation.

use binder_transport::TransportError;
use binder_types::TransactionHash;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by contract handles and bound instances.
#[derive(Debug, Error)]
pub enum ContractError {
	/// The handle is missing something it needs (provider, binary, address, ...).
	#[error("{0}")]
	Configuration(String),
	/// The deploy payload still contains library placeholders.
	#[error(
		"{contract} contains unresolved libraries. You must deploy and link the following libraries before you can deploy a new version of {contract}: {}",
		.libraries.join(", ")
	)]
	UnlinkedLibraries {
		contract: String,
		libraries: Vec<String>,
	},
	/// A malformed address was supplied.
	#[error("{0}")]
	InvalidAddress(String),
	/// The artifact has no record for the requested or detected network.
	#[error("{0}")]
	NetworkResolution(String),
	/// The node refused to accept a transaction.
	#[error("Transaction submission failed: {0}")]
	Submission(#[source] TransportError),
	/// No receipt appeared before the synchronization timeout.
	#[error("Transaction {tx_hash} wasn't processed in {} seconds!", .timeout.as_secs_f64())]
	TransactionTimeout {
		tx_hash: TransactionHash,
		timeout: Duration,
		elapsed: Duration,
	},
	/// Any other transport failure.
	#[error("Transport error: {0}")]
	Transport(#[from] TransportError),
	/// Arguments do not match the operation's declared inputs.
	#[error("Invalid arguments: {0}")]
	Argument(String),
	/// Return data or a log could not be decoded.
	#[error("Decoding failed: {0}")]
	Decode(String),
	/// The instance has no operation or event with that name.
	#[error("{contract} has no member named '{name}'")]
	UnknownMember { contract: String, name: String },
	/// A deployment was mined without creating a contract.
	#[error("Deployment transaction {0} did not create a contract")]
	MissingReceiptAddress(TransactionHash),
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_unlinked_libraries_message() {
		let err = ContractError::UnlinkedLibraries {
			contract: "TimeClock".to_string(),
			libraries: vec!["DateLib".to_string(), "MathLib".to_string()],
		};
		assert_eq!(
			err.to_string(),
			"TimeClock contains unresolved libraries. You must deploy and link the following libraries before you can deploy a new version of TimeClock: DateLib, MathLib"
		);
	}

	#[test]
	fn test_timeout_message_uses_configured_seconds() {
		let err = ContractError::TransactionTimeout {
			tx_hash: TransactionHash([0x11; 32]),
			timeout: Duration::from_millis(240_000),
			elapsed: Duration::from_millis(241_000),
		};
		let message = err.to_string();
		assert!(message.starts_with("Transaction 0x1111"));
		assert!(message.ends_with("wasn't processed in 240 seconds!"));
	}

	#[test]
	fn test_submission_keeps_source() {
		let err = ContractError::Submission(TransportError::Rejected("nonce too low".into()));
		assert_eq!(
			err.to_string(),
			"Transaction submission failed: Request rejected: nonce too low"
		);
		assert!(std::error::Error::source(&err).is_some());
	}
}
