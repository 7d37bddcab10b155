//! Alloy-based transport implementation.
//!
//! This module provides the HTTP JSON-RPC transport used by the binding
//! runtime. Transactions are sent with `eth_sendTransaction`, so signing is
//! left to the node's managed accounts.

use crate::{TransportError, TransportInterface};
use alloy_primitives::B256;
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_client::RpcClient;
use alloy_rpc_types::{Filter, TransactionRequest};
use alloy_transport::layers::RetryBackoffLayer;
use alloy_transport::RpcError;
use async_trait::async_trait;
use binder_types::{
	Address, Log, LogFilter, Transaction, TransactionHash, TransactionReceipt, H256,
};
use std::sync::Arc;

/// Alloy-based EVM transport.
///
/// Wraps one type-erased provider for a single node endpoint.
pub struct AlloyTransport {
	provider: DynProvider,
}

impl AlloyTransport {
	/// Creates a transport for the given HTTP RPC URL.
	///
	/// The client retries rate-limited and transient failures with
	/// exponential backoff; no connection is opened until the first request.
	pub fn new(rpc_url: &str) -> Result<Self, TransportError> {
		if rpc_url.is_empty() {
			return Err(TransportError::Configuration(
				"RPC URL cannot be empty".to_string(),
			));
		}

		let url = rpc_url.parse().map_err(|e| {
			TransportError::Configuration(format!("Invalid RPC URL {}: {}", rpc_url, e))
		})?;

		let retry_layer = RetryBackoffLayer::new(
			5,    // max_retry: retry up to 5 times
			1000, // backoff: initial backoff in milliseconds
			10,   // cups: compute units per second
		);

		let client = RpcClient::builder().layer(retry_layer).http(url);

		// No fillers: the node fills nonce, gas and chain id for managed accounts
		let provider = ProviderBuilder::new()
			.disable_recommended_fillers()
			.connect_client(client);

		Ok(Self {
			provider: provider.erased(),
		})
	}
}

/// Maps an alloy transport error, keeping node-side rejections distinct from
/// connectivity failures.
fn map_rpc_error(context: &str, error: alloy_transport::TransportError) -> TransportError {
	match error {
		RpcError::ErrorResp(payload) => {
			TransportError::Rejected(format!("{}: {}", context, payload.message))
		},
		other => TransportError::Network(format!("{}: {}", context, other)),
	}
}

fn convert_log(log: &alloy_rpc_types::Log) -> Log {
	Log {
		address: Address::from(log.address()),
		topics: log.topics().iter().map(|topic| H256(topic.0)).collect(),
		data: log.inner.data.data.to_vec(),
		block_number: log.block_number,
		transaction_hash: log.transaction_hash.map(|hash| TransactionHash(hash.0)),
	}
}

#[async_trait]
impl TransportInterface for AlloyTransport {
	async fn network_id(&self) -> Result<String, TransportError> {
		let version = self
			.provider
			.get_net_version()
			.await
			.map_err(|e| map_rpc_error("Failed to get network version", e))?;

		Ok(version.to_string())
	}

	async fn call(&self, tx: Transaction) -> Result<Vec<u8>, TransportError> {
		let request: TransactionRequest = tx.into();

		let result = self
			.provider
			.call(request)
			.await
			.map_err(|e| map_rpc_error("Failed to execute eth_call", e))?;

		Ok(result.to_vec())
	}

	async fn send_transaction(&self, tx: Transaction) -> Result<TransactionHash, TransportError> {
		let request: TransactionRequest = tx.into();

		tracing::debug!(
			"Sending transaction: to={:?}, value={:?}, data_len={}, gas_limit={:?}",
			request.to,
			request.value,
			request.input.input().map(|d| d.len()).unwrap_or(0),
			request.gas
		);

		let pending_tx = self.provider.send_transaction(request).await.map_err(|e| {
			tracing::error!("Transaction submission failed: {}", e);
			map_rpc_error("Failed to send transaction", e)
		})?;

		Ok(TransactionHash(pending_tx.tx_hash().0))
	}

	async fn estimate_gas(&self, tx: Transaction) -> Result<u64, TransportError> {
		let request: TransactionRequest = tx.into();

		self.provider
			.estimate_gas(request)
			.await
			.map_err(|e| map_rpc_error("Failed to estimate gas", e))
	}

	async fn get_receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<Option<TransactionReceipt>, TransportError> {
		let tx_hash = B256::from(hash.0);

		let receipt = self
			.provider
			.get_transaction_receipt(tx_hash)
			.await
			.map_err(|e| map_rpc_error("Failed to get receipt", e))?;

		Ok(receipt.map(|receipt| TransactionReceipt {
			hash: TransactionHash(receipt.transaction_hash.0),
			block_number: receipt.block_number.unwrap_or(0),
			success: receipt.status(),
			gas_used: receipt.gas_used,
			contract_address: receipt.contract_address.map(Address::from),
			logs: receipt.inner.logs().iter().map(convert_log).collect(),
		}))
	}

	async fn block_number(&self) -> Result<u64, TransportError> {
		self.provider
			.get_block_number()
			.await
			.map_err(|e| map_rpc_error("Failed to get block number", e))
	}

	async fn get_logs(&self, filter: &LogFilter) -> Result<Vec<Log>, TransportError> {
		let mut query = Filter::new().address(alloy_primitives::Address::from(filter.address));
		if !filter.topics.is_empty() {
			let topics: Vec<B256> = filter.topics.iter().map(|t| B256::from(t.0)).collect();
			query = query.event_signature(topics);
		}
		if let Some(from_block) = filter.from_block {
			query = query.from_block(from_block);
		}
		if let Some(to_block) = filter.to_block {
			query = query.to_block(to_block);
		}

		let logs = self
			.provider
			.get_logs(&query)
			.await
			.map_err(|e| map_rpc_error("Failed to get logs", e))?;

		Ok(logs.iter().map(convert_log).collect())
	}
}

/// Creates a shared HTTP transport from an RPC URL.
pub fn create_http_transport(
	rpc_url: &str,
) -> Result<Arc<dyn TransportInterface>, TransportError> {
	let transport = AlloyTransport::new(rpc_url)?;
	tracing::info!(rpc_url = %rpc_url, "Created HTTP transport");
	Ok(Arc::new(transport))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_alloy_transport_new_success() {
		let result = AlloyTransport::new("http://localhost:8545");
		assert!(result.is_ok());
	}

	#[test]
	fn test_alloy_transport_empty_url() {
		let result = AlloyTransport::new("");
		assert!(matches!(result, Err(TransportError::Configuration(_))));
		if let Err(TransportError::Configuration(msg)) = result {
			assert!(msg.contains("RPC URL cannot be empty"));
		}
	}

	#[test]
	fn test_alloy_transport_invalid_url() {
		let result = AlloyTransport::new("not a url");
		assert!(matches!(result, Err(TransportError::Configuration(_))));
	}

	#[test]
	fn test_create_http_transport() {
		assert!(create_http_transport("http://127.0.0.1:7545").is_ok());
	}

	#[test]
	fn test_convert_log() {
		let address = alloy_primitives::Address::repeat_byte(0x22);
		let log = alloy_rpc_types::Log {
			inner: alloy_primitives::Log::new_unchecked(
				address,
				vec![B256::repeat_byte(0x33)],
				vec![0x01, 0x02].into(),
			),
			block_number: Some(7),
			..Default::default()
		};

		let converted = convert_log(&log);
		assert_eq!(converted.address, Address([0x22; 20]));
		assert_eq!(converted.topics, vec![H256([0x33; 32])]);
		assert_eq!(converted.data, vec![0x01, 0x02]);
		assert_eq!(converted.block_number, Some(7));
		assert!(converted.transaction_hash.is_none());
	}
}
