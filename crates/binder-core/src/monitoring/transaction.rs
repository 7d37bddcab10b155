//! Transaction monitoring for submitted transactions.
//!
//! Submits a transaction, then polls for its receipt at a fixed interval
//! until the receipt appears or the synchronization timeout elapses.

use crate::events::{decode_logs, DecodedEvent, EventDecoder};
use crate::ContractError;
use binder_config::BindingConfig;
use binder_transport::TransportInterface;
use binder_types::{truncate_id, EventTopicIndex, Transaction, TransactionHash, TransactionReceipt};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

/// Confirmation settings applied by a contract handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingSettings {
	/// How long to wait for a receipt. Zero waits forever.
	pub synchronization_timeout: Duration,
	/// Delay between receipt polls.
	pub poll_interval: Duration,
	/// Resolve transactions with hash, receipt and decoded logs.
	pub extended_results: bool,
}

impl Default for BindingSettings {
	fn default() -> Self {
		Self::from(&BindingConfig::default())
	}
}

impl From<&BindingConfig> for BindingSettings {
	fn from(config: &BindingConfig) -> Self {
		Self {
			synchronization_timeout: Duration::from_millis(config.synchronization_timeout_ms),
			poll_interval: Duration::from_millis(config.poll_interval_ms),
			extended_results: config.extended_results,
		}
	}
}

/// Receipt and decoded logs of a confirmed transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionOutcome {
	pub tx: TransactionHash,
	pub receipt: TransactionReceipt,
	/// Logs whose topic is a known event of the contract.
	pub logs: Vec<DecodedEvent>,
}

/// Result of a confirmed state-mutating operation.
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionResult {
	/// Bare transaction hash.
	Hash(TransactionHash),
	/// Hash together with receipt and decoded logs.
	Extended(TransactionOutcome),
}

impl TransactionResult {
	pub fn tx_hash(&self) -> TransactionHash {
		match self {
			TransactionResult::Hash(hash) => *hash,
			TransactionResult::Extended(outcome) => outcome.tx,
		}
	}

	pub fn to_json(&self) -> Value {
		match self {
			TransactionResult::Hash(hash) => Value::String(hash.to_string()),
			TransactionResult::Extended(outcome) => json!({
				"tx": outcome.tx.to_string(),
				"receipt": serde_json::to_value(&outcome.receipt).unwrap_or(Value::Null),
				"logs": outcome.logs.iter().map(DecodedEvent::to_json).collect::<Vec<_>>(),
			}),
		}
	}
}

/// Monitor for transactions submitted on behalf of one contract instance.
///
/// Polls receipt status at regular intervals until confirmation or timeout,
/// then decodes the receipt logs against the instance's topic index.
#[derive(Clone)]
pub struct TransactionMonitor {
	transport: Arc<dyn TransportInterface>,
	settings: BindingSettings,
	events: Arc<EventTopicIndex>,
	decoder: Arc<dyn EventDecoder>,
}

impl TransactionMonitor {
	pub fn new(
		transport: Arc<dyn TransportInterface>,
		settings: BindingSettings,
		events: Arc<EventTopicIndex>,
		decoder: Arc<dyn EventDecoder>,
	) -> Self {
		Self {
			transport,
			settings,
			events,
			decoder,
		}
	}

	/// Submits `tx` and waits for its receipt.
	pub async fn submit(&self, tx: Transaction) -> Result<TransactionResult, ContractError> {
		let tx_hash = self.send(tx).await?;
		let receipt = self.wait_for_receipt(tx_hash).await?;
		Ok(self.shape(tx_hash, receipt))
	}

	/// Submits `tx` without waiting for confirmation.
	pub async fn send(&self, tx: Transaction) -> Result<TransactionHash, ContractError> {
		let tx_hash = self
			.transport
			.send_transaction(tx)
			.await
			.map_err(ContractError::Submission)?;
		tracing::debug!(tx_hash = %truncate_id(&tx_hash.to_string()), "Transaction submitted");
		Ok(tx_hash)
	}

	/// Polls for the receipt of `tx_hash`.
	///
	/// The receipt is checked before the timeout on every round, so a receipt
	/// that arrives on the final poll still resolves.
	#[instrument(skip_all, fields(tx_hash = %truncate_id(&tx_hash.to_string())))]
	pub async fn wait_for_receipt(
		&self,
		tx_hash: TransactionHash,
	) -> Result<TransactionReceipt, ContractError> {
		let timeout = self.settings.synchronization_timeout;
		let start_time = tokio::time::Instant::now();
		let mut attempts: u32 = 0;

		loop {
			attempts += 1;
			if let Some(receipt) = self.transport.get_receipt(&tx_hash).await? {
				if !receipt.success {
					tracing::warn!(block = receipt.block_number, "Transaction reverted");
				} else {
					tracing::info!(block = receipt.block_number, attempts, "Transaction confirmed");
				}
				return Ok(receipt);
			}

			let elapsed = start_time.elapsed();
			if !timeout.is_zero() && elapsed > timeout {
				tracing::warn!(
					attempts,
					"Receipt polling timeout reached after {} seconds",
					timeout.as_secs_f64()
				);
				return Err(ContractError::TransactionTimeout {
					tx_hash,
					timeout,
					elapsed,
				});
			}

			tokio::time::sleep(self.settings.poll_interval).await;
		}
	}

	fn shape(&self, tx_hash: TransactionHash, receipt: TransactionReceipt) -> TransactionResult {
		if !self.settings.extended_results {
			return TransactionResult::Hash(tx_hash);
		}
		let logs = decode_logs(self.decoder.as_ref(), &self.events, &receipt.logs);
		TransactionResult::Extended(TransactionOutcome {
			tx: tx_hash,
			receipt,
			logs,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::events::AbiEventDecoder;
	use binder_transport::{MockTransportInterface, TransportError};
	use binder_types::utils::tests::builders::{LogBuilder, TransactionReceiptBuilder};
	use binder_types::{OperationDescriptor, H256};
	use std::sync::atomic::{AtomicUsize, Ordering};

	fn settings(timeout_ms: u64, extended_results: bool) -> BindingSettings {
		BindingSettings {
			synchronization_timeout: Duration::from_millis(timeout_ms),
			poll_interval: Duration::from_millis(1_000),
			extended_results,
		}
	}

	fn monitor(mock: MockTransportInterface, settings: BindingSettings) -> TransactionMonitor {
		TransactionMonitor::new(
			Arc::new(mock),
			settings,
			Arc::new(EventTopicIndex::new()),
			Arc::new(AbiEventDecoder),
		)
	}

	fn pending_then_receipt(
		mock: &mut MockTransportInterface,
		pending: usize,
		calls: Arc<AtomicUsize>,
	) {
		let receipt = TransactionReceiptBuilder::new().build();
		mock.expect_get_receipt().returning(move |_| {
			let n = calls.fetch_add(1, Ordering::SeqCst);
			let receipt = (n >= pending).then(|| receipt.clone());
			Box::pin(async move { Ok(receipt) })
		});
	}

	#[test]
	fn test_settings_from_config() {
		let settings = BindingSettings::default();
		assert_eq!(settings.synchronization_timeout, Duration::from_secs(240));
		assert_eq!(settings.poll_interval, Duration::from_secs(1));
		assert!(!settings.extended_results);
	}

	#[tokio::test(start_paused = true)]
	async fn test_receipt_after_pending_polls() {
		let calls = Arc::new(AtomicUsize::new(0));
		let mut mock = MockTransportInterface::new();
		pending_then_receipt(&mut mock, 3, calls.clone());

		let start = tokio::time::Instant::now();
		let receipt = monitor(mock, settings(240_000, false))
			.wait_for_receipt(TransactionHash([0xab; 32]))
			.await
			.unwrap();

		assert!(receipt.success);
		assert_eq!(calls.load(Ordering::SeqCst), 4);
		assert!(start.elapsed() >= Duration::from_secs(3));
		assert!(start.elapsed() < Duration::from_secs(4));
	}

	#[tokio::test(start_paused = true)]
	async fn test_timeout_after_configured_duration() {
		let calls = Arc::new(AtomicUsize::new(0));
		let counter = calls.clone();
		let mut mock = MockTransportInterface::new();
		mock.expect_get_receipt().returning(move |_| {
			counter.fetch_add(1, Ordering::SeqCst);
			Box::pin(async { Ok(None) })
		});

		let err = monitor(mock, settings(1_000, false))
			.wait_for_receipt(TransactionHash([0xcd; 32]))
			.await
			.unwrap_err();

		match err {
			ContractError::TransactionTimeout {
				tx_hash,
				timeout,
				elapsed,
			} => {
				assert_eq!(tx_hash, TransactionHash([0xcd; 32]));
				assert_eq!(timeout, Duration::from_secs(1));
				assert!(elapsed > timeout);
			},
			other => panic!("unexpected error: {other}"),
		}
		assert_eq!(calls.load(Ordering::SeqCst), 3);
	}

	#[tokio::test(start_paused = true)]
	async fn test_zero_timeout_polls_until_receipt() {
		let calls = Arc::new(AtomicUsize::new(0));
		let mut mock = MockTransportInterface::new();
		pending_then_receipt(&mut mock, 500, calls.clone());

		let result = monitor(mock, settings(0, false))
			.wait_for_receipt(TransactionHash([0x01; 32]))
			.await;

		assert!(result.is_ok());
		assert_eq!(calls.load(Ordering::SeqCst), 501);
	}

	#[tokio::test(start_paused = true)]
	async fn test_receipt_error_propagates() {
		let mut mock = MockTransportInterface::new();
		mock.expect_get_receipt()
			.times(1)
			.returning(|_| Box::pin(async move { Err(TransportError::Network("connection reset".into())) }));

		let result = monitor(mock, settings(240_000, false))
			.wait_for_receipt(TransactionHash([0x01; 32]))
			.await;
		assert!(matches!(result, Err(ContractError::Transport(_))));
	}

	#[tokio::test(start_paused = true)]
	async fn test_submit_returns_hash() {
		let calls = Arc::new(AtomicUsize::new(0));
		let mut mock = MockTransportInterface::new();
		mock.expect_send_transaction()
			.times(1)
			.returning(|_| Box::pin(async move { Ok(TransactionHash([0xab; 32])) }));
		pending_then_receipt(&mut mock, 1, calls);

		let result = monitor(mock, settings(240_000, false))
			.submit(Transaction::default())
			.await
			.unwrap();
		assert_eq!(result, TransactionResult::Hash(TransactionHash([0xab; 32])));
		assert_eq!(result.to_json(), Value::String(TransactionHash([0xab; 32]).to_string()));
	}

	#[tokio::test(start_paused = true)]
	async fn test_concurrent_submissions_poll_independently() {
		let polls = Arc::new([AtomicUsize::new(0), AtomicUsize::new(0)]);
		let counters = polls.clone();
		let mut mock = MockTransportInterface::new();
		mock.expect_send_transaction()
			.times(2)
			.returning(|tx| Box::pin(async move { Ok(TransactionHash([tx.data[0]; 32])) }));
		mock.expect_get_receipt().returning(move |hash| {
			let slot = usize::from(hash.0[0]) - 1;
			let pending = if slot == 0 { 2 } else { 5 };
			let receipt = (counters[slot].fetch_add(1, Ordering::SeqCst) >= pending)
				.then(|| TransactionReceiptBuilder::new().with_hash(*hash).build());
			Box::pin(async move { Ok(receipt) })
		});

		let monitor = monitor(mock, settings(240_000, true));
		let first = Transaction {
			data: vec![0x01],
			..Transaction::default()
		};
		let second = Transaction {
			data: vec![0x02],
			..Transaction::default()
		};
		let (first, second) = tokio::join!(monitor.submit(first), monitor.submit(second));

		match (first.unwrap(), second.unwrap()) {
			(TransactionResult::Extended(first), TransactionResult::Extended(second)) => {
				assert_eq!(first.receipt.hash, TransactionHash([0x01; 32]));
				assert_eq!(second.receipt.hash, TransactionHash([0x02; 32]));
			},
			other => panic!("expected extended results, got {other:?}"),
		}
		assert_eq!(polls[0].load(Ordering::SeqCst), 3);
		assert_eq!(polls[1].load(Ordering::SeqCst), 6);
	}

	#[tokio::test(start_paused = true)]
	async fn test_submission_rejected() {
		let mut mock = MockTransportInterface::new();
		mock.expect_send_transaction()
			.returning(|_| Box::pin(async move { Err(TransportError::Rejected("insufficient funds".into())) }));
		mock.expect_get_receipt().never();

		let result = monitor(mock, settings(240_000, false))
			.submit(Transaction::default())
			.await;
		assert!(matches!(result, Err(ContractError::Submission(_))));
	}

	#[tokio::test(start_paused = true)]
	async fn test_extended_result_decodes_known_logs() {
		let event: OperationDescriptor = serde_json::from_value(serde_json::json!({
			"type": "event",
			"name": "Punched",
			"inputs": [{ "name": "count", "type": "uint256", "indexed": false }]
		}))
		.unwrap();
		let mut data = vec![0u8; 32];
		data[31] = 3;
		let known = LogBuilder::new().with_topic(event.topic()).with_data(data).build();
		let unknown = LogBuilder::new().with_topic(H256([0x42; 32])).build();
		let receipt = TransactionReceiptBuilder::new()
			.with_log(known)
			.with_log(unknown)
			.build();

		let mut mock = MockTransportInterface::new();
		mock.expect_send_transaction()
			.returning(|_| Box::pin(async move { Ok(TransactionHash([0xab; 32])) }));
		mock.expect_get_receipt().returning(move |_| {
			let receipt = receipt.clone();
			Box::pin(async move { Ok(Some(receipt)) })
		});

		let index: EventTopicIndex = [(event.topic(), event)].into_iter().collect();
		let monitor = TransactionMonitor::new(
			Arc::new(mock),
			settings(240_000, true),
			Arc::new(index),
			Arc::new(AbiEventDecoder),
		);

		match monitor.submit(Transaction::default()).await.unwrap() {
			TransactionResult::Extended(outcome) => {
				assert_eq!(outcome.tx, TransactionHash([0xab; 32]));
				assert_eq!(outcome.receipt.logs.len(), 2);
				assert_eq!(outcome.logs.len(), 1);
				assert_eq!(outcome.logs[0].event, "Punched");
			},
			other => panic!("expected extended result, got {other:?}"),
		}
	}
}
