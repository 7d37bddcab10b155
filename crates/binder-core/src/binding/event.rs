//! Event members of a bound instance.

use crate::dispatch::CallContext;
use crate::events::{decode_logs, DecodedEvent, EventDecoder};
use crate::ContractError;
use binder_transport::TransportInterface;
use binder_types::{Address, EventTopicIndex, LogFilter};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

/// Queries or watches occurrences of one event, or of every known event.
#[derive(Clone)]
pub struct EventHandle {
	name: Option<String>,
	address: Address,
	index: Arc<EventTopicIndex>,
	context: Arc<CallContext>,
}

impl std::fmt::Debug for EventHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EventHandle")
			.field("name", &self.name)
			.field("address", &self.address)
			.field("topics", &self.index.len())
			.finish()
	}
}

impl EventHandle {
	/// Handle over the events of `index` whose name is `name`.
	pub(crate) fn named(name: &str, address: Address, context: Arc<CallContext>) -> Self {
		let index = context
			.events
			.iter()
			.filter(|(_, event)| event.name == name)
			.map(|(topic, event)| (*topic, event.clone()))
			.collect();
		Self {
			name: Some(name.to_string()),
			address,
			index: Arc::new(index),
			context,
		}
	}

	/// Handle over every event known to the instance.
	pub(crate) fn all(address: Address, context: Arc<CallContext>) -> Self {
		Self {
			name: None,
			address,
			index: context.events.clone(),
			context,
		}
	}

	/// Event name, `None` for the all-events handle.
	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	/// Log filter matching this handle's topics at the instance address.
	pub fn filter(&self) -> LogFilter {
		LogFilter::new(self.address).with_topics(self.index.keys().copied().collect())
	}

	/// Returns the decoded occurrences within the block range.
	pub async fn past(
		&self,
		from_block: Option<u64>,
		to_block: Option<u64>,
	) -> Result<Vec<DecodedEvent>, ContractError> {
		let filter = self.filter().with_blocks(from_block, to_block);
		let logs = self.context.transport()?.get_logs(&filter).await?;
		tracing::debug!(
			event = self.name.as_deref().unwrap_or("*"),
			logs = logs.len(),
			"Fetched past logs"
		);
		Ok(decode_logs(self.context.decoder.as_ref(), &self.index, &logs))
	}

	/// Starts watching for new occurrences.
	///
	/// Blocks from `from_block` onwards are polled at the binding's poll
	/// interval; without a start block only blocks after the current head are
	/// watched.
	pub async fn watch(&self, from_block: Option<u64>) -> Result<EventWatch, ContractError> {
		let transport = self.context.transport()?.clone();
		let next_block = match from_block {
			Some(block) => block,
			None => transport.block_number().await? + 1,
		};

		let (sender, receiver) = mpsc::unbounded_channel();
		let (stop_tx, stop_rx) = broadcast::channel(1);
		let poller = LogPoller {
			transport,
			decoder: self.context.decoder.clone(),
			index: self.index.clone(),
			filter: self.filter(),
			next_block,
		};
		tracing::debug!(
			event = self.name.as_deref().unwrap_or("*"),
			from_block = next_block,
			"Watching events"
		);
		let handle = tokio::spawn(poller.run(self.context.settings.poll_interval, sender, stop_rx));

		Ok(EventWatch {
			receiver,
			stop_tx,
			handle,
		})
	}
}

/// Stream of decoded events produced by [`EventHandle::watch`].
///
/// Dropping the watch stops the background poller.
#[derive(Debug)]
pub struct EventWatch {
	receiver: mpsc::UnboundedReceiver<DecodedEvent>,
	stop_tx: broadcast::Sender<()>,
	handle: JoinHandle<()>,
}

impl EventWatch {
	/// Waits for the next event; `None` once the poller has stopped.
	pub async fn next(&mut self) -> Option<DecodedEvent> {
		self.receiver.recv().await
	}

	/// Stops polling and waits for the poller to exit.
	pub async fn stop(&mut self) {
		let _ = self.stop_tx.send(());
		let _ = (&mut self.handle).await;
	}
}

impl Drop for EventWatch {
	fn drop(&mut self) {
		self.handle.abort();
	}
}

struct LogPoller {
	transport: Arc<dyn TransportInterface>,
	decoder: Arc<dyn EventDecoder>,
	index: Arc<EventTopicIndex>,
	filter: LogFilter,
	next_block: u64,
}

impl LogPoller {
	async fn run(
		mut self,
		poll_interval: Duration,
		sender: mpsc::UnboundedSender<DecodedEvent>,
		mut stop_rx: broadcast::Receiver<()>,
	) {
		let mut interval = tokio::time::interval(poll_interval.max(Duration::from_millis(1)));
		interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
		interval.tick().await;

		loop {
			tokio::select! {
				_ = interval.tick() => {
					let current_block = match self.transport.block_number().await {
						Ok(block) => block,
						Err(e) => {
							tracing::warn!("Failed to get block number: {}", e);
							continue;
						}
					};
					if current_block < self.next_block {
						continue;
					}

					let filter = self
						.filter
						.clone()
						.with_blocks(Some(self.next_block), Some(current_block));
					let logs = match self.transport.get_logs(&filter).await {
						Ok(logs) => logs,
						Err(e) => {
							tracing::warn!(
								from_block = self.next_block,
								to_block = current_block,
								"Failed to get logs: {}",
								e
							);
							continue;
						}
					};

					for event in decode_logs(self.decoder.as_ref(), &self.index, &logs) {
						if sender.send(event).is_err() {
							return;
						}
					}
					self.next_block = current_block + 1;
				}
				_ = stop_rx.recv() => {
					tracing::debug!("Stopping event watch");
					break;
				}
			}
		}
	}
}
