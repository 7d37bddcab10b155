//! Dynamic binding of interface descriptors to deployed addresses.
//!
//! An [`Interface`] is the capability table of one network record: the
//! callable operations, the events and the optional fallback. Binding it to
//! an address produces a [`BoundInstance`] that owns its own set of
//! [`Operation`] and [`EventHandle`] members.

mod event;
mod operation;

pub use event::{EventHandle, EventWatch};
pub use operation::Operation;

use crate::dispatch::{CallContext, Invocation};
use crate::ContractError;
use binder_types::{Address, EventTopicIndex, OperationDescriptor, OperationKind, TransactionHash};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Capability table derived from an ordered interface description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interface {
	operations: BTreeMap<String, Arc<OperationDescriptor>>,
	events: Vec<String>,
	fallback: Option<Arc<OperationDescriptor>>,
}

impl Interface {
	/// Builds the table. For overloaded names the last declaration wins.
	pub fn new(abi: &[OperationDescriptor]) -> Self {
		let mut interface = Interface::default();
		for descriptor in abi {
			match descriptor.kind {
				OperationKind::Read | OperationKind::Write => {
					interface
						.operations
						.insert(descriptor.name.clone(), Arc::new(descriptor.clone()));
				},
				OperationKind::Fallback => {
					interface.fallback = Some(Arc::new(descriptor.clone()));
				},
				OperationKind::Event => {
					if !interface.events.contains(&descriptor.name) {
						interface.events.push(descriptor.name.clone());
					}
				},
				OperationKind::Constructor => {},
			}
		}
		interface
	}

	/// Names of the callable operations, sorted.
	pub fn operation_names(&self) -> Vec<&str> {
		self.operations.keys().map(String::as_str).collect()
	}

	/// Names of the declared events, in declaration order.
	pub fn event_names(&self) -> &[String] {
		&self.events
	}

	pub fn operation(&self, name: &str) -> Option<&OperationDescriptor> {
		self.operations.get(name).map(|op| op.as_ref())
	}

	pub fn has_fallback(&self) -> bool {
		self.fallback.is_some()
	}
}

/// A contract interface bound to one deployed address.
#[derive(Debug, Clone)]
pub struct BoundInstance {
	contract_name: String,
	address: Address,
	transaction_hash: Option<TransactionHash>,
	operations: BTreeMap<String, Operation>,
	events: BTreeMap<String, EventHandle>,
	all_events: EventHandle,
	fallback: Option<Operation>,
	topic_index: Arc<EventTopicIndex>,
}

impl BoundInstance {
	pub(crate) fn bind(
		interface: &Interface,
		contract_name: &str,
		address: Address,
		transaction_hash: Option<TransactionHash>,
		context: CallContext,
	) -> Self {
		let context = Arc::new(context);
		let operations = interface
			.operations
			.iter()
			.map(|(name, descriptor)| {
				(
					name.clone(),
					Operation::new(descriptor.clone(), address, context.clone()),
				)
			})
			.collect();
		let events = interface
			.events
			.iter()
			.map(|name| (name.clone(), EventHandle::named(name, address, context.clone())))
			.collect();
		let fallback = interface
			.fallback
			.as_ref()
			.map(|descriptor| Operation::new(descriptor.clone(), address, context.clone()));

		tracing::debug!(
			contract = %contract_name,
			address = %address,
			operations = interface.operations.len(),
			"Bound contract instance"
		);

		Self {
			contract_name: contract_name.to_string(),
			address,
			transaction_hash,
			operations,
			events,
			all_events: EventHandle::all(address, context.clone()),
			fallback,
			topic_index: context.events.clone(),
		}
	}

	pub fn contract_name(&self) -> &str {
		&self.contract_name
	}

	pub fn address(&self) -> Address {
		self.address
	}

	/// Hash of the deployment transaction, for instances created by a deploy.
	pub fn transaction_hash(&self) -> Option<TransactionHash> {
		self.transaction_hash
	}

	/// Returns the named operation.
	pub fn method(&self, name: &str) -> Result<&Operation, ContractError> {
		self.operations
			.get(name)
			.ok_or_else(|| self.unknown_member(name))
	}

	/// Names of the bound operations, sorted.
	pub fn methods(&self) -> Vec<&str> {
		self.operations.keys().map(String::as_str).collect()
	}

	/// Returns the handle of the named event.
	pub fn event(&self, name: &str) -> Result<&EventHandle, ContractError> {
		self.events
			.get(name)
			.ok_or_else(|| self.unknown_member(name))
	}

	/// Handle over every event known to the instance.
	pub fn all_events(&self) -> &EventHandle {
		&self.all_events
	}

	pub fn fallback(&self) -> Option<&Operation> {
		self.fallback.as_ref()
	}

	/// Invokes the named operation through its default route.
	pub async fn invoke(&self, name: &str, args: Vec<Value>) -> Result<Invocation, ContractError> {
		self.method(name)?.invoke(args).await
	}

	/// Topic index the instance decodes logs with.
	pub fn topic_index(&self) -> &EventTopicIndex {
		&self.topic_index
	}

	fn unknown_member(&self, name: &str) -> ContractError {
		ContractError::UnknownMember {
			contract: self.contract_name.clone(),
			name: name.to_string(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::events::AbiEventDecoder;
	use crate::monitoring::BindingSettings;
	use binder_transport::MockTransportInterface;
	use binder_types::utils::tests::builders::{LogBuilder, NetworkRecordBuilder};
	use binder_types::{ExecutionParams, NetworkRecord};
	use serde_json::json;
	use std::sync::atomic::{AtomicUsize, Ordering};

	fn record() -> NetworkRecord {
		NetworkRecordBuilder::new()
			.with_abi_json(json!([
				{ "type": "constructor", "inputs": [] },
				{
					"type": "function", "name": "hours", "constant": true,
					"inputs": [], "outputs": [{ "name": "", "type": "uint256" }]
				},
				{
					"type": "function", "name": "punch", "constant": false,
					"inputs": [], "outputs": []
				},
				{
					"type": "function", "name": "punch", "constant": false,
					"inputs": [{ "name": "at", "type": "uint256" }], "outputs": []
				},
				{ "type": "fallback", "payable": true },
				{
					"type": "event", "name": "Punched", "anonymous": false,
					"inputs": [{ "name": "at", "type": "uint256", "indexed": false }]
				}
			]))
			.build()
	}

	fn context(mock: MockTransportInterface, record: &NetworkRecord) -> CallContext {
		CallContext {
			contract_name: "TimeClock".to_string(),
			transport: Some(Arc::new(mock)),
			defaults: ExecutionParams::default(),
			settings: BindingSettings::default(),
			events: Arc::new(record.events.clone()),
			decoder: Arc::new(AbiEventDecoder),
		}
	}

	#[test]
	fn test_interface_capabilities() {
		let interface = Interface::new(&record().abi);

		assert_eq!(interface.operation_names(), vec!["hours", "punch"]);
		assert_eq!(interface.event_names(), ["Punched".to_string()]);
		assert!(interface.has_fallback());
		assert!(interface.operation("hours").unwrap().is_read_only());
		// Last overload wins
		assert_eq!(interface.operation("punch").unwrap().inputs.len(), 1);
	}

	#[test]
	fn test_instances_do_not_share_members() {
		let record = record();
		let interface = Interface::new(&record.abi);
		let first = BoundInstance::bind(
			&interface,
			"TimeClock",
			Address([0x01; 20]),
			None,
			context(MockTransportInterface::new(), &record),
		);
		let second = BoundInstance::bind(
			&interface,
			"TimeClock",
			Address([0x02; 20]),
			None,
			context(MockTransportInterface::new(), &record),
		);

		assert_eq!(first.method("hours").unwrap().address(), Address([0x01; 20]));
		assert_eq!(second.method("hours").unwrap().address(), Address([0x02; 20]));
		assert_eq!(first.methods(), second.methods());
		assert!(first.fallback().is_some());
	}

	#[test]
	fn test_unknown_member() {
		let record = record();
		let instance = BoundInstance::bind(
			&Interface::new(&record.abi),
			"TimeClock",
			Address([0x01; 20]),
			None,
			context(MockTransportInterface::new(), &record),
		);

		let err = instance.method("missing").unwrap_err();
		assert_eq!(err.to_string(), "TimeClock has no member named 'missing'");
		assert!(instance.event("Missing").is_err());
	}

	#[tokio::test]
	async fn test_past_events() {
		let record = record();
		let topic = record.abi.iter().find(|op| op.name == "Punched").unwrap().topic();
		let mut data = vec![0u8; 32];
		data[31] = 9;
		let log = LogBuilder::new()
			.with_address(Address([0x01; 20]))
			.with_topic(topic)
			.with_data(data)
			.build();

		let mut mock = MockTransportInterface::new();
		mock.expect_get_logs()
			.withf(move |filter| {
				filter.address == Address([0x01; 20])
					&& filter.topics == vec![topic]
					&& filter.from_block == Some(5)
			})
			.times(1)
			.returning(move |_| {
				let log = log.clone();
				Box::pin(async move { Ok(vec![log]) })
			});

		let instance = BoundInstance::bind(
			&Interface::new(&record.abi),
			"TimeClock",
			Address([0x01; 20]),
			None,
			context(mock, &record),
		);

		let events = instance.event("Punched").unwrap().past(Some(5), None).await.unwrap();
		assert_eq!(events.len(), 1);
		assert_eq!(events[0].to_json()["args"]["at"], json!("9"));
		assert_eq!(instance.all_events().filter().topics, vec![topic]);
	}

	#[tokio::test(start_paused = true)]
	async fn test_watch_polls_new_blocks() {
		let record = record();
		let topic = record.abi.iter().find(|op| op.name == "Punched").unwrap().topic();
		let logs: Vec<_> = [3u8, 4]
			.into_iter()
			.map(|at| {
				let mut data = vec![0u8; 32];
				data[31] = at;
				LogBuilder::new()
					.with_address(Address([0x01; 20]))
					.with_topic(topic)
					.with_data(data)
					.build()
			})
			.collect();

		let mut mock = MockTransportInterface::new();
		let calls = Arc::new(AtomicUsize::new(0));
		mock.expect_block_number().returning(move || {
			let block = if calls.fetch_add(1, Ordering::SeqCst) < 2 { 10 } else { 12 };
			Box::pin(async move { Ok(block) })
		});
		mock.expect_get_logs()
			.withf(|filter| filter.from_block == Some(11) && filter.to_block == Some(12))
			.times(1)
			.returning(move |_| {
				let logs = logs.clone();
				Box::pin(async move { Ok(logs) })
			});

		let instance = BoundInstance::bind(
			&Interface::new(&record.abi),
			"TimeClock",
			Address([0x01; 20]),
			None,
			context(mock, &record),
		);

		let mut watch = instance.event("Punched").unwrap().watch(None).await.unwrap();
		let first = watch.next().await.unwrap();
		let second = watch.next().await.unwrap();
		assert_eq!(first.to_json()["args"]["at"], json!("3"));
		assert_eq!(second.to_json()["args"]["at"], json!("4"));

		watch.stop().await;
		assert!(watch.next().await.is_none());
	}

	#[tokio::test]
	async fn test_watch_without_provider() {
		let record = record();
		let context = CallContext {
			transport: None,
			..context(MockTransportInterface::new(), &record)
		};
		let instance = BoundInstance::bind(
			&Interface::new(&record.abi),
			"TimeClock",
			Address([0x01; 20]),
			None,
			context,
		);

		let result = instance.all_events().watch(Some(0)).await;
		assert!(matches!(result, Err(ContractError::Configuration(_))));
	}
}
