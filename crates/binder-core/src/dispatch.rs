//! Routing of operation invocations.
//!
//! Read-only operations are executed as calls against current state and their
//! return data decoded; every other operation is submitted as a transaction
//! and confirmed through the [`TransactionMonitor`].

use crate::codec::{decode_outputs, encode_arguments, to_json};
use crate::events::EventDecoder;
use crate::monitoring::{BindingSettings, TransactionMonitor, TransactionResult};
use crate::params::normalize;
use crate::ContractError;
use alloy_dyn_abi::DynSolValue;
use binder_transport::TransportInterface;
use binder_types::{
	Address, EventTopicIndex, ExecutionParams, OperationDescriptor, Transaction, TransactionHash,
};
use serde_json::Value;
use std::sync::Arc;

/// Everything an instance needs to execute its operations.
///
/// Instances can be bound before a provider is configured; the provider is
/// only required once an operation touches the network.
#[derive(Clone)]
pub(crate) struct CallContext {
	pub contract_name: String,
	pub transport: Option<Arc<dyn TransportInterface>>,
	pub defaults: ExecutionParams,
	pub settings: BindingSettings,
	pub events: Arc<EventTopicIndex>,
	pub decoder: Arc<dyn EventDecoder>,
}

impl CallContext {
	pub fn transport(&self) -> Result<&Arc<dyn TransportInterface>, ContractError> {
		self.transport.as_ref().ok_or_else(|| {
			ContractError::Configuration(format!(
				"{} error: Please call set_provider() first before invoking operations.",
				self.contract_name
			))
		})
	}

	pub fn monitor(&self) -> Result<TransactionMonitor, ContractError> {
		Ok(TransactionMonitor::new(
			self.transport()?.clone(),
			self.settings,
			self.events.clone(),
			self.decoder.clone(),
		))
	}
}

/// Outcome of invoking an operation through its default route.
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
	/// Decoded return values of a read-only call.
	Returned(Vec<DynSolValue>),
	/// Confirmed transaction of a state-mutating operation.
	Submitted(TransactionResult),
}

impl Invocation {
	/// Renders the outcome as JSON; a single return value is unwrapped.
	pub fn to_json(&self) -> Value {
		match self {
			Invocation::Returned(values) if values.len() == 1 => to_json(&values[0]),
			Invocation::Returned(values) => Value::Array(values.iter().map(to_json).collect()),
			Invocation::Submitted(result) => result.to_json(),
		}
	}
}

/// Builds the transaction request for one invocation without sending it.
pub(crate) fn request(
	context: &CallContext,
	operation: &OperationDescriptor,
	address: Address,
	args: Vec<Value>,
) -> Result<Transaction, ContractError> {
	let call = normalize(args, &context.defaults)?;
	let data = encode_arguments(operation, &call.args)?;
	Ok(call.params.to_transaction(Some(address), data))
}

/// Routes by the operation's read-only flag.
pub(crate) async fn invoke(
	context: &CallContext,
	operation: &OperationDescriptor,
	address: Address,
	args: Vec<Value>,
) -> Result<Invocation, ContractError> {
	if operation.is_read_only() {
		call(context, operation, address, args)
			.await
			.map(Invocation::Returned)
	} else {
		send(context, operation, address, args)
			.await
			.map(Invocation::Submitted)
	}
}

/// Executes the operation as a call against current state.
pub(crate) async fn call(
	context: &CallContext,
	operation: &OperationDescriptor,
	address: Address,
	args: Vec<Value>,
) -> Result<Vec<DynSolValue>, ContractError> {
	let tx = request(context, operation, address, args)?;
	let data = context.transport()?.call(tx).await?;
	decode_outputs(operation, &data)
}

/// Submits the operation and waits for confirmation.
pub(crate) async fn send(
	context: &CallContext,
	operation: &OperationDescriptor,
	address: Address,
	args: Vec<Value>,
) -> Result<TransactionResult, ContractError> {
	let tx = request(context, operation, address, args)?;
	context.monitor()?.submit(tx).await
}

/// Submits the operation and returns as soon as the node accepts it.
pub(crate) async fn send_transaction(
	context: &CallContext,
	operation: &OperationDescriptor,
	address: Address,
	args: Vec<Value>,
) -> Result<TransactionHash, ContractError> {
	let tx = request(context, operation, address, args)?;
	context.monitor()?.send(tx).await
}

/// Estimates the gas the operation would consume.
pub(crate) async fn estimate_gas(
	context: &CallContext,
	operation: &OperationDescriptor,
	address: Address,
	args: Vec<Value>,
) -> Result<u64, ContractError> {
	let tx = request(context, operation, address, args)?;
	Ok(context.transport()?.estimate_gas(tx).await?)
}
