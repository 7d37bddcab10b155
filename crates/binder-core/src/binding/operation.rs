//! Callable member generated for one interface operation.

use crate::dispatch::{self, CallContext, Invocation};
use crate::monitoring::TransactionResult;
use crate::ContractError;
use alloy_dyn_abi::DynSolValue;
use binder_types::{Address, OperationDescriptor, Transaction, TransactionHash};
use serde_json::Value;
use std::sync::Arc;

/// One operation bound to a deployed address.
///
/// Arguments are JSON values; a trailing plain object carries execution
/// options that merge over the handle's defaults.
#[derive(Clone)]
pub struct Operation {
	descriptor: Arc<OperationDescriptor>,
	address: Address,
	context: Arc<CallContext>,
}

impl std::fmt::Debug for Operation {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Operation")
			.field("signature", &self.descriptor.signature())
			.field("address", &self.address)
			.finish()
	}
}

impl Operation {
	pub(crate) fn new(
		descriptor: Arc<OperationDescriptor>,
		address: Address,
		context: Arc<CallContext>,
	) -> Self {
		Self {
			descriptor,
			address,
			context,
		}
	}

	pub fn descriptor(&self) -> &OperationDescriptor {
		&self.descriptor
	}

	pub fn address(&self) -> Address {
		self.address
	}

	/// Calls read-only operations and submits everything else.
	pub async fn invoke(&self, args: Vec<Value>) -> Result<Invocation, ContractError> {
		dispatch::invoke(&self.context, &self.descriptor, self.address, args).await
	}

	/// Executes as a call, whatever the operation's mutability.
	pub async fn call(&self, args: Vec<Value>) -> Result<Vec<DynSolValue>, ContractError> {
		dispatch::call(&self.context, &self.descriptor, self.address, args).await
	}

	/// Submits as a transaction and waits for its receipt.
	pub async fn send(&self, args: Vec<Value>) -> Result<TransactionResult, ContractError> {
		dispatch::send(&self.context, &self.descriptor, self.address, args).await
	}

	/// Submits as a transaction without waiting for confirmation.
	pub async fn send_transaction(&self, args: Vec<Value>) -> Result<TransactionHash, ContractError> {
		dispatch::send_transaction(&self.context, &self.descriptor, self.address, args).await
	}

	pub async fn estimate_gas(&self, args: Vec<Value>) -> Result<u64, ContractError> {
		dispatch::estimate_gas(&self.context, &self.descriptor, self.address, args).await
	}

	/// Returns the transaction this invocation would send, without sending it.
	pub fn request(&self, args: Vec<Value>) -> Result<Transaction, ContractError> {
		dispatch::request(&self.context, &self.descriptor, self.address, args)
	}
}
