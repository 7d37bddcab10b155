//! Decoding of emitted logs against known event descriptors.

use crate::codec::{param_types, to_json};
use crate::ContractError;
use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::B256;
use binder_types::{Address, EventTopicIndex, Log, OperationDescriptor, TransactionHash, H256};
use serde_json::{Map, Value};

/// One log decoded against its event descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedEvent {
	/// Event name.
	pub event: String,
	/// Contract that emitted the log.
	pub address: Address,
	/// Decoded fields in declaration order.
	pub args: Vec<(String, DynSolValue)>,
	pub block_number: Option<u64>,
	pub transaction_hash: Option<TransactionHash>,
}

impl DecodedEvent {
	/// Returns the value of the named field.
	pub fn arg(&self, name: &str) -> Option<&DynSolValue> {
		self.args
			.iter()
			.find(|(field, _)| field == name)
			.map(|(_, value)| value)
	}

	/// Renders the event as a JSON object.
	pub fn to_json(&self) -> Value {
		let args: Map<String, Value> = self
			.args
			.iter()
			.map(|(name, value)| (name.clone(), to_json(value)))
			.collect();

		let mut event = Map::new();
		event.insert("event".into(), Value::String(self.event.clone()));
		event.insert("address".into(), Value::String(self.address.to_string()));
		event.insert("args".into(), Value::Object(args));
		if let Some(block_number) = self.block_number {
			event.insert("blockNumber".into(), block_number.into());
		}
		if let Some(hash) = &self.transaction_hash {
			event.insert("transactionHash".into(), Value::String(hash.to_string()));
		}
		Value::Object(event)
	}
}

/// Decodes a raw log into a [`DecodedEvent`] given the matching descriptor.
pub trait EventDecoder: Send + Sync {
	fn decode(&self, log: &Log, event: &OperationDescriptor) -> Result<DecodedEvent, ContractError>;
}

/// Standard ABI log decoding.
///
/// Indexed fields are read from the topics following the signature topic;
/// indexed fields of dynamic or composite type only carry their hash and are
/// returned as the raw 32-byte topic. The remaining fields are decoded from
/// the log data.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbiEventDecoder;

impl EventDecoder for AbiEventDecoder {
	fn decode(&self, log: &Log, event: &OperationDescriptor) -> Result<DecodedEvent, ContractError> {
		let types = param_types(&event.inputs)?;
		let mut topics = log.topics.iter().skip(usize::from(!event.anonymous));

		let mut indexed = Vec::new();
		let mut body_types = Vec::new();
		for (param, ty) in event.inputs.iter().zip(&types) {
			if param.indexed {
				let topic = topics.next().ok_or_else(|| {
					ContractError::Decode(format!("{}: missing topic for '{}'", event.name, param.name))
				})?;
				indexed.push(decode_topic(ty, topic).map_err(|e| {
					ContractError::Decode(format!("{}: field '{}': {}", event.name, param.name, e))
				})?);
			} else {
				body_types.push(ty.clone());
			}
		}

		let mut body = if body_types.is_empty() {
			Vec::new()
		} else {
			match DynSolType::Tuple(body_types).abi_decode_sequence(&log.data) {
				Ok(DynSolValue::Tuple(values)) => values,
				Ok(other) => vec![other],
				Err(e) => {
					return Err(ContractError::Decode(format!(
						"{}: malformed log data: {}",
						event.name, e
					)))
				},
			}
		}
		.into_iter();
		let mut indexed = indexed.into_iter();

		let mut args = Vec::with_capacity(event.inputs.len());
		for param in &event.inputs {
			let value = if param.indexed { indexed.next() } else { body.next() };
			let value = value.ok_or_else(|| {
				ContractError::Decode(format!("{}: missing value for '{}'", event.name, param.name))
			})?;
			args.push((param.name.clone(), value));
		}

		Ok(DecodedEvent {
			event: event.name.clone(),
			address: log.address,
			args,
			block_number: log.block_number,
			transaction_hash: log.transaction_hash,
		})
	}
}

fn decode_topic(ty: &DynSolType, topic: &H256) -> Result<DynSolValue, String> {
	match ty {
		DynSolType::String
		| DynSolType::Bytes
		| DynSolType::Array(_)
		| DynSolType::FixedArray(..)
		| DynSolType::Tuple(_) => Ok(DynSolValue::FixedBytes(B256::from(topic.0), 32)),
		_ => ty.abi_decode(&topic.0).map_err(|e| e.to_string()),
	}
}

/// Decodes every log whose signature topic is in `index`.
///
/// Logs with an unknown or missing signature topic are dropped, as are logs
/// that match a known topic but fail to decode.
pub fn decode_logs(
	decoder: &dyn EventDecoder,
	index: &EventTopicIndex,
	logs: &[Log],
) -> Vec<DecodedEvent> {
	logs.iter()
		.filter_map(|log| {
			let event = index.get(log.topics.first()?)?;
			match decoder.decode(log, event) {
				Ok(decoded) => Some(decoded),
				Err(e) => {
					tracing::warn!(event = %event.name, error = %e, "Skipping undecodable log");
					None
				},
			}
		})
		.collect()
}
