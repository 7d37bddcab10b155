//! Interface descriptors parsed from artifact ABIs.
//!
//! An artifact's `abi` is an ordered list of JSON entries. Each entry becomes
//! an [`OperationDescriptor`] whose [`OperationKind`] decides how the binding
//! layer routes it: read-only functions are simulated, everything else that is
//! callable is submitted as a transaction.

use crate::utils::conversion::keccak_topic;
use crate::H256;
use alloy_primitives::keccak256;
use serde::{Deserialize, Serialize};

/// Kind of an interface entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Function that never mutates state (`constant`, `view` or `pure`).
	Read,
	/// Function that mutates state and must be submitted as a transaction.
	Write,
	/// Contract constructor, used only at deployment.
	Constructor,
	/// Fallback (or receive) function.
	Fallback,
	/// Event emitted by the contract.
	Event,
}

/// Typed parameter of an operation or event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
	/// Parameter name; may be empty for unnamed outputs.
	#[serde(default)]
	pub name: String,
	/// Solidity type string, e.g. `uint256` or `tuple[]`.
	#[serde(rename = "type")]
	pub ty: String,
	/// Whether an event parameter is stored in a topic.
	#[serde(default, skip_serializing_if = "std::ops::Not::not")]
	pub indexed: bool,
	/// Members of a tuple type.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub components: Vec<Param>,
}

impl Param {
	/// Returns the canonical type used in signatures, expanding tuples into
	/// their component lists.
	pub fn canonical_type(&self) -> String {
		match self.ty.strip_prefix("tuple") {
			Some(suffix) => {
				let inner: Vec<String> = self.components.iter().map(Param::canonical_type).collect();
				format!("({}){}", inner.join(","), suffix)
			},
			None => self.ty.clone(),
		}
	}
}

/// One entry of a contract interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAbiItem", into = "RawAbiItem")]
pub struct OperationDescriptor {
	/// Operation or event name; empty for constructors and fallbacks.
	pub name: String,
	/// How the entry is routed.
	pub kind: OperationKind,
	/// Ordered input parameters.
	pub inputs: Vec<Param>,
	/// Ordered output parameters.
	pub outputs: Vec<Param>,
	/// Whether the entry accepts value.
	pub payable: bool,
	/// Whether an event omits its signature topic.
	pub anonymous: bool,
}

impl OperationDescriptor {
	/// Returns the canonical signature, e.g. `purchase(string)`.
	pub fn signature(&self) -> String {
		let types: Vec<String> = self.inputs.iter().map(Param::canonical_type).collect();
		format!("{}({})", self.name, types.join(","))
	}

	/// Returns the 4-byte function selector.
	pub fn selector(&self) -> [u8; 4] {
		let hash = keccak256(self.signature().as_bytes());
		[hash[0], hash[1], hash[2], hash[3]]
	}

	/// Returns the signature topic of an event.
	pub fn topic(&self) -> H256 {
		keccak_topic(&self.signature())
	}

	/// Whether invoking this entry never submits a transaction.
	pub fn is_read_only(&self) -> bool {
		self.kind == OperationKind::Read
	}

	/// Whether this entry is a callable function.
	pub fn is_function(&self) -> bool {
		matches!(self.kind, OperationKind::Read | OperationKind::Write)
	}
}

/// Wire form of an ABI entry, covering both the legacy `constant`/`payable`
/// flags and the newer `stateMutability` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAbiItem {
	#[serde(rename = "type", default = "default_item_type")]
	item_type: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	name: Option<String>,
	#[serde(default)]
	inputs: Vec<Param>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	outputs: Vec<Param>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	constant: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	payable: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	state_mutability: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	anonymous: Option<bool>,
}

fn default_item_type() -> String {
	"function".to_string()
}

impl TryFrom<RawAbiItem> for OperationDescriptor {
	type Error = String;

	fn try_from(raw: RawAbiItem) -> Result<Self, Self::Error> {
		let mutability = raw.state_mutability.as_deref();
		let kind = match raw.item_type.as_str() {
			"function" => {
				let read_only =
					raw.constant == Some(true) || matches!(mutability, Some("view") | Some("pure"));
				if read_only {
					OperationKind::Read
				} else {
					OperationKind::Write
				}
			},
			"constructor" => OperationKind::Constructor,
			"fallback" | "receive" => OperationKind::Fallback,
			"event" => OperationKind::Event,
			other => return Err(format!("Unsupported ABI entry type '{}'", other)),
		};

		let name = raw.name.unwrap_or_default();
		if matches!(kind, OperationKind::Read | OperationKind::Write | OperationKind::Event)
			&& name.is_empty()
		{
			return Err(format!("ABI entry of type '{}' has no name", raw.item_type));
		}

		Ok(OperationDescriptor {
			name,
			kind,
			inputs: raw.inputs,
			outputs: raw.outputs,
			payable: raw.payable == Some(true) || mutability == Some("payable"),
			anonymous: raw.anonymous == Some(true),
		})
	}
}

impl From<OperationDescriptor> for RawAbiItem {
	fn from(op: OperationDescriptor) -> Self {
		let item_type = match op.kind {
			OperationKind::Read | OperationKind::Write => "function",
			OperationKind::Constructor => "constructor",
			OperationKind::Fallback => "fallback",
			OperationKind::Event => "event",
		};
		let is_event = op.kind == OperationKind::Event;
		let constant = op.is_function().then_some(op.kind == OperationKind::Read);

		RawAbiItem {
			item_type: item_type.to_string(),
			name: (!op.name.is_empty()).then_some(op.name),
			inputs: op.inputs,
			outputs: op.outputs,
			constant,
			payable: (!is_event).then_some(op.payable),
			state_mutability: None,
			anonymous: is_event.then_some(op.anonymous),
		}
	}
}

/// Parses an interface description, skipping entry kinds the binding layer
/// never routes (custom `error` definitions).
pub fn parse_interface(entries: Vec<serde_json::Value>) -> Result<Vec<OperationDescriptor>, String> {
	entries
		.into_iter()
		.filter(|entry| entry.get("type").and_then(|t| t.as_str()) != Some("error"))
		.map(|entry| serde_json::from_value(entry).map_err(|e| e.to_string()))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn descriptor(value: serde_json::Value) -> OperationDescriptor {
		serde_json::from_value(value).unwrap()
	}

	#[test]
	fn test_legacy_constant_function_is_read() {
		let op = descriptor(json!({
			"constant": true,
			"inputs": [],
			"name": "paymentInterval",
			"outputs": [{ "name": "", "type": "uint256" }],
			"payable": false,
			"type": "function"
		}));
		assert_eq!(op.kind, OperationKind::Read);
		assert!(op.is_read_only());
		assert_eq!(op.signature(), "paymentInterval()");
	}

	#[test]
	fn test_state_mutability_variants() {
		let view = descriptor(json!({
			"name": "balanceOf",
			"type": "function",
			"stateMutability": "view",
			"inputs": [{ "name": "owner", "type": "address" }]
		}));
		assert_eq!(view.kind, OperationKind::Read);

		let payable = descriptor(json!({
			"name": "deposit",
			"type": "function",
			"stateMutability": "payable",
			"inputs": []
		}));
		assert_eq!(payable.kind, OperationKind::Write);
		assert!(payable.payable);
	}

	#[test]
	fn test_constructor_and_fallback() {
		let ctor = descriptor(json!({
			"inputs": [{ "name": "interval", "type": "uint256" }],
			"payable": false,
			"type": "constructor"
		}));
		assert_eq!(ctor.kind, OperationKind::Constructor);
		assert!(ctor.name.is_empty());

		let fallback = descriptor(json!({ "payable": true, "type": "fallback" }));
		assert_eq!(fallback.kind, OperationKind::Fallback);
		assert!(fallback.payable);
	}

	#[test]
	fn test_function_without_name_rejected() {
		let result: Result<OperationDescriptor, _> =
			serde_json::from_value(json!({ "type": "function", "inputs": [] }));
		assert!(result.unwrap_err().to_string().contains("has no name"));
	}

	#[test]
	fn test_selector_and_topic() {
		let transfer = descriptor(json!({
			"name": "transfer",
			"type": "function",
			"inputs": [
				{ "name": "to", "type": "address" },
				{ "name": "amount", "type": "uint256" }
			]
		}));
		assert_eq!(transfer.selector(), [0xa9, 0x05, 0x9c, 0xbb]);

		let event = descriptor(json!({
			"anonymous": false,
			"name": "Transfer",
			"type": "event",
			"inputs": [
				{ "indexed": true, "name": "from", "type": "address" },
				{ "indexed": true, "name": "to", "type": "address" },
				{ "indexed": false, "name": "value", "type": "uint256" }
			]
		}));
		assert_eq!(
			event.topic().to_string(),
			"0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
		);
	}

	#[test]
	fn test_tuple_canonical_type() {
		let param: Param = serde_json::from_value(json!({
			"name": "orders",
			"type": "tuple[]",
			"components": [
				{ "name": "id", "type": "uint256" },
				{ "name": "owner", "type": "address" }
			]
		}))
		.unwrap();
		assert_eq!(param.canonical_type(), "(uint256,address)[]");
	}

	#[test]
	fn test_parse_interface_skips_errors() {
		let ops = parse_interface(vec![
			json!({ "type": "error", "name": "Unauthorized", "inputs": [] }),
			json!({ "type": "function", "name": "ping", "inputs": [] }),
		])
		.unwrap();
		assert_eq!(ops.len(), 1);
		assert_eq!(ops[0].name, "ping");
	}

	#[test]
	fn test_serialize_round_trip_keeps_kind() {
		let op = descriptor(json!({
			"constant": false,
			"inputs": [{ "name": "description", "type": "string" }],
			"name": "purchase",
			"outputs": [],
			"payable": true,
			"type": "function"
		}));
		let value = serde_json::to_value(&op).unwrap();
		assert_eq!(value["constant"], json!(false));
		assert_eq!(descriptor(value), op);
	}
}
