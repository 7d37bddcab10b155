//! Conversion between JSON arguments and ABI-encoded call data.

use crate::params::amount_hex;
use crate::ContractError;
use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{hex, U256};
use binder_types::{parse_address, Address, OperationDescriptor, OperationKind, Param};
use serde_json::Value;

/// Resolves the declared types of a parameter list.
pub fn param_types(params: &[Param]) -> Result<Vec<DynSolType>, ContractError> {
	params
		.iter()
		.map(|param| {
			let ty = param.canonical_type();
			DynSolType::parse(&ty)
				.map_err(|e| ContractError::Decode(format!("Unsupported type '{}': {}", ty, e)))
		})
		.collect()
}

/// Converts positional JSON arguments into typed values for `operation`.
pub fn coerce_arguments(
	operation: &OperationDescriptor,
	args: &[Value],
) -> Result<Vec<DynSolValue>, ContractError> {
	if args.len() != operation.inputs.len() {
		return Err(ContractError::Argument(format!(
			"{} expects {} argument(s), got {}",
			display_name(operation),
			operation.inputs.len(),
			args.len()
		)));
	}

	param_types(&operation.inputs)?
		.iter()
		.zip(operation.inputs.iter().zip(args))
		.map(|(ty, (param, value))| {
			coerce(ty, value).map_err(|e| {
				ContractError::Argument(format!(
					"{}: argument '{}': {}",
					display_name(operation),
					param.name,
					e
				))
			})
		})
		.collect()
}

/// Encodes the payload of a call to `operation`.
///
/// Functions are prefixed with their selector; constructor arguments are
/// encoded bare so they can be appended to the bytecode. A fallback takes no
/// arguments and sends an empty payload.
pub fn encode_arguments(
	operation: &OperationDescriptor,
	args: &[Value],
) -> Result<Vec<u8>, ContractError> {
	let values = coerce_arguments(operation, args)?;
	let encoded = DynSolValue::Tuple(values).abi_encode_params();

	Ok(match operation.kind {
		OperationKind::Read | OperationKind::Write => {
			let mut data = operation.selector().to_vec();
			data.extend_from_slice(&encoded);
			data
		},
		OperationKind::Fallback => Vec::new(),
		OperationKind::Constructor | OperationKind::Event => encoded,
	})
}

/// Decodes the return data of `operation` into its declared outputs.
pub fn decode_outputs(
	operation: &OperationDescriptor,
	data: &[u8],
) -> Result<Vec<DynSolValue>, ContractError> {
	if operation.outputs.is_empty() {
		return Ok(Vec::new());
	}

	let ty = DynSolType::Tuple(param_types(&operation.outputs)?);
	match ty.abi_decode_params(data) {
		Ok(DynSolValue::Tuple(values)) => Ok(values),
		Ok(other) => Ok(vec![other]),
		Err(e) => Err(ContractError::Decode(format!(
			"{} returned malformed data: {}",
			display_name(operation),
			e
		))),
	}
}

/// Renders a decoded value as JSON.
///
/// Integers become decimal strings so that 256-bit values survive; byte
/// values become `0x` hex.
pub fn to_json(value: &DynSolValue) -> Value {
	match value {
		DynSolValue::Bool(b) => Value::Bool(*b),
		DynSolValue::Int(i, _) => Value::String(i.to_string()),
		DynSolValue::Uint(u, _) => Value::String(u.to_string()),
		DynSolValue::FixedBytes(word, size) => Value::String(hex::encode_prefixed(&word[..*size])),
		DynSolValue::Address(address) => Value::String(Address::from(*address).to_string()),
		DynSolValue::Function(function) => Value::String(hex::encode_prefixed(function.as_slice())),
		DynSolValue::Bytes(bytes) => Value::String(hex::encode_prefixed(bytes)),
		DynSolValue::String(s) => Value::String(s.clone()),
		DynSolValue::Array(items) | DynSolValue::FixedArray(items) | DynSolValue::Tuple(items) => {
			Value::Array(items.iter().map(to_json).collect())
		},
		#[allow(unreachable_patterns)]
		_ => Value::Null,
	}
}

fn display_name(operation: &OperationDescriptor) -> &str {
	match operation.kind {
		OperationKind::Constructor => "constructor",
		OperationKind::Fallback => "fallback",
		_ => &operation.name,
	}
}

fn coerce(ty: &DynSolType, value: &Value) -> Result<DynSolValue, String> {
	match (ty, value) {
		(DynSolType::Array(inner), Value::Array(items)) => items
			.iter()
			.map(|item| coerce(inner, item))
			.collect::<Result<Vec<_>, _>>()
			.map(DynSolValue::Array),
		(DynSolType::FixedArray(inner, len), Value::Array(items)) => {
			if items.len() != *len {
				return Err(format!("expected {} elements, got {}", len, items.len()));
			}
			items
				.iter()
				.map(|item| coerce(inner, item))
				.collect::<Result<Vec<_>, _>>()
				.map(DynSolValue::FixedArray)
		},
		(DynSolType::Tuple(types), Value::Array(items)) => {
			if items.len() != types.len() {
				return Err(format!("expected {} components, got {}", types.len(), items.len()));
			}
			types
				.iter()
				.zip(items)
				.map(|(ty, item)| coerce(ty, item))
				.collect::<Result<Vec<_>, _>>()
				.map(DynSolValue::Tuple)
		},
		(DynSolType::Address, Value::String(s)) => parse_address(s)
			.map(|address| DynSolValue::Address(address.into())),
		(DynSolType::String, Value::String(s)) => Ok(DynSolValue::String(s.clone())),
		(DynSolType::Uint(bits), Value::String(s)) if s.starts_with("0x") => coerce_uint(*bits, s),
		(DynSolType::Uint(bits), Value::Number(n)) => coerce_uint(*bits, &n.to_string()),
		(DynSolType::Uint(bits), Value::Object(map)) | (DynSolType::Int(bits), Value::Object(map)) => {
			match amount_hex(map) {
				Some(hex) if matches!(ty, DynSolType::Uint(_)) => coerce_uint(*bits, hex),
				Some(hex) => ty.coerce_str(hex).map_err(|e| e.to_string()),
				None => Err(format!("cannot encode {} as {}", value, ty.sol_type_name())),
			}
		},
		(_, Value::String(s)) => ty.coerce_str(s).map_err(|e| e.to_string()),
		(_, Value::Number(n)) => ty.coerce_str(&n.to_string()).map_err(|e| e.to_string()),
		(_, Value::Bool(b)) => ty
			.coerce_str(if *b { "true" } else { "false" })
			.map_err(|e| e.to_string()),
		_ => Err(format!("cannot encode {} as {}", value, ty.sol_type_name())),
	}
}

fn coerce_uint(bits: usize, text: &str) -> Result<DynSolValue, String> {
	let parsed = match text.strip_prefix("0x") {
		Some(digits) => U256::from_str_radix(digits, 16),
		None => U256::from_str_radix(text, 10),
	}
	.map_err(|e| format!("invalid integer '{}': {}", text, e))?;

	if parsed.bit_len() > bits {
		return Err(format!("{} does not fit in uint{}", text, bits));
	}
	Ok(DynSolValue::Uint(parsed, bits))
}
