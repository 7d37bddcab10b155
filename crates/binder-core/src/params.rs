//! Separation of positional arguments from trailing execution options.
//!
//! A call receives its positional arguments as JSON values. When the last
//! value is a plain object it carries execution options (sender, gas, value)
//! rather than an argument; numeric-amount objects such as
//! `{"type": "BigNumber", "hex": "0x10"}` are arguments, never options.

use crate::ContractError;
use binder_types::ExecutionParams;
use serde_json::{Map, Value};

/// Positional arguments plus the effective execution options of one call.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedCall {
	pub args: Vec<Value>,
	pub params: ExecutionParams,
}

/// Splits trailing options off `args` and merges them over `defaults`.
///
/// Without trailing options the call runs with a copy of `defaults`.
pub fn normalize(
	mut args: Vec<Value>,
	defaults: &ExecutionParams,
) -> Result<NormalizedCall, ContractError> {
	let call_params = match args.last() {
		Some(last) if is_options_object(last) => {
			let options = args.pop().unwrap_or(Value::Null);
			serde_json::from_value::<ExecutionParams>(options)
				.map_err(|e| ContractError::Argument(format!("Invalid execution options: {}", e)))?
		},
		_ => ExecutionParams::default(),
	};

	Ok(NormalizedCall {
		args,
		params: call_params.merged_over(defaults),
	})
}

/// True for a plain object that is not a numeric amount.
pub fn is_options_object(value: &Value) -> bool {
	value.is_object() && !is_numeric_amount(value)
}

/// True for values that encode a number: JSON numbers and numeric-amount
/// objects.
pub fn is_numeric_amount(value: &Value) -> bool {
	match value {
		Value::Number(_) => true,
		Value::Object(map) => amount_hex(map).is_some(),
		_ => false,
	}
}

/// Returns the hex digits of a numeric-amount object.
///
/// Recognized shapes are `{"type": "BigNumber", "hex": "0x.."}` and
/// `{"_hex": "0x..", "_isBigNumber": true}`.
pub(crate) fn amount_hex(map: &Map<String, Value>) -> Option<&str> {
	let hex = match (map.get("type"), map.get("hex"), map.get("_hex")) {
		(Some(Value::String(ty)), Some(Value::String(hex)), _) if ty == "BigNumber" => {
			if map.keys().all(|k| k == "type" || k == "hex") {
				hex
			} else {
				return None;
			}
		},
		(_, _, Some(Value::String(hex))) => {
			if map.keys().all(|k| k == "_hex" || k == "_isBigNumber") {
				hex
			} else {
				return None;
			}
		},
		_ => return None,
	};

	let digits = hex.strip_prefix("0x")?;
	if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit()) {
		Some(hex.as_str())
	} else {
		None
	}
}
