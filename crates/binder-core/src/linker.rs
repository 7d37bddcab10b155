//! Library placeholder substitution in deploy bytecode.
//!
//! Unlinked bytecode marks each library reference with a placeholder of the
//! form `__LibraryName______`, padded with underscores to the width of an
//! address. Linking replaces every placeholder of a library with its address.

use crate::ContractError;
use binder_types::without_0x_prefix;
use regex::{NoExpand, Regex};
use std::collections::BTreeMap;

/// Placeholders span the 40 hex characters of an address.
const PLACEHOLDER_WIDTH: usize = 40;
const PLACEHOLDER_PATTERN: &str = r"__[^_][0-9A-Za-z_$.:]{37}";

/// Substitutes every linked library's address into `unlinked`.
///
/// Placeholders of libraries missing from `links` are left in place.
pub fn link_bytecode(
	unlinked: &str,
	links: &BTreeMap<String, String>,
) -> Result<String, ContractError> {
	let mut binary = unlinked.to_string();
	for (name, address) in links {
		let Some(padding) = (PLACEHOLDER_WIDTH - 2).checked_sub(name.len()) else {
			continue;
		};
		let pattern = format!("__{}_{{{}}}", regex::escape(name), padding);
		let placeholder = Regex::new(&pattern).map_err(|e| {
			ContractError::Configuration(format!("Invalid library name '{}': {}", name, e))
		})?;
		binary = placeholder
			.replace_all(&binary, NoExpand(without_0x_prefix(address)))
			.into_owned();
	}
	Ok(binary)
}

/// Returns the sorted, de-duplicated names of libraries still referenced by
/// placeholders in `binary`.
pub fn unresolved_libraries(binary: &str) -> Result<Vec<String>, ContractError> {
	let placeholder = Regex::new(PLACEHOLDER_PATTERN)
		.map_err(|e| ContractError::Configuration(format!("Regex error: {}", e)))?;

	let mut names: Vec<String> = placeholder
		.find_iter(binary)
		.map(|m| m.as_str()[2..].trim_end_matches('_').to_string())
		.collect();
	names.sort();
	names.dedup();
	Ok(names)
}
