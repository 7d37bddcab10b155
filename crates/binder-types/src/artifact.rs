//! Artifact documents and their per-network deployment records.
//!
//! An artifact is the static output of a contract build: for every network it
//! was deployed to (plus a `default` entry) it records the interface, the
//! unlinked bytecode, the deployed address, the event topic index and the
//! library links known at build time.

use crate::abi::parse_interface;
use crate::{Address, OperationDescriptor, OperationKind, H256};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Mapping from a log's signature topic to the event that produced it.
pub type EventTopicIndex = BTreeMap<H256, OperationDescriptor>;

/// Errors that can occur while loading an artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
	/// Error that occurs when the artifact file cannot be read.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when the artifact document is malformed.
	#[error("Invalid artifact: {0}")]
	Parse(String),
}

/// Deployment record of one contract on one network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkRecord {
	/// Ordered interface description.
	#[serde(deserialize_with = "deserialize_interface")]
	pub abi: Vec<OperationDescriptor>,
	/// Bytecode with library placeholders still in place.
	#[serde(default)]
	pub unlinked_binary: String,
	/// Address the contract was deployed at on this network.
	#[serde(default, deserialize_with = "deserialize_optional_address")]
	pub address: Option<Address>,
	/// Known events keyed by signature topic.
	#[serde(default)]
	pub events: EventTopicIndex,
	/// Milliseconds since the epoch of the last artifact update.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub updated_at: Option<u64>,
	/// Library name to address map recorded at build time.
	#[serde(default)]
	pub links: BTreeMap<String, String>,
}

impl NetworkRecord {
	/// Fills the topic index from the interface when the record carries none.
	pub fn ensure_topic_index(&mut self) {
		if !self.events.is_empty() {
			return;
		}
		self.events = self
			.abi
			.iter()
			.filter(|op| op.kind == OperationKind::Event && !op.anonymous)
			.map(|op| (op.topic(), op.clone()))
			.collect();
	}

	/// Returns the constructor descriptor, if the interface declares one.
	pub fn constructor(&self) -> Option<&OperationDescriptor> {
		self.abi
			.iter()
			.find(|op| op.kind == OperationKind::Constructor)
	}
}

/// Static description of one contract across every network it is known on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
	/// Contract name, also used in error messages.
	pub contract_name: String,
	/// Version of the tool that produced the artifact.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub generated_with: Option<String>,
	/// Deployment records keyed by network identifier.
	pub networks: BTreeMap<String, NetworkRecord>,
}

impl Artifact {
	/// Parses an artifact document and validates its records.
	pub fn from_json(json: &str) -> Result<Self, ArtifactError> {
		let mut artifact: Artifact =
			serde_json::from_str(json).map_err(|e| ArtifactError::Parse(e.to_string()))?;
		artifact.validate()?;
		for record in artifact.networks.values_mut() {
			record.ensure_topic_index();
		}
		Ok(artifact)
	}

	/// Loads an artifact document from disk.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
		let contents = std::fs::read_to_string(path)?;
		Self::from_json(&contents)
	}

	/// Returns the record for a network identifier.
	pub fn network(&self, network_id: &str) -> Option<&NetworkRecord> {
		self.networks.get(network_id)
	}

	/// Lists the known network identifiers.
	pub fn network_ids(&self) -> Vec<String> {
		self.networks.keys().cloned().collect()
	}

	fn validate(&self) -> Result<(), ArtifactError> {
		if self.contract_name.is_empty() {
			return Err(ArtifactError::Parse("contract_name cannot be empty".into()));
		}
		for (network_id, record) in &self.networks {
			let constructors = record
				.abi
				.iter()
				.filter(|op| op.kind == OperationKind::Constructor)
				.count();
			if constructors > 1 {
				return Err(ArtifactError::Parse(format!(
					"Network '{}' declares {} constructors",
					network_id, constructors
				)));
			}
		}
		Ok(())
	}
}

fn deserialize_interface<'de, D>(deserializer: D) -> Result<Vec<OperationDescriptor>, D::Error>
where
	D: Deserializer<'de>,
{
	let entries = Vec::<serde_json::Value>::deserialize(deserializer)?;
	parse_interface(entries).map_err(serde::de::Error::custom)
}

fn deserialize_optional_address<'de, D>(deserializer: D) -> Result<Option<Address>, D::Error>
where
	D: Deserializer<'de>,
{
	match Option::<String>::deserialize(deserializer)? {
		None => Ok(None),
		Some(s) if s.is_empty() => Ok(None),
		Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
	}
}
