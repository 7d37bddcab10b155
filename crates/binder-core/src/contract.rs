//! Contract handles and the instances they create.
//!
//! A [`Contract`] wraps one artifact. It tracks which network record is
//! selected, the class-level execution defaults, the library links and the
//! transport, and it creates [`BoundInstance`]s by deploying new contracts or
//! by attaching to existing addresses. Cloning a handle copies all of this by
//! value, so per-network handles never affect each other.

use crate::binding::{BoundInstance, Interface};
use crate::codec::encode_arguments;
use crate::dispatch::CallContext;
use crate::events::{AbiEventDecoder, EventDecoder};
use crate::linker::{link_bytecode, unresolved_libraries};
use crate::monitoring::BindingSettings;
use crate::network::{detect_network, select_network, BOOTSTRAP_NETWORK};
use crate::params::normalize;
use crate::ContractError;
use alloy_primitives::hex;
use binder_config::Config;
use binder_transport::implementations::evm::alloy::create_http_transport;
use binder_transport::TransportInterface;
use binder_types::{
	parse_address, truncate_id, with_0x_prefix, without_0x_prefix, Address, Artifact,
	EventTopicIndex, ExecutionParams, NetworkRecord, OperationDescriptor, OperationKind,
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Handle over one contract artifact.
#[derive(Clone)]
pub struct Contract {
	artifact: Artifact,
	/// Record whose data is currently applied.
	selected: Option<String>,
	/// Set once a network has been chosen explicitly or detected.
	network_id: Option<String>,
	interface: Interface,
	/// Links made on this handle, layered over the selected record's links.
	links: BTreeMap<String, String>,
	/// Events learned from linked libraries.
	linked_events: EventTopicIndex,
	transport: Option<Arc<dyn TransportInterface>>,
	defaults: ExecutionParams,
	settings: BindingSettings,
	decoder: Arc<dyn EventDecoder>,
}

impl std::fmt::Debug for Contract {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Contract")
			.field("contract_name", &self.artifact.contract_name)
			.field("selected", &self.selected)
			.field("network_id", &self.network_id)
			.field("has_provider", &self.has_provider())
			.field("defaults", &self.defaults)
			.field("settings", &self.settings)
			.finish()
	}
}

impl Contract {
	/// Creates a handle over `artifact`.
	///
	/// The `default` record, when present, is applied so that the interface
	/// is usable immediately; the network id stays unresolved until
	/// [`Contract::set_network`] or [`Contract::resolve_network`].
	pub fn new(artifact: Artifact) -> Self {
		let mut contract = Self {
			artifact,
			selected: None,
			network_id: None,
			interface: Interface::default(),
			links: BTreeMap::new(),
			linked_events: EventTopicIndex::new(),
			transport: None,
			defaults: ExecutionParams::default(),
			settings: BindingSettings::default(),
			decoder: Arc::new(AbiEventDecoder),
		};
		if contract.artifact.networks.contains_key(BOOTSTRAP_NETWORK) {
			contract.apply_record(BOOTSTRAP_NETWORK.to_string());
			contract.network_id = None;
		}
		contract
	}

	/// Creates a handle connected to the configured node, with the configured
	/// defaults and confirmation settings.
	pub fn from_config(artifact: Artifact, config: &Config) -> Result<Self, ContractError> {
		let transport = create_http_transport(&config.transport.rpc_url)?;
		let mut contract = Self::new(artifact)
			.with_settings(BindingSettings::from(&config.binding))
			.with_provider(transport);
		contract.defaults(config.defaults.clone());
		Ok(contract)
	}

	/// Returns a copy of this handle bound to another network record.
	pub fn for_network(&self, network_id: &str) -> Result<Self, ContractError> {
		let mut contract = self.clone();
		contract.set_network(network_id)?;
		Ok(contract)
	}

	pub fn with_provider(mut self, transport: Arc<dyn TransportInterface>) -> Self {
		self.set_provider(transport);
		self
	}

	pub fn with_settings(mut self, settings: BindingSettings) -> Self {
		self.settings = settings;
		self
	}

	/// Replaces the decoder used for receipt logs and past events.
	pub fn with_event_decoder(mut self, decoder: Arc<dyn EventDecoder>) -> Self {
		self.decoder = decoder;
		self
	}

	pub fn set_provider(&mut self, transport: Arc<dyn TransportInterface>) {
		self.transport = Some(transport);
	}

	pub(crate) fn has_provider(&self) -> bool {
		self.transport.is_some()
	}

	pub fn contract_name(&self) -> &str {
		&self.artifact.contract_name
	}

	pub fn artifact(&self) -> &Artifact {
		&self.artifact
	}

	pub fn settings(&self) -> BindingSettings {
		self.settings
	}

	/// Merges `defaults` into the class-level defaults and returns the
	/// result. Keys set in `defaults` replace existing values.
	pub fn defaults(&mut self, defaults: ExecutionParams) -> &ExecutionParams {
		self.defaults = defaults.merged_over(&self.defaults);
		&self.defaults
	}

	pub fn class_defaults(&self) -> &ExecutionParams {
		&self.defaults
	}

	/// Network ids the artifact has records for.
	pub fn networks(&self) -> Vec<String> {
		self.artifact.network_ids()
	}

	/// Resolved network record key, if any.
	pub fn network_id(&self) -> Option<&str> {
		self.network_id.as_deref()
	}

	/// Selects the record for `network_id`, applying the primary network
	/// aliases.
	pub fn set_network(&mut self, network_id: &str) -> Result<(), ContractError> {
		let selected = select_network(&self.artifact, network_id)?;
		self.apply_record(selected);
		Ok(())
	}

	/// Detects the transport's network and selects its record, once.
	pub async fn resolve_network(&mut self) -> Result<(), ContractError> {
		if self.network_id.is_some() {
			return Ok(());
		}
		let transport = self.require_provider("resolving the network")?;
		let selected = detect_network(transport.as_ref(), &self.artifact).await?;
		self.apply_record(selected);
		Ok(())
	}

	pub fn abi(&self) -> &[OperationDescriptor] {
		self.record().map(|record| record.abi.as_slice()).unwrap_or(&[])
	}

	pub fn interface(&self) -> &Interface {
		&self.interface
	}

	pub fn unlinked_binary(&self) -> &str {
		self.record()
			.map(|record| record.unlinked_binary.as_str())
			.unwrap_or("")
	}

	/// Deployed address on the selected network.
	pub fn address(&self) -> Option<Address> {
		self.record().and_then(|record| record.address)
	}

	pub fn is_deployed(&self) -> bool {
		self.address().is_some()
	}

	/// Events of the selected record merged with those of linked libraries.
	pub fn events(&self) -> EventTopicIndex {
		let mut events = self
			.record()
			.map(|record| record.events.clone())
			.unwrap_or_default();
		events.extend(
			self.linked_events
				.iter()
				.map(|(topic, event)| (*topic, event.clone())),
		);
		events
	}

	/// Links recorded for the selected network, overridden by links made on
	/// this handle.
	pub fn links(&self) -> BTreeMap<String, String> {
		let mut links = self
			.record()
			.map(|record| record.links.clone())
			.unwrap_or_default();
		links.extend(
			self.links
				.iter()
				.map(|(name, address)| (name.clone(), address.clone())),
		);
		links
	}

	pub fn updated_at(&self) -> Option<u64> {
		self.record().and_then(|record| record.updated_at)
	}

	/// Unlinked bytecode with every linked library address substituted.
	pub fn binary(&self) -> Result<String, ContractError> {
		link_bytecode(self.unlinked_binary(), &self.links())
	}

	/// Links library `name` at `address`.
	pub fn link(&mut self, name: &str, address: &str) -> Result<(), ContractError> {
		if parse_address(&with_0x_prefix(address)).is_err() {
			return Err(ContractError::InvalidAddress(format!(
				"Invalid address for library {}: {}",
				name, address
			)));
		}
		self.links.insert(name.to_string(), address.to_string());
		tracing::debug!(library = %name, address = %address, "Linked library");
		Ok(())
	}

	/// Links every `(name, address)` pair.
	pub fn link_all<I, N, A>(&mut self, links: I) -> Result<(), ContractError>
	where
		I: IntoIterator<Item = (N, A)>,
		N: AsRef<str>,
		A: AsRef<str>,
	{
		for (name, address) in links {
			self.link(name.as_ref(), address.as_ref())?;
		}
		Ok(())
	}

	/// Links a deployed library instance and learns its events.
	pub fn link_instance(&mut self, library: &BoundInstance) -> Result<(), ContractError> {
		self.link(library.contract_name(), &library.address().to_string())?;
		self.merge_events(library.topic_index());
		Ok(())
	}

	/// Links a library handle at its deployed address and learns its events.
	pub fn link_contract(&mut self, library: &Contract) -> Result<(), ContractError> {
		let address = library.address().ok_or_else(|| {
			ContractError::Configuration("Cannot link contract without an address.".to_string())
		})?;
		self.link(library.contract_name(), &address.to_string())?;
		self.merge_events(&library.events());
		Ok(())
	}

	/// Deploys a new instance.
	///
	/// `args` are the constructor arguments, optionally followed by execution
	/// options. An explicit `data` option replaces the generated payload.
	pub async fn deploy(&mut self, args: Vec<Value>) -> Result<BoundInstance, ContractError> {
		self.require_provider("calling new()")?;
		self.resolve_network().await?;

		let unlinked = self.unlinked_binary();
		if unlinked.is_empty() || unlinked == "0x" {
			return Err(ContractError::Configuration(format!(
				"{} error: contract binary not set. Can't deploy new instance.",
				self.contract_name()
			)));
		}

		let binary = self.binary()?;
		let libraries = unresolved_libraries(&binary)?;
		if !libraries.is_empty() {
			return Err(ContractError::UnlinkedLibraries {
				contract: self.contract_name().to_string(),
				libraries,
			});
		}

		let call = normalize(args, &self.defaults)?;
		let constructor = self
			.record()
			.and_then(NetworkRecord::constructor)
			.cloned()
			.unwrap_or_else(default_constructor);
		let mut data = hex::decode(without_0x_prefix(&binary)).map_err(|e| {
			ContractError::Configuration(format!(
				"{} error: invalid contract binary: {}",
				self.contract_name(),
				e
			))
		})?;
		data.extend(encode_arguments(&constructor, &call.args)?);
		let tx = call.params.to_transaction(None, data);

		let context = self.context();
		let monitor = context.monitor()?;
		let tx_hash = monitor.send(tx).await?;
		let receipt = monitor.wait_for_receipt(tx_hash).await?;
		let address = receipt
			.contract_address
			.ok_or(ContractError::MissingReceiptAddress(tx_hash))?;

		tracing::info!(
			contract = %self.contract_name(),
			address = %address,
			tx_hash = %truncate_id(&tx_hash.to_string()),
			"Deployed contract"
		);
		Ok(BoundInstance::bind(
			&self.interface,
			self.contract_name(),
			address,
			Some(tx_hash),
			context,
		))
	}

	/// Binds the interface to an existing address.
	pub fn at(&self, address: &str) -> Result<BoundInstance, ContractError> {
		let invalid = || {
			ContractError::InvalidAddress(format!(
				"Invalid address passed to {}.at(): {}",
				self.contract_name(),
				address
			))
		};
		if address.len() != 42 || !address.starts_with("0x") {
			return Err(invalid());
		}
		let address = parse_address(address).map_err(|_| invalid())?;

		Ok(BoundInstance::bind(
			&self.interface,
			self.contract_name(),
			address,
			None,
			self.context(),
		))
	}

	/// Binds the interface to the address recorded for the current network.
	pub async fn deployed(&mut self) -> Result<BoundInstance, ContractError> {
		self.resolve_network().await?;
		let address = self.address().ok_or_else(|| {
			ContractError::Configuration(format!(
				"Cannot find deployed address: {} not deployed or address not set.",
				self.contract_name()
			))
		})?;
		self.at(&address.to_string())
	}

	fn record(&self) -> Option<&NetworkRecord> {
		self.selected
			.as_deref()
			.and_then(|key| self.artifact.networks.get(key))
	}

	fn apply_record(&mut self, key: String) {
		self.interface = self
			.artifact
			.networks
			.get(&key)
			.map(|record| Interface::new(&record.abi))
			.unwrap_or_default();
		self.network_id = Some(key.clone());
		self.selected = Some(key);
	}

	fn merge_events(&mut self, events: &EventTopicIndex) {
		for (topic, event) in events {
			self.linked_events.insert(*topic, event.clone());
		}
	}

	fn require_provider(&self, action: &str) -> Result<Arc<dyn TransportInterface>, ContractError> {
		self.transport.clone().ok_or_else(|| {
			ContractError::Configuration(format!(
				"{} error: Please call set_provider() first before {}.",
				self.contract_name(),
				action
			))
		})
	}

	fn context(&self) -> CallContext {
		CallContext {
			contract_name: self.contract_name().to_string(),
			transport: self.transport.clone(),
			defaults: self.defaults.clone(),
			settings: self.settings,
			events: Arc::new(self.events().clone()),
			decoder: self.decoder.clone(),
		}
	}
}

fn default_constructor() -> OperationDescriptor {
	OperationDescriptor {
		name: String::new(),
		kind: OperationKind::Constructor,
		inputs: Vec::new(),
		outputs: Vec::new(),
		payable: false,
		anonymous: false,
	}
}
