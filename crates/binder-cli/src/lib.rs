//! Command handlers for the `binder` binary.
//!
//! Each handler loads an artifact into a [`Contract`] handle, applies the
//! requested network and links, performs one operation and returns its
//! result as JSON for printing.

pub mod cli;

use binder_config::{Config, ConfigBuilder, ConfigError};
use binder_core::{Contract, ContractError};
use binder_types::{Artifact, ArtifactError};
use cli::{BytecodeArgs, Cli, Commands, DeployArgs, InvokeArgs};
use serde_json::{json, Value};
use std::path::Path;
use thiserror::Error;

/// Errors reported by the command handlers.
#[derive(Debug, Error)]
pub enum CliError {
	#[error(transparent)]
	Config(#[from] ConfigError),
	#[error(transparent)]
	Artifact(#[from] ArtifactError),
	#[error(transparent)]
	Contract(#[from] ContractError),
	/// Command-line arguments that are not valid JSON.
	#[error("Invalid arguments: {0}")]
	Arguments(String),
}

/// Runs the parsed command.
pub async fn run(cli: Cli) -> Result<Value, CliError> {
	match &cli.command {
		Commands::Networks(args) => {
			let contract = Contract::new(load_artifact(&args.artifact)?);
			Ok(describe_networks(&contract))
		},
		Commands::Bytecode(args) => bytecode(args),
		Commands::Call(args) => {
			let config = load_config(&cli).await?;
			invoke(args, &config, false).await
		},
		Commands::Send(args) => {
			let config = load_config(&cli).await?;
			invoke(args, &config, true).await
		},
		Commands::Deploy(args) => {
			let config = load_config(&cli).await?;
			deploy(args, &config).await
		},
	}
}

/// Loads the configuration file, or builds a default one around the RPC URL.
pub async fn load_config(cli: &Cli) -> Result<Config, CliError> {
	let mut config = match &cli.config {
		Some(path) => {
			tracing::info!(path = %path.display(), "Loading configuration");
			Config::from_file(path).await?
		},
		None => ConfigBuilder::new().build(),
	};
	if let Some(rpc_url) = &cli.rpc_url {
		config.transport.rpc_url = rpc_url.clone();
	}
	Ok(config)
}

fn load_artifact(path: &Path) -> Result<Artifact, CliError> {
	let artifact = Artifact::from_file(path)?;
	tracing::debug!(contract = %artifact.contract_name, "Loaded artifact");
	Ok(artifact)
}

/// Parses a JSON array of call arguments.
pub fn parse_arguments(raw: &str) -> Result<Vec<Value>, CliError> {
	match serde_json::from_str::<Value>(raw) {
		Ok(Value::Array(values)) => Ok(values),
		Ok(other) => Err(CliError::Arguments(format!(
			"expected a JSON array, got {}",
			other
		))),
		Err(e) => Err(CliError::Arguments(e.to_string())),
	}
}

/// Lists every network record with its deployed address.
pub fn describe_networks(contract: &Contract) -> Value {
	let networks: Vec<Value> = contract
		.networks()
		.iter()
		.filter_map(|id| contract.for_network(id).ok())
		.map(|handle| {
			json!({
				"network": handle.network_id(),
				"address": handle.address().map(|address| address.to_string()),
				"updated_at": handle.updated_at(),
				"links": handle.links(),
			})
		})
		.collect();
	json!({ "contract": contract.contract_name(), "networks": networks })
}

fn bytecode(args: &BytecodeArgs) -> Result<Value, CliError> {
	let mut contract = Contract::new(load_artifact(&args.artifact.artifact)?);
	contract.set_network(&args.network)?;
	contract.link_all(args.links.iter().cloned())?;

	let binary = contract.binary()?;
	let unresolved = binder_core::linker::unresolved_libraries(&binary)?;
	Ok(json!({ "bytecode": binary, "unresolved": unresolved }))
}

async fn invoke(args: &InvokeArgs, config: &Config, force_send: bool) -> Result<Value, CliError> {
	let mut contract = Contract::from_config(load_artifact(&args.artifact.artifact)?, config)?;
	if let Some(network) = &args.network {
		contract.set_network(network)?;
	}
	let instance = match &args.address {
		Some(address) => {
			contract.resolve_network().await?;
			contract.at(address)?
		},
		None => contract.deployed().await?,
	};

	let operation = instance.method(&args.method)?;
	let call_args = parse_arguments(&args.args)?;
	if force_send {
		Ok(operation.send(call_args).await?.to_json())
	} else {
		Ok(operation.invoke(call_args).await?.to_json())
	}
}

async fn deploy(args: &DeployArgs, config: &Config) -> Result<Value, CliError> {
	let mut contract = Contract::from_config(load_artifact(&args.artifact.artifact)?, config)?;
	if let Some(network) = &args.network {
		contract.set_network(network)?;
	}
	contract.resolve_network().await?;
	contract.link_all(args.links.iter().cloned())?;

	let instance = contract.deploy(parse_arguments(&args.args)?).await?;
	Ok(json!({
		"contract": instance.contract_name(),
		"address": instance.address().to_string(),
		"transactionHash": instance.transaction_hash().map(|hash| hash.to_string()),
	}))
}
