//! Command-line interface definitions and parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Deploy, link and call contracts described by build artifacts.
#[derive(Parser, Debug)]
#[command(name = "binder")]
#[command(version)]
pub struct Cli {
	#[command(subcommand)]
	pub command: Commands,

	/// Path to the TOML configuration file
	#[arg(global = true, short, long, env = "BINDER_CONFIG")]
	pub config: Option<PathBuf>,

	/// Node RPC endpoint; overrides the configuration file
	#[arg(global = true, long, env = "BINDER_RPC_URL")]
	pub rpc_url: Option<String>,

	/// Log level (trace, debug, info, warn, error)
	#[arg(global = true, short, long, default_value = "warn")]
	pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// List the networks an artifact has records for
	Networks(ArtifactArgs),

	/// Print the deploy bytecode with libraries linked
	Bytecode(BytecodeArgs),

	/// Invoke an operation through its default route
	Call(InvokeArgs),

	/// Submit an operation as a transaction and wait for its receipt
	Send(InvokeArgs),

	/// Deploy a new instance
	Deploy(DeployArgs),
}

#[derive(Args, Debug)]
pub struct ArtifactArgs {
	/// Path to the artifact JSON document
	#[arg(short, long)]
	pub artifact: PathBuf,
}

#[derive(Args, Debug)]
pub struct BytecodeArgs {
	#[command(flatten)]
	pub artifact: ArtifactArgs,

	/// Network record to use
	#[arg(short, long, default_value = "default")]
	pub network: String,

	/// Library link, as Name=0xAddress
	#[arg(long = "link", value_parser = parse_link)]
	pub links: Vec<(String, String)>,
}

#[derive(Args, Debug)]
pub struct InvokeArgs {
	#[command(flatten)]
	pub artifact: ArtifactArgs,

	/// Operation name
	pub method: String,

	/// Arguments as a JSON array; a trailing object carries execution options
	#[arg(default_value = "[]")]
	pub args: String,

	/// Instance address; defaults to the address recorded for the network
	#[arg(long)]
	pub address: Option<String>,

	/// Network record to use instead of the detected one
	#[arg(short, long)]
	pub network: Option<String>,
}

#[derive(Args, Debug)]
pub struct DeployArgs {
	#[command(flatten)]
	pub artifact: ArtifactArgs,

	/// Constructor arguments as a JSON array; a trailing object carries
	/// execution options
	#[arg(default_value = "[]")]
	pub args: String,

	/// Network record to use instead of the detected one
	#[arg(short, long)]
	pub network: Option<String>,

	/// Library link, as Name=0xAddress
	#[arg(long = "link", value_parser = parse_link)]
	pub links: Vec<(String, String)>,
}

/// Parses a `Name=0xAddress` library link.
pub fn parse_link(value: &str) -> Result<(String, String), String> {
	match value.split_once('=') {
		Some((name, address)) if !name.is_empty() && !address.is_empty() => {
			Ok((name.to_string(), address.to_string()))
		},
		_ => Err(format!("expected Name=0xAddress, got '{}'", value)),
	}
}
