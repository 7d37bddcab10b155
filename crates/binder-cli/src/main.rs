//! Main entry point for the `binder` command-line tool.
//!
//! Loads a contract artifact, connects to the configured node and performs
//! one deploy, call or transaction, printing the result as JSON.

use binder_cli::{cli::Cli, run};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let cli = Cli::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	let default_directive = cli.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt()
		.with_env_filter(env_filter)
		.with_target(true)
		.with_writer(std::io::stderr)
		.init();

	let output = run(cli).await?;
	println!("{}", serde_json::to_string_pretty(&output)?);
	Ok(())
}
