//! Configuration module for the contract binding runtime.
//!
//! This module provides structures and utilities for managing the runtime
//! configuration: which node to talk to, how transaction confirmation is
//! polled, and the class-level execution defaults applied to every call.
//! Configuration is loaded from TOML; `${VAR}` and `${VAR:-default}`
//! references are resolved from the environment before parsing.

pub mod builders;

pub use builders::config::ConfigBuilder;

use binder_types::ExecutionParams;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Node connection settings.
	pub transport: TransportConfig,
	/// Transaction confirmation settings.
	#[serde(default)]
	pub binding: BindingConfig,
	/// Class-level execution defaults merged under every call.
	#[serde(default)]
	pub defaults: ExecutionParams,
}

/// Node connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransportConfig {
	/// HTTP JSON-RPC endpoint.
	pub rpc_url: String,
}

/// Transaction confirmation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BindingConfig {
	/// How long to wait for a receipt, in milliseconds. Zero waits forever.
	#[serde(default = "default_synchronization_timeout_ms")]
	pub synchronization_timeout_ms: u64,
	/// Delay between receipt polls, in milliseconds.
	#[serde(default = "default_poll_interval_ms")]
	pub poll_interval_ms: u64,
	/// Resolve transactions with hash, receipt and decoded logs instead of
	/// the bare hash.
	#[serde(default)]
	pub extended_results: bool,
}

impl Default for BindingConfig {
	fn default() -> Self {
		Self {
			synchronization_timeout_ms: default_synchronization_timeout_ms(),
			poll_interval_ms: default_poll_interval_ms(),
			extended_results: false,
		}
	}
}

/// Returns the default receipt timeout (240 seconds).
fn default_synchronization_timeout_ms() -> u64 {
	240_000
}

/// Returns the default receipt polling interval (1 second).
fn default_poll_interval_ms() -> u64 {
	1_000
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {e}")))?;

	let mut result = input.to_string();
	let mut replacements = Vec::new();

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let var_name = var_name.as_str();
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name) {
			Ok(v) => v,
			Err(_) => match default_value {
				Some(default) => default.to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{var_name}' not found"
					)))
				},
			},
		};

		replacements.push((full_match.start(), full_match.end(), value));
	}

	// Apply replacements in reverse order to maintain positions
	for (start, end, value) in replacements.iter().rev() {
		result.replace_range(start..end, value);
	}

	Ok(result)
}

impl Config {
	/// Loads configuration from a TOML file.
	pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let contents = tokio::fs::read_to_string(path).await?;
		tracing::debug!(path = %path.display(), "Loaded configuration file");
		contents.parse()
	}

	/// Validates the configuration to ensure all required fields are properly set.
	fn validate(&self) -> Result<(), ConfigError> {
		if self.transport.rpc_url.trim().is_empty() {
			return Err(ConfigError::Validation("rpc_url cannot be empty".into()));
		}

		if self.binding.poll_interval_ms == 0 {
			return Err(ConfigError::Validation(
				"poll_interval_ms must be greater than 0".into(),
			));
		}

		if self.binding.synchronization_timeout_ms != 0
			&& self.binding.synchronization_timeout_ms < self.binding.poll_interval_ms
		{
			tracing::warn!(
				timeout_ms = self.binding.synchronization_timeout_ms,
				poll_interval_ms = self.binding.poll_interval_ms,
				"Receipt timeout is shorter than the polling interval"
			);
		}

		Ok(())
	}
}

/// Implementation of FromStr trait for Config to enable parsing from string.
///
/// Environment variables are resolved and the configuration is validated
/// after parsing.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
