//! Configuration builder for creating test and development configurations.
//!
//! This module provides utilities for constructing Config instances with
//! sensible defaults, particularly useful for testing scenarios.

use crate::{BindingConfig, Config, TransportConfig};
use binder_types::ExecutionParams;

/// Builder for creating `Config` instances with a fluent API.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
	rpc_url: String,
	synchronization_timeout_ms: u64,
	poll_interval_ms: u64,
	extended_results: bool,
	defaults: ExecutionParams,
}

impl Default for ConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigBuilder {
	/// Creates a new `ConfigBuilder` pointing at a local node.
	pub fn new() -> Self {
		let binding = BindingConfig::default();
		Self {
			rpc_url: "http://localhost:8545".to_string(),
			synchronization_timeout_ms: binding.synchronization_timeout_ms,
			poll_interval_ms: binding.poll_interval_ms,
			extended_results: binding.extended_results,
			defaults: ExecutionParams::default(),
		}
	}

	/// Sets the RPC endpoint.
	pub fn rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
		self.rpc_url = rpc_url.into();
		self
	}

	/// Sets the receipt timeout in milliseconds.
	pub fn synchronization_timeout_ms(mut self, timeout: u64) -> Self {
		self.synchronization_timeout_ms = timeout;
		self
	}

	/// Sets the receipt polling interval in milliseconds.
	pub fn poll_interval_ms(mut self, interval: u64) -> Self {
		self.poll_interval_ms = interval;
		self
	}

	/// Opts into extended transaction results.
	pub fn extended_results(mut self, enabled: bool) -> Self {
		self.extended_results = enabled;
		self
	}

	/// Sets the class-level execution defaults.
	pub fn defaults(mut self, defaults: ExecutionParams) -> Self {
		self.defaults = defaults;
		self
	}

	/// Builds the `Config` with the configured values.
	pub fn build(self) -> Config {
		Config {
			transport: TransportConfig {
				rpc_url: self.rpc_url,
			},
			binding: BindingConfig {
				synchronization_timeout_ms: self.synchronization_timeout_ms,
				poll_interval_ms: self.poll_interval_ms,
				extended_results: self.extended_results,
			},
			defaults: self.defaults,
		}
	}
}
