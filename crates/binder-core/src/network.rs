//! Selection of the artifact network record for a network id.

use crate::ContractError;
use binder_transport::TransportInterface;
use binder_types::Artifact;

/// Network id of the primary public network.
pub const PRIMARY_NETWORK_ID: &str = "1";

/// Record keys tried, in order, for the primary network id.
pub const PRIMARY_NETWORK_ALIASES: [&str; 3] = ["1", "live", "default"];

/// Record key selected before any network has been resolved.
pub const BOOTSTRAP_NETWORK: &str = "default";

/// Returns the record key to use for `network_id`.
///
/// The primary network id falls back through its aliases; any other id must
/// be present verbatim.
pub fn select_network(artifact: &Artifact, network_id: &str) -> Result<String, ContractError> {
	let mut selected = network_id;
	if network_id == PRIMARY_NETWORK_ID {
		if let Some(alias) = PRIMARY_NETWORK_ALIASES
			.iter()
			.find(|alias| artifact.networks.contains_key(**alias))
		{
			selected = alias;
		}
	}

	if !artifact.networks.contains_key(selected) {
		return Err(ContractError::NetworkResolution(format!(
			"{} error: Can't find artifacts for network id '{}'",
			artifact.contract_name, selected
		)));
	}
	Ok(selected.to_string())
}

/// Asks the transport for its network id and selects the matching record.
pub async fn detect_network(
	transport: &dyn TransportInterface,
	artifact: &Artifact,
) -> Result<String, ContractError> {
	let network_id = transport.network_id().await?;
	let selected = select_network(artifact, &network_id)?;
	tracing::info!(
		contract = %artifact.contract_name,
		network_id = %network_id,
		record = %selected,
		"Resolved network"
	);
	Ok(selected)
}

#[cfg(test)]
mod tests {
	use super::*;
	use binder_transport::{MockTransportInterface, TransportError};
	use binder_types::NetworkRecord;

	fn artifact(networks: &[&str]) -> Artifact {
		Artifact {
			contract_name: "TimeClock".to_string(),
			generated_with: None,
			networks: networks
				.iter()
				.map(|id| (id.to_string(), NetworkRecord::default()))
				.collect(),
		}
	}

	#[test]
	fn test_exact_match() {
		assert_eq!(select_network(&artifact(&["3", "42"]), "42").unwrap(), "42");
	}

	#[test]
	fn test_primary_alias_order() {
		assert_eq!(select_network(&artifact(&["1", "live", "default"]), "1").unwrap(), "1");
		assert_eq!(select_network(&artifact(&["live", "default"]), "1").unwrap(), "live");
		assert_eq!(select_network(&artifact(&["default"]), "1").unwrap(), "default");
	}

	#[test]
	fn test_aliases_only_apply_to_primary() {
		let result = select_network(&artifact(&["default"]), "3");
		assert!(matches!(result, Err(ContractError::NetworkResolution(_))));
	}

	#[test]
	fn test_missing_network_message() {
		let err = select_network(&artifact(&["3"]), "1").unwrap_err();
		assert_eq!(
			err.to_string(),
			"TimeClock error: Can't find artifacts for network id '1'"
		);
	}

	#[tokio::test]
	async fn test_detect_network() {
		let mut mock = MockTransportInterface::new();
		mock.expect_network_id()
			.times(1)
			.returning(|| Box::pin(async move { Ok("1".to_string()) }));

		let selected = detect_network(&mock, &artifact(&["live"])).await.unwrap();
		assert_eq!(selected, "live");
	}

	#[tokio::test]
	async fn test_detect_network_transport_failure() {
		let mut mock = MockTransportInterface::new();
		mock.expect_network_id()
			.returning(|| Box::pin(async move { Err(TransportError::Network("offline".into())) }));

		let result = detect_network(&mock, &artifact(&["live"])).await;
		assert!(matches!(result, Err(ContractError::Transport(_))));
	}
}
