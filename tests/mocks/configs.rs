//! Settings fixtures for integration tests

#![allow(dead_code)]

use stablepay_relay::config::{ProviderConfig, Settings};

/// Settings wired to a single mock provider, with short timeouts
pub fn settings_for_mock_provider(provider_id: &str) -> Settings {
	let mut settings = Settings::default();
	settings.providers.clear();
	settings.providers.insert(
		provider_id.to_string(),
		ProviderConfig {
			provider_id: provider_id.to_string(),
			endpoint: "http://localhost".to_string(),
			timeout_ms: 500,
			enabled: true,
			api_key: None,
			headers: None,
		},
	);
	settings.timeouts.per_provider_ms = 500;
	settings.timeouts.global_ms = 2_000;
	settings.timeouts.cache_ttl_secs = 60;
	settings
}

/// Settings with no providers configured at all
pub fn settings_without_providers() -> Settings {
	let mut settings = Settings::default();
	settings.providers.clear();
	settings
}
