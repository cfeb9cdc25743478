//! Runtime configuration handed to providers per request

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Per-provider runtime configuration
///
/// Carries the endpoint, timeout and credentials resolved from settings.
/// Providers treat a missing `api_key` as "no credential configured" and
/// fall back to deterministic estimates where the backend requires one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRuntimeConfig {
	pub provider_id: String,
	pub endpoint: String,
	pub timeout_ms: u64,
	pub api_key: Option<String>,
	pub headers: Option<HashMap<String, String>>,
}

impl ProviderRuntimeConfig {
	pub fn new(provider_id: impl Into<String>, endpoint: impl Into<String>) -> Self {
		Self {
			provider_id: provider_id.into(),
			endpoint: endpoint.into(),
			timeout_ms: 5_000,
			api_key: None,
			headers: None,
		}
	}

	pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
		self.timeout_ms = timeout_ms;
		self
	}

	pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
		self.api_key = Some(api_key.into());
		self
	}
}
