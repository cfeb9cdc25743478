//! Shared HTTP client construction for provider adapters

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;

use stablepay_types::{ProviderError, ProviderResult, ProviderRuntimeConfig};

/// Build an HTTP client with the relay's default headers plus any
/// provider-specific headers from the runtime config
pub fn build_client(config: &ProviderRuntimeConfig) -> ProviderResult<Arc<Client>> {
	let mut headers = HeaderMap::new();
	headers.insert("Accept", HeaderValue::from_static("application/json"));
	headers.insert(
		"User-Agent",
		HeaderValue::from_static("Stablepay-Relay/1.0"),
	);

	if let Some(extra) = &config.headers {
		for (key, value) in extra {
			if let (Ok(header_name), Ok(header_value)) = (
				reqwest::header::HeaderName::from_bytes(key.as_bytes()),
				HeaderValue::from_str(value),
			) {
				headers.insert(header_name, header_value);
			}
		}
	}

	if let Some(api_key) = &config.api_key {
		if let Ok(value) = HeaderValue::from_str(api_key) {
			headers.insert("x-api-key", value);
		}
	}

	let client = Client::builder()
		.default_headers(headers)
		.build()
		.map_err(ProviderError::HttpError)?;

	Ok(Arc::new(client))
}

lazy_static::lazy_static! {
	static ref SHARED_CLIENT: Client = Client::new();
}

/// Bare shared client for requests that need no provider headers
pub fn shared_client() -> &'static Client {
	&SHARED_CLIENT
}
