//! Error types for provider operations

use thiserror::Error;

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Provider operation errors
///
/// These never cross the aggregator boundary as errors; the aggregator
/// converts them into diagnostic route entries.
#[derive(Error, Debug)]
pub enum ProviderError {
	#[error("Provider not found: {provider_id}")]
	NotFound { provider_id: String },

	#[error("Provider already registered: {provider_id}")]
	AlreadyRegistered { provider_id: String },

	#[error("HTTP request failed: {0}")]
	HttpError(#[from] reqwest::Error),

	#[error("HTTP {status_code}: {reason}")]
	HttpStatusError { status_code: u16, reason: String },

	#[error("Timeout occurred after {timeout_ms}ms")]
	Timeout { timeout_ms: u64 },

	#[error("Invalid response format: {reason}")]
	InvalidResponse { reason: String },

	#[error("Configuration error: {reason}")]
	ConfigError { reason: String },

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

impl ProviderError {
	/// Extract the HTTP status code from the error if available
	pub fn status_code(&self) -> Option<u16> {
		match self {
			ProviderError::HttpStatusError { status_code, .. } => Some(*status_code),
			ProviderError::HttpError(reqwest_error) => {
				reqwest_error.status().map(|status| status.as_u16())
			},
			_ => None,
		}
	}

	/// Create an HTTP failure error with the given status code and reason
	pub fn http_failure(status_code: u16, reason: impl Into<String>) -> Self {
		Self::HttpStatusError {
			status_code,
			reason: reason.into(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_status_code_extraction() {
		let error = ProviderError::http_failure(503, "Service Unavailable");
		assert_eq!(error.status_code(), Some(503));

		let error = ProviderError::InvalidResponse {
			reason: "bad response".to_string(),
		};
		assert_eq!(error.status_code(), None);
	}
}
