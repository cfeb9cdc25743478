//! Mock collaborators for examples and integration tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use stablepay_types::{
	PaymentDetails, ProviderInfo, ProviderResult, ProviderRuntimeConfig, RouteFamily,
	RouteOption, RouteProvider, RouteRequest, SignerError,
};

use stablepay_protocol::PaymentSigner;

/// Mock route provider with call tracking and failure simulation
#[derive(Debug)]
pub struct MockRouteProvider {
	info: ProviderInfo,
	calls: Arc<AtomicUsize>,
	should_fail: bool,
	routes: Vec<RouteOption>,
}

impl MockRouteProvider {
	/// Provider that answers with one fixed route
	pub fn success(id: &str, family: RouteFamily) -> Self {
		Self {
			info: ProviderInfo::new(id, format!("{} Mock", id), "1.0.0", family),
			calls: Arc::new(AtomicUsize::new(0)),
			should_fail: false,
			routes: vec![RouteOption::new(
				"mock route",
				"0.10 USDC",
				"~1 min",
				id,
			)],
		}
	}

	/// Provider that fails every request
	pub fn failing(id: &str) -> Self {
		let mut provider = Self::success(id, RouteFamily::Aggregator);
		provider.should_fail = true;
		provider
	}

	/// Provider that answers with the given routes
	pub fn with_routes(id: &str, family: RouteFamily, routes: Vec<RouteOption>) -> Self {
		let mut provider = Self::success(id, family);
		provider.routes = routes;
		provider
	}

	/// Shared call counter, for cache short-circuit assertions
	pub fn call_counter(&self) -> Arc<AtomicUsize> {
		Arc::clone(&self.calls)
	}

	pub fn call_count(&self) -> usize {
		self.calls.load(Ordering::Relaxed)
	}
}

#[async_trait]
impl RouteProvider for MockRouteProvider {
	fn info(&self) -> &ProviderInfo {
		&self.info
	}

	async fn find_routes(
		&self,
		_request: &RouteRequest,
		_config: &ProviderRuntimeConfig,
	) -> ProviderResult<Vec<RouteOption>> {
		self.calls.fetch_add(1, Ordering::Relaxed);

		if self.should_fail {
			return Err(stablepay_types::ProviderError::http_failure(
				503,
				"mock backend unavailable",
			));
		}

		Ok(self.routes.clone())
	}

	async fn health_check(&self, _config: &ProviderRuntimeConfig) -> ProviderResult<bool> {
		Ok(!self.should_fail)
	}
}

/// Mock payment signer producing deterministic settlement references
#[derive(Debug)]
pub struct MockSigner {
	wallet_address: String,
	should_fail: bool,
	transfers: AtomicUsize,
}

impl MockSigner {
	pub fn new(wallet_address: impl Into<String>) -> Self {
		Self {
			wallet_address: wallet_address.into(),
			should_fail: false,
			transfers: AtomicUsize::new(0),
		}
	}

	/// Signer that rejects every transfer
	pub fn failing(wallet_address: impl Into<String>) -> Self {
		let mut signer = Self::new(wallet_address);
		signer.should_fail = true;
		signer
	}

	pub fn transfer_count(&self) -> usize {
		self.transfers.load(Ordering::Relaxed)
	}
}

#[async_trait]
impl PaymentSigner for MockSigner {
	fn wallet_address(&self) -> &str {
		&self.wallet_address
	}

	async fn transfer(
		&self,
		_recipient: &str,
		_amount: &str,
		_token: &str,
		_chain: &str,
	) -> Result<String, SignerError> {
		if self.should_fail {
			return Err(SignerError::Rejected {
				reason: "mock signer configured to fail".to_string(),
			});
		}

		let index = self.transfers.fetch_add(1, Ordering::Relaxed);
		Ok(format!("0xmocktx{:08x}", index))
	}
}

/// Payment details used across examples and tests
pub fn mock_payment_details() -> PaymentDetails {
	PaymentDetails {
		amount: "10".to_string(),
		token: "USDC".to_string(),
		chain: "base".to_string(),
		recipient: "0xabc".to_string(),
	}
}
