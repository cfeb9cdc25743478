//! Core provider trait for liquidity/bridge adapters

use async_trait::async_trait;
use std::fmt::Debug;

use super::{ProviderResult, ProviderRuntimeConfig};
use crate::routes::{RouteFamily, RouteOption, RouteRequest};

/// Static identity of a route provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderInfo {
	pub provider_id: String,
	pub name: String,
	pub version: String,
	pub family: RouteFamily,
}

impl ProviderInfo {
	pub fn new(
		provider_id: impl Into<String>,
		name: impl Into<String>,
		version: impl Into<String>,
		family: RouteFamily,
	) -> Self {
		Self {
			provider_id: provider_id.into(),
			name: name.into(),
			version: version.into(),
			family,
		}
	}
}

/// Interface every liquidity/bridge source implements
///
/// Contract: a request outside the provider's supported (token, chain)
/// pairs returns `Ok(vec![])`, never an error. Errors are reserved for
/// genuine upstream failures (network error, non-2xx, malformed response)
/// and are converted to diagnostic entries by the aggregator rather than
/// propagated.
#[async_trait]
pub trait RouteProvider: Send + Sync + Debug {
	/// Static provider identity; the only required metadata method
	fn info(&self) -> &ProviderInfo;

	/// Provider identifier (for registration and cache namespacing)
	fn id(&self) -> &str {
		&self.info().provider_id
	}

	/// Routing family this provider is queried under
	fn family(&self) -> RouteFamily {
		self.info().family
	}

	/// Find candidate routes for the request
	async fn find_routes(
		&self,
		request: &RouteRequest,
		config: &ProviderRuntimeConfig,
	) -> ProviderResult<Vec<RouteOption>>;

	/// Check whether the provider backend is reachable
	async fn health_check(&self, config: &ProviderRuntimeConfig) -> ProviderResult<bool>;
}
