//! CCTP provider implementation
//!
//! Native USDC burn-and-mint bridge. Routes are constructed locally: the
//! transfer cost and settlement time of a burn/mint are fixed by the
//! protocol, so no quote API round-trip is needed.

use async_trait::async_trait;
use tracing::debug;

use stablepay_types::{
	ProviderInfo, ProviderResult, ProviderRuntimeConfig, RouteFamily, RouteKind, RouteOption,
	RouteProvider, RouteRequest,
};

/// Chains with native USDC and a CCTP token messenger
const SUPPORTED_CHAINS: &[&str] = &[
	"ethereum",
	"avalanche",
	"optimism",
	"arbitrum",
	"base",
	"polygon",
];

/// CCTP provider for native USDC transfers
#[derive(Debug)]
pub struct CctpProvider {
	info: ProviderInfo,
}

impl CctpProvider {
	pub fn new(info: ProviderInfo) -> Self {
		Self { info }
	}

	/// Default CCTP provider instance
	pub fn with_default_config() -> Self {
		Self::new(ProviderInfo::new(
			"cctp",
			"Circle CCTP",
			"2.0.0",
			RouteFamily::NativeBridge,
		))
	}

	fn supports_chain(chain: &str) -> bool {
		let chain = chain.to_lowercase();
		SUPPORTED_CHAINS.iter().any(|c| *c == chain)
	}

	/// Whether this request is a native USDC transfer between two distinct
	/// supported chains
	fn is_applicable(request: &RouteRequest) -> bool {
		request.from_token.eq_ignore_ascii_case("usdc")
			&& request.to_token.eq_ignore_ascii_case("usdc")
			&& request.is_cross_chain()
			&& Self::supports_chain(&request.from_chain)
			&& Self::supports_chain(&request.to_chain)
	}
}

#[async_trait]
impl RouteProvider for CctpProvider {
	fn info(&self) -> &ProviderInfo {
		&self.info
	}

	async fn find_routes(
		&self,
		request: &RouteRequest,
		_config: &ProviderRuntimeConfig,
	) -> ProviderResult<Vec<RouteOption>> {
		if !Self::is_applicable(request) {
			// Native-asset-only bridge: anything else is simply not
			// applicable, never an error
			debug!(
				"CCTP provider skipping {} {} -> {} {}",
				request.from_token, request.from_chain, request.to_token, request.to_chain
			);
			return Ok(Vec::new());
		}

		let provider_id = self.info.provider_id.clone();
		let mut routes = vec![RouteOption::new(
			format!(
				"Burn USDC on {} -> mint on {} via CCTP",
				request.from_chain, request.to_chain
			),
			"0.00 USDC",
			"~15 min",
			provider_id.clone(),
		)
		.with_kind(RouteKind::Standard)];

		// With a known sender we can also offer the hook variant that mints
		// and forwards through the destination executor in one transaction.
		if request.from_address.is_some() {
			routes.push(
				RouteOption::new(
					format!(
						"Burn USDC on {} -> mint on {} -> forward via destination executor",
						request.from_chain, request.to_chain
					),
					"0.01 USDC",
					"~15 min",
					provider_id,
				)
				.with_kind(RouteKind::ContractCall),
			);
		}

		Ok(routes)
	}

	async fn health_check(&self, _config: &ProviderRuntimeConfig) -> ProviderResult<bool> {
		// Route construction is local; the adapter is always serviceable
		Ok(true)
	}
}
