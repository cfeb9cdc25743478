//! LI.FI provider implementation
//!
//! Generic swap/bridge aggregator adapter. Wire shapes from the LI.FI quote
//! API live here and are normalized into [`RouteOption`] before anything
//! crosses the aggregator boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use stablepay_types::{
	ProviderError, ProviderInfo, ProviderResult, ProviderRuntimeConfig, RouteFamily, RouteKind,
	RouteOption, RouteProvider, RouteRequest,
};

use crate::http::{build_client, shared_client};

/// Default LI.FI API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://li.quest/v1";

/// Fallback estimate rate used when no API credential is configured (bps)
const ESTIMATE_FEE_BPS: u64 = 30;

// ================================
// LI.FI API MODELS
// ================================

/// LI.FI quote response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifiQuoteResponse {
	/// Tool (underlying bridge/exchange) selected for the route
	pub tool: String,
	pub estimate: LifiEstimate,
	#[serde(default)]
	pub included_steps: Vec<LifiStep>,
}

/// LI.FI route estimate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifiEstimate {
	/// Output amount in minor units
	pub to_amount: String,
	/// Estimated execution time in seconds
	pub execution_duration: f64,
	#[serde(default)]
	pub fee_costs: Vec<LifiFeeCost>,
}

/// One fee line of a LI.FI estimate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifiFeeCost {
	pub name: String,
	#[serde(default)]
	pub amount_usd: Option<String>,
}

/// One step of a composed LI.FI route
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifiStep {
	#[serde(rename = "type")]
	pub step_type: String,
	pub tool: String,
}

/// LI.FI provider for generic swap/bridge quotes
#[derive(Debug)]
pub struct LifiProvider {
	info: ProviderInfo,
}

impl LifiProvider {
	pub fn new(info: ProviderInfo) -> Self {
		Self { info }
	}

	/// Default LI.FI provider instance
	pub fn with_default_config() -> Self {
		Self::new(ProviderInfo::new(
			"lifi",
			"LI.FI Aggregator",
			"1.0.0",
			RouteFamily::Aggregator,
		))
	}

	/// Numeric chain id for the chains this adapter services
	fn chain_id(chain: &str) -> Option<u64> {
		match chain.to_lowercase().as_str() {
			"ethereum" | "mainnet" => Some(1),
			"optimism" => Some(10),
			"polygon" => Some(137),
			"base" => Some(8453),
			"arbitrum" => Some(42161),
			"avalanche" => Some(43114),
			_ => None,
		}
	}

	/// Deterministic estimate used when no credential is configured
	///
	/// Tagged `lifi-estimate` so callers can tell it apart from a live quote.
	fn fallback_estimate(&self, request: &RouteRequest) -> Option<RouteOption> {
		let amount: u64 = request.amount.trim().parse().ok()?;
		let fee_minor = amount * ESTIMATE_FEE_BPS / 10_000;

		let estimated_time = if request.is_cross_chain() {
			"~3 min"
		} else {
			"~30 s"
		};

		Some(
			RouteOption::new(
				format!(
					"{} {} on {} -> {} on {}",
					request.amount,
					request.from_token,
					request.from_chain,
					request.to_token,
					request.to_chain
				),
				format_usdc(fee_minor),
				estimated_time,
				format!("{}-estimate", self.info.provider_id),
			)
			.with_kind(RouteKind::Standard),
		)
	}

	fn convert_quote(&self, quote: LifiQuoteResponse, request: &RouteRequest) -> RouteOption {
		let path = if quote.included_steps.len() > 1 {
			let tools: Vec<&str> = quote
				.included_steps
				.iter()
				.map(|s| s.tool.as_str())
				.collect();
			format!(
				"{} -> {} via {}",
				request.from_chain,
				request.to_chain,
				tools.join(" -> ")
			)
		} else {
			format!(
				"{} -> {} via {}",
				request.from_chain, request.to_chain, quote.tool
			)
		};

		let fee_usd: f64 = quote
			.estimate
			.fee_costs
			.iter()
			.filter_map(|f| f.amount_usd.as_deref())
			.filter_map(|v| v.parse::<f64>().ok())
			.sum();

		let kind = if quote.included_steps.len() > 1 {
			RouteKind::MultiStepCompose
		} else {
			RouteKind::Standard
		};

		RouteOption::new(
			path,
			format!("{:.2} USD", fee_usd),
			format_duration(quote.estimate.execution_duration),
			self.info.provider_id.clone(),
		)
		.with_kind(kind)
	}
}

#[async_trait]
impl RouteProvider for LifiProvider {
	fn info(&self) -> &ProviderInfo {
		&self.info
	}

	async fn find_routes(
		&self,
		request: &RouteRequest,
		config: &ProviderRuntimeConfig,
	) -> ProviderResult<Vec<RouteOption>> {
		let (Some(from_chain), Some(to_chain)) = (
			Self::chain_id(&request.from_chain),
			Self::chain_id(&request.to_chain),
		) else {
			// Outside the serviced chain set: not applicable, not an error
			debug!(
				"LI.FI provider skipping unsupported pair {} -> {}",
				request.from_chain, request.to_chain
			);
			return Ok(Vec::new());
		};

		if config.api_key.is_none() {
			warn!("No LI.FI credential configured, returning deterministic estimate");
			return Ok(self.fallback_estimate(request).into_iter().collect());
		}

		let client = build_client(config)?;
		let quote_url = format!("{}/quote", config.endpoint);

		let mut query: Vec<(&str, String)> = vec![
			("fromChain", from_chain.to_string()),
			("toChain", to_chain.to_string()),
			("fromToken", request.from_token.clone()),
			("toToken", request.to_token.clone()),
			("fromAmount", request.amount.clone()),
		];
		if let Some(from_address) = &request.from_address {
			query.push(("fromAddress", from_address.clone()));
		}
		// Exclusion list is a best-effort hint passed straight through
		if !request.deny_exchanges.is_empty() {
			query.push(("denyExchanges", request.deny_exchanges.join(",")));
		}

		debug!(
			"Fetching LI.FI quote from {} ({} -> {})",
			quote_url, request.from_chain, request.to_chain
		);

		let response = client
			.get(&quote_url)
			.query(&query)
			.send()
			.await
			.map_err(ProviderError::HttpError)?;

		if !response.status().is_success() {
			return Err(ProviderError::http_failure(
				response.status().as_u16(),
				"LI.FI quote endpoint returned failure",
			));
		}

		let quote: LifiQuoteResponse =
			response
				.json()
				.await
				.map_err(|e| ProviderError::InvalidResponse {
					reason: format!("Malformed LI.FI quote response: {}", e),
				})?;

		Ok(vec![self.convert_quote(quote, request)])
	}

	async fn health_check(&self, config: &ProviderRuntimeConfig) -> ProviderResult<bool> {
		// The chains listing is public, so the bare shared client suffices
		let response = shared_client()
			.get(format!("{}/chains", config.endpoint))
			.send()
			.await
			.map_err(ProviderError::HttpError)?;

		Ok(response.status().is_success())
	}
}

fn format_usdc(minor: u64) -> String {
	format!("{}.{:02} USDC", minor / 1_000_000, (minor % 1_000_000) / 10_000)
}

fn format_duration(seconds: f64) -> String {
	if seconds < 90.0 {
		format!("~{} s", seconds.round() as u64)
	} else {
		format!("~{} min", (seconds / 60.0).round() as u64)
	}
}
