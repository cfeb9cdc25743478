//! Payment planning: allocation split, per-slice routing and the fee quote
//!
//! Composes the allocator, aggregator and fee engine into the full inbound
//! payment flow: the declared strategy allocation partitions the amount,
//! every (destination, sub-amount) pair is routed independently, and the
//! fee to deduct is computed from the counterparty identities and trailing
//! volume.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use stablepay_types::routes::AggregationMetadata;
use stablepay_types::{FeeBreakdown, RouteOption, RouteRequest, RouteResult, StrategyKind};

use crate::aggregator::RouteAggregator;
use crate::allocator::StrategyAllocator;
use crate::fees::FeeEngine;

/// An inbound payment to plan
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPlanRequest {
	pub from_chain: String,
	pub to_chain: String,
	/// Amount in minor units
	pub amount: u64,
	pub token: String,
	pub sender_id: String,
	pub receiver_id: String,
	#[serde(default)]
	pub monthly_volume: u64,
	#[serde(default)]
	pub sender_address: Option<String>,
	/// Single-destination fallback when the receiver declared no allocation
	#[serde(default)]
	pub fallback_strategy: Option<String>,
}

/// One routed slice of a planned payment
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedSlice {
	pub destination: StrategyKind,
	pub amount: u64,
	pub routes: Vec<RouteOption>,
	pub metadata: AggregationMetadata,
}

/// Complete plan for an inbound payment
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPlan {
	pub slices: Vec<PlannedSlice>,
	pub fee: FeeBreakdown,
}

/// Plans an inbound payment end to end
pub struct PaymentPlanner {
	aggregator: Arc<RouteAggregator>,
	allocator: Arc<StrategyAllocator>,
	fee_engine: Arc<FeeEngine>,
}

impl PaymentPlanner {
	pub fn new(
		aggregator: Arc<RouteAggregator>,
		allocator: Arc<StrategyAllocator>,
		fee_engine: Arc<FeeEngine>,
	) -> Self {
		Self {
			aggregator,
			allocator,
			fee_engine,
		}
	}

	/// Split the amount by the receiver's allocation and route every slice
	///
	/// Slices are routed independently; a slice with no viable route still
	/// appears in the plan with an empty route set, so the caller sees the
	/// whole partition.
	pub async fn plan(&self, request: PaymentPlanRequest) -> RouteResult<PaymentPlan> {
		let allocation = self
			.allocator
			.allocation_for(&request.receiver_id, request.fallback_strategy.as_deref())
			.await;
		let slices = StrategyAllocator::split_amount(request.amount, &allocation);

		info!(
			"Planning {} {} from {} to {} across {} destination(s)",
			request.amount,
			request.token,
			request.sender_id,
			request.receiver_id,
			slices.len()
		);

		let mut planned = Vec::with_capacity(slices.len());
		for slice in slices {
			let mut route_request = RouteRequest::new(
				request.from_chain.clone(),
				request.to_chain.clone(),
				slice.amount.to_string(),
				request.token.clone(),
				request.token.clone(),
			);
			if let Some(sender_address) = &request.sender_address {
				route_request = route_request.with_from_address(sender_address.clone());
			}

			let (routes, metadata) = self.aggregator.fetch_routes(route_request).await?;
			planned.push(PlannedSlice {
				destination: slice.destination,
				amount: slice.amount,
				routes,
				metadata,
			});
		}

		let fee = self
			.fee_engine
			.compute_fee(
				request.amount,
				request.monthly_volume,
				&request.sender_id,
				&request.receiver_id,
				false,
			)
			.await;

		Ok(PaymentPlan {
			slices: planned,
			fee,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;

	use stablepay_providers::{ProviderRegistry, RouteCache};
	use stablepay_storage::MemoryStore;
	use stablepay_types::storage::{ParticipantStore, PreferenceStore};
	use stablepay_types::{
		ProviderInfo, ProviderResult, ProviderRuntimeConfig, RouteFamily, RouteProvider,
	};

	/// Provider that echoes the requested amount back in the route path
	#[derive(Debug)]
	struct EchoProvider {
		info: ProviderInfo,
	}

	#[async_trait]
	impl RouteProvider for EchoProvider {
		fn info(&self) -> &ProviderInfo {
			&self.info
		}

		async fn find_routes(
			&self,
			request: &RouteRequest,
			_config: &ProviderRuntimeConfig,
		) -> ProviderResult<Vec<RouteOption>> {
			Ok(vec![RouteOption::new(
				format!("route for {}", request.amount),
				"0.10 USDC",
				"~1 min",
				"echo",
			)])
		}

		async fn health_check(&self, _config: &ProviderRuntimeConfig) -> ProviderResult<bool> {
			Ok(true)
		}
	}

	async fn planner_with_store(store: MemoryStore) -> PaymentPlanner {
		let mut registry = ProviderRegistry::new();
		registry
			.register(Box::new(EchoProvider {
				info: ProviderInfo::new("echo", "Echo", "1.0.0", RouteFamily::Aggregator),
			}))
			.unwrap();

		let aggregator = RouteAggregator::new(
			Arc::new(registry),
			vec![ProviderRuntimeConfig::new("echo", "http://localhost")],
			RouteCache::new(),
			200,
			1_000,
		);

		let participants: Arc<dyn ParticipantStore> = Arc::new(store.clone());
		let preferences: Arc<dyn PreferenceStore> = Arc::new(store);

		PaymentPlanner::new(
			Arc::new(aggregator),
			Arc::new(StrategyAllocator::new(preferences)),
			Arc::new(FeeEngine::with_default_schedule(participants)),
		)
	}

	fn plan_request(amount: u64) -> PaymentPlanRequest {
		PaymentPlanRequest {
			from_chain: "base".to_string(),
			to_chain: "arbitrum".to_string(),
			amount,
			token: "USDC".to_string(),
			sender_id: "sender.eth".to_string(),
			receiver_id: "shop.eth".to_string(),
			monthly_volume: 0,
			sender_address: None,
			fallback_strategy: None,
		}
	}

	#[tokio::test]
	async fn test_plan_routes_every_slice_independently() {
		let store = MemoryStore::new();
		store
			.set_allocation("shop.eth", "yield:60,restaking:40")
			.await
			.unwrap();
		let planner = planner_with_store(store).await;

		let plan = planner.plan(plan_request(100_000_000)).await.unwrap();

		assert_eq!(plan.slices.len(), 2);
		assert_eq!(plan.slices[0].destination, StrategyKind::Yield);
		assert_eq!(plan.slices[0].amount, 60_000_000);
		assert_eq!(plan.slices[1].destination, StrategyKind::Restaking);
		assert_eq!(plan.slices[1].amount, 40_000_000);

		// Each slice was routed with its own sub-amount
		assert!(plan.slices[0].routes[0].path.contains("60000000"));
		assert!(plan.slices[1].routes[0].path.contains("40000000"));

		// Slice sum reproduces the inbound amount
		let total: u64 = plan.slices.iter().map(|s| s.amount).sum();
		assert_eq!(total, 100_000_000);
	}

	#[tokio::test]
	async fn test_plan_includes_fee_on_the_full_amount() {
		let planner = planner_with_store(MemoryStore::new()).await;

		let plan = planner.plan(plan_request(100_000_000)).await.unwrap();

		// Unregistered pair in the lowest tier: 50 bps of 100 USDC
		assert_eq!(plan.fee.fee_rate_bps, 50);
		assert_eq!(plan.fee.fee_amount, 500_000);
	}

	#[tokio::test]
	async fn test_plan_defaults_to_single_hold_slice() {
		let planner = planner_with_store(MemoryStore::new()).await;

		let plan = planner.plan(plan_request(42)).await.unwrap();

		assert_eq!(plan.slices.len(), 1);
		assert_eq!(plan.slices[0].destination, StrategyKind::Hold);
		assert_eq!(plan.slices[0].amount, 42);
	}
}
