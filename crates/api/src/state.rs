//! Shared application state for API handlers

use std::sync::Arc;

use stablepay_protocol::{PaymentSigner, PaywallClient};
use stablepay_service::{FeeEngine, PaymentPlanner, RouteAggregator, StrategyAllocator};
use stablepay_types::storage::{ParticipantStore, PreferenceStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
	pub aggregator: Arc<RouteAggregator>,
	pub fee_engine: Arc<FeeEngine>,
	pub allocator: Arc<StrategyAllocator>,
	pub planner: Arc<PaymentPlanner>,
	pub paywall: Arc<PaywallClient>,
	pub signer: Arc<dyn PaymentSigner>,
	pub participants: Arc<dyn ParticipantStore>,
	pub preferences: Arc<dyn PreferenceStore>,
}
