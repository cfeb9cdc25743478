//! API route definitions

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{allocations, fees, health, payments, paywall, routes};
use crate::state::AppState;

/// Create the API router; state is attached by the caller
pub fn create_router() -> Router<AppState> {
	Router::new()
		.route("/health", get(health::get_health))
		.route("/v1/routes", post(routes::post_routes))
		.route("/v1/payments/plan", post(payments::post_payment_plan))
		.route("/v1/fees/quote", post(fees::post_fee_quote))
		.route("/v1/fees/progress", get(fees::get_fee_progress))
		.route("/v1/fees/yield", post(fees::post_yield_share))
		.route("/v1/participants", post(fees::post_participant))
		.route(
			"/v1/allocations/preview",
			post(allocations::post_allocation_preview),
		)
		.route(
			"/v1/allocations/preferences",
			put(allocations::put_allocation_preference),
		)
		.route("/v1/paywall/fetch", post(paywall::post_paywall_fetch))
}
