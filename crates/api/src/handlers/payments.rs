//! Payment planning endpoint

use axum::{extract::State, http::StatusCode, response::Json};
use tracing::info;

use crate::handlers::common::ErrorResponse;
use crate::state::AppState;
use stablepay_service::{PaymentPlan, PaymentPlanRequest};
use stablepay_types::RouteError;

/// POST /v1/payments/plan - Allocate, route and price an inbound payment
pub async fn post_payment_plan(
	State(state): State<AppState>,
	Json(request): Json<PaymentPlanRequest>,
) -> Result<Json<PaymentPlan>, (StatusCode, Json<ErrorResponse>)> {
	info!(
		"Planning payment of {} {} from {} to {}",
		request.amount, request.token, request.sender_id, request.receiver_id
	);

	match state.planner.plan(request).await {
		Ok(plan) => Ok(Json(plan)),
		Err(RouteError::Validation(e)) => Err((
			StatusCode::BAD_REQUEST,
			Json(ErrorResponse::new(
				"VALIDATION_ERROR",
				format!("Invalid request: {}", e),
			)),
		)),
		Err(e) => Err((
			StatusCode::INTERNAL_SERVER_ERROR,
			Json(ErrorResponse::new(
				"PLANNING_ERROR",
				format!("Failed to plan payment: {}", e),
			)),
		)),
	}
}
