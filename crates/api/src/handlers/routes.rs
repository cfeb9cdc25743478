//! Route aggregation endpoint

use axum::{extract::State, http::StatusCode, response::Json};
use tracing::info;
use uuid::Uuid;

use crate::handlers::common::ErrorResponse;
use crate::state::AppState;
use stablepay_types::{RouteError, RouteRequest, RoutesResponse};

/// POST /v1/routes - Aggregate candidate routes
///
/// "No route found" is a 200 with an empty array, never an error: callers
/// branch on the content, not the status.
pub async fn post_routes(
	State(state): State<AppState>,
	Json(request): Json<RouteRequest>,
) -> Result<Json<RoutesResponse>, (StatusCode, Json<ErrorResponse>)> {
	info!(
		"Received routes request {} {} -> {} {}",
		request.from_token, request.from_chain, request.to_token, request.to_chain
	);

	let (routes, metadata) = match state.aggregator.fetch_routes(request).await {
		Ok(result) => result,
		Err(RouteError::Validation(e)) => {
			return Err((
				StatusCode::BAD_REQUEST,
				Json(ErrorResponse::new(
					"VALIDATION_ERROR",
					format!("Invalid request: {}", e),
				)),
			));
		},
		Err(e) => {
			return Err((
				StatusCode::INTERNAL_SERVER_ERROR,
				Json(ErrorResponse::new(
					"AGGREGATION_ERROR",
					format!("Failed to fetch routes: {}", e),
				)),
			));
		},
	};

	Ok(Json(
		RoutesResponse::new(routes, Uuid::new_v4().to_string()).with_metadata(metadata),
	))
}
