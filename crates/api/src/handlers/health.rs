//! Health endpoints

use axum::{extract::State, response::Json};
use serde::Serialize;
use std::collections::HashMap;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
	pub status: &'static str,
	pub providers: HashMap<String, bool>,
}

/// GET /health - Service and provider health
pub async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
	let providers = state.aggregator.health_check_all().await;
	let status = if providers.values().any(|healthy| *healthy) || providers.is_empty() {
		"ok"
	} else {
		"degraded"
	};

	Json(HealthResponse { status, providers })
}
