//! Fee engine endpoints

use axum::extract::Query;
use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::handlers::common::ErrorResponse;
use crate::state::AppState;
use stablepay_types::storage::Participant;
use stablepay_types::{FeeBreakdown, TierProgress, YieldSplit};

/// Fee quote request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeQuoteRequest {
	/// Amount in minor units
	pub amount: u64,
	/// Trailing monthly volume in whole currency units
	#[serde(default)]
	pub monthly_volume: u64,
	pub sender_id: String,
	pub receiver_id: String,
	#[serde(default)]
	pub has_funded_gas_allowance: bool,
}

/// POST /v1/fees/quote - Fee owed on a settled payment
pub async fn post_fee_quote(
	State(state): State<AppState>,
	Json(request): Json<FeeQuoteRequest>,
) -> Json<FeeBreakdown> {
	let breakdown = state
		.fee_engine
		.compute_fee(
			request.amount,
			request.monthly_volume,
			&request.sender_id,
			&request.receiver_id,
			request.has_funded_gas_allowance,
		)
		.await;

	Json(breakdown)
}

#[derive(Debug, Deserialize)]
pub struct ProgressQuery {
	#[serde(default)]
	pub volume: u64,
}

/// GET /v1/fees/progress?volume=N - Progress toward the next tier
pub async fn get_fee_progress(
	State(state): State<AppState>,
	Query(query): Query<ProgressQuery>,
) -> Json<TierProgress> {
	Json(state.fee_engine.next_tier_progress(query.volume))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YieldShareRequest {
	/// Realized yield in minor units
	pub yield_earned: u64,
}

/// POST /v1/fees/yield - Protocol/receiver split of realized yield
pub async fn post_yield_share(
	State(state): State<AppState>,
	Json(request): Json<YieldShareRequest>,
) -> Json<YieldSplit> {
	Json(state.fee_engine.compute_yield_share(request.yield_earned))
}

/// Participant registration body
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterParticipantRequest {
	pub id: String,
	#[serde(default)]
	pub display_name: Option<String>,
	#[serde(default)]
	pub gas_allowance: bool,
}

/// POST /v1/participants - Register a network participant
pub async fn post_participant(
	State(state): State<AppState>,
	Json(request): Json<RegisterParticipantRequest>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
	if request.id.trim().is_empty() {
		return Err((
			StatusCode::BAD_REQUEST,
			Json(ErrorResponse::new(
				"VALIDATION_ERROR",
				"participant id must not be empty",
			)),
		));
	}

	let mut participant = Participant::new(request.id.clone());
	if let Some(name) = request.display_name {
		participant = participant.with_display_name(name);
	}
	if request.gas_allowance {
		participant = participant.with_gas_allowance();
	}

	info!("Registering participant {}", request.id);
	state.participants.add(participant).await.map_err(|e| {
		(
			StatusCode::INTERNAL_SERVER_ERROR,
			Json(ErrorResponse::new("STORAGE_ERROR", e.to_string())),
		)
	})?;

	Ok(StatusCode::CREATED)
}
