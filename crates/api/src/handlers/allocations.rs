//! Strategy allocation endpoints

use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::handlers::common::ErrorResponse;
use crate::state::AppState;
use stablepay_service::StrategyAllocator;
use stablepay_types::{AllocationEntry, AllocationSlice};

/// Allocation preview request
///
/// Either an inline `record` or a `receiver` whose stored preference should
/// be used; the inline record wins when both are present.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationPreviewRequest {
	#[serde(default)]
	pub receiver: Option<String>,
	#[serde(default)]
	pub record: Option<String>,
	#[serde(default)]
	pub fallback: Option<String>,
	/// Amount in minor units to split
	pub amount: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationPreviewResponse {
	pub entries: Vec<AllocationEntry>,
	pub slices: Vec<AllocationSlice>,
}

/// POST /v1/allocations/preview - Parse, renormalize and split
pub async fn post_allocation_preview(
	State(state): State<AppState>,
	Json(request): Json<AllocationPreviewRequest>,
) -> Json<AllocationPreviewResponse> {
	let allocation = match (&request.record, &request.receiver) {
		(Some(record), _) => {
			StrategyAllocator::parse_allocation(Some(record), request.fallback.as_deref())
		},
		(None, Some(receiver)) => {
			state
				.allocator
				.allocation_for(receiver, request.fallback.as_deref())
				.await
		},
		(None, None) => StrategyAllocator::parse_allocation(None, request.fallback.as_deref()),
	};

	let slices = StrategyAllocator::split_amount(request.amount, &allocation);

	Json(AllocationPreviewResponse {
		entries: allocation.entries().to_vec(),
		slices,
	})
}

/// Preference update body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPreferenceRequest {
	pub receiver: String,
	/// Raw multi-destination allocation record, stored as-is
	pub record: String,
}

/// PUT /v1/allocations/preferences - Store a receiver's allocation record
pub async fn put_allocation_preference(
	State(state): State<AppState>,
	Json(request): Json<SetPreferenceRequest>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
	if request.receiver.trim().is_empty() {
		return Err((
			StatusCode::BAD_REQUEST,
			Json(ErrorResponse::new(
				"VALIDATION_ERROR",
				"receiver must not be empty",
			)),
		));
	}

	info!(
		"Storing allocation preference for {}: {}",
		request.receiver, request.record
	);
	state
		.preferences
		.set_allocation(&request.receiver, &request.record)
		.await
		.map_err(|e| {
			(
				StatusCode::INTERNAL_SERVER_ERROR,
				Json(ErrorResponse::new("STORAGE_ERROR", e.to_string())),
			)
		})?;

	Ok(StatusCode::NO_CONTENT)
}
