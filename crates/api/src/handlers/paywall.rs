//! Pay-to-access endpoint

use axum::response::{IntoResponse, Response};
use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::handlers::common::ErrorResponse;
use crate::state::AppState;
use stablepay_protocol::PaywallResponse;
use stablepay_types::{PaymentDetails, ProtocolError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaywallFetchRequest {
	pub url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaywallFetchResponse {
	pub paid: bool,
	pub payload: serde_json::Value,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub settlement_ref: Option<String>,
}

/// Error body that echoes the unmet payment requirements back to the caller
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequiredResponse {
	pub error: String,
	pub message: String,
	pub payment: PaymentDetails,
}

/// POST /v1/paywall/fetch - Drive the probe/pay/access handshake
///
/// Distinguishes the three caller-visible outcomes: released content (200),
/// payment required but unpayable (402 with the requirements echoed back),
/// and upstream/internal failure (5xx).
pub async fn post_paywall_fetch(
	State(state): State<AppState>,
	Json(request): Json<PaywallFetchRequest>,
) -> Result<Json<PaywallFetchResponse>, Response> {
	info!("Paywall fetch for {}", request.url);

	match state
		.paywall
		.fetch_paid(&request.url, state.signer.as_ref())
		.await
	{
		Ok(PaywallResponse::Free(payload)) => Ok(Json(PaywallFetchResponse {
			paid: false,
			payload,
			settlement_ref: None,
		})),
		Ok(PaywallResponse::Paid { payload, proof }) => Ok(Json(PaywallFetchResponse {
			paid: true,
			payload,
			settlement_ref: Some(proof.settlement_ref().to_string()),
		})),
		Err(ProtocolError::PaymentFailed { details, reason }) => {
			warn!("Payment for {} failed: {}", request.url, reason);
			let body = PaymentRequiredResponse {
				error: "PAYMENT_FAILED".to_string(),
				message: reason,
				payment: details,
			};
			Err((StatusCode::PAYMENT_REQUIRED, Json(body)).into_response())
		},
		Err(e @ ProtocolError::AmbiguousPaymentRequired)
		| Err(e @ ProtocolError::AccessFailed { .. })
		| Err(e @ ProtocolError::Http(_)) => Err((
			StatusCode::BAD_GATEWAY,
			Json(ErrorResponse::new("UPSTREAM_ERROR", e.to_string())),
		)
			.into_response()),
		Err(e) => Err((
			StatusCode::INTERNAL_SERVER_ERROR,
			Json(ErrorResponse::new("INTERNAL_ERROR", e.to_string())),
		)
			.into_response()),
	}
}
