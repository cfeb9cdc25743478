//! Local gated-resource server simulating HTTP 402 paywalls

#![allow(dead_code)]

use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tokio::task::JoinHandle;

const HEADER_PAYMENT: &str = "X-Payment";
const HEADER_PAYMENT_ADDRESS: &str = "X-Payment-Address";
const HEADER_PAYMENT_REQUIRED: &str = "X-Payment-Required";

fn payment_details_json() -> serde_json::Value {
	json!({
		"amount": "10",
		"token": "USDC",
		"chain": "base",
		"recipient": "0xabc"
	})
}

/// GET /free - no payment required, structured body
async fn free() -> Json<serde_json::Value> {
	Json(json!({ "report": "weekly" }))
}

/// GET /free-text - no payment required, unstructured body
async fn free_text() -> &'static str {
	"plain text report"
}

/// GET /paid - 402 with requirements in the body until a proof arrives
async fn paid(headers: HeaderMap) -> Response {
	match headers.get(HEADER_PAYMENT) {
		Some(proof) if !proof.is_empty() => {
			// V2 callers also present the wallet address header
			let wallet = headers
				.get(HEADER_PAYMENT_ADDRESS)
				.and_then(|v| v.to_str().ok())
				.unwrap_or("");
			Json(json!({ "premium": true, "payer": wallet })).into_response()
		},
		_ => (
			StatusCode::PAYMENT_REQUIRED,
			Json(json!({
				"error": "payment required",
				"payment": payment_details_json()
			})),
		)
			.into_response(),
	}
}

/// GET /paid-header - 402 carrying the requirements in a header only
async fn paid_header(headers: HeaderMap) -> Response {
	if headers.contains_key(HEADER_PAYMENT) {
		return Json(json!({ "premium": true })).into_response();
	}

	let mut response =
		(StatusCode::PAYMENT_REQUIRED, Json(json!({ "error": "payment required" })))
			.into_response();
	response.headers_mut().insert(
		HEADER_PAYMENT_REQUIRED,
		payment_details_json().to_string().parse().unwrap(),
	);
	response
}

/// GET /legacy - accepts only a bare V1 proof string
async fn legacy(headers: HeaderMap) -> Response {
	match headers.get(HEADER_PAYMENT).and_then(|v| v.to_str().ok()) {
		Some(proof) if !proof.starts_with('{') => {
			Json(json!({ "premium": true, "proof": proof })).into_response()
		},
		Some(_) => (
			StatusCode::BAD_REQUEST,
			Json(json!({ "error": "expected an opaque proof" })),
		)
			.into_response(),
		None => (
			StatusCode::PAYMENT_REQUIRED,
			Json(json!({ "payment": payment_details_json() })),
		)
			.into_response(),
	}
}

/// GET /ambiguous - 402 with no parsable payment details anywhere
async fn ambiguous() -> Response {
	(
		StatusCode::PAYMENT_REQUIRED,
		Json(json!({ "error": "pay up" })),
	)
		.into_response()
}

/// Running gated-resource server
pub struct GatedResourceServer {
	pub base_url: String,
	pub handle: JoinHandle<()>,
}

impl GatedResourceServer {
	pub async fn spawn() -> Result<Self, Box<dyn std::error::Error>> {
		let app = Router::new()
			.route("/free", get(free))
			.route("/free-text", get(free_text))
			.route("/paid", get(paid))
			.route("/paid-header", get(paid_header))
			.route("/legacy", get(legacy))
			.route("/ambiguous", get(ambiguous));

		let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
		let addr = listener.local_addr()?;

		let handle = tokio::spawn(async move {
			axum::serve(listener, app).await.ok();
		});

		Ok(Self {
			base_url: format!("http://{}", addr),
			handle,
		})
	}

	pub fn url(&self, path: &str) -> String {
		format!("{}{}", self.base_url, path)
	}

	pub fn abort(&self) {
		self.handle.abort();
	}
}
