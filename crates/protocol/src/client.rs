//! Payment-required protocol client
//!
//! Drives the probe -> pay -> access state machine per resource access
//! attempt: `Unprobed -> {Free, PaymentRequired} -> {Paid -> Accessed,
//! PayFailed}`. Every transition either succeeds or returns a terminal
//! failure for the attempt; re-probing and re-paying is a caller decision,
//! never automatic.

use std::sync::Arc;

use reqwest::{Client, Response, StatusCode};
use tracing::{debug, info, warn};

use stablepay_types::storage::ReceiptStore;
use stablepay_types::{
	PaymentDetails, PaymentProof, PaymentReceipt, ProbeOutcome, ProtocolError, ProtocolResult,
	PROOF_VERSION_V2,
};

use crate::signer::PaymentSigner;

/// Proof header: bare settlement reference (V1) or JSON proof (V2)
pub const HEADER_PAYMENT: &str = "X-Payment";
/// Supplementary paying-wallet header (V2)
pub const HEADER_PAYMENT_ADDRESS: &str = "X-Payment-Address";
/// Proof generation marker (V2)
pub const HEADER_PAYMENT_VERSION: &str = "X-Payment-Version";
/// Server-side header carrying `PaymentDetails` serialized as JSON on a 402
pub const HEADER_PAYMENT_REQUIRED: &str = "X-Payment-Required";

/// Result of a complete pay-to-access fetch
#[derive(Debug, Clone)]
pub enum PaywallResponse {
	/// Resource was released without payment
	Free(serde_json::Value),
	/// Resource was paid for and released
	Paid {
		payload: serde_json::Value,
		proof: PaymentProof,
	},
}

impl PaywallResponse {
	pub fn payload(&self) -> &serde_json::Value {
		match self {
			Self::Free(payload) => payload,
			Self::Paid { payload, .. } => payload,
		}
	}
}

/// Client for resources that demand payment before release
pub struct PaywallClient {
	client: Client,
	receipts: Option<Arc<dyn ReceiptStore>>,
}

impl PaywallClient {
	pub fn new() -> ProtocolResult<Self> {
		let client = Client::builder().build().map_err(ProtocolError::Http)?;
		Ok(Self {
			client,
			receipts: None,
		})
	}

	/// Record settled payments into the given receipt log
	pub fn with_receipts(mut self, receipts: Arc<dyn ReceiptStore>) -> Self {
		self.receipts = Some(receipts);
		self
	}

	/// Probe a resource URL
	///
	/// Any non-402 response transitions to `Free`, carrying the body (raw
	/// text is wrapped as a JSON string when it does not parse). A 402 must
	/// yield parsable `PaymentDetails` from the body's `payment` field or
	/// the `X-Payment-Required` header; a 402 without either is an
	/// ambiguous-server error, never a silent `Free`.
	pub async fn probe(&self, url: &str) -> ProtocolResult<ProbeOutcome> {
		debug!("Probing gated resource {}", url);
		let response = self.client.get(url).send().await.map_err(ProtocolError::Http)?;

		if response.status() != StatusCode::PAYMENT_REQUIRED {
			let payload = Self::body_as_value(response).await?;
			return Ok(ProbeOutcome::Free(payload));
		}

		let header_details = response
			.headers()
			.get(HEADER_PAYMENT_REQUIRED)
			.and_then(|value| value.to_str().ok())
			.map(str::to_owned);

		let body: Option<serde_json::Value> = response.json().await.ok();

		match extract_payment_details(body.as_ref(), header_details.as_deref()) {
			Some(details) => {
				info!(
					"Resource {} requires {} {} on {} to {}",
					url, details.amount, details.token, details.chain, details.recipient
				);
				Ok(ProbeOutcome::PaymentRequired(details))
			},
			None => {
				warn!("402 from {} carried no parsable payment details", url);
				Err(ProtocolError::AmbiguousPaymentRequired)
			},
		}
	}

	/// Settle the asserted requirements through the external signer
	///
	/// A signer failure becomes `PaymentFailed` carrying the original
	/// `PaymentDetails`, so the caller can retry with a different payment
	/// path without losing the requirement. Once the transfer has been
	/// dispatched, cancelling the calling future does not undo a possibly
	/// submitted payment; reconciling with the signer's own state is the
	/// caller's job.
	pub async fn pay(
		&self,
		details: &PaymentDetails,
		signer: &dyn PaymentSigner,
	) -> ProtocolResult<PaymentProof> {
		info!(
			"Paying {} {} on {} to {}",
			details.amount, details.token, details.chain, details.recipient
		);

		let reference = signer
			.transfer(
				&details.recipient,
				&details.amount,
				&details.token,
				&details.chain,
			)
			.await
			.map_err(|e| ProtocolError::PaymentFailed {
				details: details.clone(),
				reason: e.to_string(),
			})?;

		Ok(PaymentProof::v2(
			reference,
			signer.wallet_address(),
			details.clone(),
		))
	}

	/// Re-request the resource presenting the payment proof
	///
	/// A V2 proof is presented as two pieces of evidence: the
	/// self-describing `X-Payment` JSON header plus the terse
	/// `X-Payment-Address` header, with `X-Payment-Version` marking the
	/// generation. A V1 proof is the single bare `X-Payment` header, for
	/// servers written against the older scheme.
	pub async fn access(
		&self,
		url: &str,
		proof: &PaymentProof,
	) -> ProtocolResult<serde_json::Value> {
		let mut request = self
			.client
			.get(url)
			.header(HEADER_PAYMENT, proof.to_header_value()?);

		if let PaymentProof::V2 { wallet_address, .. } = proof {
			request = request
				.header(HEADER_PAYMENT_ADDRESS, wallet_address.as_str())
				.header(HEADER_PAYMENT_VERSION, PROOF_VERSION_V2);
		}

		let response = request.send().await.map_err(ProtocolError::Http)?;

		if !response.status().is_success() {
			return Err(ProtocolError::AccessFailed {
				status_code: response.status().as_u16(),
			});
		}

		if let Some(receipts) = &self.receipts {
			if let Some(receipt) = PaymentReceipt::from_proof(url, proof) {
				if let Err(e) = receipts.put_receipt(receipt).await {
					warn!("Failed to record payment receipt for {}: {}", url, e);
				}
			}
		}

		Self::body_as_value(response).await
	}

	/// Full probe -> pay -> access round for one resource
	pub async fn fetch_paid(
		&self,
		url: &str,
		signer: &dyn PaymentSigner,
	) -> ProtocolResult<PaywallResponse> {
		match self.probe(url).await? {
			ProbeOutcome::Free(payload) => Ok(PaywallResponse::Free(payload)),
			ProbeOutcome::PaymentRequired(details) => {
				let proof = self.pay(&details, signer).await?;
				let payload = self.access(url, &proof).await?;
				Ok(PaywallResponse::Paid { payload, proof })
			},
		}
	}

	async fn body_as_value(response: Response) -> ProtocolResult<serde_json::Value> {
		let text = response.text().await.map_err(ProtocolError::Http)?;
		Ok(serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text)))
	}
}

/// Extract payment requirements from a 402 response
///
/// The structured body field takes precedence; the header is the fallback
/// for servers that cannot shape their error bodies.
fn extract_payment_details(
	body: Option<&serde_json::Value>,
	header: Option<&str>,
) -> Option<PaymentDetails> {
	if let Some(details) = body
		.and_then(|body| body.get("payment"))
		.and_then(|payment| serde_json::from_value(payment.clone()).ok())
	{
		return Some(details);
	}

	header.and_then(|raw| serde_json::from_str(raw).ok())
}
