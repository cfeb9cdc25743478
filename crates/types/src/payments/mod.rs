//! Payment-required protocol domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod errors;

pub use errors::{ProtocolError, ProtocolResult, SignerError};

/// Version marker for bare opaque-string proofs
pub const PROOF_VERSION_V1: &str = "1";
/// Version marker for structured proofs bound to a wallet identity
pub const PROOF_VERSION_V2: &str = "2";

/// Payment requirements asserted by a gated resource on probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
	/// Amount in display units of `token` (e.g. "10" USDC)
	pub amount: String,
	pub token: String,
	pub chain: String,
	pub recipient: String,
}

/// Outcome of probing a gated resource
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
	/// Resource released without payment; carries the response payload.
	/// Bodies that do not parse as structured data are wrapped as a
	/// JSON string.
	Free(serde_json::Value),
	/// Resource demands payment before release
	PaymentRequired(PaymentDetails),
}

/// Evidence that a payment requirement has been satisfied
///
/// Modeled as a tagged variant so a V1 opaque-string proof and a V2
/// structured proof can coexist against servers written for either
/// generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaymentProof {
	/// Bare opaque settlement reference (transaction hash or signed receipt)
	V1(String),
	/// Structured proof bound to the paying wallet identity
	#[serde(rename_all = "camelCase")]
	V2 {
		/// Opaque settlement reference
		proof: String,
		wallet_address: String,
		paid_at: DateTime<Utc>,
		payment_details: PaymentDetails,
		version: String,
	},
}

impl PaymentProof {
	/// Construct a V2 proof for a settled payment
	pub fn v2(
		proof: impl Into<String>,
		wallet_address: impl Into<String>,
		payment_details: PaymentDetails,
	) -> Self {
		Self::V2 {
			proof: proof.into(),
			wallet_address: wallet_address.into(),
			paid_at: Utc::now(),
			payment_details,
			version: PROOF_VERSION_V2.to_string(),
		}
	}

	pub fn version(&self) -> &str {
		match self {
			Self::V1(_) => PROOF_VERSION_V1,
			Self::V2 { version, .. } => version,
		}
	}

	/// The opaque settlement reference carried by either variant
	pub fn settlement_ref(&self) -> &str {
		match self {
			Self::V1(proof) => proof,
			Self::V2 { proof, .. } => proof,
		}
	}

	pub fn wallet_address(&self) -> Option<&str> {
		match self {
			Self::V1(_) => None,
			Self::V2 { wallet_address, .. } => Some(wallet_address),
		}
	}

	/// Serialize for presentation as a proof header: the bare reference for
	/// V1, a JSON object for V2
	pub fn to_header_value(&self) -> ProtocolResult<String> {
		match self {
			Self::V1(proof) => Ok(proof.clone()),
			Self::V2 { .. } => serde_json::to_string(self).map_err(ProtocolError::Serialization),
		}
	}
}

/// Record of a settled pay-to-access payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
	pub resource_url: String,
	pub wallet_address: String,
	pub settlement_ref: String,
	pub payment_details: PaymentDetails,
	pub settled_at: DateTime<Utc>,
}

impl PaymentReceipt {
	pub fn from_proof(resource_url: impl Into<String>, proof: &PaymentProof) -> Option<Self> {
		match proof {
			PaymentProof::V2 {
				proof,
				wallet_address,
				paid_at,
				payment_details,
				..
			} => Some(Self {
				resource_url: resource_url.into(),
				wallet_address: wallet_address.clone(),
				settlement_ref: proof.clone(),
				payment_details: payment_details.clone(),
				settled_at: *paid_at,
			}),
			PaymentProof::V1(_) => None,
		}
	}
}
