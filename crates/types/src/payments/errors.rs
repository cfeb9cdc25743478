//! Error types for the payment-required protocol

use thiserror::Error;

use super::PaymentDetails;

/// Result type for protocol operations
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors raised by the external payment signer
#[derive(Error, Debug)]
pub enum SignerError {
	#[error("Signer rejected the transfer: {reason}")]
	Rejected { reason: String },

	#[error("Signer is unavailable: {reason}")]
	Unavailable { reason: String },

	#[error("Insufficient funds for {amount} {token} on {chain}")]
	InsufficientFunds {
		amount: String,
		token: String,
		chain: String,
	},
}

/// Errors raised while driving the probe/pay/access handshake
#[derive(Error, Debug)]
pub enum ProtocolError {
	/// A 402 was received but no payment details could be parsed from the
	/// body or the header. Distinct from "no payment required".
	#[error("Payment required but the server response carried no parsable payment details")]
	AmbiguousPaymentRequired,

	/// The signer failed; the original requirements are preserved so the
	/// caller can retry with a different payment path.
	#[error("Payment failed for {} {} to {}: {reason}", details.amount, details.token, details.recipient)]
	PaymentFailed {
		details: PaymentDetails,
		reason: String,
	},

	#[error("Resource access failed with status {status_code}")]
	AccessFailed { status_code: u16 },

	#[error("HTTP request failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

impl ProtocolError {
	/// The payment requirements attached to this error, when it preserves them
	pub fn payment_details(&self) -> Option<&PaymentDetails> {
		match self {
			Self::PaymentFailed { details, .. } => Some(details),
			_ => None,
		}
	}
}
