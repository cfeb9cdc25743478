//! Stablepay Protocol
//!
//! Client side of the pay-to-access handshake for gated network resources:
//! probe a URL, settle the asserted payment through an external signer, and
//! re-request with a verifiable payment proof.

pub mod client;
pub mod signer;

pub use client::{
	PaywallClient, PaywallResponse, HEADER_PAYMENT, HEADER_PAYMENT_ADDRESS,
	HEADER_PAYMENT_REQUIRED, HEADER_PAYMENT_VERSION,
};
pub use signer::PaymentSigner;
pub use stablepay_types::{
	PaymentDetails, PaymentProof, ProbeOutcome, ProtocolError, ProtocolResult, SignerError,
};
