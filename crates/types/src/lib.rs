//! Stablepay Types
//!
//! Shared models and traits for the stablepay relay.
//! This crate contains all domain models organized by business entity.

pub mod fees;
pub mod payments;
pub mod providers;
pub mod routes;
pub mod storage;
pub mod strategy;

// Re-export chrono and serde_json for convenience
pub use chrono;
pub use serde_json;

// Re-export commonly used types for convenience
pub use routes::{
	RouteError, RouteFamily, RouteKind, RouteOption, RouteRequest, RouteResult,
	RouteValidationError, RoutesResponse,
};

pub use providers::{
	ProviderError, ProviderInfo, ProviderResult, ProviderRuntimeConfig, RouteProvider,
};

pub use payments::{
	PaymentDetails, PaymentProof, PaymentReceipt, ProbeOutcome, ProtocolError, ProtocolResult,
	SignerError, PROOF_VERSION_V1, PROOF_VERSION_V2,
};

pub use fees::{DiscountReason, FeeBreakdown, FeeError, FeeTier, TierProgress, YieldSplit};

pub use strategy::{AllocationEntry, AllocationSlice, StrategyAllocation, StrategyKind};

pub use storage::{
	Participant, ParticipantStore, PreferenceStore, ReceiptStore, StorageError, StorageResult,
};
