//! Core route domain model and business logic

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod errors;
pub mod request;
pub mod response;

pub use errors::{RouteError, RouteValidationError};
pub use request::RouteRequest;
pub use response::{AggregationMetadata, RoutesResponse};

/// Result type for route operations
pub type RouteResult<T> = Result<T, RouteError>;

/// Classification of a settlement route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RouteKind {
	/// Single-step transfer or bridge
	Standard,
	/// Multi-step route composed of bridge + swap/deposit legs
	MultiStepCompose,
	/// Route that terminates in an arbitrary contract invocation
	ContractCall,
}

/// Routing family a provider belongs to
///
/// Families are queried independently; callers may restrict a request to a
/// subset of families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RouteFamily {
	/// Generic swap/bridge aggregator backends
	Aggregator,
	/// Stablecoin-native burn-and-mint bridges
	NativeBridge,
}

/// A candidate settlement route as presented to callers
///
/// Immutable once constructed; produced only by the aggregator. `fee` and
/// `estimated_time` are display strings, not machine-precision amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteOption {
	/// Unique identifier for this route candidate
	pub id: String,

	/// Human-readable description of the hop sequence
	pub path: String,

	/// Display string for the total route fee
	pub fee: String,

	/// Display string for the estimated settlement time
	pub estimated_time: String,

	/// Source identifier; suffixed tags (`-estimate`, `-error`) mark
	/// fallback estimates and diagnostic entries
	pub provider: String,

	/// Optional route classification
	#[serde(skip_serializing_if = "Option::is_none")]
	pub route_type: Option<RouteKind>,
}

impl RouteOption {
	/// Create a new route option with a fresh id
	pub fn new(
		path: impl Into<String>,
		fee: impl Into<String>,
		estimated_time: impl Into<String>,
		provider: impl Into<String>,
	) -> Self {
		Self {
			id: Uuid::new_v4().to_string(),
			path: path.into(),
			fee: fee.into(),
			estimated_time: estimated_time.into(),
			provider: provider.into(),
			route_type: None,
		}
	}

	pub fn with_kind(mut self, kind: RouteKind) -> Self {
		self.route_type = Some(kind);
		self
	}

	/// Build a diagnostic entry describing a provider failure
	///
	/// Tagged `{provider_id}-error` so callers can tell diagnostics apart
	/// from live quotes.
	pub fn diagnostic(provider_id: &str, reason: impl Into<String>) -> Self {
		Self {
			id: Uuid::new_v4().to_string(),
			path: format!("No route available: {}", reason.into()),
			fee: "-".to_string(),
			estimated_time: "-".to_string(),
			provider: format!("{}-error", provider_id),
			route_type: None,
		}
	}

	/// Whether this entry is a diagnostic rather than a live quote
	pub fn is_diagnostic(&self) -> bool {
		self.provider.ends_with("-error")
	}

	/// Whether this entry is a fallback estimate rather than a live quote
	pub fn is_estimate(&self) -> bool {
		self.provider.ends_with("-estimate") || self.provider == "estimate"
	}
}
