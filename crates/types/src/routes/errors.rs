//! Error types for route operations

use thiserror::Error;

/// Validation errors for route requests
#[derive(Error, Debug)]
pub enum RouteValidationError {
	#[error("Missing required field: {field}")]
	MissingRequiredField { field: String },

	#[error("Invalid amount: {field} - {reason}")]
	InvalidAmount { field: String, reason: String },

	#[error("Unsupported chain: {chain}")]
	UnsupportedChain { chain: String },
}

/// General route-level errors
#[derive(Error, Debug)]
pub enum RouteError {
	#[error("Route validation failed: {0}")]
	Validation(#[from] RouteValidationError),

	#[error("Route aggregation failed: {reason}")]
	AggregationFailed { reason: String },

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}
