//! Route response shapes for the API boundary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RouteOption;

/// Aggregated routes response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutesResponse {
	pub routes: Vec<RouteOption>,
	pub total_routes: usize,
	pub request_id: String,
	pub fetched_at: DateTime<Utc>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub metadata: Option<AggregationMetadata>,
}

impl RoutesResponse {
	pub fn new(routes: Vec<RouteOption>, request_id: String) -> Self {
		Self {
			total_routes: routes.len(),
			routes,
			request_id,
			fetched_at: Utc::now(),
			metadata: None,
		}
	}

	pub fn with_metadata(mut self, metadata: AggregationMetadata) -> Self {
		self.metadata = Some(metadata);
		self
	}
}

/// Per-request aggregation statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationMetadata {
	pub total_duration_ms: u64,
	pub providers_queried: usize,
	pub providers_responded_success: usize,
	pub providers_responded_error: usize,
	pub providers_timed_out: usize,
	pub cache_hits: usize,
}
