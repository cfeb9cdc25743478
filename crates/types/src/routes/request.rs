//! Route request model and normalization

use serde::{Deserialize, Serialize};

use super::errors::RouteValidationError;
use super::RouteFamily;

/// A routing request as accepted by providers and the aggregator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
	/// Source chain identifier (e.g. "base")
	pub from_chain: String,

	/// Destination chain identifier
	pub to_chain: String,

	/// Amount in minor units of the source token, as a string to
	/// preserve precision
	pub amount: String,

	/// Source token symbol or address
	pub from_token: String,

	/// Destination token symbol or address
	pub to_token: String,

	/// Sending wallet, when known; some providers quote better with it
	#[serde(skip_serializing_if = "Option::is_none")]
	pub from_address: Option<String>,

	/// Restrict the query to these routing families; `None` means all
	#[serde(skip_serializing_if = "Option::is_none")]
	pub families: Option<Vec<RouteFamily>>,

	/// Best-effort hint: underlying exchanges the caller wants excluded.
	/// Passed through to providers that support it.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub deny_exchanges: Vec<String>,
}

impl RouteRequest {
	pub fn new(
		from_chain: impl Into<String>,
		to_chain: impl Into<String>,
		amount: impl Into<String>,
		from_token: impl Into<String>,
		to_token: impl Into<String>,
	) -> Self {
		Self {
			from_chain: from_chain.into(),
			to_chain: to_chain.into(),
			amount: amount.into(),
			from_token: from_token.into(),
			to_token: to_token.into(),
			from_address: None,
			families: None,
			deny_exchanges: Vec::new(),
		}
	}

	pub fn with_from_address(mut self, address: impl Into<String>) -> Self {
		self.from_address = Some(address.into());
		self
	}

	pub fn with_families(mut self, families: Vec<RouteFamily>) -> Self {
		self.families = Some(families);
		self
	}

	pub fn with_deny_exchanges(mut self, exchanges: Vec<String>) -> Self {
		self.deny_exchanges = exchanges;
		self
	}

	/// Whether the request spans two distinct chains
	pub fn is_cross_chain(&self) -> bool {
		!self.from_chain.eq_ignore_ascii_case(&self.to_chain)
	}

	/// Whether a provider of the given family should be queried
	pub fn wants_family(&self, family: RouteFamily) -> bool {
		match &self.families {
			Some(families) => families.contains(&family),
			None => true,
		}
	}

	/// Canonical cache-key segment for this request
	///
	/// Lowercases chains and tokens so that equivalent requests map to the
	/// same cache entry. The deny list is part of the key: a request with a
	/// different exclusion set is a different quote.
	pub fn normalized_key(&self) -> String {
		let mut deny = self
			.deny_exchanges
			.iter()
			.map(|e| e.to_lowercase())
			.collect::<Vec<_>>();
		deny.sort();

		format!(
			"{}:{}:{}:{}:{}:{}",
			self.from_chain.to_lowercase(),
			self.to_chain.to_lowercase(),
			self.from_token.to_lowercase(),
			self.to_token.to_lowercase(),
			self.amount.trim(),
			deny.join("+"),
		)
	}

	/// Validate the request shape before aggregation
	pub fn validate(&self) -> Result<(), RouteValidationError> {
		if self.from_chain.trim().is_empty() {
			return Err(RouteValidationError::MissingRequiredField {
				field: "fromChain".to_string(),
			});
		}
		if self.to_chain.trim().is_empty() {
			return Err(RouteValidationError::MissingRequiredField {
				field: "toChain".to_string(),
			});
		}
		if self.from_token.trim().is_empty() {
			return Err(RouteValidationError::MissingRequiredField {
				field: "fromToken".to_string(),
			});
		}
		if self.to_token.trim().is_empty() {
			return Err(RouteValidationError::MissingRequiredField {
				field: "toToken".to_string(),
			});
		}

		match self.amount.trim().parse::<u64>() {
			Ok(0) => Err(RouteValidationError::InvalidAmount {
				field: "amount".to_string(),
				reason: "must be positive".to_string(),
			}),
			Ok(_) => Ok(()),
			Err(_) => Err(RouteValidationError::InvalidAmount {
				field: "amount".to_string(),
				reason: "not a whole number of minor units".to_string(),
			}),
		}
	}
}
