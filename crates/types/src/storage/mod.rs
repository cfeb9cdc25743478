//! Storage traits for pluggable participant / preference / receipt stores
//!
//! The fee engine and protocol client only ever see these traits, so
//! production deployments can back them with a durable concurrent-safe
//! store without touching the business logic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::payments::PaymentReceipt;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage operation errors
#[derive(Error, Debug)]
pub enum StorageError {
	#[error("Storage backend error: {reason}")]
	Backend { reason: String },

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

/// A registered network participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
	/// Address or human-readable name; matched case-insensitively
	pub id: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub display_name: Option<String>,
	/// Whether the participant pre-funded a gas allowance
	pub has_gas_allowance: bool,
	pub registered_at: DateTime<Utc>,
}

impl Participant {
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			display_name: None,
			has_gas_allowance: false,
			registered_at: Utc::now(),
		}
	}

	pub fn with_gas_allowance(mut self) -> Self {
		self.has_gas_allowance = true;
		self
	}

	pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
		self.display_name = Some(name.into());
		self
	}
}

/// Registry of known network participants
///
/// Entries are added on registration and never automatically removed.
/// Lookups are case-insensitive.
#[async_trait]
pub trait ParticipantStore: Send + Sync {
	async fn contains(&self, id: &str) -> bool;

	async fn add(&self, participant: Participant) -> StorageResult<()>;

	async fn get(&self, id: &str) -> Option<Participant>;
}

/// Key-value text-record store for receiver strategy preferences
///
/// Keyed by receiver identity; the value is the raw multi-destination
/// allocation string (e.g. `"yield:60,restaking:40"`).
#[async_trait]
pub trait PreferenceStore: Send + Sync {
	async fn get_allocation(&self, receiver: &str) -> Option<String>;

	async fn set_allocation(&self, receiver: &str, value: &str) -> StorageResult<()>;
}

/// Append-only log of settled pay-to-access payments
#[async_trait]
pub trait ReceiptStore: Send + Sync {
	async fn put_receipt(&self, receipt: PaymentReceipt) -> StorageResult<()>;

	async fn receipts_for(&self, wallet: &str) -> Vec<PaymentReceipt>;
}
