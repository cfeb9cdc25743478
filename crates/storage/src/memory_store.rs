//! In-memory storage implementation using DashMap

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use stablepay_types::payments::PaymentReceipt;
use stablepay_types::storage::{
	Participant, ParticipantStore, PreferenceStore, ReceiptStore, StorageResult,
};

/// In-memory store for participants, preferences and receipts
///
/// Shared mutable state tolerates last-write-wins semantics; there is no
/// cross-request locking. Participant keys are normalized to lowercase so
/// lookups are case-insensitive.
#[derive(Clone, Default)]
pub struct MemoryStore {
	participants: Arc<DashMap<String, Participant>>,
	preferences: Arc<DashMap<String, String>>,
	receipts: Arc<DashMap<String, Vec<PaymentReceipt>>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self {
			participants: Arc::new(DashMap::new()),
			preferences: Arc::new(DashMap::new()),
			receipts: Arc::new(DashMap::new()),
		}
	}

	fn normalize(id: &str) -> String {
		id.trim().to_lowercase()
	}

	pub fn participant_count(&self) -> usize {
		self.participants.len()
	}
}

#[async_trait]
impl ParticipantStore for MemoryStore {
	async fn contains(&self, id: &str) -> bool {
		self.participants.contains_key(&Self::normalize(id))
	}

	async fn add(&self, participant: Participant) -> StorageResult<()> {
		let key = Self::normalize(&participant.id);
		debug!("Registering participant {}", key);
		self.participants.insert(key, participant);
		Ok(())
	}

	async fn get(&self, id: &str) -> Option<Participant> {
		self.participants
			.get(&Self::normalize(id))
			.map(|entry| entry.value().clone())
	}
}

#[async_trait]
impl PreferenceStore for MemoryStore {
	async fn get_allocation(&self, receiver: &str) -> Option<String> {
		self.preferences
			.get(&Self::normalize(receiver))
			.map(|entry| entry.value().clone())
	}

	async fn set_allocation(&self, receiver: &str, value: &str) -> StorageResult<()> {
		self.preferences
			.insert(Self::normalize(receiver), value.to_string());
		Ok(())
	}
}

#[async_trait]
impl ReceiptStore for MemoryStore {
	async fn put_receipt(&self, receipt: PaymentReceipt) -> StorageResult<()> {
		let key = Self::normalize(&receipt.wallet_address);
		self.receipts.entry(key).or_default().push(receipt);
		Ok(())
	}

	async fn receipts_for(&self, wallet: &str) -> Vec<PaymentReceipt> {
		self.receipts
			.get(&Self::normalize(wallet))
			.map(|entry| entry.value().clone())
			.unwrap_or_default()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use stablepay_types::payments::PaymentDetails;

	#[tokio::test]
	async fn test_participant_lookup_is_case_insensitive() {
		let store = MemoryStore::new();
		store
			.add(Participant::new("Alice.eth"))
			.await
			.unwrap();

		assert!(store.contains("alice.eth").await);
		assert!(store.contains("ALICE.ETH").await);
		assert!(!store.contains("bob.eth").await);
	}

	#[tokio::test]
	async fn test_preference_last_write_wins() {
		let store = MemoryStore::new();
		store.set_allocation("shop.eth", "yield:100").await.unwrap();
		store
			.set_allocation("shop.eth", "yield:60,restaking:40")
			.await
			.unwrap();

		assert_eq!(
			store.get_allocation("shop.eth").await.as_deref(),
			Some("yield:60,restaking:40")
		);
	}

	#[tokio::test]
	async fn test_receipts_accumulate_per_wallet() {
		let store = MemoryStore::new();
		let details = PaymentDetails {
			amount: "10".to_string(),
			token: "USDC".to_string(),
			chain: "base".to_string(),
			recipient: "0xabc".to_string(),
		};

		for reference in ["0x1", "0x2"] {
			store
				.put_receipt(PaymentReceipt {
					resource_url: "https://api.example.com/report".to_string(),
					wallet_address: "0xWallet".to_string(),
					settlement_ref: reference.to_string(),
					payment_details: details.clone(),
					settled_at: chrono::Utc::now(),
				})
				.await
				.unwrap();
		}

		assert_eq!(store.receipts_for("0xwallet").await.len(), 2);
		assert!(store.receipts_for("0xother").await.is_empty());
	}
}
