//! Stablepay Storage
//!
//! In-memory implementations of the storage traits.

pub mod memory_store;

pub use memory_store::MemoryStore;
pub use stablepay_types::storage::{
	Participant, ParticipantStore, PreferenceStore, ReceiptStore, StorageError, StorageResult,
};
