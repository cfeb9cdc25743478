//! Fee tier and fee computation models
//!
//! Amounts and volumes are `u64` minor units of the settlement currency
//! (USDC, 6 decimals). All rate math is integer basis points; rounding mode
//! is floor.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A volume-based fee bracket
///
/// A schedule is an ordered list of tiers that partition `[0, ∞)`:
/// contiguous, non-overlapping, with the top tier open-ended
/// (`max_volume = None`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeTier {
	pub name: String,
	/// Inclusive lower bound of the monthly-volume interval
	pub min_volume: u64,
	/// Exclusive upper bound; `None` for the top tier
	pub max_volume: Option<u64>,
	pub fee_rate_bps: u32,
}

impl FeeTier {
	pub fn new(
		name: impl Into<String>,
		min_volume: u64,
		max_volume: Option<u64>,
		fee_rate_bps: u32,
	) -> Self {
		Self {
			name: name.into(),
			min_volume,
			max_volume,
			fee_rate_bps,
		}
	}

	/// Whether `monthly_volume` falls inside this tier's `[min, max)` interval
	pub fn contains(&self, monthly_volume: u64) -> bool {
		monthly_volume >= self.min_volume
			&& self.max_volume.map_or(true, |max| monthly_volume < max)
	}

	/// Built-in schedule, volumes in whole USDC
	pub fn default_schedule() -> Vec<FeeTier> {
		vec![
			FeeTier::new("standard", 0, Some(10_000), 50),
			FeeTier::new("growth", 10_000, Some(100_000), 30),
			FeeTier::new("scale", 100_000, Some(1_000_000), 20),
			FeeTier::new("enterprise", 1_000_000, None, 10),
		]
	}
}

/// Why the effective fee rate diverged from the nominal tier rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiscountReason {
	/// Receiver pre-funded a gas allowance; fee forced to zero
	GasAllowance,
	/// Both counterparties are registered participants; fee forced to zero
	BothRegistered,
	/// Only the sender is registered; tier rate halved
	SenderRegistered,
}

/// The fee owed on a settled payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeBreakdown {
	/// Effective rate after discounts, in basis points
	pub fee_rate_bps: u32,
	/// Fee in minor units, floored
	pub fee_amount: u64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub discount_reason: Option<DiscountReason>,
}

/// Protocol/receiver split of realized yield
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YieldSplit {
	pub protocol_share: u64,
	pub receiver_share: u64,
}

/// Progress toward the next volume tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierProgress {
	pub current_tier: FeeTier,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub next_tier: Option<FeeTier>,
	/// Volume still needed to enter the next tier; 0 at the top tier
	pub volume_remaining: u64,
	/// Clamped to [0, 100]
	pub percent_complete: u8,
}

/// Fee schedule construction errors
#[derive(Error, Debug)]
pub enum FeeError {
	#[error("Empty fee schedule")]
	EmptySchedule,

	#[error("Fee schedule has a gap or overlap at volume {volume}")]
	DiscontinuousSchedule { volume: u64 },

	#[error("Fee schedule must start at volume 0, starts at {min_volume}")]
	UnanchoredSchedule { min_volume: u64 },

	#[error("Fee schedule top tier must be open-ended")]
	BoundedTopTier,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_tier_contains_half_open_interval() {
		let tier = FeeTier::new("growth", 10_000, Some(100_000), 30);

		assert!(!tier.contains(9_999));
		assert!(tier.contains(10_000));
		assert!(tier.contains(99_999));
		assert!(!tier.contains(100_000));
	}

	#[test]
	fn test_top_tier_is_open_ended() {
		let tier = FeeTier::new("enterprise", 1_000_000, None, 10);
		assert!(tier.contains(u64::MAX));
	}

	#[test]
	fn test_default_schedule_partitions_volume_space() {
		let schedule = FeeTier::default_schedule();

		// Every volume maps to exactly one tier, rates non-increasing.
		for volume in [0u64, 1, 9_999, 10_000, 99_999, 100_000, 1_000_000, u64::MAX] {
			let matching: Vec<_> = schedule.iter().filter(|t| t.contains(volume)).collect();
			assert_eq!(matching.len(), 1, "volume {} not uniquely tiered", volume);
		}

		for pair in schedule.windows(2) {
			assert_eq!(pair[0].max_volume, Some(pair[1].min_volume));
			assert!(pair[0].fee_rate_bps >= pair[1].fee_rate_bps);
		}
	}
}
