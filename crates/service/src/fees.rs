//! Fee engine: tiered transaction fees, network-effect discounts and the
//! yield revenue share
//!
//! Fee quotes are advisory and recomputed per request, so input problems
//! degrade to documented defaults instead of erroring: a broken schedule
//! falls back to the built-in one, and unknown participants simply get no
//! discount.

use std::sync::Arc;

use tracing::{debug, warn};

use stablepay_types::storage::ParticipantStore;
use stablepay_types::{DiscountReason, FeeBreakdown, FeeError, FeeTier, TierProgress, YieldSplit};

/// Default protocol share of realized yield, in basis points
const DEFAULT_YIELD_PROTOCOL_BPS: u32 = 1_000;

/// Computes the fee owed on a settled payment
pub struct FeeEngine {
	/// Ascending by `min_volume`; validated at construction
	tiers: Vec<FeeTier>,
	participants: Arc<dyn ParticipantStore>,
	yield_protocol_bps: u32,
}

impl FeeEngine {
	/// Create an engine over a custom tier schedule
	///
	/// A degenerate schedule (empty, gapped, overlapping, unanchored or with
	/// a bounded top tier) degrades to the built-in default with a warning
	/// rather than failing: fee computation must never block an otherwise
	/// valid payment.
	pub fn new(tiers: Vec<FeeTier>, participants: Arc<dyn ParticipantStore>) -> Self {
		let tiers = match Self::validate_schedule(&tiers) {
			Ok(()) => tiers,
			Err(e) => {
				warn!("Invalid fee schedule ({}), using default schedule", e);
				FeeTier::default_schedule()
			},
		};

		Self {
			tiers,
			participants,
			yield_protocol_bps: DEFAULT_YIELD_PROTOCOL_BPS,
		}
	}

	/// Engine with the built-in tier schedule
	pub fn with_default_schedule(participants: Arc<dyn ParticipantStore>) -> Self {
		Self::new(FeeTier::default_schedule(), participants)
	}

	/// Override the protocol share of realized yield
	///
	/// Clamped to 10_000 bps so the receiver share can never go negative.
	pub fn with_yield_protocol_bps(mut self, yield_protocol_bps: u32) -> Self {
		self.yield_protocol_bps = yield_protocol_bps.min(10_000);
		self
	}

	fn validate_schedule(tiers: &[FeeTier]) -> Result<(), FeeError> {
		let Some(first) = tiers.first() else {
			return Err(FeeError::EmptySchedule);
		};
		if first.min_volume != 0 {
			return Err(FeeError::UnanchoredSchedule {
				min_volume: first.min_volume,
			});
		}

		for pair in tiers.windows(2) {
			if pair[0].max_volume != Some(pair[1].min_volume) {
				return Err(FeeError::DiscontinuousSchedule {
					volume: pair[1].min_volume,
				});
			}
		}

		if tiers.last().and_then(|tier| tier.max_volume).is_some() {
			return Err(FeeError::BoundedTopTier);
		}

		Ok(())
	}

	/// Tier whose `[min, max)` interval contains the volume
	///
	/// Checked from the highest threshold down; the lowest tier is the
	/// default for anything below every threshold.
	pub fn classify_tier(&self, monthly_volume: u64) -> &FeeTier {
		self.tiers
			.iter()
			.rev()
			.find(|tier| tier.contains(monthly_volume))
			.unwrap_or(&self.tiers[0])
	}

	/// Compute the fee on a settled payment
	///
	/// Rule order: the pre-funded gas allowance forces a zero rate before
	/// anything else; otherwise the tier rate applies, discounted by the
	/// network effect (both counterparties registered: free; sender only:
	/// half rate, floored). `fee_amount` floors to minor units via u128.
	pub async fn compute_fee(
		&self,
		amount: u64,
		monthly_volume: u64,
		sender_id: &str,
		receiver_id: &str,
		has_funded_gas_allowance: bool,
	) -> FeeBreakdown {
		let gas_allowance = has_funded_gas_allowance
			|| self
				.participants
				.get(receiver_id)
				.await
				.map(|p| p.has_gas_allowance)
				.unwrap_or(false);

		if gas_allowance {
			debug!("Gas allowance funded by {}, waiving fee", receiver_id);
			return FeeBreakdown {
				fee_rate_bps: 0,
				fee_amount: 0,
				discount_reason: Some(DiscountReason::GasAllowance),
			};
		}

		let tier = self.classify_tier(monthly_volume);
		let sender_registered = self.participants.contains(sender_id).await;
		let receiver_registered = self.participants.contains(receiver_id).await;

		let (rate_bps, discount_reason) = if sender_registered && receiver_registered {
			(0, Some(DiscountReason::BothRegistered))
		} else if sender_registered {
			(tier.fee_rate_bps / 2, Some(DiscountReason::SenderRegistered))
		} else {
			(tier.fee_rate_bps, None)
		};

		FeeBreakdown {
			fee_rate_bps: rate_bps,
			fee_amount: fee_amount(amount, rate_bps),
			discount_reason,
		}
	}

	/// Split realized yield between protocol and receiver
	///
	/// Applies to yield accrued on deposited principal only, never the
	/// principal itself; independent of the transaction fee tier. The floor
	/// remainder of the protocol share stays with the receiver.
	pub fn compute_yield_share(&self, yield_earned: u64) -> YieldSplit {
		let protocol_share = fee_amount(yield_earned, self.yield_protocol_bps);
		YieldSplit {
			protocol_share,
			receiver_share: yield_earned - protocol_share,
		}
	}

	/// Progress toward the next volume tier
	///
	/// Monotone in `monthly_volume`; `percent_complete` is clamped to
	/// `[0, 100]` and is 100 at the open-ended top tier.
	pub fn next_tier_progress(&self, monthly_volume: u64) -> TierProgress {
		let current = self.classify_tier(monthly_volume).clone();

		let Some(max_volume) = current.max_volume else {
			return TierProgress {
				current_tier: current,
				next_tier: None,
				volume_remaining: 0,
				percent_complete: 100,
			};
		};

		let next = self
			.tiers
			.iter()
			.find(|tier| tier.min_volume == max_volume)
			.cloned();

		let span = max_volume - current.min_volume;
		let progressed = monthly_volume.saturating_sub(current.min_volume);
		let percent = ((progressed as u128 * 100) / span as u128).min(100) as u8;

		TierProgress {
			current_tier: current,
			next_tier: next,
			volume_remaining: max_volume.saturating_sub(monthly_volume),
			percent_complete: percent,
		}
	}
}

/// `amount * bps / 10_000`, floored, widened through u128
fn fee_amount(amount: u64, rate_bps: u32) -> u64 {
	(amount as u128 * rate_bps as u128 / 10_000) as u64
}

#[cfg(test)]
mod tests {
	use super::*;
	use stablepay_storage::MemoryStore;
	use stablepay_types::storage::Participant;

	const USDC: u64 = 1_000_000;

	async fn engine_with(participants: &[(&str, bool)]) -> FeeEngine {
		let store = MemoryStore::new();
		for (id, gas) in participants {
			let mut p = Participant::new(*id);
			if *gas {
				p = p.with_gas_allowance();
			}
			store.add(p).await.unwrap();
		}
		FeeEngine::with_default_schedule(Arc::new(store))
	}

	#[tokio::test]
	async fn test_tier_rates_are_monotone_non_increasing() {
		let engine = engine_with(&[]).await;

		let mut last_rate = u32::MAX;
		for volume in [0u64, 5_000, 10_000, 50_000, 100_000, 500_000, 1_000_000, u64::MAX] {
			let rate = engine.classify_tier(volume).fee_rate_bps;
			assert!(rate <= last_rate, "rate increased at volume {}", volume);
			last_rate = rate;
		}
	}

	#[tokio::test]
	async fn test_classify_tier_lowest_is_default() {
		let engine = engine_with(&[]).await;
		assert_eq!(engine.classify_tier(0).name, "standard");
		assert_eq!(engine.classify_tier(9_999).name, "standard");
		assert_eq!(engine.classify_tier(10_000).name, "growth");
	}

	#[tokio::test]
	async fn test_degenerate_schedule_degrades_to_default() {
		let store: Arc<dyn ParticipantStore> = Arc::new(MemoryStore::new());
		let engine = FeeEngine::new(vec![], Arc::clone(&store));
		assert_eq!(engine.classify_tier(0).name, "standard");

		// Gapped schedule also falls back
		let gapped = vec![
			FeeTier::new("a", 0, Some(100), 50),
			FeeTier::new("b", 200, None, 10),
		];
		let engine = FeeEngine::new(gapped, store);
		assert_eq!(engine.classify_tier(150).name, "standard");
	}

	#[tokio::test]
	async fn test_unregistered_pair_pays_full_tier_rate() {
		let engine = engine_with(&[]).await;

		let fee = engine
			.compute_fee(100 * USDC, 0, "sender.eth", "receiver.eth", false)
			.await;
		assert_eq!(fee.fee_rate_bps, 50);
		assert_eq!(fee.fee_amount, 500_000); // 0.50 USDC
		assert_eq!(fee.discount_reason, None);
	}

	#[tokio::test]
	async fn test_both_registered_pay_nothing() {
		let engine = engine_with(&[("sender.eth", false), ("receiver.eth", false)]).await;

		for amount in [1, 100 * USDC, 1_000_000 * USDC] {
			let fee = engine
				.compute_fee(amount, 0, "sender.eth", "receiver.eth", false)
				.await;
			assert_eq!(fee.fee_rate_bps, 0);
			assert_eq!(fee.fee_amount, 0);
			assert_eq!(fee.discount_reason, Some(DiscountReason::BothRegistered));
		}
	}

	#[tokio::test]
	async fn test_sender_only_pays_half_tier_rate() {
		let engine = engine_with(&[("sender.eth", false)]).await;

		let fee = engine
			.compute_fee(100 * USDC, 0, "sender.eth", "receiver.eth", false)
			.await;
		assert_eq!(fee.fee_rate_bps, 25);
		assert_eq!(fee.fee_amount, 250_000);
		assert_eq!(fee.discount_reason, Some(DiscountReason::SenderRegistered));
	}

	#[tokio::test]
	async fn test_receiver_only_gets_no_discount() {
		let engine = engine_with(&[("receiver.eth", false)]).await;

		let fee = engine
			.compute_fee(100 * USDC, 0, "sender.eth", "receiver.eth", false)
			.await;
		assert_eq!(fee.fee_rate_bps, 50);
		assert_eq!(fee.discount_reason, None);
	}

	#[tokio::test]
	async fn test_gas_allowance_overrides_everything() {
		// Unregistered counterparties, lowest tier, explicit flag
		let engine = engine_with(&[]).await;
		let fee = engine
			.compute_fee(100 * USDC, 0, "sender.eth", "receiver.eth", true)
			.await;
		assert_eq!(fee.fee_rate_bps, 0);
		assert_eq!(fee.fee_amount, 0);
		assert_eq!(fee.discount_reason, Some(DiscountReason::GasAllowance));

		// Stored allowance on the receiver works without the flag
		let engine = engine_with(&[("receiver.eth", true)]).await;
		let fee = engine
			.compute_fee(100 * USDC, 0, "sender.eth", "receiver.eth", false)
			.await;
		assert_eq!(fee.discount_reason, Some(DiscountReason::GasAllowance));
	}

	#[tokio::test]
	async fn test_fee_never_exceeds_nominal_tier_rate() {
		let engine = engine_with(&[("sender.eth", false)]).await;

		for volume in [0u64, 10_000, 100_000, 1_000_000] {
			let nominal = engine.classify_tier(volume).fee_rate_bps;
			let fee = engine
				.compute_fee(100 * USDC, volume, "sender.eth", "receiver.eth", false)
				.await;
			assert!(fee.fee_rate_bps <= nominal);
		}
	}

	#[tokio::test]
	async fn test_yield_share_is_flat_ninety_ten() {
		let engine = engine_with(&[]).await;

		let split = engine.compute_yield_share(100 * USDC);
		assert_eq!(split.protocol_share, 10 * USDC);
		assert_eq!(split.receiver_share, 90 * USDC);

		// Floor remainder stays with the receiver
		let split = engine.compute_yield_share(19);
		assert_eq!(split.protocol_share, 1);
		assert_eq!(split.receiver_share, 18);

		let split = engine.compute_yield_share(0);
		assert_eq!(split.protocol_share, 0);
		assert_eq!(split.receiver_share, 0);
	}

	#[tokio::test]
	async fn test_yield_share_is_configurable_and_clamped() {
		let engine = engine_with(&[]).await.with_yield_protocol_bps(2_000);

		let split = engine.compute_yield_share(100 * USDC);
		assert_eq!(split.protocol_share, 20 * USDC);
		assert_eq!(split.receiver_share, 80 * USDC);

		// Above 100% the share clamps instead of underflowing the receiver
		let engine = engine_with(&[]).await.with_yield_protocol_bps(20_000);
		let split = engine.compute_yield_share(100 * USDC);
		assert_eq!(split.protocol_share, 100 * USDC);
		assert_eq!(split.receiver_share, 0);
	}

	#[tokio::test]
	async fn test_tier_progress_is_zero_at_fresh_boundary() {
		let engine = engine_with(&[]).await;

		let progress = engine.next_tier_progress(10_000);
		assert_eq!(progress.current_tier.name, "growth");
		assert_eq!(progress.percent_complete, 0);
		assert_eq!(progress.volume_remaining, 90_000);
		assert_eq!(progress.next_tier.as_ref().unwrap().name, "scale");
	}

	#[tokio::test]
	async fn test_tier_progress_is_monotone_and_clamped() {
		let engine = engine_with(&[]).await;

		let mut last = (0u8, "standard".to_string());
		for volume in [0u64, 2_500, 5_000, 9_999] {
			let progress = engine.next_tier_progress(volume);
			assert_eq!(progress.current_tier.name, last.1);
			assert!(progress.percent_complete >= last.0);
			assert!(progress.percent_complete <= 100);
			last = (progress.percent_complete, progress.current_tier.name);
		}
	}

	#[tokio::test]
	async fn test_top_tier_has_no_next() {
		let engine = engine_with(&[]).await;

		let progress = engine.next_tier_progress(5_000_000);
		assert_eq!(progress.current_tier.name, "enterprise");
		assert!(progress.next_tier.is_none());
		assert_eq!(progress.volume_remaining, 0);
		assert_eq!(progress.percent_complete, 100);
	}
}
