//! Strategy allocator: parse receiver allocation records and split amounts
//!
//! Allocation inputs come from untrusted text records, so parsing never
//! errors: malformed entries are dropped and the survivors renormalized,
//! with a hold-everything default when nothing survives.

use std::sync::Arc;

use tracing::{debug, warn};

use stablepay_types::storage::PreferenceStore;
use stablepay_types::{AllocationEntry, AllocationSlice, StrategyAllocation, StrategyKind};

/// Partitions inbound amounts across a receiver's declared destinations
pub struct StrategyAllocator {
	preferences: Arc<dyn PreferenceStore>,
}

impl StrategyAllocator {
	pub fn new(preferences: Arc<dyn PreferenceStore>) -> Self {
		Self { preferences }
	}

	/// Resolve the receiver's allocation from the preference store
	pub async fn allocation_for(
		&self,
		receiver: &str,
		fallback: Option<&str>,
	) -> StrategyAllocation {
		let record = self.preferences.get_allocation(receiver).await;
		Self::parse_allocation(record.as_deref(), fallback)
	}

	/// Parse a multi-destination allocation record
	///
	/// Splits `"destA:60,destB:40"` on commas, drops entries with
	/// unrecognized destinations or non-positive weights, and renormalizes
	/// the survivors to sum exactly 100 by the largest-remainder method
	/// (earlier declaration order wins remainder ties). Duplicate
	/// destinations merge by summing their weights.
	///
	/// With no usable record, the single-destination `fallback` applies if
	/// recognized; the final default is everything to `hold`.
	pub fn parse_allocation(record: Option<&str>, fallback: Option<&str>) -> StrategyAllocation {
		if let Some(record) = record {
			let mut survivors: Vec<(StrategyKind, u64)> = Vec::new();

			for part in record.split(',') {
				let part = part.trim();
				if part.is_empty() {
					continue;
				}

				let Some((id, weight)) = part.split_once(':') else {
					debug!("Dropping malformed allocation entry '{}'", part);
					continue;
				};

				let Ok(destination) = id.parse::<StrategyKind>() else {
					debug!("Dropping unrecognized allocation destination '{}'", id);
					continue;
				};

				let weight = weight.trim().parse::<i64>().unwrap_or(0);
				if weight <= 0 {
					debug!("Dropping non-positive allocation weight '{}'", part);
					continue;
				}

				match survivors.iter_mut().find(|(d, _)| *d == destination) {
					Some((_, existing)) => *existing = existing.saturating_add(weight as u64),
					None => survivors.push((destination, weight as u64)),
				}
			}

			if !survivors.is_empty() {
				return Self::renormalize(survivors);
			}
			warn!("Allocation record '{}' had no usable entries", record);
		}

		if let Some(fallback) = fallback {
			if let Ok(destination) = fallback.parse::<StrategyKind>() {
				return StrategyAllocation::single(destination);
			}
			debug!("Unrecognized fallback destination '{}'", fallback);
		}

		StrategyAllocation::hold_all()
	}

	/// Largest-remainder renormalization to exactly 100 percent
	///
	/// Weights come from untrusted records, so the scaling is widened
	/// through u128 like `split_amount`; a pathological weight never
	/// panics, it just dominates the split.
	fn renormalize(survivors: Vec<(StrategyKind, u64)>) -> StrategyAllocation {
		let total: u128 = survivors.iter().map(|(_, w)| *w as u128).sum();

		let mut shares: Vec<(usize, StrategyKind, u64, u128)> = survivors
			.iter()
			.enumerate()
			.map(|(index, (destination, weight))| {
				let scaled = *weight as u128 * 100;
				(index, *destination, (scaled / total) as u64, scaled % total)
			})
			.collect();

		let assigned: u64 = shares.iter().map(|(_, _, base, _)| base).sum();
		let mut deficit = 100 - assigned;

		// Hand the leftover percents to the largest remainders; declaration
		// order breaks ties.
		shares.sort_by(|a, b| b.3.cmp(&a.3).then(a.0.cmp(&b.0)));
		for share in shares.iter_mut() {
			if deficit == 0 {
				break;
			}
			share.2 += 1;
			deficit -= 1;
		}

		shares.sort_by_key(|(index, _, _, _)| *index);

		let entries: Vec<AllocationEntry> = shares
			.into_iter()
			.filter(|(_, _, percentage, _)| *percentage > 0)
			.map(|(_, destination, percentage, _)| AllocationEntry {
				destination,
				percentage: percentage as u8,
			})
			.collect();

		if entries.is_empty() {
			return StrategyAllocation::hold_all();
		}

		StrategyAllocation::from_normalized(entries)
	}

	/// Split an amount proportionally across the allocation
	///
	/// Floor-divides each share; the rounding remainder goes to the first
	/// allocation in declaration order, so the slice sum always reproduces
	/// the total exactly.
	pub fn split_amount(total: u64, allocation: &StrategyAllocation) -> Vec<AllocationSlice> {
		let mut slices: Vec<AllocationSlice> = allocation
			.entries()
			.iter()
			.map(|entry| AllocationSlice {
				destination: entry.destination,
				amount: (total as u128 * entry.percentage as u128 / 100) as u64,
			})
			.collect();

		let assigned: u64 = slices.iter().map(|s| s.amount).sum();
		if let Some(first) = slices.first_mut() {
			first.amount += total - assigned;
		}

		slices
	}
}
