//! Destination-strategy allocation models

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a receiver wants an incoming sub-amount handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
	/// No-op: keep the funds as-is. The default destination.
	Hold,
	/// Deposit into the yield vault
	Yield,
	/// Forward into the restaking strategy
	Restaking,
}

impl StrategyKind {
	pub const DEFAULT: StrategyKind = StrategyKind::Hold;
}

impl fmt::Display for StrategyKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			Self::Hold => "hold",
			Self::Yield => "yield",
			Self::Restaking => "restaking",
		};
		f.write_str(s)
	}
}

impl FromStr for StrategyKind {
	type Err = UnknownStrategy;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_lowercase().as_str() {
			"hold" => Ok(Self::Hold),
			"yield" => Ok(Self::Yield),
			"restaking" => Ok(Self::Restaking),
			other => Err(UnknownStrategy {
				id: other.to_string(),
			}),
		}
	}
}

/// Unrecognized destination identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStrategy {
	pub id: String,
}

impl fmt::Display for UnknownStrategy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "unknown strategy destination: {}", self.id)
	}
}

impl std::error::Error for UnknownStrategy {}

/// One destination's share of an allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationEntry {
	pub destination: StrategyKind,
	/// Whole percent, positive
	pub percentage: u8,
}

/// A receiver-declared weighted split of incoming funds
///
/// Invariant: entries are non-empty and percentages sum to exactly 100.
/// Only the allocator constructs these; callers never enforce the invariant
/// themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyAllocation(Vec<AllocationEntry>);

impl StrategyAllocation {
	/// Construct from entries that already sum to 100
	///
	/// Callers outside the allocator should go through
	/// `StrategyAllocator::parse_allocation` instead.
	pub fn from_normalized(entries: Vec<AllocationEntry>) -> Self {
		debug_assert_eq!(
			entries.iter().map(|e| e.percentage as u32).sum::<u32>(),
			100
		);
		Self(entries)
	}

	/// The default allocation: everything held as-is
	pub fn hold_all() -> Self {
		Self(vec![AllocationEntry {
			destination: StrategyKind::DEFAULT,
			percentage: 100,
		}])
	}

	/// Single-destination allocation at 100%
	pub fn single(destination: StrategyKind) -> Self {
		Self(vec![AllocationEntry {
			destination,
			percentage: 100,
		}])
	}

	pub fn entries(&self) -> &[AllocationEntry] {
		&self.0
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

/// A (destination, sub-amount) pair produced by splitting a payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationSlice {
	pub destination: StrategyKind,
	/// Minor units
	pub amount: u64,
}
