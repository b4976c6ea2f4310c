//! Pool metadata and fee tiers.
//!
//! [`FeeTier`] is the closed enumeration of fee levels a Uniswap-V3-style
//! factory deploys pools at. [`PoolInfo`] is the resolved description of one
//! concrete pool; it is read back from the chain on every run and never
//! cached across invocations.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Fee tiers deployed by the pool factory, in hundredths of a basis point.
///
/// The numeric values follow the factory's `uint24 fee` encoding, so
/// `Medium` is a 0.30% pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum FeeTier {
	/// 0.01%
	Lowest,
	/// 0.05%
	Low,
	/// 0.30%
	Medium,
	/// 1.00%
	High,
}

impl FeeTier {
	/// Raw `uint24` value as the factory encodes it.
	pub fn as_u32(self) -> u32 {
		match self {
			FeeTier::Lowest => 100,
			FeeTier::Low => 500,
			FeeTier::Medium => 3000,
			FeeTier::High => 10000,
		}
	}
}

impl Default for FeeTier {
	fn default() -> Self {
		FeeTier::Medium
	}
}

impl TryFrom<u32> for FeeTier {
	type Error = String;

	fn try_from(value: u32) -> Result<Self, Self::Error> {
		match value {
			100 => Ok(FeeTier::Lowest),
			500 => Ok(FeeTier::Low),
			3000 => Ok(FeeTier::Medium),
			10000 => Ok(FeeTier::High),
			other => Err(format!(
				"Unknown fee tier {} (expected 100, 500, 3000 or 10000)",
				other
			)),
		}
	}
}

impl From<FeeTier> for u32 {
	fn from(tier: FeeTier) -> Self {
		tier.as_u32()
	}
}

impl std::fmt::Display for FeeTier {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_u32())
	}
}

/// Resolved description of a single trading pool.
///
/// Produced by the pool resolver after the factory lookup and the pool's own
/// metadata reads have all completed and agreed with each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolInfo {
	/// Pool contract address returned by the factory.
	pub address: Address,
	/// First token of the pair, in the pool's canonical ordering.
	pub token0: Address,
	/// Second token of the pair, in the pool's canonical ordering.
	pub token1: Address,
	/// Fee tier the pool was deployed at.
	pub fee: FeeTier,
}

impl PoolInfo {
	/// Whether the pool's canonical pair covers the given two tokens,
	/// in either order.
	pub fn covers(&self, token_a: Address, token_b: Address) -> bool {
		(self.token0 == token_a && self.token1 == token_b)
			|| (self.token0 == token_b && self.token1 == token_a)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::address;

	#[test]
	fn fee_tier_round_trips_through_u32() {
		for tier in [FeeTier::Lowest, FeeTier::Low, FeeTier::Medium, FeeTier::High] {
			assert_eq!(FeeTier::try_from(tier.as_u32()).unwrap(), tier);
		}
	}

	#[test]
	fn fee_tier_rejects_unknown_values() {
		assert!(FeeTier::try_from(0).is_err());
		assert!(FeeTier::try_from(2999).is_err());
	}

	#[test]
	fn fee_tier_deserializes_from_number() {
		let tier: FeeTier = serde_json::from_str("3000").unwrap();
		assert_eq!(tier, FeeTier::Medium);
		assert!(serde_json::from_str::<FeeTier>("1234").is_err());
	}

	#[test]
	fn covers_is_order_insensitive() {
		let a = address!("0000000000000000000000000000000000000001");
		let b = address!("0000000000000000000000000000000000000002");
		let pool = PoolInfo {
			address: address!("00000000000000000000000000000000000000aa"),
			token0: a,
			token1: b,
			fee: FeeTier::Medium,
		};
		assert!(pool.covers(a, b));
		assert!(pool.covers(b, a));
		assert!(!pool.covers(a, a));
	}
}
