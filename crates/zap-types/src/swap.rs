//! Swap call parameters.

use crate::pool::FeeTier;
use alloy_primitives::{aliases::U160, Address, U256};

/// Parameters for a single-hop exact-input swap.
///
/// `amount_out_minimum` and `sqrt_price_limit_x96` both default to zero in
/// the base workflow, which disables slippage and price-limit protection.
/// That is a deliberate policy carried over from the source behavior, not an
/// oversight; callers needing safety must supply non-zero bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapParams {
	/// Token being sold.
	pub token_in: Address,
	/// Token being bought.
	pub token_out: Address,
	/// Fee tier of the pool to trade through.
	pub fee: FeeTier,
	/// Account credited with the swap output.
	pub recipient: Address,
	/// Exact input amount, in base units of `token_in`.
	pub amount_in: U256,
	/// Minimum acceptable output, in base units of `token_out`. Zero
	/// disables the check.
	pub amount_out_minimum: U256,
	/// Q64.96 price limit for the swap. Zero disables the limit.
	pub sqrt_price_limit_x96: U160,
}
