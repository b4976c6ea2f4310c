//! Swap execution.
//!
//! Builds the exact-input single-hop swap call and submits it, blocking
//! until the chain confirms. With the default zero `amount_out_minimum`
//! there is no protection against adverse price movement between
//! submission and confirmation; callers needing safety must supply a
//! non-zero minimum through the swap policy.

use crate::contracts::{IERC20, ISwapRouter};
use crate::error::WorkflowError;
use alloy_primitives::{Address, Uint, U256};
use alloy_sol_types::{SolCall, SolEvent};
use std::sync::Arc;
use zap_chain::ChainService;
use zap_types::{SwapParams, Transaction, TransactionOutcome, TransactionReceipt};

/// Executes swaps through the router contract.
pub struct SwapExecutor {
	chain: Arc<ChainService>,
	chain_id: u64,
	router: Address,
}

impl SwapExecutor {
	/// Creates a new SwapExecutor against one router.
	pub fn new(chain: Arc<ChainService>, chain_id: u64, router: Address) -> Self {
		Self {
			chain,
			chain_id,
			router,
		}
	}

	/// Address of the router this executor submits to. The input-token
	/// allowance must name this address as the spender.
	pub fn router(&self) -> Address {
		self.router
	}

	/// Submits the swap and blocks until it is confirmed.
	///
	/// Fails with a transaction error on revert (insufficient allowance or
	/// balance, pool illiquidity) or transport failure. Never retries.
	pub async fn execute(
		&self,
		params: &SwapParams,
	) -> Result<TransactionOutcome, WorkflowError> {
		tracing::info!(
			token_in = %params.token_in,
			token_out = %params.token_out,
			amount_in = %params.amount_in,
			fee = %params.fee,
			"Submitting swap"
		);

		let call = ISwapRouter::exactInputSingleCall {
			params: ISwapRouter::ExactInputSingleParams {
				tokenIn: params.token_in,
				tokenOut: params.token_out,
				fee: Uint::<24, 1>::from(params.fee.as_u32()),
				recipient: params.recipient,
				amountIn: params.amount_in,
				amountOutMinimum: params.amount_out_minimum,
				sqrtPriceLimitX96: params.sqrt_price_limit_x96,
			},
		};

		let tx = Transaction {
			to: Some(self.router),
			data: call.abi_encode(),
			value: U256::ZERO,
			chain_id: self.chain_id,
			nonce: None,
			gas_limit: None,
		};

		let outcome = self
			.chain
			.submit_and_confirm(tx)
			.await
			.map_err(|e| WorkflowError::Transaction(format!("swap: {e}")))?;

		if !outcome.is_confirmed() {
			return Err(WorkflowError::Transaction(format!(
				"Swap transaction {} reverted",
				outcome.hash
			)));
		}

		Ok(outcome)
	}
}

/// Amount of `token_out` the swap credited to `recipient`, read from the
/// receipt's Transfer logs.
///
/// Returns None when the receipt carries no matching transfer, which for a
/// confirmed swap means the node returned a pruned or malformed receipt.
pub fn output_from_receipt(
	receipt: &TransactionReceipt,
	token_out: Address,
	recipient: Address,
) -> Option<U256> {
	receipt.logs.iter().find_map(|log| {
		if log.address != token_out || log.topics.len() != 3 {
			return None;
		}
		if log.topics[0] != IERC20::Transfer::SIGNATURE_HASH {
			return None;
		}
		if Address::from_slice(&log.topics[2][12..]) != recipient {
			return None;
		}
		(log.data.len() >= 32).then(|| U256::from_be_slice(&log.data[..32]))
	})
}
