//! Token allowance management.
//!
//! Every fund movement in the workflow is gated behind a confirmed
//! spending-allowance grant. [`AllowanceManager::grant`] submits the
//! approval and blocks until the chain confirms it; callers only proceed
//! once that has happened.
//!
//! ERC-20 approvals overwrite: a second grant replaces the previous
//! allowance rather than adding to it, so repeated grants of the same
//! amount are idempotent and a smaller grant narrows the spender's limit.

use crate::contracts::{decode_u256, IERC20};
use crate::error::WorkflowError;
use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;
use std::sync::Arc;
use zap_chain::ChainService;
use zap_types::{TokenDescriptor, Transaction, TransactionOutcome};

// Approvals are cheap and fixed-shape; no need to estimate.
const APPROVE_GAS_LIMIT: u64 = 100_000;

/// Grants spenders permission to move the account's tokens.
pub struct AllowanceManager {
	chain: Arc<ChainService>,
	chain_id: u64,
}

impl AllowanceManager {
	/// Creates a new AllowanceManager for one chain.
	pub fn new(chain: Arc<ChainService>, chain_id: u64) -> Self {
		Self { chain, chain_id }
	}

	/// Approves `spender` to move up to `amount` base units of `token`,
	/// blocking until the approval transaction is confirmed.
	///
	/// The grant overwrites any previous allowance for that spender.
	pub async fn grant(
		&self,
		token: &TokenDescriptor,
		spender: Address,
		amount: U256,
	) -> Result<TransactionOutcome, WorkflowError> {
		tracing::info!(
			token = %token.symbol,
			spender = %spender,
			amount = %amount,
			"Submitting approval"
		);

		let data = IERC20::approveCall { spender, amount }.abi_encode();
		let tx = Transaction {
			to: Some(token.address),
			data,
			value: U256::ZERO,
			chain_id: self.chain_id,
			nonce: None,
			gas_limit: Some(APPROVE_GAS_LIMIT),
		};

		let outcome = self
			.chain
			.submit_and_confirm(tx)
			.await
			.map_err(|e| WorkflowError::Approval(e.to_string()))?;

		if !outcome.is_confirmed() {
			return Err(WorkflowError::Approval(format!(
				"Approval transaction {} reverted",
				outcome.hash
			)));
		}

		tracing::info!(token = %token.symbol, spender = %spender, "Approval confirmed");
		Ok(outcome)
	}

	/// Reads the current allowance for an owner-spender pair.
	///
	/// Exposed for operators and tests; the workflow never consults it to
	/// skip a grant — every run approves afresh.
	pub async fn allowance(
		&self,
		token: &TokenDescriptor,
		owner: Address,
		spender: Address,
	) -> Result<U256, WorkflowError> {
		let data = IERC20::allowanceCall { owner, spender }.abi_encode();
		let tx = Transaction {
			to: Some(token.address),
			data,
			value: U256::ZERO,
			chain_id: self.chain_id,
			nonce: None,
			gas_limit: None,
		};

		let ret = self
			.chain
			.call(tx)
			.await
			.map_err(|e| WorkflowError::Query(format!("allowance: {e}")))?;
		decode_u256(&ret).map_err(WorkflowError::Query)
	}
}
