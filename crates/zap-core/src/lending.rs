//! Lending pool deposits.
//!
//! Depositing is a two-transaction sequence: grant the lending pool an
//! allowance covering the amount, wait for that grant to confirm, then
//! submit the deposit itself. The deposit is never composed while the
//! allowance is anything but confirmed.

use crate::allowance::AllowanceManager;
use crate::contracts::ILendingPool;
use crate::error::WorkflowError;
use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;
use std::sync::Arc;
use zap_chain::ChainService;
use zap_types::{TokenDescriptor, Transaction, TransactionOutcome};

// The workflow never participates in a referral program.
const REFERRAL_CODE_NONE: u16 = 0;

/// Deposits tokens into the lending pool on behalf of the account.
pub struct LendingDepositor {
	chain: Arc<ChainService>,
	chain_id: u64,
	lending_pool: Address,
	allowances: AllowanceManager,
}

impl LendingDepositor {
	/// Creates a new LendingDepositor against one lending pool.
	pub fn new(
		chain: Arc<ChainService>,
		chain_id: u64,
		lending_pool: Address,
		allowances: AllowanceManager,
	) -> Self {
		Self {
			chain,
			chain_id,
			lending_pool,
			allowances,
		}
	}

	/// Grants the lending pool an allowance covering `amount`.
	///
	/// A failed grant is an approval failure; the deposit must not be
	/// attempted after one.
	pub async fn approve(
		&self,
		token: &TokenDescriptor,
		amount: U256,
	) -> Result<TransactionOutcome, WorkflowError> {
		self.allowances
			.grant(token, self.lending_pool, amount)
			.await
	}

	/// Submits the deposit for an amount whose allowance grant already
	/// confirmed.
	///
	/// Refuses to submit if `approval` did not reach the confirmed state.
	pub async fn deposit_approved(
		&self,
		token: &TokenDescriptor,
		amount: U256,
		on_behalf_of: Address,
		approval: &TransactionOutcome,
	) -> Result<TransactionOutcome, WorkflowError> {
		if !approval.is_confirmed() {
			return Err(WorkflowError::Approval(format!(
				"Deposit requires a confirmed allowance; approval {} is {:?}",
				approval.hash, approval.status
			)));
		}

		tracing::info!(
			token = %token.symbol,
			amount = %amount,
			lending_pool = %self.lending_pool,
			"Submitting deposit"
		);

		let data = ILendingPool::depositCall {
			asset: token.address,
			amount,
			onBehalfOf: on_behalf_of,
			referralCode: REFERRAL_CODE_NONE,
		}
		.abi_encode();

		let tx = Transaction {
			to: Some(self.lending_pool),
			data,
			value: U256::ZERO,
			chain_id: self.chain_id,
			nonce: None,
			gas_limit: None,
		};

		let outcome = self
			.chain
			.submit_and_confirm(tx)
			.await
			.map_err(|e| WorkflowError::Transaction(format!("deposit: {e}")))?;

		if !outcome.is_confirmed() {
			return Err(WorkflowError::Transaction(format!(
				"Deposit transaction {} reverted",
				outcome.hash
			)));
		}

		Ok(outcome)
	}

	/// The full approve-then-deposit sequence, each step individually
	/// confirmed before the next begins.
	pub async fn deposit(
		&self,
		token: &TokenDescriptor,
		amount: U256,
		on_behalf_of: Address,
	) -> Result<TransactionOutcome, WorkflowError> {
		let approval = self.approve(token, amount).await?;
		self.deposit_approved(token, amount, on_behalf_of, &approval)
			.await
	}
}
