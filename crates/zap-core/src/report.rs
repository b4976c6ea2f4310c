//! Balance and supply reads.
//!
//! Pure observability: the workflow logs balances before and after the run
//! so the operator can verify the effects, but none of these values feed
//! back into control flow.

use crate::contracts::{decode_u256, IERC20};
use crate::error::WorkflowError;
use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;
use std::sync::Arc;
use zap_chain::ChainService;
use zap_types::{TokenDescriptor, Transaction};

/// Reads token balances and supplies for display.
pub struct BalanceReporter {
	chain: Arc<ChainService>,
	chain_id: u64,
}

impl BalanceReporter {
	/// Creates a new BalanceReporter for one chain.
	pub fn new(chain: Arc<ChainService>, chain_id: u64) -> Self {
		Self { chain, chain_id }
	}

	/// Base-unit balance of `holder` for `token`.
	pub async fn balance_of(
		&self,
		token: &TokenDescriptor,
		holder: Address,
	) -> Result<U256, WorkflowError> {
		let data = IERC20::balanceOfCall { account: holder }.abi_encode();
		let ret = self
			.chain
			.call(self.read_tx(token.address, data))
			.await
			.map_err(|e| WorkflowError::Query(format!("balanceOf {}: {e}", token.symbol)))?;
		decode_u256(&ret).map_err(WorkflowError::Query)
	}

	/// Base-unit total supply of `token`.
	pub async fn total_supply(&self, token: &TokenDescriptor) -> Result<U256, WorkflowError> {
		let data = IERC20::totalSupplyCall {}.abi_encode();
		let ret = self
			.chain
			.call(self.read_tx(token.address, data))
			.await
			.map_err(|e| WorkflowError::Query(format!("totalSupply {}: {e}", token.symbol)))?;
		decode_u256(&ret).map_err(WorkflowError::Query)
	}

	fn read_tx(&self, to: Address, data: Vec<u8>) -> Transaction {
		Transaction {
			to: Some(to),
			data,
			value: U256::ZERO,
			chain_id: self.chain_id,
			nonce: None,
			gas_limit: None,
		}
	}
}
