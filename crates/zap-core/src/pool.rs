//! Trading pool resolution.
//!
//! Locates the pool contract for a token pair and fee tier through the
//! factory, then reads the pool's own metadata back and checks it agrees
//! with what was asked for. A zero address from the factory means the
//! pair/fee combination has no deployed market; that is fatal and never
//! retried.

use crate::contracts::{decode_address, decode_u32, IUniswapV3Factory, IUniswapV3Pool};
use crate::error::WorkflowError;
use alloy_primitives::{Address, Uint, U256};
use alloy_sol_types::SolCall;
use std::sync::Arc;
use zap_chain::ChainService;
use zap_types::{FeeTier, PoolInfo, TokenDescriptor, Transaction};

/// Resolves trading pools through the factory contract.
pub struct PoolResolver {
	chain: Arc<ChainService>,
	chain_id: u64,
	factory: Address,
}

impl PoolResolver {
	/// Creates a new PoolResolver against one factory.
	pub fn new(chain: Arc<ChainService>, chain_id: u64, factory: Address) -> Self {
		Self {
			chain,
			chain_id,
			factory,
		}
	}

	/// Resolves the pool for `(token_a, token_b, fee)`.
	///
	/// The three pool metadata reads are independent and issued
	/// concurrently; all must complete before the result is considered
	/// valid.
	pub async fn resolve(
		&self,
		token_a: &TokenDescriptor,
		token_b: &TokenDescriptor,
		fee: FeeTier,
	) -> Result<PoolInfo, WorkflowError> {
		let data = IUniswapV3Factory::getPoolCall {
			tokenA: token_a.address,
			tokenB: token_b.address,
			fee: Uint::<24, 1>::from(fee.as_u32()),
		}
		.abi_encode();

		let ret = self
			.chain
			.call(self.read_tx(self.factory, data))
			.await
			.map_err(|e| WorkflowError::Query(format!("factory getPool: {e}")))?;
		let pool = decode_address(&ret).map_err(WorkflowError::Query)?;

		if pool == Address::ZERO {
			return Err(WorkflowError::PoolNotFound {
				token_a: token_a.address,
				token_b: token_b.address,
				fee,
			});
		}

		let (token0, token1, pool_fee) = tokio::try_join!(
			self.read_token0(pool),
			self.read_token1(pool),
			self.read_fee(pool),
		)?;

		let pool_fee = FeeTier::try_from(pool_fee).map_err(WorkflowError::Query)?;
		let info = PoolInfo {
			address: pool,
			token0,
			token1,
			fee: pool_fee,
		};

		if pool_fee != fee || !info.covers(token_a.address, token_b.address) {
			return Err(WorkflowError::Query(format!(
				"Pool {} metadata does not match the requested pair/fee",
				pool
			)));
		}

		tracing::info!(
			pool = %pool,
			token0 = %token0,
			token1 = %token1,
			fee = %pool_fee,
			"Resolved pool"
		);
		Ok(info)
	}

	async fn read_token0(&self, pool: Address) -> Result<Address, WorkflowError> {
		let ret = self
			.chain
			.call(self.read_tx(pool, IUniswapV3Pool::token0Call {}.abi_encode()))
			.await
			.map_err(|e| WorkflowError::Query(format!("pool token0: {e}")))?;
		decode_address(&ret).map_err(WorkflowError::Query)
	}

	async fn read_token1(&self, pool: Address) -> Result<Address, WorkflowError> {
		let ret = self
			.chain
			.call(self.read_tx(pool, IUniswapV3Pool::token1Call {}.abi_encode()))
			.await
			.map_err(|e| WorkflowError::Query(format!("pool token1: {e}")))?;
		decode_address(&ret).map_err(WorkflowError::Query)
	}

	async fn read_fee(&self, pool: Address) -> Result<u32, WorkflowError> {
		let ret = self
			.chain
			.call(self.read_tx(pool, IUniswapV3Pool::feeCall {}.abi_encode()))
			.await
			.map_err(|e| WorkflowError::Query(format!("pool fee: {e}")))?;
		decode_u32(&ret).map_err(WorkflowError::Query)
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
