//! In-memory fake ledger for component and scenario tests.
//!
//! Implements [`ChainInterface`] over a mutable in-process state: token
//! balances, allowances, registered pools and lending deposits. Submitted
//! transactions are decoded by selector and applied with ERC-20 semantics
//! (approve overwrites, transfers require allowance and balance), so tests
//! can assert on real base-unit effects rather than on call shapes alone.

use crate::contracts::{IERC20, ILendingPool, ISwapRouter, IUniswapV3Factory, IUniswapV3Pool};
use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use alloy_sol_types::{SolCall, SolEvent};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use zap_chain::{ChainError, ChainInterface, ChainService};
use zap_types::{
	Log, TokenDescriptor, TokenDescriptorBuilder, Transaction, TransactionHash,
	TransactionReceipt,
};

/// The account every fake-ledger transaction is signed by.
const ACCOUNT: Address = Address::new([0xf3u8; 20]);

/// A transaction the fake ledger saw submitted, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
	Approve {
		token: Address,
		spender: Address,
		amount: U256,
	},
	Swap {
		token_in: Address,
		token_out: Address,
		amount_in: U256,
	},
	Deposit {
		asset: Address,
		amount: U256,
		on_behalf_of: Address,
	},
}

#[derive(Default)]
struct LedgerState {
	balances: HashMap<(Address, Address), U256>,
	allowances: HashMap<(Address, Address, Address), U256>,
	total_supplies: HashMap<Address, U256>,
	pools: HashMap<(Address, Address, u32), Address>,
	pool_meta: HashMap<Address, (Address, Address, u32)>,
	deposits: HashMap<(Address, Address), U256>,
	receipts: HashMap<TransactionHash, TransactionReceipt>,
	submissions: Vec<Submission>,
	swap_output: U256,
	fail_approvals: bool,
	fail_swaps: bool,
	fail_deposits: bool,
	next_block: u64,
}

/// Stateful fake chain shared between a [`ChainService`] and the test body.
#[derive(Clone)]
pub struct FakeLedger {
	inner: Arc<Mutex<LedgerState>>,
}

impl FakeLedger {
	pub fn new() -> Self {
		Self {
			inner: Arc::new(Mutex::new(LedgerState::default())),
		}
	}

	/// The signing account behind every submitted transaction.
	pub fn account(&self) -> Address {
		ACCOUNT
	}

	/// A chain service over this ledger, with single-block confirmation.
	pub fn service(&self) -> Arc<ChainService> {
		Arc::new(ChainService::new(Arc::new(self.clone()), 1))
	}

	pub fn set_balance(&self, token: Address, holder: Address, amount: U256) {
		self.inner
			.lock()
			.unwrap()
			.balances
			.insert((token, holder), amount);
	}

	pub fn balance(&self, token: Address, holder: Address) -> U256 {
		self.inner
			.lock()
			.unwrap()
			.balances
			.get(&(token, holder))
			.copied()
			.unwrap_or_default()
	}

	pub fn set_allowance(&self, token: Address, owner: Address, spender: Address, amount: U256) {
		self.inner
			.lock()
			.unwrap()
			.allowances
			.insert((token, owner, spender), amount);
	}

	pub fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
		self.inner
			.lock()
			.unwrap()
			.allowances
			.get(&(token, owner, spender))
			.copied()
			.unwrap_or_default()
	}

	pub fn set_total_supply(&self, token: Address, amount: U256) {
		self.inner
			.lock()
			.unwrap()
			.total_supplies
			.insert(token, amount);
	}

	/// Registers a pool for the pair at the given tier, with matching
	/// metadata. Both argument orders resolve to the same pool.
	pub fn register_pool(
		&self,
		token_a: Address,
		token_b: Address,
		fee: zap_types::FeeTier,
		pool: Address,
	) {
		let mut state = self.inner.lock().unwrap();
		let fee = fee.as_u32();
		state.pools.insert((token_a, token_b, fee), pool);
		state.pools.insert((token_b, token_a, fee), pool);
		state.pool_meta.insert(pool, (token_a, token_b, fee));
	}

	/// Overrides a pool's own metadata, independent of the factory answer.
	pub fn set_pool_metadata(
		&self,
		pool: Address,
		token0: Address,
		token1: Address,
		fee: zap_types::FeeTier,
	) {
		self.inner
			.lock()
			.unwrap()
			.pool_meta
			.insert(pool, (token0, token1, fee.as_u32()));
	}

	/// Fixed amount every successful swap credits to the recipient.
	pub fn set_swap_output(&self, amount: U256) {
		self.inner.lock().unwrap().swap_output = amount;
	}

	pub fn fail_approvals(&self) {
		self.inner.lock().unwrap().fail_approvals = true;
	}

	pub fn fail_swaps(&self) {
		self.inner.lock().unwrap().fail_swaps = true;
	}

	pub fn fail_deposits(&self) {
		self.inner.lock().unwrap().fail_deposits = true;
	}

	/// Total amount deposited into the lending pool for a beneficiary.
	pub fn deposited(&self, asset: Address, on_behalf_of: Address) -> U256 {
		self.inner
			.lock()
			.unwrap()
			.deposits
			.get(&(asset, on_behalf_of))
			.copied()
			.unwrap_or_default()
	}

	/// Every write submitted so far, in order.
	pub fn submissions(&self) -> Vec<Submission> {
		self.inner.lock().unwrap().submissions.clone()
	}
}

#[async_trait]
impl ChainInterface for FakeLedger {
	async fn submit(&self, tx: Transaction) -> Result<TransactionHash, ChainError> {
		let mut state = self.inner.lock().unwrap();
		let to = tx
			.to
			.ok_or_else(|| ChainError::Network("missing recipient".to_string()))?;
		let data = tx.data;
		if data.len() < 4 {
			return Err(ChainError::Network("calldata too short".to_string()));
		}
		let selector: [u8; 4] = [data[0], data[1], data[2], data[3]];

		state.next_block += 1;
		let hash = B256::from(U256::from(state.next_block));
		let block_number = state.next_block;
		let mut logs = Vec::new();
		let mut success = true;

		if selector == IERC20::approveCall::SELECTOR {
			let spender = word_address(&data, 0);
			let amount = word_u256(&data, 1);
			state.submissions.push(Submission::Approve {
				token: to,
				spender,
				amount,
			});
			if state.fail_approvals {
				success = false;
			} else {
				// approve overwrites, never accumulates
				state.allowances.insert((to, ACCOUNT, spender), amount);
			}
		} else if selector == ISwapRouter::exactInputSingleCall::SELECTOR {
			let token_in = word_address(&data, 0);
			let token_out = word_address(&data, 1);
			let recipient = word_address(&data, 3);
			let amount_in = word_u256(&data, 4);
			let amount_out_minimum = word_u256(&data, 5);
			state.submissions.push(Submission::Swap {
				token_in,
				token_out,
				amount_in,
			});

			let allowance = state
				.allowances
				.get(&(token_in, ACCOUNT, to))
				.copied()
				.unwrap_or_default();
			let balance = state
				.balances
				.get(&(token_in, ACCOUNT))
				.copied()
				.unwrap_or_default();
			let output = state.swap_output;

			if state.fail_swaps
				|| allowance < amount_in
				|| balance < amount_in
				|| output < amount_out_minimum
			{
				success = false;
			} else {
				state
					.balances
					.insert((token_in, ACCOUNT), balance - amount_in);
				state
					.allowances
					.insert((token_in, ACCOUNT, to), allowance - amount_in);
				let credited = state
					.balances
					.get(&(token_out, recipient))
					.copied()
					.unwrap_or_default();
				state
					.balances
					.insert((token_out, recipient), credited + output);
				logs.push(transfer_log(token_out, to, recipient, output));
			}
		} else if selector == ILendingPool::depositCall::SELECTOR {
			let asset = word_address(&data, 0);
			let amount = word_u256(&data, 1);
			let on_behalf_of = word_address(&data, 2);
			state.submissions.push(Submission::Deposit {
				asset,
				amount,
				on_behalf_of,
			});

			let allowance = state
				.allowances
				.get(&(asset, ACCOUNT, to))
				.copied()
				.unwrap_or_default();
			let balance = state
				.balances
				.get(&(asset, ACCOUNT))
				.copied()
				.unwrap_or_default();

			if state.fail_deposits || allowance < amount || balance < amount {
				success = false;
			} else {
				state.balances.insert((asset, ACCOUNT), balance - amount);
				state
					.allowances
					.insert((asset, ACCOUNT, to), allowance - amount);
				let pool_balance = state
					.balances
					.get(&(asset, to))
					.copied()
					.unwrap_or_default();
				state.balances.insert((asset, to), pool_balance + amount);
				let total = state
					.deposits
					.get(&(asset, on_behalf_of))
					.copied()
					.unwrap_or_default();
				state
					.deposits
					.insert((asset, on_behalf_of), total + amount);
				logs.push(transfer_log(asset, ACCOUNT, to, amount));
			}
		} else {
			return Err(ChainError::Network(format!(
				"FakeLedger: unknown write selector {:02x?}",
				selector
			)));
		}

		state.receipts.insert(
			hash,
			TransactionReceipt {
				hash,
				block_number,
				success,
				logs,
			},
		);
		Ok(hash)
	}

	async fn wait_for_confirmation(
		&self,
		hash: TransactionHash,
		_confirmations: u64,
	) -> Result<TransactionReceipt, ChainError> {
		self.inner
			.lock()
			.unwrap()
			.receipts
			.get(&hash)
			.cloned()
			.ok_or_else(|| ChainError::Network(format!("Transaction {} not found", hash)))
	}

	async fn call(&self, tx: Transaction) -> Result<Bytes, ChainError> {
		let state = self.inner.lock().unwrap();
		let to = tx
			.to
			.ok_or_else(|| ChainError::Network("missing recipient".to_string()))?;
		let data = tx.data;
		if data.len() < 4 {
			return Err(ChainError::Network("calldata too short".to_string()));
		}
		let selector: [u8; 4] = [data[0], data[1], data[2], data[3]];

		if selector == IUniswapV3Factory::getPoolCall::SELECTOR {
			let token_a = word_address(&data, 0);
			let token_b = word_address(&data, 1);
			let fee = word_u256(&data, 2).to::<u32>();
			let pool = state
				.pools
				.get(&(token_a, token_b, fee))
				.copied()
				.unwrap_or(Address::ZERO);
			Ok(address_word(pool))
		} else if selector == IUniswapV3Pool::token0Call::SELECTOR {
			let (token0, _, _) = pool_meta(&state, to)?;
			Ok(address_word(token0))
		} else if selector == IUniswapV3Pool::token1Call::SELECTOR {
			let (_, token1, _) = pool_meta(&state, to)?;
			Ok(address_word(token1))
		} else if selector == IUniswapV3Pool::feeCall::SELECTOR {
			let (_, _, fee) = pool_meta(&state, to)?;
			Ok(u256_word(U256::from(fee)))
		} else if selector == IERC20::balanceOfCall::SELECTOR {
			let holder = word_address(&data, 0);
			let balance = state
				.balances
				.get(&(to, holder))
				.copied()
				.unwrap_or_default();
			Ok(u256_word(balance))
		} else if selector == IERC20::totalSupplyCall::SELECTOR {
			let supply = state.total_supplies.get(&to).copied().unwrap_or_default();
			Ok(u256_word(supply))
		} else if selector == IERC20::allowanceCall::SELECTOR {
			let owner = word_address(&data, 0);
			let spender = word_address(&data, 1);
			let allowance = state
				.allowances
				.get(&(to, owner, spender))
				.copied()
				.unwrap_or_default();
			Ok(u256_word(allowance))
		} else {
			Err(ChainError::Network(format!(
				"FakeLedger: unknown read selector {:02x?}",
				selector
			)))
		}
	}
}

fn pool_meta(
	state: &LedgerState,
	pool: Address,
) -> Result<(Address, Address, u32), ChainError> {
	state
		.pool_meta
		.get(&pool)
		.copied()
		.ok_or_else(|| ChainError::Network(format!("Unknown pool {}", pool)))
}

fn word(data: &[u8], index: usize) -> &[u8] {
	&data[4 + 32 * index..4 + 32 * (index + 1)]
}

fn word_address(data: &[u8], index: usize) -> Address {
	Address::from_slice(&word(data, index)[12..])
}

fn word_u256(data: &[u8], index: usize) -> U256 {
	U256::from_be_slice(word(data, index))
}

fn address_word(address: Address) -> Bytes {
	let mut out = [0u8; 32];
	out[12..].copy_from_slice(address.as_slice());
	Bytes::from(out.to_vec())
}

fn u256_word(value: U256) -> Bytes {
	Bytes::from(value.to_be_bytes::<32>().to_vec())
}

fn address_topic(address: Address) -> B256 {
	let mut out = [0u8; 32];
	out[12..].copy_from_slice(address.as_slice());
	B256::from(out)
}

/// A standard ERC-20 Transfer log.
pub fn transfer_log(token: Address, from: Address, to: Address, amount: U256) -> Log {
	Log {
		address: token,
		topics: vec![
			IERC20::Transfer::SIGNATURE_HASH,
			address_topic(from),
			address_topic(to),
		],
		data: amount.to_be_bytes::<32>().to_vec(),
	}
}

/// A token descriptor with a deterministic address derived from the symbol.
pub fn test_token(decimals: u8, symbol: &str) -> TokenDescriptor {
	let digest = keccak256(symbol.as_bytes());
	TokenDescriptorBuilder::new()
		.address(Address::from_slice(&digest[..20]))
		.decimals(decimals)
		.symbol(symbol)
		.name(symbol)
		.build()
}
