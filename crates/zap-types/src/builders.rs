//! Fluent builders for constructing domain values.
//!
//! Mostly exercised by tests, where hand-writing every `Transaction` field
//! gets noisy.

use crate::token::TokenDescriptor;
use crate::transaction::Transaction;
use alloy_primitives::{Address, U256};

/// Builder for [`Transaction`] values.
#[derive(Debug, Clone, Default)]
pub struct TransactionBuilder {
	to: Option<Address>,
	data: Vec<u8>,
	value: U256,
	chain_id: Option<u64>,
	nonce: Option<u64>,
	gas_limit: Option<u64>,
}

impl TransactionBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the recipient address.
	pub fn to(mut self, to: Address) -> Self {
		self.to = Some(to);
		self
	}

	/// Sets the calldata.
	pub fn data(mut self, data: Vec<u8>) -> Self {
		self.data = data;
		self
	}

	/// Sets the native value to transfer.
	pub fn value(mut self, value: U256) -> Self {
		self.value = value;
		self
	}

	/// Sets the chain ID (required).
	pub fn chain_id(mut self, chain_id: u64) -> Self {
		self.chain_id = Some(chain_id);
		self
	}

	/// Sets an explicit nonce.
	pub fn nonce(mut self, nonce: u64) -> Self {
		self.nonce = Some(nonce);
		self
	}

	/// Sets an explicit gas limit.
	pub fn gas_limit(mut self, gas_limit: u64) -> Self {
		self.gas_limit = Some(gas_limit);
		self
	}

	/// Builds the transaction, or reports the missing required field.
	pub fn try_build(self) -> Result<Transaction, &'static str> {
		let chain_id = self.chain_id.ok_or("chain_id is required")?;
		Ok(Transaction {
			to: self.to,
			data: self.data,
			value: self.value,
			chain_id,
			nonce: self.nonce,
			gas_limit: self.gas_limit,
		})
	}

	/// Builds the transaction.
	///
	/// # Panics
	///
	/// Panics if `chain_id` was not set; use [`try_build`](Self::try_build)
	/// for fallible construction.
	pub fn build(self) -> Transaction {
		self.try_build().expect("chain_id is required")
	}
}

/// Builder for [`TokenDescriptor`] test fixtures.
#[derive(Debug, Clone)]
pub struct TokenDescriptorBuilder {
	chain_id: u64,
	address: Address,
	decimals: u8,
	symbol: String,
	name: String,
}

impl Default for TokenDescriptorBuilder {
	fn default() -> Self {
		Self {
			chain_id: 1,
			address: Address::ZERO,
			decimals: 18,
			symbol: "TEST".to_string(),
			name: "Test Token".to_string(),
		}
	}
}

impl TokenDescriptorBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn chain_id(mut self, chain_id: u64) -> Self {
		self.chain_id = chain_id;
		self
	}

	pub fn address(mut self, address: Address) -> Self {
		self.address = address;
		self
	}

	pub fn decimals(mut self, decimals: u8) -> Self {
		self.decimals = decimals;
		self
	}

	pub fn symbol(mut self, symbol: &str) -> Self {
		self.symbol = symbol.to_string();
		self
	}

	pub fn name(mut self, name: &str) -> Self {
		self.name = name.to_string();
		self
	}

	pub fn build(self) -> TokenDescriptor {
		TokenDescriptor {
			chain_id: self.chain_id,
			address: self.address,
			decimals: self.decimals,
			symbol: self.symbol,
			name: self.name,
		}
	}
}
