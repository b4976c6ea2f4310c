//! Account management for the zap workflow engine.
//!
//! Defines the interface the rest of the system uses to identify the signing
//! account and obtain a signer for the chain layer. The workflow is
//! single-account by design: one account approves, swaps and deposits, so
//! the swap recipient and the deposit beneficiary are always the same
//! address.

use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod local;
}

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
	/// A cryptographic key was invalid or malformed.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
	/// The underlying account implementation failed.
	#[error("Implementation error: {0}")]
	Implementation(String),
}

/// Interface every account implementation provides.
///
/// Implementations own the key material; the rest of the system only ever
/// sees the derived address and an Alloy signer handed to the provider
/// wallet.
#[async_trait]
pub trait AccountInterface: Send + Sync {
	/// Address of the managed account.
	async fn address(&self) -> Result<Address, AccountError>;

	/// Signer for the chain layer's wallet.
	fn signer(&self) -> PrivateKeySigner;
}

/// High-level wrapper around an account implementation.
pub struct AccountService {
	implementation: Box<dyn AccountInterface>,
}

impl AccountService {
	/// Creates a new AccountService over the given implementation.
	pub fn new(implementation: Box<dyn AccountInterface>) -> Self {
		Self { implementation }
	}

	/// Address of the managed account.
	pub async fn address(&self) -> Result<Address, AccountError> {
		self.implementation.address().await
	}

	/// Signer for the chain layer's wallet.
	pub fn signer(&self) -> PrivateKeySigner {
		self.implementation.signer()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::implementations::local::LocalWallet;

	const TEST_PRIVATE_KEY: &str =
		"ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

	#[test]
	fn account_error_display() {
		let err = AccountError::InvalidKey("bad key".to_string());
		assert_eq!(err.to_string(), "Invalid key: bad key");

		let err = AccountError::Implementation("boom".to_string());
		assert_eq!(err.to_string(), "Implementation error: boom");
	}

	#[tokio::test]
	async fn service_delegates_to_implementation() {
		let wallet = LocalWallet::new(TEST_PRIVATE_KEY).unwrap();
		let service = AccountService::new(Box::new(wallet));

		let address = service.address().await.unwrap();
		assert_eq!(address, service.signer().address());
	}
}
