//! Local private-key wallet.
//!
//! Holds a private key in memory and derives the account address from it.
//! Suitable for the single-operator, single-run shape of this tool; key
//! custody beyond "read it from the environment" is out of scope.

use crate::{AccountError, AccountInterface};
use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;

/// Local wallet backed by an in-memory private key.
#[derive(Debug)]
pub struct LocalWallet {
	signer: PrivateKeySigner,
}

impl LocalWallet {
	/// Creates a wallet from a hex-encoded private key, with or without a
	/// `0x` prefix.
	pub fn new(private_key_hex: &str) -> Result<Self, AccountError> {
		let signer = private_key_hex
			.parse::<PrivateKeySigner>()
			.map_err(|e| AccountError::InvalidKey(format!("Invalid private key: {}", e)))?;

		Ok(Self { signer })
	}
}

#[async_trait]
impl AccountInterface for LocalWallet {
	async fn address(&self) -> Result<Address, AccountError> {
		Ok(self.signer.address())
	}

	fn signer(&self) -> PrivateKeySigner {
		self.signer.clone()
	}
}
