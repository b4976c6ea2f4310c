//! Ledger access layer for the zap workflow engine.
//!
//! This crate handles submission and monitoring of blockchain transactions
//! plus read-only contract calls. [`ChainInterface`] is the seam the domain
//! logic is written against; [`ChainService`] adds the submit-then-block
//! sequencing every fund-moving step of the workflow relies on.

use alloy_primitives::Bytes;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use zap_types::{Transaction, TransactionHash, TransactionOutcome, TransactionReceipt};

/// Re-export implementations
pub mod implementations {
	pub mod alloy;
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum ChainError {
	/// Network or transport failure during a call or submission.
	#[error("Network error: {0}")]
	Network(String),
	/// A submitted transaction could not be confirmed.
	#[error("Transaction failed: {0}")]
	TransactionFailed(String),
}

/// Interface for reading from and writing to a remote ledger node.
///
/// Write access is two-phase: [`submit`](ChainInterface::submit) broadcasts a
/// signed transaction and returns its hash,
/// [`wait_for_confirmation`](ChainInterface::wait_for_confirmation) blocks
/// until that hash is mined with the requested depth. Reads go through
/// [`call`](ChainInterface::call).
#[async_trait]
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait ChainInterface: Send + Sync {
	/// Signs and broadcasts a transaction, returning its hash.
	async fn submit(&self, tx: Transaction) -> Result<TransactionHash, ChainError>;

	/// Blocks until the transaction is mined with the requested number of
	/// confirmations, then returns its receipt.
	async fn wait_for_confirmation(
		&self,
		hash: TransactionHash,
		confirmations: u64,
	) -> Result<TransactionReceipt, ChainError>;

	/// Executes a read-only contract call and returns the raw return data.
	async fn call(&self, tx: Transaction) -> Result<Bytes, ChainError>;
}

/// Service wrapping a [`ChainInterface`] with the workflow's submission
/// discipline.
///
/// Every write is followed by a blocking confirmation wait before control
/// returns to the caller. This is the system's only suspension point: no
/// other transaction is composed for the account while one is in flight,
/// which keeps nonce ordering trivial.
pub struct ChainService {
	implementation: Arc<dyn ChainInterface>,
	min_confirmations: u64,
}

impl ChainService {
	/// Creates a new ChainService requiring `min_confirmations` blocks on
	/// every submitted transaction.
	pub fn new(implementation: Arc<dyn ChainInterface>, min_confirmations: u64) -> Self {
		Self {
			implementation,
			min_confirmations,
		}
	}

	/// Submits a transaction and blocks until it is confirmed or observed
	/// to have reverted.
	///
	/// The returned outcome is `Confirmed` or `Failed` according to the
	/// mined receipt; transport-level problems surface as errors instead.
	pub async fn submit_and_confirm(
		&self,
		tx: Transaction,
	) -> Result<TransactionOutcome, ChainError> {
		let hash = self.implementation.submit(tx).await?;
		tracing::info!(tx_hash = %hash, "Transaction sent");

		let mut outcome = TransactionOutcome::pending(hash);
		let receipt = self
			.implementation
			.wait_for_confirmation(hash, self.min_confirmations)
			.await?;
		outcome.settle(receipt);

		if outcome.is_confirmed() {
			tracing::info!(tx_hash = %hash, "Transaction confirmed");
		} else {
			tracing::warn!(tx_hash = %hash, "Transaction reverted");
		}

		Ok(outcome)
	}

	/// Executes a read-only contract call.
	pub async fn call(&self, tx: Transaction) -> Result<Bytes, ChainError> {
		self.implementation.call(tx).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::B256;
	use zap_types::{TransactionBuilder, TxStatus};

	fn test_tx() -> Transaction {
		TransactionBuilder::new().chain_id(1).build()
	}

	fn receipt(hash: TransactionHash, success: bool) -> TransactionReceipt {
		TransactionReceipt {
			hash,
			block_number: 7,
			success,
			logs: vec![],
		}
	}

	#[tokio::test]
	async fn submit_and_confirm_settles_outcome_from_receipt() {
		let hash = B256::repeat_byte(0xaa);
		let mut mock = MockChainInterface::new();
		mock.expect_submit()
			.returning(move |_| Box::pin(async move { Ok(hash) }));
		mock.expect_wait_for_confirmation()
			.withf(|_, confirmations| *confirmations == 2)
			.returning(move |h, _| Box::pin(async move { Ok(receipt(h, true)) }));

		let service = ChainService::new(Arc::new(mock), 2);
		let outcome = service.submit_and_confirm(test_tx()).await.unwrap();

		assert_eq!(outcome.hash, hash);
		assert!(outcome.is_confirmed());
		assert_eq!(outcome.receipt.unwrap().block_number, 7);
	}

	#[tokio::test]
	async fn submit_and_confirm_reports_reverts_as_failed_status() {
		let hash = B256::repeat_byte(0xbb);
		let mut mock = MockChainInterface::new();
		mock.expect_submit()
			.returning(move |_| Box::pin(async move { Ok(hash) }));
		mock.expect_wait_for_confirmation()
			.returning(move |h, _| Box::pin(async move { Ok(receipt(h, false)) }));

		let service = ChainService::new(Arc::new(mock), 1);
		let outcome = service.submit_and_confirm(test_tx()).await.unwrap();

		assert_eq!(outcome.status, TxStatus::Failed);
		assert!(!outcome.is_confirmed());
	}

	#[tokio::test]
	async fn submit_errors_propagate() {
		let mut mock = MockChainInterface::new();
		mock.expect_submit().returning(|_| {
			Box::pin(async { Err(ChainError::Network("connection refused".to_string())) })
		});
		mock.expect_wait_for_confirmation().never();

		let service = ChainService::new(Arc::new(mock), 1);
		let result = service.submit_and_confirm(test_tx()).await;

		assert!(matches!(result, Err(ChainError::Network(_))));
	}
}
