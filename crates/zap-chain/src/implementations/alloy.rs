//! Alloy-based EVM chain implementation.
//!
//! Uses the Alloy provider stack to submit and monitor transactions on an
//! EVM-compatible network. Signing happens inside the provider's wallet;
//! nonce assignment and gas pricing are handled by fillers so the workflow
//! never manages either by hand. Retries configured here are transport-level
//! request retries only; the workflow above never re-runs a step.

use crate::{ChainError, ChainInterface};
use alloy_network::EthereumWallet;
use alloy_primitives::Bytes;
use alloy_provider::{
	fillers::{ChainIdFiller, GasFiller, NonceFiller, SimpleNonceManager},
	DynProvider, PendingTransactionConfig, PendingTransactionError, Provider, ProviderBuilder,
};
use alloy_rpc_client::RpcClient;
use alloy_rpc_types::TransactionRequest;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use alloy_transport::layers::RetryBackoffLayer;
use async_trait::async_trait;
use std::time::Duration;
use zap_types::{Log, Transaction, TransactionHash, TransactionReceipt};

// Approximate seconds per confirmation used to size the watch timeout.
const SECONDS_PER_CONFIRMATION: u64 = 45;
const MAX_TIMEOUT_SECONDS: u64 = 3600;

/// EVM chain access over an HTTP JSON-RPC endpoint.
pub struct AlloyChain {
	provider: DynProvider,
	chain_id: u64,
}

impl AlloyChain {
	/// Creates a new AlloyChain for one network.
	///
	/// The signer is bound to the chain ID and wrapped into the provider's
	/// wallet, so every submitted transaction is signed locally before
	/// broadcast.
	pub fn new(
		rpc_url: &str,
		chain_id: u64,
		signer: PrivateKeySigner,
	) -> Result<Self, ChainError> {
		let url = rpc_url
			.parse()
			.map_err(|e| ChainError::Network(format!("Invalid RPC URL '{}': {}", rpc_url, e)))?;

		let chain_signer = signer.with_chain_id(Some(chain_id));
		let wallet = EthereumWallet::from(chain_signer);

		// Transport-level retry for rate limits and transient network errors
		let retry_layer = RetryBackoffLayer::new(
			5,    // max_retry
			1000, // initial backoff in milliseconds
			10,   // compute units per second
		);

		let client = RpcClient::builder().layer(retry_layer).http(url);

		let provider = ProviderBuilder::new()
			.filler(NonceFiller::new(SimpleNonceManager::default()))
			.filler(GasFiller)
			.filler(ChainIdFiller::default())
			.wallet(wallet)
			.connect_client(client);

		provider.client().set_poll_interval(Duration::from_secs(7));

		Ok(Self {
			provider: provider.erased(),
			chain_id,
		})
	}

	/// Chain ID this instance is bound to.
	pub fn chain_id(&self) -> u64 {
		self.chain_id
	}

	async fn get_receipt(&self, hash: TransactionHash) -> Result<TransactionReceipt, ChainError> {
		match self.provider.get_transaction_receipt(hash).await {
			Ok(Some(receipt)) => {
				let logs = receipt
					.inner
					.logs()
					.iter()
					.map(|log| Log {
						address: log.address(),
						topics: log.topics().to_vec(),
						data: log.inner.data.data.to_vec(),
					})
					.collect();

				Ok(TransactionReceipt {
					hash: receipt.transaction_hash,
					block_number: receipt.block_number.unwrap_or(0),
					success: receipt.status(),
					logs,
				})
			},
			Ok(None) => Err(ChainError::Network(format!(
				"Transaction {} not found on chain {}",
				hash, self.chain_id
			))),
			Err(e) => Err(ChainError::Network(format!(
				"Failed to get receipt on chain {}: {}",
				self.chain_id, e
			))),
		}
	}
}

#[async_trait]
impl ChainInterface for AlloyChain {
	async fn submit(&self, tx: Transaction) -> Result<TransactionHash, ChainError> {
		let request: TransactionRequest = tx.into();

		tracing::debug!(
			to = ?request.to,
			value = ?request.value,
			data_len = request.input.input().map(|d| d.len()).unwrap_or(0),
			gas_limit = ?request.gas,
			"Sending transaction on chain {}",
			self.chain_id
		);

		let pending_tx = self.provider.send_transaction(request).await.map_err(|e| {
			tracing::error!("Transaction submission failed on chain {}: {}", self.chain_id, e);
			ChainError::Network(format!("Failed to send transaction: {}", e))
		})?;

		Ok(*pending_tx.tx_hash())
	}

	async fn wait_for_confirmation(
		&self,
		hash: TransactionHash,
		confirmations: u64,
	) -> Result<TransactionReceipt, ChainError> {
		let timeout_seconds = (confirmations * SECONDS_PER_CONFIRMATION)
			.max(SECONDS_PER_CONFIRMATION)
			.min(MAX_TIMEOUT_SECONDS);
		let timeout = Duration::from_secs(timeout_seconds);

		tracing::info!(
			tx_hash = %hash,
			"Waiting for {} confirmations (timeout: {}s)",
			confirmations,
			timeout_seconds
		);

		let config = PendingTransactionConfig::new(hash)
			.with_required_confirmations(confirmations)
			.with_timeout(Some(timeout));

		let pending_tx = self
			.provider
			.watch_pending_transaction(config)
			.await
			.map_err(|e| match e {
				PendingTransactionError::FailedToRegister => {
					ChainError::Network("Failed to register transaction watcher".to_string())
				},
				other => ChainError::Network(format!("Transaction watch failed: {}", other)),
			})?;

		let confirmed_hash = pending_tx.await.map_err(|e| {
			ChainError::Network(format!("Failed to confirm transaction: {}", e))
		})?;

		self.get_receipt(confirmed_hash).await
	}

	async fn call(&self, tx: Transaction) -> Result<Bytes, ChainError> {
		let request: TransactionRequest = tx.into();

		self.provider
			.call(request)
			.await
			.map_err(|e| ChainError::Network(format!("Contract call failed: {}", e)))
	}
}
