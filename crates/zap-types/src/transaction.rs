//! Transaction request, receipt and outcome types.
//!
//! [`Transaction`] is the chain-agnostic request the workflow components
//! build; the chain layer converts it into an Alloy `TransactionRequest` at
//! submission time, letting the provider's fillers price gas and assign the
//! nonce. [`TransactionOutcome`] tracks one submission through its life:
//! created `Pending` when the transaction is sent, moved to `Confirmed` or
//! `Failed` only by the confirmation wait.

use alloy_primitives::{Address, Bytes, TxKind, B256, U256};
use alloy_rpc_types::{TransactionInput, TransactionRequest};

/// Hash of a submitted transaction.
pub type TransactionHash = B256;

/// Blockchain transaction request.
///
/// Fee fields are intentionally absent: the provider stack fills gas pricing
/// on submission, and the workflow never overrides it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
	/// Recipient contract or account (None would be contract creation,
	/// which the workflow never performs).
	pub to: Option<Address>,
	/// ABI-encoded calldata.
	pub data: Vec<u8>,
	/// Native value to transfer alongside the call.
	pub value: U256,
	/// Chain ID for replay protection.
	pub chain_id: u64,
	/// Explicit nonce; None lets the provider's nonce manager assign one.
	pub nonce: Option<u64>,
	/// Explicit gas limit; None lets the provider estimate.
	pub gas_limit: Option<u64>,
}

impl From<Transaction> for TransactionRequest {
	fn from(tx: Transaction) -> Self {
		TransactionRequest {
			to: tx.to.map(TxKind::Call),
			value: Some(tx.value),
			chain_id: Some(tx.chain_id),
			nonce: tx.nonce,
			gas: tx.gas_limit,
			input: TransactionInput {
				input: Some(Bytes::from(tx.data)),
				data: None,
			},
			..Default::default()
		}
	}
}

/// Event log emitted during transaction execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Log {
	/// Contract that emitted the log.
	pub address: Address,
	/// Indexed parameters; topic 0 is the event signature hash.
	pub topics: Vec<B256>,
	/// Non-indexed event data.
	pub data: Vec<u8>,
}

/// Receipt for a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
	/// Hash of the mined transaction.
	pub hash: TransactionHash,
	/// Block the transaction was included in.
	pub block_number: u64,
	/// Whether execution succeeded (false means reverted).
	pub success: bool,
	/// Logs emitted during execution.
	pub logs: Vec<Log>,
}

/// Lifecycle state of a submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
	/// Submitted, inclusion not yet observed.
	Pending,
	/// Mined and executed successfully.
	Confirmed,
	/// Mined but reverted.
	Failed,
}

/// Outcome of one transaction submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionOutcome {
	/// Hash assigned at submission.
	pub hash: TransactionHash,
	/// Current lifecycle state.
	pub status: TxStatus,
	/// Receipt, available once the confirmation wait has finished.
	pub receipt: Option<TransactionReceipt>,
}

impl TransactionOutcome {
	/// Outcome for a freshly submitted, not yet confirmed transaction.
	pub fn pending(hash: TransactionHash) -> Self {
		Self {
			hash,
			status: TxStatus::Pending,
			receipt: None,
		}
	}

	/// Settles the outcome from a mined receipt. The status follows the
	/// receipt's execution result.
	pub fn settle(&mut self, receipt: TransactionReceipt) {
		self.status = if receipt.success {
			TxStatus::Confirmed
		} else {
			TxStatus::Failed
		};
		self.receipt = Some(receipt);
	}

	/// Whether the transaction was mined and executed successfully.
	pub fn is_confirmed(&self) -> bool {
		self.status == TxStatus::Confirmed
	}
}
