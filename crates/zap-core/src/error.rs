//! Workflow error taxonomy.
//!
//! Every failure class the workflow can surface. Failures abort the current
//! run immediately: no step is retried, and nothing that already confirmed
//! on chain is compensated for — on-chain effects are not reversible.

use crate::workflow::WorkflowState;
use alloy_primitives::Address;
use thiserror::Error;
use zap_config::ConfigError;
use zap_types::FeeTier;

/// Errors that can occur while running the workflow.
#[derive(Debug, Error)]
pub enum WorkflowError {
	/// An allowance transaction reverted or could not be submitted. The
	/// gated transfer is never attempted.
	#[error("Approval failed: {0}")]
	Approval(String),
	/// The factory has no pool deployed for the requested pair and fee
	/// tier. Fatal, never retried.
	#[error("No pool deployed for pair {token_a}/{token_b} at fee tier {fee}")]
	PoolNotFound {
		token_a: Address,
		token_b: Address,
		fee: FeeTier,
	},
	/// A swap or deposit transaction reverted, or the transport failed
	/// during submission or confirmation.
	#[error("Transaction failed: {0}")]
	Transaction(String),
	/// A read-only call failed or returned inconsistent data.
	#[error("Query failed: {0}")]
	Query(String),
	/// An amount could not be scaled into base units.
	#[error("Invalid amount: {0}")]
	InvalidAmount(String),
	/// The orchestrator attempted an illegal state transition.
	#[error("Invalid workflow transition from {from} to {to}")]
	InvalidTransition {
		from: WorkflowState,
		to: WorkflowState,
	},
	/// Configuration could not be turned into workflow settings.
	#[error("Configuration error: {0}")]
	Config(#[from] ConfigError),
}
