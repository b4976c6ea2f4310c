//! Swap-then-deposit workflow orchestration.
//!
//! This crate contains the domain logic of the zap engine: allowance
//! grants, pool resolution, swap execution, lending deposits, balance
//! reporting, and the state machine that sequences them into one
//! end-to-end workflow. All ledger access goes through the `zap-chain`
//! service seam, so every component here is testable against a fake chain.

/// Allowance grants gating every fund movement.
pub mod allowance;
/// Contract interface bindings and return-data decoding helpers.
pub mod contracts;
/// Workflow error taxonomy.
pub mod error;
/// Lending pool deposits.
pub mod lending;
/// Trading pool resolution.
pub mod pool;
/// Balance and supply reads for observability.
pub mod report;
/// Swap execution.
pub mod swap;
/// The workflow orchestrator and its state machine.
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;

pub use allowance::AllowanceManager;
pub use error::WorkflowError;
pub use lending::LendingDepositor;
pub use pool::PoolResolver;
pub use report::BalanceReporter;
pub use swap::SwapExecutor;
pub use workflow::{
	DepositPolicy, WorkflowOrchestrator, WorkflowReport, WorkflowSettings, WorkflowState,
};
