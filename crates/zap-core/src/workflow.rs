//! Workflow orchestration.
//!
//! Sequences allowance grants, pool resolution, the swap and the lending
//! deposit into one end-to-end run, driven by an explicit state machine.
//! Each fund-moving step blocks on chain confirmation before the next one
//! is composed, so the account's transactions are strictly ordered. Any
//! failure moves the workflow to `Failed` and aborts the run; there is no
//! rollback, because confirmed on-chain effects cannot be reversed. A
//! failure after the swap leaves the funds sitting in the output token,
//! uninvested, for the operator to handle manually.

use crate::allowance::AllowanceManager;
use crate::error::WorkflowError;
use crate::lending::LendingDepositor;
use crate::pool::PoolResolver;
use crate::report::BalanceReporter;
use crate::swap::{output_from_receipt, SwapExecutor};
use alloy_primitives::{aliases::U160, Address, U256};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use zap_chain::ChainService;
use zap_config::{Config, ContractsConfig, DepositMode};
use zap_types::{
	format_units, FeeTier, SwapParams, TokenDescriptor, TransactionHash, TransactionOutcome,
};

/// States of the workflow lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowState {
	/// Nothing has happened yet.
	Idle,
	/// Granting the swap router its input-token allowance.
	ApprovingSwap,
	/// Locating the trading pool.
	ResolvingPool,
	/// Building the swap parameters.
	PreparingParams,
	/// Swap submitted, waiting for confirmation.
	Swapping,
	/// Granting the lending pool its output-token allowance.
	ApprovingDeposit,
	/// Deposit submitted, waiting for confirmation.
	Depositing,
	/// Reading final balances for display.
	Reporting,
	/// Terminal success.
	Done,
	/// Terminal failure.
	Failed,
}

impl std::fmt::Display for WorkflowState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			WorkflowState::Idle => "Idle",
			WorkflowState::ApprovingSwap => "ApprovingSwap",
			WorkflowState::ResolvingPool => "ResolvingPool",
			WorkflowState::PreparingParams => "PreparingParams",
			WorkflowState::Swapping => "Swapping",
			WorkflowState::ApprovingDeposit => "ApprovingDeposit",
			WorkflowState::Depositing => "Depositing",
			WorkflowState::Reporting => "Reporting",
			WorkflowState::Done => "Done",
			WorkflowState::Failed => "Failed",
		};
		f.write_str(name)
	}
}

// Static transition table - each state maps to allowed next states. Every
// non-terminal state may additionally fail.
static TRANSITIONS: Lazy<HashMap<WorkflowState, HashSet<WorkflowState>>> = Lazy::new(|| {
	use WorkflowState::*;
	let mut m = HashMap::new();
	m.insert(Idle, HashSet::from([ApprovingSwap, Failed]));
	m.insert(ApprovingSwap, HashSet::from([ResolvingPool, Failed]));
	m.insert(ResolvingPool, HashSet::from([PreparingParams, Failed]));
	m.insert(PreparingParams, HashSet::from([Swapping, Failed]));
	m.insert(Swapping, HashSet::from([ApprovingDeposit, Failed]));
	m.insert(ApprovingDeposit, HashSet::from([Depositing, Failed]));
	m.insert(Depositing, HashSet::from([Reporting, Failed]));
	m.insert(Reporting, HashSet::from([Done, Failed]));
	m.insert(Done, HashSet::new()); // terminal
	m.insert(Failed, HashSet::new()); // terminal
	m
});

impl WorkflowState {
	/// Checks if a state transition is valid.
	pub fn is_valid_transition(from: WorkflowState, to: WorkflowState) -> bool {
		TRANSITIONS
			.get(&from)
			.is_some_and(|next| next.contains(&to))
	}
}

/// How the deposit amount is chosen once the swap has confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepositPolicy {
	/// Deposit a fixed base-unit amount, decoupled from the swap output.
	/// This is the source behavior and the default.
	Fixed(U256),
	/// Deposit exactly what the swap credited to the account.
	SwapOutput,
}

/// Resolved, base-unit workflow parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSettings {
	/// Swap input amount in base units of the input token.
	pub amount_in: U256,
	/// Pool fee tier to trade through.
	pub fee_tier: FeeTier,
	/// Minimum swap output in base units of the output token. Zero
	/// disables slippage protection (the preserved default).
	pub amount_out_minimum: U256,
	/// Q64.96 price limit. Zero disables it (the preserved default).
	pub sqrt_price_limit_x96: U160,
	/// Deposit amount policy.
	pub deposit: DepositPolicy,
}

impl WorkflowSettings {
	/// Scales the configured display amounts into base-unit settings.
	pub fn from_config(config: &Config) -> Result<Self, WorkflowError> {
		let deposit = match config.deposit.mode {
			DepositMode::Fixed => DepositPolicy::Fixed(config.deposit_amount()?),
			DepositMode::SwapOutput => DepositPolicy::SwapOutput,
		};

		Ok(Self {
			amount_in: config.swap_amount_in()?,
			fee_tier: config.swap.fee_tier,
			amount_out_minimum: config.swap_amount_out_minimum()?,
			sqrt_price_limit_x96: config.sqrt_price_limit()?,
			deposit,
		})
	}
}

/// Summary of a completed workflow run.
#[derive(Debug, Clone)]
pub struct WorkflowReport {
	/// Input-token balance before the run, in base units.
	pub input_balance_before: U256,
	/// Input-token balance after the run.
	pub input_balance_after: U256,
	/// Output-token balance before the run.
	pub output_balance_before: U256,
	/// Output-token balance after the run.
	pub output_balance_after: U256,
	/// Amount deposited into the lending pool, in base units.
	pub deposit_amount: U256,
	/// Outcome of the swap transaction.
	pub swap: TransactionOutcome,
	/// Outcome of the deposit transaction.
	pub deposit: TransactionOutcome,
}

/// Drives the swap-then-deposit pipeline.
///
/// All collaborators are injected at construction, so a run is fully
/// determined by its configuration and the chain it talks to; nothing is
/// read from ambient global state.
pub struct WorkflowOrchestrator {
	state: WorkflowState,
	account: Address,
	input: TokenDescriptor,
	output: TokenDescriptor,
	settings: WorkflowSettings,
	explorer_url: Option<String>,
	allowances: AllowanceManager,
	pools: PoolResolver,
	swaps: SwapExecutor,
	lending: LendingDepositor,
	reporter: BalanceReporter,
}

impl WorkflowOrchestrator {
	/// Creates an orchestrator over one chain service and the configured
	/// contract addresses.
	#[allow(clippy::too_many_arguments)]
	pub fn new(
		chain: Arc<ChainService>,
		chain_id: u64,
		contracts: &ContractsConfig,
		input: TokenDescriptor,
		output: TokenDescriptor,
		account: Address,
		settings: WorkflowSettings,
		explorer_url: Option<String>,
	) -> Self {
		Self {
			state: WorkflowState::Idle,
			account,
			input,
			output,
			settings,
			explorer_url,
			allowances: AllowanceManager::new(chain.clone(), chain_id),
			pools: PoolResolver::new(chain.clone(), chain_id, contracts.factory),
			swaps: SwapExecutor::new(chain.clone(), chain_id, contracts.swap_router),
			lending: LendingDepositor::new(
				chain.clone(),
				chain_id,
				contracts.lending_pool,
				AllowanceManager::new(chain.clone(), chain_id),
			),
			reporter: BalanceReporter::new(chain, chain_id),
		}
	}

	/// Builds an orchestrator straight from loaded configuration.
	pub fn from_config(
		config: &Config,
		chain: Arc<ChainService>,
		account: Address,
	) -> Result<Self, WorkflowError> {
		let settings = WorkflowSettings::from_config(config)?;
		Ok(Self::new(
			chain,
			config.network.chain_id,
			&config.contracts,
			config.tokens.input.clone(),
			config.tokens.output.clone(),
			account,
			settings,
			config.network.explorer_url.clone(),
		))
	}

	/// Current workflow state.
	pub fn state(&self) -> WorkflowState {
		self.state
	}

	/// Runs the pipeline to completion.
	///
	/// On the first error the workflow moves to `Failed` and the error is
	/// returned; nothing already confirmed is rolled back.
	pub async fn run(&mut self) -> Result<WorkflowReport, WorkflowError> {
		match self.execute().await {
			Ok(report) => Ok(report),
			Err(error) => {
				tracing::error!(step = %self.state, %error, "Workflow failed");
				self.state = WorkflowState::Failed;
				Err(error)
			},
		}
	}

	async fn execute(&mut self) -> Result<WorkflowReport, WorkflowError> {
		let account = self.account;

		// Display-only reads; concurrent since they have no ordering
		// dependency.
		let (input_before, output_before) = tokio::try_join!(
			self.reporter.balance_of(&self.input, account),
			self.reporter.balance_of(&self.output, account),
		)?;
		self.log_balances("Balances before workflow", input_before, output_before);

		self.transition(WorkflowState::ApprovingSwap)?;
		let router = self.swaps.router();
		self.allowances
			.grant(&self.input, router, self.settings.amount_in)
			.await?;

		self.transition(WorkflowState::ResolvingPool)?;
		let pool = self
			.pools
			.resolve(&self.input, &self.output, self.settings.fee_tier)
			.await?;

		self.transition(WorkflowState::PreparingParams)?;
		// The recipient is always the account that later performs the
		// deposit.
		let params = SwapParams {
			token_in: self.input.address,
			token_out: self.output.address,
			fee: pool.fee,
			recipient: account,
			amount_in: self.settings.amount_in,
			amount_out_minimum: self.settings.amount_out_minimum,
			sqrt_price_limit_x96: self.settings.sqrt_price_limit_x96,
		};

		self.transition(WorkflowState::Swapping)?;
		let swap = self.swaps.execute(&params).await?;
		self.log_explorer_link("Swap", swap.hash);

		let deposit_amount = match self.settings.deposit {
			DepositPolicy::Fixed(amount) => amount,
			DepositPolicy::SwapOutput => swap
				.receipt
				.as_ref()
				.and_then(|receipt| {
					output_from_receipt(receipt, self.output.address, account)
				})
				.ok_or_else(|| {
					WorkflowError::InvalidAmount(
						"Swap receipt carries no output transfer to size the deposit"
							.to_string(),
					)
				})?,
		};

		self.transition(WorkflowState::ApprovingDeposit)?;
		let approval = self.lending.approve(&self.output, deposit_amount).await?;

		self.transition(WorkflowState::Depositing)?;
		let deposit = self
			.lending
			.deposit_approved(&self.output, deposit_amount, account, &approval)
			.await?;
		self.log_explorer_link("Deposit", deposit.hash);

		self.transition(WorkflowState::Reporting)?;
		let (input_after, output_after) = tokio::try_join!(
			self.reporter.balance_of(&self.input, account),
			self.reporter.balance_of(&self.output, account),
		)?;
		self.log_balances("Balances after workflow", input_after, output_after);

		self.transition(WorkflowState::Done)?;

		Ok(WorkflowReport {
			input_balance_before: input_before,
			input_balance_after: input_after,
			output_balance_before: output_before,
			output_balance_after: output_after,
			deposit_amount,
			swap,
			deposit,
		})
	}

	fn transition(&mut self, next: WorkflowState) -> Result<(), WorkflowError> {
		if !WorkflowState::is_valid_transition(self.state, next) {
			return Err(WorkflowError::InvalidTransition {
				from: self.state,
				to: next,
			});
		}
		tracing::debug!(from = %self.state, to = %next, "Workflow transition");
		self.state = next;
		Ok(())
	}

	fn log_balances(&self, label: &str, input: U256, output: U256) {
		tracing::info!(
			input = %format!(
				"{} {}",
				format_units(input, self.input.decimals),
				self.input.symbol
			),
			output = %format!(
				"{} {}",
				format_units(output, self.output.decimals),
				self.output.symbol
			),
			"{label}"
		);
	}

	fn log_explorer_link(&self, label: &str, hash: TransactionHash) {
		if let Some(explorer) = &self.explorer_url {
			tracing::info!(
				"{label} transaction confirmed: {}/tx/{hash}",
				explorer.trim_end_matches('/')
			);
		}
	}
}
