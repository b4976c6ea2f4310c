//! Command-line entry point for the zap workflow engine.
//!
//! Loads configuration, wires the account, chain and workflow components
//! together, and drives one swap-then-deposit run end to end. The process
//! exits non-zero if the workflow fails at any step; nothing is retried and
//! no state survives the process.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use zap_account::{implementations::local::LocalWallet, AccountService};
use zap_chain::{implementations::alloy::AlloyChain, ChainService};
use zap_config::Config;
use zap_core::{BalanceReporter, WorkflowOrchestrator};
use zap_types::format_units;

/// Command-line arguments for the zap binary.
#[derive(Parser, Debug)]
#[command(author, version, about = "Swap a token and deposit the output into a lending pool")]
struct Args {
	/// Path to the TOML configuration file
	#[arg(short, long, default_value = "zap.toml")]
	config: PathBuf,

	/// Override the configured swap input amount, in display units of the
	/// input token (e.g. "1.5")
	#[arg(short, long)]
	amount: Option<String>,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	// A .env file is optional; environment variables may come from anywhere.
	let _ = dotenvy::dotenv();

	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};
	let env_filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(args.log_level.clone()));
	fmt().with_env_filter(env_filter).with_target(true).init();

	tracing::info!("Started zap");

	let mut config = Config::from_file(&args.config)?;
	if let Some(amount) = args.amount {
		config.swap.amount_in = amount;
		// Re-check that the override still scales into base units.
		config.swap_amount_in()?;
	}
	tracing::info!(
		chain_id = config.network.chain_id,
		input = %config.tokens.input.symbol,
		output = %config.tokens.output.symbol,
		amount_in = %config.swap.amount_in,
		"Loaded configuration"
	);

	let account = AccountService::new(Box::new(LocalWallet::new(&config.account.private_key)?));
	let address = account.address().await?;
	tracing::info!(account = %address, "Using account");

	let chain = AlloyChain::new(
		&config.network.rpc_url,
		config.network.chain_id,
		account.signer(),
	)?;
	let chain = Arc::new(ChainService::new(Arc::new(chain), config.confirmations.min));

	// Observability only: show the output token's total supply up front.
	let reporter = BalanceReporter::new(chain.clone(), config.network.chain_id);
	match reporter.total_supply(&config.tokens.output).await {
		Ok(supply) => tracing::info!(
			token = %config.tokens.output.symbol,
			supply = %format_units(supply, config.tokens.output.decimals),
			"Output token total supply"
		),
		Err(error) => tracing::warn!(%error, "Could not read output token supply"),
	}

	let mut workflow = WorkflowOrchestrator::from_config(&config, chain, address)?;
	match workflow.run().await {
		Ok(report) => {
			tracing::info!(
				swapped = %format_units(
					report.input_balance_before - report.input_balance_after,
					config.tokens.input.decimals
				),
				deposited = %format_units(report.deposit_amount, config.tokens.output.decimals),
				swap_tx = %report.swap.hash,
				deposit_tx = %report.deposit.hash,
				"Workflow complete"
			);
			tracing::info!("Stopped zap");
			Ok(())
		},
		Err(error) => {
			tracing::error!(%error, "Workflow aborted");
			std::process::exit(1);
		},
	}
}
