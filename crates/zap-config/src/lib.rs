//! Configuration for the zap workflow engine.
//!
//! Configuration is a single TOML file with `${VAR}` / `${VAR:-default}`
//! environment expansion, so secrets like the signing key stay out of the
//! file itself. Everything the workflow needs — network, account, contract
//! addresses, token descriptors and the swap/deposit policies — is loaded
//! here once at process start and passed into components explicitly; there
//! are no module-level singletons.

use alloy_primitives::{aliases::U160, Address, U256};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use zap_types::{parse_units, FeeTier, TokenDescriptor};

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		ConfigError::Parse(err.message().to_string())
	}
}

/// Top-level configuration for one workflow run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Target network.
	pub network: NetworkConfig,
	/// Signing account.
	pub account: AccountConfig,
	/// Addresses of the external contracts the workflow talks to.
	pub contracts: ContractsConfig,
	/// Input and output token descriptors.
	pub tokens: TokensConfig,
	/// Swap amounts and protection policy.
	pub swap: SwapConfig,
	/// Deposit policy.
	#[serde(default)]
	pub deposit: DepositConfig,
	/// Confirmation depth for submitted transactions.
	#[serde(default)]
	pub confirmations: ConfirmationsConfig,
}

/// Target network settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
	/// Chain ID of the target network.
	pub chain_id: u64,
	/// HTTP JSON-RPC endpoint.
	pub rpc_url: String,
	/// Block explorer base URL, used only for log links.
	#[serde(default)]
	pub explorer_url: Option<String>,
}

/// Signing account settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountConfig {
	/// Hex private key, normally injected as `${PRIVATE_KEY}`.
	pub private_key: String,
}

/// External contract addresses.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContractsConfig {
	/// Pool factory.
	pub factory: Address,
	/// Swap router.
	pub swap_router: Address,
	/// Lending pool.
	pub lending_pool: Address,
}

/// The token pair the workflow trades.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokensConfig {
	/// Token sold into the pool.
	pub input: TokenDescriptor,
	/// Token bought and then deposited.
	pub output: TokenDescriptor,
}

/// Swap amounts and protection policy.
///
/// The zero defaults for `amount_out_minimum` and `sqrt_price_limit`
/// reproduce the source behavior: no slippage or price-limit protection.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SwapConfig {
	/// Input amount in display units of the input token, e.g. "1.5".
	pub amount_in: String,
	/// Pool fee tier.
	#[serde(default)]
	pub fee_tier: FeeTier,
	/// Minimum output in display units of the output token.
	#[serde(default = "default_zero_amount")]
	pub amount_out_minimum: String,
	/// Q64.96 price limit as a decimal string.
	#[serde(default = "default_zero_amount")]
	pub sqrt_price_limit: String,
}

/// How the deposit amount is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DepositMode {
	/// Deposit a fixed configured amount, regardless of the swap output.
	Fixed,
	/// Deposit exactly what the swap credited to the account.
	SwapOutput,
}

/// Deposit policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DepositConfig {
	/// Amount selection mode.
	#[serde(default = "default_deposit_mode")]
	pub mode: DepositMode,
	/// Fixed amount in display units of the output token. Ignored in
	/// swap-output mode.
	#[serde(default = "default_deposit_amount")]
	pub amount: String,
}

impl Default for DepositConfig {
	fn default() -> Self {
		Self {
			mode: default_deposit_mode(),
			amount: default_deposit_amount(),
		}
	}
}

/// Confirmation depth for submitted transactions.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConfirmationsConfig {
	/// Blocks to wait before a transaction counts as confirmed.
	#[serde(default = "default_min_confirmations")]
	pub min: u64,
}

impl Default for ConfirmationsConfig {
	fn default() -> Self {
		Self {
			min: default_min_confirmations(),
		}
	}
}

fn default_zero_amount() -> String {
	"0".to_string()
}

fn default_deposit_mode() -> DepositMode {
	DepositMode::Fixed
}

/// The source behavior deposited a constant 1.0 of the output token.
fn default_deposit_amount() -> String {
	"1".to_string()
}

fn default_min_confirmations() -> u64 {
	1
}

/// Resolves environment variables in a string.
///
/// Replaces `${VAR_NAME}` with the value of the environment variable, and
/// supports `${VAR_NAME:-default}` fallbacks.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {e}")))?;

	let mut result = input.to_string();
	let mut replacements = Vec::new();

	for cap in re.captures_iter(input) {
		let full_match = cap.get(0).expect("capture 0 always present");
		let var_name = cap.get(1).expect("capture 1 always present").as_str();
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name) {
			Ok(v) => v,
			Err(_) => match default_value {
				Some(default) => default.to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{var_name}' not found"
					)))
				},
			},
		};

		replacements.push((full_match.start(), full_match.end(), value));
	}

	// Apply replacements in reverse order to maintain positions
	for (start, end, value) in replacements.iter().rev() {
		result.replace_range(start..end, value);
	}

	Ok(result)
}

impl Config {
	/// Loads and validates configuration from a TOML file, resolving
	/// environment variables first.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let raw = std::fs::read_to_string(path)?;
		Self::from_toml_str(&raw)
	}

	/// Parses and validates configuration from a TOML string.
	pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
		let resolved = resolve_env_vars(raw)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}

	/// Swap input amount in base units of the input token.
	pub fn swap_amount_in(&self) -> Result<U256, ConfigError> {
		parse_units(&self.swap.amount_in, self.tokens.input.decimals)
			.map_err(|e| ConfigError::Validation(format!("swap.amount_in: {e}")))
	}

	/// Minimum swap output in base units of the output token.
	pub fn swap_amount_out_minimum(&self) -> Result<U256, ConfigError> {
		parse_units(&self.swap.amount_out_minimum, self.tokens.output.decimals)
			.map_err(|e| ConfigError::Validation(format!("swap.amount_out_minimum: {e}")))
	}

	/// Q64.96 price limit for the swap.
	pub fn sqrt_price_limit(&self) -> Result<U160, ConfigError> {
		U160::from_str_radix(&self.swap.sqrt_price_limit, 10)
			.map_err(|e| ConfigError::Validation(format!("swap.sqrt_price_limit: {e}")))
	}

	/// Fixed deposit amount in base units of the output token.
	pub fn deposit_amount(&self) -> Result<U256, ConfigError> {
		parse_units(&self.deposit.amount, self.tokens.output.decimals)
			.map_err(|e| ConfigError::Validation(format!("deposit.amount: {e}")))
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if self.network.rpc_url.is_empty() {
			return Err(ConfigError::Validation(
				"network.rpc_url cannot be empty".into(),
			));
		}

		let key = self
			.account
			.private_key
			.strip_prefix("0x")
			.unwrap_or(&self.account.private_key);
		if key.len() != 64 || !key.chars().all(|c| c.is_ascii_hexdigit()) {
			return Err(ConfigError::Validation(
				"account.private_key must be 64 hex characters (32 bytes)".into(),
			));
		}

		for (name, address) in [
			("contracts.factory", self.contracts.factory),
			("contracts.swap_router", self.contracts.swap_router),
			("contracts.lending_pool", self.contracts.lending_pool),
		] {
			if address == Address::ZERO {
				return Err(ConfigError::Validation(format!(
					"{name} cannot be the zero address"
				)));
			}
		}

		for (name, token) in [
			("tokens.input", &self.tokens.input),
			("tokens.output", &self.tokens.output),
		] {
			if token.chain_id != self.network.chain_id {
				return Err(ConfigError::Validation(format!(
					"{name} is declared for chain {} but the network is chain {}",
					token.chain_id, self.network.chain_id
				)));
			}
			if token.address == Address::ZERO {
				return Err(ConfigError::Validation(format!(
					"{name}.address cannot be the zero address"
				)));
			}
		}
		if self.tokens.input.address == self.tokens.output.address {
			return Err(ConfigError::Validation(
				"tokens.input and tokens.output must differ".into(),
			));
		}

		if self.confirmations.min == 0 {
			return Err(ConfigError::Validation(
				"confirmations.min must be at least 1".into(),
			));
		}

		// Amount fields must scale into base units up front, so a typo
		// fails the run before any transaction is composed.
		self.swap_amount_in()?;
		self.swap_amount_out_minimum()?;
		self.sqrt_price_limit()?;
		self.deposit_amount()?;

		Ok(())
	}
}
