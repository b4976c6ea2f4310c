//! Token descriptor type.
//!
//! A [`TokenDescriptor`] captures everything the workflow needs to know about
//! an ERC-20 token: where it lives, how its amounts scale, and how to name it
//! in logs. Descriptors are loaded from configuration at process start and
//! never mutated afterwards.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Static description of an ERC-20 token on a specific chain.
///
/// The `decimals` field governs every amount conversion for this token:
/// amounts are carried as base-unit integers and only scaled for display.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TokenDescriptor {
	/// Chain the token contract is deployed on.
	pub chain_id: u64,
	/// Token contract address.
	pub address: Address,
	/// Number of decimal places used for base-unit scaling.
	pub decimals: u8,
	/// Short symbol, e.g. "USDC".
	pub symbol: String,
	/// Full token name, e.g. "USD Coin".
	pub name: String,
}

impl std::fmt::Display for TokenDescriptor {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} ({})", self.symbol, self.address)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::address;

	#[test]
	fn deserializes_from_toml() {
		let toml = r#"
			chain_id = 11155111
			address = "0x94a9d9ac8a22534e3faca9f4e7f2e2cf85d5e4c8"
			decimals = 6
			symbol = "USDC"
			name = "USD Coin"
		"#;
		let token: TokenDescriptor = toml::from_str(toml).unwrap();
		assert_eq!(token.chain_id, 11155111);
		assert_eq!(
			token.address,
			address!("94a9d9ac8a22534e3faca9f4e7f2e2cf85d5e4c8")
		);
		assert_eq!(token.decimals, 6);
		assert_eq!(token.symbol, "USDC");
	}

	#[test]
	fn display_shows_symbol_and_address() {
		let token = TokenDescriptor {
			chain_id: 1,
			address: address!("779877a7b0d9e8603169ddbd7836e478b4624789"),
			decimals: 18,
			symbol: "LINK".to_string(),
			name: "Chainlink".to_string(),
		};
		let shown = token.to_string();
		assert!(shown.starts_with("LINK (0x"));
	}
}
