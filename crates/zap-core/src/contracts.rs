//! Contract interface bindings.
//!
//! Minimal `sol!` declarations for the five external contracts the workflow
//! talks to, plus helpers for decoding single-word return data. Calls are
//! encoded through `SolCall`; return words are decoded by slicing, since
//! every read the workflow performs returns exactly one ABI word.

use alloy_primitives::{Address, U256};
use alloy_sol_types::sol;

sol! {
	interface IERC20 {
		event Transfer(address indexed from, address indexed to, uint256 value);

		function approve(address spender, uint256 amount) external returns (bool);
		function allowance(address owner, address spender) external view returns (uint256);
		function balanceOf(address account) external view returns (uint256);
		function totalSupply() external view returns (uint256);
	}

	interface IUniswapV3Factory {
		function getPool(address tokenA, address tokenB, uint24 fee) external view returns (address pool);
	}

	interface IUniswapV3Pool {
		function token0() external view returns (address);
		function token1() external view returns (address);
		function fee() external view returns (uint24);
	}

	interface ISwapRouter {
		struct ExactInputSingleParams {
			address tokenIn;
			address tokenOut;
			uint24 fee;
			address recipient;
			uint256 amountIn;
			uint256 amountOutMinimum;
			uint160 sqrtPriceLimitX96;
		}

		function exactInputSingle(ExactInputSingleParams calldata params) external payable returns (uint256 amountOut);
	}

	interface ILendingPool {
		function deposit(address asset, uint256 amount, address onBehalfOf, uint16 referralCode) external;
	}
}

/// Decodes a single `address` return word.
pub(crate) fn decode_address(data: &[u8]) -> Result<Address, String> {
	if data.len() < 32 {
		return Err(format!("Return data too short: {} bytes", data.len()));
	}
	Ok(Address::from_slice(&data[12..32]))
}

/// Decodes a single `uint256` return word.
pub(crate) fn decode_u256(data: &[u8]) -> Result<U256, String> {
	if data.len() < 32 {
		return Err(format!("Return data too short: {} bytes", data.len()));
	}
	Ok(U256::from_be_slice(&data[..32]))
}

/// Decodes a small unsigned return word such as a `uint24` fee.
pub(crate) fn decode_u32(data: &[u8]) -> Result<u32, String> {
	let value = decode_u256(data)?;
	u32::try_from(value).map_err(|_| format!("Return word {} does not fit in u32", value))
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::address;
	use alloy_sol_types::SolCall;

	#[test]
	fn approve_selector_matches_erc20() {
		// approve(address,uint256)
		assert_eq!(IERC20::approveCall::SELECTOR, [0x09, 0x5e, 0xa7, 0xb3]);
	}

	#[test]
	fn allowance_and_balance_selectors_match_erc20() {
		// allowance(address,address) / balanceOf(address) / totalSupply()
		assert_eq!(IERC20::allowanceCall::SELECTOR, [0xdd, 0x62, 0xed, 0x3e]);
		assert_eq!(IERC20::balanceOfCall::SELECTOR, [0x70, 0xa0, 0x82, 0x31]);
		assert_eq!(IERC20::totalSupplyCall::SELECTOR, [0x18, 0x16, 0x0d, 0xdd]);
	}

	#[test]
	fn decodes_address_word() {
		let expected = address!("94a9d9ac8a22534e3faca9f4e7f2e2cf85d5e4c8");
		let mut word = [0u8; 32];
		word[12..].copy_from_slice(expected.as_slice());
		assert_eq!(decode_address(&word).unwrap(), expected);
		assert!(decode_address(&word[..31]).is_err());
	}

	#[test]
	fn decodes_numeric_words() {
		let word = U256::from(3000u64).to_be_bytes::<32>();
		assert_eq!(decode_u256(&word).unwrap(), U256::from(3000u64));
		assert_eq!(decode_u32(&word).unwrap(), 3000);

		let too_big = U256::MAX.to_be_bytes::<32>();
		assert!(decode_u32(&too_big).is_err());
	}
}
