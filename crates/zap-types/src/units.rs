//! Base-unit amount conversions.
//!
//! Token amounts cross every external boundary as integers in the token's
//! smallest unit. These helpers scale between that representation and the
//! decimal strings humans write in configuration and read in logs, without
//! ever routing through floating point.

use alloy_primitives::U256;
use thiserror::Error;

/// Errors from scaling a decimal string into base units.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnitsError {
	/// The input was not a plain decimal number.
	#[error("Invalid amount '{0}': expected a plain decimal number")]
	Malformed(String),
	/// The fractional part had more digits than the token's decimals.
	#[error("Amount '{0}' has more than {1} fractional digits")]
	TooPrecise(String, u8),
	/// The scaled value does not fit in 256 bits.
	#[error("Amount '{0}' overflows at {1} decimals")]
	Overflow(String, u8),
}

/// Scales a decimal display string (e.g. "1.5") into base units.
///
/// Rejects anything that is not a plain non-negative decimal, and any
/// fractional part finer than the token can represent.
pub fn parse_units(text: &str, decimals: u8) -> Result<U256, UnitsError> {
	let malformed = || UnitsError::Malformed(text.to_string());

	let (integer, fraction) = match text.split_once('.') {
		Some((int_part, frac_part)) => (int_part, frac_part),
		None => (text, ""),
	};
	if integer.is_empty() && fraction.is_empty() {
		return Err(malformed());
	}
	if !integer.chars().all(|c| c.is_ascii_digit())
		|| !fraction.chars().all(|c| c.is_ascii_digit())
	{
		return Err(malformed());
	}
	if fraction.len() > decimals as usize {
		return Err(UnitsError::TooPrecise(text.to_string(), decimals));
	}

	// Right-pad the fraction to the full decimal width, then treat the
	// concatenation as one integer.
	let mut digits = String::with_capacity(integer.len() + decimals as usize);
	digits.push_str(integer);
	digits.push_str(fraction);
	for _ in 0..(decimals as usize - fraction.len()) {
		digits.push('0');
	}
	if digits.is_empty() {
		return Ok(U256::ZERO);
	}

	U256::from_str_radix(&digits, 10)
		.map_err(|_| UnitsError::Overflow(text.to_string(), decimals))
}

/// Formats a base-unit amount as a decimal display string.
///
/// Trailing fractional zeros are trimmed; whole amounts print without a
/// decimal point.
pub fn format_units(amount: U256, decimals: u8) -> String {
	let raw = amount.to_string();
	if decimals == 0 {
		return raw;
	}

	let width = decimals as usize;
	let (integer, fraction) = if raw.len() <= width {
		("0".to_string(), format!("{:0>width$}", raw, width = width))
	} else {
		let split = raw.len() - width;
		(raw[..split].to_string(), raw[split..].to_string())
	};

	let fraction = fraction.trim_end_matches('0');
	if fraction.is_empty() {
		integer
	} else {
		format!("{}.{}", integer, fraction)
	}
}
