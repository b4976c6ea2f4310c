//! Common types for the zap workflow engine.
//!
//! This crate defines the domain types shared by every zap component:
//! token descriptors, pool metadata, swap parameters, chain-agnostic
//! transactions and their outcomes, and base-unit amount conversions.

/// Fluent builders used by tests and component wiring.
pub mod builders;
/// Pool metadata and the closed fee-tier enumeration.
pub mod pool;
/// Swap call parameters.
pub mod swap;
/// Token descriptor type.
pub mod token;
/// Transaction request, receipt and outcome types.
pub mod transaction;
/// Base-unit amount parsing and formatting.
pub mod units;

pub use builders::{TokenDescriptorBuilder, TransactionBuilder};
pub use pool::{FeeTier, PoolInfo};
pub use swap::SwapParams;
pub use token::TokenDescriptor;
pub use transaction::{
	Log, Transaction, TransactionHash, TransactionOutcome, TransactionReceipt, TxStatus,
};
pub use units::{format_units, parse_units, UnitsError};
