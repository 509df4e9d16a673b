//! Error types for the shared type definitions

use thiserror::Error;

/// Parsing and conversion errors for core types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TypesError {
    #[error("Invalid address {input}: {reason}")]
    InvalidAddress { input: String, reason: String },

    #[error("Invalid unit amount {input}: {reason}")]
    InvalidUnits { input: String, reason: String },

    #[error("Amount {input} has more than {decimals} decimal places")]
    TooPrecise { input: String, decimals: u32 },

    #[error("Amount overflow converting {input} with {decimals} decimals")]
    UnitsOverflow { input: String, decimals: u32 },
}
