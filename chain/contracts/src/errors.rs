//! Contract-specific error types
//!
//! `LedgerError` is what the asset-accounting ledger reports; `VaultError` is
//! the taxonomy every vault operation surfaces to its caller.

use assetbox_types::ids::Address;
use assetbox_types::units::Amount;
use thiserror::Error;

/// Vault-specific errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VaultError {
    #[error("Unauthorized: {caller} is not the owner")]
    Unauthorized { caller: Address },

    #[error("Invalid owner: {owner}")]
    InvalidOwner { owner: Address },

    #[error("Insufficient balance for {asset}: required {required}, available {available}")]
    InsufficientBalance {
        asset: String,
        required: Amount,
        available: Amount,
    },

    #[error("Transfer rejected: {reason}")]
    TransferRejected { reason: String },

    #[error("Array length mismatch: {ids} ids, {amounts} amounts")]
    ArrayLengthMismatch { ids: usize, amounts: usize },

    #[error("External call to {target} failed: {reason}")]
    ExternalCallFailed {
        target: Address,
        reason: String,
        data: Vec<u8>,
    },

    #[error("Reentrancy detected")]
    Reentrancy,

    #[error("Arithmetic overflow in balance calculation")]
    Overflow,

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

/// Errors reported by the asset-accounting ledger
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Insufficient balance for {asset}: required {required}, available {available}")]
    InsufficientBalance {
        asset: String,
        required: Amount,
        available: Amount,
    },

    #[error("{holder} does not hold {asset}")]
    NotHolder { asset: String, holder: Address },

    #[error("Recipient {recipient} rejected transfer: {reason}")]
    Rejected { recipient: Address, reason: String },

    #[error("Call to {target} reverted: {reason}")]
    Reverted {
        target: Address,
        reason: String,
        data: Vec<u8>,
    },

    #[error("Length mismatch: {ids} ids, {amounts} amounts")]
    LengthMismatch { ids: usize, amounts: usize },

    #[error("Arithmetic overflow in ledger balance")]
    Overflow,
}

impl From<LedgerError> for VaultError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientBalance {
                asset,
                required,
                available,
            } => VaultError::InsufficientBalance {
                asset,
                required,
                available,
            },
            // Not holding a unique unit is holding zero of it.
            LedgerError::NotHolder { asset, .. } => VaultError::InsufficientBalance {
                asset,
                required: 1,
                available: 0,
            },
            LedgerError::Rejected { recipient, reason } => VaultError::TransferRejected {
                reason: format!("{}: {}", recipient, reason),
            },
            LedgerError::Reverted {
                target,
                reason,
                data,
            } => VaultError::ExternalCallFailed {
                target,
                reason,
                data,
            },
            LedgerError::LengthMismatch { ids, amounts } => {
                VaultError::ArrayLengthMismatch { ids, amounts }
            }
            LedgerError::Overflow => VaultError::Overflow,
        }
    }
}
