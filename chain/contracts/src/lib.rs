//! Contract logic for the single-owner AssetBox custody vault
//!
//! A vault holds native currency, fungible, non-fungible and semi-fungible
//! tokens for exactly one owner. Anyone may deposit; only the owner may
//! withdraw or make the vault call other contracts.
//!
//! # Modules
//! - `config`: Vault construction parameters and address derivation
//! - `errors`: Vault and ledger error taxonomies
//! - `events`: Events emitted by vault operations
//! - `security`: Ownership guard and reentrancy guard
//! - `ledger`: The asset-accounting interface plus an in-memory ledger
//! - `vault`: The `AssetBox` contract and its privileged-operation wrapper
//! - `receiver`: Receive hooks for incoming transfers
//! - `forwarder`: Owner-only arbitrary calls made as the vault
//! - `withdraw`: Owner-only withdrawals per asset kind

pub mod config;
pub mod errors;
pub mod events;
pub mod forwarder;
pub mod ledger;
pub mod receiver;
pub mod security;
pub mod vault;
pub mod withdraw;

pub use config::AssetBoxConfig;
pub use errors::{LedgerError, VaultError};
pub use events::ContractEvent;
pub use forwarder::ExternalCall;
pub use ledger::memory::{ExternalContract, MemoryLedger};
pub use ledger::{CallContext, EventSink, Ledger};
pub use receiver::{Receipt, TokenReceiver};
pub use vault::AssetBox;

/// Contract ABI version — frozen after release
pub const CONTRACT_ABI_VERSION: &str = "1.0.0";
