//! Types library for the AssetBox custody vault
//!
//! Identity, amount and asset-reference types shared by the contract layer and
//! the tooling around it.
//!
//! # Modules
//! - `ids`: Ledger identities (`Address`) and token unit ids (`TokenId`)
//! - `units`: Base-unit amounts and decimal unit parsing
//! - `asset`: Asset kinds and asset references
//! - `errors`: Error taxonomy

pub mod asset;
pub mod errors;
pub mod ids;
pub mod units;

