//! Contract events
//!
//! Events are immutable records emitted by vault operations. A failed
//! operation never leaves an event behind.

use assetbox_types::asset::{AssetKind, AssetReference};
use assetbox_types::ids::Address;
use assetbox_types::units::Amount;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The owner changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipTransferred {
    pub previous_owner: Address,
    pub new_owner: Address,
}

/// An incoming transfer was acknowledged by a receive hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetReceived {
    pub kind: AssetKind,
    pub from: Address,
    pub asset: AssetReference,
}

/// A forwarded call completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCalled {
    pub target: Address,
    pub value: Amount,
    pub payload_len: usize,
    pub result_len: usize,
}

/// Held assets were released to the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawn {
    pub receipt_id: Uuid,
    pub asset: AssetReference,
    pub to: Address,
}

/// Enum wrapper for all contract events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractEvent {
    OwnershipTransferred(OwnershipTransferred),
    AssetReceived(AssetReceived),
    ContractCalled(ContractCalled),
    Withdrawn(Withdrawn),
}
