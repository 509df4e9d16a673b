//! Receive hooks — unprivileged acceptance of incoming transfers
//!
//! The ledger notifies a registered [`TokenReceiver`] whenever native currency,
//! a non-fungible unit, or semi-fungible quantities land on its address. For
//! id-based kinds the receiver must answer with the acknowledgement value the
//! ledger expects, otherwise the ledger refuses the transfer. Fungible
//! transfers never reach a receiver.
//!
//! Anyone may deposit; nothing here consults the ownership guard. The ledger
//! journals an `AssetReceived` event for every accepted receipt, so a deposit
//! that is later rolled back leaves nothing behind.

use assetbox_types::asset::{AssetKind, AssetReference};
use assetbox_types::ids::{Address, TokenId};
use assetbox_types::units::Amount;

use crate::vault::AssetBox;

/// Four-byte value a receiver returns to accept a transfer.
pub type Acknowledgement = [u8; 4];

/// Accepts a single non-fungible unit.
pub const NON_FUNGIBLE_RECEIVED: Acknowledgement = [0x15, 0x0b, 0x7a, 0x02];

/// Accepts a single semi-fungible id.
pub const SEMI_FUNGIBLE_RECEIVED: Acknowledgement = [0xf2, 0x3a, 0x6e, 0x61];

/// Accepts a batch of semi-fungible ids.
pub const SEMI_FUNGIBLE_BATCH_RECEIVED: Acknowledgement = [0xbc, 0x19, 0x7c, 0x81];

/// Notification of an incoming transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Receipt {
    Native {
        from: Address,
        amount: Amount,
    },
    NonFungible {
        token: Address,
        operator: Address,
        from: Address,
        id: TokenId,
        data: Vec<u8>,
    },
    SemiFungible {
        token: Address,
        operator: Address,
        from: Address,
        id: TokenId,
        amount: Amount,
        data: Vec<u8>,
    },
    SemiFungibleBatch {
        token: Address,
        operator: Address,
        from: Address,
        ids: Vec<TokenId>,
        amounts: Vec<Amount>,
        data: Vec<u8>,
    },
}

impl Receipt {
    /// The asset-kind tag this receipt dispatches on.
    pub fn kind(&self) -> AssetKind {
        match self {
            Receipt::Native { .. } => AssetKind::Native,
            Receipt::NonFungible { .. } => AssetKind::NonFungible,
            Receipt::SemiFungible { .. } | Receipt::SemiFungibleBatch { .. } => {
                AssetKind::SemiFungible
            }
        }
    }

    /// Previous holder of the incoming assets.
    pub fn from(&self) -> Address {
        match self {
            Receipt::Native { from, .. }
            | Receipt::NonFungible { from, .. }
            | Receipt::SemiFungible { from, .. }
            | Receipt::SemiFungibleBatch { from, .. } => *from,
        }
    }

    /// The acknowledgement the ledger requires, if any.
    pub fn expected_acknowledgement(&self) -> Option<Acknowledgement> {
        match self {
            Receipt::Native { .. } => None,
            Receipt::NonFungible { .. } => Some(NON_FUNGIBLE_RECEIVED),
            Receipt::SemiFungible { .. } => Some(SEMI_FUNGIBLE_RECEIVED),
            Receipt::SemiFungibleBatch { .. } => Some(SEMI_FUNGIBLE_BATCH_RECEIVED),
        }
    }

    /// The assets this receipt delivers.
    pub fn asset(&self) -> AssetReference {
        match self {
            Receipt::Native { amount, .. } => AssetReference::native(*amount),
            Receipt::NonFungible { token, id, .. } => AssetReference::non_fungible(*token, *id),
            Receipt::SemiFungible {
                token, id, amount, ..
            } => AssetReference::semi_fungible(*token, *id, *amount),
            Receipt::SemiFungibleBatch {
                token, ids, amounts, ..
            } => AssetReference::semi_fungible_batch(*token, ids.clone(), amounts.clone()),
        }
    }
}

/// A contract able to take delivery of assets.
pub trait TokenReceiver {
    /// Handle an incoming transfer. Returning anything other than
    /// [`Receipt::expected_acknowledgement`] makes the ledger reject an
    /// id-based transfer.
    fn on_received(&self, receipt: &Receipt) -> Option<Acknowledgement>;
}

impl TokenReceiver for AssetBox {
    fn on_received(&self, receipt: &Receipt) -> Option<Acknowledgement> {
        tracing::debug!(
            vault = %self.address(),
            kind = %receipt.kind(),
            from = %receipt.from(),
            "Incoming transfer acknowledged"
        );

        receipt.expected_acknowledgement()
    }
}
