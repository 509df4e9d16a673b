//! Asset kinds and references
//!
//! An [`AssetReference`] names exactly what an operation moves: how much
//! native currency, how much of a fungible token, which non-fungible unit, or
//! which semi-fungible ids and quantities.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::{Address, TokenId};
use crate::units::Amount;

/// The four asset kinds a vault can custody.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    /// Base currency of the ledger; has no contract identity
    Native,
    /// Amount-based token (balance per holder)
    Fungible,
    /// Unique-id token (exactly one holder per id)
    NonFungible,
    /// Id-plus-amount token (quantity per holder per id)
    SemiFungible,
}

impl AssetKind {
    /// Whether transfers of this kind into a contract require an acknowledgement.
    pub fn requires_acknowledgement(&self) -> bool {
        matches!(self, AssetKind::NonFungible | AssetKind::SemiFungible)
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AssetKind::Native => "native",
            AssetKind::Fungible => "fungible",
            AssetKind::NonFungible => "non-fungible",
            AssetKind::SemiFungible => "semi-fungible",
        };
        f.write_str(label)
    }
}

/// What is being moved.
///
/// Semi-fungible references carry parallel `ids` / `amounts`; a single-id
/// transfer is a one-element pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssetReference {
    Native {
        amount: Amount,
    },
    Fungible {
        token: Address,
        amount: Amount,
    },
    NonFungible {
        token: Address,
        id: TokenId,
    },
    SemiFungible {
        token: Address,
        ids: Vec<TokenId>,
        amounts: Vec<Amount>,
    },
}

impl AssetReference {
    pub fn native(amount: Amount) -> Self {
        Self::Native { amount }
    }

    pub fn fungible(token: Address, amount: Amount) -> Self {
        Self::Fungible { token, amount }
    }

    pub fn non_fungible(token: Address, id: TokenId) -> Self {
        Self::NonFungible { token, id }
    }

    pub fn semi_fungible(token: Address, id: TokenId, amount: Amount) -> Self {
        Self::SemiFungible {
            token,
            ids: vec![id],
            amounts: vec![amount],
        }
    }

    pub fn semi_fungible_batch(token: Address, ids: Vec<TokenId>, amounts: Vec<Amount>) -> Self {
        Self::SemiFungible {
            token,
            ids,
            amounts,
        }
    }

    /// The asset-kind tag.
    pub fn kind(&self) -> AssetKind {
        match self {
            Self::Native { .. } => AssetKind::Native,
            Self::Fungible { .. } => AssetKind::Fungible,
            Self::NonFungible { .. } => AssetKind::NonFungible,
            Self::SemiFungible { .. } => AssetKind::SemiFungible,
        }
    }
}

impl fmt::Display for AssetReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native { .. } => write!(f, "native"),
            Self::Fungible { token, .. } => write!(f, "fungible {}", token),
            Self::NonFungible { token, id } => write!(f, "non-fungible {}#{}", token, id),
            Self::SemiFungible { token, ids, .. } if ids.len() == 1 => {
                write!(f, "semi-fungible {}#{}", token, ids[0])
            }
            Self::SemiFungible { token, ids, .. } => {
                write!(f, "semi-fungible {} ({} ids)", token, ids.len())
            }
        }
    }
}
