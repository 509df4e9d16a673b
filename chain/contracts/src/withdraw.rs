//! Withdraw engine — owner-only release of held assets
//!
//! One operation per asset kind plus a semi-fungible batch variant. Each one
//! moves assets from the vault to the current owner and nowhere else.
//!
//! Amount semantics for native and fungible withdrawals:
//! - `None` or `Some(0)` withdraws the whole ledger-reported balance
//! - `Some(n)` withdraws exactly `n`, failing if the vault holds less

use assetbox_types::asset::AssetReference;
use assetbox_types::ids::{Address, TokenId};
use assetbox_types::units::Amount;
use tracing::info;
use uuid::Uuid;

use crate::errors::VaultError;
use crate::events::{ContractEvent, Withdrawn};
use crate::ledger::Ledger;
use crate::vault::AssetBox;

/// `None` means "everything": an explicit zero is treated the same way.
fn requested(amount: Option<Amount>) -> Option<Amount> {
    amount.filter(|amount| *amount > 0)
}

impl AssetBox {
    /// Withdraw native currency to the owner. Owner-only.
    pub fn withdraw(
        &self,
        ledger: &mut dyn Ledger,
        caller: Address,
        amount: Option<Amount>,
    ) -> Result<ContractEvent, VaultError> {
        self.privileged(ledger, caller, "withdraw", |ledger, owner| {
            let amount =
                requested(amount).unwrap_or_else(|| ledger.native_balance(self.address()));
            ledger.transfer_native(self.address(), owner, amount)?;
            Ok(self.release(ledger, AssetReference::native(amount), owner))
        })
    }

    /// Withdraw a fungible token to the owner. Owner-only.
    pub fn withdraw_erc20(
        &self,
        ledger: &mut dyn Ledger,
        caller: Address,
        token: Address,
        amount: Option<Amount>,
    ) -> Result<ContractEvent, VaultError> {
        self.privileged(ledger, caller, "withdraw_erc20", |ledger, owner| {
            let amount = requested(amount)
                .unwrap_or_else(|| ledger.fungible_balance(token, self.address()));
            ledger.transfer_fungible(token, self.address(), owner, amount)?;
            Ok(self.release(ledger, AssetReference::fungible(token, amount), owner))
        })
    }

    /// Withdraw one non-fungible unit to the owner. Owner-only.
    ///
    /// Fails if the vault is not the current holder of `id`.
    pub fn withdraw_erc721(
        &self,
        ledger: &mut dyn Ledger,
        caller: Address,
        token: Address,
        id: TokenId,
        data: &[u8],
    ) -> Result<ContractEvent, VaultError> {
        self.privileged(ledger, caller, "withdraw_erc721", |ledger, owner| {
            ledger.safe_transfer_non_fungible(
                token,
                self.address(),
                self.address(),
                owner,
                id,
                data,
            )?;
            Ok(self.release(ledger, AssetReference::non_fungible(token, id), owner))
        })
    }

    /// Withdraw a quantity of one semi-fungible id to the owner. Owner-only.
    pub fn withdraw_erc1155(
        &self,
        ledger: &mut dyn Ledger,
        caller: Address,
        token: Address,
        id: TokenId,
        amount: Amount,
        data: &[u8],
    ) -> Result<ContractEvent, VaultError> {
        self.privileged(ledger, caller, "withdraw_erc1155", |ledger, owner| {
            ledger.safe_transfer_semi_fungible(
                token,
                self.address(),
                self.address(),
                owner,
                id,
                amount,
                data,
            )?;
            Ok(self.release(ledger, AssetReference::semi_fungible(token, id, amount), owner))
        })
    }

    /// Withdraw several semi-fungible id/amount pairs in one step. Owner-only.
    ///
    /// `ids` and `amounts` are parallel; unequal lengths fail before any
    /// transfer. Ids not listed stay in the vault.
    pub fn withdraw_erc1155_batch(
        &self,
        ledger: &mut dyn Ledger,
        caller: Address,
        token: Address,
        ids: &[TokenId],
        amounts: &[Amount],
        data: &[u8],
    ) -> Result<ContractEvent, VaultError> {
        self.privileged(ledger, caller, "withdraw_erc1155_batch", |ledger, owner| {
            if ids.len() != amounts.len() {
                return Err(VaultError::ArrayLengthMismatch {
                    ids: ids.len(),
                    amounts: amounts.len(),
                });
            }
            ledger.safe_batch_transfer_semi_fungible(
                token,
                self.address(),
                self.address(),
                owner,
                ids,
                amounts,
                data,
            )?;
            Ok(self.release(
                ledger,
                AssetReference::semi_fungible_batch(token, ids.to_vec(), amounts.to_vec()),
                owner,
            ))
        })
    }

    /// Journal the completion signal of a withdrawal.
    fn release(
        &self,
        ledger: &mut dyn Ledger,
        asset: AssetReference,
        to: Address,
    ) -> ContractEvent {
        let receipt_id = Uuid::now_v7();
        info!(
            vault = %self.address(),
            %receipt_id,
            asset = %asset,
            to = %to,
            "Assets withdrawn"
        );
        let event = ContractEvent::Withdrawn(Withdrawn {
            receipt_id,
            asset,
            to,
        });
        ledger.emit(self.address(), event.clone());
        event
    }
}
