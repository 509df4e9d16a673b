//! Call forwarder — owner-only "act as the vault"
//!
//! Instead of a dedicated code path per external protocol (wrapping currency,
//! approvals, staking, ...), the vault exposes a single primitive: invoke any
//! target with an opaque payload, optionally attaching native currency, with
//! the vault's own address as the caller.
//!
//! This makes the owner fully trusted over everything the vault holds. There
//! is no target whitelist at this layer.

use assetbox_types::ids::Address;
use assetbox_types::units::Amount;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::VaultError;
use crate::events::{ContractCalled, ContractEvent};
use crate::ledger::{CallContext, Ledger};
use crate::vault::AssetBox;

/// A call the owner asks the vault to make.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalCall {
    /// Contract to invoke
    pub target: Address,
    /// Opaque bytes; never interpreted by the vault
    pub payload: Vec<u8>,
    /// Native units taken from the vault's balance and sent along
    pub value: Amount,
}

impl ExternalCall {
    pub fn new(target: Address, payload: Vec<u8>) -> Self {
        Self {
            target,
            payload,
            value: 0,
        }
    }

    pub fn with_value(mut self, value: Amount) -> Self {
        self.value = value;
        self
    }
}

impl AssetBox {
    /// Invoke `call.target` as the vault. Owner-only.
    ///
    /// Returns the target's raw result. Any failure of the target rolls back
    /// the whole call, attached value included.
    pub fn call_contract(
        &self,
        ledger: &mut dyn Ledger,
        caller: Address,
        call: ExternalCall,
    ) -> Result<Vec<u8>, VaultError> {
        self.privileged(ledger, caller, "call_contract", |ledger, _owner| {
            self.forward(ledger, &call)
        })
    }

    /// Invoke `target` as the vault, forwarding `attached` native units the
    /// owner sends along with this call. Owner-only.
    ///
    /// The attached funds pass owner → vault → target in one atomic step.
    pub fn call_contract_payable(
        &self,
        ledger: &mut dyn Ledger,
        caller: Address,
        attached: Amount,
        target: Address,
        payload: Vec<u8>,
    ) -> Result<Vec<u8>, VaultError> {
        let call = ExternalCall::new(target, payload).with_value(attached);
        self.privileged(ledger, caller, "call_contract_payable", |ledger, owner| {
            ledger.transfer_native(owner, self.address(), attached)?;
            self.forward(ledger, &call)
        })
    }

    fn forward(&self, ledger: &mut dyn Ledger, call: &ExternalCall) -> Result<Vec<u8>, VaultError> {
        let ctx = CallContext {
            caller: self.address(),
            target: call.target,
            value: call.value,
        };
        let result = ledger.call(ctx, &call.payload)?;

        info!(
            vault = %self.address(),
            target = %call.target,
            value = %call.value,
            payload_len = call.payload.len(),
            result_len = result.len(),
            "Forwarded call completed"
        );

        ledger.emit(
            self.address(),
            ContractEvent::ContractCalled(ContractCalled {
                target: call.target,
                value: call.value,
                payload_len: call.payload.len(),
                result_len: result.len(),
            }),
        );
        Ok(result)
    }
}
