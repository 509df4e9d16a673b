//! Vault — the single-owner AssetBox custody contract
//!
//! Holds native currency, fungible, non-fungible and semi-fungible tokens on
//! behalf of one owner:
//! - Anyone may deposit (see `receiver`)
//! - Only the owner may withdraw (see `withdraw`) or act as the vault (see
//!   `forwarder`)
//! - Balances live in the ledger; the vault never keeps a copy
//!
//! All privileged operations run through [`AssetBox::privileged`], which checks:
//! 1. Ownership (before anything else)
//! 2. Reentrancy guard
//! 3. Ledger savepoint (full rollback on failure)
//!
//! Events raised while the ledger is involved are journaled there and only
//! reach [`AssetBox::events`] once the outermost savepoint commits.

use assetbox_types::ids::Address;
use std::cell::RefCell;
use tracing::{info, warn};

use crate::config::AssetBoxConfig;
use crate::errors::VaultError;
use crate::events::{ContractEvent, OwnershipTransferred};
use crate::ledger::{atomically, EventSink, Ledger};
use crate::security::{Ownable, ReentrancyGuard};

/// Core vault contract managing asset custody for one owner.
#[derive(Debug)]
pub struct AssetBox {
    /// Human-readable name
    name: String,
    /// The vault's own identity on the ledger
    address: Address,
    /// Security: ownership guard
    ownership: Ownable,
    /// Security: reentrancy guard
    reentrancy_guard: ReentrancyGuard,
    /// Committed events log (append-only)
    events: RefCell<Vec<ContractEvent>>,
}

impl AssetBox {
    /// Create a vault from a validated config.
    ///
    /// The vault's address is derived from the config; the config's owner
    /// becomes the initial principal.
    pub fn new(config: AssetBoxConfig) -> Result<Self, VaultError> {
        config.validate()?;
        let address = config.vault_address();
        let ownership = Ownable::new(config.owner)?;

        info!(
            vault = %address,
            owner = %config.owner,
            name = %config.name,
            "AssetBox initialized"
        );

        Ok(Self {
            name: config.name,
            address,
            ownership,
            reentrancy_guard: ReentrancyGuard::new(),
            events: RefCell::new(Vec::new()),
        })
    }

    /// Vault name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The vault's own ledger identity.
    pub fn address(&self) -> Address {
        self.address
    }

    // ───────────────────────── Ownership ─────────────────────────

    /// Current owner. Unrestricted.
    pub fn owner(&self) -> Address {
        self.ownership.owner()
    }

    /// Hand the vault to `new_owner`. Owner-only.
    ///
    /// Rejected while another vault operation is in progress, so a forwarded
    /// call cannot swap the owner underneath its caller.
    pub fn transfer_ownership(
        &self,
        caller: Address,
        new_owner: Address,
    ) -> Result<ContractEvent, VaultError> {
        self.ownership.require_owner(caller)?;
        self.reentrancy_guard.ensure_not_entered()?;

        let previous_owner = self.ownership.transfer_ownership(caller, new_owner)?;

        info!(
            vault = %self.address,
            previous_owner = %previous_owner,
            new_owner = %new_owner,
            "Ownership transferred"
        );

        Ok(self.record(ContractEvent::OwnershipTransferred(OwnershipTransferred {
            previous_owner,
            new_owner,
        })))
    }

    // ───────────────────────── Events ─────────────────────────

    /// Snapshot of all committed events.
    pub fn events(&self) -> Vec<ContractEvent> {
        self.events.borrow().clone()
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&self) -> Vec<ContractEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    fn record(&self, event: ContractEvent) -> ContractEvent {
        self.events.borrow_mut().push(event.clone());
        event
    }

    // ───────────────────────── Internal Guards ─────────────────────────

    /// Run an owner-only operation.
    ///
    /// `op` receives the ledger and the (verified) owner. On failure every
    /// ledger effect and every event journaled since entry is discarded.
    pub(crate) fn privileged<T>(
        &self,
        ledger: &mut dyn Ledger,
        caller: Address,
        operation: &'static str,
        op: impl FnOnce(&mut dyn Ledger, Address) -> Result<T, VaultError>,
    ) -> Result<T, VaultError> {
        self.ownership.require_owner(caller)?;
        let _lock = self.reentrancy_guard.enter()?;

        let result = atomically(ledger, |ledger| op(ledger, caller));

        if let Err(err) = &result {
            warn!(
                vault = %self.address,
                operation,
                error = %err,
                "Vault operation rolled back"
            );
        }
        result
    }
}

impl EventSink for AssetBox {
    fn publish(&self, event: ContractEvent) {
        self.record(event);
    }
}
