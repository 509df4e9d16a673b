//! Shared security primitives for the vault
//!
//! Provides the ownership guard consulted by every privileged operation and
//! the reentrancy guard held across operations that call out to the ledger.
//!
//! Both use interior mutability: the vault is shared (`Rc`) with the ledger
//! that calls its receive hooks, so its operations take `&self`.

use assetbox_types::ids::Address;
use std::cell::Cell;

use crate::errors::VaultError;

/// Single-principal ownership guard.
///
/// Exactly one owner exists at any time and it is never the zero address.
#[derive(Debug)]
pub struct Ownable {
    owner: Cell<Address>,
}

impl Ownable {
    /// Create the guard with its initial owner.
    pub fn new(owner: Address) -> Result<Self, VaultError> {
        if owner.is_zero() {
            return Err(VaultError::InvalidOwner { owner });
        }
        Ok(Self {
            owner: Cell::new(owner),
        })
    }

    /// Current owner. Unrestricted.
    pub fn owner(&self) -> Address {
        self.owner.get()
    }

    /// Fail with `Unauthorized` unless `caller` is the current owner.
    pub fn require_owner(&self, caller: Address) -> Result<(), VaultError> {
        if caller != self.owner.get() {
            return Err(VaultError::Unauthorized { caller });
        }
        Ok(())
    }

    /// Replace the owner. Returns the previous owner.
    ///
    /// The replacement is a single store, so the old owner loses authority in
    /// the same step the new one gains it.
    pub fn transfer_ownership(
        &self,
        caller: Address,
        new_owner: Address,
    ) -> Result<Address, VaultError> {
        self.require_owner(caller)?;
        if new_owner.is_zero() {
            return Err(VaultError::InvalidOwner { owner: new_owner });
        }
        Ok(self.owner.replace(new_owner))
    }
}

/// Reentrancy guard preventing nested calls into protected functions.
///
/// A vault operation enters the guard before touching the ledger and leaves
/// it on completion. Any nested attempt while entered fails.
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    locked: Cell<bool>,
}

impl ReentrancyGuard {
    /// Create a new unlocked guard.
    pub fn new() -> Self {
        Self {
            locked: Cell::new(false),
        }
    }

    /// Acquire the guard. Returns `true` if successfully acquired.
    /// Returns `false` if already locked (reentrancy attempt).
    pub fn acquire(&self) -> bool {
        !self.locked.replace(true)
    }

    /// Release the guard.
    pub fn release(&self) {
        self.locked.set(false);
    }

    /// Check if currently locked.
    pub fn is_locked(&self) -> bool {
        self.locked.get()
    }

    /// Acquire the guard for the lifetime of the returned lock.
    pub fn enter(&self) -> Result<ReentrancyLock<'_>, VaultError> {
        if !self.acquire() {
            tracing::warn!("Nested entry into guarded vault operation rejected");
            return Err(VaultError::Reentrancy);
        }
        Ok(ReentrancyLock { guard: self })
    }

    /// Fail with `Reentrancy` if the guard is currently held.
    pub fn ensure_not_entered(&self) -> Result<(), VaultError> {
        if self.is_locked() {
            tracing::warn!("Guarded state change attempted during vault operation");
            return Err(VaultError::Reentrancy);
        }
        Ok(())
    }
}

/// Releases its [`ReentrancyGuard`] when dropped, on every exit path.
#[derive(Debug)]
pub struct ReentrancyLock<'a> {
    guard: &'a ReentrancyGuard,
}

impl Drop for ReentrancyLock<'_> {
    fn drop(&mut self) {
        self.guard.release();
    }
}
