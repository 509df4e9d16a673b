//! Ledger — the asset-accounting substrate the vault calls into
//!
//! The vault keeps no balances of its own. Every "how much do I hold" question
//! is a live query against a [`Ledger`], and every movement of assets is a
//! ledger transfer. The ledger enforces its own balance rules; the vault only
//! decides who may ask for a transfer.
//!
//! Atomicity is provided through nested checkpoints: an operation takes a
//! [`Checkpoint`], and either commits it or reverts every effect made since.
//! Events are journaled alongside balances: they reach their [`EventSink`] only
//! once the outermost checkpoint commits, and vanish with a revert.

pub mod memory;

use assetbox_types::ids::{Address, TokenId};
use assetbox_types::units::Amount;

use crate::errors::LedgerError;
use crate::events::ContractEvent;

/// Identity and attached value of a call dispatched through the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    /// The identity the target observes as its caller
    pub caller: Address,
    /// The contract being invoked
    pub target: Address,
    /// Native units moved from `caller` to `target` before the invocation
    pub value: Amount,
}

/// Handle to a ledger savepoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(pub(crate) usize);

/// Destination of the events journaled for one address.
pub trait EventSink {
    /// Take delivery of a committed event.
    fn publish(&self, event: ContractEvent);
}

/// Per-kind balance queries and transfers, generic call dispatch, and
/// savepoints.
///
/// Safe transfers of non-fungible and semi-fungible units into a registered
/// receiver must obtain the receiver's acknowledgement or fail with
/// [`LedgerError::Rejected`] and no effect.
pub trait Ledger {
    // ── Native currency ──

    fn native_balance(&self, holder: Address) -> Amount;

    fn transfer_native(
        &mut self,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), LedgerError>;

    // ── Fungible tokens ──

    fn fungible_balance(&self, token: Address, holder: Address) -> Amount;

    fn transfer_fungible(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), LedgerError>;

    // ── Non-fungible tokens ──

    fn owner_of(&self, token: Address, id: TokenId) -> Option<Address>;

    fn safe_transfer_non_fungible(
        &mut self,
        token: Address,
        operator: Address,
        from: Address,
        to: Address,
        id: TokenId,
        data: &[u8],
    ) -> Result<(), LedgerError>;

    // ── Semi-fungible tokens ──

    fn semi_fungible_balance(&self, token: Address, holder: Address, id: TokenId) -> Amount;

    #[allow(clippy::too_many_arguments)]
    fn safe_transfer_semi_fungible(
        &mut self,
        token: Address,
        operator: Address,
        from: Address,
        to: Address,
        id: TokenId,
        amount: Amount,
        data: &[u8],
    ) -> Result<(), LedgerError>;

    #[allow(clippy::too_many_arguments)]
    fn safe_batch_transfer_semi_fungible(
        &mut self,
        token: Address,
        operator: Address,
        from: Address,
        to: Address,
        ids: &[TokenId],
        amounts: &[Amount],
        data: &[u8],
    ) -> Result<(), LedgerError>;

    // ── Generic calls ──

    /// Move `ctx.value` to `ctx.target` and invoke it with `payload`.
    ///
    /// Returns the target's raw result. A target failure reverts the value
    /// transfer and every effect of the invocation.
    fn call(&mut self, ctx: CallContext, payload: &[u8]) -> Result<Vec<u8>, LedgerError>;

    // ── Events ──

    /// Journal `event` on behalf of `emitter`.
    ///
    /// Published to the emitter's sink when no savepoint remains open;
    /// discarded if an enclosing savepoint reverts.
    fn emit(&mut self, emitter: Address, event: ContractEvent);

    // ── Savepoints ──

    fn checkpoint(&mut self) -> Checkpoint;

    /// Keep every effect since `checkpoint` (and discard nested savepoints).
    fn commit(&mut self, checkpoint: Checkpoint);

    /// Undo every effect since `checkpoint`.
    fn revert_to(&mut self, checkpoint: Checkpoint);
}

/// Run `op` inside a ledger savepoint: commit on success, revert on failure.
pub fn atomically<T, E>(
    ledger: &mut dyn Ledger,
    op: impl FnOnce(&mut dyn Ledger) -> Result<T, E>,
) -> Result<T, E> {
    let checkpoint = ledger.checkpoint();
    match op(&mut *ledger) {
        Ok(value) => {
            ledger.commit(checkpoint);
            Ok(value)
        }
        Err(err) => {
            ledger.revert_to(checkpoint);
            Err(err)
        }
    }
}
