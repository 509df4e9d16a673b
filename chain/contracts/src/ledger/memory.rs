//! In-memory reference ledger
//!
//! A complete, single-process [`Ledger`] used to exercise the vault and to
//! bootstrap it from the deploy tool:
//! - Balances for all four asset kinds, keyed by token contract and holder
//! - Safe transfers that consult registered [`TokenReceiver`]s
//! - Generic call dispatch to registered [`ExternalContract`]s
//! - Nested savepoints by state snapshot, event journal included
//!
//! Approvals are not modelled: the operator of an id-based transfer must be
//! the holder itself.

use assetbox_types::ids::{Address, TokenId};
use assetbox_types::units::Amount;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;
use tracing::{debug, info};

use super::{CallContext, Checkpoint, EventSink, Ledger};
use crate::config::AssetBoxConfig;
use crate::errors::{LedgerError, VaultError};
use crate::events::{AssetReceived, ContractEvent};
use crate::receiver::{Receipt, TokenReceiver};
use crate::vault::AssetBox;

/// A contract living on the in-memory ledger.
///
/// `ctx.value` has already been credited to `ctx.target` when `invoke` runs.
/// Returning an error reverts the value transfer and every effect made by
/// the invocation.
pub trait ExternalContract {
    fn invoke(
        &self,
        ledger: &mut MemoryLedger,
        ctx: CallContext,
        payload: &[u8],
    ) -> Result<Vec<u8>, LedgerError>;
}

#[derive(Debug, Clone, Default)]
struct LedgerState {
    /// holder -> amount
    native: HashMap<Address, Amount>,
    /// (token, holder) -> amount
    fungible: HashMap<(Address, Address), Amount>,
    /// (token, id) -> holder
    non_fungible: HashMap<(Address, TokenId), Address>,
    /// (token, holder, id) -> amount
    semi_fungible: HashMap<(Address, Address, TokenId), Amount>,
    /// Events awaiting the outermost commit, in emission order
    journal: Vec<(Address, ContractEvent)>,
}

/// Single-process ledger with snapshot-based savepoints.
#[derive(Default)]
pub struct MemoryLedger {
    state: LedgerState,
    savepoints: Vec<LedgerState>,
    contracts: HashMap<Address, Rc<dyn ExternalContract>>,
    receivers: HashMap<Address, Rc<dyn TokenReceiver>>,
    sinks: HashMap<Address, Rc<dyn EventSink>>,
}

impl fmt::Debug for MemoryLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryLedger")
            .field("state", &self.state)
            .field("savepoints", &self.savepoints.len())
            .field("contracts", &self.contracts.len())
            .field("receivers", &self.receivers.len())
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    // ───────────────────────── Registration ─────────────────────────

    /// Install a contract that `call` dispatches to.
    pub fn deploy_contract(&mut self, address: Address, contract: Rc<dyn ExternalContract>) {
        self.contracts.insert(address, contract);
    }

    /// Register the hooks notified when assets land on `address`.
    pub fn register_receiver(&mut self, address: Address, receiver: Rc<dyn TokenReceiver>) {
        self.receivers.insert(address, receiver);
    }

    /// Route the events journaled for `address` to `sink`.
    pub fn register_sink(&mut self, address: Address, sink: Rc<dyn EventSink>) {
        self.sinks.insert(address, sink);
    }

    /// Whether anything is already installed at `address`.
    pub fn is_occupied(&self, address: Address) -> bool {
        self.contracts.contains_key(&address)
            || self.receivers.contains_key(&address)
            || self.sinks.contains_key(&address)
    }

    /// Instantiate a vault at its derived address and register its receive
    /// hooks and event log.
    ///
    /// Fails if the derived address is already taken.
    pub fn deploy_asset_box(&mut self, config: AssetBoxConfig) -> Result<Rc<AssetBox>, VaultError> {
        let address = config.vault_address();
        if self.is_occupied(address) {
            return Err(VaultError::InvalidConfig {
                reason: format!("address {} is already in use", address),
            });
        }
        let vault = Rc::new(AssetBox::new(config)?);
        self.register_receiver(address, vault.clone());
        self.register_sink(address, vault.clone());
        info!(vault = %vault.address(), owner = %vault.owner(), "AssetBox deployed");
        Ok(vault)
    }

    /// Current savepoint nesting depth.
    pub fn checkpoint_depth(&self) -> usize {
        self.savepoints.len()
    }

    // ───────────────────────── Minting ─────────────────────────

    pub fn mint_native(&mut self, to: Address, amount: Amount) -> Result<(), LedgerError> {
        credit(&mut self.state.native, to, amount)
    }

    pub fn mint_fungible(
        &mut self,
        token: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        credit(&mut self.state.fungible, (token, to), amount)
    }

    pub fn burn_fungible(
        &mut self,
        token: Address,
        from: Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        debit(&mut self.state.fungible, (token, from), amount, || {
            format!("fungible {}", token)
        })
    }

    pub fn mint_non_fungible(
        &mut self,
        token: Address,
        to: Address,
        id: TokenId,
    ) -> Result<(), LedgerError> {
        if self.state.non_fungible.contains_key(&(token, id)) {
            return Err(LedgerError::Rejected {
                recipient: to,
                reason: format!("{}#{} already minted", token, id),
            });
        }
        self.state.non_fungible.insert((token, id), to);
        Ok(())
    }

    pub fn mint_semi_fungible(
        &mut self,
        token: Address,
        to: Address,
        id: TokenId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        credit(&mut self.state.semi_fungible, (token, to, id), amount)
    }

    // ───────────────────────── Internals ─────────────────────────

    fn atomic<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<T, LedgerError>,
    ) -> Result<T, LedgerError> {
        let checkpoint = self.checkpoint();
        match op(self) {
            Ok(value) => {
                self.commit(checkpoint);
                Ok(value)
            }
            Err(err) => {
                self.revert_to(checkpoint);
                Err(err)
            }
        }
    }

    fn move_native(&mut self, from: Address, to: Address, amount: Amount) -> Result<(), LedgerError> {
        debit(&mut self.state.native, from, amount, || "native".to_string())?;
        credit(&mut self.state.native, to, amount)
    }

    /// Hand `receipt` to the receiver at `to`, if any, and check its answer.
    ///
    /// A deployed contract without receive hooks cannot take id-based assets.
    /// An accepted receipt is journaled as an `AssetReceived` event for `to`.
    fn notify(&mut self, to: Address, receipt: Receipt) -> Result<(), LedgerError> {
        let kind = receipt.kind();
        let receiver = match self.receivers.get(&to).cloned() {
            Some(receiver) => receiver,
            None if kind.requires_acknowledgement() && self.contracts.contains_key(&to) => {
                return Err(LedgerError::Rejected {
                    recipient: to,
                    reason: "contract has no receive hooks".to_string(),
                });
            }
            None => return Ok(()),
        };

        let acknowledgement = receiver.on_received(&receipt);
        if kind.requires_acknowledgement() && acknowledgement != receipt.expected_acknowledgement()
        {
            debug!(recipient = %to, kind = %kind, "Receiver did not acknowledge");
            return Err(LedgerError::Rejected {
                recipient: to,
                reason: "missing acknowledgement".to_string(),
            });
        }

        self.emit(
            to,
            ContractEvent::AssetReceived(AssetReceived {
                kind,
                from: receipt.from(),
                asset: receipt.asset(),
            }),
        );
        Ok(())
    }

    /// Deliver every journaled event once no savepoint remains open.
    fn flush_journal(&mut self) {
        if !self.savepoints.is_empty() {
            return;
        }
        for (emitter, event) in std::mem::take(&mut self.state.journal) {
            if let Some(sink) = self.sinks.get(&emitter).cloned() {
                sink.publish(event);
            }
        }
    }

    fn check_operator(operator: Address, from: Address, asset: String) -> Result<(), LedgerError> {
        if operator != from {
            return Err(LedgerError::NotHolder {
                asset,
                holder: operator,
            });
        }
        Ok(())
    }
}

fn credit<K: Eq + Hash>(
    map: &mut HashMap<K, Amount>,
    key: K,
    amount: Amount,
) -> Result<(), LedgerError> {
    let current = map.entry(key).or_insert(0);
    *current = current.checked_add(amount).ok_or(LedgerError::Overflow)?;
    Ok(())
}

fn debit<K: Eq + Hash>(
    map: &mut HashMap<K, Amount>,
    key: K,
    amount: Amount,
    asset: impl FnOnce() -> String,
) -> Result<(), LedgerError> {
    let available = map.get(&key).copied().unwrap_or(0);
    if available < amount {
        return Err(LedgerError::InsufficientBalance {
            asset: asset(),
            required: amount,
            available,
        });
    }
    if available == amount {
        map.remove(&key);
    } else {
        map.insert(key, available - amount);
    }
    Ok(())
}

impl Ledger for MemoryLedger {
    fn native_balance(&self, holder: Address) -> Amount {
        self.state.native.get(&holder).copied().unwrap_or(0)
    }

    fn transfer_native(
        &mut self,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.atomic(|ledger| {
            ledger.move_native(from, to, amount)?;
            ledger.notify(to, Receipt::Native { from, amount })
        })
    }

    fn fungible_balance(&self, token: Address, holder: Address) -> Amount {
        self.state
            .fungible
            .get(&(token, holder))
            .copied()
            .unwrap_or(0)
    }

    fn transfer_fungible(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.atomic(|ledger| {
            debit(&mut ledger.state.fungible, (token, from), amount, || {
                format!("fungible {}", token)
            })?;
            credit(&mut ledger.state.fungible, (token, to), amount)
        })
    }

    fn owner_of(&self, token: Address, id: TokenId) -> Option<Address> {
        self.state.non_fungible.get(&(token, id)).copied()
    }

    fn safe_transfer_non_fungible(
        &mut self,
        token: Address,
        operator: Address,
        from: Address,
        to: Address,
        id: TokenId,
        data: &[u8],
    ) -> Result<(), LedgerError> {
        let asset = format!("non-fungible {}#{}", token, id);
        Self::check_operator(operator, from, asset.clone())?;
        if self.owner_of(token, id) != Some(from) {
            return Err(LedgerError::NotHolder {
                asset,
                holder: from,
            });
        }

        self.atomic(|ledger| {
            ledger.state.non_fungible.insert((token, id), to);
            ledger.notify(
                to,
                Receipt::NonFungible {
                    token,
                    operator,
                    from,
                    id,
                    data: data.to_vec(),
                },
            )
        })
    }

    fn semi_fungible_balance(&self, token: Address, holder: Address, id: TokenId) -> Amount {
        self.state
            .semi_fungible
            .get(&(token, holder, id))
            .copied()
            .unwrap_or(0)
    }

    fn safe_transfer_semi_fungible(
        &mut self,
        token: Address,
        operator: Address,
        from: Address,
        to: Address,
        id: TokenId,
        amount: Amount,
        data: &[u8],
    ) -> Result<(), LedgerError> {
        Self::check_operator(operator, from, format!("semi-fungible {}#{}", token, id))?;

        self.atomic(|ledger| {
            debit(&mut ledger.state.semi_fungible, (token, from, id), amount, || {
                format!("semi-fungible {}#{}", token, id)
            })?;
            credit(&mut ledger.state.semi_fungible, (token, to, id), amount)?;
            ledger.notify(
                to,
                Receipt::SemiFungible {
                    token,
                    operator,
                    from,
                    id,
                    amount,
                    data: data.to_vec(),
                },
            )
        })
    }

    fn safe_batch_transfer_semi_fungible(
        &mut self,
        token: Address,
        operator: Address,
        from: Address,
        to: Address,
        ids: &[TokenId],
        amounts: &[Amount],
        data: &[u8],
    ) -> Result<(), LedgerError> {
        if ids.len() != amounts.len() {
            return Err(LedgerError::LengthMismatch {
                ids: ids.len(),
                amounts: amounts.len(),
            });
        }
        Self::check_operator(operator, from, format!("semi-fungible {}", token))?;

        self.atomic(|ledger| {
            for (&id, &amount) in ids.iter().zip(amounts) {
                debit(&mut ledger.state.semi_fungible, (token, from, id), amount, || {
                    format!("semi-fungible {}#{}", token, id)
                })?;
                credit(&mut ledger.state.semi_fungible, (token, to, id), amount)?;
            }
            ledger.notify(
                to,
                Receipt::SemiFungibleBatch {
                    token,
                    operator,
                    from,
                    ids: ids.to_vec(),
                    amounts: amounts.to_vec(),
                    data: data.to_vec(),
                },
            )
        })
    }

    fn call(&mut self, ctx: CallContext, payload: &[u8]) -> Result<Vec<u8>, LedgerError> {
        self.atomic(|ledger| {
            ledger.move_native(ctx.caller, ctx.target, ctx.value)?;

            let contract = match ledger.contracts.get(&ctx.target).cloned() {
                Some(contract) => contract,
                None => {
                    if ctx.value > 0 {
                        ledger.notify(
                            ctx.target,
                            Receipt::Native {
                                from: ctx.caller,
                                amount: ctx.value,
                            },
                        )?;
                    }
                    return Ok(Vec::new());
                }
            };

            debug!(
                caller = %ctx.caller,
                target = %ctx.target,
                payload_len = payload.len(),
                "Dispatching call"
            );

            contract
                .invoke(ledger, ctx, payload)
                .map_err(|err| match err {
                    LedgerError::Reverted { .. } => err,
                    other => LedgerError::Reverted {
                        target: ctx.target,
                        reason: other.to_string(),
                        data: Vec::new(),
                    },
                })
        })
    }

    fn emit(&mut self, emitter: Address, event: ContractEvent) {
        self.state.journal.push((emitter, event));
        self.flush_journal();
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.savepoints.push(self.state.clone());
        Checkpoint(self.savepoints.len() - 1)
    }

    fn commit(&mut self, checkpoint: Checkpoint) {
        self.savepoints.truncate(checkpoint.0);
        self.flush_journal();
    }

    fn revert_to(&mut self, checkpoint: Checkpoint) {
        self.savepoints.truncate(checkpoint.0 + 1);
        if let Some(saved) = self.savepoints.pop() {
            self.state = saved;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receiver::NON_FUNGIBLE_RECEIVED;

    const NFT: Address = Address::from_low_u64(0x721);
    const MULTI: Address = Address::from_low_u64(0x1155);
    const COIN: Address = Address::from_low_u64(0x20);

    fn alice() -> Address {
        Address::from_low_u64(0xa)
    }

    fn bob() -> Address {
        Address::from_low_u64(0xb)
    }

    /// Receiver that acknowledges with a fixed value.
    struct FixedReceiver(Option<[u8; 4]>);

    /// Sink that keeps what it is handed.
    #[derive(Default)]
    struct Collector(std::cell::RefCell<Vec<ContractEvent>>);

    impl EventSink for Collector {
        fn publish(&self, event: ContractEvent) {
            self.0.borrow_mut().push(event);
        }
    }

    fn with_collector(ledger: &mut MemoryLedger, address: Address) -> Rc<Collector> {
        let collector = Rc::new(Collector::default());
        ledger.register_receiver(address, Rc::new(FixedReceiver(None)));
        ledger.register_sink(address, collector.clone());
        collector
    }

    impl TokenReceiver for FixedReceiver {
        fn on_received(&self, _receipt: &Receipt) -> Option<[u8; 4]> {
            self.0
        }
    }

    #[test]
    fn test_native_transfer() {
        let mut ledger = MemoryLedger::new();
        ledger.mint_native(alice(), 10).unwrap();
        ledger.transfer_native(alice(), bob(), 3).unwrap();
        assert_eq!(ledger.native_balance(alice()), 7);
        assert_eq!(ledger.native_balance(bob()), 3);
    }

    #[test]
    fn test_native_transfer_insufficient() {
        let mut ledger = MemoryLedger::new();
        ledger.mint_native(alice(), 1).unwrap();
        let result = ledger.transfer_native(alice(), bob(), 2);
        assert_eq!(
            result,
            Err(LedgerError::InsufficientBalance {
                asset: "native".to_string(),
                required: 2,
                available: 1,
            })
        );
    }

    #[test]
    fn test_mint_overflow() {
        let mut ledger = MemoryLedger::new();
        ledger.mint_native(alice(), u128::MAX).unwrap();
        assert_eq!(ledger.mint_native(alice(), 1), Err(LedgerError::Overflow));
        assert_eq!(ledger.native_balance(alice()), u128::MAX);
    }

    #[test]
    fn test_fungible_transfer_and_burn() {
        let mut ledger = MemoryLedger::new();
        ledger.mint_fungible(COIN, alice(), 100).unwrap();
        ledger.transfer_fungible(COIN, alice(), bob(), 40).unwrap();
        ledger.burn_fungible(COIN, bob(), 10).unwrap();
        assert_eq!(ledger.fungible_balance(COIN, alice()), 60);
        assert_eq!(ledger.fungible_balance(COIN, bob()), 30);
    }

    #[test]
    fn test_non_fungible_requires_holder() {
        let mut ledger = MemoryLedger::new();
        ledger.mint_non_fungible(NFT, alice(), TokenId::new(1)).unwrap();
        let result =
            ledger.safe_transfer_non_fungible(NFT, bob(), bob(), alice(), TokenId::new(1), &[]);
        assert!(matches!(result, Err(LedgerError::NotHolder { .. })));
        assert_eq!(ledger.owner_of(NFT, TokenId::new(1)), Some(alice()));
    }

    #[test]
    fn test_double_mint_rejected() {
        let mut ledger = MemoryLedger::new();
        ledger.mint_non_fungible(NFT, alice(), TokenId::new(1)).unwrap();
        assert!(ledger.mint_non_fungible(NFT, bob(), TokenId::new(1)).is_err());
    }

    #[test]
    fn test_receiver_acknowledgement_accepted() {
        let mut ledger = MemoryLedger::new();
        ledger.register_receiver(bob(), Rc::new(FixedReceiver(Some(NON_FUNGIBLE_RECEIVED))));
        ledger.mint_non_fungible(NFT, alice(), TokenId::new(7)).unwrap();
        ledger
            .safe_transfer_non_fungible(NFT, alice(), alice(), bob(), TokenId::new(7), &[])
            .unwrap();
        assert_eq!(ledger.owner_of(NFT, TokenId::new(7)), Some(bob()));
    }

    #[test]
    fn test_receiver_wrong_acknowledgement_rejected() {
        let mut ledger = MemoryLedger::new();
        ledger.register_receiver(bob(), Rc::new(FixedReceiver(Some([0, 0, 0, 0]))));
        ledger.mint_non_fungible(NFT, alice(), TokenId::new(7)).unwrap();
        let result =
            ledger.safe_transfer_non_fungible(NFT, alice(), alice(), bob(), TokenId::new(7), &[]);
        assert!(matches!(result, Err(LedgerError::Rejected { .. })));
        assert_eq!(ledger.owner_of(NFT, TokenId::new(7)), Some(alice()));
    }

    #[test]
    fn test_native_ignores_acknowledgement() {
        let mut ledger = MemoryLedger::new();
        ledger.register_receiver(bob(), Rc::new(FixedReceiver(None)));
        ledger.mint_native(alice(), 5).unwrap();
        ledger.transfer_native(alice(), bob(), 5).unwrap();
        assert_eq!(ledger.native_balance(bob()), 5);
    }

    #[test]
    fn test_batch_rejected_by_receiver_is_undone() {
        let mut ledger = MemoryLedger::new();
        ledger.register_receiver(bob(), Rc::new(FixedReceiver(None)));
        ledger
            .mint_semi_fungible(MULTI, alice(), TokenId::new(1), 10)
            .unwrap();
        let result = ledger.safe_batch_transfer_semi_fungible(
            MULTI,
            alice(),
            alice(),
            bob(),
            &[TokenId::new(1)],
            &[10],
            &[],
        );
        assert!(matches!(result, Err(LedgerError::Rejected { .. })));
        assert_eq!(ledger.semi_fungible_balance(MULTI, alice(), TokenId::new(1)), 10);
        assert_eq!(ledger.semi_fungible_balance(MULTI, bob(), TokenId::new(1)), 0);
    }

    #[test]
    fn test_batch_length_mismatch() {
        let mut ledger = MemoryLedger::new();
        let result = ledger.safe_batch_transfer_semi_fungible(
            MULTI,
            alice(),
            alice(),
            bob(),
            &[TokenId::new(1), TokenId::new(2)],
            &[1],
            &[],
        );
        assert_eq!(result, Err(LedgerError::LengthMismatch { ids: 2, amounts: 1 }));
    }

    #[test]
    fn test_nested_savepoints() {
        let mut ledger = MemoryLedger::new();
        ledger.mint_native(alice(), 10).unwrap();

        let outer = ledger.checkpoint();
        ledger.transfer_native(alice(), bob(), 1).unwrap();
        let inner = ledger.checkpoint();
        ledger.transfer_native(alice(), bob(), 2).unwrap();
        ledger.revert_to(inner);
        assert_eq!(ledger.native_balance(bob()), 1);
        assert_eq!(ledger.checkpoint_depth(), 1);

        ledger.revert_to(outer);
        assert_eq!(ledger.native_balance(bob()), 0);
        assert_eq!(ledger.checkpoint_depth(), 0);
    }

    #[test]
    fn test_receipt_published_after_top_level_transfer() {
        let mut ledger = MemoryLedger::new();
        let collector = with_collector(&mut ledger, bob());
        ledger.mint_native(alice(), 5).unwrap();
        ledger.transfer_native(alice(), bob(), 5).unwrap();

        let events = collector.0.borrow();
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], ContractEvent::AssetReceived(r) if r.from == alice()));
    }

    #[test]
    fn test_journal_held_until_outermost_commit() {
        let mut ledger = MemoryLedger::new();
        let collector = with_collector(&mut ledger, bob());
        ledger.mint_native(alice(), 5).unwrap();

        let outer = ledger.checkpoint();
        ledger.transfer_native(alice(), bob(), 2).unwrap();
        assert!(collector.0.borrow().is_empty());
        ledger.commit(outer);
        assert_eq!(collector.0.borrow().len(), 1);
    }

    #[test]
    fn test_revert_discards_journaled_receipts() {
        let mut ledger = MemoryLedger::new();
        let collector = with_collector(&mut ledger, bob());
        ledger.mint_native(alice(), 5).unwrap();

        let outer = ledger.checkpoint();
        ledger.transfer_native(alice(), bob(), 2).unwrap();
        ledger.revert_to(outer);
        assert!(collector.0.borrow().is_empty());
        assert_eq!(ledger.native_balance(bob()), 0);

        // Nothing stale is delivered by a later commit either.
        ledger.transfer_native(alice(), bob(), 1).unwrap();
        assert_eq!(collector.0.borrow().len(), 1);
    }

    #[test]
    fn test_deploy_same_config_twice_rejected() {
        let mut ledger = MemoryLedger::new();
        let config = AssetBoxConfig::new(alice());
        let first = ledger.deploy_asset_box(config.clone()).unwrap();
        let second = ledger.deploy_asset_box(config);
        assert!(matches!(second, Err(VaultError::InvalidConfig { .. })));
        assert!(ledger.is_occupied(first.address()));
    }

    #[test]
    fn test_deploy_over_registered_receiver_rejected() {
        let mut ledger = MemoryLedger::new();
        let config = AssetBoxConfig::new(alice());
        ledger.register_receiver(config.vault_address(), Rc::new(FixedReceiver(None)));
        let result = ledger.deploy_asset_box(config);
        assert!(matches!(result, Err(VaultError::InvalidConfig { .. })));
    }
}
