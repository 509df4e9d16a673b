//! Shared fixtures for the integration suites
//!
//! A funded vault on an in-memory ledger, plus a handful of token and
//! attacker contracts the vault can be pointed at.

#![allow(dead_code)]

use assetbox_contracts::errors::{LedgerError, VaultError};
use assetbox_contracts::ledger::memory::{ExternalContract, MemoryLedger};
use assetbox_contracts::ledger::{CallContext, Ledger};
use assetbox_contracts::{AssetBox, AssetBoxConfig};
use assetbox_types::ids::{Address, TokenId};
use assetbox_types::units::{parse_native, parse_units, Amount};
use std::cell::RefCell;
use std::rc::Rc;

pub const OWNER: Address = Address::from_low_u64(0xa11ce);
pub const DEPOSITOR: Address = Address::from_low_u64(0xde90);
pub const EVE: Address = Address::from_low_u64(0xe7e);

pub const WETH: Address = Address::from_low_u64(0xee);
pub const USDC: Address = Address::from_low_u64(0x05dc);
pub const DAI: Address = Address::from_low_u64(0xda1);
pub const NFT721: Address = Address::from_low_u64(0x721);
pub const NFT1155: Address = Address::from_low_u64(0x1155);

pub const NFT_ID: TokenId = TokenId::new(999);
pub const MULTI_IDS: [TokenId; 3] = [TokenId::new(1), TokenId::new(666), TokenId::new(888)];
pub const MULTI_AMOUNTS: [Amount; 3] = [100, 1_000, 5_000];

pub fn native_funding() -> Amount {
    parse_native("10").unwrap()
}

pub fn usdc_funding() -> Amount {
    parse_units("10000", 6).unwrap()
}

pub fn dai_funding() -> Amount {
    parse_units("20000", 18).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// Contracts
// ═══════════════════════════════════════════════════════════════════

/// Wrapped native currency: `deposit` mints 1:1 against attached value,
/// `withdraw` burns and pays native currency back to the caller.
pub struct WrappedNative;

impl WrappedNative {
    pub fn deposit() -> Vec<u8> {
        b"deposit".to_vec()
    }

    pub fn withdraw(amount: Amount) -> Vec<u8> {
        let mut payload = b"withdraw".to_vec();
        payload.extend_from_slice(&amount.to_be_bytes());
        payload
    }
}

impl ExternalContract for WrappedNative {
    fn invoke(
        &self,
        ledger: &mut MemoryLedger,
        ctx: CallContext,
        payload: &[u8],
    ) -> Result<Vec<u8>, LedgerError> {
        if payload == b"deposit" {
            ledger.mint_fungible(ctx.target, ctx.caller, ctx.value)?;
            return Ok(Vec::new());
        }
        if let Some(amount) = payload.strip_prefix(b"withdraw") {
            let amount = decode_amount(ctx.target, amount)?;
            ledger.burn_fungible(ctx.target, ctx.caller, amount)?;
            ledger.transfer_native(ctx.target, ctx.caller, amount)?;
            return Ok(Vec::new());
        }
        Err(revert(ctx.target, "unknown selector"))
    }
}

/// Non-fungible token contract whose `transfer` performs a safe transfer
/// on behalf of the calling holder.
pub struct NonFungibleToken;

impl NonFungibleToken {
    pub fn transfer(to: Address, id: TokenId) -> Vec<u8> {
        let mut payload = b"transfer".to_vec();
        payload.extend_from_slice(to.as_bytes());
        payload.extend_from_slice(&id.value().to_be_bytes());
        payload
    }
}

impl ExternalContract for NonFungibleToken {
    fn invoke(
        &self,
        ledger: &mut MemoryLedger,
        ctx: CallContext,
        payload: &[u8],
    ) -> Result<Vec<u8>, LedgerError> {
        let args = payload
            .strip_prefix(b"transfer")
            .filter(|args| args.len() == 36)
            .ok_or_else(|| revert(ctx.target, "unknown selector"))?;
        let mut to = [0u8; 20];
        to.copy_from_slice(&args[..20]);
        let id = TokenId::new(decode_amount(ctx.target, &args[20..])?);
        ledger.safe_transfer_non_fungible(
            ctx.target,
            ctx.caller,
            ctx.caller,
            Address::from_bytes(to),
            id,
            &[],
        )?;
        Ok(Vec::new())
    }
}

/// Remembers every call it receives and answers with a fixed result.
#[derive(Default)]
pub struct CallRecorder {
    pub calls: RefCell<Vec<(CallContext, Vec<u8>)>>,
}

impl ExternalContract for CallRecorder {
    fn invoke(
        &self,
        _ledger: &mut MemoryLedger,
        ctx: CallContext,
        payload: &[u8],
    ) -> Result<Vec<u8>, LedgerError> {
        self.calls.borrow_mut().push((ctx, payload.to_vec()));
        Ok(b"recorded".to_vec())
    }
}

/// What a [`Reentrant`] contract tries when invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reentry {
    Withdraw,
    CallContract,
    TransferOwnership,
}

/// Owner-controlled contract that calls back into the vault while the vault
/// is calling it.
pub struct Reentrant {
    pub vault: RefCell<Option<Rc<AssetBox>>>,
    pub reentry: Reentry,
    pub outcome: RefCell<Option<VaultError>>,
}

impl Reentrant {
    pub fn new(reentry: Reentry) -> Self {
        Self {
            vault: RefCell::new(None),
            reentry,
            outcome: RefCell::new(None),
        }
    }
}

impl ExternalContract for Reentrant {
    fn invoke(
        &self,
        ledger: &mut MemoryLedger,
        ctx: CallContext,
        _payload: &[u8],
    ) -> Result<Vec<u8>, LedgerError> {
        let vault = self
            .vault
            .borrow()
            .clone()
            .ok_or_else(|| revert(ctx.target, "vault not set"))?;
        let me = ctx.target;
        let result = match self.reentry {
            Reentry::Withdraw => vault.withdraw(ledger, me, None).map(|_| ()),
            Reentry::CallContract => vault
                .call_contract(
                    ledger,
                    me,
                    assetbox_contracts::ExternalCall::new(me, Vec::new()),
                )
                .map(|_| ()),
            Reentry::TransferOwnership => vault.transfer_ownership(me, EVE).map(|_| ()),
        };
        *self.outcome.borrow_mut() = result.err();
        Ok(Vec::new())
    }
}

fn decode_amount(target: Address, bytes: &[u8]) -> Result<Amount, LedgerError> {
    let bytes: [u8; 16] = bytes
        .try_into()
        .map_err(|_| revert(target, "malformed amount"))?;
    Ok(u128::from_be_bytes(bytes))
}

fn revert(target: Address, reason: &str) -> LedgerError {
    LedgerError::Reverted {
        target,
        reason: reason.to_string(),
        data: Vec::new(),
    }
}

// ═══════════════════════════════════════════════════════════════════
// Setup
// ═══════════════════════════════════════════════════════════════════

/// Empty vault owned by `owner`, with the token contracts deployed.
pub fn setup_with_owner(owner: Address) -> (MemoryLedger, Rc<AssetBox>) {
    let mut ledger = MemoryLedger::new();
    let vault = ledger
        .deploy_asset_box(AssetBoxConfig::new(owner))
        .unwrap();
    ledger.deploy_contract(WETH, Rc::new(WrappedNative));
    ledger.deploy_contract(NFT721, Rc::new(NonFungibleToken));
    (ledger, vault)
}

pub fn setup() -> (MemoryLedger, Rc<AssetBox>) {
    setup_with_owner(OWNER)
}

/// Deposit the standard holdings into `vault` from a third-party depositor:
/// 10 native, 10 000 USDC, 20 000 DAI, NFT #999 and semi-fungible ids
/// 1/666/888.
pub fn fund(ledger: &mut MemoryLedger, vault: &AssetBox) {
    let to = vault.address();

    ledger.mint_native(DEPOSITOR, native_funding()).unwrap();
    ledger
        .transfer_native(DEPOSITOR, to, native_funding())
        .unwrap();

    ledger.mint_fungible(USDC, DEPOSITOR, usdc_funding()).unwrap();
    ledger
        .transfer_fungible(USDC, DEPOSITOR, to, usdc_funding())
        .unwrap();
    ledger.mint_fungible(DAI, DEPOSITOR, dai_funding()).unwrap();
    ledger
        .transfer_fungible(DAI, DEPOSITOR, to, dai_funding())
        .unwrap();

    ledger.mint_non_fungible(NFT721, DEPOSITOR, NFT_ID).unwrap();
    ledger
        .safe_transfer_non_fungible(NFT721, DEPOSITOR, DEPOSITOR, to, NFT_ID, &[])
        .unwrap();

    for (id, amount) in MULTI_IDS.iter().zip(MULTI_AMOUNTS) {
        ledger
            .mint_semi_fungible(NFT1155, DEPOSITOR, *id, amount)
            .unwrap();
    }
    ledger
        .safe_batch_transfer_semi_fungible(
            NFT1155,
            DEPOSITOR,
            DEPOSITOR,
            to,
            &MULTI_IDS,
            &MULTI_AMOUNTS,
            &[],
        )
        .unwrap();
}

pub fn funded() -> (MemoryLedger, Rc<AssetBox>) {
    let (mut ledger, vault) = setup();
    fund(&mut ledger, &vault);
    (ledger, vault)
}
