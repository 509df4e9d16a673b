//! AssetBox deployment
//!
//! Validates the owner taken from the command line (or `MY_WALLET_ADDRESS`),
//! builds the vault config and deploys it onto a fresh in-memory ledger.

pub mod cli;

use anyhow::{bail, Context, Result};
use assetbox_contracts::config::AssetBoxConfig;
use assetbox_contracts::ledger::memory::MemoryLedger;
use assetbox_types::ids::Address;
use serde::Serialize;
use tracing::info;

use cli::DeployArgs;

/// Outcome of a successful deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deployment {
    pub name: String,
    pub address: Address,
    pub owner: Address,
}

/// Parse and check the owner address.
pub fn parse_owner(raw: Option<&str>) -> Result<Address> {
    let raw = match raw.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => bail!("Please set the `MY_WALLET_ADDRESS` environment variable."),
    };
    let owner: Address = raw
        .parse()
        .with_context(|| format!("`{}` is not a valid address.", raw))?;
    if owner.is_zero() {
        bail!("`{}` is the zero address and cannot own a vault.", raw);
    }
    Ok(owner)
}

/// Deploy a vault described by `args`.
pub fn deploy(args: &DeployArgs) -> Result<Deployment> {
    let owner = parse_owner(args.owner.as_deref())?;
    let config = AssetBoxConfig::new(owner)
        .with_name(args.name.clone())
        .with_salt(args.salt);

    let mut ledger = MemoryLedger::new();
    let vault = ledger
        .deploy_asset_box(config)
        .context("AssetBox deployment failed")?;

    info!(vault = %vault.address(), owner = %owner, salt = args.salt, "Deployment complete");

    Ok(Deployment {
        name: vault.name().to_string(),
        address: vault.address(),
        owner: vault.owner(),
    })
}
