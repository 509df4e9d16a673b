//! Command-line arguments for `assetbox-deploy`

use assetbox_contracts::config::DEFAULT_NAME;
use clap::Parser;

/// Deploy an AssetBox vault for a single owner.
#[derive(Parser, Debug, Clone)]
#[command(name = "assetbox-deploy", about = "Deploy an AssetBox custody vault", version)]
pub struct DeployArgs {
    /// Owner address (`0x` followed by 40 hex digits).
    #[arg(long, env = "MY_WALLET_ADDRESS")]
    pub owner: Option<String>,

    /// Vault name.
    #[arg(long, env = "ASSET_BOX_NAME", default_value = DEFAULT_NAME)]
    pub name: String,

    /// Distinguishes several vaults deployed for the same owner.
    #[arg(long, env = "ASSET_BOX_SALT", default_value_t = 0)]
    pub salt: u64,

    /// Print the deployment as JSON instead of a summary line.
    #[arg(long)]
    pub json: bool,
}
