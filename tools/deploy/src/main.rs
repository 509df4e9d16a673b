use anyhow::Result;
use assetbox_deploy::cli::DeployArgs;
use assetbox_deploy::deploy;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = DeployArgs::parse();
    tracing::info!(name = %args.name, salt = args.salt, "Deploying AssetBox");

    let deployment = deploy(&args)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&deployment)?);
    } else {
        println!("AssetBox deployed to: {}", deployment.address);
    }
    Ok(())
}
