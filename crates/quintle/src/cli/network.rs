use crate::cli::context::{format_timestamp, parse_address, Context};
use alloy::providers::ProviderBuilder;
use anyhow::{anyhow, Result};
use quintle_ethereum::{
    ensure_network, Eip1193, EvmVerificationSource, KnownNetwork, RpcEip1193, SwitchOutcome,
};
use quintle_types::VerificationSource;

pub fn handle_networks_command(ctx: &Context) -> Result<()> {
    let current = ctx.client.chain_id();
    println!("🌐 Known networks");
    for name in KnownNetwork::list_networks() {
        let Some(network) = KnownNetwork::get_network(name) else {
            continue;
        };
        let marker = if network.chain_id == current { "*" } else { " " };
        println!(
            " {} {:<14} {:>8}  {}{}",
            marker,
            name,
            network.chain_id,
            network.name,
            if network.testnet { " (testnet)" } else { "" }
        );
    }
    Ok(())
}

pub async fn handle_switch_network_command(ctx: Context, name: String) -> Result<()> {
    let network = KnownNetwork::get_network(&name).ok_or_else(|| {
        anyhow!(
            "Unknown network '{}'. Known networks: {}",
            name,
            KnownNetwork::list_networks().join(", ")
        )
    })?;

    let rpc_url = ctx
        .config
        .chain
        .rpc_url
        .parse()
        .map_err(|e| anyhow!("Invalid RPC URL: {}", e))?;
    let wallet = RpcEip1193::new(ProviderBuilder::new().connect_http(rpc_url));

    match ensure_network(Some(&wallet as &dyn Eip1193), network).await? {
        SwitchOutcome::AlreadyOnNetwork => println!("✅ Already on {}", network.name),
        SwitchOutcome::Switched => println!("✅ Switched to {}", network.name),
        SwitchOutcome::Added => println!("✅ Added and switched to {}", network.name),
    }
    Ok(())
}

pub async fn handle_verification_command(ctx: Context, address: String) -> Result<()> {
    let account = parse_address(&address)?;
    let source = EvmVerificationSource::new(ctx.client.clone())?;
    let record = source.verification(account).await?;

    println!("🔎 Verification for {}", account);
    println!("   Verified:    {}", if record.is_verified { "yes" } else { "no" });
    println!("   Verified at: {}", format_timestamp(record.verified_at));
    if let Some(handle) = &record.social_handle {
        println!("   Social:      {}", handle);
    }
    if let Some(institution) = &record.institution_name {
        println!("   Institution: {}", institution);
    }
    Ok(())
}
