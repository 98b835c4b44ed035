mod cli;

use anyhow::Result;
use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::prelude::*;

use crate::cli::context::Context;
use crate::cli::entities::ListFilter;
use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file from current directory
    dotenv().ok();

    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let ctx = Context::load(&cli)?;

    match cli.command {
        Commands::List {
            kind,
            active,
            past,
            json,
        } => {
            let filter = match (active, past) {
                (true, _) => ListFilter::Active,
                (_, true) => ListFilter::Past,
                _ => ListFilter::All,
            };
            cli::entities::handle_list_command(ctx, kind, filter, json).await
        }

        Commands::Items { kind, id, json } => {
            cli::entities::handle_items_command(ctx, kind, id, json).await
        }

        Commands::Watch { kind, poll_secs } => {
            cli::entities::handle_watch_command(ctx, kind, poll_secs).await
        }

        Commands::Balances { account, watch } => {
            cli::balances::handle_balances_command(ctx, account, watch).await
        }

        Commands::Withdraw { token } => cli::balances::handle_withdraw_command(ctx, token).await,

        Commands::Upload {
            file,
            metadata,
            jwt,
        } => cli::upload::handle_upload_command(ctx, file, metadata, jwt).await,

        Commands::Fetch { cid } => cli::upload::handle_fetch_command(ctx, cid).await,

        Commands::Verification { address } => {
            cli::network::handle_verification_command(ctx, address).await
        }

        Commands::Networks => cli::network::handle_networks_command(&ctx),

        Commands::SwitchNetwork { network } => {
            cli::network::handle_switch_network_command(ctx, network).await
        }

        Commands::Social { command } => cli::social::handle_social_command(ctx, command).await,
    }
}
