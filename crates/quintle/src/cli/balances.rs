use crate::cli::context::{parse_address, Context};
use anyhow::{anyhow, Result};
use quintle::{format_amount, spawn_balance_watcher, BalanceAggregator, WithdrawError};
use quintle_ethereum::EvmBalanceSource;
use quintle_types::{PendingBalance, TokenInfo};
use std::sync::Arc;
use tracing::info;

fn aggregator(ctx: &Context) -> BalanceAggregator {
    BalanceAggregator::new(
        Arc::new(EvmBalanceSource::new(ctx.client.clone())),
        ctx.client.withdrawal_sources().to_vec(),
        ctx.client.tokens().to_vec(),
    )
}

fn print_balances(balances: &[PendingBalance]) {
    if balances.is_empty() {
        println!("   Nothing to withdraw");
        return;
    }
    for balance in balances {
        println!(
            "   {} {} ({})",
            format_amount(balance.amount, balance.decimals),
            balance.symbol,
            balance.token
        );
    }
}

pub async fn handle_balances_command(ctx: Context, account: Option<String>, watch: bool) -> Result<()> {
    let account = ctx.account(account.as_deref())?;
    let Some(address) = account else {
        println!("⚠️  No account: pass --account or configure a private key");
        return Ok(());
    };

    let aggregator = Arc::new(aggregator(&ctx));
    println!(
        "💰 Withdrawable balances for {} across {} sources",
        address,
        aggregator.sources().len()
    );

    if !watch {
        print_balances(&aggregator.pending_balances(account).await);
        return Ok(());
    }

    let mut watcher = spawn_balance_watcher(aggregator, account, ctx.config.balance_poll_interval());
    loop {
        tokio::select! {
            changed = watcher.balances.changed() => {
                if changed.is_err() {
                    break;
                }
                let balances = watcher.current();
                println!("🔄 {}", chrono::Utc::now().format("%H:%M:%S"));
                print_balances(&balances);
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping balance watch");
                break;
            }
        }
    }
    watcher.stop();
    Ok(())
}

fn resolve_token<'a>(tokens: &'a [TokenInfo], token: &str) -> Result<&'a TokenInfo> {
    if let Some(info) = tokens.iter().find(|t| t.symbol.eq_ignore_ascii_case(token)) {
        return Ok(info);
    }
    let address = parse_address(token)?;
    tokens
        .iter()
        .find(|t| t.address == address)
        .ok_or_else(|| anyhow!("Token {} is not configured", token))
}

pub async fn handle_withdraw_command(ctx: Context, token: String) -> Result<()> {
    if !ctx.config.chain.can_write() {
        return Err(anyhow!("Withdrawing requires a private key (--private-key or QUINTLE_PRIVATE_KEY)"));
    }

    let aggregator = aggregator(&ctx);
    let token = resolve_token(aggregator.tokens(), &token)?.clone();
    let account = ctx.client.signer_address();

    match aggregator.withdraw_all(token.address, account).await {
        Ok(receipt) => {
            println!("✅ Withdrew {} {}", format_amount(receipt.amount, token.decimals), token.symbol);
            println!("   Source:      {}", receipt.source);
            println!("   Transaction: {}", receipt.tx_hash);
            Ok(())
        }
        Err(WithdrawError::NothingToWithdraw(_)) => {
            println!("ℹ️  No source holds a {} balance for {}", token.symbol, account.unwrap_or_default());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
