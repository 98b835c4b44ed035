//! Multi-source pending balance aggregation
//!
//! Several contracts can owe the connected account the same token. The
//! aggregator reads every `(token, source)` pair, sums per token and keeps the
//! tokens with a nonzero total. "Withdraw all" goes to one source per call:
//! the first one currently holding a nonzero balance.

use alloy::primitives::{Address, U256};
use futures::future::join_all;
use quintle_types::{BalanceSource, PendingBalance, SourceError, TokenInfo};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum WithdrawError {
    #[error("No account connected")]
    NoAccount,

    #[error("Nothing to withdraw for token {0}")]
    NothingToWithdraw(Address),

    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Confirmed withdrawal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WithdrawReceipt {
    pub source: Address,
    pub token: Address,
    pub amount: U256,
    pub tx_hash: String,
}

/// First source with a nonzero balance, in the order given
pub fn route_withdraw_all(balances: &[(Address, U256)]) -> Option<Address> {
    balances
        .iter()
        .find(|(_, amount)| !amount.is_zero())
        .map(|(source, _)| *source)
}

pub struct BalanceAggregator {
    source: Arc<dyn BalanceSource>,
    sources: Vec<Address>,
    tokens: Vec<TokenInfo>,
    refresh: Arc<Notify>,
}

impl BalanceAggregator {
    pub fn new(source: Arc<dyn BalanceSource>, sources: Vec<Address>, tokens: Vec<TokenInfo>) -> Self {
        Self {
            source,
            sources,
            tokens,
            refresh: Arc::new(Notify::new()),
        }
    }

    pub fn sources(&self) -> &[Address] {
        &self.sources
    }

    pub fn tokens(&self) -> &[TokenInfo] {
        &self.tokens
    }

    /// Ask the balance watcher to refresh now
    pub fn request_refresh(&self) {
        self.refresh.notify_one();
    }

    /// Per-source balances of one token. A failed read counts as zero.
    pub async fn balances_by_source(&self, token: Address, account: Address) -> Vec<(Address, U256)> {
        let reads = self.sources.iter().map(|&source| async move {
            let amount = match self.source.pending_balance(source, token, account).await {
                Ok(amount) => amount,
                Err(e) => {
                    debug!(
                        "Pending balance of {} at {} unavailable, counting zero: {}",
                        token, source, e
                    );
                    U256::ZERO
                }
            };
            (source, amount)
        });
        join_all(reads).await
    }

    /// Withdrawable totals for `account`, nonzero tokens only, in token order
    pub async fn pending_balances(&self, account: Option<Address>) -> Vec<PendingBalance> {
        let Some(account) = account else {
            return Vec::new();
        };

        let totals = join_all(self.tokens.iter().map(|token| async move {
            let total = self
                .balances_by_source(token.address, account)
                .await
                .into_iter()
                .fold(U256::ZERO, |sum, (_, amount)| sum.saturating_add(amount));
            (token, total)
        }))
        .await;

        totals
            .into_iter()
            .filter(|(_, total)| !total.is_zero())
            .map(|(token, total)| PendingBalance {
                token: token.address,
                symbol: token.symbol.clone(),
                decimals: token.decimals,
                amount: total,
            })
            .collect()
    }

    /// Withdraw the whole balance of `token` held by one source
    pub async fn withdraw_all(
        &self,
        token: Address,
        account: Option<Address>,
    ) -> Result<WithdrawReceipt, WithdrawError> {
        let account = account.ok_or(WithdrawError::NoAccount)?;

        let balances = self.balances_by_source(token, account).await;
        let source = route_withdraw_all(&balances).ok_or(WithdrawError::NothingToWithdraw(token))?;
        let amount = balances
            .iter()
            .find(|(s, _)| *s == source)
            .map(|(_, amount)| *amount)
            .unwrap_or_default();

        info!("Withdrawing {} of token {} from {}", amount, token, source);
        let tx_hash = self.source.withdraw(source, token).await?;

        self.refresh.notify_one();
        Ok(WithdrawReceipt {
            source,
            token,
            amount,
            tx_hash,
        })
    }
}

/// Latest balances published by a background refresh task
pub struct BalanceWatcher {
    pub balances: watch::Receiver<Vec<PendingBalance>>,
    task: JoinHandle<()>,
}

impl BalanceWatcher {
    pub fn current(&self) -> Vec<PendingBalance> {
        self.balances.borrow().clone()
    }

    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for BalanceWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Refresh on `poll_interval` and whenever a withdrawal confirms
pub fn spawn_balance_watcher(
    aggregator: Arc<BalanceAggregator>,
    account: Option<Address>,
    poll_interval: Duration,
) -> BalanceWatcher {
    let (tx, balances) = watch::channel(Vec::new());
    let refresh = aggregator.refresh.clone();

    let task = tokio::spawn(async move {
        let mut ticker = interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = refresh.notified() => {
                    debug!("Balance refresh requested");
                    ticker.reset();
                }
            }

            let latest = aggregator.pending_balances(account).await;
            if tx.send(latest).is_err() {
                warn!("Balance watcher has no receivers, stopping");
                break;
            }
        }
    });

    BalanceWatcher { balances, task }
}
