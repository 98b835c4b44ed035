//! In-memory sources shared by the integration tests

#![allow(dead_code)]

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use futures::StreamExt;
use quintle_types::{
    BalanceSource, ChainEvent, ChainEventStream, EntityId, EntityKind, EntitySource, EventClass,
    EventSource, Fetched, Quest, SourceError, SourceResult, SubCollectionSource, SubItem,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

pub fn quest(id: EntityId, description: &str) -> Quest {
    Quest {
        id,
        creator: Address::repeat_byte(0x11),
        title: format!("Quest {}", id),
        description: description.to_string(),
        reward_per_qualifier: U256::from(1_000u64),
        max_qualifiers: 10,
        qualifiers_count: 0,
        deadline: 0,
        created_at: 1_700_000_000,
        resolved: false,
        cancelled: false,
        image_url: quintle_types::reconcile::extract_image_url(description),
    }
}

/// Quest contract fake: dense IDs, optional failing IDs, optional latency
pub struct FakeQuests {
    pub counter: AtomicU64,
    pub failing: Mutex<HashSet<EntityId>>,
    pub gaps: Mutex<HashSet<EntityId>>,
    /// Title suffix, bumped to simulate a mutation
    pub revision: AtomicU64,
    pub latency: Mutex<Duration>,
    pub fetches: AtomicUsize,
    pub counter_reads: AtomicUsize,
}

impl FakeQuests {
    pub fn new(counter: u64) -> Self {
        Self {
            counter: AtomicU64::new(counter),
            failing: Mutex::new(HashSet::new()),
            gaps: Mutex::new(HashSet::new()),
            revision: AtomicU64::new(0),
            latency: Mutex::new(Duration::ZERO),
            fetches: AtomicUsize::new(0),
            counter_reads: AtomicUsize::new(0),
        }
    }

    pub fn fail(&self, id: EntityId) {
        self.failing.lock().unwrap().insert(id);
    }

    pub fn recover(&self, id: EntityId) {
        self.failing.lock().unwrap().remove(&id);
    }

    pub fn gap(&self, id: EntityId) {
        self.gaps.lock().unwrap().insert(id);
    }

    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = latency;
    }
}

#[async_trait]
impl EntitySource for FakeQuests {
    type Entity = Quest;

    fn kind(&self) -> EntityKind {
        EntityKind::Quest
    }

    async fn counter(&self) -> SourceResult<u64> {
        self.counter_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.counter.load(Ordering::SeqCst))
    }

    async fn fetch_entity(&self, id: EntityId) -> SourceResult<Fetched<Quest>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        // Snapshot the revision when the fetch starts, like a read at a block
        let revision = self.revision.load(Ordering::SeqCst);

        let latency = *self.latency.lock().unwrap();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        if self.failing.lock().unwrap().contains(&id) {
            return Err(SourceError::rpc(format!("timeout reading quest {}", id)));
        }
        if self.gaps.lock().unwrap().contains(&id) {
            return Err(SourceError::not_found("Quest", id));
        }

        let mut entity = quest(id, "");
        entity.title = format!("Quest {} r{}", id, revision);
        Ok(Fetched::new(entity, Some(id * 2)))
    }
}

#[async_trait]
impl SubCollectionSource for FakeQuests {
    fn kind(&self) -> EntityKind {
        EntityKind::Quest
    }

    async fn item_count(&self, entity_id: EntityId) -> SourceResult<u64> {
        if self.failing.lock().unwrap().contains(&entity_id) {
            return Err(SourceError::rpc("count unavailable"));
        }
        Ok(3)
    }

    async fn fetch_item(&self, entity_id: EntityId, index: u64) -> SourceResult<SubItem> {
        if index == 1 {
            return Err(SourceError::decode("getEntry", "short tuple"));
        }
        Ok(SubItem {
            entity_id,
            index,
            account: Address::repeat_byte(0x22),
            content: format!("entry {}", index),
            amount: None,
            submitted_at: 1_700_000_100 + index,
            status: 0,
            image_url: None,
        })
    }
}

/// Balance fake keyed by `(source, token)`; records withdrawal targets
#[derive(Default)]
pub struct FakeBalances {
    pub balances: Mutex<HashMap<(Address, Address), U256>>,
    pub failing_sources: Mutex<HashSet<Address>>,
    pub withdrawals: Mutex<Vec<(Address, Address)>>,
    pub reads: AtomicUsize,
}

impl FakeBalances {
    pub fn set(&self, source: Address, token: Address, amount: u64) {
        self.balances
            .lock()
            .unwrap()
            .insert((source, token), U256::from(amount));
    }
}

#[async_trait]
impl BalanceSource for FakeBalances {
    async fn pending_balance(
        &self,
        source: Address,
        token: Address,
        _account: Address,
    ) -> SourceResult<U256> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.failing_sources.lock().unwrap().contains(&source) {
            return Err(SourceError::contract_call("pendingWithdrawals", "execution reverted"));
        }
        Ok(self
            .balances
            .lock()
            .unwrap()
            .get(&(source, token))
            .copied()
            .unwrap_or_default())
    }

    async fn withdraw(&self, source: Address, token: Address) -> SourceResult<String> {
        let mut balances = self.balances.lock().unwrap();
        let balance = balances.entry((source, token)).or_default();
        if balance.is_zero() {
            return Err(SourceError::transaction("execution reverted: nothing to withdraw", None));
        }
        *balance = U256::ZERO;
        self.withdrawals.lock().unwrap().push((source, token));
        Ok(format!("0x{:064x}", self.withdrawals.lock().unwrap().len()))
    }
}

/// Event source fed by the test through an mpsc channel
pub struct FakeEvents {
    receiver: Mutex<Option<mpsc::UnboundedReceiver<SourceResult<ChainEvent>>>>,
}

impl FakeEvents {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedSender<SourceResult<ChainEvent>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Arc::new(Self {
                receiver: Mutex::new(Some(rx)),
            }),
            tx,
        )
    }
}

#[async_trait]
impl EventSource for FakeEvents {
    async fn subscribe(&self, _kind: EntityKind) -> SourceResult<ChainEventStream> {
        let receiver = self
            .receiver
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| SourceError::configuration("already subscribed"))?;

        let stream = futures::stream::unfold(receiver, |mut rx| async move {
            rx.recv().await.map(|event| (event, rx))
        });
        Ok(stream.boxed())
    }
}

/// Event source whose subscription always fails
pub struct BrokenEvents;

#[async_trait]
impl EventSource for BrokenEvents {
    async fn subscribe(&self, _kind: EntityKind) -> SourceResult<ChainEventStream> {
        Err(SourceError::configuration("WebSocket URL not configured"))
    }
}

pub fn event(name: &str, class: EventClass) -> SourceResult<ChainEvent> {
    Ok(ChainEvent {
        kind: EntityKind::Quest,
        name: name.to_string(),
        class,
        block_number: 1,
    })
}

/// Poll `condition` until it holds or `timeout` elapses
pub async fn eventually<F, Fut>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if condition().await {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
