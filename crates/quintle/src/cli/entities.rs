use crate::cli::context::{format_timestamp, now_secs, Context};
use anyhow::Result;
use quintle::{load_sub_items, spawn_invalidation, EntityCollection};
use quintle_ethereum::{
    AirdropSource, BountySource, CampaignSource, EvmEventSource, FundingRequestSource,
    GrantSource, QuestSource,
};
use quintle_types::reconcile::resolve_media_url;
use quintle_types::{Entity, EntityKind, EntitySource, EventSource, SubCollectionSource};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Bind the source for `$kind` to `$source` and evaluate `$body` with it
macro_rules! with_entity_source {
    ($kind:expr, $client:expr, |$source:ident| $body:expr) => {
        match $kind {
            EntityKind::Quest => {
                let $source = Arc::new(QuestSource::new($client)?);
                $body
            }
            EntityKind::Airdrop => {
                let $source = Arc::new(AirdropSource::new($client)?);
                $body
            }
            EntityKind::Bounty => {
                let $source = Arc::new(BountySource::new($client)?);
                $body
            }
            EntityKind::Grant => {
                let $source = Arc::new(GrantSource::new($client)?);
                $body
            }
            EntityKind::Campaign => {
                let $source = Arc::new(CampaignSource::new($client)?);
                $body
            }
            EntityKind::FundingRequest => {
                let $source = Arc::new(FundingRequestSource::new($client)?);
                $body
            }
        }
    };
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ListFilter {
    All,
    Active,
    Past,
}

pub async fn handle_list_command(
    ctx: Context,
    kind: EntityKind,
    filter: ListFilter,
    json: bool,
) -> Result<()> {
    let client = ctx.client.clone();
    with_entity_source!(kind, client, |source| list_collection(&ctx, source, filter, json).await)
}

pub async fn handle_items_command(ctx: Context, kind: EntityKind, id: u64, json: bool) -> Result<()> {
    let client = ctx.client.clone();
    with_entity_source!(kind, client, |source| print_items(source.as_ref(), id, json).await)
}

pub async fn handle_watch_command(ctx: Context, kind: EntityKind, poll_secs: Option<u64>) -> Result<()> {
    let poll_interval = poll_secs
        .map(Duration::from_secs)
        .unwrap_or_else(|| ctx.config.collection_poll_interval());
    let client = ctx.client.clone();
    with_entity_source!(kind, client, |source| watch_collection(&ctx, source, poll_interval).await)
}

async fn list_collection<S>(ctx: &Context, source: Arc<S>, filter: ListFilter, json: bool) -> Result<()>
where
    S: EntitySource,
    S::Entity: Serialize,
{
    let collection = EntityCollection::new(source, ctx.config.pinned_id());
    collection.reload().await;
    let snapshot = collection.snapshot().await;

    if let Some(error) = &snapshot.last_error {
        anyhow::bail!("Failed to load {} collection: {}", collection.kind(), error);
    }

    let now = now_secs();
    let entities: Vec<&S::Entity> = match filter {
        ListFilter::All => snapshot.entities.iter().collect(),
        ListFilter::Active => snapshot.active(now),
        ListFilter::Past => snapshot.past(now),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entities)?);
        return Ok(());
    }

    println!(
        "📋 {} {} entities (counter {})",
        entities.len(),
        collection.kind(),
        snapshot.counter.unwrap_or(0)
    );
    print_entities(&entities, &snapshot.sub_counts, collection.kind(), &ctx.config.ipfs.gateway);

    if !snapshot.failures.is_empty() {
        println!();
        println!("⚠️  {} IDs could not be loaded:", snapshot.failures.len());
        for failure in &snapshot.failures {
            println!("   #{}: {}", failure.id, failure.error);
        }
    }
    Ok(())
}

fn print_entities<E: Entity>(
    entities: &[&E],
    sub_counts: &std::collections::HashMap<u64, u64>,
    kind: EntityKind,
    gateway: &str,
) {
    let now = now_secs();
    for entity in entities {
        println!();
        println!("#{} {}", entity.id(), entity.title());
        println!("   Creator:  {}", entity.creator());
        println!(
            "   Status:   {:?}{}",
            entity.status(),
            if entity.is_active(now) { "" } else { " (past)" }
        );
        println!("   Deadline: {}", format_timestamp(entity.deadline()));
        if let Some(count) = sub_counts.get(&entity.id()) {
            println!("   {}: {}", kind.sub_collection_name(), count);
        }
        if let Some(url) = entity.image_url() {
            println!("   Image:    {}", resolve_media_url(url, gateway));
        }
    }
}

async fn print_items<S>(source: &S, id: u64, json: bool) -> Result<()>
where
    S: SubCollectionSource,
{
    let outcome = load_sub_items(source, id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.items)?);
        return Ok(());
    }

    println!(
        "📋 {} {} of {} #{}",
        outcome.count,
        source.kind().sub_collection_name(),
        source.kind(),
        id
    );
    for item in &outcome.items {
        println!();
        println!("[{}] {}", item.index, item.account);
        if !item.content.is_empty() {
            println!("   {}", item.content);
        }
        if let Some(amount) = item.amount {
            println!("   Amount:    {}", amount);
        }
        println!("   Submitted: {}", format_timestamp(item.submitted_at));
        println!("   Status:    {}", item.status);
    }
    for failure in &outcome.failures {
        println!("⚠️  item {} could not be loaded: {}", failure.id, failure.error);
    }
    Ok(())
}

async fn watch_collection<S>(ctx: &Context, source: Arc<S>, poll_interval: Duration) -> Result<()>
where
    S: EntitySource + 'static,
{
    let collection = Arc::new(EntityCollection::new(source, ctx.config.pinned_id()));
    let events: Option<Arc<dyn EventSource>> = ctx
        .config
        .chain
        .ws_url
        .as_ref()
        .map(|_| Arc::new(EvmEventSource::new(ctx.client.clone())) as Arc<dyn EventSource>);

    let mut changes = collection.subscribe();
    let handle = collection.handle();
    let invalidation = spawn_invalidation(collection.clone(), events, poll_interval);

    println!("👀 Watching {} (Ctrl-C to stop)", collection.kind());

    loop {
        tokio::select! {
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = collection.snapshot().await;
                let now = now_secs();
                println!(
                    "🔄 generation {}: {} entities ({} active, {} past, {} failed){}",
                    snapshot.generation,
                    snapshot.entities.len(),
                    snapshot.active(now).len(),
                    snapshot.past(now).len(),
                    snapshot.failures.len(),
                    snapshot
                        .last_error
                        .as_ref()
                        .map(|e| format!(" last error: {}", e))
                        .unwrap_or_default()
                );
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping watch");
                break;
            }
        }
    }

    handle.unmount();
    invalidation.shutdown().await;
    Ok(())
}
