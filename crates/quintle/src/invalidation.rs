//! Event-driven collection invalidation
//!
//! A background task per collection listens to the chain event stream for
//! the collection's kind. Creation events re-read the counter (which reloads
//! when it moved), mutation events reload the whole collection. Every poll
//! tick also runs a full reload, so missed events and transiently failed IDs
//! are picked up within one interval even without a working stream.

use crate::collection::EntityCollection;
use futures::StreamExt;
use quintle_types::{ChainEventStream, EntitySource, EventClass, EventSource};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Owns the invalidation task; the task is aborted when the handle drops
pub struct InvalidationHandle {
    task: Option<JoinHandle<()>>,
}

impl InvalidationHandle {
    /// Abort the task and wait for it to finish
    pub async fn shutdown(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |task| task.is_finished())
    }
}

impl Drop for InvalidationHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Start the invalidation loop for `collection`.
///
/// The first interval tick fires immediately and performs the initial load.
/// The loop exits as soon as the collection's consumer unmounts, dropping the
/// event subscription with it.
pub fn spawn_invalidation<S>(
    collection: Arc<EntityCollection<S>>,
    events: Option<Arc<dyn EventSource>>,
    poll_interval: Duration,
) -> InvalidationHandle
where
    S: EntitySource + 'static,
{
    let task = tokio::spawn(async move {
        let kind = collection.kind();

        let mut stream: ChainEventStream = match events {
            Some(events) => match events.subscribe(kind).await {
                Ok(stream) => {
                    info!("Subscribed to {} events", kind);
                    stream
                }
                Err(e) => {
                    warn!(
                        "Event subscription for {} failed, polling every {:?}: {}",
                        kind, poll_interval, e
                    );
                    Box::pin(futures::stream::pending())
                }
            },
            None => {
                debug!("No event source for {}, polling every {:?}", kind, poll_interval);
                Box::pin(futures::stream::pending())
            }
        };

        let mut mount_state = collection.mount_state();
        let mut ticker = interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut stream_open = true;

        loop {
            if !collection.is_mounted() {
                debug!("{} collection unmounted, stopping invalidation", kind);
                break;
            }

            tokio::select! {
                biased;

                _ = mount_state.changed() => continue,
                event = stream.next(), if stream_open => match event {
                    Some(Ok(event)) => {
                        debug!("{} event {} at block {}", kind, event.name, event.block_number);
                        match event.class {
                            EventClass::Creation => {
                                collection.refresh_counter().await;
                            }
                            EventClass::Mutation => collection.reload().await,
                        }
                    }
                    Some(Err(e)) => warn!("{} event stream error: {}", kind, e),
                    None => {
                        warn!("{} event stream ended, falling back to polling", kind);
                        stream_open = false;
                    }
                },
                _ = ticker.tick() => collection.reload().await,
            }
        }
    });

    InvalidationHandle { task: Some(task) }
}
