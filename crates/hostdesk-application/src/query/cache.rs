use futures::future::{BoxFuture, FutureExt, Shared};
use hostdesk_core::{HostdeskError, ResourceKey, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, watch};

/// Produces a fresh fetch of one resource.
pub type Fetcher = Arc<dyn Fn() -> BoxFuture<'static, Result<Value>> + Send + Sync>;

type InFlight = Shared<BoxFuture<'static, Result<Value>>>;

/// Wraps an async closure into a [`Fetcher`].
pub fn fetcher<F, Fut>(f: F) -> Fetcher
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value>> + Send + 'static,
{
    Arc::new(move || f().boxed())
}

/// Observable state of one cache slot.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotState {
    Pending,
    Ready(Value),
    Failed(HostdeskError),
}

impl SlotState {
    pub fn is_pending(&self) -> bool {
        matches!(self, SlotState::Pending)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, SlotState::Ready(_))
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            SlotState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&HostdeskError> {
        match self {
            SlotState::Failed(err) => Some(err),
            _ => None,
        }
    }
}

struct Slot {
    tx: watch::Sender<SlotState>,
    /// No trusted value: never loaded, invalidated, or last fetch failed.
    stale: bool,
    /// Generation of the fetch allowed to settle this slot.
    generation: u64,
    in_flight: Option<InFlight>,
    fetcher: Option<Fetcher>,
}

impl Slot {
    fn new() -> Self {
        let (tx, _rx) = watch::channel(SlotState::Pending);
        Self {
            tx,
            stale: true,
            generation: 0,
            in_flight: None,
            fetcher: None,
        }
    }

    fn cached_value(&self) -> Option<Value> {
        if self.stale {
            return None;
        }
        self.tx.borrow().data().cloned()
    }
}

/// Per-resource cache with at-most-one in-flight fetch per key.
///
/// Every fetch is tagged with a generation number; a settling fetch only
/// writes its result if it is still the slot's current generation, so a
/// superseded fetch can never overwrite a later one.
///
/// Cloning is cheap and yields a handle to the same cache.
#[derive(Clone, Default)]
pub struct QueryCache {
    slots: Arc<Mutex<HashMap<ResourceKey, Slot>>>,
    generations: Arc<AtomicU64>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value, joins the in-flight fetch, or starts a new
    /// fetch when the slot is absent or stale.
    ///
    /// `fetcher` is remembered for later [`QueryCache::refetch`] calls.
    pub async fn load(&self, key: ResourceKey, fetcher: Fetcher) -> Result<Value> {
        let in_flight = {
            let mut slots = self.slots.lock().await;
            let slot = slots.entry(key).or_insert_with(Slot::new);
            slot.fetcher = Some(fetcher);

            if let Some(in_flight) = slot.in_flight.clone() {
                tracing::debug!("[QueryCache] Joining in-flight fetch for '{}'", key);
                in_flight
            } else if let Some(value) = slot.cached_value() {
                return Ok(value);
            } else {
                self.start_fetch(key, slot)?
            }
        };

        in_flight.await
    }

    /// Marks the slot stale. An in-flight fetch for the key is superseded
    /// and its result discarded.
    ///
    /// Returns whether the slot is currently rendered (has subscribers).
    pub async fn invalidate(&self, key: ResourceKey) -> bool {
        let mut slots = self.slots.lock().await;
        let Some(slot) = slots.get_mut(&key) else {
            return false;
        };

        slot.stale = true;
        if slot.in_flight.take().is_some() {
            slot.generation = self.next_generation();
            tracing::debug!("[QueryCache] Superseded in-flight fetch for '{}'", key);
        }
        tracing::debug!("[QueryCache] Invalidated '{}'", key);

        slot.tx.receiver_count() > 0
    }

    /// Unconditionally fetches again with the last registered fetcher,
    /// superseding any in-flight fetch.
    pub async fn refetch(&self, key: ResourceKey) -> Result<Value> {
        let in_flight = {
            let mut slots = self.slots.lock().await;
            let slot = slots.get_mut(&key).ok_or_else(|| {
                HostdeskError::internal(format!("Cannot refetch '{}': never loaded", key))
            })?;
            self.start_fetch(key, slot)?
        };

        in_flight.await
    }

    /// Observes the slot. A slot counts as rendered while any receiver lives.
    pub async fn subscribe(&self, key: ResourceKey) -> watch::Receiver<SlotState> {
        let mut slots = self.slots.lock().await;
        slots.entry(key).or_insert_with(Slot::new).tx.subscribe()
    }

    /// Subscribes to every key a view needs.
    pub async fn subscribe_view(&self, keys: &[ResourceKey]) -> super::ViewSubscription {
        let mut receivers = Vec::with_capacity(keys.len());
        for key in keys {
            receivers.push((*key, self.subscribe(*key).await));
        }
        super::ViewSubscription::new(receivers)
    }

    pub async fn is_subscribed(&self, key: ResourceKey) -> bool {
        let slots = self.slots.lock().await;
        slots
            .get(&key)
            .is_some_and(|slot| slot.tx.receiver_count() > 0)
    }

    /// Current state, `None` if the key has never been loaded or observed.
    pub async fn state(&self, key: ResourceKey) -> Option<SlotState> {
        let slots = self.slots.lock().await;
        slots.get(&key).map(|slot| slot.tx.borrow().clone())
    }

    pub async fn is_stale(&self, key: ResourceKey) -> bool {
        let slots = self.slots.lock().await;
        slots.get(&key).is_none_or(|slot| slot.stale)
    }

    /// Drops every slot. Pending fetches settle into nothing.
    pub async fn clear(&self) {
        let mut slots = self.slots.lock().await;
        let count = slots.len();
        slots.clear();
        tracing::debug!("[QueryCache] Cleared {} slot(s)", count);
    }

    fn next_generation(&self) -> u64 {
        self.generations.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Starts a fetch for `slot`. Caller holds the slots lock.
    fn start_fetch(&self, key: ResourceKey, slot: &mut Slot) -> Result<InFlight> {
        let fetcher = slot.fetcher.clone().ok_or_else(|| {
            HostdeskError::internal(format!("No fetcher registered for '{}'", key))
        })?;

        let generation = self.next_generation();
        slot.generation = generation;

        let cache = self.clone();
        let fetch = fetcher();
        let in_flight = async move {
            let result = fetch.await;
            cache.settle(key, generation, &result).await;
            result
        }
        .boxed()
        .shared();

        slot.in_flight = Some(in_flight.clone());
        slot.tx.send_replace(SlotState::Pending);

        // Drives the fetch to completion even if every caller goes away.
        tokio::spawn(in_flight.clone().map(|_| ()));

        tracing::debug!(
            "[QueryCache] Fetching '{}' (generation {})",
            key,
            generation
        );
        Ok(in_flight)
    }

    async fn settle(&self, key: ResourceKey, generation: u64, result: &Result<Value>) {
        let mut slots = self.slots.lock().await;
        let Some(slot) = slots.get_mut(&key) else {
            tracing::debug!("[QueryCache] Discarding result for cleared '{}'", key);
            return;
        };
        if slot.generation != generation {
            tracing::debug!(
                "[QueryCache] Discarding superseded result for '{}' (generation {}, current {})",
                key,
                generation,
                slot.generation
            );
            return;
        }

        slot.in_flight = None;
        match result {
            Ok(value) => {
                slot.stale = false;
                slot.tx.send_replace(SlotState::Ready(value.clone()));
            }
            Err(err) => {
                tracing::warn!("[QueryCache] Fetch for '{}' failed: {}", key, err);
                slot.stale = true;
                slot.tx.send_replace(SlotState::Failed(err.clone()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    fn counting_fetcher(calls: Arc<AtomicUsize>) -> Fetcher {
        fetcher(move || {
            let calls = calls.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(json!({ "call": n }))
            }
        })
    }

    #[tokio::test]
    async fn test_concurrent_loads_share_one_fetch() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(Notify::new());

        let f = {
            let calls = calls.clone();
            let gate = gate.clone();
            fetcher(move || {
                let calls = calls.clone();
                let gate = gate.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    gate.notified().await;
                    Ok(json!(["alice", "bob"]))
                }
            })
        };

        let (a, b, _) = tokio::join!(
            cache.load(ResourceKey::Travelers, f.clone()),
            cache.load(ResourceKey::Travelers, f.clone()),
            async {
                tokio::task::yield_now().await;
                gate.notify_one();
            }
        );

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(a.unwrap(), json!(["alice", "bob"]));
        assert_eq!(b.unwrap(), json!(["alice", "bob"]));
    }

    #[tokio::test]
    async fn test_ready_value_is_served_from_cache() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let f = counting_fetcher(calls.clone());

        let first = cache.load(ResourceKey::Profile, f.clone()).await.unwrap();
        let second = cache.load(ResourceKey::Profile, f).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            cache.state(ResourceKey::Profile).await,
            Some(SlotState::Ready(json!({ "call": 1 })))
        );
    }

    #[tokio::test]
    async fn test_invalidate_forces_new_fetch() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let f = counting_fetcher(calls.clone());

        cache.load(ResourceKey::Templates, f.clone()).await.unwrap();
        assert!(!cache.invalidate(ResourceKey::Templates).await);
        assert!(cache.is_stale(ResourceKey::Templates).await);

        let value = cache.load(ResourceKey::Templates, f).await.unwrap();
        assert_eq!(value, json!({ "call": 2 }));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_superseded_fetch_does_not_overwrite_later_one() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let slow_gate = Arc::new(Notify::new());

        let f = {
            let calls = calls.clone();
            let slow_gate = slow_gate.clone();
            fetcher(move || {
                let calls = calls.clone();
                let slow_gate = slow_gate.clone();
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    if n == 1 {
                        slow_gate.notified().await;
                        Ok(json!("old"))
                    } else {
                        Ok(json!("new"))
                    }
                }
            })
        };

        let first = tokio::spawn({
            let cache = cache.clone();
            let f = f.clone();
            async move { cache.load(ResourceKey::Reviews, f).await }
        });
        while calls.load(Ordering::SeqCst) < 1 {
            tokio::task::yield_now().await;
        }

        let refetched = cache.refetch(ResourceKey::Reviews).await.unwrap();
        assert_eq!(refetched, json!("new"));

        slow_gate.notify_one();
        let old = first.await.unwrap().unwrap();
        assert_eq!(old, json!("old"));

        assert_eq!(
            cache.state(ResourceKey::Reviews).await,
            Some(SlotState::Ready(json!("new")))
        );
    }

    #[tokio::test]
    async fn test_invalidate_discards_in_flight_result() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(Notify::new());

        let f = {
            let calls = calls.clone();
            let gate = gate.clone();
            fetcher(move || {
                let calls = calls.clone();
                let gate = gate.clone();
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    if n == 2 {
                        gate.notified().await;
                    }
                    Ok(json!({ "call": n }))
                }
            })
        };

        cache.load(ResourceKey::Profile, f.clone()).await.unwrap();
        cache.invalidate(ResourceKey::Profile).await;

        let in_flight = tokio::spawn({
            let cache = cache.clone();
            let f = f.clone();
            async move { cache.load(ResourceKey::Profile, f).await }
        });
        while calls.load(Ordering::SeqCst) < 2 {
            tokio::task::yield_now().await;
        }

        // Stale again while the second fetch is still running.
        cache.invalidate(ResourceKey::Profile).await;
        gate.notify_one();
        assert_eq!(in_flight.await.unwrap().unwrap(), json!({ "call": 2 }));

        assert!(cache.is_stale(ResourceKey::Profile).await);
        assert_eq!(cache.state(ResourceKey::Profile).await, Some(SlotState::Pending));

        let value = cache.load(ResourceKey::Profile, f).await.unwrap();
        assert_eq!(value, json!({ "call": 3 }));
        assert_eq!(
            cache.state(ResourceKey::Profile).await,
            Some(SlotState::Ready(json!({ "call": 3 })))
        );
    }

    #[tokio::test]
    async fn test_failed_fetch_is_visible_and_reloadable() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let f = {
            let calls = calls.clone();
            fetcher(move || {
                let calls = calls.clone();
                async move {
                    if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                        Err(HostdeskError::http(500, "boom"))
                    } else {
                        Ok(json!([]))
                    }
                }
            })
        };

        let err = cache.load(ResourceKey::Reviews, f.clone()).await.unwrap_err();
        assert_eq!(err, HostdeskError::http(500, "boom"));
        assert_eq!(
            cache.state(ResourceKey::Reviews).await,
            Some(SlotState::Failed(HostdeskError::http(500, "boom")))
        );

        let value = cache.load(ResourceKey::Reviews, f).await.unwrap();
        assert_eq!(value, json!([]));
    }

    #[tokio::test]
    async fn test_subscription_tracks_rendered_state() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let rx = cache.subscribe(ResourceKey::Profile).await;
        assert!(cache.is_subscribed(ResourceKey::Profile).await);
        assert!(rx.borrow().is_pending());

        cache
            .load(ResourceKey::Profile, counting_fetcher(calls))
            .await
            .unwrap();
        assert!(rx.borrow().is_ready());

        assert!(cache.invalidate(ResourceKey::Profile).await);
        drop(rx);
        assert!(!cache.is_subscribed(ResourceKey::Profile).await);
    }

    #[tokio::test]
    async fn test_refetch_requires_prior_load() {
        let cache = QueryCache::new();
        let err = cache.refetch(ResourceKey::Travelers).await.unwrap_err();
        assert!(matches!(err, HostdeskError::Internal(_)));
    }

    #[tokio::test]
    async fn test_clear_forgets_everything() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        cache
            .load(ResourceKey::Profile, counting_fetcher(calls))
            .await
            .unwrap();

        cache.clear().await;
        assert_eq!(cache.state(ResourceKey::Profile).await, None);
    }
}
