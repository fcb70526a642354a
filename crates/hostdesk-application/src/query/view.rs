use super::cache::SlotState;
use futures::future::select_all;
use hostdesk_core::{HostdeskError, ResourceKey, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::watch;

/// What a view should show for its set of resources.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderState {
    /// At least one resource is still pending: show a placeholder.
    Loading,
    /// A resource failed: show the error.
    Failed(HostdeskError),
    /// Everything loaded and there is nothing to show.
    Empty,
    Ready,
}

/// Combines slot states into one render decision.
///
/// A failure wins over pending so that an error is never hidden behind a
/// spinner.
pub fn render_state<'a, I>(states: I) -> RenderState
where
    I: IntoIterator<Item = &'a SlotState>,
{
    let mut pending = false;
    let mut any_content = false;
    let mut any_slot = false;

    for state in states {
        any_slot = true;
        match state {
            SlotState::Failed(err) => return RenderState::Failed(err.clone()),
            SlotState::Pending => pending = true,
            SlotState::Ready(value) => any_content |= !is_empty_value(value),
        }
    }

    if pending {
        RenderState::Loading
    } else if any_slot && !any_content {
        RenderState::Empty
    } else {
        RenderState::Ready
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        _ => false,
    }
}

/// The resource subscriptions held by one rendered view.
///
/// While this value lives its keys count as rendered, so successful
/// mutations refetch them immediately. Dropping it unsubscribes.
pub struct ViewSubscription {
    receivers: Vec<(ResourceKey, watch::Receiver<SlotState>)>,
}

impl ViewSubscription {
    pub(crate) fn new(receivers: Vec<(ResourceKey, watch::Receiver<SlotState>)>) -> Self {
        Self { receivers }
    }

    pub fn keys(&self) -> Vec<ResourceKey> {
        self.receivers.iter().map(|(key, _)| *key).collect()
    }

    pub fn slot(&self, key: ResourceKey) -> Option<SlotState> {
        self.receivers
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, rx)| rx.borrow().clone())
    }

    pub fn current(&self) -> RenderState {
        let states: Vec<SlotState> = self
            .receivers
            .iter()
            .map(|(_, rx)| rx.borrow().clone())
            .collect();
        render_state(&states)
    }

    /// Decodes the value the view already holds for `key`, without fetching.
    ///
    /// Fails with the slot's own error when it failed, and with `Internal`
    /// when the key is not part of the view or is still pending.
    pub fn decode<T: DeserializeOwned>(&self, key: ResourceKey) -> Result<T> {
        match self.slot(key) {
            Some(SlotState::Ready(value)) => Ok(serde_json::from_value(value)?),
            Some(SlotState::Failed(err)) => Err(err),
            Some(SlotState::Pending) => Err(HostdeskError::internal(format!(
                "'{}' is still loading",
                key
            ))),
            None => Err(HostdeskError::internal(format!(
                "'{}' is not part of this view",
                key
            ))),
        }
    }

    /// Waits until any subscribed slot changes. Returns `false` once the
    /// cache has dropped the slots (e.g. after logout).
    pub async fn changed(&mut self) -> bool {
        if self.receivers.is_empty() {
            return false;
        }
        let waits = self
            .receivers
            .iter_mut()
            .map(|(_, rx)| Box::pin(rx.changed()));
        let (result, _, _) = select_all(waits).await;
        result.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{fetcher, QueryCache};
    use serde_json::json;

    #[test]
    fn test_pending_renders_placeholder() {
        let states = [SlotState::Ready(json!({"a": 1})), SlotState::Pending];
        assert_eq!(render_state(&states), RenderState::Loading);
    }

    #[test]
    fn test_failure_is_distinct_from_loading() {
        let err = HostdeskError::http(500, "down");
        let states = [SlotState::Pending, SlotState::Failed(err.clone())];
        assert_eq!(render_state(&states), RenderState::Failed(err));
    }

    #[test]
    fn test_loaded_empty_is_distinct_from_ready() {
        assert_eq!(render_state(&[SlotState::Ready(json!([]))]), RenderState::Empty);
        assert_eq!(
            render_state(&[SlotState::Ready(json!([])), SlotState::Ready(json!([1]))]),
            RenderState::Ready
        );
    }

    #[test]
    fn test_no_resources_is_ready() {
        assert_eq!(render_state(&Vec::<SlotState>::new()), RenderState::Ready);
    }

    #[tokio::test]
    async fn test_changed_wakes_on_settle_and_ends_on_clear() {
        let cache = QueryCache::new();
        let mut view = cache.subscribe_view(&[ResourceKey::Reviews]).await;
        let mut idle = cache.subscribe_view(&[ResourceKey::Profile]).await;
        assert_eq!(view.current(), RenderState::Loading);

        let loader = tokio::spawn({
            let cache = cache.clone();
            async move {
                cache
                    .load(ResourceKey::Reviews, fetcher(|| async { Ok(json!([])) }))
                    .await
            }
        });

        assert!(view.changed().await);
        loader.await.unwrap().unwrap();
        let reviews: Vec<Value> = view.decode(ResourceKey::Reviews).unwrap();
        assert!(reviews.is_empty());

        cache.clear().await;
        assert!(!idle.changed().await);
    }

    #[tokio::test]
    async fn test_decode_returns_failure_instead_of_fetching() {
        let cache = QueryCache::new();
        let view = cache.subscribe_view(&[ResourceKey::Templates]).await;

        assert!(matches!(
            view.decode::<Vec<Value>>(ResourceKey::Templates),
            Err(HostdeskError::Internal(_))
        ));

        let _ = cache
            .load(
                ResourceKey::Templates,
                fetcher(|| async { Err(HostdeskError::http(503, "down")) }),
            )
            .await;

        assert_eq!(
            view.decode::<Vec<Value>>(ResourceKey::Templates).unwrap_err(),
            HostdeskError::http(503, "down")
        );
        assert!(view.decode::<Vec<Value>>(ResourceKey::Profile).is_err());
    }
}
