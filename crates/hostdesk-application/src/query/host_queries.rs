use super::cache::{fetcher, Fetcher, QueryCache};
use hostdesk_core::api::endpoints;
use hostdesk_core::model::{HostProfile, MessageTemplate, Review, Traveler, TravelerFilters};
use hostdesk_core::{ApiClient, ApiRequest, ResourceKey, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Typed reads of the host resources through the [`QueryCache`].
#[derive(Clone)]
pub struct HostQueries {
    api: Arc<dyn ApiClient>,
    cache: QueryCache,
    traveler_filters: Arc<RwLock<TravelerFilters>>,
}

impl HostQueries {
    pub fn new(api: Arc<dyn ApiClient>, cache: QueryCache) -> Self {
        Self {
            api,
            cache,
            traveler_filters: Arc::new(RwLock::new(TravelerFilters::default())),
        }
    }

    /// The fetcher registered for `key`.
    ///
    /// The travelers fetcher reads the current filters on every call, so a
    /// refetch always honours the latest filters.
    pub fn fetcher_for(&self, key: ResourceKey) -> Fetcher {
        let api = self.api.clone();
        match key {
            ResourceKey::Profile => request_fetcher(api, endpoints::get_host_profile),
            ResourceKey::Templates => request_fetcher(api, endpoints::list_message_templates),
            ResourceKey::Reviews => request_fetcher(api, endpoints::list_reviews),
            ResourceKey::Travelers => {
                let filters = self.traveler_filters.clone();
                fetcher(move || {
                    let api = api.clone();
                    let filters = filters.clone();
                    async move {
                        let filters = filters.read().await.clone();
                        api.request(endpoints::list_travelers(&filters)).await
                    }
                })
            }
        }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Loads `key` as raw JSON, registering its fetcher.
    pub async fn load(&self, key: ResourceKey) -> Result<Value> {
        self.cache.load(key, self.fetcher_for(key)).await
    }

    /// Loads `key` and decodes it.
    pub async fn get<T: DeserializeOwned>(&self, key: ResourceKey) -> Result<T> {
        decode(self.load(key).await?)
    }

    pub async fn profile(&self) -> Result<HostProfile> {
        self.get(ResourceKey::Profile).await
    }

    pub async fn travelers(&self) -> Result<Vec<Traveler>> {
        self.get(ResourceKey::Travelers).await
    }

    pub async fn templates(&self) -> Result<Vec<MessageTemplate>> {
        self.get(ResourceKey::Templates).await
    }

    pub async fn reviews(&self) -> Result<Vec<Review>> {
        self.get(ResourceKey::Reviews).await
    }

    pub async fn traveler_filters(&self) -> TravelerFilters {
        self.traveler_filters.read().await.clone()
    }

    /// Replaces the traveler filters and fetches the list wholesale.
    pub async fn search_travelers(&self, filters: TravelerFilters) -> Result<Vec<Traveler>> {
        *self.traveler_filters.write().await = filters;
        self.cache.invalidate(ResourceKey::Travelers).await;
        self.travelers().await
    }

    /// Unconditional re-fetch of `key`, registering its fetcher if needed.
    pub async fn refresh(&self, key: ResourceKey) -> Result<Value> {
        self.cache.invalidate(key).await;
        self.load(key).await
    }
}

fn request_fetcher(api: Arc<dyn ApiClient>, request: fn() -> ApiRequest) -> Fetcher {
    fetcher(move || {
        let api = api.clone();
        async move { api.request(request()).await }
    })
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    Ok(serde_json::from_value(value)?)
}
