use super::Mutation;
use crate::query::HostQueries;
use hostdesk_core::{ApiClient, Result};
use serde_json::Value;
use std::sync::Arc;

/// Executes mutations and applies their invalidation footprint.
#[derive(Clone)]
pub struct MutationRunner {
    api: Arc<dyn ApiClient>,
    queries: HostQueries,
}

impl MutationRunner {
    pub fn new(api: Arc<dyn ApiClient>, queries: HostQueries) -> Self {
        Self { api, queries }
    }

    /// Sends the mutation. On success every key in the footprint is
    /// invalidated, and rendered keys are refetched before this returns. On
    /// failure no key is touched and the error is returned to the caller.
    ///
    /// Nothing is retried; calling again issues a new, independent request.
    pub async fn mutate<M: Mutation>(&self, mutation: &M) -> Result<Value> {
        let kind = M::KIND;
        mutation.validate()?;
        let request = mutation.request()?;

        let response = match self.api.request(request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!("[Mutation] {} failed: {}", kind, err);
                return Err(err);
            }
        };

        for key in kind.invalidates() {
            let rendered = self.queries.cache().invalidate(*key).await;
            // The slot is stale now, so this load goes to the network.
            if rendered && let Err(err) = self.queries.load(*key).await {
                tracing::warn!(
                    "[Mutation] Refetch of '{}' after {} failed: {}",
                    key,
                    kind,
                    err
                );
            }
        }

        tracing::info!("[Mutation] {} succeeded", kind);
        Ok(response)
    }
}
