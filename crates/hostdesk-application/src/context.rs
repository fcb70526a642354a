//! Application state shared by every dashboard surface.
//!
//! `AppContext` is built once at the composition root and handed to whatever
//! renders the dashboard. Session, cache, notifications and the compose field
//! are only mutated through its methods.

use crate::compose::MessageComposer;
use crate::mutation::{MutationRunner, SaveTemplate, SendMessage, UpdateProfile};
use crate::notice::Notice;
use crate::notification::{NotificationCenter, NotificationPoller, NotificationSource, PollerHandle};
use crate::query::{HostQueries, QueryCache, ViewSubscription};
use crate::session_service::SessionService;
use futures::future::join_all;
use hostdesk_core::model::{
    HostProfile, MessageTemplate, NewTemplate, ProfilePatch, Review, Traveler, TravelerFilters,
};
use hostdesk_core::session::{Credentials, Route, Session, Tab};
use hostdesk_core::{ApiClient, HostdeskError, ResourceKey, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Resources each dashboard tab depends on.
pub fn view_keys(tab: Tab) -> &'static [ResourceKey] {
    match tab {
        Tab::Profile => &[ResourceKey::Profile],
        // The traveler list offers templates for the compose field.
        Tab::Travelers => &[ResourceKey::Travelers, ResourceKey::Templates],
        Tab::Templates => &[ResourceKey::Templates],
        Tab::Reviews => &[ResourceKey::Reviews],
    }
}

pub struct AppContext {
    session: Arc<SessionService>,
    queries: HostQueries,
    mutations: MutationRunner,
    notifications: NotificationCenter,
    composer: Mutex<MessageComposer>,
}

impl AppContext {
    pub fn new(session: Arc<SessionService>, api: Arc<dyn ApiClient>) -> Self {
        let queries = HostQueries::new(api.clone(), QueryCache::new());
        let mutations = MutationRunner::new(api, queries.clone());
        Self {
            session,
            queries,
            mutations,
            notifications: NotificationCenter::new(),
            composer: Mutex::new(MessageComposer::new()),
        }
    }

    pub fn session(&self) -> &Arc<SessionService> {
        &self.session
    }

    pub fn queries(&self) -> &HostQueries {
        &self.queries
    }

    pub fn cache(&self) -> &QueryCache {
        self.queries.cache()
    }

    pub fn mutations(&self) -> &MutationRunner {
        &self.mutations
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    // ============================================================================
    // Session
    // ============================================================================

    /// Route to render for `requested`; evaluate on every render.
    pub async fn route(&self, requested: Route) -> Route {
        self.session.resolve(requested).await
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<Route> {
        let route = self.session.login(credentials).await?;
        // Nothing cached under a previous identity may leak into this one.
        self.cache().clear().await;
        Ok(route)
    }

    /// Ends the session and drops all in-memory session data.
    ///
    /// In-memory data is dropped even when the stored token cannot be
    /// removed; that storage error is returned afterwards.
    pub async fn logout(&self) -> Result<Route> {
        let result = self.session.logout().await;
        self.cache().clear().await;
        self.notifications.clear();
        self.composer.lock().await.clear();
        result
    }

    async fn require_session(&self) -> Result<Session> {
        self.session.require_session().await
    }

    // ============================================================================
    // Views and queries
    // ============================================================================

    /// Subscribes to a tab's resources and starts loading them.
    ///
    /// Keep the returned subscription alive while the tab is shown.
    pub async fn open_view(&self, tab: Tab) -> Result<ViewSubscription> {
        self.require_session().await?;
        let keys = view_keys(tab);
        let subscription = self.cache().subscribe_view(keys).await;

        // Failures land in the slots and are rendered from there.
        join_all(keys.iter().map(|key| self.queries.load(*key))).await;
        Ok(subscription)
    }

    pub async fn profile(&self) -> Result<HostProfile> {
        self.require_session().await?;
        self.queries.profile().await
    }

    pub async fn travelers(&self) -> Result<Vec<Traveler>> {
        self.require_session().await?;
        self.queries.travelers().await
    }

    pub async fn templates(&self) -> Result<Vec<MessageTemplate>> {
        self.require_session().await?;
        self.queries.templates().await
    }

    pub async fn reviews(&self) -> Result<Vec<Review>> {
        self.require_session().await?;
        self.queries.reviews().await
    }

    /// Fetches the traveler list wholesale with new filters.
    pub async fn fetch_travelers(&self, filters: TravelerFilters) -> Result<(Vec<Traveler>, Notice)> {
        self.require_session().await?;
        let travelers = self.queries.search_travelers(filters).await?;
        let notice = Notice::info(
            "Candidates Fetched",
            format!("Found {} potential matches.", travelers.len()),
        );
        Ok((travelers, notice))
    }

    // ============================================================================
    // Mutations
    // ============================================================================

    /// Merges field edits into the current profile and sends the full
    /// profile.
    pub async fn save_profile(&self, patch: &ProfilePatch) -> Result<(HostProfile, Notice)> {
        self.require_session().await?;
        let merged = self.queries.profile().await?.merged(patch);

        let response = self.mutations.mutate(&UpdateProfile(merged.clone())).await?;
        let saved = decode_or(response, merged)?;
        Ok((
            saved,
            Notice::info("Profile Updated", "Your profile has been successfully updated."),
        ))
    }

    pub async fn save_template(&self, name: &str, content: &str) -> Result<MessageTemplate> {
        self.require_session().await?;
        let response = self
            .mutations
            .mutate(&SaveTemplate(NewTemplate {
                name: name.to_string(),
                content: content.to_string(),
            }))
            .await?;
        Ok(serde_json::from_value(response)?)
    }

    // ============================================================================
    // Compose
    // ============================================================================

    pub async fn draft(&self) -> MessageComposer {
        self.composer.lock().await.clone()
    }

    pub async fn compose_to(&self, traveler_id: &str) {
        self.composer.lock().await.select_traveler(traveler_id);
    }

    pub async fn set_draft(&self, text: &str) {
        self.composer.lock().await.set_text(text);
    }

    /// Copies a saved template's content into the compose field, replacing
    /// the current draft. Returns the new draft text.
    pub async fn apply_template(&self, template_id: &str) -> Result<String> {
        let templates = self.templates().await?;
        let template = templates
            .iter()
            .find(|t| t.id == template_id)
            .ok_or_else(|| HostdeskError::validation(format!("Unknown template '{}'", template_id)))?;

        let mut composer = self.composer.lock().await;
        composer.apply_template(template);
        Ok(composer.text().to_string())
    }

    /// Sends the compose field to its traveler and clears it on success.
    pub async fn send_message(&self) -> Result<Notice> {
        self.require_session().await?;
        let message = self.composer.lock().await.to_message()?;

        self.mutations.mutate(&SendMessage(message)).await?;
        self.composer.lock().await.clear();
        Ok(Notice::info(
            "Message Sent",
            "Your personalized message has been sent to the candidate.",
        ))
    }

    // ============================================================================
    // Notifications
    // ============================================================================

    /// Starts the notification timer. The caller owns the handle and must
    /// stop or drop it when the notification surface goes away.
    pub fn start_notifications(
        &self,
        source: Arc<dyn NotificationSource>,
        period: Duration,
    ) -> PollerHandle {
        NotificationPoller::start(self.notifications.clone(), source, period)
    }
}

/// Decodes a mutation response, falling back when the server sent no body.
fn decode_or<T: DeserializeOwned>(value: Value, fallback: T) -> Result<T> {
    if value.is_null() {
        return Ok(fallback);
    }
    Ok(serde_json::from_value(value)?)
}
