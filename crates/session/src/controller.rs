//! [`SortController`] composes the backend, the user token, the list
//! cache, the list menu and the reorder session into the operations an
//! interface layer calls.
//!
//! Every error is recovered here: state is rolled back to the last
//! consistent value, a user-facing message is stored in
//! [`last_error`](SortController::last_error) and the technical detail is
//! logged. The error is still returned so callers can react to it.

use std::collections::HashSet;
use std::sync::Arc;

use colorboxd_core::backend::ListBackend;
use colorboxd_core::error::CoreError;
use colorboxd_core::types::{ListSummary, UserToken};

use crate::cache::ListCache;
use crate::config::SessionConfig;
use crate::menu::ListMenu;
use crate::session::{ReorderSession, SessionState, SubmitOutcome};

pub struct SortController {
    backend: Arc<dyn ListBackend>,
    token: Option<UserToken>,
    cache: ListCache,
    menu: ListMenu,
    session: ReorderSession,
    /// Lists cached before the last refresh; their next fetch bypasses
    /// HTTP caches.
    refreshed_ids: HashSet<String>,
    last_error: Option<String>,
}

impl SortController {
    /// Signed-out controller with an empty cache and menu.
    pub fn new(backend: Arc<dyn ListBackend>, config: &SessionConfig) -> Self {
        Self {
            backend,
            token: None,
            cache: ListCache::new(config.list_ttl),
            menu: ListMenu::new(config.min_list_length, config.hint_duration),
            session: ReorderSession::new(config.list_ttl),
            refreshed_ids: HashSet::new(),
            last_error: None,
        }
    }

    // ---- accessors ----

    /// The signed-in user's token, if any.
    pub fn token(&self) -> Option<&UserToken> {
        self.token.as_ref()
    }

    /// The list menu: summaries, selection and hint.
    pub fn menu(&self) -> &ListMenu {
        &self.menu
    }

    /// The reorder session for the loaded list.
    pub fn session(&self) -> &ReorderSession {
        &self.session
    }

    /// Lists fetched during this sign-in.
    pub fn cache(&self) -> &ListCache {
        &self.cache
    }

    /// User-facing message of the last failed operation.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Forget the last error once it has been shown.
    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    // ---- authentication ----

    /// Adopt an already persisted token. `None` signs out.
    pub fn set_token(&mut self, token: Option<UserToken>) {
        if token.is_none() {
            self.reset_user_state();
        }
        self.token = token;
    }

    /// Exchange a Letterboxd authorization code for a token.
    pub async fn sign_in(&mut self, auth_code: &str) -> Result<UserToken, CoreError> {
        let result = self.backend.auth_user(auth_code).await;
        let token = self.record(result)?;
        tracing::info!(user_id = %token.user_id, username = %token.username, "Signed in");
        self.reset_user_state();
        self.token = Some(token.clone());
        Ok(token)
    }

    /// Drop the token and everything fetched with it.
    pub fn sign_out(&mut self) {
        tracing::info!("Signed out");
        self.set_token(None);
    }

    // ---- list menu ----

    /// Fetch the user's list summaries.
    pub async fn load_lists(&mut self) -> Result<&[ListSummary], CoreError> {
        self.fetch_lists(false).await?;
        Ok(self.menu.summaries())
    }

    /// Drop every cached list and the loaded session, then refetch the
    /// summaries bypassing HTTP caches.
    pub async fn refresh_lists(&mut self) -> Result<&[ListSummary], CoreError> {
        // Invalidate before the fetch so a late response cannot repopulate.
        self.refreshed_ids.extend(self.cache.ids().map(str::to_string));
        self.cache.clear();
        self.menu.invalidate();
        self.drop_loaded_list();

        self.fetch_lists(true).await?;
        Ok(self.menu.summaries())
    }

    /// Choose the list at `index` in the menu.
    pub fn select_list(&mut self, index: usize) -> Result<(), CoreError> {
        let result = self.menu.select(index);
        self.record(result)?;
        tracing::debug!(index, "List selected");
        Ok(())
    }

    /// Fetch (or reuse from cache) the chosen list and load it into the
    /// session.
    ///
    /// Returns `Ok(false)` when the response arrived after the menu moved
    /// on and was discarded.
    pub async fn sort_selected(&mut self) -> Result<bool, CoreError> {
        let token = self.require_token()?;

        let begun = self.menu.begin_sort();
        let ticket = match begun {
            Ok(ticket) => ticket,
            Err(err @ CoreError::MinimumLength { .. }) => return Err(err),
            Err(err) => return Err(self.fail(err)),
        };
        let list_id = ticket.summary.id.clone();

        if let Some(list) = self.cache.get(&list_id) {
            tracing::debug!(list_id = %list_id, "Using cached list");
            self.menu.finish_sort(&ticket);
            let result = self.session.load_list(list);
            self.record(result)?;
            return Ok(true);
        }

        let cache_generation = self.cache.generation();
        let refresh = self.refreshed_ids.remove(&list_id);
        tracing::info!(list_id = %list_id, film_count = ticket.summary.film_count, refresh, "Requesting sorted list");
        let result = self.backend.sort_list(&token, &ticket.summary, refresh).await;

        if !self.menu.finish_sort(&ticket) {
            tracing::warn!(list_id = %list_id, "Discarding stale sort response");
            return Ok(false);
        }

        let list = self.record(result)?;
        let result = self.session.load_list(list.clone());
        self.record(result)?;
        self.cache.set_if_current(cache_generation, list);
        Ok(true)
    }

    // ---- reorder session ----

    /// See [`ReorderSession::choose_start`].
    pub fn choose_start(&mut self, entry_id: &str) -> Result<(), CoreError> {
        let result = self.session.choose_start(entry_id);
        self.record(result)
    }

    /// See [`ReorderSession::choose_start_slot`].
    pub fn choose_start_slot(&mut self, slot: usize) -> Result<(), CoreError> {
        let result = self.session.choose_start_slot(slot);
        self.record(result)
    }

    /// See [`ReorderSession::change_sort_mode`].
    pub fn change_sort_mode(&mut self, key: &str) -> Result<(), CoreError> {
        let result = self.session.change_sort_mode(key);
        self.record(result)
    }

    /// See [`ReorderSession::toggle_original`].
    pub fn toggle_original(&mut self) -> Result<(), CoreError> {
        let result = self.session.toggle_original();
        self.record(result)
    }

    /// See [`ReorderSession::toggle_reverse`].
    pub fn toggle_reverse(&mut self) -> Result<(), CoreError> {
        let result = self.session.toggle_reverse();
        self.record(result)
    }

    /// Save the current order. On success the saved list is evicted from
    /// the cache so the next sort sees the new order.
    pub async fn submit(&mut self) -> Result<SubmitOutcome, CoreError> {
        let token = self.require_token()?;
        let result = self.session.submit(self.backend.as_ref(), &token).await;
        let outcome = self.record(result)?;
        if let SubmitOutcome::Saved { list_id } = &outcome {
            self.cache.remove(list_id);
        }
        Ok(outcome)
    }

    /// Abandon the loaded list. The cache keeps it for a cheap reload.
    pub fn cancel(&mut self) -> Result<(), CoreError> {
        let result = self.session.cancel();
        self.record(result)
    }

    // ---- private helpers ----

    async fn fetch_lists(&mut self, refresh: bool) -> Result<(), CoreError> {
        let token = self.require_token()?;
        let user_id = self.token.as_ref().map(|t| t.user_id.clone()).unwrap_or_default();

        let result = self.backend.get_lists(&token, &user_id, refresh).await;
        let summaries = self.record(result)?;
        tracing::info!(count = summaries.len(), refresh, "List summaries loaded");
        self.menu.set_summaries(summaries);
        Ok(())
    }

    fn require_token(&mut self) -> Result<String, CoreError> {
        match &self.token {
            Some(token) => Ok(token.token.clone()),
            None => Err(self.fail(CoreError::NoSession)),
        }
    }

    fn reset_user_state(&mut self) {
        self.cache.clear();
        self.refreshed_ids.clear();
        self.menu.set_summaries(Vec::new());
        self.drop_loaded_list();
        self.last_error = None;
    }

    /// Put down a loaded list, if any. The session may already have
    /// expired it, which is not an error here.
    fn drop_loaded_list(&mut self) {
        if self.session.state() != SessionState::Loaded {
            return;
        }
        if let Err(err) = self.session.cancel() {
            tracing::debug!(error = %err, "Loaded list was already dropped");
        }
    }

    fn record<T>(&mut self, result: Result<T, CoreError>) -> Result<T, CoreError> {
        match result {
            Ok(value) => {
                self.last_error = None;
                Ok(value)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn fail(&mut self, err: CoreError) -> CoreError {
        tracing::warn!(error = %err, "Operation failed");
        self.last_error = Some(err.user_message());
        err
    }
}
