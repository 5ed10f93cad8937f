// src/menu_sync/client.rs
// The sync client: explicit cache, the current actor capability, session
// identity and tunables. Operations live in `services`.

use crate::adapter::canister_actor::seed_from_raw_rand;
use crate::adapter::{CanisterActor, CanisterTimer, RemoteActor};
use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::models::{Language, PrincipalId};
use crate::services::session_gate::SessionState;
use crate::storage::{CachedValue, QueryCache, QueryKey};
use crate::utils::guards::require_actor;
use crate::utils::ids::PhotoIdGenerator;
use crate::utils::timeout::{with_timeout, Timer};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::rc::Rc;
use tracing::{debug, info, warn};

pub struct SyncClient {
    pub(crate) config: SyncConfig,
    pub(crate) cache: Rc<QueryCache>,
    actor: RefCell<Option<Rc<dyn RemoteActor>>>,
    session: Cell<SessionState>,
    pub(crate) ids: PhotoIdGenerator,
    timer: Option<Rc<dyn Timer>>,
    reorders_in_flight: RefCell<HashMap<Language, usize>>,
}

impl SyncClient {
    /// Client with an id generator seeded from OS entropy. Inside a canister
    /// use [`SyncClient::in_canister`] instead.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new(config: SyncConfig) -> Self {
        let ids = PhotoIdGenerator::from_entropy(config.id_suffix_len);
        Self::with_parts(config, Rc::new(QueryCache::new()), ids)
    }

    /// Builds a client around an existing cache and id generator.
    pub fn with_parts(config: SyncConfig, cache: Rc<QueryCache>, ids: PhotoIdGenerator) -> Self {
        Self {
            config,
            cache,
            actor: RefCell::new(None),
            session: Cell::new(SessionState::Initializing),
            ids,
            timer: None,
            reorders_in_flight: RefCell::new(HashMap::new()),
        }
    }

    /// Client hosted in a canister, calling the restaurant canister under the
    /// hosting canister's own identity with canister timers for timeouts.
    pub async fn in_canister(config: SyncConfig, restaurant: PrincipalId) -> Result<Self, SyncError> {
        let seed = seed_from_raw_rand().await?;
        let ids = PhotoIdGenerator::seeded(seed, config.id_suffix_len);
        let client = Self::with_parts(config, Rc::new(QueryCache::new()), ids).with_timer(Rc::new(CanisterTimer));
        client.login(ic_cdk::id(), Rc::new(CanisterActor::new(restaurant)));
        Ok(client)
    }

    /// Enables `call_timeout_ms` using `timer` as the clock.
    pub fn with_timer(mut self, timer: Rc<dyn Timer>) -> Self {
        self.timer = Some(timer);
        self
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn cache(&self) -> &Rc<QueryCache> {
        &self.cache
    }

    // --- Capability & session ---

    pub fn actor(&self) -> Option<Rc<dyn RemoteActor>> {
        self.actor.borrow().clone()
    }

    pub(crate) fn require_actor(&self) -> Result<Rc<dyn RemoteActor>, SyncError> {
        require_actor(self.actor())
    }

    /// Installs or drops the actor capability. Cached data is kept.
    pub fn set_actor(&self, actor: Option<Rc<dyn RemoteActor>>) {
        *self.actor.borrow_mut() = actor;
    }

    pub fn session(&self) -> SessionState {
        self.session.get()
    }

    /// Identity provider finished restoring and found no identity.
    pub fn set_anonymous(&self, actor: Option<Rc<dyn RemoteActor>>) {
        self.session.set(SessionState::Anonymous);
        self.set_actor(actor);
    }

    pub fn login(&self, principal: PrincipalId, actor: Rc<dyn RemoteActor>) {
        info!(%principal, "session started");
        self.session.set(SessionState::Authenticated(principal));
        self.set_actor(Some(actor));
        // Role, profile and the admin user list belong to the previous identity
        self.cache.remove(&QueryKey::CurrentUserRole);
        self.cache.remove(&QueryKey::CurrentUserProfile);
        self.cache.remove(&QueryKey::AllUsers);
    }

    /// Drops identity and capability and forgets every cached value.
    pub fn logout(&self) {
        info!("session ended, clearing cache");
        self.session.set(SessionState::Anonymous);
        self.set_actor(None);
        self.cache.clear();
    }

    // --- Remote call plumbing ---

    /// Runs an actor call under the configured timeout.
    pub(crate) async fn remote<T, F>(&self, op: &'static str, call: F) -> Result<T, SyncError>
    where
        F: Future<Output = Result<T, SyncError>>,
    {
        let result = with_timeout(self.timer.as_deref(), self.config.call_timeout(), call).await;
        if let Err(e) = &result {
            warn!(op, error = %e, "remote call failed");
        }
        result
    }

    /// Cached value of `key` if it is present and fresh.
    pub(crate) fn fresh<T>(&self, key: &QueryKey, unwrap: fn(CachedValue) -> Option<T>) -> Option<T> {
        if self.cache.is_stale(key) {
            return None;
        }
        self.cache.get(key).and_then(unwrap)
    }

    /// Runs `call` as a fetch of `key` and stores its result. When the fetch
    /// was cancelled meanwhile, the result is discarded and whatever the cache
    /// holds now wins.
    pub(crate) async fn run_query<T, F>(
        &self,
        key: QueryKey,
        op: &'static str,
        wrap: fn(T) -> CachedValue,
        unwrap: fn(CachedValue) -> Option<T>,
        call: F,
    ) -> Result<T, SyncError>
    where
        T: Clone,
        F: Future<Output = Result<T, SyncError>>,
    {
        let ticket = self.cache.begin_fetch(&key);
        match self.remote(op, call).await {
            Ok(value) => {
                if self.cache.complete_fetch(ticket, wrap(value.clone())) {
                    Ok(value)
                } else {
                    debug!(%key, "fetch superseded, keeping cached value");
                    Ok(self.cache.get(&key).and_then(unwrap).unwrap_or(value))
                }
            }
            Err(e) => {
                self.cache.fail_fetch(ticket, &e);
                Err(e)
            }
        }
    }

    /// Marks `key` stale and, if the key is observed and an actor is present,
    /// refetches it. Refetch failures leave the entry stale and are only logged.
    pub async fn invalidate(&self, key: QueryKey) {
        if !self.cache.invalidate(&key) {
            return;
        }
        if self.actor().is_none() {
            return;
        }
        if let Err(e) = self.refetch(key).await {
            warn!(%key, error = %e, "refetch after invalidation failed");
        }
    }

    /// Marks `key` stale and refetches it whenever an actor is present, even
    /// if the key was never observed. Refetch failures are only logged.
    pub async fn settle(&self, key: QueryKey) {
        self.cache.invalidate(&key);
        if self.actor().is_none() {
            return;
        }
        if let Err(e) = self.refetch(key).await {
            warn!(%key, error = %e, "refetch after settle failed");
        }
    }

    /// Fetches `key` from the actor regardless of staleness.
    pub async fn refetch(&self, key: QueryKey) -> Result<(), SyncError> {
        match key {
            QueryKey::MenuPhotos(language) => self.fetch_menu_photos(language).await.map(drop),
            QueryKey::ContactInfo => self.fetch_contact_info().await.map(drop),
            QueryKey::CurrentUserProfile => self.fetch_caller_profile().await.map(drop),
            QueryKey::CurrentUserRole => self.fetch_caller_role().await.map(drop),
            QueryKey::AllUsers => self.fetch_all_users().await.map(drop),
        }
    }

    // --- Reorder bookkeeping ---

    pub fn is_reordering(&self, language: Language) -> bool {
        self.reorders_in_flight.borrow().get(&language).copied().unwrap_or(0) > 0
    }

    pub(crate) fn track_reorder(&self, language: Language) -> ReorderGuard<'_> {
        *self.reorders_in_flight.borrow_mut().entry(language).or_insert(0) += 1;
        ReorderGuard { client: self, language }
    }
}

impl fmt::Debug for SyncClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncClient")
            .field("config", &self.config)
            .field("session", &self.session.get())
            .field("has_actor", &self.actor.borrow().is_some())
            .field("cached_keys", &self.cache.len())
            .finish()
    }
}

/// Counts a reorder as in flight until dropped, including when the reorder
/// future itself is dropped midway.
pub(crate) struct ReorderGuard<'a> {
    client: &'a SyncClient,
    language: Language,
}

impl Drop for ReorderGuard<'_> {
    fn drop(&mut self) {
        if let Some(count) = self.client.reorders_in_flight.borrow_mut().get_mut(&self.language) {
            *count = count.saturating_sub(1);
        }
    }
}
