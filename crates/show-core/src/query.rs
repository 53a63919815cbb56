//! Remote Query/Mutation Layer
//!
//! Every backend-owned entity is read through a stable [`QueryKey`]. A cached
//! read stays fresh until a confirmed write on the same key invalidates it;
//! failed writes leave the cache alone. While no backend connection exists,
//! reads report [`QueryState::Loading`] instead of an error.
//!
//! ```text
//!   read(key) ──▶ cached? ──yes──▶ Ready(value)
//!                    │ no
//!                    ▼
//!               backend fetch ──▶ store if generation unchanged ──▶ Ready(value)
//!                    ▲                    │ invalidated meanwhile
//!                    └────────────────────┘
//!
//!   write(key) ──▶ backend call ──ok──▶ invalidate(key)  (generation += 1)
//!                              └─err─▶ cache untouched, error returned
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::backend::Backend;
use crate::error::{Result, ShowError};
use crate::model::{
    BlobRef, Episode, Product, ShoppingItem, StripeConfiguration, StripeSessionStatus,
    UserProfile, UserRole, Video,
};

/// Refetches allowed when invalidations keep racing a read
const MAX_STALE_REFETCHES: u32 = 2;

/// Cache key per entity type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QueryKey {
    CurrentUserProfile,
    CallerUserRole,
    Videos,
    Products,
    Episodes,
    StripeConfigured,
}

impl QueryKey {
    pub fn as_str(&self) -> &str {
        match self {
            QueryKey::CurrentUserProfile => "currentUserProfile",
            QueryKey::CallerUserRole => "callerUserRole",
            QueryKey::Videos => "videos",
            QueryKey::Products => "products",
            QueryKey::Episodes => "episodes",
            QueryKey::StripeConfigured => "stripeConfigured",
        }
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a page renders for a read
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryState<T> {
    /// Connection not ready or request outstanding
    Loading,
    Ready(T),
    /// User-facing failure message
    Failed(String),
}

impl<T> QueryState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            QueryState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_ready(self) -> Option<T> {
        match self {
            QueryState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> QueryState<U> {
        match self {
            QueryState::Loading => QueryState::Loading,
            QueryState::Ready(value) => QueryState::Ready(f(value)),
            QueryState::Failed(msg) => QueryState::Failed(msg),
        }
    }

    fn from_error(err: &ShowError) -> Self {
        if err.is_pending() {
            QueryState::Loading
        } else {
            QueryState::Failed(err.user_message())
        }
    }
}

#[derive(Clone, Debug)]
enum CachedValue {
    Profile(Option<UserProfile>),
    Role(UserRole),
    Videos(Vec<Video>),
    Products(Vec<Product>),
    Episodes(Vec<Episode>),
    StripeConfigured(bool),
}

/// Typed view of one cache slot
trait Cached: Clone {
    const KEY: QueryKey;
    fn wrap(self) -> CachedValue;
    fn unwrap(value: &CachedValue) -> Option<Self>;
}

macro_rules! cached {
    ($ty:ty, $key:ident, $variant:ident) => {
        impl Cached for $ty {
            const KEY: QueryKey = QueryKey::$key;

            fn wrap(self) -> CachedValue {
                CachedValue::$variant(self)
            }

            fn unwrap(value: &CachedValue) -> Option<Self> {
                match value {
                    CachedValue::$variant(inner) => Some(inner.clone()),
                    _ => None,
                }
            }
        }
    };
}

cached!(Option<UserProfile>, CurrentUserProfile, Profile);
cached!(UserRole, CallerUserRole, Role);
cached!(Vec<Video>, Videos, Videos);
cached!(Vec<Product>, Products, Products);
cached!(Vec<Episode>, Episodes, Episodes);
cached!(bool, StripeConfigured, StripeConfigured);

#[derive(Default)]
struct Slot {
    value: Option<CachedValue>,
    /// Bumped on every invalidation; fetches started under an older
    /// generation must not repopulate the slot
    generation: u64,
}

/// Cached access to the backend, shared by every page
pub struct QueryClient {
    backend: RwLock<Option<Arc<dyn Backend>>>,
    slots: RwLock<HashMap<QueryKey, Slot>>,
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryClient {
    /// Client without a backend connection; every read is `Loading`
    pub fn new() -> Self {
        Self {
            backend: RwLock::new(None),
            slots: RwLock::new(HashMap::new()),
        }
    }

    pub fn connected(backend: Arc<dyn Backend>) -> Self {
        let client = Self::new();
        client.connect(backend);
        client
    }

    /// Install the backend connection once it is initialized
    pub fn connect(&self, backend: Arc<dyn Backend>) {
        *self.backend.write().unwrap_or_else(PoisonError::into_inner) = Some(backend);
        tracing::debug!("Backend connection ready");
    }

    /// Drop the connection and every cached read
    pub fn disconnect(&self) {
        *self.backend.write().unwrap_or_else(PoisonError::into_inner) = None;
        self.clear();
    }

    pub fn is_connected(&self) -> bool {
        self.backend.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    /// The live connection, if any
    pub fn backend(&self) -> Option<Arc<dyn Backend>> {
        self.backend.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Mark one key stale so the next read refetches
    pub fn invalidate(&self, key: QueryKey) {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        let slot = slots.entry(key).or_default();
        slot.value = None;
        slot.generation += 1;
        tracing::debug!(key = %key, generation = slot.generation, "Invalidated query");
    }

    /// Invalidate everything (logout)
    pub fn clear(&self) {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        for slot in slots.values_mut() {
            slot.value = None;
            slot.generation += 1;
        }
    }

    /// Whether a fresh value is cached for `key`
    pub fn is_fresh(&self, key: QueryKey) -> bool {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .is_some_and(|slot| slot.value.is_some())
    }

    // ------------------------------------------------------------------
    // Profile & role
    // ------------------------------------------------------------------

    pub async fn caller_profile(&self) -> QueryState<Option<UserProfile>> {
        self.read(|backend| async move { backend.get_caller_user_profile().await })
            .await
    }

    pub async fn save_caller_profile(&self, profile: &UserProfile) -> Result<()> {
        self.write(QueryKey::CurrentUserProfile, |backend| async move {
            backend.save_caller_user_profile(profile).await
        })
        .await
    }

    pub async fn caller_role(&self) -> QueryState<UserRole> {
        self.read(|backend| async move { backend.get_caller_user_role().await })
            .await
    }

    pub async fn is_caller_admin(&self) -> QueryState<bool> {
        self.caller_role().await.map(|role| role.is_admin())
    }

    // ------------------------------------------------------------------
    // Videos
    // ------------------------------------------------------------------

    pub async fn videos(&self) -> QueryState<Vec<Video>> {
        self.read(|backend| async move { backend.get_videos().await })
            .await
    }

    pub async fn add_video(&self, id: &str, video: &BlobRef) -> Result<()> {
        self.write(QueryKey::Videos, |backend| async move {
            backend.add_video(id, video).await
        })
        .await
    }

    // ------------------------------------------------------------------
    // Products
    // ------------------------------------------------------------------

    pub async fn products(&self) -> QueryState<Vec<Product>> {
        self.read(|backend| async move { backend.get_products().await })
            .await
    }

    pub async fn add_product(&self, product: &Product) -> Result<()> {
        self.write(QueryKey::Products, |backend| async move {
            backend.add_product(product).await
        })
        .await
    }

    pub async fn update_product(&self, product: &Product) -> Result<()> {
        self.write(QueryKey::Products, |backend| async move {
            backend.update_product(product).await
        })
        .await
    }

    pub async fn delete_product(&self, product_id: &str) -> Result<()> {
        self.write(QueryKey::Products, |backend| async move {
            backend.delete_product(product_id).await
        })
        .await
    }

    // ------------------------------------------------------------------
    // Episodes
    // ------------------------------------------------------------------

    /// Episodes, newest id first regardless of backend order
    pub async fn episodes(&self) -> QueryState<Vec<Episode>> {
        self.read(|backend| async move {
            let mut episodes = backend.get_episodes().await?;
            episodes.sort_by(|a, b| b.id.cmp(&a.id));
            Ok::<_, ShowError>(episodes)
        })
        .await
    }

    pub async fn add_episode(&self, episode: &Episode) -> Result<()> {
        self.write(QueryKey::Episodes, |backend| async move {
            backend.add_episode(episode).await
        })
        .await
    }

    pub async fn update_episode(&self, episode: &Episode) -> Result<()> {
        self.write(QueryKey::Episodes, |backend| async move {
            backend.update_episode(episode).await
        })
        .await
    }

    pub async fn delete_episode(&self, episode_id: &str) -> Result<()> {
        self.write(QueryKey::Episodes, |backend| async move {
            backend.delete_episode(episode_id).await
        })
        .await
    }

    // ------------------------------------------------------------------
    // Stripe
    // ------------------------------------------------------------------

    pub async fn stripe_configured(&self) -> QueryState<bool> {
        self.read(|backend| async move { backend.is_stripe_configured().await })
            .await
    }

    pub async fn set_stripe_configuration(&self, config: &StripeConfiguration) -> Result<()> {
        self.write(QueryKey::StripeConfigured, |backend| async move {
            backend.set_stripe_configuration(config).await
        })
        .await
    }

    /// Uncached: each checkout attempt reaches the backend exactly once
    pub async fn create_checkout_session(
        &self,
        items: &[ShoppingItem],
        success_url: &str,
        cancel_url: &str,
    ) -> Result<String> {
        let backend = self.backend().ok_or(ShowError::NotConnected)?;
        backend.create_checkout_session(items, success_url, cancel_url).await
    }

    /// Uncached status lookup for the payment result pages
    pub async fn stripe_session_status(&self, session_id: &str) -> QueryState<StripeSessionStatus> {
        let Some(backend) = self.backend() else {
            return QueryState::Loading;
        };
        match backend.get_stripe_session_status(session_id).await {
            Ok(status) => QueryState::Ready(status),
            Err(e) => {
                tracing::warn!(session_id, error = %e, "Session status lookup failed");
                QueryState::from_error(&e)
            }
        }
    }

    // ------------------------------------------------------------------
    // Plumbing
    // ------------------------------------------------------------------

    async fn read<T, F, Fut>(&self, fetch: F) -> QueryState<T>
    where
        T: Cached,
        F: Fn(Arc<dyn Backend>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let Some(backend) = self.backend() else {
            return QueryState::Loading;
        };

        let mut attempt = 0;
        loop {
            if let Some(hit) = self.cached::<T>() {
                tracing::trace!(key = %T::KEY, "Query cache hit");
                return QueryState::Ready(hit);
            }

            let generation = self.generation(T::KEY);
            let value = match fetch(Arc::clone(&backend)).await {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(key = %T::KEY, error = %e, "Query failed");
                    return QueryState::from_error(&e);
                }
            };
            attempt += 1;
            if self.store(T::KEY, generation, value.clone().wrap()) || attempt > MAX_STALE_REFETCHES {
                return QueryState::Ready(value);
            }
        }
    }

    async fn write<F, Fut>(&self, key: QueryKey, op: F) -> Result<()>
    where
        F: FnOnce(Arc<dyn Backend>) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let backend = self.backend().ok_or(ShowError::NotConnected)?;
        if let Err(e) = op(backend).await {
            tracing::warn!(key = %key, error = %e, "Mutation failed; cache left untouched");
            return Err(e);
        }
        self.invalidate(key);
        Ok(())
    }

    fn cached<T: Cached>(&self) -> Option<T> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots.get(&T::KEY)?.value.as_ref().and_then(T::unwrap)
    }

    fn generation(&self, key: QueryKey) -> u64 {
        self.slots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_default()
            .generation
    }

    /// Cache `value` unless `key` was invalidated since `generation`
    fn store(&self, key: QueryKey, generation: u64, value: CachedValue) -> bool {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        let slot = slots.entry(key).or_default();
        if slot.generation == generation {
            slot.value = Some(value);
            true
        } else {
            tracing::debug!(key = %key, "Discarding fetch that raced an invalidation");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::cart::Cart;
    use crate::model::BlobRef;
    use rust_decimal_macros::dec;

    fn product(id: &str, price_cents: u64) -> Product {
        Product {
            id: id.into(),
            name: format!("Product {id}"),
            description: "Merch".into(),
            price_cents,
            image: BlobRef::from_url(format!("https://cdn.example.com/{id}.png")),
        }
    }

    fn episode(id: &str) -> Episode {
        Episode {
            id: id.into(),
            title: id.to_uppercase(),
            description: String::new(),
            url: format!("https://cdn.example.com/{id}.mp3"),
        }
    }

    fn client_with(backend: &Arc<MemoryBackend>) -> QueryClient {
        QueryClient::connected(backend.clone())
    }

    #[tokio::test]
    async fn test_reads_are_loading_until_connected() {
        let client = QueryClient::new();
        assert!(client.products().await.is_loading());
        assert!(client.caller_role().await.is_loading());
        assert!(matches!(
            client.add_product(&product("p1", 100)).await,
            Err(ShowError::NotConnected)
        ));

        let backend = Arc::new(MemoryBackend::new());
        client.connect(backend);
        assert_eq!(client.products().await, QueryState::Ready(Vec::new()));
    }

    #[tokio::test]
    async fn test_second_read_is_served_from_cache() {
        let backend = Arc::new(MemoryBackend::new().with_products(vec![product("p1", 1999)]));
        let client = client_with(&backend);

        client.products().await;
        client.products().await;

        assert_eq!(backend.read_count(), 1);
        assert!(client.is_fresh(QueryKey::Products));
    }

    #[tokio::test]
    async fn test_product_writes_invalidate() {
        let backend = Arc::new(MemoryBackend::new());
        let client = client_with(&backend);
        assert_eq!(client.products().await.into_ready().unwrap().len(), 0);

        client.add_product(&product("p1", 1999)).await.unwrap();
        assert!(!client.is_fresh(QueryKey::Products));
        let products = client.products().await.into_ready().unwrap();
        assert_eq!(products.len(), 1);

        let mut cart = Cart::new();
        cart.add_item(&products[0]);
        cart.add_item(&products[0]);
        assert_eq!(cart.total_price(), dec!(39.98));

        let mut renamed = product("p1", 2500);
        renamed.name = "Hoodie".into();
        client.update_product(&renamed).await.unwrap();
        let products = client.products().await.into_ready().unwrap();
        assert_eq!(products[0].name, "Hoodie");
        assert_eq!(products[0].price_cents, 2500);

        client.delete_product("p1").await.unwrap();
        assert!(client.products().await.into_ready().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_write_keeps_cache() {
        let backend = Arc::new(MemoryBackend::with_role(UserRole::User));
        let client = client_with(&backend);
        client.products().await;

        let result = client.add_product(&product("p1", 100)).await;
        assert!(matches!(result, Err(ShowError::Rejected(_))));
        assert!(client.is_fresh(QueryKey::Products));

        client.products().await;
        assert_eq!(backend.read_count(), 1);
    }

    #[tokio::test]
    async fn test_write_only_invalidates_its_key() {
        let backend = Arc::new(MemoryBackend::new());
        let client = client_with(&backend);
        client.products().await;
        client.episodes().await;

        client.add_episode(&episode("e1")).await.unwrap();

        assert!(client.is_fresh(QueryKey::Products));
        assert!(!client.is_fresh(QueryKey::Episodes));
    }

    #[tokio::test]
    async fn test_episodes_sorted_descending() {
        let backend = Arc::new(MemoryBackend::new().with_episodes(vec![
            episode("episode-100"),
            episode("episode-300"),
            episode("episode-200"),
        ]));
        let client = client_with(&backend);

        let ids: Vec<_> = client
            .episodes()
            .await
            .into_ready()
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["episode-300", "episode-200", "episode-100"]);
    }

    #[tokio::test]
    async fn test_backend_failure_is_reported_not_cached() {
        let backend = Arc::new(MemoryBackend::new());
        let client = client_with(&backend);
        backend.set_unavailable(true);

        assert!(matches!(client.videos().await, QueryState::Failed(_)));
        assert!(!client.is_fresh(QueryKey::Videos));

        backend.set_unavailable(false);
        assert_eq!(client.videos().await, QueryState::Ready(Vec::new()));
    }

    #[test]
    fn test_stale_fetch_does_not_repopulate() {
        let client = QueryClient::new();
        let generation = client.generation(QueryKey::Products);
        client.invalidate(QueryKey::Products);
        client.store(QueryKey::Products, generation, CachedValue::Products(Vec::new()));

        assert!(!client.is_fresh(QueryKey::Products));
    }

    #[tokio::test]
    async fn test_read_refetches_after_racing_write() {
        let backend = Arc::new(MemoryBackend::new());
        let client = client_with(&backend);
        let fetches = std::cell::Cell::new(0);

        let state = client
            .read(|backend| {
                let (client, fetches) = (&client, &fetches);
                async move {
                    let products = backend.get_products().await;
                    fetches.set(fetches.get() + 1);
                    if fetches.get() == 1 {
                        // admin edit lands while the first fetch is in flight
                        client.add_product(&product("p1", 1999)).await?;
                    }
                    products
                }
            })
            .await;

        assert_eq!(fetches.get(), 2);
        assert_eq!(state.into_ready().map(|products: Vec<Product>| products.len()), Some(1));
        assert!(client.is_fresh(QueryKey::Products));
    }

    #[tokio::test]
    async fn test_disconnect_clears_cache() {
        let backend = Arc::new(MemoryBackend::new());
        let client = client_with(&backend);
        client.caller_role().await;
        assert!(client.is_fresh(QueryKey::CallerUserRole));

        client.disconnect();
        assert!(!client.is_fresh(QueryKey::CallerUserRole));
        assert!(client.caller_role().await.is_loading());
    }

    #[tokio::test]
    async fn test_profile_save_invalidates_profile() {
        let backend = Arc::new(MemoryBackend::with_role(UserRole::User));
        let client = client_with(&backend);
        assert_eq!(client.caller_profile().await, QueryState::Ready(None));

        let profile = UserProfile { name: "Shireen".into() };
        client.save_caller_profile(&profile).await.unwrap();
        assert_eq!(client.caller_profile().await, QueryState::Ready(Some(profile)));
        assert_eq!(client.is_caller_admin().await, QueryState::Ready(false));
    }
}
