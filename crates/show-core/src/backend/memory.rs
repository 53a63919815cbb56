//! In-Memory Backend
//!
//! For tests and offline demos. Mirrors the remote platform's rules closely
//! enough to exercise the cart, checkout and cache code: content writes need
//! the admin role and every call is counted.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use super::Backend;
use crate::error::{Result, ShowError};
use crate::model::{
    BlobRef, Episode, Product, ShoppingItem, StripeConfiguration, StripeSessionStatus,
    UserProfile, UserRole, Video,
};

/// A checkout request as received by the backend
#[derive(Clone, Debug)]
pub struct RecordedCheckout {
    pub items: Vec<ShoppingItem>,
    pub success_url: String,
    pub cancel_url: String,
}

/// In-memory backend with a single fixed caller
pub struct MemoryBackend {
    role: RwLock<UserRole>,
    profile: RwLock<Option<UserProfile>>,
    products: RwLock<Vec<Product>>,
    episodes: RwLock<Vec<Episode>>,
    videos: RwLock<Vec<Video>>,
    stripe: RwLock<Option<StripeConfiguration>>,
    session_statuses: RwLock<HashMap<String, StripeSessionStatus>>,
    checkout_reply: RwLock<Option<String>>,
    checkouts: RwLock<Vec<RecordedCheckout>>,
    fail_all: AtomicBool,
    reads: AtomicUsize,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    /// Empty backend; the caller is an admin
    pub fn new() -> Self {
        Self::with_role(UserRole::Admin)
    }

    pub fn with_role(role: UserRole) -> Self {
        Self {
            role: RwLock::new(role),
            profile: RwLock::new(None),
            products: RwLock::new(Vec::new()),
            episodes: RwLock::new(Vec::new()),
            videos: RwLock::new(Vec::new()),
            stripe: RwLock::new(None),
            session_statuses: RwLock::new(HashMap::new()),
            checkout_reply: RwLock::new(None),
            checkouts: RwLock::new(Vec::new()),
            fail_all: AtomicBool::new(false),
            reads: AtomicUsize::new(0),
        }
    }

    /// Seed products without going through the admin check
    pub fn with_products(self, products: Vec<Product>) -> Self {
        *self.products.write().unwrap_or_else(PoisonError::into_inner) = products;
        self
    }

    /// Seed episodes without going through the admin check
    pub fn with_episodes(self, episodes: Vec<Episode>) -> Self {
        *self.episodes.write().unwrap_or_else(PoisonError::into_inner) = episodes;
        self
    }

    pub fn set_role(&self, role: UserRole) {
        *self.role.write().unwrap_or_else(PoisonError::into_inner) = role;
    }

    /// Make every subsequent call fail with a backend error
    pub fn set_unavailable(&self, unavailable: bool) {
        self.fail_all.store(unavailable, Ordering::SeqCst);
    }

    /// Override the raw checkout payload returned by `create_checkout_session`
    pub fn set_checkout_reply(&self, payload: impl Into<String>) {
        *self.checkout_reply.write().unwrap_or_else(PoisonError::into_inner) = Some(payload.into());
    }

    pub fn set_session_status(&self, session_id: impl Into<String>, status: StripeSessionStatus) {
        self.session_statuses
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session_id.into(), status);
    }

    /// Checkout requests received so far
    pub fn checkouts(&self) -> Vec<RecordedCheckout> {
        self.checkouts.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Number of read calls served (cache hits never reach the backend)
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<()> {
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(ShowError::Backend("backend unavailable".into()));
        }
        Ok(())
    }

    fn count_read(&self) -> Result<()> {
        self.check_available()?;
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn require_admin(&self) -> Result<()> {
        self.check_available()?;
        let role = *self.role.read().unwrap_or_else(PoisonError::into_inner);
        if role.is_admin() {
            Ok(())
        } else {
            Err(ShowError::Rejected("Unauthorized: only admins can modify content".into()))
        }
    }
}

/// Insert or replace by id
fn upsert<T>(items: &RwLock<Vec<T>>, item: &T, id_of: impl Fn(&T) -> &str, must_exist: bool) -> Result<()>
where
    T: Clone,
{
    let mut items = items.write().unwrap_or_else(PoisonError::into_inner);
    let id = id_of(item).to_string();
    match items.iter_mut().find(|existing| id_of(&**existing) == id) {
        Some(existing) => *existing = item.clone(),
        None if must_exist => return Err(ShowError::Rejected(format!("{id} not found"))),
        None => items.push(item.clone()),
    }
    Ok(())
}

#[async_trait(?Send)]
impl Backend for MemoryBackend {
    async fn get_caller_user_profile(&self) -> Result<Option<UserProfile>> {
        self.count_read()?;
        Ok(self.profile.read().unwrap_or_else(PoisonError::into_inner).clone())
    }

    async fn save_caller_user_profile(&self, profile: &UserProfile) -> Result<()> {
        self.check_available()?;
        let role = *self.role.read().unwrap_or_else(PoisonError::into_inner);
        if role == UserRole::Guest {
            return Err(ShowError::Rejected("Unauthorized: only users can save profiles".into()));
        }
        *self.profile.write().unwrap_or_else(PoisonError::into_inner) = Some(profile.clone());
        Ok(())
    }

    async fn get_caller_user_role(&self) -> Result<UserRole> {
        self.count_read()?;
        Ok(*self.role.read().unwrap_or_else(PoisonError::into_inner))
    }

    async fn get_videos(&self) -> Result<Vec<Video>> {
        self.count_read()?;
        Ok(self.videos.read().unwrap_or_else(PoisonError::into_inner).clone())
    }

    async fn add_video(&self, id: &str, video: &BlobRef) -> Result<()> {
        self.require_admin()?;
        let video = Video { id: id.to_string(), blob: video.clone() };
        upsert(&self.videos, &video, |v| v.id.as_str(), false)
    }

    async fn get_products(&self) -> Result<Vec<Product>> {
        self.count_read()?;
        Ok(self.products.read().unwrap_or_else(PoisonError::into_inner).clone())
    }

    async fn add_product(&self, product: &Product) -> Result<()> {
        self.require_admin()?;
        upsert(&self.products, product, |p| p.id.as_str(), false)
    }

    async fn update_product(&self, product: &Product) -> Result<()> {
        self.require_admin()?;
        upsert(&self.products, product, |p| p.id.as_str(), true)
    }

    async fn delete_product(&self, product_id: &str) -> Result<()> {
        self.require_admin()?;
        self.products
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|p| p.id != product_id);
        Ok(())
    }

    async fn get_episodes(&self) -> Result<Vec<Episode>> {
        self.count_read()?;
        Ok(self.episodes.read().unwrap_or_else(PoisonError::into_inner).clone())
    }

    async fn add_episode(&self, episode: &Episode) -> Result<()> {
        self.require_admin()?;
        upsert(&self.episodes, episode, |e| e.id.as_str(), false)
    }

    async fn update_episode(&self, episode: &Episode) -> Result<()> {
        self.require_admin()?;
        upsert(&self.episodes, episode, |e| e.id.as_str(), true)
    }

    async fn delete_episode(&self, episode_id: &str) -> Result<()> {
        self.require_admin()?;
        self.episodes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|e| e.id != episode_id);
        Ok(())
    }

    async fn is_stripe_configured(&self) -> Result<bool> {
        self.count_read()?;
        Ok(self.stripe.read().unwrap_or_else(PoisonError::into_inner).is_some())
    }

    async fn set_stripe_configuration(&self, config: &StripeConfiguration) -> Result<()> {
        self.require_admin()?;
        *self.stripe.write().unwrap_or_else(PoisonError::into_inner) = Some(config.clone());
        Ok(())
    }

    async fn create_checkout_session(
        &self,
        items: &[ShoppingItem],
        success_url: &str,
        cancel_url: &str,
    ) -> Result<String> {
        self.check_available()?;
        let mut checkouts = self.checkouts.write().unwrap_or_else(PoisonError::into_inner);
        checkouts.push(RecordedCheckout {
            items: items.to_vec(),
            success_url: success_url.to_string(),
            cancel_url: cancel_url.to_string(),
        });

        if let Some(reply) = self.checkout_reply.read().unwrap_or_else(PoisonError::into_inner).clone() {
            return Ok(reply);
        }

        let id = format!("cs_test_{}", checkouts.len());
        Ok(serde_json::json!({
            "id": id,
            "url": format!("https://checkout.stripe.com/c/pay/{id}"),
        })
        .to_string())
    }

    async fn get_stripe_session_status(&self, session_id: &str) -> Result<StripeSessionStatus> {
        self.count_read()?;
        self.session_statuses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(session_id)
            .cloned()
            .ok_or_else(|| ShowError::Rejected(format!("Unknown session {session_id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(id: &str) -> Episode {
        Episode {
            id: id.into(),
            title: format!("Episode {id}"),
            description: String::new(),
            url: format!("https://cdn.example.com/{id}.mp3"),
        }
    }

    #[tokio::test]
    async fn test_guest_cannot_write_content() {
        let backend = MemoryBackend::with_role(UserRole::Guest);
        let result = backend.add_episode(&episode("e1")).await;
        assert!(matches!(result, Err(ShowError::Rejected(_))));
        assert!(backend.get_episodes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_requires_existing() {
        let backend = MemoryBackend::new();
        assert!(backend.update_episode(&episode("e1")).await.is_err());

        backend.add_episode(&episode("e1")).await.unwrap();
        let mut edited = episode("e1");
        edited.title = "Renamed".into();
        backend.update_episode(&edited).await.unwrap();

        let episodes = backend.get_episodes().await.unwrap();
        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[0].title, "Renamed");
    }

    #[tokio::test]
    async fn test_default_checkout_reply_is_json() {
        let backend = MemoryBackend::new();
        let raw = backend
            .create_checkout_session(&[], "https://a/ok", "https://a/cancel")
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["id"], "cs_test_1");
        assert_eq!(backend.checkouts().len(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_fails_reads() {
        let backend = MemoryBackend::new();
        backend.set_unavailable(true);
        assert!(backend.get_products().await.is_err());
        assert_eq!(backend.read_count(), 0);
    }
}
