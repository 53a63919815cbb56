//! Backend Integration
//!
//! The remote-procedure surface of the platform that owns persistence,
//! authentication, file storage and payment sessions.

mod memory;

pub use memory::MemoryBackend;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{
    BlobRef, Episode, Product, ShoppingItem, StripeConfiguration, StripeSessionStatus,
    UserProfile, UserRole, Video,
};

/// Backend trait (Strategy pattern)
///
/// Implemented over HTTP for the browser and in memory for tests. Futures are
/// not required to be `Send`: browser fetches run on the single UI thread.
#[async_trait(?Send)]
pub trait Backend: Send + Sync {
    /// Profile of the calling user, if one has been saved
    async fn get_caller_user_profile(&self) -> Result<Option<UserProfile>>;

    async fn save_caller_user_profile(&self, profile: &UserProfile) -> Result<()>;

    async fn get_caller_user_role(&self) -> Result<UserRole>;

    async fn is_caller_admin(&self) -> Result<bool> {
        Ok(self.get_caller_user_role().await?.is_admin())
    }

    async fn get_videos(&self) -> Result<Vec<Video>>;

    async fn add_video(&self, id: &str, video: &BlobRef) -> Result<()>;

    async fn get_products(&self) -> Result<Vec<Product>>;

    async fn add_product(&self, product: &Product) -> Result<()>;

    async fn update_product(&self, product: &Product) -> Result<()>;

    async fn delete_product(&self, product_id: &str) -> Result<()>;

    async fn get_episodes(&self) -> Result<Vec<Episode>>;

    async fn add_episode(&self, episode: &Episode) -> Result<()>;

    async fn update_episode(&self, episode: &Episode) -> Result<()>;

    async fn delete_episode(&self, episode_id: &str) -> Result<()>;

    async fn is_stripe_configured(&self) -> Result<bool>;

    async fn set_stripe_configuration(&self, config: &StripeConfiguration) -> Result<()>;

    /// Create a hosted checkout session
    ///
    /// Returns the serialized session descriptor (`{"id": .., "url": ..}`);
    /// callers deserialize and validate it.
    async fn create_checkout_session(
        &self,
        items: &[ShoppingItem],
        success_url: &str,
        cancel_url: &str,
    ) -> Result<String>;

    async fn get_stripe_session_status(&self, session_id: &str) -> Result<StripeSessionStatus>;
}
