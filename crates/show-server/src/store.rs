//! Content Store
//!
//! In-memory persistence for catalog content, caller sessions and profiles.
//! Everything is lost on restart.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use show_core::{BlobRef, Episode, Product, UserProfile, UserRole, Video};
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("Caller already has an active session")]
    AlreadyAuthenticated,

    #[error("Login required")]
    Unauthorized,

    #[error("Admin access required")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    Invalid(String),
}

/// An authenticated caller
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Caller {
    pub principal: String,
    pub role: UserRole,
    pub since: DateTime<Utc>,
}

impl Caller {
    pub fn require_admin(&self) -> Result<()> {
        if self.role.is_admin() { Ok(()) } else { Err(StoreError::Forbidden) }
    }
}

/// Shared in-memory store
#[derive(Default)]
pub struct ContentStore {
    sessions: RwLock<HashMap<String, Caller>>,
    /// Principals seen so far; the first one is the admin
    principals: RwLock<Vec<String>>,
    profiles: RwLock<HashMap<String, UserProfile>>,
    products: RwLock<Vec<Product>>,
    episodes: RwLock<Vec<Episode>>,
    videos: RwLock<Vec<Video>>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Sessions
    // ------------------------------------------------------------------

    /// Issue a session token for a new principal
    pub fn login(&self, presented: Option<&str>) -> Result<(String, Caller)> {
        if presented.is_some_and(|token| self.caller(token).is_some()) {
            return Err(StoreError::AlreadyAuthenticated);
        }

        let principal = uuid::Uuid::new_v4().to_string();
        let role = {
            let mut principals = self.principals.write().unwrap_or_else(PoisonError::into_inner);
            principals.push(principal.clone());
            if principals.len() == 1 { UserRole::Admin } else { UserRole::User }
        };

        let token = uuid::Uuid::new_v4().simple().to_string();
        let caller = Caller { principal, role, since: Utc::now() };
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.clone(), caller.clone());

        tracing::info!(principal = %caller.principal, role = role.as_str(), "Caller logged in");
        Ok((token, caller))
    }

    pub fn logout(&self, token: &str) -> Option<Caller> {
        let caller = self.sessions.write().unwrap_or_else(PoisonError::into_inner).remove(token)?;
        let minutes = (Utc::now() - caller.since).num_minutes();
        tracing::info!(principal = %caller.principal, minutes, "Caller logged out");
        Some(caller)
    }

    pub fn caller(&self, token: &str) -> Option<Caller> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner).get(token).cloned()
    }

    pub fn role_of(&self, caller: Option<&Caller>) -> UserRole {
        caller.map(|c| c.role).unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Profiles
    // ------------------------------------------------------------------

    pub fn profile(&self, caller: Option<&Caller>) -> Option<UserProfile> {
        let caller = caller?;
        self.profiles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&caller.principal)
            .cloned()
    }

    pub fn save_profile(&self, caller: Option<&Caller>, profile: UserProfile) -> Result<()> {
        let caller = caller.ok_or(StoreError::Unauthorized)?;
        if profile.name.trim().is_empty() {
            return Err(StoreError::Invalid("name is required".into()));
        }
        self.profiles
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(caller.principal.clone(), profile);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Catalog
    // ------------------------------------------------------------------

    pub fn products(&self) -> Vec<Product> {
        self.products.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn add_product(&self, caller: &Caller, product: Product) -> Result<()> {
        caller.require_admin()?;
        if product.id.trim().is_empty() || product.name.trim().is_empty() {
            return Err(StoreError::Invalid("product id and name are required".into()));
        }
        insert_new(&self.products, product, |p| &p.id, "Product")
    }

    pub fn update_product(&self, caller: &Caller, product: Product) -> Result<()> {
        caller.require_admin()?;
        replace_existing(&self.products, product, |p| &p.id, "Product")
    }

    pub fn delete_product(&self, caller: &Caller, id: &str) -> Result<()> {
        caller.require_admin()?;
        remove_existing(&self.products, id, |p| &p.id, "Product")
    }

    pub fn episodes(&self) -> Vec<Episode> {
        self.episodes.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn add_episode(&self, caller: &Caller, episode: Episode) -> Result<()> {
        caller.require_admin()?;
        if episode.title.trim().is_empty() || episode.url.trim().is_empty() {
            return Err(StoreError::Invalid("episode title and url are required".into()));
        }
        insert_new(&self.episodes, episode, |e| &e.id, "Episode")
    }

    pub fn update_episode(&self, caller: &Caller, episode: Episode) -> Result<()> {
        caller.require_admin()?;
        replace_existing(&self.episodes, episode, |e| &e.id, "Episode")
    }

    pub fn delete_episode(&self, caller: &Caller, id: &str) -> Result<()> {
        caller.require_admin()?;
        remove_existing(&self.episodes, id, |e| &e.id, "Episode")
    }

    pub fn videos(&self) -> Vec<Video> {
        self.videos.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn add_video(&self, caller: &Caller, id: String, blob: BlobRef) -> Result<()> {
        caller.require_admin()?;
        if id.trim().is_empty() || blob.direct_url().is_empty() {
            return Err(StoreError::Invalid("video id and file are required".into()));
        }
        insert_new(&self.videos, Video { id, blob }, |v| &v.id, "Video")
    }
}

fn insert_new<T>(list: &RwLock<Vec<T>>, item: T, id_of: impl Fn(&T) -> &String, kind: &str) -> Result<()> {
    let mut list = list.write().unwrap_or_else(PoisonError::into_inner);
    let id = id_of(&item);
    if list.iter().any(|existing| id_of(existing) == id) {
        return Err(StoreError::Conflict(format!("{kind} {id}")));
    }
    list.push(item);
    Ok(())
}

fn replace_existing<T>(list: &RwLock<Vec<T>>, item: T, id_of: impl Fn(&T) -> &String, kind: &str) -> Result<()> {
    let mut list = list.write().unwrap_or_else(PoisonError::into_inner);
    let slot = list
        .iter_mut()
        .find(|existing| id_of(&**existing) == id_of(&item))
        .ok_or_else(|| StoreError::NotFound(format!("{kind} {}", id_of(&item))))?;
    *slot = item;
    Ok(())
}

fn remove_existing<T>(list: &RwLock<Vec<T>>, id: &str, id_of: impl Fn(&T) -> &String, kind: &str) -> Result<()> {
    let mut list = list.write().unwrap_or_else(PoisonError::into_inner);
    let before = list.len();
    list.retain(|existing| id_of(existing) != id);
    if list.len() == before {
        return Err(StoreError::NotFound(format!("{kind} {id}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str) -> Product {
        Product {
            id: id.into(),
            name: "Mug".into(),
            description: String::new(),
            price_cents: 1200,
            image: BlobRef::from_url("https://cdn.example.com/mug.png"),
        }
    }

    #[test]
    fn test_first_caller_is_admin() {
        let store = ContentStore::new();
        let (_, first) = store.login(None).unwrap();
        let (_, second) = store.login(None).unwrap();
        assert_eq!(first.role, UserRole::Admin);
        assert_eq!(second.role, UserRole::User);
    }

    #[test]
    fn test_login_with_live_token_is_rejected() {
        let store = ContentStore::new();
        let (token, _) = store.login(None).unwrap();
        assert_eq!(store.login(Some(token.as_str())), Err(StoreError::AlreadyAuthenticated));

        store.logout(&token);
        assert!(store.login(Some(token.as_str())).is_ok());
    }

    #[test]
    fn test_non_admin_writes_are_forbidden() {
        let store = ContentStore::new();
        store.login(None).unwrap();
        let (_, user) = store.login(None).unwrap();
        assert_eq!(store.add_product(&user, product("p1")), Err(StoreError::Forbidden));
        assert!(store.products().is_empty());
    }

    #[test]
    fn test_product_crud() {
        let store = ContentStore::new();
        let (_, admin) = store.login(None).unwrap();

        store.add_product(&admin, product("p1")).unwrap();
        assert!(matches!(store.add_product(&admin, product("p1")), Err(StoreError::Conflict(_))));

        let mut renamed = product("p1");
        renamed.name = "Big Mug".into();
        store.update_product(&admin, renamed).unwrap();
        assert_eq!(store.products()[0].name, "Big Mug");

        store.delete_product(&admin, "p1").unwrap();
        assert!(matches!(store.delete_product(&admin, "p1"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_guest_cannot_save_profile() {
        let store = ContentStore::new();
        let profile = UserProfile { name: "Ana".into() };
        assert_eq!(store.save_profile(None, profile.clone()), Err(StoreError::Unauthorized));

        let (_, caller) = store.login(None).unwrap();
        store.save_profile(Some(&caller), profile.clone()).unwrap();
        assert_eq!(store.profile(Some(&caller)), Some(profile));
        assert_eq!(store.profile(None), None);
    }
}
