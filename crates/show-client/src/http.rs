//! HTTP Backend
//!
//! Implementation of `Backend` and `IdentityProvider` against the show
//! server's JSON API.

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use show_core::{
    Backend, BlobRef, Episode, IdentityProvider, Product, Result, ShoppingItem, ShowError,
    StripeConfiguration, StripeSessionStatus, UserProfile, UserRole, Video,
    wire::{
        AddVideoRequest, CheckoutRequest, ErrorResponse, LoginResponse, RoleResponse,
        StripeConfiguredResponse, codes,
    },
};

use crate::config::BackendConfig;

/// Map a non-2xx reply onto the core error taxonomy
pub fn error_from_status(status: u16, body: Option<ErrorResponse>) -> ShowError {
    let (message, code) = body
        .map(|b| (b.error, b.code))
        .unwrap_or_else(|| (format!("HTTP {status}"), String::new()));

    if code == codes::ALREADY_AUTHENTICATED {
        return ShowError::AlreadyAuthenticated;
    }
    match status {
        400 | 422 => ShowError::Validation(message),
        401 => ShowError::Auth(message),
        403 | 404 | 409 => ShowError::Rejected(message),
        _ => ShowError::Backend(message),
    }
}

/// JSON-over-HTTP backend
pub struct HttpBackend {
    client: reqwest::Client,
    config: BackendConfig,
    token: RwLock<Option<String>>,
}

impl HttpBackend {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            token: RwLock::new(None),
        }
    }

    pub fn from_env() -> Self {
        Self::new(BackendConfig::from_env())
    }

    /// Resume a session saved from an earlier page load
    #[must_use]
    pub fn with_token(self, token: impl Into<String>) -> Self {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.config.url(path));
        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| ShowError::Backend(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.json::<ErrorResponse>().await.ok();
        let err = error_from_status(status.as_u16(), body);
        tracing::warn!(status = status.as_u16(), error = %err, "Backend request failed");
        Err(err)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(self.request(Method::GET, path)).await?;
        decode(response).await
    }

    async fn write<B: Serialize + ?Sized>(&self, method: Method, path: &str, body: &B) -> Result<()> {
        self.send(self.request(method, path).json(body)).await?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    /// Start a server session; the role is logged for diagnostics
    pub async fn login(&self) -> Result<UserRole> {
        if self.token().is_some() {
            return Err(ShowError::AlreadyAuthenticated);
        }
        let response = self.send(self.request(Method::POST, "/api/auth/login")).await?;
        let login: LoginResponse = decode(response).await?;
        tracing::info!(role = login.role.as_str(), "Session started");
        self.set_token(Some(login.token));
        Ok(login.role)
    }

    /// End the server session; the local token is dropped even if the call fails
    pub async fn logout(&self) -> Result<()> {
        if self.token().is_none() {
            return Ok(());
        }
        let result = self.send(self.request(Method::POST, "/api/auth/logout")).await;
        self.set_token(None);
        result.map(|_| ())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let text = response
        .text()
        .await
        .map_err(|e| ShowError::Backend(e.to_string()))?;
    Ok(serde_json::from_str(&text)?)
}

fn item_path(collection: &str, id: &str) -> String {
    format!("/api/{collection}/{}", urlencoding::encode(id))
}

#[async_trait(?Send)]
impl Backend for HttpBackend {
    async fn get_caller_user_profile(&self) -> Result<Option<UserProfile>> {
        self.get("/api/profile").await
    }

    async fn save_caller_user_profile(&self, profile: &UserProfile) -> Result<()> {
        self.write(Method::PUT, "/api/profile", profile).await
    }

    async fn get_caller_user_role(&self) -> Result<UserRole> {
        let response: RoleResponse = self.get("/api/role").await?;
        Ok(response.role)
    }

    async fn get_videos(&self) -> Result<Vec<Video>> {
        self.get("/api/videos").await
    }

    async fn add_video(&self, id: &str, video: &BlobRef) -> Result<()> {
        let body = AddVideoRequest { id: id.to_string(), blob: video.clone() };
        self.write(Method::POST, "/api/videos", &body).await
    }

    async fn get_products(&self) -> Result<Vec<Product>> {
        self.get("/api/products").await
    }

    async fn add_product(&self, product: &Product) -> Result<()> {
        self.write(Method::POST, "/api/products", product).await
    }

    async fn update_product(&self, product: &Product) -> Result<()> {
        self.write(Method::PUT, &item_path("products", &product.id), product).await
    }

    async fn delete_product(&self, product_id: &str) -> Result<()> {
        self.delete(&item_path("products", product_id)).await
    }

    async fn get_episodes(&self) -> Result<Vec<Episode>> {
        self.get("/api/episodes").await
    }

    async fn add_episode(&self, episode: &Episode) -> Result<()> {
        self.write(Method::POST, "/api/episodes", episode).await
    }

    async fn update_episode(&self, episode: &Episode) -> Result<()> {
        self.write(Method::PUT, &item_path("episodes", &episode.id), episode).await
    }

    async fn delete_episode(&self, episode_id: &str) -> Result<()> {
        self.delete(&item_path("episodes", episode_id)).await
    }

    async fn is_stripe_configured(&self) -> Result<bool> {
        let response: StripeConfiguredResponse = self.get("/api/stripe/config").await?;
        Ok(response.configured)
    }

    async fn set_stripe_configuration(&self, config: &StripeConfiguration) -> Result<()> {
        self.write(Method::PUT, "/api/stripe/config", config).await
    }

    async fn create_checkout_session(
        &self,
        items: &[ShoppingItem],
        success_url: &str,
        cancel_url: &str,
    ) -> Result<String> {
        let body = CheckoutRequest {
            items: items.to_vec(),
            success_url: success_url.to_string(),
            cancel_url: cancel_url.to_string(),
        };
        let response = self
            .send(self.request(Method::POST, "/api/checkout").json(&body))
            .await?;
        // raw descriptor; validated by the checkout orchestrator
        response.text().await.map_err(|e| ShowError::Backend(e.to_string()))
    }

    async fn get_stripe_session_status(&self, session_id: &str) -> Result<StripeSessionStatus> {
        self.get(&item_path("checkout", session_id)).await
    }
}

#[async_trait(?Send)]
impl IdentityProvider for HttpBackend {
    async fn login(&self) -> Result<()> {
        HttpBackend::login(self).await.map(|_| ())
    }

    async fn logout(&self) -> Result<()> {
        HttpBackend::logout(self).await
    }

    fn is_authenticated(&self) -> bool {
        HttpBackend::is_authenticated(self)
    }

    async fn pause(&self, delay: Duration) {
        #[cfg(not(target_arch = "wasm32"))]
        tokio::time::sleep(delay).await;

        // the browser build wraps this provider and sleeps on a DOM timer
        #[cfg(target_arch = "wasm32")]
        let _ = delay;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(code: &str) -> Option<ErrorResponse> {
        Some(ErrorResponse { error: "nope".into(), code: code.into() })
    }

    #[test]
    fn test_error_mapping() {
        assert!(matches!(error_from_status(403, body(codes::FORBIDDEN)), ShowError::Rejected(_)));
        assert!(matches!(error_from_status(401, body(codes::UNAUTHORIZED)), ShowError::Auth(_)));
        assert!(matches!(error_from_status(400, body(codes::INVALID_INPUT)), ShowError::Validation(_)));
        assert!(matches!(
            error_from_status(409, body(codes::ALREADY_AUTHENTICATED)),
            ShowError::AlreadyAuthenticated
        ));
        assert!(matches!(error_from_status(502, None), ShowError::Backend(m) if m == "HTTP 502"));
    }

    #[test]
    fn test_item_path() {
        assert_eq!(item_path("products", "product-1"), "/api/products/product-1");
        assert_eq!(item_path("episodes", "a/b?c"), "/api/episodes/a%2Fb%3Fc");
    }

    #[tokio::test]
    async fn test_login_with_token_reports_existing_session() {
        let backend = HttpBackend::new(BackendConfig::default()).with_token("stale");
        assert!(backend.is_authenticated());
        assert!(matches!(backend.login().await, Err(ShowError::AlreadyAuthenticated)));
    }
}
