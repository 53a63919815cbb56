//! Browser Adapters
//!
//! `web_sys` implementations of the seams defined by the core crates.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::channel::oneshot;
use leptos::prelude::set_timeout;
use show_client::{BackendConfig, HttpBackend};
use show_core::{IdentityProvider, PreferenceStore, Result};
use show_payments::{Navigator, PaymentError};

/// localStorage key holding the server session token
const SESSION_TOKEN_KEY: &str = "showSessionToken";

/// `window.location.origin`; empty outside a browser
pub fn origin() -> String {
    web_sys::window()
        .and_then(|window| window.location().origin().ok())
        .unwrap_or_default()
}

/// `window.location.search`, including the leading `?`
pub fn search() -> String {
    web_sys::window()
        .and_then(|window| window.location().search().ok())
        .unwrap_or_default()
}

/// Blocking yes/no prompt
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}

pub fn now_millis() -> u128 {
    u128::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default()
}

/// `window.localStorage`
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }

    fn remove(self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}

impl PreferenceStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.set_item(key, value);
        }
    }
}

/// Full-page navigation plus `window.alert`
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn redirect(&self, url: &str) -> show_payments::Result<()> {
        let window = web_sys::window().ok_or_else(|| PaymentError::Navigation("no window".into()))?;
        window
            .location()
            .set_href(url)
            .map_err(|_| PaymentError::Navigation(format!("could not open {url}")))
    }

    fn alert(&self, message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
}

/// Session handling for the HTTP backend
///
/// The token survives reloads in localStorage, and the login retry pause
/// runs on a DOM timer.
pub struct BrowserIdentity {
    backend: Arc<HttpBackend>,
}

impl BrowserIdentity {
    /// Pick up a session saved by an earlier page load
    pub fn restore(config: BackendConfig) -> Self {
        let backend = match LocalStorage.get(SESSION_TOKEN_KEY) {
            Some(token) => HttpBackend::new(config).with_token(token),
            None => HttpBackend::new(config),
        };
        Self { backend: Arc::new(backend) }
    }

    pub fn backend(&self) -> Arc<HttpBackend> {
        Arc::clone(&self.backend)
    }
}

#[async_trait(?Send)]
impl IdentityProvider for BrowserIdentity {
    async fn login(&self) -> Result<()> {
        self.backend.login().await?;
        if let Some(token) = self.backend.token() {
            LocalStorage.set(SESSION_TOKEN_KEY, &token);
        }
        Ok(())
    }

    async fn logout(&self) -> Result<()> {
        LocalStorage.remove(SESSION_TOKEN_KEY);
        self.backend.logout().await
    }

    fn is_authenticated(&self) -> bool {
        self.backend.is_authenticated()
    }

    async fn pause(&self, delay: Duration) {
        let (done, wait) = oneshot::channel();
        set_timeout(
            move || {
                let _ = done.send(());
            },
            delay,
        );
        let _ = wait.await;
    }
}
