//! Login Flow
//!
//! The identity provider owns the protocol; this module only handles the
//! client-side race where a login is issued while a stale session is still
//! around.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShowError};
use crate::query::QueryClient;

/// Pause before retrying a login that raced a stale session
pub const LOGIN_RETRY_DELAY: Duration = Duration::from_millis(300);

/// Identity provider seam
#[async_trait(?Send)]
pub trait IdentityProvider {
    /// Start a session; fails with [`ShowError::AlreadyAuthenticated`] if one exists
    async fn login(&self) -> Result<()>;

    /// End the current session (no-op without one)
    async fn logout(&self) -> Result<()>;

    fn is_authenticated(&self) -> bool;

    /// Runtime-specific sleep (timer in the browser, tokio natively)
    async fn pause(&self, delay: Duration);
}

/// Login button state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoginStatus {
    #[default]
    Idle,
    LoggingIn,
    Success,
    Failed,
}

impl LoginStatus {
    /// Text for the header button
    pub fn button_label(&self, authenticated: bool) -> &'static str {
        match (self, authenticated) {
            (LoginStatus::LoggingIn, _) => "Logging in...",
            (_, true) => "Logout",
            (_, false) => "Login",
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, LoginStatus::LoggingIn)
    }
}

/// Log in, recovering once from a stale session
///
/// On [`ShowError::AlreadyAuthenticated`] the stale session is cleared, the
/// provider pauses for [`LOGIN_RETRY_DELAY`], and login is retried a single
/// time. Any other failure is returned as is.
pub async fn sign_in(identity: &dyn IdentityProvider) -> Result<()> {
    match identity.login().await {
        Err(ShowError::AlreadyAuthenticated) => {
            tracing::warn!("Login raced an existing session; clearing and retrying");
            identity.logout().await?;
            identity.pause(LOGIN_RETRY_DELAY).await;
            identity.login().await
        }
        other => other,
    }
}

/// Header button action: log out (dropping every cached read) or log in
pub async fn toggle_session(identity: &dyn IdentityProvider, queries: &QueryClient) -> Result<LoginStatus> {
    if identity.is_authenticated() {
        let result = identity.logout().await;
        // the provider may drop local credentials even when the call fails
        if !identity.is_authenticated() {
            queries.clear();
        }
        return match result {
            Ok(()) => {
                tracing::info!("Logged out");
                Ok(LoginStatus::Idle)
            }
            Err(e) => {
                tracing::error!(error = %e, "Logout failed");
                Err(e)
            }
        };
    }

    match sign_in(identity).await {
        Ok(()) => {
            // role and profile depend on who is calling
            queries.clear();
            tracing::info!("Logged in");
            Ok(LoginStatus::Success)
        }
        Err(e) => {
            tracing::error!(error = %e, "Login failed");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::sync::Arc;

    use crate::backend::MemoryBackend;
    use crate::query::QueryKey;

    /// Provider scripted with a queue of login results
    struct ScriptedIdentity {
        authenticated: Cell<bool>,
        logins: RefCell<Vec<Result<()>>>,
        login_calls: Cell<usize>,
        logouts: Cell<usize>,
        logout_error: RefCell<Option<ShowError>>,
        pauses: RefCell<Vec<Duration>>,
    }

    impl ScriptedIdentity {
        fn new(authenticated: bool, mut logins: Vec<Result<()>>) -> Self {
            logins.reverse();
            Self {
                authenticated: Cell::new(authenticated),
                logins: RefCell::new(logins),
                login_calls: Cell::new(0),
                logouts: Cell::new(0),
                logout_error: RefCell::new(None),
                pauses: RefCell::new(Vec::new()),
            }
        }
    }

    #[async_trait(?Send)]
    impl IdentityProvider for ScriptedIdentity {
        async fn login(&self) -> Result<()> {
            self.login_calls.set(self.login_calls.get() + 1);
            let result = self.logins.borrow_mut().pop().unwrap_or(Ok(()));
            if result.is_ok() {
                self.authenticated.set(true);
            }
            result
        }

        async fn logout(&self) -> Result<()> {
            self.logouts.set(self.logouts.get() + 1);
            self.authenticated.set(false);
            match self.logout_error.borrow_mut().take() {
                Some(e) => Err(e),
                None => Ok(()),
            }
        }

        fn is_authenticated(&self) -> bool {
            self.authenticated.get()
        }

        async fn pause(&self, delay: Duration) {
            self.pauses.borrow_mut().push(delay);
        }
    }

    #[tokio::test]
    async fn test_stale_session_retries_once() {
        let identity = ScriptedIdentity::new(false, vec![Err(ShowError::AlreadyAuthenticated), Ok(())]);
        sign_in(&identity).await.unwrap();

        assert_eq!(identity.login_calls.get(), 2);
        assert_eq!(identity.logouts.get(), 1);
        assert_eq!(*identity.pauses.borrow(), vec![LOGIN_RETRY_DELAY]);
        assert!(identity.is_authenticated());
    }

    #[tokio::test]
    async fn test_retry_happens_only_once() {
        let identity = ScriptedIdentity::new(
            false,
            vec![Err(ShowError::AlreadyAuthenticated), Err(ShowError::AlreadyAuthenticated)],
        );
        let result = sign_in(&identity).await;

        assert!(matches!(result, Err(ShowError::AlreadyAuthenticated)));
        assert_eq!(identity.login_calls.get(), 2);
    }

    #[tokio::test]
    async fn test_other_errors_are_not_retried() {
        let identity = ScriptedIdentity::new(false, vec![Err(ShowError::Auth("popup closed".into()))]);
        assert!(sign_in(&identity).await.is_err());
        assert_eq!(identity.login_calls.get(), 1);
        assert_eq!(identity.logouts.get(), 0);
    }

    #[tokio::test]
    async fn test_logout_clears_queries() {
        let queries = QueryClient::connected(Arc::new(MemoryBackend::new()));
        queries.caller_role().await;
        assert!(queries.is_fresh(QueryKey::CallerUserRole));

        let identity = ScriptedIdentity::new(true, Vec::new());
        let status = toggle_session(&identity, &queries).await.unwrap();

        assert_eq!(status, LoginStatus::Idle);
        assert!(!identity.is_authenticated());
        assert!(!queries.is_fresh(QueryKey::CallerUserRole));
    }

    #[tokio::test]
    async fn test_failed_logout_still_drops_cached_role() {
        let queries = QueryClient::connected(Arc::new(MemoryBackend::new()));
        queries.caller_role().await;
        queries.caller_profile().await;

        let identity = ScriptedIdentity::new(true, Vec::new());
        *identity.logout_error.borrow_mut() = Some(ShowError::Backend("network down".into()));
        let result = toggle_session(&identity, &queries).await;

        assert!(matches!(result, Err(ShowError::Backend(_))));
        assert!(!identity.is_authenticated());
        assert!(!queries.is_fresh(QueryKey::CallerUserRole));
        assert!(!queries.is_fresh(QueryKey::CurrentUserProfile));
    }

    #[test]
    fn test_button_label() {
        assert_eq!(LoginStatus::LoggingIn.button_label(false), "Logging in...");
        assert_eq!(LoginStatus::Success.button_label(true), "Logout");
        assert_eq!(LoginStatus::Idle.button_label(false), "Login");
    }
}
