//! Application Context
//!
//! One `AppContext` is created by the root component and provided to every
//! page: the query client, the identity, the cart and the background music.

use std::future::Future;
use std::sync::Arc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use show_client::BackendConfig;
use show_core::{Backend, BackgroundMusic, Cart, IdentityProvider, QueryClient, QueryState};

use crate::browser::{self, BrowserIdentity, LocalStorage};

#[derive(Clone)]
pub struct AppContext {
    pub queries: Arc<QueryClient>,
    pub identity: Arc<BrowserIdentity>,
    pub cart: RwSignal<Cart>,
    pub music: RwSignal<BackgroundMusic>,
    pub authenticated: RwSignal<bool>,
    /// Bumped after confirmed writes and session changes
    revision: RwSignal<u64>,
}

impl AppContext {
    fn new() -> Self {
        // the server that hosts the bundle also serves the API
        let identity = BrowserIdentity::restore(BackendConfig::new(browser::origin()));
        let backend: Arc<dyn Backend> = identity.backend();
        let authenticated = identity.is_authenticated();

        Self {
            queries: Arc::new(QueryClient::connected(backend)),
            identity: Arc::new(identity),
            cart: RwSignal::new(Cart::new()),
            music: RwSignal::new(BackgroundMusic::load(&LocalStorage)),
            authenticated: RwSignal::new(authenticated),
            revision: RwSignal::new(0),
        }
    }

    /// Create the context and make it available to descendants
    pub fn provide() -> Self {
        let ctx = Self::new();
        provide_context(ctx.clone());
        ctx
    }

    pub fn expect() -> Self {
        expect_context::<Self>()
    }

    /// Re-run every mounted read; clean cache entries answer without a request
    pub fn refresh(&self) {
        self.revision.update(|revision| *revision += 1);
    }

    /// Run a write, refreshing reads once it is confirmed
    pub fn mutate<Fut>(
        &self,
        write: impl FnOnce(Arc<QueryClient>) -> Fut + 'static,
        done: impl FnOnce(show_core::Result<()>) + 'static,
    ) where
        Fut: Future<Output = show_core::Result<()>> + 'static,
    {
        let ctx = self.clone();
        spawn_local(async move {
            let result = write(Arc::clone(&ctx.queries)).await;
            match &result {
                Ok(()) => ctx.refresh(),
                Err(e) => leptos::logging::warn!("write failed: {e}"),
            }
            done(result);
        });
    }
}

/// Subscribe a component to a cached read
///
/// Starts as `Loading` and is re-run after every [`AppContext::refresh`];
/// results of fetches overtaken by a refresh are dropped.
pub fn use_query<T, F, Fut>(fetch: F) -> ReadSignal<QueryState<T>>
where
    T: Send + Sync + 'static,
    F: Fn(Arc<QueryClient>) -> Fut + 'static,
    Fut: Future<Output = QueryState<T>> + 'static,
{
    let ctx = AppContext::expect();
    let (state, set_state) = signal(QueryState::Loading);

    let revision = ctx.revision;
    Effect::new(move |_| {
        let started = revision.get();
        let pending = fetch(Arc::clone(&ctx.queries));
        spawn_local(async move {
            let result = pending.await;
            // a newer fetch owns the signal once a refresh happened
            if revision.get_untracked() == started {
                set_state.set(result);
            }
        });
    });

    state
}
