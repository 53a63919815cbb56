//! show-server
//!
//! Axum-based reference backend for the show site. Serves the JSON API the
//! browser client talks to and the built WASM frontend.

mod config;
mod handlers;
mod payments;
mod state;
mod store;

use std::path::Path;

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::handlers::{
    add_episode, add_product, add_video, checkout_status, create_checkout, delete_episode,
    delete_product, get_profile, get_role, health_check, list_episodes, list_products,
    list_videos, login, logout, save_profile, set_stripe_config, stripe_config_status,
    update_episode, update_product,
};
use crate::payments::Payments;
use crate::state::AppState;
use crate::store::ContentStore;

/// API routes plus the single-page frontend as fallback
fn app(state: AppState, static_dir: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // client-side routes (/store, /podcast, ...) all load index.html
    let frontend = ServeDir::new(static_dir)
        .fallback(ServeFile::new(Path::new(static_dir).join("index.html")));

    Router::new()
        .route("/health", get(health_check))
        // Auth
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/role", get(get_role))
        .route("/api/profile", get(get_profile).put(save_profile))
        // Catalog
        .route("/api/products", get(list_products).post(add_product))
        .route("/api/products/{id}", put(update_product).delete(delete_product))
        .route("/api/episodes", get(list_episodes).post(add_episode))
        .route("/api/episodes/{id}", put(update_episode).delete(delete_episode))
        .route("/api/videos", get(list_videos).post(add_video))
        // Payments
        .route("/api/stripe/config", get(stripe_config_status).put(set_stripe_config))
        .route("/api/checkout", post(create_checkout))
        .route("/api/checkout/{session_id}", get(checkout_status))
        .fallback_service(frontend)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = ServerConfig::from_env();

    let payments = Payments::new();
    match &config.stripe {
        Some(stripe) => payments.configure(stripe),
        None => {
            tracing::warn!("Stripe not configured; checkout disabled until an admin sets a key");
            tracing::warn!("  Set STRIPE_SECRET_KEY in .env or use the admin page");
        }
    }

    let state = AppState::new(ContentStore::new(), payments);
    let app = app(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Show server running on http://{}", config.bind_addr);
    tracing::info!("Serving frontend from {}", config.static_dir);

    axum::serve(listener, app).await?;

    Ok(())
}
